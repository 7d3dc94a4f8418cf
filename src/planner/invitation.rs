use tracing::info;
use uuid::Uuid;

use super::TripPlanner;
use crate::{
    error::AppError,
    models::participant::Participant,
    services::mail::{compose_invitation, dispatch_logged, Mailbox},
};

impl TripPlanner {
    /// Adds an unconfirmed participant to an existing trip and sends them a
    /// confirmation link. Confirmed trips still accept invitations and
    /// duplicate emails are not rejected.
    pub async fn invite_participant(&self, trip_id: Uuid, email: &str) -> Result<Uuid, AppError> {
        let trip = self
            .store
            .find_trip_by_id(trip_id, false)
            .await?
            .ok_or(AppError::NotFound("trip"))?;

        let participant = self
            .store
            .create_participant(Participant::invitee(trip.id, email))
            .await?;
        info!(
            trip_id = %trip.id,
            participant_id = %participant.id,
            "participant invited"
        );

        let link = self.links.participant_confirmation(participant.id);
        let notification = compose_invitation(
            &self.sender,
            Mailbox::address(participant.email.clone()),
            &trip,
            &link,
        );
        dispatch_logged(self.dispatcher.as_ref(), notification).await;

        Ok(participant.id)
    }
}

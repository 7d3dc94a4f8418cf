use futures::future::join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::TripPlanner;
use crate::{
    error::AppError,
    services::mail::{compose_invitation, dispatch_logged, Mailbox},
};

impl TripPlanner {
    /// Confirms a pending trip and invites every non-owner participant to
    /// confirm their attendance. Returns the trip's public page.
    ///
    /// Repeated calls are no-ops: the trip stays confirmed and no further
    /// invitations go out. Invitations are sent concurrently and each failure
    /// is logged on its own; all of them settle before this returns.
    pub async fn confirm_trip(&self, trip_id: Uuid) -> Result<String, AppError> {
        let trip = self
            .store
            .find_trip_by_id(trip_id, true)
            .await?
            .ok_or(AppError::NotFound("trip"))?;
        let redirect = self.links.trip_view(trip.id);

        if trip.is_confirmed {
            debug!(trip_id = %trip.id, "trip already confirmed");
            return Ok(redirect);
        }
        if !self.store.update_trip_confirmed(trip.id).await? {
            // Lost a race with another confirmation; that call sends the invitations.
            debug!(trip_id = %trip.id, "trip confirmed concurrently");
            return Ok(redirect);
        }

        let dispatches = trip.participants.iter().map(|participant| {
            let link = self.links.participant_confirmation(participant.id);
            let notification = compose_invitation(
                &self.sender,
                Mailbox::address(participant.email.clone()),
                &trip,
                &link,
            );
            dispatch_logged(self.dispatcher.as_ref(), notification)
        });
        let outcomes = join_all(dispatches).await;
        let delivered = outcomes.iter().filter(|sent| **sent).count();

        if delivered < outcomes.len() {
            warn!(
                trip_id = %trip.id,
                failed = outcomes.len() - delivered,
                "some invitations could not be sent"
            );
        }
        info!(
            trip_id = %trip.id,
            invited = outcomes.len(),
            delivered,
            "trip confirmed"
        );

        Ok(redirect)
    }

    /// Marks an invited participant as attending. Returns the page of the
    /// participant's trip.
    pub async fn confirm_participant(&self, participant_id: Uuid) -> Result<String, AppError> {
        let participant = self
            .store
            .find_participant_by_id(participant_id)
            .await?
            .ok_or(AppError::NotFound("participant"))?;
        let redirect = self.links.trip_view(participant.trip_id);

        if participant.is_confirmed {
            debug!(participant_id = %participant.id, "participant already confirmed");
            return Ok(redirect);
        }
        if self
            .store
            .update_participant_confirmed(participant.id)
            .await?
        {
            info!(
                trip_id = %participant.trip_id,
                participant_id = %participant.id,
                "participant confirmed"
            );
        }

        Ok(redirect)
    }
}

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use super::TripPlanner;
use crate::{
    error::AppError,
    models::trip::{CreateTrip, NewTrip, TripDetails},
    services::mail::{compose_trip_confirmation, dispatch_logged, Mailbox},
};

/// A trip may not start before `now` and may not end before it starts.
/// Equal instants are accepted.
pub fn validate_dates(
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if starts_at < now {
        return Err(AppError::InvalidDate("start in past"));
    }
    if ends_at < starts_at {
        return Err(AppError::InvalidDate("end before start"));
    }
    Ok(())
}

impl TripPlanner {
    /// Creates the trip together with its owner and invitees, then asks the
    /// owner to confirm it.
    pub async fn create_trip(&self, input: CreateTrip) -> Result<Uuid, AppError> {
        let now = self.clock.now();
        validate_dates(input.starts_at, input.ends_at, now)?;

        let owner = Mailbox::new(input.owner_name.clone(), input.owner_email.clone());
        let trip = self
            .store
            .create_trip(NewTrip::from_request(input, now))
            .await?;
        info!(
            trip_id = %trip.id,
            destination = %trip.destination,
            participants = trip.participants.len(),
            "trip created"
        );

        let link = self.links.trip_confirmation(trip.id);
        let notification = compose_trip_confirmation(&self.sender, owner, &trip, &link);
        dispatch_logged(self.dispatcher.as_ref(), notification).await;

        Ok(trip.id)
    }

    pub async fn get_trip(&self, trip_id: Uuid) -> Result<TripDetails, AppError> {
        let trip = self
            .store
            .find_trip_by_id(trip_id, false)
            .await?
            .ok_or(AppError::NotFound("trip"))?;
        let participants = self.store.list_participants(trip.id).await?;
        Ok(TripDetails::new(trip, participants))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::super::test_support::{harness, harness_with, now, trip_request, API};
    use super::*;
    use crate::{mocks::RecordingDispatcher, services::store::TripStore};

    #[test]
    fn dates_are_checked_against_now_and_each_other() {
        let now = now();
        let day = Duration::days(1);

        assert!(validate_dates(now, now, now).is_ok());
        assert!(validate_dates(now + day, now + day * 3, now).is_ok());
        assert!(matches!(
            validate_dates(now - Duration::seconds(1), now + day, now),
            Err(AppError::InvalidDate("start in past"))
        ));
        assert!(matches!(
            validate_dates(now + day * 2, now + day, now),
            Err(AppError::InvalidDate("end before start"))
        ));
    }

    #[tokio::test]
    async fn create_trip_persists_owner_and_invitees() {
        let h = harness();

        let trip_id = h
            .planner
            .create_trip(trip_request(&["bo@example.com", "bo@example.com"]))
            .await
            .unwrap();

        let participants = h.store.list_participants(trip_id).await.unwrap();
        assert_eq!(participants.len(), 3);
        let owners: Vec<_> = participants.iter().filter(|p| p.is_owner).collect();
        assert_eq!(owners.len(), 1);
        assert!(owners[0].is_confirmed);
        assert_eq!(owners[0].email, "ana@example.com");
        assert!(participants
            .iter()
            .filter(|p| !p.is_owner)
            .all(|p| !p.is_confirmed));

        let trip = h.store.find_trip_by_id(trip_id, false).await.unwrap().unwrap();
        assert!(!trip.is_confirmed);
    }

    #[tokio::test]
    async fn create_trip_emails_only_the_owner() {
        let h = harness();

        let trip_id = h
            .planner
            .create_trip(trip_request(&["bo@example.com"]))
            .await
            .unwrap();

        let sent = h.dispatcher.attempts();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, Mailbox::new("Ana", "ana@example.com"));
        assert!(sent[0]
            .html_body
            .contains(&format!("{API}/trips/{trip_id}/confirm")));
    }

    #[tokio::test]
    async fn invalid_dates_persist_nothing() {
        let h = harness();
        let mut request = trip_request(&["bo@example.com"]);
        request.ends_at = request.starts_at - Duration::hours(1);

        let err = h.planner.create_trip(request).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidDate("end before start")));
        assert_eq!(h.store.trip_count().await, 0);
        assert_eq!(h.store.participant_count().await, 0);
        assert!(h.dispatcher.attempts().is_empty());
    }

    #[tokio::test]
    async fn start_in_the_past_is_rejected() {
        let h = harness();
        let mut request = trip_request(&[]);
        request.starts_at = now() - Duration::days(1);

        let err = h.planner.create_trip(request).await.unwrap_err();

        assert!(matches!(err, AppError::InvalidDate("start in past")));
        assert_eq!(h.store.trip_count().await, 0);
    }

    #[tokio::test]
    async fn failed_owner_email_does_not_fail_creation() {
        let h = harness_with(RecordingDispatcher::failing_for(["ana@example.com"]));

        let trip_id = h.planner.create_trip(trip_request(&[])).await.unwrap();

        assert_eq!(h.dispatcher.attempts().len(), 1);
        assert!(h
            .store
            .find_trip_by_id(trip_id, false)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn get_trip_lists_owner_first() {
        let h = harness();
        let trip_id = h
            .planner
            .create_trip(trip_request(&["bo@example.com"]))
            .await
            .unwrap();

        let details = h.planner.get_trip(trip_id).await.unwrap();

        assert_eq!(details.id, trip_id);
        assert_eq!(details.participants.len(), 2);
        assert!(details.participants[0].is_owner);
        assert_eq!(details.participants[1].email, "bo@example.com");

        let missing = h.planner.get_trip(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(missing, AppError::NotFound("trip")));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::participant::Participant;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: Uuid,
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_confirmed: bool,
    pub created_at: DateTime<Utc>,
    /// Only filled when the store is asked to include participants.
    #[sqlx(skip)]
    #[serde(default)]
    pub participants: Vec<Participant>,
}

/// Input for [`crate::planner::TripPlanner::create_trip`]. Field contents are
/// expected to be validated by the caller; date ordering is checked by the
/// planner itself.
#[derive(Debug, Clone)]
pub struct CreateTrip {
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub owner_name: String,
    pub owner_email: String,
    pub emails_to_invite: Vec<String>,
}

/// Rows handed to the store for one atomic trip creation.
#[derive(Debug, Clone)]
pub struct NewTrip {
    pub trip: Trip,
    pub participants: Vec<Participant>,
}

impl NewTrip {
    /// Builds the trip row, its confirmed owner and one unconfirmed
    /// participant per invited email.
    pub fn from_request(input: CreateTrip, now: DateTime<Utc>) -> Self {
        let trip_id = Uuid::new_v4();
        let mut participants = Vec::with_capacity(input.emails_to_invite.len() + 1);
        participants.push(Participant::owner(
            trip_id,
            input.owner_name,
            input.owner_email,
        ));
        participants.extend(
            input
                .emails_to_invite
                .into_iter()
                .map(|email| Participant::invitee(trip_id, email)),
        );

        let trip = Trip {
            id: trip_id,
            destination: input.destination,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            is_confirmed: false,
            created_at: now,
            participants: Vec::new(),
        };

        Self { trip, participants }
    }
}

/// Read model served by `GET /trips/:id`.
#[derive(Debug, Clone, Serialize)]
pub struct TripDetails {
    pub id: Uuid,
    pub destination: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub is_confirmed: bool,
    pub participants: Vec<Participant>,
}

impl TripDetails {
    pub fn new(trip: Trip, participants: Vec<Participant>) -> Self {
        Self {
            id: trip.id,
            destination: trip.destination,
            starts_at: trip.starts_at,
            ends_at: trip.ends_at,
            is_confirmed: trip.is_confirmed,
            participants,
        }
    }
}

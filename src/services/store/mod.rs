//! Record store for trips and participants.
//!
//! Every method is a single atomic operation against the backend. The planner
//! never keeps a write open while it talks to the notification dispatcher.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryTripStore;
pub use sqlite::SqliteTripStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        participant::Participant,
        trip::{NewTrip, Trip},
    },
};

#[async_trait]
pub trait TripStore: Send + Sync {
    /// Persists the trip and all of its initial participants, or nothing.
    async fn create_trip(&self, new_trip: NewTrip) -> Result<Trip, AppError>;

    /// With `include_invitees`, `Trip::participants` holds every non-owner
    /// participant in invitation order.
    async fn find_trip_by_id(
        &self,
        id: Uuid,
        include_invitees: bool,
    ) -> Result<Option<Trip>, AppError>;

    /// Flips `is_confirmed` to true. Returns `false` when the trip was
    /// already confirmed (or does not exist) and nothing changed.
    async fn update_trip_confirmed(&self, id: Uuid) -> Result<bool, AppError>;

    async fn create_participant(&self, participant: Participant)
        -> Result<Participant, AppError>;

    async fn find_participant_by_id(&self, id: Uuid) -> Result<Option<Participant>, AppError>;

    /// Same contract as [`TripStore::update_trip_confirmed`].
    async fn update_participant_confirmed(&self, id: Uuid) -> Result<bool, AppError>;

    /// All participants of a trip, owner first.
    async fn list_participants(&self, trip_id: Uuid) -> Result<Vec<Participant>, AppError>;
}

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::TripStore;
use crate::{
    error::AppError,
    models::{
        participant::Participant,
        trip::{NewTrip, Trip},
    },
};

#[derive(Default)]
struct Records {
    trips: HashMap<Uuid, Trip>,
    // Insertion order doubles as invitation order.
    participants: Vec<Participant>,
}

/// Store backed by process memory. Data is lost on restart.
#[derive(Default)]
pub struct MemoryTripStore {
    records: RwLock<Records>,
}

impl MemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn trip_count(&self) -> usize {
        self.records.read().await.trips.len()
    }

    pub async fn participant_count(&self) -> usize {
        self.records.read().await.participants.len()
    }
}

#[async_trait]
impl TripStore for MemoryTripStore {
    async fn create_trip(&self, new_trip: NewTrip) -> Result<Trip, AppError> {
        let NewTrip {
            mut trip,
            participants,
        } = new_trip;
        let mut records = self.records.write().await;
        records.trips.insert(trip.id, trip.clone());
        records.participants.extend(participants.iter().cloned());
        trip.participants = participants;
        Ok(trip)
    }

    async fn find_trip_by_id(
        &self,
        id: Uuid,
        include_invitees: bool,
    ) -> Result<Option<Trip>, AppError> {
        let records = self.records.read().await;
        let Some(mut trip) = records.trips.get(&id).cloned() else {
            return Ok(None);
        };
        if include_invitees {
            trip.participants = records
                .participants
                .iter()
                .filter(|p| p.trip_id == id && !p.is_owner)
                .cloned()
                .collect();
        }
        Ok(Some(trip))
    }

    async fn update_trip_confirmed(&self, id: Uuid) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        match records.trips.get_mut(&id) {
            Some(trip) if !trip.is_confirmed => {
                trip.is_confirmed = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn create_participant(
        &self,
        participant: Participant,
    ) -> Result<Participant, AppError> {
        let mut records = self.records.write().await;
        if !records.trips.contains_key(&participant.trip_id) {
            return Err(AppError::NotFound("trip"));
        }
        records.participants.push(participant.clone());
        Ok(participant)
    }

    async fn find_participant_by_id(&self, id: Uuid) -> Result<Option<Participant>, AppError> {
        let records = self.records.read().await;
        Ok(records.participants.iter().find(|p| p.id == id).cloned())
    }

    async fn update_participant_confirmed(&self, id: Uuid) -> Result<bool, AppError> {
        let mut records = self.records.write().await;
        match records.participants.iter_mut().find(|p| p.id == id) {
            Some(participant) if !participant.is_confirmed => {
                participant.is_confirmed = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_participants(&self, trip_id: Uuid) -> Result<Vec<Participant>, AppError> {
        let records = self.records.read().await;
        let mut participants: Vec<_> = records
            .participants
            .iter()
            .filter(|p| p.trip_id == trip_id)
            .cloned()
            .collect();
        participants.sort_by_key(|p| !p.is_owner);
        Ok(participants)
    }
}

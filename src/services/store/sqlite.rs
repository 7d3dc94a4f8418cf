use async_trait::async_trait;
use sqlx::{Executor, Sqlite};
use tracing::debug;
use uuid::Uuid;

use super::TripStore;
use crate::{
    db::DbPool,
    error::AppError,
    models::{
        participant::Participant,
        trip::{NewTrip, Trip},
    },
};

#[derive(Clone)]
pub struct SqliteTripStore {
    db: DbPool,
}

impl SqliteTripStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

async fn insert_participant<'e, E>(
    executor: E,
    participant: &Participant,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"INSERT INTO participants (id, trip_id, name, email, is_owner, is_confirmed)
           VALUES (?, ?, ?, ?, ?, ?)"#,
    )
    .bind(participant.id)
    .bind(participant.trip_id)
    .bind(&participant.name)
    .bind(&participant.email)
    .bind(participant.is_owner)
    .bind(participant.is_confirmed)
    .execute(executor)
    .await?;
    Ok(())
}

#[async_trait]
impl TripStore for SqliteTripStore {
    async fn create_trip(&self, new_trip: NewTrip) -> Result<Trip, AppError> {
        let NewTrip {
            mut trip,
            participants,
        } = new_trip;

        let mut tx = self.db.begin().await?;
        sqlx::query(
            r#"INSERT INTO trips (id, destination, starts_at, ends_at, is_confirmed, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(trip.id)
        .bind(&trip.destination)
        .bind(trip.starts_at)
        .bind(trip.ends_at)
        .bind(trip.is_confirmed)
        .bind(trip.created_at)
        .execute(&mut *tx)
        .await?;
        for participant in &participants {
            insert_participant(&mut *tx, participant).await?;
        }
        tx.commit().await?;

        debug!(trip_id = %trip.id, participants = participants.len(), "trip rows written");
        trip.participants = participants;
        Ok(trip)
    }

    async fn find_trip_by_id(
        &self,
        id: Uuid,
        include_invitees: bool,
    ) -> Result<Option<Trip>, AppError> {
        let trip = sqlx::query_as::<_, Trip>(
            r#"SELECT id, destination, starts_at, ends_at, is_confirmed, created_at
               FROM trips WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        let Some(mut trip) = trip else {
            return Ok(None);
        };
        if include_invitees {
            trip.participants = sqlx::query_as::<_, Participant>(
                r#"SELECT id, trip_id, name, email, is_owner, is_confirmed
                   FROM participants
                   WHERE trip_id = ? AND is_owner = 0
                   ORDER BY rowid"#,
            )
            .bind(id)
            .fetch_all(&self.db)
            .await?;
        }
        Ok(Some(trip))
    }

    async fn update_trip_confirmed(&self, id: Uuid) -> Result<bool, AppError> {
        let result =
            sqlx::query("UPDATE trips SET is_confirmed = 1 WHERE id = ? AND is_confirmed = 0")
                .bind(id)
                .execute(&self.db)
                .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn create_participant(
        &self,
        participant: Participant,
    ) -> Result<Participant, AppError> {
        insert_participant(&self.db, &participant).await?;
        Ok(participant)
    }

    async fn find_participant_by_id(&self, id: Uuid) -> Result<Option<Participant>, AppError> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"SELECT id, trip_id, name, email, is_owner, is_confirmed
               FROM participants WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(participant)
    }

    async fn update_participant_confirmed(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE participants SET is_confirmed = 1 WHERE id = ? AND is_confirmed = 0",
        )
        .bind(id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn list_participants(&self, trip_id: Uuid) -> Result<Vec<Participant>, AppError> {
        let participants = sqlx::query_as::<_, Participant>(
            r#"SELECT id, trip_id, name, email, is_owner, is_confirmed
               FROM participants
               WHERE trip_id = ?
               ORDER BY is_owner DESC, rowid"#,
        )
        .bind(trip_id)
        .fetch_all(&self.db)
        .await?;
        Ok(participants)
    }
}

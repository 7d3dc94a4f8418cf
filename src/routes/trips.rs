use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::trip::{CreateTrip, TripDetails},
    state::AppState,
    validation::{parse_id, AppJson, Validator, MIN_DESTINATION_LEN},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", post(create_trip))
        .route("/trips/:trip_id", get(trip_details))
        .route("/trips/:trip_id/confirm", get(confirm_trip))
        .route("/trips/:trip_id/invites", post(create_invite))
}

#[derive(Debug, Deserialize)]
struct CreateTripBody {
    destination: String,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    owner_name: String,
    owner_email: String,
    emails_to_invite: Vec<String>,
}

impl CreateTripBody {
    fn validate(self) -> Result<CreateTrip, AppError> {
        let mut validator = Validator::new();
        validator.min_chars("destination", &self.destination, MIN_DESTINATION_LEN);
        validator.email("owner_email", &self.owner_email);
        for (index, email) in self.emails_to_invite.iter().enumerate() {
            validator.email(&format!("emails_to_invite.{index}"), email);
        }
        validator.finish()?;

        Ok(CreateTrip {
            destination: self.destination,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            owner_name: self.owner_name,
            owner_email: self.owner_email,
            emails_to_invite: self.emails_to_invite,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TripCreated {
    trip_id: Uuid,
}

async fn create_trip(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateTripBody>,
) -> Result<impl IntoResponse, AppError> {
    let input = body.validate()?;
    let trip_id = state.planner.create_trip(input).await?;
    Ok((StatusCode::CREATED, Json(TripCreated { trip_id })))
}

async fn trip_details(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Json<TripDetails>, AppError> {
    let trip_id = parse_id("tripId", &trip_id)?;
    Ok(Json(state.planner.get_trip(trip_id).await?))
}

async fn confirm_trip(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
) -> Result<Redirect, AppError> {
    let trip_id = parse_id("tripId", &trip_id)?;
    let target = state.planner.confirm_trip(trip_id).await?;
    Ok(Redirect::to(&target))
}

#[derive(Debug, Deserialize)]
struct InviteBody {
    email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InviteCreated {
    participant_id: Uuid,
}

async fn create_invite(
    State(state): State<AppState>,
    Path(trip_id): Path<String>,
    AppJson(body): AppJson<InviteBody>,
) -> Result<impl IntoResponse, AppError> {
    let trip_id = parse_id("tripId", &trip_id)?;
    let mut validator = Validator::new();
    validator.email("email", &body.email);
    validator.finish()?;

    let participant_id = state
        .planner
        .invite_participant(trip_id, &body.email)
        .await?;
    Ok((StatusCode::CREATED, Json(InviteCreated { participant_id })))
}

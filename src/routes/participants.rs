use axum::{
    extract::{Path, State},
    response::Redirect,
    routing::get,
    Router,
};

use crate::{error::AppError, state::AppState, validation::parse_id};

pub fn router() -> Router<AppState> {
    Router::new().route("/participants/:participant_id/confirm", get(confirm_participant))
}

async fn confirm_participant(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
) -> Result<Redirect, AppError> {
    let participant_id = parse_id("participantId", &participant_id)?;
    let target = state.planner.confirm_participant(participant_id).await?;
    Ok(Redirect::to(&target))
}

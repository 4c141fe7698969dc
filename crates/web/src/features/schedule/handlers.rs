use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::schedule::{
        CompetitionScheduleResponse, GenerateHeatsRequest, GeneratedHeatResponse, ScheduleDay,
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitions/{slug}/schedule",
    params(
        ("slug" = String, Path, description = "Competition slug")
    ),
    responses(
        (status = 200, description = "Schedule summary per event", body = CompetitionScheduleResponse),
        (status = 404, description = "Competition not found")
    ),
    tag = "schedule"
)]
pub async fn get_schedule(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> Result<Json<CompetitionScheduleResponse>, WebError> {
    let schedule = services::competition_schedule(db.pool(), &slug).await?;

    Ok(Json(schedule))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{slug}/schedule/days",
    params(
        ("slug" = String, Path, description = "Competition slug")
    ),
    responses(
        (status = 200, description = "Heats grouped by local date", body = Vec<ScheduleDay>),
        (status = 404, description = "Competition not found")
    ),
    tag = "schedule"
)]
pub async fn get_schedule_days(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<ScheduleDay>>, WebError> {
    let days = services::schedule_days(db.pool(), &slug).await?;

    Ok(Json(days))
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/heats/generate",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = GenerateHeatsRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Heats regenerated", body = Vec<GeneratedHeatResponse>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event or venue not found")
    ),
    tag = "schedule"
)]
pub async fn generate_heats(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<GenerateHeatsRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let heats = services::generate_heats(db.pool(), event_id, &req).await?;

    Ok((StatusCode::CREATED, Json(heats)).into_response())
}

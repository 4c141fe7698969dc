use axum::{
    Json,
    extract::{Path, Query, State},
};
use storage::{
    Database,
    dto::{
        common::CursorResponse,
        scores::{
            AggregateScoresRequest, AggregationSummary, LeaderboardEntry, LeaderboardFilter,
            OverallLeaderboardEntry, OverallLeaderboardFilter, ScoreResponse, SubmitScoreRequest,
        },
    },
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/scores/aggregate",
    request_body = AggregateScoresRequest,
    responses(
        (status = 200, description = "Aggregated value of the attempts", body = AggregationSummary),
        (status = 400, description = "Validation error")
    ),
    tag = "scores"
)]
pub async fn aggregate_scores(
    Json(req): Json<AggregateScoresRequest>,
) -> Result<Json<AggregationSummary>, WebError> {
    req.validate()?;

    Ok(Json(services::aggregate(&req)?))
}

#[utoipa::path(
    post,
    path = "/api/events/{event_id}/scores",
    params(
        ("event_id" = Uuid, Path, description = "Event ID")
    ),
    request_body = SubmitScoreRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Score recorded", body = ScoreResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Event or registration not found")
    ),
    tag = "scores"
)]
pub async fn submit_score(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<SubmitScoreRequest>,
) -> Result<Json<ScoreResponse>, WebError> {
    req.validate()?;
    req.validate_attempts()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let score = services::submit_score(db.pool(), event_id, &req).await?;

    Ok(Json(score))
}

#[utoipa::path(
    get,
    path = "/api/events/{event_id}/leaderboard",
    params(
        ("event_id" = Uuid, Path, description = "Event ID"),
        LeaderboardFilter
    ),
    responses(
        (status = 200, description = "One page of the leaderboard", body = CursorResponse<LeaderboardEntry>),
        (status = 400, description = "Invalid paging parameters"),
        (status = 404, description = "Event not found")
    ),
    tag = "scores"
)]
pub async fn get_leaderboard(
    State(db): State<Database>,
    Path(event_id): Path<Uuid>,
    Query(filter): Query<LeaderboardFilter>,
) -> Result<Json<CursorResponse<LeaderboardEntry>>, WebError> {
    let page = services::leaderboard(db.pool(), event_id, &filter).await?;

    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{slug}/leaderboard",
    params(
        ("slug" = String, Path, description = "Competition slug"),
        OverallLeaderboardFilter
    ),
    responses(
        (status = 200, description = "Athletes ranked by total event points within each division", body = Vec<OverallLeaderboardEntry>),
        (status = 404, description = "Competition not found")
    ),
    tag = "scores"
)]
pub async fn get_overall_leaderboard(
    State(db): State<Database>,
    Path(slug): Path<String>,
    Query(filter): Query<OverallLeaderboardFilter>,
) -> Result<Json<Vec<OverallLeaderboardEntry>>, WebError> {
    let leaderboard = services::overall_leaderboard(db.pool(), &slug, &filter).await?;

    Ok(Json(leaderboard))
}

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use storage::{
    Database,
    dto::competition::{CompetitionResponse, CreateCompetitionRequest, UpdateCompetitionRequest},
};
use validator::Validate;

use crate::error::WebResult;

use super::services;

#[utoipa::path(
    get,
    path = "/api/competitions",
    responses(
        (status = 200, description = "Competitions, latest start date first", body = Vec<CompetitionResponse>)
    ),
    tag = "competitions"
)]
pub async fn list_competitions(
    State(db): State<Database>,
) -> WebResult<Json<Vec<CompetitionResponse>>> {
    services::list_competitions(db.pool()).await.map(Json)
}

#[utoipa::path(
    get,
    path = "/api/competitions/{slug}",
    params(("slug" = String, Path, description = "Competition slug")),
    responses(
        (status = 200, description = "Competition with its registration pricing", body = CompetitionResponse),
        (status = 404, description = "No competition uses this slug")
    ),
    tag = "competitions"
)]
pub async fn get_competition(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> WebResult<Json<CompetitionResponse>> {
    services::competition_by_slug(db.pool(), &slug).await.map(Json)
}

#[utoipa::path(
    post,
    path = "/api/competitions",
    request_body = CreateCompetitionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Competition opened", body = CompetitionResponse),
        (status = 400, description = "Invalid slug, timezone, fee or date range"),
        (status = 401, description = "Missing or unknown API key"),
        (status = 409, description = "Slug taken by another competition")
    ),
    tag = "competitions"
)]
pub async fn create_competition(
    State(db): State<Database>,
    Json(req): Json<CreateCompetitionRequest>,
) -> WebResult<(StatusCode, Json<CompetitionResponse>)> {
    req.validate()?;

    let created = services::create_competition(db.pool(), &req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/api/competitions/{slug}",
    params(("slug" = String, Path, description = "Competition slug")),
    request_body = UpdateCompetitionRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Competition after the update", body = CompetitionResponse),
        (status = 400, description = "Invalid field or date range"),
        (status = 401, description = "Missing or unknown API key"),
        (status = 404, description = "No competition uses this slug"),
        (status = 409, description = "Slug taken by another competition")
    ),
    tag = "competitions"
)]
pub async fn update_competition(
    State(db): State<Database>,
    Path(slug): Path<String>,
    Json(req): Json<UpdateCompetitionRequest>,
) -> WebResult<Json<CompetitionResponse>> {
    req.validate()?;

    services::update_competition(db.pool(), &slug, &req)
        .await
        .map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/competitions/{slug}",
    params(("slug" = String, Path, description = "Competition slug")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Competition and its event data removed"),
        (status = 401, description = "Missing or unknown API key"),
        (status = 404, description = "No competition uses this slug")
    ),
    tag = "competitions"
)]
pub async fn delete_competition(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> WebResult<StatusCode> {
    services::delete_competition(db.pool(), &slug).await?;

    Ok(StatusCode::NO_CONTENT)
}

use axum::{
    Json,
    extract::{Path, State},
};
use storage::{
    Database,
    dto::fees::{CalculateFeesRequest, FeeBreakdown, RevenueStats},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/fees/calculate",
    request_body = CalculateFeesRequest,
    responses(
        (status = 200, description = "Fee breakdown for the given fee", body = FeeBreakdown),
        (status = 400, description = "Validation error")
    ),
    tag = "fees"
)]
pub async fn calculate_fees(
    Json(req): Json<CalculateFeesRequest>,
) -> Result<Json<FeeBreakdown>, WebError> {
    req.validate()?;

    Ok(Json(services::quote_fees(&req)))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{slug}/fees/{division_id}",
    params(
        ("slug" = String, Path, description = "Competition slug"),
        ("division_id" = Uuid, Path, description = "Division ID")
    ),
    responses(
        (status = 200, description = "Fee breakdown for the division", body = FeeBreakdown),
        (status = 404, description = "Competition not found")
    ),
    tag = "fees"
)]
pub async fn get_division_fees(
    State(db): State<Database>,
    Path((slug, division_id)): Path<(String, Uuid)>,
) -> Result<Json<FeeBreakdown>, WebError> {
    let breakdown = services::division_fee_breakdown(db.pool(), &slug, division_id).await?;

    Ok(Json(breakdown))
}

#[utoipa::path(
    get,
    path = "/api/competitions/{slug}/revenue",
    params(
        ("slug" = String, Path, description = "Competition slug")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Revenue summary", body = RevenueStats),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Competition not found")
    ),
    tag = "fees"
)]
pub async fn get_revenue(
    State(db): State<Database>,
    Path(slug): Path<String>,
) -> Result<Json<RevenueStats>, WebError> {
    let stats = services::revenue_stats(db.pool(), &slug).await?;

    Ok(Json(stats))
}

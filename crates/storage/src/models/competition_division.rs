use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CompetitionDivision {
    pub competition_id: Uuid,
    pub division_id: Uuid,
    pub fee_cents: i64,
}

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Score {
    pub score_id: Uuid,
    pub event_id: Uuid,
    pub registration_id: Uuid,
    /// Raw attempt values in submission order
    pub attempts: Vec<i64>,
    pub aggregated_value: Option<i64>,
    pub score_type: String,
    pub status: String,
    /// Fixed-width key, greater is better
    pub sort_key: String,
    pub created_at: chrono::NaiveDateTime,
}

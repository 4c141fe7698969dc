use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A scaling level athletes register under (Rx, Scaled, Masters 40+, ...)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Division {
    pub division_id: Uuid,
    pub label: String,
    pub position: i32,
}

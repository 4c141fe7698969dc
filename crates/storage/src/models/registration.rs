use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Registration {
    pub registration_id: Uuid,
    pub competition_id: Uuid,
    pub division_id: Option<Uuid>,
    pub athlete_name: String,
    pub created_at: chrono::NaiveDateTime,
}

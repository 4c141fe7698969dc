use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Venue {
    pub venue_id: Uuid,
    pub competition_id: Uuid,
    pub name: String,
    pub lane_count: i32,
}

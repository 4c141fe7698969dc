use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Heat {
    pub heat_id: Uuid,
    pub event_id: Uuid,
    pub heat_number: i32,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub venue_id: Option<Uuid>,
    pub division_id: Option<Uuid>,
}

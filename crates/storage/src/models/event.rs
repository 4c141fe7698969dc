use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A workout scored as part of a competition
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CompetitionEvent {
    pub event_id: Uuid,
    pub competition_id: Uuid,
    pub name: String,
    pub scheme: String,
    /// Overrides the scheme's default aggregation when set
    pub score_type: Option<String>,
    pub track_order: i32,
    /// Percentage applied to event points, 100 counts them once
    pub points_multiplier: i32,
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VenueRef {
    pub venue_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DivisionRef {
    pub division_id: Uuid,
    pub label: String,
}

/// A heat as seen by the schedule: when, how long, where and for whom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScheduledHeat {
    pub heat_id: Uuid,
    pub heat_number: i32,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub venue: Option<VenueRef>,
    pub division: Option<DivisionRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EventWithHeats {
    pub event_id: Uuid,
    pub name: String,
    pub heats: Vec<ScheduledHeat>,
}

/// Display summary of one event's heats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleInfo {
    /// Earliest heat, e.g. "9:00 AM"
    pub start_time: String,
    /// End of the latest heat, `None` when that heat has no duration
    pub end_time: Option<String>,
    pub heat_count: usize,
    pub venue_name: Option<String>,
    pub divisions: Vec<DivisionRef>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventScheduleResponse {
    pub event_id: Uuid,
    pub name: String,
    pub schedule: ScheduleInfo,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CompetitionScheduleResponse {
    pub timezone: String,
    pub events: Vec<EventScheduleResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ScheduleDay {
    pub date: NaiveDate,
    pub heats: Vec<ScheduledHeat>,
}

/// Regenerate every heat of an event from its competition's registrations
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct GenerateHeatsRequest {
    pub venue_id: Uuid,

    pub start_time: DateTime<Utc>,

    #[validate(range(min = 1, max = 600, message = "Heat duration must be between 1 and 600 minutes"))]
    pub heat_duration_minutes: i32,

    #[validate(range(min = 0, max = 120))]
    #[serde(default = "default_transition_minutes")]
    pub transition_minutes: i32,

    #[serde(default = "default_keep_divisions_pure")]
    pub keep_divisions_pure: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GeneratedHeatResponse {
    pub heat_id: Uuid,
    pub heat_number: i32,
    pub scheduled_time: DateTime<Utc>,
    pub division_id: Option<Uuid>,
    pub registration_ids: Vec<Uuid>,
}

fn default_transition_minutes() -> i32 {
    5
}

fn default_keep_divisions_pure() -> bool {
    true
}

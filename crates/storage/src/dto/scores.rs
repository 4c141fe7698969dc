use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, PaginationDirection};

/// How repeated attempts collapse into one score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScoreType {
    Max,
    Min,
    Sum,
    Average,
    First,
    Last,
}

impl ScoreType {
    pub const ALL: [ScoreType; 6] = [
        Self::Max,
        Self::Min,
        Self::Sum,
        Self::Average,
        Self::First,
        Self::Last,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Max => "max",
            Self::Min => "min",
            Self::Sum => "sum",
            Self::Average => "average",
            Self::First => "first",
            Self::Last => "last",
        }
    }
}

/// How a workout is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum WorkoutScheme {
    Time,
    TimeWithCap,
    PassFail,
    RoundsReps,
    Reps,
    Emom,
    Load,
    Calories,
    Meters,
    Feet,
    Points,
}

impl WorkoutScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::TimeWithCap => "time-with-cap",
            Self::PassFail => "pass-fail",
            Self::RoundsReps => "rounds-reps",
            Self::Reps => "reps",
            Self::Emom => "emom",
            Self::Load => "load",
            Self::Calories => "calories",
            Self::Meters => "meters",
            Self::Feet => "feet",
            Self::Points => "points",
        }
    }

    /// Faster is better for timed workouts, whatever the aggregation
    pub fn is_lower_better(&self) -> bool {
        matches!(self, Self::Time | Self::TimeWithCap)
    }

    /// Aggregation used when an event does not pick one explicitly
    pub fn default_score_type(&self) -> ScoreType {
        match self {
            Self::Time | Self::TimeWithCap => ScoreType::Min,
            Self::PassFail => ScoreType::First,
            Self::RoundsReps
            | Self::Reps
            | Self::Emom
            | Self::Load
            | Self::Calories
            | Self::Meters
            | Self::Feet
            | Self::Points => ScoreType::Max,
        }
    }
}

/// Outcome of an athlete's attempt at an event
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ScoreStatus {
    #[default]
    Scored,
    /// Hit the time cap
    Cap,
    /// Did not finish
    Dnf,
    /// Did not start
    Dns,
    Withdrawn,
}

impl ScoreStatus {
    pub const ALL: [ScoreStatus; 5] = [
        Self::Scored,
        Self::Cap,
        Self::Dnf,
        Self::Dns,
        Self::Withdrawn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scored => "scored",
            Self::Cap => "cap",
            Self::Dnf => "dnf",
            Self::Dns => "dns",
            Self::Withdrawn => "withdrawn",
        }
    }

    /// Ranked on the value of the attempts
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Scored | Self::Cap)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl FromStr for ScoreType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|score_type| score_type.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "score type",
                value: s.to_string(),
            })
    }
}

impl FromStr for ScoreStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseEnumError {
                kind: "score status",
                value: s.to_string(),
            })
    }
}

impl FromStr for WorkoutScheme {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let scheme = match s {
            "time" => Self::Time,
            "time-with-cap" => Self::TimeWithCap,
            "pass-fail" => Self::PassFail,
            "rounds-reps" => Self::RoundsReps,
            "reps" => Self::Reps,
            "emom" => Self::Emom,
            "load" => Self::Load,
            "calories" => Self::Calories,
            "meters" => Self::Meters,
            "feet" => Self::Feet,
            "points" => Self::Points,
            other => {
                return Err(ParseEnumError {
                    kind: "workout scheme",
                    value: other.to_string(),
                });
            }
        };
        Ok(scheme)
    }
}

impl fmt::Display for ScoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ScoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for WorkoutScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AggregationSummary {
    pub aggregated: Option<i64>,
    pub operation: ScoreType,
    pub count: usize,
}

/// Aggregate ad-hoc attempt values. Either `score_type` or `scheme` picks the operation.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AggregateScoresRequest {
    #[validate(length(max = 100, message = "At most 100 attempts can be aggregated"))]
    pub values: Vec<i64>,
    pub score_type: Option<ScoreType>,
    pub scheme: Option<WorkoutScheme>,
}

/// Record an athlete's attempts for an event
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SubmitScoreRequest {
    pub registration_id: Uuid,

    #[validate(length(max = 100, message = "At most 100 attempts can be recorded"))]
    pub attempts: Vec<i64>,

    #[serde(default)]
    pub status: ScoreStatus,
}

impl SubmitScoreRequest {
    /// Scored and capped results are ranked on their attempts, so they need at least one
    pub fn validate_attempts(&self) -> Result<(), &'static str> {
        if self.status.is_active() && self.attempts.is_empty() {
            return Err("At least one attempt is required for a scored or capped result");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoreResponse {
    pub score_id: Uuid,
    pub event_id: Uuid,
    pub registration_id: Uuid,
    pub attempts: Vec<i64>,
    pub aggregated_value: Option<i64>,
    pub score_type: String,
    pub status: String,
}

impl From<crate::models::Score> for ScoreResponse {
    fn from(score: crate::models::Score) -> Self {
        Self {
            score_id: score.score_id,
            event_id: score.event_id,
            registration_id: score.registration_id,
            attempts: score.attempts,
            aggregated_value: score.aggregated_value,
            score_type: score.score_type,
            status: score.status,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LeaderboardFilter {
    /// Opaque token from a previous page; absent for the first page
    pub cursor: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub direction: PaginationDirection,
    pub division_id: Option<Uuid>,
}

fn default_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

impl LeaderboardFilter {
    pub fn validate(&self) -> Result<(), String> {
        if self.limit < 1 || self.limit > MAX_PAGE_LIMIT {
            return Err(format!("limit must be between 1 and {}", MAX_PAGE_LIMIT));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardEntry {
    pub score_id: Uuid,
    pub registration_id: Uuid,
    pub athlete_name: String,
    pub division_id: Option<Uuid>,
    pub division_label: Option<String>,
    pub aggregated_value: Option<i64>,
    pub attempts: Vec<i64>,
    pub status: String,
    #[serde(skip)]
    pub sort_key: String,
}

impl crate::services::cursor::CursorItem for LeaderboardEntry {
    fn cursor_id(&self) -> String {
        self.score_id.to_string()
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OverallLeaderboardFilter {
    /// Only rank athletes of this division
    pub division_id: Option<Uuid>,
}

/// How an athlete placed in one event of the overall leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EventResult {
    pub event_id: Uuid,
    pub event_name: String,
    pub track_order: i32,
    /// `None` when the athlete has no ranked result for the event
    pub rank: Option<u32>,
    /// Points after the event multiplier
    pub points: i64,
    pub aggregated_value: Option<i64>,
    pub status: Option<ScoreStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct OverallLeaderboardEntry {
    pub registration_id: Uuid,
    pub athlete_name: String,
    pub division_id: Option<Uuid>,
    pub division_label: Option<String>,
    /// Rank within the athlete's division
    pub overall_rank: u32,
    pub total_points: i64,
    pub event_results: Vec<EventResult>,
}

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::fees::validate_percent;

/// Request payload for creating a new competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCompetitionRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Slug must be between 1 and 255 characters"
    ))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,

    #[validate(custom(function = "validate_status"))]
    #[serde(default = "default_status")]
    pub status: String,

    #[validate(custom(function = "validate_timezone"))]
    #[serde(default = "default_timezone")]
    pub timezone: String,

    pub start_date: NaiveDate,

    pub end_date: NaiveDate,

    #[validate(range(min = 0, message = "Registration fee cannot be negative"))]
    pub default_registration_fee_cents: Option<i64>,

    #[validate(custom(function = "validate_percent"))]
    pub platform_fee_percent: Option<Decimal>,

    pub pass_stripe_fees_to_customer: Option<bool>,
}

/// Request payload for updating an existing competition
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCompetitionRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[validate(custom(function = "validate_status"))]
    pub status: Option<String>,

    #[validate(custom(function = "validate_timezone"))]
    pub timezone: Option<String>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    #[validate(range(min = 0))]
    pub default_registration_fee_cents: Option<i64>,

    #[validate(custom(function = "validate_percent"))]
    pub platform_fee_percent: Option<Decimal>,

    pub pass_stripe_fees_to_customer: Option<bool>,
}

/// Response containing competition details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompetitionResponse {
    pub competition_id: Uuid,
    pub name: String,
    pub created_at: chrono::NaiveDateTime,
    pub slug: String,
    pub status: String,
    pub timezone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub default_registration_fee_cents: Option<i64>,
    pub platform_fee_percent: Option<Decimal>,
    pub pass_stripe_fees_to_customer: Option<bool>,
}

// Validation helpers
fn default_status() -> String {
    "draft".to_string()
}

fn default_timezone() -> String {
    "America/Denver".to_string()
}

fn validate_slug(slug: &str) -> Result<(), validator::ValidationError> {
    let is_valid = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--");

    if is_valid {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_slug"))
    }
}

fn validate_status(status: &str) -> Result<(), validator::ValidationError> {
    const VALID_STATUSES: &[&str] = &["draft", "published", "live", "completed", "cancelled"];

    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_status"))
    }
}

fn validate_timezone(timezone: &str) -> Result<(), validator::ValidationError> {
    if crate::services::schedule_map::parse_timezone(timezone).is_some() {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_timezone"))
    }
}

fn check_dates(start: NaiveDate, end: NaiveDate) -> Result<(), &'static str> {
    if end < start {
        return Err("End date must be on or after start date");
    }
    Ok(())
}

impl CreateCompetitionRequest {
    /// Additional validation that requires multiple fields
    pub fn validate_dates(&self) -> Result<(), &'static str> {
        check_dates(self.start_date, self.end_date)
    }
}

impl UpdateCompetitionRequest {
    /// Validate the dates the competition ends up with after applying this update
    pub fn validate_dates_against(
        &self,
        existing: &crate::models::Competition,
    ) -> Result<(), &'static str> {
        check_dates(
            self.start_date.unwrap_or(existing.start_date),
            self.end_date.unwrap_or(existing.end_date),
        )
    }
}

impl From<crate::models::Competition> for CompetitionResponse {
    fn from(comp: crate::models::Competition) -> Self {
        Self {
            competition_id: comp.competition_id,
            name: comp.name,
            created_at: comp.created_at,
            slug: comp.slug,
            status: comp.status,
            timezone: comp.timezone,
            start_date: comp.start_date,
            end_date: comp.end_date,
            default_registration_fee_cents: comp.default_registration_fee_cents,
            platform_fee_percent: comp.platform_fee_percent,
            pass_stripe_fees_to_customer: comp.pass_stripe_fees_to_customer,
        }
    }
}

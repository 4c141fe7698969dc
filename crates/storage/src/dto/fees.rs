use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Fee settings of a single competition, resolved from persisted settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FeeConfig {
    /// Platform cut as a percentage of the registration fee (0 to 100)
    pub platform_fee_percent: Decimal,
    /// Whether the athlete pays the card processing fee on top of the ticket price
    pub pass_stripe_fees_to_customer: bool,
}

/// Complete fee breakdown for one registration. All amounts are in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FeeBreakdown {
    pub registration_fee_cents: i64,
    pub platform_fee_cents: i64,
    pub stripe_fee_cents: i64,
    pub total_charge_cents: i64,
    pub organizer_net_cents: i64,
    pub stripe_fees_passed_to_customer: bool,
}

/// Ad-hoc fee quote, used by organizers while setting up pricing
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CalculateFeesRequest {
    #[validate(range(min = 0, message = "Registration fee cannot be negative"))]
    pub registration_fee_cents: i64,

    #[validate(custom(function = "validate_percent"))]
    pub platform_fee_percent: Decimal,

    #[serde(default = "default_pass_stripe_fees")]
    pub pass_stripe_fees_to_customer: bool,
}

impl CalculateFeesRequest {
    pub fn fee_config(&self) -> FeeConfig {
        FeeConfig {
            platform_fee_percent: self.platform_fee_percent,
            pass_stripe_fees_to_customer: self.pass_stripe_fees_to_customer,
        }
    }
}

/// Revenue collected by a competition across all completed purchases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RevenueStats {
    pub total_gross_cents: i64,
    pub total_platform_fee_cents: i64,
    pub total_stripe_fee_cents: i64,
    pub total_organizer_net_cents: i64,
    pub purchase_count: i64,
    pub by_division: Vec<DivisionRevenue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DivisionRevenue {
    /// `None` for purchases that were not tied to a division
    pub division_id: Option<Uuid>,
    pub division_label: String,
    pub purchase_count: i64,
    /// Ticket price for the division
    pub registration_fee_cents: i64,
    pub gross_cents: i64,
    pub platform_fee_cents: i64,
    pub stripe_fee_cents: i64,
    pub organizer_net_cents: i64,
}

fn default_pass_stripe_fees() -> bool {
    true
}

pub(crate) fn validate_percent(percent: &Decimal) -> Result<(), validator::ValidationError> {
    if *percent >= Decimal::ZERO && *percent <= Decimal::ONE_HUNDRED {
        Ok(())
    } else {
        Err(validator::ValidationError::new("percent_out_of_range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_fee_is_rejected() {
        let req = CalculateFeesRequest {
            registration_fee_cents: -1,
            platform_fee_percent: Decimal::new(25, 1),
            pass_stripe_fees_to_customer: true,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_percent_above_hundred_is_rejected() {
        let req = CalculateFeesRequest {
            registration_fee_cents: 5000,
            platform_fee_percent: Decimal::new(1001, 1),
            pass_stripe_fees_to_customer: false,
        };
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("platform_fee_percent"));
    }

    #[test]
    fn test_pass_stripe_fees_defaults_to_true() {
        let req: CalculateFeesRequest = serde_json::from_str(
            r#"{"registration_fee_cents": 5000, "platform_fee_percent": "2.5"}"#,
        )
        .unwrap();
        assert!(req.pass_stripe_fees_to_customer);
        assert!(req.validate().is_ok());
    }
}

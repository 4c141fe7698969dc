use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::dto::fees::{FeeBreakdown, FeeConfig};
use crate::models::Competition;

/// Card processor percentage in basis points (290 = 2.9%)
pub const STRIPE_PERCENTAGE_BASIS_POINTS: i64 = 290;
/// Card processor fixed fee per charge
pub const STRIPE_FIXED_CENTS: i64 = 30;

/// Platform percentage applied when a competition has no override (2.5%)
pub fn default_platform_fee_percent() -> Decimal {
    Decimal::new(25, 1)
}

/// Resolve the fee settings of a competition, falling back to platform defaults
pub fn build_fee_config(competition: &Competition) -> FeeConfig {
    FeeConfig {
        platform_fee_percent: competition
            .platform_fee_percent
            .unwrap_or_else(default_platform_fee_percent),
        pass_stripe_fees_to_customer: competition.pass_stripe_fees_to_customer.unwrap_or(true),
    }
}

/// Split a registration fee into what the athlete pays and who receives what.
///
/// When processor fees are passed on, the total is grossed up so that the
/// processor's cut leaves exactly `fee + platform fee`:
/// `total = ceil((fee + platform + 30) / (1 - 0.029))`.
/// Otherwise the athlete pays `fee + platform` and the organizer absorbs
/// `round(total * 0.029) + 30`.
///
/// Free registrations produce an all-zero breakdown.
pub fn calculate_competition_fees(registration_fee_cents: i64, config: &FeeConfig) -> FeeBreakdown {
    let passed = config.pass_stripe_fees_to_customer;

    if registration_fee_cents == 0 {
        return FeeBreakdown {
            registration_fee_cents: 0,
            platform_fee_cents: 0,
            stripe_fee_cents: 0,
            total_charge_cents: 0,
            organizer_net_cents: 0,
            stripe_fees_passed_to_customer: passed,
        };
    }

    let platform_fee_cents = round_cents(
        Decimal::from(registration_fee_cents) * config.platform_fee_percent / Decimal::ONE_HUNDRED,
    );
    let subtotal = registration_fee_cents + platform_fee_cents;
    let stripe_rate = stripe_rate();

    let (total_charge_cents, stripe_fee_cents) = if passed {
        let gross = Decimal::from(subtotal + STRIPE_FIXED_CENTS) / (Decimal::ONE - stripe_rate);
        let total = gross.ceil().to_i64().unwrap_or(subtotal);
        (total, total - subtotal)
    } else {
        let stripe_fee = round_cents(Decimal::from(subtotal) * stripe_rate) + STRIPE_FIXED_CENTS;
        (subtotal, stripe_fee)
    };

    let mut organizer_net_cents = registration_fee_cents - platform_fee_cents;
    if !passed {
        organizer_net_cents -= stripe_fee_cents;
    }

    FeeBreakdown {
        registration_fee_cents,
        platform_fee_cents,
        stripe_fee_cents,
        total_charge_cents,
        organizer_net_cents: organizer_net_cents.max(0),
        stripe_fees_passed_to_customer: passed,
    }
}

fn stripe_rate() -> Decimal {
    Decimal::new(STRIPE_PERCENTAGE_BASIS_POINTS, 4)
}

fn round_cents(amount: Decimal) -> i64 {
    amount
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

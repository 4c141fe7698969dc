use std::collections::HashMap;

use uuid::Uuid;

use crate::dto::fees::{DivisionRevenue, RevenueStats};
use crate::models::CommercePurchase;

const UNKNOWN_DIVISION_LABEL: &str = "Unknown";

/// Roll completed purchases up into competition totals and per-division rows.
///
/// Division rows appear in the order their first purchase does.
pub fn summarize_revenue(
    purchases: &[CommercePurchase],
    division_labels: &HashMap<Uuid, String>,
    division_fees: &HashMap<Uuid, i64>,
    default_fee_cents: i64,
) -> RevenueStats {
    let mut stats = RevenueStats {
        total_gross_cents: 0,
        total_platform_fee_cents: 0,
        total_stripe_fee_cents: 0,
        total_organizer_net_cents: 0,
        purchase_count: 0,
        by_division: Vec::new(),
    };
    let mut row_index: HashMap<Option<Uuid>, usize> = HashMap::new();

    for purchase in purchases {
        stats.total_gross_cents += purchase.total_cents;
        stats.total_platform_fee_cents += purchase.platform_fee_cents;
        stats.total_stripe_fee_cents += purchase.stripe_fee_cents;
        stats.total_organizer_net_cents += purchase.organizer_net_cents;
        stats.purchase_count += 1;

        let index = *row_index.entry(purchase.division_id).or_insert_with(|| {
            stats.by_division.push(empty_row(
                purchase.division_id,
                division_labels,
                division_fees,
                default_fee_cents,
            ));
            stats.by_division.len() - 1
        });

        let row = &mut stats.by_division[index];
        row.purchase_count += 1;
        row.gross_cents += purchase.total_cents;
        row.platform_fee_cents += purchase.platform_fee_cents;
        row.stripe_fee_cents += purchase.stripe_fee_cents;
        row.organizer_net_cents += purchase.organizer_net_cents;
    }

    stats
}

fn empty_row(
    division_id: Option<Uuid>,
    division_labels: &HashMap<Uuid, String>,
    division_fees: &HashMap<Uuid, i64>,
    default_fee_cents: i64,
) -> DivisionRevenue {
    let division_label = division_id
        .and_then(|id| division_labels.get(&id).cloned())
        .unwrap_or_else(|| UNKNOWN_DIVISION_LABEL.to_string());
    let registration_fee_cents = division_id
        .and_then(|id| division_fees.get(&id).copied())
        .unwrap_or(default_fee_cents);

    DivisionRevenue {
        division_id,
        division_label,
        purchase_count: 0,
        registration_fee_cents,
        gross_cents: 0,
        platform_fee_cents: 0,
        stripe_fee_cents: 0,
        organizer_net_cents: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PURCHASE_STATUS_COMPLETED;

    fn purchase(division_id: Option<Uuid>, total: i64, platform: i64, stripe: i64) -> CommercePurchase {
        CommercePurchase {
            purchase_id: Uuid::new_v4(),
            competition_id: Uuid::nil(),
            division_id,
            status: PURCHASE_STATUS_COMPLETED.to_string(),
            total_cents: total,
            platform_fee_cents: platform,
            stripe_fee_cents: stripe,
            organizer_net_cents: total - platform - stripe,
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_no_purchases() {
        let stats = summarize_revenue(&[], &HashMap::new(), &HashMap::new(), 0);
        assert_eq!(stats.purchase_count, 0);
        assert_eq!(stats.total_gross_cents, 0);
        assert!(stats.by_division.is_empty());
    }

    #[test]
    fn test_groups_by_division_in_first_seen_order() {
        let rx = Uuid::new_v4();
        let scaled = Uuid::new_v4();
        let labels = HashMap::from([(rx, "Rx".to_string()), (scaled, "Scaled".to_string())]);
        let fees = HashMap::from([(rx, 7500)]);

        let purchases = vec![
            purchase(Some(scaled), 5309, 125, 184),
            purchase(Some(rx), 7900, 188, 262),
            purchase(Some(scaled), 5309, 125, 184),
            purchase(None, 1000, 25, 60),
        ];

        let stats = summarize_revenue(&purchases, &labels, &fees, 5000);

        assert_eq!(stats.purchase_count, 4);
        assert_eq!(stats.total_gross_cents, 5309 * 2 + 7900 + 1000);

        let labels: Vec<&str> = stats
            .by_division
            .iter()
            .map(|row| row.division_label.as_str())
            .collect();
        assert_eq!(labels, vec!["Scaled", "Rx", "Unknown"]);

        assert_eq!(stats.by_division[0].purchase_count, 2);
        assert_eq!(stats.by_division[0].registration_fee_cents, 5000);
        assert_eq!(stats.by_division[1].registration_fee_cents, 7500);
        assert_eq!(stats.by_division[2].division_id, None);
    }

    #[test]
    fn test_totals_match_division_rows() {
        let rx = Uuid::new_v4();
        let purchases = vec![
            purchase(Some(rx), 5309, 125, 184),
            purchase(None, 2000, 50, 88),
        ];

        let stats = summarize_revenue(&purchases, &HashMap::new(), &HashMap::new(), 0);

        let gross: i64 = stats.by_division.iter().map(|r| r.gross_cents).sum();
        let net: i64 = stats.by_division.iter().map(|r| r.organizer_net_cents).sum();
        assert_eq!(gross, stats.total_gross_cents);
        assert_eq!(net, stats.total_organizer_net_cents);
    }
}

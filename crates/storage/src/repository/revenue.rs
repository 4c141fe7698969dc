use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{CommercePurchase, CompetitionDivision, Division, PURCHASE_STATUS_COMPLETED};

pub struct RevenueRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> RevenueRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Completed purchases of a competition, oldest first
    pub async fn completed_purchases(&self, competition_id: Uuid) -> Result<Vec<CommercePurchase>> {
        let purchases = sqlx::query_as::<_, CommercePurchase>(
            r#"
            SELECT purchase_id, competition_id, division_id, status, total_cents,
                   platform_fee_cents, stripe_fee_cents, organizer_net_cents, created_at
            FROM commerce_purchases
            WHERE competition_id = $1 AND status = $2
            ORDER BY created_at, purchase_id
            "#,
        )
        .bind(competition_id)
        .bind(PURCHASE_STATUS_COMPLETED)
        .fetch_all(self.pool)
        .await?;

        Ok(purchases)
    }

    pub async fn division_labels(&self, division_ids: &[Uuid]) -> Result<HashMap<Uuid, String>> {
        if division_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let divisions = sqlx::query_as::<_, Division>(
            r#"
            SELECT division_id, label, position
            FROM divisions
            WHERE division_id = ANY($1)
            "#,
        )
        .bind(division_ids)
        .fetch_all(self.pool)
        .await?;

        Ok(divisions
            .into_iter()
            .map(|d| (d.division_id, d.label))
            .collect())
    }

    /// Division-specific prices configured for a competition
    pub async fn division_fees(&self, competition_id: Uuid) -> Result<HashMap<Uuid, i64>> {
        let prices = sqlx::query_as::<_, CompetitionDivision>(
            r#"
            SELECT competition_id, division_id, fee_cents
            FROM competition_divisions
            WHERE competition_id = $1
            "#,
        )
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        Ok(prices
            .into_iter()
            .map(|p| (p.division_id, p.fee_cents))
            .collect())
    }
}

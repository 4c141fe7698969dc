use sqlx::PgPool;
use storage::{
    dto::fees::{CalculateFeesRequest, FeeBreakdown, RevenueStats},
    error::Result,
    repository::{CompetitionRepository, RevenueRepository},
    services::{
        fee_calculator::{build_fee_config, calculate_competition_fees},
        revenue::summarize_revenue,
    },
};
use uuid::Uuid;

/// Fee quote for an arbitrary fee and configuration
pub fn quote_fees(request: &CalculateFeesRequest) -> FeeBreakdown {
    calculate_competition_fees(request.registration_fee_cents, &request.fee_config())
}

/// What an athlete pays to register for one division of a competition
pub async fn division_fee_breakdown(
    pool: &PgPool,
    slug: &str,
    division_id: Uuid,
) -> Result<FeeBreakdown> {
    let repo = CompetitionRepository::new(pool);
    let competition = repo.find_by_slug(slug).await?;
    let fee_cents = repo
        .get_registration_fee(competition.competition_id, division_id)
        .await?;

    Ok(calculate_competition_fees(
        fee_cents,
        &build_fee_config(&competition),
    ))
}

/// Revenue totals of a competition from its completed purchases
pub async fn revenue_stats(pool: &PgPool, slug: &str) -> Result<RevenueStats> {
    let competition = CompetitionRepository::new(pool).find_by_slug(slug).await?;

    let repo = RevenueRepository::new(pool);
    let purchases = repo.completed_purchases(competition.competition_id).await?;

    let mut division_ids: Vec<Uuid> = purchases.iter().filter_map(|p| p.division_id).collect();
    division_ids.sort_unstable();
    division_ids.dedup();

    let labels = repo.division_labels(&division_ids).await?;
    let fees = repo.division_fees(competition.competition_id).await?;

    tracing::debug!(
        slug = %competition.slug,
        purchases = purchases.len(),
        "Summarizing revenue"
    );

    Ok(summarize_revenue(
        &purchases,
        &labels,
        &fees,
        competition.default_registration_fee_cents.unwrap_or(0),
    ))
}

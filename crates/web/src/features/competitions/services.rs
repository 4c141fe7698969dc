use sqlx::PgPool;
use storage::{
    dto::competition::{CompetitionResponse, CreateCompetitionRequest, UpdateCompetitionRequest},
    repository::CompetitionRepository,
};

use crate::error::{WebError, WebResult};

/// Competitions, latest start date first
pub async fn list_competitions(pool: &PgPool) -> WebResult<Vec<CompetitionResponse>> {
    let competitions = CompetitionRepository::new(pool).list().await?;

    Ok(competitions.into_iter().map(Into::into).collect())
}

pub async fn competition_by_slug(pool: &PgPool, slug: &str) -> WebResult<CompetitionResponse> {
    let competition = CompetitionRepository::new(pool).find_by_slug(slug).await?;

    Ok(competition.into())
}

/// Open a competition with its default registration pricing
pub async fn create_competition(
    pool: &PgPool,
    request: &CreateCompetitionRequest,
) -> WebResult<CompetitionResponse> {
    request
        .validate_dates()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let competition = CompetitionRepository::new(pool).create(request).await?;

    tracing::info!(
        slug = %competition.slug,
        timezone = %competition.timezone,
        "Competition created"
    );
    Ok(competition.into())
}

/// Apply a partial update; the resulting date range must stay valid
pub async fn update_competition(
    pool: &PgPool,
    slug: &str,
    request: &UpdateCompetitionRequest,
) -> WebResult<CompetitionResponse> {
    let repo = CompetitionRepository::new(pool);
    let existing = repo.find_by_slug(slug).await?;

    request
        .validate_dates_against(&existing)
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let updated = repo.update(&existing, request).await?;

    tracing::info!(%slug, new_slug = %updated.slug, "Competition updated");
    Ok(updated.into())
}

/// Removes the competition with its events, heats, registrations and scores
pub async fn delete_competition(pool: &PgPool, slug: &str) -> WebResult<()> {
    let repo = CompetitionRepository::new(pool);
    let competition = repo.find_by_slug(slug).await?;
    repo.delete(competition.competition_id).await?;

    tracing::info!(%slug, "Competition deleted");
    Ok(())
}

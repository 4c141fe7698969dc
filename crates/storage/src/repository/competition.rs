use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::competition::{CreateCompetitionRequest, UpdateCompetitionRequest};
use crate::error::{Result, StorageError};
use crate::models::Competition;

/// Repository for Competition database operations
pub struct CompetitionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompetitionRepository<'a> {
    /// Create a new CompetitionRepository
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all competitions
    pub async fn list(&self) -> Result<Vec<Competition>> {
        let competitions = sqlx::query_as::<_, Competition>(
            r#"
            SELECT competition_id, name, created_at, slug, status, timezone, start_date, end_date,
                   default_registration_fee_cents, platform_fee_percent, pass_stripe_fees_to_customer
            FROM competitions
            ORDER BY start_date DESC, created_at DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(competitions)
    }

    /// Get a competition by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(
            r#"
            SELECT competition_id, name, created_at, slug, status, timezone, start_date, end_date,
                   default_registration_fee_cents, platform_fee_percent, pass_stripe_fees_to_customer
            FROM competitions
            WHERE competition_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(competition)
    }

    /// Get a competition by slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(
            r#"
            SELECT competition_id, name, created_at, slug, status, timezone, start_date, end_date,
                   default_registration_fee_cents, platform_fee_percent, pass_stripe_fees_to_customer
            FROM competitions
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(competition)
    }

    /// Create a new competition
    pub async fn create(&self, req: &CreateCompetitionRequest) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(
            r#"
            INSERT INTO competitions (
                name, slug, status, timezone, start_date, end_date,
                default_registration_fee_cents, platform_fee_percent, pass_stripe_fees_to_customer
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING competition_id, name, created_at, slug, status, timezone, start_date, end_date,
                      default_registration_fee_cents, platform_fee_percent, pass_stripe_fees_to_customer
            "#,
        )
        .bind(&req.name)
        .bind(&req.slug)
        .bind(&req.status)
        .bind(&req.timezone)
        .bind(req.start_date)
        .bind(req.end_date)
        .bind(req.default_registration_fee_cents)
        .bind(req.platform_fee_percent)
        .bind(req.pass_stripe_fees_to_customer)
        .fetch_one(self.pool)
        .await
        .map_err(slug_conflict)?;

        Ok(competition)
    }

    /// Update an existing competition, keeping every field the request leaves out
    pub async fn update(
        &self,
        existing: &Competition,
        req: &UpdateCompetitionRequest,
    ) -> Result<Competition> {
        let competition = sqlx::query_as::<_, Competition>(
            r#"
            UPDATE competitions
            SET
                name = $2,
                slug = $3,
                status = $4,
                timezone = $5,
                start_date = $6,
                end_date = $7,
                default_registration_fee_cents = $8,
                platform_fee_percent = $9,
                pass_stripe_fees_to_customer = $10
            WHERE competition_id = $1
            RETURNING competition_id, name, created_at, slug, status, timezone, start_date, end_date,
                      default_registration_fee_cents, platform_fee_percent, pass_stripe_fees_to_customer
            "#,
        )
        .bind(existing.competition_id)
        .bind(req.name.as_ref().unwrap_or(&existing.name))
        .bind(req.slug.as_ref().unwrap_or(&existing.slug))
        .bind(req.status.as_ref().unwrap_or(&existing.status))
        .bind(req.timezone.as_ref().unwrap_or(&existing.timezone))
        .bind(req.start_date.unwrap_or(existing.start_date))
        .bind(req.end_date.unwrap_or(existing.end_date))
        .bind(
            req.default_registration_fee_cents
                .or(existing.default_registration_fee_cents),
        )
        .bind(req.platform_fee_percent.or(existing.platform_fee_percent))
        .bind(
            req.pass_stripe_fees_to_customer
                .or(existing.pass_stripe_fees_to_customer),
        )
        .fetch_optional(self.pool)
        .await
        .map_err(slug_conflict)?
        .ok_or(StorageError::NotFound)?;

        Ok(competition)
    }

    /// Delete a competition by ID
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM competitions
            WHERE competition_id = $1
            "#,
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Registration price for a division.
    ///
    /// Resolution order: division-specific fee, competition default, free.
    pub async fn get_registration_fee(&self, competition_id: Uuid, division_id: Uuid) -> Result<i64> {
        let division_fee = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT fee_cents
            FROM competition_divisions
            WHERE competition_id = $1 AND division_id = $2
            "#,
        )
        .bind(competition_id)
        .bind(division_id)
        .fetch_optional(self.pool)
        .await?;

        if let Some(fee) = division_fee {
            return Ok(fee);
        }

        let competition = self.find_by_id(competition_id).await?;
        Ok(competition.default_registration_fee_cents.unwrap_or(0))
    }
}

fn slug_conflict(error: sqlx::Error) -> StorageError {
    let error = StorageError::from(error);
    if error.is_unique_violation() {
        StorageError::ConstraintViolation("Slug already exists".to_string())
    } else {
        error
    }
}

use sqlx::{FromRow, PgPool, QueryBuilder};
use uuid::Uuid;

use crate::dto::common::{Cursor, PaginationDirection};
use crate::dto::scores::{LeaderboardEntry, LeaderboardFilter, ScoreStatus, ScoreType};
use crate::error::{Result, StorageError};
use crate::models::Score;
use crate::services::cursor::build_cursor_where;

#[derive(FromRow)]
struct LeaderboardRow {
    score_id: Uuid,
    registration_id: Uuid,
    athlete_name: String,
    division_id: Option<Uuid>,
    division_label: Option<String>,
    aggregated_value: Option<i64>,
    attempts: Vec<i64>,
    status: String,
    sort_key: String,
}

impl From<LeaderboardRow> for LeaderboardEntry {
    fn from(row: LeaderboardRow) -> Self {
        Self {
            score_id: row.score_id,
            registration_id: row.registration_id,
            athlete_name: row.athlete_name,
            division_id: row.division_id,
            division_label: row.division_label,
            aggregated_value: row.aggregated_value,
            attempts: row.attempts,
            status: row.status,
            sort_key: row.sort_key,
        }
    }
}

/// Everything needed to store one athlete's result for an event
#[derive(Debug, Clone)]
pub struct ScoreInput<'a> {
    pub event_id: Uuid,
    pub registration_id: Uuid,
    pub attempts: &'a [i64],
    pub aggregated_value: Option<i64>,
    pub score_type: ScoreType,
    pub status: ScoreStatus,
    pub sort_key: &'a str,
}

pub struct ScoreRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScoreRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a score, replacing any previous score of the same athlete for the event
    pub async fn upsert_score(&self, input: &ScoreInput<'_>) -> Result<Score> {
        let score = sqlx::query_as::<_, Score>(
            r#"
            INSERT INTO competition_scores (
                event_id, registration_id, attempts, aggregated_value, score_type, status,
                sort_key
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (event_id, registration_id) DO UPDATE
            SET attempts = EXCLUDED.attempts,
                aggregated_value = EXCLUDED.aggregated_value,
                score_type = EXCLUDED.score_type,
                status = EXCLUDED.status,
                sort_key = EXCLUDED.sort_key
            RETURNING score_id, event_id, registration_id, attempts, aggregated_value,
                      score_type, status, sort_key, created_at
            "#,
        )
        .bind(input.event_id)
        .bind(input.registration_id)
        .bind(input.attempts)
        .bind(input.aggregated_value)
        .bind(input.score_type.as_str())
        .bind(input.status.as_str())
        .bind(input.sort_key)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let error = StorageError::from(e);
            if error.is_foreign_key_violation() {
                StorageError::ConstraintViolation(
                    "Event or registration does not exist".to_string(),
                )
            } else {
                error
            }
        })?;

        Ok(score)
    }

    /// Fetch up to `limit + 1` leaderboard rows after `cursor`, best first.
    ///
    /// Backward pages come back in ascending order; callers reverse them for display.
    /// The cursor id must be a score UUID.
    pub async fn leaderboard(
        &self,
        event_id: Uuid,
        filter: &LeaderboardFilter,
        cursor: Option<&Cursor>,
    ) -> Result<Vec<LeaderboardEntry>> {
        let mut query = QueryBuilder::new(
            r#"
            SELECT s.score_id, s.registration_id, r.athlete_name, r.division_id,
                   d.label AS division_label, s.aggregated_value, s.attempts, s.status, s.sort_key
            FROM competition_scores s
            INNER JOIN competition_registrations r ON r.registration_id = s.registration_id
            LEFT JOIN divisions d ON d.division_id = r.division_id
            WHERE s.event_id =
            "#,
        );
        query.push_bind(event_id);

        if let Some(division_id) = filter.division_id {
            query.push(" AND r.division_id = ");
            query.push_bind(division_id);
        }

        if let Some(predicate) =
            build_cursor_where("s.sort_key", "s.score_id", cursor, filter.direction)
        {
            query.push(" AND ");
            predicate.cast_id("uuid").push_to(&mut query);
        }

        let order = match filter.direction {
            PaginationDirection::Forward => "DESC",
            PaginationDirection::Backward => "ASC",
        };
        query.push(format!(
            " ORDER BY s.sort_key {order}, s.score_id {order} LIMIT "
        ));
        query.push_bind(i64::from(filter.limit) + 1);

        let rows = query
            .build_query_as::<LeaderboardRow>()
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Every score recorded for the events of a competition
    pub async fn competition_scores(&self, competition_id: Uuid) -> Result<Vec<Score>> {
        let scores = sqlx::query_as::<_, Score>(
            r#"
            SELECT s.score_id, s.event_id, s.registration_id, s.attempts, s.aggregated_value,
                   s.score_type, s.status, s.sort_key, s.created_at
            FROM competition_scores s
            INNER JOIN competition_events e ON e.event_id = s.event_id
            WHERE e.competition_id = $1
            ORDER BY s.event_id, s.sort_key DESC, s.score_id
            "#,
        )
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        Ok(scores)
    }
}

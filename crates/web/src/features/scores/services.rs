use sqlx::PgPool;
use storage::{
    dto::{
        common::{Cursor, CursorResponse, PaginationDirection, SortValue},
        scores::{
            AggregateScoresRequest, AggregationSummary, LeaderboardEntry, LeaderboardFilter,
            OverallLeaderboardEntry, OverallLeaderboardFilter, ScoreResponse, ScoreType,
            SubmitScoreRequest,
        },
    },
    error::StorageError,
    repository::{
        CompetitionRepository, RevenueRepository, ScheduleRepository, ScoreInput,
        ScoreRepository,
    },
    services::{
        cursor::{create_cursor_response, decode_cursor},
        event_points::{TraditionalConfig, build_overall_leaderboard},
        score_aggregation::{
            aggregate_values, aggregate_with_summary, effective_score_type, event_scoring,
            score_sort_key,
        },
    },
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

/// Aggregation for an ad-hoc request; an explicit score type wins over the scheme default
pub fn resolve_score_type(request: &AggregateScoresRequest) -> WebResult<ScoreType> {
    match (request.scheme, request.score_type) {
        (Some(scheme), explicit) => Ok(effective_score_type(scheme, explicit)),
        (None, Some(score_type)) => Ok(score_type),
        (None, None) => Err(WebError::BadRequest(
            "Either score_type or scheme is required".to_string(),
        )),
    }
}

pub fn aggregate(request: &AggregateScoresRequest) -> WebResult<AggregationSummary> {
    let score_type = resolve_score_type(request)?;
    Ok(aggregate_with_summary(&request.values, score_type))
}

/// Store an athlete's attempts for an event, replacing any earlier submission
pub async fn submit_score(
    pool: &PgPool,
    event_id: Uuid,
    request: &SubmitScoreRequest,
) -> WebResult<ScoreResponse> {
    let schedule = ScheduleRepository::new(pool);

    let event = schedule.find_event(event_id).await?;
    let (scheme, score_type) =
        event_scoring(&event).map_err(|e| StorageError::InvalidData(e.to_string()))?;

    let registration = schedule.find_registration(request.registration_id).await?;
    if registration.competition_id != event.competition_id {
        return Err(WebError::BadRequest(
            "Registration belongs to a different competition".to_string(),
        ));
    }

    let aggregated_value = aggregate_values(&request.attempts, score_type);
    let sort_key = if request.status.is_active() {
        score_sort_key(aggregated_value, scheme)
    } else {
        score_sort_key(None, scheme)
    };

    let score = ScoreRepository::new(pool)
        .upsert_score(&ScoreInput {
            event_id: event.event_id,
            registration_id: registration.registration_id,
            attempts: &request.attempts,
            aggregated_value,
            score_type,
            status: request.status,
            sort_key: &sort_key,
        })
        .await?;

    tracing::debug!(
        event_id = %event.event_id,
        registration_id = %registration.registration_id,
        %score_type,
        status = %request.status,
        ?aggregated_value,
        "Score recorded"
    );

    Ok(score.into())
}

/// One page of an event leaderboard, best score first.
///
/// A malformed cursor restarts from the first page.
pub async fn leaderboard(
    pool: &PgPool,
    event_id: Uuid,
    filter: &LeaderboardFilter,
) -> WebResult<CursorResponse<LeaderboardEntry>> {
    filter.validate().map_err(WebError::BadRequest)?;

    ScheduleRepository::new(pool).find_event(event_id).await?;

    let cursor = filter
        .cursor
        .as_deref()
        .and_then(decode_cursor)
        .filter(is_score_cursor);
    let rows = ScoreRepository::new(pool)
        .leaderboard(event_id, filter, cursor.as_ref())
        .await?;

    let mut page = create_cursor_response(rows, filter.limit as usize, |entry| {
        SortValue::Text(entry.sort_key.clone())
    });
    if filter.direction == PaginationDirection::Backward {
        page.items.reverse();
    }

    Ok(page)
}

/// Leaderboard cursors point at a score; anything else restarts from the first page
fn is_score_cursor(cursor: &Cursor) -> bool {
    Uuid::parse_str(&cursor.id).is_ok()
}

/// Overall standings of a competition, ranked within each division
pub async fn overall_leaderboard(
    pool: &PgPool,
    slug: &str,
    filter: &OverallLeaderboardFilter,
) -> WebResult<Vec<OverallLeaderboardEntry>> {
    let competition = CompetitionRepository::new(pool).find_by_slug(slug).await?;
    let schedule = ScheduleRepository::new(pool);

    let events = schedule.list_events(competition.competition_id).await?;
    let mut registrations = schedule
        .list_registrations(competition.competition_id)
        .await?;
    if let Some(division_id) = filter.division_id {
        registrations.retain(|r| r.division_id == Some(division_id));
    }

    let scores = ScoreRepository::new(pool)
        .competition_scores(competition.competition_id)
        .await?;

    let mut division_ids: Vec<Uuid> = registrations
        .iter()
        .filter_map(|r| r.division_id)
        .collect();
    division_ids.sort_unstable();
    division_ids.dedup();
    let labels = RevenueRepository::new(pool)
        .division_labels(&division_ids)
        .await?;

    let leaderboard = build_overall_leaderboard(
        &events,
        &scores,
        &registrations,
        &labels,
        &TraditionalConfig::default(),
    )
    .map_err(|e| StorageError::InvalidData(e.to_string()))?;

    tracing::debug!(
        %slug,
        events = events.len(),
        athletes = leaderboard.len(),
        "Overall leaderboard computed"
    );

    Ok(leaderboard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::dto::scores::WorkoutScheme;

    fn request(
        values: Vec<i64>,
        score_type: Option<ScoreType>,
        scheme: Option<WorkoutScheme>,
    ) -> AggregateScoresRequest {
        AggregateScoresRequest {
            values,
            score_type,
            scheme,
        }
    }

    #[test]
    fn test_scheme_default_applies() {
        let req = request(vec![300, 280, 295], None, Some(WorkoutScheme::Time));
        assert_eq!(resolve_score_type(&req).unwrap(), ScoreType::Min);
        assert_eq!(aggregate(&req).unwrap().aggregated, Some(280));
    }

    #[test]
    fn test_explicit_type_overrides_scheme() {
        let req = request(vec![300, 280], Some(ScoreType::Sum), Some(WorkoutScheme::Time));
        let summary = aggregate(&req).unwrap();
        assert_eq!(summary.operation, ScoreType::Sum);
        assert_eq!(summary.aggregated, Some(580));
        assert_eq!(summary.count, 2);
    }

    #[test]
    fn test_missing_type_and_scheme_is_rejected() {
        let req = request(vec![1], None, None);
        assert!(matches!(resolve_score_type(&req), Err(WebError::BadRequest(_))));
    }

    #[test]
    fn test_cursor_must_point_at_a_score() {
        assert!(is_score_cursor(&Cursor::new(
            "09223372036854775908",
            Uuid::new_v4().to_string()
        )));
        assert!(!is_score_cursor(&Cursor::new("09223372036854775908", "score-1")));
    }
}

use chrono_tz::Tz;
use sqlx::PgPool;
use storage::{
    dto::schedule::{
        CompetitionScheduleResponse, EventScheduleResponse, GenerateHeatsRequest,
        GeneratedHeatResponse, ScheduleDay,
    },
    models::Competition,
    repository::{CompetitionRepository, NewHeat, ScheduleRepository},
    services::{
        heat_generation::{RegistrationForHeat, generate_heat_assignments, stagger_start_time},
        schedule_map::{build_schedule_map, group_heats_by_date, parse_timezone},
    },
};
use uuid::Uuid;

use crate::error::{WebError, WebResult};

/// Timezone of a competition, UTC when the stored name is not a known zone
pub fn competition_timezone(competition: &Competition) -> Tz {
    parse_timezone(&competition.timezone).unwrap_or_else(|| {
        tracing::warn!(
            slug = %competition.slug,
            timezone = %competition.timezone,
            "Unknown competition timezone, falling back to UTC"
        );
        Tz::UTC
    })
}

/// Per-event schedule summary in track order, skipping events with no timed heat
pub async fn competition_schedule(
    pool: &PgPool,
    slug: &str,
) -> WebResult<CompetitionScheduleResponse> {
    let competition = CompetitionRepository::new(pool).find_by_slug(slug).await?;
    let tz = competition_timezone(&competition);

    let events = ScheduleRepository::new(pool)
        .list_events_with_heats(competition.competition_id)
        .await?;
    let mut schedule = build_schedule_map(&events, tz);

    let events = events
        .into_iter()
        .filter_map(|event| {
            schedule
                .remove(&event.event_id)
                .map(|info| EventScheduleResponse {
                    event_id: event.event_id,
                    name: event.name,
                    schedule: info,
                })
        })
        .collect();

    Ok(CompetitionScheduleResponse {
        timezone: tz.name().to_string(),
        events,
    })
}

/// Every timed heat of a competition, bucketed by local date
pub async fn schedule_days(pool: &PgPool, slug: &str) -> WebResult<Vec<ScheduleDay>> {
    let competition = CompetitionRepository::new(pool).find_by_slug(slug).await?;
    let tz = competition_timezone(&competition);

    let heats: Vec<_> = ScheduleRepository::new(pool)
        .list_events_with_heats(competition.competition_id)
        .await?
        .into_iter()
        .flat_map(|event| event.heats)
        .collect();

    Ok(group_heats_by_date(&heats, tz))
}

/// Throw away an event's heats and rebuild them from the current registrations
pub async fn generate_heats(
    pool: &PgPool,
    event_id: Uuid,
    request: &GenerateHeatsRequest,
) -> WebResult<Vec<GeneratedHeatResponse>> {
    let repo = ScheduleRepository::new(pool);

    let event = repo.find_event(event_id).await?;
    let venue = repo.find_venue(request.venue_id).await?;
    if venue.competition_id != event.competition_id {
        return Err(WebError::BadRequest(
            "Venue belongs to a different competition".to_string(),
        ));
    }

    let registrations: Vec<RegistrationForHeat> = repo
        .list_registrations(event.competition_id)
        .await?
        .into_iter()
        .map(|r| RegistrationForHeat {
            registration_id: r.registration_id,
            division_id: r.division_id,
        })
        .collect();

    let capacity = usize::try_from(venue.lane_count).unwrap_or(0);
    let generated = generate_heat_assignments(&registrations, capacity, request.keep_divisions_pure);

    let heats: Vec<NewHeat> = generated
        .into_iter()
        .map(|heat| NewHeat {
            scheduled_time: stagger_start_time(
                request.start_time,
                heat.heat_number,
                request.heat_duration_minutes,
                request.transition_minutes,
            ),
            heat_number: heat.heat_number,
            duration_minutes: request.heat_duration_minutes,
            division_id: heat.division_id,
            registration_ids: heat.registration_ids,
        })
        .collect();

    let stored = repo
        .replace_event_heats(event.event_id, venue.venue_id, &heats)
        .await?;

    tracing::info!(
        event_id = %event.event_id,
        heats = heats.len(),
        athletes = registrations.len(),
        "Regenerated heats"
    );

    Ok(heats
        .into_iter()
        .zip(stored)
        .map(|(heat, row)| GeneratedHeatResponse {
            heat_id: row.heat_id,
            heat_number: heat.heat_number,
            scheduled_time: heat.scheduled_time,
            division_id: heat.division_id,
            registration_ids: heat.registration_ids,
        })
        .collect())
}

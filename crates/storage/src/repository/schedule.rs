use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::schedule::{DivisionRef, EventWithHeats, ScheduledHeat, VenueRef};
use crate::error::{Result, StorageError};
use crate::models::{CompetitionEvent, Heat, Registration, Venue};

#[derive(FromRow)]
struct HeatRow {
    heat_id: Uuid,
    event_id: Uuid,
    heat_number: i32,
    scheduled_time: Option<DateTime<Utc>>,
    duration_minutes: Option<i32>,
    venue_id: Option<Uuid>,
    venue_name: Option<String>,
    division_id: Option<Uuid>,
    division_label: Option<String>,
}

impl From<HeatRow> for ScheduledHeat {
    fn from(row: HeatRow) -> Self {
        Self {
            heat_id: row.heat_id,
            heat_number: row.heat_number,
            scheduled_time: row.scheduled_time,
            duration_minutes: row.duration_minutes,
            venue: row
                .venue_id
                .zip(row.venue_name)
                .map(|(venue_id, name)| VenueRef { venue_id, name }),
            division: row
                .division_id
                .zip(row.division_label)
                .map(|(division_id, label)| DivisionRef { division_id, label }),
        }
    }
}

/// A heat about to be written, with its athletes in lane order
#[derive(Debug, Clone)]
pub struct NewHeat {
    pub heat_number: i32,
    pub scheduled_time: DateTime<Utc>,
    pub duration_minutes: i32,
    pub division_id: Option<Uuid>,
    pub registration_ids: Vec<Uuid>,
}

pub struct ScheduleRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ScheduleRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_event(&self, event_id: Uuid) -> Result<CompetitionEvent> {
        let event = sqlx::query_as::<_, CompetitionEvent>(
            r#"
            SELECT event_id, competition_id, name, scheme, score_type, track_order,
                   points_multiplier
            FROM competition_events
            WHERE event_id = $1
            "#,
        )
        .bind(event_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(event)
    }

    pub async fn find_venue(&self, venue_id: Uuid) -> Result<Venue> {
        let venue = sqlx::query_as::<_, Venue>(
            r#"
            SELECT venue_id, competition_id, name, lane_count
            FROM competition_venues
            WHERE venue_id = $1
            "#,
        )
        .bind(venue_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(venue)
    }

    pub async fn find_registration(&self, registration_id: Uuid) -> Result<Registration> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            SELECT registration_id, competition_id, division_id, athlete_name, created_at
            FROM competition_registrations
            WHERE registration_id = $1
            "#,
        )
        .bind(registration_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(registration)
    }

    /// Registrations in sign-up order
    pub async fn list_registrations(&self, competition_id: Uuid) -> Result<Vec<Registration>> {
        let registrations = sqlx::query_as::<_, Registration>(
            r#"
            SELECT registration_id, competition_id, division_id, athlete_name, created_at
            FROM competition_registrations
            WHERE competition_id = $1
            ORDER BY created_at, registration_id
            "#,
        )
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        Ok(registrations)
    }

    /// Events of a competition in track order
    pub async fn list_events(&self, competition_id: Uuid) -> Result<Vec<CompetitionEvent>> {
        let events = sqlx::query_as::<_, CompetitionEvent>(
            r#"
            SELECT event_id, competition_id, name, scheme, score_type, track_order,
                   points_multiplier
            FROM competition_events
            WHERE competition_id = $1
            ORDER BY track_order, name
            "#,
        )
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        Ok(events)
    }

    /// Every event of a competition in track order, each with its heats
    pub async fn list_events_with_heats(&self, competition_id: Uuid) -> Result<Vec<EventWithHeats>> {
        let events = self.list_events(competition_id).await?;

        let rows = sqlx::query_as::<_, HeatRow>(
            r#"
            SELECT h.heat_id, h.event_id, h.heat_number, h.scheduled_time, h.duration_minutes,
                   v.venue_id, v.name AS venue_name,
                   d.division_id, d.label AS division_label
            FROM competition_heats h
            INNER JOIN competition_events e ON e.event_id = h.event_id
            LEFT JOIN competition_venues v ON v.venue_id = h.venue_id
            LEFT JOIN divisions d ON d.division_id = h.division_id
            WHERE e.competition_id = $1
            ORDER BY h.event_id, h.heat_number
            "#,
        )
        .bind(competition_id)
        .fetch_all(self.pool)
        .await?;

        let mut with_heats: Vec<EventWithHeats> = events
            .into_iter()
            .map(|event| EventWithHeats {
                event_id: event.event_id,
                name: event.name,
                heats: Vec::new(),
            })
            .collect();

        for row in rows {
            if let Some(event) = with_heats.iter_mut().find(|e| e.event_id == row.event_id) {
                event.heats.push(row.into());
            }
        }

        Ok(with_heats)
    }

    /// Replace all heats of an event in one transaction, returning the stored heats
    pub async fn replace_event_heats(
        &self,
        event_id: Uuid,
        venue_id: Uuid,
        heats: &[NewHeat],
    ) -> Result<Vec<Heat>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM competition_heats WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        let mut stored = Vec::with_capacity(heats.len());
        for heat in heats {
            let row = sqlx::query_as::<_, Heat>(
                r#"
                INSERT INTO competition_heats (
                    event_id, heat_number, scheduled_time, duration_minutes, venue_id, division_id
                )
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING heat_id, event_id, heat_number, scheduled_time, duration_minutes,
                          venue_id, division_id
                "#,
            )
            .bind(event_id)
            .bind(heat.heat_number)
            .bind(heat.scheduled_time)
            .bind(heat.duration_minutes)
            .bind(venue_id)
            .bind(heat.division_id)
            .fetch_one(&mut *tx)
            .await?;

            for (lane, registration_id) in heat.registration_ids.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO heat_assignments (heat_id, registration_id, lane_number)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(row.heat_id)
                .bind(registration_id)
                .bind(lane as i32 + 1)
                .execute(&mut *tx)
                .await?;
            }

            stored.push(row);
        }

        tx.commit().await?;

        Ok(stored)
    }
}

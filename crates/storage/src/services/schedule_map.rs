use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::dto::schedule::{DivisionRef, EventWithHeats, ScheduleDay, ScheduleInfo, ScheduledHeat};

const TIME_FORMAT: &str = "%-I:%M %p";

/// Parse an IANA timezone name such as `America/Denver`
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.parse::<Tz>().ok()
}

/// Render an instant as wall-clock time in `tz`, e.g. "9:05 AM"
pub fn format_time(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format(TIME_FORMAT).to_string()
}

/// Summarize each event's timed heats. Events without a timed heat are left out.
pub fn build_schedule_map(events: &[EventWithHeats], tz: Tz) -> HashMap<Uuid, ScheduleInfo> {
    events
        .iter()
        .filter_map(|event| schedule_info(&event.heats, tz).map(|info| (event.event_id, info)))
        .collect()
}

/// Summary of a single event's heats, `None` when no heat has a scheduled time
pub fn schedule_info(heats: &[ScheduledHeat], tz: Tz) -> Option<ScheduleInfo> {
    let timed = sorted_timed_heats(heats);

    let (first_time, _) = timed.first()?;
    let (last_time, last_heat) = timed.last()?;

    let end_time = last_heat
        .duration_minutes
        .map(|minutes| format_time(*last_time + Duration::minutes(i64::from(minutes)), tz));

    let mut seen_venues = HashSet::new();
    let venue_names: Vec<&str> = timed
        .iter()
        .filter_map(|(_, heat)| heat.venue.as_ref())
        .map(|venue| venue.name.as_str())
        .filter(|name| seen_venues.insert(*name))
        .collect();

    let mut seen_divisions = HashSet::new();
    let divisions: Vec<DivisionRef> = timed
        .iter()
        .filter_map(|(_, heat)| heat.division.as_ref())
        .filter(|division| seen_divisions.insert(division.division_id))
        .cloned()
        .collect();

    Some(ScheduleInfo {
        start_time: format_time(*first_time, tz),
        end_time,
        heat_count: timed.len(),
        venue_name: (!venue_names.is_empty()).then(|| venue_names.join(", ")),
        divisions,
    })
}

/// Bucket timed heats by their local calendar date in `tz`
pub fn group_heats_by_date(heats: &[ScheduledHeat], tz: Tz) -> Vec<ScheduleDay> {
    let mut days: BTreeMap<NaiveDate, Vec<ScheduledHeat>> = BTreeMap::new();

    for (time, heat) in sorted_timed_heats(heats) {
        let date = time.with_timezone(&tz).date_naive();
        days.entry(date).or_default().push(heat.clone());
    }

    days.into_iter()
        .map(|(date, heats)| ScheduleDay { date, heats })
        .collect()
}

fn sorted_timed_heats(heats: &[ScheduledHeat]) -> Vec<(DateTime<Utc>, &ScheduledHeat)> {
    let mut timed: Vec<_> = heats
        .iter()
        .filter_map(|heat| heat.scheduled_time.map(|time| (time, heat)))
        .collect();
    timed.sort_by_key(|(time, _)| *time);
    timed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::schedule::VenueRef;
    use chrono::TimeZone;
    use chrono_tz::America::New_York;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, minute, 0).unwrap()
    }

    fn heat(
        number: i32,
        time: Option<DateTime<Utc>>,
        duration: Option<i32>,
        venue: Option<&VenueRef>,
        division: Option<&DivisionRef>,
    ) -> ScheduledHeat {
        ScheduledHeat {
            heat_id: Uuid::new_v4(),
            heat_number: number,
            scheduled_time: time,
            duration_minutes: duration,
            venue: venue.cloned(),
            division: division.cloned(),
        }
    }

    fn venue(name: &str) -> VenueRef {
        VenueRef {
            venue_id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }

    fn division(label: &str) -> DivisionRef {
        DivisionRef {
            division_id: Uuid::new_v4(),
            label: label.to_string(),
        }
    }

    fn event(heats: Vec<ScheduledHeat>) -> EventWithHeats {
        EventWithHeats {
            event_id: Uuid::new_v4(),
            name: "Event".to_string(),
            heats,
        }
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(parse_timezone("America/New_York"), Some(New_York));
        assert_eq!(parse_timezone("Mars/Olympus_Mons"), None);
    }

    #[test]
    fn test_start_and_end_in_timezone() {
        let main = venue("Main Floor");
        let rx = division("Rx");
        let e = event(vec![
            heat(2, Some(at(15, 30)), Some(12), Some(&main), Some(&rx)),
            heat(1, Some(at(14, 0)), Some(12), Some(&main), Some(&rx)),
        ]);

        let map = build_schedule_map(std::slice::from_ref(&e), New_York);
        let info = &map[&e.event_id];

        assert_eq!(info.start_time, "9:00 AM");
        assert_eq!(info.end_time.as_deref(), Some("10:42 AM"));
        assert_eq!(info.heat_count, 2);
        assert_eq!(info.venue_name.as_deref(), Some("Main Floor"));
        assert_eq!(info.divisions, vec![rx]);
    }

    #[test]
    fn test_end_time_missing_without_duration() {
        let e = event(vec![
            heat(1, Some(at(14, 0)), Some(10), None, None),
            heat(2, Some(at(18, 5)), None, None, None),
        ]);

        let info = schedule_info(&e.heats, New_York).unwrap();
        assert_eq!(info.start_time, "9:00 AM");
        assert_eq!(info.end_time, None);
        assert_eq!(info.venue_name, None);
        assert!(info.divisions.is_empty());
    }

    #[test]
    fn test_events_without_timed_heats_are_omitted() {
        let untimed = event(vec![heat(1, None, Some(10), None, None)]);
        let empty = event(vec![]);
        let timed = event(vec![heat(1, Some(at(14, 0)), None, None, None)]);

        let map = build_schedule_map(&[untimed.clone(), empty.clone(), timed.clone()], New_York);

        assert_eq!(map.len(), 1);
        assert!(map.contains_key(&timed.event_id));
        assert!(!map.contains_key(&untimed.event_id));
        assert!(!map.contains_key(&empty.event_id));
    }

    #[test]
    fn test_untimed_heats_do_not_contribute() {
        let outside = venue("Outside");
        let e = event(vec![
            heat(1, Some(at(14, 0)), Some(10), None, None),
            heat(2, None, Some(10), Some(&outside), None),
        ]);

        let info = schedule_info(&e.heats, New_York).unwrap();
        assert_eq!(info.heat_count, 1);
        assert_eq!(info.venue_name, None);
    }

    #[test]
    fn test_venues_joined_once_each() {
        let main = venue("Main Floor");
        let outside = venue("Outside");
        let e = event(vec![
            heat(1, Some(at(14, 0)), Some(10), Some(&main), None),
            heat(2, Some(at(14, 15)), Some(10), Some(&outside), None),
            heat(3, Some(at(14, 30)), Some(10), Some(&main), None),
        ]);

        let info = schedule_info(&e.heats, New_York).unwrap();
        assert_eq!(info.venue_name.as_deref(), Some("Main Floor, Outside"));
    }

    #[test]
    fn test_divisions_deduplicated_in_heat_order() {
        let rx = division("Rx");
        let scaled = division("Scaled");
        let e = event(vec![
            heat(3, Some(at(15, 0)), Some(10), None, Some(&rx)),
            heat(1, Some(at(14, 0)), Some(10), None, Some(&scaled)),
            heat(2, Some(at(14, 30)), Some(10), None, Some(&rx)),
        ]);

        let info = schedule_info(&e.heats, New_York).unwrap();
        assert_eq!(info.divisions, vec![scaled, rx]);
    }

    #[test]
    fn test_group_by_local_date() {
        // 03:00 UTC on March 2nd is still March 1st in New York
        let late = Utc.with_ymd_and_hms(2025, 3, 2, 3, 0, 0).unwrap();
        let next_morning = Utc.with_ymd_and_hms(2025, 3, 2, 14, 0, 0).unwrap();
        let heats = vec![
            heat(3, Some(next_morning), Some(10), None, None),
            heat(2, Some(late), Some(10), None, None),
            heat(1, Some(at(14, 0)), Some(10), None, None),
            heat(4, None, Some(10), None, None),
        ];

        let days = group_heats_by_date(&heats, New_York);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        let first_day: Vec<i32> = days[0].heats.iter().map(|h| h.heat_number).collect();
        assert_eq!(first_day, vec![1, 2]);
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
        assert_eq!(days[1].heats.len(), 1);
    }
}

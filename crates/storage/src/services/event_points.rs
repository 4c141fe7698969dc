use std::cmp::Ordering;
use std::collections::HashMap;

use uuid::Uuid;

use crate::dto::scores::{
    EventResult, OverallLeaderboardEntry, ParseEnumError, ScoreStatus, WorkoutScheme,
};
use crate::models::{CompetitionEvent, Registration, Score};
use crate::services::score_aggregation::score_sort_key;

/// Points awarded by placement: first place gets `first_place_points`, each
/// following place `step` fewer, never below zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraditionalConfig {
    pub first_place_points: i64,
    pub step: i64,
}

impl Default for TraditionalConfig {
    fn default() -> Self {
        Self {
            first_place_points: 100,
            step: 5,
        }
    }
}

/// What happens to an athlete without a ranked result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusHandling {
    /// Placed right after the last ranked athlete and scored for that place
    LastPlace,
    /// Placed right after the last ranked athlete with no points
    Zero,
    /// Left out of the event results
    Exclude,
}

impl StatusHandling {
    pub fn for_status(status: ScoreStatus) -> Option<Self> {
        match status {
            ScoreStatus::Scored | ScoreStatus::Cap => None,
            ScoreStatus::Dnf => Some(Self::LastPlace),
            ScoreStatus::Dns => Some(Self::Zero),
            ScoreStatus::Withdrawn => Some(Self::Exclude),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventScoreInput {
    pub registration_id: Uuid,
    pub value: Option<i64>,
    pub status: ScoreStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventPlacement {
    pub registration_id: Uuid,
    pub rank: u32,
    pub points: i64,
}

pub fn traditional_points(rank: u32, config: &TraditionalConfig) -> i64 {
    let behind = i64::from(rank.saturating_sub(1));
    (config.first_place_points - behind * config.step).max(0)
}

/// Apply a percentage multiplier, rounding half up
pub fn apply_multiplier(points: i64, multiplier_percent: i32) -> i64 {
    (points * i64::from(multiplier_percent) + 50).div_euclid(100)
}

/// Rank one event's scores and award traditional points.
///
/// Equal performances share a rank and the next distinct one skips ahead
/// (1, 1, 3). On a capped time event every capped athlete ranks after every
/// finisher. Ranked athletes come first in the result, best first.
pub fn calculate_event_points(
    scores: &[EventScoreInput],
    scheme: WorkoutScheme,
    config: &TraditionalConfig,
) -> Vec<EventPlacement> {
    let (active, inactive): (Vec<_>, Vec<_>) =
        scores.iter().partition(|score| score.status.is_active());

    let mut ranked: Vec<(&EventScoreInput, String)> = active
        .into_iter()
        .map(|score| (score, score_sort_key(score.value, scheme)))
        .collect();
    ranked.sort_by(|(a, a_key), (b, b_key)| {
        cap_order(a, b, scheme).then_with(|| b_key.cmp(a_key))
    });

    let mut placements = Vec::with_capacity(scores.len());
    let mut previous: Option<(&EventScoreInput, &str, u32)> = None;
    for (index, (score, key)) in ranked.iter().enumerate() {
        let rank = match previous {
            Some((prev, prev_key, prev_rank))
                if prev_key == key.as_str() && cap_order(prev, score, scheme).is_eq() =>
            {
                prev_rank
            }
            _ => index as u32 + 1,
        };
        previous = Some((*score, key.as_str(), rank));

        placements.push(EventPlacement {
            registration_id: score.registration_id,
            rank,
            points: traditional_points(rank, config),
        });
    }

    let after_last = previous.map_or(0, |(_, _, rank)| rank) + 1;
    for score in inactive {
        let points = match StatusHandling::for_status(score.status) {
            Some(StatusHandling::LastPlace) => traditional_points(after_last, config),
            Some(StatusHandling::Zero) => 0,
            Some(StatusHandling::Exclude) | None => continue,
        };
        placements.push(EventPlacement {
            registration_id: score.registration_id,
            rank: after_last,
            points,
        });
    }

    placements
}

fn cap_order(a: &EventScoreInput, b: &EventScoreInput, scheme: WorkoutScheme) -> Ordering {
    if scheme != WorkoutScheme::TimeWithCap {
        return Ordering::Equal;
    }
    (a.status == ScoreStatus::Cap).cmp(&(b.status == ScoreStatus::Cap))
}

/// Countback: more first places wins, then more second places, and so on
pub fn countback(a: &[u32], b: &[u32]) -> Ordering {
    let worst = a.iter().chain(b).copied().max().unwrap_or(0);
    for place in 1..=worst {
        let a_count = a.iter().filter(|rank| **rank == place).count();
        let b_count = b.iter().filter(|rank| **rank == place).count();
        if a_count != b_count {
            return b_count.cmp(&a_count);
        }
    }
    Ordering::Equal
}

/// Build the overall leaderboard of a competition.
///
/// Events are ranked separately for each division and the multiplied event
/// points summed per athlete. Athletes are ranked within their division by
/// total points, ties broken by countback, and listed division by division in
/// order of first registration.
pub fn build_overall_leaderboard(
    events: &[CompetitionEvent],
    scores: &[Score],
    registrations: &[Registration],
    division_labels: &HashMap<Uuid, String>,
    config: &TraditionalConfig,
) -> Result<Vec<OverallLeaderboardEntry>, ParseEnumError> {
    let mut division_order: Vec<Option<Uuid>> = Vec::new();
    let mut by_division: HashMap<Option<Uuid>, Vec<&Registration>> = HashMap::new();
    for registration in registrations {
        by_division
            .entry(registration.division_id)
            .or_insert_with(|| {
                division_order.push(registration.division_id);
                Vec::new()
            })
            .push(registration);
    }

    let mut statuses: HashMap<(Uuid, Uuid), (Option<i64>, ScoreStatus)> = HashMap::new();
    for score in scores {
        statuses.insert(
            (score.event_id, score.registration_id),
            (score.aggregated_value, score.status.parse::<ScoreStatus>()?),
        );
    }

    let mut leaderboard = Vec::with_capacity(registrations.len());
    for division_id in division_order {
        let athletes = by_division.remove(&division_id).unwrap_or_default();
        let mut entries: Vec<OverallLeaderboardEntry> = athletes
            .iter()
            .map(|registration| OverallLeaderboardEntry {
                registration_id: registration.registration_id,
                athlete_name: registration.athlete_name.clone(),
                division_id,
                division_label: division_id.and_then(|id| division_labels.get(&id).cloned()),
                overall_rank: 0,
                total_points: 0,
                event_results: Vec::with_capacity(events.len()),
            })
            .collect();

        for event in events {
            let scheme: WorkoutScheme = event.scheme.parse()?;
            let inputs: Vec<EventScoreInput> = athletes
                .iter()
                .filter_map(|registration| {
                    statuses
                        .get(&(event.event_id, registration.registration_id))
                        .map(|(value, status)| EventScoreInput {
                            registration_id: registration.registration_id,
                            value: *value,
                            status: *status,
                        })
                })
                .collect();
            let placements = calculate_event_points(&inputs, scheme, config);

            for entry in &mut entries {
                let placement = placements
                    .iter()
                    .find(|p| p.registration_id == entry.registration_id);
                let recorded = statuses.get(&(event.event_id, entry.registration_id));
                let points = placement.map_or(0, |p| {
                    apply_multiplier(p.points, event.points_multiplier)
                });

                entry.total_points += points;
                entry.event_results.push(EventResult {
                    event_id: event.event_id,
                    event_name: event.name.clone(),
                    track_order: event.track_order,
                    rank: placement.map(|p| p.rank),
                    points,
                    aggregated_value: recorded.and_then(|(value, _)| *value),
                    status: recorded.map(|(_, status)| *status),
                });
            }
        }

        rank_division(&mut entries);
        leaderboard.extend(entries);
    }

    Ok(leaderboard)
}

fn event_ranks(entry: &OverallLeaderboardEntry) -> Vec<u32> {
    entry.event_results.iter().filter_map(|r| r.rank).collect()
}

fn rank_division(entries: &mut [OverallLeaderboardEntry]) {
    let compare = |a: &OverallLeaderboardEntry, b: &OverallLeaderboardEntry| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| countback(&event_ranks(a), &event_ranks(b)))
    };

    entries.sort_by(compare);

    for index in 0..entries.len() {
        let tied = index > 0 && compare(&entries[index - 1], &entries[index]).is_eq();
        let rank = if tied {
            entries[index - 1].overall_rank
        } else {
            index as u32 + 1
        };
        entries[index].overall_rank = rank;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(value: i64, status: ScoreStatus) -> EventScoreInput {
        EventScoreInput {
            registration_id: Uuid::new_v4(),
            value: Some(value),
            status,
        }
    }

    fn placement_of(placements: &[EventPlacement], input: &EventScoreInput) -> EventPlacement {
        *placements
            .iter()
            .find(|p| p.registration_id == input.registration_id)
            .unwrap()
    }

    #[test]
    fn test_traditional_points_step_down_from_first() {
        let config = TraditionalConfig::default();
        assert_eq!(traditional_points(1, &config), 100);
        assert_eq!(traditional_points(2, &config), 95);
        assert_eq!(traditional_points(20, &config), 5);
        assert_eq!(traditional_points(21, &config), 0);
        assert_eq!(traditional_points(40, &config), 0);
    }

    #[test]
    fn test_multiplier_rounds_half_up() {
        assert_eq!(apply_multiplier(95, 100), 95);
        assert_eq!(apply_multiplier(95, 200), 190);
        assert_eq!(apply_multiplier(95, 150), 143);
        assert_eq!(apply_multiplier(0, 300), 0);
    }

    #[test]
    fn test_time_event_ranks_fastest_first() {
        let fast = score(240_000, ScoreStatus::Scored);
        let slow = score(310_000, ScoreStatus::Scored);
        let middle = score(275_000, ScoreStatus::Scored);
        let inputs = vec![slow.clone(), fast.clone(), middle.clone()];

        let placements =
            calculate_event_points(&inputs, WorkoutScheme::Time, &TraditionalConfig::default());

        assert_eq!(placement_of(&placements, &fast).rank, 1);
        assert_eq!(placement_of(&placements, &middle).points, 95);
        assert_eq!(placement_of(&placements, &slow).rank, 3);
        assert_eq!(placements[0].registration_id, fast.registration_id);
    }

    #[test]
    fn test_ties_share_rank_and_skip_the_next() {
        let a = score(150, ScoreStatus::Scored);
        let b = score(150, ScoreStatus::Scored);
        let c = score(120, ScoreStatus::Scored);
        let inputs = vec![a.clone(), b.clone(), c.clone()];

        let placements =
            calculate_event_points(&inputs, WorkoutScheme::Reps, &TraditionalConfig::default());

        assert_eq!(placement_of(&placements, &a).rank, 1);
        assert_eq!(placement_of(&placements, &b).rank, 1);
        assert_eq!(placement_of(&placements, &b).points, 100);
        assert_eq!(placement_of(&placements, &c).rank, 3);
        assert_eq!(placement_of(&placements, &c).points, 90);
    }

    #[test]
    fn test_capped_athletes_rank_after_finishers() {
        let finisher = score(700_000, ScoreStatus::Scored);
        let capped = score(600_000, ScoreStatus::Cap);
        let inputs = vec![capped.clone(), finisher.clone()];

        let placements = calculate_event_points(
            &inputs,
            WorkoutScheme::TimeWithCap,
            &TraditionalConfig::default(),
        );

        assert_eq!(placement_of(&placements, &finisher).rank, 1);
        assert_eq!(placement_of(&placements, &capped).rank, 2);
    }

    #[test]
    fn test_inactive_statuses_follow_default_handling() {
        let first = score(200, ScoreStatus::Scored);
        let second = score(180, ScoreStatus::Scored);
        let dnf = score(0, ScoreStatus::Dnf);
        let dns = score(0, ScoreStatus::Dns);
        let withdrawn = score(0, ScoreStatus::Withdrawn);
        let inputs = vec![
            dnf.clone(),
            first.clone(),
            withdrawn.clone(),
            dns.clone(),
            second.clone(),
        ];

        let placements =
            calculate_event_points(&inputs, WorkoutScheme::Load, &TraditionalConfig::default());

        assert_eq!(placements.len(), 4);
        assert_eq!(placement_of(&placements, &dnf).rank, 3);
        assert_eq!(placement_of(&placements, &dnf).points, 90);
        assert_eq!(placement_of(&placements, &dns).rank, 3);
        assert_eq!(placement_of(&placements, &dns).points, 0);
        assert!(
            placements
                .iter()
                .all(|p| p.registration_id != withdrawn.registration_id)
        );
    }

    #[test]
    fn test_only_inactive_athletes_start_at_first_place() {
        let dnf = score(0, ScoreStatus::Dnf);
        let placements = calculate_event_points(
            std::slice::from_ref(&dnf),
            WorkoutScheme::Reps,
            &TraditionalConfig::default(),
        );
        assert_eq!(placements[0].rank, 1);
        assert_eq!(placements[0].points, 100);
    }

    #[test]
    fn test_countback_prefers_better_placements() {
        assert_eq!(countback(&[1, 3], &[2, 2]), Ordering::Less);
        assert_eq!(countback(&[2, 2], &[1, 3]), Ordering::Greater);
        assert_eq!(countback(&[1, 2], &[2, 1]), Ordering::Equal);
        assert_eq!(countback(&[], &[]), Ordering::Equal);
    }

    fn event(name: &str, scheme: &str, track_order: i32, multiplier: i32) -> CompetitionEvent {
        CompetitionEvent {
            event_id: Uuid::new_v4(),
            competition_id: Uuid::nil(),
            name: name.to_string(),
            scheme: scheme.to_string(),
            score_type: None,
            track_order,
            points_multiplier: multiplier,
        }
    }

    fn registration(name: &str, division_id: Option<Uuid>) -> Registration {
        Registration {
            registration_id: Uuid::new_v4(),
            competition_id: Uuid::nil(),
            division_id,
            athlete_name: name.to_string(),
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    fn recorded(
        event: &CompetitionEvent,
        registration: &Registration,
        value: i64,
        status: &str,
    ) -> Score {
        Score {
            score_id: Uuid::new_v4(),
            event_id: event.event_id,
            registration_id: registration.registration_id,
            attempts: vec![value],
            aggregated_value: Some(value),
            score_type: "max".to_string(),
            status: status.to_string(),
            sort_key: String::new(),
            created_at: chrono::NaiveDateTime::default(),
        }
    }

    #[test]
    fn test_overall_leaderboard_sums_weighted_points() {
        let rx = Uuid::new_v4();
        let labels = HashMap::from([(rx, "Rx".to_string())]);
        let sprint = event("Sprint", "time", 1, 100);
        let lift = event("Lift", "load", 2, 200);
        let ana = registration("Ana", Some(rx));
        let ben = registration("Ben", Some(rx));

        let scores = vec![
            recorded(&sprint, &ana, 300_000, "scored"),
            recorded(&sprint, &ben, 280_000, "scored"),
            recorded(&lift, &ana, 140, "scored"),
            recorded(&lift, &ben, 120, "scored"),
        ];

        let board = build_overall_leaderboard(
            &[sprint, lift],
            &scores,
            &[ana.clone(), ben.clone()],
            &labels,
            &TraditionalConfig::default(),
        )
        .unwrap();

        // Ana: 95 + 2 * 100, Ben: 100 + 2 * 95
        assert_eq!(board[0].registration_id, ana.registration_id);
        assert_eq!(board[0].total_points, 295);
        assert_eq!(board[0].overall_rank, 1);
        assert_eq!(board[0].division_label.as_deref(), Some("Rx"));
        assert_eq!(board[1].total_points, 290);
        assert_eq!(board[1].overall_rank, 2);
        assert_eq!(board[1].event_results[1].points, 190);
    }

    #[test]
    fn test_overall_leaderboard_ranks_each_division_separately() {
        let rx = Some(Uuid::new_v4());
        let scaled = Some(Uuid::new_v4());
        let wod = event("Event 1", "reps", 1, 100);
        let strong = registration("Strong", rx);
        let steady = registration("Steady", scaled);
        let missing = registration("Missing", scaled);

        let scores = vec![
            recorded(&wod, &strong, 150, "scored"),
            recorded(&wod, &steady, 90, "scored"),
        ];

        let board = build_overall_leaderboard(
            std::slice::from_ref(&wod),
            &scores,
            &[strong, steady.clone(), missing.clone()],
            &HashMap::new(),
            &TraditionalConfig::default(),
        )
        .unwrap();

        let ranks: Vec<u32> = board.iter().map(|e| e.overall_rank).collect();
        assert_eq!(ranks, vec![1, 1, 2]);
        assert_eq!(board[1].registration_id, steady.registration_id);
        assert_eq!(board[2].registration_id, missing.registration_id);
        assert_eq!(board[2].event_results[0].rank, None);
        assert_eq!(board[2].event_results[0].status, None);
        assert_eq!(board[2].total_points, 0);
    }

    #[test]
    fn test_overall_ties_broken_by_countback() {
        let first = event("Event 1", "reps", 1, 100);
        let second = event("Event 2", "reps", 2, 100);
        let a = registration("A", None);
        let b = registration("B", None);
        let c = registration("C", None);

        // A: 1st, 3rd  B: 2nd, 2nd  C: 3rd, 1st, all on 190 points
        let scores = vec![
            recorded(&first, &a, 30, "scored"),
            recorded(&first, &b, 20, "scored"),
            recorded(&first, &c, 10, "scored"),
            recorded(&second, &a, 10, "scored"),
            recorded(&second, &b, 20, "scored"),
            recorded(&second, &c, 30, "scored"),
        ];

        let board = build_overall_leaderboard(
            &[first, second],
            &scores,
            &[a.clone(), b.clone(), c.clone()],
            &HashMap::new(),
            &TraditionalConfig::default(),
        )
        .unwrap();

        assert!(board.iter().all(|e| e.total_points == 190));
        let order: Vec<(Uuid, u32)> = board
            .iter()
            .map(|e| (e.registration_id, e.overall_rank))
            .collect();
        assert_eq!(
            order,
            vec![
                (a.registration_id, 1),
                (c.registration_id, 1),
                (b.registration_id, 3)
            ]
        );
    }

    #[test]
    fn test_overall_leaderboard_rejects_unknown_status() {
        let wod = event("Event 1", "reps", 1, 100);
        let athlete = registration("A", None);
        let scores = vec![recorded(&wod, &athlete, 10, "dq")];

        let result = build_overall_leaderboard(
            std::slice::from_ref(&wod),
            &scores,
            &[athlete],
            &HashMap::new(),
            &TraditionalConfig::default(),
        );
        assert!(result.is_err());
    }
}

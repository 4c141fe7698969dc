use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForHeat {
    pub registration_id: Uuid,
    pub division_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedHeat {
    pub heat_number: i32,
    /// `None` for a heat mixing several divisions
    pub division_id: Option<Uuid>,
    /// Lane order follows this order
    pub registration_ids: Vec<Uuid>,
}

/// Split registrations into heats of at most `floor_capacity` athletes.
///
/// Divisions stay together and appear in the order of their first
/// registration. Unless `keep_divisions_pure` is set, the partial heat left
/// over by each division is merged with the others into mixed heats placed
/// after all full heats.
pub fn generate_heat_assignments(
    registrations: &[RegistrationForHeat],
    floor_capacity: usize,
    keep_divisions_pure: bool,
) -> Vec<GeneratedHeat> {
    if floor_capacity == 0 {
        return Vec::new();
    }

    let mut division_order: Vec<Option<Uuid>> = Vec::new();
    let mut by_division: HashMap<Option<Uuid>, Vec<Uuid>> = HashMap::new();
    for registration in registrations {
        by_division
            .entry(registration.division_id)
            .or_insert_with(|| {
                division_order.push(registration.division_id);
                Vec::new()
            })
            .push(registration.registration_id);
    }

    let mut heats = Vec::new();
    for division_id in division_order {
        let ids = by_division.remove(&division_id).unwrap_or_default();
        for chunk in ids.chunks(floor_capacity) {
            heats.push(GeneratedHeat {
                heat_number: 0,
                division_id,
                registration_ids: chunk.to_vec(),
            });
        }
    }

    if !keep_divisions_pure {
        heats = merge_partial_heats(heats, floor_capacity);
    }

    for (index, heat) in heats.iter_mut().enumerate() {
        heat.heat_number = index as i32 + 1;
    }

    heats
}

fn merge_partial_heats(heats: Vec<GeneratedHeat>, floor_capacity: usize) -> Vec<GeneratedHeat> {
    let (mut full, partial): (Vec<_>, Vec<_>) = heats
        .into_iter()
        .partition(|heat| heat.registration_ids.len() >= floor_capacity);

    let leftovers: Vec<(Uuid, Option<Uuid>)> = partial
        .into_iter()
        .flat_map(|heat| {
            let division_id = heat.division_id;
            heat.registration_ids
                .into_iter()
                .map(move |registration_id| (registration_id, division_id))
        })
        .collect();

    full.extend(leftovers.chunks(floor_capacity).map(|chunk| GeneratedHeat {
        heat_number: 0,
        division_id: shared_division(chunk),
        registration_ids: chunk.iter().map(|(id, _)| *id).collect(),
    }));

    full
}

/// The division of a merged heat, or `None` when it mixes divisions
fn shared_division(chunk: &[(Uuid, Option<Uuid>)]) -> Option<Uuid> {
    let (_, first) = chunk.first()?;
    chunk
        .iter()
        .all(|(_, division_id)| division_id == first)
        .then_some(*first)
        .flatten()
}

/// Start of heat `heat_number` (1-based) when heats run back to back with a
/// transition between them
pub fn stagger_start_time(
    first_start: DateTime<Utc>,
    heat_number: i32,
    heat_duration_minutes: i32,
    transition_minutes: i32,
) -> DateTime<Utc> {
    let slot = i64::from(heat_duration_minutes) + i64::from(transition_minutes);
    first_start + Duration::minutes(i64::from(heat_number - 1) * slot)
}

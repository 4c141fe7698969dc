use crate::dto::scores::{AggregationSummary, ParseEnumError, ScoreType, WorkoutScheme};
use crate::models::CompetitionEvent;

/// Width of a leaderboard sort key, enough for any `u64`
const SORT_KEY_WIDTH: usize = 20;

/// Collapse attempts into a single value. Returns `None` for an empty slice.
///
/// `Average` rounds half up (`[100, 101]` gives `101`).
pub fn aggregate_values(values: &[i64], score_type: ScoreType) -> Option<i64> {
    let first = *values.first()?;
    let last = *values.last()?;

    let aggregated = match score_type {
        ScoreType::Max => values.iter().copied().max().unwrap_or(first),
        ScoreType::Min => values.iter().copied().min().unwrap_or(first),
        ScoreType::Sum => values.iter().fold(0i64, |acc, v| acc.saturating_add(*v)),
        ScoreType::Average => average_half_up(values),
        ScoreType::First => first,
        ScoreType::Last => last,
    };

    Some(aggregated)
}

pub fn aggregate_with_summary(values: &[i64], score_type: ScoreType) -> AggregationSummary {
    AggregationSummary {
        aggregated: aggregate_values(values, score_type),
        operation: score_type,
        count: values.len(),
    }
}

/// An explicit score type always wins over the scheme default
pub fn effective_score_type(scheme: WorkoutScheme, explicit: Option<ScoreType>) -> ScoreType {
    explicit.unwrap_or_else(|| scheme.default_score_type())
}

/// Resolve the scheme and aggregation of a stored event, rejecting unknown strings
pub fn event_scoring(
    event: &CompetitionEvent,
) -> Result<(WorkoutScheme, ScoreType), ParseEnumError> {
    let scheme: WorkoutScheme = event.scheme.parse()?;
    let explicit = event
        .score_type
        .as_deref()
        .map(str::parse::<ScoreType>)
        .transpose()?;

    Ok((scheme, effective_score_type(scheme, explicit)))
}

/// Fixed-width key where a lexicographically greater key is a better score.
///
/// The ranking direction comes from the scheme, not the aggregation: a timed
/// event summed over attempts still ranks the smallest total first. Lower is
/// better values are inverted so every leaderboard sorts descending. Missing
/// values get the all-zero key and rank below every real score.
pub fn score_sort_key(value: Option<i64>, scheme: WorkoutScheme) -> String {
    let Some(value) = value else {
        return format!("{:0width$}", 0u64, width = SORT_KEY_WIDTH);
    };

    // flipping the sign bit keeps i64 ordering after the cast to u64
    let shifted = (value as u64) ^ (1 << 63);
    let key = if scheme.is_lower_better() {
        u64::MAX - shifted
    } else {
        shifted
    };

    // 0 is reserved for missing scores
    format!("{:0width$}", key.max(1), width = SORT_KEY_WIDTH)
}

fn average_half_up(values: &[i64]) -> i64 {
    let sum: i128 = values.iter().map(|v| i128::from(*v)).sum();
    let count = values.len() as i128;

    ((2 * sum + count).div_euclid(2 * count)) as i64
}

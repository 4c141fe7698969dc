pub mod cursor;
pub mod event_points;
pub mod fee_calculator;
pub mod heat_generation;
pub mod revenue;
pub mod schedule_map;
pub mod score_aggregation;

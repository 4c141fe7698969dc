pub mod common;
pub mod competition;
pub mod fees;
pub mod schedule;
pub mod scores;

pub mod competitions;
pub mod fees;
pub mod schedule;
pub mod scores;

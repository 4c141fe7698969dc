pub mod competition;
pub mod revenue;
pub mod schedule;
pub mod score;

pub use competition::CompetitionRepository;
pub use revenue::RevenueRepository;
pub use schedule::{NewHeat, ScheduleRepository};
pub use score::{ScoreInput, ScoreRepository};

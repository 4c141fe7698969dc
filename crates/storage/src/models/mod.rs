pub mod competition;
pub mod competition_division;
pub mod division;
pub mod event;
pub mod heat;
pub mod purchase;
pub mod registration;
pub mod score;
pub mod venue;

pub use competition::Competition;
pub use competition_division::CompetitionDivision;
pub use division::Division;
pub use event::CompetitionEvent;
pub use heat::Heat;
pub use purchase::{CommercePurchase, PURCHASE_STATUS_COMPLETED};
pub use registration::Registration;
pub use score::Score;
pub use venue::Venue;

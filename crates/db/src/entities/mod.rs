//! Database entities.

pub mod candidate;
pub mod winner_record;

pub use candidate::Entity as Candidate;
pub use winner_record::Entity as WinnerRecord;

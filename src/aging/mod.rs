//! Aging and retirement

pub mod profile;
pub mod progression;
pub mod retirement;

pub use profile::generate_aging_profile;
pub use progression::{apply_birthday, NoStaff, SportsScienceStaff, StaffSupport, StatChange};
pub use retirement::{evaluate_retirement, retirement_chance, RetirementContext, RetirementEvaluation};

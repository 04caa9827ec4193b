pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::CareerCalendar;
pub use config::{load_rules, RulesConfig};
pub use error::{CareerError, Result};
pub use types::{BoutKind, BoxerId, CareerMonth, Corner};

//! Bout resolution and its immediate consequences

pub mod aftermath;
pub mod judging;
pub mod resolution;

pub use aftermath::{post_fight_impact, PostFightImpact};
pub use judging::{decide, FightMethod, Scorecard};
pub use resolution::{resolve_fight, Competitor, FightResult, Outcome, RoundSummary};

//! Career model: boxers, rankings, titles and the orchestrator that ties them together

pub mod boxer;
pub mod division;
pub mod experience;
pub mod ledger;
pub mod orchestrator;
pub mod p4p;
pub mod rating;
pub mod roster;
pub mod sanctioning;
pub mod state;

pub use boxer::{ActivityStatus, Boxer, FightRecord, StatKind, Stats};
pub use ledger::{BoutSteps, LedgerReport, LinealTitle, OrganizationRanking, RankingLedger, TitleEvent, TitleScope, TitleTransition};
pub use orchestrator::{Career, CareerSave, DivisionChangeReport, FightRequest, MonthReport, NewBoxer, ProReadinessStatus};
pub use p4p::P4PEntry;
pub use sanctioning::SanctioningRecord;
pub use state::{CareerState, FightHistoryEntry, RankingSnapshot};

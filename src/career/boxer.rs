//! Boxer model: identity, stats, records and wear

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::core::config::{AmateurPoints, WearLimits};
use crate::core::types::{clamp_i32, BoutKind, BoxerId};
use crate::fight::resolution::Outcome;

/// The nine fight-model attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    Power,
    Speed,
    Chin,
    Stamina,
    Defense,
    RingIq,
    Footwork,
    ReachControl,
    InsideFighting,
}

impl StatKind {
    pub const ALL: [StatKind; 9] = [
        StatKind::Power,
        StatKind::Speed,
        StatKind::Chin,
        StatKind::Stamina,
        StatKind::Defense,
        StatKind::RingIq,
        StatKind::Footwork,
        StatKind::ReachControl,
        StatKind::InsideFighting,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StatKind::Power => "power",
            StatKind::Speed => "speed",
            StatKind::Chin => "chin",
            StatKind::Stamina => "stamina",
            StatKind::Defense => "defense",
            StatKind::RingIq => "ring_iq",
            StatKind::Footwork => "footwork",
            StatKind::ReachControl => "reach_control",
            StatKind::InsideFighting => "inside_fighting",
        }
    }
}

/// Bounded integer attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub power: i32,
    pub speed: i32,
    pub chin: i32,
    pub stamina: i32,
    pub defense: i32,
    pub ring_iq: i32,
    pub footwork: i32,
    pub reach_control: i32,
    pub inside_fighting: i32,
}

impl Stats {
    /// Every attribute set to the same value
    pub fn uniform(value: i32) -> Self {
        Self {
            power: value,
            speed: value,
            chin: value,
            stamina: value,
            defense: value,
            ring_iq: value,
            footwork: value,
            reach_control: value,
            inside_fighting: value,
        }
    }

    pub fn get(&self, kind: StatKind) -> i32 {
        match kind {
            StatKind::Power => self.power,
            StatKind::Speed => self.speed,
            StatKind::Chin => self.chin,
            StatKind::Stamina => self.stamina,
            StatKind::Defense => self.defense,
            StatKind::RingIq => self.ring_iq,
            StatKind::Footwork => self.footwork,
            StatKind::ReachControl => self.reach_control,
            StatKind::InsideFighting => self.inside_fighting,
        }
    }

    fn slot(&mut self, kind: StatKind) -> &mut i32 {
        match kind {
            StatKind::Power => &mut self.power,
            StatKind::Speed => &mut self.speed,
            StatKind::Chin => &mut self.chin,
            StatKind::Stamina => &mut self.stamina,
            StatKind::Defense => &mut self.defense,
            StatKind::RingIq => &mut self.ring_iq,
            StatKind::Footwork => &mut self.footwork,
            StatKind::ReachControl => &mut self.reach_control,
            StatKind::InsideFighting => &mut self.inside_fighting,
        }
    }

    /// Apply a delta, clamped to [min, max]. Returns the applied change.
    pub fn adjust(&mut self, kind: StatKind, delta: i32, min: i32, max: i32) -> i32 {
        let slot = self.slot(kind);
        let before = *slot;
        *slot = clamp_i32(before + delta, min, max);
        *slot - before
    }

    /// Weighted mean over the given weights; unknown weight sums fall back to 20
    pub fn weighted(&self, weights: &BTreeMap<StatKind, f64>) -> f64 {
        let (total, weight_sum) = weights
            .iter()
            .fold((0.0, 0.0), |(total, sum), (kind, w)| {
                (total + self.get(*kind) as f64 * w, sum + w)
            });
        if weight_sum <= 0.0 {
            return 20.0;
        }
        total / weight_sum
    }
}

/// Wins, losses, draws and stoppage wins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightRecord {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub kos: u32,
}

impl FightRecord {
    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    pub fn win_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.wins as f64 / self.total() as f64
    }

    pub fn ko_ratio(&self) -> f64 {
        if self.wins == 0 {
            return 0.0;
        }
        self.kos as f64 / self.wins as f64
    }

    pub fn record(&mut self, outcome: Outcome, stoppage: bool) {
        match outcome {
            Outcome::Win => {
                self.wins += 1;
                if stoppage {
                    self.kos += 1;
                }
            }
            Outcome::Loss => self.losses += 1,
            Outcome::Draw => self.draws += 1,
        }
    }
}

impl fmt::Display for FightRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{} ({} KO)", self.wins, self.losses, self.draws, self.kos)
    }
}

/// Per-boxer aging curve parameters, fixed at creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgingProfile {
    pub peak_age: u32,
    pub decline_onset_age: u32,
    pub decline_severity: f64,
    pub iq_growth_factor: f64,
}

impl Default for AgingProfile {
    fn default() -> Self {
        Self {
            peak_age: 28,
            decline_onset_age: 30,
            decline_severity: 1.0,
            iq_growth_factor: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum RetirementReason {
    /// Hard age cap reached
    AgeCap,
    /// Lost a monthly retirement roll
    Evaluated { chance: f64, roll: f64 },
}

/// `Active -> Retired` only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ActivityStatus {
    Active,
    Retired { age: u32, reason: RetirementReason },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boxer {
    pub id: BoxerId,
    pub name: String,
    pub age: u32,
    pub height_inches: u32,
    pub weight_lbs: u32,
    pub division: String,
    pub stage: BoutKind,
    pub status: ActivityStatus,
    pub amateur_record: FightRecord,
    pub pro_record: FightRecord,
    /// Most recent results first, capped by the retirement window
    pub recent_results: Vec<Outcome>,
    pub stats: Stats,
    pub fatigue: u32,
    pub injury_risk: u32,
    pub experience_points: u32,
    /// Circuit points toward the pro gate
    #[serde(default)]
    pub amateur_points: u32,
    pub aging: AgingProfile,
}

/// Number of recent results kept on each boxer
pub const RECENT_RESULTS_KEPT: usize = 10;

impl Boxer {
    pub fn new(id: BoxerId, name: impl Into<String>, age: u32, division: impl Into<String>, stats: Stats) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            height_inches: 70,
            weight_lbs: 147,
            division: division.into(),
            stage: BoutKind::Amateur,
            status: ActivityStatus::Active,
            amateur_record: FightRecord::default(),
            pro_record: FightRecord::default(),
            recent_results: Vec::new(),
            stats,
            fatigue: 0,
            injury_risk: 0,
            experience_points: 0,
            amateur_points: 0,
            aging: AgingProfile::default(),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.status, ActivityStatus::Active)
    }

    pub fn is_pro(&self) -> bool {
        self.stage == BoutKind::Pro
    }

    pub fn record(&self, kind: BoutKind) -> &FightRecord {
        match kind {
            BoutKind::Amateur => &self.amateur_record,
            BoutKind::Pro => &self.pro_record,
        }
    }

    pub fn total_fights(&self) -> u32 {
        self.amateur_record.total() + self.pro_record.total()
    }

    /// Record a bout result in the matching record and the recent window
    pub fn record_result(&mut self, kind: BoutKind, outcome: Outcome, stoppage: bool) {
        match kind {
            BoutKind::Amateur => self.amateur_record.record(outcome, stoppage),
            BoutKind::Pro => self.pro_record.record(outcome, stoppage),
        }
        self.recent_results.insert(0, outcome);
        self.recent_results.truncate(RECENT_RESULTS_KEPT);
    }

    pub fn award_amateur_points(&mut self, points: &AmateurPoints, outcome: Outcome, stoppage: bool) {
        self.amateur_points += match outcome {
            Outcome::Win if stoppage => points.win + points.ko_bonus,
            Outcome::Win => points.win,
            Outcome::Draw => points.draw,
            Outcome::Loss => points.loss,
        };
    }

    /// Add fatigue and injury risk, clamped to the configured maxima
    pub fn apply_wear(&mut self, fatigue: u32, injury_risk: u32, limits: &WearLimits) {
        self.fatigue = (self.fatigue + fatigue).min(limits.max_fatigue);
        self.injury_risk = (self.injury_risk + injury_risk).min(limits.max_injury_risk);
    }

    /// Monthly recovery
    pub fn recover(&mut self, limits: &WearLimits) {
        self.fatigue = self.fatigue.saturating_sub(limits.monthly_fatigue_recovery);
        self.injury_risk = self.injury_risk.saturating_sub(limits.monthly_injury_recovery);
    }
}

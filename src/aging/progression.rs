//! Birthday stat progression
//!
//! Growth applies up to the boxer's peak age. Declines are suppressed until
//! the decline onset age, then scale with severity and years past onset.
//! Ring IQ keeps growing for the whole career.

use serde::{Deserialize, Serialize};

use crate::career::boxer::{AgingProfile, Boxer, StatKind};
use crate::core::config::AgingModel;
use crate::core::types::clamp_f64;

/// Staff upgrades bought outside the engine that soften aging
pub trait StaffSupport {
    /// Multiplier on decline deltas (<= 1 softens)
    fn decline_factor(&self) -> f64 {
        1.0
    }

    /// Multiplier on ring-IQ growth (>= 1 boosts)
    fn iq_growth_factor(&self) -> f64 {
        1.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoStaff;

impl StaffSupport for NoStaff {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SportsScienceStaff {
    pub level: u32,
    pub decline_reduction_per_level: f64,
    pub iq_bonus_per_level: f64,
}

impl Default for SportsScienceStaff {
    fn default() -> Self {
        Self {
            level: 0,
            decline_reduction_per_level: 0.08,
            iq_bonus_per_level: 0.1,
        }
    }
}

impl StaffSupport for SportsScienceStaff {
    fn decline_factor(&self) -> f64 {
        clamp_f64(1.0 - self.level as f64 * self.decline_reduction_per_level, 0.55, 1.0)
    }

    fn iq_growth_factor(&self) -> f64 {
        (1.0 + self.level as f64 * self.iq_bonus_per_level).max(1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatChange {
    pub stat: StatKind,
    pub before: i32,
    pub after: i32,
}

/// Effective delta for one stat at `age`
pub fn resolve_delta(
    delta: i32,
    stat: StatKind,
    age: u32,
    profile: &AgingProfile,
    decline_acceleration_per_year: f64,
    staff: &dyn StaffSupport,
) -> i32 {
    if delta < 0 {
        if age < profile.decline_onset_age {
            return 0;
        }
        let years = (age - profile.decline_onset_age) as f64;
        let factor = profile.decline_severity * (1.0 + years * decline_acceleration_per_year) * staff.decline_factor();
        let scaled = (delta as f64 * factor).round() as i32;
        return if scaled == 0 { -1 } else { scaled };
    }
    if delta > 0 && stat == StatKind::RingIq {
        let scaled = (delta as f64 * profile.iq_growth_factor * staff.iq_growth_factor()).round() as i32;
        return scaled.max(1);
    }
    if delta > 0 && age > profile.peak_age {
        return 0;
    }
    delta
}

/// Age the boxer by one year and apply the matching bracket
pub fn apply_birthday(boxer: &mut Boxer, model: &AgingModel, staff: &dyn StaffSupport) -> Vec<StatChange> {
    boxer.age += 1;
    let age = boxer.age;
    let Some(bracket) = model
        .age_brackets
        .iter()
        .find(|b| (b.min_age..=b.max_age).contains(&age))
    else {
        return Vec::new();
    };

    let mut changes = Vec::new();
    for (stat, delta) in &bracket.stat_deltas {
        let effective = resolve_delta(*delta, *stat, age, &boxer.aging, model.decline_acceleration_per_year, staff);
        let before = boxer.stats.get(*stat);
        let applied = boxer.stats.adjust(*stat, effective, model.stat_min, model.stat_max);
        if applied != 0 {
            changes.push(StatChange {
                stat: *stat,
                before,
                after: before + applied,
            });
        }
    }
    tracing::debug!(boxer = %boxer.id, age, changes = changes.len(), "birthday progression");
    changes
}

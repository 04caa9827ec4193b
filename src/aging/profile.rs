//! Deterministic aging-profile generation
//!
//! The same identity and body metrics always produce the same profile, no
//! matter when or how often it is generated.

use fxhash::FxHasher;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

use crate::career::boxer::AgingProfile;
use crate::core::config::AgingProfileRules;
use crate::core::types::clamp_f64;

fn identity_seed(name: &str, height_inches: u32, weight_lbs: u32) -> u64 {
    let mut hasher = FxHasher::default();
    name.trim().to_lowercase().hash(&mut hasher);
    height_inches.hash(&mut hasher);
    weight_lbs.hash(&mut hasher);
    hasher.finish()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

pub fn generate_aging_profile(
    rules: &AgingProfileRules,
    name: &str,
    height_inches: u32,
    weight_lbs: u32,
) -> AgingProfile {
    let mut rng = ChaCha8Rng::seed_from_u64(identity_seed(name, height_inches, weight_lbs));

    let weight_bias = rules.heavy_weight_lbs.iter().filter(|w| weight_lbs >= **w).count() as u32;
    let frame_bias = u32::from(height_inches >= rules.tall_frame_inches);

    let peak_age = (rng.gen_range(rules.peak_age_min..=rules.peak_age_max.max(rules.peak_age_min))
        + weight_bias
        + frame_bias)
        .clamp(rules.peak_age_floor, rules.peak_age_ceiling.max(rules.peak_age_floor));
    let onset_gap = rng.gen_range(rules.onset_gap_min..=rules.onset_gap_max.max(rules.onset_gap_min));
    let decline_onset_age = (peak_age + onset_gap).clamp(peak_age, rules.onset_ceiling.max(peak_age));

    let severity = rng.gen_range(rules.severity_min..=rules.severity_max.max(rules.severity_min));
    let iq = rng.gen_range(rules.iq_factor_min..=rules.iq_factor_max.max(rules.iq_factor_min));

    AgingProfile {
        peak_age,
        decline_onset_age,
        decline_severity: round3(clamp_f64(severity, 0.7, 1.4)),
        iq_growth_factor: round3(clamp_f64(iq, 0.75, 1.35)),
    }
}

//! Monthly retirement evaluation
//!
//! `Active -> Retired` is the only transition; a retired boxer stays retired.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::career::boxer::{ActivityStatus, Boxer, RetirementReason};
use crate::core::config::RetirementModel;
use crate::core::types::{clamp_f64, BoutKind};
use crate::fight::resolution::Outcome;

/// Ledger facts that protect a boxer from retiring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetirementContext {
    pub is_lineal_champion: bool,
    pub best_rank: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementEvaluation {
    pub is_retired: bool,
    pub newly_retired: bool,
    pub forced: bool,
    pub chance: f64,
    pub roll: Option<f64>,
}

fn base_age_chance(model: &RetirementModel, age: u32) -> f64 {
    model
        .age_bands
        .iter()
        .find(|band| (band.min_age..=band.max_age).contains(&age))
        .map(|band| band.base_chance)
        .unwrap_or(0.0)
}

fn recent_loss_streak(boxer: &Boxer, window: usize) -> usize {
    boxer
        .recent_results
        .iter()
        .take(window)
        .take_while(|o| **o == Outcome::Loss)
        .count()
}

fn recent_no_win(boxer: &Boxer, window: usize) -> bool {
    let recent: Vec<_> = boxer.recent_results.iter().take(window).collect();
    !recent.is_empty() && recent.iter().all(|o| **o != Outcome::Win)
}

fn performance_modifier(boxer: &Boxer, model: &RetirementModel) -> f64 {
    let perf = &model.performance;
    let record = boxer.record(boxer.stage);
    let mut modifier = 0.0;

    if record.total() >= perf.sample_fights_min {
        let win_rate = record.win_rate();
        if win_rate < perf.win_rate_low {
            modifier += perf.mod_low;
        } else if win_rate < perf.win_rate_mid {
            modifier += perf.mod_mid;
        } else if win_rate > perf.win_rate_elite {
            modifier += perf.mod_elite;
        } else if win_rate > perf.win_rate_high {
            modifier += perf.mod_high;
        }
    }

    let streak = recent_loss_streak(boxer, perf.recent_window);
    if streak > 1 {
        modifier += perf.recent_loss_streak_step * (streak - 1) as f64;
    }
    if recent_no_win(boxer, perf.recent_window) {
        modifier += perf.recent_no_win_bonus;
    }
    if boxer.injury_risk > perf.injury_threshold {
        modifier += (boxer.injury_risk - perf.injury_threshold) as f64 * perf.injury_per_point;
    }
    if boxer.fatigue > perf.fatigue_threshold {
        modifier += (boxer.fatigue - perf.fatigue_threshold) as f64 * perf.fatigue_per_point;
    }
    modifier
}

fn protection(boxer: &Boxer, model: &RetirementModel, context: &RetirementContext) -> f64 {
    if boxer.stage != BoutKind::Pro {
        return 0.0;
    }
    let perf = &model.performance;
    let mut protection = 0.0;
    if context.is_lineal_champion {
        protection += perf.champion_protection;
    }
    if let Some(rank) = context.best_rank.filter(|r| *r <= perf.top_rank_cutoff) {
        protection += (perf.top_rank_cutoff - rank + 1) as f64 * perf.top_rank_protection_per_step;
    }
    if boxer.pro_record.total() <= perf.early_career_fights && boxer.age < perf.early_career_age_limit {
        protection += perf.early_career_protection;
    }
    protection
}

/// Probability that the boxer retires this month
pub fn retirement_chance(boxer: &Boxer, model: &RetirementModel, context: &RetirementContext) -> f64 {
    if !boxer.is_active() || boxer.age >= model.hard_age_cap {
        return 1.0;
    }
    if boxer.age < model.min_age {
        return 0.0;
    }
    let past_peak = boxer.age.saturating_sub(boxer.aging.peak_age) as f64 * model.past_peak_step;
    let base = base_age_chance(model, boxer.age) + past_peak;
    if base <= 0.0 {
        return 0.0;
    }
    let chance = base + performance_modifier(boxer, model) - protection(boxer, model, context);
    clamp_f64(chance, model.chance_min, model.chance_max)
}

/// Roll retirement for this month, marking the boxer retired on success
pub fn evaluate_retirement<R: Rng + ?Sized>(
    boxer: &mut Boxer,
    model: &RetirementModel,
    context: &RetirementContext,
    rng: &mut R,
) -> RetirementEvaluation {
    if !boxer.is_active() {
        return RetirementEvaluation {
            is_retired: true,
            newly_retired: false,
            forced: false,
            chance: 1.0,
            roll: None,
        };
    }

    if boxer.age >= model.hard_age_cap {
        boxer.status = ActivityStatus::Retired {
            age: boxer.age,
            reason: RetirementReason::AgeCap,
        };
        tracing::info!(boxer = %boxer.id, age = boxer.age, "retired at age cap");
        return RetirementEvaluation {
            is_retired: true,
            newly_retired: true,
            forced: true,
            chance: 1.0,
            roll: None,
        };
    }

    let chance = retirement_chance(boxer, model, context);
    if chance <= 0.0 {
        return RetirementEvaluation {
            is_retired: false,
            newly_retired: false,
            forced: false,
            chance: 0.0,
            roll: None,
        };
    }

    let roll: f64 = rng.gen();
    let retired = roll < chance;
    if retired {
        boxer.status = ActivityStatus::Retired {
            age: boxer.age,
            reason: RetirementReason::Evaluated { chance, roll },
        };
        tracing::info!(boxer = %boxer.id, age = boxer.age, chance, "retired");
    }
    RetirementEvaluation {
        is_retired: retired,
        newly_retired: retired,
        forced: false,
        chance,
        roll: Some(roll),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::career::boxer::Stats;
    use crate::core::types::BoxerId;
    use rand::rngs::mock::StepRng;

    fn veteran(age: u32, wins: u32, losses: u32) -> Boxer {
        let mut boxer = Boxer::new(BoxerId(1), "Vet", age, "lightweight", Stats::uniform(70));
        boxer.stage = BoutKind::Pro;
        boxer.pro_record.wins = wins;
        boxer.pro_record.losses = losses;
        boxer
    }

    #[test]
    fn test_no_chance_below_minimum_age() {
        let model = RetirementModel::default();
        let boxer = veteran(30, 2, 10);
        assert_eq!(retirement_chance(&boxer, &model, &RetirementContext::default()), 0.0);
    }

    #[test]
    fn test_poor_record_raises_chance() {
        let model = RetirementModel::default();
        let mut poor = veteran(38, 4, 12);
        for _ in 0..4 {
            poor.recent_results.push(Outcome::Loss);
        }
        let elite = veteran(38, 30, 1);
        let ctx = RetirementContext::default();
        assert!(retirement_chance(&poor, &model, &ctx) > retirement_chance(&elite, &model, &ctx));
    }

    #[test]
    fn test_protection_lowers_chance() {
        let model = RetirementModel::default();
        let boxer = veteran(40, 20, 10);
        let plain = retirement_chance(&boxer, &model, &RetirementContext::default());
        let champion = retirement_chance(
            &boxer,
            &model,
            &RetirementContext {
                is_lineal_champion: true,
                best_rank: Some(1),
            },
        );
        assert!(champion < plain);
    }

    #[test]
    fn test_age_cap_forces_retirement() {
        let model = RetirementModel::default();
        let mut boxer = veteran(model.hard_age_cap, 40, 0);
        // rolls of ~1.0 would never pass a probability check
        let eval = evaluate_retirement(&mut boxer, &model, &RetirementContext::default(), &mut StepRng::new(u64::MAX, 0));
        assert!(eval.forced && eval.newly_retired);
        assert!(matches!(boxer.status, ActivityStatus::Retired { reason: RetirementReason::AgeCap, .. }));
    }

    #[test]
    fn test_retirement_is_terminal() {
        let model = RetirementModel::default();
        let mut boxer = veteran(39, 5, 15);
        let ctx = RetirementContext::default();
        let first = evaluate_retirement(&mut boxer, &model, &ctx, &mut StepRng::new(0, 0));
        assert!(first.newly_retired);

        boxer.age = 20;
        let again = evaluate_retirement(&mut boxer, &model, &ctx, &mut StepRng::new(u64::MAX, 0));
        assert!(again.is_retired);
        assert!(!again.newly_retired);
        assert!(!boxer.is_active());
    }
}

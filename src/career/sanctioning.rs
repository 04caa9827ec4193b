//! Which bodies a pro bout moves
//!
//! Every organization gets an independent seeded draw. A body whose champion
//! is in the bout (or whose vacant belt is on the line) always sanctions it,
//! and the requesting body is always included.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::career::ledger::{RankingLedger, SanctionedBody};
use crate::core::config::RulesConfig;
use crate::core::error::Result;
use crate::core::types::{clamp_f64, BoxerId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SanctionRule {
    TitleFight,
    Primary,
    TopWindow,
    Elite,
    RankGap,
    SingleRanked,
}

/// One audited decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanctionDraw {
    pub organization: String,
    pub rule: SanctionRule,
    /// `None` for rules that apply without a roll
    pub probability: Option<f64>,
    pub roll: Option<f64>,
    pub selected: bool,
}

/// Stored with the fight history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanctioningRecord {
    pub primary: String,
    pub bodies: Vec<SanctionedBody>,
    pub draws: Vec<SanctionDraw>,
}

impl SanctioningRecord {
    pub fn organizations(&self) -> impl Iterator<Item = &str> {
        self.bodies.iter().map(|b| b.organization.as_str())
    }

    pub fn is_multi_body(&self) -> bool {
        self.bodies.len() > 1
    }
}

/// Decide the sanctioning bodies for a bout between `red` and `blue` in `division`
#[allow(clippy::too_many_arguments)]
pub fn determine_sanctioning<R: Rng + ?Sized>(
    config: &RulesConfig,
    ledger: &RankingLedger,
    division: &str,
    primary: &str,
    red: BoxerId,
    blue: BoxerId,
    available: impl Fn(BoxerId) -> bool,
    rng: &mut R,
) -> Result<SanctioningRecord> {
    config.organization(primary)?;
    let policy = &config.sanctioning;
    let mut draws = Vec::new();
    let mut bodies = Vec::new();

    for org in &config.organizations {
        let ranking = ledger.ranking(&org.name, division)?;

        if ranking.is_title_bout(red, blue, &available) {
            draws.push(SanctionDraw {
                organization: org.name.clone(),
                rule: SanctionRule::TitleFight,
                probability: None,
                roll: None,
                selected: true,
            });
            bodies.push(SanctionedBody {
                organization: org.name.clone(),
                title_fight: true,
            });
            continue;
        }

        if policy.include_primary_always && org.name == primary {
            draws.push(SanctionDraw {
                organization: org.name.clone(),
                rule: SanctionRule::Primary,
                probability: None,
                roll: None,
                selected: true,
            });
            bodies.push(SanctionedBody {
                organization: org.name.clone(),
                title_fight: false,
            });
            continue;
        }

        let scale = |p: f64| clamp_f64(p * org.sanctioning_weight, 0.0, policy.max_probability);
        let mut attempts: Vec<(SanctionRule, f64)> = Vec::new();
        match (ranking.rank_of(red), ranking.rank_of(blue)) {
            (Some(a), Some(b)) => {
                if a <= policy.top_window && b <= policy.top_window {
                    attempts.push((SanctionRule::TopWindow, scale(policy.top_window_probability)));
                }
                if a <= policy.elite_cutoff || b <= policy.elite_cutoff {
                    attempts.push((SanctionRule::Elite, scale(policy.elite_probability)));
                }
                if a.abs_diff(b) <= policy.rank_gap_max {
                    attempts.push((SanctionRule::RankGap, scale(policy.rank_gap_probability)));
                }
            }
            (Some(rank), None) | (None, Some(rank)) if rank <= policy.single_ranked_cutoff => {
                attempts.push((SanctionRule::SingleRanked, scale(policy.single_ranked_probability)));
            }
            _ => {}
        }

        // Rules are tried in order until one roll succeeds
        for (rule, probability) in attempts {
            let roll: f64 = rng.gen();
            let selected = roll < probability;
            draws.push(SanctionDraw {
                organization: org.name.clone(),
                rule,
                probability: Some(probability),
                roll: Some(roll),
                selected,
            });
            if selected {
                bodies.push(SanctionedBody {
                    organization: org.name.clone(),
                    title_fight: false,
                });
                break;
            }
        }
    }

    if bodies.is_empty() {
        bodies.push(SanctionedBody {
            organization: primary.to_string(),
            title_fight: false,
        });
    }

    tracing::debug!(
        division,
        primary,
        bodies = ?bodies.iter().map(|b| b.organization.as_str()).collect::<Vec<_>>(),
        "sanctioning decided"
    );

    Ok(SanctioningRecord {
        primary: primary.to_string(),
        bodies,
        draws,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::career::ledger::OrganizationRanking;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DIV: &str = "lightweight";

    fn ledger(config: &RulesConfig, champion: Option<BoxerId>) -> RankingLedger {
        let mut ledger = RankingLedger::new();
        ledger.ensure_division(config, DIV).unwrap();
        for org in &config.organizations {
            let entries = (1..=15).map(BoxerId).collect();
            let ranking = OrganizationRanking::with_entries(&org.name, DIV, 15, entries, champion).unwrap();
            ledger.insert_ranking(config, ranking).unwrap();
        }
        ledger
    }

    #[test]
    fn test_champion_bout_is_title_fight_everywhere() {
        let config = RulesConfig::default();
        let ledger = ledger(&config, Some(BoxerId(1)));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let record =
            determine_sanctioning(&config, &ledger, DIV, "WBC", BoxerId(1), BoxerId(2), |_| true, &mut rng).unwrap();
        assert_eq!(record.bodies.len(), 4);
        assert!(record.bodies.iter().all(|b| b.title_fight));
    }

    #[test]
    fn test_failed_rolls_leave_only_primary() {
        let config = RulesConfig::default();
        let ledger = ledger(&config, Some(BoxerId(1)));
        // rolls of ~1.0 never pass
        let mut rng = StepRng::new(u64::MAX, 0);
        let record =
            determine_sanctioning(&config, &ledger, DIV, "IBF", BoxerId(8), BoxerId(9), |_| true, &mut rng).unwrap();
        assert_eq!(record.organizations().collect::<Vec<_>>(), vec!["IBF"]);
        assert!(!record.is_multi_body());
        // three non-primary bodies tried top-window, then rank-gap
        assert_eq!(record.draws.iter().filter(|d| d.roll.is_some()).count(), 6);
    }

    #[test]
    fn test_successful_rolls_select_every_body() {
        let config = RulesConfig::default();
        let ledger = ledger(&config, Some(BoxerId(1)));
        let mut rng = StepRng::new(0, 0);
        let record =
            determine_sanctioning(&config, &ledger, DIV, "WBO", BoxerId(8), BoxerId(9), |_| true, &mut rng).unwrap();
        assert_eq!(record.bodies.len(), 4);
        assert_eq!(record.bodies[0].organization, "WBC");
        assert!(record.is_multi_body());
    }

    #[test]
    fn test_single_ranked_cutoff_is_configurable() {
        let mut config = RulesConfig::default();
        let ledger = ledger(&config, None);
        let record =
            determine_sanctioning(&config, &ledger, DIV, "WBC", BoxerId(12), BoxerId(50), |_| true, &mut StepRng::new(0, 0))
                .unwrap();
        assert_eq!(record.organizations().collect::<Vec<_>>(), vec!["WBC"]);

        config.sanctioning.single_ranked_cutoff = 12;
        let record =
            determine_sanctioning(&config, &ledger, DIV, "WBC", BoxerId(12), BoxerId(50), |_| true, &mut StepRng::new(0, 0))
                .unwrap();
        assert_eq!(record.bodies.len(), 4);
        assert!(record
            .draws
            .iter()
            .filter(|d| d.roll.is_some())
            .all(|d| d.rule == SanctionRule::SingleRanked));
    }

    #[test]
    fn test_unranked_pair_outside_primary_never_rolls() {
        let config = RulesConfig::default();
        let ledger = ledger(&config, None);
        let mut rng = StepRng::new(0, 0);
        let record =
            determine_sanctioning(&config, &ledger, DIV, "WBA", BoxerId(50), BoxerId(51), |_| true, &mut rng).unwrap();
        assert_eq!(record.organizations().collect::<Vec<_>>(), vec!["WBA"]);
        assert!(record.draws.iter().all(|d| d.roll.is_none()));
    }
}

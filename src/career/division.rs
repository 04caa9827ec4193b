//! Division changes: P4P-based seeding and weight-cut costs

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::config::RulesConfig;
use crate::core::error::{CareerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Everything needed to commit a division change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionMovePlan {
    pub from: String,
    pub to: String,
    pub direction: MoveDirection,
    /// Entry rank per organization, clamped to its slots; `None` enters unranked
    pub seeds: BTreeMap<String, Option<usize>>,
    pub fatigue_cost: u32,
    pub injury_cost: u32,
}

/// Seed rank range for a P4P position, or `None` when the boxer should enter unranked
pub fn seed_band(config: &RulesConfig, p4p_rank: Option<usize>, pro_fights: u32) -> Option<(usize, usize)> {
    let rules = &config.division_change;
    if pro_fights < rules.min_pro_fights_for_seed {
        return None;
    }
    let rank = p4p_rank?;
    rules
        .seed_bands
        .iter()
        .find(|band| rank <= band.max_p4p_rank)
        .map(|band| (band.min_rank, band.max_rank))
}

pub fn plan_division_change<R: Rng + ?Sized>(
    config: &RulesConfig,
    from: &str,
    to: &str,
    p4p_rank: Option<usize>,
    pro_fights: u32,
    rng: &mut R,
) -> Result<DivisionMovePlan> {
    let from_index = config.division_index(from)?;
    let to_index = config.division_index(to)?;
    if from_index.abs_diff(to_index) != 1 {
        return Err(CareerError::InvalidRequest(format!(
            "{} is not adjacent to {}",
            to, from
        )));
    }
    let rules = &config.division_change;
    let direction = if to_index < from_index {
        MoveDirection::Down
    } else {
        MoveDirection::Up
    };

    let base = seed_band(config, p4p_rank, pro_fights).map(|(low, high)| {
        let seed = rng.gen_range(low..=high.max(low));
        match direction {
            MoveDirection::Down => seed + rules.down_move_rank_penalty,
            MoveDirection::Up => seed,
        }
    });

    let mut seeds = BTreeMap::new();
    for org in &config.organizations {
        let seed = base.map(|base| {
            let jitter = if rules.seed_jitter > 0 {
                rng.gen_range(-rules.seed_jitter..=rules.seed_jitter)
            } else {
                0
            };
            (base as i64 + jitter as i64).clamp(1, org.ranking_slots as i64) as usize
        });
        seeds.insert(org.name.clone(), seed);
    }

    let (fatigue_cost, injury_cost) = match direction {
        MoveDirection::Down => (rules.down_fatigue_cost, rules.down_injury_cost),
        MoveDirection::Up => (rules.up_fatigue_cost, rules.up_injury_cost),
    };

    Ok(DivisionMovePlan {
        from: from.to_string(),
        to: to.to_string(),
        direction,
        seeds,
        fatigue_cost,
        injury_cost,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SeedBand;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_seed_bands() {
        let config = RulesConfig::default();
        assert_eq!(seed_band(&config, Some(2), 10), Some((2, 3)));
        assert_eq!(seed_band(&config, Some(12), 10), Some((5, 7)));
        assert_eq!(seed_band(&config, Some(60), 10), Some((11, 13)));
        assert_eq!(seed_band(&config, Some(90), 10), None);
        assert_eq!(seed_band(&config, Some(2), 1), None);
        assert_eq!(seed_band(&config, None, 10), None);
    }

    #[test]
    fn test_down_move_costs_rank_and_wear() {
        let config = RulesConfig::default();
        let up = plan_division_change(&config, "welterweight", "middleweight", Some(5), 12, &mut ChaCha8Rng::seed_from_u64(4)).unwrap();
        let down = plan_division_change(&config, "welterweight", "lightweight", Some(5), 12, &mut ChaCha8Rng::seed_from_u64(4)).unwrap();
        assert_eq!(up.direction, MoveDirection::Up);
        assert_eq!(down.direction, MoveDirection::Down);
        for (org, seed) in &up.seeds {
            let up_rank = seed.unwrap();
            let down_rank = down.seeds[org].unwrap();
            assert_eq!(down_rank, up_rank + config.division_change.down_move_rank_penalty);
        }
        assert!(down.fatigue_cost > up.fatigue_cost);
        assert!(down.injury_cost > up.injury_cost);
    }

    #[test]
    fn test_deep_seeds_clamp_to_slots() {
        let mut config = RulesConfig::default();
        config.division_change.seed_bands = vec![SeedBand {
            max_p4p_rank: 100,
            min_rank: 14,
            max_rank: 14,
        }];
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let plan = plan_division_change(&config, "welterweight", "lightweight", Some(50), 20, &mut rng).unwrap();
        for org in &config.organizations {
            let seed = plan.seeds[&org.name];
            assert_eq!(seed.map(|s| s <= org.ranking_slots), Some(true), "{} unranked", org.name);
        }
    }

    #[test]
    fn test_rejects_non_adjacent_move() {
        let config = RulesConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = plan_division_change(&config, "flyweight", "heavyweight", None, 0, &mut rng);
        assert!(matches!(err, Err(CareerError::InvalidRequest(_))));
        let err = plan_division_change(&config, "flyweight", "cruiserweight", None, 0, &mut rng);
        assert!(matches!(err, Err(CareerError::UnknownDivision(_))));
    }
}

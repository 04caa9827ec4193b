//! Post-fight fatigue and injury-risk deltas

use serde::{Deserialize, Serialize};

use crate::core::config::{AftermathConfig, WearMultiplier};
use crate::core::error::{CareerError, Result};
use crate::core::types::{clamp_f64, BoxerId};
use crate::fight::resolution::{FightResult, Outcome};

/// Unclamped wear deltas for one participant. The orchestrator clamps on apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFightImpact {
    pub fatigue_gain: u32,
    pub injury_risk_gain: u32,
}

fn pick(outcome: Outcome, win: WearMultiplier, draw: WearMultiplier, loss: WearMultiplier) -> WearMultiplier {
    match outcome {
        Outcome::Win => win,
        Outcome::Draw => draw,
        Outcome::Loss => loss,
    }
}

/// 0 for a shutout or a stoppage, 1 for level cards
fn closeness(result: &FightResult) -> f64 {
    if result.is_stoppage() || result.scorecards.is_empty() || result.rounds_completed == 0 {
        return 0.0;
    }
    let mean_spread = result.scorecards.iter().map(|c| c.spread() as f64).sum::<f64>()
        / result.scorecards.len() as f64;
    clamp_f64(1.0 - mean_spread / result.rounds_completed as f64, 0.0, 1.0)
}

pub fn post_fight_impact(config: &AftermathConfig, result: &FightResult, boxer: BoxerId) -> Result<PostFightImpact> {
    let outcome = result.outcome_for(boxer).ok_or(CareerError::UnknownBoxer(boxer))?;

    let ratio = if result.rounds_scheduled == 0 {
        1.0
    } else {
        result.rounds_completed as f64 / result.rounds_scheduled as f64
    };
    let weight = clamp_f64(config.rounds_completed_weight, 0.0, 1.0);
    let rounds_factor = (1.0 - weight) + ratio * weight;
    let hardness = 1.0 + config.closeness_weight * closeness(result);

    let base = pick(outcome, config.outcome.win, config.outcome.draw, config.outcome.loss);
    let mut fatigue_mult = base.fatigue * rounds_factor * hardness;
    let mut injury_mult = base.injury * rounds_factor;
    if result.is_stoppage() {
        let stop = pick(outcome, config.stoppage.win, config.stoppage.draw, config.stoppage.loss);
        fatigue_mult *= stop.fatigue;
        injury_mult *= stop.injury;
    }

    let scaled = |base: u32, mult: f64| ((base as f64 * mult).round() as u32).max(1);
    Ok(PostFightImpact {
        fatigue_gain: scaled(config.base_fatigue_gain, fatigue_mult),
        injury_risk_gain: scaled(config.base_injury_risk_gain, injury_mult),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::FightModel;
    use crate::core::types::BoutKind;
    use crate::fight::judging::{FightMethod, Scorecard};

    fn result(method: FightMethod, completed: u32, scheduled: u32, cards: Vec<Scorecard>) -> FightResult {
        FightResult {
            red: BoxerId(1),
            blue: BoxerId(2),
            kind: BoutKind::Pro,
            winner: Some(BoxerId(1)),
            method,
            rounds_scheduled: scheduled,
            rounds_completed: completed,
            stoppage_round: (method == FightMethod::Stoppage).then_some(completed),
            scorecards: cards,
            rounds: Vec::new(),
        }
    }

    #[test]
    fn test_stoppage_loss_costs_more_than_decision_win() {
        let config = FightModel::pro().aftermath;
        let shutout = vec![Scorecard { red: 100, blue: 90 }; 3];
        let decision = result(FightMethod::UnanimousDecision, 10, 10, shutout);
        let stopped = result(FightMethod::Stoppage, 3, 10, vec![Scorecard::default(); 3]);

        let winner = post_fight_impact(&config, &decision, BoxerId(1)).unwrap();
        let stopped_loser = post_fight_impact(&config, &stopped, BoxerId(2)).unwrap();
        assert!(stopped_loser.fatigue_gain > winner.fatigue_gain);
        assert!(stopped_loser.injury_risk_gain > winner.injury_risk_gain);
    }

    #[test]
    fn test_full_distance_costs_more_than_early_finish() {
        let config = FightModel::amateur().aftermath;
        let cards = vec![Scorecard { red: 30, blue: 27 }; 3];
        let distance = result(FightMethod::UnanimousDecision, 3, 3, cards);
        let early = result(FightMethod::Stoppage, 1, 3, vec![Scorecard::default(); 3]);

        let long = post_fight_impact(&config, &distance, BoxerId(1)).unwrap();
        let short = post_fight_impact(&config, &early, BoxerId(1)).unwrap();
        assert!(long.fatigue_gain > short.fatigue_gain);
        assert!(long.injury_risk_gain > short.injury_risk_gain);
    }

    #[test]
    fn test_close_cards_add_fatigue() {
        let mut config = FightModel::pro().aftermath;
        config.closeness_weight = 1.0;
        let close = result(FightMethod::SplitDecision, 10, 10, vec![Scorecard { red: 95, blue: 95 }; 3]);
        let wide = result(FightMethod::UnanimousDecision, 10, 10, vec![Scorecard { red: 100, blue: 90 }; 3]);
        let close_gain = post_fight_impact(&config, &close, BoxerId(1)).unwrap();
        let wide_gain = post_fight_impact(&config, &wide, BoxerId(1)).unwrap();
        assert!(close_gain.fatigue_gain > wide_gain.fatigue_gain);
    }

    #[test]
    fn test_non_participant_rejected() {
        let config = AftermathConfig::default();
        let r = result(FightMethod::UnanimousDecision, 10, 10, Vec::new());
        assert!(matches!(post_fight_impact(&config, &r, BoxerId(9)), Err(CareerError::UnknownBoxer(_))));
    }
}

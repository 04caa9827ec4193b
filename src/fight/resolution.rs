//! Round-by-round bout resolution
//!
//! Pure given its random source: the resolver reads two competitors and a
//! fight model and returns a `FightResult`. Nothing is mutated.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::career::boxer::{Boxer, Stats};
use crate::core::config::FightModel;
use crate::core::error::{CareerError, Result};
use crate::core::types::{clamp_f64, BoutKind, BoxerId, Corner};
use crate::fight::judging::{decide, FightMethod, Scorecard};

/// A boxer as seen by the resolver
#[derive(Debug, Clone)]
pub struct Competitor {
    pub id: BoxerId,
    pub stats: Stats,
    pub fatigue: u32,
    pub injury_risk: u32,
    /// Flat skill bonus from experience
    pub experience_bonus: f64,
}

impl Competitor {
    pub fn from_boxer(boxer: &Boxer, experience_bonus: f64) -> Self {
        Self {
            id: boxer.id,
            stats: boxer.stats.clone(),
            fatigue: boxer.fatigue,
            injury_risk: boxer.injury_risk,
            experience_bonus,
        }
    }
}

/// Result from one participant's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub red_form: f64,
    pub blue_form: f64,
    /// Positive favours red
    pub margin: f64,
    pub stoppage_chance: f64,
}

/// Immutable record of a resolved bout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightResult {
    pub red: BoxerId,
    pub blue: BoxerId,
    pub kind: BoutKind,
    pub winner: Option<BoxerId>,
    pub method: FightMethod,
    pub rounds_scheduled: u32,
    pub rounds_completed: u32,
    pub stoppage_round: Option<u32>,
    pub scorecards: Vec<Scorecard>,
    pub rounds: Vec<RoundSummary>,
}

impl FightResult {
    pub fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    pub fn is_stoppage(&self) -> bool {
        self.method == FightMethod::Stoppage
    }

    pub fn participants(&self) -> [BoxerId; 2] {
        [self.red, self.blue]
    }

    pub fn involves(&self, id: BoxerId) -> bool {
        self.red == id || self.blue == id
    }

    pub fn opponent_of(&self, id: BoxerId) -> Option<BoxerId> {
        if id == self.red {
            Some(self.blue)
        } else if id == self.blue {
            Some(self.red)
        } else {
            None
        }
    }

    pub fn loser(&self) -> Option<BoxerId> {
        self.winner.and_then(|w| self.opponent_of(w))
    }

    /// `None` when `id` did not take part
    pub fn outcome_for(&self, id: BoxerId) -> Option<Outcome> {
        if !self.involves(id) {
            return None;
        }
        Some(match self.winner {
            None => Outcome::Draw,
            Some(w) if w == id => Outcome::Win,
            Some(_) => Outcome::Loss,
        })
    }
}

fn normal(std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(0.0, std_dev)
        .map_err(|e| CareerError::Config(format!("invalid noise std-dev {}: {}", std_dev, e)))
}

/// Skill score before in-fight fatigue
fn base_skill(competitor: &Competitor, model: &FightModel) -> f64 {
    competitor.stats.weighted(&model.style_weights) + competitor.experience_bonus
}

/// Fatigue added per round; better conditioning slows it down
fn fatigue_per_round(competitor: &Competitor, model: &FightModel) -> f64 {
    let conditioning = 1.5 - competitor.stats.stamina as f64 / 100.0;
    model.stamina_decay_per_round * conditioning.max(0.2)
}

fn stoppage_chance(margin: f64, attacker: &Competitor, defender: &Competitor, model: &FightModel) -> f64 {
    let pressure = (margin.abs() - model.stoppage_pressure_start).max(0.0) * model.stoppage_pressure_per_point;
    let power_edge = (attacker.stats.power - defender.stats.chin).max(0) as f64 * model.power_edge_factor;
    let damage = defender.injury_risk as f64 * model.injury_stoppage_factor;
    clamp_f64(
        model.base_stoppage_chance + pressure + power_edge + damage,
        0.0,
        model.max_stoppage_chance,
    )
}

/// Resolve a bout between two competitors.
///
/// `rounds` must be within `1..=model.max_rounds`.
pub fn resolve_fight<R: Rng + ?Sized>(
    red: &Competitor,
    blue: &Competitor,
    model: &FightModel,
    kind: BoutKind,
    rounds: u32,
    rng: &mut R,
) -> Result<FightResult> {
    if rounds == 0 || rounds > model.max_rounds {
        return Err(CareerError::InvalidRounds {
            rounds,
            max: model.max_rounds,
        });
    }
    if red.id == blue.id {
        return Err(CareerError::InvalidRequest(format!("{} cannot fight themselves", red.id)));
    }

    let swing = normal(model.swing_factor)?;
    let judge_noise = normal(model.judge_noise)?;

    let red_skill = base_skill(red, model);
    let blue_skill = base_skill(blue, model);
    let mut red_fatigue = red.fatigue as f64;
    let mut blue_fatigue = blue.fatigue as f64;

    let mut scorecards = vec![Scorecard::default(); model.judges];
    let mut summaries = Vec::with_capacity(rounds as usize);
    let mut stoppage: Option<(Corner, u32)> = None;

    for round in 1..=rounds {
        let red_form = red_skill
            - red_fatigue * model.fatigue_penalty_per_point
            - red.injury_risk as f64 * model.injury_risk_penalty_per_point;
        let blue_form = blue_skill
            - blue_fatigue * model.fatigue_penalty_per_point
            - blue.injury_risk as f64 * model.injury_risk_penalty_per_point;

        let margin = (red_form + swing.sample(rng)) - (blue_form + swing.sample(rng));

        for card in scorecards.iter_mut() {
            card.score_round(margin + judge_noise.sample(rng), model.round_scoring_margin);
        }

        let leader = if margin >= 0.0 { Corner::Red } else { Corner::Blue };
        let (attacker, defender) = match leader {
            Corner::Red => (red, blue),
            Corner::Blue => (blue, red),
        };
        let chance = if margin.abs() > model.stoppage_margin_threshold {
            stoppage_chance(margin, attacker, defender, model)
        } else {
            0.0
        };

        summaries.push(RoundSummary {
            round,
            red_form,
            blue_form,
            margin,
            stoppage_chance: chance,
        });

        if chance > 0.0 && rng.gen::<f64>() < chance {
            stoppage = Some((leader, round));
            break;
        }

        red_fatigue += fatigue_per_round(red, model);
        blue_fatigue += fatigue_per_round(blue, model);
    }

    let corner_id = |corner: Corner| match corner {
        Corner::Red => red.id,
        Corner::Blue => blue.id,
    };

    let result = match stoppage {
        Some((corner, round)) => FightResult {
            red: red.id,
            blue: blue.id,
            kind,
            winner: Some(corner_id(corner)),
            method: FightMethod::Stoppage,
            rounds_scheduled: rounds,
            rounds_completed: round,
            stoppage_round: Some(round),
            scorecards,
            rounds: summaries,
        },
        None => {
            let (winner, method) = decide(&scorecards);
            FightResult {
                red: red.id,
                blue: blue.id,
                kind,
                winner: winner.map(corner_id),
                method,
                rounds_scheduled: rounds,
                rounds_completed: rounds,
                stoppage_round: None,
                scorecards,
                rounds: summaries,
            }
        }
    };

    tracing::debug!(
        red = %result.red,
        blue = %result.blue,
        method = result.method.abbreviation(),
        rounds = result.rounds_completed,
        "bout resolved"
    );

    Ok(result)
}

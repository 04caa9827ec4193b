//! Career rule set with documented defaults
//!
//! Every tuning knob the engine reads lives here. The engine never loads
//! files itself: callers build a `RulesConfig` (usually `Default` or
//! `load_rules`) and pass it into every call.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::career::boxer::StatKind;
use crate::core::error::{CareerError, Result};
use crate::core::types::BoutKind;

/// A single weight division. Divisions are ordered lightest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightClass {
    pub name: String,
    pub min_lbs: u32,
    pub max_lbs: u32,
}

/// A sanctioning body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationConfig {
    pub name: String,
    /// Length of the per-division ranking list (rank 1..=slots)
    pub ranking_slots: usize,
    /// Scales every cross-body sanctioning probability for this body
    #[serde(default = "default_sanctioning_weight")]
    pub sanctioning_weight: f64,
}

fn default_sanctioning_weight() -> f64 {
    1.0
}

/// Fatigue/injury multipliers for one outcome
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WearMultiplier {
    pub fatigue: f64,
    pub injury: f64,
}

impl WearMultiplier {
    pub const fn new(fatigue: f64, injury: f64) -> Self {
        Self { fatigue, injury }
    }
}

/// Multipliers keyed by the boxer's outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeMultipliers {
    pub win: WearMultiplier,
    pub draw: WearMultiplier,
    pub loss: WearMultiplier,
}

/// Post-fight wear configuration for one fight model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AftermathConfig {
    pub base_fatigue_gain: u32,
    pub base_injury_risk_gain: u32,
    /// Share of the wear that scales with rounds completed / scheduled (0..=1)
    pub rounds_completed_weight: f64,
    /// Extra wear for close decisions (0 = ignore scorecards)
    pub closeness_weight: f64,
    pub outcome: OutcomeMultipliers,
    /// Applied on top of `outcome` when the bout ended by stoppage
    pub stoppage: OutcomeMultipliers,
}

impl Default for AftermathConfig {
    fn default() -> Self {
        Self {
            base_fatigue_gain: 4,
            base_injury_risk_gain: 5,
            rounds_completed_weight: 0.35,
            closeness_weight: 0.2,
            outcome: OutcomeMultipliers {
                win: WearMultiplier::new(0.9, 0.8),
                draw: WearMultiplier::new(1.0, 1.0),
                loss: WearMultiplier::new(1.2, 1.35),
            },
            stoppage: OutcomeMultipliers {
                win: WearMultiplier::new(0.85, 0.8),
                draw: WearMultiplier::new(1.0, 1.0),
                loss: WearMultiplier::new(1.5, 1.8),
            },
        }
    }
}

/// Round-by-round fight model (one for amateur, one for pro)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FightModel {
    /// Weights used to collapse stats into a single skill score
    pub style_weights: BTreeMap<StatKind, f64>,
    /// Scheduled distance comes from the boxer's progression tier
    pub max_rounds: u32,
    pub judges: usize,
    /// Std-dev of each side's per-round performance swing
    pub swing_factor: f64,
    /// Std-dev of each judge's reading of a round
    pub judge_noise: f64,
    /// A judge scores a round 10-9 once the perceived margin passes this
    pub round_scoring_margin: f64,
    pub base_stoppage_chance: f64,
    pub max_stoppage_chance: f64,
    /// Minimum round margin before a stoppage can be rolled
    pub stoppage_margin_threshold: f64,
    /// Margin beyond which stoppage pressure starts to build
    pub stoppage_pressure_start: f64,
    pub stoppage_pressure_per_point: f64,
    /// Chance added per point of power over the opponent's chin
    pub power_edge_factor: f64,
    /// Chance added per point of the defender's injury risk
    pub injury_stoppage_factor: f64,
    pub stamina_decay_per_round: f64,
    pub fatigue_penalty_per_point: f64,
    pub injury_risk_penalty_per_point: f64,
    pub aftermath: AftermathConfig,
}

impl FightModel {
    pub fn amateur() -> Self {
        Self {
            style_weights: BTreeMap::from([
                (StatKind::Power, 0.08),
                (StatKind::Speed, 0.16),
                (StatKind::Chin, 0.06),
                (StatKind::Stamina, 0.12),
                (StatKind::Defense, 0.16),
                (StatKind::RingIq, 0.14),
                (StatKind::Footwork, 0.12),
                (StatKind::ReachControl, 0.10),
                (StatKind::InsideFighting, 0.06),
            ]),
            max_rounds: 3,
            judges: 3,
            swing_factor: 2.5,
            judge_noise: 1.0,
            round_scoring_margin: 1.0,
            base_stoppage_chance: 0.015,
            max_stoppage_chance: 0.12,
            stoppage_margin_threshold: 3.6,
            stoppage_pressure_start: 6.0,
            stoppage_pressure_per_point: 0.008,
            power_edge_factor: 0.0015,
            injury_stoppage_factor: 0.0004,
            stamina_decay_per_round: 0.35,
            fatigue_penalty_per_point: 0.45,
            injury_risk_penalty_per_point: 0.02,
            aftermath: AftermathConfig {
                base_fatigue_gain: 3,
                base_injury_risk_gain: 4,
                ..AftermathConfig::default()
            },
        }
    }

    pub fn pro() -> Self {
        Self {
            style_weights: BTreeMap::from([
                (StatKind::Power, 0.14),
                (StatKind::Speed, 0.12),
                (StatKind::Chin, 0.10),
                (StatKind::Stamina, 0.12),
                (StatKind::Defense, 0.12),
                (StatKind::RingIq, 0.12),
                (StatKind::Footwork, 0.10),
                (StatKind::ReachControl, 0.08),
                (StatKind::InsideFighting, 0.10),
            ]),
            max_rounds: 12,
            judges: 3,
            swing_factor: 2.8,
            judge_noise: 1.2,
            round_scoring_margin: 1.0,
            base_stoppage_chance: 0.03,
            max_stoppage_chance: 0.3,
            stoppage_margin_threshold: 3.0,
            stoppage_pressure_start: 6.0,
            stoppage_pressure_per_point: 0.012,
            power_edge_factor: 0.002,
            injury_stoppage_factor: 0.0006,
            stamina_decay_per_round: 0.3,
            fatigue_penalty_per_point: 0.5,
            injury_risk_penalty_per_point: 0.03,
            aftermath: AftermathConfig::default(),
        }
    }
}

impl Default for FightModel {
    fn default() -> Self {
        Self::pro()
    }
}

/// How far boxers move in an organization ranking after a bout.
/// The top-level table covers NPC bouts; player-booked bouts use each
/// boxer's pro tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingRules {
    pub win_step: usize,
    pub loss_step: usize,
    pub draw_step: usize,
    /// An unranked boxer who beats a ranked one enters this many places
    /// below the beaten boxer's rank
    pub unranked_win_offset: usize,
    /// Entry rank for an unranked boxer beating another unranked boxer
    /// (clamped to the organization's slots)
    pub unranked_entry_rank: usize,
}

impl Default for RankingRules {
    fn default() -> Self {
        Self {
            win_step: 2,
            loss_step: 2,
            draw_step: 0,
            unranked_win_offset: 2,
            unranked_entry_rank: 15,
        }
    }
}

/// Points credited to an amateur per result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmateurPoints {
    pub win: u32,
    pub draw: u32,
    pub loss: u32,
    /// Added on top of `win` for a stoppage
    pub ko_bonus: u32,
}

/// Amateur circuit level chosen by bouts already taken
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmateurTier {
    pub name: String,
    pub min_fights: u32,
    pub max_fights: u32,
    pub opponent_rating_min: i32,
    pub opponent_rating_max: i32,
    pub rounds: u32,
    pub points: AmateurPoints,
}

/// Gate for turning pro; every threshold must be met
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProReadiness {
    pub min_age: u32,
    pub min_fights: u32,
    pub min_points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AmateurProgression {
    pub tiers: Vec<AmateurTier>,
    pub pro_readiness: ProReadiness,
}

impl Default for AmateurProgression {
    fn default() -> Self {
        let tier = |name: &str, min_fights, max_fights, rating: (i32, i32), points: (u32, u32, u32, u32)| AmateurTier {
            name: name.to_string(),
            min_fights,
            max_fights,
            opponent_rating_min: rating.0,
            opponent_rating_max: rating.1,
            rounds: 3,
            points: AmateurPoints {
                win: points.0,
                draw: points.1,
                loss: points.2,
                ko_bonus: points.3,
            },
        };
        Self {
            tiers: vec![
                tier("novice", 0, 4, (40, 52), (8, 3, 1, 2)),
                tier("regional", 5, 11, (47, 60), (10, 4, 1, 3)),
                tier("national", 12, u32::MAX, (54, 67), (12, 5, 2, 4)),
            ],
            pro_readiness: ProReadiness {
                min_age: 18,
                min_fights: 10,
                min_points: 100,
            },
        }
    }
}

/// Pro career stage chosen by pro bouts already taken
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProTier {
    pub name: String,
    pub min_fights: u32,
    pub max_fights: u32,
    pub rounds: u32,
    /// Rating band for journeymen booked against a boxer in this tier
    pub opponent_rating_min: i32,
    pub opponent_rating_max: i32,
    pub ranking: RankingRules,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProProgression {
    pub tiers: Vec<ProTier>,
}

impl Default for ProProgression {
    fn default() -> Self {
        let tier = |name: &str, min_fights, max_fights, rounds, rating: (i32, i32), steps: (usize, usize, usize, usize, usize)| ProTier {
            name: name.to_string(),
            min_fights,
            max_fights,
            rounds,
            opponent_rating_min: rating.0,
            opponent_rating_max: rating.1,
            ranking: RankingRules {
                win_step: steps.0,
                loss_step: steps.1,
                draw_step: steps.2,
                unranked_win_offset: steps.3,
                unranked_entry_rank: steps.4,
            },
        };
        Self {
            tiers: vec![
                tier("prospect", 0, 5, 6, (48, 64), (1, 2, 1, 3, 15)),
                tier("contender", 6, 15, 10, (58, 74), (2, 2, 0, 2, 13)),
                tier("elite", 16, u32::MAX, 12, (66, 84), (3, 3, 0, 1, 11)),
            ],
        }
    }
}

/// Multi-body sanctioning probabilities
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SanctioningPolicy {
    /// The requesting body always moves its rankings
    pub include_primary_always: bool,
    pub top_window: usize,
    pub elite_cutoff: usize,
    pub rank_gap_max: usize,
    /// A bout with one ranked side can still move a body when that side sits at or above this rank
    pub single_ranked_cutoff: usize,
    pub top_window_probability: f64,
    pub elite_probability: f64,
    pub rank_gap_probability: f64,
    pub single_ranked_probability: f64,
    pub max_probability: f64,
}

impl Default for SanctioningPolicy {
    fn default() -> Self {
        Self {
            include_primary_always: true,
            top_window: 10,
            elite_cutoff: 5,
            rank_gap_max: 4,
            single_ranked_cutoff: 10,
            top_window_probability: 0.78,
            elite_probability: 0.56,
            rank_gap_probability: 0.35,
            single_ranked_probability: 0.3,
            max_probability: 0.97,
        }
    }
}

/// Monthly world simulation knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldPolicy {
    pub simulate_all_divisions: bool,
    pub title_fight_probability: f64,
    pub title_upset_probability: f64,
    /// Upset chance added per rating point the challenger has over the champion
    pub upset_rating_weight: f64,
    pub draw_probability: f64,
    pub npc_stoppage_probability: f64,
    /// Share of NPC decisions recorded as split
    pub npc_split_decision_share: f64,
    pub defense_news_probability: f64,
    pub ambient_reshuffle_probability: f64,
    pub lineal_unification_probability: f64,
    pub max_events_per_month: usize,
    pub drift_up_probability_per_idle_month: f64,
    pub drift_up_probability_cap: f64,
    pub drift_down_probability: f64,
    pub drift_up_step_min: usize,
    pub drift_up_step_max: usize,
}

impl Default for WorldPolicy {
    fn default() -> Self {
        Self {
            simulate_all_divisions: true,
            title_fight_probability: 0.3,
            title_upset_probability: 0.18,
            upset_rating_weight: 0.01,
            draw_probability: 0.02,
            npc_stoppage_probability: 0.35,
            npc_split_decision_share: 0.25,
            defense_news_probability: 0.65,
            ambient_reshuffle_probability: 0.25,
            lineal_unification_probability: 0.5,
            max_events_per_month: 20,
            drift_up_probability_per_idle_month: 0.12,
            drift_up_probability_cap: 0.42,
            drift_down_probability: 0.1,
            drift_up_step_min: 1,
            drift_up_step_max: 2,
        }
    }
}

/// Stat deltas applied on a birthday inside an age range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgeBracket {
    pub min_age: u32,
    pub max_age: u32,
    pub stat_deltas: BTreeMap<StatKind, i32>,
}

/// Ranges for deterministic aging-profile generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgingProfileRules {
    pub peak_age_min: u32,
    pub peak_age_max: u32,
    pub peak_age_floor: u32,
    pub peak_age_ceiling: u32,
    pub onset_gap_min: u32,
    pub onset_gap_max: u32,
    pub onset_ceiling: u32,
    pub severity_min: f64,
    pub severity_max: f64,
    pub iq_factor_min: f64,
    pub iq_factor_max: f64,
    /// Heavier boxers peak later
    pub heavy_weight_lbs: Vec<u32>,
    pub tall_frame_inches: u32,
}

impl Default for AgingProfileRules {
    fn default() -> Self {
        Self {
            peak_age_min: 26,
            peak_age_max: 30,
            peak_age_floor: 24,
            peak_age_ceiling: 34,
            onset_gap_min: 1,
            onset_gap_max: 3,
            onset_ceiling: 40,
            severity_min: 0.85,
            severity_max: 1.18,
            iq_factor_min: 0.9,
            iq_factor_max: 1.2,
            heavy_weight_lbs: vec![175, 200],
            tall_frame_inches: 74,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgingModel {
    pub stat_min: i32,
    pub stat_max: i32,
    /// Extra decline per year past the boxer's onset age
    pub decline_acceleration_per_year: f64,
    pub age_brackets: Vec<AgeBracket>,
    pub profile: AgingProfileRules,
}

impl Default for AgingModel {
    fn default() -> Self {
        use StatKind::*;
        let bracket = |min_age, max_age, deltas: &[(StatKind, i32)]| AgeBracket {
            min_age,
            max_age,
            stat_deltas: deltas.iter().copied().collect(),
        };
        Self {
            stat_min: 20,
            stat_max: 99,
            decline_acceleration_per_year: 0.04,
            age_brackets: vec![
                bracket(
                    15,
                    19,
                    &[(Power, 1), (Speed, 1), (Stamina, 1), (Defense, 1), (RingIq, 2)],
                ),
                bracket(20, 24, &[(Power, 1), (Chin, 1), (Defense, 1), (RingIq, 2)]),
                bracket(25, 28, &[(RingIq, 1), (InsideFighting, 1)]),
                bracket(29, 32, &[(Speed, -1), (Stamina, -1), (RingIq, 1)]),
                bracket(
                    33,
                    36,
                    &[
                        (Speed, -2),
                        (Stamina, -2),
                        (Power, -1),
                        (Chin, -1),
                        (Footwork, -1),
                        (RingIq, 1),
                    ],
                ),
                bracket(
                    37,
                    60,
                    &[
                        (Speed, -3),
                        (Stamina, -3),
                        (Power, -2),
                        (Chin, -2),
                        (Footwork, -2),
                        (Defense, -1),
                    ],
                ),
            ],
            profile: AgingProfileRules::default(),
        }
    }
}

/// Retirement probability by age
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementAgeBand {
    pub min_age: u32,
    pub max_age: u32,
    pub base_chance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetirementPerformance {
    pub sample_fights_min: u32,
    pub win_rate_low: f64,
    pub win_rate_mid: f64,
    pub win_rate_high: f64,
    pub win_rate_elite: f64,
    pub mod_low: f64,
    pub mod_mid: f64,
    pub mod_high: f64,
    pub mod_elite: f64,
    pub recent_window: usize,
    pub recent_loss_streak_step: f64,
    pub recent_no_win_bonus: f64,
    pub injury_threshold: u32,
    pub injury_per_point: f64,
    pub fatigue_threshold: u32,
    pub fatigue_per_point: f64,
    pub champion_protection: f64,
    pub top_rank_cutoff: usize,
    pub top_rank_protection_per_step: f64,
    pub early_career_fights: u32,
    pub early_career_protection: f64,
    pub early_career_age_limit: u32,
}

impl Default for RetirementPerformance {
    fn default() -> Self {
        Self {
            sample_fights_min: 8,
            win_rate_low: 0.4,
            win_rate_mid: 0.55,
            win_rate_high: 0.7,
            win_rate_elite: 0.85,
            mod_low: 0.05,
            mod_mid: 0.02,
            mod_high: -0.01,
            mod_elite: -0.02,
            recent_window: 4,
            recent_loss_streak_step: 0.02,
            recent_no_win_bonus: 0.03,
            injury_threshold: 40,
            injury_per_point: 0.001,
            fatigue_threshold: 6,
            fatigue_per_point: 0.005,
            champion_protection: 0.03,
            top_rank_cutoff: 5,
            top_rank_protection_per_step: 0.004,
            early_career_fights: 6,
            early_career_protection: 0.02,
            early_career_age_limit: 35,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetirementModel {
    /// No retirement roll happens below this age
    pub min_age: u32,
    /// Retirement is forced at or above this age
    pub hard_age_cap: u32,
    /// Added per year past the boxer's peak age
    pub past_peak_step: f64,
    pub age_bands: Vec<RetirementAgeBand>,
    pub chance_min: f64,
    pub chance_max: f64,
    pub performance: RetirementPerformance,
}

impl Default for RetirementModel {
    fn default() -> Self {
        let band = |min_age, max_age, base_chance| RetirementAgeBand {
            min_age,
            max_age,
            base_chance,
        };
        Self {
            min_age: 33,
            hard_age_cap: 45,
            past_peak_step: 0.002,
            age_bands: vec![
                band(33, 34, 0.004),
                band(35, 36, 0.01),
                band(37, 38, 0.025),
                band(39, 40, 0.05),
                band(41, 44, 0.09),
            ],
            chance_min: 0.0,
            chance_max: 0.6,
            performance: RetirementPerformance::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperienceLevel {
    pub name: String,
    pub min_points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceModel {
    pub levels: Vec<ExperienceLevel>,
    pub fight_bonus_per_level: f64,
    pub max_fight_bonus: f64,
    pub base_points_amateur: u32,
    pub base_points_pro: u32,
    pub win_points: u32,
    pub draw_points: u32,
    pub loss_points: u32,
    pub ko_bonus: u32,
    /// Points per opponent rating point above 50
    pub rating_bonus_scale: f64,
    pub max_gain_per_fight: u32,
}

impl Default for ExperienceModel {
    fn default() -> Self {
        let level = |name: &str, min_points| ExperienceLevel {
            name: name.to_string(),
            min_points,
        };
        Self {
            levels: vec![
                level("newcomer", 0),
                level("prospect", 40),
                level("seasoned", 120),
                level("veteran", 260),
                level("elite", 480),
                level("legend", 800),
            ],
            fight_bonus_per_level: 0.6,
            max_fight_bonus: 3.0,
            base_points_amateur: 4,
            base_points_pro: 8,
            win_points: 4,
            draw_points: 2,
            loss_points: 1,
            ko_bonus: 2,
            rating_bonus_scale: 0.1,
            max_gain_per_fight: 30,
        }
    }
}

/// Maps a P4P position to a seeded organization rank range
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeedBand {
    pub max_p4p_rank: usize,
    pub min_rank: usize,
    pub max_rank: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DivisionChangeRules {
    pub min_pro_fights_for_seed: u32,
    pub seed_bands: Vec<SeedBand>,
    /// Ranks added to the seed when moving to a lighter division
    pub down_move_rank_penalty: usize,
    pub seed_jitter: i32,
    pub down_fatigue_cost: u32,
    pub down_injury_cost: u32,
    pub up_fatigue_cost: u32,
    pub up_injury_cost: u32,
}

impl Default for DivisionChangeRules {
    fn default() -> Self {
        let band = |max_p4p_rank, min_rank, max_rank| SeedBand {
            max_p4p_rank,
            min_rank,
            max_rank,
        };
        Self {
            min_pro_fights_for_seed: 2,
            seed_bands: vec![
                band(3, 2, 3),
                band(8, 3, 5),
                band(15, 5, 7),
                band(25, 7, 9),
                band(40, 9, 11),
                band(60, 11, 13),
            ],
            down_move_rank_penalty: 2,
            seed_jitter: 1,
            down_fatigue_cost: 5,
            down_injury_cost: 14,
            up_fatigue_cost: 2,
            up_injury_cost: 4,
        }
    }
}

/// Bounds and monthly recovery for fatigue and injury risk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WearLimits {
    pub max_fatigue: u32,
    pub max_injury_risk: u32,
    pub monthly_fatigue_recovery: u32,
    pub monthly_injury_recovery: u32,
    /// Boxers at or above this injury risk cannot take a unification bout
    pub unavailable_injury_risk: u32,
}

impl Default for WearLimits {
    fn default() -> Self {
        Self {
            max_fatigue: 12,
            max_injury_risk: 100,
            monthly_fatigue_recovery: 2,
            monthly_injury_recovery: 3,
            unavailable_injury_risk: 85,
        }
    }
}

/// NPC population generated when the player turns pro
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterRules {
    pub contenders_per_division: usize,
    pub top_rating: f64,
    pub rating_step: f64,
    pub rating_jitter: i32,
    pub min_age: u32,
    pub max_age: u32,
}

impl Default for RosterRules {
    fn default() -> Self {
        Self {
            contenders_per_division: 20,
            top_rating: 94.0,
            rating_step: 1.4,
            rating_jitter: 2,
            min_age: 21,
            max_age: 36,
        }
    }
}

/// Complete rule set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub weight_classes: Vec<WeightClass>,
    pub organizations: Vec<OrganizationConfig>,
    pub amateur: FightModel,
    pub pro: FightModel,
    pub ranking: RankingRules,
    pub amateur_progression: AmateurProgression,
    pub pro_progression: ProProgression,
    pub sanctioning: SanctioningPolicy,
    pub world: WorldPolicy,
    pub aging: AgingModel,
    pub retirement: RetirementModel,
    pub experience: ExperienceModel,
    pub division_change: DivisionChangeRules,
    pub wear: WearLimits,
    pub roster: RosterRules,
}

impl Default for RulesConfig {
    fn default() -> Self {
        let class = |name: &str, min_lbs, max_lbs| WeightClass {
            name: name.to_string(),
            min_lbs,
            max_lbs,
        };
        let org = |name: &str| OrganizationConfig {
            name: name.to_string(),
            ranking_slots: 15,
            sanctioning_weight: 1.0,
        };
        Self {
            weight_classes: vec![
                class("flyweight", 100, 112),
                class("bantamweight", 113, 118),
                class("featherweight", 119, 126),
                class("lightweight", 127, 135),
                class("welterweight", 136, 147),
                class("middleweight", 148, 160),
                class("light_heavyweight", 161, 175),
                class("heavyweight", 176, 300),
            ],
            organizations: vec![org("WBC"), org("WBA"), org("IBF"), org("WBO")],
            amateur: FightModel::amateur(),
            pro: FightModel::pro(),
            ranking: RankingRules::default(),
            amateur_progression: AmateurProgression::default(),
            pro_progression: ProProgression::default(),
            sanctioning: SanctioningPolicy::default(),
            world: WorldPolicy::default(),
            aging: AgingModel::default(),
            retirement: RetirementModel::default(),
            experience: ExperienceModel::default(),
            division_change: DivisionChangeRules::default(),
            wear: WearLimits::default(),
            roster: RosterRules::default(),
        }
    }
}

impl RulesConfig {
    /// Parse a TOML rule set. Missing sections fall back to defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RulesConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn fight_model(&self, kind: BoutKind) -> &FightModel {
        match kind {
            BoutKind::Amateur => &self.amateur,
            BoutKind::Pro => &self.pro,
        }
    }

    /// Amateur tier for a boxer with `fights` amateur bouts behind them
    pub fn amateur_tier(&self, fights: u32) -> Result<&AmateurTier> {
        let tiers = &self.amateur_progression.tiers;
        tiers
            .iter()
            .find(|t| (t.min_fights..=t.max_fights).contains(&fights))
            .or_else(|| tiers.last())
            .ok_or_else(|| CareerError::Config("no amateur tiers configured".into()))
    }

    /// Pro tier for a boxer with `fights` pro bouts behind them
    pub fn pro_tier(&self, fights: u32) -> Result<&ProTier> {
        let tiers = &self.pro_progression.tiers;
        tiers
            .iter()
            .find(|t| (t.min_fights..=t.max_fights).contains(&fights))
            .or_else(|| tiers.last())
            .ok_or_else(|| CareerError::Config("no pro tiers configured".into()))
    }

    pub fn organization(&self, name: &str) -> Result<&OrganizationConfig> {
        self.organizations
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| CareerError::UnknownOrganization(name.to_string()))
    }

    pub fn ranking_slots(&self, organization: &str) -> Result<usize> {
        Ok(self.organization(organization)?.ranking_slots)
    }

    pub fn organization_names(&self) -> impl Iterator<Item = &str> {
        self.organizations.iter().map(|o| o.name.as_str())
    }

    pub fn division_names(&self) -> impl Iterator<Item = &str> {
        self.weight_classes.iter().map(|w| w.name.as_str())
    }

    /// Position of a division in the lightest-first ordering
    pub fn division_index(&self, division: &str) -> Result<usize> {
        self.weight_classes
            .iter()
            .position(|w| w.name == division)
            .ok_or_else(|| CareerError::UnknownDivision(division.to_string()))
    }

    /// Divisions reachable in one move (lighter first)
    pub fn adjacent_divisions(&self, division: &str) -> Result<Vec<&str>> {
        let idx = self.division_index(division)?;
        let mut moves = Vec::new();
        if idx > 0 {
            moves.push(self.weight_classes[idx - 1].name.as_str());
        }
        if let Some(heavier) = self.weight_classes.get(idx + 1) {
            moves.push(heavier.name.as_str());
        }
        Ok(moves)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.organizations.is_empty() {
            return Err(CareerError::Config("at least one organization is required".into()));
        }
        if self.weight_classes.is_empty() {
            return Err(CareerError::Config("at least one weight class is required".into()));
        }

        let mut seen = BTreeSet::new();
        for org in &self.organizations {
            if !seen.insert(org.name.as_str()) {
                return Err(CareerError::Config(format!("duplicate organization {}", org.name)));
            }
            if org.ranking_slots < 3 {
                return Err(CareerError::Config(format!(
                    "{} ranking_slots ({}) must be >= 3",
                    org.name, org.ranking_slots
                )));
            }
            if org.sanctioning_weight < 0.0 {
                return Err(CareerError::Config(format!(
                    "{} sanctioning_weight must be >= 0",
                    org.name
                )));
            }
        }

        let mut seen = BTreeSet::new();
        for class in &self.weight_classes {
            if !seen.insert(class.name.as_str()) {
                return Err(CareerError::Config(format!("duplicate division {}", class.name)));
            }
            if class.min_lbs > class.max_lbs {
                return Err(CareerError::Config(format!("{} has inverted limits", class.name)));
            }
        }

        for (label, model) in [("amateur", &self.amateur), ("pro", &self.pro)] {
            if model.max_rounds == 0 {
                return Err(CareerError::Config(format!("{} max_rounds must be >= 1", label)));
            }
            if model.judges == 0 {
                return Err(CareerError::Config(format!("{} needs at least one judge", label)));
            }
            if model.swing_factor < 0.0 || model.judge_noise < 0.0 {
                return Err(CareerError::Config(format!("{} noise must be >= 0", label)));
            }
            if model.style_weights.values().sum::<f64>() <= 0.0 {
                return Err(CareerError::Config(format!("{} style weights sum to zero", label)));
            }
            check_probability(&format!("{} base_stoppage_chance", label), model.base_stoppage_chance)?;
            check_probability(&format!("{} max_stoppage_chance", label), model.max_stoppage_chance)?;
        }

        let world = &self.world;
        for (label, value) in [
            ("title_fight_probability", world.title_fight_probability),
            ("title_upset_probability", world.title_upset_probability),
            ("draw_probability", world.draw_probability),
            ("npc_stoppage_probability", world.npc_stoppage_probability),
            ("defense_news_probability", world.defense_news_probability),
            ("ambient_reshuffle_probability", world.ambient_reshuffle_probability),
            ("lineal_unification_probability", world.lineal_unification_probability),
            ("drift_up_probability_cap", world.drift_up_probability_cap),
            ("drift_down_probability", world.drift_down_probability),
            ("top_window_probability", self.sanctioning.top_window_probability),
            ("elite_probability", self.sanctioning.elite_probability),
            ("rank_gap_probability", self.sanctioning.rank_gap_probability),
            ("single_ranked_probability", self.sanctioning.single_ranked_probability),
            ("npc_split_decision_share", world.npc_split_decision_share),
        ] {
            check_probability(label, value)?;
        }
        if world.drift_up_step_min == 0 || world.drift_up_step_min > world.drift_up_step_max {
            return Err(CareerError::Config("drift_up_step range is invalid".into()));
        }

        for band in &self.retirement.age_bands {
            if band.min_age > band.max_age {
                return Err(CareerError::Config(format!(
                    "retirement band {}..{} is inverted",
                    band.min_age, band.max_age
                )));
            }
        }
        if self.retirement.chance_min > self.retirement.chance_max {
            return Err(CareerError::Config("retirement chance bounds are inverted".into()));
        }
        for bracket in &self.aging.age_brackets {
            if bracket.min_age > bracket.max_age {
                return Err(CareerError::Config(format!(
                    "age bracket {}..{} is inverted",
                    bracket.min_age, bracket.max_age
                )));
            }
        }
        if self.aging.stat_min > self.aging.stat_max {
            return Err(CareerError::Config("aging stat limits are inverted".into()));
        }

        let max_slots = self.organizations.iter().map(|o| o.ranking_slots).max().unwrap_or(0);
        if self.roster.contenders_per_division < max_slots {
            return Err(CareerError::Config(format!(
                "contenders_per_division ({}) must cover the largest ranking ({})",
                self.roster.contenders_per_division, max_slots
            )));
        }
        let roster = &self.roster;
        if roster.min_age > roster.max_age {
            return Err(CareerError::Config(format!(
                "roster ages {}..={} are inverted",
                roster.min_age, roster.max_age
            )));
        }
        if roster.rating_jitter < 0 || roster.rating_step < 0.0 {
            return Err(CareerError::Config("roster rating_jitter and rating_step must be >= 0".into()));
        }

        check_ranking_steps("top-level", &self.ranking)?;
        self.validate_progression()?;
        self.validate_division_change(max_slots)
    }

    fn validate_progression(&self) -> Result<()> {
        let amateur = &self.amateur_progression;
        if amateur.tiers.is_empty() {
            return Err(CareerError::Config("at least one amateur tier is required".into()));
        }
        for tier in &amateur.tiers {
            check_tier(
                &tier.name,
                (tier.min_fights, tier.max_fights),
                (tier.opponent_rating_min, tier.opponent_rating_max),
                tier.rounds,
                self.amateur.max_rounds,
            )?;
        }

        let pro = &self.pro_progression;
        if pro.tiers.is_empty() {
            return Err(CareerError::Config("at least one pro tier is required".into()));
        }
        for tier in &pro.tiers {
            check_tier(
                &tier.name,
                (tier.min_fights, tier.max_fights),
                (tier.opponent_rating_min, tier.opponent_rating_max),
                tier.rounds,
                self.pro.max_rounds,
            )?;
            check_ranking_steps(&tier.name, &tier.ranking)?;
        }
        Ok(())
    }

    fn validate_division_change(&self, max_slots: usize) -> Result<()> {
        let rules = &self.division_change;
        if rules.seed_jitter < 0 {
            return Err(CareerError::Config("seed_jitter must be >= 0".into()));
        }
        for band in &rules.seed_bands {
            if band.min_rank == 0 || band.min_rank > band.max_rank {
                return Err(CareerError::Config(format!(
                    "seed band {}..={} is invalid",
                    band.min_rank, band.max_rank
                )));
            }
            if band.max_rank + rules.down_move_rank_penalty > max_slots {
                return Err(CareerError::Config(format!(
                    "seed band up to {} plus down-move penalty {} exceeds every ranking ({} slots)",
                    band.max_rank, rules.down_move_rank_penalty, max_slots
                )));
            }
        }
        Ok(())
    }
}

fn check_ranking_steps(name: &str, steps: &RankingRules) -> Result<()> {
    if steps.unranked_entry_rank == 0 {
        return Err(CareerError::Config(format!("{} unranked_entry_rank must be >= 1", name)));
    }
    Ok(())
}

fn check_tier(name: &str, fights: (u32, u32), rating: (i32, i32), rounds: u32, max_rounds: u32) -> Result<()> {
    if fights.0 > fights.1 {
        return Err(CareerError::Config(format!("tier {} fight range is inverted", name)));
    }
    if rating.0 > rating.1 {
        return Err(CareerError::Config(format!(
            "tier {} opponent ratings {}..={} are inverted",
            name, rating.0, rating.1
        )));
    }
    if rounds == 0 || rounds > max_rounds {
        return Err(CareerError::Config(format!(
            "tier {} rounds ({}) must be within 1..={}",
            name, rounds, max_rounds
        )));
    }
    Ok(())
}

fn check_probability(label: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CareerError::Config(format!("{} ({}) must be within [0, 1]", label, value)))
    }
}

/// Load a rule set from a TOML file
pub fn load_rules(path: &Path) -> Result<RulesConfig> {
    let content = fs::read_to_string(path)?;
    RulesConfig::from_toml_str(&content)
}

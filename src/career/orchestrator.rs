//! Career orchestrator
//!
//! The single writer of `CareerState`. Two external triggers drive it: a
//! fight request and the monthly calendar advance. Every step runs against a
//! staged copy of the state and the random source and is committed only when
//! the whole step succeeds, so a failed step leaves both untouched and a
//! fixed seed replays a career exactly.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::aging::profile::generate_aging_profile;
use crate::aging::progression::{apply_birthday, StatChange};
use crate::aging::retirement::{evaluate_retirement, RetirementContext, RetirementEvaluation};
use crate::career::boxer::{ActivityStatus, Boxer, Stats};
use crate::career::division::{plan_division_change, DivisionMovePlan};
use crate::career::experience::{experience_profile, fight_experience_gain};
use crate::career::ledger::{BoutSteps, LedgerReport, TitleEvent};
use crate::career::p4p::{p4p_position, p4p_ranking, p4p_snapshot, P4PEntry};
use crate::career::rating::overall_rating;
use crate::career::sanctioning::determine_sanctioning;
use crate::career::state::{CareerState, FightHistoryEntry, ParticipantUpdate, RankingSnapshot, RetirementRecord};
use crate::core::config::RulesConfig;
use crate::core::error::{CareerError, Result};
use crate::core::types::{BoutKind, BoxerId, CareerMonth};
use crate::fight::aftermath::post_fight_impact;
use crate::fight::resolution::{resolve_fight, Competitor, Outcome};
use crate::world::events::WorldEvent;
use crate::world::simulation::{is_available, simulate_month, PlayerContext};

/// Contenders at or above this focus rank are offered the champion
const TITLE_SHOT_RANK: usize = 3;
/// Ranked opponents are drawn from this many places above and below the player
const OPPONENT_WINDOW_ABOVE: usize = 3;
const OPPONENT_WINDOW_BELOW: usize = 2;
/// Chance an unranked pro is matched with a bottom-ranked contender instead of a journeyman
const UNRANKED_VS_RANKED_CHANCE: f64 = 0.35;

/// Creation input. Validated by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBoxer {
    pub name: String,
    pub age: u32,
    pub height_inches: u32,
    pub weight_lbs: u32,
    pub division: String,
    pub stats: Stats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightRequest {
    pub red: BoxerId,
    pub blue: BoxerId,
    /// Falls back to the progression tier's distance
    pub rounds: Option<u32>,
    pub kind: BoutKind,
    /// Requesting body for pro bouts; the focus organization when unset
    pub organization: Option<String>,
}

impl FightRequest {
    pub fn new(red: BoxerId, blue: BoxerId, kind: BoutKind) -> Self {
        Self {
            red,
            blue,
            rounds: None,
            kind,
            organization: None,
        }
    }

    pub fn rounds(mut self, rounds: u32) -> Self {
        self.rounds = Some(rounds);
        self
    }

    pub fn under(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthReport {
    pub career_month: CareerMonth,
    pub birthday: bool,
    pub stat_changes: Vec<StatChange>,
    pub retirement: Option<RetirementEvaluation>,
    /// Belts and lineal titles vacated by a retirement this month
    pub vacated: Vec<TitleEvent>,
    pub world_events: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionChangeReport {
    pub plan: DivisionMovePlan,
    pub p4p_rank: Option<usize>,
    pub ledger: LedgerReport,
}

/// Where the player stands against the pro gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProReadinessStatus {
    pub age: u32,
    pub min_age: u32,
    pub fights: u32,
    pub min_fights: u32,
    pub points: u32,
    pub min_points: u32,
}

impl ProReadinessStatus {
    fn of(boxer: &Boxer, config: &RulesConfig) -> Self {
        let gate = &config.amateur_progression.pro_readiness;
        Self {
            age: boxer.age,
            min_age: gate.min_age,
            fights: boxer.amateur_record.total(),
            min_fights: gate.min_fights,
            points: boxer.amateur_points,
            min_points: gate.min_points,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.age >= self.min_age && self.fights >= self.min_fights && self.points >= self.min_points
    }
}

/// Scheduled distance for a boxer at their current tier
fn tier_rounds(config: &RulesConfig, boxer: &Boxer, kind: BoutKind) -> Result<u32> {
    Ok(match kind {
        BoutKind::Amateur => config.amateur_tier(boxer.amateur_record.total())?.rounds,
        BoutKind::Pro => config.pro_tier(boxer.pro_record.total())?.rounds,
    })
}

/// Everything needed to resume a career exactly where it stopped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerSave {
    pub rng: ChaCha8Rng,
    pub state: CareerState,
}

#[derive(Debug, Clone)]
pub struct Career {
    config: RulesConfig,
    rng: ChaCha8Rng,
    state: CareerState,
}

fn active_player(state: &CareerState) -> Result<&Boxer> {
    let player = state.player()?;
    if !player.is_active() {
        return Err(CareerError::BoxerRetired(player.id));
    }
    Ok(player)
}

fn focus_organization(config: &RulesConfig, state: &CareerState) -> Result<String> {
    match &state.focus_organization {
        Some(org) => Ok(org.clone()),
        None => config
            .organization_names()
            .next()
            .map(str::to_string)
            .ok_or_else(|| CareerError::Config("no organizations configured".into())),
    }
}

impl Career {
    /// Start a new career. The player begins as an amateur.
    pub fn new(config: RulesConfig, seed: u64, boxer: NewBoxer) -> Result<Self> {
        config.validate()?;
        config.division_index(&boxer.division)?;
        let name = boxer.name.trim();
        if name.is_empty() {
            return Err(CareerError::InvalidRequest("boxer name is empty".into()));
        }

        let mut player = Boxer::new(BoxerId(0), name, boxer.age, boxer.division, boxer.stats);
        player.height_inches = boxer.height_inches;
        player.weight_lbs = boxer.weight_lbs;
        player.aging = generate_aging_profile(&config.aging.profile, name, boxer.height_inches, boxer.weight_lbs);

        tracing::info!(
            name,
            division = %player.division,
            peak_age = player.aging.peak_age,
            decline_onset_age = player.aging.decline_onset_age,
            "career started"
        );
        Ok(Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            state: CareerState::new(player)?,
        })
    }

    pub fn from_save(config: RulesConfig, save: CareerSave) -> Result<Self> {
        config.validate()?;
        save.state.player()?;
        save.state.ledger.validate()?;
        Ok(Self {
            config,
            rng: save.rng,
            state: save.state,
        })
    }

    pub fn to_save(&self) -> CareerSave {
        CareerSave {
            rng: self.rng.clone(),
            state: self.state.clone(),
        }
    }

    pub fn save_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_save())?)
    }

    pub fn load_json(config: RulesConfig, json: &str) -> Result<Self> {
        Self::from_save(config, serde_json::from_str(json)?)
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn state(&self) -> &CareerState {
        &self.state
    }

    pub fn player(&self) -> Result<&Boxer> {
        self.state.player()
    }

    /// Run one step against staged copies; commit only on success
    fn transact<T>(
        &mut self,
        step: impl FnOnce(&RulesConfig, &mut CareerState, &mut ChaCha8Rng) -> Result<T>,
    ) -> Result<T> {
        let mut state = self.state.clone();
        let mut rng = self.rng.clone();
        let output = step(&self.config, &mut state, &mut rng)?;
        self.state = state;
        self.rng = rng;
        Ok(output)
    }

    pub fn pro_readiness(&self) -> Result<ProReadinessStatus> {
        Ok(ProReadinessStatus::of(self.state.player()?, &self.config))
    }

    /// Move the player to the pro ranks once the amateur gate is met.
    /// Rankings are generated for every division the world simulates, and
    /// the player enters unranked.
    pub fn turn_pro(&mut self) -> Result<()> {
        self.transact(|config, state, rng| {
            let player = active_player(state)?;
            if player.is_pro() {
                return Err(CareerError::InvalidRequest(format!("{} is already pro", player.id)));
            }
            let readiness = ProReadinessStatus::of(player, config);
            if !readiness.is_ready() {
                return Err(CareerError::InvalidRequest(format!(
                    "{} is not ready to turn pro: age {}/{}, bouts {}/{}, points {}/{}",
                    player.id,
                    readiness.age,
                    readiness.min_age,
                    readiness.fights,
                    readiness.min_fights,
                    readiness.points,
                    readiness.min_points
                )));
            }
            let home = player.division.clone();

            let divisions: Vec<String> = if config.world.simulate_all_divisions {
                config.division_names().map(str::to_string).collect()
            } else {
                vec![home.clone()]
            };
            for division in &divisions {
                if state.ledger.division(division).is_none() {
                    state.roster.populate_division(config, &mut state.ledger, division, rng)?;
                }
            }

            let month = state.calendar.career_months();
            state.player_mut()?.stage = BoutKind::Pro;
            state.pro_debut_month = Some(month);
            if state.focus_organization.is_none() {
                state.focus_organization = Some(focus_organization(config, state)?);
            }
            tracing::info!(division = %home, month, "turned pro");
            Ok(())
        })
    }

    pub fn set_focus_organization(&mut self, organization: &str) -> Result<()> {
        self.config.organization(organization)?;
        self.state.focus_organization = Some(organization.to_string());
        Ok(())
    }

    /// Staff upgrades are bought outside the engine; only the level is tracked here
    pub fn set_staff_level(&mut self, level: u32) {
        self.state.staff.level = level;
    }

    /// Find or create a suitable opponent for the player's next bout
    pub fn generate_opponent(&mut self) -> Result<BoxerId> {
        self.transact(|config, state, rng| {
            let player = active_player(state)?;
            let player_id = player.id;
            let division = player.division.clone();

            if !player.is_pro() {
                let tier = config.amateur_tier(player.amateur_record.total())?;
                let target = rng.gen_range(tier.opponent_rating_min..=tier.opponent_rating_max);
                tracing::debug!(tier = %tier.name, rating = target, "amateur opponent drawn");
                return state.roster.spawn_npc(config, &division, target, BoutKind::Amateur, rng);
            }
            let tier = config.pro_tier(player.pro_record.total())?;
            let journeyman = tier.opponent_rating_min..=tier.opponent_rating_max;

            let organization = focus_organization(config, state)?;
            let pick = {
                let ranking = state.ledger.ranking(&organization, &division)?;
                let roster = &state.roster;
                let bookable = |id: BoxerId| id != player_id && is_available(config, roster, id);
                match ranking.rank_of(player_id) {
                    Some(_) if ranking.champion == Some(player_id) => {
                        ranking.entries().iter().copied().find(|id| bookable(*id))
                    }
                    Some(rank) if rank <= TITLE_SHOT_RANK => match ranking.champion {
                        Some(champion) if bookable(champion) => Some(champion),
                        _ => ranking.entries().iter().take(TITLE_SHOT_RANK).copied().find(|id| bookable(*id)),
                    },
                    Some(rank) => {
                        let low = rank.saturating_sub(OPPONENT_WINDOW_ABOVE).max(1);
                        let high = (rank + OPPONENT_WINDOW_BELOW).min(ranking.len());
                        let window: Vec<BoxerId> = (low..=high)
                            .filter_map(|r| ranking.at_rank(r))
                            .filter(|id| Some(*id) != ranking.champion && bookable(*id))
                            .collect();
                        (!window.is_empty()).then(|| window[rng.gen_range(0..window.len())])
                    }
                    None if rng.gen::<f64>() < UNRANKED_VS_RANKED_CHANCE => {
                        let bottom: Vec<BoxerId> =
                            ranking.entries().iter().rev().take(3).copied().filter(|id| bookable(*id)).collect();
                        (!bottom.is_empty()).then(|| bottom[rng.gen_range(0..bottom.len())])
                    }
                    None => None,
                }
            };

            match pick {
                Some(id) => Ok(id),
                None => {
                    let rating = rng.gen_range(journeyman);
                    let id = state.roster.spawn_npc(config, &division, rating, BoutKind::Pro, rng)?;
                    tracing::debug!(boxer = %id, rating, "journeyman signed");
                    Ok(id)
                }
            }
        })
    }

    /// Resolve a scheduled bout and commit every consequence at once
    pub fn schedule_fight(&mut self, request: FightRequest) -> Result<FightHistoryEntry> {
        self.transact(|config, state, rng| {
            let kind = request.kind;
            let model = config.fight_model(kind);
            if request.red == request.blue {
                return Err(CareerError::InvalidRequest(format!("{} cannot fight themselves", request.red)));
            }

            let red = state.roster.get(request.red)?;
            let blue = state.roster.get(request.blue)?;
            for boxer in [red, blue] {
                if !boxer.is_active() {
                    return Err(CareerError::BoxerRetired(boxer.id));
                }
                if boxer.stage != kind {
                    return Err(match kind {
                        BoutKind::Pro => CareerError::NotProfessional(boxer.id),
                        BoutKind::Amateur => CareerError::InvalidRequest(format!("{} has turned pro", boxer.id)),
                    });
                }
            }
            if red.division != blue.division {
                return Err(CareerError::InvalidRequest(format!(
                    "{} ({}) and {} ({}) are in different divisions",
                    red.id, red.division, blue.id, blue.division
                )));
            }
            let division = red.division.clone();

            let rounds = match request.rounds {
                Some(rounds) => rounds,
                None => {
                    let headliner = if blue.id == state.player { blue } else { red };
                    tier_rounds(config, headliner, kind)?
                }
            };
            if rounds == 0 || rounds > model.max_rounds {
                return Err(CareerError::InvalidRounds {
                    rounds,
                    max: model.max_rounds,
                });
            }

            let primary = match kind {
                BoutKind::Pro => {
                    let organization = match &request.organization {
                        Some(org) => org.clone(),
                        None => focus_organization(config, state)?,
                    };
                    config.organization(&organization)?;
                    state.ledger.ranking(&organization, &division)?.validate()?;
                    Some(organization)
                }
                BoutKind::Amateur => None,
            };

            let bonus = |boxer: &Boxer| experience_profile(boxer.experience_points, &config.experience).fight_bonus;
            let red_side = Competitor::from_boxer(red, bonus(red));
            let blue_side = Competitor::from_boxer(blue, bonus(blue));
            let ratings = [
                (red.id, overall_rating(red, config)),
                (blue.id, overall_rating(blue, config)),
            ];
            let steps = match kind {
                BoutKind::Pro => Some(BoutSteps {
                    red: config.pro_tier(red.pro_record.total())?.ranking.clone(),
                    blue: config.pro_tier(blue.pro_record.total())?.ranking.clone(),
                }),
                BoutKind::Amateur => None,
            };

            let result = resolve_fight(&red_side, &blue_side, model, kind, rounds, rng)?;

            let (sanctioning, ledger) = match (&primary, &steps) {
                (Some(primary), Some(steps)) => {
                    let roster = &state.roster;
                    let available = |id: BoxerId| is_available(config, roster, id);
                    let record = determine_sanctioning(
                        config,
                        &state.ledger,
                        &division,
                        primary,
                        result.red,
                        result.blue,
                        available,
                        rng,
                    )?;
                    let report = state.ledger.apply_bout_with(
                        config,
                        &result,
                        &division,
                        primary,
                        &record.bodies,
                        steps,
                        available,
                    )?;
                    (Some(record), Some(report))
                }
                _ => (None, None),
            };

            let mut participants = Vec::with_capacity(2);
            for (id, rating_before) in ratings {
                let outcome = result.outcome_for(id).ok_or(CareerError::UnknownBoxer(id))?;
                let opponent_rating = ratings
                    .iter()
                    .find(|(other, _)| *other != id)
                    .map(|(_, rating)| *rating)
                    .unwrap_or(rating_before);
                let stoppage_win = result.is_stoppage() && outcome == Outcome::Win;
                let impact = post_fight_impact(&model.aftermath, &result, id)?;
                let experience_gain =
                    fight_experience_gain(&config.experience, kind, outcome, stoppage_win, opponent_rating);

                let boxer = state.roster.get_mut(id)?;
                let points_before = boxer.amateur_points;
                if kind == BoutKind::Amateur {
                    let points = config.amateur_tier(boxer.amateur_record.total())?.points;
                    boxer.award_amateur_points(&points, outcome, stoppage_win);
                }
                boxer.record_result(kind, outcome, stoppage_win);
                boxer.apply_wear(impact.fatigue_gain, impact.injury_risk_gain, &config.wear);
                boxer.experience_points += experience_gain;
                participants.push(ParticipantUpdate {
                    boxer: id,
                    impact,
                    experience_gain,
                    amateur_points: boxer.amateur_points - points_before,
                    rating_before,
                });
            }

            let month = state.calendar.career_months();
            if result.involves(state.player) {
                state.last_player_fight_month = Some(month);
                state.divisions_fought.insert(division.clone());
            }

            tracing::info!(
                red = %result.red,
                blue = %result.blue,
                winner = ?result.winner,
                method = result.method.abbreviation(),
                rounds = result.rounds_completed,
                kind = %kind,
                "bout resolved"
            );

            let entry = FightHistoryEntry {
                career_month: month,
                division,
                result,
                sanctioning,
                ledger,
                participants,
            };
            state.history.push(entry.clone());
            Ok(entry)
        })
    }

    /// Close the current month: world simulation, recovery, then the
    /// calendar tick with aging and the retirement roll
    pub fn advance_month(&mut self) -> Result<MonthReport> {
        self.transact(|config, state, rng| {
            let closing = state.calendar.career_months();
            let player_id = state.player;
            let player = state.player()?;
            let division = player.division.clone();
            let in_world = player.is_active() && player.is_pro();
            let idle_months = state.idle_months();

            let world_events = if state.pro_debut_month.is_some() {
                let context = in_world.then_some(PlayerContext {
                    id: player_id,
                    division: &division,
                    idle_months,
                });
                simulate_month(
                    config,
                    &mut state.roster,
                    &mut state.ledger,
                    &mut state.world_log,
                    closing,
                    context,
                    rng,
                )?
            } else {
                0
            };

            for boxer in state.roster.iter_mut().filter(|b| b.is_active()) {
                boxer.recover(&config.wear);
            }

            let birthday = state.calendar.advance();
            let month = state.calendar.career_months();
            let mut report = MonthReport {
                career_month: month,
                birthday,
                stat_changes: Vec::new(),
                retirement: None,
                vacated: Vec::new(),
                world_events,
            };

            if state.player()?.is_active() {
                if birthday {
                    let staff = state.staff.clone();
                    report.stat_changes = apply_birthday(state.player_mut()?, &config.aging, &staff);
                }

                let context = RetirementContext {
                    is_lineal_champion: state.ledger.is_lineal_holder(player_id),
                    best_rank: state.ledger.best_rank(&division, player_id),
                };
                let player = state.roster.get_mut(player_id)?;
                let evaluation = evaluate_retirement(player, &config.retirement, &context, rng);
                let retired = match &player.status {
                    ActivityStatus::Retired { age, reason } if evaluation.newly_retired => {
                        Some((*age, reason.clone(), player.amateur_record, player.pro_record))
                    }
                    _ => None,
                };

                if let Some((age, reason, amateur_record, pro_record)) = retired {
                    report.vacated = state.ledger.withdraw_boxer(player_id)?;
                    state.retirement = Some(RetirementRecord {
                        career_month: month,
                        age,
                        reason,
                        amateur_record,
                        pro_record,
                        vacated: report.vacated.clone(),
                    });
                }
                report.retirement = Some(evaluation);
            }

            Ok(report)
        })
    }

    /// Move the player to an adjacent weight class
    pub fn change_division(&mut self, to: &str) -> Result<DivisionChangeReport> {
        self.transact(|config, state, rng| {
            let player = active_player(state)?;
            if !player.is_pro() {
                return Err(CareerError::NotProfessional(player.id));
            }
            let from = player.division.clone();
            let pro_fights = player.pro_record.total();

            let factors = state.strength_factors()?;
            let ranking = p4p_ranking(&state.roster, config, &state.ledger, Some((state.player, &factors)));
            let p4p_rank = p4p_position(&ranking, state.player);
            let plan = plan_division_change(config, &from, to, p4p_rank, pro_fights, rng)?;

            if state.ledger.division(to).is_none() {
                state.roster.populate_division(config, &mut state.ledger, to, rng)?;
            }
            let report = state.ledger.change_division(config, state.player, &from, to, &plan.seeds)?;

            let class = &config.weight_classes[config.division_index(to)?];
            let player = state.player_mut()?;
            player.division = to.to_string();
            player.weight_lbs = player.weight_lbs.clamp(class.min_lbs, class.max_lbs);
            player.apply_wear(plan.fatigue_cost, plan.injury_cost, &config.wear);
            state.division_changes += 1;
            state.divisions_fought.insert(to.to_string());

            tracing::info!(
                from = %from,
                to,
                direction = ?plan.direction,
                p4p_rank = ?p4p_rank,
                seeds = ?plan.seeds,
                "division changed"
            );
            Ok(DivisionChangeReport {
                plan,
                p4p_rank,
                ledger: report,
            })
        })
    }

    pub fn ranking_snapshot(&self, organization: &str, division: &str) -> Result<RankingSnapshot> {
        self.state.ranking_snapshot(&self.config, organization, division)
    }

    /// Full P4P list; the player is scored with their own career factors
    pub fn p4p_ranking(&self) -> Result<Vec<P4PEntry>> {
        let factors = self.state.strength_factors()?;
        Ok(p4p_ranking(
            &self.state.roster,
            &self.config,
            &self.state.ledger,
            Some((self.state.player, &factors)),
        ))
    }

    pub fn p4p_snapshot(&self, top_n: usize) -> Result<Vec<P4PEntry>> {
        Ok(p4p_snapshot(&self.p4p_ranking()?, top_n))
    }

    pub fn news(&self, limit: usize) -> Vec<&WorldEvent> {
        self.state.world_log.news_feed(limit)
    }

    pub fn history(&self) -> &[FightHistoryEntry] {
        &self.state.history
    }

    /// Cap stored world events for long saves
    pub fn prune_world_log(&mut self, keep: usize) -> usize {
        self.state.world_log.prune_to(keep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{ProReadiness, SeedBand};

    fn rookie(division: &str) -> NewBoxer {
        NewBoxer {
            name: "Rookie Vale".into(),
            age: 19,
            height_inches: 69,
            weight_lbs: 134,
            division: division.into(),
            stats: Stats::uniform(58),
        }
    }

    fn career(seed: u64) -> Career {
        Career::new(RulesConfig::default(), seed, rookie("lightweight")).unwrap()
    }

    fn open_gate() -> RulesConfig {
        let mut config = RulesConfig::default();
        config.amateur_progression.pro_readiness = ProReadiness {
            min_age: 0,
            min_fights: 0,
            min_points: 0,
        };
        config
    }

    fn pro(config: RulesConfig, seed: u64) -> Career {
        let mut career = Career::new(config, seed, rookie("lightweight")).unwrap();
        career.turn_pro().unwrap();
        career
    }

    #[test]
    fn test_new_rejects_unknown_division() {
        let err = Career::new(RulesConfig::default(), 1, rookie("catchweight")).unwrap_err();
        assert!(matches!(err, CareerError::UnknownDivision(_)));
    }

    #[test]
    fn test_turn_pro_seeds_world_and_enters_unranked() {
        let mut career = pro(open_gate(), 3);
        let state = career.state();
        assert!(career.player().unwrap().is_pro());
        assert_eq!(state.focus_organization.as_deref(), Some("WBC"));
        assert_eq!(state.ledger.divisions().count(), career.config().weight_classes.len());
        assert_eq!(state.ledger.best_rank("lightweight", state.player), None);
        assert!(matches!(career.turn_pro(), Err(CareerError::InvalidRequest(_))));
    }

    #[test]
    fn test_turn_pro_requires_readiness() {
        let mut career = career(3);
        let before = career.save_json().unwrap();
        let status = career.pro_readiness().unwrap();
        assert_eq!((status.fights, status.min_fights), (0, 10));
        assert_eq!((status.points, status.min_points), (0, 100));
        assert!(!status.is_ready());

        assert!(matches!(career.turn_pro(), Err(CareerError::InvalidRequest(_))));
        assert!(!career.player().unwrap().is_pro());
        assert_eq!(career.save_json().unwrap(), before);
    }

    #[test]
    fn test_amateur_circuit_opens_the_gate() {
        let mut career = career(17);
        let player = career.state().player;
        let mut bouts = 0;
        while !career.pro_readiness().unwrap().is_ready() {
            assert!(bouts < 100, "gate still closed after {} bouts", bouts);
            let opponent = career.generate_opponent().unwrap();
            career
                .schedule_fight(FightRequest::new(player, opponent, BoutKind::Amateur))
                .unwrap();
            career.advance_month().unwrap();
            bouts += 1;
        }
        assert!(bouts >= 10);
        career.turn_pro().unwrap();
        assert!(career.player().unwrap().is_pro());
    }

    #[test]
    fn test_default_rounds_follow_tier() {
        let mut amateur = career(4);
        let player = amateur.state().player;
        let opponent = amateur.generate_opponent().unwrap();
        let entry = amateur
            .schedule_fight(FightRequest::new(player, opponent, BoutKind::Amateur))
            .unwrap();
        assert_eq!(entry.result.rounds_scheduled, 3);

        let mut career = pro(open_gate(), 4);
        let opponent = career.generate_opponent().unwrap();
        let entry = career
            .schedule_fight(FightRequest::new(player, opponent, BoutKind::Pro))
            .unwrap();
        assert_eq!(entry.result.rounds_scheduled, 6);
        let opponent = career.generate_opponent().unwrap();
        let entry = career
            .schedule_fight(FightRequest::new(player, opponent, BoutKind::Pro).rounds(12))
            .unwrap();
        assert_eq!(entry.result.rounds_scheduled, 12);
    }

    #[test]
    fn test_seeded_division_change_ranks_player() {
        let mut config = open_gate();
        config.division_change.min_pro_fights_for_seed = 0;
        config.division_change.seed_jitter = 0;
        config.division_change.seed_bands = vec![SeedBand {
            max_p4p_rank: 1000,
            min_rank: 4,
            max_rank: 6,
        }];
        let mut career = pro(config, 31);
        let player = career.state().player;

        let report = career.change_division("welterweight").unwrap();
        assert!(report.p4p_rank.is_some());
        for org in career.config().organization_names() {
            let seed = report.plan.seeds[org].unwrap();
            assert!((4..=6).contains(&seed));
            assert_eq!(career.state().ledger.rank_of(org, "welterweight", player), Some(seed));
        }
        assert_eq!(career.state().ledger.best_rank("lightweight", player), None);
        assert_eq!(career.player().unwrap().division, "welterweight");
    }

    #[test]
    fn test_invalid_request_leaves_state_untouched() {
        let mut career = career(5);
        let opponent = career.generate_opponent().unwrap();
        let before = career.save_json().unwrap();
        let player = career.state().player;

        let err = career
            .schedule_fight(FightRequest::new(player, opponent, BoutKind::Amateur).rounds(9))
            .unwrap_err();
        assert!(matches!(err, CareerError::InvalidRounds { rounds: 9, max: 3 }));
        assert!(err.is_validation());
        let err = career
            .schedule_fight(FightRequest::new(player, opponent, BoutKind::Pro))
            .unwrap_err();
        assert!(matches!(err, CareerError::NotProfessional(_)));
        assert_eq!(career.save_json().unwrap(), before);
    }

    #[test]
    fn test_amateur_bout_updates_records_only() {
        let mut career = career(8);
        let opponent = career.generate_opponent().unwrap();
        let player = career.state().player;
        let entry = career
            .schedule_fight(FightRequest::new(player, opponent, BoutKind::Amateur))
            .unwrap();
        assert!(entry.sanctioning.is_none());
        assert!(entry.ledger.is_none());
        assert_eq!(career.player().unwrap().amateur_record.total(), 1);
        assert_eq!(career.player().unwrap().pro_record.total(), 0);
        assert!(career.player().unwrap().experience_points > 0);
        let points = career.player().unwrap().amateur_points;
        assert!(points > 0);
        assert_eq!(entry.participants.iter().find(|p| p.boxer == player).unwrap().amateur_points, points);
        assert_eq!(career.state().last_player_fight_month, Some(0));
        assert_eq!(career.history().len(), 1);
    }

    #[test]
    fn test_year_of_months_ages_player() {
        let mut career = career(13);
        let mut birthdays = 0;
        for _ in 0..12 {
            let report = career.advance_month().unwrap();
            birthdays += usize::from(report.birthday);
        }
        assert_eq!(birthdays, 1);
        assert_eq!(career.player().unwrap().age, 20);
        assert_eq!(career.state().calendar.career_months(), 12);
    }

    #[test]
    fn test_save_round_trip_resumes_identically() {
        let mut original = pro(open_gate(), 21);
        original.advance_month().unwrap();
        let mut resumed = Career::load_json(open_gate(), &original.save_json().unwrap()).unwrap();

        let a = original.advance_month().unwrap();
        let b = resumed.advance_month().unwrap();
        assert_eq!(a, b);
        assert_eq!(original.save_json().unwrap(), resumed.save_json().unwrap());
    }
}

//! Monthly world simulation step
//!
//! Evolves NPC rankings and titles while the player is busy or idle. Title
//! bouts are coin-weighted by rating rather than resolved round by round,
//! but every change goes through the same `RankingLedger` path as player
//! fights and lands in the `WorldLog`.

use rand::Rng;

use crate::career::ledger::{RankingLedger, SanctionedBody, TitleTransition};
use crate::career::rating::overall_rating;
use crate::career::roster::Roster;
use crate::core::config::RulesConfig;
use crate::core::error::Result;
use crate::core::types::{clamp_f64, BoutKind, BoxerId, CareerMonth};
use crate::fight::judging::FightMethod;
use crate::fight::resolution::{FightResult, Outcome};
use crate::world::events::{ShiftCause, WorldBout, WorldEventKind, WorldLog};

/// Base upset chance when neither side holds a belt
const OPEN_BOUT_UPSET: f64 = 0.48;
const MIN_UPSET: f64 = 0.02;
const MAX_UPSET: f64 = 0.98;
/// Reshuffles never touch the top two spots
const RESHUFFLE_TOP_RANK: usize = 3;

/// The player's side of a world tick
#[derive(Debug, Clone, Copy)]
pub struct PlayerContext<'a> {
    pub id: BoxerId,
    pub division: &'a str,
    /// Months since the player's last pro bout; 0 in a month with a bout
    pub idle_months: u32,
}

/// Whether a boxer can be booked: active and not carrying a serious injury
pub fn is_available(config: &RulesConfig, roster: &Roster, id: BoxerId) -> bool {
    roster
        .get(id)
        .map(|b| b.is_active() && b.injury_risk < config.wear.unavailable_injury_risk)
        .unwrap_or(false)
}

struct NewsBudget {
    remaining: usize,
}

impl NewsBudget {
    fn exhausted(&self) -> bool {
        self.remaining == 0
    }

    fn spend(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

/// Run one month of world simulation. Mutates `roster`, `ledger` and `log`
/// in place; the orchestrator passes staged copies and commits on success.
/// Returns the number of events appended.
#[allow(clippy::too_many_arguments)]
pub fn simulate_month<R: Rng + ?Sized>(
    config: &RulesConfig,
    roster: &mut Roster,
    ledger: &mut RankingLedger,
    log: &mut WorldLog,
    month: CareerMonth,
    player: Option<PlayerContext<'_>>,
    rng: &mut R,
) -> Result<usize> {
    let policy = &config.world;
    let mut budget = NewsBudget {
        remaining: policy.max_events_per_month,
    };
    let before = log.len();

    let divisions: Vec<String> = match (policy.simulate_all_divisions, player) {
        (false, Some(player)) => vec![player.division.to_string()],
        (false, None) => Vec::new(),
        (true, _) => ledger.divisions().map(str::to_string).collect(),
    };
    let player_id = player.map(|p| p.id);

    for division in &divisions {
        if budget.exhausted() {
            break;
        }
        simulate_division(config, roster, ledger, log, month, division, player_id, &mut budget, rng)?;
    }

    if let Some(player) = player {
        if !budget.exhausted() && ledger.division(player.division).is_some() {
            drift_player(config, ledger, log, month, player, &mut budget, rng)?;
        }
    }

    let added = log.len() - before;
    tracing::debug!(month, events = added, "world month simulated");
    Ok(added)
}

#[allow(clippy::too_many_arguments)]
fn simulate_division<R: Rng + ?Sized>(
    config: &RulesConfig,
    roster: &mut Roster,
    ledger: &mut RankingLedger,
    log: &mut WorldLog,
    month: CareerMonth,
    division: &str,
    player: Option<BoxerId>,
    budget: &mut NewsBudget,
    rng: &mut R,
) -> Result<()> {
    let policy = &config.world;
    let is_player = |id: BoxerId| Some(id) == player;

    for org in config.organization_names() {
        if budget.exhausted() {
            return Ok(());
        }
        let ranking = ledger.ranking(org, division)?;
        let booking = match ranking.champion {
            None => ranking
                .top_pairing(|id| is_available(config, roster, id))
                .map(|pair| (WorldBout::Vacancy, pair)),
            Some(champion) if is_player(champion) => None,
            Some(champion) => {
                let challenger = ranking
                    .entries()
                    .iter()
                    .copied()
                    .find(|id| *id != champion && !is_player(*id) && is_available(config, roster, *id));
                match challenger {
                    Some(challenger) if rng.gen::<f64>() < policy.title_fight_probability => {
                        Some((WorldBout::Defense, (champion, challenger)))
                    }
                    _ => None,
                }
            }
        };

        if let Some((bout, (favorite, underdog))) = booking {
            if !is_player(favorite) && !is_player(underdog) {
                let bodies = vec![SanctionedBody {
                    organization: org.to_string(),
                    title_fight: true,
                }];
                stage_bout(config, roster, ledger, log, month, division, org, bout, favorite, underdog, &bodies, rng)?;
                budget.spend();
            }
        }

        if !budget.exhausted() && rng.gen::<f64>() < policy.ambient_reshuffle_probability {
            if reshuffle(config, ledger, log, month, org, division, player, rng)? {
                budget.spend();
            }
        }
    }

    let lineal_vacant = ledger.lineal(division).map(|t| t.holder.is_none()).unwrap_or(false);
    if lineal_vacant && !budget.exhausted() && rng.gen::<f64>() < policy.lineal_unification_probability {
        let Some(primary) = config.organization_names().next() else {
            return Ok(());
        };
        let pair = ledger.unification_pairing(primary, division, |id| is_available(config, roster, id))?;
        if let Some((favorite, underdog)) = pair.filter(|(a, b)| !is_player(*a) && !is_player(*b)) {
            let mut bodies = Vec::new();
            for org in config.organization_names() {
                let title_fight =
                    ledger
                        .ranking(org, division)?
                        .is_title_bout(favorite, underdog, |id| is_available(config, roster, id));
                if title_fight || org == primary {
                    bodies.push(SanctionedBody {
                        organization: org.to_string(),
                        title_fight,
                    });
                }
            }
            stage_bout(
                config,
                roster,
                ledger,
                log,
                month,
                division,
                primary,
                WorldBout::Unification,
                favorite,
                underdog,
                &bodies,
                rng,
            )?;
            budget.spend();
        }
    }
    Ok(())
}

/// Coin-weighted bout outcome. The favorite is red.
fn coin_bout<R: Rng + ?Sized>(
    config: &RulesConfig,
    roster: &Roster,
    bout: WorldBout,
    favorite: BoxerId,
    underdog: BoxerId,
    rng: &mut R,
) -> Result<FightResult> {
    let policy = &config.world;
    let favorite_rating = overall_rating(roster.get(favorite)?, config);
    let underdog_rating = overall_rating(roster.get(underdog)?, config);
    let base = match bout {
        WorldBout::Defense => policy.title_upset_probability,
        WorldBout::Vacancy | WorldBout::Unification => OPEN_BOUT_UPSET,
    };
    let upset = clamp_f64(
        base + (underdog_rating - favorite_rating) as f64 * policy.upset_rating_weight,
        MIN_UPSET,
        MAX_UPSET,
    );

    let rounds = config.pro.max_rounds;
    let winner = if rng.gen::<f64>() < policy.draw_probability {
        None
    } else if rng.gen::<f64>() < upset {
        Some(underdog)
    } else {
        Some(favorite)
    };

    let (method, stoppage_round) = match winner {
        None => (FightMethod::Draw, None),
        Some(_) if rng.gen::<f64>() < policy.npc_stoppage_probability => {
            (FightMethod::Stoppage, Some(rng.gen_range(1..=rounds)))
        }
        Some(_) if rng.gen::<f64>() < policy.npc_split_decision_share => (FightMethod::SplitDecision, None),
        Some(_) => (FightMethod::UnanimousDecision, None),
    };

    Ok(FightResult {
        red: favorite,
        blue: underdog,
        kind: BoutKind::Pro,
        winner,
        method,
        rounds_scheduled: rounds,
        rounds_completed: stoppage_round.unwrap_or(rounds),
        stoppage_round,
        scorecards: Vec::new(),
        rounds: Vec::new(),
    })
}

#[allow(clippy::too_many_arguments)]
fn stage_bout<R: Rng + ?Sized>(
    config: &RulesConfig,
    roster: &mut Roster,
    ledger: &mut RankingLedger,
    log: &mut WorldLog,
    month: CareerMonth,
    division: &str,
    organization: &str,
    bout: WorldBout,
    favorite: BoxerId,
    underdog: BoxerId,
    bodies: &[SanctionedBody],
    rng: &mut R,
) -> Result<()> {
    let result = coin_bout(config, roster, bout, favorite, underdog, rng)?;
    let report = {
        let roster_view: &Roster = roster;
        ledger.apply_bout(config, &result, division, organization, bodies, |id| {
            is_available(config, roster_view, id)
        })?
    };

    for id in result.participants() {
        if let Some(outcome) = result.outcome_for(id) {
            let stoppage = result.is_stoppage() && outcome == Outcome::Win;
            roster.get_mut(id)?.record_result(BoutKind::Pro, outcome, stoppage);
        }
    }

    let only_defended = report
        .titles
        .iter()
        .all(|t| matches!(t.transition, TitleTransition::Defended { .. } | TitleTransition::RetainedOnDraw));
    let featured = !only_defended || rng.gen::<f64>() < config.world.defense_news_probability;

    log.add_event(
        month,
        featured,
        WorldEventKind::TitleBout {
            bout,
            organization: organization.to_string(),
            division: division.to_string(),
            red: result.red,
            blue: result.blue,
            winner: result.winner,
            method: result.method,
            titles: report.titles,
        },
    );
    Ok(())
}

/// Nudge one mid-table NPC a place or two. Returns true when a move was logged.
#[allow(clippy::too_many_arguments)]
fn reshuffle<R: Rng + ?Sized>(
    config: &RulesConfig,
    ledger: &mut RankingLedger,
    log: &mut WorldLog,
    month: CareerMonth,
    organization: &str,
    division: &str,
    player: Option<BoxerId>,
    rng: &mut R,
) -> Result<bool> {
    let ranking = ledger.ranking(organization, division)?;
    let bottom = ranking.len();
    if bottom <= RESHUFFLE_TOP_RANK {
        return Ok(false);
    }
    let candidates: Vec<(usize, BoxerId)> = ranking
        .entries()
        .iter()
        .enumerate()
        .map(|(i, id)| (i + 1, *id))
        .filter(|(rank, id)| *rank >= RESHUFFLE_TOP_RANK && Some(*id) != player)
        .collect();
    if candidates.is_empty() {
        return Ok(false);
    }
    let (rank, id) = candidates[rng.gen_range(0..candidates.len())];
    let step = rng.gen_range(1..=2usize);
    let target = if rng.gen_bool(0.5) {
        rank.saturating_sub(step)
    } else {
        rank + step
    }
    .clamp(RESHUFFLE_TOP_RANK, bottom);
    if target == rank {
        return Ok(false);
    }

    let Some(movement) = ledger.move_boxer(config, organization, division, id, target)? else {
        return Ok(false);
    };
    log.add_event(
        month,
        false,
        WorldEventKind::RankShift {
            cause: ShiftCause::Reshuffle,
            movement,
        },
    );
    Ok(true)
}

/// Idle slide and occasional bump of the player's own ranks. Skipped in a
/// month with a player bout and for belts the player holds.
fn drift_player<R: Rng + ?Sized>(
    config: &RulesConfig,
    ledger: &mut RankingLedger,
    log: &mut WorldLog,
    month: CareerMonth,
    player: PlayerContext<'_>,
    budget: &mut NewsBudget,
    rng: &mut R,
) -> Result<()> {
    if player.idle_months == 0 {
        return Ok(());
    }
    let policy = &config.world;
    let slide_chance = (policy.drift_up_probability_per_idle_month * player.idle_months as f64)
        .min(policy.drift_up_probability_cap);
    let step_min = policy.drift_up_step_min.max(1);
    let step_max = policy.drift_up_step_max.max(step_min);

    for org in config.organization_names() {
        if budget.exhausted() {
            break;
        }
        let ranking = ledger.ranking(org, player.division)?;
        if ranking.champion == Some(player.id) {
            continue;
        }
        let Some(rank) = ranking.rank_of(player.id) else {
            continue;
        };

        let slide = if player.idle_months >= 2 && rng.gen::<f64>() < slide_chance {
            rng.gen_range(step_min..=step_max)
        } else {
            0
        };
        let bump = usize::from(rng.gen::<f64>() < policy.drift_down_probability);
        let target = (rank + slide).saturating_sub(bump).max(1);
        if target == rank {
            continue;
        }

        if let Some(movement) = ledger.move_boxer(config, org, player.division, player.id, target)? {
            let cause = if slide > bump {
                ShiftCause::IdleSlide
            } else {
                ShiftCause::Bump
            };
            log.add_event(month, true, WorldEventKind::RankShift { cause, movement });
            budget.spend();
        }
    }
    Ok(())
}

//! Ranking & title ledger
//!
//! Per (division, organization) ordered ranking lists with the body's belt,
//! plus one lineal title per division. Every public mutation works on a
//! clone, runs the champion-at-#1 repair pass, validates and only then
//! commits. On error the ledger is untouched.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::config::{RankingRules, RulesConfig};
use crate::core::error::{CareerError, Result};
use crate::core::types::{BoutKind, BoxerId};
use crate::fight::resolution::FightResult;

/// One organization's ranking in one division. Rank N is `entries[N - 1]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRanking {
    pub organization: String,
    pub division: String,
    pub slots: usize,
    pub champion: Option<BoxerId>,
    pub defenses: u32,
    entries: Vec<BoxerId>,
}

/// Ranking steps for each corner of a bout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoutSteps {
    pub red: RankingRules,
    pub blue: RankingRules,
}

impl BoutSteps {
    pub fn uniform(rules: &RankingRules) -> Self {
        Self {
            red: rules.clone(),
            blue: rules.clone(),
        }
    }

    fn of(&self, result: &FightResult, id: BoxerId) -> &RankingRules {
        if id == result.blue {
            &self.blue
        } else {
            &self.red
        }
    }
}

/// Loser is inserted before the winner so the winner ends above on equal targets
const PRIORITY_LOSER: u8 = 0;
const PRIORITY_WINNER: u8 = 1;

impl OrganizationRanking {
    pub fn new(organization: impl Into<String>, division: impl Into<String>, slots: usize) -> Self {
        Self {
            organization: organization.into(),
            division: division.into(),
            slots,
            champion: None,
            defenses: 0,
            entries: Vec::new(),
        }
    }

    /// Build a ranking from an existing list; rejects lists that break the invariants
    pub fn with_entries(
        organization: impl Into<String>,
        division: impl Into<String>,
        slots: usize,
        entries: Vec<BoxerId>,
        champion: Option<BoxerId>,
    ) -> Result<Self> {
        let ranking = Self {
            organization: organization.into(),
            division: division.into(),
            slots,
            champion,
            defenses: 0,
            entries,
        };
        ranking.validate()?;
        Ok(ranking)
    }

    pub fn entries(&self) -> &[BoxerId] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: BoxerId) -> bool {
        self.entries.contains(&id)
    }

    /// 1-based rank
    pub fn rank_of(&self, id: BoxerId) -> Option<usize> {
        self.entries.iter().position(|e| *e == id).map(|i| i + 1)
    }

    pub fn at_rank(&self, rank: usize) -> Option<BoxerId> {
        rank.checked_sub(1).and_then(|i| self.entries.get(i).copied())
    }

    fn malformed(&self, reason: String) -> CareerError {
        CareerError::MalformedRanking {
            organization: self.organization.clone(),
            division: self.division.clone(),
            reason,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.entries.len() > self.slots {
            return Err(self.malformed(format!(
                "{} entries exceed {} slots",
                self.entries.len(),
                self.slots
            )));
        }
        let mut seen = AHashSet::with_capacity(self.entries.len());
        for id in &self.entries {
            if !seen.insert(*id) {
                return Err(self.malformed(format!("{} is ranked twice", id)));
            }
        }
        if let Some(champion) = self.champion {
            if self.entries.first() != Some(&champion) {
                return Err(self.malformed(format!("champion {} is not ranked #1", champion)));
            }
        }
        Ok(())
    }

    /// Re-assert champion at rank 1. Returns true when a correction was made.
    pub fn repair(&mut self) -> bool {
        let Some(champion) = self.champion else {
            return false;
        };
        if self.entries.first() == Some(&champion) {
            return false;
        }
        let previous = self.rank_of(champion);
        self.entries.retain(|e| *e != champion);
        self.entries.insert(0, champion);
        self.entries.truncate(self.slots);
        tracing::warn!(
            organization = %self.organization,
            division = %self.division,
            champion = %champion,
            previous_rank = ?previous,
            "repaired champion ranking"
        );
        true
    }

    fn remove(&mut self, id: BoxerId) -> Option<usize> {
        let index = self.entries.iter().position(|e| *e == id)?;
        self.entries.remove(index);
        Some(index + 1)
    }

    /// Highest rank a non-champion may occupy
    fn floor_for(&self, id: BoxerId) -> usize {
        match self.champion {
            Some(champion) if champion != id => 2,
            _ => 1,
        }
    }

    /// Remove every mover, then insert in ascending target order.
    /// Overflow past `slots` drops the last entries.
    fn apply_moves(&mut self, mut moves: Vec<(BoxerId, usize, u8)>) {
        for (id, _, _) in &moves {
            self.remove(*id);
        }
        moves.sort_by_key(|(_, target, priority)| (*target, *priority));
        for (id, target, _) in moves {
            let index = target.saturating_sub(1).min(self.entries.len());
            self.entries.insert(index, id);
        }
        self.entries.truncate(self.slots);
    }

    /// Designated #1 vs #2 pairing, falling back to #1 vs #3 when #2 is unavailable
    pub fn top_pairing(&self, available: impl Fn(BoxerId) -> bool) -> Option<(BoxerId, BoxerId)> {
        let first = self.at_rank(1).filter(|id| available(*id))?;
        let second = self
            .at_rank(2)
            .filter(|id| available(*id))
            .or_else(|| self.at_rank(3).filter(|id| available(*id)))?;
        Some((first, second))
    }

    /// Title bout when the champion is in it, or when the belt is vacant and
    /// the bout is the designated top pairing
    pub fn is_title_bout(&self, a: BoxerId, b: BoxerId, available: impl Fn(BoxerId) -> bool) -> bool {
        match self.champion {
            Some(champion) => champion == a || champion == b,
            None => {
                let in_pool = |id: BoxerId| id == a || id == b || available(id);
                matches!(self.top_pairing(in_pool), Some(pair) if is_pair(pair, a, b))
            }
        }
    }

    /// Apply a bout result. Returns the title transition when this was a title bout.
    fn apply_bout(&mut self, steps: &BoutSteps, result: &FightResult, title_bout: bool) -> Option<TitleTransition> {
        let slots = self.slots;
        let step_down = |rank: usize, step: usize| (rank + step).min(slots);

        if title_bout {
            return Some(self.apply_title_bout(steps, result));
        }

        let mut moves = Vec::new();
        match (result.winner, result.loser()) {
            (Some(winner), Some(loser)) => {
                let rules = steps.of(result, winner);
                let loser_rank = self.rank_of(loser);
                let target = match (self.rank_of(winner), loser_rank) {
                    (Some(rank), _) => rank.saturating_sub(rules.win_step),
                    (None, Some(beaten)) => beaten + rules.unranked_win_offset,
                    (None, None) => rules.unranked_entry_rank,
                };
                let target = target.max(self.floor_for(winner)).min(slots);
                moves.push((winner, target, PRIORITY_WINNER));
                if let Some(rank) = loser_rank {
                    moves.push((loser, step_down(rank, steps.of(result, loser).loss_step), PRIORITY_LOSER));
                }
            }
            _ => {
                for id in result.participants() {
                    if let Some(rank) = self.rank_of(id) {
                        moves.push((id, step_down(rank, steps.of(result, id).draw_step), PRIORITY_LOSER));
                    }
                }
            }
        }
        self.apply_moves(moves);
        None
    }

    fn apply_title_bout(&mut self, steps: &BoutSteps, result: &FightResult) -> TitleTransition {
        let slots = self.slots;
        let previous = self.champion;
        match (result.winner, result.loser()) {
            (Some(winner), Some(loser)) if previous == Some(winner) => {
                self.defenses += 1;
                if let Some(rank) = self.rank_of(loser) {
                    let step = steps.of(result, loser).loss_step;
                    self.apply_moves(vec![(loser, (rank + step).min(slots), PRIORITY_LOSER)]);
                }
                TitleTransition::Defended {
                    defenses: self.defenses,
                }
            }
            (Some(winner), Some(loser)) => {
                self.champion = Some(winner);
                self.defenses = 0;
                let mut moves = vec![(winner, 1, PRIORITY_WINNER)];
                if self.rank_of(loser).is_some() {
                    moves.push((loser, (1 + steps.of(result, loser).loss_step).min(slots), PRIORITY_LOSER));
                }
                self.apply_moves(moves);
                TitleTransition::Captured { previous }
            }
            _ => {
                let moves = result
                    .participants()
                    .into_iter()
                    .filter(|id| Some(*id) != previous)
                    .filter_map(|id| {
                        let step = steps.of(result, id).draw_step;
                        self.rank_of(id)
                            .map(|rank| (id, (rank + step).min(slots).max(self.floor_for(id)), PRIORITY_LOSER))
                    })
                    .collect();
                self.apply_moves(moves);
                if previous.is_some() {
                    TitleTransition::RetainedOnDraw
                } else {
                    TitleTransition::VacancyUnresolved
                }
            }
        }
    }

    /// Drop a boxer from the list, vacating the belt if they held it
    fn withdraw(&mut self, id: BoxerId) -> Option<TitleTransition> {
        self.remove(id);
        if self.champion == Some(id) {
            self.champion = None;
            self.defenses = 0;
            return Some(TitleTransition::Vacated);
        }
        None
    }
}

fn is_pair(pair: (BoxerId, BoxerId), a: BoxerId, b: BoxerId) -> bool {
    (pair.0 == a && pair.1 == b) || (pair.0 == b && pair.1 == a)
}

/// The one cross-organization title of a division
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinealTitle {
    pub holder: Option<BoxerId>,
    pub defenses: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleScope {
    Organization(String),
    Lineal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleTransition {
    Captured { previous: Option<BoxerId> },
    Defended { defenses: u32 },
    RetainedOnDraw,
    /// Designated vacancy bout ended in a draw
    VacancyUnresolved,
    Vacated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleEvent {
    pub scope: TitleScope,
    pub division: String,
    /// Holder after the transition
    pub holder: Option<BoxerId>,
    pub transition: TitleTransition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankMovement {
    pub organization: String,
    pub division: String,
    pub boxer: BoxerId,
    pub from: Option<usize>,
    pub to: Option<usize>,
}

/// What a committed ledger mutation changed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReport {
    pub movements: Vec<RankMovement>,
    pub titles: Vec<TitleEvent>,
    pub repairs: usize,
}

/// A body selected to move its rankings for one bout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanctionedBody {
    pub organization: String,
    pub title_fight: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingLedger {
    /// division -> organization -> ranking
    rankings: BTreeMap<String, BTreeMap<String, OrganizationRanking>>,
    lineal: BTreeMap<String, LinealTitle>,
}

impl RankingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create empty rankings for every configured organization in `division`
    pub fn ensure_division(&mut self, config: &RulesConfig, division: &str) -> Result<()> {
        config.division_index(division)?;
        let orgs = self.rankings.entry(division.to_string()).or_default();
        for org in &config.organizations {
            orgs.entry(org.name.clone())
                .or_insert_with(|| OrganizationRanking::new(&org.name, division, org.ranking_slots));
        }
        self.lineal.entry(division.to_string()).or_default();
        Ok(())
    }

    /// Install a prepared ranking (used when seeding and by tests)
    pub fn insert_ranking(&mut self, config: &RulesConfig, ranking: OrganizationRanking) -> Result<()> {
        let slots = config.ranking_slots(&ranking.organization)?;
        config.division_index(&ranking.division)?;
        if ranking.slots != slots {
            return Err(ranking.malformed(format!("slots {} differ from configured {}", ranking.slots, slots)));
        }
        ranking.validate()?;
        self.lineal.entry(ranking.division.clone()).or_default();
        self.rankings
            .entry(ranking.division.clone())
            .or_default()
            .insert(ranking.organization.clone(), ranking);
        Ok(())
    }

    pub fn set_lineal(&mut self, division: &str, title: LinealTitle) {
        self.lineal.insert(division.to_string(), title);
    }

    pub fn ranking(&self, organization: &str, division: &str) -> Result<&OrganizationRanking> {
        self.rankings
            .get(division)
            .and_then(|orgs| orgs.get(organization))
            .ok_or_else(|| CareerError::MissingRanking {
                organization: organization.to_string(),
                division: division.to_string(),
            })
    }

    fn ranking_mut(&mut self, organization: &str, division: &str) -> Result<&mut OrganizationRanking> {
        self.rankings
            .get_mut(division)
            .and_then(|orgs| orgs.get_mut(organization))
            .ok_or_else(|| CareerError::MissingRanking {
                organization: organization.to_string(),
                division: division.to_string(),
            })
    }

    /// Rankings of one division, keyed by organization
    pub fn division(&self, division: &str) -> Option<&BTreeMap<String, OrganizationRanking>> {
        self.rankings.get(division)
    }

    pub fn divisions(&self) -> impl Iterator<Item = &str> {
        self.rankings.keys().map(String::as_str)
    }

    pub fn lineal(&self, division: &str) -> Option<&LinealTitle> {
        self.lineal.get(division)
    }

    pub fn rank_of(&self, organization: &str, division: &str, id: BoxerId) -> Option<usize> {
        self.ranking(organization, division).ok().and_then(|r| r.rank_of(id))
    }

    /// Best rank across all bodies in a division
    pub fn best_rank(&self, division: &str, id: BoxerId) -> Option<usize> {
        self.rankings
            .get(division)?
            .values()
            .filter_map(|r| r.rank_of(id))
            .min()
    }

    pub fn is_lineal_holder(&self, id: BoxerId) -> bool {
        self.lineal.values().any(|t| t.holder == Some(id))
    }

    /// Organizations in which `id` holds the belt
    pub fn belts_held(&self, id: BoxerId) -> Vec<(String, String)> {
        self.rankings
            .values()
            .flat_map(|orgs| orgs.values())
            .filter(|r| r.champion == Some(id))
            .map(|r| (r.organization.clone(), r.division.clone()))
            .collect()
    }

    /// Check every ranking and lineal holder
    pub fn validate(&self) -> Result<()> {
        for orgs in self.rankings.values() {
            for ranking in orgs.values() {
                ranking.validate()?;
            }
        }
        Ok(())
    }

    fn repair_division(&mut self, division: &str) -> usize {
        self.rankings
            .get_mut(division)
            .map(|orgs| orgs.values_mut().map(|r| r.repair()).filter(|repaired| *repaired).count())
            .unwrap_or(0)
    }

    /// Repair then validate; any remaining violation is a consistency error
    fn finish(&mut self, division: &str) -> Result<usize> {
        let repairs = self.repair_division(division);
        if let Some(orgs) = self.rankings.get(division) {
            for ranking in orgs.values() {
                ranking
                    .validate()
                    .map_err(|e| CareerError::Consistency(e.to_string()))?;
            }
        }
        Ok(repairs)
    }

    /// Lineal unification pairing for a division, read from one body's ranking
    pub fn unification_pairing(
        &self,
        organization: &str,
        division: &str,
        available: impl Fn(BoxerId) -> bool,
    ) -> Result<Option<(BoxerId, BoxerId)>> {
        Ok(self.ranking(organization, division)?.top_pairing(available))
    }

    /// Apply a pro bout to every sanctioned body plus the division's lineal
    /// title, moving both corners by the top-level ranking rules.
    pub fn apply_bout(
        &mut self,
        config: &RulesConfig,
        result: &FightResult,
        division: &str,
        primary: &str,
        sanctioned: &[SanctionedBody],
        available: impl Fn(BoxerId) -> bool,
    ) -> Result<LedgerReport> {
        let steps = BoutSteps::uniform(&config.ranking);
        self.apply_bout_with(config, result, division, primary, sanctioned, &steps, available)
    }

    /// Apply a pro bout with per-corner ranking steps.
    ///
    /// Title status per body is re-derived from the ranking, not trusted from
    /// the caller. The lineal vacancy pairing is read from `primary`'s ranking
    /// before the bout.
    #[allow(clippy::too_many_arguments)]
    pub fn apply_bout_with(
        &mut self,
        config: &RulesConfig,
        result: &FightResult,
        division: &str,
        primary: &str,
        sanctioned: &[SanctionedBody],
        steps: &BoutSteps,
        available: impl Fn(BoxerId) -> bool,
    ) -> Result<LedgerReport> {
        if result.kind != BoutKind::Pro {
            return Err(CareerError::InvalidRequest("only pro bouts move rankings".into()));
        }
        config.division_index(division)?;
        config.organization(primary)?;
        self.ranking(primary, division)?.validate()?;
        for body in sanctioned {
            config.organization(&body.organization)?;
            self.ranking(&body.organization, division)?.validate()?;
        }

        let participant_or_available = |id: BoxerId| result.involves(id) || available(id);
        let lineal_pair = self.unification_pairing(primary, division, participant_or_available)?;

        let mut next = self.clone();
        let mut report = LedgerReport::default();

        for body in sanctioned {
            let ranking = next.ranking_mut(&body.organization, division)?;
            let before: Vec<(BoxerId, Option<usize>)> =
                result.participants().iter().map(|id| (*id, ranking.rank_of(*id))).collect();
            let title_bout = ranking.is_title_bout(result.red, result.blue, &available);
            if let Some(transition) = ranking.apply_bout(steps, result, title_bout) {
                report.titles.push(TitleEvent {
                    scope: TitleScope::Organization(body.organization.clone()),
                    division: division.to_string(),
                    holder: ranking.champion,
                    transition,
                });
            }
            for (id, from) in before {
                let to = ranking.rank_of(id);
                if from != to {
                    report.movements.push(RankMovement {
                        organization: body.organization.clone(),
                        division: division.to_string(),
                        boxer: id,
                        from,
                        to,
                    });
                }
            }
        }

        if let Some(event) = next.apply_lineal(result, division, lineal_pair) {
            report.titles.push(event);
        }

        report.repairs = next.finish(division)?;

        for movement in &report.movements {
            tracing::debug!(
                organization = %movement.organization,
                division = %movement.division,
                boxer = %movement.boxer,
                from = ?movement.from,
                to = ?movement.to,
                "ranking moved"
            );
        }
        for title in &report.titles {
            tracing::info!(
                division = %title.division,
                scope = ?title.scope,
                holder = ?title.holder,
                transition = ?title.transition,
                "title update"
            );
        }

        *self = next;
        Ok(report)
    }

    fn apply_lineal(
        &mut self,
        result: &FightResult,
        division: &str,
        vacancy_pair: Option<(BoxerId, BoxerId)>,
    ) -> Option<TitleEvent> {
        let title = self.lineal.entry(division.to_string()).or_default();
        let transition = match title.holder {
            Some(holder) if result.involves(holder) => match result.winner {
                Some(winner) if winner == holder => {
                    title.defenses += 1;
                    TitleTransition::Defended {
                        defenses: title.defenses,
                    }
                }
                Some(winner) => {
                    title.holder = Some(winner);
                    title.defenses = 0;
                    TitleTransition::Captured {
                        previous: Some(holder),
                    }
                }
                None => TitleTransition::RetainedOnDraw,
            },
            Some(_) => return None,
            None => {
                let pair = vacancy_pair?;
                if !is_pair(pair, result.red, result.blue) {
                    return None;
                }
                match result.winner {
                    Some(winner) => {
                        title.holder = Some(winner);
                        title.defenses = 0;
                        TitleTransition::Captured { previous: None }
                    }
                    None => TitleTransition::VacancyUnresolved,
                }
            }
        };
        Some(TitleEvent {
            scope: TitleScope::Lineal,
            division: division.to_string(),
            holder: title.holder,
            transition,
        })
    }

    /// Move one boxer to `target` in a single ranking (drift and reshuffles).
    /// Champions cannot be moved and nobody else can take rank 1 from one.
    pub fn move_boxer(
        &mut self,
        config: &RulesConfig,
        organization: &str,
        division: &str,
        id: BoxerId,
        target: usize,
    ) -> Result<Option<RankMovement>> {
        config.organization(organization)?;
        let current = self.ranking(organization, division)?;
        current.validate()?;
        if current.champion == Some(id) {
            return Err(CareerError::InvalidRequest(format!(
                "{} holds the {} belt and cannot be moved",
                id, organization
            )));
        }

        let mut next = self.clone();
        let ranking = next.ranking_mut(organization, division)?;
        let from = ranking.rank_of(id);
        let target = target.max(ranking.floor_for(id)).min(ranking.slots);
        ranking.apply_moves(vec![(id, target, PRIORITY_WINNER)]);
        let to = ranking.rank_of(id);
        next.finish(division)?;
        *self = next;

        if from == to {
            return Ok(None);
        }
        tracing::debug!(organization, division, boxer = %id, ?from, ?to, "ranking drift");
        Ok(Some(RankMovement {
            organization: organization.to_string(),
            division: division.to_string(),
            boxer: id,
            from,
            to,
        }))
    }

    /// Remove a boxer from every ranking in every division, vacating any belt
    /// or lineal title they hold
    pub fn withdraw_boxer(&mut self, id: BoxerId) -> Result<Vec<TitleEvent>> {
        let mut next = self.clone();
        let mut events = Vec::new();
        let divisions: Vec<String> = next.rankings.keys().cloned().collect();
        for division in &divisions {
            events.extend(next.vacate_in_division(division, id));
        }
        for division in &divisions {
            next.finish(division)?;
        }
        *self = next;
        Ok(events)
    }

    fn vacate_in_division(&mut self, division: &str, id: BoxerId) -> Vec<TitleEvent> {
        let mut events = Vec::new();
        if let Some(orgs) = self.rankings.get_mut(division) {
            for ranking in orgs.values_mut() {
                if let Some(transition) = ranking.withdraw(id) {
                    events.push(TitleEvent {
                        scope: TitleScope::Organization(ranking.organization.clone()),
                        division: division.to_string(),
                        holder: None,
                        transition,
                    });
                }
            }
        }
        if let Some(title) = self.lineal.get_mut(division) {
            if title.holder == Some(id) {
                title.holder = None;
                title.defenses = 0;
                events.push(TitleEvent {
                    scope: TitleScope::Lineal,
                    division: division.to_string(),
                    holder: None,
                    transition: TitleTransition::Vacated,
                });
            }
        }
        events
    }

    /// Move a boxer between divisions. Old rankings, belts and lineal standing
    /// are vacated; `seeds` gives the entry rank per organization (None = unranked).
    pub fn change_division(
        &mut self,
        config: &RulesConfig,
        id: BoxerId,
        from: &str,
        to: &str,
        seeds: &BTreeMap<String, Option<usize>>,
    ) -> Result<LedgerReport> {
        config.division_index(from)?;
        config.division_index(to)?;
        for org in seeds.keys() {
            config.organization(org)?;
        }

        let mut next = self.clone();
        next.ensure_division(config, to)?;
        let mut report = LedgerReport::default();

        let before: BTreeMap<String, Option<usize>> = config
            .organization_names()
            .map(|org| (org.to_string(), next.rank_of(org, from, id)))
            .collect();
        report.titles = next.vacate_in_division(from, id);
        for (org, from_rank) in before.into_iter().filter(|(_, r)| r.is_some()) {
            report.movements.push(RankMovement {
                organization: org,
                division: from.to_string(),
                boxer: id,
                from: from_rank,
                to: None,
            });
        }

        for (org, seed) in seeds {
            let Some(seed) = seed else { continue };
            let ranking = next.ranking_mut(org, to)?;
            let target = (*seed).max(ranking.floor_for(id)).min(ranking.slots);
            ranking.apply_moves(vec![(id, target, PRIORITY_WINNER)]);
            report.movements.push(RankMovement {
                organization: org.clone(),
                division: to.to_string(),
                boxer: id,
                from: None,
                to: ranking.rank_of(id),
            });
        }

        report.repairs = next.finish(from)? + next.finish(to)?;
        *self = next;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fight::judging::{FightMethod, Scorecard};

    const DIV: &str = "welterweight";

    fn ids(range: std::ops::RangeInclusive<u32>) -> Vec<BoxerId> {
        range.map(BoxerId).collect()
    }

    fn bout(red: u32, blue: u32, winner: Option<u32>) -> FightResult {
        FightResult {
            red: BoxerId(red),
            blue: BoxerId(blue),
            kind: BoutKind::Pro,
            winner: winner.map(BoxerId),
            method: if winner.is_some() {
                FightMethod::UnanimousDecision
            } else {
                FightMethod::Draw
            },
            rounds_scheduled: 10,
            rounds_completed: 10,
            stoppage_round: None,
            scorecards: vec![Scorecard::default(); 3],
            rounds: Vec::new(),
        }
    }

    fn ledger_with(org: &str, entries: Vec<BoxerId>, champion: Option<BoxerId>) -> (RulesConfig, RankingLedger) {
        let config = RulesConfig::default();
        let mut ledger = RankingLedger::new();
        ledger.ensure_division(&config, DIV).unwrap();
        let slots = config.ranking_slots(org).unwrap();
        let ranking = OrganizationRanking::with_entries(org, DIV, slots, entries, champion).unwrap();
        ledger.insert_ranking(&config, ranking).unwrap();
        (config, ledger)
    }

    fn body(org: &str) -> Vec<SanctionedBody> {
        vec![SanctionedBody {
            organization: org.to_string(),
            title_fight: false,
        }]
    }

    #[test]
    fn test_rejects_malformed_entry_ranking() {
        let err = OrganizationRanking::with_entries("WBC", DIV, 15, vec![BoxerId(1), BoxerId(1)], None);
        assert!(matches!(err, Err(CareerError::MalformedRanking { .. })));
        let err = OrganizationRanking::with_entries("WBC", DIV, 15, vec![BoxerId(1), BoxerId(2)], Some(BoxerId(2)));
        assert!(matches!(err, Err(CareerError::MalformedRanking { .. })));
        let err = OrganizationRanking::with_entries("WBC", DIV, 2, ids(1..=3), None);
        assert!(err.is_err());
    }

    #[test]
    fn test_unknown_body_and_missing_ranking() {
        let (config, mut ledger) = ledger_with("WBC", ids(1..=15), None);
        let before = ledger.clone();
        let err = ledger.apply_bout(&config, &bout(1, 2, Some(1)), DIV, "XYZ", &body("XYZ"), |_| true);
        assert!(matches!(err, Err(CareerError::UnknownOrganization(_))));
        let err = ledger.apply_bout(&config, &bout(1, 2, Some(1)), "heavyweight", "WBC", &body("WBC"), |_| true);
        assert!(matches!(err, Err(CareerError::MissingRanking { .. })));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_winner_up_loser_down() {
        let (config, mut ledger) = ledger_with("WBC", ids(1..=15), Some(BoxerId(1)));
        // #5 beats #2
        ledger
            .apply_bout(&config, &bout(5, 2, Some(5)), DIV, "WBC", &body("WBC"), |_| true)
            .unwrap();
        let ranking = ledger.ranking("WBC", DIV).unwrap();
        assert_eq!(ranking.rank_of(BoxerId(5)), Some(3));
        assert_eq!(ranking.rank_of(BoxerId(2)), Some(4));
        assert_eq!(ranking.rank_of(BoxerId(1)), Some(1));
        assert_eq!(ranking.len(), 15);
    }

    #[test]
    fn test_contender_cannot_take_rank_one_from_champion() {
        let (config, mut ledger) = ledger_with("WBC", ids(1..=15), Some(BoxerId(1)));
        ledger
            .apply_bout(&config, &bout(2, 3, Some(2)), DIV, "WBC", &body("WBC"), |_| true)
            .unwrap();
        let ranking = ledger.ranking("WBC", DIV).unwrap();
        assert_eq!(ranking.at_rank(1), Some(BoxerId(1)));
        assert_eq!(ranking.rank_of(BoxerId(2)), Some(2));
    }

    #[test]
    fn test_champion_draw_retains_title() {
        let (config, mut ledger) = ledger_with("WBC", ids(1..=15), Some(BoxerId(1)));
        let report = ledger
            .apply_bout(&config, &bout(1, 2, None), DIV, "WBC", &body("WBC"), |_| true)
            .unwrap();
        let ranking = ledger.ranking("WBC", DIV).unwrap();
        assert_eq!(ranking.champion, Some(BoxerId(1)));
        assert_eq!(ranking.at_rank(1), Some(BoxerId(1)));
        assert!(report.titles.iter().any(|t| t.transition == TitleTransition::RetainedOnDraw));
    }

    #[test]
    fn test_challenger_captures_belt() {
        let (config, mut ledger) = ledger_with("WBC", ids(1..=15), Some(BoxerId(1)));
        ledger
            .apply_bout(&config, &bout(1, 4, Some(4)), DIV, "WBC", &body("WBC"), |_| true)
            .unwrap();
        let ranking = ledger.ranking("WBC", DIV).unwrap();
        assert_eq!(ranking.champion, Some(BoxerId(4)));
        assert_eq!(ranking.at_rank(1), Some(BoxerId(4)));
        assert_eq!(ranking.rank_of(BoxerId(1)), Some(3));
        assert_eq!(ranking.defenses, 0);
    }

    #[test]
    fn test_vacant_lineal_one_vs_two() {
        let (config, mut ledger) = ledger_with("WBC", ids(1..=15), None);
        let report = ledger
            .apply_bout(&config, &bout(2, 1, Some(2)), DIV, "WBC", &body("WBC"), |_| true)
            .unwrap();
        assert_eq!(ledger.lineal(DIV).unwrap().holder, Some(BoxerId(2)));
        assert!(report.titles.iter().any(|t| t.scope == TitleScope::Lineal));
    }

    #[test]
    fn test_vacant_lineal_falls_back_to_three() {
        let (config, mut ledger) = ledger_with("WBC", ids(1..=15), None);
        // #2 unavailable: #1 vs #3 is the unification bout
        ledger
            .apply_bout(&config, &bout(1, 3, Some(3)), DIV, "WBC", &body("WBC"), |id| id != BoxerId(2))
            .unwrap();
        assert_eq!(ledger.lineal(DIV).unwrap().holder, Some(BoxerId(3)));
    }

    #[test]
    fn test_ordinary_bout_never_awards_lineal() {
        let (config, mut ledger) = ledger_with("WBC", ids(1..=15), None);
        // #2 is available, so #1 vs #3 is not a unification bout
        ledger
            .apply_bout(&config, &bout(1, 3, Some(3)), DIV, "WBC", &body("WBC"), |_| true)
            .unwrap();
        assert_eq!(ledger.lineal(DIV).unwrap().holder, None);
        ledger
            .apply_bout(&config, &bout(4, 5, Some(4)), DIV, "WBC", &body("WBC"), |_| true)
            .unwrap();
        assert_eq!(ledger.lineal(DIV).unwrap().holder, None);
    }

    #[test]
    fn test_unranked_entrant_takes_position_and_pushes_down() {
        let (config, mut ledger) = ledger_with("WBC", ids(1..=15), None);
        // unranked #99 beats #10: both target 12, the winner ends above and old #15 drops out
        ledger
            .apply_bout(&config, &bout(99, 10, Some(99)), DIV, "WBC", &body("WBC"), |_| true)
            .unwrap();
        let ranking = ledger.ranking("WBC", DIV).unwrap();
        assert_eq!(ranking.rank_of(BoxerId(99)), Some(12));
        assert_eq!(ranking.rank_of(BoxerId(10)), Some(13));
        assert_eq!(ranking.len(), 15);
        assert!(!ranking.contains(BoxerId(15)));
    }

    #[test]
    fn test_repair_restores_champion() {
        let mut ranking = OrganizationRanking::new("WBC", DIV, 15);
        ranking.entries = ids(1..=5);
        ranking.champion = Some(BoxerId(3));
        assert!(ranking.repair());
        assert_eq!(ranking.at_rank(1), Some(BoxerId(3)));
        assert!(ranking.validate().is_ok());
        assert!(!ranking.repair());
    }

    #[test]
    fn test_withdraw_vacates_everything() {
        let (_, mut ledger) = ledger_with("WBC", ids(1..=15), Some(BoxerId(1)));
        ledger.set_lineal(DIV, LinealTitle { holder: Some(BoxerId(1)), defenses: 3 });
        let events = ledger.withdraw_boxer(BoxerId(1)).unwrap();
        assert_eq!(events.len(), 2);
        let ranking = ledger.ranking("WBC", DIV).unwrap();
        assert_eq!(ranking.champion, None);
        assert!(!ranking.contains(BoxerId(1)));
        assert_eq!(ledger.lineal(DIV).unwrap().holder, None);
    }

    #[test]
    fn test_each_corner_moves_by_its_own_steps() {
        let (config, mut ledger) = ledger_with("WBC", ids(1..=15), Some(BoxerId(1)));
        let mut red = config.ranking.clone();
        red.win_step = 4;
        let mut blue = config.ranking.clone();
        blue.loss_step = 1;
        let steps = BoutSteps { red, blue };
        // #9 beats #6
        ledger
            .apply_bout_with(&config, &bout(9, 6, Some(9)), DIV, "WBC", &body("WBC"), &steps, |_| true)
            .unwrap();
        let ranking = ledger.ranking("WBC", DIV).unwrap();
        assert_eq!(ranking.rank_of(BoxerId(9)), Some(5));
        assert_eq!(ranking.rank_of(BoxerId(6)), Some(7));
    }

    #[test]
    fn test_division_change_lands_on_seeds() {
        const TO: &str = "lightweight";
        let (config, mut ledger) = ledger_with("WBC", ids(1..=15), None);
        ledger.ensure_division(&config, TO).unwrap();
        for org in config.organization_names() {
            let champion = (org == "WBA").then_some(BoxerId(101));
            let ranking = OrganizationRanking::with_entries(org, TO, 15, ids(101..=115), champion).unwrap();
            ledger.insert_ranking(&config, ranking).unwrap();
        }
        ledger.set_lineal(DIV, LinealTitle { holder: Some(BoxerId(3)), defenses: 2 });

        let seeds = BTreeMap::from([
            ("WBC".to_string(), Some(4)),
            ("WBA".to_string(), Some(1)),
            ("IBF".to_string(), None),
            ("WBO".to_string(), Some(40)),
        ]);
        let report = ledger.change_division(&config, BoxerId(3), DIV, TO, &seeds).unwrap();

        // occupied #4: the entrant takes it and the incumbent shifts down
        let wbc = ledger.ranking("WBC", TO).unwrap();
        assert_eq!(wbc.rank_of(BoxerId(3)), Some(4));
        assert_eq!(wbc.rank_of(BoxerId(104)), Some(5));
        assert!(!wbc.contains(BoxerId(115)));
        assert_eq!(wbc.len(), 15);
        // a seed of #1 stops under the champion
        let wba = ledger.ranking("WBA", TO).unwrap();
        assert_eq!(wba.rank_of(BoxerId(3)), Some(2));
        assert_eq!(wba.at_rank(1), Some(BoxerId(101)));
        assert_eq!(ledger.rank_of("IBF", TO, BoxerId(3)), None);
        // past the slots: clamped to the last place
        assert_eq!(ledger.rank_of("WBO", TO, BoxerId(3)), Some(15));

        assert!(!ledger.ranking("WBC", DIV).unwrap().contains(BoxerId(3)));
        assert_eq!(ledger.lineal(DIV).unwrap().holder, None);
        assert!(report.titles.iter().any(|t| t.scope == TitleScope::Lineal));
        let entered = report.movements.iter().filter(|m| m.division == TO).count();
        assert_eq!(entered, 3);
        assert!(ledger.validate().is_ok());
    }

    #[test]
    fn test_move_boxer_respects_champion() {
        let (config, mut ledger) = ledger_with("WBC", ids(1..=15), Some(BoxerId(1)));
        let moved = ledger.move_boxer(&config, "WBC", DIV, BoxerId(6), 1).unwrap();
        assert_eq!(moved.and_then(|m| m.to), Some(2));
        assert!(ledger.move_boxer(&config, "WBC", DIV, BoxerId(1), 4).is_err());
    }
}

//! Persisted career state
//!
//! Everything a save holds. Only the orchestrator writes to it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::aging::progression::SportsScienceStaff;
use crate::career::boxer::{Boxer, FightRecord, RetirementReason};
use crate::career::ledger::{LedgerReport, RankingLedger, TitleEvent};
use crate::career::p4p::StrengthFactors;
use crate::career::rating::overall_rating;
use crate::career::roster::Roster;
use crate::career::sanctioning::SanctioningRecord;
use crate::core::calendar::CareerCalendar;
use crate::core::config::RulesConfig;
use crate::core::error::{CareerError, Result};
use crate::core::types::{BoxerId, CareerMonth};
use crate::fight::aftermath::PostFightImpact;
use crate::fight::resolution::FightResult;
use crate::world::events::WorldLog;

/// Wear and experience one participant took from a bout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantUpdate {
    pub boxer: BoxerId,
    pub impact: PostFightImpact,
    pub experience_gain: u32,
    /// Circuit points; zero for pro bouts
    #[serde(default)]
    pub amateur_points: u32,
    pub rating_before: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FightHistoryEntry {
    pub career_month: CareerMonth,
    pub division: String,
    pub result: FightResult,
    /// Pro bouts only
    pub sanctioning: Option<SanctioningRecord>,
    pub ledger: Option<LedgerReport>,
    pub participants: Vec<ParticipantUpdate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementRecord {
    pub career_month: CareerMonth,
    pub age: u32,
    pub reason: RetirementReason,
    pub amateur_record: FightRecord,
    pub pro_record: FightRecord,
    pub vacated: Vec<TitleEvent>,
}

/// One row of a ranking page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    pub rank: usize,
    pub boxer: BoxerId,
    pub name: String,
    pub rating: i32,
    pub record: FightRecord,
    pub is_champion: bool,
    pub is_lineal_champion: bool,
    pub is_player: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSnapshot {
    pub organization: String,
    pub division: String,
    pub champion: Option<BoxerId>,
    pub defenses: u32,
    pub lineal_holder: Option<BoxerId>,
    pub rows: Vec<RankingRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerState {
    pub calendar: CareerCalendar,
    pub player: BoxerId,
    pub roster: Roster,
    pub ledger: RankingLedger,
    /// Body the player's bouts are booked under
    pub focus_organization: Option<String>,
    pub history: Vec<FightHistoryEntry>,
    pub world_log: WorldLog,
    pub pro_debut_month: Option<CareerMonth>,
    pub last_player_fight_month: Option<CareerMonth>,
    pub divisions_fought: BTreeSet<String>,
    pub division_changes: u32,
    pub staff: SportsScienceStaff,
    pub retirement: Option<RetirementRecord>,
}

impl CareerState {
    pub fn new(player: Boxer) -> Result<Self> {
        let id = player.id;
        let mut divisions_fought = BTreeSet::new();
        divisions_fought.insert(player.division.clone());
        let mut roster = Roster::new();
        roster.insert(player)?;
        Ok(Self {
            calendar: CareerCalendar::default(),
            player: id,
            roster,
            ledger: RankingLedger::new(),
            focus_organization: None,
            history: Vec::new(),
            world_log: WorldLog::new(),
            pro_debut_month: None,
            last_player_fight_month: None,
            divisions_fought,
            division_changes: 0,
            staff: SportsScienceStaff::default(),
            retirement: None,
        })
    }

    pub fn player(&self) -> Result<&Boxer> {
        self.roster.get(self.player)
    }

    pub fn player_mut(&mut self) -> Result<&mut Boxer> {
        self.roster.get_mut(self.player)
    }

    pub fn is_retired(&self) -> bool {
        self.retirement.is_some()
    }

    /// Months since the player's last bout, counted from the pro debut
    /// when there has been none. 0 in a month with a player bout.
    pub fn idle_months(&self) -> u32 {
        let now = self.calendar.career_months();
        let since = self.last_player_fight_month.or(self.pro_debut_month).unwrap_or(now);
        now.saturating_sub(since)
    }

    /// Pro bouts per year since the debut (at least one year of history is assumed)
    pub fn fights_per_year(&self) -> Result<f64> {
        let Some(debut) = self.pro_debut_month else {
            return Ok(0.0);
        };
        let years = (self.calendar.career_months().saturating_sub(debut) as f64 / 12.0).max(1.0);
        Ok(self.player()?.pro_record.total() as f64 / years)
    }

    pub fn strength_factors(&self) -> Result<StrengthFactors> {
        Ok(StrengthFactors {
            divisions_fought: self.divisions_fought.len(),
            division_changes: self.division_changes,
            fights_per_year: self.fights_per_year()?,
        })
    }

    pub fn ranking_snapshot(&self, config: &RulesConfig, organization: &str, division: &str) -> Result<RankingSnapshot> {
        config.organization(organization)?;
        config.division_index(division)?;
        let ranking = self.ledger.ranking(organization, division)?;
        let lineal_holder = self.ledger.lineal(division).and_then(|t| t.holder);

        let mut rows = Vec::with_capacity(ranking.len());
        for (index, id) in ranking.entries().iter().enumerate() {
            let boxer = self.roster.get(*id)?;
            rows.push(RankingRow {
                rank: index + 1,
                boxer: *id,
                name: boxer.name.clone(),
                rating: overall_rating(boxer, config),
                record: boxer.pro_record,
                is_champion: ranking.champion == Some(*id),
                is_lineal_champion: lineal_holder == Some(*id),
                is_player: *id == self.player,
            });
        }

        Ok(RankingSnapshot {
            organization: organization.to_string(),
            division: division.to_string(),
            champion: ranking.champion,
            defenses: ranking.defenses,
            lineal_holder,
            rows,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let state: Self = serde_json::from_str(json)?;
        if !state.roster.contains(state.player) {
            return Err(CareerError::UnknownBoxer(state.player));
        }
        state.ledger.validate()?;
        Ok(state)
    }
}

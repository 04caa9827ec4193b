//! Pound-for-pound strength score and ranking
//!
//! Not authoritative for titles. Used for division-change seeding and the
//! P4P snapshot.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::career::boxer::{Boxer, FightRecord};
use crate::career::ledger::RankingLedger;
use crate::career::rating::overall_rating;
use crate::career::roster::Roster;
use crate::core::config::RulesConfig;
use crate::core::types::{clamp_f64, BoxerId};

/// Career factors the roster does not carry for every boxer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrengthFactors {
    pub divisions_fought: usize,
    pub division_changes: u32,
    pub fights_per_year: f64,
}

impl StrengthFactors {
    /// Assumed for NPCs, who only ever hold one division
    pub fn npc() -> Self {
        Self {
            divisions_fought: 1,
            division_changes: 0,
            fights_per_year: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct P4PEntry {
    pub rank: usize,
    pub boxer: BoxerId,
    pub name: String,
    pub division: String,
    pub score: f64,
    pub rating: i32,
    pub record: FightRecord,
    pub is_lineal_champion: bool,
    pub is_player: bool,
}

pub fn strength_score(boxer: &Boxer, config: &RulesConfig, ledger: &RankingLedger, factors: &StrengthFactors) -> f64 {
    let rating = overall_rating(boxer, config) as f64;
    let record = &boxer.pro_record;

    let resume = record.wins as f64 * 1.6 - record.losses as f64 * 2.4 + record.draws as f64 * 0.5 + record.ko_ratio() * 8.0;
    let quality = ledger
        .best_rank(&boxer.division, boxer.id)
        .map(|rank| (41.0 - rank as f64).max(0.0) * 0.9)
        .unwrap_or(0.0);
    let lineal = ledger
        .lineal(&boxer.division)
        .filter(|t| t.holder == Some(boxer.id))
        .map(|t| 14.0 + t.defenses as f64 * 1.5)
        .unwrap_or(0.0);
    let multi_division = factors.divisions_fought.max(1) as f64 * 2.5 + factors.division_changes as f64 * 0.8;
    let activity = clamp_f64(factors.fights_per_year * 2.8, 0.0, 12.0);

    let score = rating * 1.85 + resume + quality + lineal + multi_division + activity;
    (score * 100.0).round() / 100.0
}

/// Rank every active pro across all divisions. The player (if any) gets
/// their own factors; everyone else uses `StrengthFactors::npc()`.
pub fn p4p_ranking(
    roster: &Roster,
    config: &RulesConfig,
    ledger: &RankingLedger,
    player: Option<(BoxerId, &StrengthFactors)>,
) -> Vec<P4PEntry> {
    let npc = StrengthFactors::npc();
    let mut entries: Vec<P4PEntry> = roster
        .iter()
        .filter(|b| b.is_active() && b.is_pro())
        .map(|boxer| {
            let (factors, is_player) = match player {
                Some((id, factors)) if id == boxer.id => (factors, true),
                _ => (&npc, false),
            };
            P4PEntry {
                rank: 0,
                boxer: boxer.id,
                name: boxer.name.clone(),
                division: boxer.division.clone(),
                score: strength_score(boxer, config, ledger, factors),
                rating: overall_rating(boxer, config),
                record: boxer.pro_record,
                is_lineal_champion: ledger.is_lineal_holder(boxer.id),
                is_player,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        OrderedFloat(b.score)
            .cmp(&OrderedFloat(a.score))
            .then(b.rating.cmp(&a.rating))
            .then(a.boxer.cmp(&b.boxer))
    });
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index + 1;
    }
    entries
}

/// Top `top_n` entries, plus the player's row when they fall outside it
pub fn p4p_snapshot(ranking: &[P4PEntry], top_n: usize) -> Vec<P4PEntry> {
    let mut visible: Vec<P4PEntry> = ranking.iter().take(top_n).cloned().collect();
    if let Some(player) = ranking.iter().find(|e| e.is_player && e.rank > top_n) {
        visible.push(player.clone());
    }
    visible
}

pub fn p4p_position(ranking: &[P4PEntry], id: BoxerId) -> Option<usize> {
    ranking.iter().find(|e| e.boxer == id).map(|e| e.rank)
}

//! Shared fixtures for integration tests

#![allow(dead_code)]

use ring_career::career::{Career, NewBoxer, OrganizationRanking, RankingLedger, Stats};
use ring_career::core::config::ProReadiness;
use ring_career::core::{BoutKind, BoxerId, RulesConfig};
use ring_career::fight::{FightMethod, FightResult, Scorecard};

pub const DIV: &str = "welterweight";

pub fn prospect(name: &str, division: &str) -> NewBoxer {
    NewBoxer {
        name: name.to_string(),
        age: 20,
        height_inches: 70,
        weight_lbs: 145,
        division: division.to_string(),
        stats: Stats::uniform(62),
    }
}

/// Default rules with the amateur gate open, for fixtures that start as pros
pub fn open_gate() -> RulesConfig {
    let mut config = RulesConfig::default();
    config.amateur_progression.pro_readiness = ProReadiness {
        min_age: 0,
        min_fights: 0,
        min_points: 0,
    };
    config
}

pub fn pro_career(seed: u64) -> Career {
    let mut career = Career::new(open_gate(), seed, prospect("Test Prospect", DIV)).unwrap();
    career.turn_pro().unwrap();
    career
}

/// Ranking of ids `1..=slots` with an optional champion at #1
pub fn full_ledger(config: &RulesConfig, champion: Option<u32>) -> RankingLedger {
    let mut ledger = RankingLedger::new();
    ledger.ensure_division(config, DIV).unwrap();
    for org in &config.organizations {
        let entries = (1..=org.ranking_slots as u32).map(BoxerId).collect();
        let ranking =
            OrganizationRanking::with_entries(&org.name, DIV, org.ranking_slots, entries, champion.map(BoxerId))
                .unwrap();
        ledger.insert_ranking(config, ranking).unwrap();
    }
    ledger
}

/// A pro result with the given winner (None for a draw)
pub fn pro_result(red: u32, blue: u32, winner: Option<u32>, stoppage_round: Option<u32>, scheduled: u32) -> FightResult {
    let method = match (winner, stoppage_round) {
        (None, _) => FightMethod::Draw,
        (Some(_), Some(_)) => FightMethod::Stoppage,
        (Some(_), None) => FightMethod::UnanimousDecision,
    };
    FightResult {
        red: BoxerId(red),
        blue: BoxerId(blue),
        kind: BoutKind::Pro,
        winner: winner.map(BoxerId),
        method,
        rounds_scheduled: scheduled,
        rounds_completed: stoppage_round.unwrap_or(scheduled),
        stoppage_round,
        scorecards: vec![Scorecard::default(); 3],
        rounds: Vec::new(),
    }
}

/// Champion-at-#1, slot bound and no duplicates for every ranking in the division
pub fn assert_ledger_invariants(ledger: &RankingLedger, config: &RulesConfig, division: &str) {
    for org in config.organization_names() {
        let ranking = ledger.ranking(org, division).unwrap();
        assert!(ranking.len() <= ranking.slots, "{} overflows", org);
        let mut seen = std::collections::BTreeSet::new();
        for id in ranking.entries() {
            assert!(seen.insert(*id), "{} ranks {} twice", org, id);
        }
        if let Some(champion) = ranking.champion {
            assert_eq!(ranking.at_rank(1), Some(champion), "{} champion not at #1", org);
        }
    }
}

//! Career integration tests
//!
//! End-to-end scenarios through the ledger and the orchestrator.

mod common;

use std::collections::BTreeMap;

use common::*;
use ring_career::career::ledger::SanctionedBody;
use ring_career::career::{ActivityStatus, Career, CareerSave, FightRequest, LinealTitle, TitleScope, TitleTransition};
use ring_career::core::{BoutKind, BoxerId, CareerError, RulesConfig};

/// Rank 5 stops rank 2 in round 6 of 10 under one body
#[test]
fn test_rank_five_stops_rank_two_in_one_body() {
    let config = RulesConfig::default();
    let mut ledger = full_ledger(&config, Some(1));
    let before = ledger.clone();

    let result = pro_result(5, 2, Some(5), Some(6), 10);
    let bodies = vec![SanctionedBody {
        organization: "WBA".into(),
        title_fight: false,
    }];
    let report = ledger.apply_bout(&config, &result, DIV, "WBA", &bodies, |_| true).unwrap();

    let winner_rank = ledger.rank_of("WBA", DIV, BoxerId(5)).unwrap();
    let loser_rank = ledger.rank_of("WBA", DIV, BoxerId(2)).unwrap();
    assert!(winner_rank < 5);
    assert_eq!(winner_rank, 5 - config.ranking.win_step);
    assert_eq!(loser_rank, 2 + config.ranking.loss_step);
    assert!(report.titles.is_empty());

    for org in ["WBC", "IBF", "WBO"] {
        assert_eq!(ledger.ranking(org, DIV).unwrap(), before.ranking(org, DIV).unwrap());
    }
    assert_ledger_invariants(&ledger, &config, DIV);
}

/// Multi-body sanctioning moves every selected body and only those
#[test]
fn test_multi_body_bout_moves_each_selected_body() {
    let config = RulesConfig::default();
    let mut ledger = full_ledger(&config, Some(1));
    let before = ledger.clone();
    let bodies: Vec<SanctionedBody> = ["WBC", "IBF"]
        .iter()
        .map(|org| SanctionedBody {
            organization: org.to_string(),
            title_fight: false,
        })
        .collect();
    ledger
        .apply_bout(&config, &pro_result(9, 7, Some(9), None, 10), DIV, "WBC", &bodies, |_| true)
        .unwrap();
    assert_eq!(ledger.rank_of("WBC", DIV, BoxerId(9)), Some(7));
    assert_eq!(ledger.rank_of("IBF", DIV, BoxerId(9)), Some(7));
    assert_eq!(ledger.ranking("WBA", DIV).unwrap(), before.ranking("WBA", DIV).unwrap());
}

#[test]
fn test_champion_draw_retains_title() {
    let config = RulesConfig::default();
    let mut ledger = full_ledger(&config, Some(1));
    let bodies = vec![SanctionedBody {
        organization: "WBO".into(),
        title_fight: true,
    }];
    let report = ledger
        .apply_bout(&config, &pro_result(1, 3, None, None, 12), DIV, "WBO", &bodies, |_| true)
        .unwrap();
    let ranking = ledger.ranking("WBO", DIV).unwrap();
    assert_eq!(ranking.champion, Some(BoxerId(1)));
    assert_eq!(ranking.at_rank(1), Some(BoxerId(1)));
    assert!(report
        .titles
        .iter()
        .any(|t| t.scope == TitleScope::Organization("WBO".into()) && t.transition == TitleTransition::RetainedOnDraw));
}

#[test]
fn test_lineal_vacancy_uses_top_pairing_with_fallback() {
    let config = RulesConfig::default();
    let bodies = vec![SanctionedBody {
        organization: "WBC".into(),
        title_fight: false,
    }];

    let mut ledger = full_ledger(&config, None);
    ledger
        .apply_bout(&config, &pro_result(1, 2, Some(2), None, 12), DIV, "WBC", &bodies, |_| true)
        .unwrap();
    assert_eq!(ledger.lineal(DIV).unwrap().holder, Some(BoxerId(2)));

    // #2 is injured: #1 vs #3 is the unification bout
    let mut ledger = full_ledger(&config, None);
    let available = |id: BoxerId| id != BoxerId(2);
    ledger
        .apply_bout(&config, &pro_result(1, 3, Some(1), None, 12), DIV, "WBC", &bodies, available)
        .unwrap();
    assert_eq!(ledger.lineal(DIV).unwrap().holder, Some(BoxerId(1)));

    // with #2 available, #1 vs #3 is an ordinary bout
    let mut ledger = full_ledger(&config, None);
    ledger
        .apply_bout(&config, &pro_result(1, 3, Some(1), None, 12), DIV, "WBC", &bodies, |_| true)
        .unwrap();
    assert_eq!(ledger.lineal(DIV).unwrap().holder, None);
}

#[test]
fn test_corrupt_ranking_is_rejected_without_changes() {
    let config = RulesConfig::default();
    let mut ledger = full_ledger(&config, Some(1));
    let before = ledger.clone();
    let bodies = vec![SanctionedBody {
        organization: "IBO".into(),
        title_fight: false,
    }];
    let err = ledger
        .apply_bout(&config, &pro_result(3, 4, Some(3), None, 10), DIV, "WBC", &bodies, |_| true)
        .unwrap_err();
    assert!(matches!(err, CareerError::UnknownOrganization(_)));
    assert!(err.is_validation());
    let err = ledger
        .apply_bout(&config, &pro_result(3, 4, Some(3), None, 10), "lightweight", "WBC", &[], |_| true)
        .unwrap_err();
    assert!(matches!(err, CareerError::MissingRanking { .. }));
    assert_eq!(ledger, before);
}

/// Bodies outside the sanctioning record never move for a player bout
#[test]
fn test_player_bouts_only_move_sanctioned_bodies() {
    let mut career = pro_career(31);
    let config = career.config().clone();
    for _ in 0..12 {
        if !career.player().unwrap().is_active() {
            break;
        }
        let division = career.player().unwrap().division.clone();
        let before: BTreeMap<String, _> = config
            .organization_names()
            .map(|org| (org.to_string(), career.state().ledger.ranking(org, &division).unwrap().clone()))
            .collect();

        let opponent = career.generate_opponent().unwrap();
        let player = career.state().player;
        let entry = career
            .schedule_fight(FightRequest::new(player, opponent, BoutKind::Pro))
            .unwrap();
        let record = entry.sanctioning.as_ref().unwrap();
        assert!(record.organizations().any(|org| org == record.primary));

        for (org, ranking) in &before {
            if record.organizations().all(|selected| selected != org) {
                assert_eq!(career.state().ledger.ranking(org, &division).unwrap(), ranking);
            }
        }
        assert_ledger_invariants(&career.state().ledger, &config, &division);

        for _ in 0..3 {
            career.advance_month().unwrap();
        }
    }
    assert!(career.player().unwrap().pro_record.total() > 0);
}

#[test]
fn test_division_change_vacates_lineal_and_reseeds() {
    let career = pro_career(44);
    let mut save: CareerSave = career.to_save();
    let player = save.state.player;
    save.state.ledger.set_lineal(
        DIV,
        LinealTitle {
            holder: Some(player),
            defenses: 2,
        },
    );
    let mut career = Career::from_save(RulesConfig::default(), save).unwrap();
    let fatigue_before = career.player().unwrap().fatigue;

    let report = career.change_division("lightweight").unwrap();
    assert_eq!(career.player().unwrap().division, "lightweight");
    assert_eq!(career.state().ledger.lineal(DIV).unwrap().holder, None);
    assert!(report
        .ledger
        .titles
        .iter()
        .any(|t| t.scope == TitleScope::Lineal && t.transition == TitleTransition::Vacated));
    assert_eq!(career.state().ledger.best_rank(DIV, player), None);
    assert!(career.player().unwrap().fatigue > fatigue_before);
    assert_eq!(career.state().division_changes, 1);
    assert_eq!(career.state().divisions_fought.len(), 2);

    let err = career.change_division("heavyweight").unwrap_err();
    assert!(matches!(err, CareerError::InvalidRequest(_)));
}

#[test]
fn test_retirement_is_terminal_and_vacates_titles() {
    let career = pro_career(52);
    let mut save = career.to_save();
    let player = save.state.player;
    let cap = RulesConfig::default().retirement.hard_age_cap;
    save.state.player_mut().unwrap().age = cap;
    save.state.ledger.set_lineal(
        DIV,
        LinealTitle {
            holder: Some(player),
            defenses: 0,
        },
    );
    let mut career = Career::from_save(RulesConfig::default(), save).unwrap();

    let report = career.advance_month().unwrap();
    let evaluation = report.retirement.unwrap();
    assert!(evaluation.forced && evaluation.newly_retired);
    assert!(report.vacated.iter().any(|t| t.scope == TitleScope::Lineal));
    assert!(career.state().is_retired());
    assert!(!career.state().ledger.is_lineal_holder(player));

    let record = career.state().retirement.clone().unwrap();
    for _ in 0..24 {
        let report = career.advance_month().unwrap();
        assert!(report.retirement.is_none());
        assert!(matches!(career.player().unwrap().status, ActivityStatus::Retired { .. }));
    }
    assert_eq!(career.state().retirement.as_ref(), Some(&record));

    let opponent = career.state().ledger.ranking("WBC", DIV).unwrap().at_rank(4).unwrap();
    let err = career
        .schedule_fight(FightRequest::new(player, opponent, BoutKind::Pro))
        .unwrap_err();
    assert!(matches!(err, CareerError::BoxerRetired(_)));
}

#[test]
fn test_world_keeps_moving_while_player_idles() {
    let mut career = pro_career(63);
    let mut events = 0;
    for _ in 0..12 {
        events += career.advance_month().unwrap().world_events;
    }
    assert!(events > 0);
    assert_eq!(career.state().world_log.len(), events);
    let config = career.config().clone();
    for division in config.division_names() {
        assert_ledger_invariants(&career.state().ledger, &config, division);
    }
    assert_eq!(career.prune_world_log(5), events.saturating_sub(5));
    assert!(career.state().world_log.len() <= 5);
}

#[test]
fn test_snapshots_cover_ranking_and_p4p() {
    let career = pro_career(71);
    let snapshot = career.ranking_snapshot("IBF", DIV).unwrap();
    assert_eq!(snapshot.rows.len(), 15);
    assert_eq!(snapshot.rows[0].rank, 1);
    assert_eq!(snapshot.rows[0].is_champion, snapshot.champion.is_some());

    let p4p = career.p4p_snapshot(10).unwrap();
    assert!(p4p.len() <= 11);
    assert!(p4p.windows(2).take(9).all(|w| w[0].score >= w[1].score));
    assert!(p4p.iter().any(|e| e.is_player));
}

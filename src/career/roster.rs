//! Boxer registry and NPC population
//!
//! The roster owns every boxer in a save, player included. NPC contenders are
//! generated once per division when the player turns pro, and journeymen are
//! added on demand as unranked opponents.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::career::boxer::{Boxer, StatKind, Stats};
use crate::career::ledger::{LinealTitle, OrganizationRanking, RankingLedger};
use crate::career::rating::overall_rating;
use crate::core::config::RulesConfig;
use crate::core::error::{CareerError, Result};
use crate::core::types::{clamp_i32, BoutKind, BoxerId};

const FIRST_NAMES: &[&str] = &[
    "Alex", "Marcus", "Daniel", "Ramon", "Victor", "Tyrell", "Julian", "Andrei", "Caleb", "Javier",
    "Noah", "Darius", "Emilio", "Kendrick", "Owen", "Luis", "Sergei", "Isaac", "Mateo", "Ruben",
];

const LAST_NAMES: &[&str] = &[
    "Cruz", "Foster", "Mendez", "Khan", "Diaz", "Porter", "Ward", "Ibarra", "Silva", "Bennett",
    "Choi", "Petrov", "Hughes", "Navarro", "Sims", "Okafor", "Reyes", "Walsh", "Tanaka", "Moreno",
];

/// NPC stat spread around the target rating
const STAT_SPREAD: i32 = 4;

pub fn random_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Alex");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Cruz");
    format!("{} {}", first, last)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    boxers: BTreeMap<BoxerId, Boxer>,
    next_id: u32,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate_id(&mut self) -> BoxerId {
        let id = BoxerId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn insert(&mut self, boxer: Boxer) -> Result<()> {
        if self.boxers.contains_key(&boxer.id) {
            return Err(CareerError::InvalidRequest(format!("{} already on the roster", boxer.id)));
        }
        self.next_id = self.next_id.max(boxer.id.0 + 1);
        self.boxers.insert(boxer.id, boxer);
        Ok(())
    }

    pub fn get(&self, id: BoxerId) -> Result<&Boxer> {
        self.boxers.get(&id).ok_or(CareerError::UnknownBoxer(id))
    }

    pub fn get_mut(&mut self, id: BoxerId) -> Result<&mut Boxer> {
        self.boxers.get_mut(&id).ok_or(CareerError::UnknownBoxer(id))
    }

    pub fn contains(&self, id: BoxerId) -> bool {
        self.boxers.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Boxer> {
        self.boxers.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Boxer> {
        self.boxers.values_mut()
    }

    pub fn len(&self) -> usize {
        self.boxers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxers.is_empty()
    }

    pub fn name_of(&self, id: BoxerId) -> String {
        self.boxers
            .get(&id)
            .map(|b| b.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Active pros in a division, id order
    pub fn active_in_division<'a>(&'a self, division: &'a str) -> impl Iterator<Item = &'a Boxer> + 'a {
        self.boxers
            .values()
            .filter(move |b| b.is_active() && b.is_pro() && b.division == division)
    }

    /// Generate an NPC whose stats sit around `rating`
    pub fn spawn_npc<R: Rng + ?Sized>(
        &mut self,
        config: &RulesConfig,
        division: &str,
        rating: i32,
        stage: BoutKind,
        rng: &mut R,
    ) -> Result<BoxerId> {
        let class_index = config.division_index(division)?;
        let class = &config.weight_classes[class_index];
        let limits = &config.aging;

        let mut stats = Stats::uniform(rating);
        for kind in StatKind::ALL {
            let delta = rng.gen_range(-STAT_SPREAD..=STAT_SPREAD);
            stats.adjust(kind, delta, limits.stat_min, limits.stat_max);
        }

        let id = self.allocate_id();
        let roster = &config.roster;
        let mut boxer = Boxer::new(
            id,
            random_name(rng),
            rng.gen_range(roster.min_age..=roster.max_age),
            division,
            stats,
        );
        boxer.stage = stage;
        if stage == BoutKind::Pro {
            let record = &mut boxer.pro_record;
            record.wins = (rating.max(0) as u32) / 6 + rng.gen_range(0..=6);
            record.losses = record.wins / 4 + rng.gen_range(0..=4);
            record.draws = rng.gen_range(0..=3);
            record.kos = (record.wins / 2).max(1);
        }
        boxer.weight_lbs = rng.gen_range(class.min_lbs..=class.max_lbs.min(class.min_lbs + 12));
        boxer.height_inches = 62 + (class_index as u32 * 2) + rng.gen_range(0..=4);
        self.insert(boxer)?;
        Ok(id)
    }

    /// Fill one division with ranked contenders and seed every body's
    /// ranking from them. Each body reads the pool with its own jitter, and
    /// its #1 starts as champion. The lineal title goes to the boxer who
    /// tops the most bodies.
    pub fn populate_division<R: Rng + ?Sized>(
        &mut self,
        config: &RulesConfig,
        ledger: &mut RankingLedger,
        division: &str,
        rng: &mut R,
    ) -> Result<Vec<BoxerId>> {
        let rules = &config.roster;
        let mut pool = Vec::with_capacity(rules.contenders_per_division);
        for i in 0..rules.contenders_per_division {
            let jitter = rng.gen_range(-rules.rating_jitter..=rules.rating_jitter);
            let rating = (rules.top_rating - i as f64 * rules.rating_step).round() as i32 + jitter;
            let rating = clamp_i32(rating, config.aging.stat_min, config.aging.stat_max);
            pool.push(self.spawn_npc(config, division, rating, BoutKind::Pro, rng)?);
        }

        let mut staged = ledger.clone();
        staged.ensure_division(config, division)?;
        let mut champions: BTreeMap<BoxerId, usize> = BTreeMap::new();
        for org in &config.organizations {
            let mut scored: Vec<(f64, BoxerId)> = Vec::with_capacity(pool.len());
            for id in &pool {
                let rating = overall_rating(self.get(*id)?, config) as f64;
                scored.push((rating + rng.gen_range(-3.0..3.0), *id));
            }
            scored.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));
            let entries: Vec<BoxerId> = scored.into_iter().take(org.ranking_slots).map(|(_, id)| id).collect();
            let champion = entries.first().copied();
            if let Some(champion) = champion {
                *champions.entry(champion).or_default() += 1;
            }
            let ranking = OrganizationRanking::with_entries(&org.name, division, org.ranking_slots, entries, champion)?;
            staged.insert_ranking(config, ranking)?;
        }

        let lineal = champions
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
            .filter(|(_, count)| **count > 1)
            .map(|(id, _)| *id);
        staged.set_lineal(
            division,
            LinealTitle {
                holder: lineal,
                defenses: 0,
            },
        );

        *ledger = staged;
        tracing::debug!(division, contenders = pool.len(), lineal = ?lineal, "division populated");
        Ok(pool)
    }
}

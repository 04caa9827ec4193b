//! World news log

use serde::{Deserialize, Serialize};

use crate::career::ledger::{RankMovement, TitleEvent, TitleTransition};
use crate::core::types::{BoxerId, CareerMonth};
use crate::fight::judging::FightMethod;

/// A logged world event. Never mutated after it is appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldEvent {
    pub id: u64,
    pub career_month: CareerMonth,
    /// Shown in the news feed; every change is logged either way
    pub featured: bool,
    pub kind: WorldEventKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorldBout {
    /// Champion against the best available contender
    Defense,
    /// #1 vs #2 for a vacant organization belt
    Vacancy,
    /// #1 vs #2 for a vacant lineal title
    Unification,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftCause {
    Reshuffle,
    /// The player slid down the list while inactive
    IdleSlide,
    /// The player gained ground on contenders who lost or were inactive
    Bump,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorldEventKind {
    TitleBout {
        bout: WorldBout,
        organization: String,
        division: String,
        red: BoxerId,
        blue: BoxerId,
        winner: Option<BoxerId>,
        method: FightMethod,
        titles: Vec<TitleEvent>,
    },
    RankShift {
        cause: ShiftCause,
        movement: RankMovement,
    },
}

impl WorldEventKind {
    pub fn division(&self) -> &str {
        match self {
            WorldEventKind::TitleBout { division, .. } => division,
            WorldEventKind::RankShift { movement, .. } => &movement.division,
        }
    }

    pub fn involves(&self, id: BoxerId) -> bool {
        match self {
            WorldEventKind::TitleBout { red, blue, .. } => *red == id || *blue == id,
            WorldEventKind::RankShift { movement, .. } => movement.boxer == id,
        }
    }

    /// True when a belt or lineal title changed hands
    pub fn changes_holder(&self) -> bool {
        match self {
            WorldEventKind::TitleBout { titles, .. } => titles
                .iter()
                .any(|t| matches!(t.transition, TitleTransition::Captured { .. })),
            WorldEventKind::RankShift { .. } => false,
        }
    }
}

/// Append-only event log. Only the career orchestrator prunes it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldLog {
    events: Vec<WorldEvent>,
    next_event_id: u64,
}

impl WorldLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, career_month: CareerMonth, featured: bool, kind: WorldEventKind) -> u64 {
        let id = self.next_event_id;
        self.next_event_id += 1;
        self.events.push(WorldEvent {
            id,
            career_month,
            featured,
            kind,
        });
        id
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events_for_month(&self, month: CareerMonth) -> impl Iterator<Item = &WorldEvent> {
        self.events.iter().filter(move |e| e.career_month == month)
    }

    pub fn events_for_boxer(&self, id: BoxerId) -> impl Iterator<Item = &WorldEvent> {
        self.events.iter().filter(move |e| e.kind.involves(id))
    }

    /// Latest featured events, newest first
    pub fn news_feed(&self, limit: usize) -> Vec<&WorldEvent> {
        self.events.iter().rev().filter(|e| e.featured).take(limit).collect()
    }

    /// Keep only the newest `keep` events. Ids keep increasing across prunes.
    pub(crate) fn prune_to(&mut self, keep: usize) -> usize {
        let excess = self.events.len().saturating_sub(keep);
        self.events.drain(..excess);
        excess
    }
}

//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a boxer (player or NPC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BoxerId(pub u32);

impl fmt::Display for BoxerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Career months elapsed since the save started (one tick = one month)
pub type CareerMonth = u32;

/// Side of the ring. Red is the side that requested the bout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    Red,
    Blue,
}

impl Corner {
    pub fn opposite(self) -> Self {
        match self {
            Corner::Red => Corner::Blue,
            Corner::Blue => Corner::Red,
        }
    }
}

/// Which rule set a bout is fought under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoutKind {
    Amateur,
    Pro,
}

impl fmt::Display for BoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoutKind::Amateur => write!(f, "amateur"),
            BoutKind::Pro => write!(f, "pro"),
        }
    }
}

/// Clamp helper shared by the stat and wear models
pub fn clamp_i32(value: i32, min: i32, max: i32) -> i32 {
    value.max(min).min(max)
}

/// Clamp helper for probabilities and factors
pub fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

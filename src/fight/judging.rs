//! Judge scorecards and decision method

use serde::{Deserialize, Serialize};

use crate::core::types::Corner;

/// One judge's cumulative card (10-point must system)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    pub red: u32,
    pub blue: u32,
}

impl Scorecard {
    /// Score a single round from the judge's perceived margin (positive favours red)
    pub fn score_round(&mut self, perceived_margin: f64, scoring_margin: f64) {
        if perceived_margin > scoring_margin {
            self.red += 10;
            self.blue += 9;
        } else if perceived_margin < -scoring_margin {
            self.red += 9;
            self.blue += 10;
        } else {
            self.red += 10;
            self.blue += 10;
        }
    }

    /// The corner this judge favours, or `None` for an even card
    pub fn verdict(&self) -> Option<Corner> {
        match self.red.cmp(&self.blue) {
            std::cmp::Ordering::Greater => Some(Corner::Red),
            std::cmp::Ordering::Less => Some(Corner::Blue),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn spread(&self) -> u32 {
        self.red.abs_diff(self.blue)
    }
}

/// How a bout ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FightMethod {
    UnanimousDecision,
    SplitDecision,
    MajorityDecision,
    Draw,
    Stoppage,
}

impl FightMethod {
    pub fn abbreviation(self) -> &'static str {
        match self {
            FightMethod::UnanimousDecision => "UD",
            FightMethod::SplitDecision => "SD",
            FightMethod::MajorityDecision => "MD",
            FightMethod::Draw => "D",
            FightMethod::Stoppage => "TKO",
        }
    }
}

/// Derive the winning corner and method from the judges' cards.
///
/// A corner wins only with more than half of the cards. Otherwise the
/// bout is a draw (split draws and majority draws both land here).
pub fn decide(cards: &[Scorecard]) -> (Option<Corner>, FightMethod) {
    let judges = cards.len();
    let red = cards.iter().filter(|c| c.verdict() == Some(Corner::Red)).count();
    let blue = cards.iter().filter(|c| c.verdict() == Some(Corner::Blue)).count();
    let even = judges - red - blue;

    let (winner, votes, against) = if red * 2 > judges {
        (Corner::Red, red, blue)
    } else if blue * 2 > judges {
        (Corner::Blue, blue, red)
    } else {
        return (None, FightMethod::Draw);
    };

    let method = if votes == judges {
        FightMethod::UnanimousDecision
    } else if even > 0 && against == 0 {
        FightMethod::MajorityDecision
    } else {
        FightMethod::SplitDecision
    };
    (Some(winner), method)
}

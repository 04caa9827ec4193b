//! Career calendar
//!
//! One tick is one in-game month. The calendar only moves forward.

use serde::{Deserialize, Serialize};

use crate::core::types::CareerMonth;

/// Calendar tracks career time with month granularity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerCalendar {
    month: u8,
    year: u32,
    career_months: CareerMonth,
}

impl CareerCalendar {
    pub fn new(month: u8, year: u32) -> Self {
        Self {
            month: month.clamp(1, 12),
            year,
            career_months: 0,
        }
    }

    /// Advance one month. Returns true when a full career year has elapsed
    /// (the boxer's birthday month).
    pub fn advance(&mut self) -> bool {
        self.month += 1;
        if self.month > 12 {
            self.month = 1;
            self.year += 1;
        }
        self.career_months += 1;
        self.career_months % 12 == 0
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn career_months(&self) -> CareerMonth {
        self.career_months
    }
}

impl Default for CareerCalendar {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_advances() {
        let mut cal = CareerCalendar::default();
        assert_eq!(cal.career_months(), 0);

        let birthday = cal.advance();
        assert!(!birthday);
        assert_eq!(cal.month(), 2);
        assert_eq!(cal.career_months(), 1);
    }

    #[test]
    fn test_calendar_rolls_year() {
        let mut cal = CareerCalendar::new(12, 3);
        cal.advance();
        assert_eq!(cal.month(), 1);
        assert_eq!(cal.year(), 4);
    }

    #[test]
    fn test_birthday_every_twelve_months() {
        let mut cal = CareerCalendar::default();
        let birthdays: Vec<u32> = (0..36)
            .filter_map(|_| cal.advance().then_some(cal.career_months()))
            .collect();
        assert_eq!(birthdays, vec![12, 24, 36]);
    }
}

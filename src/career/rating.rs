//! Overall boxer rating (20..=99)

use crate::career::boxer::Boxer;
use crate::career::experience::experience_profile;
use crate::core::config::RulesConfig;
use crate::core::types::clamp_i32;

pub const RATING_MIN: i32 = 20;
pub const RATING_MAX: i32 = 99;

/// Weighted stat rating under the boxer's current rule set, plus the
/// experience bonus, minus half a point per fatigue point
pub fn overall_rating(boxer: &Boxer, config: &RulesConfig) -> i32 {
    let model = config.fight_model(boxer.stage);
    let base = boxer.stats.weighted(&model.style_weights);
    let bonus = experience_profile(boxer.experience_points, &config.experience).fight_bonus;
    let fatigue_penalty = (boxer.fatigue as f64 * 0.5).round() as i32;
    clamp_i32((base + bonus).round() as i32 - fatigue_penalty, RATING_MIN, RATING_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::career::boxer::Stats;
    use crate::core::types::BoxerId;

    #[test]
    fn test_rating_tracks_stats_and_fatigue() {
        let config = RulesConfig::default();
        let mut boxer = Boxer::new(BoxerId(1), "Rated", 24, "middleweight", Stats::uniform(70));
        assert_eq!(overall_rating(&boxer, &config), 70);

        boxer.fatigue = 6;
        assert_eq!(overall_rating(&boxer, &config), 67);

        boxer.stats = Stats::uniform(99);
        boxer.experience_points = 10_000;
        boxer.fatigue = 0;
        assert_eq!(overall_rating(&boxer, &config), RATING_MAX);
    }
}

//! Experience points, levels and the in-fight bonus

use serde::{Deserialize, Serialize};

use crate::core::config::ExperienceModel;
use crate::core::types::BoutKind;
use crate::fight::resolution::Outcome;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceProfile {
    pub points: u32,
    /// 1-based level index
    pub level: u32,
    pub title: String,
    pub fight_bonus: f64,
    pub next_level_points: Option<u32>,
}

/// Resolve raw points into a level. Levels are matched lightest threshold first.
pub fn experience_profile(points: u32, model: &ExperienceModel) -> ExperienceProfile {
    let mut levels: Vec<_> = model.levels.iter().collect();
    levels.sort_by_key(|l| l.min_points);

    let index = levels
        .iter()
        .rposition(|l| points >= l.min_points)
        .unwrap_or(0);
    let title = levels
        .get(index)
        .map(|l| l.name.clone())
        .unwrap_or_else(|| "newcomer".to_string());
    let fight_bonus = (index as f64 * model.fight_bonus_per_level).min(model.max_fight_bonus);

    ExperienceProfile {
        points,
        level: index as u32 + 1,
        title,
        fight_bonus,
        next_level_points: levels.get(index + 1).map(|l| l.min_points),
    }
}

/// Points earned from one bout
pub fn fight_experience_gain(
    model: &ExperienceModel,
    kind: BoutKind,
    outcome: Outcome,
    stoppage_win: bool,
    opponent_rating: i32,
) -> u32 {
    let base = match kind {
        BoutKind::Amateur => model.base_points_amateur,
        BoutKind::Pro => model.base_points_pro,
    };
    let result_points = match outcome {
        Outcome::Win => model.win_points,
        Outcome::Draw => model.draw_points,
        Outcome::Loss => model.loss_points,
    };
    let quality = ((opponent_rating - 50) as f64 * model.rating_bonus_scale).round().max(0.0) as u32;
    let ko = if stoppage_win { model.ko_bonus } else { 0 };
    (base + result_points + quality + ko).clamp(1, model.max_gain_per_fight.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        let model = ExperienceModel::default();
        let fresh = experience_profile(0, &model);
        assert_eq!(fresh.level, 1);
        assert_eq!(fresh.title, "newcomer");
        assert_eq!(fresh.fight_bonus, 0.0);
        assert_eq!(fresh.next_level_points, Some(40));

        let seasoned = experience_profile(130, &model);
        assert_eq!(seasoned.title, "seasoned");
        assert!((seasoned.fight_bonus - 1.2).abs() < 1e-9);

        let legend = experience_profile(5_000, &model);
        assert_eq!(legend.title, "legend");
        assert_eq!(legend.next_level_points, None);
        assert!((legend.fight_bonus - model.max_fight_bonus).abs() < 1e-9);
    }

    #[test]
    fn test_gain() {
        let model = ExperienceModel::default();
        // 8 base + 4 win + round(20 * 0.1) + 2 ko
        assert_eq!(fight_experience_gain(&model, BoutKind::Pro, Outcome::Win, true, 70), 16);
        // weak opponents never subtract
        assert_eq!(fight_experience_gain(&model, BoutKind::Amateur, Outcome::Loss, false, 30), 5);
    }
}

use serde::Serialize;

use crate::game_index::GameIndex;
use crate::series::total_excitement;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcitementRanking {
    pub week: u32,
    pub game_id: String,
    pub total_excitement: f64,
}

/// Scan every game once and keep the one with the largest total excitement.
///
/// Games are visited weeks ascending, then first-seen within a week; a later
/// game must be strictly more exciting to replace the leader. Games whose total
/// is not finite (NaN win probabilities) never lead.
pub fn most_exciting_game(index: &GameIndex) -> Option<ExcitementRanking> {
    let mut best: Option<ExcitementRanking> = None;
    for game in index.games() {
        let total = total_excitement(index.plays_for_game(&game.game_id));
        if !total.is_finite() {
            log::warn!("skipping game {} with non-finite excitement", game.game_id);
            continue;
        }
        let leads = best
            .as_ref()
            .is_none_or(|current| total > current.total_excitement);
        if leads {
            best = Some(ExcitementRanking {
                week: game.week,
                game_id: game.game_id.clone(),
                total_excitement: total,
            });
        }
    }
    if let Some(ranking) = &best {
        log::info!(
            "most exciting game: {} (week {}, {:.3})",
            ranking.game_id,
            ranking.week,
            ranking.total_excitement
        );
    }
    best
}

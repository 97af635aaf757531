use chrono::{Duration as ChronoDuration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::record_store::{PlayRecord, WinProbInput};
use crate::teams::team_codes;

const SEASON: i32 = 2023;
const REGULAR_WEEKS: u32 = 18;
const PLAYOFF_WEEKS: u32 = 2;

/// A deterministic synthetic season for `team`: one game per week, one bye
/// week, and a random-walk home win probability for every play.
pub fn generate(seed: u64, team: &str) -> Vec<PlayRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let team = team.trim().to_uppercase();
    let mut opponents = team_codes()
        .filter(|code| !code.eq_ignore_ascii_case(&team))
        .collect::<Vec<_>>();
    opponents.shuffle(&mut rng);

    let bye_week = rng.gen_range(6..=13);
    let kickoff = NaiveDate::from_ymd_opt(SEASON, 9, 10).unwrap_or_default();

    let mut plays = Vec::new();
    let mut play_id = 1u32;
    let mut opponent_iter = opponents.into_iter().cycle();
    for week in 1..=REGULAR_WEEKS + PLAYOFF_WEEKS {
        if week == bye_week {
            continue;
        }
        let Some(opponent) = opponent_iter.next() else {
            break;
        };
        let at_home = rng.gen_bool(0.5);
        let (home, away) = if at_home {
            (team.clone(), opponent.to_string())
        } else {
            (opponent.to_string(), team.clone())
        };
        let date = kickoff + ChronoDuration::days(7 * i64::from(week - 1));
        let game_id = format!("{SEASON}_{week:02}_{away}_{home}");

        for wp in random_walk(&mut rng) {
            plays.push(PlayRecord {
                play_id: Some(play_id.to_string()),
                week,
                game_id: game_id.clone(),
                home_team: home.clone(),
                away_team: away.clone(),
                game_date: date.format("%Y-%m-%d").to_string(),
                home_wp: Some(WinProbInput::Number(wp)),
            });
            play_id += 1;
        }
    }
    log::debug!("generated demo season with {} plays", plays.len());
    plays
}

fn random_walk(rng: &mut StdRng) -> Vec<f64> {
    let len = rng.gen_range(120..=170);
    let mut wp: f64 = 0.5 + rng.gen_range(-0.15..0.15);
    let mut out = Vec::with_capacity(len);
    for step in 0..len {
        if step == len - 1 {
            out.push(if wp >= 0.5 { 1.0 } else { 0.0 });
            break;
        }
        out.push(round3(wp));
        // Swings grow as the clock runs down.
        let late = step as f64 / len as f64;
        let scale = 0.02 + 0.06 * late * late;
        let mut delta = rng.gen_range(-scale..scale);
        if rng.gen_bool(0.03) {
            delta *= 4.0;
        }
        wp = (wp + delta).clamp(0.01, 0.99);
    }
    out
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn same_seed_same_season() {
        assert_eq!(generate(7, "BUF"), generate(7, "BUF"));
    }

    #[test]
    fn one_bye_week_and_one_game_per_week() {
        let plays = generate(11, "buf");
        let weeks = plays.iter().map(|p| p.week).collect::<HashSet<_>>();
        assert_eq!(weeks.len() as u32, REGULAR_WEEKS + PLAYOFF_WEEKS - 1);
        let games = plays.iter().map(|p| &p.game_id).collect::<HashSet<_>>();
        assert_eq!(games.len(), weeks.len());
        assert!(plays.iter().all(|p| p.involves("BUF")));
    }

    #[test]
    fn games_end_decided() {
        let plays = generate(3, "BUF");
        let last = plays.last().expect("demo season has plays");
        let wp = last.home_win_prob();
        assert!(wp == 0.0 || wp == 1.0);
    }
}

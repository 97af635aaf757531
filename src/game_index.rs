use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::record_store::{PlayRecord, RecordStore};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Game {
    pub game_id: String,
    pub week: u32,
    pub home_team: String,
    pub away_team: String,
    pub game_date: String,
}

impl Game {
    fn from_play(play: &PlayRecord) -> Self {
        Self {
            game_id: play.game_id.clone(),
            week: play.week,
            home_team: play.home_team.clone(),
            away_team: play.away_team.clone(),
            game_date: play.game_date.clone(),
        }
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team.eq_ignore_ascii_case(team) || self.away_team.eq_ignore_ascii_case(team)
    }

    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if self.home_team.eq_ignore_ascii_case(team) {
            Some(&self.away_team)
        } else if self.away_team.eq_ignore_ascii_case(team) {
            Some(&self.home_team)
        } else {
            None
        }
    }

    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away_team, self.home_team)
    }

    pub fn display_date(&self) -> String {
        let raw = self.game_date.trim();
        if raw.is_empty() {
            return "TBD".to_string();
        }
        if let Some(date) = parse_game_date(raw) {
            return date.format("%a %b %-d, %Y").to_string();
        }
        raw.to_string()
    }
}

fn parse_game_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    const FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

/// Games and per-game play positions derived once from a loaded store.
#[derive(Debug, Clone)]
pub struct GameIndex {
    store: RecordStore,
    weeks: BTreeMap<u32, Vec<Game>>,
    plays: HashMap<String, Vec<usize>>,
}

impl GameIndex {
    pub fn new(store: RecordStore) -> Self {
        let mut weeks: BTreeMap<u32, Vec<Game>> = BTreeMap::new();
        let mut plays: HashMap<String, Vec<usize>> = HashMap::new();
        {
            let mut seen: HashSet<(u32, &str)> = HashSet::new();
            for (pos, play) in store.plays().iter().enumerate() {
                if seen.insert((play.week, play.game_id.as_str())) {
                    weeks.entry(play.week).or_default().push(Game::from_play(play));
                }
                plays.entry(play.game_id.clone()).or_default().push(pos);
            }
        }

        log::debug!(
            "indexed {} games across {} weeks",
            weeks.values().map(Vec::len).sum::<usize>(),
            weeks.len()
        );
        Self {
            store,
            weeks,
            plays,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Distinct games of a week in first-seen order; empty for weeks without data.
    pub fn games_for_week(&self, week: u32) -> &[Game] {
        self.weeks.get(&week).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn games_for_team(&self, week: u32, team: &str) -> Vec<&Game> {
        self.games_for_week(week)
            .iter()
            .filter(|g| g.involves(team))
            .collect()
    }

    pub fn week_has_games(&self, week: u32) -> bool {
        !self.games_for_week(week).is_empty()
    }

    /// Plays of one game in source order.
    pub fn plays_for_game(&self, game_id: &str) -> Vec<&PlayRecord> {
        let plays = self.store.plays();
        self.plays
            .get(game_id)
            .map(|positions| positions.iter().map(|&pos| &plays[pos]).collect())
            .unwrap_or_default()
    }

    /// All games, weeks ascending, first-seen order within a week.
    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.weeks.values().flatten()
    }

    pub fn game_count(&self) -> usize {
        self.weeks.values().map(Vec::len).sum()
    }
}

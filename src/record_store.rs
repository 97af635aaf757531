use std::fmt;
use std::fs;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::demo_season;
use crate::error::DashboardError;
use crate::http_client;

pub const FIRST_WEEK: u32 = 1;
pub const LAST_WEEK: u32 = 21;

/// One row of the exported play-by-play dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    #[serde(default, deserialize_with = "opt_id_string", skip_serializing_if = "Option::is_none")]
    pub play_id: Option<String>,
    #[serde(deserialize_with = "loose_week")]
    pub week: u32,
    #[serde(deserialize_with = "id_string")]
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub game_date: String,
    #[serde(default)]
    pub home_wp: Option<WinProbInput>,
}

/// `home_wp` as it appears in the source: the exporter writes floats, older
/// dumps carry numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WinProbInput {
    Number(f64),
    Text(String),
}

impl PlayRecord {
    /// Home win probability as a number. Unparsable or missing input becomes NaN;
    /// values outside [0, 1] pass through untouched.
    pub fn home_win_prob(&self) -> f64 {
        match &self.home_wp {
            Some(WinProbInput::Number(value)) => *value,
            Some(WinProbInput::Text(raw)) => raw.trim().parse::<f64>().unwrap_or(f64::NAN),
            None => f64::NAN,
        }
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team.eq_ignore_ascii_case(team) || self.away_team.eq_ignore_ascii_case(team)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
    Demo { seed: u64, team: String },
}

impl DataSource {
    pub fn parse(raw: &str, demo_seed: u64, team: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("demo") {
            return DataSource::Demo {
                seed: demo_seed,
                team: team.to_string(),
            };
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return DataSource::Url(trimmed.to_string());
        }
        DataSource::File(PathBuf::from(trimmed))
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
            DataSource::Demo { seed, team } => write!(f, "demo season ({team}, seed {seed})"),
        }
    }
}

/// Read-only list of plays for one season, in source order.
#[derive(Debug, Clone)]
pub struct RecordStore {
    plays: Vec<PlayRecord>,
}

impl RecordStore {
    pub fn load(source: &DataSource) -> Result<Self, DashboardError> {
        let raw = match source {
            DataSource::File(path) => fs::read_to_string(path).map_err(|err| {
                DashboardError::data_unavailable(format!("read {}: {err}", path.display()))
            })?,
            DataSource::Url(url) => http_client::fetch_text(url).map_err(|err| {
                DashboardError::data_unavailable(format!("fetch {url}: {err:#}"))
            })?,
            DataSource::Demo { seed, team } => {
                return Self::from_plays(demo_season::generate(*seed, team));
            }
        };
        let store = Self::from_json_str(&raw)?;
        log::info!("loaded {} plays from {source}", store.len());
        Ok(store)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DashboardError> {
        let plays = serde_json::from_str::<Option<Vec<PlayRecord>>>(raw)
            .map_err(|err| DashboardError::data_unavailable(format!("parse dataset: {err}")))?
            .unwrap_or_default();
        Self::from_plays(plays)
    }

    /// Rows outside the regular season weeks are dropped, the way the exporter
    /// filters them.
    pub fn from_plays(mut plays: Vec<PlayRecord>) -> Result<Self, DashboardError> {
        let before = plays.len();
        plays.retain(|p| Self::all_weeks().contains(&p.week));
        if plays.len() < before {
            log::warn!(
                "dropped {} plays outside weeks {FIRST_WEEK}..={LAST_WEEK}",
                before - plays.len()
            );
        }
        if plays.is_empty() {
            return Err(DashboardError::data_unavailable("dataset is empty"));
        }
        Ok(Self { plays })
    }

    pub fn plays(&self) -> &[PlayRecord] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn plays_in_week(&self, week: u32) -> impl Iterator<Item = &PlayRecord> {
        self.plays.iter().filter(move |p| p.week == week)
    }

    pub fn plays_for_game<'a>(&'a self, game_id: &'a str) -> impl Iterator<Item = &'a PlayRecord> {
        self.plays.iter().filter(move |p| p.game_id == game_id)
    }

    /// Every selectable week, whether or not the data has games for it.
    pub fn all_weeks() -> RangeInclusive<u32> {
        FIRST_WEEK..=LAST_WEEK
    }
}

fn loose_week<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let week = match &value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    week.and_then(|w| u32::try_from(w).ok())
        .ok_or_else(|| serde::de::Error::custom(format!("invalid week: {value}")))
}

fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    opt_id_string(deserializer)?.ok_or_else(|| serde::de::Error::custom("missing game_id"))
}

fn opt_id_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let rendered = match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    };
    Ok(rendered)
}

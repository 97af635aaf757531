use std::collections::HashSet;
use std::env;
use std::path::PathBuf;

use crate::record_store::DataSource;
use crate::selection::{ChartId, SelectionConfig};
use crate::series::EmptyWeekPolicy;
use crate::teams::DEFAULT_FOCAL_TEAM;

const DEFAULT_DATA_SOURCE: &str = "bills_data.json";
const DEFAULT_DEMO_SEED: u64 = 2023;

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: DataSource,
    pub focal_team: String,
    pub empty_weeks: EmptyWeekPolicy,
    pub panels: HashSet<ChartId>,
    pub log_file: Option<PathBuf>,
}

impl DashboardConfig {
    /// Environment first, then `--data=`/`--team=` style flags on top.
    pub fn from_env_and_args(args: &[String]) -> Self {
        let focal_team = arg_value(args, "--team")
            .or_else(|| non_empty_env("WP_FOCAL_TEAM"))
            .unwrap_or_else(|| DEFAULT_FOCAL_TEAM.to_string())
            .to_uppercase();
        let demo_seed = non_empty_env("WP_DEMO_SEED")
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(DEFAULT_DEMO_SEED);
        let raw_source = if args.iter().any(|a| a == "--demo") {
            "demo".to_string()
        } else {
            arg_value(args, "--data")
                .or_else(|| non_empty_env("WP_DATA_SOURCE"))
                .unwrap_or_else(|| DEFAULT_DATA_SOURCE.to_string())
        };
        let empty_weeks = arg_value(args, "--empty-weeks")
            .or_else(|| non_empty_env("WP_EMPTY_WEEKS"))
            .and_then(|raw| EmptyWeekPolicy::parse(&raw))
            .unwrap_or_default();
        let panels = non_empty_env("WP_PANELS")
            .map(|raw| parse_panels(&raw))
            .filter(|set| !set.is_empty())
            .unwrap_or_else(|| ChartId::ALL.into_iter().collect());

        Self {
            source: DataSource::parse(&raw_source, demo_seed, &focal_team),
            focal_team,
            empty_weeks,
            panels,
            log_file: non_empty_env("WP_LOG_FILE").map(PathBuf::from),
        }
    }

    pub fn selection(&self) -> SelectionConfig {
        SelectionConfig {
            focal_team: self.focal_team.clone(),
            empty_weeks: self.empty_weeks,
        }
    }
}

pub fn parse_panels(raw: &str) -> HashSet<ChartId> {
    raw.split([',', ';', ' '])
        .filter_map(ChartId::from_key)
        .collect()
}

/// Value of `--name=value` or `--name value`.
pub fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

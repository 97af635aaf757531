use anyhow::{Context, Result};
use serde::Serialize;

use wp_dashboard::config::DashboardConfig;
use wp_dashboard::excitement::{ExcitementRanking, most_exciting_game};
use wp_dashboard::game_index::{Game, GameIndex};
use wp_dashboard::record_store::RecordStore;
use wp_dashboard::series::{season_aggregate_with, total_excitement};
use wp_dashboard::teams::team_label;

#[derive(Debug, Serialize)]
struct SeasonReport {
    team: String,
    source: String,
    plays: usize,
    games: usize,
    weeks: Vec<WeekRow>,
    most_exciting: Option<ExcitementRanking>,
}

#[derive(Debug, Serialize)]
struct WeekRow {
    week: u32,
    game: Option<Game>,
    plays: usize,
    total_excitement: Option<f64>,
    final_home_wp: Option<f64>,
    season_value: Option<f64>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let config = DashboardConfig::from_env_and_args(&args);
    let as_json = args.iter().any(|a| a == "--json");

    let store = RecordStore::load(&config.source)
        .with_context(|| format!("load dataset from {}", config.source))?;
    let index = GameIndex::new(store);
    let report = build_report(&index, &config);

    if as_json {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{json}");
        return Ok(());
    }
    print_report(&report);
    Ok(())
}

fn build_report(index: &GameIndex, config: &DashboardConfig) -> SeasonReport {
    let team = config.focal_team.as_str();
    let weeks = season_aggregate_with(index, RecordStore::all_weeks(), team, config.empty_weeks)
        .into_iter()
        .map(|(week, season_value)| {
            let game = index.games_for_team(week, team).first().map(|g| (*g).clone());
            let plays = game
                .as_ref()
                .map(|g| index.plays_for_game(&g.game_id))
                .unwrap_or_default();
            WeekRow {
                week,
                plays: plays.len(),
                total_excitement: game
                    .as_ref()
                    .map(|_| total_excitement(plays.iter().copied())),
                final_home_wp: plays.last().map(|p| p.home_win_prob()),
                game,
                season_value,
            }
        })
        .collect();

    SeasonReport {
        team: team.to_string(),
        source: config.source.to_string(),
        plays: index.store().len(),
        games: index.game_count(),
        weeks,
        most_exciting: most_exciting_game(index),
    }
}

fn print_report(report: &SeasonReport) {
    println!("Season report: {}", team_label(&report.team));
    println!("Source: {}", report.source);
    println!("Plays: {}  Games: {}", report.plays, report.games);
    println!();
    println!(
        "{:>4}  {:<14} {:>5} {:>10} {:>9} {:>8}",
        "Week", "Matchup", "Plays", "Excitement", "Final WP", "Season"
    );
    for row in &report.weeks {
        let matchup = row
            .game
            .as_ref()
            .map(|g| g.matchup())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>4}  {:<14} {:>5} {:>10} {:>9} {:>8}",
            row.week,
            matchup,
            row.plays,
            fmt_opt(row.total_excitement),
            fmt_opt(row.final_home_wp),
            fmt_opt(row.season_value)
        );
    }
    println!();
    match &report.most_exciting {
        Some(r) => println!(
            "Most exciting: week {} game {} (total |dWP| {:.3})",
            r.week, r.game_id, r.total_excitement
        ),
        None => println!("Most exciting: n/a"),
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.3}"))
        .unwrap_or_else(|| "-".to_string())
}

use serde::Serialize;

use crate::game_index::GameIndex;
use crate::record_store::PlayRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub index: usize,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(index: usize, value: f64) -> Self {
        Self { index, value }
    }
}

/// What a week without a qualifying game contributes to the season aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyWeekPolicy {
    /// Emit 0.0, indistinguishable from a 0% final win probability.
    #[default]
    Zero,
    /// Emit no value so the chart can leave a gap.
    Gap,
}

impl EmptyWeekPolicy {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "zero" | "0" => Some(Self::Zero),
            "gap" | "null" | "none" => Some(Self::Gap),
            _ => None,
        }
    }
}

pub fn win_probability_series<'a, I>(plays: I) -> Vec<SeriesPoint>
where
    I: IntoIterator<Item = &'a PlayRecord>,
{
    plays
        .into_iter()
        .enumerate()
        .map(|(idx, play)| SeriesPoint::new(idx, play.home_win_prob()))
        .collect()
}

/// Absolute change in win probability between consecutive plays; the first
/// point is always zero.
pub fn excitement_series<'a, I>(plays: I) -> Vec<SeriesPoint>
where
    I: IntoIterator<Item = &'a PlayRecord>,
{
    let mut prev: Option<f64> = None;
    plays
        .into_iter()
        .enumerate()
        .map(|(idx, play)| {
            let wp = play.home_win_prob();
            let value = match prev {
                Some(p) => (wp - p).abs(),
                None => 0.0,
            };
            prev = Some(wp);
            SeriesPoint::new(idx, value)
        })
        .collect()
}

pub fn total_excitement<'a, I>(plays: I) -> f64
where
    I: IntoIterator<Item = &'a PlayRecord>,
{
    excitement_series(plays).iter().map(|p| p.value).sum()
}

/// Per-week average of the team's final win probability, zero for empty weeks.
pub fn season_aggregate<W>(index: &GameIndex, weeks: W, team: &str) -> Vec<(u32, f64)>
where
    W: IntoIterator<Item = u32>,
{
    season_aggregate_with(index, weeks, team, EmptyWeekPolicy::Zero)
        .into_iter()
        .map(|(week, value)| (week, value.unwrap_or(0.0)))
        .collect()
}

pub fn season_aggregate_with<W>(
    index: &GameIndex,
    weeks: W,
    team: &str,
    policy: EmptyWeekPolicy,
) -> Vec<(u32, Option<f64>)>
where
    W: IntoIterator<Item = u32>,
{
    weeks
        .into_iter()
        .map(|week| {
            // Last play by source order stands in for the final result.
            let finals = index
                .games_for_team(week, team)
                .into_iter()
                .filter_map(|game| {
                    index
                        .plays_for_game(&game.game_id)
                        .last()
                        .map(|play| play.home_win_prob())
                })
                .collect::<Vec<_>>();
            let value = if finals.is_empty() {
                match policy {
                    EmptyWeekPolicy::Zero => Some(0.0),
                    EmptyWeekPolicy::Gap => None,
                }
            } else {
                Some(finals.iter().sum::<f64>() / finals.len() as f64)
            };
            (week, value)
        })
        .collect()
}

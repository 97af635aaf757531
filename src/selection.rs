use std::fmt;

use crate::error::DashboardError;
use crate::excitement::{ExcitementRanking, most_exciting_game};
use crate::game_index::{Game, GameIndex};
use crate::record_store::{FIRST_WEEK, LAST_WEEK, RecordStore};
use crate::series::{
    EmptyWeekPolicy, SeriesPoint, excitement_series, season_aggregate_with,
    win_probability_series,
};
use crate::teams::team_label;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartId {
    GameWinProbability,
    GameExcitement,
    Season,
}

impl ChartId {
    pub const ALL: [ChartId; 3] = [
        ChartId::GameWinProbability,
        ChartId::GameExcitement,
        ChartId::Season,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ChartId::GameWinProbability => "game",
            ChartId::GameExcitement => "excitement",
            ChartId::Season => "season",
        }
    }

    pub fn from_key(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|chart| chart.key().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisConfig {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub y_min: f64,
    /// `None` lets the surface fit the data.
    pub y_max: Option<f64>,
}

impl AxisConfig {
    pub fn game_win_probability() -> Self {
        Self {
            title: "Home Win Probability (Game Progression)".to_string(),
            x_title: "Play".to_string(),
            y_title: "Win Probability".to_string(),
            y_min: 0.0,
            y_max: Some(1.0),
        }
    }

    pub fn game_excitement() -> Self {
        Self {
            title: "Excitement |ΔWP|".to_string(),
            x_title: "Play".to_string(),
            y_title: "|ΔWP|".to_string(),
            y_min: 0.0,
            y_max: None,
        }
    }

    pub fn season(team: &str) -> Self {
        Self {
            title: format!("Average {} Final Win Probability", team_label(team)),
            x_title: "Week".to_string(),
            y_title: "Win Probability".to_string(),
            y_min: 0.0,
            y_max: Some(1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekOption {
    pub week: u32,
    pub has_games: bool,
    pub most_exciting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserMessage {
    pub level: MessageLevel,
    pub text: String,
}

impl UserMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            text: text.into(),
        }
    }
}

impl From<&DashboardError> for UserMessage {
    fn from(err: &DashboardError) -> Self {
        match err {
            DashboardError::NoGamesThisWeek { .. } => UserMessage::info(err.to_string()),
            _ => UserMessage::error(err.to_string()),
        }
    }
}

/// The surface the controller draws onto. Owns chart lifecycle: a render call
/// for a chart replaces whatever that chart showed before.
pub trait Presentation {
    fn render_series(
        &mut self,
        chart: ChartId,
        points: &[SeriesPoint],
        axis: &AxisConfig,
    ) -> Result<(), DashboardError>;
    fn render_selection_ui(&mut self, weeks: &[WeekOption], selected_week: u32);
    fn render_narrative(&mut self, text: Option<&str>);
    fn render_header(&mut self, game: Option<&Game>);
    fn report_message(&mut self, message: Option<&UserMessage>);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionConfig {
    pub focal_team: String,
    pub empty_weeks: EmptyWeekPolicy,
}

/// Holds the selected week and everything derived once per load.
#[derive(Debug)]
pub struct SelectionController {
    index: GameIndex,
    focal_team: String,
    ranking: Option<ExcitementRanking>,
    week_options: Vec<WeekOption>,
    selected_week: u32,
    selected_game: Option<Game>,
}

impl SelectionController {
    /// Rank once, draw the season view, then select the first week.
    pub fn initialize<P: Presentation>(
        index: GameIndex,
        config: &SelectionConfig,
        view: &mut P,
    ) -> Self {
        let ranking = most_exciting_game(&index);
        let week_options = RecordStore::all_weeks()
            .map(|week| WeekOption {
                week,
                has_games: index.week_has_games(week),
                most_exciting: ranking.as_ref().is_some_and(|r| r.week == week),
            })
            .collect::<Vec<_>>();

        let mut controller = Self {
            index,
            focal_team: config.focal_team.clone(),
            ranking,
            week_options,
            selected_week: FIRST_WEEK,
            selected_game: None,
        };

        let season = season_aggregate_with(
            &controller.index,
            RecordStore::all_weeks(),
            &controller.focal_team,
            config.empty_weeks,
        )
        .into_iter()
        .filter_map(|(week, value)| value.map(|v| SeriesPoint::new(week as usize, v)))
        .collect::<Vec<_>>();
        if let Err(err) = view.render_series(
            ChartId::Season,
            &season,
            &AxisConfig::season(&controller.focal_team),
        ) {
            view.report_message(Some(&UserMessage::from(&err)));
        }

        controller.week_changed(FIRST_WEEK, view);
        controller
    }

    /// Weeks outside the selectable range snap to the nearest listed week.
    pub fn week_changed<P: Presentation>(&mut self, new_week: u32, view: &mut P) {
        let new_week = new_week.clamp(FIRST_WEEK, LAST_WEEK);
        self.selected_week = new_week;
        log::debug!("week changed to {new_week}");
        view.render_selection_ui(&self.week_options, new_week);

        let mut failures: Vec<DashboardError> = Vec::new();
        match self.focal_game(new_week) {
            Ok(game) => {
                let plays = self.index.plays_for_game(&game.game_id);
                let wp = win_probability_series(plays.iter().copied());
                let excitement = excitement_series(plays.iter().copied());
                view.render_header(Some(&game));
                failures.extend(
                    view.render_series(
                        ChartId::GameWinProbability,
                        &wp,
                        &AxisConfig::game_win_probability(),
                    )
                    .err(),
                );
                failures.extend(
                    view.render_series(
                        ChartId::GameExcitement,
                        &excitement,
                        &AxisConfig::game_excitement(),
                    )
                    .err(),
                );
                self.selected_game = Some(game);
            }
            Err(err) => {
                self.selected_game = None;
                view.render_header(None);
                failures.extend(
                    view.render_series(
                        ChartId::GameWinProbability,
                        &[],
                        &AxisConfig::game_win_probability(),
                    )
                    .err(),
                );
                failures.extend(
                    view.render_series(ChartId::GameExcitement, &[], &AxisConfig::game_excitement())
                        .err(),
                );
                failures.insert(0, err);
            }
        }

        let narrative = self.narrative_for(new_week);
        view.render_narrative(narrative.as_deref());

        if failures.is_empty() {
            view.report_message(None);
        }
        for err in &failures {
            view.report_message(Some(&UserMessage::from(err)));
        }
    }

    pub fn next_week<P: Presentation>(&mut self, view: &mut P) {
        if self.selected_week < LAST_WEEK {
            self.week_changed(self.selected_week + 1, view);
        }
    }

    pub fn previous_week<P: Presentation>(&mut self, view: &mut P) {
        if self.selected_week > FIRST_WEEK {
            self.week_changed(self.selected_week - 1, view);
        }
    }

    pub fn selected_week(&self) -> u32 {
        self.selected_week
    }

    pub fn selected_game(&self) -> Option<&Game> {
        self.selected_game.as_ref()
    }

    pub fn ranking(&self) -> Option<&ExcitementRanking> {
        self.ranking.as_ref()
    }

    pub fn week_options(&self) -> &[WeekOption] {
        &self.week_options
    }

    fn focal_game(&self, week: u32) -> Result<Game, DashboardError> {
        self.index
            .games_for_team(week, &self.focal_team)
            .first()
            .map(|g| (*g).clone())
            .ok_or_else(|| DashboardError::NoGamesThisWeek {
                week,
                team: self.focal_team.clone(),
            })
    }

    fn narrative_for(&self, week: u32) -> Option<String> {
        let ranking = self.ranking.as_ref().filter(|r| r.week == week)?;
        let matchup = self
            .index
            .games_for_week(ranking.week)
            .iter()
            .find(|g| g.game_id == ranking.game_id)
            .map(|g| g.matchup())
            .unwrap_or_else(|| ranking.game_id.clone());
        Some(format!(
            "Week {week}, {matchup}, was the most exciting game of the season: \
             the win probability moved a total of {:.3} (sum of |ΔWP| over every play).",
            ranking.total_excitement
        ))
    }
}

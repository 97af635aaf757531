use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::mpsc::Sender;
use std::thread;

use crate::error::DashboardError;
use crate::game_index::{Game, GameIndex};
use crate::record_store::{DataSource, FIRST_WEEK, RecordStore};
use crate::selection::{
    AxisConfig, ChartId, MessageLevel, Presentation, SelectionConfig, SelectionController,
    UserMessage, WeekOption,
};
use crate::series::SeriesPoint;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    pub points: Vec<SeriesPoint>,
    pub axis: AxisConfig,
}

impl ChartView {
    pub fn data(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (p.index as f64, p.value))
            .collect()
    }

    /// Runs of consecutive indices. A missing index starts a new run so a line
    /// chart leaves a visible gap there.
    pub fn segments(&self) -> Vec<Vec<(f64, f64)>> {
        let mut runs: Vec<Vec<(f64, f64)>> = Vec::new();
        let mut prev: Option<usize> = None;
        for p in &self.points {
            let contiguous = prev.is_some_and(|i| p.index == i + 1);
            match runs.last_mut() {
                Some(run) if contiguous => run.push((p.index as f64, p.value)),
                _ => runs.push(vec![(p.index as f64, p.value)]),
            }
            prev = Some(p.index);
        }
        runs
    }

    /// Upper y bound: the configured one, or the data max with some headroom.
    pub fn y_max(&self) -> f64 {
        if let Some(max) = self.axis.y_max {
            return max;
        }
        let peak = self
            .points
            .iter()
            .map(|p| p.value)
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        if peak <= self.axis.y_min {
            self.axis.y_min + 0.1
        } else {
            peak * 1.1
        }
    }
}

/// Everything the terminal draws. Written only through `Presentation`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub load: LoadStatus,
    pub source_label: String,
    pub focal_team: String,
    pub mounted: HashSet<ChartId>,
    pub charts: HashMap<ChartId, ChartView>,
    pub weeks: Vec<WeekOption>,
    pub selected_week: u32,
    pub narrative: Option<String>,
    pub header: Option<Game>,
    pub status: Option<UserMessage>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(focal_team: &str, source_label: String, mounted: HashSet<ChartId>) -> Self {
        Self {
            load: LoadStatus::Loading,
            source_label,
            focal_team: focal_team.to_string(),
            mounted,
            charts: HashMap::new(),
            weeks: Vec::new(),
            selected_week: FIRST_WEEK,
            narrative: None,
            header: None,
            status: None,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn chart(&self, chart: ChartId) -> Option<&ChartView> {
        self.charts.get(&chart)
    }
}

impl Presentation for AppState {
    fn render_series(
        &mut self,
        chart: ChartId,
        points: &[SeriesPoint],
        axis: &AxisConfig,
    ) -> Result<(), DashboardError> {
        if !self.mounted.contains(&chart) {
            return Err(DashboardError::MissingRenderTarget(chart));
        }
        if points.is_empty() {
            self.charts.remove(&chart);
        } else {
            self.charts.insert(
                chart,
                ChartView {
                    points: points.to_vec(),
                    axis: axis.clone(),
                },
            );
        }
        Ok(())
    }

    fn render_selection_ui(&mut self, weeks: &[WeekOption], selected_week: u32) {
        self.weeks = weeks.to_vec();
        self.selected_week = selected_week;
    }

    fn render_narrative(&mut self, text: Option<&str>) {
        self.narrative = text.map(str::to_string);
    }

    fn render_header(&mut self, game: Option<&Game>) {
        self.header = game.cloned();
    }

    fn report_message(&mut self, message: Option<&UserMessage>) {
        if let Some(msg) = message {
            let tag = match msg.level {
                MessageLevel::Info => "[INFO]",
                MessageLevel::Error => "[ERROR]",
            };
            self.push_log(format!("{tag} {}", msg.text));
        }
        self.status = message.cloned();
    }
}

#[derive(Debug)]
pub enum Delta {
    Loaded(GameIndex),
    LoadFailed(DashboardError),
    Log(String),
}

/// Loads the dataset off the UI thread and reports back exactly once.
pub fn spawn_loader(source: DataSource, tx: Sender<Delta>) {
    thread::spawn(move || {
        let _ = tx.send(Delta::Log(format!("[INFO] Loading {source}")));
        let delta = match RecordStore::load(&source) {
            Ok(store) => Delta::Loaded(GameIndex::new(store)),
            Err(err) => Delta::LoadFailed(err),
        };
        let _ = tx.send(delta);
    });
}

/// Presentation state plus the controller that exists once data is loaded.
#[derive(Debug)]
pub struct Session {
    pub state: AppState,
    pub controller: Option<SelectionController>,
    selection: SelectionConfig,
}

impl Session {
    pub fn new(state: AppState, selection: SelectionConfig) -> Self {
        Self {
            state,
            controller: None,
            selection,
        }
    }

    pub fn apply_delta(&mut self, delta: Delta) {
        match delta {
            Delta::Loaded(index) => {
                if self.controller.is_some() {
                    return;
                }
                self.state.push_log(format!(
                    "[INFO] Loaded {} plays, {} games",
                    index.store().len(),
                    index.game_count()
                ));
                self.state.load = LoadStatus::Ready;
                let controller =
                    SelectionController::initialize(index, &self.selection, &mut self.state);
                self.controller = Some(controller);
            }
            Delta::LoadFailed(err) => {
                log::error!("{err}");
                if err.is_fatal() {
                    self.state.load = LoadStatus::Failed(err.to_string());
                }
                self.state
                    .report_message(Some(&UserMessage::from(&err)));
            }
            Delta::Log(msg) => self.state.push_log(msg),
        }
    }

    pub fn next_week(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            controller.next_week(&mut self.state);
        }
    }

    pub fn previous_week(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            controller.previous_week(&mut self.state);
        }
    }

    pub fn first_week(&mut self) {
        if let Some(controller) = self.controller.as_mut() {
            controller.week_changed(FIRST_WEEK, &mut self.state);
        }
    }
}

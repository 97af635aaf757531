use thiserror::Error;

use crate::selection::ChartId;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DashboardError {
    /// Dataset fetch/parse failed or the dataset is empty. Fatal for the session.
    #[error("data unavailable: {reason}")]
    DataUnavailable { reason: String },

    /// Focal team has no game in the selected week (bye). Informational.
    #[error("{team} has no game in week {week}")]
    NoGamesThisWeek { week: u32, team: String },

    #[error("no render target for {0} chart")]
    MissingRenderTarget(ChartId),
}

impl DashboardError {
    pub fn data_unavailable(reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            reason: reason.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::DataUnavailable { .. })
    }
}

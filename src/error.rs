//! Error kinds for the beeswarm chart.
//!
//! An empty visible set is not an error: it is a valid state that renders
//! no circles. Per-record anomalies never reach this type either; they are
//! logged and reported next to the data they affect.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    /// The dataset could not be read or parsed. Fatal: no chart is drawn.
    #[error("failed to load dataset: {message}")]
    DataLoad { message: String },

    #[error("dataset file not found: {path}")]
    DataNotFound { path: PathBuf },

    /// Logarithmic scale requested over a domain that touches zero or below.
    #[error("logarithmic scale needs a strictly positive domain, got [{min}, {max}]")]
    InvalidDomain { min: f64, max: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("layout produced a non-finite position for '{country}'")]
    NonFinitePosition { country: String },

    #[error("unknown region '{0}'")]
    UnknownRegion(String),

    #[error("unknown measure '{0}'")]
    UnknownMeasure(String),

    #[error("unknown scale '{0}'")]
    UnknownScale(String),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChartError {
    /// Short machine-readable name, used in the JSON sent to the page.
    pub fn kind(&self) -> &'static str {
        match self {
            ChartError::DataLoad { .. } | ChartError::DataNotFound { .. } => "data_load",
            ChartError::InvalidDomain { .. } => "invalid_domain",
            ChartError::InvalidConfig(_) => "invalid_config",
            ChartError::NonFinitePosition { .. } => "non_finite_position",
            ChartError::UnknownRegion(_) => "unknown_region",
            ChartError::UnknownMeasure(_) => "unknown_measure",
            ChartError::UnknownScale(_) => "unknown_scale",
            ChartError::Json(_) => "json",
        }
    }
}

impl From<csv::Error> for ChartError {
    fn from(e: csv::Error) -> Self {
        ChartError::DataLoad { message: e.to_string() }
    }
}

pub type Result<T> = std::result::Result<T, ChartError>;

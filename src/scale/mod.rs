//! Scale provider: maps a numeric domain onto horizontal pixel space.
//!
//! A scale is rebuilt for every redraw from the visible values. Empty or
//! single-valued domains never fail; they collapse onto the range midpoint.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ChartError, Result};

mod ticks;

pub use ticks::{format_grouped, Tick};

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleKind {
    #[default]
    Linear,
    Log,
}

impl fmt::Display for ScaleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScaleKind::Linear => "linear",
            ScaleKind::Log => "log",
        })
    }
}

impl FromStr for ScaleKind {
    type Err = ChartError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "linear" | "lin" | "scaleLinear" => Ok(ScaleKind::Linear),
            "log" | "scaleLog" => Ok(ScaleKind::Log),
            other => Err(ChartError::UnknownScale(other.to_string())),
        }
    }
}

/// `[min, max]` over the finite values, `None` when there are none.
pub fn domain_of<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    kind: ScaleKind,
    domain: Option<(f64, f64)>,
    range: (f64, f64),
}

pub fn build_scale(kind: ScaleKind, domain: Option<(f64, f64)>, range: (f64, f64)) -> Result<Scale> {
    if let (ScaleKind::Log, Some((lo, hi))) = (kind, domain) {
        if !(lo > 0.0 && hi > 0.0 && lo.is_finite() && hi.is_finite()) {
            return Err(ChartError::InvalidDomain { min: lo, max: hi });
        }
    }
    Ok(Scale { kind, domain, range })
}

impl Scale {
    pub fn kind(&self) -> ScaleKind {
        self.kind
    }

    pub fn domain(&self) -> Option<(f64, f64)> {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    fn midpoint(&self) -> f64 {
        (self.range.0 + self.range.1) / 2.0
    }

    /// Domain bounds in the space the scale interpolates in.
    fn transformed(&self) -> Option<(f64, f64)> {
        let (lo, hi) = self.domain?;
        let t = |v: f64| self.forward(v);
        if lo == hi { None } else { Some((t(lo), t(hi))) }
    }

    fn forward(&self, v: f64) -> f64 {
        match self.kind {
            ScaleKind::Linear => v,
            ScaleKind::Log => v.log10(),
        }
    }

    fn backward(&self, v: f64) -> f64 {
        match self.kind {
            ScaleKind::Linear => v,
            ScaleKind::Log => 10f64.powf(v),
        }
    }

    pub fn apply(&self, value: f64) -> f64 {
        match self.transformed() {
            Some((d0, d1)) => {
                let t = (self.forward(value) - d0) / (d1 - d0);
                self.range.0 + t * (self.range.1 - self.range.0)
            }
            None => self.midpoint(),
        }
    }

    /// Pixel back to domain value. `None` for an empty domain.
    pub fn invert(&self, px: f64) -> Option<f64> {
        let (lo, _) = self.domain?;
        let Some((d0, d1)) = self.transformed() else {
            return Some(lo);
        };
        let (r0, r1) = self.range;
        if r0 == r1 {
            return Some(lo);
        }
        let t = (px - r0) / (r1 - r0);
        Some(self.backward(d0 + t * (d1 - d0)))
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        match self.domain {
            None => Vec::new(),
            Some((lo, hi)) if lo == hi => vec![lo],
            Some((lo, hi)) => match self.kind {
                ScaleKind::Linear => ticks::linear_ticks(lo, hi, count),
                ScaleKind::Log => ticks::log_ticks(lo, hi, count),
            },
        }
    }

    /// Ticks with pixel positions and axis labels.
    pub fn tick_labels(&self, count: usize) -> Vec<Tick> {
        let values = self.ticks(count);
        let labels = match (self.kind, self.domain) {
            (ScaleKind::Linear, Some((lo, hi))) => ticks::linear_labels(&values, lo, hi, count),
            (ScaleKind::Log, _) => ticks::log_labels(&values, count),
            (ScaleKind::Linear, None) => Vec::new(),
        };
        values
            .into_iter()
            .zip(labels)
            .map(|(value, label)| Tick { value, position: self.apply(value), label })
            .collect()
    }
}

//! Records, categories and measures of the disaster-study dataset.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChartError;

pub mod filter;
pub mod loader;

pub use filter::{filter, VisibleSet};
pub use loader::{load_dataset, load_dataset_from_path};

/// Study category. Drives both circle color and the checkbox filter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "Heatwave")]
    Heatwave,
    #[serde(rename = "Drought")]
    Drought,
    #[serde(rename = "Extreme rainfall")]
    ExtremeRainfall,
    #[serde(rename = "Cold spell")]
    ColdSpell,
    #[serde(rename = "Storm, extreme rainfall")]
    StormExtremeRainfall,
    #[serde(rename = "Wildfire")]
    Wildfire,
}

impl Region {
    /// Legend order.
    pub const ALL: [Region; 6] = [
        Region::Heatwave,
        Region::Drought,
        Region::ExtremeRainfall,
        Region::ColdSpell,
        Region::StormExtremeRainfall,
        Region::Wildfire,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Region::Heatwave => "Heatwave",
            Region::Drought => "Drought",
            Region::ExtremeRainfall => "Extreme rainfall",
            Region::ColdSpell => "Cold spell",
            Region::StormExtremeRainfall => "Storm, extreme rainfall",
            Region::Wildfire => "Wildfire",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Region::Heatwave => "#D81B60",
            Region::Drought => "#1976D2",
            Region::ExtremeRainfall => "#388E3C",
            Region::ColdSpell => "#FBC02D",
            Region::StormExtremeRainfall => "#E64A19",
            Region::Wildfire => "#455A64",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Region {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Region::ALL
            .into_iter()
            .find(|r| r.label() == s)
            .ok_or_else(|| ChartError::UnknownRegion(s.to_string()))
    }
}

/// One swatch of the category legend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub region: Region,
    pub label: &'static str,
    pub color: &'static str,
}

pub fn legend() -> Vec<LegendEntry> {
    Region::ALL
        .into_iter()
        .map(|region| LegendEntry { region, label: region.label(), color: region.color() })
        .collect()
}

/// Numeric field that drives the x position.
///
/// Only `Total` exists today; new members need a column name and a legend
/// label, nothing else in the chart matches on the variant.
#[non_exhaustive]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    #[default]
    Total,
}

impl Measure {
    pub const ALL: [Measure; 1] = [Measure::Total];

    /// CSV column holding this measure.
    pub fn column(self) -> &'static str {
        match self {
            Measure::Total => "total",
        }
    }

    pub fn legend(self) -> &'static str {
        match self {
            Measure::Total => "Total",
        }
    }
}

impl FromStr for Measure {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Measure::ALL
            .into_iter()
            .find(|m| m.column() == s)
            .ok_or_else(|| ChartError::UnknownMeasure(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub country: String,
    pub region: Region,
    /// Only measures that parsed cleanly are present.
    pub measures: BTreeMap<Measure, f64>,
}

impl Record {
    pub fn new(country: impl Into<String>, region: Region) -> Self {
        Self { country: country.into(), region, measures: BTreeMap::new() }
    }

    pub fn with_measure(mut self, measure: Measure, value: f64) -> Self {
        self.measures.insert(measure, value);
        self
    }

    pub fn measure(&self, measure: Measure) -> Option<f64> {
        self.measures.get(&measure).copied()
    }
}

/// The loaded, immutable dataset for a session.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    /// Rows or fields that were skipped while loading.
    pub warnings: Vec<String>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records, warnings: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, country: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.country == country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_round_trips_through_label() {
        for region in Region::ALL {
            assert_eq!(region.label().parse::<Region>().unwrap(), region);
        }
        assert_eq!(" Drought ".parse::<Region>().unwrap(), Region::Drought);
        assert!("Tsunami".parse::<Region>().is_err());
    }

    #[test]
    fn test_region_serializes_as_label() {
        let json = serde_json::to_string(&Region::StormExtremeRainfall).unwrap();
        assert_eq!(json, "\"Storm, extreme rainfall\"");
    }

    #[test]
    fn test_legend_is_in_fixed_order_with_colors() {
        let entries = legend();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].label, "Heatwave");
        assert_eq!(entries[0].color, "#D81B60");
        assert_eq!(entries[5].color, "#455A64");
    }

    #[test]
    fn test_measure_lookup() {
        assert_eq!("total".parse::<Measure>().unwrap(), Measure::Total);
        assert!(matches!("per_capita".parse::<Measure>(), Err(ChartError::UnknownMeasure(_))));
        let r = Record::new("A", Region::Wildfire).with_measure(Measure::Total, 10.0);
        assert_eq!(r.measure(Measure::Total), Some(10.0));
    }
}

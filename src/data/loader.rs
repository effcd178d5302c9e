//! CSV loading for the study dataset.
//!
//! Structural problems (unreadable input, missing `country`/`region`
//! columns, broken CSV) abort the load. Anything wrong with a single row is
//! logged, recorded in [`Dataset::warnings`] and skipped.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::{Dataset, Measure, Record, Region};
use crate::error::{ChartError, Result};

/// Parse CSV text with a header row.
pub fn load_dataset(text: &str) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let country_col = column("country").ok_or_else(|| ChartError::DataLoad {
        message: "missing 'country' column".to_string(),
    })?;
    let region_col = column("region").ok_or_else(|| ChartError::DataLoad {
        message: "missing 'region' column".to_string(),
    })?;
    let measure_cols: Vec<(Measure, Option<usize>)> =
        Measure::ALL.into_iter().map(|m| (m, column(m.column()))).collect();

    let mut dataset = Dataset::default();
    let mut seen: HashSet<String> = HashSet::new();

    for (index, row) in reader.records().enumerate() {
        let row = row?;
        // Header is line 1.
        let line = index + 2;

        let country = row.get(country_col).unwrap_or_default();
        if country.is_empty() {
            warn(&mut dataset, format!("line {line}: empty country, row skipped"));
            continue;
        }
        if !seen.insert(country.to_string()) {
            warn(&mut dataset, format!("line {line}: duplicate country '{country}', row skipped"));
            continue;
        }

        let region_text = row.get(region_col).unwrap_or_default();
        let region = match region_text.parse::<Region>() {
            Ok(region) => region,
            Err(_) => {
                warn(&mut dataset, format!("line {line}: unknown region '{region_text}', row skipped"));
                continue;
            }
        };

        let mut record = Record::new(country, region);
        for &(measure, col) in &measure_cols {
            let raw = col.and_then(|c| row.get(c)).unwrap_or_default();
            match parse_number(raw) {
                Some(value) => {
                    record.measures.insert(measure, value);
                }
                None => warn(
                    &mut dataset,
                    format!("line {line}: '{country}' has no usable '{}' value ({raw:?})", measure.column()),
                ),
            }
        }
        dataset.records.push(record);
    }

    tracing::debug!(
        records = dataset.records.len(),
        warnings = dataset.warnings.len(),
        "dataset loaded"
    );
    Ok(dataset)
}

pub fn load_dataset_from_path(path: impl AsRef<Path>) -> Result<Dataset> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ChartError::DataNotFound { path: path.to_path_buf() });
    }
    let text = fs::read_to_string(path).map_err(|e| ChartError::DataLoad { message: e.to_string() })?;
    load_dataset(&text)
}

fn warn(dataset: &mut Dataset, message: String) {
    tracing::warn!("{message}");
    dataset.warnings.push(message);
}

/// Accepts plain and comma-grouped numbers. Non-finite values are rejected.
fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|&c| c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

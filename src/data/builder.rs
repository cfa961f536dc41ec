//! Indicator Table Builder Module
//! Reconciles the two raw sources into one unified long-form table.

use polars::prelude::*;
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// The unified long-form table: one row per (country, indicator, year)
/// observation, source-1 rows followed by source-2 rows, duplicates kept.
/// Immutable after construction; interactions only derive views from it.
#[derive(Debug, Clone)]
pub struct UnifiedTable {
    df: DataFrame,
}

impl PartialEq for UnifiedTable {
    fn eq(&self, other: &Self) -> bool {
        self.df.equals_missing(&other.df)
    }
}

impl UnifiedTable {
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }

    /// Distinct years present, ascending.
    pub fn years(&self) -> Vec<i64> {
        let Ok(years) = self.df.column("year").and_then(|col| col.i64()) else {
            return Vec::new();
        };
        let set: BTreeSet<i64> = years.into_iter().flatten().collect();
        set.into_iter().collect()
    }

    /// Smallest and largest year present.
    pub fn year_bounds(&self) -> Option<(i64, i64)> {
        let years = self.years();
        Some((*years.first()?, *years.last()?))
    }

    /// Distinct countries with at least one observation in `year`, sorted.
    pub fn countries_in_year(&self, year: i64) -> Vec<String> {
        self.field_values_in_year("country", year)
    }

    /// Distinct indicators with at least one observation in `year`, sorted.
    pub fn indicators_in_year(&self, year: i64) -> Vec<String> {
        self.field_values_in_year("indicator", year)
    }

    fn field_values_in_year(&self, field: &str, year: i64) -> Vec<String> {
        let (Ok(years), Ok(values)) = (
            self.df.column("year").and_then(|col| col.i64()),
            self.df.column(field).and_then(|col| col.str()),
        ) else {
            return Vec::new();
        };

        let mut set: BTreeSet<String> = BTreeSet::new();
        for i in 0..self.df.height() {
            if years.get(i) == Some(year) {
                if let Some(v) = values.get(i) {
                    set.insert(v.to_string());
                }
            }
        }
        set.into_iter().collect()
    }
}

/// Builds the unified table from the two schema'd sources.
pub struct TableBuilder;

impl TableBuilder {
    /// Concatenate the sources in order and coerce the typed fields.
    ///
    /// Year coercion: numeric parse, truncated to integer; rows whose year
    /// does not parse are dropped. Value coercion: numeric parse; on failure
    /// the row is kept and the value becomes missing.
    pub fn build(source1: &DataFrame, source2: &DataFrame) -> Result<UnifiedTable, BuildError> {
        let mut countries: Vec<String> = Vec::new();
        let mut indicators: Vec<String> = Vec::new();
        let mut years: Vec<i64> = Vec::new();
        let mut values: Vec<Option<f64>> = Vec::new();

        let mut dropped_years = 0usize;
        let mut missing_values = 0usize;

        for df in [source1, source2] {
            let country_series = df.column("country")?;
            let indicator_series = df.column("indicator")?;
            let year_f64 = df.column("year")?.cast(&DataType::Float64)?;
            let year_ca = year_f64.f64()?;
            let value_f64 = df.column("value")?.cast(&DataType::Float64)?;
            let value_ca = value_f64.f64()?;

            for i in 0..df.height() {
                let year = match year_ca.get(i) {
                    Some(y) if !y.is_nan() => y as i64,
                    _ => {
                        dropped_years += 1;
                        continue;
                    }
                };

                let value = value_ca.get(i).filter(|v| !v.is_nan());
                if value.is_none() {
                    missing_values += 1;
                }

                countries.push(Self::field_to_string(country_series.get(i)?));
                indicators.push(Self::field_to_string(indicator_series.get(i)?));
                years.push(year);
                values.push(value);
            }
        }

        if dropped_years > 0 {
            warn!("dropped {} rows with unparseable year", dropped_years);
        }
        debug!(
            "unified table: {} rows, {} missing values",
            countries.len(),
            missing_values
        );

        let df = DataFrame::new(vec![
            Column::new("country".into(), countries),
            Column::new("indicator".into(), indicators),
            Column::new("year".into(), years),
            Column::new("value".into(), values),
        ])?;

        Ok(UnifiedTable { df })
    }

    fn field_to_string(value: AnyValue) -> String {
        if value.is_null() {
            String::new()
        } else {
            value.to_string().trim_matches('"').to_string()
        }
    }
}

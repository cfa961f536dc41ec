//! Pivot Builder Module
//! Long-to-wide reshape of filtered rows, and the melt back to long form.

use polars::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum PivotError {
    #[error("Pivot field '{0}' is missing from the input rows")]
    MissingField(String),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One wide row: an index value and one cell per column, aligned with
/// [`WideView::columns`]. Absent cells are missing, never zero.
#[derive(Debug, Clone, Serialize)]
pub struct WideRow {
    pub index: String,
    pub values: Vec<Option<f64>>,
}

/// Wide (pivoted) view: one row per distinct index value, one column per
/// distinct column value present in the input, both sorted.
#[derive(Debug, Clone, Serialize)]
pub struct WideView {
    pub index_field: String,
    pub column_field: String,
    pub columns: Vec<String>,
    pub rows: Vec<WideRow>,
}

impl WideView {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Cell lookup; `None` for absent pairs and for present-but-missing values.
    #[allow(dead_code)]
    pub fn value(&self, index: &str, column: &str) -> Option<f64> {
        let pos = self.column_position(column)?;
        self.rows
            .iter()
            .find(|row| row.index == index)
            .and_then(|row| row.values[pos])
    }

    /// Melt back to long form, skipping missing cells.
    #[allow(dead_code)]
    pub fn melt(&self) -> PolarsResult<DataFrame> {
        let mut indexes: Vec<String> = Vec::new();
        let mut columns: Vec<String> = Vec::new();
        let mut values: Vec<f64> = Vec::new();

        for row in &self.rows {
            for (column, value) in self.columns.iter().zip(row.values.iter()) {
                if let Some(v) = value {
                    indexes.push(row.index.clone());
                    columns.push(column.clone());
                    values.push(*v);
                }
            }
        }

        DataFrame::new(vec![
            Column::new(self.index_field.as_str().into(), indexes),
            Column::new(self.column_field.as_str().into(), columns),
            Column::new("value".into(), values),
        ])
    }
}

/// Reshape long rows into a [`WideView`].
///
/// Duplicate (index, column) pairs resolve last-write-wins in input row
/// order, matching concatenation order. Fails only when a requested field is
/// absent from the input schema; zero rows pivot to an empty view.
pub fn pivot(
    df: &DataFrame,
    index_field: &str,
    column_field: &str,
    value_field: &str,
) -> Result<WideView, PivotError> {
    let index_series = df
        .column(index_field)
        .map_err(|_| PivotError::MissingField(index_field.to_string()))?;
    let column_series = df
        .column(column_field)
        .map_err(|_| PivotError::MissingField(column_field.to_string()))?;
    let value_f64 = df
        .column(value_field)
        .map_err(|_| PivotError::MissingField(value_field.to_string()))?
        .cast(&DataType::Float64)?;
    let value_ca = value_f64.f64()?;

    let mut columns: BTreeSet<String> = BTreeSet::new();
    let mut cells: BTreeMap<String, BTreeMap<String, Option<f64>>> = BTreeMap::new();
    let mut overridden = 0usize;

    for i in 0..df.height() {
        let index = cell_to_string(index_series.get(i)?);
        let column = cell_to_string(column_series.get(i)?);
        let value = value_ca.get(i);

        columns.insert(column.clone());
        if cells
            .entry(index)
            .or_default()
            .insert(column, value)
            .is_some()
        {
            overridden += 1;
        }
    }

    if overridden > 0 {
        debug!("pivot overrode {} duplicate cells (last row wins)", overridden);
    }

    let columns: Vec<String> = columns.into_iter().collect();
    let rows: Vec<WideRow> = cells
        .into_iter()
        .map(|(index, row_cells)| WideRow {
            values: columns
                .iter()
                .map(|c| row_cells.get(c).copied().flatten())
                .collect(),
            index,
        })
        .collect();

    Ok(WideView {
        index_field: index_field.to_string(),
        column_field: column_field.to_string(),
        columns,
        rows,
    })
}

fn cell_to_string(value: AnyValue) -> String {
    if value.is_null() {
        String::new()
    } else {
        value.to_string().trim_matches('"').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testutil::long_rows;
    use anyhow::Result;

    #[test]
    fn one_row_per_country_one_column_per_indicator() -> Result<()> {
        let df = long_rows(&[
            ("A", "GDP", 2000, Some(100.0)),
            ("A", "POP", 2000, Some(5.0)),
            ("B", "GDP", 2000, None),
        ]);

        let view = pivot(&df, "country", "indicator", "value")?;
        assert_eq!(view.columns, vec!["GDP".to_string(), "POP".to_string()]);
        assert_eq!(view.rows.len(), 2);

        assert_eq!(view.value("A", "GDP"), Some(100.0));
        assert_eq!(view.value("A", "POP"), Some(5.0));
        // B's GDP value failed coercion upstream, and B has no POP row at
        // all; both cells read as missing, not zero.
        assert_eq!(view.value("B", "GDP"), None);
        assert_eq!(view.value("B", "POP"), None);
        Ok(())
    }

    #[test]
    fn duplicate_pairs_resolve_to_the_last_row() -> Result<()> {
        let df = long_rows(&[
            ("A", "GDP", 2000, Some(100.0)),
            ("A", "GDP", 2000, Some(250.0)),
        ]);

        let view = pivot(&df, "country", "indicator", "value")?;
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.value("A", "GDP"), Some(250.0));
        Ok(())
    }

    #[test]
    fn missing_field_is_a_schema_error() {
        let df = long_rows(&[("A", "GDP", 2000, Some(100.0))]);
        match pivot(&df, "region", "indicator", "value") {
            Err(PivotError::MissingField(field)) => assert_eq!(field, "region"),
            other => panic!("expected MissingField, got {:?}", other.map(|v| v.rows.len())),
        }
    }

    #[test]
    fn zero_rows_pivot_to_an_empty_view() -> Result<()> {
        let df = long_rows(&[]);
        let view = pivot(&df, "country", "indicator", "value")?;
        assert!(view.is_empty());
        assert!(view.columns.is_empty());
        Ok(())
    }

    #[test]
    fn melt_recovers_the_present_triples() -> Result<()> {
        let df = long_rows(&[
            ("A", "GDP", 2000, Some(100.0)),
            ("A", "POP", 2000, Some(5.0)),
            ("B", "GDP", 2000, None),
        ]);

        let view = pivot(&df, "country", "indicator", "value")?;
        let melted = view.melt()?;

        // The missing cell is dropped; the present triples survive.
        assert_eq!(melted.height(), 2);
        let countries = melted.column("country")?.str()?.clone();
        let indicators = melted.column("indicator")?.str()?.clone();
        let values = melted.column("value")?.f64()?.clone();
        let triples: Vec<(String, String, f64)> = (0..melted.height())
            .map(|i| {
                (
                    countries.get(i).unwrap_or_default().to_string(),
                    indicators.get(i).unwrap_or_default().to_string(),
                    values.get(i).unwrap_or_default(),
                )
            })
            .collect();
        assert!(triples.contains(&("A".to_string(), "GDP".to_string(), 100.0)));
        assert!(triples.contains(&("A".to_string(), "POP".to_string(), 5.0)));
        Ok(())
    }
}

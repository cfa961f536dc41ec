//! Year/Country Reducer Module
//! Pure row filters over the unified table; an empty result is not an error.

use polars::prelude::*;
use std::collections::BTreeSet;

/// Keep only rows whose year equals `year`.
pub fn reduce_to_year(df: &DataFrame, year: i64) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .filter(col("year").eq(lit(year)))
        .collect()
}

/// Keep only rows whose country is in `countries`.
pub fn reduce_to_countries(
    df: &DataFrame,
    countries: &BTreeSet<String>,
) -> PolarsResult<DataFrame> {
    let country_ca = df.column("country")?.str()?;
    let indicator_ca = df.column("indicator")?.str()?;
    let year_ca = df.column("year")?.i64()?;
    let value_ca = df.column("value")?.f64()?;

    let mut out_countries: Vec<String> = Vec::new();
    let mut out_indicators: Vec<String> = Vec::new();
    let mut out_years: Vec<i64> = Vec::new();
    let mut out_values: Vec<Option<f64>> = Vec::new();

    for i in 0..df.height() {
        let Some(country) = country_ca.get(i) else {
            continue;
        };
        if !countries.contains(country) {
            continue;
        }
        out_countries.push(country.to_string());
        out_indicators.push(indicator_ca.get(i).unwrap_or_default().to_string());
        out_years.push(year_ca.get(i).unwrap_or_default());
        out_values.push(value_ca.get(i));
    }

    DataFrame::new(vec![
        Column::new("country".into(), out_countries),
        Column::new("indicator".into(), out_indicators),
        Column::new("year".into(), out_years),
        Column::new("value".into(), out_values),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::testutil::source;
    use crate::data::TableBuilder;
    use anyhow::Result;

    fn sample_table() -> DataFrame {
        let s1 = source(&[
            ["A", "GDP", "2000", "100"],
            ["A", "POP", "2000", "5"],
            ["B", "GDP", "2001", "200"],
        ]);
        let s2 = source(&[["C", "GDP", "2000", "300"], ["B", "POP", "2001", "9"]]);
        TableBuilder::build(&s1, &s2).unwrap().dataframe().clone()
    }

    #[test]
    fn year_filter_keeps_only_matching_rows() -> Result<()> {
        let df = sample_table();
        let rows = reduce_to_year(&df, 2000)?;
        assert_eq!(rows.height(), 3);

        let years = rows.column("year")?.i64()?.clone();
        assert!((0..rows.height()).all(|i| years.get(i) == Some(2000)));
        Ok(())
    }

    #[test]
    fn union_over_years_reconstructs_the_table() -> Result<()> {
        let df = sample_table();
        let total: usize = [2000i64, 2001]
            .iter()
            .map(|&y| reduce_to_year(&df, y).map(|rows| rows.height()).unwrap_or(0))
            .sum();
        assert_eq!(total, df.height());
        Ok(())
    }

    #[test]
    fn missing_year_yields_empty_rows_not_an_error() -> Result<()> {
        let df = sample_table();
        let rows = reduce_to_year(&df, 1980)?;
        assert_eq!(rows.height(), 0);
        Ok(())
    }

    #[test]
    fn country_filter_is_a_pure_subset() -> Result<()> {
        let df = sample_table();
        let rows = reduce_to_year(&df, 2000)?;

        let selection: BTreeSet<String> = ["A".to_string()].into();
        let reduced = reduce_to_countries(&rows, &selection)?;
        assert_eq!(reduced.height(), 2);

        // Input is untouched.
        assert_eq!(rows.height(), 3);
        Ok(())
    }

    #[test]
    fn empty_country_set_yields_empty_rows() -> Result<()> {
        let df = sample_table();
        let reduced = reduce_to_countries(&df, &BTreeSet::new())?;
        assert_eq!(reduced.height(), 0);
        // The schema survives for downstream stages.
        assert!(reduced.column("indicator").is_ok());
        Ok(())
    }
}

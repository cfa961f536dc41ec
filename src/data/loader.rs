//! Source Loader Module
//! Reads the headerless country-indicator files and names their schema using Polars.

use polars::prelude::*;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Positional schema of a raw source file.
pub const SCHEMA_FIELDS: [&str; 5] = ["country", "indicator", "year", "value", "year_short"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load source: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Source {path} has {found} fields per row, expected at least 5")]
    TooFewFields { path: String, found: usize },
}

/// Load one raw source file.
///
/// The file has no header row and five positional fields
/// (country, indicator, year, value, year_short). All fields are read as
/// strings; coercion happens in the table builder. The redundant
/// `year_short` field is dropped here. Any read failure or a row narrower
/// than the schema is fatal.
pub fn load_source(path: &Path) -> Result<DataFrame, LoaderError> {
    let mut df = LazyCsvReader::new(path)
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;

    if df.width() < SCHEMA_FIELDS.len() {
        return Err(LoaderError::TooFewFields {
            path: path.display().to_string(),
            found: df.width(),
        });
    }

    // Extra trailing fields are ignored; the schema is positional.
    if df.width() > SCHEMA_FIELDS.len() {
        let keep: Vec<String> = df
            .get_column_names()
            .iter()
            .take(SCHEMA_FIELDS.len())
            .map(|s| s.to_string())
            .collect();
        df = df.select(keep)?;
    }

    df.set_column_names(SCHEMA_FIELDS)?;
    let df = df.drop("year_short")?;

    info!("loaded {} rows from {}", df.height(), path.display());
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use tempfile::TempDir;

    fn write_source(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_headerless_rows_and_names_schema() -> Result<()> {
        let dir = TempDir::new()?;
        let path = write_source(&dir, "data1.csv", "A,GDP,2000,100,00\nB,POP,2001,5,01\n");

        let df = load_source(&path)?;
        assert_eq!(df.height(), 2);
        assert_eq!(
            df.get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect::<Vec<_>>(),
            vec!["country", "indicator", "year", "value"]
        );
        Ok(())
    }

    #[test]
    fn year_short_is_discarded() -> Result<()> {
        let dir = TempDir::new()?;
        let path = write_source(&dir, "data1.csv", "A,GDP,2000,100,00\n");

        let df = load_source(&path)?;
        assert!(df.column("year_short").is_err());
        Ok(())
    }

    #[test]
    fn missing_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let result = load_source(&dir.path().join("absent.csv"));
        assert!(result.is_err());
    }

    #[test]
    fn narrow_rows_are_fatal() -> Result<()> {
        let dir = TempDir::new()?;
        let path = write_source(&dir, "narrow.csv", "A,GDP,2000\nB,POP,2001\n");

        match load_source(&path) {
            Err(LoaderError::TooFewFields { found, .. }) => assert_eq!(found, 3),
            other => panic!("expected TooFewFields, got {:?}", other.map(|df| df.height())),
        }
        Ok(())
    }

    #[test]
    fn extra_fields_are_ignored() -> Result<()> {
        let dir = TempDir::new()?;
        let path = write_source(&dir, "wide.csv", "A,GDP,2000,100,00,junk\n");

        let df = load_source(&path)?;
        assert_eq!(df.width(), 4);
        Ok(())
    }
}

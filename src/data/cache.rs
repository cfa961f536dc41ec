//! Table Cache Module
//! Memoizes the built unified table for the session, keyed by source identity.

use crate::data::builder::{BuildError, TableBuilder, UnifiedTable};
use crate::data::loader::{load_source, LoaderError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Failed to stat source: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Identity of one source file at load time. Sources are treated as
/// immutable for a session, so path plus modification time plus length is
/// enough to detect a change.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SourceStamp {
    path: PathBuf,
    modified: SystemTime,
    len: u64,
}

impl SourceStamp {
    fn of(path: &Path) -> std::io::Result<Self> {
        let meta = fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            modified: meta.modified()?,
            len: meta.len(),
        })
    }
}

/// Process-lifetime cache of the unified table. No eviction; the entry is
/// replaced only when a source stamp changes.
#[derive(Default)]
pub struct TableCache {
    entry: Option<((SourceStamp, SourceStamp), Arc<UnifiedTable>)>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the unified table for the two sources, rebuilding only when
    /// either file changed since the cached build.
    pub fn load(&mut self, source1: &Path, source2: &Path) -> Result<Arc<UnifiedTable>, CacheError> {
        let key = (SourceStamp::of(source1)?, SourceStamp::of(source2)?);

        if let Some((cached_key, table)) = &self.entry {
            if *cached_key == key {
                debug!("unified table cache hit");
                return Ok(Arc::clone(table));
            }
        }

        let df1 = load_source(source1)?;
        let df2 = load_source(source2)?;
        let table = Arc::new(TableBuilder::build(&df1, &df2)?);
        info!(
            "built unified table: {} rows from {} and {}",
            table.row_count(),
            source1.display(),
            source2.display()
        );

        self.entry = Some((key, Arc::clone(&table)));
        Ok(table)
    }
}

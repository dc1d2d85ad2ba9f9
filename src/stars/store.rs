use std::path::{Path, PathBuf};

use crate::foundation::error::{NocturneError, NocturneResult};
use crate::stars::grid::Star;

/// Table-like storage for star rows.
pub trait RowStore {
    /// Create the backing table if it does not exist yet. Safe to call repeatedly.
    fn ensure_schema(&mut self) -> NocturneResult<()>;

    fn truncate(&mut self) -> NocturneResult<()>;

    fn count(&self) -> NocturneResult<usize>;

    fn insert_many(&mut self, rows: &[Star]) -> NocturneResult<()>;

    /// All rows ordered by `(y, x)` ascending.
    fn fetch_ordered(&self) -> NocturneResult<Vec<Star>>;
}

/// Insert `seed` when the store holds no rows. Returns whether anything was inserted.
pub fn seed_if_empty(store: &mut dyn RowStore, seed: &[Star]) -> NocturneResult<bool> {
    if store.count()? > 0 {
        return Ok(false);
    }
    store.insert_many(seed)?;
    tracing::debug!(rows = seed.len(), "seeded star store");
    Ok(true)
}

fn ordered(mut rows: Vec<Star>) -> Vec<Star> {
    rows.sort_by_key(|s| (s.y, s.x));
    rows
}

/// In-process store. Rows are lost with the value.
#[derive(Debug, Default)]
pub struct MemoryRowStore {
    rows: Option<Vec<Star>>,
}

impl MemoryRowStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> NocturneResult<&Vec<Star>> {
        self.rows
            .as_ref()
            .ok_or_else(|| NocturneError::store("table \"stars\" does not exist"))
    }

    fn table_mut(&mut self) -> NocturneResult<&mut Vec<Star>> {
        self.rows
            .as_mut()
            .ok_or_else(|| NocturneError::store("table \"stars\" does not exist"))
    }
}

impl RowStore for MemoryRowStore {
    fn ensure_schema(&mut self) -> NocturneResult<()> {
        self.rows.get_or_insert_with(Vec::new);
        Ok(())
    }

    fn truncate(&mut self) -> NocturneResult<()> {
        self.table_mut()?.clear();
        Ok(())
    }

    fn count(&self) -> NocturneResult<usize> {
        Ok(self.table()?.len())
    }

    fn insert_many(&mut self, rows: &[Star]) -> NocturneResult<()> {
        self.table_mut()?.extend_from_slice(rows);
        Ok(())
    }

    fn fetch_ordered(&self) -> NocturneResult<Vec<Star>> {
        Ok(ordered(self.table()?.clone()))
    }
}

const TABLE_VERSION: u32 = 1;

#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct TableFile {
    version: u32,
    rows: Vec<Star>,
}

/// Store backed by a single JSON file holding the whole table.
#[derive(Clone, Debug)]
pub struct JsonRowStore {
    path: PathBuf,
}

impl JsonRowStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> NocturneResult<TableFile> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            NocturneError::store(format!("read {}: {e}", self.path.display()))
        })?;
        let table: TableFile = serde_json::from_slice(&bytes)?;
        if table.version != TABLE_VERSION {
            return Err(NocturneError::store(format!(
                "{}: unsupported table version {} (expected {TABLE_VERSION})",
                self.path.display(),
                table.version
            )));
        }
        Ok(table)
    }

    fn write(&self, table: &TableFile) -> NocturneResult<()> {
        let json = serde_json::to_vec_pretty(table)?;
        std::fs::write(&self.path, json).map_err(|e| {
            NocturneError::store(format!("write {}: {e}", self.path.display()))
        })
    }
}

impl RowStore for JsonRowStore {
    fn ensure_schema(&mut self) -> NocturneResult<()> {
        if self.path.exists() {
            self.read()?;
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                NocturneError::store(format!("create {}: {e}", parent.display()))
            })?;
        }
        tracing::debug!(path = %self.path.display(), "creating star table");
        self.write(&TableFile {
            version: TABLE_VERSION,
            rows: Vec::new(),
        })
    }

    fn truncate(&mut self) -> NocturneResult<()> {
        let mut table = self.read()?;
        table.rows.clear();
        self.write(&table)
    }

    fn count(&self) -> NocturneResult<usize> {
        Ok(self.read()?.rows.len())
    }

    fn insert_many(&mut self, rows: &[Star]) -> NocturneResult<()> {
        let mut table = self.read()?;
        table.rows.extend_from_slice(rows);
        self.write(&table)
    }

    fn fetch_ordered(&self) -> NocturneResult<Vec<Star>> {
        Ok(ordered(self.read()?.rows))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stars/store.rs"]
mod tests;

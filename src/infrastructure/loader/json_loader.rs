use std::io::ErrorKind;
use std::path::PathBuf;

use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::catalog::{TableSpec, NORTHWIND_TABLES};
use crate::domain::entity::{Record, Table};

/// 読み込みエラー（いずれも起動を中止する）
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Data directory {0} does not exist")]
    DataDirMissing(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed table {table} in {path}: {source}")]
    Parse {
        table: String,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// テーブルごとのJSONファイル（`<name>.json`）を読み込むローダー
#[derive(Debug, Clone)]
pub struct JsonTableLoader {
    data_dir: PathBuf,
    specs: &'static [TableSpec],
}

impl JsonTableLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            specs: NORTHWIND_TABLES,
        }
    }

    /// レジストリ順にすべてのテーブルを読み込む
    ///
    /// ファイルが無いテーブルは結果に含めない。壊れたファイルはエラー。
    pub async fn load(&self) -> Result<Vec<Table>, LoadError> {
        match tokio::fs::metadata(&self.data_dir).await {
            Ok(meta) if meta.is_dir() => {}
            _ => return Err(LoadError::DataDirMissing(self.data_dir.clone())),
        }

        let mut tables = Vec::with_capacity(self.specs.len());
        for spec in self.specs {
            if let Some(table) = self.load_table(spec).await? {
                tables.push(table);
            }
        }

        info!(
            "{} tables loaded from {}",
            tables.len(),
            self.data_dir.display()
        );
        Ok(tables)
    }

    async fn load_table(&self, spec: &TableSpec) -> Result<Option<Table>, LoadError> {
        let path = self.data_dir.join(spec.file_name());

        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(table = spec.name, "{} not found, table skipped", path.display());
                return Ok(None);
            }
            Err(source) => return Err(LoadError::Io { path, source }),
        };

        let rows: Vec<Record> = serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
            table: spec.name.to_string(),
            path: path.clone(),
            source,
        })?;

        if let Some(first) = rows.first() {
            debug!(table = spec.name, columns = %column_kinds(first), "parsed {}", path.display());
        }

        // 主キーが無い行は get-by-id では引けない
        if let Some(column) = spec.primary_key {
            let missing = rows
                .iter()
                .filter(|row| row.get(column).map_or(true, |value| value.data_type().is_null()))
                .count();
            if missing > 0 {
                warn!(table = spec.name, column, missing, "rows without primary key");
            }
        }

        info!(table = spec.name, rows = rows.len(), "table loaded");

        Ok(Some(Table::new(spec.name, spec.primary_key(), rows)))
    }
}

/// `OrderID:integer, CustomerID:text` の形式で行のフィールド型を並べる
fn column_kinds(row: &Record) -> String {
    row.fields()
        .map(|(name, value)| format!("{}:{}", name, value.data_type()))
        .join(", ")
}

use crate::domain::entity::record::Record;
use serde::{Deserialize, Serialize};

/// テーブルの主キー定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimaryKey {
    /// 単一カラムの主キー
    Single(String),
    /// 複合キー（単一IDでの取得はできない）
    Composite,
}

impl PrimaryKey {
    pub fn column(&self) -> Option<&str> {
        match self {
            PrimaryKey::Single(column) => Some(column),
            PrimaryKey::Composite => None,
        }
    }
}

/// 読み込み済みのテーブル。起動後は変更されない
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    // table name
    pub name: String,

    pub primary_key: PrimaryKey,

    rows: Vec<Record>,
}

impl Table {
    pub fn new(name: impl Into<String>, primary_key: PrimaryKey, rows: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            primary_key,
            rows,
        }
    }

    /// プライマリキーのカラムを取得する
    pub fn get_primary_key(&self) -> Option<&str> {
        self.primary_key.column()
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }
}

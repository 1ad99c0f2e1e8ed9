use async_trait::async_trait;
use std::collections::HashSet;

use crate::domain::entity::{ProductSales, Record};

// テーブルリポジトリのエラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Table {0} not found")]
    TableNotFound(String),

    #[error("Table {0} has a composite key")]
    CompositeKey(String),

    #[error("No record with key {id} in table {table}")]
    RecordNotFound { table: String, id: String },
}

// テーブルリポジトリ - 読み込み済みテーブルに対する読み取り専用のインターフェース
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableRepository: Send + Sync {
    /// 読み込み済みのテーブル名をレジストリ順で取得する
    async fn get_table_names(&self) -> Result<Vec<String>, RepositoryError>;

    /// パスセグメントを正規のテーブル名に解決する
    async fn resolve_table(&self, segment: &str) -> Result<String, RepositoryError>;

    /// フィルタとページングを適用して行を取得する
    async fn select(
        &self,
        table_name: &str,
        filter: Option<FilterCondition>,
        page: Page,
    ) -> Result<Vec<Record>, RepositoryError>;

    /// 単一主キーで1行を取得する
    async fn find_by_id(&self, table_name: &str, id: &str) -> Result<Record, RepositoryError>;

    /// 注文の明細を商品情報付きで取得する
    async fn order_details(&self, order_id: &str) -> Result<Vec<Record>, RepositoryError>;

    async fn orders_for_customer(&self, customer_id: &str) -> Result<Vec<Record>, RepositoryError>;

    /// 指定商品を含む注文を取得する
    async fn orders_for_product(&self, product_id: &str) -> Result<Vec<Record>, RepositoryError>;

    /// 商品別売上（降順）
    async fn sales_by_product(&self) -> Result<Vec<ProductSales>, RepositoryError>;
}

/// クエリフィルター条件
///
/// キーの比較はすべて `Value::key_string` で正規化した文字列同士で行う。
/// フィールドを持たない行はキー条件に一致しない。
#[derive(Debug, Clone, PartialEq)]
pub enum FilterCondition {
    /// フィールドのキー文字列が一致する
    KeyEquals { column: String, key: String },

    /// フィールドのキー文字列が集合に含まれる
    KeyIn { column: String, keys: HashSet<String> },

    /// いずれかの文字列フィールドが部分一致する（大文字小文字を区別しない）
    TextContains(String),
}

impl FilterCondition {
    pub fn key_equals(column: impl Into<String>, key: impl Into<String>) -> Self {
        FilterCondition::KeyEquals {
            column: column.into(),
            key: key.into(),
        }
    }

    /// 空の検索語はフィルタなし
    pub fn search(q: &str) -> Option<Self> {
        if q.is_empty() {
            None
        } else {
            Some(FilterCondition::TextContains(q.to_lowercase()))
        }
    }

    pub fn matches(&self, row: &Record) -> bool {
        match self {
            FilterCondition::KeyEquals { column, key } => {
                row.key_string(column).as_deref() == Some(key.as_str())
            }
            FilterCondition::KeyIn { column, keys } => {
                row.key_string(column).map_or(false, |k| keys.contains(&k))
            }
            FilterCondition::TextContains(needle) => row.text_contains(needle),
        }
    }
}

/// offset/limit によるページング
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    pub const DEFAULT_LIMIT: usize = 1000;
    pub const MAX_LIMIT: usize = 5000;

    /// limit は MAX_LIMIT で頭打ちにする
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: limit.min(Self::MAX_LIMIT),
        }
    }

    /// クエリ文字列の値から作る
    ///
    /// 数値でない値・負の値・空文字は既定値（offset=0, limit=1000）になる。
    /// 小数は切り捨てる。
    pub fn from_params(offset: Option<&str>, limit: Option<&str>) -> Self {
        let offset = offset.and_then(parse_count).unwrap_or(0);
        let limit = limit.and_then(parse_count).unwrap_or(Self::DEFAULT_LIMIT);
        Self::new(offset, limit)
    }

    /// スライスに適用する。元の順序を保つ
    pub fn apply<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let end = start.saturating_add(self.limit).min(items.len());
        &items[start..end]
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}

fn parse_count(raw: &str) -> Option<usize> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let n = trimmed.parse::<f64>().ok()?;
    if !n.is_finite() || n < 0.0 {
        return None;
    }
    Some(n.trunc().min(usize::MAX as f64) as usize)
}

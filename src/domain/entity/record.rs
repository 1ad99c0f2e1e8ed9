use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::domain::entity::value::Value;

/// 1行のデータを表現する
///
/// フィールドは元ファイルの順序のまま保持し、レスポンスでも同じ順序で出力する。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// 新しい空の行を作成する
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// 特定のフィールドの値を取得する
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    /// 特定のフィールドの値を設定する（既存の値は置き換える）
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        let field = field.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((field, value)),
        }
    }

    /// フィールドが無いときだけ値を追加する
    pub fn set_if_absent(&mut self, field: impl Into<String>, value: Value) {
        let field = field.into();
        if self.get(&field).is_none() {
            self.fields.push((field, value));
        }
    }

    /// 結合用のキー文字列
    ///
    /// フィールドが無い行はどのキーとも一致しない（明示的な `null` は `"null"`）。
    pub fn key_string(&self, field: &str) -> Option<String> {
        self.get(field).map(Value::key_string)
    }

    pub fn number(&self, field: &str) -> f64 {
        self.get(field).map_or(0.0, Value::as_number)
    }

    /// 文字列フィールドのいずれかが `needle`（小文字化済み）を含むか
    pub fn text_contains(&self, needle: &str) -> bool {
        self.fields
            .iter()
            .filter(|(_, value)| value.data_type().is_text())
            .filter_map(|(_, value)| value.as_text())
            .any(|text| text.to_lowercase().contains(needle))
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (field, value) in iter {
            record.set(field, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a flat JSON object with scalar values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
        let mut record = Record::new();
        // 重複キーは後勝ち
        while let Some((field, value)) = access.next_entry::<String, Value>()? {
            record.set(field, value);
        }
        Ok(record)
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::domain::entity::data_type::DataType;

// テーブル内の値の表現
// JSONのスカラーをそのまま保持する（ネストしたオブジェクトや配列は読み込み時にエラー）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Text(String),
    Boolean(bool),
    Null,
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Integer(_) => DataType::Integer,
            Value::Float(_) => DataType::Float,
            Value::Text(_) => DataType::Text,
            Value::Boolean(_) => DataType::Boolean,
            Value::Null => DataType::Null,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// 結合・検索で使うキー文字列に正規化する
    ///
    /// 数値の `10248` と文字列の `"10248"` は同じキーになる。
    /// 整数値の浮動小数点数は小数部なしで表す（`1.0` -> `"1"`）。
    pub fn key_string(&self) -> String {
        match self {
            Value::Integer(i) => i.to_string(),
            Value::Float(f) if *f == 0.0 => "0".to_string(),
            Value::Float(f) if f.is_nan() => "NaN".to_string(),
            Value::Float(f) => f.to_string(),
            Value::Text(s) => s.clone(),
            Value::Boolean(b) => b.to_string(),
            Value::Null => "null".to_string(),
        }
    }

    /// 集計用に数値へ変換する。変換できない値は0として扱う
    pub fn as_number(&self) -> f64 {
        let n = match self {
            Value::Integer(i) => *i as f64,
            Value::Float(f) => *f,
            Value::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(0.0)
                }
            }
            Value::Boolean(b) => {
                if *b { 1.0 } else { 0.0 }
            }
            Value::Null => 0.0,
        };

        if n.is_finite() { n } else { 0.0 }
    }

    /// 浮動小数点数から値を作る。整数で表せるものはIntegerにする
    pub fn from_f64(f: f64) -> Self {
        if !f.is_finite() {
            return Value::Null;
        }
        if f.fract() == 0.0 && f.abs() < 9.0e15 {
            Value::Integer(f as i64)
        } else {
            Value::Float(f)
        }
    }

    /// 正規化済みのキー文字列を数値に戻す。数値でなければNULL
    pub fn numeric_from_key(key: &str) -> Self {
        if let Ok(i) = key.parse::<i64>() {
            return Value::Integer(i);
        }
        match key.trim().parse::<f64>() {
            Ok(f) => Value::from_f64(f),
            Err(_) => Value::Null,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            other => write!(f, "{}", other.key_string()),
        }
    }
}

impl From<i64> for Value {
    fn from(val: i64) -> Self {
        Value::Integer(val)
    }
}
impl From<f64> for Value {
    fn from(val: f64) -> Self {
        Value::Float(val)
    }
}
impl From<String> for Value {
    fn from(val: String) -> Self {
        Value::Text(val)
    }
}
impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::Text(val.to_string())
    }
}
impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Value::Boolean(val)
    }
}

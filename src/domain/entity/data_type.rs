use derive_more::Display;

/// テーブルのフィールドが取りうるスカラー型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DataType {
    #[display(fmt = "integer")]
    Integer,

    #[display(fmt = "float")]
    Float,

    #[display(fmt = "text")]
    Text,

    #[display(fmt = "boolean")]
    Boolean,

    #[display(fmt = "null")]
    Null,
}

impl DataType {
    /// 全文検索（`q`）の対象になるのはテキストのみ
    pub fn is_text(&self) -> bool {
        matches!(self, DataType::Text)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DataType::Null)
    }
}

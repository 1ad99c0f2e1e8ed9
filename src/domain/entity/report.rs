use crate::domain::entity::value::Value;
use serde::Serialize;

/// 商品別売上レポートの1行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSales {
    #[serde(rename = "ProductID")]
    pub product_id: Value,

    #[serde(rename = "ProductName")]
    pub product_name: Value,

    /// 小数点以下2桁に丸めた売上合計
    #[serde(rename = "TotalSales")]
    pub total_sales: Value,
}

impl ProductSales {
    pub fn total(&self) -> f64 {
        self.total_sales.as_number()
    }
}

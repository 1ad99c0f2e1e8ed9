//! 起動時に読み込むテーブルの固定レジストリ

use crate::domain::entity::PrimaryKey;

/// レジストリに登録されたテーブル定義
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    /// `None` は複合キー
    pub primary_key: Option<&'static str>,
}

impl TableSpec {
    pub fn primary_key(&self) -> PrimaryKey {
        match self.primary_key {
            Some(column) => PrimaryKey::Single(column.to_string()),
            None => PrimaryKey::Composite,
        }
    }

    /// バッキングファイル名（`<name>.json`）
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name)
    }
}

/// テーブル名
pub mod tables {
    pub const CATEGORIES: &str = "Categories";
    pub const CUSTOMERS: &str = "Customers";
    pub const EMPLOYEES: &str = "Employees";
    pub const EMPLOYEE_TERRITORIES: &str = "EmployeeTerritories";
    pub const ORDER_DETAILS: &str = "Order_Details";
    pub const ORDERS: &str = "Orders";
    pub const PRODUCTS: &str = "Products";
    pub const REGION: &str = "Region";
    pub const SHIPPERS: &str = "Shippers";
    pub const SUPPLIERS: &str = "Suppliers";
    pub const TERRITORIES: &str = "Territories";
}

/// 結合・レポートで参照するフィールド名
pub mod fields {
    pub const CATEGORY_ID: &str = "CategoryID";
    pub const CUSTOMER_ID: &str = "CustomerID";
    pub const DISCOUNT: &str = "Discount";
    pub const ORDER_ID: &str = "OrderID";
    pub const PRODUCT_ID: &str = "ProductID";
    pub const PRODUCT_NAME: &str = "ProductName";
    pub const QUANTITY: &str = "Quantity";
    pub const SUPPLIER_ID: &str = "SupplierID";
    pub const UNIT_PRICE: &str = "UnitPrice";
    /// 明細に付与する商品側の単価
    pub const UNIT_PRICE_PRODUCT: &str = "UnitPriceProduct";
}

/// 読み込み対象のテーブル（この順序で `/api/tables` に並ぶ）
pub const NORTHWIND_TABLES: &[TableSpec] = &[
    TableSpec { name: tables::CATEGORIES, primary_key: Some("CategoryID") },
    TableSpec { name: tables::CUSTOMERS, primary_key: Some("CustomerID") },
    TableSpec { name: tables::EMPLOYEES, primary_key: Some("EmployeeID") },
    TableSpec { name: tables::EMPLOYEE_TERRITORIES, primary_key: None },
    TableSpec { name: tables::ORDER_DETAILS, primary_key: None },
    TableSpec { name: tables::ORDERS, primary_key: Some("OrderID") },
    TableSpec { name: tables::PRODUCTS, primary_key: Some("ProductID") },
    TableSpec { name: tables::REGION, primary_key: Some("RegionID") },
    TableSpec { name: tables::SHIPPERS, primary_key: Some("ShipperID") },
    TableSpec { name: tables::SUPPLIERS, primary_key: Some("SupplierID") },
    TableSpec { name: tables::TERRITORIES, primary_key: Some("TerritoryID") },
];

/// URLで使える別名（ハイフン・小文字表記）
pub const TABLE_ALIASES: &[(&str, &str)] = &[
    ("order-details", tables::ORDER_DETAILS),
    ("order_details", tables::ORDER_DETAILS),
    ("employee-territories", tables::EMPLOYEE_TERRITORIES),
    ("employee_territories", tables::EMPLOYEE_TERRITORIES),
];

/// 主キーで索引を作るテーブル
pub const INDEXED_TABLES: &[&str] = &[tables::PRODUCTS, tables::CUSTOMERS, tables::ORDERS];

pub fn spec_for(name: &str) -> Option<&'static TableSpec> {
    NORTHWIND_TABLES.iter().find(|spec| spec.name == name)
}

pub fn alias_for(segment: &str) -> Option<&'static str> {
    TABLE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == segment)
        .map(|(_, canonical)| *canonical)
}

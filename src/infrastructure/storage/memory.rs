use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use thiserror::Error;
use tracing::debug;

use crate::domain::catalog::{fields, tables, INDEXED_TABLES};
use crate::domain::entity::{ProductSales, Record, Table, Value};
use crate::domain::repository::{FilterCondition, Page};
use crate::domain::resolver::TableResolver;

/// ストレージエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Table {0} not found")]
    TableNotFound(String),
}

/// 主キー文字列 -> 行番号 の索引
#[derive(Debug, Clone, Default)]
struct KeyIndex {
    positions: HashMap<String, usize>,
}

impl KeyIndex {
    /// 同じキーが複数あるときは後の行が優先される
    fn build(table: &Table) -> Self {
        let positions = match table.get_primary_key() {
            Some(column) => table
                .rows()
                .iter()
                .enumerate()
                .filter_map(|(i, row)| row.key_string(column).map(|key| (key, i)))
                .collect(),
            None => HashMap::new(),
        };
        Self { positions }
    }

    fn get(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }
}

/// インメモリストレージの実装
///
/// 起動時に一度だけ組み立て、以降は読み取り専用。ロックは持たない。
#[derive(Debug, Default)]
pub struct MemoryStorage {
    // レジストリ順
    tables: Vec<Table>,
    by_name: HashMap<String, usize>,
    indices: HashMap<String, KeyIndex>,
    resolver: TableResolver,
}

impl MemoryStorage {
    pub fn new(tables: Vec<Table>) -> Self {
        let by_name: HashMap<String, usize> = tables
            .iter()
            .enumerate()
            .map(|(i, table)| (table.name.clone(), i))
            .collect();

        let indices = tables
            .iter()
            .filter(|table| INDEXED_TABLES.contains(&table.name.as_str()))
            .map(|table| {
                let index = KeyIndex::build(table);
                debug!(table = %table.name, keys = index.positions.len(), "key index built");
                (table.name.clone(), index)
            })
            .collect();

        let resolver = TableResolver::new(tables.iter().map(|table| table.name.clone()));

        Self {
            tables,
            by_name,
            indices,
            resolver,
        }
    }

    /// すべてのテーブル名を取得する（レジストリ順）
    pub fn get_table_names(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.name.clone()).collect()
    }

    /// テーブルが存在するか確認する
    pub fn table_exists(&self, table_name: &str) -> bool {
        self.by_name.contains_key(table_name)
    }

    pub fn resolve(&self, segment: &str) -> Option<&str> {
        self.resolver.resolve(segment)
    }

    pub fn get_table(&self, table_name: &str) -> Result<&Table, StorageError> {
        self.by_name
            .get(table_name)
            .map(|&i| &self.tables[i])
            .ok_or_else(|| StorageError::TableNotFound(table_name.to_string()))
    }

    /// テーブルの行。存在しないテーブルは空として扱う
    fn rows_of(&self, table_name: &str) -> &[Record] {
        self.get_table(table_name).map(Table::rows).unwrap_or(&[])
    }

    /// 索引を使って主キーで1行を引く（Products/Customers/Orders のみ）
    pub fn lookup(&self, table_name: &str, key: &str) -> Option<&Record> {
        let position = self.indices.get(table_name)?.get(key)?;
        self.rows_of(table_name).get(position)
    }

    /// 行を検索する
    pub fn select_rows(
        &self,
        table_name: &str,
        filter: Option<&FilterCondition>,
        page: Page,
    ) -> Result<Vec<Record>, StorageError> {
        let table = self.get_table(table_name)?;

        let rows = match filter {
            Some(filter) => {
                let matched: Vec<&Record> = table.rows().iter().filter(|row| filter.matches(row)).collect();
                page.apply(&matched).iter().map(|&row| row.clone()).collect()
            }
            None => page.apply(table.rows()).to_vec(),
        };

        Ok(rows)
    }

    /// 指定カラムのキー文字列が一致する最初の行（線形探索）
    pub fn find_first(
        &self,
        table_name: &str,
        column: &str,
        key: &str,
    ) -> Result<Option<Record>, StorageError> {
        let table = self.get_table(table_name)?;
        Ok(table
            .rows()
            .iter()
            .find(|row| row.key_string(column).as_deref() == Some(key))
            .cloned())
    }

    fn filter_rows(&self, table_name: &str, filter: &FilterCondition) -> Vec<Record> {
        self.rows_of(table_name)
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect()
    }

    /// 注文明細に商品名・商品単価・カテゴリ・仕入先を付与する
    pub fn order_details(&self, order_id: &str) -> Vec<Record> {
        let filter = FilterCondition::key_equals(fields::ORDER_ID, order_id);

        self.filter_rows(tables::ORDER_DETAILS, &filter)
            .into_iter()
            .map(|mut detail| {
                let product = detail
                    .key_string(fields::PRODUCT_ID)
                    .and_then(|key| self.lookup(tables::PRODUCTS, &key));
                let pick = |field: &str| {
                    product
                        .and_then(|p| p.get(field))
                        .cloned()
                        .unwrap_or(Value::Null)
                };

                detail.set_if_absent(fields::PRODUCT_NAME, pick(fields::PRODUCT_NAME));
                detail.set_if_absent(fields::UNIT_PRICE_PRODUCT, pick(fields::UNIT_PRICE));
                detail.set_if_absent(fields::CATEGORY_ID, pick(fields::CATEGORY_ID));
                detail.set_if_absent(fields::SUPPLIER_ID, pick(fields::SUPPLIER_ID));
                detail
            })
            .collect()
    }

    pub fn orders_for_customer(&self, customer_id: &str) -> Vec<Record> {
        let filter = FilterCondition::key_equals(fields::CUSTOMER_ID, customer_id);
        self.filter_rows(tables::ORDERS, &filter)
    }

    /// 商品を含む明細の注文IDを集め、その注文を Orders の順序で返す
    pub fn orders_for_product(&self, product_id: &str) -> Vec<Record> {
        let by_product = FilterCondition::key_equals(fields::PRODUCT_ID, product_id);
        let keys: HashSet<String> = self
            .rows_of(tables::ORDER_DETAILS)
            .iter()
            .filter(|detail| by_product.matches(detail))
            .filter_map(|detail| detail.key_string(fields::ORDER_ID))
            .collect();

        if keys.is_empty() {
            return Vec::new();
        }

        let filter = FilterCondition::KeyIn {
            column: fields::ORDER_ID.to_string(),
            keys,
        };
        self.filter_rows(tables::ORDERS, &filter)
    }

    /// 商品別の売上合計（単価 * 数量 * (1 - 割引)）を降順で返す
    ///
    /// 同額の場合は明細に最初に現れた順。ProductID の無い明細は
    /// `null` の明細とは別にまとめる。
    pub fn sales_by_product(&self) -> Vec<ProductSales> {
        let mut totals: Vec<(Option<String>, f64)> = Vec::new();
        let mut positions: HashMap<Option<String>, usize> = HashMap::new();

        for detail in self.rows_of(tables::ORDER_DETAILS) {
            let key = detail.key_string(fields::PRODUCT_ID);
            let line = detail.number(fields::UNIT_PRICE)
                * detail.number(fields::QUANTITY)
                * (1.0 - detail.number(fields::DISCOUNT));

            match positions.get(&key) {
                Some(&i) => totals[i].1 += line,
                None => {
                    positions.insert(key.clone(), totals.len());
                    totals.push((key, line));
                }
            }
        }

        totals
            .into_iter()
            .map(|(key, total)| {
                let product_name = key
                    .as_deref()
                    .and_then(|key| self.lookup(tables::PRODUCTS, key))
                    .and_then(|p| p.get(fields::PRODUCT_NAME))
                    .cloned()
                    .unwrap_or(Value::Null);

                ProductSales {
                    product_id: key.as_deref().map_or(Value::Null, Value::numeric_from_key),
                    product_name,
                    total_sales: Value::from_f64(round_cents(total)),
                }
            })
            .sorted_by(|a, b| b.total().total_cmp(&a.total()))
            .collect()
    }
}

/// 小数点以下2桁に丸める
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::spec_for;

    fn table(name: &str, json: &str) -> Table {
        let rows: Vec<Record> = serde_json::from_str(json).unwrap();
        Table::new(name, spec_for(name).unwrap().primary_key(), rows)
    }

    fn sample_storage() -> MemoryStorage {
        MemoryStorage::new(vec![
            table(
                "Customers",
                r#"[{"CustomerID": "VINET", "CompanyName": "Vins et alcools Chevalier"},
                    {"CustomerID": "TOMSP", "CompanyName": "Toms Spezialitäten"}]"#,
            ),
            table(
                "Order_Details",
                r#"[{"OrderID": 10248, "ProductID": 11, "UnitPrice": 14, "Quantity": 12, "Discount": 0},
                    {"OrderID": 10248, "ProductID": 42, "UnitPrice": 9.5, "Quantity": 10, "Discount": 0},
                    {"OrderID": 10249, "ProductID": 14, "UnitPrice": 18.6, "Quantity": 9, "Discount": 0},
                    {"OrderID": 10250, "ProductID": 42, "UnitPrice": "8", "Quantity": 35, "Discount": 0.25},
                    {"OrderID": 10250, "ProductID": 99, "UnitPrice": null, "Quantity": 3}]"#,
            ),
            table(
                "Orders",
                r#"[{"OrderID": 10248, "CustomerID": "VINET"},
                    {"OrderID": 10249, "CustomerID": "TOMSP"},
                    {"OrderID": 10250, "CustomerID": "VINET"}]"#,
            ),
            table(
                "Products",
                r#"[{"ProductID": 11, "ProductName": "Queso Cabrales", "SupplierID": 5, "CategoryID": 4, "UnitPrice": 21},
                    {"ProductID": 14, "ProductName": "Tofu", "SupplierID": 6, "CategoryID": 7, "UnitPrice": 23.25},
                    {"ProductID": 42, "ProductName": "Singaporean Hokkien Fried Mee", "SupplierID": 20, "CategoryID": 5, "UnitPrice": 14}]"#,
            ),
        ])
    }

    fn ids(rows: &[Record]) -> Vec<String> {
        rows.iter().filter_map(|row| row.key_string("OrderID")).collect()
    }

    #[test]
    fn table_names_follow_registry_order() {
        let storage = sample_storage();
        assert_eq!(
            storage.get_table_names(),
            vec!["Customers", "Order_Details", "Orders", "Products"]
        );
        assert!(storage.table_exists("Orders"));
        assert!(!storage.table_exists("Employees"));
    }

    #[test]
    fn select_filters_then_pages() {
        let storage = sample_storage();
        let filter = FilterCondition::search("vin");
        let rows = storage.select_rows("Customers", filter.as_ref(), Page::default()).unwrap();
        assert_eq!(rows.len(), 1);

        let rows = storage.select_rows("Orders", None, Page::new(1, 1)).unwrap();
        assert_eq!(ids(&rows), vec!["10249"]);

        assert_eq!(
            storage.select_rows("Employees", None, Page::default()),
            Err(StorageError::TableNotFound("Employees".into()))
        );
    }

    #[test]
    fn find_first_compares_stringified_keys() {
        let storage = sample_storage();
        let row = storage.find_first("Orders", "OrderID", "10249").unwrap().unwrap();
        assert_eq!(row.get("CustomerID"), Some(&Value::from("TOMSP")));
        assert_eq!(storage.find_first("Orders", "OrderID", "NOPE").unwrap(), None);
    }

    #[test]
    fn lookup_uses_indices() {
        let storage = sample_storage();
        assert!(storage.lookup("Products", "42").is_some());
        assert!(storage.lookup("Customers", "TOMSP").is_some());
        assert!(storage.lookup("Orders", "10250").is_some());
        assert!(storage.lookup("Products", "1").is_none());
        // Order_Details は複合キーなので索引を持たない
        assert!(storage.lookup("Order_Details", "10248").is_none());
    }

    #[test]
    fn order_details_are_enriched() {
        let storage = sample_storage();
        let details = storage.order_details("10248");
        assert_eq!(details.len(), 2);

        let first = &details[0];
        assert_eq!(first.get("ProductName"), Some(&Value::from("Queso Cabrales")));
        assert_eq!(first.get("UnitPriceProduct"), Some(&Value::Integer(21)));
        assert_eq!(first.get("CategoryID"), Some(&Value::Integer(4)));
        assert_eq!(first.get("SupplierID"), Some(&Value::Integer(5)));
        // 明細の元の単価はそのまま
        assert_eq!(first.get("UnitPrice"), Some(&Value::Integer(14)));
    }

    #[test]
    fn unknown_product_enriches_with_nulls() {
        let storage = sample_storage();
        let details = storage.order_details("10250");
        let orphan = details.iter().find(|d| d.key_string("ProductID").as_deref() == Some("99")).unwrap();
        assert_eq!(orphan.get("ProductName"), Some(&Value::Null));
        assert_eq!(orphan.get("SupplierID"), Some(&Value::Null));
    }

    #[test]
    fn orders_by_customer_and_product() {
        let storage = sample_storage();
        assert_eq!(ids(&storage.orders_for_customer("VINET")), vec!["10248", "10250"]);
        assert_eq!(ids(&storage.orders_for_product("42")), vec!["10248", "10250"]);
        assert!(storage.orders_for_product("1").is_empty());
        assert!(storage.orders_for_customer("NOBODY").is_empty());
    }

    #[test]
    fn composites_on_absent_tables_are_empty() {
        let storage = MemoryStorage::new(Vec::new());
        assert!(storage.order_details("10248").is_empty());
        assert!(storage.orders_for_customer("VINET").is_empty());
        assert!(storage.orders_for_product("11").is_empty());
        assert!(storage.sales_by_product().is_empty());
    }

    #[test]
    fn sales_report_is_sorted_and_rounded() {
        let storage = sample_storage();
        let report = storage.sales_by_product();

        let totals: Vec<(Value, f64)> = report.iter().map(|r| (r.product_id.clone(), r.total())).collect();
        // 42: 9.5*10 + "8"*35*(1-0.25) = 95 + 210
        assert_eq!(totals[0], (Value::Integer(42), 305.0));
        assert_eq!(totals[1], (Value::Integer(11), 168.0));
        assert_eq!(totals[2], (Value::Integer(14), 167.4));
        assert_eq!(report[1].total_sales, Value::Integer(168));
        assert_eq!(report[2].total_sales, Value::Float(167.4));
        assert_eq!(totals[3], (Value::Integer(99), 0.0));
        assert_eq!(report[3].product_name, Value::Null);
        assert_eq!(report[0].product_name, Value::from("Singaporean Hokkien Fried Mee"));
    }

    #[test]
    fn missing_keys_are_not_null_keys() {
        let storage = MemoryStorage::new(vec![
            table(
                "Order_Details",
                r#"[{"OrderID": 1, "ProductID": null, "UnitPrice": 10, "Quantity": 1, "Discount": 0},
                    {"OrderID": 2, "UnitPrice": 20, "Quantity": 1, "Discount": 0},
                    {"ProductID": 7, "UnitPrice": 1, "Quantity": 1, "Discount": 0}]"#,
            ),
            table(
                "Orders",
                r#"[{"OrderID": 1, "CustomerID": null},
                    {"OrderID": 2}]"#,
            ),
        ]);

        assert_eq!(ids(&storage.orders_for_customer("null")), vec!["1"]);
        assert!(storage.find_first("Orders", "CustomerID", "null").unwrap().is_some());
        // OrderID の無い明細は注文に結び付かない
        assert!(storage.orders_for_product("7").is_empty());

        let report = storage.sales_by_product();
        assert_eq!(report.len(), 3);
        assert_eq!(report[0].total_sales, Value::Integer(20));
        assert_eq!(report[0].product_id, Value::Null);
        assert_eq!(report[1].total_sales, Value::Integer(10));
        assert_eq!(report[1].product_id, Value::Null);
    }
}

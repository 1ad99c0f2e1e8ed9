use std::path::PathBuf;

use northwind_api::domain::repository::{FilterCondition, Page};
use northwind_api::interface::api::load_repository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // データディレクトリ（引数がなければテスト用のサンプル）
    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/json-tables"));

    println!("=== Northwind 基本動作チェック ===\n");

    let repository = load_repository(&data_dir).await?;

    // 1. 読み込まれたテーブル
    println!("1. テーブル一覧");
    for name in repository.get_table_names().await? {
        println!("  {}", name);
    }
    println!();

    // 2. テーブル名の解決
    println!("2. テーブル名の解決");
    for segment in ["order-details", "products", "EmployeeTerritories", "unknowntable"] {
        match repository.resolve_table(segment).await {
            Ok(name) => println!("  {} -> {}", segment, name),
            Err(e) => println!("  {} -> {}", segment, e),
        }
    }
    println!();

    // 3. 検索とページング
    println!("3. 'france' を含む注文（先頭2件）");
    let orders = repository
        .select("Orders", FilterCondition::search("france"), Page::new(0, 2))
        .await?;
    for order in &orders {
        println!("  {}", serde_json::to_string(order)?);
    }
    println!();

    // 4. 主キーでの取得
    println!("4. 顧客 ALFKI");
    match repository.find_by_id("Customers", "ALFKI").await {
        Ok(customer) => println!("  {}", serde_json::to_string(&customer)?),
        Err(e) => println!("  {}", e),
    }
    println!();

    // 5. 売上レポート
    println!("5. 商品別売上（上位5件）");
    for row in repository.sales_by_product().await?.iter().take(5) {
        println!("  {} {} {}", row.product_id, row.product_name, row.total_sales);
    }
    println!();

    println!("動作チェック完了！");

    Ok(())
}

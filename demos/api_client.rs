use reqwest::Client;
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Client::new();
    let base_url = std::env::var("NORTHWIND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

    println!("=== Northwind JSON API クライアント ===\n");

    // 1. ヘルスチェック
    println!("1. ヘルスチェック");
    let resp = client.get(format!("{}/", base_url)).send().await?;
    println!("ステータス: {}", resp.status());
    println!("レスポンス: {}", resp.text().await?);
    println!();

    let paths = [
        ("2. テーブル一覧", "/api/tables"),
        ("3. 顧客の検索", "/api/customers?q=germany&limit=5"),
        ("4. 注文の取得", "/api/orders/10248"),
        ("5. 注文明細（商品情報付き）", "/api/orders/10248/details"),
        ("6. 顧客の注文", "/api/customers/VINET/orders"),
        ("7. 商品を含む注文", "/api/products/11/orders"),
        ("8. 商品別売上", "/api/reports/sales-by-product"),
        ("9. 複合キーのテーブル", "/api/order-details/1"),
    ];

    for (title, path) in paths {
        println!("{}", title);
        println!("GET {}", path);
        let resp = client.get(format!("{}{}", base_url, path)).send().await?;
        println!("ステータス: {}", resp.status());

        // JSON形式のレスポンスをきれいに表示
        let result_text = resp.text().await?;
        match serde_json::from_str::<Value>(&result_text) {
            Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
            Err(_) => println!("{}", result_text),
        }
        println!();
    }

    println!("APIクライアント完了！");

    Ok(())
}

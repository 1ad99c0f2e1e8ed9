#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Server;
use northwind_api::interface::api::{build_router, load_repository};
use tempfile::TempDir;

/// Northwind形式のサンプルデータ
pub fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/json-tables")
}

/// 空のデータディレクトリ（テーブルが1つも無い状態）
pub fn empty_data_dir() -> TempDir {
    tempfile::tempdir().expect("temp dir")
}

/// テスト用サーバーを空きポートで起動し、ベースURLを返す
pub async fn spawn_app(data_dir: &Path) -> String {
    let repository = load_repository(data_dir).await.expect("load fixtures");
    let app = build_router(repository);

    let addr = SocketAddr::from(([127, 0, 0, 1], 0));
    let server = Server::try_bind(&addr)
        .expect("bind test server")
        .serve(app.into_make_service());
    let local = server.local_addr();

    tokio::spawn(async move {
        server.await.expect("test server");
    });

    format!("http://{}", local)
}

pub async fn get_json(base_url: &str, path: &str) -> (u16, serde_json::Value) {
    let response = reqwest::get(format!("{}{}", base_url, path))
        .await
        .expect("request");
    let status = response.status().as_u16();
    let body = response.json().await.expect("json body");
    (status, body)
}

pub fn rows(body: &serde_json::Value) -> &Vec<serde_json::Value> {
    body.as_array().expect("array body")
}

/// JSONの値を結合キーと同じ規則で文字列化する
pub fn key(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

use axum::{
    Router,
    routing::get,
    Extension,
    Server,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use typed_builder::TypedBuilder;

use crate::domain::repository::TableRepository;
use crate::infrastructure::loader::{JsonTableLoader, LoadError};
use crate::infrastructure::storage::MemoryStorage;
use crate::infrastructure::repository::MemoryTableRepository;
use crate::interface::api::handler::{
    health_check_handler,
    collection_handler,
    member_handler,
    relation_handler,
    fallback_handler,
};
use crate::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_DIR: &str = "json-tables";

#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct ServerConfig {
    #[builder(default = DEFAULT_PORT)]
    pub port: u16,

    /// テーブルごとのJSONファイルを置くディレクトリ
    #[builder(default = PathBuf::from(DEFAULT_DATA_DIR), setter(into))]
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT, // デフォルトポート番号
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl ServerConfig {
    /// 環境変数 `PORT` と `DATA_DIR` から設定を読む
    pub fn from_env() -> Self {
        Self::from_vars(std::env::var("PORT").ok(), std::env::var("DATA_DIR").ok())
    }

    fn from_vars(port: Option<String>, data_dir: Option<String>) -> Self {
        let port = match port {
            Some(raw) => raw.trim().parse::<u16>().unwrap_or_else(|_| {
                warn!("PORT={} is not a valid port, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self::builder()
            .port(port)
            .data_dir(data_dir.unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()))
            .build()
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

/// データディレクトリを読み込み、リポジトリを組み立てる
pub async fn load_repository(data_dir: &Path) -> Result<Arc<dyn TableRepository>, LoadError> {
    let tables = JsonTableLoader::new(data_dir).load().await?;
    let storage = Arc::new(MemoryStorage::new(tables));
    let repository: Arc<dyn TableRepository> = Arc::new(MemoryTableRepository::new(storage));
    Ok(repository)
}

/// ルーターの設定
///
/// `/api/tables` や `/api/reports/sales-by-product` のようなリテラルのパスは
/// 各ハンドラーの中で汎用ルートより先に判定する。
pub fn build_router(repository: Arc<dyn TableRepository>) -> Router {
    Router::new()
        .route("/", get(health_check_handler))
        .route("/api/:segment", get(collection_handler))
        .route("/api/:segment/:id", get(member_handler))
        .route("/api/:segment/:id/:relation", get(relation_handler))
        .fallback(fallback_handler)
        .layer(Extension(repository))  // リポジトリの拡張
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

pub async fn start_server(config: ServerConfig) -> Result<(), Error> {
    // データの読み込み（壊れたファイルがあればここで終了する）
    info!("loading tables from {}", config.data_dir.display());
    let repository = load_repository(&config.data_dir).await?;

    let app = build_router(repository);

    // サーバーのアドレス設定
    let addr = config.addr();
    let server = Server::try_bind(&addr)
        .map_err(|e| Error::Server(format!("failed to bind {}: {}", addr, e)))?
        .serve(app.into_make_service());

    info!("Northwind JSON API listening on http://localhost:{}", server.local_addr().port());

    // サーバーの起動
    server
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Server(e.to_string()))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            warn!("failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

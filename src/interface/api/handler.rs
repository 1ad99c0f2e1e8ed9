use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, Extension,
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::domain::repository::{TableRepository, RepositoryError, FilterCondition, Page};

/// ヘルスチェックの応答
pub const HEALTH_MESSAGE: &str = "Northwind JSON API is running.";

pub const UNKNOWN_TABLE_MESSAGE: &str = "Unknown table";
pub const COMPOSITE_KEY_MESSAGE: &str = "This table has a composite key; use a composite endpoint.";
pub const NOT_FOUND_MESSAGE: &str = "Not found";
pub const INVALID_PATH_MESSAGE: &str = "Invalid path";

/// API エラー
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("No route for {0}")]
    RouteNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PathRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        debug!("request failed: {}", self);

        // 内部の詳細は返さない
        let (status, error_message) = match self {
            ApiError::Repository(e) => match e {
                RepositoryError::TableNotFound(_) => (StatusCode::NOT_FOUND, UNKNOWN_TABLE_MESSAGE),
                RepositoryError::CompositeKey(_) => (StatusCode::BAD_REQUEST, COMPOSITE_KEY_MESSAGE),
                RepositoryError::RecordNotFound { .. } => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            },
            ApiError::RouteNotFound(_) => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE),
            ApiError::InvalidPath(_) => (StatusCode::BAD_REQUEST, INVALID_PATH_MESSAGE),
        };

        let body = Json(ErrorResponse {
            error: error_message.to_string(),
        });

        (status, body).into_response()
    }
}

/// エラーレスポンス
#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

/// 一覧取得のクエリパラメータ
///
/// 数値も文字列のまま受け取り、不正な値は `Page::from_params` で既定値に寄せる。
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ListParams {
    pub q: Option<String>,
    pub offset: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    /// クエリ文字列のペアから作る。同じキーが複数あるときは最初の値を使う
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (name, value) in pairs {
            let slot = match name.as_str() {
                "q" => &mut params.q,
                "offset" => &mut params.offset,
                "limit" => &mut params.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

// 解釈できないクエリ文字列はパラメータ無しとして扱う
fn list_params(query: Result<Query<Vec<(String, String)>>, QueryRejection>) -> ListParams {
    match query {
        Ok(Query(pairs)) => ListParams::from_pairs(pairs),
        Err(rejection) => {
            debug!("query string ignored: {}", rejection);
            ListParams::default()
        }
    }
}

// 汎用ルートより優先するリテラルのパス
const TABLES_SEGMENT: &str = "tables";
const REPORTS_SEGMENT: &str = "reports";
const SALES_BY_PRODUCT: &str = "sales-by-product";

/// ヘルスチェックハンドラー
pub async fn health_check_handler() -> &'static str {
    HEALTH_MESSAGE
}

/// どのルートにもマッチしないリクエスト
pub async fn fallback_handler(uri: Uri) -> ApiError {
    ApiError::RouteNotFound(uri.path().to_string())
}

/// `GET /api/:segment` - テーブル一覧 または テーブルの行一覧
pub async fn collection_handler(
    segment: Result<Path<String>, PathRejection>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
    Extension(repository): Extension<Arc<dyn TableRepository>>,
) -> Result<Response, ApiError> {
    let Path(segment) = segment?;
    let params = list_params(query);

    if segment == TABLES_SEGMENT {
        let tables = repository.get_table_names().await?;
        return Ok(Json(tables).into_response());
    }

    let table = repository.resolve_table(&segment).await?;
    let filter = FilterCondition::search(params.q.as_deref().unwrap_or_default());
    let page = Page::from_params(params.offset.as_deref(), params.limit.as_deref());

    let rows = repository.select(&table, filter, page).await?;
    Ok(Json(rows).into_response())
}

/// `GET /api/:segment/:id` - 主キーでの取得 または 売上レポート
pub async fn member_handler(
    path: Result<Path<(String, String)>, PathRejection>,
    Extension(repository): Extension<Arc<dyn TableRepository>>,
) -> Result<Response, ApiError> {
    let Path((segment, id)) = path?;

    if segment == REPORTS_SEGMENT && id == SALES_BY_PRODUCT {
        let report = repository.sales_by_product().await?;
        return Ok(Json(report).into_response());
    }

    let table = repository.resolve_table(&segment).await?;
    let record = repository.find_by_id(&table, &id).await?;
    Ok(Json(record).into_response())
}

/// `GET /api/:segment/:id/:relation` - マスター・明細の結合
///
/// テーブル名の解決は行わず、リテラルのパスだけを受け付ける。
pub async fn relation_handler(
    path: Result<Path<(String, String, String)>, PathRejection>,
    Extension(repository): Extension<Arc<dyn TableRepository>>,
) -> Result<Response, ApiError> {
    let Path((segment, id, relation)) = path?;

    let rows = match (segment.as_str(), relation.as_str()) {
        ("orders", "details") => repository.order_details(&id).await?,
        ("customers", "orders") => repository.orders_for_customer(&id).await?,
        ("products", "orders") => repository.orders_for_product(&id).await?,
        _ => return Err(ApiError::RouteNotFound(format!("/api/{}/{}/{}", segment, id, relation))),
    };

    Ok(Json(rows).into_response())
}

// ==========================================
// 水泥库存计划看板 - HTTP 路由
// ==========================================
// GET  /               看板页面
// GET  /api/dashboard  看板视图 JSON
// GET  /api/sites      站点列表
// GET  /download       补货计划 CSV
// POST /api/reload     重新加载数据集
// GET  /health         健康检查
// ==========================================

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::common::{status_for, AppError};
use super::state::AppState;
use crate::api::{ApiError, DashboardView, DatasetSummary};
use crate::engine::CacheStats;

/// 站点查询参数（缺省 = 第一个站点）
#[derive(Debug, Default, Deserialize)]
pub struct SiteQuery {
    pub site: Option<String>,
}

impl SiteQuery {
    fn selected(&self) -> Option<&str> {
        self.site.as_deref()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/api/dashboard", get(dashboard))
        .route("/api/sites", get(list_sites))
        .route("/download", get(download_reorders))
        .route("/api/reload", post(reload_datasets))
        .route("/health", get(health_check))
        .with_state(state)
}

async fn index_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SiteQuery>,
) -> Result<Response, AppError> {
    let (status, html) = match state.dashboard_api.render(query.selected()) {
        Ok(view) => (StatusCode::OK, state.pages.render_dashboard(&view)?),
        Err(e) => {
            tracing::warn!(error = %e, site = ?query.site, "看板渲染失败");
            (status_for(&e), state.pages.render_error(&e.to_string())?)
        }
    };
    Ok((status, Html(html)).into_response())
}

async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SiteQuery>,
) -> Result<Json<DashboardView>, AppError> {
    let view = state.dashboard_api.render(query.selected())?;
    Ok(Json(view))
}

async fn list_sites(State(state): State<Arc<AppState>>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.dashboard_api.list_sites()?))
}

/// Content-Disposition: ASCII 回退名 + RFC 5987 编码名
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| if c.is_ascii_graphic() && c != '"' && c != '\\' { c } else { '_' })
        .collect();
    let encoded: String = url::form_urlencoded::byte_serialize(file_name.as_bytes())
        .collect::<String>()
        .replace('+', "%20");
    format!("attachment; filename=\"{}\"; filename*=UTF-8''{}", fallback, encoded)
}

async fn download_reorders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SiteQuery>,
) -> Result<Response, AppError> {
    let export = state.dashboard_api.export_reorder_csv(query.selected())?;

    let disposition = HeaderValue::from_str(&content_disposition(&export.file_name))
        .map_err(|e| ApiError::ExportError(format!("文件名无效: {}", e)))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(export.mime)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Bytes::copy_from_slice(&export.bytes),
    )
        .into_response())
}

async fn reload_datasets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DatasetSummary>, AppError> {
    let api = Arc::clone(&state.dashboard_api);
    let summary = tokio::task::spawn_blocking(move || api.reload())
        .await
        .map_err(|e| ApiError::InternalError(format!("重新加载任务失败: {}", e)))??;
    Ok(Json(summary))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub datasets: Option<DatasetSummary>,
    pub error: Option<String>,
    pub export_cache: Option<CacheStats>,
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let (status, datasets, error) = match state.dashboard_api.dataset_summary() {
        Ok(summary) => ("healthy", Some(summary), None),
        Err(e) => ("degraded", None, Some(e.to_string())),
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        datasets,
        error,
        export_cache: state.dashboard_api.cache_stats().ok(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_ascii() {
        assert_eq!(
            content_disposition("reorder_schedule_S1.csv"),
            "attachment; filename=\"reorder_schedule_S1.csv\"; filename*=UTF-8''reorder_schedule_S1.csv"
        );
    }

    #[test]
    fn test_content_disposition_non_ascii() {
        let value = content_disposition("reorder_schedule_北厂.csv");
        assert!(value.contains("filename=\"reorder_schedule___.csv\""));
        assert!(value.contains("filename*=UTF-8''reorder_schedule_%E5%8C%97%E5%8E%82.csv"));
        assert!(HeaderValue::from_str(&value).is_ok());
    }
}

// ==========================================
// 水泥库存计划看板 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::Arc;

use super::page::PageRenderer;
use crate::api::{ApiResult, DashboardApi};
use crate::config::PlannerConfig;

/// 应用状态
///
/// 在 axum 路由中以 `Arc<AppState>` 共享
pub struct AppState {
    /// 运行配置
    pub config: PlannerConfig,

    /// 看板API
    pub dashboard_api: Arc<DashboardApi>,

    /// HTML 页面模板
    pub pages: PageRenderer,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 说明
    /// 数据集加载失败不会阻止启动,错误会在页面上呈现;
    /// 页面模板无效时返回 InternalError
    pub fn new(config: PlannerConfig) -> ApiResult<Self> {
        tracing::info!(
            kpi_summary = %config.kpi_summary_path.display(),
            forecast_results = %config.forecast_results_path.display(),
            "初始化AppState"
        );

        let dashboard_api = Arc::new(DashboardApi::new(
            config.dataset_sources(),
            config.export_cache_capacity,
        ));

        Self::with_api(config, dashboard_api)
    }

    /// 以现成的 DashboardApi 创建（测试/嵌入场景）
    pub fn with_api(config: PlannerConfig, dashboard_api: Arc<DashboardApi>) -> ApiResult<Self> {
        Ok(Self {
            config,
            dashboard_api,
            pages: PageRenderer::new()?,
        })
    }
}

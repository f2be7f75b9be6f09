// ==========================================
// 水泥库存计划看板 - API 层
// ==========================================
// 职责: 提供看板渲染/导出/重载接口,供 Web 层调用
// ==========================================

pub mod dashboard_api;
pub mod dto;
pub mod error;

// 重导出核心类型
pub use dashboard_api::{build_reorder_table, encode_site_query, render, DashboardApi};
pub use dto::{
    DashboardView, DatasetSummary, DownloadDescriptor, MetricCard, ReorderExport,
    ReorderTableView,
};
pub use error::{ApiError, ApiResult};

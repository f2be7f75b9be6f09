// ==========================================
// 水泥库存计划看板 - 核心库
// ==========================================
// 技术栈: axum + Rust + CSV/Excel 静态数据源
// 系统定位: 决策支持看板 (只读,补货决策由人工确认)
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与数据集
pub mod domain;

// 导入层 - 外部数据
pub mod importer;

// 引擎层 - 站点选择 / KPI / 图表 / 补货导出
pub mod engine;

// 配置层 - 运行配置
pub mod config;

// 日志系统
pub mod logging;

// 性能埋点
pub mod perf;

// 国际化
pub mod i18n;

// API 层 - 看板接口
pub mod api;

// 应用层 - HTTP 服务
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{Datasets, ForecastRecord, KpiSummaryRow, KpiSummaryTable};

// 导入
pub use importer::{DatasetLoader, DatasetSources, LoadError};

// 引擎
pub use engine::{
    ChartBuilder, ChartSpec, EngineError, ExportCache, KpiAggregator, KpiSnapshot, ReorderRow,
    ReorderTable, SiteSelector, Utilization,
};

// API
pub use api::{render, ApiError, DashboardApi, DashboardView};

// 配置
pub use config::PlannerConfig;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "MIG Cement Operational Planner";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

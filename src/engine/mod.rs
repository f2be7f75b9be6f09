// ==========================================
// 水泥库存计划看板 - 引擎层
// ==========================================
// 职责: 站点选择 → KPI 聚合 / 图表构建 / 补货计划导出
// 约束: 纯函数,不做 I/O
// ==========================================

pub mod chart;
pub mod error;
pub mod export_cache;
pub mod kpi;
pub mod reorder;
pub mod site_selector;

// 重导出核心类型
pub use chart::{ChartBuilder, ChartLabels, ChartSpec, ChartTrace};
pub use error::{EngineError, EngineResult};
pub use export_cache::{CacheStats, ExportCache};
pub use kpi::{KpiAggregator, KpiSnapshot, Utilization};
pub use reorder::{export_file_name, filter_reorders, parse_reorder_csv, ReorderRow, ReorderTable};
pub use site_selector::{SiteSelector, SiteSubset};

// ==========================================
// 水泥库存计划看板 - 领域模型层
// ==========================================
// 职责: 定义输入实体与数据集快照
// 约束: 不含加载逻辑,不含聚合逻辑
// ==========================================

pub mod dataset;
pub mod forecast;
pub mod site;

// 重导出核心类型
pub use dataset::Datasets;
pub use forecast::ForecastRecord;
pub use site::{KpiSummaryRow, KpiSummaryTable};

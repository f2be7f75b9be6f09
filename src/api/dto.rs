// ==========================================
// 水泥库存计划看板 - 视图模型
// ==========================================
// 每次交互重新生成,不持久化
// ==========================================

use crate::engine::{ChartSpec, KpiSnapshot, ReorderRow};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::sync::Arc;

/// 看板视图
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub select_label: String,
    /// 站点列表（升序）
    pub sites: Vec<String>,
    pub selected_site: String,
    pub kpis: KpiSnapshot,
    /// 四个指标卡（已格式化）
    pub metric_cards: Vec<MetricCard>,
    pub chart: ChartSpec,
    pub reorder_table: ReorderTableView,
    pub download: DownloadDescriptor,
    /// 需要提示给用户的非致命问题
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub key: String,
    pub label: String,
    pub display: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReorderTableView {
    pub heading: String,
    pub columns: Vec<String>,
    pub rows: Vec<ReorderRow>,
    pub empty_message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadDescriptor {
    pub label: String,
    pub file_name: String,
    pub mime: String,
    pub href: String,
}

/// 补货计划导出结果
#[derive(Debug, Clone)]
pub struct ReorderExport {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Arc<[u8]>,
}

/// 数据集概况
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub sites: usize,
    pub kpi_sites: usize,
    pub forecast_records: usize,
    pub loaded_at: NaiveDateTime,
}

// ==========================================
// 水泥库存计划看板 - 数据集快照
// ==========================================
// 职责: 聚合两份只读输入数据
// 生命周期: 进程启动加载一次,显式 reload 时整体替换
// ==========================================

use crate::domain::forecast::ForecastRecord;
use crate::domain::site::KpiSummaryTable;
use chrono::NaiveDateTime;

/// 已加载的数据集（不可变快照）
#[derive(Debug, Clone)]
pub struct Datasets {
    /// 站点 KPI 汇总
    pub kpi_summary: KpiSummaryTable,
    /// 预测记录（已按 site_id, date 稳定排序）
    pub forecasts: Vec<ForecastRecord>,
    /// 加载时间（本地时间）
    pub loaded_at: NaiveDateTime,
}

impl Datasets {
    pub fn new(kpi_summary: KpiSummaryTable, mut forecasts: Vec<ForecastRecord>) -> Self {
        forecasts.sort_by(|a, b| a.site_id.cmp(&b.site_id).then(a.date.cmp(&b.date)));

        Self {
            kpi_summary,
            forecasts,
            loaded_at: chrono::Local::now().naive_local(),
        }
    }

    pub fn forecast_count(&self) -> usize {
        self.forecasts.len()
    }
}

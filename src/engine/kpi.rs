// ==========================================
// 水泥库存计划看板 - KPI 聚合器
// ==========================================
// 指标: 预测总消耗 / 补货次数 / 平均库存 / 筒仓利用率
// 空子集: 显式报错 EmptySubset（不返回 0）
// 容量非正或非有限值: 利用率标记为 UndefinedCapacity,其余指标照常输出
// ==========================================

use crate::domain::site::{KpiSummaryRow, KpiSummaryTable};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::site_selector::SiteSubset;
use serde::Serialize;

/// 筒仓利用率
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Utilization {
    /// 平均库存 / 容量 × 100
    Percent { value: f64 },
    /// KPI 汇总中无此站点
    UnknownSite,
    /// 容量为 0、负数、NaN 或无穷大,利用率无定义
    UndefinedCapacity { silo_capacity: f64 },
}

impl Utilization {
    pub fn percent(&self) -> Option<f64> {
        match self {
            Utilization::Percent { value } => Some(*value),
            _ => None,
        }
    }
}

/// KPI 快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSnapshot {
    pub total_forecast: f64,
    pub total_reorders: usize,
    pub average_inventory: f64,
    pub silo_capacity: Option<f64>,
    pub utilization: Utilization,
}

pub struct KpiAggregator;

impl KpiAggregator {
    /// 查询站点 KPI 汇总行
    pub fn lookup_summary<'a>(
        table: &'a KpiSummaryTable,
        site_id: &str,
    ) -> EngineResult<&'a KpiSummaryRow> {
        table.get(site_id).ok_or_else(|| EngineError::Lookup {
            site_id: site_id.to_string(),
        })
    }

    /// 计算 KPI
    ///
    /// # 参数
    /// - subset: 站点子集
    /// - summary: 站点汇总行（None 表示查询失败,利用率记为 UnknownSite）
    pub fn compute(
        subset: &SiteSubset<'_>,
        summary: Option<&KpiSummaryRow>,
    ) -> EngineResult<KpiSnapshot> {
        if subset.is_empty() {
            return Err(EngineError::EmptySubset {
                site_id: subset.site_id.clone(),
            });
        }

        let total_forecast: f64 = subset.iter().map(|r| r.forecasted_consumption).sum();
        let total_reorders = subset.iter().filter(|r| r.is_reorder()).count();
        let inventory_sum: f64 = subset.iter().map(|r| r.sim_inventory).sum();
        let average_inventory = inventory_sum / subset.len() as f64;

        let silo_capacity = summary.map(|s| s.silo_capacity);
        let utilization = match silo_capacity {
            Some(capacity) => Self::utilization_rate(average_inventory, capacity),
            None => Utilization::UnknownSite,
        };

        Ok(KpiSnapshot {
            total_forecast,
            total_reorders,
            average_inventory,
            silo_capacity,
            utilization,
        })
    }

    pub fn utilization_rate(average_inventory: f64, silo_capacity: f64) -> Utilization {
        if silo_capacity <= 0.0 || !silo_capacity.is_finite() {
            return Utilization::UndefinedCapacity { silo_capacity };
        }
        Utilization::Percent {
            value: average_inventory / silo_capacity * 100.0,
        }
    }
}

// ==========================================
// 水泥库存计划看板 - 预测记录领域模型
// ==========================================
// 数据来源: 上游预测/仿真批处理产出（只读）
// 粒度: 每个 (site_id, date) 一行
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ForecastRecord - 预测/仿真结果记录
// ==========================================
// 用途: 导入层写入,引擎层只读
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub site_id: String,                // 站点标识
    pub date: NaiveDate,                // 日期
    pub forecasted_consumption: f64,    // 预测消耗量（吨）
    pub sim_inventory: f64,             // 仿真库存（吨）
    pub reorder_flag: bool,             // 补货标记

    // ===== 仅在 reorder_flag=true 时有意义 =====
    pub recommended_delivery_date: Option<NaiveDate>, // 建议到货日期
    pub recommended_delivery_quantity: Option<f64>,   // 建议到货量（吨）

    pub buffer_applied: Option<f64>,    // 安全库存缓冲（透传展示）
}

impl ForecastRecord {
    /// 是否为补货触发点
    pub fn is_reorder(&self) -> bool {
        self.reorder_flag
    }
}

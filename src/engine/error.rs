// ==========================================
// 水泥库存计划看板 - 引擎层错误类型
// ==========================================

use thiserror::Error;

/// 聚合/导出错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// 所选站点没有任何预测记录（均值/利用率无定义）
    #[error("站点 {site_id} 没有预测记录,无法计算 KPI")]
    EmptySubset { site_id: String },

    #[error("预测数据集中没有任何站点")]
    NoSites,

    /// KPI 汇总中查不到站点
    #[error("KPI 汇总中不存在站点: {site_id}")]
    Lookup { site_id: String },

    #[error("补货计划导出失败: {0}")]
    Export(String),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;

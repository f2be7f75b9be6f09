// ==========================================
// 水泥库存计划看板 - 配置层
// ==========================================
// 职责: 数据源路径、监听地址、语言、缓存容量、日志格式
// ==========================================

pub mod planner_config;

// 重导出
pub use planner_config::{
    default_data_dir, default_forecast_file, env_keys, ConfigError, LogFormat, PlannerConfig,
    FORECAST_RESULTS_FILE, FORECAST_RESULTS_PARQUET_FILE, KPI_SUMMARY_FILE,
};

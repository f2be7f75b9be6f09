// ==========================================
// 水泥库存计划看板 - API层错误类型
// ==========================================
// 职责: 将导入层/引擎层错误转换为用户可读的错误消息
// 原则: 所有错误都直接呈现给用户,不吞错误
// ==========================================

use crate::engine::EngineError;
use crate::importer::LoadError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 数据源缺失/不可读/格式错误（整页不可渲染）
    #[error("数据加载失败: {0}")]
    LoadError(String),

    /// KPI 汇总中查不到站点
    #[error("站点查询失败: {0}")]
    LookupError(String),

    /// 站点无预测记录
    #[error("无可用数据: {0}")]
    EmptySubset(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("导出失败: {0}")]
    ExportError(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}

impl From<LoadError> for ApiError {
    fn from(err: LoadError) -> Self {
        ApiError::LoadError(err.to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::EmptySubset { .. } | EngineError::NoSites => {
                ApiError::EmptySubset(err.to_string())
            }
            EngineError::Lookup { .. } => ApiError::LookupError(err.to_string()),
            EngineError::Export(msg) => ApiError::ExportError(msg),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

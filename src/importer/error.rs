// ==========================================
// 水泥库存计划看板 - 导入层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 语义: 任一错误都使本次渲染整体失败（不做部分渲染）
// ==========================================

use thiserror::Error;

/// 数据加载错误
#[derive(Error, Debug)]
pub enum LoadError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .csv/.parquet/.xlsx/.xls/.ods）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("Parquet 解析失败: {0}")]
    ParquetParseError(String),

    // ===== 结构错误 =====
    #[error("缺少必需列 (数据源 {source_name}): {column}")]
    MissingColumn { source_name: String, column: String },

    // ===== 字段错误 =====
    #[error("类型转换失败 (行 {row}, 字段 {field}): {message}")]
    TypeConversionError {
        row: usize,
        field: String,
        message: String,
    },

    #[error("日期格式错误 (行 {row}, 字段 {field}): 无法识别 {value}")]
    DateFormatError {
        row: usize,
        field: String,
        value: String,
    },

    #[error("必填字段为空 (行 {row}, 字段 {field})")]
    RequiredFieldMissing { row: usize, field: String },
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        LoadError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::CsvParseError(err.to_string())
    }
}

impl From<calamine::Error> for LoadError {
    fn from(err: calamine::Error) -> Self {
        LoadError::ExcelParseError(err.to_string())
    }
}

impl From<parquet::errors::ParquetError> for LoadError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        LoadError::ParquetParseError(err.to_string())
    }
}

/// Result 类型别名
pub type LoadResult<T> = Result<T, LoadError>;

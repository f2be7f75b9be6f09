// ==========================================
// 水泥库存计划看板 - 导入层 Trait
// ==========================================
// 职责: 定义解析/映射接口（不包含实现）
// ==========================================

use crate::importer::error::LoadResult;
use std::collections::HashMap;
use std::path::Path;

// ==========================================
// RawTable - 解析后的原始表
// ==========================================
// 表头单独保存: 空文件也能做列校验
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// 表头（已 trim）
    pub headers: Vec<String>,
    /// 数据行（列名 → 原始字符串）,与文件行号一一对应
    pub rows: Vec<RawRow>,
}

/// 单元格来源
///
/// 电子表格把日期存为序列号,只有 Spreadsheet 来源才按序列号解释纯数字日期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellOrigin {
    /// CSV / Parquet（日期已是文本）
    #[default]
    Text,
    /// xlsx / xls / ods
    Spreadsheet,
}

/// 一行原始数据
#[derive(Debug, Clone)]
pub struct RawRow {
    /// 文件中的行号（1 起,表头为第 1 行）
    pub line: usize,
    pub origin: CellOrigin,
    pub values: HashMap<String, String>,
}

impl RawTable {
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

// ==========================================
// FileParser Trait
// ==========================================
// 实现者: CsvParser, ExcelParser, ParquetParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始表
    ///
    /// # 说明
    /// - 单元格值 trim
    /// - 跳过完全空白的行
    fn parse_to_raw_table(&self, file_path: &Path) -> LoadResult<RawTable>;
}

// ==========================================
// RecordMapper Trait
// ==========================================
// 用途: 原始行 → 领域实体
// 实现者: KpiSummaryMapper, ForecastRecordMapper
pub trait RecordMapper: Send + Sync {
    type Record;

    /// 数据源名称（用于错误信息）
    fn source_name(&self) -> &'static str;

    /// 必需列
    fn required_columns(&self) -> &'static [&'static str];

    /// 映射单行
    fn map_row(&self, row: &RawRow) -> LoadResult<Self::Record>;
}

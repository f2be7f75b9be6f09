// ==========================================
// 水泥库存计划看板 - 字段映射器实现
// ==========================================
// 职责: 原始行 → 领域实体 + 类型转换
// 列名: 与上游批处理输出保持一致（snake_case）
// ==========================================

use crate::domain::forecast::ForecastRecord;
use crate::domain::site::KpiSummaryRow;
use crate::importer::error::{LoadError, LoadResult};
use crate::importer::traits::{CellOrigin, RawRow, RecordMapper};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// KPI 汇总必需列
pub const KPI_SUMMARY_COLUMNS: &[&str] = &["site_id", "silo_capacity"];

/// 预测结果必需列
pub const FORECAST_COLUMNS: &[&str] = &[
    "site_id",
    "date",
    "forecasted_consumption",
    "sim_inventory",
    "reorder_flag",
    "recommended_delivery_date",
    "recommended_delivery_quantity",
    "buffer_applied",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

// Excel 1900 日期系统的 0 点（含 1900-02-29 兼容偏移）
const EXCEL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;

/// 千分位数值: 1,020 / -12,345.6（逗号必须三位一组）
static GROUPED_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d{1,3}(,\d{3})+(\.\d+)?$").unwrap());

// ==========================================
// 基础字段解析
// ==========================================

/// 提取非空字符串
fn get_string<'a>(row: &'a RawRow, key: &str) -> Option<&'a str> {
    row.values
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn require_string<'a>(row: &'a RawRow, key: &str) -> LoadResult<&'a str> {
    get_string(row, key).ok_or_else(|| LoadError::RequiredFieldMissing {
        row: row.line,
        field: key.to_string(),
    })
}

/// 去掉千分位逗号; 逗号位置不合法时返回 None
fn strip_grouping(value: &str) -> Option<Cow<'_, str>> {
    if !value.contains(',') {
        return Some(Cow::Borrowed(value));
    }
    GROUPED_NUMBER
        .is_match(value)
        .then(|| Cow::Owned(value.replace(',', "")))
}

/// 解析浮点数（空值 → None）
fn parse_f64(row: &RawRow, key: &str) -> LoadResult<Option<f64>> {
    let value = match get_string(row, key) {
        None => return Ok(None),
        Some(value) if value.eq_ignore_ascii_case("nan") => return Ok(None),
        Some(value) => value,
    };

    strip_grouping(value)
        .and_then(|v| v.parse::<f64>().ok())
        .map(Some)
        .ok_or_else(|| LoadError::TypeConversionError {
            row: row.line,
            field: key.to_string(),
            message: format!("无法解析为数值: {}", value),
        })
}

fn require_f64(row: &RawRow, key: &str) -> LoadResult<f64> {
    parse_f64(row, key)?.ok_or_else(|| LoadError::RequiredFieldMissing {
        row: row.line,
        field: key.to_string(),
    })
}

/// 解析布尔值
fn parse_bool(row: &RawRow, key: &str) -> LoadResult<bool> {
    let value = require_string(row, key)?;
    match value.to_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "1" | "1.0" => Ok(true),
        "false" | "f" | "no" | "n" | "0" | "0.0" => Ok(false),
        _ => Err(LoadError::TypeConversionError {
            row: row.line,
            field: key.to_string(),
            message: format!("无法解析为布尔值: {}", value),
        }),
    }
}

/// 解析日期字符串
///
/// 支持 ISO 日期、带时间的日期时间（截取日期部分）、YYYYMMDD;
/// 电子表格来源额外接受序列号
pub fn parse_date_value(value: &str, origin: CellOrigin) -> Option<NaiveDate> {
    let value = value.trim();

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    if origin != CellOrigin::Spreadsheet {
        return None;
    }

    // 电子表格序列号（如 45292 = 2024-01-01）
    let serial = value.parse::<f64>().ok()?;
    if !(1.0..=EXCEL_MAX_SERIAL).contains(&serial) {
        return None;
    }
    let (y, m, d) = EXCEL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_signed(Duration::days(serial.floor() as i64))
}

fn parse_date(row: &RawRow, key: &str) -> LoadResult<Option<NaiveDate>> {
    match get_string(row, key) {
        None => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("nat") => Ok(None),
        Some(value) => parse_date_value(value, row.origin)
            .map(Some)
            .ok_or_else(|| LoadError::DateFormatError {
                row: row.line,
                field: key.to_string(),
                value: value.to_string(),
            }),
    }
}

fn require_date(row: &RawRow, key: &str) -> LoadResult<NaiveDate> {
    parse_date(row, key)?.ok_or_else(|| LoadError::RequiredFieldMissing {
        row: row.line,
        field: key.to_string(),
    })
}

// ==========================================
// KPI 汇总映射
// ==========================================
pub struct KpiSummaryMapper;

impl RecordMapper for KpiSummaryMapper {
    type Record = KpiSummaryRow;

    fn source_name(&self) -> &'static str {
        "kpi_summary"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        KPI_SUMMARY_COLUMNS
    }

    fn map_row(&self, row: &RawRow) -> LoadResult<KpiSummaryRow> {
        Ok(KpiSummaryRow {
            site_id: require_string(row, "site_id")?.to_string(),
            silo_capacity: require_f64(row, "silo_capacity")?,
        })
    }
}

// ==========================================
// 预测结果映射
// ==========================================
pub struct ForecastRecordMapper;

impl RecordMapper for ForecastRecordMapper {
    type Record = ForecastRecord;

    fn source_name(&self) -> &'static str {
        "forecast_results"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        FORECAST_COLUMNS
    }

    fn map_row(&self, row: &RawRow) -> LoadResult<ForecastRecord> {
        Ok(ForecastRecord {
            site_id: require_string(row, "site_id")?.to_string(),
            date: require_date(row, "date")?,
            forecasted_consumption: require_f64(row, "forecasted_consumption")?,
            sim_inventory: require_f64(row, "sim_inventory")?,
            reorder_flag: parse_bool(row, "reorder_flag")?,
            recommended_delivery_date: parse_date(row, "recommended_delivery_date")?,
            recommended_delivery_quantity: parse_f64(row, "recommended_delivery_quantity")?,
            buffer_applied: parse_f64(row, "buffer_applied")?,
        })
    }
}

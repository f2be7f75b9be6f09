// ==========================================
// 水泥库存计划看板 - 补货计划导出
// ==========================================
// 过滤: reorder_flag = true
// 投影: date / sim_inventory / recommended_delivery_date /
//       recommended_delivery_quantity / buffer_applied
// 编码: UTF-8, 逗号分隔, 有表头, 无索引列, 日期 YYYY-MM-DD
// ==========================================

use crate::domain::forecast::ForecastRecord;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::site_selector::SiteSubset;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// CSV 表头（列顺序固定）
pub const REORDER_CSV_HEADER: [&str; 5] = [
    "date",
    "sim_inventory",
    "recommended_delivery_date",
    "recommended_delivery_quantity",
    "buffer_applied",
];

pub const REORDER_CSV_MIME: &str = "text/csv; charset=utf-8";

/// 补货计划行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderRow {
    pub date: String,
    pub sim_inventory: f64,
    pub recommended_delivery_date: Option<String>,
    pub recommended_delivery_quantity: Option<f64>,
    pub buffer_applied: Option<f64>,
}

impl From<&ForecastRecord> for ReorderRow {
    fn from(record: &ForecastRecord) -> Self {
        Self {
            date: record.date.format("%Y-%m-%d").to_string(),
            sim_inventory: record.sim_inventory,
            recommended_delivery_date: record
                .recommended_delivery_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            recommended_delivery_quantity: record.recommended_delivery_quantity,
            buffer_applied: record.buffer_applied,
        }
    }
}

/// 过滤补货记录（幂等: 对结果再次过滤结果不变）
pub fn filter_reorders<'a>(records: &[&'a ForecastRecord]) -> Vec<&'a ForecastRecord> {
    records.iter().copied().filter(|r| r.is_reorder()).collect()
}

/// 下载文件名: reorder_schedule_<site_id>.csv
///
/// 文件名/HTTP 头中不安全的字符替换为 `_`
pub fn export_file_name(site_id: &str) -> String {
    let safe: String = site_id
        .chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\' | '"' | ':' | '*' | '?' | '<' | '>' | '|') {
                '_'
            } else {
                c
            }
        })
        .collect();
    format!("reorder_schedule_{}.csv", safe)
}

/// 补货计划表
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReorderTable {
    pub site_id: String,
    pub rows: Vec<ReorderRow>,
}

impl ReorderTable {
    pub fn from_subset(subset: &SiteSubset<'_>) -> Self {
        Self {
            site_id: subset.site_id.clone(),
            rows: filter_reorders(&subset.records)
                .into_iter()
                .map(ReorderRow::from)
                .collect(),
        }
    }

    pub fn file_name(&self) -> String {
        export_file_name(&self.site_id)
    }

    /// 序列化为 CSV 字节（无记录时仅输出表头）
    pub fn to_csv_bytes(&self) -> EngineResult<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer
            .write_record(REORDER_CSV_HEADER)
            .map_err(|e| EngineError::Export(e.to_string()))?;
        for row in &self.rows {
            writer
                .serialize(row)
                .map_err(|e| EngineError::Export(e.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| EngineError::Export(e.to_string()))
    }

    /// 内容哈希（导出缓存键）
    ///
    /// 覆盖 site_id 与全部投影字段,任一值变化即得到新键
    pub fn content_key(&self) -> String {
        fn update_opt_f64(hasher: &mut Sha256, value: Option<f64>) {
            match value {
                Some(v) => {
                    hasher.update([1u8]);
                    hasher.update(v.to_bits().to_le_bytes());
                }
                None => hasher.update([0u8]),
            }
        }

        let mut hasher = Sha256::new();
        hasher.update(self.site_id.as_bytes());
        hasher.update([0xffu8]);

        for row in &self.rows {
            hasher.update(row.date.as_bytes());
            hasher.update(row.sim_inventory.to_bits().to_le_bytes());
            match &row.recommended_delivery_date {
                Some(d) => {
                    hasher.update([1u8]);
                    hasher.update(d.as_bytes());
                }
                None => hasher.update([0u8]),
            }
            update_opt_f64(&mut hasher, row.recommended_delivery_quantity);
            update_opt_f64(&mut hasher, row.buffer_applied);
        }

        format!("{:x}", hasher.finalize())
    }
}

/// 解析导出的 CSV（用于回读校验）
pub fn parse_reorder_csv(bytes: &[u8]) -> EngineResult<Vec<ReorderRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    reader
        .deserialize()
        .collect::<Result<Vec<ReorderRow>, _>>()
        .map_err(|e| EngineError::Export(e.to_string()))
}

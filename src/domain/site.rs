// ==========================================
// 水泥库存计划看板 - 站点 KPI 汇总
// ==========================================
// 数据来源: historical_kpi_summary（每站点一行）
// 约束: site_id 唯一；重复时保留首行（与历史报表口径一致）
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 站点 KPI 汇总行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummaryRow {
    pub site_id: String,
    /// 筒仓容量（吨）
    pub silo_capacity: f64,
}

/// 按 site_id 索引的 KPI 汇总表
#[derive(Debug, Clone, Default)]
pub struct KpiSummaryTable {
    rows: HashMap<String, KpiSummaryRow>,
}

impl KpiSummaryTable {
    /// 由行集合构建索引
    ///
    /// # 返回
    /// - (表, 被忽略的重复 site_id 列表)
    pub fn from_rows(rows: Vec<KpiSummaryRow>) -> (Self, Vec<String>) {
        let mut index = HashMap::with_capacity(rows.len());
        let mut duplicates = Vec::new();

        for row in rows {
            if index.contains_key(&row.site_id) {
                duplicates.push(row.site_id.clone());
                continue;
            }
            index.insert(row.site_id.clone(), row);
        }

        (Self { rows: index }, duplicates)
    }

    pub fn get(&self, site_id: &str) -> Option<&KpiSummaryRow> {
        self.rows.get(site_id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(site_id: &str, capacity: f64) -> KpiSummaryRow {
        KpiSummaryRow {
            site_id: site_id.to_string(),
            silo_capacity: capacity,
        }
    }

    #[test]
    fn test_from_rows_重复站点保留首行() {
        let (table, duplicates) =
            KpiSummaryTable::from_rows(vec![row("S1", 200.0), row("S2", 300.0), row("S1", 999.0)]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get("S1").unwrap().silo_capacity, 200.0);
        assert_eq!(duplicates, vec!["S1".to_string()]);
    }

    #[test]
    fn test_get_unknown_site() {
        let (table, _) = KpiSummaryTable::from_rows(vec![row("S1", 200.0)]);
        assert!(table.get("S9").is_none());
    }
}

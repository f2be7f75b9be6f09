// ==========================================
// 水泥库存计划看板 - 数据集加载器
// ==========================================
// 流程: 文件解析 → 列校验 → 逐行映射 → 构建快照
// 失败语义: 任一数据源失败即整体失败（LoadError）
// ==========================================

use crate::domain::dataset::Datasets;
use crate::domain::site::KpiSummaryTable;
use crate::importer::error::{LoadError, LoadResult};
use crate::importer::field_mapper::{ForecastRecordMapper, KpiSummaryMapper};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::traits::{RawTable, RecordMapper};
use crate::perf::PerfGuard;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 两份输入数据源的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSources {
    pub kpi_summary_path: PathBuf,
    pub forecast_results_path: PathBuf,
}

/// 校验必需列
pub fn check_columns<M: RecordMapper>(table: &RawTable, mapper: &M) -> LoadResult<()> {
    for column in mapper.required_columns() {
        if !table.has_column(column) {
            return Err(LoadError::MissingColumn {
                source_name: mapper.source_name().to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// 将原始表映射为领域实体
pub fn map_table<M: RecordMapper>(table: &RawTable, mapper: &M) -> LoadResult<Vec<M::Record>> {
    check_columns(table, mapper)?;
    table.rows.iter().map(|row| mapper.map_row(row)).collect()
}

fn load_file<M: RecordMapper>(path: &Path, mapper: &M) -> LoadResult<Vec<M::Record>> {
    let table = UniversalFileParser.parse(path)?;
    let records = map_table(&table, mapper)?;

    tracing::debug!(
        source = mapper.source_name(),
        path = %path.display(),
        rows = records.len(),
        "数据源解析完成"
    );
    Ok(records)
}

// ==========================================
// DatasetLoader
// ==========================================
pub struct DatasetLoader;

impl DatasetLoader {
    /// 加载 KPI 汇总与预测结果
    pub fn load(sources: &DatasetSources) -> LoadResult<Datasets> {
        let _perf = PerfGuard::new("load_datasets");

        let kpi_rows = load_file(&sources.kpi_summary_path, &KpiSummaryMapper)?;
        let forecasts = load_file(&sources.forecast_results_path, &ForecastRecordMapper)?;

        let (kpi_summary, duplicate_sites) = KpiSummaryTable::from_rows(kpi_rows);
        for site_id in &duplicate_sites {
            tracing::warn!(site_id = %site_id, "KPI 汇总存在重复站点,保留首行");
        }

        let mut seen = HashSet::with_capacity(forecasts.len());
        let mut duplicate_pairs = 0usize;
        for record in &forecasts {
            if !seen.insert((record.site_id.as_str(), record.date)) {
                duplicate_pairs += 1;
            }
        }
        if duplicate_pairs > 0 {
            tracing::warn!(duplicate_pairs, "预测结果存在重复的 (site_id, date) 记录");
        }

        let datasets = Datasets::new(kpi_summary, forecasts);

        tracing::info!(
            kpi_sites = datasets.kpi_summary.len(),
            forecast_records = datasets.forecast_count(),
            "数据集加载完成"
        );

        Ok(datasets)
    }
}

// ==========================================
// 测试数据集构建器
// ==========================================
// 职责: 在临时目录写入两份数据源（CSV,预测结果可选 Parquet）,供加载/渲染/导出测试使用
// ==========================================

use cement_planner::importer::DatasetSources;
use chrono::NaiveDate;
use parquet::data_type::{BoolType, ByteArray, ByteArrayType, DoubleType, Int32Type};
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub const FORECAST_HEADER: &str = "site_id,date,forecasted_consumption,sim_inventory,reorder_flag,recommended_delivery_date,recommended_delivery_quantity,buffer_applied";

/// S1 示例场景 + S2（乱序行,用于验证排序）
pub const EXAMPLE_FORECASTS: &str = "\
S2,2024-01-02,300,4000,True,2024-01-04,2500,0.15
S1,2024-01-01,10,100,False,,,
S1,2024-01-02,20,80,False,,,
S1,2024-01-03,15,65,True,2024-01-05,135,0.2
S2,2024-01-01,250,4300,False,,,
S2,2024-01-03,280,3720,False,,,
";

/// 与 EXAMPLE_FORECASTS 相同的数据（Parquet 写入用）
/// (site_id, date, consumption, inventory, flag, delivery_date, quantity, buffer)
pub type ForecastTuple = (
    &'static str,
    &'static str,
    f64,
    f64,
    bool,
    Option<&'static str>,
    Option<f64>,
    Option<f64>,
);

pub const EXAMPLE_FORECAST_ROWS: &[ForecastTuple] = &[
    ("S2", "2024-01-02", 300.0, 4000.0, true, Some("2024-01-04"), Some(2500.0), Some(0.15)),
    ("S1", "2024-01-01", 10.0, 100.0, false, None, None, None),
    ("S1", "2024-01-02", 20.0, 80.0, false, None, None, None),
    ("S1", "2024-01-03", 15.0, 65.0, true, Some("2024-01-05"), Some(135.0), Some(0.2)),
    ("S2", "2024-01-01", 250.0, 4300.0, false, None, None, None),
    ("S2", "2024-01-03", 280.0, 3720.0, false, None, None, None),
];

const FORECAST_PARQUET_SCHEMA: &str = "
message forecast_results {
    REQUIRED BYTE_ARRAY site_id (UTF8);
    REQUIRED INT32 date (DATE);
    REQUIRED DOUBLE forecasted_consumption;
    REQUIRED DOUBLE sim_inventory;
    REQUIRED BOOLEAN reorder_flag;
    OPTIONAL INT32 recommended_delivery_date (DATE);
    OPTIONAL DOUBLE recommended_delivery_quantity;
    OPTIONAL DOUBLE buffer_applied;
}
";

fn epoch_days(date: &str) -> i32 {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("日期格式错误");
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
    (date - epoch).num_days() as i32
}

/// 可空列: (定义级别, 非空值)
fn optional_column<T, U: Copy>(values: impl Iterator<Item = Option<U>>, map: impl Fn(U) -> T) -> (Vec<i16>, Vec<T>) {
    let mut levels = Vec::new();
    let mut present = Vec::new();
    for value in values {
        match value {
            Some(v) => {
                levels.push(1);
                present.push(map(v));
            }
            None => levels.push(0),
        }
    }
    (levels, present)
}

/// 写入预测结果 Parquet 文件
pub fn write_forecast_parquet(path: &std::path::Path, rows: &[ForecastTuple]) {
    let schema = Arc::new(parse_message_type(FORECAST_PARQUET_SCHEMA).expect("schema 无效"));
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).expect("创建 Parquet 文件失败");
    let mut writer = SerializedFileWriter::new(file, schema, props).expect("创建写入器失败");

    let mut row_group = writer.next_row_group().expect("创建行组失败");
    let mut column_idx = 0;
    while let Some(mut column) = row_group.next_column().expect("获取列失败") {
        let written = match column_idx {
            0 => {
                let values: Vec<ByteArray> = rows.iter().map(|r| ByteArray::from(r.0)).collect();
                column.typed::<ByteArrayType>().write_batch(&values, None, None)
            }
            1 => {
                let values: Vec<i32> = rows.iter().map(|r| epoch_days(r.1)).collect();
                column.typed::<Int32Type>().write_batch(&values, None, None)
            }
            2 | 3 => {
                let values: Vec<f64> = rows
                    .iter()
                    .map(|r| if column_idx == 2 { r.2 } else { r.3 })
                    .collect();
                column.typed::<DoubleType>().write_batch(&values, None, None)
            }
            4 => {
                let values: Vec<bool> = rows.iter().map(|r| r.4).collect();
                column.typed::<BoolType>().write_batch(&values, None, None)
            }
            5 => {
                let (levels, values) = optional_column(rows.iter().map(|r| r.5), epoch_days);
                column.typed::<Int32Type>().write_batch(&values, Some(levels.as_slice()), None)
            }
            _ => {
                let (levels, values) = optional_column(
                    rows.iter().map(|r| if column_idx == 6 { r.6 } else { r.7 }),
                    |v| v,
                );
                column.typed::<DoubleType>().write_batch(&values, Some(levels.as_slice()), None)
            }
        };
        written.expect("写入列失败");
        column.close().expect("关闭列失败");
        column_idx += 1;
    }
    row_group.close().expect("关闭行组失败");
    writer.close().expect("关闭 Parquet 文件失败");
}

pub const EXAMPLE_KPI_SUMMARY: &str = "\
site_id,silo_capacity
S1,200
S2,8000
";

/// 临时数据集（TempDir 需保持存活）
pub struct DatasetFixture {
    pub dir: TempDir,
    pub sources: DatasetSources,
}

impl DatasetFixture {
    /// 以原始文本创建
    pub fn with_contents(kpi_summary: &str, forecasts: &str) -> Self {
        let dir = TempDir::new().expect("无法创建临时目录");
        let sources = DatasetSources {
            kpi_summary_path: dir.path().join("historical_kpi_summary.csv"),
            forecast_results_path: dir.path().join("cement_forecast_results.csv"),
        };

        let fixture = Self { dir, sources };
        fixture.write_kpi_summary(kpi_summary);
        fixture.write_forecasts(forecasts);
        fixture
    }

    /// 标准示例数据集
    pub fn example() -> Self {
        Self::with_contents(
            EXAMPLE_KPI_SUMMARY,
            &format!("{}\n{}", FORECAST_HEADER, EXAMPLE_FORECASTS),
        )
    }

    pub fn write_kpi_summary(&self, content: &str) {
        fs::write(&self.sources.kpi_summary_path, content).expect("写入 KPI 汇总失败");
    }

    pub fn write_forecasts(&self, content: &str) {
        fs::write(&self.sources.forecast_results_path, content).expect("写入预测结果失败");
    }

    /// 改用 Parquet 预测结果（写入示例数据并切换数据源路径）
    pub fn use_parquet_forecasts(&mut self, rows: &[ForecastTuple]) {
        let path = self.dir.path().join("cement_forecast_results.parquet");
        write_forecast_parquet(&path, rows);
        self.sources.forecast_results_path = path;
    }

    pub fn remove_forecasts(&self) {
        fs::remove_file(&self.sources.forecast_results_path).expect("删除预测结果失败");
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

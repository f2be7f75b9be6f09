// ==========================================
// 水泥库存计划看板 - 导入层
// ==========================================
// 职责: 读取两份静态数据源,生成只读数据集快照
// 支持: CSV, Parquet, Excel/ODS
// ==========================================

pub mod dataset_loader;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod traits;

// 重导出核心类型
pub use dataset_loader::{DatasetLoader, DatasetSources};
pub use error::{LoadError, LoadResult};
pub use field_mapper::{ForecastRecordMapper, KpiSummaryMapper};
pub use file_parser::{CsvParser, ExcelParser, ParquetParser, UniversalFileParser};
pub use traits::{CellOrigin, FileParser, RawRow, RawTable, RecordMapper};

// ==========================================
// 水泥库存计划看板 - 文件解析器实现
// ==========================================
// 支持: CSV (.csv) / Parquet (.parquet) / 电子表格 (.xlsx/.xls/.ods,读取首个工作表)
// ==========================================

use crate::importer::error::{LoadError, LoadResult};
use crate::importer::traits::{CellOrigin, FileParser, RawRow, RawTable};
use calamine::{open_workbook_auto, Reader};
use chrono::{DateTime, Duration, NaiveDate};
use csv::ReaderBuilder;
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// 规范化表头（去除 BOM 与首尾空白）
fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

fn ensure_exists(path: &Path) -> LoadResult<()> {
    if !path.exists() {
        return Err(LoadError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> LoadResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "csv" {
            return Err(LoadError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(file);

        let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(row_idx + 2);

            let mut values = HashMap::new();
            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    values.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if values.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(RawRow {
                line,
                origin: CellOrigin::Text,
                values,
            });
        }

        Ok(RawTable { headers, rows })
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> LoadResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if !matches!(ext.as_str(), "xlsx" | "xls" | "ods") {
            return Err(LoadError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(file_path)?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| LoadError::ExcelParseError("文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&sheet_name)?;
        let header_line = range.start().map(|(r, _)| r as usize + 1).unwrap_or(1);

        // 提取表头（第一行）
        let mut data_rows = range.rows();
        let header_row = match data_rows.next() {
            Some(row) => row,
            None => return Ok(RawTable::default()),
        };

        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| normalize_header(&cell.to_string()))
            .collect();

        let mut rows = Vec::new();
        for (row_idx, data_row) in data_rows.enumerate() {
            let mut values = HashMap::new();
            for (col_idx, cell) in data_row.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    values.insert(header.clone(), cell.to_string().trim().to_string());
                }
            }

            if values.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(RawRow {
                line: header_line + row_idx + 1,
                origin: CellOrigin::Spreadsheet,
                values,
            });
        }

        Ok(RawTable { headers, rows })
    }
}

// ==========================================
// Parquet Parser 实现
// ==========================================
// 行号按 CSV 口径编号（首条记录为第 2 行）
pub struct ParquetParser;

/// Parquet 字段 → 文本（与 CSV 单元格口径一致）
fn parquet_field_text(field: &Field) -> String {
    match field {
        Field::Null => String::new(),
        Field::Str(s) => s.clone(),
        Field::Bool(b) => b.to_string(),
        Field::Float(v) => v.to_string(),
        Field::Double(v) => v.to_string(),
        Field::Date(days) => NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(Duration::days(i64::from(*days))))
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| days.to_string()),
        Field::TimestampMillis(ms) => DateTime::from_timestamp_millis(*ms)
            .map(|dt| dt.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| ms.to_string()),
        Field::TimestampMicros(us) => DateTime::from_timestamp_micros(*us)
            .map(|dt| dt.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| us.to_string()),
        other => other.to_string(),
    }
}

impl FileParser for ParquetParser {
    fn parse_to_raw_table(&self, file_path: &Path) -> LoadResult<RawTable> {
        ensure_exists(file_path)?;

        let ext = extension_of(file_path);
        if ext != "parquet" {
            return Err(LoadError::UnsupportedFormat(ext));
        }

        let reader = SerializedFileReader::new(File::open(file_path)?)?;

        let headers: Vec<String> = reader
            .metadata()
            .file_metadata()
            .schema()
            .get_fields()
            .iter()
            .map(|field| normalize_header(field.name()))
            .collect();

        let mut rows = Vec::new();
        for (row_idx, result) in reader.get_row_iter(None)?.enumerate() {
            let row = result?;

            let values: HashMap<String, String> = row
                .get_column_iter()
                .map(|(name, field)| {
                    (
                        normalize_header(name),
                        parquet_field_text(field).trim().to_string(),
                    )
                })
                .collect();

            if values.values().all(|v| v.is_empty()) {
                continue;
            }

            rows.push(RawRow {
                line: row_idx + 2,
                origin: CellOrigin::Text,
                values,
            });
        }

        tracing::debug!(path = %file_path.display(), rows = rows.len(), "Parquet 解析完成");
        Ok(RawTable { headers, rows })
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> LoadResult<RawTable> {
        let path = file_path.as_ref();

        match extension_of(path).as_str() {
            "csv" => CsvParser.parse_to_raw_table(path),
            "parquet" => ParquetParser.parse_to_raw_table(path),
            "xlsx" | "xls" | "ods" => ExcelParser.parse_to_raw_table(path),
            other => {
                ensure_exists(path)?;
                Err(LoadError::UnsupportedFormat(other.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn csv_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut temp_file = Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(temp_file, "{}", line).unwrap();
        }
        temp_file
    }

    #[test]
    fn test_csv_parser_valid_file() {
        let temp_file = csv_file(&["site_id,silo_capacity", "S1, 200", "S2,350.5"]);

        let table = CsvParser.parse_to_raw_table(temp_file.path()).unwrap();

        assert_eq!(table.headers, vec!["site_id", "silo_capacity"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].values.get("silo_capacity"), Some(&"200".to_string()));
        assert_eq!(table.rows[0].line, 2);
        assert_eq!(table.rows[1].line, 3);
    }

    #[test]
    fn test_csv_parser_file_not_found() {
        let result = CsvParser.parse_to_raw_table(Path::new("non_existent.csv"));
        assert!(matches!(result, Err(LoadError::FileNotFound(_))));
    }

    #[test]
    fn test_csv_parser_skip_blank_rows() {
        let temp_file = csv_file(&["site_id,silo_capacity", "S1,200", ",", "S2,300"]);

        let table = CsvParser.parse_to_raw_table(temp_file.path()).unwrap();

        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].line, 4);
    }

    #[test]
    fn test_csv_parser_header_only() {
        let temp_file = csv_file(&["site_id,silo_capacity"]);

        let table = CsvParser.parse_to_raw_table(temp_file.path()).unwrap();

        assert!(table.rows.is_empty());
        assert!(table.has_column("silo_capacity"));
    }

    #[test]
    fn test_csv_parser_strips_bom() {
        let temp_file = csv_file(&["\u{feff}site_id,silo_capacity", "S1,200"]);

        let table = CsvParser.parse_to_raw_table(temp_file.path()).unwrap();

        assert!(table.has_column("site_id"));
    }

    #[test]
    fn test_universal_parser_unsupported_format() {
        let temp_file = Builder::new().suffix(".json").tempfile().unwrap();

        let result = UniversalFileParser.parse(temp_file.path());

        assert!(matches!(result, Err(LoadError::UnsupportedFormat(ext)) if ext == "json"));
    }

    #[test]
    fn test_parquet_parser_rejects_corrupt_file() {
        let mut temp_file = Builder::new().suffix(".parquet").tempfile().unwrap();
        write!(temp_file, "site_id,date").unwrap();

        let result = UniversalFileParser.parse(temp_file.path());

        assert!(matches!(result, Err(LoadError::ParquetParseError(_))));
    }

    #[test]
    fn test_parquet_field_text() {
        assert_eq!(parquet_field_text(&Field::Null), "");
        assert_eq!(parquet_field_text(&Field::Str("S1".to_string())), "S1");
        assert_eq!(parquet_field_text(&Field::Date(19725)), "2024-01-03");
        assert_eq!(
            parquet_field_text(&Field::TimestampMicros(1_704_240_000_000_000)),
            "2024-01-03 00:00:00"
        );
        assert_eq!(parquet_field_text(&Field::Double(65.5)), "65.5");
        assert_eq!(parquet_field_text(&Field::Bool(true)), "true");
    }
}

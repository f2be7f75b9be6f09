// ==========================================
// 水泥库存计划看板 - 运行配置
// ==========================================
// 加载顺序: 默认值 → JSON 配置文件（CEMENT_PLANNER_CONFIG）→ 环境变量覆写
// 实现: figment（Serialized 默认值 + Json 文件 + CEMENT_PLANNER_ 前缀环境变量）
// ==========================================

use crate::importer::DatasetSources;
use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

// ==========================================
// 配置键（环境变量名）
// ==========================================
pub mod env_keys {
    pub const PREFIX: &str = "CEMENT_PLANNER_";
    pub const CONFIG_FILE: &str = "CEMENT_PLANNER_CONFIG";
    pub const DATA_DIR: &str = "CEMENT_PLANNER_DATA_DIR";
    pub const KPI_PATH: &str = "CEMENT_PLANNER_KPI_PATH";
    pub const FORECAST_PATH: &str = "CEMENT_PLANNER_FORECAST_PATH";
    pub const HOST: &str = "CEMENT_PLANNER_HOST";
    pub const PORT: &str = "CEMENT_PLANNER_PORT";
    pub const LOCALE: &str = "CEMENT_PLANNER_LOCALE";
    pub const EXPORT_CACHE_SIZE: &str = "CEMENT_PLANNER_EXPORT_CACHE_SIZE";
    pub const LOG_FORMAT: &str = "CEMENT_PLANNER_LOG_FORMAT";
}

pub const KPI_SUMMARY_FILE: &str = "historical_kpi_summary.csv";
pub const FORECAST_RESULTS_FILE: &str = "cement_forecast_results.csv";
pub const FORECAST_RESULTS_PARQUET_FILE: &str = "cement_forecast_results.parquet";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置加载失败: {0}")]
    Load(#[from] figment::Error),
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("不支持的日志格式: {}（text/json）", other)),
        }
    }
}

impl TryFrom<String> for LogFormat {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 运行配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub kpi_summary_path: PathBuf,
    pub forecast_results_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub locale: String,
    /// 导出缓存条目上限（0 = 不缓存）
    pub export_cache_capacity: usize,
    pub log_format: LogFormat,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::with_data_dir(&default_data_dir())
    }
}

/// 默认数据目录
///
/// 优先级: CEMENT_PLANNER_DATA_DIR → ./data（存在时）→ 用户数据目录/cement-planner → ./data
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(env_keys::DATA_DIR) {
        let trimmed = dir.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    let local = PathBuf::from("./data");
    if local.is_dir() {
        return local;
    }

    dirs::data_dir()
        .map(|dir| dir.join("cement-planner"))
        .unwrap_or(local)
}

/// 预测结果文件: 目录下存在 parquet 时优先,否则取 CSV
pub fn default_forecast_file(data_dir: &Path) -> PathBuf {
    let parquet = data_dir.join(FORECAST_RESULTS_PARQUET_FILE);
    if parquet.is_file() {
        parquet
    } else {
        data_dir.join(FORECAST_RESULTS_FILE)
    }
}

/// CEMENT_PLANNER_* 环境变量 → 配置字段
fn env_provider() -> Env {
    Env::prefixed(env_keys::PREFIX)
        .ignore(&["config", "data_dir"])
        .map(|key| match key.as_str() {
            "kpi_path" => "kpi_summary_path".into(),
            "forecast_path" => "forecast_results_path".into(),
            "export_cache_size" => "export_cache_capacity".into(),
            other => other.into(),
        })
}

impl PlannerConfig {
    /// 以指定数据目录构造默认配置
    pub fn with_data_dir(data_dir: &Path) -> Self {
        Self {
            kpi_summary_path: data_dir.join(KPI_SUMMARY_FILE),
            forecast_results_path: default_forecast_file(data_dir),
            host: "127.0.0.1".to_string(),
            port: 8501,
            locale: "en".to_string(),
            export_cache_capacity: 32,
            log_format: LogFormat::Text,
        }
    }

    /// 组装配置来源（默认值 → JSON 文件 → 环境变量）
    pub fn figment() -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let config_file = std::env::var(env_keys::CONFIG_FILE)
            .ok()
            .filter(|p| !p.trim().is_empty());
        if let Some(path) = config_file {
            let path = PathBuf::from(path.trim());
            if !path.is_file() {
                return Err(ConfigError::ReadError {
                    path: path.display().to_string(),
                    message: "文件不存在".to_string(),
                });
            }
            figment = figment.merge(Json::file(path));
        }

        Ok(figment.merge(env_provider()))
    }

    /// 从进程环境加载
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self::figment()?.extract()?)
    }

    pub fn dataset_sources(&self) -> DatasetSources {
        DatasetSources {
            kpi_summary_path: self.kpi_summary_path.clone(),
            forecast_results_path: self.forecast_results_path.clone(),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_with_data_dir_defaults() {
        let config = PlannerConfig::with_data_dir(Path::new("/srv/planner"));

        assert_eq!(
            config.kpi_summary_path,
            PathBuf::from("/srv/planner/historical_kpi_summary.csv")
        );
        assert_eq!(
            config.forecast_results_path,
            PathBuf::from("/srv/planner/cement_forecast_results.csv")
        );
        assert_eq!(config.port, 8501);
        assert_eq!(config.locale, "en");
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_parquet_forecast_preferred() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(FORECAST_RESULTS_PARQUET_FILE), b"PAR1").unwrap();

        let config = PlannerConfig::with_data_dir(dir.path());

        assert_eq!(
            config.forecast_results_path,
            dir.path().join("cement_forecast_results.parquet")
        );
    }

    #[test]
    fn test_env_overrides() {
        Jail::expect_with(|jail| {
            jail.set_env(env_keys::KPI_PATH, "/tmp/kpi.csv");
            jail.set_env(env_keys::PORT, "9000");
            jail.set_env(env_keys::LOG_FORMAT, "JSON");
            jail.set_env(env_keys::EXPORT_CACHE_SIZE, "0");

            let config = PlannerConfig::load().unwrap();

            assert_eq!(config.kpi_summary_path, PathBuf::from("/tmp/kpi.csv"));
            assert_eq!(config.port, 9000);
            assert_eq!(config.log_format, LogFormat::Json);
            assert_eq!(config.export_cache_capacity, 0);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_port() {
        Jail::expect_with(|jail| {
            jail.set_env(env_keys::PORT, "eighty");

            let err = PlannerConfig::load().unwrap_err();

            match err {
                ConfigError::Load(e) => assert!(e.to_string().contains("port")),
                other => panic!("Expected Load, got {:?}", other),
            }
            Ok(())
        });
    }

    #[test]
    fn test_json_file_then_env() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "planner.json",
                r#"{"forecast_results_path": "/data/forecast.xlsx", "port": 8080, "locale": "zh-CN"}"#,
            )?;
            jail.set_env(env_keys::CONFIG_FILE, "planner.json");
            jail.set_env(env_keys::PORT, "8081");

            let config = PlannerConfig::load().unwrap();

            assert_eq!(config.forecast_results_path, PathBuf::from("/data/forecast.xlsx"));
            assert_eq!(config.locale, "zh-CN");
            assert_eq!(config.port, 8081);
            Ok(())
        });
    }

    #[test]
    fn test_malformed_json_file() {
        Jail::expect_with(|jail| {
            jail.create_file("planner.json", r#"{"port": "#)?;
            jail.set_env(env_keys::CONFIG_FILE, "planner.json");

            assert!(matches!(PlannerConfig::load(), Err(ConfigError::Load(_))));
            Ok(())
        });
    }

    #[test]
    fn test_missing_json_file() {
        Jail::expect_with(|jail| {
            jail.set_env(env_keys::CONFIG_FILE, "/nonexistent/planner.json");

            assert!(matches!(PlannerConfig::load(), Err(ConfigError::ReadError { .. })));
            Ok(())
        });
    }
}

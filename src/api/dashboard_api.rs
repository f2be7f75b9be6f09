// ==========================================
// 水泥库存计划看板 - 看板 API
// ==========================================
// 职责:
// 1. render(selected_site, datasets) → DashboardView（纯函数,幂等）
// 2. DashboardApi: 持有数据集快照与导出缓存,供 Web 层调用
// 架构: API 层 → 引擎层（站点选择/KPI/图表/补货导出）
// ==========================================

use std::sync::{Arc, RwLock};

use crate::api::dto::{
    DashboardView, DatasetSummary, DownloadDescriptor, MetricCard, ReorderExport,
    ReorderTableView,
};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::Datasets;
use crate::engine::reorder::{REORDER_CSV_HEADER, REORDER_CSV_MIME};
use crate::engine::{
    CacheStats, ChartBuilder, ChartLabels, EngineError, ExportCache, KpiAggregator, KpiSnapshot,
    ReorderTable, SiteSelector, Utilization,
};
use crate::i18n::{t, t_with_args};
use crate::importer::{DatasetLoader, DatasetSources};
use crate::perf::PerfGuard;

// ==========================================
// 指标格式化
// ==========================================

/// 千分位整数（银行家舍入,与 Python `{:,.0f}` 一致）
///
/// NaN / 无穷大原样输出
pub fn format_thousands(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = value.round_ties_even();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn format_utilization(utilization: &Utilization) -> String {
    match utilization.percent() {
        Some(value) => format!("{:.1}%", value),
        None => t("metrics.not_available"),
    }
}

fn metric_cards(kpis: &KpiSnapshot) -> Vec<MetricCard> {
    vec![
        MetricCard {
            key: "total_forecast".to_string(),
            label: t("metrics.total_forecast"),
            display: format!("{} t", format_thousands(kpis.total_forecast)),
        },
        MetricCard {
            key: "planned_reorders".to_string(),
            label: t("metrics.planned_reorders"),
            display: kpis.total_reorders.to_string(),
        },
        MetricCard {
            key: "average_inventory".to_string(),
            label: t("metrics.average_inventory"),
            display: format!("{} t", format_thousands(kpis.average_inventory)),
        },
        MetricCard {
            key: "utilization_rate".to_string(),
            label: t("metrics.utilization_rate"),
            display: format_utilization(&kpis.utilization),
        },
    ]
}

fn chart_labels(site_id: &str) -> ChartLabels {
    ChartLabels {
        title: t_with_args("chart.title", &[("site", site_id)]),
        x_axis_title: t("chart.x_axis"),
        y_axis_title: t("chart.y_axis"),
        inventory_name: t("chart.inventory"),
        consumption_name: t("chart.consumption"),
        reorder_name: t("chart.reorder"),
    }
}

/// site 查询参数编码（application/x-www-form-urlencoded）
pub fn encode_site_query(site_id: &str) -> String {
    url::form_urlencoded::byte_serialize(site_id.as_bytes()).collect()
}

/// 下载链接
pub fn download_href(site_id: &str) -> String {
    format!("/download?site={}", encode_site_query(site_id))
}

// ==========================================
// 纯函数渲染
// ==========================================

/// 站点参数最大长度（字符）
pub const MAX_SITE_PARAM_CHARS: usize = 128;

/// 校验站点参数: 超长或含控制字符 → InvalidInput
pub fn validate_site_param(selected_site: Option<&str>) -> ApiResult<()> {
    let Some(site) = selected_site else {
        return Ok(());
    };

    if site.chars().count() > MAX_SITE_PARAM_CHARS {
        return Err(ApiError::InvalidInput(format!(
            "站点参数超过 {} 个字符",
            MAX_SITE_PARAM_CHARS
        )));
    }
    if site.chars().any(char::is_control) {
        return Err(ApiError::InvalidInput(format!(
            "站点参数包含控制字符: {:?}",
            site
        )));
    }
    Ok(())
}

/// 按站点生成补货计划表
///
/// 空子集按 EmptySubset 处理（与 KPI 口径一致）
pub fn build_reorder_table(
    selected_site: Option<&str>,
    datasets: &Datasets,
) -> ApiResult<ReorderTable> {
    validate_site_param(selected_site)?;
    let selector = SiteSelector::new(&datasets.forecasts);
    let site_id = selector.select(selected_site)?;
    let subset = SiteSelector::subset(&datasets.forecasts, &site_id);

    if subset.is_empty() {
        return Err(EngineError::EmptySubset { site_id }.into());
    }

    Ok(ReorderTable::from_subset(&subset))
}

/// 渲染看板视图
///
/// # 参数
/// - selected_site: 用户选择的站点（None = 默认第一个站点）
/// - datasets: 已加载的数据集
///
/// # 失败策略
/// - 站点参数超长或含控制字符 → InvalidInput
/// - 无站点 / 站点无记录 → EmptySubset
/// - KPI 汇总查不到站点 → 继续渲染,利用率显示为 n/a 并给出提示
pub fn render(selected_site: Option<&str>, datasets: &Datasets) -> ApiResult<DashboardView> {
    let _perf = PerfGuard::new("render_dashboard");
    validate_site_param(selected_site)?;

    let selector = SiteSelector::new(&datasets.forecasts);
    let site_id = selector.select(selected_site)?;
    let subset = SiteSelector::subset(&datasets.forecasts, &site_id);
    if subset.is_empty() {
        return Err(EngineError::EmptySubset { site_id }.into());
    }

    let mut warnings = Vec::new();

    let summary = match KpiAggregator::lookup_summary(&datasets.kpi_summary, &site_id) {
        Ok(row) => Some(row),
        Err(e) => {
            tracing::warn!(site_id = %site_id, error = %e, "KPI 汇总缺失,利用率不可用");
            warnings.push(t_with_args("warnings.unknown_site", &[("site", site_id.as_str())]));
            None
        }
    };

    let kpis = KpiAggregator::compute(&subset, summary)?;

    if let Utilization::UndefinedCapacity { silo_capacity } = kpis.utilization {
        tracing::warn!(site_id = %site_id, silo_capacity, "筒仓容量无效,利用率无定义");
        let capacity = silo_capacity.to_string();
        warnings.push(t_with_args(
            "warnings.undefined_capacity",
            &[("site", site_id.as_str()), ("capacity", capacity.as_str())],
        ));
    }

    let chart = ChartBuilder::build(&subset, &chart_labels(&site_id));
    let table = ReorderTable::from_subset(&subset);

    tracing::debug!(
        site_id = %site_id,
        records = subset.len(),
        reorders = table.rows.len(),
        "看板渲染完成"
    );

    Ok(DashboardView {
        title: t("page.title"),
        select_label: t("page.select_site"),
        sites: selector.sites().to_vec(),
        metric_cards: metric_cards(&kpis),
        kpis,
        chart,
        reorder_table: ReorderTableView {
            heading: t("table.heading"),
            columns: REORDER_CSV_HEADER.iter().map(|c| c.to_string()).collect(),
            rows: table.rows,
            empty_message: t("table.empty"),
        },
        download: DownloadDescriptor {
            label: t("download.label"),
            file_name: crate::engine::export_file_name(&site_id),
            mime: REORDER_CSV_MIME.to_string(),
            href: download_href(&site_id),
        },
        selected_site: site_id,
        warnings,
    })
}

// ==========================================
// DashboardApi - 看板 API
// ==========================================

/// 数据集状态
enum DatasetState {
    Loaded(Arc<Datasets>),
    /// 加载失败（保存错误消息,每次请求都呈现给用户）
    Failed(String),
}

/// 看板API
///
/// 职责：
/// 1. 持有只读数据集快照（reload 时整体替换）
/// 2. 持有导出缓存（reload 时清空）
/// 3. 委托纯函数 render / build_reorder_table
pub struct DashboardApi {
    sources: DatasetSources,
    state: RwLock<DatasetState>,
    export_cache: ExportCache,
}

impl DashboardApi {
    /// 加载数据集并创建实例
    ///
    /// 加载失败不会阻止启动: 错误会在每次渲染时返回给用户,可通过 reload 恢复
    pub fn new(sources: DatasetSources, export_cache_capacity: usize) -> Self {
        let state = match DatasetLoader::load(&sources) {
            Ok(datasets) => DatasetState::Loaded(Arc::new(datasets)),
            Err(e) => {
                tracing::error!(error = %e, "数据集加载失败");
                DatasetState::Failed(e.to_string())
            }
        };

        Self {
            sources,
            state: RwLock::new(state),
            export_cache: ExportCache::new(export_cache_capacity),
        }
    }

    /// 以已加载的数据集创建实例
    pub fn from_datasets(
        sources: DatasetSources,
        datasets: Datasets,
        export_cache_capacity: usize,
    ) -> Self {
        Self {
            sources,
            state: RwLock::new(DatasetState::Loaded(Arc::new(datasets))),
            export_cache: ExportCache::new(export_cache_capacity),
        }
    }

    /// 当前数据集快照
    pub fn snapshot(&self) -> ApiResult<Arc<Datasets>> {
        let state = self
            .state
            .read()
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))?;

        match &*state {
            DatasetState::Loaded(datasets) => Ok(Arc::clone(datasets)),
            DatasetState::Failed(message) => Err(ApiError::LoadError(message.clone())),
        }
    }

    /// 渲染看板
    pub fn render(&self, selected_site: Option<&str>) -> ApiResult<DashboardView> {
        let datasets = self.snapshot()?;
        render(selected_site, &datasets)
    }

    /// 站点列表
    pub fn list_sites(&self) -> ApiResult<Vec<String>> {
        let datasets = self.snapshot()?;
        Ok(SiteSelector::new(&datasets.forecasts).sites().to_vec())
    }

    /// 导出补货计划 CSV（按内容哈希缓存）
    pub fn export_reorder_csv(&self, selected_site: Option<&str>) -> ApiResult<ReorderExport> {
        let _perf = PerfGuard::new("export_reorder_csv");

        let datasets = self.snapshot()?;
        let table = build_reorder_table(selected_site, &datasets)?;
        let key = table.content_key();

        let bytes = self
            .export_cache
            .get_or_try_insert_with(&key, || table.to_csv_bytes())?;

        tracing::info!(
            site_id = %table.site_id,
            rows = table.rows.len(),
            bytes = bytes.len(),
            "补货计划导出"
        );

        Ok(ReorderExport {
            file_name: table.file_name(),
            mime: REORDER_CSV_MIME,
            bytes,
        })
    }

    /// 重新加载数据集并清空导出缓存
    ///
    /// 加载失败时切换为失败状态（不继续展示旧数据）
    pub fn reload(&self) -> ApiResult<DatasetSummary> {
        let result = DatasetLoader::load(&self.sources);

        self.export_cache.invalidate();

        let mut state = self
            .state
            .write()
            .map_err(|e| ApiError::InternalError(format!("锁获取失败: {}", e)))?;

        match result {
            Ok(datasets) => {
                let summary = summarize(&datasets);
                *state = DatasetState::Loaded(Arc::new(datasets));
                tracing::info!(forecast_records = summary.forecast_records, "数据集已重新加载");
                Ok(summary)
            }
            Err(e) => {
                tracing::error!(error = %e, "数据集重新加载失败");
                *state = DatasetState::Failed(e.to_string());
                Err(e.into())
            }
        }
    }

    pub fn dataset_summary(&self) -> ApiResult<DatasetSummary> {
        Ok(summarize(&*self.snapshot()?))
    }

    pub fn cache_stats(&self) -> ApiResult<CacheStats> {
        Ok(self.export_cache.stats())
    }
}

fn summarize(datasets: &Datasets) -> DatasetSummary {
    DatasetSummary {
        sites: SiteSelector::new(&datasets.forecasts).sites().len(),
        kpi_sites: datasets.kpi_summary.len(),
        forecast_records: datasets.forecast_count(),
        loaded_at: datasets.loaded_at,
    }
}

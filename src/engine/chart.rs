// ==========================================
// 水泥库存计划看板 - 图表构建器
// ==========================================
// 输出: 图表指令集（plotly 兼容 JSON,由前端绘制）
// 三条序列共享日期轴:
//   1. 仿真库存（折线,填充至零）
//   2. 预测消耗（半透明柱）
//   3. 补货触发点（红色 x 标记）
// ==========================================

use crate::engine::site_selector::SiteSubset;
use serde::Serialize;
use serde_json::json;

pub const CHART_HEIGHT: u32 = 450;
pub const CONSUMPTION_OPACITY: f64 = 0.6;

/// 图表文案（已本地化）
#[derive(Debug, Clone)]
pub struct ChartLabels {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub inventory_name: String,
    pub consumption_name: String,
    pub reorder_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Scatter,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Lines,
    Markers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub color: String,
    pub size: u32,
    pub symbol: String,
}

/// 单条序列
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartTrace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<TraceMode>,
    pub name: String,
    /// 日期（YYYY-MM-DD）
    pub x: Vec<String>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerStyle>,
}

/// 图表指令集
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub height: u32,
    pub traces: Vec<ChartTrace>,
}

impl ChartSpec {
    /// 转换为 plotly 的 {data, layout} 结构
    pub fn to_plotly_json(&self) -> serde_json::Value {
        json!({
            "data": self.traces,
            "layout": {
                "title": { "text": self.title },
                "xaxis": { "title": { "text": self.x_axis_title } },
                "yaxis": { "title": { "text": self.y_axis_title } },
                "height": self.height,
                "barmode": "overlay",
            }
        })
    }
}

pub struct ChartBuilder;

impl ChartBuilder {
    pub fn build(subset: &SiteSubset<'_>, labels: &ChartLabels) -> ChartSpec {
        let dates: Vec<String> = subset.iter().map(|r| r.date.to_string()).collect();

        let inventory = ChartTrace {
            kind: TraceKind::Scatter,
            mode: Some(TraceMode::Lines),
            name: labels.inventory_name.clone(),
            x: dates.clone(),
            y: subset.iter().map(|r| r.sim_inventory).collect(),
            fill: Some("tozeroy".to_string()),
            opacity: None,
            marker: None,
        };

        let consumption = ChartTrace {
            kind: TraceKind::Bar,
            mode: None,
            name: labels.consumption_name.clone(),
            x: dates,
            y: subset.iter().map(|r| r.forecasted_consumption).collect(),
            fill: None,
            opacity: Some(CONSUMPTION_OPACITY),
            marker: None,
        };

        let (reorder_x, reorder_y): (Vec<String>, Vec<f64>) = subset
            .iter()
            .filter(|r| r.is_reorder())
            .map(|r| (r.date.to_string(), r.sim_inventory))
            .unzip();

        let reorders = ChartTrace {
            kind: TraceKind::Scatter,
            mode: Some(TraceMode::Markers),
            name: labels.reorder_name.clone(),
            x: reorder_x,
            y: reorder_y,
            fill: None,
            opacity: None,
            marker: Some(MarkerStyle {
                color: "red".to_string(),
                size: 10,
                symbol: "x".to_string(),
            }),
        };

        ChartSpec {
            title: labels.title.clone(),
            x_axis_title: labels.x_axis_title.clone(),
            y_axis_title: labels.y_axis_title.clone(),
            height: CHART_HEIGHT,
            traces: vec![inventory, consumption, reorders],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forecast::ForecastRecord;
    use crate::engine::site_selector::SiteSelector;
    use chrono::NaiveDate;

    fn labels() -> ChartLabels {
        ChartLabels {
            title: "Inventory & Demand Forecast - S1".to_string(),
            x_axis_title: "Date".to_string(),
            y_axis_title: "Inventory (t)".to_string(),
            inventory_name: "Simulated Inventory".to_string(),
            consumption_name: "Forecasted Consumption".to_string(),
            reorder_name: "Reorder Trigger".to_string(),
        }
    }

    fn records() -> Vec<ForecastRecord> {
        [(1, 10.0, 100.0, false), (2, 20.0, 80.0, false), (3, 15.0, 65.0, true)]
            .iter()
            .map(|&(day, consumption, inventory, flag)| ForecastRecord {
                site_id: "S1".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
                forecasted_consumption: consumption,
                sim_inventory: inventory,
                reorder_flag: flag,
                recommended_delivery_date: None,
                recommended_delivery_quantity: None,
                buffer_applied: None,
            })
            .collect()
    }

    #[test]
    fn test_build_three_traces() {
        let records = records();
        let subset = SiteSelector::subset(&records, "S1");

        let spec = ChartBuilder::build(&subset, &labels());

        assert_eq!(spec.traces.len(), 3);
        assert_eq!(spec.height, 450);

        let inventory = &spec.traces[0];
        assert_eq!(inventory.fill.as_deref(), Some("tozeroy"));
        assert_eq!(inventory.y, vec![100.0, 80.0, 65.0]);

        let consumption = &spec.traces[1];
        assert_eq!(consumption.kind, TraceKind::Bar);
        assert_eq!(consumption.opacity, Some(0.6));
        assert_eq!(consumption.x, inventory.x);

        let reorders = &spec.traces[2];
        assert_eq!(reorders.x, vec!["2024-01-03".to_string()]);
        assert_eq!(reorders.y, vec![65.0]);
        assert_eq!(reorders.marker.as_ref().unwrap().symbol, "x");
    }

    #[test]
    fn test_plotly_json_shape() {
        let records = records();
        let subset = SiteSelector::subset(&records, "S1");

        let value = ChartBuilder::build(&subset, &labels()).to_plotly_json();

        assert_eq!(value["data"][0]["type"], "scatter");
        assert_eq!(value["data"][0]["mode"], "lines");
        assert_eq!(value["data"][1]["type"], "bar");
        assert!(value["data"][1].get("mode").is_none());
        assert_eq!(value["data"][2]["marker"]["color"], "red");
        assert_eq!(value["layout"]["title"]["text"], "Inventory & Demand Forecast - S1");
        assert_eq!(value["layout"]["height"], 450);
    }
}

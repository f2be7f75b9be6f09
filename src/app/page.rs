// ==========================================
// 水泥库存计划看板 - HTML 页面
// ==========================================
// 布局: 标题 / 站点下拉 / 四个指标卡 / 组合图 / 补货表 / 下载按钮
// 模板: templates/*.html（tera,编译期嵌入,自动转义）
// 图表: 前端 plotly 按嵌入的 JSON 指令集绘制
// ==========================================

use tera::{Context, Tera};

use crate::api::{encode_site_query, ApiError, ApiResult, DashboardView};
use crate::engine::ReorderRow;
use crate::i18n::{current_locale, t};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

const TEMPLATES: [(&str, &str); 3] = [
    ("layout.html", include_str!("../../templates/layout.html")),
    ("dashboard.html", include_str!("../../templates/dashboard.html")),
    ("error.html", include_str!("../../templates/error.html")),
];

/// 嵌入 <script> 的 JSON（防止提前闭合标签）
fn script_json(value: &serde_json::Value) -> ApiResult<String> {
    let json = serde_json::to_string(value)
        .map_err(|e| ApiError::InternalError(format!("图表序列化失败: {}", e)))?;
    Ok(json.replace("</", "<\\/"))
}

fn opt_text<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

/// 补货表单元格（缺失值显示为空）
fn reorder_cells(row: &ReorderRow) -> [String; 5] {
    [
        row.date.clone(),
        row.sim_inventory.to_string(),
        opt_text(&row.recommended_delivery_date),
        opt_text(&row.recommended_delivery_quantity),
        opt_text(&row.buffer_applied),
    ]
}

/// 页面渲染器
pub struct PageRenderer {
    tera: Tera,
}

impl PageRenderer {
    pub fn new() -> ApiResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.to_vec())
            .map_err(|e| ApiError::InternalError(format!("页面模板加载失败: {}", e)))?;

        tracing::debug!(templates = TEMPLATES.len(), "页面模板已加载");
        Ok(Self { tera })
    }

    fn render(&self, template_name: &str, context: &Context) -> ApiResult<String> {
        self.tera.render(template_name, context).map_err(|e| {
            ApiError::InternalError(format!("页面模板 {} 渲染失败: {}", template_name, e))
        })
    }

    fn base_context(title: &str) -> Context {
        let mut context = Context::new();
        context.insert("lang", &current_locale());
        context.insert("title", title);
        context
    }

    /// 渲染看板页面
    pub fn render_dashboard(&self, view: &DashboardView) -> ApiResult<String> {
        let rows: Vec<[String; 5]> = view.reorder_table.rows.iter().map(reorder_cells).collect();

        let mut context = Self::base_context(&view.title);
        context.insert("view", view);
        context.insert("rows", &rows);
        context.insert("plotly_cdn", PLOTLY_CDN);
        context.insert("chart_json", &script_json(&view.chart.to_plotly_json())?);
        context.insert("download_query", &encode_site_query(&view.selected_site));

        self.render("dashboard.html", &context)
    }

    /// 渲染错误页面（整页不可渲染时）
    pub fn render_error(&self, message: &str) -> ApiResult<String> {
        let mut context = Self::base_context(&t("page.title"));
        context.insert("heading", &t("error.title"));
        context.insert("message", message);

        self.render("error.html", &context)
    }
}

// ==========================================
// 水泥库存计划看板 - 服务入口
// ==========================================
// 启动顺序: 配置 → 日志 → 语言 → 数据集 → HTTP 服务
// ==========================================

use std::sync::Arc;

use cement_planner::app::{router, AppState};
use cement_planner::config::PlannerConfig;
use cement_planner::{i18n, logging};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = PlannerConfig::load()?;

    // 初始化日志系统
    logging::init(config.log_format);

    tracing::info!("==================================================");
    tracing::info!("{}", cement_planner::APP_NAME);
    tracing::info!("系统版本: {}", cement_planner::VERSION);
    tracing::info!("==================================================");

    i18n::set_locale(&config.locale);

    let bind_addr = config.bind_addr();
    let state = Arc::new(AppState::new(config)?);

    let app = router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "看板服务已启动");
    axum::serve(listener, app).await?;

    Ok(())
}

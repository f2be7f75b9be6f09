// ==========================================
// 水泥库存计划看板 - 应用层
// ==========================================
// 职责: axum HTTP 服务,连接浏览器与看板API
// ==========================================

pub mod common;
pub mod page;
pub mod routes;
pub mod state;

// 重导出
pub use common::{map_api_error, AppError, ErrorResponse};
pub use page::PageRenderer;
pub use routes::router;
pub use state::AppState;

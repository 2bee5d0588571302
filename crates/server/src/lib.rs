//! Replycast Server Crate
//!
//! axum 中间件与示例路由。核心能力（上下文、能力集合、JSON 校验、JSONP）
//! 位于 `replycast-core`。

pub mod config;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use replycast_core::ResponseOptions;

pub use config::{ServerConfig, ServerConfigError};
pub use middleware::{with_response_handler, SecurityMiddlewareConfig};

/// 构建示例路由
///
/// 每个路由演示一个能力，`/capabilities` 列出当前请求挂载的能力来源。
pub fn router(options: Arc<ResponseOptions>, security: &SecurityMiddlewareConfig) -> Router {
    let routes = Router::new()
        .route("/status", get(handlers::send_status))
        .route("/send", get(handlers::send))
        .route("/json", get(handlers::json))
        .route("/jsonp", get(handlers::jsonp))
        .route("/render", get(handlers::render))
        .route("/capabilities", get(handlers::capabilities));

    security.apply(with_response_handler(routes, options))
}

//! 安全中间件
//!
//! 为示例服务提供请求体大小限制和请求超时控制

use axum::http::StatusCode;
use axum::Router;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// 安全中间件配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityMiddlewareConfig {
    /// 最大请求体大小（字节），默认 1MB
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// 请求超时（秒），默认 30 秒
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for SecurityMiddlewareConfig {
    fn default() -> Self {
        Self {
            max_body_size: default_max_body_size(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl SecurityMiddlewareConfig {
    /// 获取请求超时 Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 在路由最外层套上大小限制和超时
    pub fn apply(&self, router: Router) -> Router {
        router
            .layer(RequestBodyLimitLayer::new(self.max_body_size))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.request_timeout(),
            ))
    }
}

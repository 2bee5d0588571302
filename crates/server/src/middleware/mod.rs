//! 中间件模块
//!
//! - `response_handler` - 响应能力挂载
//! - `security` - 请求体大小限制和超时

pub mod response_handler;
pub mod security;

pub use response_handler::{response_handler, with_response_handler};
pub use security::SecurityMiddlewareConfig;

//! Replycast Core Crate
//!
//! 为每个请求的上下文挂载一组可链式调用的响应操作：
//! `statusCode`、`sendStatus`、`send`、`json`、`jsonp`、`render`。
//!
//! ## 模块结构
//!
//! - `context` - 请求上下文、响应子对象和 query 解析
//! - `capability` - 能力集合的构建、合并与协作者探测
//! - `json_guard` - JSON 响应校验
//! - `jsonp` - 回调包装（JSONP）
//! - `config` - 配置与运行时选项

pub mod body;
pub mod capability;
pub mod config;
pub mod context;
pub mod error;
pub mod json_guard;
pub mod jsonp;

// 重新导出
pub use body::Body;
pub use capability::{
    Capability, CapabilityBuilder, CapabilityName, CapabilitySet, Collaborators,
    JsonpCollaborator, JsonpProvider, Provenance, RenderCollaborator, ViewRenderer,
};
pub use config::{ConfigError, JsonpOptions, ResponseHandlerConfig, ResponseOptions};
pub use context::{Query, QueryValue, RequestContext, RequestInfo, ResponseContext};
pub use error::ResponseError;
pub use json_guard::{is_json, JsonGuard, JsonValidator};
pub use jsonp::CallbackWrapper;

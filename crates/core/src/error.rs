//! 响应操作错误类型
//!
//! 所有错误都在调用能力时产生，挂载能力集合本身从不失败。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// JSON 校验失败时的固定提示
pub const INVALID_JSON_MESSAGE: &str = "please use a valid json response";

/// 响应操作错误
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    /// `is_json` 没有解析为可调用的谓词，属于配置错误而非负载错误
    #[error("`is_json` option should be a function: {0}")]
    Configuration(String),

    #[error("{}", INVALID_JSON_MESSAGE)]
    InvalidJson,

    /// 调用了依赖外部协作者的能力，但协作者从未挂载
    #[error("`{operation}` is not available: attach a {collaborator} before the response handler")]
    MissingCollaborator {
        operation: &'static str,
        collaborator: &'static str,
    },

    #[error("invalid status code: {0}")]
    InvalidStatus(u16),

    #[error("failed to serialize response payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// 协作者自身报告的错误
    #[error("collaborator error: {0}")]
    Collaborator(String),
}

impl ResponseError {
    /// 对应的 HTTP 状态码
    ///
    /// 这一层的错误都是服务端错误。
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ResponseError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(error = %self, status = status.as_u16(), "响应操作失败");

        (status, self.to_string()).into_response()
    }
}

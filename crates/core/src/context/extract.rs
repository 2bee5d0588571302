//! axum 提取器与响应转换
//!
//! 中间件把挂载好能力的 `RequestContext` 放进请求扩展，处理器通过提取器
//! 取出，修改后直接作为响应返回。

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};

use super::RequestContext;
use crate::error::ResponseError;

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = ResponseError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .remove::<RequestContext>()
            .ok_or(ResponseError::MissingCollaborator {
                operation: "context",
                collaborator: "response handler middleware",
            })
    }
}

impl IntoResponse for RequestContext {
    fn into_response(self) -> Response {
        self.into_response_context().into_response()
    }
}

//! 请求上下文
//!
//! `RequestContext` 持有响应子对象 `ResponseContext`，两者共享同一份
//! 请求信息和同一个能力集合。通过任意一条路径调用的能力都读写同一份
//! status/body/header 状态。

mod extract;
pub mod query;
pub mod response;

use std::sync::Arc;

use axum::http::header::{AsHeaderName, HeaderName};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, Uri};
use serde_json::Value;

use crate::body::Body;
use crate::capability::CapabilitySet;
use crate::error::ResponseError;

pub use query::{Query, QueryValue};
pub use response::ResponseContext;

/// 入站请求信息（只读）
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    query: Query,
}

impl RequestInfo {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        let query = match uri.query() {
            Some(raw) => Query::parse(raw).unwrap_or_else(|err| {
                tracing::debug!(error = %err, query = raw, "query 解析失败，按空 query 处理");
                Query::default()
            }),
            None => Query::default(),
        };
        Self {
            method,
            uri,
            headers,
            query,
        }
    }

    /// 仅带路径的 GET 请求，便于测试和脚本构造上下文
    pub fn get(uri: &str) -> Self {
        let uri = uri.parse::<Uri>().unwrap_or_else(|_| Uri::from_static("/"));
        Self::new(Method::GET, uri, HeaderMap::new())
    }

    pub fn query(&self) -> &Query {
        &self.query
    }
}

/// 请求上下文
#[derive(Debug, Clone)]
pub struct RequestContext {
    request: Arc<RequestInfo>,
    response: ResponseContext,
}

impl RequestContext {
    pub fn new(request: RequestInfo) -> Self {
        let request = Arc::new(request);
        Self {
            response: ResponseContext::new(Arc::clone(&request)),
            request,
        }
    }

    pub fn request(&self) -> &RequestInfo {
        &self.request
    }

    pub fn query(&self) -> &Query {
        self.request.query()
    }

    /// 响应子对象
    pub fn response(&self) -> &ResponseContext {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut ResponseContext {
        &mut self.response
    }

    pub fn into_response_context(self) -> ResponseContext {
        self.response
    }

    /// 已挂载的能力集合，与响应子对象上的是同一个
    pub fn capabilities(&self) -> Option<&Arc<CapabilitySet>> {
        self.response.capabilities()
    }

    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.response.set_status(status);
    }

    pub fn body(&self) -> &Body {
        self.response.body()
    }

    pub fn set_body(&mut self, body: impl Into<Body>) {
        self.response.set_body(body);
    }

    pub fn message(&self) -> String {
        self.response.message()
    }

    pub fn append(&mut self, name: HeaderName, value: HeaderValue) {
        self.response.append(name, value);
    }

    pub fn set(&mut self, name: HeaderName, value: HeaderValue) {
        self.response.set(name, value);
    }

    pub fn get<K: AsHeaderName>(&self, name: K) -> Option<&HeaderValue> {
        self.response.get(name)
    }

    pub fn has<K: AsHeaderName>(&self, name: K) -> bool {
        self.response.has(name)
    }

    pub fn remove<K: AsHeaderName>(&mut self, name: K) -> Option<HeaderValue> {
        self.response.remove(name)
    }

    // ------------------------------------------------------------------
    // 能力操作，全部委托给响应子对象
    // ------------------------------------------------------------------

    /// 设置状态码，返回自身以便链式调用
    ///
    /// 例：`ctx.status_code(StatusCode::OK).send("Hello World !")`
    pub fn status_code(&mut self, code: StatusCode) -> &mut Self {
        self.response.status_code(code);
        self
    }

    /// 以 `u16` 设置状态码，超出 100..=999 时返回 `InvalidStatus`
    pub fn status_code_u16(&mut self, code: u16) -> Result<&mut Self, ResponseError> {
        self.response.status_code_u16(code)?;
        Ok(self)
    }

    pub fn send_status(&mut self) {
        self.response.send_status();
    }

    pub fn send(&mut self, data: impl Into<Body>) {
        self.response.send(data);
    }

    pub fn json(&mut self, data: impl Into<Body>) -> Result<(), ResponseError> {
        self.response.json(data)
    }

    pub fn jsonp(&mut self, data: impl Into<Body>) -> Result<(), ResponseError> {
        self.response.jsonp(data)
    }

    pub fn render(&mut self, view: &str, locals: Option<&Value>) -> Result<(), ResponseError> {
        self.response.render(view, locals)
    }
}

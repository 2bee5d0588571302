//! 响应子对象
//!
//! 保存 status/body/header 三元组，处理器返回后由 `IntoResponse`
//! 交给传输层。序列化规则与 koa 一致：
//! - 文本以 `<` 开头时为 `text/html`，否则为 `text/plain`
//! - 二进制为 `application/octet-stream`
//! - 结构化数据为 `application/json`
//! - 未设置响应体时发送状态描述（204/304 除外）
//!
//! 操作已显式设置的 `Content-Type` 不会被覆盖。

use std::sync::Arc;

use axum::http::header::{self, AsHeaderName, HeaderName};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde_json::Value;

use super::RequestInfo;
use crate::body::Body;
use crate::capability::{builtin, CapabilityName, CapabilitySet};
use crate::error::ResponseError;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const TEXT_HTML: &str = "text/html; charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json; charset=utf-8";
pub const APPLICATION_JAVASCRIPT: &str = "application/javascript; charset=utf-8";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// 未挂载能力集合时的协作者名称
const RESPONSE_HANDLER: &str = "response handler";

/// 响应子对象
#[derive(Debug, Clone)]
pub struct ResponseContext {
    request: Arc<RequestInfo>,
    status: StatusCode,
    /// 状态码是否被显式设置过
    explicit_status: bool,
    body: Body,
    headers: HeaderMap,
    capabilities: Option<Arc<CapabilitySet>>,
}

impl ResponseContext {
    pub fn new(request: Arc<RequestInfo>) -> Self {
        Self {
            request,
            status: StatusCode::NOT_FOUND,
            explicit_status: false,
            body: Body::Empty,
            headers: HeaderMap::new(),
            capabilities: None,
        }
    }

    pub fn request(&self) -> &RequestInfo {
        &self.request
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
        self.explicit_status = true;
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// 设置响应体
    ///
    /// 空响应体总是切换为 204（状态码本身不允许响应体时除外）并移除
    /// `Content-Type`；非空响应体只在状态码未显式设置时切换为 200。
    pub fn set_body(&mut self, body: impl Into<Body>) {
        let body = body.into();
        if body.is_empty() {
            if !is_empty_status(self.status) {
                self.set_status(StatusCode::NO_CONTENT);
            }
            self.headers.remove(header::CONTENT_TYPE);
        } else if !self.explicit_status {
            self.status = StatusCode::OK;
        }
        self.body = body;
    }

    /// 当前状态码的描述文本，例如 200 对应 `OK`
    pub fn message(&self) -> String {
        match self.status.canonical_reason() {
            Some(reason) => reason.to_string(),
            None => self.status.as_u16().to_string(),
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn append(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.append(name, value);
    }

    pub fn set(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }

    pub fn get<K: AsHeaderName>(&self, name: K) -> Option<&HeaderValue> {
        self.headers.get(name)
    }

    pub fn has<K: AsHeaderName>(&self, name: K) -> bool {
        self.headers.contains_key(name)
    }

    pub fn remove<K: AsHeaderName>(&mut self, name: K) -> Option<HeaderValue> {
        self.headers.remove(name)
    }

    pub fn capabilities(&self) -> Option<&Arc<CapabilitySet>> {
        self.capabilities.as_ref()
    }

    pub(crate) fn install_capabilities(&mut self, capabilities: Arc<CapabilitySet>) {
        self.capabilities = Some(capabilities);
    }

    fn attached(&self, name: CapabilityName) -> Result<Arc<CapabilitySet>, ResponseError> {
        self.capabilities
            .clone()
            .ok_or(ResponseError::MissingCollaborator {
                operation: name.as_str(),
                collaborator: RESPONSE_HANDLER,
            })
    }

    // ------------------------------------------------------------------
    // 能力操作
    // ------------------------------------------------------------------

    pub fn status_code(&mut self, code: StatusCode) -> &mut Self {
        match self.capabilities.clone() {
            Some(set) => set.status_code(self, code),
            None => builtin::status_code(self, code),
        }
        self
    }

    pub fn status_code_u16(&mut self, code: u16) -> Result<&mut Self, ResponseError> {
        let code = StatusCode::from_u16(code).map_err(|_| ResponseError::InvalidStatus(code))?;
        Ok(self.status_code(code))
    }

    pub fn send_status(&mut self) {
        match self.capabilities.clone() {
            Some(set) => set.send_status(self),
            None => builtin::send_status(self),
        }
    }

    pub fn send(&mut self, data: impl Into<Body>) {
        let data = data.into();
        match self.capabilities.clone() {
            Some(set) => set.send(self, data),
            None => builtin::send(self, data),
        }
    }

    pub fn json(&mut self, data: impl Into<Body>) -> Result<(), ResponseError> {
        self.attached(CapabilityName::Json)?.json(self, data.into())
    }

    pub fn jsonp(&mut self, data: impl Into<Body>) -> Result<(), ResponseError> {
        self.attached(CapabilityName::Jsonp)?.jsonp(self, data.into())
    }

    pub fn render(&mut self, view: &str, locals: Option<&Value>) -> Result<(), ResponseError> {
        self.attached(CapabilityName::Render)?
            .render(self, view, locals)
    }
}

/// 不允许携带响应体的状态码
fn is_empty_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT | StatusCode::NOT_MODIFIED
    )
}

fn looks_like_html(text: &str) -> bool {
    text.trim_start().starts_with('<')
}

impl IntoResponse for ResponseContext {
    fn into_response(self) -> Response {
        let message = self.message();
        let Self {
            status,
            body,
            mut headers,
            ..
        } = self;

        let (content_type, payload) = match body {
            Body::Empty if is_empty_status(status) => (None, Bytes::new()),
            Body::Empty => (Some(TEXT_PLAIN), Bytes::from(message)),
            Body::Text(text) => {
                let content_type = if looks_like_html(&text) {
                    TEXT_HTML
                } else {
                    TEXT_PLAIN
                };
                (Some(content_type), Bytes::from(text))
            }
            Body::Bytes(bytes) => (Some(OCTET_STREAM), bytes),
            Body::Json(value) => match serde_json::to_vec(&value) {
                Ok(encoded) => (Some(APPLICATION_JSON), Bytes::from(encoded)),
                Err(err) => return ResponseError::Serialize(err).into_response(),
            },
        };

        if let Some(content_type) = content_type {
            if !headers.contains_key(header::CONTENT_TYPE) {
                headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
            }
        }

        let mut response = Response::new(axum::body::Body::from(payload));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> ResponseContext {
        ResponseContext::new(Arc::new(RequestInfo::get("/")))
    }

    fn content_type(response: &Response) -> Option<&str> {
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    #[test]
    fn test_body_switches_implicit_status() {
        let mut res = response();
        res.set_body("hello");
        assert_eq!(res.status(), StatusCode::OK);

        let mut res = response();
        res.set_body(Body::Empty);
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_empty_body_overrides_explicit_status() {
        let mut res = response();
        res.set(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_HTML));
        res.status_code(StatusCode::OK).send(());
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        assert!(!res.has(header::CONTENT_TYPE));

        let sent = res.into_response();
        assert_eq!(sent.status(), StatusCode::NO_CONTENT);
        assert_eq!(content_type(&sent), None);

        let mut res = response();
        res.status_code(StatusCode::NOT_MODIFIED).send(Body::Empty);
        assert_eq!(res.status(), StatusCode::NOT_MODIFIED);
    }

    #[test]
    fn test_send_status_without_reason_phrase() {
        let mut res = response();
        res.status_code_u16(599).unwrap().send_status();
        assert_eq!(res.body(), &Body::Empty);
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[test]
    fn test_body_keeps_explicit_status() {
        let mut res = response();
        res.set_status(StatusCode::ACCEPTED);
        res.set_body("queued");
        assert_eq!(res.status(), StatusCode::ACCEPTED);
    }

    #[test]
    fn test_detached_builtins_still_work() {
        let mut res = response();
        res.status_code(StatusCode::OK).send_status();
        assert_eq!(res.body(), &Body::from("OK"));
    }

    #[test]
    fn test_detached_json_reports_missing_handler() {
        let mut res = response();
        let err = res.json(json!({"a": 1})).unwrap_err();
        assert!(matches!(
            err,
            ResponseError::MissingCollaborator {
                operation: "json",
                collaborator: RESPONSE_HANDLER,
            }
        ));
    }

    #[test]
    fn test_status_code_u16_range() {
        let mut res = response();
        assert!(res.status_code_u16(299).is_ok());
        assert_eq!(res.status().as_u16(), 299);
        assert!(matches!(
            res.status_code_u16(42),
            Err(ResponseError::InvalidStatus(42))
        ));
    }

    #[test]
    fn test_message_for_unknown_status() {
        let mut res = response();
        res.status_code_u16(599).unwrap();
        assert_eq!(res.message(), "599");
    }

    #[test]
    fn test_into_response_content_types() {
        let mut res = response();
        res.set_body("plain");
        assert_eq!(content_type(&res.into_response()), Some(TEXT_PLAIN));

        let mut res = response();
        res.set_body("  <p>hi</p>");
        assert_eq!(content_type(&res.into_response()), Some(TEXT_HTML));

        let mut res = response();
        res.set_body(vec![0u8, 1]);
        assert_eq!(content_type(&res.into_response()), Some(OCTET_STREAM));

        let mut res = response();
        res.set_body(json!({"a": 1}));
        assert_eq!(content_type(&res.into_response()), Some(APPLICATION_JSON));
    }

    #[test]
    fn test_into_response_keeps_explicit_content_type() {
        let mut res = response();
        res.set(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_JAVASCRIPT),
        );
        res.set_body("cb(1);");
        assert_eq!(
            content_type(&res.into_response()),
            Some(APPLICATION_JAVASCRIPT)
        );
    }

    #[test]
    fn test_into_response_empty_body() {
        let not_found = response().into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(content_type(&not_found), Some(TEXT_PLAIN));

        let mut res = response();
        res.status_code(StatusCode::NO_CONTENT);
        let no_content = res.into_response();
        assert_eq!(content_type(&no_content), None);
    }
}

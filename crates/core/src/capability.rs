//! 能力集合
//!
//! 每个请求构建一次能力集合并挂载到请求上下文。`render` 和 `jsonp`
//! 可以由外部协作者提供：协作者存在时原样复用，否则 `jsonp` 使用内置的
//! 回调包装器，`render` 则绑定为 `Unavailable`，调用时报告缺失的协作者。

use std::fmt;
use std::sync::Arc;

use axum::http::{Extensions, StatusCode};
use serde::Serialize;
use serde_json::Value;

use crate::body::Body;
use crate::config::ResponseOptions;
use crate::context::{RequestContext, ResponseContext};
use crate::error::ResponseError;
use crate::json_guard::JsonGuard;
use crate::jsonp::CallbackWrapper;

/// 视图渲染协作者名称
pub const VIEW_RENDERER: &str = "view renderer";

// ============================================================================
// 能力名称与来源
// ============================================================================

/// 能力名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CapabilityName {
    StatusCode,
    SendStatus,
    Send,
    Json,
    Jsonp,
    Render,
}

impl CapabilityName {
    /// 按挂载顺序排列的全部能力
    pub const ALL: [CapabilityName; 6] = [
        CapabilityName::StatusCode,
        CapabilityName::SendStatus,
        CapabilityName::Send,
        CapabilityName::Json,
        CapabilityName::Jsonp,
        CapabilityName::Render,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityName::StatusCode => "statusCode",
            CapabilityName::SendStatus => "sendStatus",
            CapabilityName::Send => "send",
            CapabilityName::Json => "json",
            CapabilityName::Jsonp => "jsonp",
            CapabilityName::Render => "render",
        }
    }
}

impl fmt::Display for CapabilityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 能力实现的来源
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Provenance {
    /// 内置实现
    Builtin,
    /// 外部协作者提供
    Collaborator(String),
    /// 缺少协作者
    Unavailable(&'static str),
}

/// 单个能力：已绑定实现，或缺少协作者
pub enum Capability<T: ?Sized> {
    Bound(Arc<T>),
    Unavailable {
        operation: CapabilityName,
        collaborator: &'static str,
    },
}

impl<T: ?Sized> Capability<T> {
    pub fn bound(&self) -> Option<&Arc<T>> {
        match self {
            Capability::Bound(inner) => Some(inner),
            Capability::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Capability::Bound(_))
    }

    /// 调用缺失能力时的错误
    fn resolve(&self) -> Result<&Arc<T>, ResponseError> {
        match self {
            Capability::Bound(inner) => Ok(inner),
            Capability::Unavailable {
                operation,
                collaborator,
            } => Err(ResponseError::MissingCollaborator {
                operation: operation.as_str(),
                collaborator: *collaborator,
            }),
        }
    }
}

impl<T: ?Sized> Clone for Capability<T> {
    fn clone(&self) -> Self {
        match self {
            Capability::Bound(inner) => Capability::Bound(Arc::clone(inner)),
            Capability::Unavailable {
                operation,
                collaborator,
            } => Capability::Unavailable {
                operation: *operation,
                collaborator: *collaborator,
            },
        }
    }
}

// ============================================================================
// 协作者
// ============================================================================

/// 视图渲染协作者
///
/// 由外层 layer 通过 `RenderCollaborator` 扩展提供，`render` 原样转发给它。
pub trait ViewRenderer: Send + Sync {
    fn name(&self) -> &str {
        VIEW_RENDERER
    }

    fn render(
        &self,
        res: &mut ResponseContext,
        view: &str,
        locals: Option<&Value>,
    ) -> Result<(), ResponseError>;
}

/// JSONP 提供者
///
/// 宿主已经提供 jsonp 能力时复用它，否则使用内置的 `CallbackWrapper`。
pub trait JsonpProvider: Send + Sync {
    fn name(&self) -> &str;

    fn jsonp(&self, res: &mut ResponseContext, data: Body) -> Result<(), ResponseError>;
}

/// 请求扩展中的渲染协作者
#[derive(Clone)]
pub struct RenderCollaborator(pub Arc<dyn ViewRenderer>);

/// 请求扩展中的 jsonp 协作者
#[derive(Clone)]
pub struct JsonpCollaborator(pub Arc<dyn JsonpProvider>);

/// 挂载时探测到的协作者
#[derive(Clone, Default)]
pub struct Collaborators {
    pub render: Option<Arc<dyn ViewRenderer>>,
    pub jsonp: Option<Arc<dyn JsonpProvider>>,
}

impl Collaborators {
    pub fn none() -> Self {
        Self::default()
    }

    /// 从请求扩展中探测协作者
    pub fn from_extensions(extensions: &Extensions) -> Self {
        Self {
            render: extensions
                .get::<RenderCollaborator>()
                .map(|collaborator| Arc::clone(&collaborator.0)),
            jsonp: extensions
                .get::<JsonpCollaborator>()
                .map(|collaborator| Arc::clone(&collaborator.0)),
        }
    }

    pub fn with_render(mut self, renderer: Arc<dyn ViewRenderer>) -> Self {
        self.render = Some(renderer);
        self
    }

    pub fn with_jsonp(mut self, provider: Arc<dyn JsonpProvider>) -> Self {
        self.jsonp = Some(provider);
        self
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("render", &self.render.as_ref().map(|r| r.name().to_string()))
            .field("jsonp", &self.jsonp.as_ref().map(|p| p.name().to_string()))
            .finish()
    }
}

// ============================================================================
// 内置实现
// ============================================================================

pub(crate) mod builtin {
    use super::*;

    pub fn status_code(res: &mut ResponseContext, code: StatusCode) {
        res.set_status(code);
    }

    /// 没有标准描述的状态码得到空响应体
    pub fn send_status(res: &mut ResponseContext) {
        match res.status().canonical_reason() {
            Some(reason) => res.set_body(reason),
            None => res.set_body(Body::Empty),
        }
    }

    pub fn send(res: &mut ResponseContext, data: Body) {
        res.set_body(data);
    }
}

type StatusCodeFn = fn(&mut ResponseContext, StatusCode);
type SendStatusFn = fn(&mut ResponseContext);
type SendFn = fn(&mut ResponseContext, Body);

// ============================================================================
// 能力集合
// ============================================================================

/// 一个请求的能力集合
///
/// 请求上下文和响应子对象持有同一个 `Arc<CapabilitySet>`。
pub struct CapabilitySet {
    status_code: StatusCodeFn,
    send_status: SendStatusFn,
    send: SendFn,
    json: JsonGuard,
    jsonp: Arc<dyn JsonpProvider>,
    /// 构建时记录的 jsonp 来源
    jsonp_provenance: Provenance,
    render: Capability<dyn ViewRenderer>,
}

impl CapabilitySet {
    pub fn status_code(&self, res: &mut ResponseContext, code: StatusCode) {
        (self.status_code)(res, code);
    }

    pub fn send_status(&self, res: &mut ResponseContext) {
        (self.send_status)(res);
    }

    pub fn send(&self, res: &mut ResponseContext, data: Body) {
        (self.send)(res, data);
    }

    pub fn json(&self, res: &mut ResponseContext, data: Body) -> Result<(), ResponseError> {
        self.json.check(&data)?;
        res.set_body(data);
        Ok(())
    }

    pub fn jsonp(&self, res: &mut ResponseContext, data: Body) -> Result<(), ResponseError> {
        self.jsonp.jsonp(res, data)
    }

    pub fn render(
        &self,
        res: &mut ResponseContext,
        view: &str,
        locals: Option<&Value>,
    ) -> Result<(), ResponseError> {
        self.render.resolve()?.render(res, view, locals)
    }

    pub fn json_guard(&self) -> &JsonGuard {
        &self.json
    }

    pub fn jsonp_provider(&self) -> &Arc<dyn JsonpProvider> {
        &self.jsonp
    }

    pub fn render_capability(&self) -> &Capability<dyn ViewRenderer> {
        &self.render
    }

    /// 按挂载顺序列出每个能力的来源
    pub fn entries(&self) -> Vec<(CapabilityName, Provenance)> {
        CapabilityName::ALL
            .iter()
            .map(|name| (*name, self.provenance(*name)))
            .collect()
    }

    pub fn provenance(&self, name: CapabilityName) -> Provenance {
        match name {
            CapabilityName::StatusCode
            | CapabilityName::SendStatus
            | CapabilityName::Send
            | CapabilityName::Json => Provenance::Builtin,
            CapabilityName::Jsonp => self.jsonp_provenance.clone(),
            CapabilityName::Render => match &self.render {
                Capability::Bound(renderer) => {
                    Provenance::Collaborator(renderer.name().to_string())
                }
                Capability::Unavailable { collaborator, .. } => {
                    Provenance::Unavailable(*collaborator)
                }
            },
        }
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries()).finish()
    }
}

// ============================================================================
// 构建器
// ============================================================================

/// 能力集合构建器
#[derive(Debug, Clone)]
pub struct CapabilityBuilder {
    options: Arc<ResponseOptions>,
}

impl CapabilityBuilder {
    pub fn new(options: Arc<ResponseOptions>) -> Self {
        Self { options }
    }

    /// 构建能力集合，从不失败
    pub fn build(&self, collaborators: &Collaborators) -> Arc<CapabilitySet> {
        let (jsonp, jsonp_provenance) = match &collaborators.jsonp {
            Some(provider) => {
                tracing::debug!(provider = provider.name(), "复用宿主提供的 jsonp 能力");
                (
                    Arc::clone(provider),
                    Provenance::Collaborator(provider.name().to_string()),
                )
            }
            None => {
                let wrapper: Arc<dyn JsonpProvider> =
                    Arc::new(CallbackWrapper::new(self.options.jsonp().clone()));
                (wrapper, Provenance::Builtin)
            }
        };

        let render = match &collaborators.render {
            Some(renderer) => {
                tracing::debug!(renderer = renderer.name(), "复用宿主提供的 render 能力");
                Capability::Bound(Arc::clone(renderer))
            }
            None => Capability::Unavailable {
                operation: CapabilityName::Render,
                collaborator: VIEW_RENDERER,
            },
        };

        Arc::new(CapabilitySet {
            status_code: builtin::status_code,
            send_status: builtin::send_status,
            send: builtin::send,
            json: self.options.json_guard().clone(),
            jsonp,
            jsonp_provenance,
            render,
        })
    }

    /// 把能力集合挂载到请求上下文
    ///
    /// 已挂载时保持原集合不变，重复调用不会产生新的集合。
    pub fn attach(
        &self,
        ctx: &mut RequestContext,
        collaborators: &Collaborators,
    ) -> Arc<CapabilitySet> {
        if let Some(existing) = ctx.capabilities() {
            return Arc::clone(existing);
        }

        let set = self.build(collaborators);
        ctx.response_mut().install_capabilities(Arc::clone(&set));
        set
    }
}

//! 响应处理中间件
//!
//! 每个请求构建一次能力集合，挂载到新建的 `RequestContext` 上并放入请求扩展。
//! 处理器通过 `RequestContext` 提取器取出上下文，修改后作为响应返回：
//!
//! ```ignore
//! async fn hello(mut ctx: RequestContext) -> RequestContext {
//!     ctx.status_code(StatusCode::OK).send("Hello World !");
//!     ctx
//! }
//! ```
//!
//! 渲染和 jsonp 协作者由外层 layer 以 `RenderCollaborator` /
//! `JsonpCollaborator` 扩展提供，必须在本中间件之前插入。

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::Router;
use replycast_core::{
    CapabilityBuilder, Collaborators, RequestContext, RequestInfo, ResponseOptions,
};

/// 为路由安装响应处理中间件
pub fn with_response_handler(router: Router, options: Arc<ResponseOptions>) -> Router {
    router.layer(middleware::from_fn_with_state(options, response_handler))
}

/// 响应处理中间件
pub async fn response_handler(
    State(options): State<Arc<ResponseOptions>>,
    mut request: Request,
    next: Next,
) -> Response {
    let collaborators = Collaborators::from_extensions(request.extensions());
    let builder = CapabilityBuilder::new(options);

    // 重复安装时沿用已挂载的上下文
    if let Some(ctx) = request.extensions_mut().get_mut::<RequestContext>() {
        builder.attach(ctx, &collaborators);
        return next.run(request).await;
    }

    let info = RequestInfo::new(
        request.method().clone(),
        request.uri().clone(),
        request.headers().clone(),
    );
    let mut ctx = RequestContext::new(info);
    let capabilities = builder.attach(&mut ctx, &collaborators);
    tracing::debug!(
        method = %request.method(),
        path = request.uri().path(),
        capabilities = ?capabilities,
        "已挂载响应能力"
    );

    request.extensions_mut().insert(ctx);
    next.run(request).await
}

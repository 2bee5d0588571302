//! 示例处理器

use axum::http::StatusCode;
use replycast_core::{RequestContext, ResponseError};
use serde_json::{json, Map, Value};

pub async fn send_status(mut ctx: RequestContext) -> RequestContext {
    ctx.status_code(StatusCode::OK).send_status();
    ctx
}

pub async fn send(mut ctx: RequestContext) -> RequestContext {
    ctx.status_code(StatusCode::OK).send("hello world");
    ctx
}

pub async fn json(mut ctx: RequestContext) -> Result<RequestContext, ResponseError> {
    ctx.status_code(StatusCode::OK)
        .json(json!({ "msg": "hello world" }))?;
    Ok(ctx)
}

pub async fn jsonp(mut ctx: RequestContext) -> Result<RequestContext, ResponseError> {
    ctx.status_code(StatusCode::OK).jsonp(json!({ "foo": "bar" }))?;
    Ok(ctx)
}

pub async fn render(mut ctx: RequestContext) -> Result<RequestContext, ResponseError> {
    ctx.status_code(StatusCode::OK)
        .render("index", Some(&json!({ "title": "replycast" })))?;
    Ok(ctx)
}

/// 列出能力名称及其来源
pub async fn capabilities(mut ctx: RequestContext) -> Result<RequestContext, ResponseError> {
    let mut entries = Map::new();
    if let Some(set) = ctx.capabilities() {
        for (name, provenance) in set.entries() {
            entries.insert(name.to_string(), serde_json::to_value(provenance)?);
        }
    }
    ctx.status_code(StatusCode::OK).send(Value::Object(entries));
    Ok(ctx)
}

#[cfg(test)]
mod tests {
    use crate::{router, SecurityMiddlewareConfig};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use replycast_core::ResponseOptions;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        router(
            Arc::new(ResponseOptions::default()),
            &SecurityMiddlewareConfig::default(),
        )
    }

    async fn get(uri: &str) -> (StatusCode, String, String) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_demo_routes() {
        let (status, content_type, body) = get("/status").await;
        assert_eq!((status, body.as_str()), (StatusCode::OK, "OK"));
        assert!(content_type.starts_with("text/plain"));

        let (status, _, body) = get("/send").await;
        assert_eq!((status, body.as_str()), (StatusCode::OK, "hello world"));

        let (status, content_type, body) = get("/json").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("application/json"));
        assert_eq!(body, r#"{"msg":"hello world"}"#);
    }

    #[tokio::test]
    async fn test_demo_jsonp() {
        let (_, content_type, body) = get("/jsonp?callback=cb").await;
        assert!(content_type.starts_with("application/javascript"));
        assert_eq!(
            body,
            "/**/ typeof cb === 'function' && cb({\"foo\":\"bar\"});"
        );
    }

    #[tokio::test]
    async fn test_demo_render_without_renderer() {
        let (status, _, _) = get("/render").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_demo_capabilities() {
        let (status, _, body) = get("/capabilities").await;
        assert_eq!(status, StatusCode::OK);

        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["statusCode"], json!({"kind": "builtin"}));
        assert_eq!(value["jsonp"], json!({"kind": "builtin"}));
        assert_eq!(
            value["render"],
            json!({"kind": "unavailable", "name": "view renderer"})
        );
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, _, _) = get("/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

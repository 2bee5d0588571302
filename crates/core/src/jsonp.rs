//! 回调包装（JSONP）
//!
//! query 中带有回调名时，把负载包装为调用该回调的脚本语句：
//!
//! ```text
//! /**/ typeof fn === 'function' && fn({"foo":"bar"});
//! ```
//!
//! 没有回调名时与 `send` 完全相同，不设置任何额外 header。

use axum::http::header::{self, HeaderName};
use axum::http::HeaderValue;

use crate::body::Body;
use crate::capability::JsonpProvider;
use crate::config::JsonpOptions;
use crate::context::response::APPLICATION_JAVASCRIPT;
use crate::context::{Query, ResponseContext};
use crate::error::ResponseError;

const NOSNIFF: &str = "nosniff";

/// 内置回调包装器
#[derive(Debug, Clone, Default)]
pub struct CallbackWrapper {
    options: JsonpOptions,
}

impl CallbackWrapper {
    pub fn new(options: JsonpOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &JsonpOptions {
        &self.options
    }

    /// 从 query 中取出回调名
    ///
    /// 参数缺失、为空或仅含空白时返回 `None`。设置了 `limit` 时只保留前
    /// `limit` 个字符。
    pub fn callback_name(&self, query: &Query) -> Option<String> {
        let raw = query.first(&self.options.callback)?;
        if raw.trim().is_empty() {
            return None;
        }

        let mut token: String = match self.options.limit {
            Some(limit) => raw.chars().take(limit).collect(),
            None => raw.to_string(),
        };
        if self.options.strict {
            token.retain(is_callback_char);
        }

        if token.trim().is_empty() {
            None
        } else {
            Some(token)
        }
    }
}

impl JsonpProvider for CallbackWrapper {
    fn name(&self) -> &str {
        "callback wrapper"
    }

    fn jsonp(&self, res: &mut ResponseContext, data: Body) -> Result<(), ResponseError> {
        let Some(callback) = self.callback_name(res.request().query()) else {
            res.set_body(data);
            return Ok(());
        };

        let script = wrap(&callback, &data)?;
        res.set(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_JAVASCRIPT),
        );
        res.set(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static(NOSNIFF),
        );
        res.set_body(script);
        Ok(())
    }
}

/// 生成包装后的脚本
pub fn wrap(callback: &str, data: &Body) -> Result<String, ResponseError> {
    let payload = data
        .to_json_string()?
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029");
    Ok(format!(
        "/**/ typeof {callback} === 'function' && {callback}({payload});"
    ))
}

fn is_callback_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.' | '[' | ']')
}

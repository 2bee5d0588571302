//! JSON 响应校验
//!
//! `json` 能力在写入响应体之前，先用可替换的谓词检查负载是否为结构化响应。

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::body::Body;
use crate::error::ResponseError;

/// 校验谓词
pub type JsonPredicate = Arc<dyn Fn(&Body) -> bool + Send + Sync>;

/// 默认谓词
///
/// 只有面向结构化响应的值才返回 true：对象、数组、非零数字和 `true`。
/// 字符串、`null`、`false`、`0`、文本、二进制和空响应体都返回 false。
pub fn is_json(body: &Body) -> bool {
    match body {
        Body::Json(value) => match value {
            Value::Null | Value::String(_) => false,
            Value::Bool(flag) => *flag,
            Value::Number(number) => number.as_f64().map_or(true, |n| n != 0.0),
            Value::Array(_) | Value::Object(_) => true,
        },
        Body::Empty | Body::Text(_) | Body::Bytes(_) => false,
    }
}

/// 只接受对象和数组
pub fn is_json_object(body: &Body) -> bool {
    matches!(body, Body::Json(Value::Object(_) | Value::Array(_)))
}

/// 接受任意结构化数据
pub fn is_json_any(body: &Body) -> bool {
    matches!(body, Body::Json(_))
}

/// 已解析的校验器
///
/// 配置中的覆盖值没有解析为谓词时保留为 `NotCallable`，
/// 每次调用 `json` 都会以配置错误失败，不会静默回退到默认谓词。
#[derive(Clone)]
pub enum JsonValidator {
    Callable(JsonPredicate),
    NotCallable(String),
}

impl JsonValidator {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Body) -> bool + Send + Sync + 'static,
    {
        JsonValidator::Callable(Arc::new(predicate))
    }

    /// 按名称解析内置谓词：`default`、`object`、`any`
    pub fn named(name: &str) -> Self {
        match name {
            "default" => Self::new(is_json),
            "object" => Self::new(is_json_object),
            "any" => Self::new(is_json_any),
            other => JsonValidator::NotCallable(format!("`{other}` is not a known predicate")),
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, JsonValidator::Callable(_))
    }
}

impl Default for JsonValidator {
    fn default() -> Self {
        Self::new(is_json)
    }
}

impl fmt::Debug for JsonValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValidator::Callable(_) => f.write_str("JsonValidator::Callable(..)"),
            JsonValidator::NotCallable(reason) => {
                f.debug_tuple("JsonValidator::NotCallable").field(reason).finish()
            }
        }
    }
}

/// JSON 守卫
#[derive(Debug, Clone, Default)]
pub struct JsonGuard {
    validator: JsonValidator,
}

impl JsonGuard {
    pub fn new(validator: JsonValidator) -> Self {
        Self { validator }
    }

    pub fn validator(&self) -> &JsonValidator {
        &self.validator
    }

    /// 检查负载，通过后由调用方原样写入响应体
    pub fn check(&self, data: &Body) -> Result<(), ResponseError> {
        let predicate = match &self.validator {
            JsonValidator::Callable(predicate) => predicate,
            JsonValidator::NotCallable(reason) => {
                return Err(ResponseError::Configuration(reason.clone()));
            }
        };

        if !predicate(data) {
            return Err(ResponseError::InvalidJson);
        }
        Ok(())
    }
}

//! 响应处理配置
//!
//! `ResponseHandlerConfig` 是可序列化的静态配置，`ResponseOptions` 是由它
//! 解析出的运行时选项，在所有请求之间以 `Arc` 只读共享。

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::json_guard::{JsonGuard, JsonValidator};

/// JSONP 选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonpOptions {
    /// 携带回调名的 query 参数，默认 `callback`
    #[serde(default = "default_callback")]
    pub callback: String,
    /// 回调名最大长度
    #[serde(default)]
    pub limit: Option<usize>,
    /// 只保留 `[A-Za-z0-9_$.\[\]]` 字符
    #[serde(default)]
    pub strict: bool,
}

fn default_callback() -> String {
    "callback".to_string()
}

impl Default for JsonpOptions {
    fn default() -> Self {
        Self {
            callback: default_callback(),
            limit: None,
            strict: false,
        }
    }
}

/// 响应处理配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseHandlerConfig {
    /// JSON 校验谓词名称：`default`、`object`、`any`
    #[serde(default = "default_is_json")]
    pub is_json: String,
    #[serde(default)]
    pub jsonp: JsonpOptions,
}

fn default_is_json() -> String {
    "default".to_string()
}

impl Default for ResponseHandlerConfig {
    fn default() -> Self {
        Self {
            is_json: default_is_json(),
            jsonp: JsonpOptions::default(),
        }
    }
}

/// 配置错误
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("jsonp.callback 不能为空")]
    EmptyCallbackParam,
    #[error("jsonp.limit 必须大于 0")]
    ZeroCallbackLimit,
}

impl ResponseHandlerConfig {
    /// 校验配置
    ///
    /// 不校验 `is_json`：无法解析的谓词在首次调用 `json` 时才报错。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jsonp.callback.trim().is_empty() {
            return Err(ConfigError::EmptyCallbackParam);
        }
        if self.jsonp.limit == Some(0) {
            return Err(ConfigError::ZeroCallbackLimit);
        }
        Ok(())
    }
}

/// 运行时选项（进程内只读共享）
#[derive(Debug, Clone, Default)]
pub struct ResponseOptions {
    json_guard: JsonGuard,
    jsonp: JsonpOptions,
}

impl ResponseOptions {
    pub fn builder() -> ResponseOptionsBuilder {
        ResponseOptionsBuilder::default()
    }

    pub fn from_config(config: &ResponseHandlerConfig) -> Self {
        Self {
            json_guard: JsonGuard::new(JsonValidator::named(&config.is_json)),
            jsonp: config.jsonp.clone(),
        }
    }

    pub fn json_guard(&self) -> &JsonGuard {
        &self.json_guard
    }

    pub fn jsonp(&self) -> &JsonpOptions {
        &self.jsonp
    }
}

/// `ResponseOptions` 构建器
#[derive(Debug, Default)]
pub struct ResponseOptionsBuilder {
    validator: Option<JsonValidator>,
    jsonp: JsonpOptions,
}

impl ResponseOptionsBuilder {
    /// 用闭包整体替换默认谓词
    pub fn is_json<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Body) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(JsonValidator::new(predicate));
        self
    }

    pub fn validator(mut self, validator: JsonValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn jsonp(mut self, jsonp: JsonpOptions) -> Self {
        self.jsonp = jsonp;
        self
    }

    pub fn callback_param(mut self, name: impl Into<String>) -> Self {
        self.jsonp.callback = name.into();
        self
    }

    pub fn callback_limit(mut self, limit: usize) -> Self {
        self.jsonp.limit = Some(limit);
        self
    }

    pub fn build(self) -> ResponseOptions {
        ResponseOptions {
            json_guard: JsonGuard::new(self.validator.unwrap_or_default()),
            jsonp: self.jsonp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config() {
        let config = ResponseHandlerConfig::default();
        assert_eq!(config.is_json, "default");
        assert_eq!(config.jsonp.callback, "callback");
        assert_eq!(config.jsonp.limit, None);
        assert!(!config.jsonp.strict);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ResponseHandlerConfig =
            serde_json::from_value(json!({"jsonp": {"limit": 10}})).unwrap();
        assert_eq!(config.is_json, "default");
        assert_eq!(config.jsonp.callback, "callback");
        assert_eq!(config.jsonp.limit, Some(10));
    }

    #[test]
    fn test_validate_rejects_bad_jsonp() {
        let mut config = ResponseHandlerConfig::default();
        config.jsonp.limit = Some(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroCallbackLimit));

        let mut config = ResponseHandlerConfig::default();
        config.jsonp.callback = " ".to_string();
        assert_eq!(config.validate(), Err(ConfigError::EmptyCallbackParam));
    }

    #[test]
    fn test_unknown_predicate_is_not_callable() {
        let config = ResponseHandlerConfig {
            is_json: "this is string not function".to_string(),
            ..ResponseHandlerConfig::default()
        };
        assert!(config.validate().is_ok());
        let options = ResponseOptions::from_config(&config);
        assert!(!options.json_guard().validator().is_callable());
    }

    #[test]
    fn test_builder() {
        let options = ResponseOptions::builder()
            .is_json(|body| matches!(body, Body::Text(_)))
            .callback_param("cb")
            .callback_limit(10)
            .build();
        assert!(options.json_guard().check(&Body::from("ok")).is_ok());
        assert_eq!(options.jsonp().callback, "cb");
        assert_eq!(options.jsonp().limit, Some(10));
    }
}

//! 响应体类型
//!
//! 与 koa 一样，响应体可以是任意形状，最终由传输层按类型决定序列化方式。

use bytes::Bytes;
use serde_json::Value;

/// 响应体
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Body {
    /// 未设置
    #[default]
    Empty,
    /// 文本
    Text(String),
    /// 二进制
    Bytes(Bytes),
    /// 结构化数据
    Json(Value),
}

impl Body {
    pub fn is_empty(&self) -> bool {
        matches!(self, Body::Empty)
    }

    /// 序列化为 JSON 文本
    ///
    /// 文本序列化为 JSON 字符串，二进制序列化为数字数组，空响应体为 `null`。
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        match self {
            Body::Empty => Ok("null".to_string()),
            Body::Text(text) => serde_json::to_string(text),
            Body::Bytes(bytes) => serde_json::to_string(bytes.as_ref()),
            Body::Json(value) => serde_json::to_string(value),
        }
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Body::Text(value.to_string())
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Body::Text(value)
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(value))
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        Body::Bytes(value)
    }
}

impl From<Value> for Body {
    fn from(value: Value) -> Self {
        Body::Json(value)
    }
}

impl From<()> for Body {
    fn from(_: ()) -> Self {
        Body::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_json_string() {
        assert_eq!(Body::Empty.to_json_string().unwrap(), "null");
        assert_eq!(
            Body::from("hello").to_json_string().unwrap(),
            "\"hello\""
        );
        assert_eq!(
            Body::from(vec![1u8, 2, 3]).to_json_string().unwrap(),
            "[1,2,3]"
        );
        assert_eq!(
            Body::from(json!({"foo": "bar"})).to_json_string().unwrap(),
            r#"{"foo":"bar"}"#
        );
        assert_eq!(Body::from(json!(42)).to_json_string().unwrap(), "42");
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Body::from(String::from("a")), Body::Text("a".to_string()));
        assert_eq!(Body::from(()), Body::Empty);
        assert!(Body::default().is_empty());
        assert!(!Body::from("").is_empty());
    }
}

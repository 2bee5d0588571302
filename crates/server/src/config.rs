//! 服务配置
//!
//! 从 YAML 文件加载，缺省字段使用默认值：
//!
//! ```yaml
//! host: 127.0.0.1
//! port: 3000
//! security:
//!   max_body_size: 1048576
//!   request_timeout_secs: 30
//! response:
//!   is_json: default
//!   jsonp:
//!     callback: callback
//!     limit: 64
//! ```

use std::path::{Path, PathBuf};

use replycast_core::{ConfigError, ResponseHandlerConfig};
use serde::{Deserialize, Serialize};

use crate::middleware::SecurityMiddlewareConfig;

/// 服务配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub security: SecurityMiddlewareConfig,
    #[serde(default)]
    pub response: ResponseHandlerConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            security: SecurityMiddlewareConfig::default(),
            response: ResponseHandlerConfig::default(),
        }
    }
}

/// 服务配置错误
#[derive(Debug, thiserror::Error)]
pub enum ServerConfigError {
    #[error("无法读取配置文件 {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件格式错误: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("security.max_body_size 必须大于 0")]
    ZeroBodyLimit,

    #[error(transparent)]
    Response(#[from] ConfigError),
}

impl ServerConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, ServerConfigError> {
        let config: ServerConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载并校验配置
    pub fn load(path: &Path) -> Result<Self, ServerConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ServerConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ServerConfigError> {
        if self.security.max_body_size == 0 {
            return Err(ServerConfigError::ZeroBodyLimit);
        }
        self.response.validate()?;
        Ok(())
    }

    /// `host:port`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = ServerConfig::from_yaml_str(
            r#"
port: 8080
response:
  jsonp:
    limit: 10
"#,
        )
        .unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.response.is_json, "default");
        assert_eq!(config.response.jsonp.callback, "callback");
        assert_eq!(config.response.jsonp.limit, Some(10));
        assert_eq!(config.security, SecurityMiddlewareConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ServerConfig::from_yaml_str("response:\n  jsonp:\n    limit: 0\n").unwrap_err();
        assert!(matches!(
            err,
            ServerConfigError::Response(ConfigError::ZeroCallbackLimit)
        ));

        let err = ServerConfig::from_yaml_str("security:\n  max_body_size: 0\n").unwrap_err();
        assert!(matches!(err, ServerConfigError::ZeroBodyLimit));

        let err = ServerConfig::from_yaml_str("port: [1, 2]").unwrap_err();
        assert!(matches!(err, ServerConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host: 0.0.0.0\nresponse:\n  is_json: object").unwrap();

        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.response.is_json, "object");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServerConfig::load(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, ServerConfigError::Io { .. }));
    }
}

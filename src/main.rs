//! replycast 示例服务
//!
//! 配置文件路径由 `REPLYCAST_CONFIG` 指定，未设置时使用默认配置。
//! 日志级别由 `RUST_LOG` 控制，默认 `info`。

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use replycast_core::ResponseOptions;
use replycast_server::ServerConfig;
use tracing_subscriber::EnvFilter;

const CONFIG_ENV: &str = "REPLYCAST_CONFIG";

fn load_config() -> anyhow::Result<ServerConfig> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => {
            let path = PathBuf::from(path);
            let config = ServerConfig::load(&path)
                .with_context(|| format!("加载配置失败: {}", path.display()))?;
            tracing::info!(path = %path.display(), "已加载配置文件");
            Ok(config)
        }
        None => {
            tracing::info!("未设置 {CONFIG_ENV}，使用默认配置");
            Ok(ServerConfig::default())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config()?;
    let options = Arc::new(ResponseOptions::from_config(&config.response));
    if !options.json_guard().validator().is_callable() {
        tracing::warn!(
            is_json = %config.response.is_json,
            "is_json 未解析为可用谓词，所有 json 响应都会返回 500"
        );
    }

    let app = replycast_server::router(options, &config.security);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("无法监听 {address}"))?;
    tracing::info!(address = %address, "replycast 已启动");

    axum::serve(listener, app).await.context("服务异常退出")?;
    Ok(())
}

//! 聊天记录客户端核心模块
//!
//! 持有共享的 HTTP 客户端，按需构造各实体的子 API

use crate::api::chatlog::api::ChatlogApi;
use crate::api::contact::service::ContactService;
use crate::api::session::service::SessionService;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::info;

/// 客户端配置
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// 后端服务地址，例如 `http://127.0.0.1:5030`
    pub base_url: String,
    /// HTTP 请求超时（秒）
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// 创建配置
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: 30,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:5030")
    }
}

/// 聊天记录查看客户端
///
/// 所有子 API 共享同一个 `reqwest::Client`
#[derive(Clone)]
pub struct ChatlogClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl ChatlogClient {
    /// 创建新的客户端
    pub fn new(config: ClientConfig) -> Result<Self> {
        info!("[Client] 创建聊天记录客户端，服务地址: {}", config.base_url);
        let http = reqwest::ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("创建 HTTP 客户端失败")?;
        Ok(Self { config, http })
    }

    /// API 基础路径（`{base_url}/api/v1`）
    fn api_base_url(&self) -> String {
        format!("{}/api/v1", self.config.base_url.trim_end_matches('/'))
    }

    /// 聊天记录 API
    pub fn chatlog(&self) -> ChatlogApi {
        ChatlogApi::new(self.http.clone(), self.api_base_url())
    }

    /// 联系人 API（含客户端本地派生操作）
    pub fn contact(&self) -> ContactService {
        ContactService::new(self.http.clone(), self.api_base_url())
    }

    /// 会话 API（含客户端本地派生操作）
    pub fn session(&self) -> SessionService {
        SessionService::new(self.http.clone(), self.api_base_url())
    }
}

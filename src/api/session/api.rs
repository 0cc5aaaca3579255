//! 会话 HTTP API 客户端
//!
//! 对应后端 `/api/v1/session` 相关接口

use crate::api::session::models::{session_type, Session};
use crate::api::session::types::SessionParams;
use crate::api::types::get_json;
use anyhow::Result;
use tracing::info;

/// 会话 API 客户端
pub struct SessionApi {
    client: reqwest::Client,
    api_base_url: String,
}

impl SessionApi {
    /// 创建新的会话 API 客户端
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            client,
            api_base_url,
        }
    }

    /// 获取会话列表
    ///
    /// `GET /api/v1/session`
    pub async fn get_sessions(&self, params: &SessionParams) -> Result<Vec<Session>> {
        let url = format!("{}/session", self.api_base_url);
        let sessions: Vec<Session> = get_json(&self.client, &url, params, "获取会话列表").await?;
        info!("[SessionAPI] 获取会话列表，数量: {}", sessions.len());
        Ok(sessions)
    }

    /// 获取会话详情
    ///
    /// `GET /api/v1/session/{talker}`
    pub async fn get_session_detail(&self, talker: &str) -> Result<Session> {
        let url = format!(
            "{}/session/{}",
            self.api_base_url,
            urlencoding::encode(talker)
        );
        let no_query: &[(&str, &str)] = &[];
        get_json(&self.client, &url, no_query, "获取会话详情").await
    }

    /// 获取所有会话（分页）
    pub async fn get_all_sessions(&self, limit: i64, offset: i64) -> Result<Vec<Session>> {
        self.get_sessions(&SessionParams {
            limit: Some(limit),
            offset: Some(offset),
            ..Default::default()
        })
        .await
    }

    /// 按类型获取会话
    pub async fn get_sessions_by_type(&self, session_type: &str, limit: i64) -> Result<Vec<Session>> {
        self.get_sessions(&SessionParams {
            session_type: Some(session_type.to_string()),
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }

    /// 获取私聊会话列表
    pub async fn get_private_sessions(&self, limit: i64) -> Result<Vec<Session>> {
        self.get_sessions_by_type(session_type::PRIVATE, limit).await
    }

    /// 获取群聊会话列表
    pub async fn get_group_sessions(&self, limit: i64) -> Result<Vec<Session>> {
        self.get_sessions_by_type(session_type::GROUP, limit).await
    }
}

//! 聊天记录 HTTP API 客户端
//!
//! 对应后端 `/api/v1/chatlog` 相关接口，全部为 GET 请求上的参数组合

use crate::api::chatlog::models::Message;
use crate::api::chatlog::types::{ChatlogParams, SearchParams};
use crate::api::types::{get_bytes, get_json, PaginatedResponse};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

/// 聊天记录 API 客户端
pub struct ChatlogApi {
    client: reqwest::Client,
    api_base_url: String,
}

impl ChatlogApi {
    /// 创建新的聊天记录 API 客户端
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            client,
            api_base_url,
        }
    }

    /// 获取聊天记录
    ///
    /// `GET /api/v1/chatlog`
    pub async fn get_chatlog(&self, params: &ChatlogParams) -> Result<Vec<Message>> {
        let url = format!("{}/chatlog", self.api_base_url);
        let messages: Vec<Message> = get_json(&self.client, &url, params, "获取聊天记录").await?;
        info!("[ChatlogAPI] 获取聊天记录，消息数: {}", messages.len());
        Ok(messages)
    }

    /// 搜索消息
    ///
    /// `GET /api/v1/chatlog/search`
    pub async fn search_messages(
        &self,
        params: &SearchParams,
    ) -> Result<PaginatedResponse<Message>> {
        let url = format!("{}/chatlog/search", self.api_base_url);
        let resp: PaginatedResponse<Message> =
            get_json(&self.client, &url, params, "搜索消息").await?;
        info!(
            "[ChatlogAPI] 搜索消息，本页: {}, 总数: {}",
            resp.items.len(),
            resp.total
        );
        Ok(resp)
    }

    /// 导出聊天记录（JSON 格式，直接返回消息列表）
    pub async fn export_json(&self, params: &ChatlogParams) -> Result<Vec<Message>> {
        let params = ChatlogParams {
            format: Some("json".to_string()),
            ..params.clone()
        };
        self.get_chatlog(&params).await
    }

    /// 导出聊天记录（CSV 格式，写入指定文件）
    pub async fn export_csv(&self, params: &ChatlogParams, path: impl AsRef<Path>) -> Result<()> {
        let params = ChatlogParams {
            format: Some("csv".to_string()),
            ..params.clone()
        };
        self.download(&params, path.as_ref(), "导出CSV").await
    }

    /// 导出聊天记录（纯文本格式，写入指定文件）
    pub async fn export_text(&self, params: &ChatlogParams, path: impl AsRef<Path>) -> Result<()> {
        let params = ChatlogParams {
            format: Some("text".to_string()),
            ..params.clone()
        };
        self.download(&params, path.as_ref(), "导出文本").await
    }

    /// 下载导出文件：后端返回的字节流原样写入本地文件
    async fn download(
        &self,
        params: &ChatlogParams,
        path: &Path,
        operation_name: &str,
    ) -> Result<()> {
        let url = format!("{}/chatlog", self.api_base_url);
        let body = get_bytes(&self.client, &url, params, operation_name).await?;
        tokio::fs::write(path, &body)
            .await
            .context(format!("写入导出文件失败: {}", path.display()))?;
        info!(
            "[ChatlogAPI] {}完成，文件: {}, 大小: {} 字节",
            operation_name,
            path.display(),
            body.len()
        );
        Ok(())
    }

    /// 获取指定会话的消息
    pub async fn get_session_messages(
        &self,
        talker: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>> {
        self.get_chatlog(&ChatlogParams {
            talker: Some(talker.to_string()),
            limit: Some(limit),
            offset: Some(offset),
            ..Default::default()
        })
        .await
    }

    /// 获取指定时间段的消息
    ///
    /// `time` 为时间戳或 `start~end` 格式的时间范围
    pub async fn get_messages_by_time(
        &self,
        time: &str,
        talker: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Message>> {
        self.get_chatlog(&ChatlogParams {
            time: Some(time.to_string()),
            talker: talker.map(|s| s.to_string()),
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }

    /// 获取指定发送者的消息
    pub async fn get_messages_by_sender(
        &self,
        sender: &str,
        talker: Option<&str>,
        limit: i64,
    ) -> Result<Vec<Message>> {
        self.get_chatlog(&ChatlogParams {
            sender: Some(sender.to_string()),
            talker: talker.map(|s| s.to_string()),
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }

    /// 搜索指定会话内的消息
    pub async fn search_in_session(
        &self,
        keyword: &str,
        talker: &str,
        limit: i64,
    ) -> Result<PaginatedResponse<Message>> {
        self.search_messages(&SearchParams {
            keyword: keyword.to_string(),
            talker: Some(talker.to_string()),
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }

    /// 全局搜索消息
    pub async fn global_search(
        &self,
        keyword: &str,
        msg_type: Option<i32>,
        limit: i64,
    ) -> Result<PaginatedResponse<Message>> {
        self.search_messages(&SearchParams {
            keyword: keyword.to_string(),
            msg_type,
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }

    /// 按消息类型搜索（关键词为空）
    pub async fn search_by_type(
        &self,
        msg_type: i32,
        talker: Option<&str>,
        limit: i64,
    ) -> Result<PaginatedResponse<Message>> {
        self.search_messages(&SearchParams {
            keyword: String::new(),
            msg_type: Some(msg_type),
            talker: talker.map(|s| s.to_string()),
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }
}

//! 联系人 HTTP API 客户端
//!
//! 对应后端 `/api/v1/contact` 相关接口

use crate::api::contact::models::{contact_type, Contact};
use crate::api::contact::types::ContactParams;
use crate::api::types::get_json;
use anyhow::Result;
use tracing::info;

/// 联系人 API 客户端
pub struct ContactApi {
    client: reqwest::Client,
    api_base_url: String,
}

impl ContactApi {
    /// 创建新的联系人 API 客户端
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            client,
            api_base_url,
        }
    }

    /// 获取联系人列表
    ///
    /// `GET /api/v1/contact`
    pub async fn get_contacts(&self, params: &ContactParams) -> Result<Vec<Contact>> {
        let url = format!("{}/contact", self.api_base_url);
        let contacts: Vec<Contact> = get_json(&self.client, &url, params, "获取联系人列表").await?;
        info!("[ContactAPI] 获取联系人列表，数量: {}", contacts.len());
        Ok(contacts)
    }

    /// 获取联系人详情
    ///
    /// `GET /api/v1/contact/{wxid}`
    pub async fn get_contact_detail(&self, wxid: &str) -> Result<Contact> {
        let url = format!("{}/contact/{}", self.api_base_url, urlencoding::encode(wxid));
        let no_query: &[(&str, &str)] = &[];
        get_json(&self.client, &url, no_query, "获取联系人详情").await
    }

    /// 获取好友列表
    pub async fn get_friends(&self, limit: i64) -> Result<Vec<Contact>> {
        self.get_contacts(&ContactParams {
            contact_type: Some(contact_type::FRIEND.to_string()),
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }

    /// 获取群聊列表
    pub async fn get_chatrooms(&self, limit: i64) -> Result<Vec<Contact>> {
        self.get_contacts(&ContactParams {
            contact_type: Some(contact_type::CHATROOM.to_string()),
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }

    /// 获取公众号列表
    pub async fn get_official_accounts(&self, limit: i64) -> Result<Vec<Contact>> {
        self.get_contacts(&ContactParams {
            contact_type: Some(contact_type::OFFICIAL.to_string()),
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }

    /// 搜索联系人
    pub async fn search_contacts(
        &self,
        keyword: &str,
        contact_type: Option<&str>,
    ) -> Result<Vec<Contact>> {
        self.get_contacts(&ContactParams {
            keyword: Some(keyword.to_string()),
            contact_type: contact_type.map(|s| s.to_string()),
            ..Default::default()
        })
        .await
    }

    /// 获取所有联系人（不分类型）
    pub async fn get_all_contacts(&self, limit: i64) -> Result<Vec<Contact>> {
        self.get_contacts(&ContactParams {
            limit: Some(limit),
            ..Default::default()
        })
        .await
    }
}

//! 联系人服务层
//!
//! 在 HTTP API 之上实现客户端本地的派生操作：分组、排序、并发聚合。
//! 所有派生操作都在完整拉取的结果集上计算，不修改后端数据。

use crate::api::contact::api::ContactApi;
use crate::api::contact::models::{Contact, ContactStats};
use crate::api::contact::types::ContactParams;
use anyhow::Result;
use futures_util::future::join_all;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// 名称分组键：ASCII 字母归入对应大写字母，其余（含中文）归入 `#`
pub fn first_letter(name: &str) -> String {
    match name.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase().to_string(),
        _ => "#".to_string(),
    }
}

/// 按显示名称首字母分组，组内按显示名称排序
///
/// 排序为按字符顺序比较（非 zh-CN 本地化排序，见 DESIGN.md）
pub fn group_by_letter(contacts: Vec<Contact>) -> BTreeMap<String, Vec<Contact>> {
    let mut grouped: BTreeMap<String, Vec<Contact>> = BTreeMap::new();
    for contact in contacts {
        let letter = first_letter(&contact.display_name());
        grouped.entry(letter).or_default().push(contact);
    }
    for bucket in grouped.values_mut() {
        bucket.sort_by_key(|c| c.display_name());
    }
    grouped
}

/// 按最后交互时间降序排序，缺失的时间视为 0
pub fn sort_by_recent(mut contacts: Vec<Contact>) -> Vec<Contact> {
    contacts.sort_by(|a, b| b.last_contact_time.cmp(&a.last_contact_time));
    contacts
}

/// 联系人服务
///
/// 持有联系人 API 客户端，提供 HTTP 透传和本地派生两类操作
pub struct ContactService {
    api: ContactApi,
}

impl ContactService {
    /// 创建新的联系人服务
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            api: ContactApi::new(client, api_base_url),
        }
    }

    /// 获取联系人列表
    pub async fn get_contacts(&self, params: &ContactParams) -> Result<Vec<Contact>> {
        self.api.get_contacts(params).await
    }

    /// 获取联系人详情
    pub async fn get_contact_detail(&self, wxid: &str) -> Result<Contact> {
        self.api.get_contact_detail(wxid).await
    }

    /// 获取好友列表
    pub async fn get_friends(&self, limit: i64) -> Result<Vec<Contact>> {
        self.api.get_friends(limit).await
    }

    /// 获取群聊列表
    pub async fn get_chatrooms(&self, limit: i64) -> Result<Vec<Contact>> {
        self.api.get_chatrooms(limit).await
    }

    /// 获取公众号列表
    pub async fn get_official_accounts(&self, limit: i64) -> Result<Vec<Contact>> {
        self.api.get_official_accounts(limit).await
    }

    /// 搜索联系人
    pub async fn search_contacts(
        &self,
        keyword: &str,
        contact_type: Option<&str>,
    ) -> Result<Vec<Contact>> {
        self.api.search_contacts(keyword, contact_type).await
    }

    /// 获取所有联系人（不分类型）
    pub async fn get_all_contacts(&self, limit: i64) -> Result<Vec<Contact>> {
        self.api.get_all_contacts(limit).await
    }

    /// 按首字母分组获取好友
    pub async fn get_contacts_by_letter(&self) -> Result<BTreeMap<String, Vec<Contact>>> {
        let friends = self.api.get_friends(100).await?;
        Ok(group_by_letter(friends))
    }

    /// 获取星标联系人
    pub async fn get_starred_contacts(&self) -> Result<Vec<Contact>> {
        let contacts = self.api.get_contacts(&ContactParams::default()).await?;
        Ok(contacts.into_iter().filter(|c| c.is_starred).collect())
    }

    /// 获取最近联系人（按最后交互时间降序）
    pub async fn get_recent_contacts(&self, limit: i64) -> Result<Vec<Contact>> {
        let contacts = self
            .api
            .get_contacts(&ContactParams {
                limit: Some(limit),
                ..Default::default()
            })
            .await?;
        Ok(sort_by_recent(contacts))
    }

    /// 获取群聊成员详情
    ///
    /// 先取群聊详情，再并发拉取每个成员的详情；
    /// 单个成员拉取失败只记录日志并跳过，不中断整批
    pub async fn get_chatroom_members(&self, chatroom_id: &str) -> Result<Vec<Contact>> {
        let chatroom = self.api.get_contact_detail(chatroom_id).await?;
        if chatroom.member_list.is_empty() {
            return Ok(Vec::new());
        }

        let futures = chatroom
            .member_list
            .iter()
            .map(|wxid| self.api.get_contact_detail(wxid));
        let results = join_all(futures).await;

        let mut members = Vec::new();
        for (wxid, result) in chatroom.member_list.iter().zip(results) {
            match result {
                Ok(member) => members.push(member),
                Err(e) => warn!(
                    "[ContactService] 获取群成员详情失败，已跳过: wxid={}, 错误: {}",
                    wxid, e
                ),
            }
        }
        info!(
            "[ContactService] 群 {} 成员详情获取完成: {}/{}",
            chatroom_id,
            members.len(),
            chatroom.member_list.len()
        );
        Ok(members)
    }

    /// 获取联系人统计信息（并发拉取各子列表）
    pub async fn get_contact_stats(&self) -> Result<ContactStats> {
        let (all, friends, chatrooms, official, starred) = tokio::join!(
            self.api.get_all_contacts(1000),
            self.api.get_friends(100),
            self.api.get_chatrooms(100),
            self.api.get_official_accounts(100),
            self.get_starred_contacts(),
        );

        Ok(ContactStats {
            total: all?.len(),
            friends: friends?.len(),
            chatrooms: chatrooms?.len(),
            official: official?.len(),
            starred: starred?.len(),
        })
    }

    /// 批量获取联系人详情
    ///
    /// 并发拉取，单个失败只记录日志并从结果集中剔除，不产生整体错误
    pub async fn get_batch_contact_details(&self, wxids: &[String]) -> Result<Vec<Contact>> {
        let futures = wxids.iter().map(|wxid| self.api.get_contact_detail(wxid));
        let results = join_all(futures).await;

        let mut contacts = Vec::new();
        for (wxid, result) in wxids.iter().zip(results) {
            match result {
                Ok(contact) => contacts.push(contact),
                Err(e) => warn!(
                    "[ContactService] 批量获取联系人详情失败，已跳过: wxid={}, 错误: {}",
                    wxid, e
                ),
            }
        }
        Ok(contacts)
    }
}

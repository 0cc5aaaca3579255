//! 会话数据结构

use crate::api::chatlog::models::Message;
use serde::{Deserialize, Serialize};

/// 会话类型字符串常量
pub mod session_type {
    pub const PRIVATE: &str = "private";
    pub const GROUP: &str = "group";
}

/// 会话
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// 会话 ID（对方 wxid 或群聊 ID）
    pub talker: String,
    /// 显示名称
    #[serde(default)]
    pub name: String,
    /// 备注
    #[serde(default)]
    pub remark: String,
    /// 会话类型：`private` / `group`
    #[serde(rename = "type", default)]
    pub session_type: String,
    /// 最后一条消息（可能缺失）
    #[serde(default)]
    pub last_message: Option<Message>,
    /// 未读消息数
    #[serde(default)]
    pub unread_count: i64,
    /// 是否置顶
    #[serde(default)]
    pub is_pinned: bool,
    /// 头像 URL
    #[serde(default)]
    pub avatar: String,
}

impl Session {
    /// 最后一条消息的发送时间，缺失视为 0
    pub fn last_message_time(&self) -> i64 {
        self.last_message.as_ref().map_or(0, |m| m.create_time)
    }
}

/// 会话统计信息
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub total: usize,
    pub private: usize,
    pub group: usize,
    pub unread: usize,
    pub pinned: usize,
}

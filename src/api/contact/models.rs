//! 联系人数据结构

use serde::{Deserialize, Serialize};

/// 联系人类型字符串常量
pub mod contact_type {
    pub const FRIEND: &str = "friend";
    pub const CHATROOM: &str = "chatroom";
    pub const OFFICIAL: &str = "official";
}

/// 联系人
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// 微信 ID（唯一标识）
    pub wxid: String,
    /// 昵称
    #[serde(default)]
    pub nickname: String,
    /// 微信号（别名）
    #[serde(default)]
    pub alias: String,
    /// 备注
    #[serde(default)]
    pub remark: String,
    /// 联系人类型：`friend` / `chatroom` / `official`
    #[serde(rename = "type", default)]
    pub contact_type: String,
    /// 群成员 wxid 列表（仅群聊）
    #[serde(default, deserialize_with = "crate::api::types::deserialize_vec_or_null")]
    pub member_list: Vec<String>,
    /// 是否星标
    #[serde(default)]
    pub is_starred: bool,
    /// 最后交互时间（秒级时间戳，可能缺失）
    #[serde(default)]
    pub last_contact_time: i64,
    /// 头像 URL
    #[serde(default)]
    pub avatar: String,
}

impl Contact {
    /// 显示名称（优先级：备注 > 昵称 > 别名 > 微信号）
    pub fn display_name(&self) -> String {
        crate::utils::format::format_contact_name(
            &self.remark,
            &self.nickname,
            &self.alias,
            &self.wxid,
        )
    }
}

/// 联系人统计信息
#[derive(Debug, Clone, Serialize)]
pub struct ContactStats {
    pub total: usize,
    pub friends: usize,
    pub chatrooms: usize,
    pub official: usize,
    pub starred: usize,
}

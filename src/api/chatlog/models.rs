//! 消息数据结构

use serde::{Deserialize, Serialize};

/// 消息类型编码（与微信原始编码一致）
pub mod message_type {
    pub const TEXT: i32 = 1;
    pub const IMAGE: i32 = 3;
    pub const VOICE: i32 = 34;
    pub const VIDEO: i32 = 43;
    pub const EMOJI: i32 = 47;
    pub const LOCATION: i32 = 48;
    pub const FILE: i32 = 49;
    pub const SYSTEM: i32 = 10000;
    pub const REVOKE: i32 = 10002;
}

/// 聊天消息
///
/// 服务端返回的记录原样使用，客户端从不修改；缺失字段取默认值
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// 消息 ID
    #[serde(default)]
    pub id: String,
    /// 会话内序号
    #[serde(default)]
    pub seq: i64,
    /// 会话 ID（对方 wxid 或群聊 ID）
    #[serde(default)]
    pub talker: String,
    /// 发送者 wxid
    #[serde(default)]
    pub sender: String,
    /// 发送者显示名称
    #[serde(default)]
    pub sender_name: String,
    /// 发送时间（秒级时间戳）
    #[serde(default)]
    pub create_time: i64,
    /// 消息类型编码，见 [`message_type`]
    #[serde(rename = "type", default)]
    pub msg_type: i32,
    /// 消息子类型
    #[serde(default)]
    pub sub_type: i32,
    /// 消息内容（文本消息为原文，其他类型为原始 XML 等）
    #[serde(default)]
    pub content: String,
    /// 是否自己发送
    #[serde(default)]
    pub is_self: bool,
}

impl Message {
    /// 消息预览文本（按类型映射占位文案）
    pub fn preview(&self) -> String {
        crate::utils::format::format_message_preview(self.msg_type, &self.content)
    }
}

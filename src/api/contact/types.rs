//! 联系人 API 查询参数

use serde::Serialize;

/// 联系人列表查询参数
#[derive(Debug, Clone, Default, Serialize)]
pub struct ContactParams {
    /// 联系人类型：`friend` / `chatroom` / `official`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub contact_type: Option<String>,
    /// 搜索关键词
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// 返回数量
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

//! 会话 API 查询参数

use serde::Serialize;

/// 会话列表查询参数
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionParams {
    /// 会话类型：`private` / `group`
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub session_type: Option<String>,
    /// 返回数量
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    /// 偏移量
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

//! 聊天记录 API 查询参数

use serde::Serialize;

/// 聊天记录查询参数（未设置的字段不出现在查询串中）
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatlogParams {
    /// 会话 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub talker: Option<String>,
    /// 时间戳或时间范围（`timestamp` 或 `start~end`）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// 发送者 wxid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// 消息类型编码
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub msg_type: Option<i32>,
    /// 搜索关键词
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// 返回数量
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    /// 偏移量
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// 导出格式（`json` / `csv` / `text`），由导出方法设置
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// 消息搜索参数
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchParams {
    /// 搜索关键词
    pub keyword: String,
    /// 消息类型编码
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub msg_type: Option<i32>,
    /// 限定会话 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub talker: Option<String>,
    /// 返回数量
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    /// 偏移量
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_params_are_skipped() {
        let params = ChatlogParams {
            talker: Some("wxid_abc".to_string()),
            limit: Some(50),
            ..Default::default()
        };
        let value = serde_json::to_value(&params).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["talker"], "wxid_abc");
        assert_eq!(obj["limit"], 50);
    }

    #[test]
    fn msg_type_serializes_as_type() {
        let params = SearchParams {
            keyword: "你好".to_string(),
            msg_type: Some(3),
            ..Default::default()
        };
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["type"], 3);
        assert!(value.get("talker").is_none());
    }
}

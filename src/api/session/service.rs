//! 会话服务层
//!
//! 置顶、活跃、未读、搜索、统计等派生视图全部在客户端本地计算，
//! 基于完整拉取的会话列表（后端不提供这些过滤条件）。

use crate::api::session::api::SessionApi;
use crate::api::session::models::{session_type, Session, SessionStats};
use crate::api::session::types::SessionParams;
use anyhow::Result;
use futures_util::future::try_join_all;

/// 按最后消息时间降序排序，缺失的消息时间视为 0
pub fn sort_by_activity(mut sessions: Vec<Session>) -> Vec<Session> {
    sessions.sort_by(|a, b| b.last_message_time().cmp(&a.last_message_time()));
    sessions
}

/// 关键词搜索：对名称和备注做大小写不敏感的子串匹配
pub fn search_by_keyword(sessions: Vec<Session>, keyword: &str) -> Vec<Session> {
    let keyword = keyword.to_lowercase();
    sessions
        .into_iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&keyword)
                || s.remark.to_lowercase().contains(&keyword)
        })
        .collect()
}

/// 在完整会话列表上计算统计信息
pub fn stats_of(sessions: &[Session]) -> SessionStats {
    SessionStats {
        total: sessions.len(),
        private: sessions
            .iter()
            .filter(|s| s.session_type == session_type::PRIVATE)
            .count(),
        group: sessions
            .iter()
            .filter(|s| s.session_type == session_type::GROUP)
            .count(),
        unread: sessions.iter().filter(|s| s.unread_count > 0).count(),
        pinned: sessions.iter().filter(|s| s.is_pinned).count(),
    }
}

/// 会话服务
pub struct SessionService {
    api: SessionApi,
}

impl SessionService {
    /// 创建新的会话服务
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            api: SessionApi::new(client, api_base_url),
        }
    }

    /// 获取会话列表
    pub async fn get_sessions(&self, params: &SessionParams) -> Result<Vec<Session>> {
        self.api.get_sessions(params).await
    }

    /// 获取会话详情
    pub async fn get_session_detail(&self, talker: &str) -> Result<Session> {
        self.api.get_session_detail(talker).await
    }

    /// 获取所有会话（分页）
    pub async fn get_all_sessions(&self, limit: i64, offset: i64) -> Result<Vec<Session>> {
        self.api.get_all_sessions(limit, offset).await
    }

    /// 按类型获取会话
    pub async fn get_sessions_by_type(
        &self,
        session_type: &str,
        limit: i64,
    ) -> Result<Vec<Session>> {
        self.api.get_sessions_by_type(session_type, limit).await
    }

    /// 获取私聊会话列表
    pub async fn get_private_sessions(&self, limit: i64) -> Result<Vec<Session>> {
        self.api.get_private_sessions(limit).await
    }

    /// 获取群聊会话列表
    pub async fn get_group_sessions(&self, limit: i64) -> Result<Vec<Session>> {
        self.api.get_group_sessions(limit).await
    }

    /// 获取置顶会话
    pub async fn get_pinned_sessions(&self) -> Result<Vec<Session>> {
        let sessions = self.api.get_sessions(&SessionParams::default()).await?;
        Ok(sessions.into_iter().filter(|s| s.is_pinned).collect())
    }

    /// 获取活跃会话（按最后消息时间降序）
    pub async fn get_active_sessions(&self, limit: i64) -> Result<Vec<Session>> {
        let sessions = self
            .api
            .get_sessions(&SessionParams {
                limit: Some(limit),
                ..Default::default()
            })
            .await?;
        Ok(sort_by_activity(sessions))
    }

    /// 搜索会话（名称或备注）
    pub async fn search_sessions(&self, keyword: &str) -> Result<Vec<Session>> {
        let sessions = self.api.get_sessions(&SessionParams::default()).await?;
        Ok(search_by_keyword(sessions, keyword))
    }

    /// 获取有未读消息的会话
    pub async fn get_unread_sessions(&self) -> Result<Vec<Session>> {
        let sessions = self.api.get_sessions(&SessionParams::default()).await?;
        Ok(sessions.into_iter().filter(|s| s.unread_count > 0).collect())
    }

    /// 获取会话统计信息
    pub async fn get_session_stats(&self) -> Result<SessionStats> {
        let sessions = self.api.get_sessions(&SessionParams::default()).await?;
        Ok(stats_of(&sessions))
    }

    /// 批量获取会话详情
    ///
    /// 并发拉取；任一会话拉取失败则整体返回错误（与联系人批量不同，
    /// 会话详情属于必选操作）
    pub async fn get_batch_session_details(&self, talkers: &[String]) -> Result<Vec<Session>> {
        let futures = talkers
            .iter()
            .map(|talker| self.api.get_session_detail(talker));
        try_join_all(futures).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::chatlog::models::Message;

    fn session(talker: &str, name: &str) -> Session {
        Session {
            talker: talker.to_string(),
            name: name.to_string(),
            remark: String::new(),
            session_type: session_type::PRIVATE.to_string(),
            last_message: None,
            unread_count: 0,
            is_pinned: false,
            avatar: String::new(),
        }
    }

    fn with_last_message(mut s: Session, create_time: i64) -> Session {
        s.last_message = Some(Message {
            id: String::new(),
            seq: 0,
            talker: s.talker.clone(),
            sender: s.talker.clone(),
            sender_name: String::new(),
            create_time,
            msg_type: 1,
            sub_type: 0,
            content: "hi".to_string(),
            is_self: false,
        });
        s
    }

    #[test]
    fn activity_sort_treats_missing_last_message_as_zero() {
        let a = with_last_message(session("t1", "a"), 100);
        let b = session("t2", "b"); // 无 lastMessage
        let c = with_last_message(session("t3", "c"), 300);
        let sorted = sort_by_activity(vec![a, b, c]);
        let talkers: Vec<&str> = sorted.iter().map(|s| s.talker.as_str()).collect();
        assert_eq!(talkers, vec!["t3", "t1", "t2"]);
    }

    #[test]
    fn keyword_search_is_case_insensitive_on_name_and_remark() {
        let mut a = session("t1", "Rust 交流群");
        a.remark = String::new();
        let mut b = session("t2", "family");
        b.remark = "老婆".to_string();
        let c = session("t3", "work");

        let hit = search_by_keyword(vec![a.clone(), b.clone(), c.clone()], "RUST");
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].talker, "t1");

        let hit = search_by_keyword(vec![a, b, c], "老婆");
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].talker, "t2");
    }

    #[test]
    fn stats_count_each_category() {
        let mut a = session("t1", "a");
        a.is_pinned = true;
        a.unread_count = 3;
        let mut b = session("t2", "b");
        b.session_type = session_type::GROUP.to_string();
        let c = session("t3", "c");

        let stats = stats_of(&[a, b, c]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.private, 2);
        assert_eq!(stats.group, 1);
        assert_eq!(stats.unread, 1);
        assert_eq!(stats.pinned, 1);
    }
}

//! API 公共类型和通用 HTTP 请求辅助函数

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

/// 反序列化数组字段，处理 null 值
pub(crate) fn deserialize_vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// 分页响应（具体字段由后端决定，缺失时使用默认值）
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct PaginatedResponse<T> {
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// 通用 GET 请求处理函数：附加请求ID，检查 HTTP 状态，反序列化响应
///
/// 所有 API 都共用此方法，调用方只需提供 URL、查询参数和操作名（用于日志）
pub async fn get_json<T, Q>(
    client: &reqwest::Client,
    url: &str,
    query: &Q,
    operation_name: &str,
) -> Result<T>
where
    T: serde::de::DeserializeOwned,
    Q: Serialize + ?Sized,
{
    let request_id = Uuid::new_v4().to_string();
    debug!(
        "[HTTP] {} 请求URL: {}, 请求ID: {}",
        operation_name, url, request_id
    );

    let response = client
        .get(url)
        .query(query)
        .header("X-Request-ID", &request_id)
        .send()
        .await
        .context("请求失败")?;

    let status = response.status();
    let body_bytes = response.bytes().await.context("读取响应 body 失败")?;
    let body_str = String::from_utf8_lossy(&body_bytes);
    debug!("[HTTP] {}响应 Body: {}", operation_name, body_str);

    if !status.is_success() {
        error!(
            "[HTTP] {}请求失败，HTTP状态: {}, 响应: {}",
            operation_name, status, body_str
        );
        return Err(anyhow::anyhow!("HTTP 错误 {}: {}", status, body_str));
    }

    let data: T = serde_json::from_slice(&body_bytes).map_err(|e| {
        error!(
            "[HTTP] {}反序列化失败: {:?}\n原始响应: {}",
            operation_name, e, body_str
        );
        anyhow::anyhow!("反序列化响应失败: {:?}", e)
    })?;

    Ok(data)
}

/// 通用 GET 请求处理函数：返回原始响应字节（用于 CSV/文本导出下载）
pub async fn get_bytes<Q>(
    client: &reqwest::Client,
    url: &str,
    query: &Q,
    operation_name: &str,
) -> Result<Vec<u8>>
where
    Q: Serialize + ?Sized,
{
    let request_id = Uuid::new_v4().to_string();
    debug!(
        "[HTTP] {} 请求URL: {}, 请求ID: {}",
        operation_name, url, request_id
    );

    let response = client
        .get(url)
        .query(query)
        .header("X-Request-ID", &request_id)
        .send()
        .await
        .context("请求失败")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(
            "[HTTP] {}请求失败，HTTP状态: {}, 响应: {}",
            operation_name, status, body
        );
        return Err(anyhow::anyhow!("HTTP 错误 {}: {}", status, body));
    }

    let body = response.bytes().await.context("读取响应 body 失败")?;
    Ok(body.to_vec())
}

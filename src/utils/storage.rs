//! 本地存储工具
//!
//! 在一个接口后面封装两种作用域的键值存储：
//! - 临时（`Ephemeral`）：进程内存，进程退出即失效
//! - 持久（`Persistent`）：落盘到一个 JSON 映射文件
//!
//! 每个值写入时包装时间戳和可选的绝对过期时间（写入时由
//! 相对秒数换算为毫秒级时间戳），过期的条目在读取时删除并视为不存在。
//! 可选的 Base64 编码只是简单混淆，不是加密。
//! 所有操作失败只记录日志，从不 panic。

use base64::Engine;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::{error, warn};

/// 默认键前缀，避免与其他存储使用方冲突
const DEFAULT_PREFIX: &str = "chatlog_";

/// 存储作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    /// 进程内存，进程退出即失效
    Ephemeral,
    /// 持久化到磁盘文件
    Persistent,
}

/// 存储选项
#[derive(Debug, Clone)]
pub struct StorageOptions {
    pub scope: StorageScope,
    /// 过期时间（秒，相对当前时刻）
    pub expire_secs: Option<i64>,
    /// 是否做 Base64 编码（可逆混淆，非加密）
    pub encode: bool,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self {
            scope: StorageScope::Persistent,
            expire_secs: None,
            encode: false,
        }
    }
}

/// 存储条目包装结构
#[derive(Debug, Serialize, Deserialize)]
struct StorageEntry {
    value: serde_json::Value,
    /// 写入时间（毫秒级时间戳）
    timestamp: i64,
    /// 绝对过期时间（毫秒级时间戳）
    #[serde(skip_serializing_if = "Option::is_none")]
    expire: Option<i64>,
}

/// 键值存储
pub struct Storage {
    prefix: String,
    file_path: PathBuf,
    ephemeral: Mutex<HashMap<String, String>>,
    persistent: Mutex<HashMap<String, String>>,
}

impl Storage {
    /// 创建存储实例，持久作用域使用给定的 JSON 文件
    ///
    /// 文件不存在或内容损坏时从空映射开始（只记录日志）
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self::with_prefix(file_path, DEFAULT_PREFIX)
    }

    /// 创建存储实例并指定键前缀
    pub fn with_prefix(file_path: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        let file_path = file_path.into();
        let persistent = match std::fs::read_to_string(&file_path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    warn!(
                        "[Storage] 持久化文件内容损坏，忽略: {}, 错误: {}",
                        file_path.display(),
                        e
                    );
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self {
            prefix: prefix.into(),
            file_path,
            ephemeral: Mutex::new(HashMap::new()),
            persistent: Mutex::new(persistent),
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    /// 加锁；锁被毒化时直接取回内部数据（映射本身不会处于半写状态）
    fn lock_map(&self, scope: StorageScope) -> MutexGuard<'_, HashMap<String, String>> {
        let mutex = match scope {
            StorageScope::Ephemeral => &self.ephemeral,
            StorageScope::Persistent => &self.persistent,
        };
        mutex.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 将持久映射写回磁盘，失败只记录日志
    fn persist(&self, map: &HashMap<String, String>) {
        let content = match serde_json::to_string(map) {
            Ok(c) => c,
            Err(e) => {
                error!("[Storage] 序列化持久映射失败: {}", e);
                return;
            }
        };
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
        if let Err(e) = std::fs::write(&self.file_path, content) {
            error!(
                "[Storage] 写入持久化文件失败: {}, 错误: {}",
                self.file_path.display(),
                e
            );
        }
    }

    /// 设置值
    pub fn set<T: Serialize>(&self, key: &str, value: &T, options: &StorageOptions) {
        let value = match serde_json::to_value(value) {
            Ok(v) => v,
            Err(e) => {
                error!("[Storage] 序列化值失败: key={}, 错误: {}", key, e);
                return;
            }
        };
        let now = Utc::now().timestamp_millis();
        let entry = StorageEntry {
            value,
            timestamp: now,
            expire: options.expire_secs.map(|secs| now + secs * 1000),
        };
        let mut raw = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                error!("[Storage] 序列化条目失败: key={}, 错误: {}", key, e);
                return;
            }
        };
        if options.encode {
            raw = base64::engine::general_purpose::STANDARD.encode(raw);
        }

        let mut map = self.lock_map(options.scope);
        map.insert(self.full_key(key), raw);
        if options.scope == StorageScope::Persistent {
            self.persist(&map);
        }
    }

    /// 获取值；不存在、解析失败或已过期时返回 `None`
    ///
    /// 过期的条目会被顺手删除
    pub fn get<T: DeserializeOwned>(&self, key: &str, options: &StorageOptions) -> Option<T> {
        let full_key = self.full_key(key);
        let raw = self.lock_map(options.scope).get(&full_key).cloned()?;

        let raw = if options.encode {
            let decoded = match base64::engine::general_purpose::STANDARD.decode(&raw) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("[Storage] Base64 解码失败: key={}, 错误: {}", key, e);
                    return None;
                }
            };
            String::from_utf8(decoded).ok()?
        } else {
            raw
        };

        let entry: StorageEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("[Storage] 解析存储条目失败: key={}, 错误: {}", key, e);
                return None;
            }
        };

        if let Some(expire) = entry.expire {
            if Utc::now().timestamp_millis() > expire {
                self.remove(key, options.scope);
                return None;
            }
        }

        match serde_json::from_value(entry.value) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("[Storage] 反序列化值失败: key={}, 错误: {}", key, e);
                None
            }
        }
    }

    /// 移除值
    pub fn remove(&self, key: &str, scope: StorageScope) {
        let mut map = self.lock_map(scope);
        map.remove(&self.full_key(key));
        if scope == StorageScope::Persistent {
            self.persist(&map);
        }
    }

    /// 清空当前前缀下的所有键（不影响前缀之外的键）
    pub fn clear(&self, scope: StorageScope) {
        let mut map = self.lock_map(scope);
        map.retain(|k, _| !k.starts_with(&self.prefix));
        if scope == StorageScope::Persistent {
            self.persist(&map);
        }
    }

    /// 列出当前前缀下的所有键（去掉前缀）
    pub fn keys(&self, scope: StorageScope) -> Vec<String> {
        let map = self.lock_map(scope);
        map.keys()
            .filter(|k| k.starts_with(&self.prefix))
            .map(|k| k[self.prefix.len()..].to_string())
            .collect()
    }

    /// 检查键是否存在（过期视为不存在）
    pub fn has(&self, key: &str, options: &StorageOptions) -> bool {
        self.get::<serde_json::Value>(key, options).is_some()
    }

    /// 当前前缀下存储占用的字节数（键 + 值）
    pub fn size(&self, scope: StorageScope) -> usize {
        let map = self.lock_map(scope);
        map.iter()
            .filter(|(k, _)| k.starts_with(&self.prefix))
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }

    // ===== 便捷方法（对应持久 / 临时两种作用域） =====

    /// 写入持久存储
    pub fn set_local<T: Serialize>(&self, key: &str, value: &T, expire_secs: Option<i64>) {
        self.set(
            key,
            value,
            &StorageOptions {
                scope: StorageScope::Persistent,
                expire_secs,
                encode: false,
            },
        );
    }

    /// 读取持久存储
    pub fn get_local<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key, &StorageOptions::default())
    }

    /// 移除持久存储中的键
    pub fn remove_local(&self, key: &str) {
        self.remove(key, StorageScope::Persistent);
    }

    /// 清空持久存储（仅当前前缀）
    pub fn clear_local(&self) {
        self.clear(StorageScope::Persistent);
    }

    /// 写入临时存储
    pub fn set_session<T: Serialize>(&self, key: &str, value: &T, expire_secs: Option<i64>) {
        self.set(
            key,
            value,
            &StorageOptions {
                scope: StorageScope::Ephemeral,
                expire_secs,
                encode: false,
            },
        );
    }

    /// 读取临时存储
    pub fn get_session<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(
            key,
            &StorageOptions {
                scope: StorageScope::Ephemeral,
                expire_secs: None,
                encode: false,
            },
        )
    }

    /// 移除临时存储中的键
    pub fn remove_session(&self, key: &str) {
        self.remove(key, StorageScope::Ephemeral);
    }

    /// 清空临时存储（仅当前前缀）
    pub fn clear_session(&self) {
        self.clear(StorageScope::Ephemeral);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn temp_file() -> PathBuf {
        std::env::temp_dir().join(format!("chatlog-storage-test-{}.json", uuid::Uuid::new_v4()))
    }

    #[test]
    fn local_round_trip() {
        let storage = Storage::new(temp_file());
        storage.set_local("user", &json!({"name": "alice", "age": 30}), None);
        let value: serde_json::Value = storage.get_local("user").unwrap();
        assert_eq!(value, json!({"name": "alice", "age": 30}));
    }

    #[test]
    fn expired_entry_is_removed_on_read() {
        let storage = Storage::new(temp_file());
        storage.set_local("token", &"abc123", Some(0));
        std::thread::sleep(Duration::from_millis(30));
        let value: Option<String> = storage.get_local("token");
        assert!(value.is_none());
        // 底层条目已被删除
        assert!(!storage.keys(StorageScope::Persistent).contains(&"token".to_string()));
    }

    #[test]
    fn unexpired_entry_survives() {
        let storage = Storage::new(temp_file());
        storage.set_local("token", &"abc123", Some(3600));
        let value: Option<String> = storage.get_local("token");
        assert_eq!(value.as_deref(), Some("abc123"));
    }

    #[test]
    fn encoded_round_trip_obfuscates_raw_value() {
        let storage = Storage::new(temp_file());
        let options = StorageOptions {
            scope: StorageScope::Ephemeral,
            expire_secs: None,
            encode: true,
        };
        storage.set("secret", &"明文内容", &options);

        // 原始存储内容不包含明文
        let raw = storage.ephemeral.lock().unwrap()["chatlog_secret"].clone();
        assert!(!raw.contains("明文内容"));

        let value: Option<String> = storage.get("secret", &options);
        assert_eq!(value.as_deref(), Some("明文内容"));
    }

    #[test]
    fn keys_clear_and_size_are_prefix_scoped() {
        let path = temp_file();
        let storage = Storage::new(&path);
        storage.set_local("a", &1, None);
        storage.set_local("b", &2, None);
        // 前缀之外的键（模拟其他使用方）
        storage
            .persistent
            .lock()
            .unwrap()
            .insert("other_key".to_string(), "raw".to_string());

        let mut keys = storage.keys(StorageScope::Persistent);
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);
        assert!(storage.size(StorageScope::Persistent) > 0);

        storage.clear_local();
        assert!(storage.keys(StorageScope::Persistent).is_empty());
        assert_eq!(storage.size(StorageScope::Persistent), 0);
        // 前缀之外的键不受影响
        assert!(storage.persistent.lock().unwrap().contains_key("other_key"));
    }

    #[test]
    fn persistent_scope_survives_reload() {
        let path = temp_file();
        {
            let storage = Storage::new(&path);
            storage.set_local("config", &json!({"theme": "dark"}), None);
        }
        let reloaded = Storage::new(&path);
        let value: serde_json::Value = reloaded.get_local("config").unwrap();
        assert_eq!(value, json!({"theme": "dark"}));
    }

    #[test]
    fn ephemeral_scope_is_not_persisted() {
        let path = temp_file();
        {
            let storage = Storage::new(&path);
            storage.set_session("tmp", &"value", None);
        }
        let reloaded = Storage::new(&path);
        let value: Option<String> = reloaded.get_session("tmp");
        assert!(value.is_none());
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let storage = Storage::new(temp_file());
        storage.set_session("k", &"v", None);

        // 在持有锁时 panic，毒化互斥锁
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = storage.ephemeral.lock().unwrap();
            panic!("boom");
        }));
        assert!(result.is_err());

        // 后续操作照常工作
        let value: Option<String> = storage.get_session("k");
        assert_eq!(value.as_deref(), Some("v"));
        storage.set_session("k2", &"v2", None);
        let value: Option<String> = storage.get_session("k2");
        assert_eq!(value.as_deref(), Some("v2"));
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let path = temp_file();
        std::fs::write(&path, "not json at all").unwrap();
        let storage = Storage::new(&path);
        let value: Option<String> = storage.get_local("anything");
        assert!(value.is_none());
        // 仍可正常写入
        storage.set_local("k", &"v", None);
        let value: Option<String> = storage.get_local("k");
        assert_eq!(value.as_deref(), Some("v"));
    }
}

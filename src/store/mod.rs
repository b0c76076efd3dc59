//! Generic key-value persistence simulating tables via key prefixes.
//!
//! All entities are stored as JSON values under opaque string keys
//! (`users:*`, `file_analyses:*`, `cli_commands:*`, ...). Two backends:
//! an in-memory `BTreeMap` (default, used by tests) and Redis, selected
//! by `REDIS_URL`. No transactions and no secondary indexes beyond the
//! id lists maintained by callers.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::errors::AppError;

/// Cloneable handle to the key-value store.
#[derive(Clone)]
pub struct KvStore {
    backend: Backend,
}

#[derive(Clone)]
enum Backend {
    Memory(Arc<RwLock<BTreeMap<String, Value>>>),
    Redis(redis::aio::MultiplexedConnection),
}

impl fmt::Debug for KvStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.backend {
            Backend::Memory(_) => f.write_str("KvStore(memory)"),
            Backend::Redis(_) => f.write_str("KvStore(redis)"),
        }
    }
}

impl KvStore {
    /// Create an in-memory store.
    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(RwLock::new(BTreeMap::new()))),
        }
    }

    /// Connect to Redis and return a store backed by it.
    pub async fn redis(url: &str) -> Result<Self, AppError> {
        let client = redis::Client::open(url)?;
        let con = client.get_multiplexed_async_connection().await?;
        Ok(Self {
            backend: Backend::Redis(con),
        })
    }

    /// Open the backend named by the configuration: Redis when a URL is
    /// given, in-memory otherwise.
    pub async fn from_config(redis_url: Option<&str>) -> Result<Self, AppError> {
        match redis_url {
            Some(url) => Self::redis(url).await,
            None => Ok(Self::memory()),
        }
    }

    /// Fetch and deserialize the value at `key`, if present.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        let raw = match &self.backend {
            Backend::Memory(map) => map.read().await.get(key).cloned(),
            Backend::Redis(con) => {
                let mut con = con.clone();
                let raw: Option<String> = redis::cmd("GET").arg(key).query_async(&mut con).await?;
                match raw {
                    Some(s) => Some(serde_json::from_str(&s)?),
                    None => None,
                }
            }
        };
        match raw {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Serialize and store `value` at `key`, overwriting any previous value.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let json = serde_json::to_value(value)?;
        match &self.backend {
            Backend::Memory(map) => {
                map.write().await.insert(key.to_string(), json);
            }
            Backend::Redis(con) => {
                let mut con = con.clone();
                let raw = serde_json::to_string(&json)?;
                redis::cmd("SET")
                    .arg(key)
                    .arg(raw)
                    .query_async::<()>(&mut con)
                    .await?;
            }
        }
        Ok(())
    }

    /// Delete the value at `key`. Deleting a missing key is not an error.
    pub async fn del(&self, key: &str) -> Result<(), AppError> {
        match &self.backend {
            Backend::Memory(map) => {
                map.write().await.remove(key);
            }
            Backend::Redis(con) => {
                let mut con = con.clone();
                redis::cmd("DEL").arg(key).query_async::<()>(&mut con).await?;
            }
        }
        Ok(())
    }

    /// Fetch every value whose key starts with `prefix`.
    ///
    /// The memory backend returns values in key order; Redis order is
    /// unspecified.
    pub async fn get_by_prefix<T: DeserializeOwned>(
        &self,
        prefix: &str,
    ) -> Result<Vec<T>, AppError> {
        match &self.backend {
            Backend::Memory(map) => {
                let map = map.read().await;
                map.range(prefix.to_string()..)
                    .take_while(|(k, _)| k.starts_with(prefix))
                    .map(|(_, v)| serde_json::from_value(v.clone()).map_err(AppError::from))
                    .collect()
            }
            Backend::Redis(con) => {
                let mut con = con.clone();
                let pattern = format!("{prefix}*");
                let mut keys: Vec<String> = Vec::new();
                let mut cursor: u64 = 0;
                loop {
                    let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(&pattern)
                        .arg("COUNT")
                        .arg(100)
                        .query_async(&mut con)
                        .await?;
                    keys.extend(batch);
                    cursor = next;
                    if cursor == 0 {
                        break;
                    }
                }

                let mut values = Vec::with_capacity(keys.len());
                for key in keys {
                    let raw: Option<String> =
                        redis::cmd("GET").arg(&key).query_async(&mut con).await?;
                    // A key can expire between SCAN and GET; skip it.
                    if let Some(s) = raw {
                        values.push(serde_json::from_str(&s)?);
                    }
                }
                Ok(values)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Record {
        id: u32,
        name: String,
    }

    #[tokio::test]
    async fn set_get_roundtrip() {
        let kv = KvStore::memory();
        let record = Record {
            id: 7,
            name: "sample.exe".to_string(),
        };
        kv.set("file_analyses:7", &record).await.unwrap();

        let fetched: Option<Record> = kv.get("file_analyses:7").await.unwrap();
        assert_eq!(fetched, Some(record));
    }

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let kv = KvStore::memory();
        let fetched: Option<Record> = kv.get("users:nobody").await.unwrap();
        assert!(fetched.is_none());
    }

    #[tokio::test]
    async fn set_overwrites() {
        let kv = KvStore::memory();
        kv.set("counter", &1u32).await.unwrap();
        kv.set("counter", &2u32).await.unwrap();
        let value: Option<u32> = kv.get("counter").await.unwrap();
        assert_eq!(value, Some(2));
    }

    #[tokio::test]
    async fn del_removes_key() {
        let kv = KvStore::memory();
        kv.set("settings:theme", &"dark").await.unwrap();
        kv.del("settings:theme").await.unwrap();
        let value: Option<String> = kv.get("settings:theme").await.unwrap();
        assert!(value.is_none());

        // Deleting again is a no-op.
        kv.del("settings:theme").await.unwrap();
    }

    #[tokio::test]
    async fn prefix_scan_matches_only_prefix() {
        let kv = KvStore::memory();
        kv.set("cli_commands:a", &"whoami").await.unwrap();
        kv.set("cli_commands:b", &"netstat").await.unwrap();
        kv.set("cli_commandz", &"nope").await.unwrap();
        kv.set("users:x", &"nope").await.unwrap();

        let values: Vec<String> = kv.get_by_prefix("cli_commands:").await.unwrap();
        assert_eq!(values, vec!["whoami".to_string(), "netstat".to_string()]);
    }

    #[tokio::test]
    async fn prefix_scan_empty_store() {
        let kv = KvStore::memory();
        let values: Vec<String> = kv.get_by_prefix("file_analyses:").await.unwrap();
        assert!(values.is_empty());
    }

    #[tokio::test]
    async fn type_mismatch_is_error() {
        let kv = KvStore::memory();
        kv.set("users:1", &"just a string").await.unwrap();
        let fetched: Result<Option<Record>, _> = kv.get("users:1").await;
        assert!(fetched.is_err());
    }
}

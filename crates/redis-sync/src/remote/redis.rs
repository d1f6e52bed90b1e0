//! Remote store backed by a Redis server over a blocking connection.

use std::collections::BTreeMap;

use redis::{Client, Commands, Connection};

use crate::config::RedisConfig;
use crate::error::RemoteError;
use crate::remote::{RemoteKind, RemoteStore};

pub struct RedisStore {
    connection: Connection,
    address: String,
}

impl RedisStore {
    /// Opens a connection and selects the configured database.
    pub fn connect(config: &RedisConfig) -> Result<Self, RemoteError> {
        let url = connection_url(config);
        let connect_error = |e: redis::RedisError| RemoteError::Connect {
            address: config.address.clone(),
            message: e.to_string(),
        };

        let client = Client::open(url.as_str()).map_err(connect_error)?;
        let mut connection = client.get_connection().map_err(connect_error)?;
        redis::cmd("PING")
            .query::<String>(&mut connection)
            .map_err(connect_error)?;

        log::debug!("Connected to redis at {} (db {})", config.address, config.db);

        Ok(Self {
            connection,
            address: config.address.clone(),
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Builds a `redis://` URL from `host:port`, db and password. A full URL in
/// `address` is used as is.
pub fn connection_url(config: &RedisConfig) -> String {
    let address = config.address.trim();
    if address.starts_with("redis://") || address.starts_with("rediss://") {
        return address.to_string();
    }

    if config.auth.is_empty() {
        format!("redis://{}/{}", address, config.db)
    } else {
        format!(
            "redis://:{}@{}/{}",
            urlencoding::encode(&config.auth),
            address,
            config.db
        )
    }
}

impl RemoteStore for RedisStore {
    fn exists(&mut self, key: &str) -> Result<bool, RemoteError> {
        self.connection
            .exists(key)
            .map_err(|e| RemoteError::command("EXISTS", key, e))
    }

    fn kind_of(&mut self, key: &str) -> Result<RemoteKind, RemoteError> {
        let name: String = redis::cmd("TYPE")
            .arg(key)
            .query(&mut self.connection)
            .map_err(|e| RemoteError::command("TYPE", key, e))?;
        Ok(RemoteKind::from_type_name(&name))
    }

    fn get(&mut self, key: &str) -> Result<Option<String>, RemoteError> {
        self.connection
            .get(key)
            .map_err(|e| RemoteError::command("GET", key, e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), RemoteError> {
        self.connection
            .set(key, value)
            .map_err(|e| RemoteError::command("SET", key, e))
    }

    fn delete(&mut self, key: &str) -> Result<(), RemoteError> {
        self.connection
            .del(key)
            .map_err(|e| RemoteError::command("DEL", key, e))
    }

    fn hash_exists(&mut self, key: &str, field: &str) -> Result<bool, RemoteError> {
        self.connection
            .hexists(key, field)
            .map_err(|e| RemoteError::command("HEXISTS", key, e))
    }

    fn hash_get(&mut self, key: &str, field: &str) -> Result<Option<String>, RemoteError> {
        self.connection
            .hget(key, field)
            .map_err(|e| RemoteError::command("HGET", key, e))
    }

    fn hash_set(&mut self, key: &str, field: &str, value: &str) -> Result<(), RemoteError> {
        self.connection
            .hset(key, field, value)
            .map_err(|e| RemoteError::command("HSET", key, e))
    }

    fn hash_get_all(&mut self, key: &str) -> Result<BTreeMap<String, String>, RemoteError> {
        self.connection
            .hgetall(key)
            .map_err(|e| RemoteError::command("HGETALL", key, e))
    }

    fn hash_delete(&mut self, key: &str, field: &str) -> Result<(), RemoteError> {
        self.connection
            .hdel(key, field)
            .map_err(|e| RemoteError::command("HDEL", key, e))
    }

    fn list_all_keys(&mut self) -> Result<Vec<String>, RemoteError> {
        self.connection
            .keys("*")
            .map_err(|e| RemoteError::command("KEYS", "*", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(address: &str, db: u32, auth: &str) -> RedisConfig {
        RedisConfig {
            address: address.to_string(),
            db,
            auth: auth.to_string(),
        }
    }

    #[test]
    fn test_url_without_auth() {
        assert_eq!(
            connection_url(&config("127.0.0.1:6379", 0, "")),
            "redis://127.0.0.1:6379/0"
        );
    }

    #[test]
    fn test_url_with_auth_is_encoded() {
        assert_eq!(
            connection_url(&config("db.local:6380", 3, "p@ss word")),
            "redis://:p%40ss%20word@db.local:6380/3"
        );
    }

    #[test]
    fn test_full_url_is_kept() {
        assert_eq!(
            connection_url(&config(" redis://cache:6379/5 ", 0, "ignored")),
            "redis://cache:6379/5"
        );
    }

    #[test]
    fn test_connect_failure_is_reported() {
        // port 1 is never a redis server
        let err = RedisStore::connect(&config("127.0.0.1:1", 0, "")).err().unwrap();
        assert!(matches!(err, RemoteError::Connect { .. }));
        assert_eq!(err.code(), 7);
    }
}

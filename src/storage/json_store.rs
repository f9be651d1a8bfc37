use serde::{de::DeserializeOwned, Serialize};

use super::schema::Database;

/// Typed JSON view over the key-value table.
///
/// Neither operation can fail from the caller's point of view: read faults,
/// absent keys and undecodable values all yield the caller's default, and
/// write faults are logged and dropped. In-memory state is never rolled back
/// because of a failed write.
#[derive(Clone)]
pub struct JsonStore {
    db: Database,
}

impl JsonStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Decode the value under `key`, or return `default`.
    pub async fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.db.get_value(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read stored value, using default");
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Stored value is not valid JSON for its type, using default");
                default
            }
        }
    }

    /// Encode `value` and write it under `key`.
    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to encode value, write dropped");
                return;
            }
        };

        if let Err(e) = self.db.set_value(key, &raw).await {
            tracing::warn!(key = %key, error = %e, "Failed to persist value, write dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    async fn test_store() -> JsonStore {
        JsonStore::new(Database::open(":memory:").await.unwrap())
    }

    #[tokio::test]
    async fn test_load_absent_returns_default() {
        let store = test_store().await;
        let v: Vec<String> = store.load("missing", vec!["x".to_string()]).await;
        assert_eq!(v, vec!["x".to_string()]);
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = test_store().await;
        store.save("numbers", &vec![1, 2, 3]).await;
        let v: Vec<i32> = store.load("numbers", Vec::new()).await;
        assert_eq!(v, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_corrupt_value_returns_default() {
        let store = test_store().await;
        store.database().set_value("numbers", "[1, 2,").await.unwrap();
        let v: Vec<i32> = store.load("numbers", vec![9]).await;
        assert_eq!(v, vec![9]);
    }

    #[tokio::test]
    async fn test_wrong_shape_returns_default() {
        let store = test_store().await;
        store.database().set_value("numbers", r#"{"a":1}"#).await.unwrap();
        let v: Vec<i32> = store.load("numbers", Vec::new()).await;
        assert!(v.is_empty());
    }

    #[tokio::test]
    async fn test_read_fault_returns_default() {
        let store = test_store().await;
        store.save("numbers", &vec![1]).await;
        store.database().pool.close().await;
        let v: Vec<i32> = store.load("numbers", vec![7]).await;
        assert_eq!(v, vec![7]);
    }

    #[tokio::test]
    async fn test_write_fault_is_swallowed() {
        let store = test_store().await;
        store.database().pool.close().await;
        // Must return normally.
        store.save("numbers", &vec![1, 2]).await;
    }

    #[tokio::test]
    async fn test_string_value_round_trip() {
        let store = test_store().await;
        store.save("theme", "light").await;
        assert_eq!(store.database().get_value("theme").await.unwrap(), Some("\"light\"".to_string()));
        let v: String = store.load("theme", String::new()).await;
        assert_eq!(v, "light");
    }
}

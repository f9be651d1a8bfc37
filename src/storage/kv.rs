use anyhow::Result;

use super::schema::Database;

impl Database {
    // ========================================================================
    // Key-Value Operations
    // ========================================================================

    /// Read the raw string stored under `key`, or `None` when absent.
    pub async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Store `value` under `key`, replacing any previous value.
    pub async fn set_value(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Drop every stored value. Backs the `--reset-db` flag.
    pub async fn clear_all(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM kv_store")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

//! SQLite implementation of the PermissionIndex trait.
//!
//! Grants live in a single two-column table with a composite primary
//! key; `INSERT OR IGNORE` and plain `DELETE` give both point
//! operations their idempotence.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection};

use coffer_core::{AuthorityToken, Principal};

use crate::error::{IndexError, Result};
use crate::index::PermissionIndex;

/// SQLite-based permission index.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteIndex {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteIndex {
    /// Open a SQLite database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking closure against the connection off the runtime.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| IndexError::Backend(format!("mutex poisoned: {}", e)))?;
            f(&conn)
        })
        .await
        .map_err(|e| IndexError::Backend(format!("spawn_blocking failed: {}", e)))?
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS grants (
            principal TEXT NOT NULL,
            token TEXT NOT NULL,

            PRIMARY KEY (principal, token)
        );

        CREATE INDEX IF NOT EXISTS idx_grants_token ON grants(token);
        "#,
    )?;
    Ok(())
}

#[async_trait]
impl PermissionIndex for SqliteIndex {
    async fn grant(&self, principal: &Principal, token: &AuthorityToken) -> Result<()> {
        let principal = principal.clone();
        let token = token.clone();

        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO grants (principal, token) VALUES (?1, ?2)",
                params![principal.as_str(), token.as_str()],
            )?;
            Ok(())
        })
        .await
    }

    async fn revoke(&self, principal: &Principal, token: &AuthorityToken) -> Result<()> {
        let principal = principal.clone();
        let token = token.clone();

        self.with_conn(move |conn| {
            conn.execute(
                "DELETE FROM grants WHERE principal = ?1 AND token = ?2",
                params![principal.as_str(), token.as_str()],
            )?;
            Ok(())
        })
        .await
    }

    async fn tokens_of(&self, principal: &Principal) -> Result<BTreeSet<AuthorityToken>> {
        let principal = principal.clone();

        self.with_conn(move |conn| {
            let mut stmt =
                conn.prepare("SELECT token FROM grants WHERE principal = ?1")?;
            let rows = stmt.query_map(params![principal.as_str()], |row| {
                row.get::<_, String>(0)
            })?;

            let mut tokens = BTreeSet::new();
            for row in rows {
                tokens.insert(AuthorityToken::from_raw(row?));
            }
            Ok(tokens)
        })
        .await
    }

    async fn principals_of(&self, token: &AuthorityToken) -> Result<BTreeSet<Principal>> {
        let token = token.clone();

        self.with_conn(move |conn| {
            let mut stmt =
                conn.prepare("SELECT principal FROM grants WHERE token = ?1")?;
            let rows = stmt.query_map(params![token.as_str()], |row| {
                row.get::<_, String>(0)
            })?;

            let mut principals = BTreeSet::new();
            for row in rows {
                principals.insert(Principal::new(row?));
            }
            Ok(principals)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_core::{BucketId, GroupId};

    fn token(group: &str) -> AuthorityToken {
        AuthorityToken::for_group(&BucketId::new("bucket1"), &GroupId::new(group))
    }

    #[tokio::test]
    async fn test_grant_revoke_idempotent() {
        let index = SqliteIndex::open_memory().unwrap();
        let alice = Principal::new("alice");

        index.grant(&alice, &token("g1")).await.unwrap();
        index.grant(&alice, &token("g1")).await.unwrap();
        assert_eq!(index.tokens_of(&alice).await.unwrap().len(), 1);

        index.revoke(&alice, &token("g1")).await.unwrap();
        index.revoke(&alice, &token("g1")).await.unwrap();
        assert!(index.tokens_of(&alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reverse_lookup() {
        let index = SqliteIndex::open_memory().unwrap();
        index.grant(&Principal::new("alice"), &token("g1")).await.unwrap();
        index.grant(&Principal::new("bob"), &token("g1")).await.unwrap();

        let holders = index.principals_of(&token("g1")).await.unwrap();
        assert_eq!(holders.len(), 2);
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grants.db");
        let alice = Principal::new("alice");

        {
            let index = SqliteIndex::open(&path).unwrap();
            index.grant(&alice, &token("g1")).await.unwrap();
        }

        let index = SqliteIndex::open(&path).unwrap();
        assert_eq!(index.tokens_of(&alice).await.unwrap().len(), 1);
    }
}

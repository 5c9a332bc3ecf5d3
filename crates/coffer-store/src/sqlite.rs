//! SQLite implementation of the MembershipStore trait.
//!
//! This is the primary storage backend for Coffer. It uses rusqlite with
//! bundled SQLite, wrapped in async via tokio::spawn_blocking.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use coffer_core::{BucketId, GroupId, GroupRecord, Principal, Tombstone};

use crate::error::{Result, StoreError};
use crate::filter::{matches_all, Filter};
use crate::migration;
use crate::traits::MembershipStore;

/// SQLite-based membership store.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run a blocking closure against the connection off the runtime.
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|e| StoreError::Backend(format!("mutex poisoned: {}", e)))?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("spawn_blocking failed: {}", e)))?
    }
}

fn encode_members(members: &BTreeSet<Principal>) -> Result<String> {
    serde_json::to_string(members).map_err(|e| StoreError::Serialization(e.to_string()))
}

fn decode_members(raw: &str) -> Result<BTreeSet<Principal>> {
    serde_json::from_str(raw).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Next strictly-increasing timestamp for a bucket.
///
/// Reads the bucket's high-water mark so timestamps stay monotonic even
/// when the wall clock does not move between writes.
fn next_timestamp(conn: &Connection, bucket: &BucketId) -> Result<u64> {
    let max: i64 = conn.query_row(
        "SELECT COALESCE(MAX(last_modified), 0) FROM groups WHERE bucket = ?1",
        params![bucket.as_str()],
        |row| row.get(0),
    )?;
    Ok(now_millis().max(max as u64 + 1))
}

/// Read all live records in a bucket, ordered by id.
fn live_records(conn: &Connection, bucket: &BucketId) -> Result<Vec<GroupRecord>> {
    let mut stmt = conn.prepare(
        "SELECT id, members, last_modified FROM groups
         WHERE bucket = ?1 AND deleted = 0
         ORDER BY id",
    )?;
    let rows = stmt.query_map(params![bucket.as_str()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)?,
        ))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (id, members, last_modified) = row?;
        records.push(GroupRecord {
            id: GroupId::new(id),
            members: decode_members(&members)?,
            last_modified: last_modified as u64,
        });
    }
    Ok(records)
}

#[async_trait]
impl MembershipStore for SqliteStore {
    async fn get(&self, bucket: &BucketId, id: &GroupId) -> Result<Option<GroupRecord>> {
        let bucket = bucket.clone();
        let id = id.clone();

        self.with_conn(move |conn| {
            let row: Option<(String, i64)> = conn
                .query_row(
                    "SELECT members, last_modified FROM groups
                     WHERE bucket = ?1 AND id = ?2 AND deleted = 0",
                    params![bucket.as_str(), id.as_str()],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            row.map(|(members, last_modified)| {
                Ok(GroupRecord {
                    id: id.clone(),
                    members: decode_members(&members)?,
                    last_modified: last_modified as u64,
                })
            })
            .transpose()
        })
        .await
    }

    async fn list(&self, bucket: &BucketId, filters: &[Filter]) -> Result<Vec<GroupRecord>> {
        let bucket = bucket.clone();
        let filters = filters.to_vec();

        // Filters apply in process after the bucket scan.
        self.with_conn(move |conn| {
            let records = live_records(conn, &bucket)?;
            Ok(records
                .into_iter()
                .filter(|r| matches_all(&filters, r))
                .collect())
        })
        .await
    }

    async fn put(&self, bucket: &BucketId, record: GroupRecord) -> Result<GroupRecord> {
        record.validate()?;
        let bucket = bucket.clone();
        let mut record = record;

        self.with_conn(move |conn| {
            record.last_modified = next_timestamp(conn, &bucket)?;

            conn.execute(
                "INSERT INTO groups (bucket, id, members, last_modified, deleted)
                 VALUES (?1, ?2, ?3, ?4, 0)
                 ON CONFLICT(bucket, id) DO UPDATE
                 SET members = ?3, last_modified = ?4, deleted = 0",
                params![
                    bucket.as_str(),
                    record.id.as_str(),
                    encode_members(&record.members)?,
                    record.last_modified as i64,
                ],
            )?;

            Ok(record)
        })
        .await
    }

    async fn delete(&self, bucket: &BucketId, id: &GroupId) -> Result<Tombstone> {
        let bucket = bucket.clone();
        let id = id.clone();

        self.with_conn(move |conn| {
            let ts = next_timestamp(conn, &bucket)?;

            let changed = conn.execute(
                "UPDATE groups SET deleted = 1, members = '[]', last_modified = ?3
                 WHERE bucket = ?1 AND id = ?2 AND deleted = 0",
                params![bucket.as_str(), id.as_str(), ts as i64],
            )?;

            if changed == 0 {
                return Err(StoreError::NotFound(id));
            }

            Ok(Tombstone {
                id,
                last_modified: ts,
            })
        })
        .await
    }

    async fn delete_many(&self, bucket: &BucketId, filters: &[Filter]) -> Result<Vec<Tombstone>> {
        let bucket = bucket.clone();
        let filters = filters.to_vec();

        self.with_conn(move |conn| {
            let matching: Vec<GroupId> = live_records(conn, &bucket)?
                .into_iter()
                .filter(|r| matches_all(&filters, r))
                .map(|r| r.id)
                .collect();

            let ts = next_timestamp(conn, &bucket)?;

            let tx = conn.transaction()?;
            let mut tombstones = Vec::with_capacity(matching.len());
            for id in matching {
                tx.execute(
                    "UPDATE groups SET deleted = 1, members = '[]', last_modified = ?3
                     WHERE bucket = ?1 AND id = ?2",
                    params![bucket.as_str(), id.as_str(), ts as i64],
                )?;
                tombstones.push(Tombstone {
                    id,
                    last_modified: ts,
                });
            }
            tx.commit()?;

            Ok(tombstones)
        })
        .await
    }
}

/// Get current time in milliseconds.
fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as u64
}

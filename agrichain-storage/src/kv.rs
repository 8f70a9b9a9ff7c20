//! Durable store adapter: JSON documents by string key over SQLite.
//!
//! One JSON document per string key, like a browser key-value store.
//! `get` never errors on missing or unparseable rows — callers treat those
//! as absent and reseed. Write failures surface as `AgriError::Storage`.
//! A single connection behind a mutex; `modify` holds the lock across the
//! whole read-modify-write cycle, so mutations are single-writer.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use tracing::{debug, warn};

use agrichain_core::errors::{AgriError, AgriResult};

pub struct KvStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl KvStore {
    /// Open a file-backed store, creating the schema if needed.
    pub fn open(path: &Path) -> AgriResult<Self> {
        let conn = Connection::open(path).map_err(sqe)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open an in-memory store (tests, demos).
    pub fn open_in_memory() -> AgriResult<Self> {
        let conn = Connection::open_in_memory().map_err(sqe)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    fn init_schema(conn: &Connection) -> AgriResult<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv_documents (
                key        TEXT PRIMARY KEY,
                doc        TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .map_err(sqe)
    }

    /// Store file path (None for in-memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the document under `key`. Missing rows and rows that fail to
    /// parse as JSON both read as `None` — corruption is the caller's cue
    /// to reseed, never an error.
    pub fn get(&self, key: &str) -> AgriResult<Option<Value>> {
        let conn = self.lock()?;
        Self::read_doc(&conn, key)
    }

    /// Write the document under `key`. Failures (e.g. disk full) are
    /// reported as `AgriError::Storage` and must propagate.
    pub fn set(&self, key: &str, doc: &Value) -> AgriResult<()> {
        let conn = self.lock()?;
        Self::write_doc(&conn, key, doc)
    }

    /// Remove the document under `key`, if present.
    pub fn remove(&self, key: &str) -> AgriResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM kv_documents WHERE key = ?1", params![key])
            .map_err(sqe)?;
        Ok(())
    }

    /// Read-modify-write under a single lock acquisition. The closure sees
    /// the current document (None if missing/corrupt) and returns the next
    /// document plus the operation's result.
    pub fn modify<T>(
        &self,
        key: &str,
        f: impl FnOnce(Option<Value>) -> AgriResult<(Value, T)>,
    ) -> AgriResult<T> {
        let conn = self.lock()?;
        let current = Self::read_doc(&conn, key)?;
        let (next, out) = f(current)?;
        Self::write_doc(&conn, key, &next)?;
        Ok(out)
    }

    fn read_doc(conn: &Connection, key: &str) -> AgriResult<Option<Value>> {
        let raw: Option<String> = conn
            .query_row(
                "SELECT doc FROM kv_documents WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(sqe)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key, error = %e, "stored document failed to parse, treating as absent");
                Ok(None)
            }
        }
    }

    fn write_doc(conn: &Connection, key: &str, doc: &Value) -> AgriResult<()> {
        let raw = serde_json::to_string(doc)?;
        conn.execute(
            "INSERT INTO kv_documents (key, doc, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET doc = excluded.doc, updated_at = excluded.updated_at",
            params![key, raw, Utc::now().to_rfc3339()],
        )
        .map_err(sqe)?;
        debug!(key, bytes = raw.len(), "document written");
        Ok(())
    }

    fn lock(&self) -> AgriResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AgriError::storage("store connection lock poisoned"))
    }
}

fn sqe(e: rusqlite::Error) -> AgriError {
    AgriError::storage(e.to_string())
}

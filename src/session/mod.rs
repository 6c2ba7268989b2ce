//! Session state backed by SQLite: the targeted API endpoint, stored
//! credentials, and the current organization / space.
//!
//! Use `":memory:"` for tests.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use rusqlite::Connection;

const KEY_TARGET: &str = "target";
const KEY_USERNAME: &str = "username";
const KEY_TOKEN: &str = "access_token";
const KEY_ORGANIZATION: &str = "organization";
const KEY_SPACE: &str = "space";

/// Who the user is acting as, for the pre-action lines commands print.
/// Fields are empty strings when unset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Identity {
    pub username: String,
    pub organization: String,
    pub space: String,
}

/// Persistent key-value session store.
pub struct Session {
    conn: Mutex<Connection>,
}

impl Session {
    /// Open or create the session table in the given database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).context("failed to open session database")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS session (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create session table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT value FROM session WHERE key = ?1")?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO session (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            [key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM session WHERE key = ?1", [key])?;
        Ok(())
    }

    pub fn target(&self) -> Result<Option<String>> {
        self.get(KEY_TARGET)
    }

    pub fn set_target(&self, url: &str) -> Result<()> {
        self.set(KEY_TARGET, url)
    }

    pub fn username(&self) -> Result<Option<String>> {
        self.get(KEY_USERNAME)
    }

    pub fn access_token(&self) -> Result<Option<String>> {
        self.get(KEY_TOKEN)
    }

    pub fn organization(&self) -> Result<Option<String>> {
        self.get(KEY_ORGANIZATION)
    }

    pub fn set_organization(&self, name: &str) -> Result<()> {
        self.set(KEY_ORGANIZATION, name)
    }

    pub fn space(&self) -> Result<Option<String>> {
        self.get(KEY_SPACE)
    }

    pub fn set_space(&self, name: &str) -> Result<()> {
        self.set(KEY_SPACE, name)
    }

    /// Store credentials. The target survives a login.
    pub fn login(&self, username: &str, token: &str) -> Result<()> {
        self.set(KEY_USERNAME, username)?;
        self.set(KEY_TOKEN, token)
    }

    /// Forget credentials and the current org / space. The target survives.
    pub fn logout(&self) -> Result<()> {
        self.remove(KEY_USERNAME)?;
        self.remove(KEY_TOKEN)?;
        self.remove(KEY_ORGANIZATION)?;
        self.remove(KEY_SPACE)
    }

    pub fn logged_in(&self) -> Result<bool> {
        Ok(self.access_token()?.is_some())
    }

    pub fn identity(&self) -> Result<Identity> {
        Ok(Identity {
            username: self.username()?.unwrap_or_default(),
            organization: self.organization()?.unwrap_or_default(),
            space: self.space()?.unwrap_or_default(),
        })
    }
}

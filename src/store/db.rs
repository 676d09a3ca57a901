use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::Result;

/// Handle to the bot's SQLite database. Entity operations live in the
/// sibling modules as further `impl Store` blocks.
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Open (or create) the database file and make sure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;\
             PRAGMA foreign_keys=ON;\
             PRAGMA busy_timeout=5000;",
        )?;
        let store = Self { conn };
        store.create_tables()?;
        info!(path = %path.display(), "store opened");
        Ok(store)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let store = Self { conn };
        store.create_tables()?;
        Ok(store)
    }

    fn create_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                account_id INTEGER NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS tags (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id),
                name TEXT NOT NULL,
                UNIQUE (user_id, name)
            );

            CREATE TABLE IF NOT EXISTS tasklists (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id),
                name TEXT NOT NULL,
                UNIQUE (user_id, name)
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id),
                name TEXT NOT NULL,
                estimated_secs INTEGER NOT NULL DEFAULT 0,
                tasklist_id INTEGER REFERENCES tasklists(id),
                list_seq INTEGER
            );
            CREATE INDEX IF NOT EXISTS idx_tasks_user ON tasks(user_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_tasklist ON tasks(tasklist_id);

            CREATE TABLE IF NOT EXISTS tag_tasks (
                tag_id INTEGER NOT NULL REFERENCES tags(id),
                task_id INTEGER NOT NULL REFERENCES tasks(id),
                PRIMARY KEY (tag_id, task_id)
            );
            CREATE INDEX IF NOT EXISTS idx_tag_tasks_task ON tag_tasks(task_id);

            CREATE TABLE IF NOT EXISTS plans (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id),
                date TEXT NOT NULL,
                UNIQUE (user_id, date)
            );

            CREATE TABLE IF NOT EXISTS task_plans (
                plan_id INTEGER NOT NULL REFERENCES plans(id),
                task_id INTEGER NOT NULL REFERENCES tasks(id),
                PRIMARY KEY (plan_id, task_id)
            );
            CREATE INDEX IF NOT EXISTS idx_task_plans_task ON task_plans(task_id);",
        )?;
        debug!("schema ready");
        Ok(())
    }

    /// Expose the raw connection (for tests or advanced usage).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Flush and close the connection, surfacing errors `Drop` would swallow.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| e)?;
        info!("store closed");
        Ok(())
    }
}

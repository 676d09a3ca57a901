use rusqlite::{OptionalExtension, params};

use crate::error::{BotError, Result};
use crate::model::{Tag, Task, User};
use crate::store::db::Store;
use crate::store::tasks::{TASK_COLUMNS, task_from_row};

impl Store {
    /// Get or create the user's tag with this name.
    pub fn tag_or_create(&self, user: &User, name: &str) -> Result<Tag> {
        self.conn.execute(
            "INSERT OR IGNORE INTO tags (user_id, name) VALUES (?1, ?2)",
            params![user.id, name],
        )?;
        self.tag_by_name(user, name)
    }

    pub fn tag_by_name(&self, user: &User, name: &str) -> Result<Tag> {
        self.conn
            .query_row(
                "SELECT id, user_id, name FROM tags WHERE user_id = ?1 AND name = ?2",
                params![user.id, name],
                |row| {
                    Ok(Tag {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| BotError::TagNotFound(name.to_string()))
    }

    /// Attach a tag. Attaching twice keeps a single association.
    pub fn tag_task(&self, task: &Task, tag: &Tag) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO tag_tasks (tag_id, task_id) VALUES (?1, ?2)",
            params![tag.id, task.id],
        )?;
        Ok(())
    }

    /// Detach a tag. Detaching an absent association is a no-op.
    pub fn untag_task(&self, task: &Task, tag: &Tag) -> Result<()> {
        self.conn.execute(
            "DELETE FROM tag_tasks WHERE tag_id = ?1 AND task_id = ?2",
            params![tag.id, task.id],
        )?;
        Ok(())
    }

    /// Tasks of `user` carrying the user's tag `name`; empty if no such tag.
    pub fn tasks_by_tag(&self, user: &User, name: &str) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks t
             JOIN tag_tasks tt ON tt.task_id = t.id
             JOIN tags g ON g.id = tt.tag_id
             WHERE g.name = ?2 AND g.user_id = ?1 AND t.user_id = ?1
             ORDER BY t.id"
        ))?;
        let tasks = stmt
            .query_map(params![user.id, name], task_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }
}

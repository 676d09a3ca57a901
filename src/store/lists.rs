use rusqlite::{OptionalExtension, params};

use crate::error::{BotError, Result};
use crate::model::{Task, TaskList, User};
use crate::store::db::Store;
use crate::store::tasks::{TASK_COLUMNS, task_from_row};

impl Store {
    pub fn list_or_create(&self, user: &User, name: &str) -> Result<TaskList> {
        self.conn.execute(
            "INSERT OR IGNORE INTO tasklists (user_id, name) VALUES (?1, ?2)",
            params![user.id, name],
        )?;
        self.list_by_name(user, name)
    }

    pub fn list_by_name(&self, user: &User, name: &str) -> Result<TaskList> {
        self.conn
            .query_row(
                "SELECT id, user_id, name FROM tasklists WHERE user_id = ?1 AND name = ?2",
                params![user.id, name],
                |row| {
                    Ok(TaskList {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| BotError::ListNotFound(name.to_string()))
    }

    /// Move a task into `list`, replacing whatever list it was in before.
    /// The task goes to the end of the list's insertion order.
    pub fn add_to_list(&self, list: &TaskList, task: &Task) -> Result<Task> {
        self.conn.execute(
            "UPDATE tasks SET tasklist_id = ?1,
                list_seq = (SELECT COALESCE(MAX(list_seq), 0) + 1 FROM tasks WHERE tasklist_id = ?1)
             WHERE id = ?2 AND user_id = ?3",
            params![list.id, task.id, task.user_id],
        )?;
        Ok(Task {
            tasklist_id: Some(list.id),
            ..task.clone()
        })
    }

    pub fn remove_from_list(&self, task: &Task) -> Result<Task> {
        self.conn.execute(
            "UPDATE tasks SET tasklist_id = NULL, list_seq = NULL WHERE id = ?1 AND user_id = ?2",
            params![task.id, task.user_id],
        )?;
        Ok(Task {
            tasklist_id: None,
            ..task.clone()
        })
    }

    /// Tasks currently in `list`, in the order they were added.
    pub fn tasks_in_list(&self, list: &TaskList) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks t
             WHERE t.tasklist_id = ?1 AND t.user_id = ?2
             ORDER BY t.list_seq, t.id"
        ))?;
        let tasks = stmt
            .query_map(params![list.id, list.user_id], task_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }
}

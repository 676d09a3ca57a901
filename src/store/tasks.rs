use rusqlite::{OptionalExtension, Row, params};
use tracing::debug;

use crate::error::{BotError, Result};
use crate::model::{Task, User, minutes_to_secs};
use crate::store::db::Store;

pub(crate) const TASK_COLUMNS: &str = "t.id, t.user_id, t.name, t.estimated_secs, t.tasklist_id";

pub(crate) fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        estimated_secs: row.get(3)?,
        tasklist_id: row.get(4)?,
    })
}

impl Store {
    /// Fetch a task by id on behalf of `user`.
    ///
    /// This is the only way handlers obtain a [`Task`]. Ids that do not
    /// exist and ids that belong to another user both yield
    /// [`BotError::TaskNotFound`], so nothing leaks about other users' data.
    pub fn task(&self, user: &User, id: u64) -> Result<Task> {
        // Rowids are i64; larger ids cannot exist and would not bind.
        if i64::try_from(id).is_err() {
            return Err(BotError::TaskNotFound(id));
        }
        let task = self
            .conn
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks t WHERE t.id = ?1"),
                params![id],
                task_from_row,
            )
            .optional()?;
        match task {
            Some(task) if task.is_owned_by(user) => Ok(task),
            Some(_) => {
                debug!(task_id = id, user_id = user.id, "task belongs to another user");
                Err(BotError::TaskNotFound(id))
            }
            None => Err(BotError::TaskNotFound(id)),
        }
    }

    pub fn create_task(&self, user: &User, name: &str, minutes: i64) -> Result<Task> {
        let secs = minutes_to_secs(minutes);
        self.conn.execute(
            "INSERT INTO tasks (user_id, name, estimated_secs) VALUES (?1, ?2, ?3)",
            params![user.id, name, secs],
        )?;
        let id = self.conn.last_insert_rowid() as u64;
        Ok(Task {
            id,
            user_id: user.id,
            name: name.to_string(),
            estimated_secs: secs,
            tasklist_id: None,
        })
    }

    /// Store an estimate given in minutes. Any integer is accepted here.
    pub fn set_estimate(&self, task: &Task, minutes: i64) -> Result<Task> {
        let secs = minutes_to_secs(minutes);
        self.conn.execute(
            "UPDATE tasks SET estimated_secs = ?2 WHERE id = ?1 AND user_id = ?3",
            params![task.id, secs, task.user_id],
        )?;
        Ok(Task {
            estimated_secs: secs,
            ..task.clone()
        })
    }

    /// All tasks of a user, oldest first.
    pub fn tasks_for_user(&self, user: &User) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks t WHERE t.user_id = ?1 ORDER BY t.id"
        ))?;
        let tasks = stmt
            .query_map(params![user.id], task_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Delete a task together with its tag and plan memberships.
    pub fn delete_task(&self, task: &Task) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM tag_tasks WHERE task_id = ?1", params![task.id])?;
        tx.execute("DELETE FROM task_plans WHERE task_id = ?1", params![task.id])?;
        tx.execute(
            "DELETE FROM tasks WHERE id = ?1 AND user_id = ?2",
            params![task.id, task.user_id],
        )?;
        tx.commit()?;
        debug!(task_id = task.id, "task deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn count(store: &Store, sql: &str, id: u64) -> i64 {
        store.conn().query_row(sql, params![id], |r| r.get(0)).unwrap()
    }

    #[test]
    fn task_of_another_user_is_not_found() {
        let store = Store::open_memory().unwrap();
        let alice = store.user(1).unwrap();
        let bob = store.user(2).unwrap();
        let task = store.create_task(&alice, "secret", 0).unwrap();

        assert_eq!(store.task(&alice, task.id).unwrap(), task);
        assert!(matches!(
            store.task(&bob, task.id),
            Err(BotError::TaskNotFound(id)) if id == task.id
        ));
    }

    #[test]
    fn missing_task_is_not_found() {
        let store = Store::open_memory().unwrap();
        let user = store.user(1).unwrap();
        assert!(matches!(
            store.task(&user, 77),
            Err(BotError::TaskNotFound(77))
        ));
    }

    #[test]
    fn id_beyond_rowid_range_is_not_found() {
        let store = Store::open_memory().unwrap();
        let user = store.user(1).unwrap();
        assert!(matches!(
            store.task(&user, u64::MAX),
            Err(BotError::TaskNotFound(u64::MAX))
        ));
    }

    #[test]
    fn estimate_is_stored_in_seconds() {
        let store = Store::open_memory().unwrap();
        let user = store.user(1).unwrap();
        let task = store.create_task(&user, "write report", 0).unwrap();
        assert_eq!(task.estimated_secs, 0);

        store.set_estimate(&task, 7).unwrap();
        let reread = store.task(&user, task.id).unwrap();
        assert_eq!(reread.estimated_secs, 420);
    }

    #[test]
    fn tasks_for_user_only_lists_own_tasks() {
        let store = Store::open_memory().unwrap();
        let alice = store.user(1).unwrap();
        let bob = store.user(2).unwrap();
        store.create_task(&alice, "a1", 0).unwrap();
        store.create_task(&bob, "b1", 0).unwrap();
        store.create_task(&alice, "a2", 5).unwrap();

        let names: Vec<String> = store
            .tasks_for_user(&alice)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["a1", "a2"]);
    }

    #[test]
    fn delete_removes_join_rows() {
        let store = Store::open_memory().unwrap();
        let user = store.user(1).unwrap();
        let task = store.create_task(&user, "planned and tagged", 10).unwrap();
        let tag = store.tag_or_create(&user, "work").unwrap();
        store.tag_task(&task, &tag).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let plan = store.plan_or_create(&user, date).unwrap();
        store.plan_task(&plan, &task).unwrap();

        store.delete_task(&task).unwrap();

        assert_eq!(
            count(&store, "SELECT COUNT(*) FROM tag_tasks WHERE task_id = ?1", task.id),
            0
        );
        assert_eq!(
            count(&store, "SELECT COUNT(*) FROM task_plans WHERE task_id = ?1", task.id),
            0
        );
        assert!(store.tasks_by_tag(&user, "work").unwrap().is_empty());
        assert!(store.tasks_by_plan_date(&user, date).unwrap().is_empty());
        assert!(store.tasks_for_user(&user).unwrap().is_empty());
    }
}

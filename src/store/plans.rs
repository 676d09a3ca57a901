use chrono::NaiveDate;
use rusqlite::params;

use crate::error::Result;
use crate::model::{DATE_FORMAT, Plan, Task, User};
use crate::store::db::Store;
use crate::store::tasks::{TASK_COLUMNS, task_from_row};

fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

impl Store {
    pub fn plan_or_create(&self, user: &User, date: NaiveDate) -> Result<Plan> {
        let key = date_key(date);
        self.conn.execute(
            "INSERT OR IGNORE INTO plans (user_id, date) VALUES (?1, ?2)",
            params![user.id, &key],
        )?;
        let id: u64 = self.conn.query_row(
            "SELECT id FROM plans WHERE user_id = ?1 AND date = ?2",
            params![user.id, &key],
            |row| row.get(0),
        )?;
        Ok(Plan {
            id,
            user_id: user.id,
            date,
        })
    }

    /// Schedule a task. Scheduling it twice keeps one entry.
    pub fn plan_task(&self, plan: &Plan, task: &Task) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO task_plans (plan_id, task_id) VALUES (?1, ?2)",
            params![plan.id, task.id],
        )?;
        Ok(())
    }

    /// Unschedule a task. Unscheduling an absent task is a no-op.
    pub fn unplan_task(&self, plan: &Plan, task: &Task) -> Result<()> {
        self.conn.execute(
            "DELETE FROM task_plans WHERE plan_id = ?1 AND task_id = ?2",
            params![plan.id, task.id],
        )?;
        Ok(())
    }

    /// Tasks of `user` scheduled on `date`, in scheduling order.
    pub fn tasks_by_plan_date(&self, user: &User, date: NaiveDate) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks t
             JOIN task_plans tp ON tp.task_id = t.id
             JOIN plans p ON p.id = tp.plan_id
             WHERE p.date = ?2 AND p.user_id = ?1 AND t.user_id = ?1
             ORDER BY tp.rowid"
        ))?;
        let tasks = stmt
            .query_map(params![user.id, date_key(date)], task_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(tasks)
    }
}

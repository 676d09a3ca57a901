use tracing::info;

use crate::commands::grammar::Args;
use crate::commands::{Context, Reply};
use crate::error::Result;
use crate::model::User;
use crate::output::format_minutes;

pub fn create(ctx: &Context, user: &User, args: &Args) -> Result<Reply> {
    let name = args.required_text("task name")?;
    let minutes = args.minutes("minutes").unwrap_or(0);
    let task = ctx.store.create_task(user, name, i64::from(minutes))?;
    info!(user_id = user.id, task_id = task.id, "task created");
    Ok(Reply::Text(format!("Task {} saved.", task.id)))
}

pub fn estimate(ctx: &Context, user: &User, args: &Args) -> Result<Reply> {
    let minutes = args.minutes("minutes").unwrap_or(0);
    let task = ctx.store.task(user, args.task_id("task number")?)?;
    let task = ctx.store.set_estimate(&task, i64::from(minutes))?;
    Ok(Reply::Text(format!(
        "Estimate for task {} set to {} m.",
        task.id,
        format_minutes(task.estimated_secs)
    )))
}

pub fn delete(ctx: &Context, user: &User, args: &Args) -> Result<Reply> {
    let task = ctx.store.task(user, args.task_id("task number")?)?;
    ctx.store.delete_task(&task)?;
    info!(user_id = user.id, task_id = task.id, "task deleted");
    Ok(Reply::Text(format!("Task {} deleted.", task.id)))
}

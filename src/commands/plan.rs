use tracing::debug;

use crate::commands::grammar::Args;
use crate::commands::{Context, Reply};
use crate::error::{BotError, Result};
use crate::model::{Task, User};
use crate::output;

const IDS: &str = "task number";

/// Resolve the variadic id list, dropping ids the user does not own.
fn owned_tasks(ctx: &Context, user: &User, args: &Args) -> Result<Vec<Task>> {
    let mut tasks = Vec::new();
    for id in args.task_ids(IDS) {
        match ctx.store.task(user, id) {
            Ok(task) => tasks.push(task),
            Err(BotError::TaskNotFound(id)) => debug!(task_id = id, "skipping unknown task"),
            Err(e) => return Err(e),
        }
    }
    Ok(tasks)
}

fn updated(ctx: &Context, date: &str) -> Reply {
    Reply::Text(format!("Plan for {} updated.", ctx.markup.bold(date)))
}

pub fn plan(ctx: &Context, user: &User, args: &Args) -> Result<Reply> {
    let date = args.date("YYYY-MM-DD")?;
    let plan = ctx.store.plan_or_create(user, date)?;
    let day = plan.date_string();

    if args.supplied(IDS) == 0 {
        let tasks = ctx.store.tasks_by_plan_date(user, date)?;
        return Ok(Reply::Text(output::plan_report(&day, &tasks, ctx.markup)));
    }

    for task in owned_tasks(ctx, user, args)? {
        ctx.store.plan_task(&plan, &task)?;
    }
    Ok(updated(ctx, &day))
}

pub fn unplan(ctx: &Context, user: &User, args: &Args) -> Result<Reply> {
    let date = args.date("YYYY-MM-DD")?;
    let plan = ctx.store.plan_or_create(user, date)?;
    for task in owned_tasks(ctx, user, args)? {
        ctx.store.unplan_task(&plan, &task)?;
    }
    Ok(updated(ctx, &plan.date_string()))
}

use crate::commands::grammar::Args;
use crate::commands::{Context, Reply};
use crate::error::Result;
use crate::model::User;
use crate::output;

pub fn show(ctx: &Context, user: &User, args: &Args) -> Result<Reply> {
    let name = args.required_text("list name")?;
    let list = ctx.store.list_by_name(user, name)?;
    let tasks = ctx.store.tasks_in_list(&list)?;
    Ok(Reply::Text(output::task_listing(
        &format!("Task list \"{}\":", list.name),
        &tasks,
        ctx.markup,
    )))
}

pub fn add(ctx: &Context, user: &User, args: &Args) -> Result<Reply> {
    let task = ctx.store.task(user, args.task_id("task number")?)?;
    let list = ctx.store.list_or_create(user, args.required_text("list name")?)?;
    ctx.store.add_to_list(&list, &task)?;
    Ok(Reply::Text("Task added to task list.".to_string()))
}

pub fn remove(ctx: &Context, user: &User, args: &Args) -> Result<Reply> {
    let task = ctx.store.task(user, args.task_id("task number")?)?;
    ctx.store.remove_from_list(&task)?;
    Ok(Reply::Text("Task removed from task list.".to_string()))
}

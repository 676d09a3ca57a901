use crate::commands::grammar::Args;
use crate::commands::{Context, Reply};
use crate::error::Result;
use crate::model::User;
use crate::output;

pub fn run(ctx: &Context, user: &User, args: &Args) -> Result<Reply> {
    let (header, tasks) = match args.text("tag name") {
        Some(tag) => (
            format!("Tasks tagged \"{tag}\":"),
            ctx.store.tasks_by_tag(user, tag)?,
        ),
        None => ("Your tasks:".to_string(), ctx.store.tasks_for_user(user)?),
    };
    Ok(Reply::Text(output::task_listing(&header, &tasks, ctx.markup)))
}

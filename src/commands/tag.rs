use crate::commands::grammar::Args;
use crate::commands::{Context, Reply};
use crate::error::Result;
use crate::model::User;

pub fn tag(ctx: &Context, user: &User, args: &Args) -> Result<Reply> {
    let task = ctx.store.task(user, args.task_id("task number")?)?;
    let tag = ctx.store.tag_or_create(user, args.required_text("tag name")?)?;
    ctx.store.tag_task(&task, &tag)?;
    Ok(Reply::Text("Tag added to task.".to_string()))
}

pub fn untag(ctx: &Context, user: &User, args: &Args) -> Result<Reply> {
    let task = ctx.store.task(user, args.task_id("task number")?)?;
    let tag = ctx.store.tag_by_name(user, args.required_text("tag name")?)?;
    ctx.store.untag_task(&task, &tag)?;
    Ok(Reply::Text("Tag removed from task.".to_string()))
}

#[cfg(test)]
mod tests {
    use crate::commands::test_support::{dispatcher, say};

    #[test]
    fn tag_then_list_by_tag() {
        let d = dispatcher();
        say(&d, 1, "/task 30 write report");
        say(&d, 1, "/task buy milk");
        assert_eq!(say(&d, 1, "/tag 1 deep work"), "Tag added to task.");
        assert_eq!(
            say(&d, 1, "/list deep work"),
            "Tasks tagged \"deep work\":\n1. write report (30m)\n"
        );
    }

    #[test]
    fn untag_twice_succeeds() {
        let d = dispatcher();
        say(&d, 1, "/task t");
        say(&d, 1, "/tag 1 work");
        assert_eq!(say(&d, 1, "/untag 1 work"), "Tag removed from task.");
        assert_eq!(say(&d, 1, "/untag 1 work"), "Tag removed from task.");
        assert_eq!(say(&d, 1, "/list work"), "Tasks tagged \"work\":\nNo tasks.\n");
    }

    #[test]
    fn untag_unknown_tag_is_not_found() {
        let d = dispatcher();
        say(&d, 1, "/task t");
        assert_eq!(say(&d, 1, "/untag 1 work"), "Tag \"work\" not found.");
    }

    #[test]
    fn cannot_tag_another_users_task() {
        let d = dispatcher();
        say(&d, 1, "/task private");
        assert_eq!(say(&d, 2, "/tag 1 stolen"), "Task 1 not found.");
        let store = &d.context().store;
        let intruder = store.user(2).unwrap();
        assert!(store.tag_by_name(&intruder, "stolen").is_err());
    }
}

pub mod grammar;
pub mod lisy;
pub mod list;
pub mod plan;
pub mod start;
pub mod tag;
pub mod task;
pub mod tasklist;

use std::path::PathBuf;

use tracing::{debug, error};

use crate::error::{BotError, Result};
use crate::model::User;
use crate::output::Markup;
use crate::store::Store;
use grammar::{ArgKind, ArgSpec, Args, Grammar};

/// Everything a handler may touch, constructed once at startup.
pub struct Context {
    pub store: Store,
    pub markup: Markup,
    pub asset_path: PathBuf,
}

/// What the transport should send back for one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Photo { file_name: String, bytes: Vec<u8> },
}

pub type Handler = fn(&Context, &User, &Args) -> Result<Reply>;

/// Help text section a command is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Listing,
    Tasks,
    Tags,
    Lists,
    Plans,
    Hidden,
}

pub struct CommandSpec {
    pub name: &'static str,
    pub section: Section,
    pub summary: &'static str,
    pub grammar: Grammar,
    pub handler: Handler,
}

impl CommandSpec {
    pub fn usage(&self) -> String {
        self.grammar.usage(self.name)
    }
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "start",
        section: Section::Hidden,
        summary: "show this help",
        grammar: Grammar::new(&[]).ignoring_trailing(),
        handler: start::run,
    },
    CommandSpec {
        name: "list",
        section: Section::Listing,
        summary: "show all your tasks, or only those carrying a tag",
        grammar: Grammar::new(&[ArgSpec::optional("tag name", ArgKind::Text)]),
        handler: list::run,
    },
    CommandSpec {
        name: "task",
        section: Section::Tasks,
        summary: "create a task, optionally with an estimate in minutes",
        grammar: Grammar::new(&[
            ArgSpec::optional("minutes", ArgKind::Minutes),
            ArgSpec::required("task name", ArgKind::Text),
        ]),
        handler: task::create,
    },
    CommandSpec {
        name: "est",
        section: Section::Tasks,
        summary: "set the estimated time of a task in minutes",
        grammar: Grammar::new(&[
            ArgSpec::required("minutes", ArgKind::Minutes),
            ArgSpec::required("task number", ArgKind::TaskId),
        ]),
        handler: task::estimate,
    },
    CommandSpec {
        name: "delete",
        section: Section::Tasks,
        summary: "delete a task",
        grammar: Grammar::new(&[ArgSpec::required("task number", ArgKind::TaskId)]),
        handler: task::delete,
    },
    CommandSpec {
        name: "tag",
        section: Section::Tags,
        summary: "add a tag to a task",
        grammar: Grammar::new(&[
            ArgSpec::required("task number", ArgKind::TaskId),
            ArgSpec::required("tag name", ArgKind::Text),
        ]),
        handler: tag::tag,
    },
    CommandSpec {
        name: "untag",
        section: Section::Tags,
        summary: "remove a tag from a task",
        grammar: Grammar::new(&[
            ArgSpec::required("task number", ArgKind::TaskId),
            ArgSpec::required("tag name", ArgKind::Text),
        ]),
        handler: tag::untag,
    },
    CommandSpec {
        name: "addtolist",
        section: Section::Lists,
        summary: "move a task into a task list",
        grammar: Grammar::new(&[
            ArgSpec::required("task number", ArgKind::TaskId),
            ArgSpec::required("list name", ArgKind::Text),
        ]),
        handler: tasklist::add,
    },
    CommandSpec {
        name: "tasklist",
        section: Section::Lists,
        summary: "show the tasks in a task list",
        grammar: Grammar::new(&[ArgSpec::required("list name", ArgKind::Text)]),
        handler: tasklist::show,
    },
    CommandSpec {
        name: "removefromlist",
        section: Section::Lists,
        summary: "take a task out of its task list",
        grammar: Grammar::new(&[ArgSpec::required("task number", ArgKind::TaskId)]),
        handler: tasklist::remove,
    },
    CommandSpec {
        name: "plan",
        section: Section::Plans,
        summary: "show the plan for a day, or add tasks to it",
        grammar: Grammar::new(&[
            ArgSpec::required("YYYY-MM-DD", ArgKind::Date),
            ArgSpec::variadic("task number", ArgKind::TaskId),
        ]),
        handler: plan::plan,
    },
    CommandSpec {
        name: "unplan",
        section: Section::Plans,
        summary: "remove tasks from the plan for a day",
        grammar: Grammar::new(&[
            ArgSpec::required("YYYY-MM-DD", ArgKind::Date),
            ArgSpec::variadic("task number", ArgKind::TaskId),
        ]),
        handler: plan::unplan,
    },
    CommandSpec {
        name: "lisy",
        section: Section::Hidden,
        summary: "two foxes",
        grammar: Grammar::new(&[]),
        handler: lisy::run,
    },
];

pub fn find(name: &str) -> Option<&'static CommandSpec> {
    COMMANDS.iter().find(|c| c.name == name)
}

/// Split `/name@bot rest` into a normalized command name and its argument
/// text. Messages that are not commands yield `None`.
pub fn split_command(text: &str) -> Option<(String, &str)> {
    let body = text.trim_start().strip_prefix('/')?;
    let (head, rest) = match body.find(char::is_whitespace) {
        Some(idx) => (&body[..idx], &body[idx..]),
        None => (body, ""),
    };
    let name = head.split('@').next().unwrap_or(head).to_lowercase();
    if name.is_empty() {
        return None;
    }
    Some((name, rest))
}

/// Routes chat messages to command handlers and turns every outcome,
/// including failures, into a reply.
pub struct Dispatcher {
    ctx: Context,
}

impl Dispatcher {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn into_context(self) -> Context {
        self.ctx
    }

    /// Handle one message from `account_id`. Returns `None` for text that
    /// is not a command.
    pub fn dispatch(&self, account_id: i64, text: &str) -> Option<Reply> {
        let (name, rest) = split_command(text)?;
        debug!(account_id, command = %name, "dispatching");
        let reply = match self.execute(account_id, &name, rest) {
            Ok(reply) => reply,
            Err(e) if e.is_user_facing() => {
                debug!(command = %name, code = e.code(), "command rejected");
                Reply::Text(error_reply(&e, self.ctx.markup))
            }
            Err(e) => {
                error!(command = %name, code = e.code(), error = %e, "command failed");
                Reply::Text("Something went wrong, please try again.".to_string())
            }
        };
        Some(reply)
    }

    fn execute(&self, account_id: i64, name: &str, rest: &str) -> Result<Reply> {
        let spec = find(name).ok_or_else(|| BotError::UnknownCommand(name.to_string()))?;
        let user = self.ctx.store.user(account_id)?;
        let args = spec.grammar.parse(spec.name, rest)?;
        (spec.handler)(&self.ctx, &user, &args)
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Reply text for errors the user can act on.
pub fn error_reply(err: &BotError, markup: Markup) -> String {
    match err {
        BotError::TaskNotFound(id) => format!("Task {id} not found."),
        BotError::TagNotFound(name) => format!("Tag \"{}\" not found.", markup.escape(name)),
        BotError::ListNotFound(name) => {
            format!("Task list \"{}\" not found.", markup.escape(name))
        }
        BotError::Usage { reason, usage } => format!(
            "{}.\nUsage: {}",
            markup.escape(&capitalize(reason)),
            markup.italic(usage)
        ),
        BotError::InvalidDate { token, usage } => format!(
            "Invalid date \"{}\", expected YYYY-MM-DD.\nUsage: {}",
            markup.escape(token),
            markup.italic(usage)
        ),
        BotError::UnknownCommand(name) => format!(
            "Unknown command /{}. Send /start for the list of commands.",
            markup.escape(name)
        ),
        other => markup.escape(&other.to_string()),
    }
}

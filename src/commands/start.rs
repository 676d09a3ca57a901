use crate::commands::grammar::Args;
use crate::commands::{COMMANDS, Context, Reply, Section};
use crate::error::Result;
use crate::model::User;
use crate::output::Markup;

const SECTIONS: &[(Section, &str)] = &[
    (Section::Listing, "List tasks"),
    (Section::Tasks, "Edit tasks"),
    (Section::Tags, "Edit tags"),
    (Section::Lists, "Edit task lists"),
    (Section::Plans, "Edit plans"),
];

/// Help text generated from the command table.
pub fn help_text(markup: Markup) -> String {
    let mut msg = String::from("These commands are available:\n\n");
    msg.push_str(&markup.italic("<argument> is required, [argument] is optional"));
    msg.push('\n');
    for (section, title) in SECTIONS {
        msg.push('\n');
        msg.push_str(&markup.bold(title));
        msg.push('\n');
        for spec in COMMANDS.iter().filter(|c| c.section == *section) {
            msg.push_str(&format!(
                "{} - {}\n",
                markup.escape(&spec.usage()),
                spec.summary
            ));
        }
    }
    msg
}

pub fn run(ctx: &Context, _user: &User, _args: &Args) -> Result<Reply> {
    Ok(Reply::Text(help_text(ctx.markup)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{dispatcher, say};

    #[test]
    fn help_lists_every_visible_command() {
        let help = help_text(Markup::Plain);
        for spec in COMMANDS.iter().filter(|c| c.section != Section::Hidden) {
            assert!(help.contains(&spec.usage()), "missing {}", spec.name);
        }
        assert!(!help.contains("/lisy"));
    }

    #[test]
    fn html_help_escapes_placeholders() {
        let help = help_text(Markup::Html);
        assert!(help.contains("/delete &lt;task number&gt; - delete a task"));
        assert!(help.contains("<b>Edit plans</b>"));
    }

    #[test]
    fn start_accepts_deep_link_payload() {
        let d = dispatcher();
        assert_eq!(say(&d, 1, "/start from-website"), help_text(Markup::Plain));
    }
}

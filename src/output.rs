use clap::ValueEnum;

use crate::model::Task;

/// How replies are marked up. Telegram renders the HTML subset; the
/// console has no renderer, so it gets plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Markup {
    Html,
    Plain,
}

impl Markup {
    /// Escape user-supplied text so it cannot inject markup.
    pub fn escape(self, text: &str) -> String {
        match self {
            Self::Html => {
                let mut out = String::with_capacity(text.len());
                for c in text.chars() {
                    match c {
                        '&' => out.push_str("&amp;"),
                        '<' => out.push_str("&lt;"),
                        '>' => out.push_str("&gt;"),
                        _ => out.push(c),
                    }
                }
                out
            }
            Self::Plain => text.to_string(),
        }
    }

    pub fn bold(self, text: &str) -> String {
        match self {
            Self::Html => format!("<b>{}</b>", self.escape(text)),
            Self::Plain => text.to_string(),
        }
    }

    pub fn italic(self, text: &str) -> String {
        match self {
            Self::Html => format!("<i>{}</i>", self.escape(text)),
            Self::Plain => text.to_string(),
        }
    }

    /// Telegram `parse_mode` value, if any.
    pub fn parse_mode(self) -> Option<&'static str> {
        match self {
            Self::Html => Some("HTML"),
            Self::Plain => None,
        }
    }
}

/// Render a duration stored in seconds as minutes, dropping a zero fraction.
pub fn format_minutes(secs: i64) -> String {
    if secs % 60 == 0 {
        (secs / 60).to_string()
    } else {
        format!("{:.1}", secs as f64 / 60.0)
    }
}

pub fn task_line(task: &Task, markup: Markup) -> String {
    format!(
        "{}. {} {}",
        task.id,
        markup.escape(&task.name),
        markup.italic(&format!("({}m)", format_minutes(task.estimated_secs)))
    )
}

/// A header line followed by one line per task.
pub fn task_listing(header: &str, tasks: &[Task], markup: Markup) -> String {
    let mut msg = format!("{}\n", markup.escape(header));
    if tasks.is_empty() {
        msg.push_str(&markup.italic("No tasks."));
        msg.push('\n');
    }
    for task in tasks {
        msg.push_str(&task_line(task, markup));
        msg.push('\n');
    }
    msg
}

/// Tasks planned for a date plus their summed estimate.
pub fn plan_report(date: &str, tasks: &[Task], markup: Markup) -> String {
    let mut msg = task_listing(&format!("Plan for {date}:"), tasks, markup);
    let total: i64 = tasks.iter().map(|t| t.estimated_secs).sum();
    msg.push_str(&format!(
        "Estimated time for {}: {}",
        markup.bold(date),
        markup.italic(&format!("{} m", format_minutes(total)))
    ));
    msg
}

pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

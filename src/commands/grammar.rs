//! Positional argument grammar shared by every chat command.
//!
//! A command declares an ordered list of [`ArgSpec`]s; [`Grammar::parse`]
//! evaluates it once over the whitespace-separated tokens that follow the
//! command name. The same declaration produces the usage line shown on
//! bad input and in the help text.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{BotError, Result};
use crate::model::DATE_FORMAT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// Numeric task id.
    TaskId,
    /// Non-negative whole minutes.
    Minutes,
    /// Calendar date written as `YYYY-MM-DD`.
    Date,
    /// The rest of the line, words joined with single spaces.
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Required,
    Optional,
    /// Zero or more tokens; tokens that fail to parse are skipped.
    Variadic,
}

#[derive(Debug, Clone, Copy)]
pub struct ArgSpec {
    pub name: &'static str,
    pub kind: ArgKind,
    pub arity: Arity,
}

impl ArgSpec {
    pub const fn required(name: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            kind,
            arity: Arity::Required,
        }
    }

    pub const fn optional(name: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            kind,
            arity: Arity::Optional,
        }
    }

    pub const fn variadic(name: &'static str, kind: ArgKind) -> Self {
        Self {
            name,
            kind,
            arity: Arity::Variadic,
        }
    }

    fn placeholder(&self) -> String {
        let dots = if self.kind == ArgKind::Text || self.arity == Arity::Variadic {
            "..."
        } else {
            ""
        };
        match self.arity {
            Arity::Required => format!("<{}{dots}>", self.name),
            Arity::Optional | Arity::Variadic => format!("[{}{dots}]", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    TaskId(u64),
    Minutes(u32),
    Date(NaiveDate),
    Text(String),
    List { items: Vec<Value>, supplied: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct Grammar {
    pub args: &'static [ArgSpec],
    pub ignore_trailing: bool,
}

impl Grammar {
    pub const fn new(args: &'static [ArgSpec]) -> Self {
        Self {
            args,
            ignore_trailing: false,
        }
    }

    /// Accept and drop tokens beyond the declared arguments.
    pub const fn ignoring_trailing(self) -> Self {
        Self {
            ignore_trailing: true,
            ..self
        }
    }

    pub fn usage(&self, command: &str) -> String {
        let mut usage = format!("/{command}");
        for spec in self.args {
            usage.push(' ');
            usage.push_str(&spec.placeholder());
        }
        usage
    }

    pub fn parse(&self, command: &str, raw: &str) -> Result<Args> {
        let usage = self.usage(command);
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let mut values = Vec::with_capacity(self.args.len());
        let mut pos = 0;

        for (i, spec) in self.args.iter().enumerate() {
            let needed_after = self.args[i + 1..]
                .iter()
                .filter(|a| a.arity == Arity::Required)
                .count();
            let remaining = tokens.len() - pos;

            if spec.kind == ArgKind::Text && spec.arity != Arity::Variadic {
                let take = remaining.saturating_sub(needed_after);
                if take == 0 {
                    if spec.arity == Arity::Required {
                        return Err(missing(spec, &usage));
                    }
                    continue;
                }
                values.push((spec.name, Value::Text(tokens[pos..pos + take].join(" "))));
                pos += take;
                continue;
            }

            match spec.arity {
                Arity::Required => {
                    let token = tokens.get(pos).ok_or_else(|| missing(spec, &usage))?;
                    let value = parse_scalar(spec.kind, token)
                        .ok_or_else(|| invalid(spec, token, &usage))?;
                    values.push((spec.name, value));
                    pos += 1;
                }
                Arity::Optional => {
                    if remaining > needed_after
                        && let Some(value) = parse_scalar(spec.kind, tokens[pos])
                    {
                        values.push((spec.name, value));
                        pos += 1;
                    }
                }
                Arity::Variadic => {
                    let supplied = &tokens[pos..];
                    let mut items = Vec::with_capacity(supplied.len());
                    for token in supplied {
                        match parse_scalar(spec.kind, token) {
                            Some(value) => items.push(value),
                            None => debug!(command, token, "skipping unparseable argument"),
                        }
                    }
                    values.push((
                        spec.name,
                        Value::List {
                            items,
                            supplied: supplied.len(),
                        },
                    ));
                    pos = tokens.len();
                }
            }
        }

        if pos < tokens.len() && !self.ignore_trailing {
            return Err(BotError::Usage {
                reason: format!("unexpected argument '{}'", tokens[pos]),
                usage,
            });
        }

        Ok(Args { values, usage })
    }
}

fn missing(spec: &ArgSpec, usage: &str) -> BotError {
    BotError::Usage {
        reason: format!("missing argument {}", spec.placeholder()),
        usage: usage.to_string(),
    }
}

fn invalid(spec: &ArgSpec, token: &str, usage: &str) -> BotError {
    match spec.kind {
        ArgKind::Date => BotError::InvalidDate {
            token: token.to_string(),
            usage: usage.to_string(),
        },
        ArgKind::TaskId => BotError::Usage {
            reason: format!("'{token}' is not a task number"),
            usage: usage.to_string(),
        },
        ArgKind::Minutes => BotError::Usage {
            reason: format!("'{token}' is not a number of minutes"),
            usage: usage.to_string(),
        },
        ArgKind::Text => BotError::Usage {
            reason: format!("invalid argument '{token}'"),
            usage: usage.to_string(),
        },
    }
}

fn parse_scalar(kind: ArgKind, token: &str) -> Option<Value> {
    match kind {
        ArgKind::TaskId => token.parse().ok().map(Value::TaskId),
        ArgKind::Minutes => token.parse().ok().map(Value::Minutes),
        ArgKind::Date => parse_date(token).map(Value::Date),
        ArgKind::Text => Some(Value::Text(token.to_string())),
    }
}

/// Strict `YYYY-MM-DD`: exactly four year digits and two each for month
/// and day, and a real calendar date.
pub fn parse_date(token: &str) -> Option<NaiveDate> {
    let bytes = token.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shape_ok {
        return None;
    }
    NaiveDate::parse_from_str(token, DATE_FORMAT).ok()
}

/// Arguments produced by [`Grammar::parse`], looked up by spec name.
#[derive(Debug, Clone)]
pub struct Args {
    values: Vec<(&'static str, Value)>,
    usage: String,
}

impl Args {
    fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    fn absent(&self, name: &str) -> BotError {
        BotError::Usage {
            reason: format!("missing argument <{name}>"),
            usage: self.usage.clone(),
        }
    }

    pub fn task_id(&self, name: &str) -> Result<u64> {
        match self.get(name) {
            Some(Value::TaskId(id)) => Ok(*id),
            _ => Err(self.absent(name)),
        }
    }

    pub fn minutes(&self, name: &str) -> Option<u32> {
        match self.get(name) {
            Some(Value::Minutes(m)) => Some(*m),
            _ => None,
        }
    }

    pub fn date(&self, name: &str) -> Result<NaiveDate> {
        match self.get(name) {
            Some(Value::Date(d)) => Ok(*d),
            _ => Err(self.absent(name)),
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Text(t)) => Some(t.as_str()),
            _ => None,
        }
    }

    pub fn required_text(&self, name: &str) -> Result<&str> {
        self.text(name).ok_or_else(|| self.absent(name))
    }

    /// Parsed task ids of a variadic argument; unparseable tokens are gone.
    pub fn task_ids(&self, name: &str) -> Vec<u64> {
        match self.get(name) {
            Some(Value::List { items, .. }) => items
                .iter()
                .filter_map(|v| match v {
                    Value::TaskId(id) => Some(*id),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// How many tokens were given for a variadic argument, parseable or not.
    pub fn supplied(&self, name: &str) -> usize {
        match self.get(name) {
            Some(Value::List { supplied, .. }) => *supplied,
            _ => 0,
        }
    }
}

use chrono::NaiveDate;

/// Storage and display format of plan dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A bot user, keyed by the chat platform's account id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub account_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskList {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub user_id: u64,
    pub name: String,
    /// Estimated duration in seconds. Users only ever see minutes.
    pub estimated_secs: i64,
    pub tasklist_id: Option<u64>,
}

/// The set of tasks a user scheduled for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub id: u64,
    pub user_id: u64,
    pub date: NaiveDate,
}

pub fn minutes_to_secs(minutes: i64) -> i64 {
    minutes.saturating_mul(60)
}

impl Task {
    pub fn is_owned_by(&self, user: &User) -> bool {
        self.user_id == user.id
    }
}

impl Plan {
    pub fn date_string(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

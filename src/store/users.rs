use rusqlite::params;

use crate::error::Result;
use crate::model::User;
use crate::store::db::Store;

impl Store {
    /// Get or create the user behind an external account id.
    pub fn user(&self, account_id: i64) -> Result<User> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO users (account_id) VALUES (?1)",
            params![account_id],
        )?;
        if inserted > 0 {
            tracing::info!(account_id, "new user registered");
        }
        let user = self.conn.query_row(
            "SELECT id, account_id FROM users WHERE account_id = ?1",
            params![account_id],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    account_id: row.get(1)?,
                })
            },
        )?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use crate::store::db::Store;

    #[test]
    fn user_is_created_once_per_account() {
        let store = Store::open_memory().unwrap();
        let first = store.user(1001).unwrap();
        let again = store.user(1001).unwrap();
        let other = store.user(2002).unwrap();
        assert_eq!(first, again);
        assert_ne!(first.id, other.id);
        assert_eq!(other.account_id, 2002);
    }
}

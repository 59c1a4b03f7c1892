//! Database migrations for ailogistics-server
//!
//! This module contains SQL migrations for the SQLite database schema.

/// SQL statement to create the initial database schema
pub const CREATE_SCHEMA: &str = r#"
-- Accounts table
CREATE TABLE IF NOT EXISTS accounts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    company_name TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

-- Keep updated_at current on modification
CREATE TRIGGER IF NOT EXISTS trg_accounts_updated_at
AFTER UPDATE ON accounts
FOR EACH ROW
WHEN NEW.updated_at = OLD.updated_at
BEGIN
    UPDATE accounts
    SET updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
    WHERE id = OLD.id;
END;
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn migrated() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(CREATE_SCHEMA).unwrap();
        conn
    }

    fn insert(conn: &Connection, username: &str, email: &str) -> rusqlite::Result<usize> {
        conn.execute(
            "INSERT INTO accounts (username, email, password_hash, company_name) VALUES (?, ?, ?, ?)",
            [username, email, "hash", "Acme"],
        )
    }

    #[test]
    fn test_create_schema_valid_sql() {
        let conn = migrated();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(Result::ok)
            .collect();

        assert!(tables.contains(&"accounts".to_string()));
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = migrated();
        conn.execute_batch(CREATE_SCHEMA).unwrap();
    }

    #[test]
    fn test_username_unique_constraint() {
        let conn = migrated();
        insert(&conn, "alice", "alice@co.com").unwrap();

        let result = insert(&conn, "alice", "other@co.com");
        assert!(result.is_err());
    }

    #[test]
    fn test_email_unique_constraint() {
        let conn = migrated();
        insert(&conn, "alice", "alice@co.com").unwrap();

        let result = insert(&conn, "bob", "alice@co.com");
        assert!(result.is_err());
    }

    #[test]
    fn test_update_refreshes_updated_at() {
        let conn = migrated();
        conn.execute(
            "INSERT INTO accounts (username, email, password_hash, company_name, created_at, updated_at)
             VALUES ('alice', 'alice@co.com', 'hash', 'Acme', '2020-01-01T00:00:00.000Z', '2020-01-01T00:00:00.000Z')",
            [],
        )
        .unwrap();

        conn.execute(
            "UPDATE accounts SET company_name = 'Acme Logistics' WHERE username = 'alice'",
            [],
        )
        .unwrap();

        let (created, updated): (String, String) = conn
            .query_row(
                "SELECT created_at, updated_at FROM accounts WHERE username = 'alice'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();

        assert_eq!(created, "2020-01-01T00:00:00.000Z");
        assert_ne!(updated, "2020-01-01T00:00:00.000Z");
    }
}

use chrono::{DateTime, Utc};
use crate::errors::VulnsnipError;
use super::Database;

#[derive(Debug, Clone, PartialEq)]
pub struct AttemptRow {
    pub challenge_key: String,
    pub attempts: u32,
    pub solved: bool,
    pub solved_at: Option<DateTime<Utc>>,
}

impl Database {
    /// Add one failed attempt in a single statement and return the new count.
    pub fn increment_attempts(&self, key: &str) -> Result<u32, VulnsnipError> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        conn.query_row(
            "INSERT INTO find_it_attempts (challenge_key, attempts, updated_at) VALUES (?1, 1, ?2)
             ON CONFLICT(challenge_key) DO UPDATE SET attempts = attempts + 1, updated_at = excluded.updated_at
             RETURNING attempts",
            rusqlite::params![key, now],
            |row: &rusqlite::Row| row.get::<_, u32>(0),
        )
        .map_err(|e| VulnsnipError::Database(format!("Increment failed: {}", e)))
    }

    pub fn mark_solved(&self, key: &str) -> Result<(), VulnsnipError> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO find_it_attempts (challenge_key, solved, solved_at, updated_at) VALUES (?1, 1, ?2, ?2)
             ON CONFLICT(challenge_key) DO UPDATE SET
                 solved = 1,
                 solved_at = COALESCE(find_it_attempts.solved_at, excluded.solved_at),
                 updated_at = excluded.updated_at",
            rusqlite::params![key, now],
        )
        .map_err(|e| VulnsnipError::Database(format!("Update failed: {}", e)))?;
        Ok(())
    }

    pub fn get_attempt_row(&self, key: &str) -> Result<Option<AttemptRow>, VulnsnipError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT challenge_key, attempts, solved, solved_at FROM find_it_attempts WHERE challenge_key = ?1")
            .map_err(|e| VulnsnipError::Database(format!("Query failed: {}", e)))?;

        let result = stmt.query_row(rusqlite::params![key], |row: &rusqlite::Row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u32>(1)?,
                row.get::<_, bool>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        });

        match result {
            Ok((challenge_key, attempts, solved, solved_at)) => Ok(Some(AttemptRow {
                challenge_key,
                attempts,
                solved,
                solved_at: solved_at
                    .as_deref()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                    .map(|d| d.with_timezone(&Utc)),
            })),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(VulnsnipError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn delete_attempts(&self, key: &str) -> Result<bool, VulnsnipError> {
        let conn = self.lock()?;
        let affected = conn
            .execute("DELETE FROM find_it_attempts WHERE challenge_key = ?1", rusqlite::params![key])
            .map_err(|e| VulnsnipError::Database(format!("Delete failed: {}", e)))?;
        Ok(affected > 0)
    }
}

pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS find_it_attempts (
    challenge_key TEXT PRIMARY KEY,
    attempts INTEGER NOT NULL DEFAULT 0,
    solved INTEGER NOT NULL DEFAULT 0,
    solved_at TEXT,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_find_it_attempts_solved ON find_it_attempts(solved);
";

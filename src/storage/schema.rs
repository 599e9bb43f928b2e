//! Table definitions
//!
//! The whole schema is created idempotently with `CREATE TABLE IF NOT EXISTS`.
//! There is no version table: the service creates what is missing at startup
//! and again when the page shell is first loaded.

use rusqlite::{params, Connection};

use super::error::StorageResult;

/// Id and name of the player that must always exist
pub const DEFAULT_PLAYER_ID: i64 = 1;
pub const DEFAULT_PLAYER_NAME: &str = "Player 1";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS subject (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS lecture (
    id INTEGER PRIMARY KEY,
    subject_id INTEGER NOT NULL REFERENCES subject(id),
    lecture_number INTEGER NOT NULL,
    uni_lecs INTEGER NOT NULL DEFAULT 1,
    studied INTEGER NOT NULL DEFAULT 0,
    revised INTEGER NOT NULL DEFAULT 0,
    total_time INTEGER NOT NULL DEFAULT 0,
    sessions INTEGER NOT NULL DEFAULT 0,
    finished_date TEXT,
    UNIQUE (subject_id, lecture_number)
);

CREATE TABLE IF NOT EXISTS flashcard (
    id INTEGER PRIMARY KEY,
    subject_id INTEGER NOT NULL REFERENCES subject(id),
    lecture_id INTEGER NOT NULL,
    front TEXT NOT NULL,
    back TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS exam (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS mistake (
    id INTEGER PRIMARY KEY,
    topic TEXT NOT NULL,
    description TEXT,
    subject_id INTEGER NOT NULL REFERENCES subject(id)
);

CREATE TABLE IF NOT EXISTS pomodoro_log (
    id INTEGER PRIMARY KEY,
    logged_at TEXT NOT NULL,
    duration INTEGER NOT NULL,
    subject_id INTEGER REFERENCES subject(id),
    lecture_id INTEGER
);
CREATE INDEX IF NOT EXISTS idx_pomodoro_logged_at ON pomodoro_log(logged_at);

CREATE TABLE IF NOT EXISTS course (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    platform TEXT,
    category TEXT,
    target_date TEXT,
    sessions_per_week INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS course_unit (
    id INTEGER PRIMARY KEY,
    course_id INTEGER NOT NULL REFERENCES course(id),
    unit_number INTEGER NOT NULL,
    title TEXT NOT NULL,
    is_complete INTEGER NOT NULL DEFAULT 0,
    UNIQUE (course_id, unit_number)
);

CREATE TABLE IF NOT EXISTS custom_event (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    start_time TEXT NOT NULL,
    end_time TEXT NOT NULL,
    event_date TEXT NOT NULL,
    color TEXT NOT NULL DEFAULT 'purple'
);
CREATE INDEX IF NOT EXISTS idx_custom_event_date ON custom_event(event_date);

CREATE TABLE IF NOT EXISTS exercise (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    muscle_group TEXT,
    cues TEXT,
    tags TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS pr (
    id INTEGER PRIMARY KEY,
    exercise_id INTEGER NOT NULL REFERENCES exercise(id),
    weight REAL NOT NULL,
    reps INTEGER NOT NULL,
    date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS gym_plan (
    id INTEGER PRIMARY KEY,
    plan_date TEXT NOT NULL UNIQUE,
    title TEXT,
    notes TEXT,
    is_completed INTEGER NOT NULL DEFAULT 0,
    completed_at TEXT
);

CREATE TABLE IF NOT EXISTS gym_plan_exercise (
    id INTEGER PRIMARY KEY,
    plan_id INTEGER NOT NULL REFERENCES gym_plan(id),
    exercise_id INTEGER NOT NULL REFERENCES exercise(id),
    position INTEGER NOT NULL,
    sets TEXT,
    reps TEXT,
    weight TEXT
);

CREATE TABLE IF NOT EXISTS basketball_player (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS video_tag (
    id INTEGER PRIMARY KEY,
    time REAL NOT NULL,
    player_id INTEGER NOT NULL REFERENCES basketball_player(id),
    category TEXT,
    action TEXT,
    stat_type TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS shot (
    id INTEGER PRIMARY KEY,
    x REAL NOT NULL,
    y REAL NOT NULL,
    made INTEGER NOT NULL,
    player_id INTEGER NOT NULL REFERENCES basketball_player(id)
);
";

const INSERT_DEFAULT_PLAYER: &str =
    "INSERT OR IGNORE INTO basketball_player (id, name) VALUES (?1, ?2)";

/// Create every table that does not exist yet, then the default player
pub fn create_all(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(SCHEMA)?;
    ensure_default_player(conn)?;
    Ok(())
}

/// Insert the default basketball player if it is missing
///
/// Returns true when a row was inserted.
pub fn ensure_default_player(conn: &Connection) -> StorageResult<bool> {
    let inserted = conn.execute(
        INSERT_DEFAULT_PLAYER,
        params![DEFAULT_PLAYER_ID, DEFAULT_PLAYER_NAME],
    )?;
    if inserted > 0 {
        tracing::info!(player_id = DEFAULT_PLAYER_ID, "Created default basketball player");
    }
    Ok(inserted > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_all_twice() {
        let conn = Connection::open_in_memory().unwrap();
        create_all(&conn).unwrap();
        create_all(&conn).unwrap();

        let players: i64 = conn
            .query_row("SELECT COUNT(*) FROM basketball_player", [], |row| row.get(0))
            .unwrap();
        assert_eq!(players, 1);
    }

    #[test]
    fn test_default_player_only_inserted_once() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(ensure_default_player(&conn).unwrap());
        assert!(!ensure_default_player(&conn).unwrap());
    }
}

//! Database module - SQLite storage for the workout catalog and sessions

mod catalog;
mod plans;
mod reports;
mod sessions;

pub use catalog::{Exercise, Student};
pub use plans::{Plan, PlanEntry};
pub use reports::{SessionItemDetail, SessionSummary};
pub use sessions::NewSessionItem;

use rusqlite::{Connection, params};
use tracing::info;

use crate::error::Result;

/// Starter exercise catalog, inserted once into an empty database
const SEED_EXERCISES: &[(&str, &str)] = &[
    ("Flat bench press", "Chest"),
    ("Dumbbell fly", "Chest"),
    ("Bent-over row", "Back"),
    ("Lat pulldown", "Back"),
    ("Back squat", "Legs"),
    ("Leg press", "Legs"),
    ("Overhead press", "Shoulders"),
    ("Lateral raise", "Shoulders"),
    ("Barbell curl", "Biceps"),
    ("Rope pushdown", "Triceps"),
    ("Reverse crunch", "Core"),
];

/// Database wrapper. Opened once per process and passed by reference into
/// every operation.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database file
    pub fn open(path: &str) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// In-memory database, used by the tests
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // SQLite leaves foreign keys off unless asked per connection
        conn.pragma_update(None, "foreign_keys", true)?;
        let db = Self { conn };
        db.init_schema()?;
        db.seed_exercises()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS student (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                name        TEXT NOT NULL,
                birth_date  TEXT NOT NULL,
                height_m    REAL,
                weight_kg   REAL
            );

            CREATE TABLE IF NOT EXISTS exercise (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                name          TEXT NOT NULL,
                muscle_group  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS plan (
                id    INTEGER PRIMARY KEY AUTOINCREMENT,
                name  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS plan_entry (
                plan_id      INTEGER NOT NULL,
                exercise_id  INTEGER NOT NULL,
                position     INTEGER NOT NULL,
                series       INTEGER NOT NULL,
                reps         INTEGER NOT NULL,
                PRIMARY KEY (plan_id, exercise_id),
                FOREIGN KEY (plan_id) REFERENCES plan(id) ON DELETE CASCADE,
                FOREIGN KEY (exercise_id) REFERENCES exercise(id) ON DELETE RESTRICT
            );

            CREATE TABLE IF NOT EXISTS session (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                student_id    INTEGER NOT NULL,
                plan_id       INTEGER NOT NULL,
                session_date  TEXT NOT NULL,
                FOREIGN KEY (student_id) REFERENCES student(id) ON DELETE CASCADE,
                FOREIGN KEY (plan_id) REFERENCES plan(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS session_item (
                id             INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id     INTEGER NOT NULL,
                exercise_id    INTEGER NOT NULL,
                done           INTEGER NOT NULL DEFAULT 0,
                actual_series  INTEGER,
                actual_reps    INTEGER,
                avg_weight     REAL,
                note           TEXT,
                FOREIGN KEY (session_id) REFERENCES session(id) ON DELETE CASCADE,
                FOREIGN KEY (exercise_id) REFERENCES exercise(id) ON DELETE RESTRICT
            );

            CREATE INDEX IF NOT EXISTS idx_student_name ON student (name);
            CREATE INDEX IF NOT EXISTS idx_exercise_name ON exercise (name);
            CREATE INDEX IF NOT EXISTS idx_plan_name ON plan (name);
            CREATE INDEX IF NOT EXISTS idx_session_date ON session (session_date DESC);",
        )?;

        // Migration: databases created before weight tracking lack weight_kg
        let has_weight = self
            .conn
            .prepare("SELECT weight_kg FROM student LIMIT 1")
            .is_ok();
        if !has_weight {
            self.conn
                .execute("ALTER TABLE student ADD COLUMN weight_kg REAL", [])?;
        }

        Ok(())
    }

    fn seed_exercises(&self) -> Result<()> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM exercise", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(());
        }

        let mut stmt = self
            .conn
            .prepare("INSERT INTO exercise (name, muscle_group) VALUES (?1, ?2)")?;
        for (name, group) in SEED_EXERCISES {
            stmt.execute(params![name, group])?;
        }
        info!("seeded {} starter exercises", SEED_EXERCISES.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_on_empty_database() {
        let db = Database::open_in_memory().unwrap();
        let exercises = db.list_exercises(None).unwrap();
        assert_eq!(exercises.len(), SEED_EXERCISES.len());

        let groups: std::collections::HashSet<_> =
            exercises.iter().map(|e| e.muscle_group.as_str()).collect();
        assert_eq!(groups.len(), 6);
    }

    #[test]
    fn test_seed_skipped_when_not_empty() {
        let db = Database::open_in_memory().unwrap();
        db.add_exercise("Hip thrust", "Glutes").unwrap();
        // Re-running the seed must not duplicate the starter catalog
        db.seed_exercises().unwrap();
        let exercises = db.list_exercises(None).unwrap();
        assert_eq!(exercises.len(), SEED_EXERCISES.len() + 1);
    }
}

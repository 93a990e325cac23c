//! Session persistence - atomic write of a session and its items

use rusqlite::params;
use tracing::info;

use super::Database;
use crate::error::{Error, Result};

/// One checklist line ready for insertion, already parsed and validated
#[derive(Debug, Clone)]
pub struct NewSessionItem {
    pub exercise_id: i64,
    pub done: bool,
    pub actual_series: Option<i32>,
    pub actual_reps: Option<i32>,
    pub avg_weight: Option<f64>,
    pub note: Option<String>,
}

impl Database {
    /// Insert a session and all of its items in one transaction.
    ///
    /// The whole write commits or none of it does; a failure on any item
    /// rolls back the session row as well. Returns the number of items
    /// written.
    pub fn save_session(
        &mut self,
        student_id: i64,
        plan_id: i64,
        date_iso: &str,
        items: &[NewSessionItem],
    ) -> Result<usize> {
        if items.is_empty() {
            return Err(Error::Validation("session has no checklist items".into()));
        }

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO session (student_id, plan_id, session_date) VALUES (?1, ?2, ?3)",
            params![student_id, plan_id, date_iso],
        )?;
        let session_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO session_item
                 (session_id, exercise_id, done, actual_series, actual_reps, avg_weight, note)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for item in items {
                stmt.execute(params![
                    session_id,
                    item.exercise_id,
                    item.done,
                    item.actual_series,
                    item.actual_reps,
                    item.avg_weight,
                    item.note,
                ])?;
            }
        }

        tx.commit()?;
        info!(session_id, items = items.len(), "session recorded");
        Ok(items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn counts(db: &Database) -> (i64, i64) {
        let sessions = db
            .conn
            .query_row("SELECT COUNT(*) FROM session", [], |row| row.get(0))
            .unwrap();
        let items = db
            .conn
            .query_row("SELECT COUNT(*) FROM session_item", [], |row| row.get(0))
            .unwrap();
        (sessions, items)
    }

    fn item(exercise_id: i64) -> NewSessionItem {
        NewSessionItem {
            exercise_id,
            done: false,
            actual_series: None,
            actual_reps: None,
            avg_weight: None,
            note: None,
        }
    }

    #[test]
    fn test_save_session_writes_all_items() {
        let mut db = test_db();
        let student = db.add_student("Ana", "01/01/1990", None, None).unwrap();
        let plan = db.create_plan("Treino A").unwrap();

        let items = [
            NewSessionItem {
                done: true,
                actual_series: Some(3),
                actual_reps: Some(10),
                avg_weight: Some(42.5),
                note: Some("felt strong".into()),
                ..item(1)
            },
            item(2),
        ];
        let written = db.save_session(student, plan, "2024-05-01", &items).unwrap();
        assert_eq!(written, 2);
        assert_eq!(counts(&db), (1, 2));
    }

    #[test]
    fn test_save_session_rejects_empty_checklist() {
        let mut db = test_db();
        let student = db.add_student("Ana", "01/01/1990", None, None).unwrap();
        let plan = db.create_plan("Treino A").unwrap();

        assert!(matches!(
            db.save_session(student, plan, "2024-05-01", &[]),
            Err(Error::Validation(_))
        ));
        assert_eq!(counts(&db), (0, 0));
    }

    #[test]
    fn test_failed_item_rolls_back_session_row() {
        let mut db = test_db();
        let student = db.add_student("Ana", "01/01/1990", None, None).unwrap();
        let plan = db.create_plan("Treino A").unwrap();

        // Second item references a missing exercise, so its insert fails
        // after the session row and the first item were already written
        let items = [item(1), item(9999)];
        assert!(db.save_session(student, plan, "2024-05-01", &items).is_err());
        assert_eq!(counts(&db), (0, 0));
    }
}

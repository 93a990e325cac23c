//! Session history reporting

use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};

use super::Database;
use crate::error::Result;

/// One row of the session listing, joined with student and plan names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: i64,
    /// ISO YYYY-MM-DD
    pub date: String,
    pub student_name: String,
    pub plan_name: String,
}

/// Recorded outcome for one exercise within a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionItemDetail {
    pub exercise_name: String,
    pub muscle_group: String,
    pub done: bool,
    pub actual_series: Option<i32>,
    pub actual_reps: Option<i32>,
    pub avg_weight: Option<f64>,
    pub note: Option<String>,
}

fn row_to_summary(row: &Row<'_>) -> rusqlite::Result<SessionSummary> {
    Ok(SessionSummary {
        id: row.get(0)?,
        date: row.get(1)?,
        student_name: row.get(2)?,
        plan_name: row.get(3)?,
    })
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<SessionItemDetail> {
    Ok(SessionItemDetail {
        exercise_name: row.get(0)?,
        muscle_group: row.get(1)?,
        done: row.get(2)?,
        actual_series: row.get(3)?,
        actual_reps: row.get(4)?,
        avg_weight: row.get(5)?,
        note: row.get(6)?,
    })
}

impl Database {
    /// Past sessions, newest first. Ties on the date break toward the most
    /// recently created session.
    pub fn list_sessions(&self, student_filter: Option<&str>) -> Result<Vec<SessionSummary>> {
        let sessions = match student_filter.map(str::trim).filter(|f| !f.is_empty()) {
            Some(f) => {
                let mut stmt = self.conn.prepare(
                    "SELECT s.id, s.session_date, a.name, p.name
                     FROM session s
                     JOIN student a ON a.id = s.student_id
                     JOIN plan p ON p.id = s.plan_id
                     WHERE a.name LIKE ?1
                     ORDER BY s.session_date DESC, s.id DESC",
                )?;
                let rows = stmt.query_map(params![format!("%{f}%")], row_to_summary)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT s.id, s.session_date, a.name, p.name
                     FROM session s
                     JOIN student a ON a.id = s.student_id
                     JOIN plan p ON p.id = s.plan_id
                     ORDER BY s.session_date DESC, s.id DESC",
                )?;
                let rows = stmt.query_map([], row_to_summary)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(sessions)
    }

    /// Items of one session, in the order they were recorded
    pub fn session_detail(&self, session_id: i64) -> Result<Vec<SessionItemDetail>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.name, e.muscle_group, si.done, si.actual_series, si.actual_reps,
                    si.avg_weight, si.note
             FROM session_item si
             JOIN exercise e ON e.id = si.exercise_id
             WHERE si.session_id = ?1
             ORDER BY si.id",
        )?;
        let rows = stmt.query_map(params![session_id], row_to_item)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Remove a session and its items
    pub fn delete_session(&mut self, session_id: i64) -> Result<usize> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM session_item WHERE session_id = ?1",
            params![session_id],
        )?;
        let removed = tx.execute("DELETE FROM session WHERE id = ?1", params![session_id])?;
        tx.commit()?;
        Ok(removed)
    }
}

//! Plan composition - named plans with ordered exercise entries

use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Database;
use crate::error::{Error, Result};

/// Plan record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub id: i64,
    pub name: String,
}

/// One exercise's position and targets within a plan, joined with the
/// exercise catalog for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEntry {
    pub plan_id: i64,
    pub exercise_id: i64,
    pub position: i32,
    pub exercise_name: String,
    pub muscle_group: String,
    pub series: i32,
    pub reps: i32,
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<PlanEntry> {
    Ok(PlanEntry {
        plan_id: row.get(0)?,
        exercise_id: row.get(1)?,
        position: row.get(2)?,
        exercise_name: row.get(3)?,
        muscle_group: row.get(4)?,
        series: row.get(5)?,
        reps: row.get(6)?,
    })
}

impl Database {
    /// Create a plan
    pub fn create_plan(&self, name: &str) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("plan name must not be blank".into()));
        }
        self.conn
            .execute("INSERT INTO plan (name) VALUES (?1)", params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// List plans, optionally filtered by a name substring
    pub fn list_plans(&self, filter: Option<&str>) -> Result<Vec<Plan>> {
        let map = |row: &Row<'_>| -> rusqlite::Result<Plan> {
            Ok(Plan {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        };
        let plans = match filter.map(str::trim).filter(|f| !f.is_empty()) {
            Some(f) => {
                let mut stmt = self
                    .conn
                    .prepare("SELECT id, name FROM plan WHERE name LIKE ?1 ORDER BY name")?;
                let rows = stmt.query_map(params![format!("%{f}%")], map)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = self.conn.prepare("SELECT id, name FROM plan ORDER BY name")?;
                let rows = stmt.query_map([], map)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(plans)
    }

    /// Add an exercise to a plan, or replace its position and targets when
    /// the (plan, exercise) pair already exists
    pub fn add_or_replace_entry(
        &self,
        plan_id: i64,
        exercise_id: i64,
        position: i32,
        series: i32,
        reps: i32,
    ) -> Result<()> {
        if position <= 0 || series <= 0 || reps <= 0 {
            return Err(Error::Validation(
                "order, series and reps must be positive integers".into(),
            ));
        }
        self.conn.execute(
            "INSERT INTO plan_entry (plan_id, exercise_id, position, series, reps)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (plan_id, exercise_id)
             DO UPDATE SET position = excluded.position,
                           series = excluded.series,
                           reps = excluded.reps",
            params![plan_id, exercise_id, position, series, reps],
        )?;
        Ok(())
    }

    /// Suggested order index for the next entry: max + 1, or 1 when the
    /// plan is empty
    pub fn next_order(&self, plan_id: i64) -> Result<i32> {
        let next = self.conn.query_row(
            "SELECT COALESCE(MAX(position), 0) + 1 FROM plan_entry WHERE plan_id = ?1",
            params![plan_id],
            |row| row.get(0),
        )?;
        Ok(next)
    }

    /// Remove one exercise from a plan
    pub fn remove_entry(&self, plan_id: i64, exercise_id: i64) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM plan_entry WHERE plan_id = ?1 AND exercise_id = ?2",
            params![plan_id, exercise_id],
        )?;
        Ok(removed)
    }

    /// A plan's entries in checklist order
    pub fn list_entries(&self, plan_id: i64) -> Result<Vec<PlanEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT pe.plan_id, pe.exercise_id, pe.position, e.name, e.muscle_group,
                    pe.series, pe.reps
             FROM plan_entry pe
             JOIN exercise e ON e.id = pe.exercise_id
             WHERE pe.plan_id = ?1
             ORDER BY pe.position",
        )?;
        let rows = stmt.query_map(params![plan_id], row_to_entry)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Delete a plan together with its entries and every session recorded
    /// from it, in one transaction.
    pub fn delete_plan(&mut self, plan_id: i64) -> Result<usize> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM session_item
             WHERE session_id IN (SELECT id FROM session WHERE plan_id = ?1)",
            params![plan_id],
        )?;
        tx.execute("DELETE FROM session WHERE plan_id = ?1", params![plan_id])?;
        tx.execute("DELETE FROM plan_entry WHERE plan_id = ?1", params![plan_id])?;
        let removed = tx.execute("DELETE FROM plan WHERE id = ?1", params![plan_id])?;
        tx.commit()?;
        debug!(plan_id, removed, "deleted plan");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewSessionItem;

    fn test_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn test_create_plan_validation() {
        let db = test_db();
        assert!(matches!(db.create_plan("   "), Err(Error::Validation(_))));
        assert!(db.create_plan("Treino A").is_ok());
    }

    #[test]
    fn test_entry_upsert_keeps_single_row() {
        let db = test_db();
        let plan = db.create_plan("Treino A").unwrap();

        db.add_or_replace_entry(plan, 5, 1, 3, 10).unwrap();
        db.add_or_replace_entry(plan, 5, 2, 4, 8).unwrap();

        let entries = db.list_entries(plan).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].exercise_id, 5);
        assert_eq!(entries[0].position, 2);
        assert_eq!(entries[0].series, 4);
        assert_eq!(entries[0].reps, 8);
    }

    #[test]
    fn test_entry_validation() {
        let db = test_db();
        let plan = db.create_plan("Treino A").unwrap();
        assert!(matches!(
            db.add_or_replace_entry(plan, 1, 0, 3, 10),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            db.add_or_replace_entry(plan, 1, 1, -3, 10),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            db.add_or_replace_entry(plan, 1, 1, 3, 0),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_next_order_with_gaps() {
        let db = test_db();
        let plan = db.create_plan("Treino A").unwrap();
        assert_eq!(db.next_order(plan).unwrap(), 1);

        db.add_or_replace_entry(plan, 1, 2, 3, 10).unwrap();
        db.add_or_replace_entry(plan, 2, 7, 3, 10).unwrap();
        assert_eq!(db.next_order(plan).unwrap(), 8);
    }

    #[test]
    fn test_entries_ordered_by_position() {
        let db = test_db();
        let plan = db.create_plan("Treino A").unwrap();
        db.add_or_replace_entry(plan, 3, 2, 3, 12).unwrap();
        db.add_or_replace_entry(plan, 1, 1, 4, 6).unwrap();

        let entries = db.list_entries(plan).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].exercise_id, 1);
        assert_eq!(entries[1].exercise_id, 3);
        assert!(!entries[0].exercise_name.is_empty());
    }

    #[test]
    fn test_remove_entry() {
        let db = test_db();
        let plan = db.create_plan("Treino A").unwrap();
        db.add_or_replace_entry(plan, 1, 1, 3, 10).unwrap();
        assert_eq!(db.remove_entry(plan, 1).unwrap(), 1);
        assert_eq!(db.remove_entry(plan, 1).unwrap(), 0);
        assert!(db.list_entries(plan).unwrap().is_empty());
    }

    #[test]
    fn test_delete_plan_cascades_sessions() {
        let mut db = test_db();
        let student = db.add_student("Eva", "02/02/1992", None, None).unwrap();
        let plan = db.create_plan("Treino B").unwrap();
        db.add_or_replace_entry(plan, 1, 1, 3, 10).unwrap();

        let items = [NewSessionItem {
            exercise_id: 1,
            done: false,
            actual_series: None,
            actual_reps: None,
            avg_weight: None,
            note: None,
        }];
        db.save_session(student, plan, "2024-06-01", &items).unwrap();

        assert_eq!(db.delete_plan(plan).unwrap(), 1);
        assert!(db.list_plans(None).unwrap().is_empty());
        assert!(db.list_sessions(None).unwrap().is_empty());

        let items_left: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM session_item", [], |row| row.get(0))
            .unwrap();
        let entries_left: i64 = db
            .conn
            .query_row("SELECT COUNT(*) FROM plan_entry", [], |row| row.get(0))
            .unwrap();
        assert_eq!((items_left, entries_left), (0, 0));
    }
}

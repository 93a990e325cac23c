//! Catalog operations - students and exercises

use rusqlite::{Row, params};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Database;
use crate::dates;
use crate::error::{Error, Result, is_constraint_violation};

/// Student record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub name: String,
    /// ISO YYYY-MM-DD
    pub birth_date: String,
    pub height_m: Option<f64>,
    pub weight_kg: Option<f64>,
}

/// Exercise record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    pub muscle_group: String,
}

fn row_to_student(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        birth_date: row.get(2)?,
        height_m: row.get(3)?,
        weight_kg: row.get(4)?,
    })
}

fn row_to_exercise(row: &Row<'_>) -> rusqlite::Result<Exercise> {
    Ok(Exercise {
        id: row.get(0)?,
        name: row.get(1)?,
        muscle_group: row.get(2)?,
    })
}

impl Database {
    /// Register a student. The birth date is given in display form
    /// (DD/MM/YYYY) and stored as ISO.
    pub fn add_student(
        &self,
        name: &str,
        birth_date: &str,
        height_m: Option<f64>,
        weight_kg: Option<f64>,
    ) -> Result<i64> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("student name must not be blank".into()));
        }
        let iso = dates::to_iso(birth_date)?;
        if height_m.is_some_and(|h| h <= 0.0) {
            return Err(Error::Validation("height must be positive".into()));
        }
        if weight_kg.is_some_and(|w| w <= 0.0) {
            return Err(Error::Validation("weight must be positive".into()));
        }

        self.conn.execute(
            "INSERT INTO student (name, birth_date, height_m, weight_kg) VALUES (?1, ?2, ?3, ?4)",
            params![name, iso, height_m, weight_kg],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// List students, optionally filtered by a name substring
    pub fn list_students(&self, filter: Option<&str>) -> Result<Vec<Student>> {
        let students = match filter.map(str::trim).filter(|f| !f.is_empty()) {
            Some(f) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, name, birth_date, height_m, weight_kg FROM student
                     WHERE name LIKE ?1 ORDER BY name",
                )?;
                let rows = stmt.query_map(params![format!("%{f}%")], row_to_student)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, name, birth_date, height_m, weight_kg FROM student ORDER BY name",
                )?;
                let rows = stmt.query_map([], row_to_student)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(students)
    }

    /// Delete a student together with their recorded sessions
    pub fn delete_student(&self, id: i64) -> Result<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM student WHERE id = ?1", params![id])?;
        debug!(student_id = id, removed, "deleted student");
        Ok(removed)
    }

    /// Add an exercise to the catalog
    pub fn add_exercise(&self, name: &str, muscle_group: &str) -> Result<i64> {
        let name = name.trim();
        let muscle_group = muscle_group.trim();
        if name.is_empty() || muscle_group.is_empty() {
            return Err(Error::Validation(
                "exercise name and muscle group must not be blank".into(),
            ));
        }

        self.conn.execute(
            "INSERT INTO exercise (name, muscle_group) VALUES (?1, ?2)",
            params![name, muscle_group],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// List exercises, optionally filtered by a substring of the name or
    /// the muscle group
    pub fn list_exercises(&self, filter: Option<&str>) -> Result<Vec<Exercise>> {
        let exercises = match filter.map(str::trim).filter(|f| !f.is_empty()) {
            Some(f) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, name, muscle_group FROM exercise
                     WHERE name LIKE ?1 OR muscle_group LIKE ?1
                     ORDER BY name, muscle_group",
                )?;
                let rows = stmt.query_map(params![format!("%{f}%")], row_to_exercise)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, name, muscle_group FROM exercise ORDER BY name, muscle_group",
                )?;
                let rows = stmt.query_map([], row_to_exercise)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(exercises)
    }

    /// Delete an exercise. Fails while a plan entry or a recorded session
    /// item still references it.
    pub fn delete_exercise(&self, id: i64) -> Result<usize> {
        match self
            .conn
            .execute("DELETE FROM exercise WHERE id = ?1", params![id])
        {
            Ok(removed) => Ok(removed),
            Err(err) if is_constraint_violation(&err) => Err(Error::Constraint(
                "exercise is referenced by a plan or a recorded session".into(),
            )),
            Err(err) => Err(err.into()),
        }
    }
}

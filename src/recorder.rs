//! Session recorder - checklist workflow from plan selection to save
//!
//! The recorder snapshots a plan into checklist lines, collects the
//! operator's raw input per line, and turns a valid checklist into one
//! atomic session write. Lines carry a copy of the plan entry they were
//! built from, so a later plan edit never changes a session that was
//! already saved.

use serde::{Deserialize, Serialize};

use crate::dates;
use crate::db::{Database, NewSessionItem};
use crate::error::{Error, Result};

/// One checklist line: the plan-entry snapshot plus the operator's input.
/// Inputs stay raw text until save, mirroring free-form field entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecklistLine {
    pub exercise_id: i64,
    pub position: i32,
    pub exercise_name: String,
    pub muscle_group: String,
    pub target_series: i32,
    pub target_reps: i32,
    pub done: bool,
    pub actual_series: String,
    pub actual_reps: String,
    pub avg_weight: String,
    pub note: String,
}

impl ChecklistLine {
    /// Checklist label with position, group, name and targets
    pub fn label(&self) -> String {
        format!(
            "{:02} {} / {} ({}x{})",
            self.position,
            self.muscle_group,
            self.exercise_name,
            self.target_series,
            self.target_reps
        )
    }
}

/// Session-creation workflow state: select a student, a plan and a date,
/// build the checklist, fill it in, save.
#[derive(Debug)]
pub struct SessionRecorder {
    student_id: Option<i64>,
    plan_id: Option<i64>,
    date_input: String,
    lines: Vec<ChecklistLine>,
}

impl SessionRecorder {
    /// Fresh recorder with the session date defaulting to today
    pub fn new() -> Self {
        Self {
            student_id: None,
            plan_id: None,
            date_input: dates::today_display(),
            lines: Vec::new(),
        }
    }

    pub fn select_student(&mut self, student_id: i64) {
        self.student_id = Some(student_id);
    }

    /// Choose the plan and snapshot its current entries into the
    /// checklist. Returns the number of lines loaded.
    pub fn select_plan(&mut self, db: &Database, plan_id: i64) -> Result<usize> {
        let entries = db.list_entries(plan_id)?;
        self.lines = entries
            .into_iter()
            .map(|entry| ChecklistLine {
                exercise_id: entry.exercise_id,
                position: entry.position,
                exercise_name: entry.exercise_name,
                muscle_group: entry.muscle_group,
                target_series: entry.series,
                target_reps: entry.reps,
                done: false,
                actual_series: String::new(),
                actual_reps: String::new(),
                avg_weight: String::new(),
                note: String::new(),
            })
            .collect();
        self.plan_id = Some(plan_id);
        Ok(self.lines.len())
    }

    /// Override the session date (display form, DD/MM/YYYY)
    pub fn set_date(&mut self, input: &str) {
        self.date_input = input.to_string();
    }

    pub fn lines(&self) -> &[ChecklistLine] {
        &self.lines
    }

    pub fn lines_mut(&mut self) -> &mut [ChecklistLine] {
        &mut self.lines
    }

    /// Find a checklist line by its exercise id
    pub fn line_mut(&mut self, exercise_id: i64) -> Option<&mut ChecklistLine> {
        self.lines.iter_mut().find(|l| l.exercise_id == exercise_id)
    }

    /// Validate the checklist and write the session atomically.
    ///
    /// Any validation failure leaves the database untouched. On success
    /// the recorder resets for the next session and the number of items
    /// written is returned.
    pub fn save(&mut self, db: &mut Database) -> Result<usize> {
        let student_id = self
            .student_id
            .ok_or_else(|| Error::Validation("select a student first".into()))?;
        let plan_id = self
            .plan_id
            .ok_or_else(|| Error::Validation("select a plan first".into()))?;
        if self.lines.is_empty() {
            return Err(Error::Validation(
                "the selected plan has no exercises loaded".into(),
            ));
        }
        let date_iso = dates::to_iso(&self.date_input)?;

        let mut items = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            items.push(NewSessionItem {
                exercise_id: line.exercise_id,
                done: line.done,
                actual_series: parse_count("series", &line.actual_series)?,
                actual_reps: parse_count("reps", &line.actual_reps)?,
                avg_weight: parse_weight(&line.avg_weight)?,
                note: none_if_blank(&line.note),
            });
        }

        let written = db.save_session(student_id, plan_id, &date_iso, &items)?;
        *self = Self::new();
        Ok(written)
    }
}

impl Default for SessionRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Blank input means the field was left untouched
fn parse_count(field: &str, raw: &str) -> Result<Option<i32>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i32>().map(Some).map_err(|_| {
        Error::Validation(format!("invalid {field} value '{raw}', expected an integer"))
    })
}

/// Average weight accepts either '.' or ',' as the decimal separator
fn parse_weight(raw: &str) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.replace(',', ".")
        .parse::<f64>()
        .map(Some)
        .map_err(|_| Error::Validation(format!("invalid weight value '{raw}'")))
}

fn none_if_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_db() -> (Database, i64, i64) {
        let db = Database::open_in_memory().unwrap();
        let student = db.add_student("Ana", "01/01/1990", None, None).unwrap();
        let plan = db.create_plan("Treino A").unwrap();
        db.add_or_replace_entry(plan, 1, 1, 3, 10).unwrap();
        db.add_or_replace_entry(plan, 2, 2, 4, 8).unwrap();
        (db, student, plan)
    }

    #[test]
    fn test_checklist_snapshot_from_plan() {
        let (db, _, plan) = seeded_db();
        let mut rec = SessionRecorder::new();
        let loaded = rec.select_plan(&db, plan).unwrap();
        assert_eq!(loaded, 2);

        let lines = rec.lines();
        assert_eq!(lines[0].exercise_id, 1);
        assert_eq!(lines[0].target_series, 3);
        assert!(!lines[0].done);
        assert!(lines[0].avg_weight.is_empty());
        assert_eq!(lines[1].label(), "02 Chest / Dumbbell fly (4x8)");
    }

    #[test]
    fn test_save_requires_selections() {
        let (mut db, student, plan) = seeded_db();

        let mut rec = SessionRecorder::new();
        assert!(matches!(rec.save(&mut db), Err(Error::Validation(_))));

        rec.select_student(student);
        assert!(matches!(rec.save(&mut db), Err(Error::Validation(_))));

        rec.select_plan(&db, plan).unwrap();
        assert_eq!(rec.save(&mut db).unwrap(), 2);
    }

    #[test]
    fn test_save_rejects_empty_checklist() {
        let (mut db, student, _) = seeded_db();
        let empty_plan = db.create_plan("Treino vazio").unwrap();

        let mut rec = SessionRecorder::new();
        rec.select_student(student);
        assert_eq!(rec.select_plan(&db, empty_plan).unwrap(), 0);
        assert!(matches!(rec.save(&mut db), Err(Error::Validation(_))));
    }

    #[test]
    fn test_save_rejects_bad_date() {
        let (mut db, student, plan) = seeded_db();
        let mut rec = SessionRecorder::new();
        rec.select_student(student);
        rec.select_plan(&db, plan).unwrap();
        rec.set_date("31/02/2024");
        assert!(matches!(rec.save(&mut db), Err(Error::Validation(_))));
        assert!(db.list_sessions(None).unwrap().is_empty());
    }

    #[test]
    fn test_unparseable_weight_writes_nothing() {
        let (mut db, student, plan) = seeded_db();
        let mut rec = SessionRecorder::new();
        rec.select_student(student);
        rec.select_plan(&db, plan).unwrap();

        rec.line_mut(1).unwrap().avg_weight = "heavy".into();
        assert!(matches!(rec.save(&mut db), Err(Error::Validation(_))));
        assert!(db.list_sessions(None).unwrap().is_empty());

        // Checklist survives the failed save for correction
        assert_eq!(rec.lines().len(), 2);
    }

    #[test]
    fn test_save_parses_inputs_and_resets() {
        let (mut db, student, plan) = seeded_db();
        let mut rec = SessionRecorder::new();
        rec.select_student(student);
        rec.select_plan(&db, plan).unwrap();
        rec.set_date("15/05/2024");

        {
            let line = rec.line_mut(1).unwrap();
            line.done = true;
            line.actual_series = "3".into();
            line.actual_reps = "10".into();
            line.avg_weight = "42,5".into();
            line.note = "  solid form  ".into();
        }

        assert_eq!(rec.save(&mut db).unwrap(), 2);
        // Recorder is back to its initial state
        assert!(rec.lines().is_empty());
        assert!(matches!(rec.save(&mut db), Err(Error::Validation(_))));

        let session = db.list_sessions(None).unwrap().remove(0);
        assert_eq!(session.date, "2024-05-15");
        let detail = db.session_detail(session.id).unwrap();
        assert_eq!(detail[0].avg_weight, Some(42.5));
        assert_eq!(detail[0].note.as_deref(), Some("solid form"));
        assert!(detail[0].done);
        assert_eq!(detail[1].actual_series, None);
        assert_eq!(detail[1].note, None);
    }

    #[test]
    fn test_weight_accepts_dot_and_comma() {
        assert_eq!(parse_weight("42.5").unwrap(), Some(42.5));
        assert_eq!(parse_weight("42,5").unwrap(), Some(42.5));
        assert_eq!(parse_weight("  ").unwrap(), None);
        assert!(parse_weight("1.234,5").is_err());
    }

    #[test]
    fn test_count_parsing() {
        assert_eq!(parse_count("series", "4").unwrap(), Some(4));
        assert_eq!(parse_count("series", "").unwrap(), None);
        assert!(parse_count("series", "three").is_err());
        assert!(parse_count("reps", "2.5").is_err());
    }
}

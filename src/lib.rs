//! gymtrack - Gym workout tracking core
//!
//! Catalog of students and exercises, workout plan composition, session
//! checklists, and session history reporting over a local SQLite file.

pub mod bmi;
pub mod dates;
pub mod db;
pub mod error;
pub mod recorder;

pub use db::Database;
pub use error::{Error, Result};

//! gymtrack - Gym workout tracker CLI
//!
//! Thin presentation layer over the library: each subcommand maps onto one
//! catalog, plan, recorder or reporting operation.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use gymtrack::db::Database;
use gymtrack::recorder::SessionRecorder;
use gymtrack::{bmi, dates};

#[derive(Parser)]
#[command(name = "gymtrack")]
#[command(version, about = "Gym workout tracker - students, plans, and session checklists")]
struct Cli {
    /// Database file
    #[arg(long, env = "GYMTRACK_DB", default_value = "gymtrack.db", global = true)]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage students
    Student {
        #[command(subcommand)]
        action: StudentCmd,
    },
    /// Manage the exercise catalog
    Exercise {
        #[command(subcommand)]
        action: ExerciseCmd,
    },
    /// Compose workout plans
    Plan {
        #[command(subcommand)]
        action: PlanCmd,
    },
    /// Record and review training sessions
    Session {
        #[command(subcommand)]
        action: SessionCmd,
    },
}

#[derive(Subcommand)]
enum StudentCmd {
    /// Register a student
    Add {
        name: String,
        /// Birth date (DD/MM/YYYY)
        birth: String,
        /// Height in meters
        #[arg(long)]
        height: Option<f64>,
        /// Weight in kilograms
        #[arg(long)]
        weight: Option<f64>,
    },
    /// List students with their BMI
    List {
        /// Name filter
        filter: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Delete a student and their recorded sessions
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum ExerciseCmd {
    /// Add an exercise to the catalog
    Add { name: String, group: String },
    /// List exercises
    List {
        /// Name or muscle group filter
        filter: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Delete an exercise (fails while plans or sessions reference it)
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum PlanCmd {
    /// Create a plan
    Create { name: String },
    /// List plans
    List {
        /// Name filter
        filter: Option<String>,
    },
    /// Add an exercise to a plan, or replace its position and targets
    AddEntry {
        plan: i64,
        exercise: i64,
        /// Position within the plan; defaults to the next free slot
        #[arg(long)]
        order: Option<i32>,
        #[arg(long, default_value = "3")]
        series: i32,
        #[arg(long, default_value = "10")]
        reps: i32,
    },
    /// Remove an exercise from a plan
    RemoveEntry { plan: i64, exercise: i64 },
    /// Show a plan's checklist entries
    Entries { plan: i64 },
    /// Delete a plan and every session recorded from it
    Delete { plan: i64 },
}

#[derive(Subcommand)]
enum SessionCmd {
    /// Record a session from a plan's checklist
    Record {
        #[arg(long)]
        student: i64,
        #[arg(long)]
        plan: i64,
        /// Session date (DD/MM/YYYY), defaults to today
        #[arg(long)]
        date: Option<String>,
        /// Exercise ids to mark as done, comma separated
        #[arg(long, value_delimiter = ',')]
        done: Vec<i64>,
        /// Actuals per exercise as ID=SERIESxREPS[@WEIGHT], e.g. 5=3x10@42,5
        #[arg(long = "result")]
        results: Vec<String>,
        /// Note per exercise as ID=TEXT
        #[arg(long = "note")]
        notes: Vec<String>,
    },
    /// List past sessions, newest first
    List {
        /// Student name filter
        filter: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show one session's recorded items
    Show {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Delete a session and its items
    Delete { id: i64 },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut db = Database::open(&cli.db)?;

    match cli.command {
        Commands::Student { action } => run_student(&db, action)?,
        Commands::Exercise { action } => run_exercise(&db, action)?,
        Commands::Plan { action } => run_plan(&mut db, action)?,
        Commands::Session { action } => run_session(&mut db, action)?,
    }

    Ok(())
}

fn run_student(db: &Database, action: StudentCmd) -> Result<()> {
    match action {
        StudentCmd::Add {
            name,
            birth,
            height,
            weight,
        } => {
            let id = db.add_student(&name, &birth, height, weight)?;
            println!("Student registered (id: {id})");
        }
        StudentCmd::List { filter, json } => {
            let students = db.list_students(filter.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&students)?);
                return Ok(());
            }
            if students.is_empty() {
                println!("No students.");
                return Ok(());
            }
            for s in &students {
                let b = bmi::bmi(s.weight_kg, s.height_m);
                let bmi_str = match b.value {
                    Some(v) => format!("{v:.2} ({})", b.category.label()),
                    None => b.category.label().to_string(),
                };
                println!(
                    "{:<4} | {:24} | {} | BMI: {}",
                    s.id,
                    s.name,
                    dates::to_display(&s.birth_date),
                    bmi_str
                );
            }
        }
        StudentCmd::Delete { id } => {
            if db.delete_student(id)? > 0 {
                println!("Student removed.");
            } else {
                println!("No student with id {id}.");
            }
        }
    }
    Ok(())
}

fn run_exercise(db: &Database, action: ExerciseCmd) -> Result<()> {
    match action {
        ExerciseCmd::Add { name, group } => {
            let id = db.add_exercise(&name, &group)?;
            println!("Exercise added (id: {id})");
        }
        ExerciseCmd::List { filter, json } => {
            let exercises = db.list_exercises(filter.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&exercises)?);
                return Ok(());
            }
            for e in &exercises {
                println!("{:<4} | {:24} | {}", e.id, e.name, e.muscle_group);
            }
        }
        ExerciseCmd::Delete { id } => {
            if db.delete_exercise(id)? > 0 {
                println!("Exercise removed.");
            } else {
                println!("No exercise with id {id}.");
            }
        }
    }
    Ok(())
}

fn run_plan(db: &mut Database, action: PlanCmd) -> Result<()> {
    match action {
        PlanCmd::Create { name } => {
            let id = db.create_plan(&name)?;
            println!("Plan created (id: {id})");
        }
        PlanCmd::List { filter } => {
            for p in db.list_plans(filter.as_deref())? {
                println!("{:<4} | {}", p.id, p.name);
            }
        }
        PlanCmd::AddEntry {
            plan,
            exercise,
            order,
            series,
            reps,
        } => {
            let position = match order {
                Some(o) => o,
                None => db.next_order(plan)?,
            };
            db.add_or_replace_entry(plan, exercise, position, series, reps)?;
            println!("Entry saved at position {position}.");
        }
        PlanCmd::RemoveEntry { plan, exercise } => {
            if db.remove_entry(plan, exercise)? > 0 {
                println!("Entry removed.");
            } else {
                println!("Plan {plan} has no entry for exercise {exercise}.");
            }
        }
        PlanCmd::Entries { plan } => {
            let entries = db.list_entries(plan)?;
            if entries.is_empty() {
                println!("Plan has no exercises.");
                return Ok(());
            }
            for e in &entries {
                println!(
                    "{:02} | {:12} | {:24} | {}x{}",
                    e.position, e.muscle_group, e.exercise_name, e.series, e.reps
                );
            }
        }
        PlanCmd::Delete { plan } => {
            if db.delete_plan(plan)? > 0 {
                println!("Plan and its sessions removed.");
            } else {
                println!("No plan with id {plan}.");
            }
        }
    }
    Ok(())
}

fn run_session(db: &mut Database, action: SessionCmd) -> Result<()> {
    match action {
        SessionCmd::Record {
            student,
            plan,
            date,
            done,
            results,
            notes,
        } => {
            let mut rec = SessionRecorder::new();
            rec.select_student(student);
            let loaded = rec.select_plan(db, plan)?;
            println!("Checklist: {loaded} exercises");
            if let Some(date) = date {
                rec.set_date(&date);
            }

            for id in done {
                match rec.line_mut(id) {
                    Some(line) => line.done = true,
                    None => bail!("exercise {id} is not part of plan {plan}"),
                }
            }
            for spec in &results {
                let (id, series, reps, weight) = parse_result_spec(spec)?;
                let Some(line) = rec.line_mut(id) else {
                    bail!("exercise {id} is not part of plan {plan}");
                };
                line.actual_series = series;
                line.actual_reps = reps;
                line.avg_weight = weight;
            }
            for spec in &notes {
                let (id, text) = parse_note_spec(spec)?;
                let Some(line) = rec.line_mut(id) else {
                    bail!("exercise {id} is not part of plan {plan}");
                };
                line.note = text;
            }

            let written = rec.save(db)?;
            println!("Session recorded with {written} exercises.");
        }
        SessionCmd::List { filter, json } => {
            let sessions = db.list_sessions(filter.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sessions)?);
                return Ok(());
            }
            if sessions.is_empty() {
                println!("No sessions.");
                return Ok(());
            }
            for s in &sessions {
                println!(
                    "#{:<4} {} | {:24} | {}",
                    s.id,
                    dates::to_display(&s.date),
                    s.student_name,
                    s.plan_name
                );
            }
        }
        SessionCmd::Show { id, json } => {
            let items = db.session_detail(id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
                return Ok(());
            }
            if items.is_empty() {
                println!("No items for session {id}.");
                return Ok(());
            }
            for item in &items {
                println!(
                    "[{}] {:12} | {:24} | series: {:>3} reps: {:>3} weight: {:>6} | {}",
                    if item.done { "x" } else { " " },
                    item.muscle_group,
                    item.exercise_name,
                    fmt_opt_int(item.actual_series),
                    fmt_opt_int(item.actual_reps),
                    fmt_opt_weight(item.avg_weight),
                    item.note.as_deref().unwrap_or("—")
                );
            }
        }
        SessionCmd::Delete { id } => {
            if db.delete_session(id)? > 0 {
                println!("Session removed.");
            } else {
                println!("No session with id {id}.");
            }
        }
    }
    Ok(())
}

/// Parse "5=3x10@42,5" into exercise id plus raw series/reps/weight text.
/// The raw text is validated by the recorder at save time.
fn parse_result_spec(spec: &str) -> Result<(i64, String, String, String)> {
    let (id, rest) = spec
        .split_once('=')
        .with_context(|| format!("invalid result '{spec}', expected ID=SERIESxREPS[@WEIGHT]"))?;
    let id: i64 = id
        .trim()
        .parse()
        .with_context(|| format!("invalid exercise id in result '{spec}'"))?;

    let (sets, weight) = match rest.split_once('@') {
        Some((sets, weight)) => (sets, weight.trim().to_string()),
        None => (rest, String::new()),
    };
    let (series, reps) = sets
        .split_once('x')
        .with_context(|| format!("invalid result '{spec}', expected ID=SERIESxREPS[@WEIGHT]"))?;

    Ok((
        id,
        series.trim().to_string(),
        reps.trim().to_string(),
        weight,
    ))
}

/// Parse "5=felt heavy" into exercise id and note text
fn parse_note_spec(spec: &str) -> Result<(i64, String)> {
    let (id, text) = spec
        .split_once('=')
        .with_context(|| format!("invalid note '{spec}', expected ID=TEXT"))?;
    let id: i64 = id
        .trim()
        .parse()
        .with_context(|| format!("invalid exercise id in note '{spec}'"))?;
    Ok((id, text.to_string()))
}

fn fmt_opt_int(value: Option<i32>) -> String {
    value.map_or_else(|| "—".to_string(), |v| v.to_string())
}

fn fmt_opt_weight(value: Option<f64>) -> String {
    value.map_or_else(|| "—".to_string(), |v| format!("{v:.1}"))
}

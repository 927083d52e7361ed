//! Registrar: course registration CLI.
//!
//! # Usage
//!
//! ```text
//! registrar [--data-dir <dir>] courses [--json]
//! registrar course add <code> --title <t> --capacity <n> [--day <d> --start HH:MM --end HH:MM]
//! registrar course update <code> [--title <t>] [--capacity <n>] [--day ... --start ... --end ...]
//! registrar course remove <code>
//! registrar course roster <code>
//! registrar student create <username> --password <pw> --student-id <id> [...]
//! registrar student list
//! registrar student show <username> --password <pw>
//! registrar register <username> <code> --password <pw>
//! registrar drop <username> <code> --password <pw>
//! registrar admin add|list|remove|login
//! ```
//!
//! Data lives in `~/.registrar/` unless `--data-dir` is given.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use commands::{
    admin::AdminCommand,
    course::{CourseCommand, CoursesArgs},
    enroll::EnrollArgs,
    student::StudentCommand,
};
use registrar_core::{config, DataPaths};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "registrar",
    version,
    about = "Course registration with schedule-conflict checking",
    long_about = None,
)]
struct Cli {
    /// Directory holding registrar.yaml and the record files (default: ~/.registrar).
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every course with seats remaining and schedule.
    Courses(CoursesArgs),

    /// Add, update, remove or inspect a course.
    Course {
        #[command(subcommand)]
        command: CourseCommand,
    },

    /// Create, list or show students.
    Student {
        #[command(subcommand)]
        command: StudentCommand,
    },

    /// Register a student for a course.
    Register(EnrollArgs),

    /// Drop a course for a student.
    Drop(EnrollArgs),

    /// Manage admin accounts.
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let paths = resolve_paths(cli.data_dir)?;
    match cli.command {
        Commands::Courses(args) => args.run(&paths),
        Commands::Course { command } => commands::course::run(command, &paths),
        Commands::Student { command } => commands::student::run(command, &paths),
        Commands::Register(args) => args.register(&paths),
        Commands::Drop(args) => args.drop_course(&paths),
        Commands::Admin { command } => commands::admin::run(command, &paths),
    }
}

fn resolve_paths(data_dir: Option<PathBuf>) -> Result<DataPaths> {
    let dir = match data_dir {
        Some(dir) => dir,
        None => config::data_dir().context("could not determine data directory")?,
    };
    let paths = config::data_paths_at(&dir)
        .with_context(|| format!("failed to read configuration in '{}'", dir.display()))?;
    tracing::debug!(
        courses = %paths.courses.display(),
        students = %paths.students.display(),
        admins = %paths.admins.display(),
        "resolved data files"
    );
    Ok(paths)
}

/// Logs go to stderr; stdout is reserved for command output.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

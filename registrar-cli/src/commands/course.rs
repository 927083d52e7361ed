//! `registrar courses` and `registrar course add|update|remove|roster`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use registrar_core::{
    Course, CourseCode, CourseSummary, CourseUpdate, DataPaths, RegistrationSystem, TimeSlot,
};

/// Arguments for `registrar courses`.
#[derive(Args, Debug)]
pub struct CoursesArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

/// Admin course management.
#[derive(Subcommand, Debug)]
pub enum CourseCommand {
    /// Add a new course to the catalogue.
    Add(AddArgs),

    /// Change title, capacity or schedule. Capacity is not checked against the roster.
    Update(UpdateArgs),

    /// Remove a course; enrolled students lose it from their lists.
    Remove {
        /// Course code, e.g. CS101.
        code: String,
    },

    /// Show the student IDs enrolled in a course.
    Roster {
        /// Course code, e.g. CS101.
        code: String,
    },
}

/// Weekly slot flags shared by `add` and `update`.
#[derive(Args, Debug, Default)]
pub struct ScheduleArgs {
    /// Day of week, e.g. Monday.
    #[arg(long, requires_all = ["start", "end"])]
    pub day: Option<String>,

    /// Start time, HH:MM (24-hour).
    #[arg(long, requires = "day")]
    pub start: Option<String>,

    /// End time, HH:MM (24-hour).
    #[arg(long, requires = "day")]
    pub end: Option<String>,
}

impl ScheduleArgs {
    fn into_slot(self) -> Option<TimeSlot> {
        match (self.day, self.start, self.end) {
            (Some(day), Some(start), Some(end)) => Some(TimeSlot::new(day, start, end)),
            _ => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Unique course code.
    pub code: String,

    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub capacity: u32,

    #[command(flatten)]
    pub schedule: ScheduleArgs,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub code: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub capacity: Option<u32>,

    #[command(flatten)]
    pub schedule: ScheduleArgs,

    /// Make the course unscheduled (it will never conflict).
    #[arg(long, conflicts_with = "day")]
    pub clear_schedule: bool,
}

#[derive(Tabled)]
struct CourseRow {
    #[tabled(rename = "code")]
    code: String,
    #[tabled(rename = "title")]
    title: String,
    #[tabled(rename = "capacity")]
    capacity: u32,
    #[tabled(rename = "seats left")]
    seats_remaining: i64,
    #[tabled(rename = "schedule")]
    schedule: String,
}

impl CoursesArgs {
    pub fn run(self, paths: &DataPaths) -> Result<()> {
        let system = RegistrationSystem::open(paths).context("failed to load registration data")?;
        let summary = system.list_courses();

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&summary).context("failed to serialize courses")?
            );
            return Ok(());
        }

        print_table(summary);
        Ok(())
    }
}

pub fn run(command: CourseCommand, paths: &DataPaths) -> Result<()> {
    let mut system = RegistrationSystem::open(paths).context("failed to load registration data")?;

    match command {
        CourseCommand::Add(args) => {
            let slot = args.schedule.into_slot().unwrap_or_default();
            let course = Course::with_schedule(args.code.as_str(), args.title, args.capacity, slot);
            system
                .add_course(course)
                .with_context(|| format!("failed to add course '{}'", args.code))?;
            system.save_courses().context("failed to save courses")?;
            println!("✓ Added course '{}'", args.code);
        }
        CourseCommand::Update(args) => {
            let schedule = if args.clear_schedule {
                Some(TimeSlot::unscheduled())
            } else {
                args.schedule.into_slot()
            };
            let update = CourseUpdate {
                title: args.title,
                capacity: args.capacity,
                schedule,
            };
            let course = system
                .update_course(&CourseCode::from(args.code.as_str()), update)
                .with_context(|| format!("failed to update course '{}'", args.code))?;
            if course.seats_remaining() < 0 {
                println!(
                    "{} capacity {} is below the {} students already enrolled",
                    "warning:".yellow().bold(),
                    course.capacity(),
                    course.enrolled_student_ids().len()
                );
            }
            system.save_courses().context("failed to save courses")?;
            println!("✓ Updated course '{}'", args.code);
        }
        CourseCommand::Remove { code } => {
            let removed = system
                .remove_course(&CourseCode::from(code.as_str()))
                .with_context(|| format!("failed to remove course '{code}'"))?;
            system.save_data().context("failed to save registration data")?;
            println!(
                "✓ Removed course '{}' ({} students unenrolled)",
                removed.code(),
                removed.enrolled_student_ids().len()
            );
        }
        CourseCommand::Roster { code } => {
            let ids = system
                .enrolled_student_ids(&CourseCode::from(code.as_str()))
                .with_context(|| format!("cannot show roster for '{code}'"))?;
            if ids.is_empty() {
                println!("No students enrolled in '{code}'.");
                return Ok(());
            }
            println!("{} ({} enrolled)", code.bold(), ids.len());
            for id in ids {
                let name = system
                    .students()
                    .iter()
                    .find(|s| &s.student_id == id)
                    .map(|s| s.name.as_str())
                    .unwrap_or("?");
                println!("  {id}  {name}");
            }
        }
    }
    Ok(())
}

pub(crate) fn format_slot(slot: &TimeSlot) -> String {
    if slot.is_scheduled() {
        format!("{} {}-{}", slot.day, slot.start, slot.end)
    } else {
        "unscheduled".to_string()
    }
}

fn print_table(summary: Vec<CourseSummary>) {
    let full = summary.iter().filter(|c| c.seats_remaining <= 0).count();
    println!(
        "{} courses | {} full",
        summary.len(),
        if full > 0 {
            full.to_string().red().bold().to_string()
        } else {
            full.to_string().green().to_string()
        }
    );

    let rows: Vec<CourseRow> = summary
        .into_iter()
        .map(|c| CourseRow {
            schedule: format_slot(&c.schedule),
            code: c.code.0,
            title: c.title,
            capacity: c.capacity,
            seats_remaining: c.seats_remaining,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

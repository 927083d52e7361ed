//! `registrar student create|list|show`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tabled::{settings::Style, Table, Tabled};

use registrar_core::{DataPaths, NewStudent, RegistrationSystem, User, Username};

use super::course::format_slot;

#[derive(Subcommand, Debug)]
pub enum StudentCommand {
    /// Create a student account.
    Create(CreateArgs),

    /// List all students (no passwords).
    List,

    /// Log in and show a student's profile and timetable.
    Show {
        username: String,

        #[arg(long, short = 'p')]
        password: String,
    },
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Unique login name.
    pub username: String,

    #[arg(long, short = 'p')]
    pub password: String,

    /// Roster key; must be unique across students.
    #[arg(long)]
    pub student_id: String,

    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub user_id: String,

    #[arg(long, default_value = "")]
    pub major: String,

    #[arg(long, default_value_t = 0.0)]
    pub gpa: f64,
}

#[derive(Tabled)]
struct StudentRow {
    #[tabled(rename = "username")]
    username: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "student id")]
    student_id: String,
    #[tabled(rename = "major")]
    major: String,
    #[tabled(rename = "gpa")]
    gpa: f64,
    #[tabled(rename = "courses")]
    courses: usize,
}

pub fn run(command: StudentCommand, paths: &DataPaths) -> Result<()> {
    match command {
        StudentCommand::Create(args) => create(args, paths),
        StudentCommand::List => list(paths),
        StudentCommand::Show { username, password } => show(&username, &password, paths),
    }
}

fn create(args: CreateArgs, paths: &DataPaths) -> Result<()> {
    let mut system = RegistrationSystem::open(paths).context("failed to load registration data")?;
    let username = Username::from(args.username.as_str());
    system
        .create_student(NewStudent {
            username: args.username,
            password: args.password,
            email: args.email,
            name: args.name,
            user_id: args.user_id,
            student_id: args.student_id,
            major: args.major,
            gpa: args.gpa,
        })
        .with_context(|| format!("cannot create student '{username}'"))?;

    if paths.students.exists() {
        system
            .append_student(&username)
            .context("failed to append student record")?;
    } else {
        system.save_students().context("failed to save students")?;
    }

    println!("✓ Created student '{username}'");
    Ok(())
}

fn list(paths: &DataPaths) -> Result<()> {
    let system = RegistrationSystem::open(paths).context("failed to load registration data")?;
    if system.students().is_empty() {
        println!("No students registered.");
        println!("Run: registrar student create <username> --password <pw> --student-id <id>");
        return Ok(());
    }

    let rows: Vec<StudentRow> = system
        .students()
        .iter()
        .map(|s| StudentRow {
            username: s.username.0.clone(),
            name: s.name.clone(),
            student_id: s.student_id.0.clone(),
            major: s.major.clone(),
            gpa: s.gpa,
            courses: s.total_enrolled_courses(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

fn show(username: &str, password: &str, paths: &DataPaths) -> Result<()> {
    let system = RegistrationSystem::open(paths).context("failed to load registration data")?;
    let student = system.login(username, password).context("login failed")?;

    println!("{} [{}]", student.display_name(), student.user_type());
    println!("  username:   {}", student.username);
    println!("  email:      {}", student.email);
    println!("  student id: {}", student.student_id);
    println!("  major:      {}", student.major);
    println!("  gpa:        {}", student.gpa);

    let courses = system.student_courses(&student.username)?;
    if courses.is_empty() {
        println!("Not enrolled in any courses yet.");
        return Ok(());
    }
    println!("Enrolled courses ({}):", courses.len());
    for (i, course) in courses.iter().enumerate() {
        println!(
            "  {}. {}  {}  [{}]",
            i + 1,
            course.code(),
            course.title(),
            format_slot(course.schedule())
        );
    }
    Ok(())
}

//! The registration system: course and student collections for one
//! file-backed session, plus the rules that keep them in step.
//!
//! A course code is in a student's list if and only if that student's ID is in
//! the course roster. Every mutating operation here either updates both sides
//! or neither.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::DataPaths;
use crate::error::{invalid, RegistrationError};
use crate::schedule::TimeSlot;
use crate::store::{RecordStore, FIELD_SEP, LIST_SEP};
use crate::types::{authenticate, Course, CourseCode, NewStudent, Student, StudentId, Username};

/// The starter catalogue used when no courses could be loaded.
pub fn seed_courses() -> Vec<Course> {
    vec![
        Course::with_schedule(
            "CS101",
            "Intro to Programming",
            30,
            TimeSlot::new("Monday", "09:00", "10:30"),
        ),
        Course::with_schedule(
            "MATH201",
            "Discrete Mathematics",
            25,
            TimeSlot::new("Tuesday", "14:00", "15:30"),
        ),
        Course::with_schedule(
            "ENG150",
            "Academic Writing",
            40,
            TimeSlot::new("Wednesday", "10:00", "11:30"),
        ),
    ]
}

/// One row of the course listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseSummary {
    pub code: CourseCode,
    pub title: String,
    pub capacity: u32,
    pub enrolled: usize,
    pub seats_remaining: i64,
    pub schedule: TimeSlot,
}

/// Admin edits applied by [`RegistrationSystem::update_course`].
/// `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub capacity: Option<u32>,
    pub schedule: Option<TimeSlot>,
}

/// A break in roster/course-list agreement, as found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    /// The roster lists an ID, but no student with that ID lists the course.
    RosterOnly {
        code: CourseCode,
        student_id: StudentId,
    },
    /// The student lists a course whose roster lacks them, or that does not exist.
    StudentOnly { username: Username, code: CourseCode },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inconsistency::RosterOnly { code, student_id } => write!(
                f,
                "{code} roster lists {student_id}, but no student with that ID lists {code}"
            ),
            Inconsistency::StudentOnly { username, code } => {
                write!(f, "{username} lists {code}, but is not on its roster")
            }
        }
    }
}

/// Owns every `Course` and `Student` for one session.
#[derive(Debug)]
pub struct RegistrationSystem {
    courses: Vec<Course>,
    students: Vec<Student>,
    course_store: RecordStore<Course>,
    student_store: RecordStore<Student>,
}

impl RegistrationSystem {
    /// An empty system bound to the given files. Nothing is read yet.
    pub fn new(students_path: impl Into<PathBuf>, courses_path: impl Into<PathBuf>) -> Self {
        Self {
            courses: Vec::new(),
            students: Vec::new(),
            course_store: RecordStore::new(courses_path),
            student_store: RecordStore::new(students_path),
        }
    }

    /// Bind to `paths` and load both collections.
    pub fn open(paths: &DataPaths) -> Result<Self, RegistrationError> {
        let mut system = Self::new(&paths.students, &paths.courses);
        system.load_data()?;
        Ok(system)
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Courses first, then students; mismatches between the two are logged.
    pub fn load_data(&mut self) -> Result<(), RegistrationError> {
        self.load_courses()?;
        self.load_students()?;
        for issue in self.consistency_report() {
            tracing::warn!(%issue, "roster and student records disagree");
        }
        Ok(())
    }

    pub fn save_data(&self) -> Result<(), RegistrationError> {
        self.save_courses()?;
        self.save_students()
    }

    /// Replace the in-memory catalogue with the course file. Seeds the starter
    /// catalogue when the file is missing or yields no courses.
    pub fn load_courses(&mut self) -> Result<(), RegistrationError> {
        self.courses = self.course_store.load()?;
        if self.courses.is_empty() {
            tracing::info!("no courses loaded; starting with the sample course list");
            self.courses = seed_courses();
        }
        Ok(())
    }

    pub fn load_students(&mut self) -> Result<(), RegistrationError> {
        self.students = self.student_store.load()?;
        Ok(())
    }

    pub fn save_courses(&self) -> Result<(), RegistrationError> {
        self.course_store.save(&self.courses)
    }

    pub fn save_students(&self) -> Result<(), RegistrationError> {
        self.student_store.save(&self.students)
    }

    /// Append a single student record without rewriting the file.
    pub fn append_student(&self, username: &Username) -> Result<(), RegistrationError> {
        let student = self
            .find_student(username)
            .ok_or_else(|| not_found("student", username))?;
        self.student_store.append(student)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn find_course(&self, code: &CourseCode) -> Option<&Course> {
        self.courses.iter().find(|c| c.code() == code)
    }

    pub fn find_student(&self, username: &Username) -> Option<&Student> {
        self.students.iter().find(|s| &s.username == username)
    }

    pub fn enrolled_student_ids(&self, code: &CourseCode) -> Result<&[StudentId], RegistrationError> {
        self.find_course(code)
            .map(Course::enrolled_student_ids)
            .ok_or_else(|| not_found("course", code))
    }

    pub fn list_courses(&self) -> Vec<CourseSummary> {
        self.courses
            .iter()
            .map(|c| CourseSummary {
                code: c.code().clone(),
                title: c.title().to_owned(),
                capacity: c.capacity(),
                enrolled: c.enrolled_student_ids().len(),
                seats_remaining: c.seats_remaining(),
                schedule: c.schedule().clone(),
            })
            .collect()
    }

    /// The student's courses that still exist in the catalogue, in list order.
    pub fn student_courses(&self, username: &Username) -> Result<Vec<&Course>, RegistrationError> {
        let student = self
            .find_student(username)
            .ok_or_else(|| not_found("student", username))?;
        Ok(student
            .enrolled_courses()
            .iter()
            .filter_map(|code| self.find_course(code))
            .collect())
    }

    // -----------------------------------------------------------------------
    // Accounts
    // -----------------------------------------------------------------------

    /// Add a student to the session. Not persisted until `save_students` or
    /// `append_student`.
    pub fn create_student(&mut self, profile: NewStudent) -> Result<&Student, RegistrationError> {
        check_key("username", &profile.username)?;
        check_key("student ID", &profile.student_id)?;
        for (field, value) in [
            ("password", &profile.password),
            ("email", &profile.email),
            ("name", &profile.name),
            ("user ID", &profile.user_id),
            ("major", &profile.major),
        ] {
            check_text(field, value)?;
        }
        if !profile.gpa.is_finite() {
            return Err(invalid("gpa", "must be a finite number"));
        }

        if self.students.iter().any(|s| s.username.0 == profile.username) {
            return Err(RegistrationError::DuplicateEntry {
                kind: "username",
                value: profile.username,
            });
        }
        if self.students.iter().any(|s| s.student_id.0 == profile.student_id) {
            return Err(RegistrationError::DuplicateEntry {
                kind: "student ID",
                value: profile.student_id,
            });
        }

        tracing::info!(username = %profile.username, "student created");
        self.students.push(Student::new(profile));
        let idx = self.students.len() - 1;
        Ok(&self.students[idx])
    }

    /// Unknown username and wrong password fail identically.
    pub fn login(&self, username: &str, password: &str) -> Result<&Student, RegistrationError> {
        authenticate(&self.students, username, password)
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    /// Enroll `username` in `code`.
    ///
    /// Checks the target against every course the student already holds and
    /// fails with `TimeConflict` on the first overlap. Roster errors
    /// (`CourseFull`, `DuplicateEntry`) propagate unchanged. Nothing changes
    /// unless both the roster and the student's list are updated.
    pub fn register_for_course(
        &mut self,
        username: &Username,
        code: &CourseCode,
    ) -> Result<(), RegistrationError> {
        let s_idx = self
            .student_index(username)
            .ok_or_else(|| not_found("student", username))?;
        let c_idx = self
            .course_index(code)
            .ok_or_else(|| not_found("course", code))?;

        let target = &self.courses[c_idx];
        let student = &self.students[s_idx];
        for held in student.enrolled_courses() {
            // Re-registering for a held course is a duplicate, not a conflict.
            if held == code {
                continue;
            }
            let Some(other) = self.find_course(held) else {
                continue;
            };
            if target.has_time_conflict(other) {
                return Err(RegistrationError::TimeConflict {
                    course: code.0.clone(),
                    conflicts_with: held.0.clone(),
                    day: target.schedule().day.clone(),
                });
            }
        }

        let student_id = student.student_id.clone();
        self.courses[c_idx].enroll_student(&student_id)?;
        self.students[s_idx].add_course(code.clone());
        tracing::info!(%username, %code, "registered");
        Ok(())
    }

    /// Remove `username` from `code`. Fails with `NotEnrolled` if the roster
    /// does not list the student; nothing changes in that case.
    pub fn drop_course(
        &mut self,
        username: &Username,
        code: &CourseCode,
    ) -> Result<(), RegistrationError> {
        let s_idx = self
            .student_index(username)
            .ok_or_else(|| not_found("student", username))?;
        let c_idx = self
            .course_index(code)
            .ok_or_else(|| not_found("course", code))?;

        let student_id = self.students[s_idx].student_id.clone();
        self.courses[c_idx].drop_student(&student_id)?;
        self.students[s_idx].remove_course(code);
        tracing::info!(%username, %code, "dropped");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Admin course management
    // -----------------------------------------------------------------------

    pub fn add_course(&mut self, course: Course) -> Result<(), RegistrationError> {
        check_key("course code", course.code().as_str())?;
        check_text("title", course.title())?;
        check_schedule(course.schedule())?;
        if self.course_index(course.code()).is_some() {
            return Err(RegistrationError::DuplicateEntry {
                kind: "course",
                value: course.code().0.clone(),
            });
        }
        tracing::info!(code = %course.code(), "course added");
        self.courses.push(course);
        Ok(())
    }

    /// Remove a course and strip its code from every student's list.
    pub fn remove_course(&mut self, code: &CourseCode) -> Result<Course, RegistrationError> {
        let idx = self
            .course_index(code)
            .ok_or_else(|| not_found("course", code))?;
        let removed = self.courses.remove(idx);
        let affected = self
            .students
            .iter_mut()
            .map(|s| s.remove_course(code))
            .filter(|changed| *changed)
            .count();
        tracing::info!(%code, affected, "course removed");
        Ok(removed)
    }

    /// Apply admin edits. Capacity is not checked against the roster size.
    pub fn update_course(
        &mut self,
        code: &CourseCode,
        update: CourseUpdate,
    ) -> Result<&Course, RegistrationError> {
        if let Some(title) = &update.title {
            check_text("title", title)?;
        }
        if let Some(schedule) = &update.schedule {
            check_schedule(schedule)?;
        }
        let idx = self
            .course_index(code)
            .ok_or_else(|| not_found("course", code))?;

        let course = &mut self.courses[idx];
        if let Some(title) = update.title {
            course.set_title(title);
        }
        if let Some(capacity) = update.capacity {
            course.set_capacity(capacity);
        }
        if let Some(schedule) = update.schedule {
            course.set_schedule(schedule);
        }
        Ok(&self.courses[idx])
    }

    // -----------------------------------------------------------------------
    // Consistency
    // -----------------------------------------------------------------------

    /// Every place where rosters and student course lists disagree.
    pub fn consistency_report(&self) -> Vec<Inconsistency> {
        let mut issues = Vec::new();
        for course in &self.courses {
            for id in course.enrolled_student_ids() {
                let listed = self
                    .students
                    .iter()
                    .any(|s| &s.student_id == id && s.is_enrolled_in(course.code()));
                if !listed {
                    issues.push(Inconsistency::RosterOnly {
                        code: course.code().clone(),
                        student_id: id.clone(),
                    });
                }
            }
        }
        for student in &self.students {
            for code in student.enrolled_courses() {
                let on_roster = self
                    .find_course(code)
                    .is_some_and(|c| c.is_student_enrolled(&student.student_id));
                if !on_roster {
                    issues.push(Inconsistency::StudentOnly {
                        username: student.username.clone(),
                        code: code.clone(),
                    });
                }
            }
        }
        issues
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn course_index(&self, code: &CourseCode) -> Option<usize> {
        self.courses.iter().position(|c| c.code() == code)
    }

    fn student_index(&self, username: &Username) -> Option<usize> {
        self.students.iter().position(|s| &s.username == username)
    }
}

fn not_found(kind: &'static str, key: &impl fmt::Display) -> RegistrationError {
    RegistrationError::NotFound {
        kind,
        key: key.to_string(),
    }
}

/// Free text: must not break the line format.
fn check_text(field: &str, value: &str) -> Result<(), RegistrationError> {
    if value.contains(FIELD_SEP) || value.contains(['\n', '\r']) {
        return Err(invalid(
            field,
            format!("must not contain '{FIELD_SEP}' or line breaks"),
        ));
    }
    Ok(())
}

/// Keys also appear inside `,`-joined lists and must be non-empty.
fn check_key(field: &str, value: &str) -> Result<(), RegistrationError> {
    if value.trim().is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    if value.contains(LIST_SEP) {
        return Err(invalid(field, format!("must not contain '{LIST_SEP}'")));
    }
    check_text(field, value)
}

fn check_schedule(slot: &TimeSlot) -> Result<(), RegistrationError> {
    check_text("day", &slot.day)?;
    check_text("start time", &slot.start)?;
    check_text("end time", &slot.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn system(dir: &TempDir) -> RegistrationSystem {
        RegistrationSystem::new(dir.path().join("students.txt"), dir.path().join("courses.txt"))
    }

    fn profile(username: &str, student_id: &str) -> NewStudent {
        NewStudent {
            username: username.into(),
            password: "pw".into(),
            student_id: student_id.into(),
            ..NewStudent::default()
        }
    }

    #[test]
    fn seed_catalogue_is_exact() {
        let seeds = seed_courses();
        let codes: Vec<_> = seeds.iter().map(|c| c.code().as_str()).collect();
        assert_eq!(codes, ["CS101", "MATH201", "ENG150"]);
        assert_eq!(seeds[1].title(), "Discrete Mathematics");
        assert_eq!(seeds[1].capacity(), 25);
        assert_eq!(seeds[1].schedule(), &TimeSlot::new("Tuesday", "14:00", "15:30"));
    }

    #[test]
    fn create_student_rejects_bad_fields() {
        let dir = TempDir::new().unwrap();
        let mut sys = system(&dir);
        let err = sys.create_student(profile("", "S1")).unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidInput { .. }));
        let err = sys.create_student(profile("a|b", "S1")).unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidInput { .. }));
        let err = sys.create_student(profile("alice", "S1,S2")).unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidInput { .. }));
        assert!(sys.students().is_empty());
    }

    #[test]
    fn duplicate_student_id_rejected() {
        let dir = TempDir::new().unwrap();
        let mut sys = system(&dir);
        sys.create_student(profile("alice", "S1")).unwrap();
        let err = sys.create_student(profile("bob", "S1")).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateEntry { kind: "student ID", .. }));
    }

    #[test]
    fn reregistering_reports_duplicate_not_conflict() {
        let dir = TempDir::new().unwrap();
        let mut sys = system(&dir);
        sys.load_courses().unwrap();
        sys.create_student(profile("alice", "S1")).unwrap();
        let alice = Username::from("alice");
        let cs101 = CourseCode::from("CS101");
        sys.register_for_course(&alice, &cs101).unwrap();
        let err = sys.register_for_course(&alice, &cs101).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateEntry { .. }), "got: {err}");
    }

    #[test]
    fn stale_code_in_student_list_does_not_block_registration() {
        let dir = TempDir::new().unwrap();
        let mut sys = system(&dir);
        sys.load_courses().unwrap();
        sys.create_student(profile("alice", "S1")).unwrap();
        sys.students[0].add_course(CourseCode::from("GONE999"));
        sys.register_for_course(&Username::from("alice"), &CourseCode::from("CS101"))
            .unwrap();
    }

    #[test]
    fn update_course_is_unchecked() {
        let dir = TempDir::new().unwrap();
        let mut sys = system(&dir);
        sys.load_courses().unwrap();
        sys.create_student(profile("alice", "S1")).unwrap();
        let cs101 = CourseCode::from("CS101");
        sys.register_for_course(&Username::from("alice"), &cs101).unwrap();

        let course = sys
            .update_course(
                &cs101,
                CourseUpdate {
                    capacity: Some(0),
                    title: Some("Programming I".into()),
                    ..CourseUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(course.title(), "Programming I");
        assert_eq!(course.seats_remaining(), -1);
        assert_eq!(course.enrolled_student_ids().len(), 1);
    }

    #[test]
    fn inconsistency_display() {
        let issue = Inconsistency::StudentOnly {
            username: Username::from("alice"),
            code: CourseCode::from("CS101"),
        };
        assert_eq!(issue.to_string(), "alice lists CS101, but is not on its roster");
    }
}

//! Domain types for the course registrar.
//!
//! `Course` and `Student` are plain records. `Course` guards its own roster
//! (capacity and uniqueness), but neither type knows about the other: keeping
//! rosters and student course lists in lock-step is the job of
//! [`RegistrationSystem`](crate::system::RegistrationSystem).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;
use crate::schedule::TimeSlot;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed course code such as `CS101`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseCode(pub String);

impl CourseCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for CourseCode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CourseCode {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The roster-membership key of a student (distinct from the login name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

impl StudentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for StudentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for StudentId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A login name; unique per account file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(pub String);

impl Username {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for Username {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Username {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Which kind of account a [`User`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Admin,
    Student,
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Admin => write!(f, "ADMIN"),
            UserType::Student => write!(f, "STUDENT"),
        }
    }
}

/// Capability shared by every account record.
pub trait User {
    fn username(&self) -> &Username;
    fn display_name(&self) -> &str;
    fn user_type(&self) -> UserType;

    /// Exact, plaintext comparison.
    fn verify_password(&self, password: &str) -> bool;
}

/// Find the account matching `username` whose password is `password`.
///
/// Unknown user and wrong password yield the same error.
pub(crate) fn authenticate<'a, U: User>(
    accounts: &'a [U],
    username: &str,
    password: &str,
) -> Result<&'a U, RegistrationError> {
    accounts
        .iter()
        .find(|u| u.username().as_str() == username)
        .filter(|u| u.verify_password(password))
        .ok_or(RegistrationError::AuthenticationFailure)
}

// ---------------------------------------------------------------------------
// Course
// ---------------------------------------------------------------------------

/// A course offering with a fixed weekly slot and a bounded roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    code: CourseCode,
    title: String,
    capacity: u32,
    schedule: TimeSlot,
    enrolled_student_ids: Vec<StudentId>,
}

impl Course {
    /// An unscheduled course with an empty roster.
    pub fn new(code: impl Into<CourseCode>, title: impl Into<String>, capacity: u32) -> Self {
        Self::with_schedule(code, title, capacity, TimeSlot::unscheduled())
    }

    pub fn with_schedule(
        code: impl Into<CourseCode>,
        title: impl Into<String>,
        capacity: u32,
        schedule: TimeSlot,
    ) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            capacity,
            schedule,
            enrolled_student_ids: Vec::new(),
        }
    }

    pub fn code(&self) -> &CourseCode {
        &self.code
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn schedule(&self) -> &TimeSlot {
        &self.schedule
    }

    pub fn enrolled_student_ids(&self) -> &[StudentId] {
        &self.enrolled_student_ids
    }

    /// `capacity - roster size`. Negative when an admin shrank capacity
    /// below the current roster.
    pub fn seats_remaining(&self) -> i64 {
        i64::from(self.capacity) - self.enrolled_student_ids.len() as i64
    }

    pub fn is_student_enrolled(&self, student_id: &StudentId) -> bool {
        self.enrolled_student_ids.contains(student_id)
    }

    /// Add `student_id` to the roster.
    ///
    /// Fails with `DuplicateEntry` if already present, `CourseFull` if no seats
    /// remain. The roster is untouched on failure.
    pub fn enroll_student(&mut self, student_id: &StudentId) -> Result<(), RegistrationError> {
        if self.is_student_enrolled(student_id) {
            return Err(RegistrationError::DuplicateEntry {
                kind: "student enrollment",
                value: format!("{} in {}", student_id, self.code),
            });
        }
        if self.seats_remaining() <= 0 {
            return Err(RegistrationError::CourseFull {
                code: self.code.0.clone(),
            });
        }
        self.enrolled_student_ids.push(student_id.clone());
        Ok(())
    }

    /// Remove `student_id` from the roster, or fail with `NotEnrolled`.
    pub fn drop_student(&mut self, student_id: &StudentId) -> Result<(), RegistrationError> {
        let Some(pos) = self.enrolled_student_ids.iter().position(|id| id == student_id) else {
            return Err(RegistrationError::NotEnrolled {
                student_id: student_id.0.clone(),
                code: self.code.0.clone(),
            });
        };
        self.enrolled_student_ids.remove(pos);
        Ok(())
    }

    pub fn has_time_conflict(&self, other: &Course) -> bool {
        self.schedule.overlaps(&other.schedule)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Unchecked: a capacity below the current roster size is accepted as-is.
    /// The roster is kept and further enrollment fails until seats free up.
    pub fn set_capacity(&mut self, capacity: u32) {
        self.capacity = capacity;
    }

    pub fn set_schedule(&mut self, schedule: TimeSlot) {
        self.schedule = schedule;
    }
}

// ---------------------------------------------------------------------------
// Student
// ---------------------------------------------------------------------------

/// A student account and its enrolled course codes.
///
/// `add_course`/`remove_course` only edit this list. They perform no capacity or
/// conflict checks; go through the registration system for that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub username: Username,
    pub password: String,
    pub email: String,
    pub name: String,
    pub user_id: String,
    pub student_id: StudentId,
    pub major: String,
    pub gpa: f64,
    enrolled_courses: Vec<CourseCode>,
}

/// Profile fields for [`Student::new`] and
/// [`RegistrationSystem::create_student`](crate::system::RegistrationSystem::create_student).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewStudent {
    pub username: String,
    pub password: String,
    pub email: String,
    pub name: String,
    pub user_id: String,
    pub student_id: String,
    pub major: String,
    pub gpa: f64,
}

impl Student {
    pub fn new(profile: NewStudent) -> Self {
        Self {
            username: Username(profile.username),
            password: profile.password,
            email: profile.email,
            name: profile.name,
            user_id: profile.user_id,
            student_id: StudentId(profile.student_id),
            major: profile.major,
            gpa: profile.gpa,
            enrolled_courses: Vec::new(),
        }
    }

    pub fn enrolled_courses(&self) -> &[CourseCode] {
        &self.enrolled_courses
    }

    pub fn set_enrolled_courses(&mut self, courses: Vec<CourseCode>) {
        self.enrolled_courses = courses;
    }

    pub fn is_enrolled_in(&self, code: &CourseCode) -> bool {
        self.enrolled_courses.contains(code)
    }

    /// Returns `false` if the code was already listed.
    pub fn add_course(&mut self, code: CourseCode) -> bool {
        if self.is_enrolled_in(&code) {
            return false;
        }
        self.enrolled_courses.push(code);
        true
    }

    /// Returns `false` if the code was not listed.
    pub fn remove_course(&mut self, code: &CourseCode) -> bool {
        let before = self.enrolled_courses.len();
        self.enrolled_courses.retain(|c| c != code);
        self.enrolled_courses.len() != before
    }

    pub fn total_enrolled_courses(&self) -> usize {
        self.enrolled_courses.len()
    }
}

impl User for Student {
    fn username(&self) -> &Username {
        &self.username
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn user_type(&self) -> UserType {
        UserType::Student
    }

    fn verify_password(&self, password: &str) -> bool {
        self.password == password
    }
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// An administrator account, stored in its own file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAccount {
    pub username: Username,
    pub password: String,
    pub email: String,
    pub name: String,
    pub user_id: String,
}

impl User for AdminAccount {
    fn username(&self) -> &Username {
        &self.username
    }

    fn display_name(&self) -> &str {
        &self.name
    }

    fn user_type(&self) -> UserType {
        UserType::Admin
    }

    fn verify_password(&self, password: &str) -> bool {
        self.password == password
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(s: &str) -> StudentId {
        StudentId::from(s)
    }

    fn student(username: &str, student_id: &str) -> Student {
        Student::new(NewStudent {
            username: username.into(),
            password: "pw".into(),
            student_id: student_id.into(),
            ..NewStudent::default()
        })
    }

    #[test]
    fn newtype_display() {
        assert_eq!(CourseCode::from("CS101").to_string(), "CS101");
        assert_eq!(StudentId::from("S001").to_string(), "S001");
        assert_eq!(Username::from("alice").to_string(), "alice");
    }

    #[test]
    fn enroll_until_full() {
        let mut course = Course::new("CS101", "Intro", 2);
        course.enroll_student(&sid("S1")).unwrap();
        course.enroll_student(&sid("S2")).unwrap();
        assert_eq!(course.seats_remaining(), 0);

        let err = course.enroll_student(&sid("S3")).unwrap_err();
        assert!(matches!(err, RegistrationError::CourseFull { .. }), "got: {err}");
        assert_eq!(course.enrolled_student_ids().len(), 2);
    }

    #[test]
    fn duplicate_enrollment_rejected() {
        let mut course = Course::new("CS101", "Intro", 5);
        course.enroll_student(&sid("S1")).unwrap();
        let err = course.enroll_student(&sid("S1")).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateEntry { .. }), "got: {err}");
        assert_eq!(course.enrolled_student_ids(), &[sid("S1")]);
    }

    #[test]
    fn duplicate_check_precedes_full_check() {
        let mut course = Course::new("CS101", "Intro", 1);
        course.enroll_student(&sid("S1")).unwrap();
        let err = course.enroll_student(&sid("S1")).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateEntry { .. }));
    }

    #[test]
    fn zero_capacity_is_always_full() {
        let mut course = Course::new("LAB0", "Closed", 0);
        assert!(matches!(
            course.enroll_student(&sid("S1")),
            Err(RegistrationError::CourseFull { .. })
        ));
    }

    #[test]
    fn drop_missing_student_fails() {
        let mut course = Course::new("CS101", "Intro", 5);
        let err = course.drop_student(&sid("S9")).unwrap_err();
        assert!(matches!(err, RegistrationError::NotEnrolled { .. }));
    }

    #[test]
    fn drop_frees_a_seat() {
        let mut course = Course::new("CS101", "Intro", 1);
        course.enroll_student(&sid("S1")).unwrap();
        course.drop_student(&sid("S1")).unwrap();
        assert_eq!(course.seats_remaining(), 1);
        course.enroll_student(&sid("S2")).unwrap();
    }

    #[test]
    fn shrinking_capacity_keeps_roster() {
        let mut course = Course::new("CS101", "Intro", 3);
        for id in ["S1", "S2", "S3"] {
            course.enroll_student(&sid(id)).unwrap();
        }
        course.set_capacity(1);
        assert_eq!(course.enrolled_student_ids().len(), 3);
        assert_eq!(course.seats_remaining(), -2);
        assert!(matches!(
            course.enroll_student(&sid("S4")),
            Err(RegistrationError::CourseFull { .. })
        ));
    }

    #[test]
    fn course_conflict_delegates_to_schedule() {
        let a = Course::with_schedule("A", "A", 10, TimeSlot::new("Monday", "09:00", "10:30"));
        let b = Course::with_schedule("B", "B", 10, TimeSlot::new("Monday", "10:00", "11:00"));
        let c = Course::new("C", "C", 10);
        assert!(a.has_time_conflict(&b));
        assert!(!a.has_time_conflict(&c));
    }

    #[test]
    fn student_course_list_is_a_dumb_set() {
        let mut s = student("alice", "S001");
        assert!(s.add_course(CourseCode::from("CS101")));
        assert!(!s.add_course(CourseCode::from("CS101")));
        assert!(s.is_enrolled_in(&CourseCode::from("CS101")));
        assert_eq!(s.total_enrolled_courses(), 1);
        assert!(s.remove_course(&CourseCode::from("CS101")));
        assert!(!s.remove_course(&CourseCode::from("CS101")));
        assert_eq!(s.total_enrolled_courses(), 0);
    }

    #[test]
    fn authenticate_is_uniform() {
        let accounts = vec![student("alice", "S001")];
        assert!(authenticate(&accounts, "alice", "pw").is_ok());
        let wrong = authenticate(&accounts, "alice", "nope").unwrap_err();
        let missing = authenticate(&accounts, "bob", "pw").unwrap_err();
        assert_eq!(wrong.to_string(), missing.to_string());
    }

    #[test]
    fn user_types() {
        let s = student("alice", "S001");
        assert_eq!(s.user_type(), UserType::Student);
        let a = AdminAccount {
            username: Username::from("root"),
            password: "pw".into(),
            email: String::new(),
            name: "Root".into(),
            user_id: "A1".into(),
        };
        assert_eq!(a.user_type().to_string(), "ADMIN");
        assert_eq!(a.display_name(), "Root");
    }
}

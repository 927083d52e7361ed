pub mod admin;
pub mod course;
pub mod enroll;
pub mod student;

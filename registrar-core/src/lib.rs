//! Registrar core library: course/student records, registration rules, and
//! flat-file persistence.
//!
//! - [`types`]: `Course`, `Student`, `AdminAccount`, key newtypes
//! - [`schedule`]: weekly time slots and overlap detection
//! - [`system`]: [`RegistrationSystem`], the rule engine over both collections
//! - [`store`] / [`codec`]: the `|`-delimited record files
//! - [`admin`]: [`AdminDirectory`]
//! - [`config`]: data directory and file names
//! - [`error`]: [`RegistrationError`]

pub mod admin;
pub mod codec;
pub mod config;
pub mod error;
pub mod schedule;
pub mod store;
pub mod system;
pub mod types;

pub use admin::AdminDirectory;
pub use config::{DataPaths, RegistrarConfig};
pub use error::RegistrationError;
pub use schedule::TimeSlot;
pub use store::{Record, RecordStore};
pub use system::{CourseSummary, CourseUpdate, Inconsistency, RegistrationSystem};
pub use types::{
    AdminAccount, Course, CourseCode, NewStudent, Student, StudentId, User, UserType, Username,
};

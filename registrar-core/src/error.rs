//! Error types for registrar-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from registration and persistence operations.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// The course has no seats remaining.
    #[error("course {code} is full; no seats available")]
    CourseFull { code: String },

    /// The requested course overlaps a course the student already holds.
    #[error("time conflict: {course} conflicts with {conflicts_with} (both on {day})")]
    TimeConflict {
        course: String,
        conflicts_with: String,
        day: String,
    },

    /// A field failed to parse or validate.
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// A data file could not be read or written.
    #[error("file error: cannot {operation} file '{}': {source}", .path.display())]
    File {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Unknown username or wrong password; the two are not distinguished.
    #[error("authentication failed: invalid username or password")]
    AuthenticationFailure,

    /// An entry with the same key already exists.
    #[error("duplicate {kind}: '{value}' already exists")]
    DuplicateEntry { kind: &'static str, value: String },

    /// Lookup by key found nothing.
    #[error("{kind} {key} not found")]
    NotFound { kind: &'static str, key: String },

    /// Drop requested for a student who is not on the roster.
    #[error("student {student_id} is not enrolled in {code}")]
    NotEnrolled { student_id: String, code: String },

    /// `registrar.yaml` exists but could not be parsed.
    #[error("failed to parse config at {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or pass --data-dir")]
    HomeNotFound,
}

/// Convenience constructor for [`RegistrationError::File`].
pub(crate) fn file_err(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> RegistrationError {
    RegistrationError::File {
        path: path.into(),
        operation,
        source,
    }
}

/// Convenience constructor for [`RegistrationError::InvalidInput`].
pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> RegistrationError {
    RegistrationError::InvalidInput {
        field: field.to_owned(),
        reason: reason.into(),
    }
}

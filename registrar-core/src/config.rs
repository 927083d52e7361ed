//! Data directory and file-name configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.registrar/
//!   registrar.yaml   (optional, overrides the file names below)
//!   courses.txt
//!   students.txt
//!   admins.txt
//! ```
//!
//! Every function taking a directory has an `_at` form; the no-arg wrappers
//! derive the directory from `dirs::home_dir()`. Tests use the `_at` forms.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{file_err, RegistrationError};

pub const DATA_DIR_NAME: &str = ".registrar";
pub const CONFIG_FILE_NAME: &str = "registrar.yaml";

/// Contents of `registrar.yaml`. Relative paths are resolved against the data
/// directory; absolute paths are used as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrarConfig {
    pub courses_file: PathBuf,
    pub students_file: PathBuf,
    pub admins_file: PathBuf,
}

impl Default for RegistrarConfig {
    fn default() -> Self {
        Self {
            courses_file: PathBuf::from("courses.txt"),
            students_file: PathBuf::from("students.txt"),
            admins_file: PathBuf::from("admins.txt"),
        }
    }
}

/// Fully resolved file locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub courses: PathBuf,
    pub students: PathBuf,
    pub admins: PathBuf,
}

impl RegistrarConfig {
    pub fn resolve(&self, data_dir: &Path) -> DataPaths {
        DataPaths {
            courses: data_dir.join(&self.courses_file),
            students: data_dir.join(&self.students_file),
            admins: data_dir.join(&self.admins_file),
        }
    }
}

/// `<home>/.registrar`. Pure, no I/O.
pub fn data_dir_at(home: &Path) -> PathBuf {
    home.join(DATA_DIR_NAME)
}

/// `data_dir_at` convenience wrapper.
pub fn data_dir() -> Result<PathBuf, RegistrationError> {
    Ok(data_dir_at(&home()?))
}

/// Read `<data_dir>/registrar.yaml`; defaults when the file is absent.
pub fn load_config_at(data_dir: &Path) -> Result<RegistrarConfig, RegistrationError> {
    let path = data_dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(RegistrarConfig::default());
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| file_err(&path, "read", e))?;
    if contents.trim().is_empty() {
        return Ok(RegistrarConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| RegistrationError::Config { path, source })
}

/// Load config and resolve paths in one step.
pub fn data_paths_at(data_dir: &Path) -> Result<DataPaths, RegistrationError> {
    Ok(load_config_at(data_dir)?.resolve(data_dir))
}

/// `data_paths_at` convenience wrapper.
pub fn data_paths() -> Result<DataPaths, RegistrationError> {
    data_paths_at(&data_dir()?)
}

fn home() -> Result<PathBuf, RegistrationError> {
    dirs::home_dir().ok_or(RegistrationError::HomeNotFound)
}

//! Delimited-record file store.
//!
//! One record per line, fields joined by `|`. A store is parameterised by a
//! [`Record`] implementation and used three times: courses, students and
//! admin accounts (see [`crate::codec`]).
//!
//! # I/O pattern
//!
//! - `load`: whole-file read, then per-line decode. A line that is not valid
//!   UTF-8 or fails to decode is logged with its line number and skipped; it
//!   never aborts the load.
//!   A missing file is an empty store.
//! - `save`: serialize → `<file>.tmp` sibling → `chmod 0600` → `rename`.
//! - `append`: open in append mode and write one line; used when a single new
//!   record is added without a full save. A missing final newline is restored
//!   first.
//!
//! No locking: one process owns each file for the duration of a run.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::error::{file_err, RegistrationError};

/// Field separator within a record.
pub const FIELD_SEP: char = '|';
/// Separator for the list carried in a record's final field.
pub const LIST_SEP: char = ',';

/// A type that round-trips through a single line of text.
pub trait Record: Sized {
    /// Human-readable record kind used in log lines, e.g. `"course"`.
    const KIND: &'static str;

    /// Encode to one line, without the trailing newline.
    fn encode(&self) -> String;

    /// Decode one non-blank line.
    fn decode(line: &str) -> Result<Self, RegistrationError>;
}

/// A flat file holding one [`Record`] per line.
#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RecordStore<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every decodable record. Missing file → empty list.
    pub fn load(&self) -> Result<Vec<R>, RegistrationError> {
        let contents = match std::fs::read(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no {} file found", R::KIND);
                return Ok(Vec::new());
            }
            Err(e) => return Err(file_err(&self.path, "read", e)),
        };

        let mut records = Vec::new();
        for (idx, raw) in contents.split(|b| *b == b'\n').enumerate() {
            let line = match std::str::from_utf8(raw) {
                Ok(line) => line.strip_suffix('\r').unwrap_or(line),
                Err(err) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = idx + 1,
                        error = %err,
                        "skipping {} record that is not valid UTF-8",
                        R::KIND
                    );
                    continue;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match R::decode(line) {
                Ok(record) => records.push(record),
                Err(err) => tracing::warn!(
                    path = %self.path.display(),
                    line = idx + 1,
                    error = %err,
                    "skipping malformed {} record",
                    R::KIND
                ),
            }
        }
        tracing::info!(
            path = %self.path.display(),
            count = records.len(),
            "loaded {} records",
            R::KIND
        );
        Ok(records)
    }

    /// Replace the file with `records`, atomically.
    pub fn save(&self, records: &[R]) -> Result<(), RegistrationError> {
        ensure_parent(&self.path)?;

        let mut body = String::new();
        for record in records {
            body.push_str(&record.encode());
            body.push('\n');
        }

        let tmp = tmp_path(&self.path);
        std::fs::write(&tmp, body).map_err(|e| file_err(&tmp, "write", e))?;
        set_file_permissions(&tmp)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(file_err(&self.path, "replace", e));
        }
        tracing::info!(
            path = %self.path.display(),
            count = records.len(),
            "saved {} records",
            R::KIND
        );
        Ok(())
    }

    /// Append one record without rewriting the file.
    pub fn append(&self, record: &R) -> Result<(), RegistrationError> {
        ensure_parent(&self.path)?;
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| file_err(&self.path, "append to", e))?;
        if !ends_with_newline(&mut file).map_err(|e| file_err(&self.path, "append to", e))? {
            writeln!(file).map_err(|e| file_err(&self.path, "append to", e))?;
        }
        writeln!(file, "{}", record.encode()).map_err(|e| file_err(&self.path, "append to", e))?;
        set_file_permissions(&self.path)?;
        tracing::debug!(path = %self.path.display(), "appended {} record", R::KIND);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Split a record into exactly `n` fields. Missing trailing fields are empty;
/// anything past the `n`th field is ignored.
pub(crate) fn fields(line: &str, n: usize) -> Vec<&str> {
    let mut out: Vec<&str> = line.split(FIELD_SEP).take(n).collect();
    out.resize(n, "");
    out
}

/// Split a `,`-joined list, dropping empty items.
pub(crate) fn split_list(field: &str) -> impl Iterator<Item = &str> {
    field.split(LIST_SEP).filter(|item| !item.is_empty())
}

pub(crate) fn join_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push(LIST_SEP);
        }
        out.push_str(item);
    }
    out
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// True for an empty file or one whose last byte is `\n`.
fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn ensure_parent(path: &Path) -> Result<(), RegistrationError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            std::fs::create_dir_all(dir).map_err(|e| file_err(dir, "create directory", e))
        }
        _ => Ok(()),
    }
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), RegistrationError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| file_err(path, "set permissions on", e))
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), RegistrationError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

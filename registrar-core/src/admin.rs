//! Admin accounts, kept in their own file on the shared record store.

use std::path::PathBuf;

use crate::error::{invalid, RegistrationError};
use crate::store::{RecordStore, FIELD_SEP};
use crate::types::{authenticate, AdminAccount, Username};

/// Loaded admin accounts plus the file they came from.
#[derive(Debug)]
pub struct AdminDirectory {
    admins: Vec<AdminAccount>,
    store: RecordStore<AdminAccount>,
}

impl AdminDirectory {
    /// An empty directory bound to `path`. Call [`load`](Self::load) to read it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            admins: Vec::new(),
            store: RecordStore::new(path),
        }
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self, RegistrationError> {
        let mut dir = Self::new(path);
        dir.load()?;
        Ok(dir)
    }

    pub fn file_exists(&self) -> bool {
        self.store.exists()
    }

    /// Missing file → no admins.
    pub fn load(&mut self) -> Result<(), RegistrationError> {
        self.admins = self.store.load()?;
        Ok(())
    }

    /// Rewrite the whole file.
    pub fn save(&self) -> Result<(), RegistrationError> {
        self.store.save(&self.admins)
    }

    pub fn admins(&self) -> &[AdminAccount] {
        &self.admins
    }

    pub fn find(&self, username: &Username) -> Option<&AdminAccount> {
        self.admins.iter().find(|a| &a.username == username)
    }

    /// Add an account and persist it with a single appended line.
    pub fn add(&mut self, admin: AdminAccount) -> Result<(), RegistrationError> {
        if admin.username.0.trim().is_empty() {
            return Err(invalid("username", "must not be empty"));
        }
        for (field, value) in [
            ("username", admin.username.as_str()),
            ("password", admin.password.as_str()),
            ("email", admin.email.as_str()),
            ("name", admin.name.as_str()),
            ("user ID", admin.user_id.as_str()),
        ] {
            if value.contains(FIELD_SEP) || value.contains(['\n', '\r']) {
                return Err(invalid(
                    field,
                    format!("must not contain '{FIELD_SEP}' or line breaks"),
                ));
            }
        }
        if self.find(&admin.username).is_some() {
            return Err(RegistrationError::DuplicateEntry {
                kind: "admin",
                value: admin.username.0,
            });
        }
        self.store.append(&admin)?;
        tracing::info!(username = %admin.username, "admin added");
        self.admins.push(admin);
        Ok(())
    }

    /// Remove an account and rewrite the file. Returns the removed account.
    pub fn remove(&mut self, username: &Username) -> Result<AdminAccount, RegistrationError> {
        let idx = self
            .admins
            .iter()
            .position(|a| &a.username == username)
            .ok_or_else(|| RegistrationError::NotFound {
                kind: "admin",
                key: username.0.clone(),
            })?;
        let removed = self.admins.remove(idx);
        if let Err(err) = self.save() {
            self.admins.insert(idx, removed);
            return Err(err);
        }
        tracing::info!(%username, "admin removed");
        Ok(removed)
    }

    /// Unknown username and wrong password fail identically.
    pub fn login(&self, username: &str, password: &str) -> Result<&AdminAccount, RegistrationError> {
        authenticate(&self.admins, username, password)
    }
}

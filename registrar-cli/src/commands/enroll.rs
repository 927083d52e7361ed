//! `registrar register` and `registrar drop`

use anyhow::{Context, Result};
use clap::Args;

use registrar_core::{CourseCode, DataPaths, RegistrationSystem, Username};

/// Arguments shared by `register` and `drop`.
#[derive(Args, Debug)]
pub struct EnrollArgs {
    /// Student username.
    pub username: String,

    /// Course code, e.g. CS101.
    pub code: String,

    /// Student password.
    #[arg(long, short = 'p')]
    pub password: String,
}

impl EnrollArgs {
    pub fn register(self, paths: &DataPaths) -> Result<()> {
        let (mut system, username, code) = self.session(paths)?;
        system
            .register_for_course(&username, &code)
            .with_context(|| format!("cannot register '{username}' for '{code}'"))?;
        system.save_data().context("failed to save registration data")?;

        let seats = system.find_course(&code).map_or(0, |c| c.seats_remaining());
        println!("✓ Registered '{username}' for '{code}' ({seats} seats left)");
        Ok(())
    }

    pub fn drop_course(self, paths: &DataPaths) -> Result<()> {
        let (mut system, username, code) = self.session(paths)?;
        system
            .drop_course(&username, &code)
            .with_context(|| format!("cannot drop '{code}' for '{username}'"))?;
        system.save_data().context("failed to save registration data")?;

        println!("✓ Dropped '{code}' for '{username}'");
        Ok(())
    }

    /// Load data and authenticate the student.
    fn session(self, paths: &DataPaths) -> Result<(RegistrationSystem, Username, CourseCode)> {
        let system = RegistrationSystem::open(paths).context("failed to load registration data")?;
        system
            .login(&self.username, &self.password)
            .context("login failed")?;
        Ok((system, Username::from(self.username), CourseCode::from(self.code)))
    }
}

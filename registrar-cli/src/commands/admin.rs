//! `registrar admin add|list|remove|login`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tabled::{settings::Style, Table, Tabled};

use registrar_core::{AdminAccount, AdminDirectory, DataPaths, User, Username};

#[derive(Subcommand, Debug)]
pub enum AdminCommand {
    /// Create an admin account (appended to the admin file).
    Add(AddArgs),

    /// List admin accounts.
    List,

    /// Delete an admin account.
    Remove { username: String },

    /// Check admin credentials.
    Login {
        username: String,

        #[arg(long, short = 'p')]
        password: String,
    },
}

#[derive(Args, Debug)]
pub struct AddArgs {
    pub username: String,

    #[arg(long, short = 'p')]
    pub password: String,

    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub user_id: String,
}

#[derive(Tabled)]
struct AdminRow {
    #[tabled(rename = "username")]
    username: String,
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "email")]
    email: String,
    #[tabled(rename = "user id")]
    user_id: String,
}

pub fn run(command: AdminCommand, paths: &DataPaths) -> Result<()> {
    let mut directory = AdminDirectory::open(&paths.admins).context("failed to load admins")?;

    match command {
        AdminCommand::Add(args) => {
            let username = args.username.clone();
            directory
                .add(AdminAccount {
                    username: Username::from(args.username),
                    password: args.password,
                    email: args.email,
                    name: args.name,
                    user_id: args.user_id,
                })
                .with_context(|| format!("cannot add admin '{username}'"))?;
            println!("✓ Added admin '{username}'");
        }
        AdminCommand::List => {
            if directory.admins().is_empty() {
                println!("No admin accounts.");
                return Ok(());
            }
            let rows: Vec<AdminRow> = directory
                .admins()
                .iter()
                .map(|a| AdminRow {
                    username: a.username.0.clone(),
                    name: a.name.clone(),
                    email: a.email.clone(),
                    user_id: a.user_id.clone(),
                })
                .collect();
            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{table}");
        }
        AdminCommand::Remove { username } => {
            directory
                .remove(&Username::from(username.as_str()))
                .with_context(|| format!("cannot remove admin '{username}'"))?;
            println!("✓ Removed admin '{username}'");
        }
        AdminCommand::Login { username, password } => {
            let admin = directory
                .login(&username, &password)
                .context("login failed")?;
            println!(
                "✓ Logged in as {} [{}]",
                admin.display_name(),
                admin.user_type()
            );
        }
    }
    Ok(())
}

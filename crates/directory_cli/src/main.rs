//! CLI smoke and maintenance entry point.
//!
//! # Responsibility
//! - Verify `directory_core` wiring: config, logging, store bootstrap.
//! - Offer a few maintenance commands against the configured store.
//!
//! # Usage
//!
//! ```bash
//! directory_cli ping
//! directory_cli schema
//! directory_cli list-users 0 10 --criterion byEmailDomain --value example.com
//! directory_cli wipe-users
//! ```

use clap::{Parser, Subcommand};
use directory_core::db::migrations::{current_version, latest_version};
use directory_core::{
    AccountService, CoreConfig, Criterion, PageWindow, SqliteAccountRepository, SystemClock,
};
use log::error;
use std::error::Error;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "directory_cli")]
#[command(version, about = "Directory store smoke and maintenance tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Print core health and version
    Ping,
    /// Show applied and latest schema versions
    Schema,
    /// Count registered account users
    Stats,
    /// List one page of account users
    ListUsers {
        /// Zero-based page index
        #[arg(default_value_t = 0, allow_negative_numbers = true)]
        page: i64,

        /// Accounts per page
        #[arg(default_value_t = 10, allow_negative_numbers = true)]
        size: i64,

        /// Filter name (`byEmailDomain`, `byLastname`, `byMinimumAge`)
        #[arg(short, long, requires = "value")]
        criterion: Option<String>,

        /// Filter value
        #[arg(short, long)]
        value: Option<String>,
    },
    /// Remove every account user
    WipeUsers,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command.unwrap_or(Command::Ping)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn Error>> {
    let config = CoreConfig::from_env()?;
    config.init_logging()?;

    if command == Command::Ping {
        println!("directory_core ping={}", directory_core::ping());
        println!("directory_core version={}", directory_core::core_version());
        return Ok(());
    }

    let conn = config.open_store()?;
    let accounts = AccountService::new(SqliteAccountRepository::new(&conn), SystemClock);

    match command {
        Command::Ping => {}
        Command::Schema => {
            let version = current_version(&conn)?;
            println!("schema version={version} latest={}", latest_version());
        }
        Command::Stats => {
            println!("account_users={}", accounts.count()?);
        }
        Command::ListUsers {
            page,
            size,
            criterion,
            value,
        } => {
            let window = PageWindow::new(page, size)?;
            let criterion = Criterion::parse(criterion.as_deref(), value.as_deref())?;
            for user in accounts.list(window, criterion.as_ref())? {
                println!(
                    "{}\t{} {}\t{}\t{}",
                    user.email,
                    user.name.first,
                    user.name.last,
                    user.birthdate,
                    user.interests.join(",")
                );
            }
        }
        Command::WipeUsers => {
            let removed = accounts.delete_all()?;
            println!("removed account_users={removed}");
        }
    }

    Ok(())
}

use clap::Parser;
use finance_tracker::args::{Args, Command, EarningsAction, ExpensesAction};
use finance_tracker::screen::{Earnings, Expenses};
use finance_tracker::{commands, Config, Result};
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;
use tracing::{debug, error, trace};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().finance_home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init => commands::init(home).await?.print(),

        Command::Summary => commands::summary(Config::load(home).await?)
            .await?
            .print(),

        Command::Earnings(earnings_args) => {
            let config = Config::load(home).await?;
            match earnings_args.action() {
                EarningsAction::List => commands::list::<Earnings>(config).await?.print(),
                EarningsAction::Add(add) => commands::add_earning(config, add).await?.print(),
                EarningsAction::Delete(delete) => commands::delete::<Earnings>(config, delete.id())
                    .await?
                    .print(),
            }
        }

        Command::Expenses(expenses_args) => {
            let config = Config::load(home).await?;
            match expenses_args.action() {
                ExpensesAction::List => commands::list::<Expenses>(config).await?.print(),
                ExpensesAction::Add(add) => commands::add_expense(config, add).await?.print(),
                ExpensesAction::Delete(delete) => commands::delete::<Expenses>(config, delete.id())
                    .await?
                    .print(),
            }
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_PKG_NAME").replace('-', "_"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

//! These structs provide the CLI interface for the finance CLI.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// finance: A command-line tool for tracking your earnings and expenses.
///
/// Records are kept in a local SQLite database in the finance home directory. Run `finance init`
/// once to create it, then add earnings and expenses and look at the summary to see your
/// balance and how much of your earnings you are saving.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory, the configuration file and the database.
    ///
    /// This is the first command you should run. By default the data directory is
    /// $HOME/finance, pass --finance-home if you want it somewhere else.
    Init,
    /// Show total earnings, total expenses, the balance, the savings percentage and expenses per
    /// category.
    Summary,
    /// List, add or delete earnings.
    Earnings(EarningsArgs),
    /// List, add or delete expenses.
    Expenses(ExpensesArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where finance data and configuration is held. Defaults to ~/finance
    #[arg(long, env = "FINANCE_HOME", default_value_t = default_finance_home())]
    finance_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, finance_home: PathBuf) -> Self {
        Self {
            log_level,
            finance_home: finance_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn finance_home(&self) -> &DisplayPath {
        &self.finance_home
    }
}

/// Args for the `finance earnings` command.
#[derive(Debug, Parser, Clone)]
pub struct EarningsArgs {
    #[command(subcommand)]
    action: EarningsAction,
}

impl EarningsArgs {
    pub fn new(action: EarningsAction) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &EarningsAction {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum EarningsAction {
    /// List all earnings, newest first, and their total.
    List,
    /// Record an earning.
    Add(AddEarningArgs),
    /// Delete an earning by id. Deleting an id that does not exist does nothing.
    Delete(DeleteArgs),
}

/// Args for the `finance expenses` command.
#[derive(Debug, Parser, Clone)]
pub struct ExpensesArgs {
    #[command(subcommand)]
    action: ExpensesAction,
}

impl ExpensesArgs {
    pub fn new(action: ExpensesAction) -> Self {
        Self { action }
    }

    pub fn action(&self) -> &ExpensesAction {
        &self.action
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum ExpensesAction {
    /// List all expenses, newest first, and their total.
    List,
    /// Record an expense.
    Add(AddExpenseArgs),
    /// Delete an expense by id. Deleting an id that does not exist does nothing.
    Delete(DeleteArgs),
}

/// Args for `finance earnings add`.
#[derive(Debug, Parser, Clone)]
pub struct AddEarningArgs {
    /// The amount, a number greater than zero, e.g. 1500 or 1,500.50
    #[arg(long)]
    amount: String,

    /// What the earning was for, e.g. "salary"
    #[arg(long)]
    description: String,
}

impl AddEarningArgs {
    pub fn new(amount: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            amount: amount.into(),
            description: description.into(),
        }
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Args for `finance expenses add`.
#[derive(Debug, Parser, Clone)]
pub struct AddExpenseArgs {
    /// The amount, a number greater than zero, e.g. 200 or 1,200.75
    #[arg(long)]
    amount: String,

    /// One of: Compulsory, Miscellaneous, Food, Grocery
    #[arg(long, default_value = "Compulsory")]
    category: String,

    /// What the money was spent on, e.g. "lunch"
    #[arg(long)]
    description: String,
}

impl AddExpenseArgs {
    pub fn new(
        amount: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            amount: amount.into(),
            category: category.into(),
            description: description.into(),
        }
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Args for the `delete` subcommands.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the record, as shown by `list`.
    id: i64,
}

impl DeleteArgs {
    pub fn new(id: i64) -> Self {
        Self { id }
    }

    pub fn id(&self) -> i64 {
        self.id
    }
}

fn default_finance_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("finance"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --finance-home or FINANCE_HOME instead of relying on the \
                default finance home directory. If you continue using the program right now, you \
                may have problems!",
            );
            PathBuf::from("finance")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

//! These structs provide the CLI interface for the budget CLI.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

use crate::model::PeriodKey;

/// budget: A command-line tool for tracking spending against a monthly
/// budget.
///
/// Transactions and planned category amounts are kept on a budget server and
/// mirrored locally for the duration of each command. Months are addressed by
/// a period key in MM/YYYY form, e.g. 10/2024.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    ///
    /// This is the first command you should run. Decide what directory you
    /// want configuration stored in and pass it as --budget-home (defaults to
    /// $HOME/budget), and pass the base URL of your budget server as
    /// --server-url.
    Init(InitArgs),
    /// List every month that has transactions or planned amounts.
    Periods,
    /// List the transactions recorded for one month.
    List(PeriodArgs),
    /// Record a new transaction.
    Add(AddArgs),
    /// Delete a transaction by its identifier.
    Remove(RemoveArgs),
    /// Set the planned amount for a category in one month.
    Plan(PlanArgs),
    /// Show planned vs. actual spending per category for one month.
    Summary(PeriodArgs),
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

    /// The directory where budget configuration is held. Defaults to
    /// ~/budget
    #[arg(long, env = "BUDGET_HOME", default_value_t = default_budget_home())]
    budget_home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn budget_home(&self) -> &DisplayPath {
        &self.budget_home
    }
}

/// Args for the `budget init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the budget server, e.g. http://localhost:4000
    #[arg(long)]
    server_url: String,
}

impl InitArgs {
    pub fn server_url(&self) -> &str {
        &self.server_url
    }
}

/// Args for commands that address one month.
#[derive(Debug, Parser, Clone)]
pub struct PeriodArgs {
    /// The month to operate on, in MM/YYYY form, e.g. 10/2024
    period: PeriodKey,
}

impl PeriodArgs {
    pub fn period(&self) -> PeriodKey {
        self.period
    }
}

/// Args for the `budget add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// The month to record the transaction under, in MM/YYYY form
    period: PeriodKey,

    /// A short description, e.g. "Walmart"
    #[arg(long)]
    description: String,

    /// The transaction amount, e.g. 42.50
    #[arg(long)]
    amount: String,

    /// The transaction date in YYYY-MM-DD form. Must fall within the period.
    #[arg(long)]
    date: chrono::NaiveDate,

    /// The category to file the transaction under, e.g. "Groceries"
    #[arg(long)]
    category: String,
}

impl AddArgs {
    pub fn period(&self) -> PeriodKey {
        self.period
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn date(&self) -> chrono::NaiveDate {
        self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// Args for the `budget remove` command.
#[derive(Debug, Parser, Clone)]
pub struct RemoveArgs {
    /// The month the transaction is recorded under, in MM/YYYY form
    period: PeriodKey,

    /// The transaction identifier, as shown by `budget list`
    #[arg(long)]
    id: String,
}

impl RemoveArgs {
    pub fn period(&self) -> PeriodKey {
        self.period
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Args for the `budget plan` command.
#[derive(Debug, Parser, Clone)]
pub struct PlanArgs {
    /// The month to plan for, in MM/YYYY form
    period: PeriodKey,

    /// The category to plan, e.g. "Rent"
    #[arg(long)]
    category: String,

    /// The planned amount. Only plain decimal input is accepted; anything
    /// else is ignored.
    #[arg(long)]
    amount: String,
}

impl PlanArgs {
    pub fn period(&self) -> PeriodKey {
        self.period
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }
}

fn default_budget_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("budget"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --budget-home or BUDGET_HOME instead of relying on the default \
                budget home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("budget")
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
    pub fn path(&self) -> &Path {
        &self.0
    }
}

use budget_ledger::args::{Args, Command};
use budget_ledger::{commands, Config, Mode, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
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
    let home = args.common().budget_home().path();

    // This allows for testing the program without a running backend. When
    // BUDGET_LEDGER_IN_TEST_MODE is set and non-zero in length, then the mode
    // will be Mode::Test, otherwise it will be Mode::Remote.
    let mode = Mode::from_env();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.server_url())
            .await?
            .print(),

        Command::Periods => {
            let config = Config::load(home).await?;
            commands::periods(config, mode).await?.print()
        }

        Command::List(period_args) => {
            let config = Config::load(home).await?;
            commands::list(config, mode, period_args.period())
                .await?
                .print()
        }

        Command::Add(add_args) => {
            let config = Config::load(home).await?;
            commands::add(config, mode, add_args.clone()).await?.print()
        }

        Command::Remove(remove_args) => {
            let config = Config::load(home).await?;
            commands::remove(config, mode, remove_args.clone())
                .await?
                .print()
        }

        Command::Plan(plan_args) => {
            let config = Config::load(home).await?;
            commands::plan(config, mode, plan_args.clone())
                .await?
                .print()
        }

        Command::Summary(period_args) => {
            let config = Config::load(home).await?;
            commands::summary(config, mode, period_args.period())
                .await?
                .print()
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
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

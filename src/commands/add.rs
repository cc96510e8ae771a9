use crate::api::Mode;
use crate::args::AddArgs;
use crate::commands::Out;
use crate::model::{Amount, TransactionDraft, TransactionEntry};
use crate::{Config, Result, Session};
use anyhow::Context;
use std::str::FromStr;

/// Records a new transaction under the given period.
///
/// The entry is visible locally as soon as it is staged; if the server cannot
/// be reached the command fails but the staged entry is simply lost with the
/// process, so there is nothing to clean up.
pub async fn add(config: Config, mode: Mode, args: AddArgs) -> Result<Out<TransactionEntry>> {
    let amount = Amount::from_str(args.amount())
        .with_context(|| format!("Invalid amount '{}'", args.amount()))?;

    let mut session = Session::new(&config, mode)?;
    session.load_all().await?;

    let entry = session
        .ledger_mut()
        .add_transaction(
            args.period(),
            TransactionDraft {
                description: args.description().to_string(),
                amount,
                date: args.date(),
                category: args.category().to_string(),
            },
        )
        .await?;

    let message = format!(
        "Added {} {} to {} as {}",
        entry.amount(),
        entry.description(),
        args.period(),
        entry.id().server_id().unwrap_or("(pending)")
    );
    Ok(Out::new(message, entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use chrono::NaiveDate;

    fn args(date: NaiveDate) -> AddArgs {
        use clap::Parser;
        let period = crate::model::PeriodKey::for_date(date);
        AddArgs::parse_from([
            "add",
            &period.to_string(),
            "--description",
            "Coffee",
            "--amount",
            "4.50",
            "--date",
            &date.to_string(),
            "--category",
            "Food",
        ])
    }

    #[tokio::test]
    async fn test_add_persists_to_server() {
        let env = TestEnv::new().await;
        let date = NaiveDate::from_ymd_opt(2024, 10, 15).unwrap();
        let out = add(env.config(), Mode::Test, args(date)).await.unwrap();
        let entry = out.structure().unwrap();
        assert!(entry.id().is_confirmed());

        let state = env.server_state();
        let bucket = state.lock().unwrap().transactions["10/2024"].clone();
        assert!(bucket.iter().any(|t| t.description == "Coffee"));
    }

    #[tokio::test]
    async fn test_add_rejects_unparseable_amount() {
        let env = TestEnv::new().await;
        use clap::Parser;
        let bad = AddArgs::parse_from([
            "add",
            "10/2024",
            "--description",
            "Coffee",
            "--amount",
            "four dollars",
            "--date",
            "2024-10-15",
            "--category",
            "Food",
        ]);
        assert!(add(env.config(), Mode::Test, bad).await.is_err());
    }
}

use crate::api::Mode;
use crate::commands::Out;
use crate::model::{PeriodKey, TransactionEntry};
use crate::{Config, Result, Session};
use std::fmt::Write;

/// Lists the transactions recorded for `period`, in the order they were
/// entered.
pub async fn list(
    config: Config,
    mode: Mode,
    period: PeriodKey,
) -> Result<Out<Vec<TransactionEntry>>> {
    let mut session = Session::new(&config, mode)?;
    session.load_all().await?;

    let entries = session.ledger().transactions_for(period).to_vec();
    if entries.is_empty() {
        return Ok(format!("No transactions for {period}").into());
    }

    let mut message = format!("Transactions for {period}:\n");
    for entry in &entries {
        let id = entry.id().server_id().unwrap_or("(pending)");
        let _ = writeln!(
            message,
            "{}  {}  {}  {}  [{}]",
            id,
            entry.date(),
            entry.amount(),
            entry.description(),
            entry.category()
        );
    }
    Ok(Out::new(message, entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_list_shows_seeded_transactions() {
        let env = TestEnv::new().await;
        let period = PeriodKey::new(10, 2024).unwrap();
        let out = list(env.config(), Mode::Test, period).await.unwrap();
        let entries = out.structure().unwrap();
        assert_eq!(entries.len(), 3);
        assert!(out.message().contains("Rent"));
    }

    #[tokio::test]
    async fn test_list_empty_period() {
        let env = TestEnv::new().await;
        let period = PeriodKey::new(1, 2020).unwrap();
        let out = list(env.config(), Mode::Test, period).await.unwrap();
        assert!(out.structure().is_none());
        assert!(out.message().contains("No transactions"));
    }
}

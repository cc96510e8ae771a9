use crate::api::Mode;
use crate::args::RemoveArgs;
use crate::commands::Out;
use crate::model::EntryId;
use crate::{Config, Result, Session};

/// Deletes a transaction by its identifier. Removing an identifier that does
/// not exist is not an error.
pub async fn remove(config: Config, mode: Mode, args: RemoveArgs) -> Result<Out<()>> {
    let mut session = Session::new(&config, mode)?;
    session.load_all().await?;

    let id = EntryId::Confirmed(args.id().to_string());
    session
        .ledger_mut()
        .remove_transaction(args.period(), &id)
        .await?;
    Ok(format!("Removed {} from {}", args.id(), args.period()).into())
}

use crate::api::Mode;
use crate::commands::Out;
use crate::{Config, Result, Session};

/// Lists every period that has transactions or planned amounts, oldest
/// first.
pub async fn periods(config: Config, mode: Mode) -> Result<Out<Vec<String>>> {
    let mut session = Session::new(&config, mode)?;
    session.load_all().await?;

    let periods: Vec<String> = session.periods().iter().map(ToString::to_string).collect();
    if periods.is_empty() {
        return Ok("No periods found".into());
    }
    let message = format!("Periods:\n{}", periods.join("\n"));
    Ok(Out::new(message, periods))
}

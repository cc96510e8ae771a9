use crate::api::Mode;
use crate::commands::Out;
use crate::model::PeriodKey;
use crate::summary::SummaryRow;
use crate::{Config, Result, Session};
use std::fmt::Write;

/// Shows planned vs. actual spending per category for one period.
///
/// Rows come from the planned amounts, so a category with spending but no
/// plan does not appear here; it still shows up in `budget list`.
pub async fn summary(
    config: Config,
    mode: Mode,
    period: PeriodKey,
) -> Result<Out<Vec<SummaryRow>>> {
    let mut session = Session::new(&config, mode)?;
    session.load_all().await?;

    let rows = session.summary(period);
    if rows.is_empty() {
        return Ok(format!("No planned amounts for {period}").into());
    }

    let mut message = format!("Summary for {period}:\n");
    for row in &rows {
        let _ = writeln!(
            message,
            "{}: planned {}, actual {}, difference {}",
            row.category, row.planned, row.actual, row.difference
        );
    }
    Ok(Out::new(message, rows))
}

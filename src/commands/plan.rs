use crate::api::Mode;
use crate::args::PlanArgs;
use crate::commands::Out;
use crate::{Config, Result, Session};

/// Sets the planned amount for a category in one period.
///
/// The amount goes through the same numeric filter the budget table applies
/// everywhere: input that is not a plain decimal literal is dropped without
/// an error and nothing changes.
pub async fn plan(config: Config, mode: Mode, args: PlanArgs) -> Result<Out<()>> {
    let mut session = Session::new(&config, mode)?;
    session.load_all().await?;

    let accepted = session
        .budgets_mut()
        .set_planned_amount(args.period(), args.category(), args.amount())
        .await?;

    let message = if accepted {
        let amounts = session.budgets().planned_amounts_for(args.period());
        format!(
            "Planned {} for {} in {}",
            amounts.get(args.category()).copied().unwrap_or_default(),
            args.category(),
            args.period()
        )
    } else {
        format!(
            "Ignored non-numeric amount '{}' for {}",
            args.amount(),
            args.category()
        )
    };
    Ok(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;
    use clap::Parser;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_plan_sets_amount() {
        let env = TestEnv::new().await;
        let args = PlanArgs::parse_from(["plan", "10/2024", "--category", "Fun", "--amount", "75"]);
        let out = plan(env.config(), Mode::Test, args).await.unwrap();
        assert!(out.message().contains("Planned"));

        let state = env.server_state();
        assert_eq!(
            state.lock().unwrap().planned["10/2024"]["Fun"],
            Decimal::from(75)
        );
    }

    #[tokio::test]
    async fn test_plan_ignores_bad_input() {
        let env = TestEnv::new().await;
        let args =
            PlanArgs::parse_from(["plan", "10/2024", "--category", "Fun", "--amount", "lots"]);
        let out = plan(env.config(), Mode::Test, args).await.unwrap();
        assert!(out.message().contains("Ignored"));

        let state = env.server_state();
        assert!(!state.lock().unwrap().planned["10/2024"].contains_key("Fun"));
    }
}

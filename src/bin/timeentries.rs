//! Lists the time entries of the last two weeks.
//!
//! Requires `TOKEN` and `ACCOUNT_ID` in the environment. Set `RUST_LOG=debug`
//! to see the requests being made.

use anyhow::{bail, Context as _, Result};
use chrono::{Duration, Local};
use harvest::{Client, Context, TimeEntriesListOptions};
use tracing_subscriber::EnvFilter;

fn required_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => bail!("You MUST set environment variable {}", name),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let access_token = required_env("TOKEN")?;
    let account_id = required_env("ACCOUNT_ID")?;

    let today = Local::now().date_naive();
    let opts = TimeEntriesListOptions::new()
        .from((today - Duration::days(14)).format("%Y%m%d").to_string())
        .to(today.format("%Y%m%d").to_string())
        .page(1)
        .per_page(100);

    let client = Client::new(access_token, account_id)?;
    let ctx = Context::background();

    let (entries, resp) = client
        .time_entries()
        .list(&ctx, Some(&opts))
        .await
        .context("error fetching time entries")?;

    tracing::info!(?resp, "response");
    tracing::info!("No. of entries: {}", entries.len());
    Ok(())
}

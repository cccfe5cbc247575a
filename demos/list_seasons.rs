//! Lists every series season, oldest first.
//!
//! Credentials are read from `IRACING_USERNAME` and `IRACING_PASSWORD`.
//!
//! Run with: `cargo run --example list_seasons`

use irapi::seasons::sort_seasons;
use irapi::{Client, EnvironmentCredentials, Error};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter("irapi=info,list_seasons=info")
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Unable to list seasons");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Error> {
    let client = Client::new(EnvironmentCredentials::new())?;
    client.login().await?;

    let mut seasons = client.get_seasons(false).await?;
    tracing::info!(count = seasons.len(), "Got season details");
    sort_seasons(&mut seasons);

    println!(
        "{:<4}  {:<1}  {:<2}  {:<6}  {:<6}  {:<9}  {:<6}  {:<40}  {:<11}  {:<11}",
        "Year", "Q", "Wk", "ID", "Lic", "Category", "Series", "Name", "Start", "End"
    );

    for s in &seasons {
        println!(
            "{:04}  {:1}  {:02}  {:<6}  {:<6}  {:<9}  {:<6}  {:<40}  {:>11}  {:>11}",
            s.year,
            s.quarter,
            s.week,
            s.season_id,
            s.licence_class,
            s.category,
            s.series_id,
            s.short_name,
            s.start.as_datetime().format("%e %b %Y"),
            s.end.as_datetime().format("%e %b %Y"),
        );
    }

    Ok(())
}

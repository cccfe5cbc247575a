//! Lists a member's races from the last two weeks.
//!
//! Run with: `cargo run --example show_latest_races -- -u 123456 [-c credentials.txt] [-d]`

use chrono::TimeDelta;
use clap::Parser;
use irapi::middleware::SentRequest;
use irapi::results::{DateRange, SearchResultsOptions};
use irapi::{Client, EnvironmentCredentials, Error, FileCredentials};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(about = "Show a member's latest races")]
struct Args {
    /// Member (customer) ID
    #[arg(short = 'u', long = "user")]
    cust_id: u64,

    /// File containing `username,password`; the environment is used otherwise
    #[arg(short, long)]
    credentials: Option<PathBuf>,

    /// Log every response's status and headers
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter("irapi=info,show_latest_races=debug")
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Unable to search results");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let builder = Client::builder();
    let mut client = match args.credentials {
        Some(path) => builder.credentials(FileCredentials::new(path)),
        None => builder.credentials(EnvironmentCredentials::new()),
    }
    .build()?;

    if args.debug {
        client.after_response(
            |sent: &SentRequest, response: Option<&reqwest::Response>| -> irapi::Result<()> {
                if let Some(response) = response {
                    tracing::debug!(
                        url = %sent.url,
                        status = response.status().as_u16(),
                        headers = ?response.headers(),
                        "Response"
                    );
                }
                Ok(())
            },
        );
    }

    client.login().await?;

    let options = SearchResultsOptions {
        cust_id: args.cust_id,
        date_range: Some(DateRange::ending_now(TimeDelta::days(14))),
        ..SearchResultsOptions::default()
    };

    tracing::info!("Searching for the last 100 results from the past two weeks");
    let results = client.search_results(&options).await?;
    tracing::info!(count = results.len(), "Got session results");

    println!(
        "{:<10}  {:<31}  {:>5}  {:>6}  {:>4}  {:>4}  {}",
        "ID", "Time", "Start", "Finish", "G/L", "Inc.", "Winner"
    );
    for r in &results {
        println!(
            "{:<10}  {:<31}  {:>5}  {:>6}  {:>+4}  {:>4}  {}",
            r.subsession_id,
            r.start_time.as_datetime().to_rfc2822(),
            r.starting_position,
            r.finish_position,
            r.positions_gained(),
            r.incidents,
            r.winner_name,
        );
    }

    Ok(())
}

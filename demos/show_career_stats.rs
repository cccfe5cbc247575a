//! Prints a member's lifetime career statistics per category.
//!
//! Run with: `cargo run --example show_career_stats -- -u 123456 [-c credentials.txt]`

use clap::Parser;
use irapi::{Client, EnvironmentCredentials, Error, FileCredentials};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(about = "Show a member's career stats")]
struct Args {
    /// Member (customer) ID
    #[arg(short = 'u', long = "user")]
    cust_id: u64,

    /// File containing `username,password`; the environment is used otherwise
    #[arg(short, long)]
    credentials: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter("irapi=info,show_career_stats=info")
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Failed to get career stats");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let builder = Client::builder();
    let client = match args.credentials {
        Some(path) => builder.credentials(FileCredentials::new(path)),
        None => builder.credentials(EnvironmentCredentials::new()),
    }
    .build()?;

    client.login().await?;

    let stats = client.get_career_stats(args.cust_id).await?;

    println!(
        "{:<10}  {:>8}  {:>8}  {:>11}  {:>4}",
        "Category", "Starts", "Laps", "Avg. Finish", "Wins"
    );
    for category in &stats {
        println!(
            "{:<10}  {:>8}  {:>8}  {:>11}  {:>4}",
            category.category,
            category.starts,
            category.total_laps,
            category.average_finish,
            category.wins
        );
    }

    Ok(())
}

//! Prints the race results of one subsession in finishing order.
//!
//! Run with: `cargo run --example show_session_results -- -s 38123456 [-c credentials.txt]`

use clap::Parser;
use irapi::results::RACE_SESSION;
use irapi::{Client, EnvironmentCredentials, Error, FileCredentials};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(about = "Show the race results of a subsession")]
struct Args {
    /// Subsession ID
    #[arg(short, long = "session")]
    subsession: u64,

    /// File containing `username,password`; the environment is used otherwise
    #[arg(short, long)]
    credentials: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter("irapi=info,show_session_results=info")
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Failed to get session results");
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

    let result = client.get_subsession_result(args.subsession).await?;
    println!(
        "{} at {} {}, started {} (average lap {})",
        result.series_name,
        result.track_name,
        result.track_config_name,
        result.start_time,
        irapi::Laptime::new(result.average_lap.as_delta().to_std().unwrap_or_default()),
    );

    println!(
        "{:>3}  {:<30}  {:>5}  {:>6}  {:>3}  {:>7}  {:>6}",
        "#", "Name", "Start", "Finish", "Ch", "iRating", "Change"
    );
    for r in result.session_rows(RACE_SESSION) {
        println!(
            "{:>3}  {:<30}  {:>5}  {:>6}  {:>+3}  {:>7}  {:>+6}",
            r.car_number,
            r.name,
            r.start_position,
            r.finish_position,
            r.positions_gained(),
            r.new_irating,
            r.irating_change(),
        );
    }

    Ok(())
}

//! Prints every lap one entrant drove in part of a subsession.
//!
//! Run with: `cargo run --example show_session_laps -- -s 38123456 -e 123456 [-p 0] [-c credentials.txt] [-d]`

use clap::Parser;
use irapi::middleware::SentRequest;
use irapi::{Client, EnvironmentCredentials, Error, FileCredentials};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(about = "Show the laps of one entrant")]
struct Args {
    /// Subsession ID
    #[arg(short, long = "session")]
    subsession: u64,

    /// Entrant (group) ID: the member ID, or the team ID in team events
    #[arg(short, long)]
    entrant: u64,

    /// Part of the event: 0 is the race, negative numbers come before it
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    phase: i64,

    /// File containing `username,password`; the environment is used otherwise
    #[arg(short, long)]
    credentials: Option<PathBuf>,

    /// Log every request and response
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter("irapi=info,show_session_laps=debug")
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Unable to get laps");
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
        client.before_request(|request: &mut reqwest::Request| -> irapi::Result<()> {
            tracing::debug!(
                method = %request.method(),
                url = %request.url(),
                headers = ?request.headers(),
                "Request"
            );
            Ok(())
        });
        client.after_response(
            |sent: &SentRequest, response: Option<&reqwest::Response>| -> irapi::Result<()> {
                match response {
                    Some(response) => tracing::debug!(
                        url = %sent.url,
                        status = response.status().as_u16(),
                        headers = ?response.headers(),
                        "Response"
                    ),
                    None => tracing::debug!(url = %sent.url, "No response"),
                }
                Ok(())
            },
        );
    }

    client.login().await?;

    let laps = client
        .get_laps(args.subsession, args.entrant, args.phase)
        .await?;

    println!("{:>4}  {:>12}  {:>10}  {:>8}", "Lap", "Session time", "Member", "Flags");
    for lap in &laps {
        println!(
            "{:>4}  {:>12}  {:>10}  {:>#8x}",
            lap.lap_number,
            lap.session_time,
            lap.cust_id,
            lap.flags.bits()
        );
    }

    Ok(())
}

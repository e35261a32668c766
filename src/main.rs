use std::env;
use std::process::ExitCode;

use hls_relay::utils::logging::init_tracing;
use hls_relay::{run_discovery, run_relay, HttpFetcher, RelayConfig};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mode = args.get(1).map(String::as_str).unwrap_or("relay");

    let config = RelayConfig::from_env();
    if let Err(error) = config.validate() {
        eprintln!("Invalid configuration: {error}");
        return ExitCode::from(2);
    }

    let fetcher = match HttpFetcher::new(&config) {
        Ok(fetcher) => fetcher,
        Err(error) => {
            eprintln!("Failed to set up HTTP client: {error:#}");
            return ExitCode::from(2);
        }
    };

    match mode {
        "relay" => match run_relay(&config, &fetcher).await {
            Ok(outcome) => {
                tracing::info!("Relay complete: {}", outcome.path.display());
                ExitCode::SUCCESS
            }
            Err(error) => {
                eprintln!("{error}");
                ExitCode::from(error.exit_code() as u8)
            }
        },
        "discover" => match run_discovery(&config, &fetcher).await {
            Ok(Some(found)) => {
                tracing::info!("Discovered master at {}", found.url);
                ExitCode::SUCCESS
            }
            Ok(None) => {
                // Nothing found is a reported condition, not a failure.
                ExitCode::SUCCESS
            }
            Err(error) => {
                eprintln!("{error}");
                ExitCode::from(error.exit_code() as u8)
            }
        },
        other => {
            eprintln!("Unknown mode: {other}");
            eprintln!("Usage: hls-relay [relay|discover]");
            ExitCode::from(1)
        }
    }
}

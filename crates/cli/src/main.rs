//! `storefront` binary entry point.

use std::process::ExitCode;

use clap::Parser;
use storefront_cli::Cli;
use storefront_observability::tracing::{LogFormat, init_with_default};

#[tokio::main]
async fn main() -> ExitCode {
    init_with_default(LogFormat::Pretty, "warn");

    let cli = Cli::parse();

    match cli.run().await {
        Ok(report) => {
            print!("{}", report.output);
            for message in &report.notifications {
                eprintln!("! {message}");
            }
            if report.succeeded {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

use clap::Parser;
use log::{error, info, warn};
use mirror_runner::{Args, RunnerResult, bootstrap};
use std::process::ExitCode;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> ExitCode {
    bootstrap::init_logging();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> RunnerResult<()> {
    let config = args.resolve()?;
    let broker = bootstrap::prepare(&config)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested");
                let _ = shutdown_tx.send(true);
            }
            Err(err) => {
                // Keep the sender alive so the reactor is not stopped
                warn!("Cannot listen for ctrl-c: {}", err);
                std::future::pending::<()>().await;
            }
        }
    });

    bootstrap::run(broker, &config, args.mode(), shutdown_rx).await
}

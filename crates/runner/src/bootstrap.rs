//! Bootstrap - logging, broker construction and the top-level flow
//!
//! Every start reports all portfolios first, then either stops (`--list`),
//! runs one cycle (`--once`) or hands over to the [`Reactor`].

use log::{error, info};
use mirror_engine::{Replicator, Reporter};
use mirror_gateway::PaperBroker;
use mirror_ports::Broker;
use std::sync::Arc;
use tokio::sync::watch;

use crate::args::RunMode;
use crate::config::RunnerConfig;
use crate::error::{RunnerError, RunnerResult};
use crate::reactor::Reactor;

/// Install the global logger; `RUST_LOG` overrides the `info` default
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Validated sync settings first, then the paper broker
pub fn prepare(config: &RunnerConfig) -> RunnerResult<Arc<PaperBroker>> {
    config.sync_config()?;
    paper_broker(config)
}

/// Paper broker from the configured seed file
pub fn paper_broker(config: &RunnerConfig) -> RunnerResult<Arc<PaperBroker>> {
    let path = config.paper_seed.as_ref().ok_or(RunnerError::MissingSeed)?;
    info!("Loading paper broker seed from {}", path.display());
    Ok(Arc::new(PaperBroker::from_file(path)?))
}

pub async fn run<B>(
    broker: Arc<B>,
    config: &RunnerConfig,
    mode: RunMode,
    shutdown: watch::Receiver<bool>,
) -> RunnerResult<()>
where
    B: Broker + ?Sized,
{
    // Validate before touching the broker
    let sync_config = config.sync_config()?;

    let listing = Reporter::new(&*broker).all_portfolios().await;
    match (listing, mode) {
        (Ok(_), RunMode::List) => return Ok(()),
        (Err(err), RunMode::List) => return Err(err.into()),
        (Err(err), _) => error!("Portfolio listing failed: {}", err),
        (Ok(_), _) => {}
    }

    let (src, dst) = config.accounts()?;
    let replicator = Replicator::new(broker, sync_config);

    match mode {
        RunMode::Once => {
            let report = replicator.sync(&src, &dst).await?;
            info!("Single cycle placed {} orders", report.placed.len());
        }
        RunMode::Follow => {
            let policy = config.restart.policy();
            Reactor::new(replicator, src, dst, policy)
                .run(shutdown)
                .await?;
        }
        RunMode::List => {}
    }
    Ok(())
}

use clap::Parser;
use mirror_engine::fraction_from_f64;
use std::path::PathBuf;

use crate::config::RunnerConfig;
use crate::error::RunnerResult;

#[derive(Parser, Debug, Clone)]
#[command(name = "mirror", version, about = "Mirror a source brokerage account onto a destination account", long_about = None)]
pub struct Args {
    /// JSON configuration file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Source account id
    #[arg(short, long)]
    pub src: Option<String>,

    /// Destination account id
    #[arg(short, long)]
    pub dst: Option<String>,

    /// Minimum plan notional as a fraction of destination capital
    #[arg(short, long)]
    pub threshold: Option<f64>,

    /// Fraction of destination capital left unallocated
    #[arg(short, long)]
    pub reserve: Option<f64>,

    /// Plan and report orders without sending them
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Run a single sync cycle and exit
    #[arg(long, default_value_t = false)]
    pub once: bool,

    /// Print every portfolio and exit
    #[arg(long, default_value_t = false, conflicts_with = "once")]
    pub list: bool,

    /// Paper broker seed file
    #[arg(long)]
    pub paper_seed: Option<PathBuf>,
}

/// What the binary does after start-up reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    List,
    Once,
    Follow,
}

impl Args {
    pub fn mode(&self) -> RunMode {
        if self.list {
            RunMode::List
        } else if self.once {
            RunMode::Once
        } else {
            RunMode::Follow
        }
    }

    /// Configuration file (if any) with the flags applied on top
    pub fn resolve(&self) -> RunnerResult<RunnerConfig> {
        let mut config = match &self.config {
            Some(path) => RunnerConfig::from_file(path)?,
            None => RunnerConfig::default(),
        };

        if let Some(src) = &self.src {
            config.src = Some(src.clone());
        }
        if let Some(dst) = &self.dst {
            config.dst = Some(dst.clone());
        }
        if let Some(threshold) = self.threshold {
            config.threshold = Some(fraction_from_f64("threshold", threshold)?);
        }
        if let Some(reserve) = self.reserve {
            config.reserve = Some(fraction_from_f64("reserve", reserve)?);
        }
        if self.paper_seed.is_some() {
            config.paper_seed = self.paper_seed.clone();
        }
        config.debug |= self.debug;

        Ok(config)
    }
}

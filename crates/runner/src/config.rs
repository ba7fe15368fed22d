//! Runner configuration file
//!
//! ```json
//! {
//!   "src": "2000123456",
//!   "dst": "2000654321",
//!   "threshold": "0.004",
//!   "reserve": "0.01",
//!   "debug": false,
//!   "restart": { "initial_backoff_ms": 1000, "max_backoff_ms": 60000 },
//!   "paper_seed": "paper-seed.json"
//! }
//! ```
//!
//! Every field is optional. Fractions are best written as strings so they
//! stay exact.

use mirror_core::AccountId;
use mirror_engine::{ConfigResult, SyncConfig};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{RunnerError, RunnerResult};
use crate::reactor::RestartPolicy;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Source account id
    pub src: Option<String>,
    /// Destination account id
    pub dst: Option<String>,
    pub threshold: Option<Decimal>,
    pub reserve: Option<Decimal>,
    /// Plan and report without sending orders
    pub debug: bool,
    pub restart: RestartSettings,
    /// Paper broker seed file
    pub paper_seed: Option<PathBuf>,
}

/// Resubscription backoff, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartSettings {
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RestartSettings {
    fn default() -> Self {
        Self {
            initial_backoff_ms: 1_000,
            max_backoff_ms: 60_000,
        }
    }
}

impl RestartSettings {
    pub fn policy(&self) -> RestartPolicy {
        RestartPolicy {
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }
}

impl RunnerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> RunnerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> RunnerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Engine settings, validated
    pub fn sync_config(&self) -> ConfigResult<SyncConfig> {
        let mut config = SyncConfig::default().with_simulation(self.debug);
        if let Some(threshold) = self.threshold {
            config = config.with_threshold(threshold)?;
        }
        if let Some(reserve) = self.reserve {
            config = config.with_reserve(reserve)?;
        }
        Ok(config)
    }

    /// Source and destination accounts; both required and distinct
    pub fn accounts(&self) -> RunnerResult<(AccountId, AccountId)> {
        let src = self
            .src
            .as_deref()
            .map(AccountId::new)
            .ok_or(RunnerError::MissingAccount("source"))?;
        let dst = self
            .dst
            .as_deref()
            .map(AccountId::new)
            .ok_or(RunnerError::MissingAccount("destination"))?;
        if src == dst {
            return Err(RunnerError::SameAccount(src));
        }
        Ok((src, dst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror_engine::ConfigError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = RunnerConfig::from_json("{}").unwrap();
        assert_eq!(config, RunnerConfig::default());

        let sync = config.sync_config().unwrap();
        assert_eq!(sync, SyncConfig::default());
        assert_eq!(config.restart.policy(), RestartPolicy::default());
    }

    #[test]
    fn test_full_file() {
        let json = r#"{
            "src": "a", "dst": "b", "threshold": "0.001", "reserve": "0.005",
            "debug": true, "restart": { "initial_backoff_ms": 10 },
            "paper_seed": "seed.json"
        }"#;
        let config = RunnerConfig::from_json(json).unwrap();

        let sync = config.sync_config().unwrap();
        assert!(sync.simulation());
        assert_eq!(sync.threshold(), dec!(0.001));
        assert_eq!(sync.reserve(), dec!(0.005));

        let policy = config.restart.policy();
        assert_eq!(policy.initial_backoff, Duration::from_millis(10));
        assert_eq!(policy.max_backoff, Duration::from_secs(60));

        let (src, dst) = config.accounts().unwrap();
        assert_eq!(src, AccountId::new("a"));
        assert_eq!(dst, AccountId::new("b"));
        assert_eq!(config.paper_seed, Some(PathBuf::from("seed.json")));
    }

    #[test]
    fn test_out_of_range_fraction_is_rejected() {
        let config = RunnerConfig::from_json(r#"{ "reserve": "2" }"#).unwrap();
        assert_eq!(
            config.sync_config(),
            Err(ConfigError::ReserveOutOfRange(dec!(2)))
        );
    }

    #[test]
    fn test_wrong_type_is_a_parse_error() {
        let err = RunnerConfig::from_json(r#"{ "debug": "yes" }"#).unwrap_err();
        assert!(matches!(err, RunnerError::Parse(_)));
    }

    #[test]
    fn test_accounts_must_be_present_and_distinct() {
        let missing = RunnerConfig {
            src: Some("a".into()),
            ..Default::default()
        };
        assert!(matches!(
            missing.accounts(),
            Err(RunnerError::MissingAccount("destination"))
        ));

        let same = RunnerConfig {
            src: Some("a".into()),
            dst: Some("a".into()),
            ..Default::default()
        };
        assert!(matches!(same.accounts(), Err(RunnerError::SameAccount(_))));
    }
}

//! Run configuration.
//!
//! All run settings are loaded from a TOML file, every field defaulted,
//! with CLI overrides applied on top by the binary. Validation happens
//! once, before the run starts; nothing here can fail mid-run.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Complete configuration for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Number of agents (fixed for the run)
    pub n: u32,
    /// Number of discrete time steps
    pub tmax: u64,
    /// Per-agent per-step probability of reviewing its situation
    pub churn: f64,
    /// Job-change cost, as a multiple of current wage
    pub cost: f64,
    /// Startup cost multiplier on top of the job-change cost
    pub multiplier: f64,
    /// Mean saving rate
    pub savingrate: f64,
    /// Saving rate spread (0 = every agent saves at `savingrate`)
    pub sigma: f64,
    /// Minimum social network degree
    pub mindegree: u32,
    /// Maximum social network degree
    pub maxdegree: u32,
    /// Whether agents may borrow at all
    pub lending: bool,
    /// Periodic compound interest rate on outstanding loans
    pub lendingrate: f64,
    /// Whether loan approval considers projected repayment capacity
    pub debt_awareness: bool,
    /// Repayment horizon, in steps, for the debt-aware feasibility check
    pub loan_repayment_lookahead: u32,
    /// Maximum outstanding principal per agent (0 = uncapped)
    pub loan_cap: f64,
    /// Seed for the run's single random generator
    pub seed: u64,
    /// Directory under which the experiment directory is created
    pub path: PathBuf,
    /// Experiment name, controls output file naming
    pub experiment: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            n: 600,
            tmax: 500,
            churn: 0.01,
            cost: 1.0,
            multiplier: 2.0,
            savingrate: 0.03,
            sigma: 0.01,
            mindegree: 2,
            maxdegree: 6,
            lending: true,
            lendingrate: 0.03,
            debt_awareness: true,
            loan_repayment_lookahead: 12,
            loan_cap: 0.0,
            seed: 42,
            path: PathBuf::from("data"),
            experiment: "run".to_string(),
        }
    }
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Directory where this run writes its outputs.
    pub fn output_dir(&self) -> PathBuf {
        self.path.join(&self.experiment)
    }

    /// Effective startup cost rate (`cost * multiplier`).
    pub fn startup_rate(&self) -> f64 {
        self.cost * self.multiplier
    }

    /// Fail-fast parameter validation, naming the offending parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(parameter: &'static str, reason: impl Into<String>) -> ConfigError {
            ConfigError::InvalidParameter {
                parameter,
                reason: reason.into(),
            }
        }

        if self.n == 0 {
            return Err(invalid("n", "population must be at least 1"));
        }
        if self.tmax == 0 {
            return Err(invalid("tmax", "must run at least one step"));
        }
        if !(0.0..=1.0).contains(&self.churn) {
            return Err(invalid("churn", "must be a probability in [0, 1]"));
        }
        if self.cost < 0.0 {
            return Err(invalid("cost", "must be non-negative"));
        }
        if self.multiplier < 0.0 {
            return Err(invalid("multiplier", "must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.savingrate) {
            return Err(invalid("savingrate", "must lie in [0, 1]"));
        }
        if self.sigma < 0.0 {
            return Err(invalid("sigma", "must be non-negative"));
        }
        if self.mindegree == 0 {
            return Err(invalid("mindegree", "agents need at least one social link"));
        }
        if self.maxdegree < self.mindegree {
            return Err(invalid("maxdegree", "must be >= mindegree"));
        }
        if self.maxdegree >= self.n {
            return Err(invalid(
                "maxdegree",
                format!("must be below the population size {}", self.n),
            ));
        }
        if self.lendingrate < 0.0 {
            return Err(invalid("lendingrate", "must be non-negative"));
        }
        if self.loan_repayment_lookahead == 0 {
            return Err(invalid(
                "loan_repayment_lookahead",
                "repayment horizon must be at least one step",
            ));
        }
        if self.loan_cap < 0.0 {
            return Err(invalid("loan_cap", "must be non-negative (0 = uncapped)"));
        }
        if self.experiment.is_empty() {
            return Err(invalid("experiment", "must not be empty"));
        }
        Ok(())
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading the config file
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing the TOML config
    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    /// A parameter is out of range or inconsistent
    #[error("invalid parameter `{parameter}`: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.n, 600);
        assert_eq!(config.tmax, 500);
        assert!(config.debt_awareness);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
            n = 10
            tmax = 50
            loan_cap = 100.0
        "#;

        let config = SimConfig::from_toml_str(toml).unwrap();

        assert_eq!(config.n, 10);
        assert_eq!(config.tmax, 50);
        assert_eq!(config.loan_cap, 100.0);
        // Defaults
        assert_eq!(config.churn, 0.01);
        assert!(config.lending);
    }

    #[test]
    fn test_validation_names_offending_parameter() {
        let config = SimConfig {
            churn: 1.5,
            ..SimConfig::default()
        };

        let err = config.validate().unwrap_err();
        match err {
            ConfigError::InvalidParameter { parameter, .. } => assert_eq!(parameter, "churn"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_degree_bounds_checked_against_population() {
        let config = SimConfig {
            n: 5,
            maxdegree: 6,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SimConfig {
            n: 5,
            mindegree: 2,
            maxdegree: 4,
            ..SimConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_negative_loan_cap_rejected() {
        let config = SimConfig {
            loan_cap: -1.0,
            ..SimConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = SimConfig::default();
        let toml = config.to_toml().unwrap();
        let parsed = SimConfig::from_toml_str(&toml).unwrap();

        assert_eq!(parsed.n, config.n);
        assert_eq!(parsed.seed, config.seed);
        assert_eq!(parsed.experiment, config.experiment);
    }

    #[test]
    fn test_startup_rate() {
        let config = SimConfig::default();
        assert!((config.startup_rate() - 2.0).abs() < 1e-12);
    }
}

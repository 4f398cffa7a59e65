//! Configuration system for LoadForge.
//!
//! Load optimizer configuration from TOML or YAML files to pick the engine,
//! the slot ordering, the leftover reporting rule and the termination budget
//! without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use loadforge_config::{EngineKind, SolverConfig};
//! use std::time::Duration;
//!
//! let config = SolverConfig::from_toml_str(r#"
//!     engine = "exact"
//!
//!     [termination]
//!     seconds_spent_limit = 10
//!
//!     [exact]
//!     variable_limit = 2000
//! "#).unwrap();
//!
//! assert_eq!(config.engine, EngineKind::Exact);
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(10)));
//! assert_eq!(config.exact.variable_limit, 2000);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use loadforge_config::SolverConfig;
//!
//! let config = SolverConfig::load("loadforge.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::Path;
use std::time::Duration;

pub use loadforge_core::domain::SlotOrder;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Time limit applied when no termination is configured.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(30);

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main optimizer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SolverConfig {
    /// Engine used to solve the assignment model.
    #[serde(default)]
    pub engine: EngineKind,

    /// Order of expanded vehicle slots.
    #[serde(default)]
    pub slot_order: SlotOrder,

    /// How empty slots contribute to leftover capacity.
    #[serde(default)]
    pub leftover_policy: LeftoverPolicy,

    /// Omit (item, slot) pairs where the item alone exceeds the slot.
    #[serde(default = "default_true")]
    pub prune_unfit_pairs: bool,

    /// Termination configuration.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Exact engine configuration.
    #[serde(default)]
    pub exact: ExactConfig,

    /// Greedy engine configuration.
    #[serde(default)]
    pub greedy: GreedyConfig,
}

fn default_true() -> bool {
    true
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            engine: EngineKind::default(),
            slot_order: SlotOrder::default(),
            leftover_policy: LeftoverPolicy::default(),
            prune_unfit_pairs: true,
            termination: None,
            exact: ExactConfig::default(),
            greedy: GreedyConfig::default(),
        }
    }
}

impl SolverConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file, picking the format by extension.
    ///
    /// `.yaml` and `.yml` files are read as YAML, everything else as TOML.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist or contains invalid TOML/YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Sets the engine.
    pub fn with_engine(mut self, engine: EngineKind) -> Self {
        self.engine = engine;
        self
    }

    /// Sets the slot order.
    pub fn with_slot_order(mut self, order: SlotOrder) -> Self {
        self.slot_order = order;
        self
    }

    /// Sets the leftover policy.
    pub fn with_leftover_policy(mut self, policy: LeftoverPolicy) -> Self {
        self.leftover_policy = policy;
        self
    }

    /// Enables or disables unfit pair pruning.
    pub fn with_pruning(mut self, enabled: bool) -> Self {
        self.prune_unfit_pairs = enabled;
        self
    }

    /// Sets the termination time limit in seconds.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            millis_spent_limit: None,
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the termination time limit from a duration.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        let millis = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: None,
            millis_spent_limit: Some(millis),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the node budget of the exact engine.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.termination = Some(TerminationConfig {
            node_count_limit: Some(nodes),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the model size up to which `auto` picks the exact engine.
    pub fn with_variable_limit(mut self, limit: usize) -> Self {
        self.exact.variable_limit = limit;
        self
    }

    /// Returns the termination time limit, if configured.
    ///
    /// # Examples
    ///
    /// ```
    /// use loadforge_config::SolverConfig;
    /// use std::time::Duration;
    ///
    /// let config = SolverConfig::from_toml_str(r#"
    ///     [termination]
    ///     seconds_spent_limit = 2
    ///     millis_spent_limit = 500
    /// "#).unwrap();
    ///
    /// assert_eq!(config.time_limit(), Some(Duration::from_millis(2500)));
    /// ```
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }

    /// Returns the configured time limit or [`DEFAULT_TIME_LIMIT`].
    pub fn effective_time_limit(&self) -> Duration {
        self.time_limit().unwrap_or(DEFAULT_TIME_LIMIT)
    }

    /// Returns the node budget, if configured.
    pub fn node_limit(&self) -> Option<u64> {
        self.termination.as_ref().and_then(|t| t.node_count_limit)
    }

    /// Checks values serde cannot reject on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exact.variable_limit == 0 {
            return Err(ConfigError::Invalid(
                "exact.variable_limit must be greater than zero".to_string(),
            ));
        }
        if self.node_limit() == Some(0) {
            return Err(ConfigError::Invalid(
                "termination.node_count_limit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Engine selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Exact search for models up to `exact.variable_limit`, greedy above.
    #[default]
    Auto,

    /// Branch-and-bound regardless of size.
    Exact,

    /// First-fit decreasing regardless of size.
    Greedy,
}

/// How empty slots are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LeftoverPolicy {
    /// Empty slots report zero leftover and are left out of fleet totals.
    #[default]
    LoadedSlotsOnly,

    /// Empty slots report their full capacity as leftover.
    AllSlots,
}

/// Termination configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend solving, added to the seconds.
    pub millis_spent_limit: Option<u64>,

    /// Maximum search nodes explored by the exact engine.
    pub node_count_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        if self.seconds_spent_limit.is_none() && self.millis_spent_limit.is_none() {
            return None;
        }
        let seconds = Duration::from_secs(self.seconds_spent_limit.unwrap_or(0));
        let millis = Duration::from_millis(self.millis_spent_limit.unwrap_or(0));
        Some(seconds.saturating_add(millis))
    }
}

/// Exact engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ExactConfig {
    /// Largest variable count `auto` still hands to the exact engine.
    #[serde(default = "default_variable_limit")]
    pub variable_limit: usize,

    /// Seed the incumbent with the greedy solution.
    #[serde(default = "default_true")]
    pub warm_start: bool,

    /// Skip branches equivalent to ones already explored.
    #[serde(default = "default_true")]
    pub symmetry_breaking: bool,
}

fn default_variable_limit() -> usize {
    5000
}

impl Default for ExactConfig {
    fn default() -> Self {
        Self {
            variable_limit: default_variable_limit(),
            warm_start: true,
            symmetry_breaking: true,
        }
    }
}

/// Greedy engine configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct GreedyConfig {
    /// Order in which items are placed.
    #[serde(default)]
    pub order: GreedyOrder,
}

/// Item ordering for first-fit decreasing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GreedyOrder {
    /// Largest volume first.
    #[default]
    VolumeDecreasing,

    /// Highest volume per unit weight first.
    DensityDecreasing,
}

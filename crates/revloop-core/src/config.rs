//! Loop configuration with layered sources.
//!
//! Priority, lowest to highest:
//! 1. built-in defaults
//! 2. `./revloop.toml` when present
//! 3. an explicit config path
//! 4. `REVLOOP_*` environment variables (`REVLOOP_MAX_TURNS`, `REVLOOP_STRICT_MODE`)

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::{Result, RevloopError};
use crate::roles::ReviewPolicy;
use crate::router::DEFAULT_MAX_TURNS;

/// Project-level config file picked up from the working directory.
pub const PROJECT_CONFIG_FILE: &str = "revloop.toml";

pub const ENV_PREFIX: &str = "REVLOOP_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Supervisor turns after which outstanding issues are accepted as final.
    pub max_turns: u32,
    /// Review every run under the strict policy, whatever its own flag says.
    pub strict_mode: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            strict_mode: false,
        }
    }
}

impl LoopConfig {
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_strict_mode(mut self, strict_mode: bool) -> Self {
        self.strict_mode = strict_mode;
        self
    }

    /// Load from all sources and validate.
    ///
    /// # Errors
    ///
    /// - `RevloopError::InvalidConfig` if `explicit` does not exist or the
    ///   merged values fail [`LoopConfig::validate`].
    /// - `RevloopError::Config` if a source cannot be parsed.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(RevloopError::InvalidConfig(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
        }
        Self::from_figment(Self::figment(explicit))
    }

    /// The merged provider chain, without extraction.
    pub fn figment(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(LoopConfig::default()));

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: LoopConfig = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(PROJECT_CONFIG_FILE);
        path.exists().then_some(path)
    }

    /// # Errors
    ///
    /// `RevloopError::InvalidConfig` when `max_turns` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_turns == 0 {
            return Err(RevloopError::InvalidConfig(
                "max_turns must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Policy for a run whose own flag is `run_strict_mode`.
    pub fn review_policy(&self, run_strict_mode: bool) -> ReviewPolicy {
        ReviewPolicy::from_strict_mode(self.strict_mode || run_strict_mode)
    }
}

//! Container configuration.
//!
//! Values come from code, from the environment (`KEYSTONE_DI_*` variables) or,
//! with the `config` feature, from JSON.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Default maximum resolution depth.
///
/// A chain this deep fits a 2 MiB thread stack in debug builds.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Environment variable prefix read by [`ContainerConfig::from_env`].
pub const ENV_PREFIX: &str = "KEYSTONE_DI";

/// Tunables for a [`Container`](crate::Container).
///
/// # Examples
///
/// ```
/// use keystone_di::{Container, ContainerConfig};
///
/// let config = ContainerConfig::default().max_depth(64);
/// let container = Container::with_config("workers", config);
/// assert_eq!(container.config().max_depth, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerConfig {
    /// Deepest dependency chain a single resolution may walk before failing
    /// with `DepthExceeded`.
    pub max_depth: usize,
}

impl ContainerConfig {
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Reads `KEYSTONE_DI_MAX_DEPTH`. Missing or unparsable values keep the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let name = format!("{}_MAX_DEPTH", ENV_PREFIX);
        if let Some(raw) = lookup(&name) {
            match raw.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_depth = depth,
                _ => tracing::warn!(variable = %name, value = %raw, "ignoring invalid container setting"),
            }
        }
        config
    }

    /// Parses a JSON object such as `{"max_depth": 256}`; absent fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

//! Store configuration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Environment variable selecting the [`ConflictPolicy`].
pub const CONFLICT_POLICY_ENV: &str = "SLICEBIND_CONFLICT_POLICY";

/// Environment variable enabling the devtools observer stage.
pub const DEVTOOLS_ENV: &str = "SLICEBIND_DEVTOOLS";

/// What the binder does when a component claims a slice key that is
/// already registered.
///
/// In every case the first registered reducer keeps the slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Share the existing slice silently.
    Allow,
    /// Share the existing slice and log a warning.
    #[default]
    Warn,
    /// Refuse to connect the component.
    Reject,
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "warn" => Ok(Self::Warn),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown conflict policy `{other}`")),
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Allow => "allow",
            Self::Warn => "warn",
            Self::Reject => "reject",
        };
        f.write_str(name)
    }
}

/// Configuration for a [`StoreManager`](crate::StoreManager) and the
/// binders built on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Policy applied when two components claim the same slice key.
    pub conflict_policy: ConflictPolicy,
    /// Install the tracing observer as the first middleware stage.
    pub devtools: bool,
}

impl StoreConfig {
    /// Load configuration from the process environment.
    ///
    /// Unset variables keep their defaults; unparseable values are logged
    /// and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(CONFLICT_POLICY_ENV) {
            match raw.parse() {
                Ok(policy) => config.conflict_policy = policy,
                Err(err) => warn!(%err, "ignoring {CONFLICT_POLICY_ENV}"),
            }
        }

        if let Some(raw) = lookup(DEVTOOLS_ENV) {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.devtools = true,
                "0" | "false" | "no" | "off" | "" => config.devtools = false,
                other => warn!(value = other, "ignoring {DEVTOOLS_ENV}"),
            }
        }

        config
    }
}

//! Environment lookups
//!
//! Settings are read through the [`Environment`] trait on every request, so a
//! change to the environment is picked up by the next call. Tests substitute a
//! [`StaticEnvironment`] instead of mutating process-wide variables.

use std::collections::HashMap;

/// Environment variable holding the API subscription key
pub const ENV_API_KEY: &str = "SIGNAL_OCEAN_API_KEY";
/// Environment variable overriding the gateway base URL
pub const ENV_API_HOST: &str = "SIGNAL_OCEAN_API_HOST";
/// Environment variable holding the group id used with bearer auth
pub const ENV_GROUP_ID: &str = "SIGNAL_OCEAN_GROUP_ID";

/// Source of environment variables
pub trait Environment: Send + Sync + std::fmt::Debug {
    /// Look up a variable, `None` if it is not set
    fn var(&self, key: &str) -> Option<String>;

    /// Look up a variable, treating an empty value as unset
    fn non_empty_var(&self, key: &str) -> Option<String> {
        self.var(key).filter(|value| !value.is_empty())
    }
}

/// Reads the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Fixed set of variables
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    vars: HashMap<String, String>,
}

impl StaticEnvironment {
    /// Create an empty environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for StaticEnvironment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Environment for StaticEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

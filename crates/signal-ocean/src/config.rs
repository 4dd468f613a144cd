//! Connection configuration and setting resolution

use crate::env::{Environment, ENV_API_HOST, ENV_API_KEY, ENV_GROUP_ID};

/// Gateway used when no host is configured
pub const DEFAULT_API_HOST: &str = "https://api-gateway.signalocean.com/";

/// Group id sent with bearer auth when none is configured
pub const DEFAULT_GROUP_ID: &str = "1";

/// Header scheme used to authenticate requests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// `Api-Key: <key>`
    #[default]
    ApiKey,
    /// `Authorization: bearer <key>` plus `GroupId: <group>`
    ///
    /// The group id falls back to `SIGNAL_OCEAN_GROUP_ID`, then to
    /// [`DEFAULT_GROUP_ID`], when not given here.
    BearerWithGroup(Option<String>),
}

impl AuthMode {
    /// Bearer auth with the group id taken from the environment
    pub fn bearer() -> Self {
        Self::BearerWithGroup(None)
    }

    /// Bearer auth with an explicit group id
    pub fn bearer_with_group(group_id: impl Into<String>) -> Self {
        Self::BearerWithGroup(Some(group_id.into()))
    }

    /// Maps the legacy `bearer_auth` flag onto a mode
    pub fn from_bearer_flag(bearer_auth: bool) -> Self {
        if bearer_auth {
            Self::bearer()
        } else {
            Self::ApiKey
        }
    }
}

/// Settings captured when a connection is created
///
/// Empty strings count as unset, so an empty key or host falls through to
/// the environment.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    api_key: Option<String>,
    api_host: Option<String>,
    auth_mode: AuthMode,
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("api_host", &self.api_host)
            .field("auth_mode", &self.auth_mode)
            .finish()
    }
}

impl ConnectionConfig {
    /// Create a config from explicit settings
    pub fn new(api_key: Option<String>, api_host: Option<String>, auth_mode: AuthMode) -> Self {
        Self {
            api_key,
            api_host,
            auth_mode,
        }
    }

    /// Explicitly configured API key
    pub fn api_key(&self) -> Option<&str> {
        non_empty(self.api_key.as_deref())
    }

    /// Explicitly configured host
    pub fn api_host(&self) -> Option<&str> {
        non_empty(self.api_host.as_deref())
    }

    /// Header scheme
    pub fn auth_mode(&self) -> &AuthMode {
        &self.auth_mode
    }

    /// Effective API key: explicit value, else `SIGNAL_OCEAN_API_KEY`
    pub fn resolve_api_key(&self, env: &dyn Environment) -> Option<String> {
        self.api_key()
            .map(str::to_string)
            .or_else(|| env.non_empty_var(ENV_API_KEY))
    }

    /// Effective host, always ending with `/`
    ///
    /// Explicit value, else `SIGNAL_OCEAN_API_HOST`, else [`DEFAULT_API_HOST`].
    pub fn resolve_api_host(&self, env: &dyn Environment) -> String {
        let host = self
            .api_host()
            .map(str::to_string)
            .or_else(|| env.non_empty_var(ENV_API_HOST))
            .unwrap_or_else(|| DEFAULT_API_HOST.to_string());

        normalize_host(host)
    }

    /// Effective group id, `None` unless bearer auth is selected
    ///
    /// Explicit value, else `SIGNAL_OCEAN_GROUP_ID`, else [`DEFAULT_GROUP_ID`].
    pub fn resolve_group_id(&self, env: &dyn Environment) -> Option<String> {
        match &self.auth_mode {
            AuthMode::ApiKey => None,
            AuthMode::BearerWithGroup(group_id) => Some(
                non_empty(group_id.as_deref())
                    .map(str::to_string)
                    .or_else(|| env.non_empty_var(ENV_GROUP_ID))
                    .unwrap_or_else(|| DEFAULT_GROUP_ID.to_string()),
            ),
        }
    }
}

/// Append a trailing `/` unless the host already ends with one
pub fn normalize_host(mut host: String) -> String {
    if !host.ends_with('/') {
        host.push('/');
    }
    host
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

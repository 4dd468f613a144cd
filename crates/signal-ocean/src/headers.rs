//! Request header construction

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::{AuthMode, ConnectionConfig};
use crate::env::Environment;
use crate::error::{Error, Result};

/// `Content-Type` header name
pub const CONTENT_TYPE: &str = "Content-Type";
/// API key header name
pub const API_KEY: &str = "Api-Key";
/// Bearer token header name
pub const AUTHORIZATION: &str = "Authorization";
/// Group id header name
pub const GROUP_ID: &str = "GroupId";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Headers computed for a single request
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedHeaders {
    entries: Vec<(&'static str, String)>,
}

impl std::fmt::Debug for ResolvedHeaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in &self.entries {
            if *name == API_KEY || *name == AUTHORIZATION {
                map.entry(name, &"[redacted]");
            } else {
                map.entry(name, value);
            }
        }
        map.finish()
    }
}

impl ResolvedHeaders {
    /// Resolve headers from the connection config and the current environment
    ///
    /// When no API key can be found, or it is empty, the auth header is left
    /// out and the gateway is left to reject the request. Bearer mode still
    /// sends `GroupId` in that case.
    pub fn resolve(config: &ConnectionConfig, env: &dyn Environment) -> Self {
        let api_key = config.resolve_api_key(env);
        if api_key.is_none() {
            tracing::warn!("No API key configured; request will be sent unauthenticated");
        }

        let mut entries = vec![(CONTENT_TYPE, JSON_CONTENT_TYPE.to_string())];

        match config.auth_mode() {
            AuthMode::ApiKey => {
                if let Some(key) = api_key {
                    entries.push((API_KEY, key));
                }
            }
            AuthMode::BearerWithGroup(_) => {
                if let Some(key) = api_key {
                    entries.push((AUTHORIZATION, format!("bearer {key}")));
                }
                if let Some(group_id) = config.resolve_group_id(env) {
                    entries.push((GROUP_ID, group_id));
                }
            }
        }

        Self { entries }
    }

    /// Value of a header, matched case-insensitively
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether a header is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over header name/value pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (*n, v.as_str()))
    }

    /// Number of headers
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no headers
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert into a transport header map
    ///
    /// Fails if a value (usually the API key) holds characters that are not
    /// allowed in an HTTP header.
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            let invalid = || Error::InvalidHeader((*name).to_string());
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
            let value = HeaderValue::from_str(value).map_err(|_| invalid())?;
            map.insert(header_name, value);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{StaticEnvironment, ENV_API_KEY, ENV_GROUP_ID};

    fn config(api_key: Option<&str>, auth_mode: AuthMode) -> ConnectionConfig {
        ConnectionConfig::new(api_key.map(str::to_string), None, auth_mode)
    }

    #[test]
    fn test_api_key_headers() {
        let config = config(Some("K"), AuthMode::ApiKey);
        let headers = ResolvedHeaders::resolve(&config, &StaticEnvironment::new());

        assert_eq!(headers.get(CONTENT_TYPE), Some("application/json"));
        assert_eq!(headers.get(API_KEY), Some("K"));
        assert!(!headers.contains(AUTHORIZATION));
        assert!(!headers.contains(GROUP_ID));
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_bearer_headers_with_group_from_environment() {
        let env = StaticEnvironment::new().with(ENV_GROUP_ID, "G");
        let headers = ResolvedHeaders::resolve(&config(Some("K"), AuthMode::bearer()), &env);

        assert_eq!(headers.get(CONTENT_TYPE), Some("application/json"));
        assert_eq!(headers.get(AUTHORIZATION), Some("bearer K"));
        assert_eq!(headers.get(GROUP_ID), Some("G"));
        assert!(!headers.contains(API_KEY));
    }

    #[test]
    fn test_bearer_headers_default_group() {
        let config = config(Some("K"), AuthMode::bearer());
        let headers = ResolvedHeaders::resolve(&config, &StaticEnvironment::new());

        assert_eq!(headers.get(GROUP_ID), Some("1"));
    }

    #[test]
    fn test_api_key_read_from_environment_on_each_resolve() {
        let config = config(None, AuthMode::ApiKey);

        let first_env = StaticEnvironment::new().with(ENV_API_KEY, "a");
        let second_env = StaticEnvironment::new().with(ENV_API_KEY, "b");
        let first = ResolvedHeaders::resolve(&config, &first_env);
        let second = ResolvedHeaders::resolve(&config, &second_env);

        assert_eq!(first.get(API_KEY), Some("a"));
        assert_eq!(second.get(API_KEY), Some("b"));
    }

    #[test]
    fn test_missing_api_key_omits_auth_header() {
        let config = config(None, AuthMode::ApiKey);
        let headers = ResolvedHeaders::resolve(&config, &StaticEnvironment::new());

        assert!(!headers.contains(API_KEY));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_bearer_without_key_sends_group_only() {
        let config = config(None, AuthMode::bearer());
        let headers = ResolvedHeaders::resolve(&config, &StaticEnvironment::new());

        assert!(!headers.contains(AUTHORIZATION));
        assert!(!headers.contains(API_KEY));
        assert_eq!(headers.get(GROUP_ID), Some("1"));
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_empty_api_key_in_environment_counts_as_unset() {
        let config = config(None, AuthMode::ApiKey);
        let env = StaticEnvironment::new().with(ENV_API_KEY, "");
        let headers = ResolvedHeaders::resolve(&config, &env);

        assert!(!headers.contains(API_KEY));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let config = config(Some("K"), AuthMode::ApiKey);
        let headers = ResolvedHeaders::resolve(&config, &StaticEnvironment::new());

        assert_eq!(headers.get("api-key"), Some("K"));
    }

    #[test]
    fn test_to_header_map() {
        let headers = ResolvedHeaders::resolve(
            &config(Some("K"), AuthMode::bearer_with_group("G")),
            &StaticEnvironment::new(),
        );
        let map = headers.to_header_map().expect("Valid header values");

        assert_eq!(
            map.get("authorization").and_then(|v| v.to_str().ok()),
            Some("bearer K")
        );
        assert_eq!(map.get("groupid").and_then(|v| v.to_str().ok()), Some("G"));
        assert_eq!(
            map.get("content-type").and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }

    #[test]
    fn test_to_header_map_rejects_invalid_value() {
        let headers = ResolvedHeaders::resolve(
            &config(Some("bad\nkey"), AuthMode::ApiKey),
            &StaticEnvironment::new(),
        );

        match headers.to_header_map() {
            Err(Error::InvalidHeader(name)) => assert_eq!(name, API_KEY),
            _ => panic!("Expected Error::InvalidHeader"),
        }
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = config(Some("secret"), AuthMode::ApiKey);
        let headers = ResolvedHeaders::resolve(&config, &StaticEnvironment::new());

        assert!(!format!("{:?}", headers).contains("secret"));
    }
}

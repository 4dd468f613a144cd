//! Authenticated connection to the gateway

use std::sync::Arc;

use tracing::instrument;
use url::Url;

use crate::config::{AuthMode, ConnectionConfig};
use crate::env::{Environment, ProcessEnvironment};
use crate::error::Result;
use crate::headers::ResolvedHeaders;
use crate::query::{json_body, QueryParameters};
use crate::response::RawResponse;

/// Authenticated communication with the Signal Ocean APIs
///
/// Holds no mutable state. Host, key and group id are re-resolved from the
/// environment on every request.
#[derive(Debug, Clone)]
pub struct Connection {
    config: ConnectionConfig,
    env: Arc<dyn Environment>,
    client: reqwest::Client,
}

impl Default for Connection {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Connection {
    /// Create a connection reading the process environment
    ///
    /// # Arguments
    ///
    /// * `api_key` - Subscription key from the API developer portal. Falls back
    ///   to `SIGNAL_OCEAN_API_KEY`.
    /// * `api_host` - Base URL override. Falls back to `SIGNAL_OCEAN_API_HOST`,
    ///   then to the public gateway.
    /// * `bearer_auth` - Send `Authorization: bearer` and `GroupId` instead of
    ///   `Api-Key`.
    pub fn new(api_key: Option<String>, api_host: Option<String>, bearer_auth: bool) -> Self {
        Self::builder()
            .config(ConnectionConfig::new(
                api_key,
                api_host,
                AuthMode::from_bearer_flag(bearer_auth),
            ))
            .build()
    }

    /// Create a new connection builder
    pub fn builder() -> ConnectionBuilder {
        ConnectionBuilder::default()
    }

    /// Settings captured at construction
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Base URL requests are resolved against, ending with `/`
    pub fn host(&self) -> String {
        self.config.resolve_api_host(self.env.as_ref())
    }

    /// Headers the next request would carry
    pub fn headers(&self) -> ResolvedHeaders {
        ResolvedHeaders::resolve(&self.config, self.env.as_ref())
    }

    /// Absolute URL for a path relative to the host
    ///
    /// A path without a leading `/` is appended under the host's path, one
    /// with a leading `/` replaces it.
    pub fn url_for(&self, relative_url: &str) -> Result<Url> {
        Ok(Url::parse(&self.host())?.join(relative_url)?)
    }

    /// Send a GET request with `params` as the query string
    ///
    /// The response is returned whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built, a header value is invalid,
    /// or the transport fails
    #[instrument(skip(self, params))]
    pub async fn get(
        &self,
        relative_url: &str,
        params: Option<&QueryParameters>,
    ) -> Result<RawResponse> {
        let url = self.url_for(relative_url)?;
        let headers = self.headers().to_header_map()?;

        tracing::debug!("Making GET request to {}", url);
        let mut request = self.client.get(url).headers(headers);
        if let Some(params) = params {
            request = request.query(&params.to_query_pairs());
        }

        let response = request.send().await?;
        tracing::debug!("Response status: {}", response.status());

        Ok(RawResponse::new(response))
    }

    /// Send a POST request with `params` encoded as a JSON body
    ///
    /// Absent parameters are sent as `null`. The response is returned
    /// whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built, the body cannot be
    /// encoded, a header value is invalid, or the transport fails
    #[instrument(skip(self, params))]
    pub async fn post(
        &self,
        relative_url: &str,
        params: Option<&QueryParameters>,
    ) -> Result<RawResponse> {
        let url = self.url_for(relative_url)?;
        let headers = self.headers().to_header_map()?;
        let body = json_body(params)?;

        tracing::debug!("Making POST request to {}", url);
        let response = self
            .client
            .post(url)
            .headers(headers)
            .body(body)
            .send()
            .await?;
        tracing::debug!("Response status: {}", response.status());

        Ok(RawResponse::new(response))
    }
}

/// Builder for [`Connection`]
#[derive(Debug, Default)]
pub struct ConnectionBuilder {
    api_key: Option<String>,
    api_host: Option<String>,
    auth_mode: AuthMode,
    env: Option<Arc<dyn Environment>>,
    client: Option<reqwest::Client>,
}

impl ConnectionBuilder {
    /// Set the API key
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL
    pub fn api_host(mut self, api_host: impl Into<String>) -> Self {
        self.api_host = Some(api_host.into());
        self
    }

    /// Set the header scheme
    pub fn auth_mode(mut self, auth_mode: AuthMode) -> Self {
        self.auth_mode = auth_mode;
        self
    }

    /// Take key, host and auth mode from an existing config
    pub fn config(mut self, config: ConnectionConfig) -> Self {
        self.api_key = config.api_key().map(str::to_string);
        self.api_host = config.api_host().map(str::to_string);
        self.auth_mode = config.auth_mode().clone();
        self
    }

    /// Read settings from `env` instead of the process environment
    pub fn environment(mut self, env: impl Environment + 'static) -> Self {
        self.env = Some(Arc::new(env));
        self
    }

    /// Send requests through a preconfigured client (timeouts, proxy, TLS)
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the connection
    pub fn build(self) -> Connection {
        Connection {
            config: ConnectionConfig::new(self.api_key, self.api_host, self.auth_mode),
            env: self.env.unwrap_or_else(|| Arc::new(ProcessEnvironment)),
            client: self.client.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_API_HOST;
    use crate::env::{StaticEnvironment, ENV_API_HOST, ENV_API_KEY};
    use crate::headers::{API_KEY, AUTHORIZATION, GROUP_ID};

    fn connection(api_host: &str) -> Connection {
        Connection::builder()
            .api_host(api_host)
            .environment(StaticEnvironment::new())
            .build()
    }

    #[test]
    fn test_url_join_under_host_path() {
        let url = connection("https://api.example.com/v1/")
            .url_for("orders")
            .expect("Joinable URL");
        assert_eq!(url.as_str(), "https://api.example.com/v1/orders");
    }

    #[test]
    fn test_url_join_absolute_path_replaces_host_path() {
        let url = connection("https://api.example.com/v1/")
            .url_for("/orders")
            .expect("Joinable URL");
        assert_eq!(url.as_str(), "https://api.example.com/orders");
    }

    #[test]
    fn test_url_join_host_without_trailing_separator() {
        let url = connection("https://api.example.com/v1")
            .url_for("orders")
            .expect("Joinable URL");
        assert_eq!(url.as_str(), "https://api.example.com/v1/orders");
    }

    #[test]
    fn test_url_join_keeps_query_in_relative_path() {
        let url = connection("https://api.example.com/v1/")
            .url_for("voyages/search?imo=9000000")
            .expect("Joinable URL");
        assert_eq!(
            url.as_str(),
            "https://api.example.com/v1/voyages/search?imo=9000000"
        );
    }

    #[test]
    fn test_url_for_invalid_host() {
        let result = connection("not a host").url_for("orders");
        assert!(matches!(result, Err(crate::Error::Url(_))));
    }

    #[test]
    fn test_host_precedence_through_connection() {
        let env = StaticEnvironment::new().with(ENV_API_HOST, "https://env.example.com");

        let explicit = Connection::builder()
            .api_host("https://explicit.example.com")
            .environment(env.clone())
            .build();
        let from_env = Connection::builder().environment(env).build();
        let default = Connection::builder()
            .environment(StaticEnvironment::new())
            .build();

        assert_eq!(explicit.host(), "https://explicit.example.com/");
        assert_eq!(from_env.host(), "https://env.example.com/");
        assert_eq!(default.host(), DEFAULT_API_HOST);
    }

    #[test]
    fn test_new_maps_bearer_flag() {
        let api_key = Connection::new(Some("K".to_string()), None, false);
        let bearer = Connection::new(Some("K".to_string()), None, true);

        assert_eq!(api_key.config().auth_mode(), &AuthMode::ApiKey);
        assert_eq!(bearer.config().auth_mode(), &AuthMode::BearerWithGroup(None));
    }

    #[test]
    fn test_headers_through_connection() {
        let connection = Connection::builder()
            .auth_mode(AuthMode::bearer())
            .environment(StaticEnvironment::new().with(ENV_API_KEY, "K"))
            .build();
        let headers = connection.headers();

        assert_eq!(headers.get(AUTHORIZATION), Some("bearer K"));
        assert_eq!(headers.get(GROUP_ID), Some("1"));
        assert!(!headers.contains(API_KEY));
    }

    #[test]
    fn test_builder_config_round_trip() {
        let config = ConnectionConfig::new(
            Some("K".to_string()),
            Some("https://api.example.com/".to_string()),
            AuthMode::bearer_with_group("G"),
        );
        let connection = Connection::builder().config(config.clone()).build();

        assert_eq!(connection.config(), &config);
    }

    #[test]
    fn test_default_connection() {
        let connection = Connection::default();
        assert_eq!(connection.config().auth_mode(), &AuthMode::ApiKey);
        let _ = format!("{:?}", connection);
    }
}

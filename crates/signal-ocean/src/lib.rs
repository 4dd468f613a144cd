//! Authenticated connection to the Signal Ocean API gateway
//!
//! [`Connection`] resolves the gateway host and credentials, attaches the
//! authentication headers and performs single GET/POST round trips against
//! relative paths. Responses are handed back untouched; there is no retry,
//! caching or status interpretation at this layer.
//!
//! Settings are resolved in this order:
//!
//! - API key: explicit value, then `SIGNAL_OCEAN_API_KEY`
//! - Host: explicit value, then `SIGNAL_OCEAN_API_HOST`, then
//!   `https://api-gateway.signalocean.com/`
//! - Group id (bearer auth only): explicit value, then
//!   `SIGNAL_OCEAN_GROUP_ID`, then `"1"`
//!
//! # Example
//!
//! ```no_run
//! use signal_ocean::{Connection, QueryParameters};
//!
//! async fn example() -> signal_ocean::Result<String> {
//!     let connection = Connection::builder().api_key("my-key").build();
//!     let params = QueryParameters::new().with("imo", 9_000_000);
//!
//!     let response = connection.get("vessels-api/v1/vessels", Some(&params)).await?;
//!     response.text().await
//! }
//! ```

mod config;
mod connection;
mod decimal;
mod env;
mod error;
mod headers;
mod query;
mod response;

pub use config::{normalize_host, AuthMode, ConnectionConfig, DEFAULT_API_HOST, DEFAULT_GROUP_ID};
pub use connection::{Connection, ConnectionBuilder};
pub use decimal::{as_decimal, Quantity};
pub use env::{
    Environment, ProcessEnvironment, StaticEnvironment, ENV_API_HOST, ENV_API_KEY, ENV_GROUP_ID,
};
pub use error::{Error, Result};
pub use headers::{ResolvedHeaders, API_KEY, AUTHORIZATION, CONTENT_TYPE, GROUP_ID};
pub use query::{json_body, to_json_text, QueryParameters};
pub use response::RawResponse;
pub use rust_decimal::Decimal;

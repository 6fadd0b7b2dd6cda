//! Core library for the `yweather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OAuth 1.0a (HMAC-SHA1) request signer for the Yahoo endpoint
//! - The query gate that reuses the last fetched result while it is fresh
//! - The response schema (current observation + daily forecasts)
//!
//! It is used by `yahoo-weather-cli`, but can also be embedded in other
//! binaries or services.

pub mod config;
pub mod model;
pub mod provider;
pub mod signer;

pub use config::{Config, Credentials};
pub use model::{Unit, Weather};
pub use provider::{HttpResponse, QueryError, Transport, YahooProvider, provider_from_config};
pub use signer::{SignError, Signer};

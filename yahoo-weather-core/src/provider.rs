use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

use crate::{Config, signer::SignError};

pub mod yahoo;

pub use yahoo::YahooProvider;

/// Failure modes of a single [`YahooProvider::query`] call.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("request signing failed: {0}")]
    Signing(#[from] SignError),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("wrong HTTP status: {0}")]
    Status(u16),

    #[error("malformed weather payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Status and body of an HTTP response, before any decoding.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Minimal GET transport the provider talks through.
///
/// Implemented by [`ReqwestTransport`] for real traffic; tests substitute a
/// canned implementation.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: &[(&'static str, String)],
    ) -> Result<HttpResponse, QueryError>;
}

/// [`Transport`] backed by a shared `reqwest` client.
#[derive(Debug, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: &[(&'static str, String)],
    ) -> Result<HttpResponse, QueryError> {
        let mut request = self.client.get(url).query(query);
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

/// Construct a provider from stored configuration.
pub fn provider_from_config(config: &Config) -> anyhow::Result<YahooProvider> {
    let credentials = config.credentials().cloned().ok_or_else(|| {
        anyhow::anyhow!(
            "No Yahoo credentials configured.\n\
             Hint: run `yweather configure` and enter your app id, client id and client secret."
        )
    })?;

    let mut provider = YahooProvider::new(credentials);
    if let Some(secs) = config.min_update_timeout_secs {
        provider = provider.with_min_update_timeout(secs);
    }

    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Credentials};

    #[test]
    fn provider_from_config_errors_when_missing_credentials() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No Yahoo credentials configured"));
        assert!(err.to_string().contains("Hint: run `yweather configure`"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_credentials(Credentials {
            app_id: "APP".into(),
            client_id: "KEY".into(),
            client_secret: "SECRET".into(),
        });

        let provider = provider_from_config(&cfg).expect("provider must build");
        assert_eq!(provider.min_update_timeout(), yahoo::MIN_UPDATE_TIMEOUT_SECS);
    }

    #[test]
    fn provider_from_config_applies_timeout_override() {
        let mut cfg = Config::default();
        cfg.set_credentials(Credentials {
            app_id: "APP".into(),
            client_id: "KEY".into(),
            client_secret: "SECRET".into(),
        });
        cfg.min_update_timeout_secs = Some(10);

        let provider = provider_from_config(&cfg).expect("provider must build");
        assert_eq!(provider.min_update_timeout(), 10);
    }
}

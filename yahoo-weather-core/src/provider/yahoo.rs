use chrono::Utc;
use tracing::debug;

use crate::config::Credentials;
use crate::model::{Unit, Weather};
use crate::provider::{QueryError, ReqwestTransport, Transport};
use crate::signer::Signer;

/// Endpoint serving current weather and forecast.
pub const RSS_URL: &str = "https://weather-ydn-yql.media.yahoo.com/forecastrss";

/// Default number of seconds before the next actual update.
pub const MIN_UPDATE_TIMEOUT_SECS: i64 = 5 * 60;

/// Yahoo Weather client that caches the last fetched result.
///
/// Repeating a query for the same location and unit within the update window
/// returns the cached result without touching the network. Not internally
/// synchronized: to share across tasks, wrap the whole provider in a mutex
/// held for the duration of each `query` call.
#[derive(Debug)]
pub struct YahooProvider {
    app_id: String,
    signer: Signer,
    transport: Box<dyn Transport>,
    min_update_timeout_secs: i64,

    last_location: String,
    last_location_norm: String,
    last_unit: Unit,
    last_query_time: i64,

    cached: Weather,
}

impl YahooProvider {
    /// Build a provider from credentials. No network call happens here.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_transport(credentials, Box::new(ReqwestTransport::default()))
    }

    /// Build against a custom [`Transport`].
    pub fn with_transport(credentials: Credentials, transport: Box<dyn Transport>) -> Self {
        Self {
            app_id: credentials.app_id,
            signer: Signer::new(credentials.client_id, credentials.client_secret),
            transport,
            min_update_timeout_secs: MIN_UPDATE_TIMEOUT_SECS,
            last_location: String::new(),
            last_location_norm: String::new(),
            last_unit: Unit::Imperial,
            last_query_time: 0,
            cached: Weather::default(),
        }
    }

    /// Override the update window, in seconds.
    pub fn with_min_update_timeout(mut self, secs: i64) -> Self {
        self.min_update_timeout_secs = secs;
        self
    }

    pub fn min_update_timeout(&self) -> i64 {
        self.min_update_timeout_secs
    }

    /// Current weather and forecast at `location`.
    ///
    /// If location and unit match the previous call and the last fetch is
    /// younger than the update window, the previous result is returned as-is.
    /// Before the first successful fetch that previous result is empty.
    pub async fn query(&mut self, location: &str, unit: Unit) -> Result<Weather, QueryError> {
        self.query_at(location, unit, Utc::now().timestamp()).await
    }

    async fn query_at(
        &mut self,
        location: &str,
        unit: Unit,
        now: i64,
    ) -> Result<Weather, QueryError> {
        let stale = location != self.last_location
            || unit != self.last_unit
            || now - self.last_query_time > self.min_update_timeout_secs;

        if stale {
            // Recorded before the fetch outcome is known: a failed update
            // leaves the state pointing at the requested location and unit,
            // with the fetch time unadvanced.
            self.last_location = location.to_string();
            self.last_location_norm = normalize_location(location);
            self.last_unit = unit;

            self.update(now).await?;
        } else {
            debug!(location, "returning cached weather");
        }

        Ok(self.cached.clone())
    }

    async fn update(&mut self, now: i64) -> Result<(), QueryError> {
        let auth = self.signer.sign(
            RSS_URL,
            &[
                ("location", &self.last_location_norm),
                ("format", "json"),
                ("u", self.last_unit.code()),
            ],
        )?;

        debug!(location = %self.last_location_norm, unit = self.last_unit.code(), "fetching");

        let query = [
            ("location", self.last_location_norm.clone()),
            ("u", self.last_unit.code().to_string()),
            ("format", "json".to_string()),
        ];
        let headers = [
            ("Content-Type", "application/json".to_string()),
            ("X-Yahoo-App-Id", self.app_id.clone()),
            ("Authorization", auth),
        ];

        let response = self.transport.get(RSS_URL, &query, &headers).await?;
        if response.status != 200 {
            return Err(QueryError::Status(response.status));
        }

        match serde_json::from_str::<Weather>(&response.body) {
            Ok(weather) => {
                self.cached = weather;
                self.last_query_time = now;
                Ok(())
            }
            Err(err) => {
                // A body that fails to decode drops the previous result;
                // transport failures above keep it.
                self.cached = Weather::default();
                Err(err.into())
            }
        }
    }
}

/// Lower-case the location and collapse the literal `", "` to `","`. Nothing
/// more: internal spaces and other whitespace are kept as-is.
fn normalize_location(location: &str) -> String {
    location.to_lowercase().replace(", ", ",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::HttpResponse;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct FakeTransport {
        calls: Arc<AtomicUsize>,
        responses: Mutex<VecDeque<HttpResponse>>,
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn get(
            &self,
            _url: &str,
            _query: &[(&str, String)],
            _headers: &[(&'static str, String)],
        ) -> Result<HttpResponse, QueryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let response = self.responses.lock().unwrap().pop_front().expect("unexpected fetch");
            Ok(response)
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            app_id: "app-id".into(),
            client_id: "consumer-key".into(),
            client_secret: "consumer-secret".into(),
        }
    }

    fn provider_with(responses: Vec<HttpResponse>) -> (YahooProvider, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let transport =
            FakeTransport { calls: Arc::clone(&calls), responses: Mutex::new(responses.into()) };

        (YahooProvider::with_transport(credentials(), Box::new(transport)), calls)
    }

    fn ok(temperature: i32) -> HttpResponse {
        let body = format!(
            r#"{{"current_observation":{{"condition":{{"text":"Sunny","code":32,"temperature":{temperature}}}}}}}"#
        );
        HttpResponse { status: 200, body }
    }

    fn status(status: u16) -> HttpResponse {
        HttpResponse { status, body: String::new() }
    }

    fn temperature(weather: &Weather) -> i32 {
        weather
            .observation
            .as_ref()
            .and_then(|o| o.condition.as_ref())
            .map(|c| c.temperature)
            .expect("condition present")
    }

    #[test]
    fn normalization_rule() {
        assert_eq!(normalize_location("Oakland, CA"), "oakland,ca");
        assert_eq!(normalize_location("NEW YORK,NY"), "new york,ny");
        assert_eq!(normalize_location("A, B, C"), "a,b,c");
    }

    #[tokio::test]
    async fn repeated_query_within_window_uses_cache() {
        let (mut provider, calls) = provider_with(vec![ok(66)]);

        let first = provider.query_at("Oakland, CA", Unit::Imperial, 1000).await.unwrap();
        let second = provider.query_at("Oakland, CA", Unit::Imperial, 1100).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(provider.last_location_norm, "oakland,ca");
    }

    #[tokio::test]
    async fn query_refetches_once_window_expires() {
        let (mut provider, calls) = provider_with(vec![ok(66), ok(42)]);

        provider.query_at("Oakland, CA", Unit::Imperial, 1000).await.unwrap();

        // Exactly at the window boundary the cache still holds.
        let cached = provider.query_at("Oakland, CA", Unit::Imperial, 1300).await.unwrap();
        assert_eq!(temperature(&cached), 66);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let fresh = provider.query_at("Oakland, CA", Unit::Imperial, 1301).await.unwrap();
        assert_eq!(temperature(&fresh), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unit_change_forces_fetch_within_window() {
        let (mut provider, calls) = provider_with(vec![ok(66), ok(19)]);

        provider.query_at("Oakland, CA", Unit::Imperial, 1000).await.unwrap();
        let metric = provider.query_at("Oakland, CA", Unit::Metric, 1100).await.unwrap();

        assert_eq!(temperature(&metric), 19);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn location_change_forces_fetch_within_window() {
        let (mut provider, calls) = provider_with(vec![ok(66), ok(71)]);

        provider.query_at("Oakland, CA", Unit::Imperial, 1000).await.unwrap();
        let other = provider.query_at("San Jose, CA", Unit::Imperial, 1100).await.unwrap();

        assert_eq!(temperature(&other), 71);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(provider.last_location_norm, "san jose,ca");
    }

    #[tokio::test]
    async fn transport_failure_preserves_cached_result() {
        let (mut provider, _calls) = provider_with(vec![ok(66), status(503)]);

        let first = provider.query_at("Oakland, CA", Unit::Imperial, 1000).await.unwrap();

        let err = provider.query_at("Oakland, CA", Unit::Imperial, 2000).await.unwrap_err();
        assert!(matches!(err, QueryError::Status(503)));
        assert!(err.to_string().contains("503"));

        assert_eq!(provider.cached, first);
        assert_eq!(provider.last_query_time, 1000);
    }

    #[tokio::test]
    async fn decode_failure_clears_cached_result() {
        let bad = HttpResponse { status: 200, body: "not json".into() };
        let (mut provider, _calls) = provider_with(vec![ok(66), bad]);

        provider.query_at("Oakland, CA", Unit::Imperial, 1000).await.unwrap();

        let err = provider.query_at("Oakland, CA", Unit::Imperial, 2000).await.unwrap_err();
        assert!(matches!(err, QueryError::Decode(_)));

        assert_eq!(provider.cached, Weather::default());
        assert_eq!(provider.last_query_time, 1000);
    }

    #[tokio::test]
    async fn first_query_inside_initial_window_returns_empty_without_fetching() {
        let (mut provider, calls) = provider_with(vec![]);

        // Initial state matches: empty location, imperial, last fetch at 0.
        let weather = provider.query_at("", Unit::Imperial, 100).await.unwrap();

        assert_eq!(weather, Weather::default());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_fetch_still_records_requested_state() {
        let (mut provider, calls) = provider_with(vec![status(500), ok(66)]);

        let err = provider.query_at("Oakland, CA", Unit::Imperial, 1000).await.unwrap_err();
        assert!(matches!(err, QueryError::Status(500)));
        assert_eq!(provider.last_location, "Oakland, CA");
        assert_eq!(provider.last_location_norm, "oakland,ca");

        // The fetch time never advanced, so an immediate retry with the same
        // arguments goes back to the network instead of no-opping.
        let retried = provider.query_at("Oakland, CA", Unit::Imperial, 1001).await.unwrap();
        assert_eq!(temperature(&retried), 66);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn custom_update_window_is_honored() {
        let (provider, calls) = provider_with(vec![ok(66), ok(42)]);
        let mut provider = provider.with_min_update_timeout(10);

        provider.query_at("Oakland, CA", Unit::Imperial, 1000).await.unwrap();
        let fresh = provider.query_at("Oakland, CA", Unit::Imperial, 1011).await.unwrap();

        assert_eq!(temperature(&fresh), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}

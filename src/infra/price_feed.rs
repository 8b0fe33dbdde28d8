//! Thin asynchronous client for the CoinGecko simple-price endpoint.
//!
//! - Fetches the BTC/USD spot price and its 24h change.
//! - Keeps a short in-memory cache and falls back to stale data (memory
//!   first, then the on-disk copy) when the feed is unreachable.

use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, SystemTime},
};

use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::BtcQuote;
use crate::infra::cache::{
    default_cache_path, load_price_cache, remove_price_cache, save_price_cache, PriceCache,
};

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3/";
const DEFAULT_TTL: Duration = Duration::from_secs(60);
const USER_AGENT: &str = concat!("hashdeck/", env!("CARGO_PKG_VERSION"));

/// Overrides the feed's base URL (e.g. a self-hosted proxy).
pub const PRICE_URL_ENV: &str = "HASHDECK_PRICE_URL";

#[derive(Debug, Error)]
pub enum PriceFeedError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Fresh,
    Cached,
    Stale,
}

#[derive(Clone, Debug)]
pub struct CachedPayload<T> {
    pub data: T,
    pub fetched_at: SystemTime,
    pub status: CacheStatus,
}

impl<T> CachedPayload<T> {
    fn new(data: T, fetched_at: SystemTime, status: CacheStatus) -> Self {
        Self {
            data,
            fetched_at,
            status,
        }
    }
}

#[derive(Clone)]
pub struct PriceFeedClient {
    http: Client,
    base_url: Url,
    cache: Arc<Mutex<Option<Cached<BtcQuote>>>>,
    ttl: Duration,
    disk_cache: Option<PathBuf>,
}

impl PriceFeedClient {
    /// Client for the public feed (or `HASHDECK_PRICE_URL`), backed by the on-disk cache.
    pub fn new() -> Result<Self, PriceFeedError> {
        let base = std::env::var(PRICE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self::with_base_url(&base)?.with_disk_cache(default_cache_path()))
    }

    pub fn with_base_url(base: &str) -> Result<Self, PriceFeedError> {
        let base_url = if base.ends_with('/') {
            Url::parse(base)?
        } else {
            Url::parse(&format!("{base}/"))?
        };
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            cache: Arc::new(Mutex::new(None)),
            ttl: DEFAULT_TTL,
            disk_cache: None,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_disk_cache(mut self, path: PathBuf) -> Self {
        self.disk_cache = Some(path);
        self
    }

    pub async fn get_btc_quote(&self) -> Result<CachedPayload<BtcQuote>, PriceFeedError> {
        if let Some(payload) = self.cached_quote().await {
            return Ok(payload);
        }

        match self.fetch_quote().await {
            Ok(quote) => {
                info!(usd = quote.usd, change = ?quote.usd_24h_change, "fetched BTC quote");
                self.persist(&quote);
                Ok(self.store_quote(quote).await)
            }
            Err(error) => {
                warn!("BTC quote request failed: {error}; trying cached quote");
                if let Some(stale) = self.cached_quote_stale().await {
                    return Ok(stale);
                }
                if let Some(stale) = self.disk_quote() {
                    return Ok(stale);
                }
                Err(error)
            }
        }
    }

    /// Last quote saved on disk, if it has not expired. Never touches the network.
    pub fn disk_quote(&self) -> Option<CachedPayload<BtcQuote>> {
        let path = self.disk_cache.as_ref()?;
        let cache = load_price_cache(path)?;
        let quote = cache.to_quote();
        let fetched_at = quote.fetched_at;
        Some(CachedPayload::new(quote, fetched_at, CacheStatus::Stale))
    }

    /// Forgets the in-memory quote and deletes the on-disk copy.
    pub async fn clear_cache(&self) {
        *self.cache.lock().await = None;
        if let Some(path) = self.disk_cache.as_ref() {
            if let Err(e) = remove_price_cache(path) {
                warn!("failed to remove price cache: {e}");
            }
        }
    }

    async fn fetch_quote(&self) -> Result<BtcQuote, PriceFeedError> {
        let mut url = self.url("simple/price")?;
        url.query_pairs_mut()
            .append_pair("ids", "bitcoin")
            .append_pair("vs_currencies", "usd")
            .append_pair("include_24hr_change", "true");

        debug!("requesting BTC quote from {url}");

        let response = self.http.get(url).send().await?.error_for_status()?;
        let payload: SimplePriceDto = response.json().await?;
        payload.into_quote(SystemTime::now())
    }

    async fn cached_quote(&self) -> Option<CachedPayload<BtcQuote>> {
        let cache = self.cache.lock().await;
        let result = cache.as_ref().and_then(|entry| entry.if_fresh(self.ttl));
        if result.is_some() {
            debug!("serving cached BTC quote");
        }
        result
    }

    async fn cached_quote_stale(&self) -> Option<CachedPayload<BtcQuote>> {
        let cache = self.cache.lock().await;
        cache.as_ref().map(Cached::stale)
    }

    async fn store_quote(&self, quote: BtcQuote) -> CachedPayload<BtcQuote> {
        let fetched_at = quote.fetched_at;
        let payload = CachedPayload::new(quote.clone(), fetched_at, CacheStatus::Fresh);
        *self.cache.lock().await = Some(Cached::new(quote, fetched_at));
        payload
    }

    fn persist(&self, quote: &BtcQuote) {
        let Some(path) = self.disk_cache.as_ref() else {
            return;
        };
        if let Err(e) = save_price_cache(path, &PriceCache::from_quote(quote)) {
            warn!("failed to save price cache: {e}");
        }
    }

    fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

struct Cached<T> {
    value: T,
    fetched_at: SystemTime,
}

impl<T: Clone> Cached<T> {
    fn new(value: T, fetched_at: SystemTime) -> Self {
        Self { value, fetched_at }
    }

    fn if_fresh(&self, ttl: Duration) -> Option<CachedPayload<T>> {
        if self
            .fetched_at
            .elapsed()
            .map(|elapsed| elapsed < ttl)
            .unwrap_or(false)
        {
            Some(CachedPayload::new(
                self.value.clone(),
                self.fetched_at,
                CacheStatus::Cached,
            ))
        } else {
            None
        }
    }

    fn stale(&self) -> CachedPayload<T> {
        CachedPayload::new(self.value.clone(), self.fetched_at, CacheStatus::Stale)
    }
}

#[derive(Debug, Deserialize)]
struct SimplePriceDto {
    #[serde(default)]
    bitcoin: Option<CoinPriceDto>,
}

#[derive(Debug, Deserialize)]
struct CoinPriceDto {
    #[serde(default)]
    usd: Option<f64>,
    #[serde(default)]
    usd_24h_change: Option<f64>,
}

impl SimplePriceDto {
    fn into_quote(self, fetched_at: SystemTime) -> Result<BtcQuote, PriceFeedError> {
        let coin = self
            .bitcoin
            .ok_or_else(|| PriceFeedError::Api("response missing bitcoin entry".into()))?;
        let usd = coin
            .usd
            .filter(|price| price.is_finite() && *price > 0.0)
            .ok_or_else(|| PriceFeedError::Api("bitcoin entry missing usd price".into()))?;
        Ok(BtcQuote {
            usd,
            usd_24h_change: coin.usd_24h_change.filter(|change| change.is_finite()),
            fetched_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn quote_body(usd: f64) -> serde_json::Value {
        json!({ "bitcoin": { "usd": usd, "usd_24h_change": 2.5 } })
    }

    #[tokio::test]
    async fn parses_a_fresh_quote() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .and(query_param("ids", "bitcoin"))
            .and(query_param("vs_currencies", "usd"))
            .respond_with(ResponseTemplate::new(200).set_body_json(quote_body(64_000.5)))
            .mount(&server)
            .await;

        let client = PriceFeedClient::with_base_url(&server.uri()).unwrap();
        let payload = client.get_btc_quote().await.unwrap();

        assert_eq!(payload.status, CacheStatus::Fresh);
        assert_eq!(payload.data.usd, 64_000.5);
        assert_eq!(payload.data.usd_24h_change, Some(2.5));
    }

    #[tokio::test]
    async fn serves_from_memory_within_ttl() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(quote_body(50_000.0)))
            .expect(1)
            .mount(&server)
            .await;

        let client = PriceFeedClient::with_base_url(&server.uri())
            .unwrap()
            .with_ttl(Duration::from_secs(300));
        let first = client.get_btc_quote().await.unwrap();
        let second = client.get_btc_quote().await.unwrap();

        assert_eq!(first.status, CacheStatus::Fresh);
        assert_eq!(second.status, CacheStatus::Cached);
        assert_eq!(second.data.usd, 50_000.0);
    }

    #[tokio::test]
    async fn falls_back_to_stale_quote_on_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(quote_body(52_000.0)))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = PriceFeedClient::with_base_url(&server.uri())
            .unwrap()
            .with_ttl(Duration::ZERO);
        client.get_btc_quote().await.unwrap();
        let fallback = client.get_btc_quote().await.unwrap();

        assert_eq!(fallback.status, CacheStatus::Stale);
        assert_eq!(fallback.data.usd, 52_000.0);
    }

    #[tokio::test]
    async fn falls_back_to_disk_after_restart() {
        let dir = TempDir::new().unwrap();
        let cache_path = dir.path().join("price_cache.json");

        let healthy = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(quote_body(58_400.0)))
            .mount(&healthy)
            .await;
        PriceFeedClient::with_base_url(&healthy.uri())
            .unwrap()
            .with_disk_cache(cache_path.clone())
            .get_btc_quote()
            .await
            .unwrap();

        let broken = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&broken)
            .await;
        let restarted = PriceFeedClient::with_base_url(&broken.uri())
            .unwrap()
            .with_disk_cache(cache_path);
        let payload = restarted.get_btc_quote().await.unwrap();

        assert_eq!(payload.status, CacheStatus::Stale);
        assert_eq!(payload.data.usd, 58_400.0);
    }

    #[tokio::test]
    async fn clearing_drops_memory_and_disk_copies() {
        let dir = TempDir::new().unwrap();
        let cache_path = dir.path().join("price_cache.json");
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(quote_body(60_000.0)))
            .expect(2)
            .mount(&server)
            .await;

        let client = PriceFeedClient::with_base_url(&server.uri())
            .unwrap()
            .with_ttl(Duration::from_secs(300))
            .with_disk_cache(cache_path.clone());
        client.get_btc_quote().await.unwrap();
        assert!(client.disk_quote().is_some());

        client.clear_cache().await;
        assert!(client.disk_quote().is_none());
        assert!(!cache_path.exists());

        let refetched = client.get_btc_quote().await.unwrap();
        assert_eq!(refetched.status, CacheStatus::Fresh);
    }

    #[tokio::test]
    async fn missing_price_is_an_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/simple/price"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "bitcoin": {} })))
            .mount(&server)
            .await;

        let client = PriceFeedClient::with_base_url(&server.uri()).unwrap();
        let err = client.get_btc_quote().await.unwrap_err();
        assert!(matches!(err, PriceFeedError::Api(_)));
    }

    #[tokio::test]
    async fn http_errors_surface_without_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = PriceFeedClient::with_base_url(&server.uri()).unwrap();
        let err = client.get_btc_quote().await.unwrap_err();
        assert!(matches!(err, PriceFeedError::Http(_)));
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = PriceFeedClient::with_base_url("https://feed.example/api/v3").unwrap();
        assert_eq!(
            client.url("simple/price").unwrap().as_str(),
            "https://feed.example/api/v3/simple/price"
        );
    }
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::time::sleep;
use tracing::{debug, warn};

use common::errors::CollectionError;
use common::models::FeatureSnapshot;
use common::traits::FeatureSource;

use crate::remote::{MarketTicker, Ticker24hResponse};

const MAX_RETRIES: u32 = 3;

/// Live feature source backed by the Binance spot 24h ticker.
///
/// Market fields come straight off the ticker; the sentiment, whale and
/// technical features are deterministic proxies derived from momentum and
/// turnover, since the real social/on-chain feeds are external to this
/// engine.
pub struct BinanceFeatureSource {
    client: Client,
    base_url: String,
}

impl BinanceFeatureSource {
    pub fn new() -> Self {
        Self::with_base_url("https://api.binance.com".to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .user_agent("meme-trading-bot/0.1.0")
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client."),
            base_url,
        }
    }

    async fn fetch_ticker(&self, asset: &str, symbol: &str) -> Result<MarketTicker, CollectionError> {
        let url = format!("{}/api/v3/ticker/24hr", self.base_url);

        let mut retry_count = 0;
        loop {
            match self.make_request(&url, symbol).await {
                Ok(response) => {
                    return response.to_ticker().map_err(|e| CollectionError::Parse {
                        asset: asset.to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(reason) => {
                    if is_rate_limit(&reason) {
                        retry_count += 1;
                        if retry_count > MAX_RETRIES {
                            return Err(CollectionError::Http {
                                asset: asset.to_string(),
                                reason: "max retries exceeded for rate limit".to_string(),
                            });
                        }

                        let backoff_seconds = 2_u64.pow(retry_count);
                        warn!(
                            "rate limited for {symbol}, backing off {backoff_seconds}s (attempt {retry_count}/{MAX_RETRIES})"
                        );
                        sleep(Duration::from_secs(backoff_seconds)).await;
                        continue;
                    }
                    return Err(CollectionError::Http {
                        asset: asset.to_string(),
                        reason,
                    });
                }
            }
        }
    }

    async fn make_request(&self, url: &str, symbol: &str) -> Result<Ticker24hResponse, String> {
        let response = self
            .client
            .get(url)
            .query(&[("symbol", symbol)])
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if status == 429 {
            return Err("HTTP 429: Too Many Requests".to_string());
        }
        if status == 418 {
            return Err("HTTP 418: IP has been auto-banned".to_string());
        }
        if !status.is_success() {
            return Err(format!("HTTP {status}"));
        }

        if let Some(used_weight) = response.headers().get("x-mbx-used-weight-1m") {
            if let Ok(weight) = used_weight.to_str() {
                debug!("used weights: {}/1200", weight);
            }
        }

        response
            .json::<Ticker24hResponse>()
            .await
            .map_err(|e| format!("failed to parse JSON response: {e}"))
    }
}

impl Default for BinanceFeatureSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeatureSource for BinanceFeatureSource {
    async fn fetch(&self, asset: &str) -> Result<FeatureSnapshot, CollectionError> {
        let symbol = format!("{}USDT", asset.to_uppercase());
        let ticker = self.fetch_ticker(asset, &symbol).await?;

        Ok(FeatureSnapshot {
            asset: asset.to_string(),
            price: ticker.price,
            volume: ticker.volume,
            change_24h: ticker.change_24h,
            social_sentiment: sentiment_proxy(ticker.change_24h),
            whale_activity: whale_proxy(ticker.quote_volume),
            technical_score: technical_proxy(ticker.change_24h),
        })
    }
}

fn is_rate_limit(reason: &str) -> bool {
    reason.contains("429") || reason.contains("418") || reason.contains("auto-banned")
}

/// Momentum-driven mood proxy: flat market reads neutral (50), each
/// percent of 24h change shifts it by 4 points.
fn sentiment_proxy(change_24h: f64) -> u8 {
    (50.0 + change_24h * 4.0).clamp(0.0, 100.0).round() as u8
}

/// RSI-shaped mapping of the 24h change into a 0-100 score.
fn technical_proxy(change_24h: f64) -> u8 {
    let rs = if change_24h >= 0.0 {
        1.0 + change_24h / 2.0
    } else {
        1.0 / (1.0 - change_24h / 2.0)
    };
    (100.0 - 100.0 / (1.0 + rs)).round() as u8
}

/// Turnover-bucketed whale count: larger quote volume implies more
/// large-holder activity.
fn whale_proxy(quote_volume: f64) -> u32 {
    match quote_volume {
        v if v >= 50_000_000.0 => 5,
        v if v >= 10_000_000.0 => 4,
        v if v >= 5_000_000.0 => 3,
        v if v >= 1_000_000.0 => 2,
        v if v >= 100_000.0 => 1,
        _ => 0,
    }
}

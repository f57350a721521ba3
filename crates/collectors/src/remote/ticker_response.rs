use serde::Deserialize;

/// Raw Binance `/api/v3/ticker/24hr` payload. Numeric fields arrive as
/// strings on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24hResponse {
    pub symbol: String,
    pub last_price: String,
    pub price_change_percent: String,
    pub volume: String,
    pub quote_volume: String,
}

/// Parsed market fields of a 24h ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketTicker {
    pub price: f64,
    pub change_24h: f64,
    pub volume: f64,
    pub quote_volume: f64,
}

impl Ticker24hResponse {
    pub fn to_ticker(&self) -> Result<MarketTicker, std::num::ParseFloatError> {
        Ok(MarketTicker {
            price: self.last_price.parse()?,
            change_24h: self.price_change_percent.parse()?,
            volume: self.volume.parse()?,
            quote_volume: self.quote_volume.parse()?,
        })
    }
}

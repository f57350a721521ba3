pub mod ticker_response;

pub use ticker_response::{MarketTicker, Ticker24hResponse};

pub mod binance;
pub mod remote;
pub mod simulated;

pub use binance::BinanceFeatureSource;
pub use simulated::SimulatedFeatureSource;

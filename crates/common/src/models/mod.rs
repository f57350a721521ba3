pub mod feature;
pub mod outcome;
pub mod signal;
pub mod stats;

pub use feature::FeatureSnapshot;
pub use outcome::ExecutionOutcome;
pub use signal::{Side, Signal};
pub use stats::{StatusReport, TradingStats};

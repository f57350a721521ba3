pub mod cycle;
pub mod scheduler;
pub mod scorer;
pub mod simulator;
pub mod stats;

pub use cycle::{CycleReport, CycleRunner};
pub use scheduler::{LifecycleError, Scheduler, SchedulerConfig, StopOutcome};
pub use scorer::SignalScorer;
pub use simulator::{SimulatorConfig, TradeSimulator};
pub use stats::StatsAggregator;

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::models::{ExecutionOutcome, Side, Signal};
use common::traits::TradeExecutor;

/// Knobs for the simulated exchange fill.
///
/// Every source of nondeterminism in the engine lives here, so tests can
/// pin outcomes with a fixed seed or a 0.0/1.0 success probability.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub seed: u64,
    pub success_probability: f64,
    /// Half-open profit range for a winning fill, in quote units.
    pub win_range: (f64, f64),
    /// Half-open magnitude range for a losing fill; applied negated.
    pub loss_range: (f64, f64),
    /// Fixed notional per trade.
    pub notional: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            success_probability: 0.7,
            win_range: (1.0, 6.0),
            loss_range: (1.0, 3.0),
            notional: 1000.0,
        }
    }
}

/// Stochastic exchange-fill stand-in behind the [`TradeExecutor`] seam.
///
/// A winning SELL is a stop-out, realized as a loss.
pub struct TradeSimulator {
    config: SimulatorConfig,
    rng: Mutex<StdRng>,
}

impl TradeSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        let rng = Mutex::new(StdRng::seed_from_u64(config.seed));
        Self { config, rng }
    }
}

impl TradeExecutor for TradeSimulator {
    fn execute(&self, signal: &Signal) -> ExecutionOutcome {
        let mut rng = self.rng.lock().expect("simulator rng lock poisoned");

        let success = rng.gen_bool(self.config.success_probability);
        let profit_loss = if success {
            let profit = round2(rng.gen_range(self.config.win_range.0..self.config.win_range.1));
            match signal.side {
                Side::Buy => profit,
                Side::Sell => -profit,
            }
        } else {
            -round2(rng.gen_range(self.config.loss_range.0..self.config.loss_range.1))
        };

        ExecutionOutcome {
            success,
            profit_loss,
            amount: self.config.notional,
            executed_price: signal.price,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

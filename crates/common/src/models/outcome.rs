use serde::{Deserialize, Serialize};

/// Result of one simulated fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub success: bool,
    /// Signed realized profit or loss.
    pub profit_loss: f64,
    /// Fixed notional traded per fill.
    pub amount: f64,
    pub executed_price: f64,
}

//! Engine configuration knobs.

use crate::domain::AcceptanceRule;
use serde::{Deserialize, Serialize};

/// Default cap on positions folded per `execute_future` call.
pub const DEFAULT_SETTLEMENT_BATCH: usize = 64;

/// Construction-time configuration for an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Boundary rule of the acceptance window.
    pub acceptance_rule: AcceptanceRule,
    /// Position fee charged on open, in basis points of the locked margin.
    /// Routed to the fee account; zero disables the fee.
    pub fee_bps: u16,
    /// Maximum positions folded per `execute_future` call, so a large future
    /// settles over repeated calls instead of one unbounded sweep.
    pub settlement_batch: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            acceptance_rule: AcceptanceRule::default(),
            fee_bps: 0,
            settlement_batch: DEFAULT_SETTLEMENT_BATCH,
        }
    }
}

impl EngineConfig {
    pub fn with_acceptance_rule(mut self, rule: AcceptanceRule) -> Self {
        self.acceptance_rule = rule;
        self
    }

    pub fn with_fee_bps(mut self, fee_bps: u16) -> Self {
        self.fee_bps = fee_bps;
        self
    }

    pub fn with_settlement_batch(mut self, batch: usize) -> Self {
        self.settlement_batch = batch.max(1);
        self
    }
}

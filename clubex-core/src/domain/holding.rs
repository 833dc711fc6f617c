use super::position::PositionSide;
use serde::{Deserialize, Serialize};

/// Realized stock balance for one (user, club) pair.
///
/// Written only by settlement; monotonically increasing. There is no
/// withdrawal path in this engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingEntry {
    pub long_qty: u64,
    pub short_qty: u64,
}

impl HoldingEntry {
    /// Add quantity to the bucket matching `side`, checked.
    pub fn checked_add(self, side: PositionSide, qty: u64) -> Option<HoldingEntry> {
        match side {
            PositionSide::Long => self.long_qty.checked_add(qty).map(|long_qty| HoldingEntry {
                long_qty,
                ..self
            }),
            PositionSide::Short => self.short_qty.checked_add(qty).map(|short_qty| HoldingEntry {
                short_qty,
                ..self
            }),
        }
    }

    pub fn is_empty(self) -> bool {
        self.long_qty == 0 && self.short_qty == 0
    }
}

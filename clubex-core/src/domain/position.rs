use super::ids::{AccountId, ClubId, FutureId, PositionId};
use super::money::Amount;
use serde::{Deserialize, Serialize};

/// Direction of exposure to a club's price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PositionSide {
    Long,
    Short,
}

/// An open, collateralized exposure to a club's price, pending either an
/// owner-initiated close or settlement into a holding.
///
/// `margin_locked` is always `quantity * entry_price`, computed with checked
/// arithmetic at open time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub club_id: ClubId,
    pub future_id: FutureId,
    pub owner: AccountId,
    pub side: PositionSide,
    pub quantity: u64,
    pub entry_price: Amount,
    pub margin_locked: Amount,
}

impl Position {
    /// Unrealized value of the position at `price`, expressed as the amount
    /// the owner would be refunded on close: margin plus favorable movement
    /// (capped by the profit cap at close time) or minus adverse movement
    /// (floored at zero). The clamping itself lives in the close path; this
    /// reports the uncapped signed movement.
    pub fn price_movement(&self, price: Amount) -> Option<PriceMovement> {
        let (gain, diff) = match self.side {
            PositionSide::Long => (price >= self.entry_price, diff_abs(price, self.entry_price)),
            PositionSide::Short => (price <= self.entry_price, diff_abs(self.entry_price, price)),
        };
        let moved = diff.checked_mul_qty(self.quantity)?;
        Some(if gain {
            PriceMovement::Favorable(moved)
        } else {
            PriceMovement::Adverse(moved)
        })
    }
}

fn diff_abs(a: Amount, b: Amount) -> Amount {
    if a >= b {
        a.saturating_sub(b)
    } else {
        b.saturating_sub(a)
    }
}

/// Realized movement of a position relative to its entry price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceMovement {
    Favorable(Amount),
    Adverse(Amount),
}

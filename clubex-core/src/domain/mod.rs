//! Domain types for the clubex engine.

pub mod club;
pub mod future;
pub mod holding;
pub mod ids;
pub mod money;
pub mod position;

pub use club::{Club, DEFAULT_LISTING_PRICE};
pub use future::{AcceptanceRule, FutureWindow, DEFAULT_ACCEPTANCE_WINDOW_SECS};
pub use holding::HoldingEntry;
pub use ids::{AccountId, ClubId, FutureId, IdGen, PositionId};
pub use money::{Amount, ParseAmountError, SCALE};
pub use position::{Position, PositionSide, PriceMovement};

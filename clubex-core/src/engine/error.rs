//! Engine error surface.
//!
//! Every mutating operation validates fully before any write; on failure it
//! aborts with zero observable state change and surfaces one of these kinds.
//! Callers get the precise reason, never a generic fault.

use crate::domain::{AccountId, Amount, ClubId, FutureId, PositionId};
use thiserror::Error;

/// Transfer failures reported by the external token ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("payer balance is insufficient for the transfer")]
    InsufficientBalance,

    #[error("payer allowance is insufficient for the transfer")]
    InsufficientAllowance,

    #[error("contract balance is insufficient for the transfer")]
    InsufficientContractBalance,
}

/// Errors from engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("club '{name}' / '{symbol}' already registered")]
    DuplicateClub { name: String, symbol: String },

    #[error("club {0} not found")]
    ClubNotFound(ClubId),

    #[error("future {0} not found")]
    FutureNotFound(FutureId),

    #[error("future {0} already executed")]
    FutureAlreadyExecuted(FutureId),

    #[error("current time is not within the acceptance period of future {0}")]
    AcceptanceWindowClosed(FutureId),

    #[error("club price {price} breaches the limit {limit}")]
    SlippageExceeded { price: Amount, limit: Amount },

    #[error("position quantity must be greater than zero")]
    InvalidQuantity,

    #[error("position {0} not found")]
    PositionNotFound(PositionId),

    #[error("caller {0} has no privilege for this operation")]
    Unauthorized(AccountId),

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error(transparent)]
    Transfer(#[from] TransferError),
}

//! Clubex Core — club-stock futures exchange engine.
//!
//! This crate contains the position lifecycle and futures-settlement engine:
//! - Domain types (clubs, future windows, positions, holdings, fixed-point
//!   amounts)
//! - Club price registry and future scheduler with a configurable
//!   acceptance-window rule
//! - Margin-locking position open/close against an external token ledger
//! - Bounded, resumable bulk settlement of open positions into holdings
//!
//! The token ledger and access control are collaborator traits; in-memory
//! implementations ship for tests and embedders.

pub mod domain;
pub mod engine;

pub use domain::{
    AcceptanceRule, AccountId, Amount, Club, ClubId, FutureId, FutureWindow, HoldingEntry,
    Position, PositionId, PositionSide,
};
pub use engine::{
    AccessControl, EngineConfig, EngineError, Exchange, InMemoryLedger, Portfolio, Role,
    SettlementProgress, StaticAccess, TokenLedger, TransferError,
};

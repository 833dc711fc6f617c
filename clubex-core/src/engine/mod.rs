//! Exchange engine — registries, position lifecycle, and settlement.
//!
//! State transitions are a single globally ordered sequence: every operation
//! takes `&mut Exchange` and either commits completely or leaves no trace.
//! External effects go through two collaborator traits, `TokenLedger` and
//! `AccessControl`.

pub mod access;
pub mod clubs;
pub mod config;
pub mod error;
pub mod exchange;
pub mod futures;
pub mod holdings;
pub mod ledger;
pub mod position_book;

pub use access::{AccessControl, Role, StaticAccess};
pub use clubs::ClubRegistry;
pub use config::{EngineConfig, DEFAULT_SETTLEMENT_BATCH};
pub use error::{EngineError, TransferError};
pub use exchange::{Exchange, Portfolio, SettlementProgress};
pub use futures::FutureScheduler;
pub use holdings::HoldingsLedger;
pub use ledger::{InMemoryLedger, TokenLedger};
pub use position_book::PositionBook;

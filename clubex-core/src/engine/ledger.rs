//! Token ledger seam — the external balance store backing margin.
//!
//! The engine never reads or writes token balances directly; it requests
//! transfers through this trait and commits local state only after observing
//! success. "In" moves tokens from a payer into the engine's pooled balance,
//! "out" pays from the pool.

use crate::domain::{AccountId, Amount};
use crate::engine::error::TransferError;
use std::collections::HashMap;

/// External ERC20-like balance store.
pub trait TokenLedger {
    /// Pull `amount` from `payer` into the engine's pooled balance.
    fn transfer_in(&mut self, payer: &AccountId, amount: Amount) -> Result<(), TransferError>;

    /// Pay `amount` from the engine's pooled balance to `payee`.
    fn transfer_out(&mut self, payee: &AccountId, amount: Amount) -> Result<(), TransferError>;
}

/// In-memory token ledger with per-account balances and allowances.
///
/// Used by the CLI and the test suite. Allowance semantics follow the usual
/// approve/transferFrom model: a transfer-in consumes both balance and
/// allowance.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: HashMap<AccountId, Amount>,
    allowances: HashMap<AccountId, Amount>,
    pooled: Amount,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint `amount` into an account's balance.
    pub fn credit(&mut self, account: &AccountId, amount: Amount) {
        let entry = self.balances.entry(account.clone()).or_default();
        *entry = entry.checked_add(amount).unwrap_or(Amount(u128::MAX));
    }

    /// Set the engine's spending allowance for an account.
    pub fn approve(&mut self, account: &AccountId, amount: Amount) {
        self.allowances.insert(account.clone(), amount);
    }

    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    pub fn allowance_of(&self, account: &AccountId) -> Amount {
        self.allowances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Total tokens currently held by the engine pool.
    pub fn pooled(&self) -> Amount {
        self.pooled
    }
}

impl TokenLedger for InMemoryLedger {
    fn transfer_in(&mut self, payer: &AccountId, amount: Amount) -> Result<(), TransferError> {
        let balance = self.balance_of(payer);
        let allowance = self.allowance_of(payer);
        let new_balance = balance
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientBalance)?;
        let new_allowance = allowance
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientAllowance)?;
        let new_pooled = self
            .pooled
            .checked_add(amount)
            .ok_or(TransferError::InsufficientContractBalance)?;
        self.balances.insert(payer.clone(), new_balance);
        self.allowances.insert(payer.clone(), new_allowance);
        self.pooled = new_pooled;
        Ok(())
    }

    fn transfer_out(&mut self, payee: &AccountId, amount: Amount) -> Result<(), TransferError> {
        self.pooled = self
            .pooled
            .checked_sub(amount)
            .ok_or(TransferError::InsufficientContractBalance)?;
        let entry = self.balances.entry(payee.clone()).or_default();
        *entry = entry.checked_add(amount).unwrap_or(Amount(u128::MAX));
        Ok(())
    }
}

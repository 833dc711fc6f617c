//! The exchange — owned state aggregate and sequential command handler.
//!
//! Every operation is a complete, indivisible transition over `&mut self`:
//! validate fully, interact with the token ledger, then commit local state.
//! Time never comes from a clock; operations that are time-gated take a
//! caller-supplied `now` in Unix seconds.

use crate::domain::{
    AccountId, Amount, Club, ClubId, FutureId, FutureWindow, HoldingEntry, Position, PositionId,
    PositionSide, PriceMovement,
};
use crate::engine::access::{AccessControl, Role};
use crate::engine::clubs::ClubRegistry;
use crate::engine::config::EngineConfig;
use crate::engine::error::EngineError;
use crate::engine::futures::FutureScheduler;
use crate::engine::holdings::HoldingsLedger;
use crate::engine::ledger::TokenLedger;
use crate::engine::position_book::PositionBook;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Outcome of one `execute_future` call.
///
/// Settlement is bounded and resumable: each call folds at most one batch of
/// positions, and the future flips to executed only once its position list is
/// empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettlementProgress {
    /// Every referenced position has been folded; the future is executed.
    Settled { folded: usize },
    /// A batch was folded but positions remain; call again to continue.
    InProgress { folded: usize, remaining: usize },
}

/// A user's combined view: open positions plus realized holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Portfolio {
    pub open_positions: Vec<Position>,
    pub holdings: Vec<(ClubId, HoldingEntry)>,
}

/// The futures exchange engine.
///
/// Generic over its two external collaborators: the token ledger backing
/// margin and the access-control provider for role-gated operations.
#[derive(Debug)]
pub struct Exchange<L: TokenLedger, A: AccessControl> {
    config: EngineConfig,
    clubs: ClubRegistry,
    futures: FutureScheduler,
    book: PositionBook,
    holdings: HoldingsLedger,
    ledger: L,
    access: A,
    /// Destination of position fees (the deployment's profit address).
    fee_account: AccountId,
}

impl<L: TokenLedger, A: AccessControl> Exchange<L, A> {
    pub fn new(config: EngineConfig, ledger: L, access: A, fee_account: AccountId) -> Self {
        let futures = FutureScheduler::new(config.acceptance_rule);
        Self {
            config,
            clubs: ClubRegistry::new(),
            futures,
            book: PositionBook::new(),
            holdings: HoldingsLedger::new(),
            ledger,
            access,
            fee_account,
        }
    }

    // ── Club registry ──────────────────────────────────────────────────

    /// Register a club. Admin only.
    pub fn register_club(
        &mut self,
        caller: &AccountId,
        name: &str,
        symbol: &str,
    ) -> Result<ClubId, EngineError> {
        self.require_role(caller, Role::Admin)?;
        let id = self.clubs.register(name, symbol)?;
        info!(club = %id, name, symbol, "club registered");
        Ok(id)
    }

    /// Update a club's stock price. Admin only.
    pub fn set_club_stock_price(
        &mut self,
        caller: &AccountId,
        id: ClubId,
        price: Amount,
    ) -> Result<(), EngineError> {
        self.require_role(caller, Role::Admin)?;
        self.clubs.set_price(id, price)?;
        info!(club = %id, %price, "club price updated");
        Ok(())
    }

    pub fn get_club_stock_price(&self, id: ClubId) -> Result<Amount, EngineError> {
        self.clubs.price(id)
    }

    pub fn get_all_clubs(&self) -> &[Club] {
        self.clubs.all()
    }

    pub fn get_club_index(&self) -> u64 {
        self.clubs.index()
    }

    // ── Future scheduler ───────────────────────────────────────────────

    /// Schedule a settlement window. Admin only.
    pub fn register_future_date(
        &mut self,
        caller: &AccountId,
        execution_time: i64,
    ) -> Result<FutureId, EngineError> {
        self.require_role(caller, Role::Admin)?;
        let id = self.futures.register(execution_time);
        info!(future = %id, execution_time, "future registered");
        Ok(id)
    }

    /// Move an unexecuted future's execution time. Admin only.
    pub fn update_future_date(
        &mut self,
        caller: &AccountId,
        id: FutureId,
        execution_time: i64,
    ) -> Result<(), EngineError> {
        self.require_role(caller, Role::Admin)?;
        self.futures.update(id, execution_time)?;
        info!(future = %id, execution_time, "future rescheduled");
        Ok(())
    }

    pub fn get_future(&self, id: FutureId) -> Result<&FutureWindow, EngineError> {
        self.futures.get(id)
    }

    pub fn future_index(&self) -> u64 {
        self.futures.index()
    }

    // ── Administration ─────────────────────────────────────────────────

    /// Set the position fee charged on open, in basis points. Admin only.
    pub fn set_position_fee(&mut self, caller: &AccountId, fee_bps: u16) -> Result<(), EngineError> {
        self.require_role(caller, Role::Admin)?;
        self.config.fee_bps = fee_bps;
        info!(fee_bps, "position fee updated");
        Ok(())
    }

    /// Rotate the admin account. Owner only.
    pub fn set_admin(&mut self, caller: &AccountId, account: AccountId) -> Result<(), EngineError> {
        self.require_role(caller, Role::Owner)?;
        info!(admin = %account, "admin rotated");
        self.access.set_role(Role::Admin, account);
        Ok(())
    }

    // ── Position lifecycle ─────────────────────────────────────────────

    /// Open a margin-locked position against `future_id`.
    ///
    /// Validation order: club, future (exists and unexecuted), acceptance
    /// window at `now`, slippage against `price_limit`, checked margin and
    /// fee arithmetic. Only then is the transfer-in requested; local state
    /// commits after the transfer succeeds.
    #[allow(clippy::too_many_arguments)]
    pub fn open_position(
        &mut self,
        caller: &AccountId,
        now: i64,
        club_id: ClubId,
        quantity: u64,
        side: PositionSide,
        price_limit: Amount,
        future_id: FutureId,
    ) -> Result<PositionId, EngineError> {
        if quantity == 0 {
            return Err(EngineError::InvalidQuantity);
        }
        let entry_price = self.clubs.price(club_id)?;
        let future = self.futures.get(future_id)?;
        if future.executed {
            return Err(EngineError::FutureAlreadyExecuted(future_id));
        }
        if !self.futures.is_within_acceptance_window(future_id, now)? {
            return Err(EngineError::AcceptanceWindowClosed(future_id));
        }
        let within_limit = match side {
            PositionSide::Long => entry_price <= price_limit,
            PositionSide::Short => entry_price >= price_limit,
        };
        if !within_limit {
            return Err(EngineError::SlippageExceeded {
                price: entry_price,
                limit: price_limit,
            });
        }

        let margin = entry_price
            .checked_mul_qty(quantity)
            .ok_or(EngineError::ArithmeticOverflow)?;
        let fee = margin
            .checked_fee_bps(self.config.fee_bps)
            .ok_or(EngineError::ArithmeticOverflow)?;
        let total = margin
            .checked_add(fee)
            .ok_or(EngineError::ArithmeticOverflow)?;

        self.ledger.transfer_in(caller, total)?;
        if !fee.is_zero() {
            if let Err(err) = self.ledger.transfer_out(&self.fee_account, fee) {
                // The pool just received at least `fee`, so a conforming
                // ledger cannot refuse the payout. If it does, undo the
                // transfer-in so the open has no effect.
                let _ = self.ledger.transfer_out(caller, total);
                return Err(err.into());
            }
        }

        let id = self.book.next_id();
        self.book.insert(Position {
            id,
            club_id,
            future_id,
            owner: caller.clone(),
            side,
            quantity,
            entry_price,
            margin_locked: margin,
        });
        info!(
            position = %id,
            owner = %caller,
            club = %club_id,
            future = %future_id,
            ?side,
            quantity,
            %entry_price,
            %margin,
            %fee,
            "position opened"
        );
        Ok(id)
    }

    /// Close a position and refund its margin, adjusted by realized price
    /// movement. Only the position owner may close.
    ///
    /// The refund is floored at zero and the profit capped at one margin
    /// (refund never exceeds twice the locked margin). If the transfer-out
    /// fails the close aborts and the position stays open.
    pub fn close_position(
        &mut self,
        caller: &AccountId,
        id: PositionId,
    ) -> Result<Amount, EngineError> {
        let position = self
            .book
            .get(id)
            .ok_or(EngineError::PositionNotFound(id))?;
        if &position.owner != caller {
            return Err(EngineError::Unauthorized(caller.clone()));
        }

        let current_price = self.clubs.price(position.club_id)?;
        let movement = position
            .price_movement(current_price)
            .ok_or(EngineError::ArithmeticOverflow)?;
        let margin = position.margin_locked;
        let refund = match movement {
            PriceMovement::Favorable(gain) => margin
                .checked_add(gain.min(margin))
                .ok_or(EngineError::ArithmeticOverflow)?,
            PriceMovement::Adverse(loss) => margin.saturating_sub(loss),
        };

        self.ledger.transfer_out(caller, refund)?;
        self.book.remove(id);
        info!(position = %id, owner = %caller, %refund, "position closed");
        Ok(refund)
    }

    /// Fold one batch of a future's positions into the holdings ledger.
    /// Permissionless: any caller may drive settlement forward.
    ///
    /// At most `settlement_batch` positions are folded per call; the batch is
    /// validated for overflow before any write, so each call is atomic. The
    /// margin backing folded positions stays in the pool as the cost basis of
    /// the realized holdings.
    pub fn execute_future(&mut self, future_id: FutureId) -> Result<SettlementProgress, EngineError> {
        self.execute_future_batch(future_id, self.config.settlement_batch)
    }

    /// `execute_future` with an explicit batch cap.
    pub fn execute_future_batch(
        &mut self,
        future_id: FutureId,
        max_batch: usize,
    ) -> Result<SettlementProgress, EngineError> {
        let future = self.futures.get(future_id)?;
        if future.executed {
            return Err(EngineError::FutureAlreadyExecuted(future_id));
        }

        let batch: Vec<PositionId> = self
            .book
            .future_positions(future_id)
            .iter()
            .take(max_batch.max(1))
            .copied()
            .collect();

        // Dry-run the whole batch against a scratch view of the affected
        // holdings; any overflow aborts the call before the first write.
        let mut scratch: HashMap<(AccountId, ClubId), HoldingEntry> = HashMap::new();
        for id in &batch {
            let position = self
                .book
                .get(*id)
                .ok_or(EngineError::PositionNotFound(*id))?;
            let key = (position.owner.clone(), position.club_id);
            let current = scratch
                .get(&key)
                .copied()
                .unwrap_or_else(|| self.holdings.get(&position.owner, position.club_id));
            let updated = current
                .checked_add(position.side, position.quantity)
                .ok_or(EngineError::ArithmeticOverflow)?;
            scratch.insert(key, updated);
        }

        let folded = batch.len();
        for id in batch {
            let position = self
                .book
                .remove(id)
                .ok_or(EngineError::PositionNotFound(id))?;
            self.holdings
                .add(&position.owner, position.club_id, position.side, position.quantity)?;
            debug!(
                position = %id,
                owner = %position.owner,
                club = %position.club_id,
                quantity = position.quantity,
                "position folded into holdings"
            );
        }

        let remaining = self.book.future_positions(future_id).len();
        if remaining == 0 {
            self.futures.mark_executed(future_id)?;
            info!(future = %future_id, folded, "future executed");
            Ok(SettlementProgress::Settled { folded })
        } else {
            info!(future = %future_id, folded, remaining, "settlement in progress");
            Ok(SettlementProgress::InProgress { folded, remaining })
        }
    }

    // ── Read surface ───────────────────────────────────────────────────

    pub fn get_open_position(&self, id: PositionId) -> Result<&Position, EngineError> {
        self.book.get(id).ok_or(EngineError::PositionNotFound(id))
    }

    pub fn get_user_open_positions(&self, user: &AccountId) -> Vec<&Position> {
        self.book.user_positions(user)
    }

    pub fn get_all_positions(&self) -> Vec<&Position> {
        self.book.all()
    }

    /// Realized (long, short) stock balance for a (user, club) pair.
    pub fn get_user_stock(&self, user: &AccountId, club_id: ClubId) -> (u64, u64) {
        let entry = self.holdings.get(user, club_id);
        (entry.long_qty, entry.short_qty)
    }

    /// Open positions plus realized holdings of one user.
    pub fn get_portfolio(&self, user: &AccountId) -> Portfolio {
        Portfolio {
            open_positions: self
                .book
                .user_positions(user)
                .into_iter()
                .cloned()
                .collect(),
            holdings: self.holdings.user_holdings(user),
        }
    }

    /// Sum of locked margin over all open positions.
    pub fn total_locked_margin(&self) -> Amount {
        self.book.total_margin()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    // ── Internal helpers ───────────────────────────────────────────────

    fn require_role(&self, caller: &AccountId, role: Role) -> Result<(), EngineError> {
        if self.access.has_role(caller, role) {
            Ok(())
        } else {
            Err(EngineError::Unauthorized(caller.clone()))
        }
    }
}

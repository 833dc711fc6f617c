//! Holdings ledger — realized per-user, per-club stock balances.

use crate::domain::{AccountId, ClubId, HoldingEntry, PositionSide};
use crate::engine::error::EngineError;
use std::collections::HashMap;

/// Realized stock balances, written only by settlement.
#[derive(Debug, Clone, Default)]
pub struct HoldingsLedger {
    entries: HashMap<(AccountId, ClubId), HoldingEntry>,
}

impl HoldingsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the matching bucket for (user, club), checked.
    pub fn add(
        &mut self,
        user: &AccountId,
        club_id: ClubId,
        side: PositionSide,
        qty: u64,
    ) -> Result<(), EngineError> {
        let key = (user.clone(), club_id);
        let current = self.entries.get(&key).copied().unwrap_or_default();
        let updated = current
            .checked_add(side, qty)
            .ok_or(EngineError::ArithmeticOverflow)?;
        self.entries.insert(key, updated);
        Ok(())
    }

    /// Current (long, short) balance for a (user, club) pair. Missing pairs
    /// read as zero.
    pub fn get(&self, user: &AccountId, club_id: ClubId) -> HoldingEntry {
        self.entries
            .get(&(user.clone(), club_id))
            .copied()
            .unwrap_or_default()
    }

    /// All non-empty holdings of one user, ordered by club id.
    pub fn user_holdings(&self, user: &AccountId) -> Vec<(ClubId, HoldingEntry)> {
        let mut holdings: Vec<(ClubId, HoldingEntry)> = self
            .entries
            .iter()
            .filter(|((owner, _), entry)| owner == user && !entry.is_empty())
            .map(|((_, club), entry)| (*club, *entry))
            .collect();
        holdings.sort_by_key(|(club, _)| *club);
        holdings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> AccountId {
        AccountId::from("alice")
    }

    #[test]
    fn add_accumulates_per_bucket() {
        let mut ledger = HoldingsLedger::new();
        ledger.add(&alice(), ClubId(0), PositionSide::Long, 5).unwrap();
        ledger.add(&alice(), ClubId(0), PositionSide::Long, 2).unwrap();
        ledger.add(&alice(), ClubId(0), PositionSide::Short, 1).unwrap();

        let entry = ledger.get(&alice(), ClubId(0));
        assert_eq!((entry.long_qty, entry.short_qty), (7, 1));
    }

    #[test]
    fn pairs_are_independent() {
        let mut ledger = HoldingsLedger::new();
        ledger.add(&alice(), ClubId(0), PositionSide::Long, 5).unwrap();
        ledger
            .add(&AccountId::from("bob"), ClubId(0), PositionSide::Long, 3)
            .unwrap();
        ledger.add(&alice(), ClubId(1), PositionSide::Short, 2).unwrap();

        assert_eq!(ledger.get(&alice(), ClubId(0)).long_qty, 5);
        assert_eq!(ledger.get(&AccountId::from("bob"), ClubId(0)).long_qty, 3);
        assert_eq!(ledger.get(&alice(), ClubId(1)).short_qty, 2);
        assert_eq!(ledger.get(&alice(), ClubId(2)), HoldingEntry::default());
    }

    #[test]
    fn overflow_leaves_entry_unchanged() {
        let mut ledger = HoldingsLedger::new();
        ledger
            .add(&alice(), ClubId(0), PositionSide::Long, u64::MAX)
            .unwrap();
        assert_eq!(
            ledger.add(&alice(), ClubId(0), PositionSide::Long, 1),
            Err(EngineError::ArithmeticOverflow)
        );
        assert_eq!(ledger.get(&alice(), ClubId(0)).long_qty, u64::MAX);
    }

    #[test]
    fn user_holdings_sorted_and_nonempty() {
        let mut ledger = HoldingsLedger::new();
        ledger.add(&alice(), ClubId(2), PositionSide::Long, 1).unwrap();
        ledger.add(&alice(), ClubId(0), PositionSide::Short, 4).unwrap();

        let holdings = ledger.user_holdings(&alice());
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings[0].0, ClubId(0));
        assert_eq!(holdings[1].0, ClubId(2));
    }
}

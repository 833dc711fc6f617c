//! Position book — the arena of open positions and its secondary indices.
//!
//! Positions live in an arena keyed by id, with two secondary indices: one
//! mapping each owner to their open position ids, one mapping each future to
//! the ids of positions awaiting its settlement. Every open position appears
//! in exactly one entry of each index. The future index doubles as the
//! settlement queue: folding removes from the front, so a partially settled
//! future's remaining list is the resume point.

use crate::domain::{AccountId, Amount, FutureId, IdGen, Position, PositionId};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct PositionBook {
    positions: HashMap<PositionId, Position>,
    by_owner: HashMap<AccountId, Vec<PositionId>>,
    by_future: HashMap<FutureId, Vec<PositionId>>,
    id_gen: IdGen,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next position id without inserting anything.
    pub fn next_id(&mut self) -> PositionId {
        PositionId(self.id_gen.next_id())
    }

    /// Insert a position and index it under its owner and its future.
    ///
    /// The id must come from `next_id`; inserting an id twice is a logic
    /// error.
    pub fn insert(&mut self, position: Position) {
        debug_assert!(
            !self.positions.contains_key(&position.id),
            "position id reused"
        );
        self.by_owner
            .entry(position.owner.clone())
            .or_default()
            .push(position.id);
        self.by_future
            .entry(position.future_id)
            .or_default()
            .push(position.id);
        self.positions.insert(position.id, position);
    }

    /// Remove a position from the arena and both indices.
    pub fn remove(&mut self, id: PositionId) -> Option<Position> {
        let position = self.positions.remove(&id)?;
        if let Some(ids) = self.by_owner.get_mut(&position.owner) {
            ids.retain(|pid| *pid != id);
            if ids.is_empty() {
                self.by_owner.remove(&position.owner);
            }
        }
        if let Some(ids) = self.by_future.get_mut(&position.future_id) {
            ids.retain(|pid| *pid != id);
            if ids.is_empty() {
                self.by_future.remove(&position.future_id);
            }
        }
        Some(position)
    }

    pub fn get(&self, id: PositionId) -> Option<&Position> {
        self.positions.get(&id)
    }

    /// Open positions of one owner, in open order.
    pub fn user_positions(&self, owner: &AccountId) -> Vec<&Position> {
        self.by_owner
            .get(owner)
            .map(|ids| ids.iter().filter_map(|id| self.positions.get(id)).collect())
            .unwrap_or_default()
    }

    /// Ids of the positions still awaiting settlement of a future, in open
    /// order.
    pub fn future_positions(&self, future_id: FutureId) -> &[PositionId] {
        self.by_future
            .get(&future_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All open positions, ordered by id.
    pub fn all(&self) -> Vec<&Position> {
        let mut all: Vec<&Position> = self.positions.values().collect();
        all.sort_by_key(|p| p.id);
        all
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Sum of locked margin over all open positions, for the conservation
    /// invariant. Saturates rather than panics; the individual margins were
    /// checked at open time.
    pub fn total_margin(&self) -> Amount {
        self.positions
            .values()
            .fold(Amount::ZERO, |acc, p| {
                acc.checked_add(p.margin_locked).unwrap_or(Amount(u128::MAX))
            })
    }
}

//! Club registry — club identity and current stock price.

use crate::domain::{Amount, Club, ClubId};
use crate::engine::error::EngineError;

/// Registry of all clubs, ordered by id. Sequential ids double as indices
/// into the arena; clubs are never deleted.
#[derive(Debug, Clone, Default)]
pub struct ClubRegistry {
    clubs: Vec<Club>,
}

impl ClubRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new club at the default listing price.
    ///
    /// Fails with `DuplicateClub` if either the name or the symbol is already
    /// taken; the index does not advance on failure.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        symbol: impl Into<String>,
    ) -> Result<ClubId, EngineError> {
        let name = name.into();
        let symbol = symbol.into();
        if self
            .clubs
            .iter()
            .any(|c| c.name == name || c.symbol == symbol)
        {
            return Err(EngineError::DuplicateClub { name, symbol });
        }
        let id = ClubId(self.clubs.len() as u64);
        self.clubs.push(Club::new(id, name, symbol));
        Ok(id)
    }

    pub fn set_price(&mut self, id: ClubId, price: Amount) -> Result<(), EngineError> {
        let club = self
            .clubs
            .get_mut(id.0 as usize)
            .ok_or(EngineError::ClubNotFound(id))?;
        club.price = price;
        Ok(())
    }

    pub fn price(&self, id: ClubId) -> Result<Amount, EngineError> {
        self.get(id).map(|c| c.price)
    }

    pub fn get(&self, id: ClubId) -> Result<&Club, EngineError> {
        self.clubs
            .get(id.0 as usize)
            .ok_or(EngineError::ClubNotFound(id))
    }

    /// All clubs, ordered by id.
    pub fn all(&self) -> &[Club] {
        &self.clubs
    }

    /// Count of registered clubs (the next id to be assigned).
    pub fn index(&self) -> u64 {
        self.clubs.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_LISTING_PRICE;

    #[test]
    fn register_assigns_sequential_ids() {
        let mut registry = ClubRegistry::new();
        assert_eq!(registry.register("Real Madrid", "RMA").unwrap(), ClubId(0));
        assert_eq!(registry.register("FC Barcelona", "FCB").unwrap(), ClubId(1));
        assert_eq!(registry.index(), 2);
        assert_eq!(registry.all()[0].name, "Real Madrid");
        assert_eq!(registry.all()[1].name, "FC Barcelona");
    }

    #[test]
    fn duplicate_name_or_symbol_rejected() {
        let mut registry = ClubRegistry::new();
        registry.register("Real Madrid", "RMA").unwrap();

        let by_name = registry.register("Real Madrid", "RM2");
        assert!(matches!(by_name, Err(EngineError::DuplicateClub { .. })));

        let by_symbol = registry.register("Madrid II", "RMA");
        assert!(matches!(by_symbol, Err(EngineError::DuplicateClub { .. })));

        // Index did not advance on either failure
        assert_eq!(registry.index(), 1);
    }

    #[test]
    fn new_club_lists_at_default_price() {
        let mut registry = ClubRegistry::new();
        let id = registry.register("Real Madrid", "RMA").unwrap();
        assert_eq!(registry.price(id).unwrap(), DEFAULT_LISTING_PRICE);
    }

    #[test]
    fn set_price_updates_and_validates_id() {
        let mut registry = ClubRegistry::new();
        let id = registry.register("Real Madrid", "RMA").unwrap();
        registry.set_price(id, Amount::from_raw(110_000_000)).unwrap();
        assert_eq!(registry.price(id).unwrap(), Amount::from_raw(110_000_000));

        let missing = registry.set_price(ClubId(7), Amount::from_whole(1));
        assert_eq!(missing, Err(EngineError::ClubNotFound(ClubId(7))));
    }
}

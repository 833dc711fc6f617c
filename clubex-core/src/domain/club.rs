use super::ids::ClubId;
use super::money::Amount;
use serde::{Deserialize, Serialize};

/// Price assigned to a club at registration, before any admin update.
pub const DEFAULT_LISTING_PRICE: Amount = Amount::from_raw(100_000_000);

/// A registered club and its current stock price.
///
/// Name and symbol are unique across the registry. Clubs are never deleted;
/// only the price mutates, and only through an admin operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Club {
    pub id: ClubId,
    pub name: String,
    pub symbol: String,
    pub price: Amount,
}

impl Club {
    pub fn new(id: ClubId, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            symbol: symbol.into(),
            price: DEFAULT_LISTING_PRICE,
        }
    }
}

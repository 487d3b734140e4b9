//! The two-user aggregate that owns transactions and settlements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use duet_shared::types::{CoupleId, Currency, UserId};

/// Two linked partners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Couple {
    /// Couple ID.
    pub id: CoupleId,
    /// First partner.
    pub user1_id: UserId,
    /// Second partner.
    pub user2_id: UserId,
    /// When the couple was linked.
    pub created_at: DateTime<Utc>,
}

impl Couple {
    /// Links two users.
    #[must_use]
    pub fn new(user1_id: UserId, user2_id: UserId) -> Self {
        Self {
            id: CoupleId::new(),
            user1_id,
            user2_id,
            created_at: Utc::now(),
        }
    }

    /// Returns true if `user` is one of the two partners.
    #[must_use]
    pub fn contains(&self, user: UserId) -> bool {
        user == self.user1_id || user == self.user2_id
    }

    /// Returns the other partner, or `None` if `user` is not in the couple.
    #[must_use]
    pub fn partner_of(&self, user: UserId) -> Option<UserId> {
        if user == self.user1_id {
            Some(self.user2_id)
        } else if user == self.user2_id {
            Some(self.user1_id)
        } else {
            None
        }
    }
}

/// The part of a user profile the engine needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// User ID.
    pub id: UserId,
    /// Name shown to the partner.
    pub display_name: String,
    /// Currency balances are shown in, and the conversion target for
    /// transactions the partner records.
    pub home_currency: Currency,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partner_of() {
        let a = UserId::new();
        let b = UserId::new();
        let couple = Couple::new(a, b);
        assert_eq!(couple.partner_of(a), Some(b));
        assert_eq!(couple.partner_of(b), Some(a));
        assert_eq!(couple.partner_of(UserId::new()), None);
    }

    #[test]
    fn test_contains() {
        let a = UserId::new();
        let couple = Couple::new(a, UserId::new());
        assert!(couple.contains(a));
        assert!(!couple.contains(UserId::new()));
    }
}

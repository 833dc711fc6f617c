//! Access control seam — role checks for administrative operations.
//!
//! Club registration, price updates, and future registration/update are
//! admin-gated. Position close is owner-of-position, not a role, and
//! settlement is deliberately permissionless; neither goes through this
//! trait.

use crate::domain::AccountId;
use serde::{Deserialize, Serialize};

/// Roles recognized by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Club and future management, price updates, fee configuration.
    Admin,
    /// Deployment-time configuration, including admin rotation.
    Owner,
}

/// Role provider consulted at the top of every role-gated operation.
pub trait AccessControl {
    fn has_role(&self, caller: &AccountId, role: Role) -> bool;

    /// Reassign a role to a new account.
    fn set_role(&mut self, role: Role, account: AccountId);
}

/// Single-admin, single-owner access control: one admin address, one owner
/// address, fixed at construction apart from admin rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticAccess {
    owner: AccountId,
    admin: AccountId,
}

impl StaticAccess {
    pub fn new(owner: AccountId, admin: AccountId) -> Self {
        Self { owner, admin }
    }

    pub fn admin(&self) -> &AccountId {
        &self.admin
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }
}

impl AccessControl for StaticAccess {
    fn has_role(&self, caller: &AccountId, role: Role) -> bool {
        match role {
            Role::Admin => caller == &self.admin,
            Role::Owner => caller == &self.owner,
        }
    }

    fn set_role(&mut self, role: Role, account: AccountId) {
        match role {
            Role::Admin => self.admin = account,
            Role::Owner => self.owner = account,
        }
    }
}

//! Capability checks, the category map and the level policy.
//!
//! This module is the single source of truth for the three fixed tables the
//! rest of the crate consults: who may perform admin operations, which ledger
//! token type a mission category pays out as, and where the level cutoffs sit.

use crate::{
    entities::{MissionCategory, Role, TokenType},
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};

/// Authenticated identity handed in by the (excluded) framework layer.
///
/// Workflow functions take an `Actor` instead of reaching for request state,
/// so every capability decision is explicit and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Account the request is authenticated as
    pub account_id: i64,
    /// Role resolved at authentication time
    pub role: Role,
}

impl Actor {
    /// Builds an admin actor.
    #[must_use]
    pub const fn admin(account_id: i64) -> Self {
        Self {
            account_id,
            role: Role::Admin,
        }
    }

    /// Builds an employee actor.
    #[must_use]
    pub const fn employee(account_id: i64) -> Self {
        Self {
            account_id,
            role: Role::Employee,
        }
    }
}

/// Denies the operation unless the actor holds the admin role.
///
/// All admin-gated workflows funnel through this one check; workflow code
/// never compares role values directly.
pub fn require_admin(actor: &Actor, operation: &'static str) -> Result<()> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Employee => Err(Error::Forbidden { operation }),
    }
}

/// Resolves the ledger token type a mission category pays out as.
///
/// The map is exhaustive: with both sides being enums there is no unmapped
/// category (the original system fell back to the performance type).
#[must_use]
pub const fn token_type_for(category: MissionCategory) -> TokenType {
    match category {
        MissionCategory::Performance => TokenType::Performance,
        MissionCategory::Discipline => TokenType::Discipline,
        MissionCategory::Cultural => TokenType::Cultural,
        MissionCategory::Creative => TokenType::Idea,
    }
}

/// Ordered point cutoffs for each level. An account sits at the highest level
/// whose cutoff its `total_points` has reached; levels start at 1 and cap at
/// the top of the table.
pub const LEVEL_THRESHOLDS: [i64; 5] = [0, 500, 1000, 1500, 2000];

/// Computes the level for a given `total_points` value.
///
/// Pure and deterministic: a monotonic step function over
/// [`LEVEL_THRESHOLDS`]. Calling it twice with the same input yields the same
/// level, so the ledger engine can re-evaluate it on every credit.
#[must_use]
pub fn level_for(total_points: i64) -> i32 {
    let reached = LEVEL_THRESHOLDS
        .iter()
        .filter(|cutoff| total_points >= **cutoff)
        .count();
    i32::try_from(reached.max(1)).unwrap_or(i32::MAX)
}

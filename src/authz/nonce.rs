// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-account replay protection counters.

use std::collections::BTreeMap;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use super::error::AuthzError;

/// Default value an account's nonce jumps to on emergency invalidation.
pub const DEFAULT_INVALIDATION_CHECKPOINT: u64 = 1000;

/// Monotonic nonce per account. Unknown accounts are at `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NonceRegistry {
    nonces: BTreeMap<Address, u64>,
}

impl NonceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self, account: Address) -> u64 {
        self.nonces.get(&account).copied().unwrap_or(0)
    }

    /// Consume `expected` for `account`, returning the advanced nonce.
    pub fn consume(&mut self, account: Address, expected: u64) -> Result<u64, AuthzError> {
        let current = self.current(account);
        if expected != current {
            return Err(AuthzError::Unauthorized);
        }
        let next = current.checked_add(1).ok_or(AuthzError::Unauthorized)?;
        self.nonces.insert(account, next);
        Ok(next)
    }

    /// Move `account` to `checkpoint`, returning the new nonce.
    ///
    /// An account already at or past the checkpoint moves forward by a
    /// further `checkpoint` so the nonce never goes backwards.
    pub fn invalidate(&mut self, account: Address, checkpoint: u64) -> u64 {
        let current = self.current(account);
        let next = if current < checkpoint {
            checkpoint
        } else {
            current.saturating_add(checkpoint.max(1))
        };
        self.nonces.insert(account, next);
        next
    }

    pub fn len(&self) -> usize {
        self.nonces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nonces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: Address = Address::repeat_byte(0xa1);
    const BOB: Address = Address::repeat_byte(0xb0);

    #[test]
    fn unknown_accounts_start_at_zero() {
        let registry = NonceRegistry::new();
        assert_eq!(registry.current(ALICE), 0);
        assert_eq!(registry.current(Address::ZERO), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn consume_advances_only_on_match() {
        let mut registry = NonceRegistry::new();

        assert_eq!(registry.consume(ALICE, 0), Ok(1));
        assert_eq!(registry.consume(ALICE, 0), Err(AuthzError::Unauthorized));
        assert_eq!(registry.consume(ALICE, 2), Err(AuthzError::Unauthorized));
        assert_eq!(registry.current(ALICE), 1);
        assert_eq!(registry.current(BOB), 0);
    }

    #[test]
    fn invalidate_jumps_to_checkpoint() {
        let mut registry = NonceRegistry::new();
        registry.consume(ALICE, 0).unwrap();

        assert_eq!(registry.invalidate(ALICE, DEFAULT_INVALIDATION_CHECKPOINT), 1000);
        assert_eq!(registry.invalidate(BOB, DEFAULT_INVALIDATION_CHECKPOINT), 1000);
        assert_eq!(registry.current(ALICE), 1000);
    }

    #[test]
    fn invalidate_never_moves_backwards() {
        let mut registry = NonceRegistry::new();
        registry.invalidate(ALICE, 1000);
        registry.consume(ALICE, 1000).unwrap();

        let next = registry.invalidate(ALICE, 1000);
        assert_eq!(next, 2001);
        assert!(registry.consume(ALICE, 1000).is_err());
    }

    #[test]
    fn serializes_as_address_map() {
        let mut registry = NonceRegistry::new();
        registry.consume(ALICE, 0).unwrap();

        let json = serde_json::to_value(&registry).unwrap();
        assert_eq!(json.as_object().map(|m| m.len()), Some(1));

        let back: NonceRegistry = serde_json::from_value(json).unwrap();
        assert_eq!(back, registry);
    }
}

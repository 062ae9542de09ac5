// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mutable authorization state.
//!
//! Processors receive this store by reference; nothing in the engine keeps
//! hidden global state. The whole store serializes to JSON for persistence.

use std::collections::BTreeMap;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use super::nonce::NonceRegistry;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationState {
    #[serde(default)]
    pub(crate) nonces: NonceRegistry,
    /// owner -> spender -> amount
    #[serde(default)]
    pub(crate) allowances: BTreeMap<Address, BTreeMap<Address, u128>>,
    #[serde(default)]
    pub(crate) delegates: BTreeMap<Address, Address>,
    #[serde(default)]
    pub(crate) paused: bool,
}

impl AuthorizationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nonce(&self, account: Address) -> u64 {
        self.nonces.current(account)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> u128 {
        self.allowances
            .get(&owner)
            .and_then(|spenders| spenders.get(&spender))
            .copied()
            .unwrap_or(0)
    }

    pub fn delegate(&self, account: Address) -> Option<Address> {
        self.delegates.get(&account).copied()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub(crate) fn set_allowance(&mut self, owner: Address, spender: Address, amount: u128) {
        self.allowances
            .entry(owner)
            .or_default()
            .insert(spender, amount);
    }

    pub(crate) fn set_delegate(&mut self, delegator: Address, delegatee: Address) {
        self.delegates.insert(delegator, delegatee);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: Address = Address::repeat_byte(0xa1);
    const BOB: Address = Address::repeat_byte(0xb0);

    #[test]
    fn defaults_are_empty() {
        let state = AuthorizationState::new();
        assert_eq!(state.nonce(ALICE), 0);
        assert_eq!(state.allowance(ALICE, BOB), 0);
        assert_eq!(state.allowance(BOB, ALICE), 0);
        assert_eq!(state.delegate(ALICE), None);
        assert!(!state.is_paused());
    }

    #[test]
    fn allowance_is_directional() {
        let mut state = AuthorizationState::new();
        state.set_allowance(ALICE, BOB, 25);
        assert_eq!(state.allowance(ALICE, BOB), 25);
        assert_eq!(state.allowance(BOB, ALICE), 0);

        state.set_allowance(ALICE, BOB, 0);
        assert_eq!(state.allowance(ALICE, BOB), 0);
    }

    #[test]
    fn json_round_trip_keeps_everything() {
        let mut state = AuthorizationState::new();
        state.nonces.consume(ALICE, 0).unwrap();
        state.set_allowance(ALICE, BOB, u128::from(u64::MAX) + 1);
        state.set_delegate(ALICE, BOB);
        state.paused = true;

        let json = serde_json::to_string(&state).unwrap();
        let back: AuthorizationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn missing_fields_default() {
        let state: AuthorizationState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, AuthorizationState::default());
    }
}

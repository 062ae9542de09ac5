// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Owner-only controls: pause switch, emergency nonce invalidation and
//! ledger funding.

use alloy::primitives::Address;
use tracing::{info, warn};

use super::{
    engine::Authorizer,
    error::AuthzError,
    executor::{CallError, InMemoryLedger},
    signature::SignatureScheme,
    store::AuthorizationState,
};

impl<S: SignatureScheme> Authorizer<S> {
    /// Set the pause flag. The only mutation allowed while paused.
    pub fn set_paused(
        &self,
        state: &mut AuthorizationState,
        caller: Address,
        paused: bool,
    ) -> Result<bool, AuthzError> {
        self.ensure_owner(caller)?;
        state.paused = paused;
        info!(caller = %caller, paused, "pause state changed");
        Ok(paused)
    }

    pub fn is_paused(&self, state: &AuthorizationState) -> bool {
        state.is_paused()
    }

    /// Push `account`'s nonce to the invalidation checkpoint so every
    /// outstanding signature for it can no longer be used.
    pub fn emergency_invalidate_nonce(
        &self,
        state: &mut AuthorizationState,
        caller: Address,
        account: Address,
    ) -> Result<u64, AuthzError> {
        self.ensure_owner(caller)?;
        self.ensure_active(state)?;

        let previous = state.nonce(account);
        let nonce = state
            .nonces
            .invalidate(account, self.invalidation_checkpoint());
        warn!(
            caller = %caller,
            account = %account,
            previous,
            nonce,
            "nonce invalidated by administrator"
        );
        Ok(nonce)
    }

    /// Credit native balance to `account` on the call ledger, returning the
    /// new balance. Blocked while paused like every other mutation.
    pub fn fund_account(
        &self,
        state: &AuthorizationState,
        ledger: &mut InMemoryLedger,
        caller: Address,
        account: Address,
        amount: u128,
    ) -> Result<u128, AuthzError> {
        self.ensure_owner(caller)?;
        self.ensure_active(state)?;
        if account == Address::ZERO {
            return Err(AuthzError::CallFailed(CallError::ZeroTarget));
        }

        ledger.credit(account, amount);
        let balance = ledger.balance_of(account);
        info!(caller = %caller, account = %account, amount, balance, "ledger account funded");
        Ok(balance)
    }
}

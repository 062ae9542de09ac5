// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Delegate assignment by signature.

use alloy::primitives::Address;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use super::{
    engine::Authorizer, error::AuthzError, signature::SignatureScheme,
    store::AuthorizationState, typed_data::AuthorizationMessage,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DelegationApplied {
    #[schema(value_type = String)]
    pub delegator: Address,
    #[schema(value_type = String)]
    pub delegatee: Address,
    pub nonce: u64,
}

impl<S: SignatureScheme> Authorizer<S> {
    /// Record `delegatee` as the delegate of `delegator`.
    pub fn delegate_by_sig(
        &self,
        state: &mut AuthorizationState,
        delegator: Address,
        delegatee: Address,
        expiry: u64,
        signature: &[u8],
    ) -> Result<DelegationApplied, AuthzError> {
        self.ensure_active(state)?;
        self.ensure_not_expired(expiry)?;

        let nonce = state.nonce(delegator);
        let message = AuthorizationMessage::delegation(delegator, delegatee, nonce, expiry);
        self.authorize(&message, signature, delegator)?;

        state.nonces.consume(delegator, nonce)?;
        state.set_delegate(delegator, delegatee);

        info!(delegator = %delegator, delegatee = %delegatee, nonce, "delegate assigned");
        Ok(DelegationApplied {
            delegator,
            delegatee,
            nonce,
        })
    }
}

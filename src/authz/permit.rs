// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed allowance approvals.

use alloy::primitives::Address;
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use super::{
    engine::Authorizer, error::AuthzError, signature::SignatureScheme,
    store::AuthorizationState, typed_data::AuthorizationMessage,
};

/// Effect of an applied permit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PermitApplied {
    #[schema(value_type = String)]
    pub owner: Address,
    #[schema(value_type = String)]
    pub spender: Address,
    pub amount: u128,
    /// Nonce consumed by this permit.
    pub nonce: u64,
}

impl<S: SignatureScheme> Authorizer<S> {
    /// Grant `spender` an allowance of `amount` over `owner`'s funds.
    ///
    /// The deadline is checked before the signature, so an expired permit is
    /// rejected whatever its signature bytes are.
    pub fn permit(
        &self,
        state: &mut AuthorizationState,
        owner: Address,
        spender: Address,
        amount: u128,
        deadline: u64,
        signature: &[u8],
    ) -> Result<PermitApplied, AuthzError> {
        self.ensure_active(state)?;
        self.ensure_not_expired(deadline)?;

        let nonce = state.nonce(owner);
        let message = AuthorizationMessage::permit(owner, spender, amount, nonce, deadline);
        self.authorize(&message, signature, owner)?;

        state.nonces.consume(owner, nonce)?;
        state.set_allowance(owner, spender, amount);

        info!(owner = %owner, spender = %spender, amount, nonce, "permit applied");
        Ok(PermitApplied {
            owner,
            spender,
            amount,
            nonce,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::testing::{fixture, Fixture, START_TIME};

    fn signed_permit(fx: &Fixture, amount: u128, nonce: u64, deadline: u64) -> Vec<u8> {
        let message = AuthorizationMessage::permit(
            fx.alice.address(),
            fx.bob.address(),
            amount,
            nonce,
            deadline,
        );
        fx.sign(&fx.alice, &message)
    }

    #[test]
    fn valid_permit_sets_allowance_and_advances_nonce() {
        let mut fx = fixture();
        let (alice, bob) = (fx.alice.address(), fx.bob.address());
        let sig = signed_permit(&fx, 250, 0, START_TIME + 60);

        let applied = fx
            .authorizer
            .permit(&mut fx.state, alice, bob, 250, START_TIME + 60, &sig)
            .unwrap();

        assert_eq!(applied.nonce, 0);
        assert_eq!(fx.state.allowance(alice, bob), 250);
        assert_eq!(fx.state.nonce(alice), 1);
    }

    #[test]
    fn replayed_permit_is_rejected() {
        let mut fx = fixture();
        let (alice, bob) = (fx.alice.address(), fx.bob.address());
        let sig = signed_permit(&fx, 250, 0, START_TIME + 60);

        fx.authorizer
            .permit(&mut fx.state, alice, bob, 250, START_TIME + 60, &sig)
            .unwrap();
        let replay = fx
            .authorizer
            .permit(&mut fx.state, alice, bob, 250, START_TIME + 60, &sig);

        assert_eq!(replay, Err(AuthzError::InvalidSignature));
        assert_eq!(fx.state.nonce(alice), 1);
    }

    #[test]
    fn expired_permit_fails_before_signature_check() {
        let mut fx = fixture();
        let (alice, bob) = (fx.alice.address(), fx.bob.address());

        for deadline in [0, START_TIME - 1, START_TIME] {
            let err = fx
                .authorizer
                .permit(&mut fx.state, alice, bob, 1, deadline, &[0u8; 65])
                .unwrap_err();
            assert_eq!(err, AuthzError::Expired);
            assert_eq!(err.code(), 403);
        }

        let valid_but_late = signed_permit(&fx, 1, 0, START_TIME);
        assert_eq!(
            fx.authorizer
                .permit(&mut fx.state, alice, bob, 1, START_TIME, &valid_but_late),
            Err(AuthzError::Expired)
        );
        assert_eq!(fx.state.nonce(alice), 0);
    }

    #[test]
    fn wrong_signature_with_future_deadline_is_402() {
        let mut fx = fixture();
        let (alice, bob) = (fx.alice.address(), fx.bob.address());
        let deadline = START_TIME + 60;

        let by_bob = fx.sign(
            &fx.bob,
            &AuthorizationMessage::permit(alice, bob, 10, 0, deadline),
        );
        let wrong_amount = signed_permit(&fx, 11, 0, deadline);
        let stale_nonce = signed_permit(&fx, 10, 7, deadline);

        for sig in [by_bob, wrong_amount, stale_nonce, vec![0u8; 65]] {
            let err = fx
                .authorizer
                .permit(&mut fx.state, alice, bob, 10, deadline, &sig)
                .unwrap_err();
            assert_eq!(err.code(), 402);
        }
        assert_eq!(fx.state.allowance(alice, bob), 0);
        assert_eq!(fx.state.nonce(alice), 0);
    }

    #[test]
    fn permit_is_bound_to_the_domain() {
        let mut fx = fixture();
        let other = {
            let mut info = crate::authz::testing::domain();
            info.chain_id = 43113;
            crate::authz::domain::DomainSeparator::new(info)
        };
        let (alice, bob) = (fx.alice.address(), fx.bob.address());
        let message = AuthorizationMessage::permit(alice, bob, 5, 0, START_TIME + 60);
        let sig = crate::authz::testing::sign_digest(
            &fx.alice,
            &message.signing_digest(&other.separator()),
        );

        assert_eq!(
            fx.authorizer
                .permit(&mut fx.state, alice, bob, 5, START_TIME + 60, &sig),
            Err(AuthzError::InvalidSignature)
        );
    }

    #[test]
    fn later_permit_overwrites_allowance() {
        let mut fx = fixture();
        let (alice, bob) = (fx.alice.address(), fx.bob.address());
        let deadline = START_TIME + 60;

        let first = signed_permit(&fx, 100, 0, deadline);
        fx.authorizer
            .permit(&mut fx.state, alice, bob, 100, deadline, &first)
            .unwrap();
        let second = signed_permit(&fx, 30, 1, deadline);
        fx.authorizer
            .permit(&mut fx.state, alice, bob, 30, deadline, &second)
            .unwrap();

        assert_eq!(fx.state.allowance(alice, bob), 30);
        assert_eq!(fx.state.nonce(alice), 2);
    }

    #[test]
    fn paused_authorizer_rejects_permits() {
        let mut fx = fixture();
        let (alice, bob) = (fx.alice.address(), fx.bob.address());
        let sig = signed_permit(&fx, 1, 0, START_TIME + 60);
        fx.state.paused = true;

        assert_eq!(
            fx.authorizer
                .permit(&mut fx.state, alice, bob, 1, START_TIME + 60, &sig),
            Err(AuthzError::Paused)
        );
        assert_eq!(fx.state.nonce(alice), 0);
    }
}

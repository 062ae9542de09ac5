// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The authorizer: immutable configuration shared by every processor.
//!
//! Processors (`permit`, `meta_tx`, `delegation`, `batch`, `admin`) extend
//! [`Authorizer`] with one operation each. Every mutating operation takes the
//! [`AuthorizationState`] explicitly and follows the same order: pause check,
//! deadline check, signature check, call staging, nonce consumption, effect.
//! Checks never write, so a failure leaves the state untouched.

use std::sync::Arc;

use alloy::primitives::{Address, B256};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use super::{
    clock::LogicalClock,
    domain::{DomainInfo, DomainSeparator},
    error::AuthzError,
    nonce::DEFAULT_INVALIDATION_CHECKPOINT,
    signature::{verify, Secp256k1Scheme, SignatureScheme},
    store::AuthorizationState,
    typed_data::{typed_data_hash, AuthorizationMessage},
};

/// Static configuration of one authorizer deployment.
#[derive(Debug, Clone)]
pub struct AuthorizerConfig {
    pub domain: DomainInfo,
    /// Administrator allowed to pause and invalidate nonces.
    pub owner: Address,
    /// Nonce value emergency invalidation moves an account to.
    pub invalidation_checkpoint: u64,
}

impl AuthorizerConfig {
    pub fn new(domain: DomainInfo, owner: Address) -> Self {
        Self {
            domain,
            owner,
            invalidation_checkpoint: DEFAULT_INVALIDATION_CHECKPOINT,
        }
    }

    pub fn with_invalidation_checkpoint(mut self, checkpoint: u64) -> Self {
        self.invalidation_checkpoint = checkpoint;
        self
    }
}

/// Summary returned by `get-contract-info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ContractInfo {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    #[schema(value_type = String)]
    pub owner: Address,
    pub paused: bool,
}

pub struct Authorizer<S = Secp256k1Scheme> {
    domain: DomainSeparator,
    owner: Address,
    invalidation_checkpoint: u64,
    scheme: S,
    clock: Arc<dyn LogicalClock>,
}

impl<S: SignatureScheme> Authorizer<S> {
    pub fn new(config: AuthorizerConfig, scheme: S, clock: Arc<dyn LogicalClock>) -> Self {
        Self {
            domain: DomainSeparator::new(config.domain),
            owner: config.owner,
            invalidation_checkpoint: config.invalidation_checkpoint,
            scheme,
            clock,
        }
    }

    pub fn domain_separator(&self) -> B256 {
        self.domain.separator()
    }

    pub fn chain_id(&self) -> u64 {
        self.domain.chain_id()
    }

    pub fn verifying_entity(&self) -> Address {
        self.domain.info().verifying_entity
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn invalidation_checkpoint(&self) -> u64 {
        self.invalidation_checkpoint
    }

    pub fn contract_name(&self) -> &str {
        &self.domain.info().name
    }

    pub fn contract_version(&self) -> &str {
        &self.domain.info().version
    }

    pub fn contract_info(&self, state: &AuthorizationState) -> ContractInfo {
        ContractInfo {
            name: self.contract_name().to_string(),
            version: self.contract_version().to_string(),
            chain_id: self.chain_id(),
            owner: self.owner,
            paused: state.is_paused(),
        }
    }

    /// Current logical time as seen by deadline checks.
    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    /// Digest a client must sign for the given struct hash.
    pub fn typed_data_hash(&self, struct_hash: &B256) -> B256 {
        typed_data_hash(&self.domain.separator(), struct_hash)
    }

    /// Signing digest of a full message under this domain.
    pub fn signing_digest(&self, message: &AuthorizationMessage) -> B256 {
        message.signing_digest(&self.domain.separator())
    }

    pub fn is_valid_signature(&self, struct_hash: &B256, signature: &[u8], signer: Address) -> bool {
        verify(&self.scheme, &self.typed_data_hash(struct_hash), signature, signer)
    }

    /// Query form of signature verification: an invalid signature is a
    /// successful answer of `false`, never an error.
    pub fn verify_typed_data(
        &self,
        struct_hash: &B256,
        signature: &[u8],
        signer: Address,
    ) -> Result<bool, AuthzError> {
        Ok(self.is_valid_signature(struct_hash, signature, signer))
    }

    pub(crate) fn ensure_active(&self, state: &AuthorizationState) -> Result<(), AuthzError> {
        if state.is_paused() {
            return Err(AuthzError::Paused);
        }
        Ok(())
    }

    pub(crate) fn ensure_owner(&self, caller: Address) -> Result<(), AuthzError> {
        if caller != self.owner {
            warn!(caller = %caller, "non-owner attempted an administrative operation");
            return Err(AuthzError::Unauthorized);
        }
        Ok(())
    }

    pub(crate) fn ensure_not_expired(&self, deadline: u64) -> Result<(), AuthzError> {
        if deadline <= self.clock.now() {
            return Err(AuthzError::Expired);
        }
        Ok(())
    }

    /// Verify that `signer` signed `message` under this domain.
    pub(crate) fn authorize(
        &self,
        message: &AuthorizationMessage,
        signature: &[u8],
        signer: Address,
    ) -> Result<(), AuthzError> {
        let digest = self.signing_digest(message);
        if !verify(&self.scheme, &digest, signature, signer) {
            warn!(
                kind = message.kind(),
                signer = %signer,
                digest = %digest,
                "rejected authorization with invalid signature"
            );
            return Err(AuthzError::InvalidSignature);
        }
        Ok(())
    }
}

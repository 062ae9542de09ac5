// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for engine tests.

use std::sync::Arc;

use alloy::{
    primitives::{Address, B256},
    signers::{local::PrivateKeySigner, SignerSync},
};

use super::{
    clock::ManualClock,
    domain::DomainInfo,
    engine::{Authorizer, AuthorizerConfig},
    executor::InMemoryLedger,
    signature::Secp256k1Scheme,
    store::AuthorizationState,
    typed_data::AuthorizationMessage,
};

pub(crate) const OWNER_KEY: &str =
    "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub(crate) const ALICE_KEY: &str =
    "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
pub(crate) const BOB_KEY: &str =
    "0x5de4111afa1a4b94908f83103eb1f1706367c2e68ca870fc3fb9a804cdab365a";

/// Logical time every fixture starts at.
pub(crate) const START_TIME: u64 = 1_000;

pub(crate) struct Fixture {
    pub authorizer: Authorizer,
    pub state: AuthorizationState,
    pub ledger: InMemoryLedger,
    pub clock: Arc<ManualClock>,
    pub owner: PrivateKeySigner,
    pub alice: PrivateKeySigner,
    pub bob: PrivateKeySigner,
}

impl Fixture {
    pub fn sign(&self, signer: &PrivateKeySigner, message: &AuthorizationMessage) -> Vec<u8> {
        sign_digest(signer, &self.authorizer.signing_digest(message))
    }
}

pub(crate) fn signer(key: &str) -> PrivateKeySigner {
    key.parse().expect("valid test key")
}

pub(crate) fn domain() -> DomainInfo {
    DomainInfo::new(
        "Relational Wallet",
        "1",
        1,
        Address::repeat_byte(0x42),
    )
}

pub(crate) fn fixture() -> Fixture {
    let owner = signer(OWNER_KEY);
    let clock = Arc::new(ManualClock::new(START_TIME));
    let authorizer = Authorizer::new(
        AuthorizerConfig::new(domain(), owner.address()),
        Secp256k1Scheme,
        clock.clone(),
    );

    Fixture {
        authorizer,
        state: AuthorizationState::new(),
        ledger: InMemoryLedger::new(),
        clock,
        owner,
        alice: signer(ALICE_KEY),
        bob: signer(BOB_KEY),
    }
}

pub(crate) fn sign_digest(signer: &PrivateKeySigner, digest: &B256) -> Vec<u8> {
    signer
        .sign_hash_sync(digest)
        .expect("signing succeeds")
        .as_bytes()
        .to_vec()
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Domain separation for typed-data signatures.
//!
//! The separator binds every signature to one deployment: changing the name,
//! version, chain id or verifying entity changes every valid digest.

use alloy::primitives::{keccak256, Address, B256, U256};
use serde::{Deserialize, Serialize};

/// Schema identifier hashed into every domain separator.
pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Immutable deployment identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainInfo {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_entity: Address,
}

impl DomainInfo {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_entity: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_entity,
        }
    }
}

/// Compute the domain separator:
/// `keccak256(typeHash || keccak(name) || keccak(version) || chainId || verifyingEntity)`.
pub fn compute_domain_separator(info: &DomainInfo) -> B256 {
    let mut buf = Vec::with_capacity(5 * 32);
    buf.extend_from_slice(keccak256(DOMAIN_TYPE.as_bytes()).as_slice());
    buf.extend_from_slice(keccak256(info.name.as_bytes()).as_slice());
    buf.extend_from_slice(keccak256(info.version.as_bytes()).as_slice());
    buf.extend_from_slice(&U256::from(info.chain_id).to_be_bytes::<32>());
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(info.verifying_entity.as_slice());
    buf.extend_from_slice(&word);
    keccak256(buf)
}

/// Domain info together with its cached separator.
#[derive(Debug, Clone)]
pub struct DomainSeparator {
    info: DomainInfo,
    separator: B256,
}

impl DomainSeparator {
    pub fn new(info: DomainInfo) -> Self {
        let separator = compute_domain_separator(&info);
        Self { info, separator }
    }

    pub fn info(&self) -> &DomainInfo {
        &self.info
    }

    pub fn separator(&self) -> B256 {
        self.separator
    }

    pub fn chain_id(&self) -> u64 {
        self.info.chain_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;
    use alloy::sol_types::Eip712Domain;

    fn info() -> DomainInfo {
        DomainInfo::new(
            "Relational Wallet",
            "1",
            1,
            address!("1234567890123456789012345678901234567890"),
        )
    }

    #[test]
    fn matches_alloy_domain_hash() {
        let info = info();
        let domain = Eip712Domain::new(
            Some(info.name.clone().into()),
            Some(info.version.clone().into()),
            Some(U256::from(info.chain_id)),
            Some(info.verifying_entity),
            None,
        );

        assert_eq!(compute_domain_separator(&info), domain.separator());
    }

    #[test]
    fn separator_is_deterministic_and_cached() {
        let a = DomainSeparator::new(info());
        let b = DomainSeparator::new(info());
        assert_eq!(a.separator(), b.separator());
        assert_eq!(a.separator().len(), 32);
        assert_eq!(a.chain_id(), 1);
    }

    #[test]
    fn every_field_changes_the_separator() {
        let base = compute_domain_separator(&info());

        let mut renamed = info();
        renamed.name = "Other".into();
        assert_ne!(base, compute_domain_separator(&renamed));

        let mut bumped = info();
        bumped.version = "2".into();
        assert_ne!(base, compute_domain_separator(&bumped));

        let mut forked = info();
        forked.chain_id = 43113;
        assert_ne!(base, compute_domain_separator(&forked));

        let mut moved = info();
        moved.verifying_entity = Address::ZERO;
        assert_ne!(base, compute_domain_separator(&moved));
    }
}

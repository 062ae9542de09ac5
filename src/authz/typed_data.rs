// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Typed-data structs and digest computation.
//!
//! Each authorization kind has a fixed schema. Struct hashing follows the
//! EIP-712 encoding: dynamic `bytes` are hashed by content and struct arrays
//! by the hash of their concatenated member hashes, so payload size never
//! truncates what gets signed and an empty batch still has a defined hash.

use alloy::{
    primitives::{keccak256, Address, Bytes, B256, U256},
    sol,
    sol_types::SolStruct,
};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    struct Permit {
        address owner;
        address spender;
        uint256 value;
        uint256 nonce;
        uint256 deadline;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct MetaTransaction {
        address signer;
        address target;
        uint256 value;
        bytes data;
        uint256 nonce;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Delegation {
        address delegator;
        address delegatee;
        uint256 nonce;
        uint256 expiry;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct Operation {
        address to;
        uint256 value;
        bytes data;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct BatchOperation {
        address signer;
        Operation[] operations;
        uint256 nonce;
    }
}

/// Scheme tag prefixed to every signing digest.
pub const TYPED_DATA_PREFIX: [u8; 2] = [0x19, 0x01];

/// One authorization message, closed over the supported kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationMessage {
    Permit(Permit),
    MetaTransaction(MetaTransaction),
    Delegation(Delegation),
    Batch(BatchOperation),
}

impl AuthorizationMessage {
    pub fn permit(owner: Address, spender: Address, amount: u128, nonce: u64, deadline: u64) -> Self {
        Self::Permit(Permit {
            owner,
            spender,
            value: U256::from(amount),
            nonce: U256::from(nonce),
            deadline: U256::from(deadline),
        })
    }

    pub fn meta_transaction(
        signer: Address,
        target: Address,
        value: u128,
        data: Bytes,
        nonce: u64,
    ) -> Self {
        Self::MetaTransaction(MetaTransaction {
            signer,
            target,
            value: U256::from(value),
            data,
            nonce: U256::from(nonce),
        })
    }

    pub fn delegation(delegator: Address, delegatee: Address, nonce: u64, expiry: u64) -> Self {
        Self::Delegation(Delegation {
            delegator,
            delegatee,
            nonce: U256::from(nonce),
            expiry: U256::from(expiry),
        })
    }

    pub fn batch(signer: Address, operations: Vec<Operation>, nonce: u64) -> Self {
        Self::Batch(BatchOperation {
            signer,
            operations,
            nonce: U256::from(nonce),
        })
    }

    /// Short kind label used in logs and audit events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Permit(_) => "permit",
            Self::MetaTransaction(_) => "meta_transaction",
            Self::Delegation(_) => "delegation",
            Self::Batch(_) => "batch",
        }
    }

    /// Canonical encoded type string, including referenced structs.
    pub fn encode_type(&self) -> String {
        match self {
            Self::Permit(_) => Permit::eip712_encode_type().into_owned(),
            Self::MetaTransaction(_) => MetaTransaction::eip712_encode_type().into_owned(),
            Self::Delegation(_) => Delegation::eip712_encode_type().into_owned(),
            Self::Batch(_) => BatchOperation::eip712_encode_type().into_owned(),
        }
    }

    /// `keccak256(typeHash || encode(F1) || ... || encode(Fn))`.
    pub fn struct_hash(&self) -> B256 {
        match self {
            Self::Permit(m) => m.eip712_hash_struct(),
            Self::MetaTransaction(m) => m.eip712_hash_struct(),
            Self::Delegation(m) => m.eip712_hash_struct(),
            Self::Batch(m) => m.eip712_hash_struct(),
        }
    }

    pub fn signing_digest(&self, domain_separator: &B256) -> B256 {
        typed_data_hash(domain_separator, &self.struct_hash())
    }
}

/// `keccak256(0x19 || 0x01 || domainSeparator || structHash)`.
pub fn typed_data_hash(domain_separator: &B256, struct_hash: &B256) -> B256 {
    let mut buf = Vec::with_capacity(2 + 32 + 32);
    buf.extend_from_slice(&TYPED_DATA_PREFIX);
    buf.extend_from_slice(domain_separator.as_slice());
    buf.extend_from_slice(struct_hash.as_slice());
    keccak256(buf)
}

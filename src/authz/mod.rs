// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorization Engine
//!
//! Verifies signed typed-data authorizations and applies their effects.
//!
//! ## Flow
//!
//! 1. A client builds a typed message (permit, meta-transaction, delegation
//!    or batch) containing its current nonce.
//! 2. It signs `keccak256(0x19 || 0x01 || domainSeparator || structHash)`.
//! 3. The engine rebuilds the digest from the request fields and the signer's
//!    current nonce, recovers the signer, and applies the effect only if the
//!    recovered address matches.
//!
//! ## State
//!
//! All mutable state lives in [`AuthorizationState`], passed explicitly to the
//! processors on [`Authorizer`]. Callers serialize access (the HTTP service
//! holds one write lock per mutation).

pub mod admin;
pub mod batch;
pub mod clock;
pub mod delegation;
pub mod domain;
pub mod engine;
pub mod error;
pub mod executor;
pub mod meta_tx;
pub mod nonce;
pub mod permit;
pub mod signature;
pub mod store;
pub mod typed_data;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{batch_message, BatchExecuted};
pub use clock::{LogicalClock, ManualClock, SystemClock};
pub use delegation::DelegationApplied;
pub use domain::{DomainInfo, DomainSeparator};
pub use engine::{Authorizer, AuthorizerConfig, ContractInfo};
pub use error::AuthzError;
pub use executor::{Call, CallError, CallExecutor, CallReceipt, InMemoryLedger};
pub use meta_tx::MetaTransactionExecuted;
pub use nonce::{NonceRegistry, DEFAULT_INVALIDATION_CHECKPOINT};
pub use permit::PermitApplied;
pub use signature::{Secp256k1Scheme, SignatureScheme};
pub use store::AuthorizationState;
pub use typed_data::AuthorizationMessage;

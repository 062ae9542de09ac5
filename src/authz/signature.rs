// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signature recovery and verification.
//!
//! Recovery is behind the [`SignatureScheme`] trait so the engine does not
//! depend on a specific curve. [`Secp256k1Scheme`] is the production scheme:
//! 65-byte `r || s || v` ECDSA signatures recovered to Ethereum addresses.

use alloy::primitives::{Address, B256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

/// Length of an `r || s || v` signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Recovers the signer identity from a digest and signature.
pub trait SignatureScheme: Send + Sync {
    /// Returns `None` for malformed signatures or failed recovery.
    fn recover(&self, digest: &B256, signature: &[u8]) -> Option<Address>;
}

/// secp256k1 ECDSA with Ethereum address derivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Secp256k1Scheme;

impl SignatureScheme for Secp256k1Scheme {
    fn recover(&self, digest: &B256, signature: &[u8]) -> Option<Address> {
        if signature.len() != SIGNATURE_LENGTH {
            return None;
        }

        let sig = Signature::from_slice(&signature[..64]).ok()?;
        // Reject the high-s twin so each authorization has one valid encoding.
        if sig.normalize_s().is_some() {
            return None;
        }

        let parity = match signature[64] {
            27 | 28 => signature[64] - 27,
            0 | 1 => signature[64],
            _ => return None,
        };
        let recovery_id = RecoveryId::from_byte(parity)?;

        let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &sig, recovery_id).ok()?;
        Some(Address::from_public_key(&key))
    }
}

/// Check that `signature` over `digest` was produced by `claimed_signer`.
///
/// Never errors: malformed input, failed recovery and mismatches all yield
/// `false`. The zero address is never a valid signer.
pub fn verify<S: SignatureScheme + ?Sized>(
    scheme: &S,
    digest: &B256,
    signature: &[u8],
    claimed_signer: Address,
) -> bool {
    if claimed_signer == Address::ZERO {
        return false;
    }
    scheme.recover(digest, signature) == Some(claimed_signer)
}

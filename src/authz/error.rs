// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization failures and their stable numeric codes.

use super::executor::CallError;

/// Caller lacks the administrative or signer role.
pub const ERR_UNAUTHORIZED: u32 = 401;
/// Digest, signature and claimed signer do not verify.
pub const ERR_INVALID_SIGNATURE: u32 = 402;
/// Deadline or expiry has passed relative to logical time.
pub const ERR_EXPIRED: u32 = 403;

/// Failure returned by every mutating engine entry point.
///
/// A returned error guarantees that no nonce, allowance, delegate or
/// proxied-call effect was applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    #[error("caller is not authorized for this operation")]
    Unauthorized,

    #[error("signature does not match the claimed signer")]
    InvalidSignature,

    #[error("authorization has expired")]
    Expired,

    #[error("authorizer is paused")]
    Paused,

    #[error("proxied call failed: {0}")]
    CallFailed(#[from] CallError),
}

impl AuthzError {
    /// Numeric code reported to callers.
    ///
    /// `Paused` reports as `401`: while paused nobody holds the role needed
    /// to mutate state. Proxied call failures report the call ledger's code.
    pub fn code(&self) -> u32 {
        match self {
            AuthzError::Unauthorized | AuthzError::Paused => ERR_UNAUTHORIZED,
            AuthzError::InvalidSignature => ERR_INVALID_SIGNATURE,
            AuthzError::Expired => ERR_EXPIRED,
            AuthzError::CallFailed(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(AuthzError::Unauthorized.code(), 401);
        assert_eq!(AuthzError::InvalidSignature.code(), 402);
        assert_eq!(AuthzError::Expired.code(), 403);
        assert_eq!(AuthzError::Paused.code(), 401);
    }

    #[test]
    fn call_failures_keep_ledger_code() {
        let err = AuthzError::from(CallError::ZeroTarget);
        assert_eq!(err.code(), CallError::ZeroTarget.code());
        assert!(err.to_string().contains("proxied call failed"));
    }
}

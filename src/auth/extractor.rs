// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated callers.
//!
//! ```rust,ignore
//! async fn set_paused(Caller(caller): Caller, ...) -> ... {
//!     // caller.address is the account named by the token's `sub`
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};

use super::{AuthError, AuthenticatedCaller, CallerClaims};
use crate::state::{AppState, AuthConfig};

/// Clock skew tolerance (60 seconds).
const CLOCK_SKEW_LEEWAY: u64 = 60;

/// Extractor for the caller of an owner-only operation.
///
/// It only establishes who is calling; whether that account may perform
/// the operation is decided by the engine.
pub struct Caller(pub AuthenticatedCaller);

impl FromRequestParts<AppState> for Caller {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        verify_token(token, &state.auth_config).map(Caller)
    }
}

/// Verify an HS256 caller token and extract the caller account.
pub fn verify_token(token: &str, config: &AuthConfig) -> Result<AuthenticatedCaller, AuthError> {
    let secret = config.secret.as_deref().ok_or(AuthError::NotConfigured)?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = CLOCK_SKEW_LEEWAY;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp", "sub"]);
    if let Some(ref issuer) = config.issuer {
        validation.set_issuer(&[issuer]);
    }

    let token_data = decode::<CallerClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
        ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
        _ => AuthError::MalformedToken,
    })?;

    let address = token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AuthError::InvalidSubject)?;

    Ok(AuthenticatedCaller { address })
}

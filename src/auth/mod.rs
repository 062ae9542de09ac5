// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Caller Authentication
//!
//! Owner-only operations need to know which account is calling.
//!
//! ## Auth Flow
//!
//! 1. The operator's tooling issues an HS256 token whose `sub` claim is the
//!    caller's account address.
//! 2. The client sends `Authorization: Bearer <token>`.
//! 3. The server verifies signature, expiry and (when configured) issuer,
//!    then hands the address to the engine, which decides whether that
//!    account is the owner.
//!
//! Clock skew tolerance is 60 seconds.

pub mod claims;
pub mod error;
pub mod extractor;

pub use claims::{AuthenticatedCaller, CallerClaims};
pub use error::AuthError;
pub use extractor::{verify_token, Caller};

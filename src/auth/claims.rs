// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Caller token claims.

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Claims carried by a caller token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerClaims {
    /// Caller account address, hex encoded.
    pub sub: String,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Caller identity established from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCaller {
    pub address: Address,
}

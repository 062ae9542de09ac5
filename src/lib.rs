// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Authorizer - Typed-Data Signature Authorization Service
//!
//! Verifies EIP-712 style signed authorizations (permits, meta-transactions,
//! delegations and atomic batches) and applies their effects, with per-account
//! nonces for replay protection and owner-only emergency controls.
//!
//! ## Modules
//!
//! - `authz` - Authorization engine (domain, hashing, signatures, nonces, processors)
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Caller authentication for owner-only routes (HS256 JWT)
//! - `storage` - State snapshot persistence and audit log

pub mod api;
pub mod auth;
pub mod authz;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;

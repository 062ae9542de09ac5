// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage Module
//!
//! Persists the authorization state and the audit log under `DATA_DIR`.
//! Nonces are the source of replay protection, so the state snapshot is
//! rewritten after every applied mutation and reloaded at startup.
//!
//! ## Storage Layout
//!
//! ```text
//! $DATA_DIR/
//!   authorization/
//!     state.json           # nonces, allowances, delegates, pause flag
//!   audit/
//!     {date}/events.jsonl  # Daily audit logs
//! ```

pub mod audit;
pub mod authorization;
pub mod file_store;
pub mod paths;

pub use audit::{AuditEvent, AuditEventType, AuditRepository};
pub use authorization::AuthorizationRepository;
pub use file_store::{FileStorage, StorageError, StorageResult};
pub use paths::StoragePaths;

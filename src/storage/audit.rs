// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Audit logging for authorization attempts and administrative actions.
//!
//! Every mutation request is recorded, whether it was applied or rejected,
//! as one JSON object per line in a daily log file.

use alloy::primitives::Address;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::authz::AuthzError;

use super::{FileStorage, StorageError, StorageResult};

/// Types of auditable events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    Permit,
    MetaTransaction,
    Delegation,
    Batch,

    // Admin events
    PauseChanged,
    NonceInvalidated,
    LedgerFunded,
    AuditQueried,
}

/// An audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuditEvent {
    pub event_id: String,
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: DateTime<Utc>,
    pub event_type: AuditEventType,
    /// Signer or administrative caller that initiated the request.
    #[schema(value_type = Option<String>)]
    pub actor: Option<Address>,
    /// Operation outcome, as returned to the client.
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
    pub success: bool,
    pub error: Option<String>,
    /// Stable engine error code when rejected.
    pub code: Option<u32>,
}

impl AuditEvent {
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type,
            actor: None,
            details: None,
            success: true,
            error: None,
            code: None,
        }
    }

    pub fn with_actor(mut self, actor: Address) -> Self {
        self.actor = Some(actor);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Mark as rejected by the engine.
    pub fn failed(mut self, error: &AuthzError) -> Self {
        self.success = false;
        self.error = Some(error.to_string());
        self.code = Some(error.code());
        self
    }

    /// Build an event from an engine outcome.
    pub fn from_outcome<T: Serialize>(
        event_type: AuditEventType,
        actor: Address,
        outcome: &Result<T, AuthzError>,
    ) -> Self {
        let event = Self::new(event_type).with_actor(actor);
        match outcome {
            Ok(value) => match serde_json::to_value(value) {
                Ok(details) => event.with_details(details),
                Err(_) => event,
            },
            Err(e) => event.failed(e),
        }
    }
}

/// Repository for audit events.
pub struct AuditRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> AuditRepository<'a> {
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Append an event to the log file of its day.
    pub fn log(&self, event: &AuditEvent) -> StorageResult<()> {
        let date = event.timestamp.format("%Y-%m-%d").to_string();
        let path = self.storage.paths().audit_events_file(&date);
        let line = serde_json::to_string(event)?;
        self.storage.append_line(&path, &line)
    }

    /// Read audit events for a specific date (`YYYY-MM-DD`).
    pub fn read_events(&self, date: &str) -> StorageResult<Vec<AuditEvent>> {
        let path = self.storage.paths().audit_events_file(date);
        let content = self.storage.read_to_string(&path)?;

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(StorageError::from))
            .collect()
    }

    /// Read events for an inclusive date range. Days without a log are skipped.
    pub fn read_events_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> StorageResult<Vec<AuditEvent>> {
        let mut all_events = Vec::new();
        for day in start.iter_days().take_while(|d| *d <= end) {
            let date = day.format("%Y-%m-%d").to_string();
            match self.read_events(&date) {
                Ok(events) => all_events.extend(events),
                Err(StorageError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(all_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStorage) {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(StoragePaths::new(temp.path()));
        storage.initialize().unwrap();
        (temp, storage)
    }

    #[test]
    fn outcome_maps_to_event() {
        let signer = Address::repeat_byte(0xaa);

        let ok: Result<u64, AuthzError> = Ok(7);
        let event = AuditEvent::from_outcome(AuditEventType::Permit, signer, &ok);
        assert!(event.success);
        assert_eq!(event.actor, Some(signer));
        assert_eq!(event.details, Some(serde_json::json!(7)));

        let rejected: Result<u64, AuthzError> = Err(AuthzError::Expired);
        let event = AuditEvent::from_outcome(AuditEventType::Delegation, signer, &rejected);
        assert!(!event.success);
        assert_eq!(event.code, Some(403));
        assert!(event.details.is_none());
    }

    #[test]
    fn log_and_read_events() {
        let (_temp, storage) = setup();
        let repo = AuditRepository::new(&storage);
        let admin = Address::repeat_byte(0x01);

        repo.log(&AuditEvent::new(AuditEventType::PauseChanged).with_actor(admin))
            .unwrap();
        repo.log(
            &AuditEvent::new(AuditEventType::NonceInvalidated)
                .with_actor(admin)
                .failed(&AuthzError::Paused),
        )
        .unwrap();

        let today = Utc::now().format("%Y-%m-%d").to_string();
        let events = repo.read_events(&today).unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, AuditEventType::PauseChanged);
        assert_eq!(events[1].event_type, AuditEventType::NonceInvalidated);
        assert_eq!(events[1].code, Some(401));
    }

    #[test]
    fn range_skips_days_without_logs() {
        let (_temp, storage) = setup();
        let repo = AuditRepository::new(&storage);
        repo.log(&AuditEvent::new(AuditEventType::Batch)).unwrap();

        let today = Utc::now().date_naive();
        let start = today - chrono::Days::new(3);
        let events = repo.read_events_range(start, today).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, AuditEventType::Batch);
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use alloy::primitives::Address;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::warn;

use crate::{
    authz::{AuthorizationState, Authorizer, AuthzError, InMemoryLedger},
    error::ApiError,
    storage::{AuditEvent, AuditEventType, AuditRepository, AuthorizationRepository, FileStorage, StorageResult},
};

/// Caller token verification settings.
///
/// Without a secret, routes that need an authenticated caller are disabled.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// HS256 secret shared with the token issuer.
    pub secret: Option<String>,
    /// Expected `iss` claim.
    pub issuer: Option<String>,
}

/// Mutable engine data, guarded by a single lock.
#[derive(Debug, Default)]
pub struct EngineState {
    pub authorization: AuthorizationState,
    pub ledger: InMemoryLedger,
}

#[derive(Clone)]
pub struct AppState {
    pub authorizer: Arc<Authorizer>,
    /// Every mutation takes the write half for its whole duration.
    pub engine: Arc<RwLock<EngineState>>,
    pub storage: Option<Arc<FileStorage>>,
    pub auth_config: AuthConfig,
}

impl AppState {
    pub fn new(authorizer: Authorizer, authorization: AuthorizationState) -> Self {
        Self {
            authorizer: Arc::new(authorizer),
            engine: Arc::new(RwLock::new(EngineState {
                authorization,
                ledger: InMemoryLedger::new(),
            })),
            storage: None,
            auth_config: AuthConfig::default(),
        }
    }

    pub fn with_storage(mut self, storage: FileStorage) -> Self {
        self.storage = Some(Arc::new(storage));
        self
    }

    pub fn with_auth_config(mut self, auth_config: AuthConfig) -> Self {
        self.auth_config = auth_config;
        self
    }

    /// Write the authorization snapshot. No-op without storage.
    pub fn persist(&self, state: &AuthorizationState) -> StorageResult<()> {
        match &self.storage {
            Some(storage) => AuthorizationRepository::new(storage).save(state),
            None => Ok(()),
        }
    }

    /// Persist after the engine applied an operation that advanced
    /// `account`'s nonce. A failure tells the client the nonce is spent.
    pub fn persist_applied(
        &self,
        state: &AuthorizationState,
        account: Address,
    ) -> Result<(), ApiError> {
        self.persist(state)
            .map_err(|e| ApiError::not_persisted(e, account, state.nonce(account)))
    }

    /// Record an engine outcome in the audit log. Failures are logged, not
    /// returned: the operation itself already succeeded or failed.
    pub fn audit<T: Serialize>(
        &self,
        event_type: AuditEventType,
        actor: Address,
        outcome: &Result<T, AuthzError>,
    ) {
        let Some(storage) = &self.storage else {
            return;
        };
        let event = AuditEvent::from_outcome(event_type, actor, outcome);
        if let Err(e) = AuditRepository::new(storage).log(&event) {
            warn!(error = %e, event_id = %event.event_id, "failed to write audit event");
        }
    }
}

#[cfg(test)]
impl AppState {
    /// Fresh state with the engine test fixture's domain and owner.
    pub(crate) fn for_tests() -> Self {
        use crate::authz::{
            testing::{domain, signer, OWNER_KEY, START_TIME},
            AuthorizerConfig, ManualClock, Secp256k1Scheme,
        };

        let authorizer = Authorizer::new(
            AuthorizerConfig::new(domain(), signer(OWNER_KEY).address()),
            Secp256k1Scheme,
            Arc::new(ManualClock::new(START_TIME)),
        );
        Self::new(authorizer, AuthorizationState::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use tempfile::TempDir;

    #[test]
    fn persist_without_storage_is_noop() {
        let state = AppState::for_tests();
        assert!(state.persist(&AuthorizationState::new()).is_ok());
        state.audit::<()>(AuditEventType::Batch, Address::ZERO, &Err(AuthzError::Paused));
    }

    #[tokio::test]
    async fn persist_writes_snapshot() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(StoragePaths::new(temp.path()));
        storage.initialize().unwrap();
        let state = AppState::for_tests().with_storage(storage);

        {
            let mut engine = state.engine.write().await;
            engine.authorization.paused = true;
            state.persist(&engine.authorization).unwrap();
        }

        let storage = state.storage.as_ref().unwrap();
        let saved = AuthorizationRepository::new(storage).load().unwrap().unwrap();
        assert!(saved.is_paused());
    }

    #[tokio::test]
    async fn failed_snapshot_write_reports_applied_nonce() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(StoragePaths::new(temp.path()));
        storage.initialize().unwrap();
        // A plain file where the snapshot directory belongs makes every write fail.
        let dir = storage.paths().authorization_dir();
        std::fs::remove_dir_all(&dir).ok();
        std::fs::write(&dir, b"not a directory").unwrap();
        let state = AppState::for_tests().with_storage(storage);

        let account = Address::repeat_byte(0x22);
        let mut authorization = AuthorizationState::new();
        authorization.nonces.consume(account, 0).unwrap();

        let err = state.persist_applied(&authorization, account).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.nonce, Some(1));
        assert!(err.message.contains(&account.to_string()));
    }
}

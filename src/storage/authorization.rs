// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Snapshot persistence for [`AuthorizationState`].

use crate::authz::AuthorizationState;

use super::{FileStorage, StorageResult};

pub struct AuthorizationRepository<'a> {
    storage: &'a FileStorage,
}

impl<'a> AuthorizationRepository<'a> {
    pub fn new(storage: &'a FileStorage) -> Self {
        Self { storage }
    }

    /// Load the last saved snapshot, if any.
    pub fn load(&self) -> StorageResult<Option<AuthorizationState>> {
        self.storage
            .read_json_if_exists(self.storage.paths().authorization_state())
    }

    pub fn save(&self, state: &AuthorizationState) -> StorageResult<()> {
        self.storage
            .write_json(self.storage.paths().authorization_state(), state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoragePaths;
    use alloy::primitives::Address;
    use tempfile::TempDir;

    #[test]
    fn snapshot_survives_reload() {
        let temp = TempDir::new().unwrap();
        let mut storage = FileStorage::new(StoragePaths::new(temp.path()));
        storage.initialize().unwrap();
        let repo = AuthorizationRepository::new(&storage);
        assert!(repo.load().unwrap().is_none());

        let owner = Address::repeat_byte(0x01);
        let spender = Address::repeat_byte(0x02);
        let mut state = AuthorizationState::new();
        state.nonces.consume(owner, 0).unwrap();
        state.set_allowance(owner, spender, u128::MAX);
        state.set_delegate(owner, spender);
        state.paused = true;
        repo.save(&state).unwrap();

        let reloaded = AuthorizationRepository::new(&storage).load().unwrap().unwrap();
        assert_eq!(reloaded, state);
        assert_eq!(reloaded.nonce(owner), 1);
        assert_eq!(reloaded.allowance(owner, spender), u128::MAX);
        assert!(reloaded.is_paused());
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Atomic batches authorized by a single signature.
//!
//! The signature covers the whole ordered list, empty lists included, and is
//! checked before any operation is looked at. The list is staged in full and
//! committed only if every operation succeeds; one nonce is consumed per batch.

use alloy::primitives::{Address, U256};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use super::{
    engine::Authorizer,
    error::AuthzError,
    executor::{Call, CallExecutor, CallReceipt},
    signature::SignatureScheme,
    store::AuthorizationState,
    typed_data::{AuthorizationMessage, Operation},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BatchExecuted {
    #[schema(value_type = String)]
    pub signer: Address,
    pub nonce: u64,
    /// One receipt per operation, in list order.
    pub receipts: Vec<CallReceipt>,
}

/// Typed-data form of a batch as the signer signs it.
pub fn batch_message(signer: Address, operations: &[Call], nonce: u64) -> AuthorizationMessage {
    let operations = operations
        .iter()
        .map(|op| Operation {
            to: op.to,
            value: U256::from(op.value),
            data: op.data.clone(),
        })
        .collect();
    AuthorizationMessage::batch(signer, operations, nonce)
}

impl<S: SignatureScheme> Authorizer<S> {
    pub fn execute_batch<E: CallExecutor>(
        &self,
        state: &mut AuthorizationState,
        executor: &mut E,
        signer: Address,
        operations: &[Call],
        signature: &[u8],
    ) -> Result<BatchExecuted, AuthzError> {
        self.ensure_active(state)?;

        let nonce = state.nonce(signer);
        let message = batch_message(signer, operations, nonce);
        self.authorize(&message, signature, signer)?;

        let staged = executor.stage(signer, operations)?;

        state.nonces.consume(signer, nonce)?;
        let receipts = executor.commit(staged);

        info!(
            signer = %signer,
            nonce,
            operations = operations.len(),
            "batch executed"
        );
        Ok(BatchExecuted {
            signer,
            nonce,
            receipts,
        })
    }
}

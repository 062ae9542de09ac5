// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Meta-transactions: a relayer submits a call the signer authorized.

use alloy::primitives::{Address, Bytes};
use serde::Serialize;
use tracing::info;
use utoipa::ToSchema;

use super::{
    engine::Authorizer,
    error::AuthzError,
    executor::{Call, CallExecutor, CallReceipt},
    signature::SignatureScheme,
    store::AuthorizationState,
    typed_data::AuthorizationMessage,
};

/// Effect of an executed meta-transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MetaTransactionExecuted {
    #[schema(value_type = String)]
    pub signer: Address,
    pub nonce: u64,
    /// Receipts reported by the call ledger for the proxied call.
    pub receipts: Vec<CallReceipt>,
}

impl<S: SignatureScheme> Authorizer<S> {
    /// Execute `(target, value, data)` as if `signer` had called it directly.
    #[allow(clippy::too_many_arguments)]
    pub fn execute_meta_transaction<E: CallExecutor>(
        &self,
        state: &mut AuthorizationState,
        executor: &mut E,
        signer: Address,
        target: Address,
        value: u128,
        data: Bytes,
        signature: &[u8],
    ) -> Result<MetaTransactionExecuted, AuthzError> {
        self.ensure_active(state)?;

        let nonce = state.nonce(signer);
        let message =
            AuthorizationMessage::meta_transaction(signer, target, value, data.clone(), nonce);
        self.authorize(&message, signature, signer)?;

        let call = Call {
            to: target,
            value,
            data,
        };
        let staged = executor.stage(signer, std::slice::from_ref(&call))?;

        state.nonces.consume(signer, nonce)?;
        let receipts = executor.commit(staged);

        info!(
            signer = %signer,
            target = %target,
            value,
            nonce,
            data_len = call.data.len(),
            "meta-transaction executed"
        );
        Ok(MetaTransactionExecuted {
            signer,
            nonce,
            receipts,
        })
    }
}

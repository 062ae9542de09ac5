// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed authorization submission.
//!
//! Each handler holds the engine write lock for the whole operation, so
//! nonce reads, checks and effects never interleave with another request.
//! Outcomes are audited whether applied or rejected; applied outcomes are
//! persisted before the response is sent. A failed snapshot write returns
//! `500` carrying the signer's advanced nonce: the signature is already spent.

use alloy::primitives::{Address, Bytes};
use axum::{extract::State, Json};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    authz::{BatchExecuted, Call, DelegationApplied, MetaTransactionExecuted, PermitApplied},
    error::{ApiError, ErrorBody},
    state::{AppState, EngineState},
    storage::AuditEventType,
};

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct PermitRequest {
    #[schema(value_type = String)]
    pub owner: Address,
    #[schema(value_type = String)]
    pub spender: Address,
    pub amount: u128,
    /// Logical time (seconds) after which the permit is void.
    pub deadline: u64,
    /// 65-byte `r || s || v` signature, `0x`-prefixed hex.
    #[schema(value_type = String)]
    pub signature: Bytes,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MetaTransactionRequest {
    #[schema(value_type = String)]
    pub signer: Address,
    #[schema(value_type = String)]
    pub target: Address,
    #[serde(default)]
    pub value: u128,
    #[serde(default)]
    #[schema(value_type = String)]
    pub data: Bytes,
    #[schema(value_type = String)]
    pub signature: Bytes,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DelegationRequest {
    #[schema(value_type = String)]
    pub delegator: Address,
    #[schema(value_type = String)]
    pub delegatee: Address,
    pub expiry: u64,
    #[schema(value_type = String)]
    pub signature: Bytes,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchRequest {
    #[schema(value_type = String)]
    pub signer: Address,
    /// Executed in order; all or nothing.
    pub operations: Vec<Call>,
    #[schema(value_type = String)]
    pub signature: Bytes,
}

// ============================================================================
// Handlers
// ============================================================================

#[utoipa::path(
    post,
    path = "/v1/permits",
    tag = "Authorizations",
    request_body = PermitRequest,
    responses(
        (status = 200, description = "Allowance set", body = PermitApplied),
        (status = 400, description = "Permit expired (code 403)", body = ErrorBody),
        (status = 422, description = "Invalid signature (code 402)", body = ErrorBody),
        (status = 500, description = "Applied but not persisted (carries the next nonce)", body = ErrorBody),
        (status = 503, description = "Authorizer paused (code 401)", body = ErrorBody)
    )
)]
pub async fn submit_permit(
    State(state): State<AppState>,
    Json(request): Json<PermitRequest>,
) -> Result<Json<PermitApplied>, ApiError> {
    let mut engine = state.engine.write().await;
    let outcome = state.authorizer.permit(
        &mut engine.authorization,
        request.owner,
        request.spender,
        request.amount,
        request.deadline,
        &request.signature,
    );
    state.audit(AuditEventType::Permit, request.owner, &outcome);

    let applied = outcome?;
    state.persist_applied(&engine.authorization, request.owner)?;
    Ok(Json(applied))
}

#[utoipa::path(
    post,
    path = "/v1/meta-transactions",
    tag = "Authorizations",
    request_body = MetaTransactionRequest,
    responses(
        (status = 200, description = "Call executed on behalf of the signer", body = MetaTransactionExecuted),
        (status = 409, description = "Proxied call failed (ledger code)", body = ErrorBody),
        (status = 422, description = "Invalid signature (code 402)", body = ErrorBody),
        (status = 500, description = "Applied but not persisted (carries the next nonce)", body = ErrorBody),
        (status = 503, description = "Authorizer paused (code 401)", body = ErrorBody)
    )
)]
pub async fn submit_meta_transaction(
    State(state): State<AppState>,
    Json(request): Json<MetaTransactionRequest>,
) -> Result<Json<MetaTransactionExecuted>, ApiError> {
    let mut guard = state.engine.write().await;
    let EngineState {
        authorization,
        ledger,
    } = &mut *guard;

    let outcome = state.authorizer.execute_meta_transaction(
        authorization,
        ledger,
        request.signer,
        request.target,
        request.value,
        request.data,
        &request.signature,
    );
    state.audit(AuditEventType::MetaTransaction, request.signer, &outcome);

    let executed = outcome?;
    state.persist_applied(authorization, request.signer)?;
    Ok(Json(executed))
}

#[utoipa::path(
    post,
    path = "/v1/delegations",
    tag = "Authorizations",
    request_body = DelegationRequest,
    responses(
        (status = 200, description = "Delegate assigned", body = DelegationApplied),
        (status = 400, description = "Delegation expired (code 403)", body = ErrorBody),
        (status = 422, description = "Invalid signature (code 402)", body = ErrorBody),
        (status = 500, description = "Applied but not persisted (carries the next nonce)", body = ErrorBody),
        (status = 503, description = "Authorizer paused (code 401)", body = ErrorBody)
    )
)]
pub async fn submit_delegation(
    State(state): State<AppState>,
    Json(request): Json<DelegationRequest>,
) -> Result<Json<DelegationApplied>, ApiError> {
    let mut engine = state.engine.write().await;
    let outcome = state.authorizer.delegate_by_sig(
        &mut engine.authorization,
        request.delegator,
        request.delegatee,
        request.expiry,
        &request.signature,
    );
    state.audit(AuditEventType::Delegation, request.delegator, &outcome);

    let applied = outcome?;
    state.persist_applied(&engine.authorization, request.delegator)?;
    Ok(Json(applied))
}

#[utoipa::path(
    post,
    path = "/v1/batches",
    tag = "Authorizations",
    request_body = BatchRequest,
    responses(
        (status = 200, description = "All operations executed", body = BatchExecuted),
        (status = 409, description = "An operation failed; nothing applied", body = ErrorBody),
        (status = 422, description = "Invalid signature (code 402)", body = ErrorBody),
        (status = 500, description = "Applied but not persisted (carries the next nonce)", body = ErrorBody),
        (status = 503, description = "Authorizer paused (code 401)", body = ErrorBody)
    )
)]
pub async fn submit_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchExecuted>, ApiError> {
    let mut guard = state.engine.write().await;
    let EngineState {
        authorization,
        ledger,
    } = &mut *guard;

    let outcome = state.authorizer.execute_batch(
        authorization,
        ledger,
        request.signer,
        &request.operations,
        &request.signature,
    );
    state.audit(AuditEventType::Batch, request.signer, &outcome);

    let executed = outcome?;
    state.persist_applied(authorization, request.signer)?;
    Ok(Json(executed))
}

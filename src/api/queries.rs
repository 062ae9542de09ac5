// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Read-only endpoints: domain parameters, per-account state and
//! signature checks. None of these change state.

use alloy::primitives::{Address, Bytes, B256};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{authz::ContractInfo, error::{ApiError, ErrorBody}, state::AppState};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, ToSchema)]
pub struct DomainResponse {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    #[schema(value_type = String)]
    pub verifying_contract: Address,
    /// Domain separator, `0x`-prefixed hex.
    #[schema(value_type = String)]
    pub separator: B256,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SeparatorResponse {
    #[schema(value_type = String)]
    pub separator: B256,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChainIdResponse {
    pub chain_id: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NameResponse {
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VersionResponse {
    pub version: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PausedResponse {
    pub paused: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NonceResponse {
    #[schema(value_type = String)]
    pub account: Address,
    pub nonce: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    #[schema(value_type = String)]
    pub account: Address,
    /// Native balance on the proxied-call ledger.
    pub balance: u128,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AllowanceResponse {
    #[schema(value_type = String)]
    pub owner: Address,
    #[schema(value_type = String)]
    pub spender: Address,
    pub amount: u128,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DelegateResponse {
    #[schema(value_type = String)]
    pub account: Address,
    /// `null` when no delegate was ever assigned.
    #[schema(value_type = Option<String>)]
    pub delegate: Option<Address>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TypedDataHashRequest {
    #[schema(value_type = String)]
    pub struct_hash: B256,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TypedDataHashResponse {
    /// Digest a client signs for this struct hash.
    #[schema(value_type = String)]
    pub digest: B256,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignatureCheckRequest {
    #[schema(value_type = String)]
    pub struct_hash: B256,
    #[schema(value_type = String)]
    pub signature: Bytes,
    #[schema(value_type = String)]
    pub signer: Address,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SignatureCheckResponse {
    pub valid: bool,
}

// ============================================================================
// Handlers
// ============================================================================

#[utoipa::path(
    get,
    path = "/v1/domain",
    tag = "Domain",
    responses((status = 200, description = "Signing domain", body = DomainResponse))
)]
pub async fn get_domain(State(state): State<AppState>) -> Json<DomainResponse> {
    let authorizer = &state.authorizer;
    Json(DomainResponse {
        name: authorizer.contract_name().to_string(),
        version: authorizer.contract_version().to_string(),
        chain_id: authorizer.chain_id(),
        verifying_contract: authorizer.verifying_entity(),
        separator: authorizer.domain_separator(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/domain/separator",
    tag = "Domain",
    responses((status = 200, description = "Domain separator", body = SeparatorResponse))
)]
pub async fn get_domain_separator(State(state): State<AppState>) -> Json<SeparatorResponse> {
    Json(SeparatorResponse {
        separator: state.authorizer.domain_separator(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/domain/chain-id",
    tag = "Domain",
    responses((status = 200, description = "Chain identifier", body = ChainIdResponse))
)]
pub async fn get_chain_id(State(state): State<AppState>) -> Json<ChainIdResponse> {
    Json(ChainIdResponse {
        chain_id: state.authorizer.chain_id(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/contract/info",
    tag = "Domain",
    responses((status = 200, description = "Authorizer summary", body = ContractInfo))
)]
pub async fn get_contract_info(State(state): State<AppState>) -> Json<ContractInfo> {
    let engine = state.engine.read().await;
    Json(state.authorizer.contract_info(&engine.authorization))
}

#[utoipa::path(
    get,
    path = "/v1/contract/name",
    tag = "Domain",
    responses((status = 200, description = "Domain name", body = NameResponse))
)]
pub async fn get_contract_name(State(state): State<AppState>) -> Json<NameResponse> {
    Json(NameResponse {
        name: state.authorizer.contract_name().to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/contract/version",
    tag = "Domain",
    responses((status = 200, description = "Domain version", body = VersionResponse))
)]
pub async fn get_contract_version(State(state): State<AppState>) -> Json<VersionResponse> {
    Json(VersionResponse {
        version: state.authorizer.contract_version().to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/v1/paused",
    tag = "Domain",
    responses((status = 200, description = "Pause flag", body = PausedResponse))
)]
pub async fn get_paused(State(state): State<AppState>) -> Json<PausedResponse> {
    let engine = state.engine.read().await;
    Json(PausedResponse {
        paused: state.authorizer.is_paused(&engine.authorization),
    })
}

#[utoipa::path(
    get,
    path = "/v1/nonces/{account}",
    tag = "Accounts",
    params(("account" = String, Path, description = "Account address")),
    responses(
        (status = 200, description = "Next expected nonce", body = NonceResponse),
        (status = 400, description = "Malformed address")
    )
)]
pub async fn get_nonce(
    State(state): State<AppState>,
    Path(account): Path<Address>,
) -> Json<NonceResponse> {
    let engine = state.engine.read().await;
    Json(NonceResponse {
        account,
        nonce: engine.authorization.nonce(account),
    })
}

#[utoipa::path(
    get,
    path = "/v1/allowances/{owner}/{spender}",
    tag = "Accounts",
    params(
        ("owner" = String, Path, description = "Owner address"),
        ("spender" = String, Path, description = "Spender address")
    ),
    responses(
        (status = 200, description = "Current allowance", body = AllowanceResponse),
        (status = 400, description = "Malformed address")
    )
)]
pub async fn get_allowance(
    State(state): State<AppState>,
    Path((owner, spender)): Path<(Address, Address)>,
) -> Json<AllowanceResponse> {
    let engine = state.engine.read().await;
    Json(AllowanceResponse {
        owner,
        spender,
        amount: engine.authorization.allowance(owner, spender),
    })
}

#[utoipa::path(
    get,
    path = "/v1/delegates/{account}",
    tag = "Accounts",
    params(("account" = String, Path, description = "Delegator address")),
    responses(
        (status = 200, description = "Current delegate", body = DelegateResponse),
        (status = 400, description = "Malformed address")
    )
)]
pub async fn get_delegate(
    State(state): State<AppState>,
    Path(account): Path<Address>,
) -> Json<DelegateResponse> {
    let engine = state.engine.read().await;
    Json(DelegateResponse {
        account,
        delegate: engine.authorization.delegate(account),
    })
}

#[utoipa::path(
    get,
    path = "/v1/ledger/balances/{account}",
    tag = "Accounts",
    params(("account" = String, Path, description = "Account address")),
    responses(
        (status = 200, description = "Ledger balance", body = BalanceResponse),
        (status = 400, description = "Malformed address")
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(account): Path<Address>,
) -> Json<BalanceResponse> {
    let engine = state.engine.read().await;
    Json(BalanceResponse {
        account,
        balance: engine.ledger.balance_of(account),
    })
}

#[utoipa::path(
    post,
    path = "/v1/typed-data/hash",
    tag = "Signatures",
    request_body = TypedDataHashRequest,
    responses((status = 200, description = "Signing digest", body = TypedDataHashResponse))
)]
pub async fn typed_data_hash(
    State(state): State<AppState>,
    Json(request): Json<TypedDataHashRequest>,
) -> Json<TypedDataHashResponse> {
    Json(TypedDataHashResponse {
        digest: state.authorizer.typed_data_hash(&request.struct_hash),
    })
}

/// Boolean signature check. Invalid input answers `false`.
#[utoipa::path(
    post,
    path = "/v1/signatures/valid",
    tag = "Signatures",
    request_body = SignatureCheckRequest,
    responses((status = 200, description = "Whether the signature is valid", body = SignatureCheckResponse))
)]
pub async fn is_valid_signature(
    State(state): State<AppState>,
    Json(request): Json<SignatureCheckRequest>,
) -> Json<SignatureCheckResponse> {
    Json(SignatureCheckResponse {
        valid: state.authorizer.is_valid_signature(
            &request.struct_hash,
            &request.signature,
            request.signer,
        ),
    })
}

#[utoipa::path(
    post,
    path = "/v1/signatures/verify",
    tag = "Signatures",
    request_body = SignatureCheckRequest,
    responses(
        (status = 200, description = "Verification result", body = SignatureCheckResponse),
        (status = 400, description = "Verification could not run", body = ErrorBody)
    )
)]
pub async fn verify_typed_data(
    State(state): State<AppState>,
    Json(request): Json<SignatureCheckRequest>,
) -> Result<Json<SignatureCheckResponse>, ApiError> {
    let valid = state.authorizer.verify_typed_data(
        &request.struct_hash,
        &request.signature,
        request.signer,
    )?;
    Ok(Json(SignatureCheckResponse { valid }))
}

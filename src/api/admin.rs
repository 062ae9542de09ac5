// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Owner-only endpoints: pause switch, emergency nonce invalidation,
//! ledger funding and audit log queries.
//!
//! The `Caller` extractor identifies the account; the engine decides whether
//! it is the owner. A non-owner caller gets `403` with code 401.

use alloy::primitives::Address;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::{
    auth::Caller,
    error::{ApiError, ErrorBody},
    state::{AppState, EngineState},
    storage::{AuditEvent, AuditEventType, AuditRepository},
};

/// Widest date range a single audit query may cover.
const MAX_AUDIT_RANGE_DAYS: i64 = 31;
const DEFAULT_AUDIT_LIMIT: usize = 100;
const MAX_AUDIT_LIMIT: usize = 1000;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetPausedRequest {
    pub paused: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SetPausedResponse {
    pub paused: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvalidatedNonceResponse {
    #[schema(value_type = String)]
    pub account: Address,
    /// New next-expected nonce.
    pub nonce: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FundAccountRequest {
    pub amount: u128,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FundAccountResponse {
    #[schema(value_type = String)]
    pub account: Address,
    /// Ledger balance after the credit.
    pub balance: u128,
}

/// Query parameters for audit log queries.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuditQueryParams {
    /// Start date (YYYY-MM-DD). Defaults to today.
    pub start_date: Option<String>,
    /// End date (YYYY-MM-DD), inclusive. Defaults to today.
    pub end_date: Option<String>,
    /// Filter by event type, e.g. `permit` or `pause_changed`.
    #[param(value_type = Option<String>)]
    pub event_type: Option<AuditEventType>,
    /// Filter by signer or administrative caller.
    #[param(value_type = Option<String>)]
    pub actor: Option<Address>,
    /// Maximum number of results (default 100, max 1000).
    pub limit: Option<usize>,
    /// Offset for pagination.
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditLogResponse {
    /// Matching events, oldest first.
    pub events: Vec<AuditEvent>,
    /// Match count before limit/offset.
    pub total: usize,
    pub has_more: bool,
}

#[utoipa::path(
    post,
    path = "/v1/admin/paused",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = SetPausedRequest,
    responses(
        (status = 200, description = "Pause flag updated", body = SetPausedResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not the owner (code 401)", body = ErrorBody)
    )
)]
pub async fn set_paused(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Json(request): Json<SetPausedRequest>,
) -> Result<Json<SetPausedResponse>, ApiError> {
    let mut engine = state.engine.write().await;
    let outcome =
        state
            .authorizer
            .set_paused(&mut engine.authorization, caller.address, request.paused);
    state.audit(AuditEventType::PauseChanged, caller.address, &outcome);

    let paused = outcome?;
    state.persist(&engine.authorization)?;
    Ok(Json(SetPausedResponse { paused }))
}

#[utoipa::path(
    post,
    path = "/v1/admin/nonces/{account}/invalidate",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("account" = String, Path, description = "Account whose signatures are revoked")),
    responses(
        (status = 200, description = "Nonce moved to the checkpoint", body = InvalidatedNonceResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not the owner (code 401)", body = ErrorBody),
        (status = 503, description = "Authorizer paused (code 401)", body = ErrorBody)
    )
)]
pub async fn invalidate_nonce(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(account): Path<Address>,
) -> Result<Json<InvalidatedNonceResponse>, ApiError> {
    let mut engine = state.engine.write().await;
    let outcome = state.authorizer.emergency_invalidate_nonce(
        &mut engine.authorization,
        caller.address,
        account,
    );
    state.audit(AuditEventType::NonceInvalidated, caller.address, &outcome);

    let nonce = outcome?;
    state.persist_applied(&engine.authorization, account)?;
    Ok(Json(InvalidatedNonceResponse { account, nonce }))
}

#[utoipa::path(
    post,
    path = "/v1/admin/ledger/{account}/credit",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("account" = String, Path, description = "Account to fund")),
    request_body = FundAccountRequest,
    responses(
        (status = 200, description = "Balance credited", body = FundAccountResponse),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not the owner (code 401)", body = ErrorBody),
        (status = 409, description = "Zero address (code 3)", body = ErrorBody),
        (status = 503, description = "Authorizer paused (code 401)", body = ErrorBody)
    )
)]
pub async fn fund_account(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Path(account): Path<Address>,
    Json(request): Json<FundAccountRequest>,
) -> Result<Json<FundAccountResponse>, ApiError> {
    let mut guard = state.engine.write().await;
    let EngineState {
        authorization,
        ledger,
    } = &mut *guard;

    let outcome = state.authorizer.fund_account(
        authorization,
        ledger,
        caller.address,
        account,
        request.amount,
    );
    state.audit(AuditEventType::LedgerFunded, caller.address, &outcome);

    let balance = outcome?;
    Ok(Json(FundAccountResponse { account, balance }))
}

fn parse_date(
    value: Option<&str>,
    field: &str,
    default: NaiveDate,
) -> Result<NaiveDate, ApiError> {
    match value {
        None => Ok(default),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            ApiError::bad_request(format!("Invalid {field} format. Use YYYY-MM-DD."))
        }),
    }
}

#[utoipa::path(
    get,
    path = "/v1/admin/audit/events",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(AuditQueryParams),
    responses(
        (status = 200, description = "Audit events", body = AuditLogResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorBody),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Caller is not the owner (code 401)", body = ErrorBody),
        (status = 503, description = "Running without DATA_DIR", body = ErrorBody)
    )
)]
pub async fn query_audit_events(
    Caller(caller): Caller,
    State(state): State<AppState>,
    Query(params): Query<AuditQueryParams>,
) -> Result<Json<AuditLogResponse>, ApiError> {
    let authorized = state.authorizer.ensure_owner(caller.address);
    if authorized.is_err() {
        state.audit(AuditEventType::AuditQueried, caller.address, &authorized);
    }
    authorized.clone()?;

    let Some(storage) = state.storage.as_ref() else {
        return Err(ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Audit log is not available without DATA_DIR",
        ));
    };

    let today = Utc::now().date_naive();
    let start = parse_date(params.start_date.as_deref(), "start_date", today)?;
    let end = parse_date(params.end_date.as_deref(), "end_date", today)?;
    if end < start {
        return Err(ApiError::bad_request("end_date is before start_date"));
    }
    if (end - start).num_days() >= MAX_AUDIT_RANGE_DAYS {
        return Err(ApiError::bad_request(format!(
            "Date range exceeds {MAX_AUDIT_RANGE_DAYS} days"
        )));
    }

    let mut events = AuditRepository::new(storage)
        .read_events_range(start, end)
        .map_err(|e| {
            error!(error = %e, "failed to read audit log");
            ApiError::internal("Failed to read audit log")
        })?;

    if let Some(event_type) = params.event_type {
        events.retain(|e| e.event_type == event_type);
    }
    if let Some(actor) = params.actor {
        events.retain(|e| e.actor == Some(actor));
    }

    let total = events.len();
    let limit = params
        .limit
        .unwrap_or(DEFAULT_AUDIT_LIMIT)
        .min(MAX_AUDIT_LIMIT);
    let offset = params.offset.unwrap_or(0);
    let has_more = offset.saturating_add(limit) < total;
    let events: Vec<AuditEvent> = events.into_iter().skip(offset).take(limit).collect();

    state.audit(AuditEventType::AuditQueried, caller.address, &authorized);

    Ok(Json(AuditLogResponse {
        events,
        total,
        has_more,
    }))
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    authz::{
        BatchExecuted, Call, CallReceipt, ContractInfo, DelegationApplied,
        MetaTransactionExecuted, PermitApplied,
    },
    error::ErrorBody,
    state::AppState,
    storage::{AuditEvent, AuditEventType},
};

pub mod admin;
pub mod authorizations;
pub mod health;
pub mod queries;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/domain", get(queries::get_domain))
        .route("/domain/separator", get(queries::get_domain_separator))
        .route("/domain/chain-id", get(queries::get_chain_id))
        .route("/contract/info", get(queries::get_contract_info))
        .route("/contract/name", get(queries::get_contract_name))
        .route("/contract/version", get(queries::get_contract_version))
        .route("/paused", get(queries::get_paused))
        .route("/nonces/{account}", get(queries::get_nonce))
        .route("/allowances/{owner}/{spender}", get(queries::get_allowance))
        .route("/delegates/{account}", get(queries::get_delegate))
        .route("/ledger/balances/{account}", get(queries::get_balance))
        .route("/typed-data/hash", post(queries::typed_data_hash))
        .route("/signatures/valid", post(queries::is_valid_signature))
        .route("/signatures/verify", post(queries::verify_typed_data))
        .route("/permits", post(authorizations::submit_permit))
        .route(
            "/meta-transactions",
            post(authorizations::submit_meta_transaction),
        )
        .route("/delegations", post(authorizations::submit_delegation))
        .route("/batches", post(authorizations::submit_batch))
        .route("/admin/paused", post(admin::set_paused))
        .route(
            "/admin/nonces/{account}/invalidate",
            post(admin::invalidate_nonce),
        )
        .route("/admin/ledger/{account}/credit", post(admin::fund_account))
        .route("/admin/audit/events", get(admin::query_audit_events));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/v1", v1_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        queries::get_domain,
        queries::get_domain_separator,
        queries::get_chain_id,
        queries::get_contract_info,
        queries::get_contract_name,
        queries::get_contract_version,
        queries::get_paused,
        queries::get_nonce,
        queries::get_allowance,
        queries::get_delegate,
        queries::get_balance,
        queries::typed_data_hash,
        queries::is_valid_signature,
        queries::verify_typed_data,
        authorizations::submit_permit,
        authorizations::submit_meta_transaction,
        authorizations::submit_delegation,
        authorizations::submit_batch,
        admin::set_paused,
        admin::invalidate_nonce,
        admin::fund_account,
        admin::query_audit_events
    ),
    components(
        schemas(
            ErrorBody,
            ContractInfo,
            Call,
            CallReceipt,
            PermitApplied,
            MetaTransactionExecuted,
            DelegationApplied,
            BatchExecuted,
            authorizations::PermitRequest,
            authorizations::MetaTransactionRequest,
            authorizations::DelegationRequest,
            authorizations::BatchRequest,
            admin::SetPausedRequest,
            admin::SetPausedResponse,
            admin::InvalidatedNonceResponse,
            admin::FundAccountRequest,
            admin::FundAccountResponse,
            admin::AuditLogResponse,
            AuditEvent,
            AuditEventType
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Domain", description = "Signing domain and authorizer parameters"),
        (name = "Accounts", description = "Nonces, allowances and delegates"),
        (name = "Signatures", description = "Typed-data digests and signature checks"),
        (name = "Authorizations", description = "Signed permits, meta-transactions, delegations and batches"),
        (name = "Admin", description = "Owner-only controls, ledger funding and audit log")
    )
)]
struct ApiDoc;

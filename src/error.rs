// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use alloy::primitives::Address;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::authz::AuthzError;
use crate::storage::StorageError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Engine error code, or the HTTP status for non-engine failures.
    pub code: u32,
    /// Next expected nonce when the operation was applied but not persisted.
    pub nonce: Option<u64>,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub code: u32,
    /// Present only when the authorization was applied before the failure;
    /// the signature is spent and must not be resubmitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<u64>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: u32::from(status.as_u16()),
            nonce: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// The engine applied the operation but the snapshot write failed.
    /// `nonce` is `account`'s next expected nonce in memory.
    pub fn not_persisted(err: StorageError, account: Address, nonce: u64) -> Self {
        error!(error = %err, account = %account, nonce, "applied authorization was not persisted");
        Self {
            nonce: Some(nonce),
            ..Self::internal(format!(
                "Authorization applied but not persisted; next nonce for {account} is {nonce}"
            ))
        }
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        let status = match &err {
            AuthzError::Unauthorized => StatusCode::FORBIDDEN,
            AuthzError::Paused => StatusCode::SERVICE_UNAVAILABLE,
            AuthzError::InvalidSignature => StatusCode::UNPROCESSABLE_ENTITY,
            AuthzError::Expired => StatusCode::BAD_REQUEST,
            AuthzError::CallFailed(_) => StatusCode::CONFLICT,
        };
        Self {
            status,
            message: err.to_string(),
            code: err.code(),
            nonce: None,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        error!(error = %err, "failed to persist authorization state");
        Self::internal("Failed to persist authorization state")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            code: self.code,
            nonce: self.nonce,
        });
        (self.status, body).into_response()
    }
}

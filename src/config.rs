// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the service. Configuration is loaded from the environment once
//! at startup into a [`ServiceConfig`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Root directory for persisted state and audit logs | unset (memory only) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//! | `DOMAIN_NAME` | Signing domain name | `Relational Wallet` |
//! | `DOMAIN_VERSION` | Signing domain version | `1` |
//! | `CHAIN_ID` | Chain identifier bound into the domain | `1` |
//! | `VERIFYING_CONTRACT` | Verifying entity address | zero address |
//! | `AUTHORIZER_OWNER` | Administrator address | Required |
//! | `INVALIDATION_CHECKPOINT` | Nonce set by emergency invalidation | `1000` |
//! | `CALLER_JWT_SECRET` | HS256 secret for admin caller tokens | unset (admin routes disabled) |
//! | `CALLER_JWT_ISSUER` | Expected `iss` claim of caller tokens | Optional |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files; HTTPS when both are set | unset |

use std::{
    net::{AddrParseError, SocketAddr},
    path::PathBuf,
    str::FromStr,
};

use alloy::primitives::Address;

use crate::authz::{AuthorizerConfig, DomainInfo, DEFAULT_INVALIDATION_CHECKPOINT};
use crate::state::AuthConfig;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the data directory path.
///
/// Authorization state and the audit log are written here. When unset the
/// service keeps everything in memory and nonces reset on restart.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const DOMAIN_NAME_ENV: &str = "DOMAIN_NAME";
pub const DOMAIN_VERSION_ENV: &str = "DOMAIN_VERSION";
pub const CHAIN_ID_ENV: &str = "CHAIN_ID";
pub const VERIFYING_CONTRACT_ENV: &str = "VERIFYING_CONTRACT";
pub const AUTHORIZER_OWNER_ENV: &str = "AUTHORIZER_OWNER";
pub const INVALIDATION_CHECKPOINT_ENV: &str = "INVALIDATION_CHECKPOINT";
pub const CALLER_JWT_SECRET_ENV: &str = "CALLER_JWT_SECRET";
pub const CALLER_JWT_ISSUER_ENV: &str = "CALLER_JWT_ISSUER";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DOMAIN_NAME: &str = "Relational Wallet";
pub const DEFAULT_DOMAIN_VERSION: &str = "1";
pub const DEFAULT_CHAIN_ID: u64 = 1;

/// Default `RUST_LOG` filter.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("TLS_CERT_PATH and TLS_KEY_PATH must be set together")]
    IncompleteTls,
    #[error("invalid bind address: {0}")]
    BindAddress(#[from] AddrParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    /// `json` (any case) selects JSON; anything else is pretty.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(f) if f.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Everything the service reads from its environment.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: Option<PathBuf>,
    pub log_format: LogFormat,
    pub domain: DomainInfo,
    pub owner: Address,
    pub invalidation_checkpoint: u64,
    pub auth: AuthConfig,
    pub tls: Option<TlsPaths>,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let owner = get(AUTHORIZER_OWNER_ENV).ok_or(ConfigError::Missing(AUTHORIZER_OWNER_ENV))?;
        let owner: Address = parse(AUTHORIZER_OWNER_ENV, &owner)?;
        if owner == Address::ZERO {
            return Err(ConfigError::Invalid {
                var: AUTHORIZER_OWNER_ENV,
                value: owner.to_string(),
                reason: "owner cannot be the zero address".to_string(),
            });
        }

        let verifying_entity = match get(VERIFYING_CONTRACT_ENV) {
            Some(v) => parse(VERIFYING_CONTRACT_ENV, &v)?,
            None => Address::ZERO,
        };
        let chain_id = match get(CHAIN_ID_ENV) {
            Some(v) => parse(CHAIN_ID_ENV, &v)?,
            None => DEFAULT_CHAIN_ID,
        };
        let domain = DomainInfo::new(
            get(DOMAIN_NAME_ENV).unwrap_or_else(|| DEFAULT_DOMAIN_NAME.to_string()),
            get(DOMAIN_VERSION_ENV).unwrap_or_else(|| DEFAULT_DOMAIN_VERSION.to_string()),
            chain_id,
            verifying_entity,
        );

        let invalidation_checkpoint = match get(INVALIDATION_CHECKPOINT_ENV) {
            Some(v) => parse(INVALIDATION_CHECKPOINT_ENV, &v)?,
            None => DEFAULT_INVALIDATION_CHECKPOINT,
        };
        if invalidation_checkpoint == 0 {
            return Err(ConfigError::Invalid {
                var: INVALIDATION_CHECKPOINT_ENV,
                value: "0".to_string(),
                reason: "checkpoint must be positive".to_string(),
            });
        }

        let port = match get(PORT_ENV) {
            Some(v) => parse(PORT_ENV, &v)?,
            None => DEFAULT_PORT,
        };

        let log_format = LogFormat::parse(get(LOG_FORMAT_ENV).as_deref());

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        Ok(Self {
            host: get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            data_dir: get(DATA_DIR_ENV).map(PathBuf::from),
            log_format,
            domain,
            owner,
            invalidation_checkpoint,
            auth: AuthConfig {
                secret: get(CALLER_JWT_SECRET_ENV),
                issuer: get(CALLER_JWT_ISSUER_ENV),
            },
            tls,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn authorizer_config(&self) -> AuthorizerConfig {
        AuthorizerConfig::new(self.domain.clone(), self.owner)
            .with_invalidation_checkpoint(self.invalidation_checkpoint)
    }
}

fn parse<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const OWNER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    fn load(vars: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_only_owner_is_set() {
        let config = load(&[(AUTHORIZER_OWNER_ENV, OWNER)]).unwrap();

        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.data_dir, None);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.domain.name, "Relational Wallet");
        assert_eq!(config.domain.version, "1");
        assert_eq!(config.domain.chain_id, 1);
        assert_eq!(config.domain.verifying_entity, Address::ZERO);
        assert_eq!(config.invalidation_checkpoint, 1000);
        assert!(config.auth.secret.is_none());
        assert!(config.tls.is_none());
        assert_eq!(config.owner, OWNER.parse::<Address>().unwrap());
    }

    #[test]
    fn owner_is_required() {
        assert!(matches!(load(&[]), Err(ConfigError::Missing(AUTHORIZER_OWNER_ENV))));
        assert!(matches!(
            load(&[(AUTHORIZER_OWNER_ENV, "  ")]),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn rejects_zero_owner_and_bad_numbers() {
        let zero = "0x0000000000000000000000000000000000000000";
        assert!(matches!(
            load(&[(AUTHORIZER_OWNER_ENV, zero)]),
            Err(ConfigError::Invalid { var: AUTHORIZER_OWNER_ENV, .. })
        ));
        assert!(matches!(
            load(&[(AUTHORIZER_OWNER_ENV, OWNER), (CHAIN_ID_ENV, "mainnet")]),
            Err(ConfigError::Invalid { var: CHAIN_ID_ENV, .. })
        ));
        assert!(matches!(
            load(&[(AUTHORIZER_OWNER_ENV, OWNER), (INVALIDATION_CHECKPOINT_ENV, "0")]),
            Err(ConfigError::Invalid { var: INVALIDATION_CHECKPOINT_ENV, .. })
        ));
    }

    #[test]
    fn reads_domain_and_service_settings() {
        let config = load(&[
            (AUTHORIZER_OWNER_ENV, OWNER),
            (DOMAIN_NAME_ENV, "Relational Fuji"),
            (DOMAIN_VERSION_ENV, "2"),
            (CHAIN_ID_ENV, "43113"),
            (VERIFYING_CONTRACT_ENV, "0x4242424242424242424242424242424242424242"),
            (INVALIDATION_CHECKPOINT_ENV, "5000"),
            (PORT_ENV, "9443"),
            (DATA_DIR_ENV, "/var/lib/authorizer"),
            (LOG_FORMAT_ENV, "JSON"),
            (CALLER_JWT_SECRET_ENV, "s3cret"),
            (CALLER_JWT_ISSUER_ENV, "relational"),
        ])
        .unwrap();

        assert_eq!(config.domain.name, "Relational Fuji");
        assert_eq!(config.domain.chain_id, 43113);
        assert_eq!(config.domain.verifying_entity, Address::repeat_byte(0x42));
        assert_eq!(config.authorizer_config().invalidation_checkpoint, 5000);
        assert_eq!(config.bind_addr().unwrap().port(), 9443);
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/authorizer")));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.auth.secret.as_deref(), Some("s3cret"));
        assert_eq!(config.auth.issuer.as_deref(), Some("relational"));
    }

    #[test]
    fn tls_paths_come_in_pairs() {
        assert!(matches!(
            load(&[(AUTHORIZER_OWNER_ENV, OWNER), (TLS_CERT_PATH_ENV, "/tls/cert.pem")]),
            Err(ConfigError::IncompleteTls)
        ));

        let config = load(&[
            (AUTHORIZER_OWNER_ENV, OWNER),
            (TLS_CERT_PATH_ENV, "/tls/cert.pem"),
            (TLS_KEY_PATH_ENV, "/tls/key.pem"),
        ])
        .unwrap();
        assert_eq!(
            config.tls,
            Some(TlsPaths {
                cert: "/tls/cert.pem".into(),
                key: "/tls/key.pem".into(),
            })
        );
    }
}

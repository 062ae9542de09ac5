// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{sync::Arc, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use relational_authorizer::{
    api::router,
    authz::{AuthorizationState, Authorizer, Secp256k1Scheme, SystemClock},
    config::{LogFormat, ServiceConfig, DEFAULT_LOG_FILTER},
    state::AppState,
    storage::{AuthorizationRepository, FileStorage, StoragePaths},
};

/// Time in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    init_tracing(LogFormat::from_env());

    if let Err(e) = run().await {
        error!(error = %e, "server terminated with an error");
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServiceConfig::from_env()?;
    let addr = config.bind_addr()?;

    let authorizer = Authorizer::new(
        config.authorizer_config(),
        Secp256k1Scheme,
        Arc::new(SystemClock),
    );
    info!(
        name = %config.domain.name,
        version = %config.domain.version,
        chain_id = config.domain.chain_id,
        owner = %config.owner,
        separator = %authorizer.domain_separator(),
        "authorizer configured"
    );

    let state = match &config.data_dir {
        Some(dir) => {
            let mut storage = FileStorage::new(StoragePaths::new(dir));
            storage.initialize()?;
            let authorization = AuthorizationRepository::new(&storage)
                .load()?
                .unwrap_or_default();
            info!(
                data_dir = %dir.display(),
                paused = authorization.is_paused(),
                "loaded authorization state"
            );
            AppState::new(authorizer, authorization).with_storage(storage)
        }
        None => {
            warn!("DATA_DIR not set; nonces are kept in memory and reset on restart");
            AppState::new(authorizer, AuthorizationState::new())
        }
    };

    if config.auth.secret.is_none() {
        warn!("CALLER_JWT_SECRET not set; admin routes are disabled");
    }
    let app = router(state.with_auth_config(config.auth.clone()));

    let shutdown = CancellationToken::new();
    let handle = Handle::new();
    tokio::spawn(wait_for_signal(shutdown.clone()));
    tokio::spawn({
        let shutdown = shutdown.clone();
        let handle = handle.clone();
        async move {
            shutdown.cancelled().await;
            info!("shutting down, draining in-flight requests");
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        }
    });

    match &config.tls {
        Some(tls) => {
            rustls::crypto::ring::default_provider()
                .install_default()
                .map_err(|_| "failed to install rustls crypto provider")?;
            let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;

            info!("Relational Authorizer listening on https://{addr} (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            info!("Relational Authorizer listening on http://{addr} (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
    }

    info!("server stopped");
    Ok(())
}

/// Cancel `shutdown` on Ctrl-C or SIGTERM.
async fn wait_for_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    shutdown.cancel();
}

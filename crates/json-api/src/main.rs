//! RAVE Promotions JSON API Server

use std::process;

use salvo::prelude::*;
use tracing::{error, info};

use rave_app::{auth::OpenBaoClient, context::AppContext};

use crate::{config::ServerConfig, state::State};

mod auth;
mod catcher;
mod config;
mod extensions;
mod healthcheck;
mod observability;
mod promotions;
mod response;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// RAVE JSON API Server entry point
///
/// # Panics
///
/// Panics if the server fails to bind or serve requests
#[tokio::main]
pub async fn main() {
    // Load configuration from .env and CLI arguments
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(init_error) = observability::init(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "tracing subscriber failed to install, stderr is all that is left"
        )]
        {
            eprintln!("Observability error: {init_error}");
        }

        process::exit(1);
    }

    let addr = config.socket_addr();

    info!(
        %addr,
        app_env = ?config.observability.app_env,
        "starting server"
    );

    let openbao = OpenBaoClient::new(config.auth.into());

    let app = match AppContext::from_database_url(&config.database.database_url, openbao).await {
        Ok(app) => app,
        Err(init_error) => {
            error!("failed to initialize app context: {init_error}");

            process::exit(1);
        }
    };

    // Bind server
    let listener = TcpListener::new(addr).bind().await;

    let server = Server::new(listener);

    let handle = server.handle();

    // Listen for shutdown signal
    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    let service = router::app_service(router::app_router(State::from_app_context(app)));

    // Start serving requests
    server.serve(service).await;
}

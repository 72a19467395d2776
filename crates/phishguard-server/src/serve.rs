use crate::http::{handle_request, HttpState, DEFAULT_MAX_REQUEST_BYTES};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request};
use phishguard_core::config::Config;
use phishguard_core::{AppError, AppResult};
use std::convert::Infallible;
use std::net::SocketAddr;
use tokio::sync::watch;
use tracing::info;

pub struct ServerSettings {
    pub bind: SocketAddr,
    pub max_request_bytes: usize,
}

impl ServerSettings {
    pub fn from_config(config: &Config) -> AppResult<Self> {
        Ok(Self {
            bind: config.server.bind_addr()?,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
        })
    }
}

/// Runs the HTTP service until ctrl-c. Requests are independent; the only
/// shared state is the provider and the simulator behind the `HttpState`.
pub async fn serve(settings: ServerSettings, state: HttpState) -> AppResult<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        let _ = shutdown_tx.send(true);
    });
    serve_http(settings.bind, state, shutdown_rx).await
}

pub async fn serve_http(
    addr: SocketAddr,
    state: HttpState,
    shutdown: watch::Receiver<bool>,
) -> AppResult<()> {
    let make_svc = make_service_fn(move |_| {
        let state = state.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                let state = state.clone();
                async move { Ok::<_, Infallible>(handle_request(state, req).await) }
            }))
        }
    });

    let server = hyper::Server::try_bind(&addr)
        .map_err(|e| AppError::internal(format!("http bind error: {e}")))?;
    info!("listening on http://{addr}");
    server
        .serve(make_svc)
        .with_graceful_shutdown(wait_for_shutdown(shutdown))
        .await
        .map_err(|e| AppError::internal(format!("http server error: {e}")))?;
    Ok(())
}

async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow() {
        if shutdown.changed().await.is_err() {
            break;
        }
    }
}

// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use axum::{http::StatusCode, routing::get, Router};
use log::{error, info};
use prometheus::{Encoder, TextEncoder};
use tokio::net::TcpListener;

/// Prometheus text exposition of the default registry.
async fn handle_metrics() -> Result<String, (StatusCode, String)> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}

pub fn router() -> Router {
    Router::new().route("/metrics", get(handle_metrics))
}

/// Serves `/metrics` until the task is dropped.
pub async fn run_server(port: u16) {
    let listener = match TcpListener::bind(("0.0.0.0", port)).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind metrics server to port {port}: {e}");
            return;
        }
    };
    info!("Metrics server listening on port {port}");
    if let Err(e) = axum::serve(listener, router()).await {
        error!("Metrics server error: {e}");
    }
}

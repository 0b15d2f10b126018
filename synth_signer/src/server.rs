// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::{str::FromStr, sync::Arc};

use anyhow::{Context, Result};
use axum::{error_handling::HandleError, routing::post_service, BoxError, Router};
use hyper::StatusCode;
use jsonrpsee::{
    proc_macros::rpc,
    server::{stop_channel, ServerBuilder, ServerConfig, ServerHandle, TowerService},
};
use lazy_static::lazy_static;
use log::info;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};
use serde::Serialize;
use synth_messages::{
    checks::now_unix_secs,
    request::{ExchangeRequest, MintRequest, RedeemRequest},
    DomainInfo, MessageError, MessageKind, SignedExchange, SignedMint, SignedRedeem,
};
use tokio::{net::TcpListener, signal, task::JoinHandle};
use tower::layer::util::Identity;

pub use crate::{
    api_versioning::{SignerRpcApiVersion, SignerRpcApiVersionsInfo},
    jsonrpsee_helpers::JsonRpcResponse,
};
use crate::{
    api_versioning::{signer_rpc_api_versions_info, SIGNER_RPC_API_VERSIONS_DEPRECATED},
    error_codes::{JsonRpcErrorCode, JsonRpcWarningCode},
    jsonrpsee_helpers::{json_rpc_error, JsonRpcError, JsonRpcResult, JsonRpcWarning},
    pool_signer::{PoolSigner, SignerError},
};

// Register the metrics into the global metrics registry.
lazy_static! {
    static ref SIGNING_SUCCESS_COUNTER: IntCounter = register_int_counter!(
        "signing_success_count",
        "Number of messages signed."
    )
    .unwrap();
    static ref SIGNING_FAILURE_COUNTER: IntCounter = register_int_counter!(
        "signing_failure_count",
        "Number of failed signing requests (for any reason)."
    )
    .unwrap();
    static ref DEPRECATION_WARNING_COUNT: IntCounter = register_int_counter!(
        "deprecation_warning_count",
        "Number of deprecation warnings sent to clients."
    )
    .unwrap();
    static ref VERSION_ERROR_COUNT: IntCounter = register_int_counter!(
        "version_error_count",
        "Number of API version errors sent to clients."
    )
    .unwrap();
    static ref INVALID_ARGUMENT_COUNT: IntCounter = register_int_counter!(
        "invalid_argument_count",
        "Number of requests rejected by input validation."
    )
    .unwrap();
    static ref SIGNED_MESSAGES: IntCounterVec = register_int_counter_vec!(
        "signed_messages_total",
        "Messages signed, by kind.",
        &["kind"]
    )
    .unwrap();
}

/// Generates the `RpcServer` trait that is used to define the JSON-RPC API.
///
/// Because of the way the `rpc` macro works, this docstring does not reach
/// the generated documentation. The JSON-RPC API is documented in
/// `synth_signer/README.md`; keep it in sync with any change here.
#[rpc(server)]
pub trait Rpc {
    /// Returns the versions of the signer JSON-RPC API implemented by this server.
    #[method(name = "api_versions")]
    fn api_versions(&self) -> JsonRpcResult<SignerRpcApiVersionsInfo>;

    /// Returns the EIP-712 domain the validator signs under, so clients can
    /// check signatures themselves.
    #[method(name = "eip712domain_info")]
    fn eip712_domain_info(&self) -> JsonRpcResult<DomainInfo>;

    #[method(name = "sign_mint")]
    fn sign_mint(&self, api_version: String, request: MintRequest) -> JsonRpcResult<SignedMint>;

    #[method(name = "sign_redeem")]
    fn sign_redeem(
        &self,
        api_version: String,
        request: RedeemRequest,
    ) -> JsonRpcResult<SignedRedeem>;

    #[method(name = "sign_exchange")]
    fn sign_exchange(
        &self,
        api_version: String,
        request: ExchangeRequest,
    ) -> JsonRpcResult<SignedExchange>;
}

#[derive(Clone)]
struct RpcImpl {
    signer: Arc<PoolSigner>,
}

/// Returns an error if the API version is not supported.
fn parse_api_version(api_version: &str) -> Result<SignerRpcApiVersion, JsonRpcError> {
    SignerRpcApiVersion::from_str(api_version).map_err(|_| {
        json_rpc_error(
            JsonRpcErrorCode::InvalidVersion,
            format!("Unsupported API version: \"{api_version}\"."),
            Some(signer_rpc_api_versions_info()),
        )
    })
}

/// Returns a warning if the API version is deprecated.
fn check_api_version_deprecation(api_version: &SignerRpcApiVersion) -> Option<JsonRpcWarning> {
    SIGNER_RPC_API_VERSIONS_DEPRECATED
        .contains(api_version)
        .then(|| {
            JsonRpcWarning::new(
                JsonRpcWarningCode::DeprecatedVersion,
                format!("The API version {api_version} will be deprecated."),
                Some(signer_rpc_api_versions_info()),
            )
        })
}

fn signer_error(error: SignerError) -> JsonRpcError {
    match error {
        SignerError::InvalidRequest(error) => {
            INVALID_ARGUMENT_COUNT.inc();
            let data = match &error {
                MessageError::InvalidArgument { field, .. } => {
                    Some(serde_json::json!({ "field": field }))
                }
                _ => None,
            };
            json_rpc_error(JsonRpcErrorCode::InvalidArgument, error.to_string(), data)
        }
        SignerError::Signing(error) => {
            json_rpc_error(JsonRpcErrorCode::Signing, error.to_string(), None::<()>)
        }
    }
}

fn sign_<T, F>(api_version: &str, kind: MessageKind, sign: F) -> JsonRpcResult<T>
where
    T: Serialize,
    F: FnOnce(u64) -> Result<T, SignerError>,
{
    let api_version = match parse_api_version(api_version) {
        Ok(v) => v,
        Err(e) => {
            VERSION_ERROR_COUNT.inc();
            return Err(e);
        }
    };

    let mut warnings: Vec<JsonRpcWarning> = Vec::new();
    if let Some(w) = check_api_version_deprecation(&api_version) {
        warnings.push(w);
        DEPRECATION_WARNING_COUNT.inc();
    }

    let now = now_unix_secs().map_err(|e| {
        json_rpc_error(JsonRpcErrorCode::Signing, e.to_string(), None::<()>)
    })?;
    let res = match api_version {
        SignerRpcApiVersion::V0_0 => sign(now),
    };

    match res {
        Ok(signed) => {
            let label = kind.to_string();
            SIGNED_MESSAGES.with_label_values(&[label.as_str()]).inc();
            Ok(JsonRpcResponse::warn(signed, warnings))
        }
        Err(e) => Err(signer_error(e)),
    }
}

/// Counts the outcome of a signing request.
fn record<T>(result: JsonRpcResult<T>) -> JsonRpcResult<T>
where
    T: Serialize,
{
    match &result {
        Ok(_) => SIGNING_SUCCESS_COUNTER.inc(),
        Err(_) => SIGNING_FAILURE_COUNTER.inc(),
    }
    result
}

impl RpcServer for RpcImpl {
    fn api_versions(&self) -> JsonRpcResult<SignerRpcApiVersionsInfo> {
        Ok(JsonRpcResponse::ok(signer_rpc_api_versions_info()))
    }

    fn eip712_domain_info(&self) -> JsonRpcResult<DomainInfo> {
        Ok(JsonRpcResponse::ok(self.signer.domain_info()))
    }

    fn sign_mint(&self, api_version: String, request: MintRequest) -> JsonRpcResult<SignedMint> {
        record(sign_(&api_version, MessageKind::Mint, |now| {
            self.signer.sign_mint(request, now)
        }))
    }

    fn sign_redeem(
        &self,
        api_version: String,
        request: RedeemRequest,
    ) -> JsonRpcResult<SignedRedeem> {
        record(sign_(&api_version, MessageKind::Redeem, |now| {
            self.signer.sign_redeem(request, now)
        }))
    }

    fn sign_exchange(
        &self,
        api_version: String,
        request: ExchangeRequest,
    ) -> JsonRpcResult<SignedExchange> {
        record(sign_(&api_version, MessageKind::Exchange, |now| {
            self.signer.sign_exchange(request, now)
        }))
    }
}

pub async fn run_server(
    port: u16,
    signer: PoolSigner,
    max_request_body_size: u32,
    max_response_body_size: u32,
    max_concurrent_connections: u32,
) -> Result<(JoinHandle<()>, std::net::SocketAddr)> {
    // Setting up the JSON RPC server
    let rpc_impl = RpcImpl {
        signer: Arc::new(signer),
    };
    let (json_rpc_service, _) = create_json_rpc_service(
        rpc_impl,
        max_request_body_size,
        max_response_body_size,
        max_concurrent_connections,
    )?;

    async fn handle_anyhow_error(err: BoxError) -> (StatusCode, String) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Something went wrong: {err}"),
        )
    }
    let json_rpc_router = Router::new()
        .route_service(
            "/",
            HandleError::new(post_service(json_rpc_service), handle_anyhow_error),
        )
        .layer(tower::limit::ConcurrencyLimitLayer::new(
            max_concurrent_connections as usize,
        ));

    let listener = TcpListener::bind(&format!("0.0.0.0:{port}"))
        .await
        .with_context(|| format!("Failed to bind to synth-signer port {port}"))?;

    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, json_rpc_router)
            .with_graceful_shutdown(shutdown_handler())
            .await
        {
            log::error!("Synth signer error: {e}");
        }
    });

    Ok((handle, addr))
}

/// Graceful shutdown handler
async fn shutdown_handler() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Signal received, starting graceful shutdown");
}

fn create_json_rpc_service(
    rpc_impl: RpcImpl,
    max_request_body_size: u32,
    max_response_body_size: u32,
    max_concurrent_connections: u32,
) -> Result<(TowerService<Identity, Identity>, ServerHandle)> {
    let config = ServerConfig::builder()
        .max_request_body_size(max_request_body_size)
        .max_response_body_size(max_response_body_size)
        .max_connections(max_concurrent_connections)
        .http_only()
        .build();

    let service_builder = ServerBuilder::new().set_config(config).to_service_builder();
    let (stop_handle, server_handle) = stop_channel();
    let handle = service_builder.build(rpc_impl.into_rpc(), stop_handle);
    Ok((handle, server_handle))
}

// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

#![doc = include_str!("../README.md")]

use std::time::Duration;

use alloy::primitives::{Address, U256};
use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use synth_eip712_message::signer_from_private_key;
use synth_signer::{
    metrics,
    pool_signer::{PoolSigner, SignerConfig},
    server,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on for JSON-RPC requests.
    /// Defaults to 8080.
    #[arg(long, default_value_t = 8080, env = "SYNTH_PORT")]
    port: u16,

    /// Validator private key, as a hex string.
    #[arg(long, env = "SYNTH_PRIVATE_KEY", hide_env_values = true)]
    private_key: String,

    /// Chain ID of the chain the pool is deployed on.
    /// Defaults to 1.
    #[arg(long, default_value_t = 1, env = "SYNTH_CHAIN_ID")]
    chain_id: u64,

    /// Address of the pool that verifies the signatures.
    #[arg(long, env = "SYNTH_POOL_ADDRESS")]
    pool_address: Address,

    /// Integer version of the pool, used as the EIP-712 domain version.
    /// Defaults to 5.
    #[arg(long, default_value_t = 5, env = "SYNTH_POOL_VERSION")]
    pool_version: u8,

    /// Fee written into every signed message, as an 18-decimal fixed point integer.
    /// Defaults to 0.2%.
    #[arg(long, default_value = "2000000000000000", env = "SYNTH_FEE_PERCENTAGE")]
    fee_percentage: U256,

    /// Seconds a signature stays valid.
    /// Defaults to 20 minutes.
    #[arg(long, default_value_t = 1200, env = "SYNTH_SIGNATURE_TTL_SECS")]
    signature_ttl_secs: u64,

    /// Maximum request body size in bytes.
    /// Defaults to 1MB.
    #[arg(long, default_value_t = 1024 * 1024, env = "SYNTH_MAX_REQUEST_BODY_SIZE")]
    max_request_body_size: u32,

    /// Maximum response body size in bytes.
    /// Defaults to 100kB.
    #[arg(long, default_value_t = 100 * 1024, env = "SYNTH_MAX_RESPONSE_BODY_SIZE")]
    max_response_body_size: u32,

    /// Maximum number of concurrent connections.
    /// Defaults to 32.
    #[arg(long, default_value_t = 32, env = "SYNTH_MAX_CONNECTIONS")]
    max_connections: u32,

    /// Metrics server port.
    /// Defaults to 5000.
    #[arg(long, default_value_t = 5000, env = "SYNTH_METRICS_PORT")]
    metrics_port: u16,
}

impl std::fmt::Debug for Args {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Args")
            .field("port", &self.port)
            .field("private_key", &"<redacted>")
            .field("chain_id", &self.chain_id)
            .field("pool_address", &self.pool_address)
            .field("pool_version", &self.pool_version)
            .field("fee_percentage", &self.fee_percentage)
            .field("signature_ttl_secs", &self.signature_ttl_secs)
            .field("max_request_body_size", &self.max_request_body_size)
            .field("max_response_body_size", &self.max_response_body_size)
            .field("max_connections", &self.max_connections)
            .field("metrics_port", &self.metrics_port)
            .finish()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger.
    // Set the log level by setting the RUST_LOG environment variable.
    // tracing_subscriber also picks up jsonrpsee's spans (client IP, etc).
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    debug!("Settings: {:?}", args);

    // Start the metrics server.
    // We just let it gracelessly get killed at the end of main()
    tokio::spawn(metrics::run_server(args.metrics_port));

    let wallet = signer_from_private_key(&args.private_key)?;
    info!("Validator address: {:#40x}", wallet.address());

    let signer = PoolSigner::new(
        wallet,
        SignerConfig {
            chain_id: args.chain_id,
            pool: args.pool_address,
            pool_version: args.pool_version,
            fee_percentage: args.fee_percentage,
            signature_ttl: Duration::from_secs(args.signature_ttl_secs),
        },
    );
    info!(
        "Signing for pool {} on chain {}, domain separator {}",
        args.pool_address,
        args.chain_id,
        signer.domain_info().separator
    );

    // Start the JSON-RPC server.
    // This await is non-blocking
    let (handle, _) = server::run_server(
        args.port,
        signer,
        args.max_request_body_size,
        args.max_response_body_size,
        args.max_connections,
    )
    .await?;
    info!("Server started. Listening on port {}.", args.port);

    let _ = handle.await;

    // If we're here, we've received a signal to exit.
    info!("Shutting down...");
    Ok(())
}

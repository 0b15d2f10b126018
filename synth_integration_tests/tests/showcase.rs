// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! A user asks the signer service for a signature and submits it to a pool.

use std::{collections::HashSet, net::SocketAddr, time::Duration};

use alloy::{
    primitives::{Address, U256},
    signers::local::PrivateKeySigner,
};
use jsonrpsee::{
    core::client::{ClientT, Error as ClientError},
    http_client::{HttpClient, HttpClientBuilder},
    rpc_params,
    server::ServerHandle,
};
use rstest::*;
use synth_messages::{
    checks::now_unix_secs,
    request::{ExchangeRequest, MintRequest, RedeemRequest},
    synthereum_pool_domain, SignedExchange, SignedMint, SignedRedeem,
};
use synth_signer::{
    pool_signer::{PoolSigner, SignerConfig},
    server::{self, JsonRpcResponse},
};
use tokio::task::JoinHandle;

use crate::pool_mock::{self, PoolRevert, PoolVerifierMock};

const SIGNATURE_TTL: u64 = 600;

#[fixture]
fn pool_address() -> Address {
    Address::from([0x33u8; 20])
}

#[fixture]
fn validator() -> PrivateKeySigner {
    PrivateKeySigner::random()
}

#[fixture]
fn user() -> Address {
    PrivateKeySigner::random().address()
}

fn config(chain_id: u64, pool: Address) -> SignerConfig {
    SignerConfig {
        chain_id,
        pool,
        pool_version: 5,
        fee_percentage: U256::from(2_000_000_000_000_000u64),
        signature_ttl: Duration::from_secs(SIGNATURE_TTL),
    }
}

fn http_client(addr: SocketAddr) -> HttpClient {
    HttpClientBuilder::default()
        .build(format!("http://127.0.0.1:{}", addr.port()))
        .unwrap()
}

struct Deployment {
    pool: PoolVerifierMock,
    pool_client: HttpClient,
    pool_handle: ServerHandle,
    signer_client: HttpClient,
    signer_handle: JoinHandle<()>,
}

impl Deployment {
    async fn start(
        signer_chain_id: u64,
        pool_chain_id: u64,
        pool_address: Address,
        wallet: PrivateKeySigner,
        validators: HashSet<Address>,
    ) -> Self {
        let pool = PoolVerifierMock::new(
            synthereum_pool_domain(pool_chain_id, pool_address, 5),
            validators,
            now_unix_secs().unwrap(),
        );
        let (pool_handle, pool_addr) = pool_mock::run_server(pool.clone()).await.unwrap();
        let (signer_handle, signer_addr) = server::run_server(
            0,
            PoolSigner::new(wallet, config(signer_chain_id, pool_address)),
            100 * 1024,
            100 * 1024,
            4,
        )
        .await
        .unwrap();
        Self {
            pool,
            pool_client: http_client(pool_addr),
            pool_handle,
            signer_client: http_client(signer_addr),
            signer_handle,
        }
    }

    async fn pool_nonce(&self, user: Address) -> U256 {
        self.pool_client
            .request("nonce", rpc_params!(user))
            .await
            .unwrap()
    }

    async fn sign_mint(&self, user: Address, nonce: U256) -> SignedMint {
        let request = MintRequest {
            sender: user.to_string(),
            derivative_addr: "0x2222222222222222222222222222222222222222".to_owned(),
            collateral_amount: "120000000".to_owned(),
            num_tokens: "99800000000000000000".to_owned(),
            nonce: nonce.to_string(),
        };
        let res: JsonRpcResponse<SignedMint> = self
            .signer_client
            .request("sign_mint", rpc_params!("0.0", request))
            .await
            .unwrap();
        res.data
    }

    async fn submit<T: serde::Serialize>(&self, method: &str, signed: T) -> Result<U256, i32> {
        self.pool_client
            .request(method, rpc_params!(signed))
            .await
            .map_err(|err| match err {
                ClientError::Call(err) => err.code(),
                err => panic!("unexpected client error: {err}"),
            })
    }

    fn stop(self) {
        self.signer_handle.abort();
        self.pool_handle.stop().unwrap();
    }
}

#[rstest]
#[tokio::test]
async fn mint_redeem_exchange_are_accepted(
    pool_address: Address,
    validator: PrivateKeySigner,
    user: Address,
) {
    let validators = HashSet::from([validator.address()]);
    let deployment = Deployment::start(1, 1, pool_address, validator, validators).await;

    let nonce = deployment.pool_nonce(user).await;
    assert_eq!(nonce, U256::ZERO);
    let signed = deployment.sign_mint(user, nonce).await;
    assert_eq!(deployment.submit("mint", signed).await, Ok(U256::ZERO));

    let redeem = RedeemRequest {
        sender: user.to_string(),
        derivative_addr: "0x2222222222222222222222222222222222222222".to_owned(),
        collateral_amount: "60000000".to_owned(),
        num_tokens: "49900000000000000000".to_owned(),
        nonce: deployment.pool_nonce(user).await.to_string(),
    };
    let signed: JsonRpcResponse<SignedRedeem> = deployment
        .signer_client
        .request("sign_redeem", rpc_params!("0.0", redeem))
        .await
        .unwrap();
    assert_eq!(deployment.submit("redeem", signed.data).await, Ok(U256::from(1)));

    let exchange = ExchangeRequest {
        sender: user.to_string(),
        derivative_addr: "0x2222222222222222222222222222222222222222".to_owned(),
        dest_pool_addr: "0x4444444444444444444444444444444444444444".to_owned(),
        dest_derivative_addr: "0x5555555555555555555555555555555555555555".to_owned(),
        num_tokens: "49900000000000000000".to_owned(),
        collateral_amount: "60000000".to_owned(),
        dest_num_tokens: "25000000000000000000".to_owned(),
        nonce: deployment.pool_nonce(user).await.to_string(),
    };
    let signed: JsonRpcResponse<SignedExchange> = deployment
        .signer_client
        .request("sign_exchange", rpc_params!("0.0", exchange))
        .await
        .unwrap();
    assert_eq!(
        deployment.submit("exchange", signed.data).await,
        Ok(U256::from(2))
    );

    assert_eq!(deployment.pool.nonce(user), U256::from(3));
    deployment.stop();
}

#[rstest]
#[tokio::test]
async fn replayed_signature_is_rejected(
    pool_address: Address,
    validator: PrivateKeySigner,
    user: Address,
) {
    let validators = HashSet::from([validator.address()]);
    let deployment = Deployment::start(1, 1, pool_address, validator, validators).await;

    let signed = deployment.sign_mint(user, U256::ZERO).await;
    assert!(deployment.submit("mint", signed.clone()).await.is_ok());
    assert_eq!(
        deployment.submit("mint", signed).await,
        Err(PoolRevert::InvalidNonce.code())
    );
    deployment.stop();
}

#[rstest]
#[tokio::test]
async fn signature_is_valid_until_expiration_second(
    pool_address: Address,
    validator: PrivateKeySigner,
    user: Address,
) {
    let validators = HashSet::from([validator.address()]);
    let deployment = Deployment::start(1, 1, pool_address, validator, validators).await;

    let signed = deployment.sign_mint(user, U256::ZERO).await;
    let expiration: u64 = signed.message.expiration.to();
    assert!(expiration >= now_unix_secs().unwrap() + SIGNATURE_TTL - 5);

    deployment.pool.set_block_timestamp(expiration + 1);
    assert_eq!(
        deployment.submit("mint", signed.clone()).await,
        Err(PoolRevert::Expired.code())
    );

    deployment.pool.set_block_timestamp(expiration);
    assert_eq!(deployment.submit("mint", signed).await, Ok(U256::ZERO));
    deployment.stop();
}

#[rstest]
#[tokio::test]
async fn unknown_validator_is_rejected(pool_address: Address, user: Address) {
    let validators = HashSet::from([PrivateKeySigner::random().address()]);
    let deployment =
        Deployment::start(1, 1, pool_address, PrivateKeySigner::random(), validators).await;

    let signed = deployment.sign_mint(user, U256::ZERO).await;
    assert_eq!(
        deployment.submit("mint", signed).await,
        Err(PoolRevert::InvalidSigner(Address::ZERO).code())
    );
    assert_eq!(deployment.pool.nonce(user), U256::ZERO);
    deployment.stop();
}

#[rstest]
#[case::other_chain(1, 137)]
#[case::testnet(42, 1)]
#[tokio::test]
async fn signature_for_another_chain_is_rejected(
    pool_address: Address,
    validator: PrivateKeySigner,
    user: Address,
    #[case] signer_chain_id: u64,
    #[case] pool_chain_id: u64,
) {
    let validators = HashSet::from([validator.address()]);
    let deployment = Deployment::start(
        signer_chain_id,
        pool_chain_id,
        pool_address,
        validator,
        validators,
    )
    .await;

    // The recovered address is some unrelated account.
    let signed = deployment.sign_mint(user, U256::ZERO).await;
    assert_eq!(
        deployment.submit("mint", signed).await,
        Err(PoolRevert::InvalidSigner(Address::ZERO).code())
    );
    deployment.stop();
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_consume_nonce_once(
    pool_address: Address,
    validator: PrivateKeySigner,
    user: Address,
) {
    let validators = HashSet::from([validator.address()]);
    let deployment = Deployment::start(1, 1, pool_address, validator, validators).await;
    let signed = deployment.sign_mint(user, U256::ZERO).await;

    let mut submissions = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let pool = deployment.pool.clone();
        let signed = signed.clone();
        submissions.spawn(async move { pool.execute(signed.message.into(), signed.signature) });
    }
    let mut accepted = 0;
    while let Some(result) = submissions.join_next().await {
        match result.unwrap() {
            Ok(nonce) => {
                assert_eq!(nonce, U256::ZERO);
                accepted += 1;
            }
            Err(revert) => assert_eq!(revert, PoolRevert::InvalidNonce),
        }
    }
    assert_eq!(accepted, 1);
    assert_eq!(deployment.pool.nonce(user), U256::from(1));
    deployment.stop();
}

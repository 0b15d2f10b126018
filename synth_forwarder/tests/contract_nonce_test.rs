// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

use alloy::{
    primitives::{Address, Bytes, U256},
    providers::{mock::Asserter, ProviderBuilder},
    signers::local::PrivateKeySigner,
    sol_types::SolValue,
};
use rstest::*;
use synth_forwarder::{
    manager::{adapters::NonceReader, context::contract::ContractNonceReader},
    sign_meta_tx_request, Error, Forwarder, MetaTxInput,
};
use synth_messages::calls;

#[fixture]
fn forwarder_address() -> Address {
    Address::from([0x33u8; 20])
}

fn encoded_nonce(nonce: u64) -> Bytes {
    Bytes::from(U256::from(nonce).abi_encode())
}

#[rstest]
#[tokio::test]
async fn reads_nonce_from_forwarder(forwarder_address: Address) {
    let asserter = Asserter::new();
    let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
    let reader = ContractNonceReader::new(forwarder_address, provider);

    asserter.push_success(&encoded_nonce(42));
    assert_eq!(
        reader.get_nonce(Address::from([0x11u8; 20])).await.unwrap(),
        U256::from(42)
    );
}

#[rstest]
#[tokio::test]
async fn signs_with_onchain_nonce(forwarder_address: Address) {
    let asserter = Asserter::new();
    let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
    let forwarder = Forwarder::new(
        137,
        forwarder_address,
        ContractNonceReader::new(forwarder_address, provider),
    );
    let wallet = PrivateKeySigner::random();

    asserter.push_success(&encoded_nonce(9));
    let signed = sign_meta_tx_request(
        &wallet,
        &forwarder,
        MetaTxInput::new(wallet.address(), Address::from([0x44u8; 20]), calls::claim_fee()),
    )
    .await
    .unwrap();
    assert_eq!(signed.request.nonce, U256::from(9));
    assert_eq!(
        signed.recover_signer(forwarder.domain()).unwrap(),
        wallet.address()
    );
}

#[rstest]
#[tokio::test]
async fn rpc_failure_is_retryable(forwarder_address: Address) {
    let asserter = Asserter::new();
    let provider = ProviderBuilder::new().connect_mocked_client(asserter.clone());
    let forwarder = Forwarder::new(
        1,
        forwarder_address,
        ContractNonceReader::new(forwarder_address, provider),
    );
    let wallet = PrivateKeySigner::random();

    asserter.push_failure_msg("header not found");
    let err = sign_meta_tx_request(
        &wallet,
        &forwarder,
        MetaTxInput::new(wallet.address(), Address::from([0x44u8; 20]), calls::claim_fee()),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        Error::NonceFetch {
            retryable: true,
            attempts: 1,
            ..
        }
    ));
}

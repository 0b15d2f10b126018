// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! Call data for the v5 pool entry points a relayer forwards on behalf of a
//! user. The returned bytes go into `ForwardRequest.data`.

use alloy::{
    primitives::{Bytes, U256},
    sol,
    sol_types::SolCall,
};

pub use ISynthereumPoolV5::{ExchangeParams, MintParams, RedeemParams};

sol! {
    interface ISynthereumPoolV5 {
        #[derive(Debug, PartialEq, Eq)]
        struct MintParams {
            uint256 minNumTokens;
            uint256 collateralAmount;
            uint256 expiration;
            address recipient;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct RedeemParams {
            uint256 numTokens;
            uint256 minCollateral;
            uint256 expiration;
            address recipient;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct ExchangeParams {
            address destPool;
            uint256 numTokens;
            uint256 minDestNumTokens;
            uint256 expiration;
            address recipient;
        }

        function mint(MintParams calldata mintParams)
            external
            returns (uint256 syntheticTokensMinted, uint256 feePaid);

        function redeem(RedeemParams calldata redeemParams)
            external
            returns (uint256 collateralRedeemed, uint256 feePaid);

        function exchange(ExchangeParams calldata exchangeParams)
            external
            returns (uint256 destNumTokensMinted, uint256 feePaid);

        function withdrawLiquidity(uint256 lpCollateral)
            external
            returns (uint256 collateralWithdrawn);

        function increaseCollateral(uint256 collateralToTransfer, uint256 collateralToIncrease)
            external
            returns (uint256 newTotalCollateral);

        function decreaseCollateral(uint256 collateralToDecrease, uint256 collateralToWithdraw)
            external
            returns (uint256 newTotalCollateral);

        function claimFee() external returns (uint256 feeClaimed);

        function liquidate(uint256 numSynthTokens)
            external
            returns (uint256 synthTokensLiquidated, uint256 collateralReceived, uint256 rewardAmount);

        function settleEmergencyShutdown() external returns (uint256 synthTokensSettled, uint256 collateralSettled);
    }
}

fn encode<C: SolCall>(call: C) -> Bytes {
    call.abi_encode().into()
}

pub fn mint(params: MintParams) -> Bytes {
    encode(ISynthereumPoolV5::mintCall { mintParams: params })
}

pub fn redeem(params: RedeemParams) -> Bytes {
    encode(ISynthereumPoolV5::redeemCall {
        redeemParams: params,
    })
}

pub fn exchange(params: ExchangeParams) -> Bytes {
    encode(ISynthereumPoolV5::exchangeCall {
        exchangeParams: params,
    })
}

pub fn withdraw_liquidity(lp_collateral: U256) -> Bytes {
    encode(ISynthereumPoolV5::withdrawLiquidityCall {
        lpCollateral: lp_collateral,
    })
}

pub fn increase_collateral(collateral_to_transfer: U256, collateral_to_increase: U256) -> Bytes {
    encode(ISynthereumPoolV5::increaseCollateralCall {
        collateralToTransfer: collateral_to_transfer,
        collateralToIncrease: collateral_to_increase,
    })
}

pub fn decrease_collateral(collateral_to_decrease: U256, collateral_to_withdraw: U256) -> Bytes {
    encode(ISynthereumPoolV5::decreaseCollateralCall {
        collateralToDecrease: collateral_to_decrease,
        collateralToWithdraw: collateral_to_withdraw,
    })
}

pub fn claim_fee() -> Bytes {
    encode(ISynthereumPoolV5::claimFeeCall {})
}

pub fn liquidate(num_synth_tokens: U256) -> Bytes {
    encode(ISynthereumPoolV5::liquidateCall {
        numSynthTokens: num_synth_tokens,
    })
}

pub fn settle_emergency_shutdown() -> Bytes {
    encode(ISynthereumPoolV5::settleEmergencyShutdownCall {})
}

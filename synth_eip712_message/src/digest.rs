// Copyright 2023-, Semiotic AI, Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Domain separator and digest
//!
//! The two hashing steps that surround a struct hash:
//!
//! ```text
//! domainSeparator = keccak256(abi.encode(DOMAIN_TYPEHASH, keccak256(name), keccak256(version), chainId, verifyingContract))
//! digest          = keccak256(0x19 ‖ 0x01 ‖ domainSeparator ‖ structHash)
//! ```
//!
//! Both are bit-exact protocol requirements. A verifier that computes them
//! differently will silently reject every signature.

use alloy::{
    dyn_abi::Eip712Domain,
    primitives::{keccak256, Address, B256, U256},
    sol_types::{SolStruct, SolValue},
};

/// Type string of the four-field EIP712 domain used by Synthereum contracts.
pub const EIP712_DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// EIP-191 version byte `0x19` followed by the structured data version `0x01`.
pub const EIP191_TYPED_DATA_PREFIX: [u8; 2] = [0x19, 0x01];

/// Builds the domain separator from its four fields.
///
/// `version` is hashed as given, so callers must pass exactly the string the
/// verifying contract was deployed with.
pub fn build_domain_separator(
    chain_id: u64,
    verifying_contract: Address,
    name: &str,
    version: &str,
) -> B256 {
    keccak256(
        (
            keccak256(EIP712_DOMAIN_TYPE),
            keccak256(name),
            keccak256(version),
            U256::from(chain_id),
            verifying_contract,
        )
            .abi_encode(),
    )
}

/// Hashes `0x1901 ‖ domain_separator ‖ struct_hash`.
pub fn compose_digest(domain_separator: B256, struct_hash: B256) -> B256 {
    let mut preimage = [0u8; 66];
    preimage[..2].copy_from_slice(&EIP191_TYPED_DATA_PREFIX);
    preimage[2..34].copy_from_slice(domain_separator.as_slice());
    preimage[34..].copy_from_slice(struct_hash.as_slice());
    keccak256(preimage)
}

/// Digest that gets signed for `message` under `domain`.
pub fn signing_hash<M: SolStruct>(domain: &Eip712Domain, message: &M) -> B256 {
    let digest = compose_digest(domain.separator(), message.eip712_hash_struct());
    log::trace!("{} digest: {digest}", M::NAME);
    digest
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{address, b256},
        sol,
        sol_types::eip712_domain,
    };
    use rstest::*;

    use super::*;

    sol! {
        struct Person {
            string name;
            address wallet;
        }

        struct Mail {
            Person from;
            Person to;
            string contents;
        }
    }

    fn mail() -> Mail {
        Mail {
            from: Person {
                name: "Cow".to_owned(),
                wallet: address!("CD2a3d9F938E13CD947Ec05AbC7FE734Df8DD826"),
            },
            to: Person {
                name: "Bob".to_owned(),
                wallet: address!("bBbBBBBbbBBBbbbBbbBbbbbBBbBbbbbBbBbbBBbB"),
            },
            contents: "Hello, Bob!".to_owned(),
        }
    }

    #[test]
    fn domain_type_hash_is_pinned() {
        assert_eq!(
            keccak256(EIP712_DOMAIN_TYPE),
            b256!("8b73c3c69bb8fe3d512ecc4cf759cc79239f7b179b0ffacaa9a75d522b39400f")
        );
    }

    #[test]
    fn reproduces_eip712_reference_mail_digest() {
        let domain = eip712_domain! {
            name: "Ether Mail",
            version: "1",
            chain_id: 1,
            verifying_contract: address!("CcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"),
        };
        let separator = build_domain_separator(
            1,
            address!("CcCCccccCCCCcCCCCCCcCcCccCcCCCcCcccccccC"),
            "Ether Mail",
            "1",
        );
        assert_eq!(
            separator,
            b256!("f2cee375fa42b42143804025fc449deafd50cc031ca257e0b194a650a912090f")
        );
        assert_eq!(separator, domain.separator());

        let digest = compose_digest(separator, mail().eip712_hash_struct());
        assert_eq!(
            digest,
            b256!("be609aee343fb3c4b28e1df9e632fca64fcfaede20f02e86244efddf30957bd2")
        );
        assert_eq!(digest, mail().eip712_signing_hash(&domain));
        assert_eq!(digest, signing_hash(&domain, &mail()));
    }

    #[rstest]
    #[case::chain_id(1, 42, [0x33u8; 20], [0x33u8; 20])]
    #[case::verifying_contract(1, 1, [0x33u8; 20], [0x44u8; 20])]
    fn domain_separator_binds_chain_and_contract(
        #[case] chain_a: u64,
        #[case] chain_b: u64,
        #[case] contract_a: [u8; 20],
        #[case] contract_b: [u8; 20],
    ) {
        let a = build_domain_separator(chain_a, Address::from(contract_a), "Synthereum Pool", "3");
        let b = build_domain_separator(chain_b, Address::from(contract_b), "Synthereum Pool", "3");
        assert_ne!(a, b);
    }

    #[test]
    fn version_string_is_hashed_verbatim() {
        let contract = Address::from([0x33u8; 20]);
        assert_ne!(
            build_domain_separator(1, contract, "Synthereum Pool", "3"),
            build_domain_separator(1, contract, "Synthereum Pool", "3.0.0")
        );
    }

    #[test]
    fn prefix_and_order_matter() {
        let left = B256::repeat_byte(0xaa);
        let right = B256::repeat_byte(0xbb);
        assert_ne!(compose_digest(left, right), compose_digest(right, left));

        let mut unprefixed = [0u8; 64];
        unprefixed[..32].copy_from_slice(left.as_slice());
        unprefixed[32..].copy_from_slice(right.as_slice());
        assert_ne!(compose_digest(left, right), keccak256(unprefixed));
    }
}

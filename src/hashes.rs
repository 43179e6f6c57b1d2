/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use k256::{
    elliptic_curve::hash2curve::{ExpandMsgXmd, GroupDigest},
    Secp256k1
};
use num_bigint::BigUint;
use sha2::{Digest, Sha256, Sha512};
use sha3::Keccak256;

use crate::config::{HashFunction, SignatureConfig};
use crate::curve::{Curve, derive_public_key};
use crate::errors::SignatureError;
use crate::point::Point;
use crate::scalar::*;

///An input to `hash`: either an integer or a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HashItem {
    Int(BigUint),
    Str(String)

} impl HashItem {
    ///Decimal for integers, the string itself otherwise.
    fn as_text(&self) -> String {
        return match self {
            Self::Int(value) => value.to_str_radix(10),
            Self::Str(value) => value.clone()
        }
    }

    ///`abi.encodePacked` layout: `uint256` for integers, raw UTF-8 for strings.
    fn as_packed(&self) -> Result<Vec<u8>, SignatureError> {
        return match self {
            Self::Int(value) => to_be_bytes_fixed(value, 32),
            Self::Str(value) => Ok(value.as_bytes().to_vec())
        }
    }

} impl From<&str> for HashItem {
    fn from(value: &str) -> Self {
        return Self::Str(value.to_owned())
    }

} impl From<String> for HashItem {
    fn from(value: String) -> Self {
        return Self::Str(value)
    }

} impl From<BigUint> for HashItem {
    fn from(value: BigUint) -> Self {
        return Self::Int(value)
    }

} impl From<&BigUint> for HashItem {
    fn from(value: &BigUint) -> Self {
        return Self::Int(value.clone())
    }
}

///Hash bytes with the selected digest.
pub fn digest(data: &[u8], hash: HashFunction) -> Vec<u8> {
    return match hash {
        HashFunction::Keccak256 => Keccak256::digest(data).to_vec(),
        HashFunction::Sha256 => Sha256::digest(data).to_vec(),
        HashFunction::Sha512 => Sha512::digest(data).to_vec()
    }
}

///Hash a list of items to a lowercase hex digest.
///
///Without EVM compatibility the items' text forms are concatenated.
///With it, integers become 32-byte big-endian words and strings their UTF-8 bytes.
pub fn hash(items: &[HashItem], config: &SignatureConfig) -> Result<String, SignatureError> {
    config.validate()?;
    let data = match config.evm_compatibility {
        true => {
            let mut packed: Vec<u8> = Vec::new();
            for item in items {
                packed.extend(item.as_packed()?);
            }
            packed
        },
        false => text_encoding(items).into_bytes()
    };
    return Ok(hex::encode(digest(&data, config.hash)))
}

///Hash a list of items to an integer modulo the curve order.
pub fn hash_to_scalar(items: &[HashItem], curve: &Curve, config: &SignatureConfig) -> Result<BigUint, SignatureError> {
    return Ok(from_hex(&hash(items, config)?)? % curve.order())
}

///Map items to a point, with the curve's standard hash-to-curve map.
///
///Only secp256k1 has one (RFC 9380, `secp256k1_XMD:SHA-256_SSWU_RO_`).
pub fn hash_to_curve(items: &[HashItem], curve: &Curve) -> Result<Point, SignatureError> {
    return match curve {
        Curve::Secp256k1 => {
            let msg = text_encoding(items);
            let point = Secp256k1::hash_from_bytes::<ExpandMsgXmd<Sha256>>(
                &[msg.as_bytes()], &[domains::SECP256K1_HASH_TO_CURVE]
            ).map_err(|_| SignatureError::InvalidPoint("hash to curve failed".to_owned()))?;
            Point::from_secp256k1(point)
        },
        _ => Err(curve.unsupported("hash to curve"))
    }
}

///The point a key image is derived from: `hash_to_curve([public_key, flag])`.
pub fn key_image_basis(public_key: &Point, linkability_flag: &str) -> Result<Point, SignatureError> {
    return hash_to_curve(
        &[public_key.serialize()?.into(), linkability_flag.into()],
        public_key.curve()
    )
}

///Return the key image of a private key within a linkability context.
///
///The same key and flag always give the same key image.
///The empty flag is the global context.
pub fn key_image(private_key: &BigUint, curve: &Curve, linkability_flag: &str) -> Result<Point, SignatureError> {
    let public_key = derive_public_key(private_key, curve)?;
    return key_image_basis(&public_key, linkability_flag)?.mult(private_key)
}

fn text_encoding(items: &[HashItem]) -> String {
    return items.iter().map(|item| item.as_text()).collect()
}

pub mod domains {
    //! Pre-defined hash domains

    pub const SECP256K1_HASH_TO_CURVE: &[u8] =          b"secp256k1_XMD:SHA-256_SSWU_RO_";
}

/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Big-integer helpers for scalars and field elements.
//!
//! Scalars (private keys, nonces, challenges, responses) live modulo the group order `N`.
//! Only raw coordinate arithmetic is done modulo the field prime `P`.

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::errors::SignatureError;

///`a - b mod m`, for any `a` and `b`
pub fn sub_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    return ((a % m) + m - (b % m)) % m
}

///`a * b mod m`
pub fn mul_mod(a: &BigUint, b: &BigUint, m: &BigUint) -> BigUint {
    return (a * b) % m
}

///Modular inverse for a prime modulus (Fermat).
pub fn inv_mod(a: &BigUint, p: &BigUint) -> BigUint {
    return a.modpow(&(p - 2u32), p)
}

///Check `0 < value < n`
pub fn is_in_range(value: &BigUint, n: &BigUint) -> bool {
    return !value.is_zero() && value < n
}

///Draw a uniformly random scalar in `[1, n - 1]`.
///
///64 random bytes are reduced, so the bias is negligible for 256-bit orders.
///Every call draws fresh randomness: a value is never reused.
pub fn random_scalar<R: RngCore + CryptoRng>(n: &BigUint, rng: &mut R) -> Result<BigUint, SignatureError> {
    if n <= &BigUint::one() {
        return Err(SignatureError::InvalidParams("group order is too small".to_owned()));
    }
    let mut wide = [0u8; 64];
    rng.fill_bytes(&mut wide);
    let scalar = (BigUint::from_bytes_be(&wide) % (n - 1u32)) + 1u32;
    wide.zeroize();
    return Ok(scalar)
}

///Big-endian encoding, left-padded to exactly `width` bytes.
pub fn to_be_bytes_fixed(value: &BigUint, width: usize) -> Result<Vec<u8>, SignatureError> {
    let bytes = value.to_bytes_be();
    if bytes.len() > width {
        return Err(SignatureError::InvalidParams(
            format!("integer does not fit in {} bytes", width)));
    }
    let mut out = vec![0u8; width - bytes.len()];
    out.extend_from_slice(&bytes);
    return Ok(out)
}

///Big-endian encoding into 32 bytes.
pub fn to_be_bytes_32(value: &BigUint) -> Result<[u8; 32], SignatureError> {
    let mut out = [0u8; 32];
    out.copy_from_slice(&to_be_bytes_fixed(value, 32)?);
    return Ok(out)
}

///Little-endian encoding into 32 bytes.
pub fn to_le_bytes_32(value: &BigUint) -> Result<[u8; 32], SignatureError> {
    let bytes = value.to_bytes_le();
    if bytes.len() > 32 {
        return Err(SignatureError::InvalidParams("integer does not fit in 32 bytes".to_owned()));
    }
    let mut out = [0u8; 32];
    out[..bytes.len()].copy_from_slice(&bytes);
    return Ok(out)
}

///Lowercase hex without `0x` prefix or leading zeros (`"0"` for zero).
pub fn to_hex(value: &BigUint) -> String {
    return value.to_str_radix(16)
}

///Parse hex digits (`[0-9a-fA-F]+`, no `0x` prefix).
pub fn from_hex(hex: &str) -> Result<BigUint, SignatureError> {
    if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(SignatureError::InvalidParams(format!("not a hex integer: {}", hex)));
    }
    return BigUint::parse_bytes(hex.as_bytes(), 16)
        .ok_or_else(|| SignatureError::InvalidParams(format!("not a hex integer: {}", hex)))
}

///Parse a decimal integer (`[0-9]+`).
pub fn from_decimal(decimal: &str) -> Result<BigUint, SignatureError> {
    if decimal.is_empty() || !decimal.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SignatureError::InvalidParams(format!("not a decimal integer: {}", decimal)));
    }
    return BigUint::parse_bytes(decimal.as_bytes(), 10)
        .ok_or_else(|| SignatureError::InvalidParams(format!("not a decimal integer: {}", decimal)))
}

/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Signing/verification configuration

use serde::{Serialize, Deserialize};
use crate::errors::SignatureError;

///Digest used for challenges and message digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashFunction {
    #[default]
    Keccak256,
    Sha256,
    Sha512
}

///Options accepted by `sign` and `verify`.
///
///A signature must be verified with the same configuration it was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignatureConfig {
    pub hash: HashFunction,
    ///Feed the digest with the `abi.encodePacked` layout (32-byte words for integers),
    ///so that an EVM verifier can recompute the challenges.
    ///Only meaningful with `HashFunction::Keccak256`.
    pub evm_compatibility: bool

} impl SignatureConfig {
    ///Configuration with the default digest and EVM compatibility enabled.
    pub fn evm() -> Self {
        return Self{ hash: HashFunction::Keccak256, evm_compatibility: true }
    }

    ///Parse a configuration object such as `{"hash": "sha512"}`.
    pub fn from_json(json: &str) -> Result<Self, SignatureError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SignatureError::InvalidParams(format!("malformed config: {}", e)))?;
        config.validate()?;
        return Ok(config)
    }

    ///Reject option combinations that make no sense.
    pub fn validate(&self) -> Result<(), SignatureError> {
        if self.evm_compatibility && self.hash != HashFunction::Keccak256 {
            return Err(SignatureError::InvalidParams(
                "EVM compatibility requires the keccak256 digest".to_owned()));
        }
        return Ok(())
    }
}

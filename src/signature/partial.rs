/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Signing with a key held somewhere else (hardware wallet, browser extension...).
//!
//! 1. `RingSignature::partial_sign` walks the ring knowing only the signer's public key.
//! 2. The key holder computes `PartialSignature::signer_response`.
//! 3. `RingSignature::combine` closes the ring.

use log::debug;
use num_bigint::BigUint;
use rand::{
    rngs::OsRng,
    CryptoRng,
    RngCore
};
use serde::{Serialize, Deserialize};

use crate::internal_common::*;
use crate::codec::PartialSignatureJson;
use super::signature_utils::*;
use super::RingSignature;

///A ring signature waiting for the signer's response.
///
///**This contains the signing nonce `alpha`.**
///Anyone who sees it together with the final signature can recover the private key,
///so it should only ever be sent to the key holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PartialSignatureJson", into = "PartialSignatureJson")]
pub struct PartialSignature {
    message: String,
    ring: Vec<Point>,
    pi: usize,
    c: BigUint,
    cpi: BigUint,
    alpha: BigUint,
    responses: Vec<BigUint>,
    curve: Curve,
    config: SignatureConfig

} impl PartialSignature {
    ///Assemble a partial signature from its parts.
    ///
    ///Every response except the signer's (`responses[pi]`, ignored) must be in `[1, N - 1]`.
    pub fn new(
        message: String,
        ring: Vec<Point>,
        pi: usize,
        c: BigUint,
        cpi: BigUint,
        alpha: BigUint,
        responses: Vec<BigUint>,
        curve: Curve,
        config: SignatureConfig
    ) -> Result<Self, SignatureError> {
        if ring.is_empty() {
            return Err(SignatureError::EmptyRing)
        }
        if ring.len() != responses.len() {
            return Err(SignatureError::LengthMismatch)
        }
        if pi >= ring.len() {
            return Err(SignatureError::InvalidParams("signer index is out of the ring".to_owned()))
        }
        let order = curve.order();
        if &c >= order || &cpi >= order {
            return Err(SignatureError::InvalidParams("challenges must be lower than N".to_owned()))
        }
        if !is_in_range(&alpha, order) {
            return Err(SignatureError::InvalidParams("nonce must be in [1, N - 1]".to_owned()))
        }
        let others_valid = responses.iter().enumerate()
            .filter(|(i, _)| *i != pi)
            .all(|(_, response)| is_in_range(response, order));
        if !others_valid {
            return Err(SignatureError::InvalidResponses)
        }
        config.validate()?;
        check_ring(&ring, &curve, false)?;

        return Ok(Self{ message, ring, pi, c, cpi, alpha, responses, curve, config })
    }

    pub fn message(&self) -> &str {
        return &self.message
    }

    pub fn ring(&self) -> &[Point] {
        return &self.ring
    }

    ///Index of the signer in the ring.
    pub fn pi(&self) -> usize {
        return self.pi
    }

    ///The closing challenge `c_0`.
    pub fn c(&self) -> &BigUint {
        return &self.c
    }

    ///The signer's challenge `c_pi`.
    pub fn cpi(&self) -> &BigUint {
        return &self.cpi
    }

    pub fn alpha(&self) -> &BigUint {
        return &self.alpha
    }

    pub fn responses(&self) -> &[BigUint] {
        return &self.responses
    }

    pub fn curve(&self) -> &Curve {
        return &self.curve
    }

    pub fn config(&self) -> &SignatureConfig {
        return &self.config
    }

    ///Computed by the key holder: `alpha - c_pi * private_key mod N`.
    ///
    ///Fails if `private_key` does not belong to the ring member at `pi`.
    pub fn signer_response(&self, private_key: &BigUint) -> Result<BigUint, SignatureError> {
        let public_key = derive_public_key(private_key, &self.curve)?;
        if public_key != self.ring[self.pi] {
            return Err(SignatureError::InvalidParams(
                "private key does not match the signer's public key".to_owned()))
        }
        let order = self.curve.order();
        return Ok(sub_mod(&self.alpha, &mul_mod(&self.cpi, private_key, order), order))
    }
}

impl RingSignature {
    ///Run the signing algorithm up to, but excluding, the signer's response.
    ///
    ///The ring rules are the same as for `sign`.
    ///Only the non-linkable variant can be signed this way.
    pub fn partial_sign(
        ring: &[Point], signer_public_key: &Point, message: &str, curve: &Curve, config: &SignatureConfig
    ) -> Result<PartialSignature, SignatureError> {
        return Self::partial_sign_with_rng(ring, signer_public_key, message, curve, config, &mut OsRng)
    }

    ///Same as `partial_sign`, with a caller-supplied CSPRNG.
    pub fn partial_sign_with_rng<R: RngCore + CryptoRng>(
        ring: &[Point], signer_public_key: &Point, message: &str, curve: &Curve, config: &SignatureConfig, rng: &mut R
    ) -> Result<PartialSignature, SignatureError> {
        config.validate()?;
        let (ring, signer_index) = prepare_ring(ring, signer_public_key, curve)?;

        debug!("partially signing with a ring of {} members on {}", ring.len(), curve.name().as_str());

        let OpenChain{ alpha, challenges, responses } = {
            let context = ChainContext::new(&ring, message, curve, config, None)?;
            open_chain(&context, signer_index, rng)?
        };

        return PartialSignature::new(
            message.to_owned(),
            ring,
            signer_index,
            challenges[0].clone(),
            challenges[signer_index].clone(),
            alpha,
            responses,
            curve.clone(),
            *config
        )
    }

    ///Close a partial signature with the signer's response.
    ///
    ///The result is verified before being returned:
    ///a response that does not close the ring is rejected with `SignatureError::InvalidParams`.
    pub fn combine(partial: &PartialSignature, signer_response: &BigUint) -> Result<RingSignature, SignatureError> {
        let mut responses = partial.responses.clone();
        responses[partial.pi] = signer_response.clone();

        let signature = RingSignature::new(
            partial.message.clone(),
            partial.ring.clone(),
            partial.c.clone(),
            responses,
            partial.curve.clone(),
            None
        )?;
        if !signature.verify(&partial.config)? {
            return Err(SignatureError::InvalidParams("signer response does not close the ring".to_owned()))
        }
        return Ok(signature)
    }
}

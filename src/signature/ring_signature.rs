/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use log::{debug, warn};
use num_bigint::BigUint;
use rand::{
    rngs::OsRng,
    CryptoRng,
    RngCore
};
use serde::{Serialize, Deserialize};

use crate::internal_common::*;
use crate::codec::SignatureJson;
use super::signature_utils::*;

///Key image of a linkable signature, with the context it was derived in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linkability {
    pub key_image: Point,
    ///Linkability context. The empty string is the global context.
    pub flag: String
}

///A ring signature.
///
///Proves that the message was signed by the private key of one of the ring's members,
///without revealing which one.
///Linkable signatures also carry a key image:
///two signatures by the same key under the same flag have the same key image.
///
///A `RingSignature` can only be obtained by signing or by decoding,
///and both paths check every structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SignatureJson", into = "SignatureJson")]
pub struct RingSignature {
    message: String,
    ring: Vec<Point>,
    c: BigUint,
    responses: Vec<BigUint>,
    curve: Curve,
    linkability: Option<Linkability>

} impl RingSignature {
    ///Assemble a signature from its parts, checking that:
    /// * the ring is non-empty, on `curve`, without duplicates or low-order points
    /// * there is one response per ring member, each in `[1, N - 1]`
    /// * `c < N`
    /// * the key image, if any, is a valid point on `curve`
    pub fn new(
        message: String, ring: Vec<Point>, c: BigUint, responses: Vec<BigUint>, curve: Curve, linkability: Option<Linkability>
    ) -> Result<Self, SignatureError> {
        if ring.is_empty() {
            return Err(SignatureError::EmptyRing)
        }
        if ring.len() != responses.len() {
            return Err(SignatureError::LengthMismatch)
        }
        let order = curve.order();
        if &c >= order {
            return Err(SignatureError::InvalidParams("challenge must be lower than N".to_owned()))
        }
        if !responses.iter().all(|response| is_in_range(response, order)) {
            return Err(SignatureError::InvalidResponses)
        }
        check_ring(&ring, &curve, false)?;
        if let Some(linkability) = &linkability {
            if linkability.key_image.curve() != &curve {
                return Err(SignatureError::CurveMismatch)
            }
            linkability.key_image.check_low_order()?;
        }

        return Ok(Self{ message, ring, c, responses, curve, linkability })
    }

    pub fn message(&self) -> &str {
        return &self.message
    }

    pub fn ring(&self) -> &[Point] {
        return &self.ring
    }

    ///The closing challenge `c_0`.
    pub fn c(&self) -> &BigUint {
        return &self.c
    }

    pub fn responses(&self) -> &[BigUint] {
        return &self.responses
    }

    pub fn curve(&self) -> &Curve {
        return &self.curve
    }

    pub fn linkability(&self) -> Option<&Linkability> {
        return self.linkability.as_ref()
    }

    pub fn key_image(&self) -> Option<&Point> {
        return self.linkability.as_ref().map(|linkability| &linkability.key_image)
    }

    pub fn linkability_flag(&self) -> Option<&str> {
        return self.linkability.as_ref().map(|linkability| linkability.flag.as_str())
    }

    pub fn is_linkable(&self) -> bool {
        return self.linkability.is_some()
    }

    ///Sign `message` given a **sorted** ring and a private key.
    ///
    ///The signer's public key is inserted in the ring if it is not already there.
    ///An empty ring gives a one-member ring, which is a plain Schnorr signature.
    ///
    ///Returns `SignatureError::InvalidRing` if the ring is not sorted.
    pub fn sign(
        ring: &[Point], private_key: &BigUint, message: &str, curve: &Curve, config: &SignatureConfig
    ) -> Result<Self, SignatureError> {
        return Self::sign_with_rng(ring, private_key, message, curve, None, config, &mut OsRng)
    }

    ///Same as `sign`, but the signature also carries a key image for `linkability_flag`.
    ///
    ///Only curves with a hash-to-curve map (secp256k1) support linkable signatures.
    pub fn sign_linkable(
        ring: &[Point], private_key: &BigUint, message: &str, curve: &Curve, linkability_flag: &str, config: &SignatureConfig
    ) -> Result<Self, SignatureError> {
        return Self::sign_with_rng(ring, private_key, message, curve, Some(linkability_flag), config, &mut OsRng)
    }

    ///Signing with a caller-supplied CSPRNG.
    ///
    ///`linkability_flag` selects the linkable variant.
    pub fn sign_with_rng<R: RngCore + CryptoRng>(
        ring: &[Point],
        private_key: &BigUint,
        message: &str,
        curve: &Curve,
        linkability_flag: Option<&str>,
        config: &SignatureConfig,
        rng: &mut R
    ) -> Result<Self, SignatureError> {
        config.validate()?;
        let order = curve.order();
        if !is_in_range(private_key, order) {
            return Err(SignatureError::InvalidParams("private key must be in [1, N - 1]".to_owned()))
        }
        let public_key = derive_public_key(private_key, curve)?;
        let (ring, signer_index) = prepare_ring(ring, &public_key, curve)?;

        debug!(
            "signing with a ring of {} members on {} (linkable: {})",
            ring.len(), curve.name().as_str(), linkability_flag.is_some()
        );

        let linkability = match linkability_flag {
            Some(flag) => Some(Linkability{
                key_image: key_image(private_key, curve, flag)?,
                flag: flag.to_owned()
            }),
            None => None
        };

        let OpenChain{ alpha, challenges, mut responses } = {
            let context = ChainContext::new(&ring, message, curve, config, linkability.as_ref())?;
            open_chain(&context, signer_index, rng)?
        };

        //close the ring: r_pi = alpha - c_pi * k
        responses[signer_index] = sub_mod(&alpha, &mul_mod(&challenges[signer_index], private_key, order), order);

        return Self::new(
            message.to_owned(),
            ring,
            challenges[0].clone(),
            responses,
            curve.clone(),
            linkability
        )
    }

    ///Check the signature.
    ///
    ///Returns `Ok(false)` if the challenge chain does not close or hits the identity,
    ///and `Err` if a ring member (or the key image) is invalid or of low order.
    ///`config` must be the one used when signing.
    pub fn verify(&self, config: &SignatureConfig) -> Result<bool, SignatureError> {
        config.validate()?;
        for member in &self.ring {
            if let Err(err) = member.check_low_order() {
                warn!("verification aborted, invalid ring member: {}", err);
                return Err(err)
            }
        }
        if let Some(key_image) = self.key_image() {
            key_image.check_low_order()?;
        }

        debug!(
            "verifying a ring of {} members on {} (linkable: {})",
            self.ring.len(), self.curve.name().as_str(), self.is_linkable()
        );

        let context = ChainContext::new(&self.ring, &self.message, &self.curve, config, self.linkability.as_ref())?;
        let mut c = self.c.clone();
        for (i, response) in self.responses.iter().enumerate() {
            c = match context.compute_c(i, None, Some((response, &c)))? {
                Some(next) => next,
                None => {
                    debug!("identity commitment at ring index {}", i);
                    return Ok(false)
                }
            };
        }
        //check if we end up back where we started
        return Ok(c == self.c)
    }

    ///Two signatures are linked if they are both linkable, on the same curve,
    ///under the same flag, and have the same key image.
    ///
    ///This does not verify either signature.
    pub fn is_linked(&self, other: &RingSignature) -> bool {
        return match (&self.linkability, &other.linkability) {
            (Some(a), Some(b)) => self.curve == other.curve && a == b,
            _ => false
        }
    }
}

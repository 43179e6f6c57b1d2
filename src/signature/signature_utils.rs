/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use num_bigint::BigUint;
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

use crate::internal_common::*;
use super::Linkability;

///Everything a challenge step needs besides the per-step values.
pub(crate) struct ChainContext<'a> {
    ring: &'a [Point],
    curve: &'a Curve,
    config: &'a SignatureConfig,
    serialized_ring: Vec<HashItem>,
    message_digest: BigUint,
    linking: Option<Linking<'a>>
}

///Key image and the per-member points it is compared against.
struct Linking<'a> {
    key_image: &'a Point,
    bases: Vec<Point>
}

impl<'a> ChainContext<'a> {
    pub(crate) fn new(
        ring: &'a [Point], message: &str, curve: &'a Curve, config: &'a SignatureConfig, linkability: Option<&'a Linkability>
    ) -> Result<Self, SignatureError> {
        let serialized_ring = serialize_ring(ring)?.into_iter().map(HashItem::from).collect();
        let message_digest = from_hex(&hash(&[message.into()], config)?)?;

        let linking = match linkability {
            Some(linkability) => {
                //H_i = hash_to_curve([P_i, flag]) for every member
                let bases = ring.iter()
                    .map(|member| key_image_basis(member, &linkability.flag))
                    .collect::<Result<Vec<Point>, SignatureError>>()?;
                Some(Linking{ key_image: &linkability.key_image, bases })
            },
            None => None
        };

        return Ok(Self{ ring, curve, config, serialized_ring, message_digest, linking })
    }

    pub(crate) fn len(&self) -> usize {
        return self.ring.len()
    }

    ///Compute the challenge that follows member `index`.
    ///
    ///With `alpha` (signer only): the commitment is `alpha * G` (and `alpha * H_index`).
    ///With `previous = (r, c)`: the commitment is `r * G + c * P_index` (and `r * H_index + c * I`).
    ///One of the two is required.
    ///
    ///Returns `None` if a commitment is the identity. No honest chain step produces one.
    pub(crate) fn compute_c(
        &self, index: usize, alpha: Option<&BigUint>, previous: Option<(&BigUint, &BigUint)>
    ) -> Result<Option<BigUint>, SignatureError> {
        let g = self.curve.generator_point()?;
        let member = self.ring.get(index)
            .ok_or_else(|| SignatureError::InvalidParams(format!("no ring member at index {}", index)))?;

        let mut commitments: Vec<Point> = Vec::with_capacity(2);
        match (alpha, previous) {
            (Some(alpha), _) => {
                commitments.push(g.mult(alpha)?);
                if let Some(linking) = &self.linking {
                    commitments.push(linking.bases[index].mult(alpha)?);
                }
            },
            (None, Some((response, challenge))) => {
                match g.mult_add(response, member, challenge)? {
                    Some(commitment) => commitments.push(commitment),
                    None => return Ok(None)
                }
                if let Some(linking) = &self.linking {
                    match linking.bases[index].mult_add(response, linking.key_image, challenge)? {
                        Some(commitment) => commitments.push(commitment),
                        None => return Ok(None)
                    }
                }
            },
            (None, None) => return Err(SignatureError::MissingParams)
        }

        let mut items = self.serialized_ring.clone();
        items.push(HashItem::Int(self.message_digest.clone()));
        for commitment in &commitments {
            items.push(commitment.serialize()?.into());
        }
        return hash_to_scalar(&items, self.curve, self.config).map(Some)
    }
}

///A chain that has been walked from the signer's nonce all the way back to the signer,
///but not closed yet.
pub(crate) struct OpenChain {
    pub(crate) alpha: BigUint,
    pub(crate) challenges: Vec<BigUint>,
    ///The signer's slot holds zero until the chain is closed.
    pub(crate) responses: Vec<BigUint>
}

///Walk the ring from `signer_index + 1` to `signer_index`, with random responses for
///every other member.
pub(crate) fn open_chain<R: RngCore + CryptoRng>(
    context: &ChainContext, signer_index: usize, rng: &mut R
) -> Result<OpenChain, SignatureError> {
    let n = context.len();
    let order = context.curve.order();
    let alpha = random_scalar(order, rng)?;

    let mut challenges: Vec<BigUint> = vec![BigUint::zero(); n];
    let mut responses: Vec<BigUint> = vec![BigUint::zero(); n];

    let mut i = (signer_index + 1) % n;
    //alpha is in [1, N - 1], so alpha * G is never the identity
    challenges[i] = context.compute_c(signer_index, Some(&alpha), None)?
        .ok_or_else(|| SignatureError::InvalidPoint("identity point".to_owned()))?;
    while i != signer_index {
        //redraw the response in the (negligible) case where it cancels out c * P
        let next = loop {
            responses[i] = random_scalar(order, rng)?;
            if let Some(c) = context.compute_c(i, None, Some((&responses[i], &challenges[i])))? {
                break c
            }
        };
        challenges[(i + 1) % n] = next;
        i = (i + 1) % n;
    }

    return Ok(OpenChain{ alpha, challenges, responses })
}

///Validate the caller's ring and put the signer's public key in it.
///
///An empty ring becomes `[signer_public_key]`.
///Otherwise the ring must be sorted, and the key is inserted at its sorted position if absent.
///Returns the final ring and the signer's index.
pub(crate) fn prepare_ring(
    ring: &[Point], signer_public_key: &Point, curve: &Curve
) -> Result<(Vec<Point>, usize), SignatureError> {
    if signer_public_key.curve() != curve {
        return Err(SignatureError::CurveMismatch)
    }
    signer_public_key.check_low_order()?;
    check_ring(ring, curve, true)?;

    if ring.is_empty() {
        return Ok((vec![signer_public_key.clone()], 0))
    }
    if !is_sorted(ring)? {
        return Err(SignatureError::InvalidRing)
    }
    let mut ring = ring.to_vec();
    let signer_index = insert_sorted(&mut ring, signer_public_key.clone());
    return Ok((ring, signer_index))
}

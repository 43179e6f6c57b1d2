/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

#[cfg(feature = "to_bytes")]
use num_bigint::BigUint;
#[cfg(feature = "to_bytes")]
use serde::{Serialize, Deserialize};

#[cfg(feature = "to_bytes")]
use crate::internal_common::*;

///Implements functions to convert to (`to_bytes`) and from (`from_bytes`) bytes.
///
///Points are stored compressed and integers as big-endian bytes.
///Decoding re-validates everything, exactly like the JSON transport.
#[cfg(feature = "to_bytes")]
pub trait ToBytes: Sized {
    fn to_bytes(&self) -> Result<Vec<u8>, SignatureError>;

    fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError>;
}

///Binary layout of a `RingSignature`.
#[cfg(feature = "to_bytes")]
#[derive(Serialize, Deserialize)]
struct SignatureBytes {
    message: String,
    ring: Vec<Vec<u8>>,
    c: Vec<u8>,
    responses: Vec<Vec<u8>>,
    linkability: Option<(Vec<u8>, String)>
}

#[cfg(feature = "to_bytes")]
impl ToBytes for Point {
    fn to_bytes(&self) -> Result<Vec<u8>, SignatureError> {
        return self.compress()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        return Point::decompress(bytes)
    }
}

#[cfg(feature = "to_bytes")]
impl ToBytes for RingSignature {
    fn to_bytes(&self) -> Result<Vec<u8>, SignatureError> {
        let linkability = match self.linkability() {
            Some(linkability) => Some((linkability.key_image.compress()?, linkability.flag.clone())),
            None => None
        };
        let encoded = SignatureBytes {
            message: self.message().to_owned(),
            ring: self.ring().iter()
                .map(|point| point.compress())
                .collect::<Result<Vec<_>, SignatureError>>()?,
            c: self.c().to_bytes_be(),
            responses: self.responses().iter().map(|response| response.to_bytes_be()).collect(),
            linkability
        };

        return match bincode::serialize(&encoded) {
            Ok(bytes) => Ok(bytes),
            Err(_) => Err(SignatureError::EncodingError)
        }
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, SignatureError> {
        let decoded: SignatureBytes = match bincode::deserialize(bytes) {
            Ok(decoded) => decoded,
            Err(e) => return Err(SignatureError::InvalidParams(format!("undecodable signature bytes: {}", e)))
        };

        let ring = decoded.ring.iter()
            .map(|point| Point::decompress(point))
            .collect::<Result<Vec<_>, SignatureError>>()?;
        //the curve is carried by the compressed points
        let curve = match ring.first() {
            Some(point) => point.curve().clone(),
            None => return Err(SignatureError::EmptyRing)
        };
        let linkability = match decoded.linkability {
            Some((key_image, flag)) => Some(Linkability{ key_image: Point::decompress(&key_image)?, flag }),
            None => None
        };

        return RingSignature::new(
            decoded.message,
            ring,
            BigUint::from_bytes_be(&decoded.c),
            decoded.responses.iter().map(|response| BigUint::from_bytes_be(response)).collect(),
            curve,
            linkability
        )
    }
}

/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Curve points in affine form.
//!
//! The group law itself is delegated to `k256` (secp256k1) and `curve25519-dalek` (ed25519).
//! A `Point` only keeps the curve and the affine coordinates, so that points can be ordered,
//! hashed and transported the same way on every curve.

use std::{
    cmp::Ordering,
    fmt,
    str::FromStr
};

use base64::{
    engine::general_purpose::STANDARD as BASE64,
    Engine as _
};
use curve25519_dalek::{
    edwards::{CompressedEdwardsY, EdwardsPoint},
    scalar::Scalar as EdwardsScalar,
    traits::IsIdentity
};
use k256::{
    elliptic_curve::{
        ops::Reduce,
        sec1::{FromEncodedPoint, ToEncodedPoint}
    },
    AffinePoint,
    EncodedPoint,
    FieldBytes,
    ProjectivePoint,
    Scalar as Secp256k1Scalar,
    U256
};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Serialize, Deserialize};

use crate::curve::*;
use crate::errors::SignatureError;
use crate::scalar::*;

///Length of `Point::compress`: curve tag, parity byte, 32-byte `x`.
pub const COMPRESSED_POINT_LEN: usize = 34;

///A point on a `Curve`, in affine coordinates.
///
///Both coordinates are reduced modulo the field prime.
///Equality compares the curve and both coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    curve: Curve,
    x: BigUint,
    y: BigUint
}

///A point in its curve library's own representation.
enum Backend {
    Secp256k1(ProjectivePoint),
    Ed25519(EdwardsPoint)

} impl Backend {
    fn is_identity(&self) -> bool {
        return match self {
            Self::Secp256k1(point) => *point == ProjectivePoint::IDENTITY,
            Self::Ed25519(point) => point.is_identity()
        }
    }
}

impl Point {
    ///Create a point, checking that the coordinates satisfy the curve equation.
    pub fn new(curve: Curve, x: BigUint, y: BigUint) -> Result<Self, SignatureError> {
        if !curve.is_on_curve(&x, &y)? {
            return Err(SignatureError::NotOnCurve)
        }
        return Ok(Self{ curve, x, y })
    }

    ///Create a point without checking the curve equation.
    ///
    ///Any group operation on such a point will still fail if it is not on the curve.
    pub fn new_unchecked(curve: Curve, x: BigUint, y: BigUint) -> Self {
        return Self{ curve, x, y }
    }

    pub fn curve(&self) -> &Curve {
        return &self.curve
    }

    pub fn x(&self) -> &BigUint {
        return &self.x
    }

    pub fn y(&self) -> &BigUint {
        return &self.y
    }

    ///`scalar * self`
    ///
    ///The scalar is reduced modulo the field prime, then modulo the group order by the curve library.
    pub fn mult(&self, scalar: &BigUint) -> Result<Point, SignatureError> {
        let scalar = scalar % self.curve.field_prime();
        let product = match self.to_backend()? {
            Backend::Secp256k1(point) => Backend::Secp256k1(point * secp256k1_scalar(&scalar)?),
            Backend::Ed25519(point) => Backend::Ed25519(point * ed25519_scalar(&scalar)?)
        };
        return Self::from_backend(&self.curve, product)
    }

    ///`self + other`
    pub fn add(&self, other: &Point) -> Result<Point, SignatureError> {
        if self.curve != other.curve {
            return Err(SignatureError::CurveMismatch)
        }
        let sum = match (self.to_backend()?, other.to_backend()?) {
            (Backend::Secp256k1(a), Backend::Secp256k1(b)) => Backend::Secp256k1(a + b),
            (Backend::Ed25519(a), Backend::Ed25519(b)) => Backend::Ed25519(a + b),
            _ => return Err(SignatureError::CurveMismatch)
        };
        return Self::from_backend(&self.curve, sum)
    }

    ///`a * self + b * other`, or `None` if the result is the identity.
    ///
    ///Scalars are reduced like in `mult`. The identity is only rejected once, on the final sum.
    pub fn mult_add(&self, a: &BigUint, other: &Point, b: &BigUint) -> Result<Option<Point>, SignatureError> {
        if self.curve != other.curve {
            return Err(SignatureError::CurveMismatch)
        }
        let p = self.curve.field_prime();
        let (a, b) = (a % p, b % p);
        let sum = match (self.to_backend()?, other.to_backend()?) {
            (Backend::Secp256k1(x), Backend::Secp256k1(y)) =>
                Backend::Secp256k1(x * secp256k1_scalar(&a)? + y * secp256k1_scalar(&b)?),
            (Backend::Ed25519(x), Backend::Ed25519(y)) =>
                Backend::Ed25519(x * ed25519_scalar(&a)? + y * ed25519_scalar(&b)?),
            _ => return Err(SignatureError::CurveMismatch)
        };
        if sum.is_identity() {
            return Ok(None)
        }
        return Self::from_backend(&self.curve, sum).map(Some)
    }

    ///`-self`
    pub fn negate(&self) -> Result<Point, SignatureError> {
        let p = self.curve.field_prime();
        return match &self.curve {
            //(x, y) -> (x, -y)
            Curve::Secp256k1 => Ok(Self{
                curve: self.curve.clone(), x: self.x.clone(), y: (p - &self.y) % p
            }),
            //(x, y) -> (-x, y)
            Curve::Ed25519 => Ok(Self{
                curve: self.curve.clone(), x: (p - &self.x) % p, y: self.y.clone()
            }),
            Curve::Custom(_) => Err(self.curve.unsupported("negation"))
        }
    }

    pub fn equals(&self, other: &Point) -> bool {
        return self == other
    }

    ///Order points by `x`, then by `y`. This is the ring order.
    pub fn cmp_coordinates(&self, other: &Point) -> Ordering {
        return self.x.cmp(&other.x).then_with(|| self.y.cmp(&other.y))
    }

    ///Reject the identity and points whose order is not the group order.
    ///
    ///secp256k1 has cofactor 1, so only the identity is rejected there.
    ///On ed25519 small-order and mixed-order points are rejected.
    pub fn check_low_order(&self) -> Result<(), SignatureError> {
        return match self.to_backend()? {
            Backend::Secp256k1(point) => match point == ProjectivePoint::IDENTITY {
                true => Err(SignatureError::InvalidPoint("identity point".to_owned())),
                false => Ok(())
            },
            Backend::Ed25519(point) => {
                if point.is_identity() || point.is_small_order() {
                    return Err(SignatureError::InvalidPoint("small order point".to_owned()))
                }
                match point.is_torsion_free() {
                    true => Ok(()),
                    false => Err(SignatureError::InvalidPoint("point has a torsion component".to_owned()))
                }
            }
        }
    }

    ///Compressed encoding, used as hash input:
    ///`[curve tag][0x02 | y parity][x, 32 bytes big-endian]`
    pub fn compress(&self) -> Result<Vec<u8>, SignatureError> {
        let parity = match self.y.bit(0) {
            true => 0x03,
            false => 0x02
        };
        let mut bytes = vec![self.curve.tag()?, parity];
        bytes.extend_from_slice(&to_be_bytes_fixed(&self.x, 32)?);
        return Ok(bytes)
    }

    ///Inverse of `compress`. The point is re-validated and must not be of low order.
    pub fn decompress(bytes: &[u8]) -> Result<Point, SignatureError> {
        if bytes.len() != COMPRESSED_POINT_LEN {
            return Err(SignatureError::InvalidPoint(
                format!("compressed points are {} bytes long", COMPRESSED_POINT_LEN)))
        }
        let curve = Curve::from_tag(bytes[0])?;
        let y_is_odd = match bytes[1] {
            0x02 => false,
            0x03 => true,
            _ => return Err(SignatureError::InvalidPoint("bad parity byte".to_owned()))
        };
        let x = BigUint::from_bytes_be(&bytes[2..]);

        let point = match curve {
            Curve::Secp256k1 => {
                //the parity byte and x are exactly a SEC1 compressed point
                let encoded = EncodedPoint::from_bytes(&bytes[1..])
                    .map_err(|_| SignatureError::InvalidPoint("bad SEC1 encoding".to_owned()))?;
                let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
                    .ok_or(SignatureError::NotOnCurve)?;
                Self::from_backend(&curve, Backend::Secp256k1(affine.into()))?
            },
            Curve::Ed25519 => {
                let y = edwards_recover_y(&x, y_is_odd).ok_or(SignatureError::NotOnCurve)?;
                Point::new(curve, x, y)?
            },
            Curve::Custom(_) => return Err(curve.unsupported("point decompression"))
        };
        point.check_low_order()?;
        return Ok(point)
    }

    ///Hex of the compressed encoding. This is the form fed to the challenge hash.
    pub fn serialize(&self) -> Result<String, SignatureError> {
        return Ok(hex::encode(self.compress()?))
    }

    ///Inverse of `serialize`.
    pub fn deserialize(serialized: &str) -> Result<Point, SignatureError> {
        let bytes = hex::decode(serialized)
            .map_err(|_| SignatureError::InvalidPoint("not a hex string".to_owned()))?;
        return Self::decompress(&bytes)
    }

    pub(crate) fn from_secp256k1(point: ProjectivePoint) -> Result<Point, SignatureError> {
        return Self::from_backend(&Curve::Secp256k1, Backend::Secp256k1(point))
    }

    fn to_backend(&self) -> Result<Backend, SignatureError> {
        return match &self.curve {
            Curve::Secp256k1 => {
                let x = FieldBytes::from(to_be_bytes_32(&self.x)?);
                let y = FieldBytes::from(to_be_bytes_32(&self.y)?);
                let encoded = EncodedPoint::from_affine_coordinates(&x, &y, false);
                let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
                    .ok_or(SignatureError::NotOnCurve)?;
                Ok(Backend::Secp256k1(affine.into()))
            },
            Curve::Ed25519 => {
                //decompression alone would accept any x with the right sign
                if !self.curve.is_on_curve(&self.x, &self.y)? {
                    return Err(SignatureError::NotOnCurve)
                }
                //RFC 8032 encoding: y little-endian, sign of x in the top bit
                let mut bytes = to_le_bytes_32(&self.y)?;
                if self.x.bit(0) {
                    bytes[31] |= 0x80;
                }
                let point = CompressedEdwardsY(bytes).decompress()
                    .ok_or(SignatureError::NotOnCurve)?;
                Ok(Backend::Ed25519(point))
            },
            Curve::Custom(_) => Err(self.curve.unsupported("group law"))
        }
    }

    fn from_backend(curve: &Curve, point: Backend) -> Result<Point, SignatureError> {
        return match point {
            Backend::Secp256k1(point) => {
                let encoded = point.to_affine().to_encoded_point(false);
                match (encoded.x(), encoded.y()) {
                    (Some(x), Some(y)) => Ok(Self{
                        curve: curve.clone(),
                        x: BigUint::from_bytes_be(x),
                        y: BigUint::from_bytes_be(y)
                    }),
                    _ => Err(SignatureError::InvalidPoint("identity point".to_owned()))
                }
            },
            Backend::Ed25519(point) => {
                if point.is_identity() {
                    return Err(SignatureError::InvalidPoint("identity point".to_owned()))
                }
                let mut bytes = point.compress().to_bytes();
                let x_is_odd = bytes[31] >> 7 == 1;
                bytes[31] &= 0x7f;
                let y = BigUint::from_bytes_le(&bytes);
                let x = edwards_recover_x(&y, x_is_odd)
                    .ok_or_else(|| SignatureError::InvalidPoint("bad ed25519 encoding".to_owned()))?;
                Ok(Self{ curve: curve.clone(), x, y })
            }
        }
    }

    fn describe(&self) -> PointDescription {
        return PointDescription {
            x: self.x.to_str_radix(10),
            y: self.y.to_str_radix(10),
            curve: self.curve.to_string()
        }
    }
}

fn secp256k1_scalar(scalar: &BigUint) -> Result<Secp256k1Scalar, SignatureError> {
    let bytes = FieldBytes::from(to_be_bytes_32(scalar)?);
    return Ok(<Secp256k1Scalar as Reduce<U256>>::reduce_bytes(&bytes))
}

fn ed25519_scalar(scalar: &BigUint) -> Result<EdwardsScalar, SignatureError> {
    return Ok(EdwardsScalar::from_bytes_mod_order(to_le_bytes_32(scalar)?))
}

///Square root in the ed25519 field (`P = 5 mod 8`).
fn ed25519_sqrt(a: &BigUint) -> Option<BigUint> {
    let p = &*ED25519_P;
    let a = a % p;
    let candidate = a.modpow(&((p + 3u32) >> 3), p);
    if mul_mod(&candidate, &candidate, p) == a {
        return Some(candidate)
    }
    let candidate = mul_mod(&candidate, &ED25519_SQRT_M1, p);
    if mul_mod(&candidate, &candidate, p) == a {
        return Some(candidate)
    }
    return None
}

///Pick the root with the requested parity.
fn with_parity(root: BigUint, odd: bool) -> Option<BigUint> {
    if root.is_zero() {
        return match odd {
            true => None,
            false => Some(root)
        }
    }
    return match root.bit(0) == odd {
        true => Some(root),
        false => Some(&*ED25519_P - root)
    }
}

///`x^2 = (y^2 - 1) / (d * y^2 + 1)`
fn edwards_recover_x(y: &BigUint, x_is_odd: bool) -> Option<BigUint> {
    let p = &*ED25519_P;
    if y >= p {
        return None
    }
    let y2 = mul_mod(y, y, p);
    let numerator = sub_mod(&y2, &BigUint::one(), p);
    let denominator = (mul_mod(&ED25519_D, &y2, p) + 1u32) % p;
    let x2 = mul_mod(&numerator, &inv_mod(&denominator, p), p);
    return with_parity(ed25519_sqrt(&x2)?, x_is_odd)
}

///`y^2 = (1 + x^2) / (1 - d * x^2)`
fn edwards_recover_y(x: &BigUint, y_is_odd: bool) -> Option<BigUint> {
    let p = &*ED25519_P;
    if x >= p {
        return None
    }
    let x2 = mul_mod(x, x, p);
    let numerator = (&x2 + 1u32) % p;
    let denominator = sub_mod(&BigUint::one(), &mul_mod(&ED25519_D, &x2, p), p);
    if denominator.is_zero() {
        return None
    }
    let y2 = mul_mod(&numerator, &inv_mod(&denominator, p), p);
    return with_parity(ed25519_sqrt(&y2)?, y_is_odd)
}

///Point self-description, coordinates as decimal strings.
#[derive(Serialize, Deserialize)]
struct PointDescription {
    x: String,
    y: String,
    curve: String
}

///Base64 of the JSON `{"x", "y", "curve"}`.
///
///This is the transport form. The hash input form is `serialize`.
impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.describe()).map_err(|_| fmt::Error)?;
        return write!(f, "{}", BASE64.encode(json))
    }
}

impl FromStr for Point {
    type Err = SignatureError;

    fn from_str(encoded: &str) -> Result<Self, Self::Err> {
        let json = BASE64.decode(encoded).map_err(|_| SignatureError::InvalidBase64)?;
        let description: PointDescription = serde_json::from_slice(&json)
            .map_err(|e| SignatureError::InvalidJson(e.to_string()))?;
        let curve: Curve = description.curve.parse()?;
        let point = Point::new(curve, from_decimal(&description.x)?, from_decimal(&description.y)?)?;
        point.check_low_order()?;
        return Ok(point)
    }
}

/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Elliptic curve parameters and constants

use std::{
    fmt,
    str::FromStr
};

use num_bigint::BigUint;
use rand::{
    rngs::OsRng,
    CryptoRng,
    RngCore
};
use serde::{Serialize, Deserialize};

use crate::errors::SignatureError;
use crate::point::Point;
use crate::scalar::*;

lazy_static! {
    pub(crate) static ref SECP256K1_P: BigUint = hex_constant(
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f");
    pub(crate) static ref SECP256K1_N: BigUint = hex_constant(
        "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141");
    pub(crate) static ref SECP256K1_GX: BigUint = hex_constant(
        "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
    pub(crate) static ref SECP256K1_GY: BigUint = hex_constant(
        "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8");
    pub(crate) static ref SECP256K1_B: BigUint = BigUint::from(7u32);

    pub(crate) static ref ED25519_P: BigUint = hex_constant(
        "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed");
    pub(crate) static ref ED25519_N: BigUint = hex_constant(
        "1000000000000000000000000000000014def9dea2f79cd65812631a5cf5d3ed");
    pub(crate) static ref ED25519_GX: BigUint = hex_constant(
        "216936d3cd6e53fec0a4e231fdd6dc5c692cc7609525a7b2c9562d608f25d51a");
    pub(crate) static ref ED25519_GY: BigUint = hex_constant(
        "6666666666666666666666666666666666666666666666666666666666666658");
    ///`d = -121665/121666`
    pub(crate) static ref ED25519_D: BigUint = hex_constant(
        "52036cee2b6ffe738cc740797779e89800700a4d4141d8ab75eb4dca135978a3");
    ///a square root of `-1` in the ed25519 field
    pub(crate) static ref ED25519_SQRT_M1: BigUint = hex_constant(
        "2b8324804fc1df0b2b4d00993dfbd7a72f431806ad2fe478c4ee1b274a0ea0b0");
}

fn hex_constant(hex: &str) -> BigUint {
    return BigUint::parse_bytes(hex.as_bytes(), 16)
        .expect("Invalid curve constant")
}

///Name of a curve, as it appears in self-descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveName {
    Secp256k1,
    Ed25519,
    Custom

} impl CurveName {
    pub fn as_str(&self) -> &'static str {
        return match self {
            Self::Secp256k1 => "SECP256K1",
            Self::Ed25519 => "ED25519",
            Self::Custom => "CUSTOM"
        }
    }

} impl FromStr for CurveName {
    type Err = SignatureError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        return match name {
            "SECP256K1" => Ok(Self::Secp256k1),
            "ED25519" => Ok(Self::Ed25519),
            "CUSTOM" => Ok(Self::Custom),
            other => Err(SignatureError::UnknownCurve(other.to_owned()))
        }
    }
}

///Externally supplied curve parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomCurve {
    ///field prime
    pub p: BigUint,
    ///group order
    pub n: BigUint,
    pub gx: BigUint,
    pub gy: BigUint
}

///A named elliptic curve.
///
///`Secp256k1` is a short Weierstrass curve, `Ed25519` a twisted Edwards curve.
///`Custom` curves only carry their parameters:
///they can be described, compared and transported, but no group operation is defined on them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Curve {
    Secp256k1,
    Ed25519,
    Custom(CustomCurve)

} impl Curve {
    ///Create a custom curve from its field prime, group order and generator.
    pub fn custom(p: BigUint, n: BigUint, gx: BigUint, gy: BigUint) -> Self {
        return Self::Custom(CustomCurve{ p, n, gx, gy })
    }

    pub fn name(&self) -> CurveName {
        return match self {
            Self::Secp256k1 => CurveName::Secp256k1,
            Self::Ed25519 => CurveName::Ed25519,
            Self::Custom(_) => CurveName::Custom
        }
    }

    ///The field prime `P`. Coordinates live modulo `P`.
    pub fn field_prime(&self) -> &BigUint {
        return match self {
            Self::Secp256k1 => &SECP256K1_P,
            Self::Ed25519 => &ED25519_P,
            Self::Custom(params) => &params.p
        }
    }

    ///The group order `N`. Private keys, nonces, challenges and responses live modulo `N`.
    pub fn order(&self) -> &BigUint {
        return match self {
            Self::Secp256k1 => &SECP256K1_N,
            Self::Ed25519 => &ED25519_N,
            Self::Custom(params) => &params.n
        }
    }

    ///Affine coordinates of the generator.
    pub fn generator(&self) -> (&BigUint, &BigUint) {
        return match self {
            Self::Secp256k1 => (&SECP256K1_GX, &SECP256K1_GY),
            Self::Ed25519 => (&ED25519_GX, &ED25519_GY),
            Self::Custom(params) => (&params.gx, &params.gy)
        }
    }

    ///The generator as a `Point`.
    pub fn generator_point(&self) -> Result<Point, SignatureError> {
        let (gx, gy) = self.generator();
        return Point::new(self.clone(), gx.clone(), gy.clone())
    }

    ///Check the curve equation for affine coordinates.
    ///
    ///Coordinates must already be reduced (`< P`).
    pub fn is_on_curve(&self, x: &BigUint, y: &BigUint) -> Result<bool, SignatureError> {
        let p = self.field_prime();
        if x >= p || y >= p {
            return Ok(false)
        }
        let x2 = mul_mod(x, x, p);
        let y2 = mul_mod(y, y, p);
        return match self {
            //y^2 = x^3 + 7
            Self::Secp256k1 => {
                let rhs = (mul_mod(&x2, x, p) + &*SECP256K1_B) % p;
                Ok(y2 == rhs)
            },
            //-x^2 + y^2 = 1 + d * x^2 * y^2
            Self::Ed25519 => {
                let lhs = sub_mod(&y2, &x2, p);
                let rhs = (mul_mod(&mul_mod(&ED25519_D, &x2, p), &y2, p) + 1u32) % p;
                Ok(lhs == rhs)
            },
            Self::Custom(_) => Err(self.unsupported("curve equation"))
        }
    }

    ///Return a random private key in `[1, N - 1]`, using the operating system's CSPRNG.
    pub fn random_private_key(&self) -> Result<BigUint, SignatureError> {
        return self.random_private_key_with_rng(&mut OsRng)
    }

    ///Same as `random_private_key`, with a caller-supplied CSPRNG.
    pub fn random_private_key_with_rng<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<BigUint, SignatureError> {
        if let Self::Custom(_) = self {
            return Err(self.unsupported("key generation"))
        }
        return random_scalar(self.order(), rng)
    }

    ///One-byte tag used in compressed point encodings.
    pub(crate) fn tag(&self) -> Result<u8, SignatureError> {
        return match self {
            Self::Secp256k1 => Ok(0x01),
            Self::Ed25519 => Ok(0x02),
            Self::Custom(_) => Err(self.unsupported("point compression"))
        }
    }

    pub(crate) fn from_tag(tag: u8) -> Result<Self, SignatureError> {
        return match tag {
            0x01 => Ok(Self::Secp256k1),
            0x02 => Ok(Self::Ed25519),
            other => Err(SignatureError::UnknownCurve(format!("tag {:#04x}", other)))
        }
    }

    pub(crate) fn unsupported(&self, operation: &str) -> SignatureError {
        return SignatureError::UnsupportedCurve(
            format!("{} is not supported on {}", operation, self.name().as_str()))
    }

    fn describe(&self) -> CurveDescription {
        let (gx, gy) = self.generator();
        return CurveDescription {
            curve: self.name().as_str().to_owned(),
            gx: gx.to_str_radix(10),
            gy: gy.to_str_radix(10),
            n: self.order().to_str_radix(10),
            p: self.field_prime().to_str_radix(10)
        }
    }
}

///Return the public key `G * private_key`, after checking `0 < private_key < N`.
pub fn derive_public_key(private_key: &BigUint, curve: &Curve) -> Result<Point, SignatureError> {
    if !is_in_range(private_key, curve.order()) {
        return Err(SignatureError::InvalidParams("private key must be in [1, N - 1]".to_owned()));
    }
    return curve.generator_point()?.mult(private_key)
}

///Curve self-description, every integer as a decimal string.
#[derive(Serialize, Deserialize)]
struct CurveDescription {
    curve: String,
    #[serde(rename = "Gx")]
    gx: String,
    #[serde(rename = "Gy")]
    gy: String,
    #[serde(rename = "N")]
    n: String,
    #[serde(rename = "P")]
    p: String
}

///JSON self-description: `{"curve", "Gx", "Gy", "N", "P"}`
impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.describe()).map_err(|_| fmt::Error)?;
        return write!(f, "{}", json)
    }
}

impl FromStr for Curve {
    type Err = SignatureError;

    fn from_str(description: &str) -> Result<Self, Self::Err> {
        let description: CurveDescription = serde_json::from_str(description)
            .map_err(|e| SignatureError::InvalidJson(e.to_string()))?;
        let p = from_decimal(&description.p)?;
        let n = from_decimal(&description.n)?;
        let gx = from_decimal(&description.gx)?;
        let gy = from_decimal(&description.gy)?;

        let curve = match description.curve.parse::<CurveName>()? {
            CurveName::Secp256k1 => Self::Secp256k1,
            CurveName::Ed25519 => Self::Ed25519,
            CurveName::Custom => return Ok(Self::custom(p, n, gx, gy))
        };
        //a named curve must carry its own parameters
        let (expected_gx, expected_gy) = curve.generator();
        if &p != curve.field_prime() || &n != curve.order() || &gx != expected_gx || &gy != expected_gy {
            return Err(SignatureError::CurveMismatch)
        }
        return Ok(curve)
    }
}

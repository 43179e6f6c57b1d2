/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! JSON and base64 transport.
//!
//! Decoding goes through a typed schema and then through the same constructor as signing,
//! so a decoded signature satisfies every invariant of a freshly signed one.

use base64::{
    engine::general_purpose::STANDARD as BASE64,
    Engine as _
};
use serde::{Serialize, Deserialize};
use serde_json::{Map, Value};

use crate::internal_common::*;
use crate::signature::{
    Linkability,
    PartialSignature,
    RingSignature
};

///Wire form of a `RingSignature`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignatureJson {
    message: String,
    ring: Vec<String>,
    c: String,
    responses: Vec<String>,
    curve: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    linkability_flag: Option<String>
}

impl From<RingSignature> for SignatureJson {
    fn from(signature: RingSignature) -> Self {
        return Self {
            message: signature.message().to_owned(),
            ring: signature.ring().iter().map(|point| point.to_string()).collect(),
            c: to_hex(signature.c()),
            responses: signature.responses().iter().map(to_hex).collect(),
            curve: signature.curve().to_string(),
            key_image: signature.key_image().map(|point| point.to_string()),
            linkability_flag: signature.linkability_flag().map(str::to_owned)
        }
    }
}

impl TryFrom<SignatureJson> for RingSignature {
    type Error = SignatureError;

    fn try_from(json: SignatureJson) -> Result<Self, Self::Error> {
        let curve: Curve = json.curve.parse()?;
        let ring = parse_points(&json.ring)?;
        let c = from_hex(&json.c)?;
        let responses = json.responses.iter()
            .map(|response| from_hex(response))
            .collect::<Result<Vec<_>, SignatureError>>()?;

        let linkability = match (json.key_image, json.linkability_flag) {
            (Some(key_image), Some(flag)) => Some(Linkability{ key_image: key_image.parse()?, flag }),
            (None, None) => None,
            _ => return Err(SignatureError::InvalidParams(
                "keyImage and linkabilityFlag must be given together".to_owned()))
        };

        return RingSignature::new(json.message, ring, c, responses, curve, linkability)
    }
}

///Wire form of a `PartialSignature`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PartialSignatureJson {
    message: String,
    ring: Vec<String>,
    pi: usize,
    c: String,
    cpi: String,
    alpha: String,
    responses: Vec<String>,
    curve: String,
    #[serde(default)]
    config: SignatureConfig
}

impl From<PartialSignature> for PartialSignatureJson {
    fn from(partial: PartialSignature) -> Self {
        return Self {
            message: partial.message().to_owned(),
            ring: partial.ring().iter().map(|point| point.to_string()).collect(),
            pi: partial.pi(),
            c: to_hex(partial.c()),
            cpi: to_hex(partial.cpi()),
            alpha: to_hex(partial.alpha()),
            responses: partial.responses().iter().map(to_hex).collect(),
            curve: partial.curve().to_string(),
            config: *partial.config()
        }
    }
}

impl TryFrom<PartialSignatureJson> for PartialSignature {
    type Error = SignatureError;

    fn try_from(json: PartialSignatureJson) -> Result<Self, Self::Error> {
        let curve: Curve = json.curve.parse()?;
        let ring = parse_points(&json.ring)?;
        let responses = json.responses.iter()
            .map(|response| from_hex(response))
            .collect::<Result<Vec<_>, SignatureError>>()?;

        return PartialSignature::new(
            json.message,
            ring,
            json.pi,
            from_hex(&json.c)?,
            from_hex(&json.cpi)?,
            from_hex(&json.alpha)?,
            responses,
            curve,
            json.config
        )
    }
}

impl RingSignature {
    ///Encode as a JSON string.
    pub fn to_json_string(&self) -> Result<String, SignatureError> {
        return serde_json::to_string(self).map_err(|_| SignatureError::EncodingError)
    }

    ///Decode a JSON string and re-validate the signature.
    ///
    ///`message` must be a string. `c` may be a hex string or a (decimal) JSON number.
    pub fn from_json_string(json: &str) -> Result<Self, SignatureError> {
        let mut object = parse_object(json)?;

        if !matches!(object.get("message"), Some(Value::String(_))) {
            return Err(SignatureError::InvalidParams("message must be a string".to_owned()));
        }
        let numeric_c = match object.get("c") {
            Some(Value::String(_)) => None,
            Some(Value::Number(number)) => Some(from_decimal(&number.to_string())?),
            _ => return Err(SignatureError::InvalidParams("c must be a string or a number".to_owned()))
        };
        if let Some(c) = numeric_c {
            object.insert("c".to_owned(), Value::String(to_hex(&c)));
        }

        let json: SignatureJson = serde_json::from_value(Value::Object(object))
            .map_err(|e| SignatureError::InvalidJson(e.to_string()))?;
        return Self::try_from(json)
    }

    ///Encode as base64 of the JSON string.
    pub fn to_base64(&self) -> Result<String, SignatureError> {
        return Ok(BASE64.encode(self.to_json_string()?))
    }

    ///Inverse of `to_base64`.
    pub fn from_base64(encoded: &str) -> Result<Self, SignatureError> {
        return Self::from_json_string(&decode_base64(encoded)?)
    }
}

impl PartialSignature {
    ///Encode as a JSON string.
    pub fn to_json_string(&self) -> Result<String, SignatureError> {
        return serde_json::to_string(self).map_err(|_| SignatureError::EncodingError)
    }

    ///Decode a JSON string and re-validate the partial signature.
    pub fn from_json_string(json: &str) -> Result<Self, SignatureError> {
        let object = parse_object(json)?;
        let json: PartialSignatureJson = serde_json::from_value(Value::Object(object))
            .map_err(|e| SignatureError::InvalidJson(e.to_string()))?;
        return Self::try_from(json)
    }

    ///Encode as base64 of the JSON string.
    pub fn to_base64(&self) -> Result<String, SignatureError> {
        return Ok(BASE64.encode(self.to_json_string()?))
    }

    ///Inverse of `to_base64`.
    pub fn from_base64(encoded: &str) -> Result<Self, SignatureError> {
        return Self::from_json_string(&decode_base64(encoded)?)
    }
}

///Check against `^[A-Za-z0-9+/]*={0,2}$`, with a length that is a multiple of 4.
pub fn is_base64(encoded: &str) -> bool {
    let body = encoded.trim_end_matches('=');
    return encoded.len() % 4 == 0
        && encoded.len() - body.len() <= 2
        && body.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/')
}

fn decode_base64(encoded: &str) -> Result<String, SignatureError> {
    if !is_base64(encoded) {
        return Err(SignatureError::InvalidBase64)
    }
    let bytes = BASE64.decode(encoded).map_err(|_| SignatureError::InvalidBase64)?;
    return String::from_utf8(bytes).map_err(|_| SignatureError::InvalidBase64)
}

fn parse_object(json: &str) -> Result<Map<String, Value>, SignatureError> {
    return match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(SignatureError::InvalidJson("expected a JSON object".to_owned())),
        Err(e) => Err(SignatureError::InvalidJson(e.to_string()))
    }
}

fn parse_points(encoded: &[String]) -> Result<Vec<Point>, SignatureError> {
    return encoded.iter()
        .map(|point| point.parse::<Point>())
        .collect()
}

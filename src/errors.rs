/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    error::Error,
    fmt::Display
};

///Whether an error is the caller's fault or a bug in the calling code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    ///Invalid input supplied by the caller (bad ring, bad key, corrupt transport data...).
    ///These are expected and should be reported back to whoever supplied the input.
    Caller,
    ///An internal invariant was broken. These indicate a programming error.
    Fatal
}

///Ring signature errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    ///The ring is required to be non-empty, but it is empty.
    EmptyRing,
    ///The ring and the responses do not have the same length.
    LengthMismatch,
    ///A response is zero or not lower than the group order.
    InvalidResponses,
    ///A parameter is out of range or malformed (challenge, private key, config...).
    InvalidParams(String),
    ///The coordinates do not satisfy the curve equation.
    NotOnCurve,
    ///The point is not usable (identity, low order, bad encoding...).
    InvalidPoint(String),
    ///A point or curve does not belong to the expected curve.
    CurveMismatch,
    ///The curve name is not recognized.
    UnknownCurve(String),
    ///The operation is not defined for this curve.
    UnsupportedCurve(String),
    ///The ring contains the same point twice.
    NoDuplicates,
    ///The ring is required to be sorted, but it is not.
    InvalidRing,
    ///The transport string is not valid JSON, or does not have the expected shape.
    InvalidJson(String),
    ///The transport string is not valid base64.
    InvalidBase64,
    ///A challenge step was computed without a nonce or a previous step.
    MissingParams,
    ///Failure to serialize.
    EncodingError

} impl SignatureError {
    ///Return whether this error comes from caller input or from a broken internal invariant.
    pub fn category(&self) -> ErrorCategory {
        return match self {
            Self::MissingParams | Self::EncodingError => ErrorCategory::Fatal,
            _ => ErrorCategory::Caller
        }
    }

} impl Display for SignatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return match self {
            Self::EmptyRing => write!(f, "The ring is empty."),
            Self::LengthMismatch => write!(f, "Ring and responses must have the same length."),
            Self::InvalidResponses => write!(f, "Every response must be in [1, N - 1]."),
            Self::InvalidParams(msg) => write!(f, "Invalid parameters: {}", msg),
            Self::NotOnCurve => write!(f, "The point is not on the curve."),
            Self::InvalidPoint(msg) => write!(f, "Invalid point: {}", msg),
            Self::CurveMismatch => write!(f, "Curve mismatch."),
            Self::UnknownCurve(name) => write!(f, "Unknown curve: {}", name),
            Self::UnsupportedCurve(msg) => write!(f, "Unsupported curve: {}", msg),
            Self::NoDuplicates => write!(f, "The ring contains duplicate points."),
            Self::InvalidRing => write!(f, "The ring is not sorted."),
            Self::InvalidJson(msg) => write!(f, "Invalid JSON: {}", msg),
            Self::InvalidBase64 => write!(f, "Invalid base64 string."),
            Self::MissingParams => write!(f, "Either a nonce or a previous step is required to compute a challenge."),
            Self::EncodingError => write!(f, "Encoding error.")
        }
    }

} impl Error for SignatureError {}

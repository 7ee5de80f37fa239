// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session token payload decoding.
//!
//! The client holds no signing key, so the payload is read without any
//! signature check. The result is an authorization hint for routing and
//! display only; the backend validates the token on every API call.

use crate::models::Claims;
use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine as _,
};

/// URL-safe alphabet, padding optional.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode the claims segment of a `header.payload.signature` token.
///
/// Returns `None` for anything malformed: fewer than three segments, bad
/// base64, non UTF-8 bytes, or a payload that is not a JSON object.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let mut segments = token.split('.');
    let _header = segments.next()?;
    let payload = segments.next()?;
    segments.next()?;

    let bytes = URL_SAFE_LENIENT.decode(payload).ok()?;
    let json = String::from_utf8(bytes).ok()?;
    serde_json::from_str(&json).ok()
}

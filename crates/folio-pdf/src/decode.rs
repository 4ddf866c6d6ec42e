//! Base64 payload decoding.

use base64::{
  Engine as _,
  alphabet,
  engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};

use crate::Result;

/// Standard alphabet, padding optional.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
  &alphabet::STANDARD,
  GeneralPurposeConfig::new()
    .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decode a base64 payload. ASCII whitespace (e.g. MIME line wrapping) is
/// ignored; any other non-alphabet byte is an error.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
  let compact: String = payload
    .chars()
    .filter(|c| !c.is_ascii_whitespace())
    .collect();
  Ok(LENIENT.decode(compact)?)
}

use base64::alphabet;
use base64::engine::general_purpose::{self, GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

use crate::codec::DecodeError;

const PADDING_INDIFFERENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// Standard alphabet, padding optional
const STANDARD_ANY_PAD: GeneralPurpose =
    GeneralPurpose::new(&alphabet::STANDARD, PADDING_INDIFFERENT);

/// URL-safe alphabet, padding optional
const URL_SAFE_ANY_PAD: GeneralPurpose =
    GeneralPurpose::new(&alphabet::URL_SAFE, PADDING_INDIFFERENT);

/// Encodes a binary payload to standard Base64.
pub fn payload_encode(input: &[u8]) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Decodes a Base64 payload.
///
/// Surrounding whitespace is ignored and both the standard and URL-safe
/// alphabets are accepted, with or without padding.
///
/// # Returns
/// The decoded bytes, or `DecodeError::MalformedEncoding` if the input is not Base64.
pub fn payload_decode(input: &str) -> Result<Vec<u8>, DecodeError> {
    let trimmed = input.trim();

    STANDARD_ANY_PAD
        .decode(trimmed)
        .or_else(|_| URL_SAFE_ANY_PAD.decode(trimmed))
        .map_err(|e| DecodeError::MalformedEncoding(format!("invalid base64 payload: {}", e)))
}

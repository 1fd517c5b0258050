use base64::alphabet;
use base64::engine::general_purpose::{self, GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;

/// Decoder that accepts padded and unpadded input and ignores stray trailing bits.
///
/// Every decode in the crate goes through this engine after the URL-safe
/// alphabet is folded back into the standard one.
const TOLERANT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_allow_trailing_bits(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encodes a string to padded standard Base64.
pub fn base64_encode(input: &str) -> String {
    general_purpose::STANDARD.encode(input)
}

/// Encodes a string to unpadded URL-safe Base64.
pub fn url_safe_base64_encode(input: &str) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(input)
}

/// Reverses a URL-safe Base64 string to standard Base64 format.
pub fn url_safe_base64_reverse(input: &str) -> String {
    input.replace('-', "+").replace('_', "/")
}

/// Decodes standard or URL-safe Base64, padded or not.
///
/// Whitespace (including line breaks inserted by some encoders) is removed
/// before decoding. Returns `None` when the input is not Base64 or does not
/// decode to valid UTF-8.
pub fn base64_decode(input: &str) -> Option<String> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let normalized = url_safe_base64_reverse(compact.trim_end_matches('='));
    let bytes = TOLERANT.decode(normalized).ok()?;
    String::from_utf8(bytes).ok()
}

/// Checks whether a string only contains Base64 alphabet characters
/// (either variant) followed by optional padding.
pub fn is_base64_alphabet(input: &str) -> bool {
    let body = input.trim_end_matches('=');
    !body.is_empty()
        && input.len() - body.len() <= 2
        && body
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'-' | b'_'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_padded_and_unpadded() {
        assert_eq!(base64_decode("aGVsbG8=").as_deref(), Some("hello"));
        assert_eq!(base64_decode("aGVsbG8").as_deref(), Some("hello"));
    }

    #[test]
    fn test_decode_url_safe_alphabet() {
        let encoded = url_safe_base64_encode("a?b>c");
        assert!(!encoded.contains('='));
        assert_eq!(base64_decode(&encoded).as_deref(), Some("a?b>c"));
    }

    #[test]
    fn test_decode_ignores_line_breaks() {
        assert_eq!(base64_decode("aGVs\nbG8=\r\n").as_deref(), Some("hello"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(base64_decode(""), None);
        assert_eq!(base64_decode("not base64!"), None);
    }

    #[test]
    fn test_alphabet_check() {
        assert!(is_base64_alphabet("YWJj"));
        assert!(is_base64_alphabet("YW-_Yw=="));
        assert!(!is_base64_alphabet("YW Jj"));
        assert!(!is_base64_alphabet("==="));
    }
}

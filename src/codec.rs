//! URL-safe base64 codec for `WebAuthn` wire values
//!
//! The relying party transmits every binary value (challenges, credential
//! ids, user handles) as URL-safe base64 without padding. This module
//! converts between that text encoding and the raw buffers the credential
//! platform consumes.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::{DecodeError, Engine};

/// Decode a URL-safe base64 value into its exact byte sequence.
///
/// Padding characters are tolerated and stripped before decoding, so both
/// the relying party's unpadded form and an already-padded value decode to
/// the same bytes.
///
/// # Errors
///
/// Returns a `DecodeError` on malformed input: characters outside the
/// URL-safe alphabet, or a length that cannot result from stripping padding
/// (length ≡ 1 mod 4). Malformed input is never silently truncated.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    URL_SAFE_NO_PAD.decode(text.trim_end_matches('='))
}

/// Encode a byte sequence as unpadded URL-safe base64.
#[must_use]
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_length_mod_four() {
        // 0..=8 bytes covers every output length class, including the
        // 0, 1, 2 and 3 missing-padding cases after restoration.
        for len in 0u8..=8 {
            let bytes: Vec<u8> = (0..len).map(|i| 0xA5 ^ i).collect();
            let text = encode(&bytes);
            assert!(!text.contains('='), "encoded value must be unpadded");
            assert_eq!(decode(&text).unwrap(), bytes);
        }
    }

    #[test]
    fn uses_url_safe_alphabet() {
        // 0xFB 0xEF encodes to "++8=" in the standard alphabet.
        let text = encode([0xFB, 0xEF]);
        assert_eq!(text, "--8");
        assert_eq!(decode(&text).unwrap(), vec![0xFB, 0xEF]);
    }

    #[test]
    fn accepts_padded_input() {
        assert_eq!(decode("AQID").unwrap(), vec![1, 2, 3]);
        assert_eq!(decode("AQI=").unwrap(), vec![1, 2]);
        assert_eq!(decode("AQ==").unwrap(), vec![1]);
    }

    #[test]
    fn rejects_impossible_length() {
        // Restored length ≡ 1 mod 4 cannot decode to any byte sequence.
        assert!(decode("A").is_err());
        assert!(decode("AQIDA").is_err());
    }

    #[test]
    fn rejects_foreign_characters() {
        assert!(decode("A+/=").is_err());
        assert!(decode("not base64!").is_err());
    }

    #[test]
    fn decode_then_encode_restores_wire_form() {
        for text in ["", "AA", "AAE", "c3Vkbw", "zpXOu867zrfOvbncrA"] {
            assert_eq!(encode(decode(text).unwrap()), text);
        }
    }
}

//! Share-link codec
//!
//! Packs arbitrary text (markdown notes, an OpenAPI document) into a token
//! that can sit in a URL path or fragment without further escaping. Tokens
//! use LZ-string's URI component alphabet, so links produced by the browser
//! app decode here and the other way round.
//!
//! Decoding is lenient. Tokens that do not decompress are treated as plain
//! percent-encoded text, so hand-written links keep working.

/// Encode `value` into a URL-safe token, `""` for empty input
pub fn encode_to_path(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }

    lz_str::compress_to_encoded_uri_component(value)
}

/// Decode a token produced by [`encode_to_path`]
///
/// Falls back to percent-decoding when the token does not decompress or
/// decompresses to nothing, and to the token itself when that fails too.
pub fn decode_from_path(encoded: &str) -> String {
    if encoded.is_empty() {
        return String::new();
    }

    match decompress(encoded) {
        Some(text) if !text.is_empty() => text,
        _ => {
            tracing::debug!("Token is not compressed, percent-decoding instead");
            percent_decode(encoded)
        }
    }
}

fn decompress(encoded: &str) -> Option<String> {
    let units = lz_str::decompress_from_encoded_uri_component(encoded)?;
    String::from_utf16(&units).ok()
}

fn percent_decode(encoded: &str) -> String {
    urlencoding::decode(encoded)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| encoded.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO_WORLD_TOKEN: &str = "BYUwNmD2AEDukCcwBMg";

    #[test]
    fn test_empty_input() {
        assert_eq!(encode_to_path(""), "");
        assert_eq!(decode_from_path(""), "");
    }

    #[test]
    fn test_encode_matches_browser_token() {
        assert_eq!(encode_to_path("hello world"), HELLO_WORLD_TOKEN);
    }

    #[test]
    fn test_decode_browser_token() {
        assert_eq!(decode_from_path(HELLO_WORLD_TOKEN), "hello world");
    }

    #[test]
    fn test_round_trip_multiline_yaml() {
        let yaml = "openapi: 3.0.0\ninfo:\n  title: Test\n  version: 1.0.0";
        assert_eq!(decode_from_path(&encode_to_path(yaml)), yaml);
    }

    #[test]
    fn test_token_is_url_safe() {
        let markdown = "# Notes\n\n* a/b?c=d&e=f\n* ünïcødé 🚀\n".repeat(20);
        let encoded = encode_to_path(&markdown);
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "+-$".contains(c)));
        assert_eq!(decode_from_path(&encoded), markdown);
    }

    #[test]
    fn test_short_plain_text_falls_back_to_percent_decoding() {
        assert_eq!(decode_from_path("a"), "a");
    }
}

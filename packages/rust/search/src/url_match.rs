//! `webUrl` normalization for wildcard lookups.

use url::form_urlencoded::byte_serialize;

/// Percent-encode every non-ASCII character of `url` as lower-case UTF-8
/// escapes, leaving ASCII characters untouched.
///
/// Stored `webUrl` values carry lower-case escapes, so a URL pasted with raw
/// accented characters must be rewritten before it can match.
pub fn encode_non_ascii(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    let mut buf = [0u8; 4];

    for ch in url.chars() {
        if ch.is_ascii() {
            out.push(ch);
        } else {
            let bytes = ch.encode_utf8(&mut buf).as_bytes();
            for escaped in byte_serialize(bytes) {
                out.push_str(&escaped.to_lowercase());
            }
        }
    }

    out
}

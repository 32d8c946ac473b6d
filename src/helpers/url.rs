//! URL helper functions

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::borrow::Cow;

/// Characters `encodeURIComponent` leaves untouched
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single URL component
///
/// # Examples
/// ```ignore
/// encode_component("关于 #1") // -> "%E5%85%B3%E4%BA%8E%20%231"
/// ```
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Decode a percent-encoded URL component once.
///
/// Input whose decoded bytes are not UTF-8 is returned unchanged.
pub fn decode_component(s: &str) -> Cow<'_, str> {
    match percent_decode_str(s).decode_utf8() {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!("Leaving {:?} undecoded: {}", s, e);
            Cow::Borrowed(s)
        }
    }
}

/// Decode a slug that may have been encoded twice by nested routing
pub fn decode_component_twice(s: &str) -> String {
    let once = decode_component(s);
    if once.contains('%') {
        decode_component(&once).into_owned()
    } else {
        once.into_owned()
    }
}

//! Canonicalization functionality for signed URL generation.
//!
//! This includes the strict RFC 3986 percent-encoding the storage service recomputes on its side,
//! header normalization, query-string assembly, the V2 string to sign, and the V4 canonical
//! request.
//!
//! **Stability of this module is not guaranteed except for items exposed at the crate root**.
//! The functions and types are subject to change in minor/patch versions. This is exposed for
//! testing purposes only.

use {
    crate::{constants::*, crypto::sha256_hex},
    log::trace,
    qualifier_attr::qualifiers,
    std::{
        collections::BTreeMap,
        fmt::{Debug, Formatter, Result as FmtResult},
    },
};

/// Uppercase hex digits.
const HEX_DIGITS_UPPER: [u8; 16] =
    [b'0', b'1', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'A', b'B', b'C', b'D', b'E', b'F'];

/// A canonicalized V4 request.
///
/// This holds everything that participates in the V4 canonical request except the method-agnostic
/// constants. The query string is stored exactly as it will appear in the final URL, minus the
/// trailing `X-Goog-Signature`.
///
/// **The stability of this struct is not guaranteed.** The fields and methods are subject to
/// change in minor/patch versions.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[derive(Clone)]
struct CanonicalRequest {
    /// The HTTP method for the request (e.g., "GET", "PUT", etc.). Passed through unvalidated.
    request_method: String,

    /// The canonical path, `/<bucket>/<encoded object key>`. This is guaranteed to be ASCII.
    canonical_path: String,

    /// The encoded, key-sorted query string.
    canonical_query: String,

    /// Lower-cased header names mapped to normalized values, sorted by name.
    headers: BTreeMap<String, String>,
}

impl CanonicalRequest {
    /// Create a `CanonicalRequest` from its already-canonical parts.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn new(
        request_method: &str,
        canonical_path: String,
        canonical_query: String,
        headers: BTreeMap<String, String>,
    ) -> Self {
        Self {
            request_method: request_method.to_string(),
            canonical_path,
            canonical_query,
            headers,
        }
    }

    /// Retrieve the HTTP request method.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn request_method(&self) -> &str {
        &self.request_method
    }

    /// Retrieve the canonical path.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn canonical_path(&self) -> &str {
        &self.canonical_path
    }

    /// Retrieve the canonical query string.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn canonical_query(&self) -> &str {
        &self.canonical_query
    }

    /// Retrieve the signed headers.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    #[inline(always)]
    fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// The `X-Goog-SignedHeaders` value: header names joined by `;`.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn signed_headers(&self) -> String {
        signed_headers(&self.headers)
    }

    /// Get the V4 canonical request.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn canonical_request(&self) -> String {
        let mut result = String::with_capacity(1024);
        result.push_str(self.request_method());
        result.push('\n');
        result.push_str(self.canonical_path());
        result.push('\n');
        result.push_str(self.canonical_query());
        result.push('\n');

        for (name, value) in self.headers().iter() {
            result.push_str(name);
            result.push(':');
            result.push_str(value);
            result.push('\n');
        }

        result.push('\n');
        result.push_str(&self.signed_headers());
        result.push('\n');
        result.push_str(UNSIGNED_PAYLOAD);

        trace!("Canonical request:\n{}", result);

        result
    }

    /// Get the hex SHA-256 of the canonical request.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn canonical_request_sha256_hex(&self) -> String {
        sha256_hex(self.canonical_request().as_bytes())
    }

    /// Get the V4 string to sign for the given timestamp and credential scope.

    #[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
    #[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
    fn string_to_sign(&self, timestamp: &str, scope: &str) -> String {
        let result = format!("{}\n{}\n{}\n{}", GOOG4_RSA_SHA256, timestamp, scope, self.canonical_request_sha256_hex());
        trace!("String to sign:\n{}", result);
        result
    }
}

impl Debug for CanonicalRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CanonicalRequest")
            .field("request_method", &self.request_method)
            .field("canonical_path", &self.canonical_path)
            .field("canonical_query", &self.canonical_query)
            .field("headers", &self.headers)
            .finish()
    }
}

/// The kinds of URI elements, which differ only in whether `/` survives encoding.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum UriElement {
    /// An object key; `/` is kept literal since object names may contain path separators.
    ObjectKey,

    /// A query parameter key or value; everything outside the unreserved set is escaped.
    Query,
}

/// Build the canonical object path, `/<bucket>/<encoded object key>`.
///
/// The bucket is used as-is; rejecting slashes in it is the caller's responsibility.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
pub fn canonicalize_object_path(bucket: &str, object_key: &str) -> String {
    format!("/{}/{}", bucket, encode_object_key(object_key))
}

/// Join already-encoded `key=value` pairs with `&`, preserving their order.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
pub fn canonicalize_query_to_string<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    pairs.into_iter().map(|(key, value)| format!("{}={}", key, value)).collect::<Vec<_>>().join("&")
}

/// Percent-encode an object key, leaving `/` and RFC 3986 unreserved characters alone.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
pub fn encode_object_key(object_key: &str) -> String {
    encode_uri_element(object_key, UriElement::ObjectKey)
}

/// Percent-encode a query parameter key or value.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
pub fn encode_query_element(element: &str) -> String {
    encode_uri_element(element, UriElement::Query)
}

/// Percent-encode a URI element according to RFC 3986:
/// * Alpha, digit, and the symbols `-`, `.`, `_`, and `~` (unreserved characters) are left alone.
/// * `/` is left alone in object keys.
/// * Every other byte of the UTF-8 encoding becomes `%XX` with uppercase hex.
///
/// Existing `%` sequences are not interpreted: a literal `%` in an object name is encoded as `%25`.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
fn encode_uri_element(uri_el: &str, uri_el_type: UriElement) -> String {
    let mut result = String::with_capacity(uri_el.len() * 3);

    for c in uri_el.bytes() {
        if is_rfc3986_unreserved(c) || (c == b'/' && uri_el_type == UriElement::ObjectKey) {
            result.push(c as char);
        } else {
            let hex = u8_to_upper_hex(c);
            result.push('%');
            result.push(hex[0] as char);
            result.push(hex[1] as char);
        }
    }

    result
}

/// Encode raw query parameters and return them sorted by encoded key.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
pub fn encode_query_parameters(parameters: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    parameters.iter().map(|(key, value)| (encode_query_element(key), encode_query_element(value))).collect()
}

/// Indicates whether the specified byte is RFC3986 unreserved -- i.e., can be represented without being
/// percent-encoded, e.g. '?' -> '%3F'.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[inline(always)]
pub fn is_rfc3986_unreserved(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'.' || c == b'_' || c == b'~'
}

/// Merge caller headers over the mandatory `host` header.
///
/// Names are lower-cased. A caller-supplied `host` (in any case) replaces the default; among
/// caller names that collide case-insensitively, the last in iteration order wins.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
pub fn normalize_headers(host: &str, headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut result = BTreeMap::new();
    result.insert(HOST.to_string(), normalize_header_value(host));

    for (name, value) in headers.iter() {
        result.insert(name.to_lowercase(), normalize_header_value(value));
    }

    result
}

/// Normalizes a header value by trimming whitespace and converting multiple spaces to a single space.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
pub fn normalize_header_value(value: &str) -> String {
    let mut result = String::with_capacity(value.len());

    // Remove leading whitespace and reduce multiple spaces to a single space.
    let mut last_was_space = true;

    for c in value.trim().chars() {
        if c == ' ' {
            if !last_was_space {
                result.push(' ');
                last_was_space = true;
            }
        } else {
            result.push(c);
            last_was_space = false;
        }
    }

    result
}

/// Sorted header names joined by `;`.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
pub fn signed_headers(headers: &BTreeMap<String, String>) -> String {
    headers.keys().map(String::as_str).collect::<Vec<_>>().join(";")
}

/// Convert a byte to uppercase hex representation.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
#[inline(always)]
pub const fn u8_to_upper_hex(b: u8) -> [u8; 2] {
    let result: [u8; 2] = [HEX_DIGITS_UPPER[((b >> 4) & 0xf) as usize], HEX_DIGITS_UPPER[(b & 0xf) as usize]];
    result
}

/// Build the V2 string to sign. Absent optional fields become empty lines so every field keeps
/// its position.

#[cfg_attr(any(doc, feature = "unstable"), qualifiers(pub))]
#[cfg_attr(not(any(doc, feature = "unstable")), qualifiers(pub(crate)))]
pub fn v2_string_to_sign(
    method: &str,
    content_md5: Option<&str>,
    content_type: Option<&str>,
    expires: i64,
    canonical_path: &str,
) -> String {
    let result = format!(
        "{}\n{}\n{}\n{}\n{}",
        method,
        content_md5.unwrap_or_default(),
        content_type.unwrap_or_default(),
        expires,
        canonical_path
    );
    trace!("String to sign:\n{}", result);
    result
}

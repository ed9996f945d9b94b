//! Signed URL generation for the V2 (legacy) and V4 (scoped) protocols.
//!
//! Both protocols sign with RSA-SHA256 and differ only in what they sign and how the result is
//! attached to the URL:
//!
//! * V2 signs a five-line string (`METHOD`, `Content-MD5`, `Content-Type`, expiry, path) and
//!   attaches a Base64 signature as `Signature`.
//! * V4 signs a hash of a canonical request that covers the query string and selected headers,
//!   scoped to a date, and appends a hex signature as the final `X-Goog-Signature` parameter.

use {
    crate::{
        canonical::{
            canonicalize_object_path, canonicalize_query_to_string, encode_query_element, encode_query_parameters,
            normalize_headers, signed_headers, v2_string_to_sign, CanonicalRequest,
        },
        chronoutil::{goog4_expires_seconds, resolve_expiry, FormatGoog4},
        constants::*,
        CredentialContext, SigningError,
    },
    base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine},
    chrono::{DateTime, Duration, Utc},
    derive_builder::Builder,
    http::Method,
    log::{debug, trace},
    std::{
        collections::BTreeMap,
        fmt::{Display, Formatter, Result as FmtResult},
        str::FromStr,
    },
};

/// Signing protocol version.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SigningVersion {
    /// The legacy protocol: Base64 signature over a five-line string, `Expires` as Unix seconds.
    #[default]
    V2,

    /// The scoped protocol: hex signature over a canonical request, lifetime capped at 7 days.
    V4,
}

impl Display for SigningVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::V2 => f.write_str("v2"),
            Self::V4 => f.write_str("v4"),
        }
    }
}

impl FromStr for SigningVersion {
    type Err = SigningError;

    /// Parse `v2` or `v4`. Any other token fails with [`SigningError::InvalidArgument`] naming it.
    fn from_str(s: &str) -> Result<Self, SigningError> {
        match s {
            "v2" => Ok(Self::V2),
            "v4" => Ok(Self::V4),
            _ => Err(SigningError::InvalidArgument(format!("Unsupported signing version: '{}'", s))),
        }
    }
}

/// Per-call options for [`sign_url`].
///
/// Every field has a default, so `SignedUrlOptions::default()` signs a five-minute V2 `GET` URL
/// against `storage.googleapis.com`.
#[derive(Builder, Clone, Debug, Eq, PartialEq)]
#[builder(derive(Debug))]
pub struct SignedUrlOptions {
    /// Protocol version. Defaults to [`SigningVersion::V2`].
    #[builder(default)]
    pub version: SigningVersion,

    /// HTTP method the URL is valid for. Not validated; it only participates in the canonical
    /// string. Defaults to `GET`.
    #[builder(setter(into), default = "Method::GET.to_string()")]
    pub method: String,

    /// Absolute expiry. Takes precedence over `valid_for` when set.
    #[builder(setter(into, strip_option), default)]
    pub expires_at: Option<DateTime<Utc>>,

    /// Lifetime relative to the signing instant. Defaults to 300 seconds.
    #[builder(default = "Duration::seconds(DEFAULT_VALID_FOR_SECONDS)")]
    pub valid_for: Duration,

    /// Host the URL points at. Defaults to `storage.googleapis.com`.
    #[builder(setter(into), default = "DEFAULT_HOST.to_string()")]
    pub host: String,

    /// `Content-MD5` line of the V2 string to sign. Ignored by V4.
    #[builder(setter(into, strip_option), default)]
    pub content_md5: Option<String>,

    /// `Content-Type` line of the V2 string to sign. Ignored by V4; bind it with `headers` instead.
    #[builder(setter(into, strip_option), default)]
    pub content_type: Option<String>,

    /// Value for the `response-content-disposition` query parameter.
    #[builder(setter(into, strip_option), default)]
    pub response_content_disposition: Option<String>,

    /// Value for the `response-content-type` query parameter.
    #[builder(setter(into, strip_option), default)]
    pub response_content_type: Option<String>,

    /// Additional query parameters. Protocol parameters win on a key collision.
    #[builder(default)]
    pub extra_params: BTreeMap<String, String>,

    /// Headers bound into a V4 signature, in addition to `host`. Ignored by V2.
    #[builder(default)]
    pub headers: BTreeMap<String, String>,
}

impl SignedUrlOptions {
    /// Create a builder for `SignedUrlOptions`.
    #[inline(always)]
    pub fn builder() -> SignedUrlOptionsBuilder {
        SignedUrlOptionsBuilder::default()
    }
}

impl Default for SignedUrlOptions {
    fn default() -> Self {
        Self {
            version: SigningVersion::default(),
            method: Method::GET.to_string(),
            expires_at: None,
            valid_for: Duration::seconds(DEFAULT_VALID_FOR_SECONDS),
            host: DEFAULT_HOST.to_string(),
            content_md5: None,
            content_type: None,
            response_content_disposition: None,
            response_content_type: None,
            extra_params: BTreeMap::new(),
            headers: BTreeMap::new(),
        }
    }
}

/// Sign a URL for `object_key` in `bucket`, valid from now.
///
/// The clock is read exactly once; see [`sign_url_at`] to supply it.
pub fn sign_url(
    credentials: &CredentialContext,
    bucket: &str,
    object_key: &str,
    options: &SignedUrlOptions,
) -> Result<String, SigningError> {
    sign_url_at(credentials, bucket, object_key, options, &Utc::now())
}

/// Sign a URL for `object_key` in `bucket` as of `now`.
///
/// For fixed credentials, arguments, and `now`, the result is byte-for-byte identical across
/// calls.
pub fn sign_url_at(
    credentials: &CredentialContext,
    bucket: &str,
    object_key: &str,
    options: &SignedUrlOptions,
    now: &DateTime<Utc>,
) -> Result<String, SigningError> {
    debug!("Signing {} URL for /{}/{} as {}", options.version, bucket, object_key, credentials.principal());

    match options.version {
        SigningVersion::V2 => sign_v2_at(credentials, bucket, object_key, options, now),
        SigningVersion::V4 => sign_v4_at(credentials, bucket, object_key, options, now),
    }
}

/// Sign a URL using the V2 protocol as of `now`. `options.version` and `options.headers` are
/// ignored.
pub fn sign_v2_at(
    credentials: &CredentialContext,
    bucket: &str,
    object_key: &str,
    options: &SignedUrlOptions,
    now: &DateTime<Utc>,
) -> Result<String, SigningError> {
    if !options.headers.is_empty() {
        trace!("Ignoring {} header(s) for V2 signature", options.headers.len());
    }

    let expires = resolve_expiry(now, options.expires_at.as_ref(), options.valid_for)
        .ok_or_else(|| {
            SigningError::InvalidArgument(format!(
                "Expiry out of range: {} seconds past {}",
                options.valid_for.num_seconds(),
                now.to_iso8601_compact()
            ))
        })?
        .timestamp();
    debug!("V2 expiry: {}", expires);

    let canonical_path = canonicalize_object_path(bucket, object_key);
    let string_to_sign = v2_string_to_sign(
        &options.method,
        options.content_md5.as_deref(),
        options.content_type.as_deref(),
        expires,
        &canonical_path,
    );
    let signature = BASE64_STANDARD.encode(credentials.sign(string_to_sign.as_bytes())?);

    let mut required = vec![
        (GOOGLE_ACCESS_ID, credentials.principal().to_string()),
        (EXPIRES, expires.to_string()),
        (SIGNATURE, signature),
    ];
    required.extend(response_overrides(options));

    let mut query: Vec<(String, String)> =
        required.iter().map(|(key, value)| (encode_query_element(key), encode_query_element(value))).collect();

    // Caller parameters follow; any that collide with a protocol parameter are dropped.
    for (key, value) in options.extra_params.iter() {
        if required.iter().any(|(required_key, _)| *required_key == key.as_str()) {
            debug!("Dropping caller query parameter {} that collides with a protocol parameter", key);
            continue;
        }
        query.push((encode_query_element(key), encode_query_element(value)));
    }

    let query = canonicalize_query_to_string(query.iter().map(|(key, value)| (key, value)));
    Ok(format!("{}://{}{}?{}", URL_SCHEME, options.host, canonical_path, query))
}

/// Sign a URL using the V4 protocol as of `now`. `options.version`, `options.content_md5`, and
/// `options.content_type` are ignored.
pub fn sign_v4_at(
    credentials: &CredentialContext,
    bucket: &str,
    object_key: &str,
    options: &SignedUrlOptions,
    now: &DateTime<Utc>,
) -> Result<String, SigningError> {
    let datestamp = now.to_datestamp();
    let timestamp = now.to_iso8601_compact();
    let scope = format!("{}/{}/{}/{}", datestamp, SCOPE_REGION, SCOPE_SERVICE, GOOG4_REQUEST);

    let headers = normalize_headers(&options.host, &options.headers);
    let signed_headers = signed_headers(&headers);

    let goog_expires = goog4_expires_seconds(now, options.expires_at.as_ref(), options.valid_for);
    debug!("V4 expiry: {} seconds from {}", goog_expires, timestamp);

    // Caller parameters go in first so protocol parameters overwrite them.
    let mut parameters = options.extra_params.clone();
    for (key, value) in response_overrides(options) {
        parameters.insert(key.to_string(), value);
    }
    parameters.insert(X_GOOG_ALGORITHM.to_string(), GOOG4_RSA_SHA256.to_string());
    parameters.insert(X_GOOG_CREDENTIAL.to_string(), format!("{}/{}", credentials.principal(), scope));
    parameters.insert(X_GOOG_DATE.to_string(), timestamp.clone());
    parameters.insert(X_GOOG_EXPIRES.to_string(), goog_expires.to_string());
    parameters.insert(X_GOOG_SIGNED_HEADERS.to_string(), signed_headers);

    let canonical_path = canonicalize_object_path(bucket, object_key);
    let canonical_query = canonicalize_query_to_string(encode_query_parameters(&parameters).iter());
    let canonical_request =
        CanonicalRequest::new(&options.method, canonical_path.clone(), canonical_query.clone(), headers);

    let string_to_sign = canonical_request.string_to_sign(&timestamp, &scope);
    let signature = hex::encode(credentials.sign(string_to_sign.as_bytes())?);

    Ok(format!(
        "{}://{}{}?{}&{}={}",
        URL_SCHEME, options.host, canonical_path, canonical_query, X_GOOG_SIGNATURE, signature
    ))
}

/// The optional `response-content-*` query parameters that are set.
fn response_overrides(options: &SignedUrlOptions) -> Vec<(&'static str, String)> {
    let mut result = Vec::with_capacity(2);

    if let Some(disposition) = &options.response_content_disposition {
        result.push((RESPONSE_CONTENT_DISPOSITION, disposition.clone()));
    }

    if let Some(content_type) = &options.response_content_type {
        result.push((RESPONSE_CONTENT_TYPE, content_type.clone()));
    }

    result
}

#[cfg(test)]
mod tests {
    use {
        crate::{SignedUrlOptions, SigningError, SigningVersion},
        chrono::Duration,
    };

    #[test_log::test]
    fn test_version_parsing() {
        assert_eq!("v2".parse::<SigningVersion>().unwrap(), SigningVersion::V2);
        assert_eq!("v4".parse::<SigningVersion>().unwrap(), SigningVersion::V4);
        assert_eq!(SigningVersion::default(), SigningVersion::V2);
        assert_eq!(SigningVersion::V4.to_string(), "v4");

        for bad in ["v3", "V4", "", "v2 "] {
            match bad.parse::<SigningVersion>() {
                Err(SigningError::InvalidArgument(msg)) => {
                    assert_eq!(msg, format!("Unsupported signing version: '{}'", bad))
                }
                other => panic!("Expected InvalidArgument; got {:?}", other),
            }
        }
    }

    #[test_log::test]
    fn test_builder_defaults_match_default() {
        let built = SignedUrlOptions::builder().build().unwrap();
        assert_eq!(built, SignedUrlOptions::default());
        assert_eq!(built.method, "GET");
        assert_eq!(built.host, "storage.googleapis.com");
        assert_eq!(built.valid_for, Duration::seconds(300));
        assert!(built.expires_at.is_none());
    }

    #[test_log::test]
    fn test_builder_setters() {
        let opts = SignedUrlOptions::builder()
            .version(SigningVersion::V4)
            .method("PUT")
            .valid_for(Duration::seconds(60))
            .host("example.com")
            .response_content_type("text/plain")
            .build()
            .unwrap();
        assert_eq!(opts.version, SigningVersion::V4);
        assert_eq!(opts.method, "PUT");
        assert_eq!(opts.valid_for, Duration::seconds(60));
        assert_eq!(opts.host, "example.com");
        assert_eq!(opts.response_content_type.as_deref(), Some("text/plain"));
        assert!(opts.response_content_disposition.is_none());
    }
}

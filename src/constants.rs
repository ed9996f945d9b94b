//! Common constants used throughout the crate.
//!
//! Protocol strings live here so both signing schemes agree on spelling. A typo in any of these
//! produces a signature the storage service silently rejects, so fix them in one spot.
//!
//! Tests that are testing the content of an error code, query parameter, or canonical string
//! should not use these constants; they should use hard-coded strings so the tests are also
//! testing for misspellings.
//!
//! Please keep this file organized alphabetically.

/// Date format for the V4 credential scope.
pub(crate) const DATESTAMP_FORMAT: &str = "%Y%m%d";

/// Host used when the caller does not configure one.
pub(crate) const DEFAULT_HOST: &str = "storage.googleapis.com";

/// Lifetime of a signed URL when neither an absolute expiry nor a duration is given.
pub(crate) const DEFAULT_VALID_FOR_SECONDS: i64 = 300;

/// Environment variable holding credential JSON inline.
pub(crate) const ENV_CREDENTIALS_JSON: &str = "GOOGLE_APPLICATION_CREDENTIALS_JSON";

/// Environment variable naming a credential JSON file.
pub(crate) const ENV_CREDENTIALS_PATH: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Error code: AuthError
pub(crate) const ERR_CODE_AUTH_ERROR: &str = "AuthError";

/// Error code: InternalFailure
pub(crate) const ERR_CODE_INTERNAL_FAILURE: &str = "InternalFailure";

/// Error code: InvalidArgument
pub(crate) const ERR_CODE_INVALID_ARGUMENT: &str = "InvalidArgument";

/// Error code: MalformedCredentials
pub(crate) const ERR_CODE_MALFORMED_CREDENTIALS: &str = "MalformedCredentials";

/// Error code: MalformedKey
pub(crate) const ERR_CODE_MALFORMED_KEY: &str = "MalformedKey";

/// V2 query parameter: expiry as Unix seconds.
pub(crate) const EXPIRES: &str = "Expires";

/// Request type suffix of the V4 credential scope.
pub(crate) const GOOG4_REQUEST: &str = "goog4_request";

/// Algorithm for V4 signing.
pub(crate) const GOOG4_RSA_SHA256: &str = "GOOG4-RSA-SHA256";

/// V2 query parameter: the signing principal.
pub(crate) const GOOGLE_ACCESS_ID: &str = "GoogleAccessId";

/// Header bound into every V4 signature.
pub(crate) const HOST: &str = "host";

/// Compact ISO 8601 format used for `X-Goog-Date` and the string to sign.
pub(crate) const ISO8601_COMPACT_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Hard upper bound on a V4 signed URL lifetime (7 days).
pub(crate) const MAX_V4_EXPIRES_SECONDS: i64 = 604_800;

/// PEM label marking a PKCS#1 RSA private key.
pub(crate) const PKCS1_PEM_LABEL: &str = "BEGIN RSA PRIVATE KEY";

/// Query parameter overriding the response `Content-Disposition`.
pub(crate) const RESPONSE_CONTENT_DISPOSITION: &str = "response-content-disposition";

/// Query parameter overriding the response `Content-Type`.
pub(crate) const RESPONSE_CONTENT_TYPE: &str = "response-content-type";

/// Region placeholder of the V4 credential scope.
pub(crate) const SCOPE_REGION: &str = "auto";

/// Service name of the V4 credential scope.
pub(crate) const SCOPE_SERVICE: &str = "storage";

/// V2 query parameter: the Base64 signature.
pub(crate) const SIGNATURE: &str = "Signature";

/// Payload hash placeholder for V4 signed URLs.
pub(crate) const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// URL scheme of every signed URL.
pub(crate) const URL_SCHEME: &str = "https";

/// V4 query parameter: signing algorithm.
pub(crate) const X_GOOG_ALGORITHM: &str = "X-Goog-Algorithm";

/// V4 query parameter: `<principal>/<scope>`.
pub(crate) const X_GOOG_CREDENTIAL: &str = "X-Goog-Credential";

/// V4 query parameter: request timestamp.
pub(crate) const X_GOOG_DATE: &str = "X-Goog-Date";

/// V4 query parameter: lifetime in seconds relative to `X-Goog-Date`.
pub(crate) const X_GOOG_EXPIRES: &str = "X-Goog-Expires";

/// V4 query parameter: hex signature, always appended last.
pub(crate) const X_GOOG_SIGNATURE: &str = "X-Goog-Signature";

/// V4 query parameter: semicolon-separated signed header names.
pub(crate) const X_GOOG_SIGNED_HEADERS: &str = "X-Goog-SignedHeaders";

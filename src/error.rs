use {
    crate::constants::*,
    http::status::StatusCode,
    scratchstack_errors::ServiceError,
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
        io::Error as IOError,
    },
};

/// Error returned when a credential context cannot be built or a URL cannot be signed.
#[derive(Debug)]
#[non_exhaustive]
pub enum SigningError {
    /// No usable credential material was supplied. Sample messages:
    /// `No private key material supplied`
    /// `No credentials found: supply a path, inline JSON, or set GOOGLE_APPLICATION_CREDENTIALS_JSON`
    Auth(/* message */ String),

    /// The RSA signing primitive failed.
    Crypto(rsa::signature::Error),

    /// A credential file could not be read.
    IO(IOError),

    /// The caller passed an argument this crate cannot act on, such as an unrecognized signing
    /// protocol version. Sample message:
    /// `Unsupported signing version: 'v3'`
    InvalidArgument(/* message */ String),

    /// The credential document is not valid JSON or lacks `private_key`/`client_email`.
    MalformedCredentials(serde_json::Error),

    /// The private key is not a valid PKCS#1 or PKCS#8 PEM-encoded RSA key.
    MalformedKey(/* message */ String),
}

impl SigningError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Auth(_) => ERR_CODE_AUTH_ERROR,
            Self::Crypto(_) | Self::IO(_) => ERR_CODE_INTERNAL_FAILURE,
            Self::InvalidArgument(_) => ERR_CODE_INVALID_ARGUMENT,
            Self::MalformedCredentials(_) => ERR_CODE_MALFORMED_CREDENTIALS,
            Self::MalformedKey(_) => ERR_CODE_MALFORMED_KEY,
        }
    }

    fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) | Self::MalformedCredentials(_) | Self::MalformedKey(_) => StatusCode::UNAUTHORIZED,
            Self::Crypto(_) | Self::IO(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ServiceError for SigningError {
    fn error_code(&self) -> &'static str {
        SigningError::error_code(self)
    }

    fn http_status(&self) -> StatusCode {
        SigningError::http_status(self)
    }
}

impl Display for SigningError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Auth(msg) => f.write_str(msg),
            Self::Crypto(ref e) => write!(f, "RSA signing failed: {}", e),
            Self::IO(ref e) => Display::fmt(e, f),
            Self::InvalidArgument(msg) => f.write_str(msg),
            Self::MalformedCredentials(ref e) => write!(f, "Malformed credential document: {}", e),
            Self::MalformedKey(msg) => f.write_str(msg),
        }
    }
}

impl Error for SigningError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Crypto(ref e) => Some(e),
            Self::IO(ref e) => Some(e),
            Self::MalformedCredentials(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<IOError> for SigningError {
    fn from(e: IOError) -> SigningError {
        SigningError::IO(e)
    }
}

impl From<rsa::signature::Error> for SigningError {
    fn from(e: rsa::signature::Error) -> SigningError {
        SigningError::Crypto(e)
    }
}

impl From<serde_json::Error> for SigningError {
    fn from(e: serde_json::Error) -> SigningError {
        SigningError::MalformedCredentials(e)
    }
}

//! The `gcs_url_signature` crate generates signed URLs for Google Cloud Storage objects entirely
//! offline. Given a service account's RSA private key and an object location, it produces a URL
//! whose query parameters authorize a bearer to access the object until an expiry time. No network
//! requests are made.
//!
//! Two signing protocols are supported:
//! * **V2**, the legacy scheme: a Base64 RSA-SHA256 signature over a short string, with `Expires`
//!   given in Unix seconds.
//! * **V4**, the scoped scheme: a hex RSA-SHA256 signature over a canonical request that binds the
//!   query string and selected headers, with lifetimes capped at seven days.
//!
//! This crate does not verify signatures or talk to the storage service.
//!
//! # Workflow
//! 1. Build a [`CredentialContext`], either directly from a PEM key and principal, from a service
//!    account JSON document, or through a [`CredentialLoader`].
//! 2. Describe the URL with [`SignedUrlOptions`] (all fields have defaults).
//! 3. Call [`sign_url`], or [`sign_url_at`] to pin the signing instant.
//!
//! ## Example
//! ```rust,no_run
//! use chrono::Duration;
//! use gcs_url_signature::{sign_url, CredentialLoader, SignedUrlOptions, SigningVersion};
//!
//! // Reads GOOGLE_APPLICATION_CREDENTIALS_JSON or GOOGLE_APPLICATION_CREDENTIALS.
//! let credentials = CredentialLoader::new().load().unwrap();
//!
//! let options = SignedUrlOptions::builder()
//!     .version(SigningVersion::V4)
//!     .valid_for(Duration::minutes(15))
//!     .response_content_disposition("attachment; filename=\"report.pdf\"")
//!     .build()
//!     .unwrap();
//!
//! let url = sign_url(&credentials, "my-bucket", "reports/2023/report.pdf", &options).unwrap();
//! println!("{}", url);
//! ```
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod canonical;
mod chronoutil;
mod constants;
mod credential;
mod crypto;
mod error;
mod loader;
mod signature;

pub use crate::{
    credential::CredentialContext,
    error::SigningError,
    loader::{CredentialLoader, EnvLookup},
    signature::{
        sign_url, sign_url_at, sign_v2_at, sign_v4_at, SignedUrlOptions, SignedUrlOptionsBuilder,
        SignedUrlOptionsBuilderError, SigningVersion,
    },
};

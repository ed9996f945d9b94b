//! SHA-256 digests and RSA-SHA256 (PKCS#1 v1.5) signing.

use {
    crate::SigningError,
    rsa::{
        pkcs1v15::SigningKey,
        signature::{SignatureEncoding, Signer},
    },
    sha2::{Digest, Sha256},
};

/// The length of a SHA-256 digest.
pub(crate) const SHA256_OUTPUT_LEN: usize = 32;

#[inline(always)]
pub(crate) fn sha256(value: &[u8]) -> [u8; SHA256_OUTPUT_LEN] {
    Sha256::digest(value).into()
}

#[inline(always)]
pub(crate) fn sha256_hex(value: &[u8]) -> String {
    hex::encode(sha256(value))
}

/// RSASSA-PKCS1-v1_5 over the SHA-256 digest of `value`. There is no nonce, so the output is a
/// pure function of the key and the input.
pub(crate) fn rsa_sha256(key: &SigningKey<Sha256>, value: &[u8]) -> Result<Vec<u8>, SigningError> {
    let signature = key.try_sign(value)?;
    Ok(signature.to_vec())
}

/* Copyright (c) Fortanix, Inc.
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use crate::digest::DigestType;
use crate::symmetric::{Algorithm, Mode};

/// Result type of every codec operation.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors returned by the codec.
///
/// Parameter errors are reported before mbedtls is called. The `*Failed` variants name the stage
/// that failed and carry the [`mbedtls::Error`] it reported.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The algorithm is declared but not implemented.
    #[error("cipher algorithm {0:?} is not supported")]
    AlgorithmNotSupported(Algorithm),

    /// The mode has no mbedtls counterpart for the algorithm.
    #[error("mode {mode:?} is not supported with {algorithm:?}")]
    ModeNotSupported {
        /// requested algorithm
        algorithm: Algorithm,
        /// requested mode
        mode: Mode,
    },

    /// The IV length is not valid for the algorithm.
    #[error("invalid IV length {len} for {algorithm:?}")]
    InvalidIvLength {
        /// requested algorithm
        algorithm: Algorithm,
        /// supplied IV length
        len: usize,
    },

    /// The key length is not valid for the algorithm.
    #[error("invalid key length {len} for {algorithm:?}")]
    InvalidKeyLength {
        /// requested algorithm
        algorithm: Algorithm,
        /// supplied key length
        len: usize,
    },

    /// [`Padding::None`](crate::symmetric::Padding::None) was requested for input that does not
    /// fill whole blocks.
    #[error("input of {len} bytes is not a multiple of the {block_size} byte block and no padding was requested")]
    UnpaddedPartialBlock {
        /// input length
        len: usize,
        /// cipher block size
        block_size: usize,
    },

    /// Setting up the cipher context (cipher lookup, key, IV) failed.
    #[error("failed to create cipher context: {0}")]
    PrimitiveCreateFailed(#[source] mbedtls::Error),

    /// Feeding data through the cipher failed.
    #[error("failed to update cipher: {0}")]
    PrimitiveUpdateFailed(#[source] mbedtls::Error),

    /// Finalizing the cipher failed.
    #[error("failed to finalize cipher: {0}")]
    PrimitiveFinalFailed(#[source] mbedtls::Error),

    /// The key bytes could not be parsed as a key of the expected kind.
    #[error("failed to create key: {0}")]
    KeyCreationFailed(#[source] mbedtls::Error),

    /// A parsed key is not an RSA key.
    #[error("key is not an RSA key")]
    NotAnRsaKey,

    /// Generating a key pair failed.
    #[error("failed to generate key pair: {0}")]
    KeyGenerationFailed(#[source] mbedtls::Error),

    /// The digest handed to `sign` is not one digest of the requested type.
    #[error("digest of {len} bytes is not a {digest_type:?} digest")]
    InvalidDigestLength {
        /// requested digest type
        digest_type: DigestType,
        /// supplied digest length
        len: usize,
    },

    /// The ciphertext is not a whole number of RSA blocks.
    #[error("ciphertext of {len} bytes is not a multiple of the {block_size} byte RSA block")]
    InvalidCiphertextLength {
        /// ciphertext length
        len: usize,
        /// RSA block size
        block_size: usize,
    },

    /// Encrypting an RSA block failed.
    #[error("failed to create encrypted data: {0}")]
    EncryptedDataCreationFailed(#[source] mbedtls::Error),

    /// Decrypting an RSA block failed.
    #[error("failed to create decrypted data: {0}")]
    DecryptedDataCreationFailed(#[source] mbedtls::Error),

    /// Producing a signature failed.
    #[error("failed to create signature: {0}")]
    SignatureCreationFailed(#[source] mbedtls::Error),

    /// Hashing failed.
    #[error("failed to compute digest: {0}")]
    DigestFailed(#[source] mbedtls::Error),

    /// No random bytes could be obtained.
    #[error("failed to get random bytes")]
    RandomUnavailable,
}

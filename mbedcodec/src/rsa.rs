/* Copyright (c) Fortanix, Inc.
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use crate::digest::DigestType;
use crate::error::{Error, Result};
use crate::log::{debug, error, trace};
use crate::rng::rng_new;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;
use mbedtls::pk::Pk;
use std::sync::Mutex;
use utils::pk::{is_rsa_type, pkcs1_v15_max_chunk, pkcs1_v15_options, rsa_block_size};
use zeroize::Zeroizing;

pub use utils::pk::PKCS1_V15_OVERHEAD;

/// Public exponent of generated key pairs.
pub const DEFAULT_PUBLIC_EXPONENT: u32 = 0x10001;

fn rsa_pk(mut pk: Pk) -> Result<(Mutex<Pk>, usize)> {
    if !is_rsa_type(pk.pk_type()) {
        debug!("Rejecting {:?} key, expected RSA", pk.pk_type());
        return Err(Error::NotAnRsaKey);
    }
    pk.set_options(pkcs1_v15_options());
    let block_size = rsa_block_size(&pk);
    Ok((Mutex::new(pk), block_size))
}

fn key_creation_failed(err: mbedtls::Error) -> Error {
    if utils::error::is_malformed_key(&err) {
        debug!("Malformed key: {:?}", err);
    } else {
        error!("Failed to parse key, mbedtls error: {:?}", err);
    }
    Error::KeyCreationFailed(err)
}

/// A public key that parsed but cannot be written back out is as unusable as one that failed to
/// parse, so it reports [`Error::KeyCreationFailed`] too.
fn key_export_failed(err: mbedtls::Error) -> Error {
    error!("Failed to write public key DER, mbedtls error: {:?}", err);
    Error::KeyCreationFailed(err)
}

/// An RSA public key used to encrypt and verify.
pub struct PublicKey {
    pk: Mutex<Pk>,
    block_size: usize,
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PublicKey")
            .field("pk", &"Mutex<mbedtls::pk::Pk>")
            .field("block_size", &self.block_size)
            .finish()
    }
}

impl PublicKey {
    /// Parses a DER encoded RSA public key, either `RSAPublicKey` (PKCS#1) or
    /// `SubjectPublicKeyInfo`.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let (pk, block_size) = rsa_pk(Pk::from_public_key(der).map_err(key_creation_failed)?)?;
        Ok(Self { pk, block_size })
    }

    /// Size of the modulus in bytes; every ciphertext block and signature has this length.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// DER encoded `SubjectPublicKeyInfo` of this key.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.pk
            .lock()
            .expect("poisoned pk lock")
            .write_public_der_vec()
            .map_err(key_export_failed)
    }
}

/// An RSA private key used to decrypt and sign.
pub struct PrivateKey {
    pk: Mutex<Pk>,
    block_size: usize,
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("pk", &"Mutex<mbedtls::pk::Pk>")
            .field("block_size", &self.block_size)
            .finish()
    }
}

impl PrivateKey {
    /// Parses a DER encoded RSA private key, either `RSAPrivateKey` (PKCS#1) or unencrypted PKCS#8.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let (pk, block_size) = rsa_pk(Pk::from_private_key(der, None).map_err(key_creation_failed)?)?;
        Ok(Self { pk, block_size })
    }

    /// Size of the modulus in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// The public half of this key.
    pub fn public_key(&self) -> Result<PublicKey> {
        let der = self
            .pk
            .lock()
            .expect("poisoned pk lock")
            .write_public_der_vec()
            .map_err(key_export_failed)?;
        PublicKey::from_der(&der)
    }
}

/// Generates an RSA key pair with a `bits` long modulus and [`DEFAULT_PUBLIC_EXPONENT`].
pub fn generate_key_pair(bits: u32) -> Result<(PublicKey, PrivateKey)> {
    let mut rng = rng_new().ok_or(Error::RandomUnavailable)?;
    let pk = Pk::generate_rsa(&mut rng, bits, DEFAULT_PUBLIC_EXPONENT).map_err(|err| {
        error!("Failed to generate {} bit RSA key, mbedtls error: {:?}", bits, err);
        Error::KeyGenerationFailed(err)
    })?;
    debug!("Generated {} bit RSA key pair", bits);

    let (pk, block_size) = rsa_pk(pk)?;
    let private_key = PrivateKey { pk, block_size };
    let public_key = private_key.public_key()?;
    Ok((public_key, private_key))
}

/// Encrypts `plaintext` with PKCS#1 v1.5, [`PKCS1_V15_OVERHEAD`] bytes short of one block at a time.
///
/// The output is the concatenation of one `block_size` ciphertext per chunk.
pub fn encrypt(public_key: &PublicKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let block_size = public_key.block_size;
    let max_chunk =
        pkcs1_v15_max_chunk(block_size).ok_or(Error::EncryptedDataCreationFailed(mbedtls::Error::RsaBadInputData))?;
    let mut rng = rng_new().ok_or(Error::RandomUnavailable)?;
    let mut pk = public_key.pk.lock().expect("poisoned pk lock");

    let mut out = Vec::with_capacity(plaintext.len().div_ceil(max_chunk) * block_size);
    let mut block = vec![0u8; block_size];
    for chunk in plaintext.chunks(max_chunk) {
        let len = pk.encrypt(chunk, &mut block, &mut rng).map_err(|err| {
            error!("Failed to encrypt RSA block, mbedtls error: {:?}", err);
            Error::EncryptedDataCreationFailed(err)
        })?;
        out.extend_from_slice(&block[..len]);
    }
    trace!("RSA encrypt: {} bytes in {} blocks", plaintext.len(), out.len() / block_size);
    Ok(out)
}

/// Decrypts the concatenated `block_size` blocks of `ciphertext`.
pub fn decrypt(private_key: &PrivateKey, ciphertext: &[u8]) -> Result<Vec<u8>> {
    let block_size = private_key.block_size;
    if ciphertext.len() % block_size != 0 {
        return Err(Error::InvalidCiphertextLength { len: ciphertext.len(), block_size });
    }
    let mut rng = rng_new().ok_or(Error::RandomUnavailable)?;
    let mut pk = private_key.pk.lock().expect("poisoned pk lock");

    let mut out = Vec::with_capacity(ciphertext.len());
    let mut block = Zeroizing::new(vec![0u8; block_size]);
    for chunk in ciphertext.chunks(block_size) {
        let len = pk.decrypt(chunk, &mut block, &mut rng).map_err(|err| {
            error!("Failed to decrypt RSA block, mbedtls error: {:?}", err);
            Error::DecryptedDataCreationFailed(err)
        })?;
        out.extend_from_slice(&block[..len]);
    }
    trace!("RSA decrypt: {} blocks, {} bytes out", ciphertext.len() / block_size, out.len());
    Ok(out)
}

/// Signs `digest`, which must be exactly one `digest_type` digest, with PKCS#1 v1.5.
pub fn sign(private_key: &PrivateKey, digest: &[u8], digest_type: DigestType) -> Result<Vec<u8>> {
    if !utils::hash::is_digest_len(digest_type.hash_type(), digest.len()) {
        return Err(Error::InvalidDigestLength { digest_type, len: digest.len() });
    }
    let mut rng = rng_new().ok_or(Error::RandomUnavailable)?;
    let mut pk = private_key.pk.lock().expect("poisoned pk lock");

    let mut sig = vec![0u8; private_key.block_size];
    let sig_len = pk
        .sign(digest_type.hash_type(), digest, &mut sig, &mut rng)
        .map_err(|err| {
            error!("Failed to sign {:?} digest, mbedtls error: {:?}", digest_type, err);
            Error::SignatureCreationFailed(err)
        })?;
    sig.truncate(sig_len);
    Ok(sig)
}

/// Checks a PKCS#1 v1.5 `signature` over `digest`.
///
/// Any failure, including a `digest` of the wrong length, reads as an invalid signature.
pub fn verify(public_key: &PublicKey, signature: &[u8], digest: &[u8], digest_type: DigestType) -> bool {
    if !utils::hash::is_digest_len(digest_type.hash_type(), digest.len()) {
        debug!("{} byte digest is not a {:?} digest", digest.len(), digest_type);
        return false;
    }
    let mut pk = public_key.pk.lock().expect("poisoned pk lock");
    match pk.verify(digest_type.hash_type(), digest, signature) {
        Ok(()) => true,
        Err(err) if utils::error::is_signature_mismatch(&err) => {
            debug!("Signature does not match: {:?}", err);
            false
        }
        Err(err) => {
            error!("Failed to verify signature, mbedtls error: {:?}", err);
            false
        }
    }
}

/// Parses `der` as a public key and [`encrypt`]s `plaintext` with it.
pub fn encrypt_with_key_der(der: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    encrypt(&PublicKey::from_der(der)?, plaintext)
}

/// Parses `der` as a private key and [`decrypt`]s `ciphertext` with it.
pub fn decrypt_with_key_der(der: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    decrypt(&PrivateKey::from_der(der)?, ciphertext)
}


#[cfg(bench)]
mod benchmarks {
    use super::{decrypt, encrypt, generate_key_pair};

    #[bench]
    fn bench_rsa_2048_encrypt_1k(b: &mut test::Bencher) {
        let (public_key, _) = generate_key_pair(2048).unwrap();
        let input = [123u8; 1024];
        b.iter(|| {
            test::black_box(encrypt(&public_key, &input).unwrap());
        });
    }

    #[bench]
    fn bench_rsa_2048_decrypt_1k(b: &mut test::Bencher) {
        let (public_key, private_key) = generate_key_pair(2048).unwrap();
        let cipher = encrypt(&public_key, &[123u8; 1024]).unwrap();
        b.iter(|| {
            test::black_box(decrypt(&private_key, &cipher).unwrap());
        });
    }
}

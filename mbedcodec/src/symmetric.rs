/* Copyright (c) Fortanix, Inc.
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use crate::engine::CipherEngine;
use crate::error::{Error, Result};
use crate::log::debug;
use crate::padding;
use alloc::vec;
use alloc::vec::Vec;
use zeroize::Zeroizing;

pub use crate::padding::Padding;

/// Symmetric cipher algorithms.
///
/// [`Algorithm::Cast`], [`Algorithm::Rc2`] and [`Algorithm::Blowfish`] are recognized so callers can
/// name them, but every operation on them fails with [`Error::AlgorithmNotSupported`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// DES, 8 byte key and block.
    Des,
    /// Triple DES with a two or three key bundle, 8 byte block.
    TripleDes,
    /// AES-128/192/256, 16 byte block.
    Aes,
    /// RC4 stream cipher.
    Rc4,
    /// CAST-128 (not supported).
    Cast,
    /// RC2 (not supported).
    Rc2,
    /// Blowfish (not supported).
    Blowfish,
}

impl Algorithm {
    /// Block size in bytes, `None` for the stream cipher.
    pub const fn block_size(self) -> Option<usize> {
        match self {
            Self::Des | Self::TripleDes | Self::Cast | Self::Rc2 | Self::Blowfish => Some(8),
            Self::Aes => Some(16),
            Self::Rc4 => None,
        }
    }

    /// Whether input is padded to whole blocks before encryption.
    pub const fn is_block_cipher(self) -> bool {
        self.block_size().is_some()
    }

    /// Whether the codec can run this algorithm.
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Des | Self::TripleDes | Self::Aes | Self::Rc4)
    }

    /// Whether `len` is an acceptable key length in bytes.
    pub const fn is_valid_key_len(self, len: usize) -> bool {
        match self {
            Self::Des => len == 8,
            Self::TripleDes => matches!(len, 16 | 24),
            Self::Aes => matches!(len, 16 | 24 | 32),
            Self::Rc4 => len > 0 && len < 256,
            Self::Cast | Self::Rc2 | Self::Blowfish => false,
        }
    }

    /// Whether `len` is an acceptable IV length in bytes.
    ///
    /// RC4 takes no IV and accepts anything.
    pub const fn is_valid_iv_len(self, len: usize) -> bool {
        match self {
            Self::Des => len == 8,
            Self::TripleDes => matches!(len, 16 | 24),
            Self::Aes => len == 16,
            Self::Rc4 => true,
            Self::Cast | Self::Rc2 | Self::Blowfish => false,
        }
    }
}

/// Block cipher modes of operation, plus the RC4 stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Electronic codebook.
    Ecb,
    /// Cipher block chaining.
    Cbc,
    /// Cipher feedback, full block segments.
    Cfb,
    /// Cipher feedback, 8-bit segments.
    Cfb8,
    /// Output feedback.
    Ofb,
    /// RC4 stream; only valid with [`Algorithm::Rc4`].
    Rc4,
}

/// Direction of a [`transform`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Plaintext to ciphertext.
    Encrypt,
    /// Ciphertext to plaintext.
    Decrypt,
}

/// Runs `input` through `algorithm` in `mode`.
///
/// Parameters are checked in order: the algorithm must be supported, then the IV and key lengths
/// must be valid for it. Block cipher input is copied into a scratch buffer rounded up to whole
/// blocks and the tail is filled with `padding`. Block-aligned input gets no extra block, and
/// padding is never stripped on decryption: the caller knows the plaintext length.
pub fn transform(
    operation: Operation,
    algorithm: Algorithm,
    mode: Mode,
    padding: Padding,
    key: &[u8],
    iv: &[u8],
    input: &[u8],
) -> Result<Vec<u8>> {
    if !algorithm.is_supported() {
        return Err(Error::AlgorithmNotSupported(algorithm));
    }
    if !algorithm.is_valid_iv_len(iv.len()) {
        return Err(Error::InvalidIvLength { algorithm, len: iv.len() });
    }
    if !algorithm.is_valid_key_len(key.len()) {
        return Err(Error::InvalidKeyLength { algorithm, len: key.len() });
    }

    let output = match algorithm.block_size() {
        Some(block_size) => {
            let mut buf = Zeroizing::new(vec![0u8; padding::padded_len(input.len(), block_size)]);
            buf[..input.len()].copy_from_slice(input);
            padding::apply(&mut buf, input.len(), padding, block_size)?;
            run(operation, algorithm, mode, key, iv, &buf)?
        }
        None => run(operation, algorithm, mode, key, iv, input)?,
    };

    debug!(
        "{:?} {:?}/{:?}/{:?}: {} bytes in, {} bytes out",
        operation,
        algorithm,
        mode,
        padding,
        input.len(),
        output.len()
    );
    Ok(output)
}

fn run(operation: Operation, algorithm: Algorithm, mode: Mode, key: &[u8], iv: &[u8], input: &[u8]) -> Result<Vec<u8>> {
    let mut engine = CipherEngine::create(operation, algorithm, mode, key, iv)?;
    let mut output = engine.update(input)?;
    output.extend_from_slice(&engine.finish()?);
    Ok(output)
}

/// Encrypts `input`; see [`transform`].
pub fn encrypt(algorithm: Algorithm, mode: Mode, padding: Padding, key: &[u8], iv: &[u8], input: &[u8]) -> Result<Vec<u8>> {
    transform(Operation::Encrypt, algorithm, mode, padding, key, iv, input)
}

/// Decrypts `input`; see [`transform`].
///
/// The result keeps whatever padding the ciphertext carried.
pub fn decrypt(algorithm: Algorithm, mode: Mode, padding: Padding, key: &[u8], iv: &[u8], input: &[u8]) -> Result<Vec<u8>> {
    transform(Operation::Decrypt, algorithm, mode, padding, key, iv, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{base64_encode, from_hex};

    const PLAIN: &[u8] = b"0123456789";
    const KEY8: &[u8] = b"01234567";
    const KEY16: &[u8] = b"0123456789abcedf";
    const KEY24: &[u8] = b"0123456789abcedf01234567";

    fn round_trip(algorithm: Algorithm, mode: Mode, padding: Padding, key: &[u8], iv: &[u8]) -> Vec<u8> {
        crate::init_test_logger();
        let cipher = encrypt(algorithm, mode, padding, key, iv, PLAIN).unwrap();
        let plain = decrypt(algorithm, mode, padding, key, iv, &cipher).unwrap();
        assert_eq!(&plain[..PLAIN.len()], PLAIN);
        cipher
    }

    #[test]
    fn test_des_ecb_pkcs7() {
        let cipher = round_trip(Algorithm::Des, Mode::Ecb, Padding::Pkcs7, KEY8, KEY8);
        assert_eq!(base64_encode(&cipher), "xQrQKMbamABjVveOUBYk3g==");
    }

    #[test]
    fn test_triple_des_cbc_pkcs7() {
        let cipher = round_trip(Algorithm::TripleDes, Mode::Cbc, Padding::Pkcs7, KEY24, KEY24);
        assert_eq!(cipher, from_hex("761fd098576a0e802044771c1336d09d").unwrap());
    }

    #[test]
    fn test_aes_known_answers() {
        let cipher = round_trip(Algorithm::Aes, Mode::Cbc, Padding::AnsiX923, KEY16, KEY16);
        assert_eq!(cipher, from_hex("f44f7fd8f4bc1f194500ec421785c21d").unwrap());

        let cipher = round_trip(Algorithm::Aes, Mode::Ofb, Padding::Zero, KEY16, KEY16);
        assert_eq!(cipher, from_hex("434c8180a8e306952921cabd7c20c88a").unwrap());

        let cipher = round_trip(Algorithm::Aes, Mode::Ecb, Padding::Pkcs7, KEY16, KEY16);
        assert_eq!(cipher, from_hex("f79816c2ef6cd57fab20164a4b34ce02").unwrap());
    }

    #[test]
    fn test_aes_round_trips() {
        let cipher = round_trip(Algorithm::Aes, Mode::Cfb, Padding::Iso7816, KEY16, KEY16);
        assert_eq!(cipher.len(), 16);

        let cipher = round_trip(Algorithm::Aes, Mode::Cbc, Padding::Iso10126, KEY16, KEY16);
        assert_eq!(cipher.len(), 16);

        let key32 = b"0123456789abcedf0123456789abcedf";
        let cipher = round_trip(Algorithm::Aes, Mode::Cbc, Padding::Pkcs7, key32, KEY16);
        assert_eq!(cipher.len(), 16);

        let cipher = round_trip(Algorithm::TripleDes, Mode::Ecb, Padding::Zero, &KEY24[..16], KEY16);
        assert_eq!(cipher.len(), 16);
    }

    #[test]
    fn test_rc4() {
        let cipher = round_trip(Algorithm::Rc4, Mode::Rc4, Padding::None, KEY16, KEY16);
        assert_eq!(base64_encode(&cipher), "K2D8w8k6cVv1Vg==");

        // RC4 repeats short keys during scheduling, so this key is equivalent.
        let key64 = KEY16.repeat(4);
        let cipher = round_trip(Algorithm::Rc4, Mode::Rc4, Padding::None, &key64, KEY16);
        assert_eq!(base64_encode(&cipher), "K2D8w8k6cVv1Vg==");
    }

    #[test]
    fn test_block_aligned_input_gets_no_extra_block() {
        let input = [0x5Au8; 32];
        for padding in [Padding::None, Padding::Pkcs7, Padding::AnsiX923] {
            let cipher = encrypt(Algorithm::Aes, Mode::Cbc, padding, KEY16, KEY16, &input).unwrap();
            assert_eq!(cipher.len(), 32);
            assert_eq!(decrypt(Algorithm::Aes, Mode::Cbc, padding, KEY16, KEY16, &cipher).unwrap(), input);
        }
        assert!(encrypt(Algorithm::Aes, Mode::Cbc, Padding::Pkcs7, KEY16, KEY16, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_parameter_errors() {
        assert_eq!(
            encrypt(Algorithm::Blowfish, Mode::Cbc, Padding::Pkcs7, KEY8, KEY8, PLAIN),
            Err(Error::AlgorithmNotSupported(Algorithm::Blowfish))
        );
        assert_eq!(
            encrypt(Algorithm::Aes, Mode::Cbc, Padding::Pkcs7, KEY16, KEY8, PLAIN),
            Err(Error::InvalidIvLength { algorithm: Algorithm::Aes, len: 8 })
        );
        assert_eq!(
            encrypt(Algorithm::Des, Mode::Cbc, Padding::Pkcs7, KEY16, KEY8, PLAIN),
            Err(Error::InvalidKeyLength { algorithm: Algorithm::Des, len: 16 })
        );
        // IV is checked before the key.
        assert_eq!(
            encrypt(Algorithm::TripleDes, Mode::Cbc, Padding::Pkcs7, KEY8, KEY8, PLAIN),
            Err(Error::InvalidIvLength { algorithm: Algorithm::TripleDes, len: 8 })
        );
        assert_eq!(
            encrypt(Algorithm::Rc4, Mode::Rc4, Padding::None, &[], &[], PLAIN),
            Err(Error::InvalidKeyLength { algorithm: Algorithm::Rc4, len: 0 })
        );
        assert_eq!(
            encrypt(Algorithm::Rc4, Mode::Rc4, Padding::None, &[1u8; 256], &[], PLAIN),
            Err(Error::InvalidKeyLength { algorithm: Algorithm::Rc4, len: 256 })
        );
    }

    #[test]
    fn test_mode_and_padding_errors() {
        assert_eq!(
            encrypt(Algorithm::Aes, Mode::Cbc, Padding::None, KEY16, KEY16, PLAIN),
            Err(Error::UnpaddedPartialBlock { len: 10, block_size: 16 })
        );
        assert_eq!(
            encrypt(Algorithm::Aes, Mode::Rc4, Padding::Pkcs7, KEY16, KEY16, PLAIN),
            Err(Error::ModeNotSupported { algorithm: Algorithm::Aes, mode: Mode::Rc4 })
        );
        assert_eq!(
            encrypt(Algorithm::Rc4, Mode::Cfb8, Padding::None, KEY16, KEY16, PLAIN),
            Err(Error::ModeNotSupported { algorithm: Algorithm::Rc4, mode: Mode::Cfb8 })
        );
    }

    #[test]
    fn test_feedback_modes_on_every_block_cipher() {
        let cipher = round_trip(Algorithm::Des, Mode::Cfb, Padding::Pkcs7, KEY8, KEY8);
        assert_eq!(cipher.len(), 16);
        let cipher = round_trip(Algorithm::Des, Mode::Ofb, Padding::AnsiX923, KEY8, KEY8);
        assert_eq!(cipher.len(), 16);
        let cipher = round_trip(Algorithm::TripleDes, Mode::Cfb8, Padding::Iso7816, KEY24, KEY24);
        assert_eq!(cipher.len(), 16);
        let cipher = round_trip(Algorithm::Aes, Mode::Cfb8, Padding::Pkcs7, KEY16, KEY16);
        assert_eq!(cipher.len(), 16);

        for (algorithm, key, iv) in [
            (Algorithm::Des, KEY8, KEY8),
            (Algorithm::TripleDes, KEY24, KEY24),
            (Algorithm::Aes, KEY24, KEY16),
        ] {
            for mode in [Mode::Ecb, Mode::Cbc, Mode::Cfb, Mode::Cfb8, Mode::Ofb] {
                round_trip(algorithm, mode, Padding::Zero, key, iv);
            }
        }
    }

    #[test]
    fn test_algorithm_attributes() {
        assert_eq!(Algorithm::Des.block_size(), Some(8));
        assert_eq!(Algorithm::TripleDes.block_size(), Some(8));
        assert_eq!(Algorithm::Aes.block_size(), Some(16));
        assert_eq!(Algorithm::Rc4.block_size(), None);
        assert!(!Algorithm::Rc4.is_block_cipher());
        assert!(Algorithm::Aes.is_block_cipher());
        assert!(!Algorithm::Cast.is_supported());
        assert!(!Algorithm::Rc2.is_supported());
        assert!(Algorithm::Rc4.is_valid_iv_len(0));
        assert!(Algorithm::Aes.is_valid_key_len(24));
        assert!(!Algorithm::Aes.is_valid_key_len(20));
    }
}

#[cfg(bench)]
mod benchmarks {
    use super::{encrypt, Algorithm, Mode, Padding};

    #[bench]
    fn bench_aes_128_cbc_pkcs7(b: &mut test::Bencher) {
        bench_encrypt(b, Algorithm::Aes, Mode::Cbc, b"0123456789abcedf");
    }

    #[bench]
    fn bench_triple_des_cbc_pkcs7(b: &mut test::Bencher) {
        bench_encrypt(b, Algorithm::TripleDes, Mode::Cbc, b"0123456789abcedf01234567");
    }

    #[bench]
    fn bench_aes_128_ecb_pkcs7(b: &mut test::Bencher) {
        bench_encrypt(b, Algorithm::Aes, Mode::Ecb, b"0123456789abcedf");
    }

    fn bench_encrypt(b: &mut test::Bencher, algorithm: Algorithm, mode: Mode, key: &[u8]) {
        let input = [123u8; 1024 * 16 + 5];
        let iv = &key[..16];
        b.iter(|| {
            test::black_box(encrypt(algorithm, mode, Padding::Pkcs7, key, iv, &input).unwrap());
        });
    }
}

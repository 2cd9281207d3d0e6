/* Copyright (c) Fortanix, Inc.
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use crate::error::{Error, Result};
use crate::log::error;
use alloc::vec;
use alloc::vec::Vec;
use mbedtls::hash::{Md, Type};

/// The digest algorithms the codec hashes with and signs over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DigestType {
    /// SHA-1 as specified in [FIPS 180-4], 160-bit digest.
    ///
    /// [FIPS 180-4]: http://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.180-4.pdf
    Sha1,
    /// SHA-224, 224-bit digest.
    Sha224,
    /// SHA-256, 256-bit digest.
    Sha256,
    /// SHA-384, 384-bit digest.
    Sha384,
    /// SHA-512, 512-bit digest.
    Sha512,
}

impl DigestType {
    /// All supported digest types.
    pub const ALL: [Self; 5] = [Self::Sha1, Self::Sha224, Self::Sha256, Self::Sha384, Self::Sha512];

    /// Length in bytes of a digest of this type.
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha1 => 160 / 8,
            Self::Sha224 => 224 / 8,
            Self::Sha256 => 256 / 8,
            Self::Sha384 => 384 / 8,
            Self::Sha512 => 512 / 8,
        }
    }

    pub(crate) fn hash_type(self) -> Type {
        match self {
            Self::Sha1 => Type::Sha1,
            Self::Sha224 => Type::Sha224,
            Self::Sha256 => Type::Sha256,
            Self::Sha384 => Type::Sha384,
            Self::Sha512 => Type::Sha512,
        }
    }
}

/// Hashes `data` with `digest_type`.
pub fn digest(data: &[u8], digest_type: DigestType) -> Result<Vec<u8>> {
    let hash_type = digest_type.hash_type();
    let mut out = vec![0u8; digest_type.output_len()];
    let len = Md::hash(hash_type, data, &mut out).map_err(|err| {
        error!("Failed to do hash, mbedtls error: {:?}", err);
        Error::DigestFailed(err)
    })?;
    out.truncate(len);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::from_hex;

    const INPUT: &[u8] = b"1234";

    fn hex(s: &str) -> Vec<u8> {
        from_hex(s).unwrap()
    }

    #[test]
    fn test_known_answers() {
        assert_eq!(
            digest(INPUT, DigestType::Sha1).unwrap(),
            hex("7110EDA4D09E062AA5E4A390B0A572AC0D2C0220")
        );
        assert_eq!(
            digest(INPUT, DigestType::Sha224).unwrap(),
            hex("99FB2F48C6AF4761F904FC85F95EB56190E5D40B1F44EC3A9C1FA319")
        );
        assert_eq!(
            digest(INPUT, DigestType::Sha256).unwrap(),
            hex("03ac674216f3e15c761ee1a5e255f067953623c8b388b4459e13f978d7c846f4")
        );
        assert_eq!(
            digest(INPUT, DigestType::Sha384).unwrap(),
            hex("504f008c8fcf8b2ed5dfcde752fc5464ab8ba064215d9c5b5fc486af3d9ab8c81b14785180d2ad7cee1ab792ad44798c")
        );
        assert_eq!(
            digest(INPUT, DigestType::Sha512).unwrap(),
            hex("d404559f602eab6fd602ac7680dacbfaadd13630335e951f097af3900e9de176b6db28512f2e000b9d04fba5133e8b1c6e8df59db3a8ab9d60be4b97cc9e81db")
        );
    }

    #[test]
    fn test_output_len_matches_mbedtls() {
        for digest_type in DigestType::ALL {
            assert_eq!(
                utils::hash::digest_len(digest_type.hash_type()),
                Some(digest_type.output_len())
            );
            assert_eq!(digest(b"", digest_type).unwrap().len(), digest_type.output_len());
        }
    }
}

#[cfg(bench)]
mod benchmarks {
    use super::{digest, DigestType};

    #[bench]
    fn bench_sha_256(b: &mut test::Bencher) {
        bench_digest(b, DigestType::Sha256);
    }

    #[bench]
    fn bench_sha_512(b: &mut test::Bencher) {
        bench_digest(b, DigestType::Sha512);
    }

    fn bench_digest(b: &mut test::Bencher, digest_type: DigestType) {
        let input = [123u8; 1024 * 16];
        b.iter(|| {
            test::black_box(digest(&input, digest_type).unwrap());
        });
    }
}

/* Copyright (c) Fortanix, Inc.
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! mbedcodec
//!
//! mbedcodec is a symmetric and RSA codec layer on top of [mbedtls]. The primitives (DES, 3DES,
//! AES, RSA, SHA-*) come from mbedtls, RC4 from the `rc4` crate; this crate adds what mbedtls does
//! not do for you:
//!
//! * [`symmetric`]: block sizing and six padding schemes in front of a "no padding" cipher;
//! * [`rsa`]: PKCS#1 v1.5 encryption of data longer than one RSA block, and digest signatures;
//! * [`digest`]: one-shot SHA-1/224/256/384/512.
//!
//! [`encoding`] and [`bytes`] hold the hex, base64, byte-order and byte-search helpers that go
//! with it.
//!
//! ```no_run
//! use mbedcodec::symmetric::{self, Algorithm, Mode, Padding};
//!
//! let key = b"0123456789abcedf";
//! let cipher = symmetric::encrypt(Algorithm::Aes, Mode::Cbc, Padding::Pkcs7, key, key, b"0123456789")?;
//! let plain = symmetric::decrypt(Algorithm::Aes, Mode::Cbc, Padding::Pkcs7, key, key, &cipher)?;
//! assert_eq!(&plain[..10], b"0123456789");
//! # Ok::<(), mbedcodec::Error>(())
//! ```
//!
//! [mbedtls]: https://github.com/fortanix/rust-mbedtls

// Require docs for public APIs, deny unsafe code, etc.
#![forbid(unsafe_code, unused_must_use)]
#![cfg_attr(not(bench), forbid(unstable_features))]
#![deny(
    clippy::alloc_instead_of_core,
    clippy::clone_on_ref_ptr,
    clippy::std_instead_of_core,
    clippy::use_self,
    clippy::upper_case_acronyms,
    trivial_casts,
    trivial_numeric_casts,
    missing_docs,
    unreachable_pub,
    unused_import_braces,
    unused_extern_crates,
    // unused_qualifications
)]
// Relax these clippy lints:
// - too_many_arguments: a symmetric transform is fully described by seven values, wrapping them
//   doesn't necessarily make it easier to follow what's going on
// - single_component_path_imports: our top-level `use log` import causes
//   a false positive, https://github.com/rust-lang/rust-clippy/issues/5210
#![allow(clippy::too_many_arguments, clippy::single_component_path_imports)]
// Enable documentation for all features on docs.rs
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(bench, feature(test))]
#![cfg_attr(not(test), no_std)]

extern crate alloc;
// This `extern crate` plus the `#![no_std]` attribute changes the default prelude from
// `std::prelude` to `core::prelude`. That forces one to _explicitly_ import (`use`) everything that
// is in `std::prelude` but not in `core::prelude`. This helps maintain no-std support as even
// developers that are not interested in, or aware of, no-std support and / or that never run
// `cargo build --no-default-features` locally will get errors when they rely on `std::prelude` API.
#[cfg(not(test))]
extern crate std;

#[cfg(bench)]
extern crate test;

// log for logging (optional).
#[cfg(feature = "logging")]
use log;

#[cfg(not(feature = "logging"))]
#[allow(unused_imports)]
pub(crate) mod log {
    macro_rules! ignore_log ( ($($tt:tt)*) => {{}} );
    pub(crate) use ignore_log as trace;
    pub(crate) use ignore_log as debug;
    pub(crate) use ignore_log as info;
    pub(crate) use ignore_log as warn;
    pub(crate) use ignore_log as error;
}

mod engine;
mod error;
mod padding;

/// Byte-slice search helpers.
pub mod bytes;
/// One-shot message digests.
pub mod digest;
/// Hex, base64 and byte-order helpers.
pub mod encoding;
/// Chunked RSA encryption and digest signatures.
pub mod rsa;
/// Block and stream cipher codec with manual padding.
pub mod symmetric;


pub use digest::DigestType;
pub use error::{Error, Result};

/// Routes test logs through `env_logger`; set `RUST_LOG` to see them.
#[cfg(test)]
pub(crate) fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// RNG supported by *mbedtls*
pub mod rng {
    #[cfg(not(any(target_env = "sgx", feature = "rdrand")))]
    use mbedtls::rng::{CtrDrbg, OsEntropy};

    #[cfg(any(target_env = "sgx", feature = "rdrand"))]
    use mbedtls::rng::Rdrand;

    /// Get a RNG supported by *mbedtls*
    #[cfg(not(any(target_env = "sgx", feature = "rdrand")))]
    pub fn rng_new() -> Option<CtrDrbg> {
        let entropy = alloc::sync::Arc::new(OsEntropy::new());
        CtrDrbg::new(entropy, None).ok()
    }

    /// Get a RNG supported by *mbedtls*
    #[cfg(any(target_env = "sgx", feature = "rdrand"))]
    pub const fn rng_new() -> Option<Rdrand> {
        Some(Rdrand)
    }

    /// Fill `bytes` from a fresh RNG.
    pub(crate) fn fill(bytes: &mut [u8]) -> Result<(), crate::Error> {
        use mbedtls::rng::Random;

        rng_new()
            .ok_or(crate::Error::RandomUnavailable)?
            .random(bytes)
            .map_err(|_err| {
                crate::log::error!("Failed to get random bytes, mbedtls error: {:?}", _err);
                crate::Error::RandomUnavailable
            })
    }
}

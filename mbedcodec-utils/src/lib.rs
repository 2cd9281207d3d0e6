//! This crate provides the mbedtls glue used by `mbedcodec`: digest sizes, RSA key helpers and
//! classification of [`mbedtls::Error`] values. Nothing in here knows about padding or chunking.

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
// Enable documentation for all features on docs.rs
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(bench, feature(test))]
#![cfg_attr(not(test), no_std)]

/// Utility code related to [`mbedtls::Error`]
pub mod error;
/// Utility code related to [`mbedtls::hash`] types
pub mod hash;
/// Utility code related to [`mbedtls::pk`] types
pub mod pk;

use mbedtls::pk::{Options, Pk, RsaPadding, Type};

/// Bytes of framing added by PKCS#1 v1.5 encryption padding to every RSA block.
pub const PKCS1_V15_OVERHEAD: usize = 11;

/// Returns `true` if `pk_type` is an RSA key that can be used for PKCS#1 operations.
pub fn is_rsa_type(pk_type: Type) -> bool {
    matches!(pk_type, Type::Rsa | Type::RsaAlt | Type::RsassaPss)
}

/// Size in bytes of one RSA block (the modulus) of `pk`.
pub fn rsa_block_size(pk: &Pk) -> usize {
    pk.len().div_ceil(8)
}

/// Largest plaintext that fits into a single PKCS#1 v1.5 encrypted block of `block_size` bytes.
///
/// Returns `None` when the modulus is too small to carry any data.
pub fn pkcs1_v15_max_chunk(block_size: usize) -> Option<usize> {
    block_size
        .checked_sub(PKCS1_V15_OVERHEAD)
        .filter(|max| *max > 0)
}

/// The [`Options`] selecting PKCS#1 v1.5 padding for both encryption and signatures.
pub fn pkcs1_v15_options() -> Options {
    Options::Rsa { padding: RsaPadding::Pkcs1V15 }
}

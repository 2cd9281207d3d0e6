use mbedtls::hash::Type;

/// Returns the size of the message digest produced by `hash_type`, or `None` for [`Type::None`].
pub fn digest_len(hash_type: Type) -> Option<usize> {
    match hash_type {
        Type::None => None,
        Type::Md2 | Type::Md4 | Type::Md5 => Some(128 / 8),
        Type::Sha1 => Some(160 / 8),
        Type::Sha224 => Some(224 / 8),
        Type::Sha256 => Some(256 / 8),
        Type::Sha384 => Some(384 / 8),
        Type::Sha512 => Some(512 / 8),
        Type::Ripemd => Some(160 / 8), // this is MD_RIPEMD160
    }
}

/// Returns `true` if `len` bytes is exactly one digest of `hash_type`.
pub fn is_digest_len(hash_type: Type, len: usize) -> bool {
    digest_len(hash_type) == Some(len)
}

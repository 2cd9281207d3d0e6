/// Returns `true` if `err` means "the signature does not match the digest".
///
/// Any other error from a verify call points at a broken key or malformed input rather than at a
/// forged or corrupted signature.
pub fn is_signature_mismatch(err: &mbedtls::Error) -> bool {
    matches!(err, mbedtls::Error::RsaVerifyFailed | mbedtls::Error::PkSigLenMismatch)
}

/// Returns `true` if `err` is how mbedtls reports a cipher/mode/key-size combination it does not
/// implement, as opposed to a failure while processing data.
pub fn is_unsupported_cipher(err: &mbedtls::Error) -> bool {
    matches!(
        err,
        mbedtls::Error::CipherFeatureUnavailable | mbedtls::Error::CipherBadInputData
    )
}

/// Returns `true` if `err` comes from parsing key material.
pub fn is_malformed_key(err: &mbedtls::Error) -> bool {
    matches!(
        err,
        mbedtls::Error::PkKeyInvalidFormat | mbedtls::Error::PkInvalidPubkey | mbedtls::Error::PkUnknownPkAlg
    )
}

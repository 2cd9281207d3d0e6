/* Copyright (c) Fortanix, Inc.
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use crate::error::{Error, Result};
use crate::rng;

/// Padding applied to block cipher input before it reaches the primitive.
///
/// The primitive always runs without padding; the codec fills the tail of the last block itself.
/// Input that already fills whole blocks gets no extra block, whatever the scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Padding {
    /// No padding; input must fill whole blocks.
    None,
    /// Every pad byte holds the pad length.
    Pkcs7,
    /// ISO/IEC 7816-4: `0x80` followed by zeros.
    Iso7816,
    /// Zeros.
    Zero,
    /// ANSI X9.23: zeros, last byte holds the pad length.
    AnsiX923,
    /// ISO 10126: random bytes, last byte holds the pad length.
    Iso10126,
}

/// Smallest multiple of `block_size` that holds `len` bytes.
pub(crate) const fn padded_len(len: usize, block_size: usize) -> usize {
    len.div_ceil(block_size) * block_size
}

/// Fills `buf[data_len..]` according to `padding`.
///
/// `buf` is the zeroed scratch buffer of [`padded_len`] bytes with the input already copied into
/// `buf[..data_len]`.
pub(crate) fn apply(buf: &mut [u8], data_len: usize, padding: Padding, block_size: usize) -> Result<()> {
    let tail = &mut buf[data_len..];
    if tail.is_empty() {
        return Ok(());
    }
    // The tail is shorter than one block.
    let pad_len = tail.len() as u8;
    let last = tail.len() - 1;

    match padding {
        Padding::None => return Err(Error::UnpaddedPartialBlock { len: data_len, block_size }),
        Padding::Pkcs7 => tail.fill(pad_len),
        Padding::Iso7816 => {
            tail.fill(0);
            tail[0] = 0x80;
        }
        Padding::Zero => tail.fill(0),
        Padding::AnsiX923 => {
            tail.fill(0);
            tail[last] = pad_len;
        }
        Padding::Iso10126 => {
            rng::fill(tail)?;
            tail[last] = pad_len;
        }
    }
    Ok(())
}

/* Copyright (c) Fortanix, Inc.
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use alloc::string::String;
use alloc::vec::Vec;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

/// Uppercase hex of `bytes`, no delimiter.
pub fn hex_string(bytes: &[u8]) -> String {
    hex::encode_upper(bytes)
}

/// Uppercase hex of `bytes` with `delimiter` between every two digits.
///
/// ```
/// assert_eq!(mbedcodec::encoding::hex_string_with(b"hello", "-"), "68-65-6C-6C-6F");
/// ```
pub fn hex_string_with(bytes: &[u8], delimiter: &str) -> String {
    let mut out = String::with_capacity(bytes.len() * (2 + delimiter.len()));
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push_str(delimiter);
        }
        out.push_str(&hex::encode_upper([*byte]));
    }
    out
}

/// Decodes hex in either case. `None` on odd length or a non-hex digit.
pub fn from_hex(hex: &str) -> Option<Vec<u8>> {
    hex::decode(hex).ok()
}

/// Standard base64 with padding.
pub fn base64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decodes standard base64, `None` if it is malformed.
pub fn base64_decode(encoded: impl AsRef<[u8]>) -> Option<Vec<u8>> {
    STANDARD.decode(encoded).ok()
}

/// Decodes standard base64 that wraps UTF-8 text.
pub fn base64_decode_string(encoded: impl AsRef<[u8]>) -> Option<String> {
    String::from_utf8(base64_decode(encoded)?).ok()
}

/// Byte order of packed integers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Most significant byte first.
    #[default]
    BigEndian,
    /// Least significant byte first.
    LittleEndian,
}

fn bytes_at<const N: usize>(data: &[u8], offset: usize) -> Option<[u8; N]> {
    let end = offset.checked_add(N)?;
    data.get(offset..end)?.try_into().ok()
}

macro_rules! byte_order_int {
    ($int:ty, $read:ident, $write:ident) => {
        #[doc = concat!("Reads a `", stringify!($int), "` at `offset`, `None` if it runs past the end of `data`.")]
        pub fn $read(data: &[u8], offset: usize, order: ByteOrder) -> Option<$int> {
            let bytes = bytes_at(data, offset)?;
            Some(match order {
                ByteOrder::BigEndian => <$int>::from_be_bytes(bytes),
                ByteOrder::LittleEndian => <$int>::from_le_bytes(bytes),
            })
        }

        #[doc = concat!("Packs a `", stringify!($int), "` in `order`.")]
        pub const fn $write(value: $int, order: ByteOrder) -> [u8; core::mem::size_of::<$int>()] {
            match order {
                ByteOrder::BigEndian => value.to_be_bytes(),
                ByteOrder::LittleEndian => value.to_le_bytes(),
            }
        }
    };
}

byte_order_int!(u16, read_u16, u16_bytes);
byte_order_int!(u32, read_u32, u32_bytes);
byte_order_int!(u64, read_u64, u64_bytes);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(hex_string(b"hello"), "68656C6C6F");
        assert_eq!(hex_string_with(b"hello", "-"), "68-65-6C-6C-6F");
        assert_eq!(hex_string_with(b"hello", "---"), "68---65---6C---6C---6F");
        assert_eq!(hex_string_with(b"hello", ""), "68656C6C6F");
        assert_eq!(hex_string_with(b"", "-"), "");
        assert_eq!(hex_string(b""), "");

        assert_eq!(from_hex("68656C6C6F").unwrap(), b"hello");
        assert_eq!(from_hex("68656c6c6f").unwrap(), b"hello");
        assert_eq!(from_hex("686"), None);
        assert_eq!(from_hex("zz"), None);
    }

    #[test]
    fn test_base64() {
        let number = "1234567890";
        let encoded = base64_encode(number.as_bytes());
        assert_eq!(encoded, "MTIzNDU2Nzg5MA==");
        assert_eq!(base64_decode(&encoded).unwrap(), number.as_bytes());
        assert_eq!(base64_decode_string(&encoded).unwrap(), number);
        assert_eq!(base64_decode("not base64!"), None);
        assert_eq!(base64_decode_string(base64_encode(&[0x15, 0xa3, 0xbc, 0xff])), None);
    }

    #[test]
    fn test_read() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0, 0x11];
        assert_eq!(read_u16(&data, 0, ByteOrder::BigEndian), Some(0x1234));
        assert_eq!(read_u16(&data, 0, ByteOrder::LittleEndian), Some(0x3412));
        assert_eq!(read_u16(&data, 7, ByteOrder::default()), Some(0xF011));
        assert_eq!(read_u16(&data, 8, ByteOrder::BigEndian), None);
        assert_eq!(read_u32(&data, 1, ByteOrder::BigEndian), Some(0x3456789A));
        assert_eq!(read_u32(&data, 1, ByteOrder::LittleEndian), Some(0x9A785634));
        assert_eq!(read_u32(&data, 6, ByteOrder::BigEndian), None);
        assert_eq!(read_u64(&data, 0, ByteOrder::BigEndian), Some(0x123456789ABCDEF0));
        assert_eq!(read_u64(&data, 1, ByteOrder::LittleEndian), Some(0x11F0DEBC9A785634));
        assert_eq!(read_u64(&data, 2, ByteOrder::BigEndian), None);
        assert_eq!(read_u64(&data, usize::MAX, ByteOrder::BigEndian), None);
    }

    #[test]
    fn test_pack() {
        assert_eq!(u16_bytes(0x1234, ByteOrder::BigEndian), [0x12, 0x34]);
        assert_eq!(u16_bytes(0x1234, ByteOrder::LittleEndian), [0x34, 0x12]);
        assert_eq!(u32_bytes(0x12345678, ByteOrder::BigEndian), [0x12, 0x34, 0x56, 0x78]);
        assert_eq!(u32_bytes(0x12345678, ByteOrder::LittleEndian), [0x78, 0x56, 0x34, 0x12]);
        let packed = u64_bytes(0x0102030405060708, ByteOrder::LittleEndian);
        assert_eq!(read_u64(&packed, 0, ByteOrder::LittleEndian), Some(0x0102030405060708));
        assert_eq!(packed[0], 0x08);
    }
}

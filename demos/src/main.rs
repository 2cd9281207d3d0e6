/* Copyright (c) Fortanix, Inc.
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
**/

use std::io::{stderr, stdout, Write};

use mbedcodec::encoding::base64_encode;
use mbedcodec::symmetric::{self, Algorithm, Mode, Padding};

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let key = args
        .next()
        .unwrap_or_else(|| "0123456789abcedf".to_owned());
    let text = args
        .next()
        .unwrap_or_else(|| "0123456789".to_owned());

    mbedcodec::self_tests::self_tests(false);
    log::info!("self tests passed");

    let iv = [0u8; 16];
    let cipher = symmetric::encrypt(Algorithm::Aes, Mode::Cbc, Padding::Pkcs7, key.as_bytes(), &iv, text.as_bytes())
        .expect("AES key must be 16, 24 or 32 bytes");
    writeln!(&mut stderr(), "AES-{}-CBC, PKCS#7 padding", key.len() * 8).unwrap();
    writeln!(&mut stdout(), "hex:    {}", hex::encode(&cipher)).unwrap();
    writeln!(&mut stdout(), "base64: {}", base64_encode(&cipher)).unwrap();

    let plain = symmetric::decrypt(Algorithm::Aes, Mode::Cbc, Padding::Pkcs7, key.as_bytes(), &iv, &cipher).unwrap();
    assert_eq!(&plain[..text.len()], text.as_bytes());
    writeln!(&mut stdout(), "plain:  {}", String::from_utf8_lossy(&plain[..text.len()])).unwrap();
}

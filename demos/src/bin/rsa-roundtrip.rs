/* Copyright (c) Fortanix, Inc.
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
**/

//! Generates an RSA key pair, encrypts a message longer than one RSA block and signs its digest.

use std::io::{stdout, Write};

use mbedcodec::digest::{digest, DigestType};
use mbedcodec::encoding::{base64_encode, hex_string};
use mbedcodec::rsa;

fn main() {
    env_logger::init();

    let bits = std::env::args()
        .nth(1)
        .map(|bits| bits.parse().expect("key size must be a number of bits"))
        .unwrap_or(2048);
    let message = "995614A05501D98C52B80BF57DF1837CCF74C019E125FDD4A8245DA9CF6FC6F357BEC04E9DBD7E802E10FF94CB3E6F7DF442B027F0DE07432C701D9F08ADB3A3BEDF71AD325A4FF7F61D7430559806E6F615FF756038BD0868D8BCC5BD41C375831ECE4D489E9EECD66E0952BEA1B9947BE86B20AE985029BA357E0FBDE1CE41";

    let (public_key, private_key) = rsa::generate_key_pair(bits).unwrap();
    let mut out = stdout();
    writeln!(out, "public key: {}", base64_encode(&public_key.to_der().unwrap())).unwrap();

    let cipher = rsa::encrypt(&public_key, message.as_bytes()).unwrap();
    writeln!(
        out,
        "{} byte message -> {} byte ciphertext ({} blocks)",
        message.len(),
        cipher.len(),
        cipher.len() / public_key.block_size()
    )
    .unwrap();
    let plain = rsa::decrypt(&private_key, &cipher).unwrap();
    assert_eq!(plain, message.as_bytes());

    for digest_type in DigestType::ALL {
        let hash = digest(message.as_bytes(), digest_type).unwrap();
        let signature = rsa::sign(&private_key, &hash, digest_type).unwrap();
        let valid = rsa::verify(&public_key, &signature, &hash, digest_type);
        writeln!(out, "{:?} {} valid={}", digest_type, &hex_string(&signature)[..16], valid).unwrap();
    }
}

/* Copyright (c) Fortanix, Inc.
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use crate::error::{Error, Result};
use crate::log::{error, trace, warn};
use crate::symmetric::{Algorithm, Mode, Operation};
use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use mbedtls::cipher::raw::{self, Cipher, CipherId, CipherMode, CipherPadding};
use rc4::{consts::*, KeyInit, Rc4, StreamCipher};
use zeroize::Zeroizing;

/// Builds an RC4 keystream for the key length, which `rc4` takes as a type parameter.
macro_rules! rc4_for_key_len {
    ($key:expr; $($len:literal => $size:ident),+ $(,)?) => {
        match $key.len() {
            $($len => rc4_keystream::<$size>($key),)+
            _ => None,
        }
    };
}

/// A cipher context that is set up once, fed with [`CipherEngine::update`] and closed with
/// [`CipherEngine::finish`].
///
/// DES, 3DES and AES run on the mbedtls cipher layer with its padding switched off. ECB and CBC
/// use the mbedtls modes directly. CFB, CFB8 and OFB drive an ECB encryptor one block at a time,
/// since the mbedtls cipher layer has no DES feedback modes and no CFB8 at all. The mbedtls ARC4
/// cipher only takes 128 bit keys, so RC4 runs on the `rc4` keystream.
pub(crate) enum CipherEngine {
    Block { cipher: Cipher, ecb: bool },
    Feedback { cipher: Cipher, mode: FeedbackMode, register: Zeroizing<Vec<u8>>, decrypt: bool },
    Stream(Box<dyn StreamCipher + Send>),
}

/// Modes that turn the block primitive into a keystream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum FeedbackMode {
    /// Full block cipher feedback.
    Cfb,
    /// Cipher feedback shifting in one byte at a time.
    Cfb8,
    /// Output feedback.
    Ofb,
}

impl CipherEngine {
    /// Looks up the primitive for `algorithm`/`mode` and sets `key` and `iv` on it.
    ///
    /// Only the first block of `iv` is used; ECB and RC4 ignore it.
    pub(crate) fn create(operation: Operation, algorithm: Algorithm, mode: Mode, key: &[u8], iv: &[u8]) -> Result<Self> {
        let cipher_id = match algorithm {
            Algorithm::Aes => CipherId::Aes,
            Algorithm::Des => CipherId::Des,
            Algorithm::TripleDes => CipherId::Des3,
            Algorithm::Rc4 if mode == Mode::Rc4 => return Self::create_rc4(key),
            Algorithm::Rc4 => return Err(Error::ModeNotSupported { algorithm, mode }),
            Algorithm::Cast | Algorithm::Rc2 | Algorithm::Blowfish => return Err(Error::AlgorithmNotSupported(algorithm)),
        };
        let (cipher_mode, feedback) = match mode {
            Mode::Ecb => (CipherMode::ECB, None),
            Mode::Cbc => (CipherMode::CBC, None),
            Mode::Cfb => (CipherMode::ECB, Some(FeedbackMode::Cfb)),
            Mode::Cfb8 => (CipherMode::ECB, Some(FeedbackMode::Cfb8)),
            Mode::Ofb => (CipherMode::ECB, Some(FeedbackMode::Ofb)),
            Mode::Rc4 => return Err(Error::ModeNotSupported { algorithm, mode }),
        };

        // Feedback modes only ever run the primitive forwards.
        let raw_operation = match operation {
            Operation::Decrypt if feedback.is_none() => raw::Operation::Decrypt,
            _ => raw::Operation::Encrypt,
        };
        let ecb = matches!(cipher_mode, CipherMode::ECB);
        let cipher = Self::setup(cipher_id, cipher_mode, raw_operation, key, iv).map_err(|err| {
            if utils::error::is_unsupported_cipher(&err) {
                warn!("{:?} in {:?} mode with a {} byte key is not available: {:?}", algorithm, mode, key.len(), err);
            } else {
                error!("Failed to set up cipher, mbedtls error: {:?}", err);
            }
            Error::PrimitiveCreateFailed(err)
        })?;

        let Some(mode) = feedback else {
            return Ok(Self::Block { cipher, ecb });
        };
        let register = iv.get(..cipher.block_size()).ok_or_else(|| {
            error!("{} byte IV is shorter than one {:?} block", iv.len(), algorithm);
            Error::PrimitiveCreateFailed(mbedtls::Error::CipherBadInputData)
        })?;
        Ok(Self::Feedback {
            cipher,
            mode,
            register: Zeroizing::new(register.to_vec()),
            decrypt: operation == Operation::Decrypt,
        })
    }

    fn setup(
        cipher_id: CipherId,
        cipher_mode: CipherMode,
        operation: raw::Operation,
        key: &[u8],
        iv: &[u8],
    ) -> core::result::Result<Cipher, mbedtls::Error> {
        let key_bit_len = u32::try_from(key.len() * 8).map_err(|_| mbedtls::Error::CipherBadInputData)?;
        let cbc = matches!(cipher_mode, CipherMode::CBC);
        let mut cipher = Cipher::setup(cipher_id, cipher_mode, key_bit_len)?;
        cipher.set_key(operation, key)?;
        if cbc {
            cipher.set_padding(CipherPadding::None)?;
        }
        let iv_size = cipher.iv_size();
        if iv_size > 0 {
            let iv = iv.get(..iv_size).ok_or(mbedtls::Error::CipherBadInputData)?;
            cipher.set_iv(iv)?;
        }
        cipher.reset()?;
        Ok(cipher)
    }

    fn create_rc4(key: &[u8]) -> Result<Self> {
        let keystream = rc4_for_key_len!(key;
            1 => U1, 2 => U2, 3 => U3, 4 => U4, 5 => U5, 6 => U6, 7 => U7, 8 => U8, 9 => U9, 10 => U10,
            11 => U11, 12 => U12, 13 => U13, 14 => U14, 15 => U15, 16 => U16, 17 => U17, 18 => U18, 19 => U19, 20 => U20,
            21 => U21, 22 => U22, 23 => U23, 24 => U24, 25 => U25, 26 => U26, 27 => U27, 28 => U28, 29 => U29, 30 => U30,
            31 => U31, 32 => U32, 33 => U33, 34 => U34, 35 => U35, 36 => U36, 37 => U37, 38 => U38, 39 => U39, 40 => U40,
            41 => U41, 42 => U42, 43 => U43, 44 => U44, 45 => U45, 46 => U46, 47 => U47, 48 => U48, 49 => U49, 50 => U50,
            51 => U51, 52 => U52, 53 => U53, 54 => U54, 55 => U55, 56 => U56, 57 => U57, 58 => U58, 59 => U59, 60 => U60,
            61 => U61, 62 => U62, 63 => U63, 64 => U64, 65 => U65, 66 => U66, 67 => U67, 68 => U68, 69 => U69, 70 => U70,
            71 => U71, 72 => U72, 73 => U73, 74 => U74, 75 => U75, 76 => U76, 77 => U77, 78 => U78, 79 => U79, 80 => U80,
            81 => U81, 82 => U82, 83 => U83, 84 => U84, 85 => U85, 86 => U86, 87 => U87, 88 => U88, 89 => U89, 90 => U90,
            91 => U91, 92 => U92, 93 => U93, 94 => U94, 95 => U95, 96 => U96, 97 => U97, 98 => U98, 99 => U99, 100 => U100,
            101 => U101, 102 => U102, 103 => U103, 104 => U104, 105 => U105, 106 => U106, 107 => U107, 108 => U108, 109 => U109, 110 => U110,
            111 => U111, 112 => U112, 113 => U113, 114 => U114, 115 => U115, 116 => U116, 117 => U117, 118 => U118, 119 => U119, 120 => U120,
            121 => U121, 122 => U122, 123 => U123, 124 => U124, 125 => U125, 126 => U126, 127 => U127, 128 => U128, 129 => U129, 130 => U130,
            131 => U131, 132 => U132, 133 => U133, 134 => U134, 135 => U135, 136 => U136, 137 => U137, 138 => U138, 139 => U139, 140 => U140,
            141 => U141, 142 => U142, 143 => U143, 144 => U144, 145 => U145, 146 => U146, 147 => U147, 148 => U148, 149 => U149, 150 => U150,
            151 => U151, 152 => U152, 153 => U153, 154 => U154, 155 => U155, 156 => U156, 157 => U157, 158 => U158, 159 => U159, 160 => U160,
            161 => U161, 162 => U162, 163 => U163, 164 => U164, 165 => U165, 166 => U166, 167 => U167, 168 => U168, 169 => U169, 170 => U170,
            171 => U171, 172 => U172, 173 => U173, 174 => U174, 175 => U175, 176 => U176, 177 => U177, 178 => U178, 179 => U179, 180 => U180,
            181 => U181, 182 => U182, 183 => U183, 184 => U184, 185 => U185, 186 => U186, 187 => U187, 188 => U188, 189 => U189, 190 => U190,
            191 => U191, 192 => U192, 193 => U193, 194 => U194, 195 => U195, 196 => U196, 197 => U197, 198 => U198, 199 => U199, 200 => U200,
            201 => U201, 202 => U202, 203 => U203, 204 => U204, 205 => U205, 206 => U206, 207 => U207, 208 => U208, 209 => U209, 210 => U210,
            211 => U211, 212 => U212, 213 => U213, 214 => U214, 215 => U215, 216 => U216, 217 => U217, 218 => U218, 219 => U219, 220 => U220,
            221 => U221, 222 => U222, 223 => U223, 224 => U224, 225 => U225, 226 => U226, 227 => U227, 228 => U228, 229 => U229, 230 => U230,
            231 => U231, 232 => U232, 233 => U233, 234 => U234, 235 => U235, 236 => U236, 237 => U237, 238 => U238, 239 => U239, 240 => U240,
            241 => U241, 242 => U242, 243 => U243, 244 => U244, 245 => U245, 246 => U246, 247 => U247, 248 => U248, 249 => U249, 250 => U250,
            251 => U251, 252 => U252, 253 => U253, 254 => U254, 255 => U255,
        );
        keystream.map(Self::Stream).ok_or_else(|| {
            error!("Failed to set up RC4 with a {} byte key", key.len());
            Error::PrimitiveCreateFailed(mbedtls::Error::CipherBadInputData)
        })
    }

    /// Transforms `input`, returning whatever output the primitive produced for it.
    pub(crate) fn update(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Block { cipher, ecb } => {
                let block_size = cipher.block_size();
                let mut out = vec![0u8; input.len() + block_size];
                let mut written = 0;
                // ECB takes exactly one block per call.
                let step = if *ecb { block_size } else { input.len().max(1) };
                for chunk in input.chunks(step) {
                    written += cipher.update(chunk, &mut out[written..]).map_err(|err| {
                        error!("Failed to update cipher, mbedtls error: {:?}", err);
                        Error::PrimitiveUpdateFailed(err)
                    })?;
                }
                trace!("cipher update: {} bytes in, {} bytes out", input.len(), written);
                out.truncate(written);
                Ok(out)
            }
            Self::Feedback { cipher, mode, register, decrypt } => {
                let block_size = register.len();
                let mut out = input.to_vec();
                let mut keystream = Zeroizing::new(vec![0u8; 2 * block_size]);
                match mode {
                    FeedbackMode::Cfb => {
                        for segment in out.chunks_mut(block_size) {
                            encrypt_block(cipher, &register[..], &mut keystream[..])?;
                            if *decrypt {
                                register[..segment.len()].copy_from_slice(segment);
                            }
                            xor(segment, &keystream[..]);
                            if !*decrypt {
                                register[..segment.len()].copy_from_slice(segment);
                            }
                        }
                    }
                    FeedbackMode::Cfb8 => {
                        for byte in out.iter_mut() {
                            encrypt_block(cipher, &register[..], &mut keystream[..])?;
                            let fed_back = if *decrypt { *byte } else { *byte ^ keystream[0] };
                            *byte ^= keystream[0];
                            register.copy_within(1.., 0);
                            register[block_size - 1] = fed_back;
                        }
                    }
                    FeedbackMode::Ofb => {
                        for segment in out.chunks_mut(block_size) {
                            encrypt_block(cipher, &register[..], &mut keystream[..])?;
                            register.copy_from_slice(&keystream[..block_size]);
                            xor(segment, &register[..]);
                        }
                    }
                }
                trace!("{:?} feedback: {} bytes", mode, out.len());
                Ok(out)
            }
            Self::Stream(keystream) => {
                let mut out = input.to_vec();
                keystream.apply_keystream(&mut out);
                Ok(out)
            }
        }
    }

    /// Flushes the primitive. With padding disabled this only fails on a pending partial block.
    pub(crate) fn finish(&mut self) -> Result<Vec<u8>> {
        match self {
            Self::Block { cipher, .. } => {
                let mut out = vec![0u8; cipher.block_size()];
                let len = cipher.finish(&mut out).map_err(|err| {
                    error!("Failed to finalize cipher, mbedtls error: {:?}", err);
                    Error::PrimitiveFinalFailed(err)
                })?;
                out.truncate(len);
                Ok(out)
            }
            Self::Feedback { .. } | Self::Stream(_) => Ok(Vec::new()),
        }
    }
}

/// Runs one `block` through the ECB encryptor into the front of `out`.
fn encrypt_block(cipher: &mut Cipher, block: &[u8], out: &mut [u8]) -> Result<()> {
    let len = cipher.update(block, out).map_err(|err| {
        error!("Failed to encrypt feedback block, mbedtls error: {:?}", err);
        Error::PrimitiveUpdateFailed(err)
    })?;
    if len != block.len() {
        return Err(Error::PrimitiveUpdateFailed(mbedtls::Error::CipherBadInputData));
    }
    Ok(())
}

fn xor(data: &mut [u8], keystream: &[u8]) {
    for (byte, key) in data.iter_mut().zip(keystream) {
        *byte ^= key;
    }
}

fn rc4_keystream<N>(key: &[u8]) -> Option<Box<dyn StreamCipher + Send>>
where
    Rc4<N>: KeyInit + StreamCipher + Send + 'static,
{
    let keystream: Box<dyn StreamCipher + Send> = Box::new(Rc4::<N>::new_from_slice(key).ok()?);
    Some(keystream)
}

/*
 * Copyright (c) 2024-present, arana-db Community.  All rights reserved.
 *
 * Licensed to the Apache Software Foundation (ASF) under one or more
 * contributor license agreements.  See the NOTICE file distributed with
 * this work for additional information regarding copyright ownership.
 * The ASF licenses this file to You under the Apache License, Version 2.0
 * (the "License"); you may not use this file except in compliance with
 * the License.  You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Shared layout of encoded keys.
//!
//! Every encoded key starts with the escaped user key followed by the
//! two-byte delimiter, so all entries of one user key are contiguous and a
//! key can never be a prefix of another key's entries:
//!
//! | escaped user key | 0x00 0x00 | type tag (1B) | suffix |
//!
//! A `0x00` inside the user key is written as `0x00 0x01`.

use bytes::{BufMut, BytesMut};
use snafu::OptionExt;

use crate::error::{InvalidFormatSnafu, Result};

pub const TYPE_LENGTH: usize = 1;

const NEED_TRANSFORM_CHARACTER: u8 = 0x00;
const ENCODED_TRANSFORM_CHARACTER: [u8; 2] = [0x00, 0x01];
const ENCODED_KEY_DELIM: [u8; 2] = [0x00, 0x00];
pub const ENCODED_KEY_DELIM_SIZE: usize = ENCODED_KEY_DELIM.len();

/// Escaped size of `user_key`, delimiter included.
pub fn encoded_user_key_len(user_key: &[u8]) -> usize {
    let zeros = user_key
        .iter()
        .filter(|&&b| b == NEED_TRANSFORM_CHARACTER)
        .count();
    user_key.len() + zeros + ENCODED_KEY_DELIM_SIZE
}

pub fn encode_user_key(user_key: &[u8], dst: &mut BytesMut) {
    let mut start_pos = 0;
    for (i, &byte) in user_key.iter().enumerate() {
        if byte == NEED_TRANSFORM_CHARACTER {
            dst.put_slice(&user_key[start_pos..i]);
            dst.put_slice(&ENCODED_TRANSFORM_CHARACTER);
            start_pos = i + 1;
        }
    }
    dst.put_slice(&user_key[start_pos..]);
    dst.put_slice(&ENCODED_KEY_DELIM);
}

/// Unescapes the user key at the head of `encoded` into `user_key`.
///
/// Returns the number of bytes consumed, delimiter included.
pub fn decode_user_key(encoded: &[u8], user_key: &mut BytesMut) -> Result<usize> {
    let mut pos = 0;
    loop {
        let offset = encoded[pos..]
            .iter()
            .position(|&b| b == NEED_TRANSFORM_CHARACTER)
            .context(InvalidFormatSnafu {
                message: "encoded key delimiter not found",
            })?;
        user_key.put_slice(&encoded[pos..pos + offset]);
        pos += offset;

        let marker = encoded.get(pos + 1).copied().context(InvalidFormatSnafu {
            message: "encoded key ends with a single zero byte",
        })?;
        match marker {
            0x00 => return Ok(pos + ENCODED_KEY_DELIM_SIZE),
            0x01 => {
                user_key.put_u8(NEED_TRANSFORM_CHARACTER);
                pos += ENCODED_TRANSFORM_CHARACTER.len();
            }
            other => {
                return InvalidFormatSnafu {
                    message: format!("invalid escape sequence 0x00 0x{other:02x}"),
                }
                .fail();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_encode_user_key_no_zero() {
        let mut encoded = BytesMut::new();
        encode_user_key(b"testkey", &mut encoded);
        assert_eq!(encoded.as_ref(), b"testkey\x00\x00");
        assert_eq!(encoded.len(), encoded_user_key_len(b"testkey"));
    }

    #[test]
    fn test_encode_user_key_with_zero() {
        let mut encoded = BytesMut::new();
        encode_user_key(b"test\x00key", &mut encoded);
        assert_eq!(encoded.as_ref(), b"test\x00\x01key\x00\x00");
        assert_eq!(encoded.len(), encoded_user_key_len(b"test\x00key"));
    }

    #[test]
    fn test_decode_user_key_reports_consumed_length() {
        let encoded = b"test\x00\x01key\x00\x00\x07member";
        let mut user_key = BytesMut::new();
        let consumed = decode_user_key(encoded, &mut user_key).unwrap();

        assert_eq!(user_key.as_ref(), b"test\x00key");
        assert_eq!(&encoded[consumed..], b"\x07member");
    }

    #[test]
    fn test_decode_empty_user_key() {
        let mut user_key = BytesMut::new();
        assert_eq!(decode_user_key(b"\x00\x00", &mut user_key).unwrap(), 2);
        assert!(user_key.is_empty());
    }

    #[test]
    fn test_decode_only_zero_user_key() {
        let mut user_key = BytesMut::new();
        assert_eq!(decode_user_key(b"\x00\x01\x00\x00", &mut user_key).unwrap(), 4);
        assert_eq!(user_key.as_ref(), b"\x00");
    }

    #[test]
    fn test_decode_user_key_invalid_format() {
        for encoded in [
            &b""[..],
            b"\x00",
            b"testkey",
            b"testkey\x00",
            b"test\x00\x02key\x00\x00",
        ] {
            let mut user_key = BytesMut::new();
            let err = decode_user_key(encoded, &mut user_key).unwrap_err();
            assert!(matches!(err, Error::InvalidFormat { .. }), "{encoded:?}");
        }
    }
}

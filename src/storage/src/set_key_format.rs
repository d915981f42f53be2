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

//! Physical keys of a set.
//!
//! Meta key:    | escaped key | 0x00 0x00 | 0x06 |
//! Element key: | escaped key | 0x00 0x00 | 0x07 | member |
//!
//! All element keys of one set are contiguous and sorted by member bytes.
//! The element key of an empty member is the smallest key of that range and
//! is used as the seek target when enumerating a set.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Error, InvalidFormatSnafu, Result};
use crate::storage_define::{decode_user_key, encode_user_key, encoded_user_key_len, TYPE_LENGTH};

/// Type tag written right after the key delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeyType {
    String = 0x01,
    HashMeta = 0x02,
    HashField = 0x03,
    ListMeta = 0x04,
    ListElement = 0x05,
    SetMeta = 0x06,
    SetElement = 0x07,
    ZSetMeta = 0x08,
    ZSetElement = 0x09,
    ZSetScore = 0x0a,
}

impl TryFrom<u8> for KeyType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(KeyType::String),
            0x02 => Ok(KeyType::HashMeta),
            0x03 => Ok(KeyType::HashField),
            0x04 => Ok(KeyType::ListMeta),
            0x05 => Ok(KeyType::ListElement),
            0x06 => Ok(KeyType::SetMeta),
            0x07 => Ok(KeyType::SetElement),
            0x08 => Ok(KeyType::ZSetMeta),
            0x09 => Ok(KeyType::ZSetElement),
            0x0a => Ok(KeyType::ZSetScore),
            _ => InvalidFormatSnafu {
                message: format!("invalid key type: {value:#04x}"),
            }
            .fail(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SetMetaKey<'a> {
    key: &'a [u8],
}

impl<'a> SetMetaKey<'a> {
    pub fn new(key: &'a [u8]) -> Self {
        Self { key }
    }

    pub fn encode(&self) -> BytesMut {
        let mut dst = BytesMut::with_capacity(encoded_user_key_len(self.key) + TYPE_LENGTH);
        encode_user_key(self.key, &mut dst);
        dst.put_u8(KeyType::SetMeta as u8);
        dst
    }
}

#[derive(Debug, Clone)]
pub struct SetMemberKey<'a> {
    key: &'a [u8],
    member: &'a [u8],
}

impl<'a> SetMemberKey<'a> {
    pub fn new(key: &'a [u8], member: &'a [u8]) -> Self {
        Self { key, member }
    }

    /// Seek target of the member range of `key`.
    pub fn prefix(key: &'a [u8]) -> Self {
        Self::new(key, &[])
    }

    pub fn encode(&self) -> BytesMut {
        let mut dst = BytesMut::with_capacity(
            encoded_user_key_len(self.key) + TYPE_LENGTH + self.member.len(),
        );
        encode_user_key(self.key, &mut dst);
        dst.put_u8(KeyType::SetElement as u8);
        dst.put_slice(self.member);
        dst
    }
}

/// A physical key decoded back into its logical shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedKey {
    SetMeta { key: Bytes },
    SetElement { key: Bytes, member: Bytes },
    Other { key: Bytes, key_type: KeyType },
}

impl DecodedKey {
    /// Returns `None` for anything that is not a well formed key.
    ///
    /// Range walks rely on this: the first key that does not decode as an
    /// element of the walked set ends the walk.
    pub fn decode(raw: &[u8]) -> Option<Self> {
        let mut user_key = BytesMut::new();
        let consumed = decode_user_key(raw, &mut user_key).ok()?;
        let (&tag, suffix) = raw[consumed..].split_first()?;
        let key_type = KeyType::try_from(tag).ok()?;
        let key = user_key.freeze();

        match key_type {
            KeyType::SetMeta => suffix.is_empty().then_some(DecodedKey::SetMeta { key }),
            KeyType::SetElement => Some(DecodedKey::SetElement {
                key,
                member: Bytes::copy_from_slice(suffix),
            }),
            key_type => Some(DecodedKey::Other { key, key_type }),
        }
    }

    pub fn key(&self) -> &[u8] {
        match self {
            DecodedKey::SetMeta { key }
            | DecodedKey::SetElement { key, .. }
            | DecodedKey::Other { key, .. } => key,
        }
    }

    pub fn key_type(&self) -> KeyType {
        match self {
            DecodedKey::SetMeta { .. } => KeyType::SetMeta,
            DecodedKey::SetElement { .. } => KeyType::SetElement,
            DecodedKey::Other { key_type, .. } => *key_type,
        }
    }
}

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

//! Tagged value encoding shared by every stored value.
//!
//! | value type (1B) | payload |
//!
//! Integer and Double payloads are 8 bytes little endian, Raw carries its
//! bytes verbatim and Empty has no payload.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use snafu::{ensure, OptionExt};

use crate::error::{Error, InvalidFormatSnafu, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ValueType {
    Empty = 0,
    Integer = 1,
    Double = 2,
    Raw = 3,
}

impl TryFrom<u8> for ValueType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(ValueType::Empty),
            1 => Ok(ValueType::Integer),
            2 => Ok(ValueType::Double),
            3 => Ok(ValueType::Raw),
            _ => InvalidFormatSnafu {
                message: format!("invalid value type: {value}"),
            }
            .fail(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Empty,
    Integer(i64),
    Double(f64),
    Raw(Bytes),
}

impl StoredValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            StoredValue::Empty => ValueType::Empty,
            StoredValue::Integer(_) => ValueType::Integer,
            StoredValue::Double(_) => ValueType::Double,
            StoredValue::Raw(_) => ValueType::Raw,
        }
    }

    pub fn encode(&self) -> BytesMut {
        let mut dst = BytesMut::with_capacity(1 + self.payload_len());
        dst.put_u8(self.value_type() as u8);
        match self {
            StoredValue::Empty => {}
            StoredValue::Integer(v) => dst.put_i64_le(*v),
            StoredValue::Double(v) => dst.put_f64_le(*v),
            StoredValue::Raw(raw) => dst.put_slice(raw),
        }
        dst
    }

    pub fn decode(raw: &[u8]) -> Result<Self> {
        let (&tag, mut payload) = raw.split_first().context(InvalidFormatSnafu {
            message: "empty value",
        })?;

        let value = match ValueType::try_from(tag)? {
            ValueType::Empty => {
                ensure!(
                    payload.is_empty(),
                    InvalidFormatSnafu {
                        message: "empty value carries a payload",
                    }
                );
                StoredValue::Empty
            }
            ValueType::Integer => {
                ensure!(
                    payload.len() == 8,
                    InvalidFormatSnafu {
                        message: format!("integer payload of {} bytes", payload.len()),
                    }
                );
                StoredValue::Integer(payload.get_i64_le())
            }
            ValueType::Double => {
                ensure!(
                    payload.len() == 8,
                    InvalidFormatSnafu {
                        message: format!("double payload of {} bytes", payload.len()),
                    }
                );
                StoredValue::Double(payload.get_f64_le())
            }
            ValueType::Raw => StoredValue::Raw(Bytes::copy_from_slice(payload)),
        };
        Ok(value)
    }

    fn payload_len(&self) -> usize {
        match self {
            StoredValue::Empty => 0,
            StoredValue::Integer(_) | StoredValue::Double(_) => 8,
            StoredValue::Raw(raw) => raw.len(),
        }
    }
}

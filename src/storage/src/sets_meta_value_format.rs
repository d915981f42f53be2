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

//! Set meta value: the cardinality of a set.
//!
//! The meta value is a [`StoredValue::Raw`] holding the count as a varint.
//! Any other shape means the key holds something that is not a set.

use bytes::BytesMut;

use crate::base_value_format::StoredValue;
use crate::coding::{get_varint64, put_varint64, MAX_VARINT64_LENGTH};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetsMetaValue {
    count: u64,
}

impl SetsMetaValue {
    pub fn new(count: u64) -> Self {
        Self { count }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Adjusts the count by `delta`, saturating at zero and `u64::MAX`.
    pub fn modify_count(&mut self, delta: i64) {
        self.count = if delta >= 0 {
            self.count.saturating_add(delta.unsigned_abs())
        } else {
            self.count.saturating_sub(delta.unsigned_abs())
        };
    }

    pub fn encode(&self) -> StoredValue {
        let mut buf = BytesMut::with_capacity(MAX_VARINT64_LENGTH);
        put_varint64(&mut buf, self.count);
        StoredValue::Raw(buf.freeze())
    }

    pub fn decode(value: &StoredValue) -> Option<Self> {
        match value {
            StoredValue::Raw(raw) => {
                let (count, read) = get_varint64(raw)?;
                (read == raw.len()).then_some(Self { count })
            }
            _ => None,
        }
    }
}

/// Decodes a set meta value straight from the bytes stored under a meta key.
pub struct ParsedSetsMetaValue;

impl ParsedSetsMetaValue {
    pub fn new(raw: &[u8]) -> Option<SetsMetaValue> {
        let value = StoredValue::decode(raw).ok()?;
        SetsMetaValue::decode(&value)
    }
}

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

use serde::{de, Deserialize, Deserializer};
use snafu::{OptionExt, ResultExt};

use crate::config::EngineKind;
use crate::error::{
    InvalidFormatSnafu, InvalidNumberSnafu, MemoryParseError, OutOfRangeSnafu, UnknownUnitSnafu,
};

pub fn deserialize_bool_from_yes_no<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    match s.trim().to_lowercase().as_str() {
        "yes" | "true" | "1" | "on" => Ok(true),
        "no" | "false" | "0" | "off" => Ok(false),
        _ => Err(de::Error::custom(
            "expected one of: yes, no, true, false, 1, 0, on, off",
        )),
    }
}

pub fn deserialize_memory<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    parse_memory(&s).map_err(de::Error::custom)
}

pub fn deserialize_engine_kind<'de, D>(deserializer: D) -> Result<EngineKind, D::Error>
where
    D: Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    match s.trim().to_lowercase().as_str() {
        "rocksdb" => Ok(EngineKind::RocksDB),
        "memory" => Ok(EngineKind::Memory),
        other => Err(de::Error::custom(format!(
            "unknown engine '{other}', expected rocksdb or memory"
        ))),
    }
}

/// Parses sizes such as `4096`, `64kb`, `64M` or `1,024 MB` into bytes.
pub fn parse_memory(input: &str) -> Result<u64, MemoryParseError> {
    let cleaned = input.trim().replace(',', "").to_uppercase();
    let split = cleaned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(cleaned.len());
    let (num_str, unit_str) = cleaned.split_at(split);

    if num_str.is_empty() {
        return InvalidFormatSnafu { raw: input }.fail();
    }
    let num: u64 = num_str.parse().context(InvalidNumberSnafu)?;

    let multiplier: u64 = match unit_str.trim() {
        "" | "B" => 1,
        "K" | "KB" => 1 << 10,
        "M" | "MB" => 1 << 20,
        "G" | "GB" => 1 << 30,
        unit => return UnknownUnitSnafu { unit }.fail(),
    };

    num.checked_mul(multiplier)
        .context(OutOfRangeSnafu { raw: input })
}

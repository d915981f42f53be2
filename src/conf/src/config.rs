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

use std::path::Path;

use serde::Deserialize;
use snafu::ResultExt;
use validator::Validate;

use crate::de_func::{deserialize_bool_from_yes_no, deserialize_engine_kind, deserialize_memory};
use crate::error::{ConfigFileSnafu, Error, InvalidConfigSnafu, ValidConfigFailSnafu};

const DEFAULT_DB_PATH: &str = "./db";
const DEFAULT_DATABASES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    RocksDB,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "db-path")]
    pub db_path: String,

    #[validate(range(min = 1, max = 64))]
    pub databases: usize,

    #[serde(deserialize_with = "deserialize_engine_kind")]
    pub engine: EngineKind,

    #[serde(
        rename = "sync-write",
        deserialize_with = "deserialize_bool_from_yes_no"
    )]
    pub sync_write: bool,

    #[serde(
        rename = "disable-wal",
        deserialize_with = "deserialize_bool_from_yes_no"
    )]
    pub disable_wal: bool,

    #[serde(
        rename = "create-if-missing",
        deserialize_with = "deserialize_bool_from_yes_no"
    )]
    pub create_if_missing: bool,

    #[serde(
        rename = "rocksdb-write-buffer-size",
        deserialize_with = "deserialize_memory"
    )]
    #[validate(range(min = 4096))]
    pub rocksdb_write_buffer_size: u64,

    #[serde(rename = "rocksdb-max-open-files")]
    #[validate(range(min = -1))]
    pub rocksdb_max_open_files: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            databases: DEFAULT_DATABASES,
            engine: EngineKind::RocksDB,
            sync_write: false,
            disable_wal: false,
            create_if_missing: true,
            rocksdb_write_buffer_size: 64 << 20, // 64MB
            rocksdb_max_open_files: -1,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).context(ConfigFileSnafu { path })?;
        Self::parse(&content)
    }

    /// Parses and validates INI text. Missing keys keep their defaults.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let config: Config = serde_ini::from_str(content).context(InvalidConfigSnafu)?;
        config.validate().context(ValidConfigFailSnafu)?;
        Ok(config)
    }
}

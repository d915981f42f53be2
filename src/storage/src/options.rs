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

use std::path::{Path, PathBuf};

use conf::{Config, EngineKind};
use engine::{EngineOptions, WriteOptions};
use snafu::ResultExt;

use crate::error::{ConfigSnafu, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineType {
    RocksDB,
    Memory,
}

impl From<EngineKind> for EngineType {
    fn from(kind: EngineKind) -> Self {
        match kind {
            EngineKind::RocksDB => EngineType::RocksDB,
            EngineKind::Memory => EngineType::Memory,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageOptions {
    pub db_path: PathBuf,
    pub databases: usize,
    pub engine_type: EngineType,
    pub engine_options: EngineOptions,
}

impl Default for StorageOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl StorageOptions {
    /// Transient in-memory databases.
    pub fn memory(databases: usize) -> Self {
        Self {
            databases,
            engine_type: EngineType::Memory,
            ..Self::default()
        }
    }

    /// RocksDB databases stored under `db_path/<id>`.
    pub fn rocksdb<P: AsRef<Path>>(db_path: P, databases: usize) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
            databases,
            engine_type: EngineType::RocksDB,
            ..Self::default()
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::load(path).context(ConfigSnafu)?;
        Ok(Self::from_config(&config))
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            db_path: PathBuf::from(&config.db_path),
            databases: config.databases,
            engine_type: config.engine.into(),
            engine_options: EngineOptions {
                create_if_missing: config.create_if_missing,
                write_buffer_size: usize::try_from(config.rocksdb_write_buffer_size)
                    .unwrap_or(usize::MAX),
                max_open_files: config.rocksdb_max_open_files,
                write_options: WriteOptions {
                    sync: config.sync_write,
                    disable_wal: config.disable_wal,
                },
            },
        }
    }

    pub fn db_path_of(&self, index: usize) -> PathBuf {
        self.db_path.join(index.to_string())
    }
}

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

use std::sync::Arc;

use engine::{Engine, MemoryEngine, RocksDBEngine};
use log::info;
use snafu::ResultExt;

use crate::batch::{Batch, EngineBatch};
use crate::error::{EngineSnafu, InvalidTypeSnafu, Result};
use crate::options::{EngineType, StorageOptions};
use crate::set_key_format::{SetMemberKey, SetMetaKey};
use crate::sets_meta_value_format::{ParsedSetsMetaValue, SetsMetaValue};

pub type DbId = usize;

/// One logical database.
///
/// Holds no state besides its engine handle; every set lives in the engine.
pub struct Redis {
    index: DbId,
    db: Arc<dyn Engine>,
}

impl Redis {
    pub fn new(index: DbId, db: Arc<dyn Engine>) -> Self {
        Self { index, db }
    }

    pub fn open(index: DbId, options: &StorageOptions) -> Result<Self> {
        let db: Arc<dyn Engine> = match options.engine_type {
            EngineType::RocksDB => Arc::new(
                RocksDBEngine::open(options.db_path_of(index), &options.engine_options)
                    .context(EngineSnafu)?,
            ),
            EngineType::Memory => Arc::new(MemoryEngine::new()),
        };
        info!("database {index} opened with {:?} engine", options.engine_type);
        Ok(Self::new(index, db))
    }

    pub fn index(&self) -> DbId {
        self.index
    }

    pub fn engine(&self) -> &dyn Engine {
        self.db.as_ref()
    }

    pub fn create_batch(&self) -> Box<dyn Batch + '_> {
        Box::new(EngineBatch::new(self.db.as_ref()))
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush().context(EngineSnafu)
    }

    /// Reads the meta entry of `key`.
    ///
    /// `Ok(None)` means no such set. A meta entry that does not decode as set
    /// meta is reported as [`crate::Error::InvalidType`].
    pub(crate) fn get_sets_meta(&self, key: &[u8]) -> Result<Option<SetsMetaValue>> {
        let meta_key = SetMetaKey::new(key).encode();
        let Some(raw) = self.db.get(&meta_key).context(EngineSnafu)? else {
            return Ok(None);
        };
        match ParsedSetsMetaValue::new(&raw) {
            Some(meta) => Ok(Some(meta)),
            None => InvalidTypeSnafu {
                key: String::from_utf8_lossy(key),
            }
            .fail(),
        }
    }

    pub(crate) fn member_exists(&self, key: &[u8], member: &[u8]) -> Result<bool> {
        let member_key = SetMemberKey::new(key, member).encode();
        Ok(self.db.get(&member_key).context(EngineSnafu)?.is_some())
    }
}

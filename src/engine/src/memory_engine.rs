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

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use snafu::ensure;

use crate::error::{ReadOnlySnafu, Result};
use crate::traits::{Engine, EngineIterator};
use crate::types::{BatchOp, WriteBatch};

type Table = BTreeMap<Vec<u8>, Vec<u8>>;

/// In-memory ordered engine.
///
/// A read-only engine rejects every write with [`crate::Error::ReadOnly`],
/// which makes it useful for exercising write failure paths.
#[derive(Default)]
pub struct MemoryEngine {
    data: RwLock<Table>,
    read_only: AtomicBool,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::Release);
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    fn check_writable(&self) -> Result<()> {
        ensure!(!self.read_only.load(Ordering::Acquire), ReadOnlySnafu);
        Ok(())
    }
}

impl Engine for MemoryEngine {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.check_writable()?;
        self.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        self.check_writable()?;
        self.data.write().remove(key);
        Ok(())
    }

    fn write(&self, batch: WriteBatch) -> Result<()> {
        self.check_writable()?;
        let mut data = self.data.write();
        for op in batch.into_ops() {
            match op {
                BatchOp::Put { key, value } => {
                    data.insert(key, value);
                }
                BatchOp::Delete { key } => {
                    data.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn seek(&self, start: &[u8]) -> Box<dyn EngineIterator + '_> {
        let current = first_entry(&self.data, Bound::Included(start));
        Box::new(MemoryIterator {
            data: &self.data,
            current,
        })
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}

fn first_entry(data: &RwLock<Table>, lower: Bound<&[u8]>) -> Option<(Vec<u8>, Vec<u8>)> {
    data.read()
        .range::<[u8], _>((lower, Bound::Unbounded))
        .next()
        .map(|(k, v)| (k.clone(), v.clone()))
}

/// Cursor that re-resolves its successor on every step, so it never holds
/// the table lock between calls.
struct MemoryIterator<'a> {
    data: &'a RwLock<Table>,
    current: Option<(Vec<u8>, Vec<u8>)>,
}

impl EngineIterator for MemoryIterator<'_> {
    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn key(&self) -> Option<&[u8]> {
        self.current.as_ref().map(|(k, _)| k.as_slice())
    }

    fn value(&self) -> Option<&[u8]> {
        self.current.as_ref().map(|(_, v)| v.as_slice())
    }

    fn next(&mut self) {
        if let Some((key, _)) = self.current.take() {
            self.current = first_entry(self.data, Bound::Excluded(key.as_slice()));
        }
    }

    fn status(&self) -> Result<()> {
        Ok(())
    }
}

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

//! Routes set commands to one of several logical databases.

use std::sync::Arc;

use bytes::Bytes;
use log::info;
use snafu::OptionExt;

use crate::error::{InvalidArgumentSnafu, Result};
use crate::options::StorageOptions;
use crate::redis::{DbId, Redis};

pub struct Storage {
    insts: Vec<Arc<Redis>>,
    options: Arc<StorageOptions>,
}

impl Storage {
    /// Opens databases `0..options.databases`.
    pub fn open(options: Arc<StorageOptions>) -> Result<Self> {
        let insts = (0..options.databases)
            .map(|index| Redis::open(index, &options).map(Arc::new))
            .collect::<Result<Vec<_>>>()?;
        info!(
            "storage opened with {} databases at {}",
            insts.len(),
            options.db_path.display()
        );
        Ok(Self { insts, options })
    }

    pub fn options(&self) -> &StorageOptions {
        &self.options
    }

    pub fn databases(&self) -> usize {
        self.insts.len()
    }

    /// Handle of database `db`.
    pub fn db(&self, db: DbId) -> Result<Arc<Redis>> {
        self.inst(db).cloned()
    }

    pub fn flush(&self) -> Result<()> {
        self.insts.iter().try_for_each(|inst| inst.flush())
    }

    fn inst(&self, db: DbId) -> Result<&Arc<Redis>> {
        self.insts.get(db).context(InvalidArgumentSnafu {
            message: format!("db index {db} out of range 0..{}", self.insts.len()),
        })
    }

    pub fn sadd(&self, db: DbId, key: &[u8], member: &[u8]) -> Result<i32> {
        self.inst(db)?.sadd(key, member)
    }

    pub fn sadd_members(&self, db: DbId, key: &[u8], members: &[&[u8]]) -> Result<i32> {
        self.inst(db)?.sadd_members(key, members)
    }

    pub fn srem(&self, db: DbId, key: &[u8], member: &[u8]) -> Result<i32> {
        self.inst(db)?.srem(key, member)
    }

    pub fn srem_members(&self, db: DbId, key: &[u8], members: &[&[u8]]) -> Result<i32> {
        self.inst(db)?.srem_members(key, members)
    }

    pub fn scard(&self, db: DbId, key: &[u8]) -> Result<u64> {
        self.inst(db)?.scard(key)
    }

    pub fn sismember(&self, db: DbId, key: &[u8], member: &[u8]) -> Result<bool> {
        self.inst(db)?.sismember(key, member)
    }

    pub fn smembers(&self, db: DbId, key: &[u8]) -> Result<Vec<Bytes>> {
        self.inst(db)?.smembers(key)
    }

    pub fn sclear(&self, db: DbId, key: &[u8]) -> Result<()> {
        self.inst(db)?.sclear(key)
    }

    pub fn sunion(&self, db: DbId, keys: &[&[u8]]) -> Result<Vec<Bytes>> {
        self.inst(db)?.sunion(keys)
    }

    pub fn sinter(&self, db: DbId, keys: &[&[u8]]) -> Result<Vec<Bytes>> {
        self.inst(db)?.sinter(keys)
    }

    pub fn sdiff(&self, db: DbId, keys: &[&[u8]]) -> Result<Vec<Bytes>> {
        self.inst(db)?.sdiff(keys)
    }

    pub fn sunionstore(&self, db: DbId, destination: &[u8], keys: &[&[u8]]) -> Result<u64> {
        self.inst(db)?.sunionstore(destination, keys)
    }

    pub fn sinterstore(&self, db: DbId, destination: &[u8], keys: &[&[u8]]) -> Result<u64> {
        self.inst(db)?.sinterstore(destination, keys)
    }

    pub fn sdiffstore(&self, db: DbId, destination: &[u8], keys: &[&[u8]]) -> Result<u64> {
        self.inst(db)?.sdiffstore(destination, keys)
    }

    pub fn smove(
        &self,
        db: DbId,
        source: &[u8],
        destination: &[u8],
        member: &[u8],
    ) -> Result<i32> {
        self.inst(db)?.smove(source, destination, member)
    }

    pub fn spop(&self, db: DbId, key: &[u8]) -> Result<Option<Bytes>> {
        self.inst(db)?.spop(key)
    }

    pub fn spop_count(&self, db: DbId, key: &[u8], count: usize) -> Result<Vec<Bytes>> {
        self.inst(db)?.spop_count(key, count)
    }

    pub fn srandmember(&self, db: DbId, key: &[u8], count: i64) -> Result<Vec<Bytes>> {
        self.inst(db)?.srandmember(key, count)
    }

    pub fn sscan(
        &self,
        db: DbId,
        key: &[u8],
        cursor: u64,
        pattern: Option<&[u8]>,
        count: Option<usize>,
    ) -> Result<(u64, Vec<Bytes>)> {
        self.inst(db)?.sscan(key, cursor, pattern, count)
    }
}

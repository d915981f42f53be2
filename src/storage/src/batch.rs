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

//! Atomic write groups.
//!
//! Every composite mutation of a set goes through one [`Batch`]: the writes
//! are buffered and handed to the engine in a single atomic write on
//! [`Batch::commit`]. A batch dropped without commit is discarded.
//!
//! ```ignore
//! let mut batch = redis.create_batch();
//! batch.put(&member_key, &value);
//! batch.delete(&meta_key);
//! batch.commit()?;
//! ```

use engine::{Engine, WriteBatch};
use log::debug;
use snafu::ResultExt;

use crate::error::{EngineSnafu, Result};

pub trait Batch {
    fn put(&mut self, key: &[u8], value: &[u8]);

    fn delete(&mut self, key: &[u8]);

    /// Applies every buffered operation atomically.
    fn commit(self: Box<Self>) -> Result<()>;

    fn count(&self) -> usize;

    fn clear(&mut self);
}

/// Batch committed straight to a local [`Engine`].
pub struct EngineBatch<'a> {
    inner: WriteBatch,
    db: &'a dyn Engine,
}

impl<'a> EngineBatch<'a> {
    pub fn new(db: &'a dyn Engine) -> Self {
        Self {
            inner: WriteBatch::new(),
            db,
        }
    }
}

impl Batch for EngineBatch<'_> {
    fn put(&mut self, key: &[u8], value: &[u8]) {
        self.inner.put(key, value);
    }

    fn delete(&mut self, key: &[u8]) {
        self.inner.delete(key);
    }

    fn commit(mut self: Box<Self>) -> Result<()> {
        let batch = std::mem::take(&mut self.inner);
        if batch.is_empty() {
            return Ok(());
        }
        let count = batch.count();
        self.db.write(batch).context(EngineSnafu)?;
        debug!("committed batch with {count} operations");
        Ok(())
    }

    fn count(&self) -> usize {
        self.inner.count()
    }

    fn clear(&mut self) {
        self.inner.clear();
    }
}

impl Drop for EngineBatch<'_> {
    fn drop(&mut self) {
        if !self.inner.is_empty() {
            debug!(
                "discarding uncommitted batch with {} operations",
                self.inner.count()
            );
        }
    }
}

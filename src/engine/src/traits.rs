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

use crate::error::Result;
use crate::types::WriteBatch;

/// Ordered key-value store shared by every database instance.
pub trait Engine: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;

    fn delete(&self, key: &[u8]) -> Result<()>;

    /// Applies every operation of `batch` or none of them.
    fn write(&self, batch: WriteBatch) -> Result<()>;

    /// Positions a forward cursor at the first key greater than or equal to `start`.
    fn seek(&self, start: &[u8]) -> Box<dyn EngineIterator + '_>;

    fn flush(&self) -> Result<()>;
}

/// Forward cursor over an [`Engine`].
///
/// The cursor is released when it is dropped.
pub trait EngineIterator {
    fn valid(&self) -> bool;

    fn key(&self) -> Option<&[u8]>;

    fn value(&self) -> Option<&[u8]>;

    fn next(&mut self);

    /// Reports an I/O failure that ended the iteration early.
    fn status(&self) -> Result<()>;
}

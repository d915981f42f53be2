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

//! Storage engine abstraction used by the data type layer.
//!
//! An [`Engine`] is an ordered byte-key store with point reads, point writes,
//! forward cursors and atomic multi-key batches. Two backends are provided:
//! [`RocksDBEngine`] for persistent data and [`MemoryEngine`] for tests and
//! ephemeral databases.

pub mod error;
pub mod memory_engine;
pub mod rocksdb_engine;
pub mod traits;
pub mod types;

pub use error::{Error, Result};
pub use memory_engine::MemoryEngine;
pub use rocksdb_engine::RocksDBEngine;
pub use traits::{Engine, EngineIterator};
pub use types::{BatchOp, EngineOptions, WriteBatch, WriteOptions};

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

//! Set data type on top of an ordered key-value engine.

pub mod base_value_format;
pub mod batch;
mod coding;
pub mod error;
pub mod options;
mod redis;
mod redis_sets;
pub mod set_key_format;
pub mod sets_meta_value_format;
pub mod storage;
mod storage_define;
mod util;

pub use base_value_format::{StoredValue, ValueType};
pub use error::{Error, Result};
pub use options::{EngineType, StorageOptions};
pub use redis::{DbId, Redis};
pub use redis_sets::{SetMembersIter, MAX_RANDOM_SAMPLE};
pub use set_key_format::{DecodedKey, KeyType, SetMemberKey, SetMetaKey};
pub use sets_meta_value_format::{ParsedSetsMetaValue, SetsMetaValue};
pub use storage::Storage;
pub use util::glob_match;

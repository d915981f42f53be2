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

//! Redis-style sets stored in an ordered key-value engine.
//!
//! ```ignore
//! let options = Arc::new(StorageOptions::memory(1));
//! let storage = Storage::open(options)?;
//! storage.sadd(0, b"fruits", b"apple")?;
//! assert_eq!(storage.scard(0, b"fruits")?, 1);
//! ```

pub use conf;
pub use engine;
pub use storage;

pub use storage::{Error, Result, Storage, StorageOptions};

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

use std::num::ParseIntError;
use std::path::PathBuf;

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("failed to read config file {}: {}", path.display(), source))]
    ConfigFile {
        source: std::io::Error,
        path: PathBuf,
    },

    #[snafu(display("invalid config: {}", source))]
    InvalidConfig { source: serde_ini::de::Error },

    #[snafu(display("config validation failed: {}", source))]
    ValidConfigFail { source: validator::ValidationErrors },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MemoryParseError {
    #[snafu(display("invalid memory size '{}'", raw))]
    InvalidFormat { raw: String },

    #[snafu(display("invalid number in memory size: {}", source))]
    InvalidNumber { source: ParseIntError },

    #[snafu(display("unknown memory unit '{}'", unit))]
    UnknownUnit { unit: String },

    #[snafu(display("memory size '{}' is out of range", raw))]
    OutOfRange { raw: String },
}

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

use snafu::{Location, Snafu};

/// Generic failure code.
pub const ERR_GENERIC: i32 = -1;
pub const ERR_INVALID_ARGS: i32 = -3;
pub const ERR_NOT_EXIST: i32 = -4;
pub const ERR_INVALID_TYPE: i32 = -5;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("engine error: {}", source))]
    Engine {
        source: engine::Error,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("WRONGTYPE key {} holds the wrong kind of value", key))]
    InvalidType {
        key: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("key not found: {}", key))]
    KeyNotFound {
        key: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("invalid argument: {}", message))]
    InvalidArgument {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("invalid format: {}", message))]
    InvalidFormat {
        message: String,
        #[snafu(implicit)]
        location: Location,
    },

    #[snafu(display("config error: {}", source))]
    Config {
        source: conf::error::Error,
        #[snafu(implicit)]
        location: Location,
    },
}

impl Error {
    /// Numeric status code reported to callers that speak the legacy protocol.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidArgument { .. } => ERR_INVALID_ARGS,
            Error::KeyNotFound { .. } => ERR_NOT_EXIST,
            Error::InvalidType { .. } => ERR_INVALID_TYPE,
            Error::Engine { .. } | Error::InvalidFormat { .. } | Error::Config { .. } => {
                ERR_GENERIC
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

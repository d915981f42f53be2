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

use std::path::{Path, PathBuf};

use log::info;
use rocksdb::{DBRawIteratorWithThreadMode, Options, DB};
use snafu::ResultExt;

use crate::error::{IoSnafu, Result, RocksDBSnafu};
use crate::traits::{Engine, EngineIterator};
use crate::types::{BatchOp, EngineOptions, WriteBatch, WriteOptions};

pub struct RocksDBEngine {
    db: DB,
    path: PathBuf,
    write_options: WriteOptions,
}

impl RocksDBEngine {
    pub fn open<P: AsRef<Path>>(path: P, options: &EngineOptions) -> Result<Self> {
        let path = path.as_ref();
        if options.create_if_missing {
            std::fs::create_dir_all(path).context(IoSnafu)?;
        }

        let mut opts = Options::default();
        opts.create_if_missing(options.create_if_missing);
        opts.set_write_buffer_size(options.write_buffer_size);
        opts.set_max_open_files(options.max_open_files);

        let db = DB::open(&opts, path).context(RocksDBSnafu)?;
        info!("rocksdb opened at {}", path.display());

        Ok(Self {
            db,
            path: path.to_path_buf(),
            write_options: options.write_options.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn convert_write_opts(opts: &WriteOptions) -> rocksdb::WriteOptions {
        let mut rocksdb_opts = rocksdb::WriteOptions::default();
        rocksdb_opts.set_sync(opts.sync);
        rocksdb_opts.disable_wal(opts.disable_wal);
        rocksdb_opts
    }

    fn convert_batch(batch: WriteBatch) -> rocksdb::WriteBatch {
        let mut rocksdb_batch = rocksdb::WriteBatch::default();
        for op in batch.into_ops() {
            match op {
                BatchOp::Put { key, value } => rocksdb_batch.put(key, value),
                BatchOp::Delete { key } => rocksdb_batch.delete(key),
            }
        }
        rocksdb_batch
    }
}

impl Engine for RocksDBEngine {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.db.get(key).context(RocksDBSnafu)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let opts = Self::convert_write_opts(&self.write_options);
        self.db.put_opt(key, value, &opts).context(RocksDBSnafu)
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        let opts = Self::convert_write_opts(&self.write_options);
        self.db.delete_opt(key, &opts).context(RocksDBSnafu)
    }

    fn write(&self, batch: WriteBatch) -> Result<()> {
        let opts = Self::convert_write_opts(&self.write_options);
        self.db
            .write_opt(Self::convert_batch(batch), &opts)
            .context(RocksDBSnafu)
    }

    fn seek(&self, start: &[u8]) -> Box<dyn EngineIterator + '_> {
        let mut iter = self.db.raw_iterator();
        iter.seek(start);
        Box::new(RocksDBIterator { iter })
    }

    fn flush(&self) -> Result<()> {
        self.db.flush().context(RocksDBSnafu)
    }
}

impl Drop for RocksDBEngine {
    fn drop(&mut self) {
        info!("rocksdb at {} closed", self.path.display());
    }
}

struct RocksDBIterator<'a> {
    iter: DBRawIteratorWithThreadMode<'a, DB>,
}

impl EngineIterator for RocksDBIterator<'_> {
    fn valid(&self) -> bool {
        self.iter.valid()
    }

    fn key(&self) -> Option<&[u8]> {
        self.iter.key()
    }

    fn value(&self) -> Option<&[u8]> {
        self.iter.value()
    }

    fn next(&mut self) {
        self.iter.next();
    }

    fn status(&self) -> Result<()> {
        self.iter.status().context(RocksDBSnafu)
    }
}

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

//! Set commands on top of the ordered engine.
//!
//! A set is one meta entry holding the cardinality plus one presence-only
//! element entry per member. Membership changes are staged in a
//! [`SetMutation`] so element writes and the new cardinality always land in
//! the same batch.

use std::collections::HashSet;

use bytes::Bytes;
use engine::EngineIterator;
use log::{debug, warn};
use snafu::{ensure, ResultExt};

use crate::{
    base_value_format::StoredValue,
    batch::Batch,
    error::{EngineSnafu, InvalidArgumentSnafu, KeyNotFoundSnafu},
    set_key_format::{DecodedKey, SetMemberKey, SetMetaKey},
    sets_meta_value_format::SetsMetaValue,
    util::glob_match,
    Redis, Result,
};

const DEFAULT_SCAN_COUNT: usize = 10;
/// Largest number of entries a negative `srandmember` count may request.
pub const MAX_RANDOM_SAMPLE: u64 = 1 << 24;

/// Pending membership change of one set.
///
/// Callers only stage members they have checked: inserts must be absent and
/// removes must be present. The resulting cardinality is derived from the
/// count the set had when the mutation was planned.
struct SetMutation<'a> {
    key: &'a [u8],
    inserts: Vec<Bytes>,
    removes: Vec<Bytes>,
}

impl<'a> SetMutation<'a> {
    fn new(key: &'a [u8]) -> Self {
        Self {
            key,
            inserts: Vec::new(),
            removes: Vec::new(),
        }
    }

    fn insert(&mut self, member: &[u8]) {
        self.inserts.push(Bytes::copy_from_slice(member));
    }

    fn remove(&mut self, member: &[u8]) {
        self.removes.push(Bytes::copy_from_slice(member));
    }

    fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.removes.is_empty()
    }

    /// Writes the mutation into `batch` and returns the new cardinality.
    ///
    /// Removes are staged before inserts, so a member both removed and
    /// inserted ends up present. A cardinality of zero deletes the meta entry.
    fn stage<B: Batch + ?Sized>(&self, batch: &mut B, base_count: u64) -> u64 {
        for member in &self.removes {
            batch.delete(&SetMemberKey::new(self.key, member).encode());
        }
        let value = StoredValue::Empty.encode();
        for member in &self.inserts {
            batch.put(&SetMemberKey::new(self.key, member).encode(), &value);
        }

        let mut meta = SetsMetaValue::new(base_count);
        meta.modify_count(i64::try_from(self.inserts.len()).unwrap_or(i64::MAX));
        meta.modify_count(-i64::try_from(self.removes.len()).unwrap_or(i64::MAX));
        let meta_key = SetMetaKey::new(self.key).encode();
        if meta.count() == 0 {
            batch.delete(&meta_key);
        } else {
            batch.put(&meta_key, &meta.encode().encode());
        }
        meta.count()
    }

    fn commit(self, redis: &Redis, base_count: u64) -> Result<u64> {
        let mut batch = redis.create_batch();
        let count = self.stage(batch.as_mut(), base_count);
        batch.commit()?;
        Ok(count)
    }
}

/// Lazily yields the members of one set in member byte order.
///
/// The engine cursor is released once the range is exhausted or the iterator
/// is dropped.
pub struct SetMembersIter<'a> {
    key: Bytes,
    cursor: Option<Box<dyn EngineIterator + 'a>>,
}

impl Iterator for SetMembersIter<'_> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;
        if !cursor.valid() {
            let status = cursor.status().context(EngineSnafu);
            self.cursor = None;
            return status.err().map(Err);
        }

        let decoded = cursor.key().and_then(DecodedKey::decode);
        match decoded {
            Some(DecodedKey::SetElement { key, member }) if key == self.key => {
                cursor.next();
                Some(Ok(member))
            }
            _ => {
                self.cursor = None;
                None
            }
        }
    }
}

fn check_multi_keys(keys: &[&[u8]]) -> Result<()> {
    ensure!(
        keys.len() >= 2,
        InvalidArgumentSnafu {
            message: format!("set algebra needs at least 2 keys, got {}", keys.len()),
        }
    );
    Ok(())
}

impl Redis {
    /// Adds `member` to the set at `key`. Returns 1 if it was added, 0 if it
    /// was already present.
    pub fn sadd(&self, key: &[u8], member: &[u8]) -> Result<i32> {
        self.sadd_members(key, &[member])
    }

    /// Adds every member in `members`, returning how many were new.
    pub fn sadd_members(&self, key: &[u8], members: &[&[u8]]) -> Result<i32> {
        let count = self.get_sets_meta(key)?.map_or(0, |meta| meta.count());

        let mut unique = HashSet::new();
        let mut mutation = SetMutation::new(key);
        for &member in members {
            if unique.insert(member) && !self.member_exists(key, member)? {
                mutation.insert(member);
            }
        }
        if mutation.is_empty() {
            return Ok(0);
        }

        let added = mutation.inserts.len();
        let count = mutation.commit(self, count)?;
        debug!(
            "sadd db={} key={:?} added={added} card={count}",
            self.index(),
            String::from_utf8_lossy(key)
        );
        Ok(added as i32)
    }

    /// Removes `member` from the set at `key`. Returns 1 if it was removed,
    /// 0 if it was not a member.
    pub fn srem(&self, key: &[u8], member: &[u8]) -> Result<i32> {
        self.srem_members(key, &[member])
    }

    pub fn srem_members(&self, key: &[u8], members: &[&[u8]]) -> Result<i32> {
        let count = self.get_sets_meta(key)?.map_or(0, |meta| meta.count());

        let mut unique = HashSet::new();
        let mut mutation = SetMutation::new(key);
        for &member in members {
            if unique.insert(member) && self.member_exists(key, member)? {
                mutation.remove(member);
            }
        }
        if mutation.is_empty() {
            return Ok(0);
        }

        let removed = mutation.removes.len();
        if count < removed as u64 {
            warn!(
                "srem db={} key={:?}: meta count {count} below {removed} removed members",
                self.index(),
                String::from_utf8_lossy(key)
            );
        }
        let count = mutation.commit(self, count)?;
        debug!(
            "srem db={} key={:?} removed={removed} card={count}",
            self.index(),
            String::from_utf8_lossy(key)
        );
        Ok(removed as i32)
    }

    /// Returns the cached cardinality of the set at `key`.
    pub fn scard(&self, key: &[u8]) -> Result<u64> {
        match self.get_sets_meta(key)? {
            Some(meta) => Ok(meta.count()),
            None => KeyNotFoundSnafu {
                key: String::from_utf8_lossy(key),
            }
            .fail(),
        }
    }

    /// Probes the element entry only; the meta entry is not consulted.
    pub fn sismember(&self, key: &[u8], member: &[u8]) -> Result<bool> {
        self.member_exists(key, member)
    }

    /// Members of the set at `key` in member byte order.
    pub fn smembers(&self, key: &[u8]) -> Result<Vec<Bytes>> {
        self.get_sets_meta(key)?;
        self.members_iter(key).collect()
    }

    /// Walks the element range of `key` without checking its meta entry.
    ///
    /// Each call starts a fresh walk.
    pub fn members_iter(&self, key: &[u8]) -> SetMembersIter<'_> {
        let start = SetMemberKey::prefix(key).encode();
        SetMembersIter {
            key: Bytes::copy_from_slice(key),
            cursor: Some(self.engine().seek(&start)),
        }
    }

    /// Deletes every element entry of `key` and its meta entry, whether or
    /// not the meta entry exists.
    pub fn sclear(&self, key: &[u8]) -> Result<()> {
        let mut batch = self.create_batch();
        let mut cleared = 0usize;
        for member in self.members_iter(key) {
            batch.delete(&SetMemberKey::new(key, &member?).encode());
            cleared += 1;
        }
        batch.delete(&SetMetaKey::new(key).encode());
        batch.commit()?;

        debug!(
            "sclear db={} key={:?} cleared={cleared}",
            self.index(),
            String::from_utf8_lossy(key)
        );
        Ok(())
    }

    /// Union of all sets, in order of first appearance.
    pub fn sunion(&self, keys: &[&[u8]]) -> Result<Vec<Bytes>> {
        check_multi_keys(keys)?;

        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for &key in keys {
            for member in self.smembers(key)? {
                if seen.insert(member.clone()) {
                    result.push(member);
                }
            }
        }
        Ok(result)
    }

    /// Members of the first set present in every other set, in the first
    /// set's order.
    pub fn sinter(&self, keys: &[&[u8]]) -> Result<Vec<Bytes>> {
        check_multi_keys(keys)?;

        let candidates = self.smembers(keys[0])?;
        let others = self.member_sets(&keys[1..])?;
        Ok(candidates
            .into_iter()
            .filter(|member| others.iter().all(|set| set.contains(member)))
            .collect())
    }

    /// Members of the first set present in none of the other sets, in the
    /// first set's order.
    pub fn sdiff(&self, keys: &[&[u8]]) -> Result<Vec<Bytes>> {
        check_multi_keys(keys)?;

        let candidates = self.smembers(keys[0])?;
        let others = self.member_sets(&keys[1..])?;
        Ok(candidates
            .into_iter()
            .filter(|member| !others.iter().any(|set| set.contains(member)))
            .collect())
    }

    pub fn sunionstore(&self, destination: &[u8], keys: &[&[u8]]) -> Result<u64> {
        let members = self.sunion(keys)?;
        self.store_members(destination, members)
    }

    pub fn sinterstore(&self, destination: &[u8], keys: &[&[u8]]) -> Result<u64> {
        let members = self.sinter(keys)?;
        self.store_members(destination, members)
    }

    pub fn sdiffstore(&self, destination: &[u8], keys: &[&[u8]]) -> Result<u64> {
        let members = self.sdiff(keys)?;
        self.store_members(destination, members)
    }

    /// Moves `member` from `source` to `destination`. Returns 1 if it was
    /// moved, 0 if `source` does not contain it.
    ///
    /// Both sets are updated in one batch. Moving within the same set only
    /// checks membership.
    pub fn smove(&self, source: &[u8], destination: &[u8], member: &[u8]) -> Result<i32> {
        let source_count = self.get_sets_meta(source)?.map_or(0, |meta| meta.count());
        let destination_count = self
            .get_sets_meta(destination)?
            .map_or(0, |meta| meta.count());

        if !self.member_exists(source, member)? {
            return Ok(0);
        }
        if source == destination {
            return Ok(1);
        }

        let mut batch = self.create_batch();
        let mut outgoing = SetMutation::new(source);
        outgoing.remove(member);
        outgoing.stage(batch.as_mut(), source_count);

        if !self.member_exists(destination, member)? {
            let mut incoming = SetMutation::new(destination);
            incoming.insert(member);
            incoming.stage(batch.as_mut(), destination_count);
        }
        batch.commit()?;

        debug!(
            "smove db={} {:?} -> {:?}",
            self.index(),
            String::from_utf8_lossy(source),
            String::from_utf8_lossy(destination)
        );
        Ok(1)
    }

    /// Removes and returns the first member of the set, or `None` if the set
    /// is empty.
    pub fn spop(&self, key: &[u8]) -> Result<Option<Bytes>> {
        Ok(self.spop_count(key, 1)?.into_iter().next())
    }

    /// Removes and returns up to `count` members, taken in member order.
    pub fn spop_count(&self, key: &[u8], count: usize) -> Result<Vec<Bytes>> {
        let Some(meta) = self.get_sets_meta(key)? else {
            return Ok(Vec::new());
        };
        let popped: Vec<Bytes> = self.members_iter(key).take(count).collect::<Result<_>>()?;
        if popped.is_empty() {
            return Ok(popped);
        }

        if meta.count() < popped.len() as u64 {
            warn!(
                "spop db={} key={:?}: meta count {} below {} popped members",
                self.index(),
                String::from_utf8_lossy(key),
                meta.count(),
                popped.len()
            );
        }

        let mut mutation = SetMutation::new(key);
        for member in &popped {
            mutation.remove(member);
        }
        let remaining = mutation.commit(self, meta.count())?;
        debug!(
            "spop db={} key={:?} popped={} card={remaining}",
            self.index(),
            String::from_utf8_lossy(key),
            popped.len()
        );
        Ok(popped)
    }

    /// Samples members without removing them.
    ///
    /// A non-negative `count` returns up to `count` distinct members. A
    /// negative `count` returns exactly `|count|` entries, repeating members
    /// in order when the set is smaller; an empty set gives an empty result.
    /// A negative `count` beyond [`MAX_RANDOM_SAMPLE`] is rejected.
    pub fn srandmember(&self, key: &[u8], count: i64) -> Result<Vec<Bytes>> {
        ensure!(
            count >= 0 || count.unsigned_abs() <= MAX_RANDOM_SAMPLE,
            InvalidArgumentSnafu {
                message: format!("srandmember count {count} is out of range"),
            }
        );
        self.get_sets_meta(key)?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let total = usize::try_from(count.unsigned_abs()).unwrap_or(usize::MAX);
        let mut sample: Vec<Bytes> = self.members_iter(key).take(total).collect::<Result<_>>()?;

        if count < 0 && !sample.is_empty() {
            let distinct = sample.len();
            let mut next = 0;
            while sample.len() < total {
                sample.push(sample[next % distinct].clone());
                next += 1;
            }
        }
        Ok(sample)
    }

    /// Incrementally iterates the set.
    ///
    /// `cursor` is the offset of the next member to visit, 0 to start. At
    /// most `count` members are visited per call and those matching
    /// `pattern` are returned together with the next cursor, which is 0 once
    /// the whole set has been visited.
    pub fn sscan(
        &self,
        key: &[u8],
        cursor: u64,
        pattern: Option<&[u8]>,
        count: Option<usize>,
    ) -> Result<(u64, Vec<Bytes>)> {
        self.get_sets_meta(key)?;
        let count = count.unwrap_or(DEFAULT_SCAN_COUNT).max(1);

        let mut visited = 0;
        let mut page = Vec::new();
        for (offset, member) in self.members_iter(key).enumerate() {
            let member = member?;
            if (offset as u64) < cursor {
                continue;
            }
            if visited == count {
                return Ok((cursor + visited as u64, page));
            }
            visited += 1;
            if pattern.map_or(true, |pattern| glob_match(pattern, &member)) {
                page.push(member);
            }
        }
        Ok((0, page))
    }

    fn member_sets(&self, keys: &[&[u8]]) -> Result<Vec<HashSet<Bytes>>> {
        keys.iter()
            .map(|&key| -> Result<HashSet<Bytes>> {
                Ok(self.smembers(key)?.into_iter().collect())
            })
            .collect()
    }

    /// Replaces the content of `destination` with `members` in one batch.
    ///
    /// An empty result leaves `destination` deleted.
    fn store_members(&self, destination: &[u8], members: Vec<Bytes>) -> Result<u64> {
        let mut mutation = SetMutation::new(destination);
        let mut existing = 0u64;
        for member in self.members_iter(destination) {
            mutation.remove(&member?);
            existing += 1;
        }
        for member in &members {
            mutation.insert(member);
        }

        let count = mutation.commit(self, existing)?;
        debug!(
            "store db={} destination={:?} card={count}",
            self.index(),
            String::from_utf8_lossy(destination)
        );
        Ok(count)
    }
}

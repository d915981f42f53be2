// Copyright (c) 2024-present, arana-db Community.  All rights reserved.
//
// Licensed to the Apache Software Foundation (ASF) under one or more
// contributor license agreements.  See the NOTICE file distributed with
// this work for additional information regarding copyright ownership.
// The ASF licenses this file to You under the Apache License, Version 2.0
// (the "License"); you may not use this file except in compliance with
// the License.  You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#[cfg(test)]
mod redis_set_test {
    use std::collections::HashSet;
    use std::sync::Arc;

    use bytes::Bytes;
    use engine::{Engine, MemoryEngine};
    use storage::error::{ERR_GENERIC, ERR_INVALID_ARGS, ERR_INVALID_TYPE, ERR_NOT_EXIST};
    use storage::{Error, Redis, SetMetaKey, SetsMetaValue, StoredValue, MAX_RANDOM_SAMPLE};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn open() -> (Arc<MemoryEngine>, Redis) {
        init_logger();
        let engine = Arc::new(MemoryEngine::new());
        let redis = Redis::new(0, engine.clone());
        (engine, redis)
    }

    fn set_of(members: &[Bytes]) -> HashSet<Vec<u8>> {
        members.iter().map(|m| m.to_vec()).collect()
    }

    fn expect(members: &[&[u8]]) -> HashSet<Vec<u8>> {
        members.iter().map(|m| m.to_vec()).collect()
    }

    fn add_all(redis: &Redis, key: &[u8], members: &[&[u8]]) {
        for &member in members {
            redis.sadd(key, member).unwrap();
        }
    }

    fn put_foreign_meta(engine: &MemoryEngine, key: &[u8]) {
        let meta_key = SetMetaKey::new(key).encode();
        engine
            .put(&meta_key, &StoredValue::Integer(1).encode())
            .unwrap();
    }

    #[test]
    fn test_add_remove_scenario() {
        let (_, redis) = open();

        assert_eq!(redis.sadd(b"s", b"a").unwrap(), 1);
        assert_eq!(redis.sadd(b"s", b"a").unwrap(), 0);
        assert_eq!(redis.scard(b"s").unwrap(), 1);
        assert_eq!(redis.sadd(b"s", b"b").unwrap(), 1);
        assert_eq!(
            set_of(&redis.smembers(b"s").unwrap()),
            expect(&[b"a", b"b"])
        );

        assert_eq!(redis.srem(b"s", b"a").unwrap(), 1);
        assert_eq!(set_of(&redis.smembers(b"s").unwrap()), expect(&[b"b"]));
        assert_eq!(redis.scard(b"s").unwrap(), 1);
    }

    #[test]
    fn test_sadd_members_dedups() {
        let (_, redis) = open();

        assert_eq!(redis.sadd_members(b"s", &[b"a", b"b", b"a"]).unwrap(), 2);
        assert_eq!(redis.sadd_members(b"s", &[b"b", b"c"]).unwrap(), 1);
        assert_eq!(redis.sadd_members(b"s", &[]).unwrap(), 0);
        assert_eq!(redis.scard(b"s").unwrap(), 3);
    }

    #[test]
    fn test_members_in_byte_order() {
        let (_, redis) = open();
        add_all(&redis, b"s", &[b"m3", b"m1", b"\x00", b"m2", b""]);

        let members = redis.smembers(b"s").unwrap();
        assert_eq!(
            members,
            vec![
                Bytes::from_static(b""),
                Bytes::from_static(b"\x00"),
                Bytes::from_static(b"m1"),
                Bytes::from_static(b"m2"),
                Bytes::from_static(b"m3"),
            ]
        );
        assert_eq!(redis.scard(b"s").unwrap(), 5);
    }

    #[test]
    fn test_keys_sharing_prefix_stay_apart() {
        let (_, redis) = open();
        add_all(&redis, b"k", &[b"a"]);
        add_all(&redis, b"k\x00", &[b"b"]);
        add_all(&redis, b"ka", &[b"c"]);

        assert_eq!(set_of(&redis.smembers(b"k").unwrap()), expect(&[b"a"]));
        assert_eq!(set_of(&redis.smembers(b"k\x00").unwrap()), expect(&[b"b"]));
        assert_eq!(set_of(&redis.smembers(b"ka").unwrap()), expect(&[b"c"]));
    }

    #[test]
    fn test_remove_last_member_deletes_meta() {
        let (engine, redis) = open();
        redis.sadd(b"s", b"a").unwrap();
        assert_eq!(redis.srem(b"s", b"a").unwrap(), 1);

        let err = redis.scard(b"s").unwrap_err();
        assert!(matches!(err, Error::KeyNotFound { .. }));
        assert_eq!(err.code(), ERR_NOT_EXIST);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_remove_from_missing_set() {
        let (engine, redis) = open();
        assert_eq!(redis.srem(b"missing", b"a").unwrap(), 0);
        assert_eq!(redis.srem_members(b"missing", &[b"a", b"b"]).unwrap(), 0);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_srem_members() {
        let (_, redis) = open();
        add_all(&redis, b"s", &[b"a", b"b", b"c"]);

        assert_eq!(redis.srem_members(b"s", &[b"a", b"x", b"a", b"c"]).unwrap(), 2);
        assert_eq!(redis.scard(b"s").unwrap(), 1);
        assert_eq!(set_of(&redis.smembers(b"s").unwrap()), expect(&[b"b"]));
    }

    #[test]
    fn test_sismember() {
        let (_, redis) = open();
        redis.sadd(b"s", b"a").unwrap();
        assert!(redis.sismember(b"s", b"a").unwrap());
        assert!(!redis.sismember(b"s", b"b").unwrap());
        assert!(!redis.sismember(b"missing", b"a").unwrap());
    }

    #[test]
    fn test_wrong_type_is_rejected_before_writes() {
        let (engine, redis) = open();
        put_foreign_meta(&engine, b"s");
        redis.sadd(b"d_ok", b"a").unwrap();

        for err in [
            redis.sadd(b"s", b"a").unwrap_err(),
            redis.srem(b"s", b"a").unwrap_err(),
            redis.scard(b"s").unwrap_err(),
            redis.smembers(b"s").unwrap_err(),
            redis.spop(b"s").unwrap_err(),
            redis.srandmember(b"s", 1).unwrap_err(),
            redis.sscan(b"s", 0, None, None).unwrap_err(),
            redis.smove(b"s", b"d", b"a").unwrap_err(),
            redis.smove(b"d_ok", b"s", b"a").unwrap_err(),
            redis.sunion(&[b"s", b"d"]).unwrap_err(),
        ] {
            assert!(matches!(err, Error::InvalidType { .. }), "{err}");
            assert_eq!(err.code(), ERR_INVALID_TYPE);
        }
        assert_eq!(engine.len(), 3);
        assert!(redis.sismember(b"d_ok", b"a").unwrap());
        assert_eq!(redis.scard(b"d_ok").unwrap(), 1);
    }

    #[test]
    fn test_sclear() {
        let (engine, redis) = open();
        add_all(&redis, b"s", &[b"a", b"b", b"c"]);
        add_all(&redis, b"t", &[b"a"]);

        redis.sclear(b"s").unwrap();
        assert!(matches!(
            redis.scard(b"s").unwrap_err(),
            Error::KeyNotFound { .. }
        ));
        assert!(redis.smembers(b"s").unwrap().is_empty());
        assert_eq!(redis.scard(b"t").unwrap(), 1);

        // Orphan element entries without meta are removed as well.
        redis.sclear(b"t").unwrap();
        redis.sadd(b"u", b"x").unwrap();
        engine.delete(&SetMetaKey::new(b"u").encode()).unwrap();
        redis.sclear(b"u").unwrap();
        assert!(engine.is_empty());
    }

    #[test]
    fn test_algebra_scenarios() {
        let (_, redis) = open();
        add_all(&redis, b"s1", &[b"a", b"b"]);
        add_all(&redis, b"s2", &[b"b", b"c"]);

        assert_eq!(
            set_of(&redis.sunion(&[b"s1", b"s2"]).unwrap()),
            expect(&[b"a", b"b", b"c"])
        );
        assert_eq!(
            set_of(&redis.sinter(&[b"s1", b"s2"]).unwrap()),
            expect(&[b"b"])
        );
        assert_eq!(
            set_of(&redis.sdiff(&[b"s1", b"s2"]).unwrap()),
            expect(&[b"a"])
        );
    }

    #[test]
    fn test_algebra_with_missing_keys() {
        let (_, redis) = open();
        add_all(&redis, b"s1", &[b"a", b"b"]);

        assert!(redis.sinter(&[b"s1", b"missing"]).unwrap().is_empty());
        assert_eq!(
            set_of(&redis.sdiff(&[b"s1", b"missing"]).unwrap()),
            expect(&[b"a", b"b"])
        );
        assert!(redis.sdiff(&[b"missing", b"s1"]).unwrap().is_empty());
    }

    #[test]
    fn test_algebra_keeps_first_set_order() {
        let (_, redis) = open();
        add_all(&redis, b"s1", &[b"d", b"b", b"c", b"a"]);
        add_all(&redis, b"s2", &[b"a", b"c", b"d"]);
        add_all(&redis, b"s3", &[b"d", b"a"]);

        assert_eq!(
            redis.sinter(&[b"s1", b"s2", b"s3"]).unwrap(),
            vec![Bytes::from_static(b"a"), Bytes::from_static(b"d")]
        );
        assert_eq!(
            redis.sdiff(&[b"s1", b"s3"]).unwrap(),
            vec![Bytes::from_static(b"b"), Bytes::from_static(b"c")]
        );
    }

    #[test]
    fn test_algebra_needs_two_keys() {
        let (_, redis) = open();
        redis.sadd(b"s", b"a").unwrap();

        for err in [
            redis.sunion(&[b"s"]).unwrap_err(),
            redis.sinter(&[b"s"]).unwrap_err(),
            redis.sdiff(&[]).unwrap_err(),
            redis.sunionstore(b"d", &[b"s"]).unwrap_err(),
        ] {
            assert!(matches!(err, Error::InvalidArgument { .. }));
            assert_eq!(err.code(), ERR_INVALID_ARGS);
        }
        assert!(redis.smembers(b"d").unwrap().is_empty());
    }

    #[test]
    fn test_store_variants() {
        let (_, redis) = open();
        add_all(&redis, b"s1", &[b"a", b"b"]);
        add_all(&redis, b"s2", &[b"b", b"c"]);
        add_all(&redis, b"d", &[b"old1", b"old2", b"b"]);

        assert_eq!(redis.sunionstore(b"d", &[b"s1", b"s2"]).unwrap(), 3);
        assert_eq!(redis.scard(b"d").unwrap(), 3);
        assert_eq!(
            set_of(&redis.smembers(b"d").unwrap()),
            expect(&[b"a", b"b", b"c"])
        );

        assert_eq!(redis.sinterstore(b"d", &[b"s1", b"s2"]).unwrap(), 1);
        assert_eq!(set_of(&redis.smembers(b"d").unwrap()), expect(&[b"b"]));
        assert_eq!(redis.scard(b"d").unwrap(), 1);

        assert_eq!(redis.sdiffstore(b"d", &[b"s1", b"s2"]).unwrap(), 1);
        assert_eq!(set_of(&redis.smembers(b"d").unwrap()), expect(&[b"a"]));
    }

    #[test]
    fn test_store_into_source_key() {
        let (_, redis) = open();
        add_all(&redis, b"s1", &[b"a", b"b"]);
        add_all(&redis, b"s2", &[b"b", b"c"]);

        assert_eq!(redis.sdiffstore(b"s1", &[b"s1", b"s2"]).unwrap(), 1);
        assert_eq!(set_of(&redis.smembers(b"s1").unwrap()), expect(&[b"a"]));
        assert_eq!(redis.scard(b"s1").unwrap(), 1);
    }

    #[test]
    fn test_store_empty_result_clears_destination() {
        let (_, redis) = open();
        add_all(&redis, b"s1", &[b"a"]);
        add_all(&redis, b"s2", &[b"b"]);
        add_all(&redis, b"d", &[b"x", b"y"]);

        assert_eq!(redis.sinterstore(b"d", &[b"s1", b"s2"]).unwrap(), 0);
        assert!(matches!(
            redis.scard(b"d").unwrap_err(),
            Error::KeyNotFound { .. }
        ));
        assert!(redis.smembers(b"d").unwrap().is_empty());
    }

    #[test]
    fn test_smove() {
        let (_, redis) = open();
        add_all(&redis, b"src", &[b"a", b"b"]);
        add_all(&redis, b"dst", &[b"c"]);

        assert_eq!(redis.smove(b"src", b"dst", b"a").unwrap(), 1);
        assert!(!redis.sismember(b"src", b"a").unwrap());
        assert!(redis.sismember(b"dst", b"a").unwrap());
        assert_eq!(redis.scard(b"src").unwrap(), 1);
        assert_eq!(redis.scard(b"dst").unwrap(), 2);

        assert_eq!(redis.smove(b"src", b"dst", b"zzz").unwrap(), 0);
        assert_eq!(redis.scard(b"dst").unwrap(), 2);
    }

    #[test]
    fn test_smove_member_already_in_destination() {
        let (_, redis) = open();
        add_all(&redis, b"src", &[b"a"]);
        add_all(&redis, b"dst", &[b"a", b"b"]);

        assert_eq!(redis.smove(b"src", b"dst", b"a").unwrap(), 1);
        assert!(matches!(
            redis.scard(b"src").unwrap_err(),
            Error::KeyNotFound { .. }
        ));
        assert_eq!(redis.scard(b"dst").unwrap(), 2);
    }

    #[test]
    fn test_smove_to_new_set_and_same_key() {
        let (_, redis) = open();
        add_all(&redis, b"src", &[b"a", b"b"]);

        assert_eq!(redis.smove(b"src", b"src", b"a").unwrap(), 1);
        assert_eq!(redis.scard(b"src").unwrap(), 2);

        assert_eq!(redis.smove(b"src", b"new", b"b").unwrap(), 1);
        assert_eq!(redis.scard(b"new").unwrap(), 1);
        assert_eq!(set_of(&redis.smembers(b"src").unwrap()), expect(&[b"a"]));
    }

    #[test]
    fn test_spop() {
        let (engine, redis) = open();
        add_all(&redis, b"s", &[b"b", b"a"]);

        assert_eq!(redis.spop(b"s").unwrap(), Some(Bytes::from_static(b"a")));
        assert_eq!(redis.scard(b"s").unwrap(), 1);
        assert_eq!(redis.spop(b"s").unwrap(), Some(Bytes::from_static(b"b")));
        assert_eq!(redis.spop(b"s").unwrap(), None);
        assert!(redis.scard(b"s").is_err());
        assert!(engine.is_empty());
    }

    #[test]
    fn test_spop_count() {
        let (_, redis) = open();
        add_all(&redis, b"s", &[b"a", b"b", b"c"]);

        let popped = redis.spop_count(b"s", 2).unwrap();
        assert_eq!(popped.len(), 2);
        assert_eq!(redis.scard(b"s").unwrap(), 1);
        for member in &popped {
            assert!(!redis.sismember(b"s", member).unwrap());
        }

        assert_eq!(redis.spop_count(b"s", 10).unwrap().len(), 1);
        assert!(redis.spop_count(b"s", 10).unwrap().is_empty());
        assert!(redis.spop_count(b"missing", 1).unwrap().is_empty());
    }

    #[test]
    fn test_srandmember_positive() {
        let (_, redis) = open();
        add_all(&redis, b"s", &[b"a", b"b", b"c"]);

        assert_eq!(redis.srandmember(b"s", 2).unwrap().len(), 2);
        let all = redis.srandmember(b"s", 10).unwrap();
        assert_eq!(set_of(&all), expect(&[b"a", b"b", b"c"]));
        assert_eq!(all.len(), 3);
        assert!(redis.srandmember(b"s", 0).unwrap().is_empty());
        assert_eq!(redis.scard(b"s").unwrap(), 3);
    }

    #[test]
    fn test_srandmember_negative_repeats() {
        let (_, redis) = open();
        add_all(&redis, b"s", &[b"x", b"y"]);

        let sample = redis.srandmember(b"s", -5).unwrap();
        assert_eq!(sample.len(), 5);
        let originals = expect(&[b"x", b"y"]);
        assert!(sample.iter().all(|m| originals.contains(&m[..])));

        assert!(redis.srandmember(b"missing", -5).unwrap().is_empty());
    }

    #[test]
    fn test_srandmember_rejects_oversized_negative_count() {
        let (_, redis) = open();
        add_all(&redis, b"s", &[b"x"]);

        let limit = MAX_RANDOM_SAMPLE as i64;
        assert_eq!(redis.srandmember(b"s", -8).unwrap().len(), 8);
        for count in [-limit - 1, i64::MIN] {
            let err = redis.srandmember(b"s", count).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument { .. }), "{err}");
            assert_eq!(err.code(), ERR_INVALID_ARGS);
        }
        assert_eq!(redis.srandmember(b"s", i64::MAX).unwrap().len(), 1);
    }

    #[test]
    fn test_sscan_pages() {
        let (_, redis) = open();
        let members: Vec<Vec<u8>> = (0..25).map(|i| format!("m{i:02}").into_bytes()).collect();
        let refs: Vec<&[u8]> = members.iter().map(|m| m.as_slice()).collect();
        redis.sadd_members(b"s", &refs).unwrap();

        let mut cursor = 0;
        let mut seen = Vec::new();
        loop {
            let (next, page) = redis.sscan(b"s", cursor, None, None).unwrap();
            assert!(page.len() <= 10);
            seen.extend(page);
            if next == 0 {
                break;
            }
            cursor = next;
        }
        assert_eq!(seen.len(), 25);
        assert_eq!(set_of(&seen), members.into_iter().collect());
    }

    #[test]
    fn test_sscan_pattern_and_count() {
        let (_, redis) = open();
        add_all(&redis, b"s", &[b"apple", b"avocado", b"banana", b"apricot"]);

        let (next, page) = redis.sscan(b"s", 0, Some(&b"a*"[..]), Some(100)).unwrap();
        assert_eq!(next, 0);
        assert_eq!(
            set_of(&page),
            expect(&[b"apple", b"apricot", b"avocado"])
        );

        let (next, page) = redis.sscan(b"s", 0, Some(&b"b*"[..]), Some(2)).unwrap();
        assert_eq!(next, 2);
        assert!(page.is_empty());
        let (next, page) = redis.sscan(b"s", next, Some(&b"b*"[..]), Some(2)).unwrap();
        assert_eq!(next, 0);
        assert_eq!(page, vec![Bytes::from_static(b"banana")]);

        assert_eq!(redis.sscan(b"missing", 0, None, None).unwrap(), (0, vec![]));
    }

    #[test]
    fn test_failed_write_reports_generic_error() {
        let (engine, redis) = open();
        add_all(&redis, b"s", &[b"a"]);
        add_all(&redis, b"t", &[b"b"]);
        add_all(&redis, b"d", &[b"x"]);
        engine.set_read_only(true);

        for err in [
            redis.sadd(b"s", b"b").unwrap_err(),
            redis.srem(b"s", b"a").unwrap_err(),
            redis.sclear(b"s").unwrap_err(),
            redis.spop(b"s").unwrap_err(),
            redis.sunionstore(b"d", &[b"s", b"t"]).unwrap_err(),
            redis.sinterstore(b"d", &[b"s", b"t"]).unwrap_err(),
            redis.sdiffstore(b"d", &[b"s", b"t"]).unwrap_err(),
            redis.smove(b"s", b"t", b"a").unwrap_err(),
        ] {
            assert!(matches!(err, Error::Engine { .. }), "{err}");
            assert_eq!(err.code(), ERR_GENERIC);
        }

        engine.set_read_only(false);
        assert_eq!(redis.scard(b"s").unwrap(), 1);
        assert_eq!(set_of(&redis.smembers(b"s").unwrap()), expect(&[b"a"]));
        assert_eq!(redis.scard(b"t").unwrap(), 1);
        assert!(!redis.sismember(b"t", b"a").unwrap());
        assert_eq!(redis.scard(b"d").unwrap(), 1);
        assert_eq!(set_of(&redis.smembers(b"d").unwrap()), expect(&[b"x"]));
    }

    #[test]
    fn test_meta_value_on_disk() {
        let (engine, redis) = open();
        add_all(&redis, b"s", &[b"a", b"b"]);

        let raw = engine.get(&SetMetaKey::new(b"s").encode()).unwrap().unwrap();
        let value = StoredValue::decode(&raw).unwrap();
        assert_eq!(SetsMetaValue::decode(&value), Some(SetsMetaValue::new(2)));
    }
}

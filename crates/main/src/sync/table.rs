////////////////////////////////////////////////////////////////////////////////
// This file is a part of the "Lady Deirdre" work,                            //
// a compiler front-end foundation technology.                                //
//                                                                            //
// This work is proprietary software with source-available code.              //
//                                                                            //
// To copy, use, distribute, and contribute to this work, you must agree to   //
// the terms of the General License Agreement:                                //
//                                                                            //
// https://github.com/Eliah-Lakhin/lady-deirdre/blob/master/EULA.md.          //
//                                                                            //
// The agreement grants you a Commercial-Limited License that gives you       //
// the right to use my work in non-commercial and limited commercial products //
// with a total gross revenue cap. To remove this commercial limit for one of //
// your products, you must acquire an Unrestricted Commercial License.        //
//                                                                            //
// If you contribute to the source code, documentation, or related materials  //
// of this work, you must assign these changes to me. Contributions are       //
// governed by the "Derivative Work" section of the General License           //
// Agreement.                                                                 //
//                                                                            //
// Copying the work in parts is strictly forbidden, except as permitted under //
// the terms of the General License Agreement.                                //
//                                                                            //
// If you do not or cannot agree to the terms of this Agreement,              //
// do not use this work.                                                      //
//                                                                            //
// This work is provided "as is" without any warranties, express or implied,  //
// except to the extent that such disclaimers are held to be legally invalid. //
//                                                                            //
// Copyright (c) 2024 Ilya Lakhin (Илья Александрович Лахин).                 //
// All rights reserved.                                                       //
////////////////////////////////////////////////////////////////////////////////

use std::{
    borrow::Borrow,
    collections::{hash_map::Entry, HashMap},
    fmt::{Debug, Formatter},
    hash::{BuildHasher, Hash},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use ahash::RandomState;

use crate::report::ld_unreachable;

/// A sharded read-write lock of the HashMap.
///
/// The Table is the storage behind the DFA caches of the prediction engine.
/// Concurrent parses that share one grammar read and extend the same Table
/// instances, so the Table provides an atomic insert-if-absent operation
/// ([get_or_insert_with](Self::get_or_insert_with)) that returns whichever
/// value has been registered first.
///
/// Reads and writes of distinct keys rarely block each other, because the
/// entries are distributed between a fixed number of independently locked
/// shards. The amount of shards is estimated from the available parallelism
/// unless specified explicitly in
/// [with_shards](Self::with_shards).
pub struct Table<K, V, S = RandomState> {
    shift: usize,
    shards: Box<[RwLock<HashMap<K, V, S>>]>,
    hasher: S,
}

impl<K, V, S> Debug for Table<K, V, S> {
    #[inline(always)]
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Table")
            .field("shards", &self.shards.len())
            .finish_non_exhaustive()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher + Default + Clone> Default for Table<K, V, S> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> Table<K, V, S> {
    /// A default Table constructor.
    #[inline(always)]
    pub fn new() -> Self
    where
        S: Default + Clone,
    {
        Self::with_shards(S::default(), shards_amount())
    }

    /// A Table constructor with the key `hasher` instance and the amount
    /// of `shards`.
    ///
    /// **Panic**
    ///
    /// Panics, if the `shards` value is zero or is not a power of two.
    pub fn with_shards(hasher: S, shards: usize) -> Self
    where
        S: Clone,
    {
        if !shards.is_power_of_two() {
            panic!("Table shards amount {shards} is not a power of two.");
        }

        let shift = match shards > 1 {
            true => usize::BITS as usize - shards.trailing_zeros() as usize,
            false => 0,
        };

        let shards = (0..shards)
            .map(|_| RwLock::new(HashMap::with_hasher(hasher.clone())))
            .collect();

        Self {
            shift,
            shards,
            hasher,
        }
    }

    /// Returns true if the Table has an entry with the specified `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.read_shard(key).contains_key(key)
    }

    /// Returns a copy of the value mapped to the `key`.
    ///
    /// Blocks the current thread if the key's shard is locked for write.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.read_shard(key).get(key).cloned()
    }

    /// Returns the value mapped to the `key`, or registers the value
    /// produced by `init` if the Table does not have such entry yet.
    ///
    /// The lookup and the insertion happen under the same shard lock, so
    /// two threads racing for the same key always observe the same value.
    ///
    /// The returning flag is true if the value was inserted by this call.
    pub fn get_or_insert_with(&self, key: K, init: impl FnOnce() -> V) -> (V, bool)
    where
        V: Clone,
    {
        let mut guard = self.write_shard(&key);

        match guard.entry(key) {
            Entry::Occupied(entry) => (entry.get().clone(), false),
            Entry::Vacant(entry) => (entry.insert(init()).clone(), true),
        }
    }

    /// Inserts a key-value entry into this Table.
    ///
    /// Returns the previous value mapped to the `key`.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.write_shard(&key).insert(key, value)
    }

    /// Returns the total number of entries in all shards.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.read().unwrap_or_else(|poison| poison.into_inner()).len())
            .sum()
    }

    /// Returns true if the Table does not have any entries.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all entries from all shards.
    ///
    /// The shards are cleared one by one, so a concurrent reader may observe
    /// a partially cleared Table.
    pub fn clear(&self) {
        for shard in self.shards.iter() {
            shard
                .write()
                .unwrap_or_else(|poison| poison.into_inner())
                .clear();
        }
    }

    /// Returns a snapshot of all values stored in this Table.
    ///
    /// The order of the values is unspecified.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        let mut result = Vec::new();

        for shard in self.shards.iter() {
            let guard = shard.read().unwrap_or_else(|poison| poison.into_inner());

            result.extend(guard.values().cloned());
        }

        result
    }

    /// Returns a snapshot of all key-value pairs stored in this Table.
    ///
    /// The order of the pairs is unspecified.
    pub fn entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        let mut result = Vec::new();

        for shard in self.shards.iter() {
            let guard = shard.read().unwrap_or_else(|poison| poison.into_inner());

            result.extend(guard.iter().map(|(key, value)| (key.clone(), value.clone())));
        }

        result
    }

    #[inline(always)]
    fn read_shard<Q>(&self, key: &Q) -> RwLockReadGuard<HashMap<K, V, S>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard_of(key)
            .read()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    #[inline(always)]
    fn write_shard<Q>(&self, key: &Q) -> RwLockWriteGuard<HashMap<K, V, S>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shard_of(key)
            .write()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    fn shard_of<Q>(&self, key: &Q) -> &RwLock<HashMap<K, V, S>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let index = match self.shift {
            0 => 0,
            shift => {
                let hash = self.hasher.hash_one(key) as usize;

                (hash << 7) >> shift
            }
        };

        match self.shards.get(index) {
            Some(shard) => shard,

            None => ld_unreachable!("Table shard index out of bounds."),
        }
    }
}

fn shards_amount() -> usize {
    #[cfg(not(target_family = "wasm"))]
    {
        std::thread::available_parallelism()
            .map_or(1usize, |parallelism| 4 * usize::from(parallelism))
            .next_power_of_two()
    }

    #[cfg(target_family = "wasm")]
    {
        1
    }
}

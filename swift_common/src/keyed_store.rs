/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use std::{
    collections::HashMap,
    hash::Hash,
    sync::{RwLock,RwLockReadGuard,RwLockWriteGuard},
    fmt::Debug
};
use trait_set::trait_set;

trait_set! {
    pub trait KeyedStoreKey = Eq + Hash + Clone + Debug;
    pub trait KeyedStoreValue = Clone;
}

/// RwLock-synchronized, typed key-value store. The map implementation and the lock are hidden behind
/// the interface, which only offers atomic operations.
/// Since a KeyedStore is shared between threads we cannot return borrowed values. Getters either return
/// clones (hence the Clone constraint on V) or use closures to process &V values while the lock is held.
/// Closures must not call back into the same store (the lock is not re-entrant).
///
/// use like so:
/// ```rust
/// use swift_common::keyed_store::KeyedStore;
///
/// let store: KeyedStore<String,u32> = KeyedStore::new();
/// store.insert( "DLH123".into(), 1);
/// store.upsert_with( "DLH123".into(), || 0, |v| *v += 1);
/// assert_eq!( store.get_clone("DLH123"), Some(2));
/// ```
#[derive(Debug)]
pub struct KeyedStore<K,V> {
    map: RwLock<HashMap<K,V>>
}

impl<K,V> Default for KeyedStore<K,V> where K: KeyedStoreKey, V: KeyedStoreValue {
    fn default()->Self { Self::new() }
}

impl<K,V> KeyedStore<K,V> where K: KeyedStoreKey, V: KeyedStoreValue {
    pub fn new()->Self {
        KeyedStore{ map: RwLock::new( HashMap::new()) }
    }

    // all stored values are consistent after every completed closure so we recover from poisoned locks
    fn read_map (&self)->RwLockReadGuard<'_,HashMap<K,V>> {
        self.map.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_map (&self)->RwLockWriteGuard<'_,HashMap<K,V>> {
        self.map.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn len (&self)->usize { self.read_map().len() }

    pub fn is_empty (&self)->bool { self.read_map().is_empty() }

    pub fn contains_key<Q> (&self, key: &Q)->bool where K: std::borrow::Borrow<Q>, Q: Hash + Eq + ?Sized {
        self.read_map().contains_key(key)
    }

    pub fn get_clone<Q> (&self, key: &Q)->Option<V> where K: std::borrow::Borrow<Q>, Q: Hash + Eq + ?Sized {
        self.read_map().get(key).cloned()
    }

    /// insert or replace, returning the previous value
    pub fn insert (&self, key: K, value: V)->Option<V> {
        self.write_map().insert( key, value)
    }

    /// atomic check-then-insert. Returns true if the value was inserted, false if the key already existed
    pub fn insert_if_absent<F> (&self, key: K, f: F)->bool where F: FnOnce()->V {
        let mut map = self.write_map();
        if map.contains_key(&key) {
            false
        } else {
            map.insert( key, f());
            true
        }
    }

    /// atomically update the value for `key`, creating it with `init` if it does not exist yet
    pub fn upsert_with<I,F,R> (&self, key: K, init: I, f: F)->R where I: FnOnce()->V, F: FnOnce(&mut V)->R {
        let mut map = self.write_map();
        let v = map.entry(key).or_insert_with( init);
        f(v)
    }

    /// atomically update an existing value. Returns None if there is no value for `key`
    pub fn update<Q,F,R> (&self, key: &Q, f: F)->Option<R> where K: std::borrow::Borrow<Q>, Q: Hash + Eq + ?Sized, F: FnOnce(&mut V)->R {
        let mut map = self.write_map();
        map.get_mut(key).map( f)
    }

    /// apply `f` to all values while holding the write lock
    pub fn update_all<F> (&self, mut f: F) where F: FnMut(&K,&mut V) {
        let mut map = self.write_map();
        for (k,v) in map.iter_mut() { f(k,v) }
    }

    pub fn remove<Q> (&self, key: &Q)->Option<V> where K: std::borrow::Borrow<Q>, Q: Hash + Eq + ?Sized {
        self.write_map().remove(key)
    }

    /// remove all entries for which `f` returns false. Returns the number of removed entries
    pub fn retain<F> (&self, f: F)->usize where F: FnMut(&K,&mut V)->bool {
        let mut map = self.write_map();
        let n = map.len();
        map.retain( f);
        n - map.len()
    }

    pub fn clear (&self) { self.write_map().clear() }

    /// execute closure for value reference of given key
    pub fn with<Q,F,R> (&self, key: &Q, f: F)->Option<R> where K: std::borrow::Borrow<Q>, Q: Hash + Eq + ?Sized, F: FnOnce(&V)->R {
        self.read_map().get(key).map( f)
    }

    pub fn keys (&self)->Vec<K> { self.read_map().keys().cloned().collect() }

    pub fn values (&self)->Vec<V> { self.read_map().values().cloned().collect() }

    pub fn values_matching<F> (&self, mut f: F)->Vec<V> where F: FnMut(&V)->bool {
        self.read_map().values().filter(|v| f(v)).cloned().collect()
    }

    pub fn snapshot (&self)->Vec<(K,V)> {
        self.read_map().iter().map(|(k,v)| (k.clone(), v.clone())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, thread};

    #[test]
    fn test_insert_if_absent () {
        let store: KeyedStore<String,u32> = KeyedStore::new();
        assert!( store.insert_if_absent( "a".into(), || 1));
        assert!( !store.insert_if_absent( "a".into(), || 2));
        assert_eq!( store.get_clone("a"), Some(1));
    }

    #[test]
    fn test_concurrent_upsert () {
        let store: Arc<KeyedStore<String,u32>> = Arc::new( KeyedStore::new());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push( thread::spawn( move || {
                for _ in 0..100 { store.upsert_with( "n".into(), || 0, |v| *v += 1); }
            }));
        }
        for h in handles { h.join().unwrap(); }
        assert_eq!( store.get_clone("n"), Some(800));
        assert_eq!( store.len(), 1);
    }

    #[test]
    fn test_retain () {
        let store: KeyedStore<u32,u32> = KeyedStore::new();
        for i in 0..10 { store.insert( i, i*i); }
        let n = store.retain( |k,_| k % 2 == 0);
        assert_eq!( n, 5);
        assert!( store.contains_key(&4));
        assert!( !store.contains_key(&5));
    }
}

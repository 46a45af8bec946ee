//! Thread-safe memoization caches used while decoding.
//!
//! Entries never expire; [`Cache::clear`] is the only reclamation. Readers share
//! the lock, inserts and clears take it exclusively, so a decode never observes
//! a partially written entry.

use crate::font::FontDescriptor;
use crate::model::Font;
use crate::style::ParsedStyle;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A keyed store safe to share between threads.
#[derive(Debug)]
pub struct Cache<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K: Eq + Hash, V: Clone> Cache<K, V> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns a copy of the value stored for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: std::borrow::Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.read().get(key).cloned()
    }

    /// Stores `value` for `key`, replacing any previous value.
    pub fn set(&self, key: K, value: V) {
        self.write().insert(key, value);
    }

    /// Returns the cached value or computes, stores and returns it.
    ///
    /// `compute` runs without the lock held, so two threads missing the same
    /// key may both compute; the last insert wins.
    pub fn get_or_insert_with<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.set(key, value.clone());
        value
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave the map half-updated (every
    // mutation is a single HashMap call), so poisoned guards are still usable.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<K, V>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<K, V>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: Eq + Hash, V: Clone> Default for Cache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache of parsed inline style strings, keyed verbatim.
pub type StyleCache = Cache<String, ParsedStyle>;

/// Cache of resolved fonts, keyed by descriptor.
pub type FontCache = Cache<FontDescriptor, Font>;

/// The pair of caches shared by every decode.
#[derive(Debug, Default)]
pub struct DecodeCaches {
    /// Style declaration string -> parsed attributes
    pub styles: StyleCache,
    /// Font descriptor -> resolved font
    pub fonts: FontCache,
}

impl DecodeCaches {
    /// Creates empty caches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears both caches.
    pub fn clear(&self) {
        self.styles.clear();
        self.fonts.clear();
    }

    /// Returns true if both caches are empty.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty() && self.fonts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_get_set_clear() {
        let cache: Cache<String, u32> = Cache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);

        cache.set("a".to_string(), 1);
        cache.set("b".to_string(), 2);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.len(), 2);

        cache.set("a".to_string(), 3);
        assert_eq!(cache.get("a"), Some(3));

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("b"), None);
    }

    #[test]
    fn test_get_or_insert_with_computes_once() {
        let cache: Cache<&str, usize> = Cache::new();
        let mut calls = 0;
        let first = cache.get_or_insert_with("k", || {
            calls += 1;
            7
        });
        let second = cache.get_or_insert_with("k", || {
            calls += 1;
            8
        });
        assert_eq!((first, second, calls), (7, 7, 1));
    }

    #[test]
    fn test_concurrent_access() {
        let cache: Arc<Cache<usize, usize>> = Arc::new(Cache::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..1000 {
                        let key = (i * 7 + t) % 50;
                        let value = cache.get_or_insert_with(key, || key * 2);
                        assert_eq!(value, key * 2);
                        if i % 97 == 0 {
                            cache.clear();
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 50);
    }

    #[test]
    fn test_poisoned_lock_is_recovered() {
        let cache: Arc<Cache<u8, u8>> = Arc::new(Cache::new());
        cache.set(1, 1);

        let poisoner = Arc::clone(&cache);
        let _ = thread::spawn(move || {
            let _guard = poisoner.entries.write().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(cache.get(&1u8), Some(1));
        cache.set(2, 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_decode_caches_clear() {
        let caches = DecodeCaches::new();
        caches
            .styles
            .set("color: red".to_string(), ParsedStyle::default());
        assert!(!caches.is_empty());
        caches.clear();
        assert!(caches.is_empty());
    }
}

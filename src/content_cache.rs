use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};
use spdlog::debug;

/// Keyed cache with per-entry expiration.
///
/// Shared by reference; the inner lock is never held while a missing value is computed,
/// so two readers racing on a miss may both compute it and the last one stored wins.
pub struct ContentCache<T> {
    cache: Option<RwLock<CacheMap<T>>>,
}

type CacheMap<T> = HashMap<String, CacheValue<T>>;

#[derive(Clone, Copy)]
pub enum Expire {
    Never,
    After(Duration),
}

struct CacheValue<T> {
    expire_date: DateTime<Utc>,
    value: Arc<T>,
}

impl<T> ContentCache<T> {
    pub fn new() -> Self {
        ContentCache {
            cache: Some(RwLock::new(HashMap::new())),
        }
    }

    pub fn non_caching() -> Self {
        ContentCache {
            cache: None,
        }
    }

    pub fn set(&self, key: &str, content: T, expire_after: Expire) -> Arc<T> {
        let value = Arc::new(content);
        if let Some(ref cache) = self.cache {
            let expire_date = match expire_after {
                Expire::Never => DateTime::<Utc>::MAX_UTC,
                Expire::After(duration) => Utc::now() + duration,
            };

            let mut cache = cache.write().unwrap_or_else(PoisonError::into_inner);
            cache.insert(key.to_string(), CacheValue {
                expire_date,
                value: value.clone(),
            });
        }
        value
    }

    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        if let Some(ref cache) = self.cache {
            let cache = cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(cache_value) = cache.get(key) {
                if Utc::now() > cache_value.expire_date {
                    return None;
                }
                return Some(cache_value.value.clone());
            }
        }
        None
    }

    pub fn get_or_set<F>(&self, key: &str, expire_after: Expire, f: F) -> Arc<T>
    where
        F: FnOnce() -> T,
    {
        if let Some(value) = self.get(key) {
            debug!("Cache hit for {}", key);
            return value;
        }

        debug!("Cache miss for {}", key);
        self.set(key, f(), expire_after)
    }
}

impl<T> Default for ContentCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

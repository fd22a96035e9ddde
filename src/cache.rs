//! # Score cache
//! In-memory TTL cache with per-key single-flight semantics.
//!
//! A short synchronous lock guards the key→slot map; each slot carries its
//! own async mutex that serializes computation for that key. Concurrent
//! callers for the same uncached key queue behind one in-flight computation
//! and read its result, so the fetch+classify pipeline runs at most once per
//! key per TTL window. Unrelated keys never block each other on the slow
//! path.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("score_cache_hits_total", "Cache reads served from a fresh entry.");
        describe_counter!(
            "score_cache_misses_total",
            "Cache reads that triggered a computation."
        );
        describe_counter!("score_cache_evictions_total", "Entries evicted on overflow.");
    });
}

struct Entry<V> {
    value: V,
    inserted_at: Instant,
}

struct Slot<V> {
    cell: tokio::sync::Mutex<Option<Entry<V>>>,
}

impl<V> Slot<V> {
    fn empty() -> Self {
        Self {
            cell: tokio::sync::Mutex::new(None),
        }
    }
}

/// TTL + capacity bounded cache. `V` is cloned out on hits; keep it cheap
/// (the analyzer stores a small enum).
pub struct TtlCache<V> {
    ttl: Duration,
    capacity: usize,
    slots: Mutex<HashMap<String, Arc<Slot<V>>>>,
}

impl<V: Clone + Send + 'static> TtlCache<V> {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        ensure_metrics_described();
        Self {
            ttl,
            capacity: capacity.max(1),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Read-through lookup. `compute` runs only when there is no fresh entry
    /// for `key`, and at most one computation per key is in flight at a time.
    /// A successful computation is cached for the TTL; an `Err` is returned
    /// to the caller and NOT cached, so the next caller retries.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let slot = self.slot_for(key);

        // Per-key serialization point. Whoever wins the lock either reads a
        // fresh entry or computes one for everyone queued behind them.
        let mut guard = slot.cell.lock().await;
        if let Some(entry) = guard.as_ref() {
            if entry.inserted_at.elapsed() < self.ttl {
                counter!("score_cache_hits_total").increment(1);
                return Ok(entry.value.clone());
            }
        }

        counter!("score_cache_misses_total").increment(1);
        let value = compute().await?;
        *guard = Some(Entry {
            value: value.clone(),
            inserted_at: Instant::now(),
        });
        Ok(value)
    }

    fn slot_for(&self, key: &str) -> Arc<Slot<V>> {
        let mut map = self.slots.lock().expect("cache map mutex poisoned");
        if !map.contains_key(key) && map.len() >= self.capacity {
            Self::evict_locked(&mut map, self.ttl);
        }
        map.entry(key.to_string())
            .or_insert_with(|| Arc::new(Slot::empty()))
            .clone()
    }

    /// Drop expired entries first, then the oldest ready entry if the map is
    /// still full. Slots whose computation is in flight (async lock held, or
    /// a caller still holding the Arc) are never considered.
    fn evict_locked(map: &mut HashMap<String, Arc<Slot<V>>>, ttl: Duration) {
        let mut expired: Vec<String> = Vec::new();
        let mut oldest: Option<(String, Instant)> = None;

        for (k, slot) in map.iter() {
            if Arc::strong_count(slot) > 1 {
                continue; // a caller is using this slot
            }
            let Ok(guard) = slot.cell.try_lock() else {
                continue; // in-flight computation
            };
            match guard.as_ref() {
                Some(entry) if entry.inserted_at.elapsed() >= ttl => expired.push(k.clone()),
                Some(entry) => {
                    let older = oldest
                        .as_ref()
                        .map(|(_, t)| entry.inserted_at < *t)
                        .unwrap_or(true);
                    if older {
                        oldest = Some((k.clone(), entry.inserted_at));
                    }
                }
                // A slot without an entry is a leftover from a failed compute.
                None => expired.push(k.clone()),
            }
        }

        if expired.is_empty() {
            if let Some((k, _)) = oldest {
                expired.push(k);
            }
        }
        for k in &expired {
            map.remove(k);
        }
        counter!("score_cache_evictions_total").increment(expired.len() as u64);
    }

    /// Number of keys currently tracked (diagnostics only).
    pub fn len(&self) -> usize {
        self.slots.lock().expect("cache map mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

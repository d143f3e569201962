use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

/// Bounded LRU of finished lyrics texts with a time-to-live.
#[derive(Debug)]
pub struct LyricsCache {
    entries: LruCache<String, CachedLyrics>,
    ttl: Duration,
}

#[derive(Debug, Clone)]
struct CachedLyrics {
    lyrics: String,
    stored_at: Instant,
}

impl LyricsCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    pub fn get(&mut self, key: &str) -> Option<String> {
        self.get_at(key, Instant::now())
    }

    pub fn insert(&mut self, key: String, lyrics: String) {
        self.insert_at(key, lyrics, Instant::now());
    }

    /// Stale entries are evicted on read.
    fn get_at(&mut self, key: &str, now: Instant) -> Option<String> {
        let fresh = self
            .entries
            .get(key)
            .map(|e| now.saturating_duration_since(e.stored_at) <= self.ttl)?;
        if fresh {
            self.entries.get(key).map(|e| e.lyrics.clone())
        } else {
            self.entries.pop(key);
            None
        }
    }

    fn insert_at(&mut self, key: String, lyrics: String, now: Instant) {
        self.entries.put(
            key,
            CachedLyrics {
                lyrics,
                stored_at: now,
            },
        );
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    fn clear(&mut self) {
        self.entries.clear();
    }
}

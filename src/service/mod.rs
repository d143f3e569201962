//! Online lyrics lookup
//!
//! Ties the pieces together:
//! - a registry of providers tried in order
//! - a TTL cache keyed by track metadata and companion mode
//! - merging the chosen companion transcript under the original

pub mod cache;
pub mod provider;

pub use cache::LyricsCache;
pub use provider::{
    CatalogProvider, LyricsCatalog, LyricsProvider, LyricsRequest, LyricsResult, ProviderRegistry,
};

use crate::config::{LyricsSettings, SubLyricsMode};
use crate::lyrics::merge_timelines;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub struct LyricsService {
    registry: ProviderRegistry,
    settings: LyricsSettings,
    cache: Mutex<LyricsCache>,
}

impl LyricsService {
    pub fn new(settings: LyricsSettings, cache_capacity: usize, cache_ttl: Duration) -> Self {
        Self {
            registry: ProviderRegistry::new(),
            settings,
            cache: Mutex::new(LyricsCache::new(cache_capacity, cache_ttl)),
        }
    }

    pub async fn register(&self, provider: Arc<dyn LyricsProvider>) -> bool {
        self.registry.register(provider).await
    }

    /// Look up display-ready LRC text for a track.
    ///
    /// `None` means no provider had lyrics (or lookups are disabled); provider
    /// failures are logged and the next provider is tried.
    pub async fn get_lyrics(&self, request: &LyricsRequest) -> Option<String> {
        if !self.settings.enabled {
            return None;
        }

        let key = cache_key(request, self.settings.sub_lyrics);
        if let Some(hit) = self.cache.lock().await.get(&key) {
            tracing::debug!(title = %request.title, "lyrics cache hit");
            return Some(hit);
        }

        for provider in self.registry.snapshot().await {
            let result = match provider.fetch(request, &self.settings).await {
                Ok(Some(result)) => result,
                Ok(None) => {
                    tracing::debug!(provider = provider.name(), title = %request.title, "no lyrics");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), "lyrics lookup failed: {e:#}");
                    continue;
                }
            };

            if let Some(lyrics) = build_lyrics_text(&result, self.settings.sub_lyrics) {
                self.cache.lock().await.insert(key, lyrics.clone());
                return Some(lyrics);
            }
        }

        None
    }
}

fn cache_key(request: &LyricsRequest, mode: SubLyricsMode) -> String {
    format!(
        "{}|{}|{}|{}",
        request.title.to_lowercase(),
        request.artist.to_lowercase(),
        request.album.to_lowercase(),
        mode.as_str()
    )
}

/// Original lyrics with the selected companion merged in, if there is one.
pub fn build_lyrics_text(result: &LyricsResult, mode: SubLyricsMode) -> Option<String> {
    if result.lrc.trim().is_empty() {
        return None;
    }

    let companion = match mode {
        SubLyricsMode::None => None,
        SubLyricsMode::Romaji => result.romaji_lrc.as_deref(),
        SubLyricsMode::Translation => result.translation_lrc.as_deref(),
    }
    .filter(|c| !c.trim().is_empty());

    Some(match companion {
        Some(companion) => merge_timelines(&result.lrc, &[companion]),
        None => result.lrc.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticProvider {
        name: &'static str,
        result: Option<LyricsResult>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl StaticProvider {
        fn new(name: &'static str, result: Option<LyricsResult>) -> Arc<Self> {
            Arc::new(Self {
                name,
                result,
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                result: None,
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LyricsProvider for StaticProvider {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch(
            &self,
            _request: &LyricsRequest,
            _settings: &LyricsSettings,
        ) -> anyhow::Result<Option<LyricsResult>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("network down");
            }
            Ok(self.result.clone())
        }
    }

    fn lyrics(lrc: &str, translation: Option<&str>, romaji: Option<&str>) -> LyricsResult {
        LyricsResult {
            lrc: lrc.to_string(),
            translation_lrc: translation.map(str::to_string),
            romaji_lrc: romaji.map(str::to_string),
        }
    }

    fn service(mode: SubLyricsMode) -> LyricsService {
        let settings = LyricsSettings {
            sub_lyrics: mode,
            ..Default::default()
        };
        LyricsService::new(settings, 16, Duration::from_secs(600))
    }

    fn request() -> LyricsRequest {
        LyricsRequest::from_track("Lemon", "米津玄師", "Lemon").unwrap()
    }

    #[test]
    fn test_build_lyrics_text() {
        let result = lyrics("[00:01.00]Hello", Some("[00:01.00]你好"), Some("  "));
        assert_eq!(
            build_lyrics_text(&result, SubLyricsMode::Translation).as_deref(),
            Some("[00:01.00]Hello\n[00:01.00]你好")
        );
        assert_eq!(
            build_lyrics_text(&result, SubLyricsMode::Romaji).as_deref(),
            Some("[00:01.00]Hello")
        );
        assert_eq!(
            build_lyrics_text(&result, SubLyricsMode::None).as_deref(),
            Some("[00:01.00]Hello")
        );
        assert_eq!(build_lyrics_text(&lyrics(" \n", None, None), SubLyricsMode::None), None);
    }

    #[tokio::test]
    async fn test_providers_tried_in_order() {
        let svc = service(SubLyricsMode::None);
        let broken = StaticProvider::failing("broken");
        let empty = StaticProvider::new("empty", None);
        let good = StaticProvider::new("good", Some(lyrics("[00:01.00]a", None, None)));
        let never = StaticProvider::new("never", Some(lyrics("[00:01.00]b", None, None)));
        svc.register(broken.clone()).await;
        svc.register(empty.clone()).await;
        svc.register(good.clone()).await;
        svc.register(never.clone()).await;

        assert_eq!(svc.get_lyrics(&request()).await.as_deref(), Some("[00:01.00]a"));
        assert_eq!((broken.calls(), empty.calls(), good.calls()), (1, 1, 1));
        assert_eq!(never.calls(), 0);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_providers() {
        let svc = service(SubLyricsMode::Translation);
        let provider = StaticProvider::new(
            "p",
            Some(lyrics("[00:01.00]Hello", Some("[00:01.00]Hola"), None)),
        );
        svc.register(provider.clone()).await;

        let first = svc.get_lyrics(&request()).await;
        let upper = LyricsRequest::from_track("LEMON", "米津玄師", "LEMON").unwrap();
        let second = svc.get_lyrics(&upper).await;
        assert_eq!(first.as_deref(), Some("[00:01.00]Hello\n[00:01.00]Hola"));
        assert_eq!(first, second);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_misses_are_not_cached() {
        let svc = service(SubLyricsMode::None);
        let provider = StaticProvider::new("p", None);
        svc.register(provider.clone()).await;

        assert!(svc.get_lyrics(&request()).await.is_none());
        assert!(svc.get_lyrics(&request()).await.is_none());
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_disabled_service_returns_nothing() {
        let settings = LyricsSettings {
            enabled: false,
            ..Default::default()
        };
        let svc = LyricsService::new(settings, 16, Duration::from_secs(600));
        let provider = StaticProvider::new("p", Some(lyrics("[00:01.00]a", None, None)));
        svc.register(provider.clone()).await;

        assert!(svc.get_lyrics(&request()).await.is_none());
        assert_eq!(provider.calls(), 0);
    }

    #[test]
    fn test_cache_key_includes_mode() {
        let req = request();
        assert_ne!(
            cache_key(&req, SubLyricsMode::None),
            cache_key(&req, SubLyricsMode::Romaji)
        );
        assert_eq!(cache_key(&req, SubLyricsMode::None), "lemon|米津玄師|lemon|none");
    }
}

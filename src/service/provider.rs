//! Lyrics sources and the registry that orders them.

use crate::config::LyricsSettings;
use crate::lyrics::rank::{rank_candidates, SearchCandidate, TrackQuery};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// What a lookup asks for. Built from player metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsRequest {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl LyricsRequest {
    /// Trim every field. A track without a title cannot be looked up.
    pub fn from_track(title: &str, artist: &str, album: &str) -> Option<Self> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        Some(Self {
            title: title.to_string(),
            artist: artist.trim().to_string(),
            album: album.trim().to_string(),
        })
    }

    pub fn query(&self) -> TrackQuery {
        TrackQuery {
            title: self.title.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
        }
    }
}

/// Raw LRC texts for one track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LyricsResult {
    pub lrc: String,
    pub translation_lrc: Option<String>,
    pub romaji_lrc: Option<String>,
}

/// A source of lyrics. `Ok(None)` means "not found here, try the next one".
#[async_trait]
pub trait LyricsProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(
        &self,
        request: &LyricsRequest,
        settings: &LyricsSettings,
    ) -> anyhow::Result<Option<LyricsResult>>;
}

/// A searchable lyrics catalog: free-text search, then lyrics by id.
#[async_trait]
pub trait LyricsCatalog: Send + Sync {
    async fn search(
        &self,
        query: &TrackQuery,
        settings: &LyricsSettings,
    ) -> anyhow::Result<Vec<SearchCandidate>>;

    async fn lyrics(&self, id: &str, settings: &LyricsSettings) -> anyhow::Result<Option<LyricsResult>>;
}

/// Turns a catalog into a provider by ranking its search results and
/// fetching lyrics for the best matches in order.
pub struct CatalogProvider<C> {
    name: String,
    catalog: C,
}

impl<C: LyricsCatalog> CatalogProvider<C> {
    pub fn new(name: impl Into<String>, catalog: C) -> Self {
        Self {
            name: name.into(),
            catalog,
        }
    }
}

#[async_trait]
impl<C: LyricsCatalog> LyricsProvider for CatalogProvider<C> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(
        &self,
        request: &LyricsRequest,
        settings: &LyricsSettings,
    ) -> anyhow::Result<Option<LyricsResult>> {
        let query = request.query();
        let results = self.catalog.search(&query, settings).await?;
        let total = results.len();

        let shortlist = rank_candidates(&query, results, settings.min_similarity, settings.max_candidates);
        tracing::debug!(
            provider = %self.name,
            total,
            kept = shortlist.len(),
            "ranked search results"
        );

        // Strictly in ranked order; the first candidate with lyrics wins.
        for scored in shortlist {
            let id = &scored.candidate.id;
            match self.catalog.lyrics(id, settings).await {
                Ok(Some(result)) if !result.lrc.trim().is_empty() => {
                    tracing::debug!(provider = %self.name, id = %id, ratio = scored.ratio, "lyrics found");
                    return Ok(Some(result));
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(provider = %self.name, id = %id, "lyrics fetch failed: {e:#}"),
            }
        }

        Ok(None)
    }
}

/// Ordered set of providers, unique by name.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: RwLock<Vec<Arc<dyn LyricsProvider>>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `provider`; a provider with the same name is not added twice.
    pub async fn register(&self, provider: Arc<dyn LyricsProvider>) -> bool {
        let mut providers = self.providers.write().await;
        if providers.iter().any(|p| p.name() == provider.name()) {
            return false;
        }
        providers.push(provider);
        true
    }

    pub async fn unregister(&self, name: &str) -> bool {
        let mut providers = self.providers.write().await;
        let before = providers.len();
        providers.retain(|p| p.name() != name);
        providers.len() != before
    }

    /// Providers in lookup order, detached from the lock.
    pub async fn snapshot(&self) -> Vec<Arc<dyn LyricsProvider>> {
        self.providers.read().await.clone()
    }
}

//! Netease Cloud Music lyrics client
//!
//! Talks to the public music.163.com web API:
//! - search: `/api/cloudsearch/pc`, songs under `result.songs`
//! - lyrics: `/api/song/lyric`, original in `lrc.lyric`, translation in
//!   `tlyric.lyric`, romanization in `romalrc.lyric`

use crate::config::LyricsSettings;
use crate::lyrics::rank::{SearchCandidate, TrackQuery};
use crate::service::{LyricsCatalog, LyricsResult};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CloudSearchResponse {
    result: Option<CloudSearchResult>,
}

#[derive(Debug, Deserialize)]
struct CloudSearchResult {
    #[serde(default)]
    songs: Vec<Song>,
}

#[derive(Debug, Deserialize)]
struct Song {
    id: i64,
    name: String,
    #[serde(rename = "alia", default)]
    aliases: Option<Vec<String>>,
    #[serde(rename = "ar", default)]
    artists: Option<Vec<Named>>,
    #[serde(rename = "al", default)]
    album: Option<Named>,
}

#[derive(Debug, Deserialize)]
struct Named {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LyricResponse {
    lrc: Option<LyricContent>,
    #[serde(rename = "tlyric")]
    translation: Option<LyricContent>,
    #[serde(rename = "romalrc")]
    romaji: Option<LyricContent>,
}

#[derive(Debug, Deserialize)]
struct LyricContent {
    lyric: Option<String>,
}

impl From<Song> for SearchCandidate {
    fn from(song: Song) -> Self {
        Self {
            id: song.id.to_string(),
            name: song.name,
            aliases: song.aliases.unwrap_or_default(),
            artists: song
                .artists
                .unwrap_or_default()
                .into_iter()
                .filter_map(|a| a.name)
                .collect(),
            album: song.album.and_then(|a| a.name).unwrap_or_default(),
        }
    }
}

impl LyricResponse {
    fn into_result(self) -> Option<LyricsResult> {
        let lrc = self.lrc.and_then(|c| c.lyric).filter(|l| !l.trim().is_empty())?;
        Some(LyricsResult {
            lrc,
            translation_lrc: self.translation.and_then(|c| c.lyric),
            romaji_lrc: self.romaji.and_then(|c| c.lyric),
        })
    }
}

/// Netease API client
#[derive(Debug, Clone)]
pub struct NeteaseClient {
    client: reqwest::Client,
    base_url: String,
}

impl NeteaseClient {
    const DEFAULT_BASE_URL: &'static str = "https://music.163.com";
    const USER_AGENT: &'static str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36 Edg/129.0.0.0";
    const SEARCH_LIMIT: u32 = 100;

    pub fn new() -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ORIGIN, HeaderValue::from_static("https://music.163.com"));
        headers.insert(REFERER, HeaderValue::from_static("https://music.163.com"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("X-Real-IP", HeaderValue::from_static("118.88.88.88"));

        let client = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .default_headers(headers)
            .build()
            .context("build reqwest client")?;

        Ok(Self {
            client,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at another host, e.g. a mirror.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// GET `url` and decode the JSON body. `None` on a non-2xx status.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        settings: &LyricsSettings,
    ) -> anyhow::Result<Option<T>> {
        let response = self
            .client
            .get(url)
            .timeout(settings.timeout)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), url, "netease request rejected");
            return Ok(None);
        }

        let value = response.json::<T>().await.context("parse netease json")?;
        Ok(Some(value))
    }
}

pub(crate) fn search_terms(query: &TrackQuery) -> String {
    [&query.title, &query.artist, &query.album]
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl LyricsCatalog for NeteaseClient {
    async fn search(
        &self,
        query: &TrackQuery,
        settings: &LyricsSettings,
    ) -> anyhow::Result<Vec<SearchCandidate>> {
        let url = format!(
            "{}/api/cloudsearch/pc?s={}&type=1&offset=0&limit={}",
            self.base_url,
            urlencoding::encode(&search_terms(query)),
            Self::SEARCH_LIMIT
        );

        let response: Option<CloudSearchResponse> = self.get_json(&url, settings).await?;
        let songs = response
            .and_then(|r| r.result)
            .map(|r| r.songs)
            .unwrap_or_default();
        Ok(songs.into_iter().map(SearchCandidate::from).collect())
    }

    async fn lyrics(&self, id: &str, settings: &LyricsSettings) -> anyhow::Result<Option<LyricsResult>> {
        let url = format!(
            "{}/api/song/lyric?id={}&lv=1&tv=1&rv=1",
            self.base_url,
            urlencoding::encode(id)
        );

        let response: Option<LyricResponse> = self.get_json(&url, settings).await?;
        Ok(response.and_then(LyricResponse::into_result))
    }
}

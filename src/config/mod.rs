use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Master switch; when off every lookup returns nothing.
    pub enabled: bool,
    pub netease: NeteaseConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NeteaseConfig {
    /// Companion lyrics to merge under the original: "none", "translation" or "romaji".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_lyrics: Option<String>,
    /// Minimum composite similarity (0..1) a search result needs to be considered.
    pub min_similarity: f64,
    /// How many ranked results to try before giving up (clamped to 1..=10).
    pub max_candidates: usize,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Older spelling of `sub_lyrics = "translation"`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub enable_translation: bool,
    /// Older spelling of `sub_lyrics = "romaji"`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub enable_romaji: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    pub capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            netease: NeteaseConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl Default for NeteaseConfig {
    fn default() -> Self {
        Self {
            sub_lyrics: None,
            min_similarity: 0.2,
            max_candidates: 3,
            timeout_ms: 8000,
            enable_translation: false,
            enable_romaji: false,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 600,
            capacity: 256,
        }
    }
}

/// Which companion transcript is shown under each original line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubLyricsMode {
    #[default]
    None,
    Romaji,
    Translation,
}

impl SubLyricsMode {
    /// Lenient parse of a user-supplied value; unknown values mean `None`.
    pub fn from_config_value(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "romaji" | "roma" | "rm" | "罗马字" => Self::Romaji,
            "translation" | "trans" | "tl" | "翻译" => Self::Translation,
            _ => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Romaji => "romaji",
            Self::Translation => "translation",
        }
    }
}

/// Resolved settings handed to the lookup layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LyricsSettings {
    pub enabled: bool,
    pub sub_lyrics: SubLyricsMode,
    pub min_similarity: f64,
    pub max_candidates: usize,
    pub timeout: Duration,
}

impl Default for LyricsSettings {
    fn default() -> Self {
        Config::default().lyrics_settings()
    }
}

impl NeteaseConfig {
    pub fn sub_lyrics_mode(&self) -> SubLyricsMode {
        match self.sub_lyrics.as_deref() {
            Some(raw) => SubLyricsMode::from_config_value(raw),
            None if self.enable_translation => SubLyricsMode::Translation,
            None if self.enable_romaji => SubLyricsMode::Romaji,
            None => SubLyricsMode::None,
        }
    }
}

impl Config {
    pub fn lyrics_settings(&self) -> LyricsSettings {
        LyricsSettings {
            enabled: self.enabled,
            sub_lyrics: self.netease.sub_lyrics_mode(),
            min_similarity: self.netease.min_similarity,
            max_candidates: self.netease.max_candidates,
            timeout: Duration::from_millis(self.netease.timeout_ms),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }
}

pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    write_config(cfg, &path)
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj = ProjectDirs::from("dev", "lrcmatch", "lrcmatch").context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        let cfg = Config::default();
        write_config(&cfg, &path).context("write default config")?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

fn write_config(cfg: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

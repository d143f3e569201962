use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use lrcmatch::config::{self, SubLyricsMode};
use lrcmatch::lyrics::{self, NeteaseClient};
use lrcmatch::service::{CatalogProvider, LyricsCatalog, LyricsRequest, LyricsService};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "lrcmatch", version, about = "Find synced lyrics for a track and merge translations")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Look up lyrics online and print them.
    Lookup {
        #[command(flatten)]
        track: TrackArgs,
        /// Companion lyrics for this lookup: none, translation, romaji.
        #[arg(long)]
        sub_lyrics: Option<String>,
    },
    /// Print ranked catalog matches without fetching lyrics.
    Search {
        #[command(flatten)]
        track: TrackArgs,
    },
    /// Merge local LRC files: the first is the original, the rest are companions.
    Merge {
        base: PathBuf,
        companions: Vec<PathBuf>,
    },
    /// Persist the companion lyrics mode in the config file.
    SubLyrics {
        /// none, translation or romaji
        mode: String,
    },
}

#[derive(Debug, Args)]
struct TrackArgs {
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "")]
    artist: String,
    #[arg(long, default_value = "")]
    album: String,
}

impl TrackArgs {
    fn request(&self) -> anyhow::Result<LyricsRequest> {
        LyricsRequest::from_track(&self.title, &self.artist, &self.album)
            .context("track title must not be blank")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;

    match cli.command {
        Command::Lookup { track, sub_lyrics } => {
            let request = track.request()?;
            let mut settings = cfg.lyrics_settings();
            if let Some(mode) = sub_lyrics {
                settings.sub_lyrics = SubLyricsMode::from_config_value(&mode);
            }

            let service = LyricsService::new(settings, cfg.cache.capacity, cfg.cache_ttl());
            let netease = NeteaseClient::new()?;
            service
                .register(Arc::new(CatalogProvider::new("netease", netease)))
                .await;

            match service.get_lyrics(&request).await {
                Some(text) => println!("{text}"),
                None => eprintln!("No lyrics found for \"{}\".", request.title),
            }
        }
        Command::Search { track } => {
            let query = track.request()?.query();
            let settings = cfg.lyrics_settings();
            let netease = NeteaseClient::new()?;
            let results = netease.search(&query, &settings).await.context("search netease")?;
            let ranked = lyrics::rank_candidates(
                &query,
                results,
                settings.min_similarity,
                settings.max_candidates,
            );
            print_candidates(&ranked);
        }
        Command::Merge { base, companions } => {
            let base_text = tokio::fs::read_to_string(&base)
                .await
                .with_context(|| format!("read {}", base.display()))?;
            let mut companion_texts = Vec::with_capacity(companions.len());
            for path in &companions {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("read {}", path.display()))?;
                companion_texts.push(text);
            }
            println!("{}", lyrics::merge_timelines(&base_text, &companion_texts));
        }
        Command::SubLyrics { mode } => {
            let parsed = SubLyricsMode::from_config_value(&mode);
            let mut cfg = cfg;
            cfg.netease.sub_lyrics = Some(parsed.as_str().to_string());
            config::save(&cfg, cli.config.as_deref()).context("save config")?;
            println!("Companion lyrics set to {}.", parsed.as_str());
        }
    }

    Ok(())
}

fn print_candidates(candidates: &[lyrics::ScoredCandidate]) {
    if candidates.is_empty() {
        eprintln!("No matching candidates.");
        return;
    }
    for (i, scored) in candidates.iter().enumerate() {
        let c = &scored.candidate;
        let artists = if c.artists.is_empty() {
            "".to_string()
        } else {
            format!(" - {}", c.artists.join(", "))
        };
        println!(
            "{:02}. {}{}  [{}]  (id={}, ratio={:.3})",
            i + 1,
            c.name,
            artists,
            c.album,
            c.id,
            scored.ratio
        );
    }
}

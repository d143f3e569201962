//! Rank catalog search results against the playing track.

use super::compare::{artist_similarity, similarity};

/// Upper bound on how many candidates are ever worth fetching lyrics for.
pub const MAX_CANDIDATES_LIMIT: usize = 10;

/// Metadata of the track we want lyrics for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackQuery {
    pub title: String,
    pub artist: String,
    pub album: String,
}

/// One search result as returned by a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCandidate {
    /// Provider-defined id used to fetch the lyrics
    pub id: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub artists: Vec<String>,
    pub album: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: SearchCandidate,
    /// Composite similarity in `[0, 1]`
    pub ratio: f64,
}

/// Composite score of `candidate` for `query`.
pub fn score(query: &TrackQuery, candidate: &SearchCandidate) -> f64 {
    let title_ratio = std::iter::once(&candidate.name)
        .chain(&candidate.aliases)
        .filter(|n| !n.trim().is_empty())
        .map(|n| similarity(&query.title, n))
        .reduce(f64::max)
        .unwrap_or(0.0);

    let artist_ratio = artist_similarity(&query.artist, &candidate.artists.join(" "));
    let album_ratio = similarity(&query.album, &candidate.album);

    (title_ratio * (artist_ratio + album_ratio) / 2.0).sqrt()
}

/// Score every candidate and keep the best `max_candidates` at or above
/// `min_similarity`, best first. Equal scores keep their input order.
pub fn rank_candidates(
    query: &TrackQuery,
    candidates: Vec<SearchCandidate>,
    min_similarity: f64,
    max_candidates: usize,
) -> Vec<ScoredCandidate> {
    let scored = candidates
        .into_iter()
        .map(|candidate| {
            let ratio = score(query, &candidate);
            ScoredCandidate { candidate, ratio }
        })
        .collect();
    shortlist(scored, min_similarity, max_candidates)
}

fn shortlist(
    scored: Vec<ScoredCandidate>,
    min_similarity: f64,
    max_candidates: usize,
) -> Vec<ScoredCandidate> {
    let mut kept: Vec<ScoredCandidate> = scored
        .into_iter()
        .filter(|c| c.ratio >= min_similarity)
        .collect();
    // sort_by is stable
    kept.sort_by(|a, b| b.ratio.total_cmp(&a.ratio));
    kept.truncate(max_candidates.clamp(1, MAX_CANDIDATES_LIMIT));
    kept
}

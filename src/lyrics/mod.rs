//! Lyrics matching and merging
//!
//! This module provides:
//! - text similarity for track metadata (`compare`)
//! - ranking of catalog search results (`rank`)
//! - LRC parsing into header lines and timed lines (`parser`)
//! - merging of original and companion transcripts (`merge`)
//! - a Netease catalog client (`netease`)
//!
//! Everything except `netease` is pure and synchronous.

pub mod compare;
pub mod merge;
pub mod netease;
pub mod parser;
pub mod rank;

pub use compare::{artist_similarity, similarity};
pub use merge::merge_timelines;
pub use netease::NeteaseClient;
pub use parser::{Timestamp, TimedLyrics};
pub use rank::{rank_candidates, ScoredCandidate, SearchCandidate, TrackQuery};

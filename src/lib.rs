//! Find lyrics for a playing track and merge translation/romanization
//! transcripts into one timeline.

pub mod config;
pub mod lyrics;
pub mod service;

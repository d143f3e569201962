//! LRC format parser
//!
//! Parses line-oriented timed lyrics:
//! [mm:ss.xx]Lyrics line here
//!
//! Example:
//! [ti:Test Song]
//! [00:12.34]Hello world
//! [00:15.00]Another line
//!
//! Lines that do not start with a timestamp (tags such as `[ar:...]`, plain
//! text, blank lines) are kept verbatim as header lines.

use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([0-9]+):([0-9]+)\.([0-9]+)\]").expect("timestamp regex")
});

/// A timestamp token exactly as it appeared in the source, e.g. `[01:23.456]`.
///
/// Ordering is chronological first and falls back to the token text, so
/// `[9:59.999]` sorts before `[10:00.000]` and two spellings of the same
/// instant stay distinct but deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    millis: u64,
    token: String,
}

impl Timestamp {
    /// Match a timestamp token at the start of `line`.
    pub fn parse_prefix(line: &str) -> Option<Self> {
        let caps = TIMESTAMP.captures(line)?;
        let token = caps.get(0)?.as_str();

        let minutes = parse_saturating(&caps[1]);
        let seconds = parse_saturating(&caps[2]);
        let fraction = fraction_millis(&caps[3]);

        let millis = minutes
            .saturating_mul(60_000)
            .saturating_add(seconds.saturating_mul(1_000))
            .saturating_add(fraction);

        Some(Self {
            millis,
            token: token.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    #[cfg(test)]
    fn millis(&self) -> u64 {
        self.millis
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

fn parse_saturating(digits: &str) -> u64 {
    digits.parse().unwrap_or(u64::MAX)
}

/// Read fractional-second digits as milliseconds: "5" -> 500, "34" -> 340, "3456" -> 345.
fn fraction_millis(digits: &str) -> u64 {
    digits
        .chars()
        .chain(std::iter::repeat('0'))
        .take(3)
        .filter_map(|c| c.to_digit(10))
        .fold(0, |acc, d| acc * 10 + u64::from(d))
}

/// Parsed timed lyrics: verbatim header lines plus one content line per timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimedLyrics {
    /// Non-timestamped lines, in source order
    pub headers: Vec<String>,
    /// Timestamped content, at most one entry per token
    pub lines: BTreeMap<Timestamp, String>,
}

impl TimedLyrics {
    /// Parse raw LRC text. Never fails; unusable input yields an empty document.
    ///
    /// A timestamp line with nothing after the token is dropped. When a token
    /// repeats, the later line replaces the earlier one.
    pub fn parse(content: &str) -> Self {
        let mut doc = Self::default();
        if content.trim().is_empty() {
            return doc;
        }

        for line in split_lines(content) {
            let Some(ts) = Timestamp::parse_prefix(line) else {
                doc.headers.push(line.to_string());
                continue;
            };

            let text = line[ts.as_str().len()..].trim();
            if !text.is_empty() {
                let text = text.to_string();
                doc.lines.insert(ts, text);
            }
        }

        doc
    }

    /// Content stored under the exact token text.
    #[cfg(test)]
    fn get(&self, token: &str) -> Option<&str> {
        let ts = Timestamp::parse_prefix(token)?;
        if ts.as_str() != token {
            return None;
        }
        self.lines.get(&ts).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Split on `\r\n`, `\n` or a lone `\r`. Breaks separate lines, so a
/// trailing break yields a final empty line and empty text yields one empty line.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let current = rest?;
        match current.find(['\r', '\n']) {
            Some(idx) => {
                let skip = if current[idx..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&current[idx + skip..]);
                Some(&current[..idx])
            }
            None => {
                rest = None;
                Some(current)
            }
        }
    })
}

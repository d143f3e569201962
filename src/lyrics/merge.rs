//! Merge an original LRC with its translation/romanization companions.
//!
//! At every timestamp the base line comes first, followed by companion lines
//! in the order the companions were given. Only the base contributes header
//! lines; companion headers are dropped.

use super::parser::{split_lines, Timestamp, TimedLyrics};
use std::collections::BTreeSet;

/// Merge `base` with `companions` into a single LRC text.
///
/// If no companion carries any timed line the base text is returned
/// untouched, byte for byte.
pub fn merge_timelines<S: AsRef<str>>(base: &str, companions: &[S]) -> String {
    let companions: Vec<TimedLyrics> = companions
        .iter()
        .map(|c| c.as_ref())
        .filter(|c| !c.trim().is_empty())
        .map(TimedLyrics::parse)
        .collect();
    if companions.iter().all(TimedLyrics::is_empty) {
        return base.to_string();
    }

    let base_doc = TimedLyrics::parse(base);

    // Header pass walks the raw base text so blank and tag lines keep their position.
    let mut out: Vec<String> = split_lines(base)
        .filter(|line| Timestamp::parse_prefix(line).is_none())
        .map(str::to_string)
        .collect();

    let timeline: BTreeSet<&Timestamp> = base_doc
        .lines
        .keys()
        .chain(companions.iter().flat_map(|c| c.lines.keys()))
        .collect();

    for ts in timeline {
        let original = base_doc
            .lines
            .get(ts)
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty());
        if let Some(text) = original {
            out.push(format!("{ts}{text}"));
        }

        for companion in &companions {
            let Some(extra) = companion.lines.get(ts).filter(|s| !s.trim().is_empty()) else {
                continue;
            };
            if Some(extra.as_str()) != original {
                out.push(format!("{ts}{extra}"));
            }
        }
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: &[&str] = &[];

    #[test]
    fn test_no_companions_returns_base() {
        let base = "[00:01.00]Hello\n[00:02.00]World";
        assert_eq!(merge_timelines(base, NONE), base);

        let quirky = "[ti:x]\r\n\r\n[00:01.00]  Hello  \r\n";
        assert_eq!(merge_timelines(quirky, NONE), quirky);
        assert_eq!(merge_timelines(quirky, &["", "  \n "]), quirky);
        assert_eq!(merge_timelines(quirky, &["[by:someone]\nno timestamps"]), quirky);
    }

    #[test]
    fn test_companion_after_base() {
        let merged = merge_timelines("[00:01.00]Hello", &["[00:01.00]Hola"]);
        assert_eq!(merged, "[00:01.00]Hello\n[00:01.00]Hola");
    }

    #[test]
    fn test_identical_companion_suppressed() {
        let merged = merge_timelines("[00:01.00]Hello", &["[00:01.00]Hello"]);
        assert_eq!(merged, "[00:01.00]Hello");
    }

    #[test]
    fn test_headers_and_union_of_timestamps() {
        let base = "[ti:Song]\n[00:02.00]two\n[ar:Someone]\n[00:01.00]one";
        let translation = "[by:translator]\n[00:01.00]uno\n[00:03.00]tres";
        let romaji = "[00:02.00]ni\n[00:01.00]ichi";

        let merged = merge_timelines(base, &[translation, romaji]);
        assert_eq!(
            merged,
            "[ti:Song]\n[ar:Someone]\n\
             [00:01.00]one\n[00:01.00]uno\n[00:01.00]ichi\n\
             [00:02.00]two\n[00:02.00]ni\n\
             [00:03.00]tres"
        );
    }

    #[test]
    fn test_variable_width_timestamps_sort_by_time() {
        let base = "[10:00.00]later\n[9:59.99]earlier";
        let merged = merge_timelines(base, &["[9:59.99]antes"]);
        assert_eq!(merged, "[9:59.99]earlier\n[9:59.99]antes\n[10:00.00]later");
    }

    #[test]
    fn test_companion_companion_duplicates_both_emitted() {
        let merged = merge_timelines("[00:01.00]Hello", &["[00:01.00]Hola", "[00:01.00]Hola"]);
        assert_eq!(merged, "[00:01.00]Hello\n[00:01.00]Hola\n[00:01.00]Hola");
    }

    #[test]
    fn test_trailing_break_keeps_empty_header_line() {
        let merged = merge_timelines("[ti:x]\n[00:01.00]Hello\n", &["[00:01.00]Hola\n"]);
        assert_eq!(merged, "[ti:x]\n\n[00:01.00]Hello\n[00:01.00]Hola");

        let crlf = merge_timelines("[00:01.00]Hello\r\n", &["[00:01.00]Hola"]);
        assert_eq!(crlf, "\n[00:01.00]Hello\n[00:01.00]Hola");
    }

    #[test]
    fn test_empty_base_lines_dropped() {
        let merged = merge_timelines("[00:01.00]\n[00:02.00]two", &["[00:01.00]uno"]);
        assert_eq!(merged, "[00:01.00]uno\n[00:02.00]two");
    }
}

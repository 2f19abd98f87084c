//! Sentence segmentation for streaming synthesis
//!
//! Splits free text into ordered speakable units on sentence-terminal
//! periods. Each non-empty unit gets its terminal period restored so the
//! synthesis engine keeps sentence prosody.

/// Split text into trimmed, period-terminated sentence units
///
/// Empty segments (consecutive periods, leading/trailing whitespace) are
/// dropped. The relative order of units matches the source text, and joining
/// the units reproduces the source modulo whitespace and empty segments.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split('.')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| format!("{segment}."))
        .collect()
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Assembly segmentation
//!
//! A single assembly letter may describe several roof areas ("Main Store
//! Roof", "Canopy Roofs", "Roof B", ...), each with its own layer stack. The
//! segmenter finds the section headers naming those areas and cuts the
//! document into one span per area.
//!
//! Roof-area names also show up in ordinary prose ("the canopy roofs will be
//! re-covered..."), so a candidate header only counts when it starts a line
//! (or sits in the first few characters of the document) or is closely
//! followed by one of the structural keywords that open an assembly block.

use regex::Regex;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::sync::LazyLock;

/// Candidates within this many bytes of the document start count as headers.
const LEADING_WINDOW: usize = 50;

/// Structural keywords must appear within this many bytes after a candidate.
const KEYWORD_WINDOW: usize = 100;

/// Keywords that open an assembly block (matched case-insensitively).
const STRUCTURAL_KEYWORDS: &[&str] = &["building height", "fm global", "deck:"];

/// Roof-area header families, most specific first.
///
/// When two families match at the same position the earlier one wins, so
/// "Main Store Roof" is never reported as a generic roof name.
static AREA_FAMILIES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\bmain\s+(?:store\s+|building\s+)?roofs?\b",
        r"(?i)\bcanopy\s+roofs?\b",
        r"(?i)\b(?:high|low)\s+roofs?\b",
        r"(?i)\b(?:office|warehouse|mezzanine|penthouse|addition|garden\s+center|auto\s+center|vestibule)\s+roofs?\b",
        r"\b(?i:roof\s+(?:area\s+|section\s+)?)[A-Z]\b",
        r"(?i)\b(?:roof\s+)?area\s+\d+[A-Za-z]?\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// One roof area's extent within a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssemblySpan<'a> {
    /// Header that opened the span; `None` for the single-span fallback
    pub name: Option<String>,
    /// Byte offset of `text` within the segmented document
    pub start: usize,
    /// The span's text
    pub text: &'a str,
}

impl<'a> AssemblySpan<'a> {
    /// Byte offset one past the end of the span
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// Accepted roof-area header
#[derive(Debug, Clone)]
struct Marker {
    start: usize,
    end: usize,
    family: usize,
    name: String,
}

/// Split a document into per-assembly spans.
///
/// Returns at least one span. With fewer than two distinct headers the whole
/// text becomes one unnamed span; otherwise each span runs from its header to
/// the next one, with any preamble before the first header folded into the
/// first span. The spans always concatenate back to `text`.
pub fn segment(text: &str) -> Vec<AssemblySpan<'_>> {
    let markers = find_markers(text);

    if markers.len() < 2 {
        return vec![AssemblySpan {
            name: None,
            start: 0,
            text,
        }];
    }

    let mut spans = Vec::with_capacity(markers.len());
    for (i, marker) in markers.iter().enumerate() {
        let start = if i == 0 { 0 } else { marker.start };
        let end = markers.get(i + 1).map_or(text.len(), |next| next.start);
        spans.push(AssemblySpan {
            name: Some(marker.name.clone()),
            start,
            text: &text[start..end],
        });
    }
    spans
}

/// Names of the roof areas found in `text`, in document order.
pub fn area_names(text: &str) -> Vec<String> {
    find_markers(text).into_iter().map(|m| m.name).collect()
}

fn find_markers(text: &str) -> Vec<Marker> {
    let mut candidates: Vec<Marker> = Vec::new();

    for (family, re) in AREA_FAMILIES.iter().enumerate() {
        for m in re.find_iter(text) {
            if is_header(text, m.start(), m.end()) {
                candidates.push(Marker {
                    start: m.start(),
                    end: m.end(),
                    family,
                    name: m.as_str().split_whitespace().collect::<Vec<_>>().join(" "),
                });
            }
        }
    }

    // Position first, then family priority for ties.
    candidates.sort_by_key(|c| (c.start, c.family));

    let mut seen: FxHashSet<String> = FxHashSet::default();
    let mut markers: Vec<Marker> = Vec::new();
    // End of the last header consumed, whether kept or dropped as a repeat
    let mut consumed_end = 0;
    for candidate in candidates {
        // A lower-priority family can match inside a header
        // ("Roof A" inside "Main Store Roof A..."); the outer header owns it.
        if candidate.start < consumed_end {
            continue;
        }
        consumed_end = candidate.end;
        if seen.insert(candidate.name.to_lowercase()) {
            markers.push(candidate);
        }
    }
    markers
}

fn is_header(text: &str, start: usize, end: usize) -> bool {
    starts_line(text, start) || followed_by_keyword(text, end)
}

fn starts_line(text: &str, start: usize) -> bool {
    if start < LEADING_WINDOW {
        return true;
    }
    let before = text[..start].trim_end_matches([' ', '\t']);
    before.is_empty() || before.ends_with('\n')
}

fn followed_by_keyword(text: &str, end: usize) -> bool {
    let mut limit = (end + KEYWORD_WINDOW).min(text.len());
    while !text.is_char_boundary(limit) {
        limit -= 1;
    }
    let window = text[end..limit].to_ascii_lowercase();
    STRUCTURAL_KEYWORDS.iter().any(|kw| window.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(text: &str, spans: &[AssemblySpan<'_>]) {
        let joined: String = spans.iter().map(|s| s.text).collect();
        assert_eq!(joined, text);
        for pair in spans.windows(2) {
            assert_eq!(pair[0].end(), pair[1].start);
        }
    }

    #[test]
    fn test_two_named_spans() {
        let text = "Main Store Roof\nBuilding Height: 24 ft\nDeck: Concrete\nCanopy Roofs\nDeck: Metal";
        let spans = segment(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].name.as_deref(), Some("Main Store Roof"));
        assert_eq!(spans[1].name.as_deref(), Some("Canopy Roofs"));
        assert!(spans[0].text.contains("Deck: Concrete"));
        assert!(!spans[0].text.contains("Deck: Metal"));
        assert!(spans[1].text.contains("Deck: Metal"));
        assert_covers(text, &spans);
    }

    #[test]
    fn test_single_marker_falls_back() {
        let text = "Main Store Roof\nDeck: Concrete\nMembrane: 60 mil TPO";
        let spans = segment(text);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, None);
        assert_eq!(spans[0].text, text);
    }

    #[test]
    fn test_no_markers() {
        let spans = segment("");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].name, None);
        assert_eq!(spans[0].text, "");
    }

    #[test]
    fn test_prose_mention_is_ignored() {
        let text = format!(
            "{}\nThe work includes the main store roof and all related flashing, coping, edge metal and accessories as described in detail throughout the remainder of this letter.\nRoof A\nDeck: Metal\nRoof B\nDeck: Concrete",
            "x".repeat(60)
        );
        let names = area_names(&text);
        assert_eq!(names, vec!["Roof A".to_string(), "Roof B".to_string()]);
    }

    #[test]
    fn test_keyword_acceptance_without_line_break() {
        let preamble = "p".repeat(80);
        let text = format!("{preamble} Roof A Deck: Metal. More text here. Roof B FM Global 1-90");
        let spans = segment(&text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].name.as_deref(), Some("Roof A"));
        assert!(spans[0].text.starts_with("ppp"));
        assert_covers(&text, &spans);
    }

    #[test]
    fn test_duplicate_names_first_wins() {
        let text = "Roof A\nDeck: Metal\nRoof A\nDeck: Metal again\nRoof C\nDeck: Wood";
        let spans = segment(text);
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].name.as_deref(), Some("Roof A"));
        assert!(spans[0].text.contains("Metal again"));
        assert_eq!(spans[1].name.as_deref(), Some("Roof C"));
        assert_covers(text, &spans);
    }

    #[test]
    fn test_area_numbers() {
        let text = "Main Roof\nDeck: Metal\nArea 2\nDeck: Concrete";
        let names = area_names(text);
        assert_eq!(names, vec!["Main Roof".to_string(), "Area 2".to_string()]);
    }

    #[test]
    fn test_nested_generic_name_is_absorbed() {
        let text = "Main Store Roof A\nDeck: Metal\nCanopy Roofs\nDeck: Wood";
        let names = area_names(text);
        assert_eq!(
            names,
            vec!["Main Store Roof".to_string(), "Canopy Roofs".to_string()]
        );
    }

    #[test]
    fn test_nested_name_inside_repeated_header_is_absorbed() {
        let text = "Main Store Roof A\nDeck: Metal\nCanopy Roofs\nDeck: Wood\nMain Store Roof A\nDeck: Concrete";
        let names = area_names(text);
        assert_eq!(
            names,
            vec!["Main Store Roof".to_string(), "Canopy Roofs".to_string()]
        );
        let spans = segment(text);
        assert_eq!(spans.len(), 2);
        assert!(spans[1].text.contains("Deck: Concrete"));
        assert_covers(text, &spans);
    }

    #[test]
    fn test_lowercase_letter_is_not_a_roof_name() {
        let text = "Roof a\nDeck: Metal\nRoof b\nDeck: Concrete";
        assert!(area_names(text).is_empty());
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Layer extractors: membrane, insulation, coverboards, vapor barrier, deck

use super::tables::split_product_attachment;
use super::{clean_value, compile, first_capture};
use crate::record::{ExtractedField, FieldKey, MAX_INSULATION, MAX_MEMBRANES};
use regex::Regex;
use smallvec::SmallVec;
use std::sync::LazyLock;

// Label separator: a colon, or a dash followed by whitespace ("Deck - Metal"),
// never a hyphen inside a word ("Coverboard-2").
macro_rules! sep {
    () => {
        r"\s*(?::|-\s)\s*"
    };
}

static MEMBRANE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        concat!(
            r"(?im)^[ \t]*(?:(?:(?:primary|base|cap|top)\s+)?(?:roof\s+)?membrane(?:\s*(?:layer\s*)?#?\d)?",
            r"|(?:base|cap|ply|interply)\s*sheet)",
            sep!(),
            r"([^\n]+)"
        ),
        r"(?i)\b(?:(?:(?:primary|base|cap|top)\s+)?(?:roof\s+)?membrane(?:\s*(?:layer\s*)?#?\d)?|(?:base|cap|ply|interply)\s*sheet)\s*:\s*([^\n]+)",
        r"(?i)(\b\d{2,3}\s*-?\s*mil\b[^\n]*?\b(?:TPO|PVC|EPDM|KEE)\b[^\n]*)",
    ])
});

static INSULATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        concat!(
            r"(?im)^[ \t]*(?:[A-Za-z0-9]+[ \t]+){0,2}insulation(?:\s*(?:layer\s*)?#?\d)?",
            sep!(),
            r"([^\n]+)"
        ),
        r"(?im)^[ \t]*(?:1st|2nd|3rd|first|second|third|base|top)\s+layer\s*(?::|-\s)?\s*([^\n]*?\b(?:polyiso(?:cyanurate)?|iso|eps|xps|expanded\s+polystyrene|extruded\s+polystyrene|mineral\s+wool|perlite|wood\s+fiber)\b[^\n]*)",
        r"(?i)\binsulation(?:\s*(?:layer\s*)?#?\d)?\s*:\s*([^\n]+)",
        r#"(?i)((?:\d+(?:\.\d+)?|\d+/\d+)\s*(?:"|in\.?|inch(?:es)?)\s*(?:thick\s+)?(?:polyiso(?:cyanurate)?|iso|eps|xps|mineral\s+wool)\b[^\n]*)"#,
    ])
});

static COVERBOARD_1_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        concat!(
            r"(?im)^[ \t]*(?:(?:top|upper|1st|first)\s+)?(?:cover\s*board|recover\s*board)(?:\s*(?:#|no\.?)?\s*1)?",
            sep!(),
            r"([^\n]+)"
        ),
        r#"(?i)((?:\d+/\d+|\d+(?:\.\d+)?)\s*(?:"|in\.?|inch(?:es)?)\s*(?:thick\s+)?(?:securock|dens\s*deck|gypsum|hd\s+polyiso|high\s+density\s+polyiso|fiberboard|dexcell|iso\s*gard\s*hd)\b[^\n]*)"#,
    ])
});

// Mid-line "Cover board:" label. Group 1 or 2 marks a lower board, which
// belongs to layer 2.
static RE_COVERBOARD_INLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:(bottom|lower|2nd|second|base)\s+|(?:top|upper|1st|first)\s+)?(?:re)?cover\s*board(\s*(?:#|no\.?)?\s*2)?(?:\s*(?:#|no\.?)?\s*1)?\s*:\s*([^\n]+)",
    )
    .unwrap()
});

static COVERBOARD_2_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        concat!(
            r"(?im)^[ \t]*(?:(?:bottom|lower|2nd|second|base)\s+(?:cover\s*board|recover\s*board)",
            r"|(?:cover\s*board|recover\s*board)\s*(?:#|no\.?)?\s*2)",
            sep!(),
            r"([^\n]+)"
        ),
        concat!(r"(?im)^[ \t]*(?:substrate|underlayment)\s+board", sep!(), r"([^\n]+)"),
        r"(?i)\b(?:(?:bottom|lower|2nd|second|base)\s+(?:cover\s*board|recover\s*board)|(?:cover\s*board|recover\s*board)\s*(?:#|no\.?)?\s*2)\s*:\s*([^\n]+)",
    ])
});

static VAPOR_BARRIER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        concat!(
            r"(?im)^[ \t]*(?:air\s*/\s*)?vapou?r\s+(?:barrier|retarder)(?:\s*/\s*air\s+barrier)?",
            sep!(),
            r"([^\n]+)"
        ),
        r"(?i)\b(?:air\s*/\s*)?vapou?r\s+(?:barrier|retarder)(?:\s*/\s*air\s+barrier)?\s*:\s*([^\n]+)",
        r"(?i)\b((?:vapair|v-force|blueskin\s+vp|sopravap|725\s*tr)\b[^\n]*)",
    ])
});

static DECK_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        concat!(
            r"(?im)^[ \t]*(?:roof\s+|structural\s+|existing\s+)?deck(?:\s*type|\s*/\s*slope|\s*&\s*slope)?",
            sep!(),
            r"([^\n]+)"
        ),
        concat!(r"(?im)^[ \t]*substrate", sep!(), r"([^\n]+)"),
        r"(?i)\b(?:roof\s+|structural\s+|existing\s+)?deck(?:\s*type|\s*/\s*slope|\s*&\s*slope)?\s*:\s*([^\n]+)",
        r"(?i)\b((?:\d{2}\s*(?:ga\.?|gauge)\s*)?(?:steel|metal|concrete|wood|plywood|osb|gypsum|tectum|lightweight\s+concrete)\s+(?:roof\s+)?deck\b[^\n]*)",
    ])
});

// The unanchored form needs whitespace before the label so "Deck/Slope:" is not
// read as a second slope statement.
static SLOPE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        concat!(r"(?im)^[ \t]*(?:roof\s+)?slope", sep!(), r"([^\n]+)"),
        r"(?i)\s(?:roof\s+)?slope\s*:\s*([^\n]+)",
    ])
});

static RE_ORDINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?:1st|2nd|3rd|first|second|third|base|bottom|middle|top)\s+layer\b\s*(?:of\s+)?(?::|-\s)?\s*|\(\d\)\s*)",
    )
    .unwrap()
});

static RE_DIMENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)^((?:\d+[\s-]+)?\d+(?:\.\d+)?(?:\s*/\s*\d+)?\s*(?:"|''|in\.|inch(?:es)?\b|in\b)(?:\s*thick\b)?)\s*"#,
    )
    .unwrap()
});

/// Split a leading dimension off a product description.
///
/// A leading ordinal ("1st layer:", "(2)") is discarded first. Returns the
/// remaining product and the dimension text, if any. When the dimension is
/// the whole description it stays as the product.
pub fn split_dimension(product: &str) -> (String, Option<String>) {
    let rest = match RE_ORDINAL.find(product) {
        Some(m) => &product[m.end()..],
        None => product,
    };

    let Some(caps) = RE_DIMENSION.captures(rest) else {
        return (rest.trim().to_string(), None);
    };
    let (whole, dimension) = match (caps.get(0), caps.get(1)) {
        (Some(whole), Some(dimension)) => (whole, dimension),
        _ => return (rest.trim().to_string(), None),
    };

    let remainder = rest[whole.end()..]
        .trim_start_matches(|c: char| matches!(c, ',' | '-') || c.is_whitespace())
        .trim();
    if remainder.is_empty() {
        return (rest.trim().to_string(), None);
    }
    (remainder.to_string(), Some(dimension.as_str().trim().to_string()))
}

/// Build a layer field from a captured line: attachment split, then dimension split.
fn layer_field(key: FieldKey, raw: &str, with_dimension: bool) -> Option<ExtractedField> {
    let (product, attachment) = split_product_attachment(raw);
    let (value, dimension) = if with_dimension {
        split_dimension(&product)
    } else {
        (product, None)
    };
    if value.is_empty() {
        return None;
    }
    Some(ExtractedField {
        key,
        value,
        attachment,
        dimension,
    })
}

/// All captures of the first pattern that matches anything, capped at `max`.
///
/// Each search resumes at the start of the previous value rather than after
/// it, so a second label on the same line ("Insulation: A Insulation: B")
/// is still found; [`clean_value`] cuts the first value at that label.
fn all_captures(patterns: &[Regex], text: &str, max: usize) -> Vec<String> {
    for re in patterns {
        let mut values = Vec::new();
        let mut pos = 0;
        while values.len() < max && pos <= text.len() {
            let Some(caps) = re.captures_at(text, pos) else {
                break;
            };
            let (Some(whole), Some(value)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            pos = if value.start() > whole.start() {
                value.start()
            } else {
                whole.end().max(whole.start() + 1)
            };
            while pos < text.len() && !text.is_char_boundary(pos) {
                pos += 1;
            }
            let value = clean_value(value.as_str());
            if !value.is_empty() {
                values.push(value);
            }
        }
        if !values.is_empty() {
            return values;
        }
    }
    Vec::new()
}

/// Membrane layers, top-most first as listed in the letter (at most 3).
pub fn extract_membrane(text: &str) -> SmallVec<[ExtractedField; MAX_MEMBRANES]> {
    all_captures(&MEMBRANE_PATTERNS, text, MAX_MEMBRANES)
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let keys = FieldKey::membrane(i + 1)?;
            layer_field(keys.value, raw, false)
        })
        .collect()
}

/// Insulation layers in listed order (at most 3).
pub fn extract_insulation(text: &str) -> SmallVec<[ExtractedField; MAX_INSULATION]> {
    all_captures(&INSULATION_PATTERNS, text, MAX_INSULATION)
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let keys = FieldKey::insulation(i + 1)?;
            layer_field(keys.value, raw, true)
        })
        .collect()
}

/// Coverboard `layer` (1 = board directly under the membrane, 2 = lower board).
pub fn extract_coverboard(text: &str, layer: usize) -> Option<ExtractedField> {
    let keys = FieldKey::coverboard(layer)?;
    let raw = match layer {
        1 => {
            let (labelled, product) = COVERBOARD_1_PATTERNS.split_at(1);
            first_capture(labelled, text)
                .or_else(|| inline_top_coverboard(text))
                .or_else(|| first_capture(product, text))?
        }
        2 => first_capture(&COVERBOARD_2_PATTERNS, text)?,
        _ => return None,
    };
    layer_field(keys.value, &raw, true)
}

fn inline_top_coverboard(text: &str) -> Option<String> {
    RE_COVERBOARD_INLINE
        .captures_iter(text)
        .filter(|caps| caps.get(1).is_none() && caps.get(2).is_none())
        .filter_map(|caps| caps.get(3).map(|m| clean_value(m.as_str())))
        .find(|value| !value.is_empty())
}

pub fn extract_vapor_barrier(text: &str) -> Option<ExtractedField> {
    let raw = first_capture(&VAPOR_BARRIER_PATTERNS, text)?;
    if raw.eq_ignore_ascii_case("none") || raw.eq_ignore_ascii_case("n/a") {
        return None;
    }
    layer_field(FieldKey::VaporBarrier, &raw, false)
}

/// Deck description, with a separate "Slope:" line merged in when the deck
/// line does not state the slope itself.
pub fn extract_deck_slope(text: &str) -> Option<ExtractedField> {
    let raw = first_capture(&DECK_PATTERNS, text)?;
    let mut field = layer_field(FieldKey::DeckSlope, &raw, false)?;

    if !field.value.to_ascii_lowercase().contains("slope") {
        if let Some(slope) = first_capture(&SLOPE_PATTERNS, text) {
            field.value = format!("{}, slope {}", field.value, slope);
        }
    }
    Some(field)
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thickness parsing
//!
//! Layer descriptions state thickness in several ways (`2.6" thick`, `1/2"`,
//! `1-1/2 inch`, `Insulation: 2`). The patterns below are tried in order and
//! the first one that yields a positive value wins. Text with no recognisable
//! dimension parses to `0.0`, which callers treat as "do not draw".

use regex::Regex;
use std::sync::LazyLock;

static RE_DECIMAL_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|[^\d/.])(\d+(?:\.\d+)?)\s*"?\s*(?:thick|inch|in\b)"#).unwrap()
});

static RE_FRACTION_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:(\d+)[\s-]+)?(\d+)\s*/\s*(\d+)\s*(?:"|in\b|inch)"#).unwrap()
});

static RE_BARE_INCHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\d+(?:\.\d+)?)\s*""#).unwrap());

static RE_COLON_FRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*(\d+)\s*/\s*(\d+)").unwrap());

static RE_COLON_DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*(\d+(?:\.\d+)?)\b").unwrap());

/// Thickness in inches, or `0.0` when none can be read.
pub fn extract_thickness(text: &str) -> f64 {
    decimal_with_unit(text)
        .or_else(|| fraction_with_unit(text))
        .or_else(|| single_capture(&RE_BARE_INCHES, text))
        .or_else(|| colon_fraction(text))
        .or_else(|| single_capture(&RE_COLON_DECIMAL, text))
        .filter(|t| t.is_finite() && *t > 0.0)
        .unwrap_or(0.0)
}

fn single_capture(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

fn decimal_with_unit(text: &str) -> Option<f64> {
    single_capture(&RE_DECIMAL_UNIT, text)
}

fn fraction_with_unit(text: &str) -> Option<f64> {
    let caps = RE_FRACTION_UNIT.captures(text)?;
    let whole: f64 = match caps.get(1) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0.0,
    };
    let numerator: f64 = caps.get(2)?.as_str().parse().ok()?;
    let denominator: f64 = caps.get(3)?.as_str().parse().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(whole + numerator / denominator)
}

fn colon_fraction(text: &str) -> Option<f64> {
    let caps = RE_COLON_FRACTION.captures(text)?;
    let numerator: f64 = caps.get(1)?.as_str().parse().ok()?;
    let denominator: f64 = caps.get(2)?.as_str().parse().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

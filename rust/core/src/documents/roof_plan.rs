// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roof plan sheets: areas, drains, slope

use super::PartialRecord;
use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::LazyLock;

static RE_SHEET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?i:sheet)(?:\s+(?i:no\.?|number))?\s*:?\s*([A-Z]{1,2}-?\d{1,3}(?:\.\d{1,2})?)\b").unwrap()
});

static RE_SCALE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)\bscale\s*:\s*([^\n]+)").unwrap());

static RE_AREA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?im)^[ \t]*([A-Za-z][A-Za-z0-9 #\-]*?)\s*[:=\-]?\s*([\d,]+(?:\.\d+)?)\s*(?:sf|s\.f\.|sq\.?\s*ft\.?|square\s+feet)(?:[^A-Za-z]|$)",
    )
    .unwrap()
});

static RE_DRAIN_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(?\b(\d{1,3})\)?\s+(?:new\s+|existing\s+)?(?:roof\s+|overflow\s+|primary\s+|secondary\s+)?drains?\b").unwrap()
});

static RE_DRAIN_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b((?:RD|OD)-?\d{1,3})\b").unwrap());

static RE_SLOPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(\d+/\d+|\d+(?:\.\d+)?)\s*(?:"|in\.?|inch(?:es)?)\s*(?:per|/)\s*(?:ft\.?|foot|')"#).unwrap()
});

fn parse_square_feet(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse().ok()
}

fn format_square_feet(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

pub(super) fn extract(text: &str, record: &mut PartialRecord) {
    if let Some(sheet) = RE_SHEET.captures(text).and_then(|c| c.get(1)) {
        record.push("sheet_number", sheet.as_str());
    }
    if let Some(scale) = RE_SCALE.captures(text).and_then(|c| c.get(1)) {
        record.push("scale", scale.as_str());
    }

    let mut areas_total = 0.0;
    let mut stated_total = None;
    let mut n = 0;
    for caps in RE_AREA_LINE.captures_iter(text) {
        let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let Some(square_feet) = parse_square_feet(value.as_str()) else {
            continue;
        };
        let name = name.as_str().trim();
        if name.to_ascii_lowercase().starts_with("total") {
            stated_total.get_or_insert(square_feet);
            continue;
        }
        n += 1;
        areas_total += square_feet;
        record.push(
            format!("roof_area_{n}"),
            format!("{}: {} SF", name, format_square_feet(square_feet)),
        );
    }
    if let Some(total) = stated_total.or((n > 0).then_some(areas_total)) {
        record.push("total_area_sf", format_square_feet(total));
    }

    let counted: u32 = RE_DRAIN_COUNT
        .captures_iter(text)
        .filter_map(|c| c.get(1)?.as_str().parse::<u32>().ok())
        .sum();
    let drains = if counted > 0 {
        counted as usize
    } else {
        RE_DRAIN_TAG
            .captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.as_str().replace('-', "")))
            .collect::<FxHashSet<_>>()
            .len()
    };
    if drains > 0 {
        record.push("drain_count", drains.to_string());
    }

    if let Some(slope) = RE_SLOPE.find(text) {
        record.push("slope", slope.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::super::DocumentKind;

    #[test]
    fn test_roof_plan_fields() {
        let text = "ROOF PLAN\n\
            Sheet: R-101\n\
            Scale: 1/16\" = 1'-0\"\n\
            Roof Area A: 42,000 SF\n\
            Roof Area B: 8,500 SF\n\
            Canopy = 1,200 sq ft\n\
            (6) roof drains, (2) overflow drains\n\
            Tapered insulation at 1/4\" per ft";
        let record = DocumentKind::RoofPlan.extract(text);
        assert_eq!(record.get("sheet_number"), Some("R-101"));
        assert_eq!(record.get("scale"), Some("1/16\" = 1'-0\""));
        assert_eq!(record.get("roof_area_1"), Some("Roof Area A: 42000 SF"));
        assert_eq!(record.get("roof_area_3"), Some("Canopy: 1200 SF"));
        assert_eq!(record.get("total_area_sf"), Some("51700"));
        assert_eq!(record.get("drain_count"), Some("8"));
        assert_eq!(record.get("slope"), Some("1/4\" per ft"));
    }

    #[test]
    fn test_stated_total_and_drain_tags() {
        let text = "Area 1: 10,000 SF\nArea 2: 5,000 SF\nTotal Roof Area: 15,500 SF\nRD-1 RD-2 RD2 OD-1";
        let record = DocumentKind::RoofPlan.extract(text);
        assert_eq!(record.get("total_area_sf"), Some("15500"));
        assert_eq!(record.get("drain_count"), Some("3"));
        assert_eq!(record.get("roof_area_2"), Some("Area 2: 5000 SF"));
        assert_eq!(record.get("roof_area_3"), None);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed vocabularies: manufacturers, system types, attachment methods

use super::{compile_table, prefix, MANUFACTURER_WINDOW, SYSTEM_TYPE_WINDOW};
use crate::normalize::normalize;
use regex::Regex;
use std::sync::LazyLock;

/// Returned by [`extract_manufacturer`] when no table entry matches.
pub const UNKNOWN_MANUFACTURER: &str = "Unknown";

/// Manufacturer name and the aliases that identify it. Order matters: letters
/// often name a second manufacturer's accessory, so the primary membrane
/// brands come first.
static MANUFACTURERS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    compile_table(&[
        ("Carlisle SynTec", r"(?i)\bcarlisle\b|\bsyntec\b|\bsure-weld\b|\bsure-seal\b"),
        ("Firestone Building Products", r"(?i)\bfirestone\b|\bultraply\b"),
        ("Holcim Elevate", r"(?i)\bholcim\b|\belevate\b"),
        ("GAF", r"\bGAF\b|(?i:\beverguard\b)"),
        ("Johns Manville", r"(?i)\bjohns\s+manville\b|\bJM\s+(?:TPO|PVC|EPDM)\b"),
        ("Versico", r"(?i)\bversico\b"),
        ("Sika Sarnafil", r"(?i)\bsarnafil\b|\bsika\b"),
        ("Mule-Hide", r"(?i)\bmule-?hide\b"),
        ("Tremco", r"(?i)\btremco\b"),
        ("Siplast", r"(?i)\bsiplast\b"),
        ("Polyglass", r"(?i)\bpolyglass\b"),
        ("Duro-Last", r"(?i)\bduro-?last\b"),
        ("IB Roof Systems", r"(?i)\bib\s+roof"),
        ("Soprema", r"(?i)\bsoprema\b"),
        ("Garland", r"(?i)\bgarland\b"),
        ("CertainTeed", r"(?i)\bcertainteed\b"),
    ])
});

/// Membrane system families, in priority order.
static SYSTEM_TYPES: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    compile_table(&[
        ("TPO", r"(?i)\bTPO\b|thermoplastic\s+polyolefin"),
        ("PVC", r"(?i)\bPVC\b|polyvinyl\s+chloride"),
        ("EPDM", r"(?i)\bEPDM\b"),
        ("SBS Modified Bitumen", r"(?i)\bSBS\b|modified\s+bitumen|\bmod\s*bit\b"),
        ("Built-Up", r"(?i)\bbuilt[-\s]up\b|\bBUR\b"),
    ])
});

/// Installation and attachment vocabulary, lower-case.
///
/// Brand-name fastening systems stay in their printed form once split off.
const ATTACHMENT_KEYWORDS: &[&str] = &[
    "mechanically fastened",
    "mechanically attached",
    "mech. fastened",
    "fully adhered",
    "self-adhered",
    "self adhered",
    "adhered",
    "induction welded",
    "heat welded",
    "rhinobond",
    "ballasted",
    "loose laid",
    "loosely laid",
    "fastened",
    "fasteners",
    "screws",
    "plates",
    "hp-x",
    "insulfast",
    "olybond",
    "flexible dash",
    "dash adhesive",
    "low-rise foam",
    "low rise foam",
    "foam adhesive",
    "adhesive",
    "hot asphalt",
    "mopped",
    "cold applied",
    "torch applied",
    "torched",
    "set in",
    "attached with",
    "secured with",
    "installed with",
];

/// Words left dangling at the end of a product once its attachment is cut off.
const CONNECTORS: &[&str] = &[" with", " and", " using", " by", " w/"];

/// Manufacturer named in the first 2000 characters, or [`UNKNOWN_MANUFACTURER`].
pub fn extract_manufacturer(text: &str) -> String {
    let window = prefix(text, MANUFACTURER_WINDOW);
    MANUFACTURERS
        .iter()
        .find(|(_, re)| re.is_match(window))
        .map_or(UNKNOWN_MANUFACTURER, |(name, _)| name)
        .to_string()
}

/// Membrane system family named in the first 1000 characters.
pub fn extract_system_type(text: &str) -> Option<String> {
    let window = prefix(text, SYSTEM_TYPE_WINDOW);
    SYSTEM_TYPES
        .iter()
        .find(|(_, re)| re.is_match(window))
        .map(|(name, _)| name.to_string())
}

/// Split a layer description into product and attachment method.
///
/// The earliest attachment keyword that starts a word after position 0 begins
/// the attachment. Without one, the whole text is the product.
pub fn split_product_attachment(text: &str) -> (String, Option<String>) {
    let lower = text.to_ascii_lowercase();

    let split_at = ATTACHMENT_KEYWORDS
        .iter()
        .filter_map(|kw| {
            lower
                .match_indices(kw)
                .map(|(pos, _)| pos)
                .find(|&pos| pos > 0 && starts_word(&lower, pos))
        })
        .min();

    let Some(pos) = split_at else {
        return (normalize(text), None);
    };

    let product = trim_connectors(&text[..pos]);
    if product.is_empty() {
        return (normalize(text), None);
    }

    let mut attachment = normalize(&text[pos..]);
    attachment = attachment
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';'))
        .to_string();
    if attachment.ends_with(')') && !attachment.contains('(') {
        attachment.pop();
    }
    (product, Some(attachment))
}

fn starts_word(lower: &str, pos: usize) -> bool {
    !lower.as_bytes()[pos - 1].is_ascii_alphanumeric()
}

fn trim_connectors(raw: &str) -> String {
    let mut product = normalize(raw);
    loop {
        let before = product.len();
        product = product
            .trim_end_matches(|c: char| matches!(c, ',' | ';' | ':' | '-' | '(') || c.is_whitespace())
            .to_string();
        let lower = product.to_ascii_lowercase();
        if let Some(connector) = CONNECTORS.iter().find(|c| lower.ends_with(*c)) {
            product.truncate(product.len() - connector.len());
        }
        if product.len() == before {
            return product;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manufacturer_priority() {
        assert_eq!(
            extract_manufacturer("Carlisle SynTec Systems\nSure-Weld TPO with GAF accessories"),
            "Carlisle SynTec"
        );
        assert_eq!(extract_manufacturer("GAF EverGuard TPO"), "GAF");
        assert_eq!(extract_manufacturer("Sarnafil G410"), "Sika Sarnafil");
        assert_eq!(extract_manufacturer("gaffer tape"), UNKNOWN_MANUFACTURER);
        assert_eq!(extract_manufacturer(""), UNKNOWN_MANUFACTURER);
    }

    #[test]
    fn test_manufacturer_window() {
        let text = format!("{}Carlisle", "x ".repeat(1200));
        assert_eq!(extract_manufacturer(&text), UNKNOWN_MANUFACTURER);
    }

    #[test]
    fn test_system_type_priority() {
        assert_eq!(extract_system_type("60 mil TPO over EPDM").as_deref(), Some("TPO"));
        assert_eq!(extract_system_type("Reinforced EPDM").as_deref(), Some("EPDM"));
        assert_eq!(
            extract_system_type("two-ply modified bitumen").as_deref(),
            Some("SBS Modified Bitumen")
        );
        assert_eq!(extract_system_type("4-ply BUR").as_deref(), Some("Built-Up"));
        assert_eq!(extract_system_type("metal panels"), None);
    }

    #[test]
    fn test_split_earliest_keyword() {
        let (product, attachment) =
            split_product_attachment("Sure-Weld TPO, mechanically fastened with HP-X fasteners");
        assert_eq!(product, "Sure-Weld TPO");
        assert_eq!(attachment.as_deref(), Some("mechanically fastened with HP-X fasteners"));
    }

    #[test]
    fn test_split_drops_connector() {
        let (product, attachment) = split_product_attachment("2.6\" Polyiso attached with OlyBond");
        assert_eq!(product, "2.6\" Polyiso");
        assert_eq!(attachment.as_deref(), Some("attached with OlyBond"));

        let (product, attachment) = split_product_attachment("1/2\" DensDeck set in adhesive");
        assert_eq!(product, "1/2\" DensDeck");
        assert_eq!(attachment.as_deref(), Some("set in adhesive"));
    }

    #[test]
    fn test_split_ignores_keyword_at_start_and_inside_words() {
        let (product, attachment) = split_product_attachment("Adhered membrane");
        assert_eq!(product, "Adhered membrane");
        assert_eq!(attachment, None);

        let (product, attachment) = split_product_attachment("Steel templates");
        assert_eq!(product, "Steel templates");
        assert_eq!(attachment, None);
    }

    #[test]
    fn test_split_parenthesised_attachment() {
        let (product, attachment) = split_product_attachment("Securock (fully adhered)");
        assert_eq!(product, "Securock");
        assert_eq!(attachment.as_deref(), Some("fully adhered"));
    }
}

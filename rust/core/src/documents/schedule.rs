// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Schedule of values (G703 continuation sheets)

use super::PartialRecord;
use regex::Regex;
use std::sync::LazyLock;

// Item number, description, then the first money column (scheduled value).
static RE_LINE_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(\d{1,3}(?:\.\d{1,2})?)[ \t]+([^\n]+?)[ \t]+\$?[ \t]*([\d,]+\.\d{2})\b").unwrap()
});

/// Parse a money amount to cents.
fn parse_cents(raw: &str) -> Option<i64> {
    let digits = raw.replace(',', "");
    let (dollars, cents) = digits.split_once('.')?;
    Some(dollars.parse::<i64>().ok()? * 100 + cents.parse::<i64>().ok()?)
}

fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

pub(super) fn extract(text: &str, record: &mut PartialRecord) {
    let mut total = 0i64;
    let mut n = 0;

    for caps in RE_LINE_ITEM.captures_iter(text) {
        let (Some(item), Some(description), Some(value)) = (caps.get(1), caps.get(2), caps.get(3)) else {
            continue;
        };
        let description = description.as_str().trim();
        if description.to_ascii_lowercase().starts_with("total") {
            continue;
        }
        let Some(cents) = parse_cents(value.as_str()) else {
            continue;
        };
        n += 1;
        total += cents;
        record.push(
            format!("line_{n}"),
            format!("{} | {} | {}", item.as_str(), description, format_cents(cents)),
        );
    }

    if n > 0 {
        record.push("total_scheduled_value", format_cents(total));
    }
}

#[cfg(test)]
mod tests {
    use super::super::DocumentKind;
    use super::*;

    #[test]
    fn test_schedule_lines_and_total() {
        let text = "CONTINUATION SHEET\n\
            1 Mobilization $12,500.00 $12,500.00\n\
            2 60 mil TPO membrane 145,000.50 0.00\n\
            3 Sheet metal flashing $8,250.25\n\
            Total 165,750.75";
        let record = DocumentKind::ScheduleOfValues.extract(text);
        assert_eq!(record.get("line_1"), Some("1 | Mobilization | 12500.00"));
        assert_eq!(record.get("line_2"), Some("2 | 60 mil TPO membrane | 145000.50"));
        assert_eq!(record.get("line_3"), Some("3 | Sheet metal flashing | 8250.25"));
        assert_eq!(record.get("line_4"), None);
        assert_eq!(record.get("total_scheduled_value"), Some("165750.75"));
    }

    #[test]
    fn test_cents() {
        assert_eq!(parse_cents("1,234.05"), Some(123405));
        assert_eq!(format_cents(123405), "1234.05");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(parse_cents("12"), None);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Owner/contractor agreements

use super::PartialRecord;
use crate::extract::{compile, extract_contractor, extract_date, extract_project_name};
use regex::Regex;
use std::sync::LazyLock;

static CONTRACT_SUM: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?i)\bcontract\s+sum\b[^$\n]{0,80}\$\s*([\d,]+(?:\.\d{2})?)",
        r"(?i)\bcontract\s+(?:amount|price|value)\b[^$\n]{0,40}\$\s*([\d,]+(?:\.\d{2})?)",
    ])
});

static OWNER: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?im)^[ \t]*(?:the\s+)?owner\s*:\s*([^\n]+)",
        r"(?i)\bbetween\s+(?:the\s+)?owner\s*:?\s*([^\n,(]+)",
    ])
});

static RE_PROJECT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^[ \t]*(?:the\s+)?project\s*:\s*([^\n]+)").unwrap());

static RE_RETAINAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bretainage\b[^%\n]{0,60}?(\d+(?:\.\d+)?)\s*%").unwrap()
});

fn first(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|re| re.captures(text).and_then(|c| c.get(1)))
        .map(|m| m.as_str().trim().to_string())
}

pub(super) fn extract(text: &str, record: &mut PartialRecord) {
    if let Some(sum) = first(&CONTRACT_SUM, text) {
        record.push("contract_sum", format!("${sum}"));
    }
    if let Some(owner) = first(&OWNER, text) {
        record.push("owner", owner);
    }
    if let Some(contractor) = extract_contractor(text) {
        record.push("contractor", contractor.value);
    }

    let project = RE_PROJECT_LINE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .or_else(|| extract_project_name(text).map(|f| f.value));
    if let Some(project) = project {
        record.push("project_name", project);
    }

    if let Some(date) = extract_date(text) {
        record.push("date", date.value);
    }
    if let Some(caps) = RE_RETAINAGE.captures(text) {
        if let Some(pct) = caps.get(1) {
            record.push("retainage", format!("{}%", pct.as_str()));
        }
    }
}

//! Line-name extraction rules for heterogeneous transit attribute data.
//!
//! Source datasets disagree on where a line identifier lives and what it
//! looks like, so each mode gets its own small rule set here. Aggregation
//! logic in the parent module never pattern-matches raw attribute text
//! itself; extending an agency table or a field chain happens in this file.

use std::cmp::Ordering;
use std::iter::Peekable;
use std::str::Chars;

/// Field precedence for free-text subway station line labels.
pub(super) const SUBWAY_STATION_FIELDS: &[&str] = &["trains", "lines", "name"];

/// Field precedence for subway track/route features.
pub(super) const SUBWAY_TRACK_FIELDS: &[&str] = &["route_id", "route_short", "name"];

/// Field precedence for bus route-line features.
pub(super) const BUS_ROUTE_FIELDS: &[&str] =
    &["route_id", "route_short_name", "route_short", "ref", "name"];

/// Fields carrying the provider's layer/source identifier on rail features.
pub(super) const RAIL_LAYER_FIELDS: &[&str] = &["layer", "source"];

/// Keyword table mapping layer-identifier substrings to rail agencies.
const RAIL_AGENCIES: &[(&str, &str)] = &[
    ("lirr", "LIRR"),
    ("mnr", "Metro-North"),
    ("njt", "NJ Transit"),
    ("amtrak", "Amtrak"),
    ("path", "PATH"),
];

/// Split a free-text station label into line codes.
///
/// Tokens are separated on whitespace and hyphens; a token qualifies as a
/// line code when it is uppercase alphanumeric and at most two characters,
/// which filters out noise words like "Station" or "Av".
pub(super) fn subway_line_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || c == '-')
        .filter(|token| is_line_code(token))
}

fn is_line_code(token: &str) -> bool {
    !token.is_empty()
        && token.len() <= 2
        && token
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Transit operator inferred from a layer/source identifier substring.
pub(super) fn rail_agency(layer_id: &str) -> Option<&'static str> {
    let lowered = layer_id.to_ascii_lowercase();
    RAIL_AGENCIES
        .iter()
        .find(|(needle, _)| lowered.contains(needle))
        .map(|(_, agency)| *agency)
}

/// Canonical bus route name: the first whitespace token when it looks like a
/// short route code (1-5 characters), otherwise the full label unmodified.
pub(super) fn bus_route_name(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let first = raw.split_whitespace().next()?;
    if (1..=5).contains(&first.len()) {
        Some(first.to_string())
    } else {
        Some(raw.to_string())
    }
}

/// Numeric-aware ordering so "9" sorts before "10" and "B41" before "B100".
///
/// Digit runs compare as numbers, everything else byte-wise.
pub(super) fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                if l.is_ascii_digit() && r.is_ascii_digit() {
                    let left_number = take_number(&mut left);
                    let right_number = take_number(&mut right);
                    match left_number.cmp(&right_number) {
                        Ordering::Equal => {}
                        other => return other,
                    }
                } else {
                    match l.cmp(&r) {
                        Ordering::Equal => {
                            left.next();
                            right.next();
                        }
                        other => return other,
                    }
                }
            }
        }
    }
}

fn take_number(chars: &mut Peekable<Chars<'_>>) -> u64 {
    let mut value = 0u64;
    while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
        value = value.saturating_mul(10).saturating_add(u64::from(digit));
        chars.next();
    }
    value
}

//! dblp search API response parsing.
//!
//! Turns one JSON result document into [`Hit`]s and then into one [`Row`] per
//! (hit, author) pair. Malformed hits are skipped and counted rather than
//! failing the whole page.

use crate::error::{DblpError, OptionExt, Result};
use crate::table::Row;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A publication as returned by the search API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    /// Authors in listed order
    pub authors: Vec<String>,
    /// Venue label as dblp spells it
    pub venue: String,
    pub year: u16,
}

/// How hit venues become venue column labels.
#[derive(Debug, Clone, Copy)]
pub enum ParseMode<'a> {
    /// Keep the raw venue string.
    Conference,
    /// Rename dblp journal display names to short codes; unknown names pass through.
    Journal(&'a BTreeMap<String, String>),
}

impl ParseMode<'_> {
    pub fn label(&self, venue: &str) -> String {
        match self {
            ParseMode::Conference => venue.to_string(),
            ParseMode::Journal(lookup) => lookup
                .get(venue)
                .cloned()
                .unwrap_or_else(|| venue.to_string()),
        }
    }
}

/// One parsed response page
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Total hits the server reports for the query (all pages)
    pub total: usize,
    /// Well-formed hits on this page
    pub hits: Vec<Hit>,
    /// Hits dropped for missing or invalid fields
    pub skipped: usize,
}

impl SearchPage {
    /// One row per (hit, author) pair, in hit order then author order.
    pub fn rows(&self, mode: ParseMode<'_>) -> Vec<Row> {
        self.hits
            .iter()
            .flat_map(|hit| {
                let label = mode.label(&hit.venue);
                hit.authors
                    .iter()
                    .map(move |author| Row::appearance(author.clone(), label.clone(), hit.year))
            })
            .collect()
    }
}

// === dblp API Response Types ===

#[derive(Debug, Deserialize)]
struct Envelope {
    result: Option<ResultBody>,
}

#[derive(Debug, Deserialize)]
struct ResultBody {
    hits: Option<HitsBody>,
}

#[derive(Debug, Deserialize)]
struct HitsBody {
    #[serde(rename = "@total")]
    total: Option<serde_json::Value>,
    #[serde(default)]
    hit: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    info: HitInfo,
}

#[derive(Debug, Deserialize)]
struct HitInfo {
    authors: Option<RawAuthors>,
    venue: Option<OneOrMany<String>>,
    year: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAuthors {
    author: OneOrMany<RawAuthor>,
}

#[derive(Debug, Deserialize)]
struct RawAuthor {
    text: String,
}

/// dblp collapses single-element arrays into a bare value.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v],
            OneOrMany::Many(v) => v,
        }
    }
}

/// Parse a search API JSON document.
///
/// # Errors
///
/// Returns `Parse` when the body is not a dblp result document or the
/// declared total is missing.
pub fn parse_search_page(body: &str) -> Result<SearchPage> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| DblpError::Parse(format!("Failed to parse dblp response: {}", e)))?;

    let hits = envelope
        .result
        .ok_or_parse("response has no result object")?
        .hits
        .ok_or_parse("response has no hits object")?;

    let total = hits
        .total
        .as_ref()
        .and_then(value_to_count)
        .ok_or_parse("hits object has no usable @total")?;

    let mut page = SearchPage {
        total,
        ..Default::default()
    };

    for (index, raw) in hits.hit.into_iter().enumerate() {
        match parse_hit(raw) {
            Ok(hit) => page.hits.push(hit),
            Err(reason) => {
                warn!(index, reason = %reason, "Skipping malformed hit");
                page.skipped += 1;
            }
        }
    }

    debug!(total, parsed = page.hits.len(), skipped = page.skipped, "Parsed dblp page");
    Ok(page)
}

fn parse_hit(raw: serde_json::Value) -> std::result::Result<Hit, String> {
    let raw: RawHit = serde_json::from_value(raw).map_err(|e| e.to_string())?;
    let info = raw.info;

    let authors: Vec<String> = info
        .authors
        .ok_or("no authors")?
        .author
        .into_vec()
        .into_iter()
        .map(|a| a.text)
        .filter(|a| !a.trim().is_empty())
        .collect();
    if authors.is_empty() {
        return Err("empty author list".to_string());
    }

    let venue = info
        .venue
        .and_then(|v| v.into_vec().into_iter().next())
        .filter(|v| !v.trim().is_empty())
        .ok_or("no venue")?;

    let year_text = info.year.ok_or("no year")?;
    let year = year_text
        .trim()
        .parse::<u16>()
        .map_err(|_| format!("invalid year {:?}", year_text))?;

    Ok(Hit {
        authors,
        venue,
        year,
    })
}

/// dblp sends counts as strings; accept numbers too.
fn value_to_count(val: &serde_json::Value) -> Option<usize> {
    match val {
        serde_json::Value::String(s) => s.trim().parse().ok(),
        serde_json::Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        _ => None,
    }
}

//! Author name counting over local text dumps.
//!
//! The input files are copies of conference author listings: each paper has a
//! title line followed by an author line such as
//! `Jane Doe, John Smith, Ann Lee:`. Only lines containing a comma are kept.
//! Names are recovered by sliding a two-token window over the joined lines
//! and dropping windows that straddle a comma.

use crate::error::Result;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Keep author-list lines (those with a comma), joined by single spaces.
pub fn author_lines(text: &str) -> String {
    text.lines()
        .filter(|line| line.contains(','))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A two-token window accepted as a full name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCandidate {
    /// Name with trailing `:`/`,` removed
    pub name: String,
    /// No comma after the name, so it closed its author list
    pub last_author: bool,
}

/// Judge one bigram. A first token ending in `,` means the window spans two
/// different people and the bigram is rejected.
pub fn classify_bigram(first: &str, second: &str) -> Option<NameCandidate> {
    if first.ends_with(',') {
        return None;
    }

    Some(NameCandidate {
        name: format!("{} {}", first, second)
            .trim_end_matches([':', ','])
            .to_string(),
        last_author: !second.ends_with(','),
    })
}

/// Name occurrences in one source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameCounts {
    pub names: HashMap<String, u32>,
    pub last_authors: HashMap<String, u32>,
}

/// Count every accepted bigram of a whitespace-tokenized blob.
pub fn count_authors(blob: &str) -> NameCounts {
    let tokens: Vec<&str> = blob.split_whitespace().collect();
    let mut counts = NameCounts::default();

    for pair in tokens.windows(2) {
        if let Some(candidate) = classify_bigram(pair[0], pair[1]) {
            if candidate.last_author {
                *counts.last_authors.entry(candidate.name.clone()).or_insert(0) += 1;
            }
            *counts.names.entry(candidate.name).or_insert(0) += 1;
        }
    }

    counts
}

/// Counts accumulated across several labelled sources.
#[derive(Debug, Clone, Default)]
pub struct NameTally {
    labels: Vec<String>,
    totals: HashMap<String, u32>,
    last_authors: HashMap<String, u32>,
    /// Labels each name appeared under, once per occurrence
    sources: HashMap<String, Vec<String>>,
}

impl NameTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source labels in the order they were added.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn add_source(&mut self, label: &str, counts: &NameCounts) {
        if !self.labels.iter().any(|l| l == label) {
            self.labels.push(label.to_string());
        }

        for (name, n) in &counts.names {
            *self.totals.entry(name.clone()).or_insert(0) += n;
            let tags = self.sources.entry(name.clone()).or_default();
            tags.extend(std::iter::repeat(label.to_string()).take(*n as usize));
        }
        for (name, n) in &counts.last_authors {
            *self.last_authors.entry(name.clone()).or_insert(0) += n;
        }
    }

    /// Read one dump file; its label is the file stem, e.g. `CVPR2017`.
    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let counts = count_authors(&author_lines(&text));
        debug!(label = %label, names = counts.names.len(), "Counted names");
        self.add_source(&label, &counts);
        Ok(())
    }

    /// Names seen at least `min_count` times across all sources, most
    /// frequent first, ties by name.
    pub fn report(&self, min_count: u32) -> NameReport {
        let mut rows: Vec<NameRow> = self
            .totals
            .iter()
            .filter(|(_, &total)| total >= min_count)
            .map(|(name, &total)| {
                let tags = self.sources.get(name).map(Vec::as_slice).unwrap_or(&[]);
                NameRow {
                    name: name.clone(),
                    full_count: total,
                    search_term: format!("{} scholar", name),
                    last_authors_count: self.last_authors.get(name).copied().unwrap_or(0),
                    appeared: self
                        .labels
                        .iter()
                        .map(|label| tags.iter().any(|t| t.eq_ignore_ascii_case(label)))
                        .collect(),
                }
            })
            .collect();

        rows.sort_by(|a, b| b.full_count.cmp(&a.full_count).then_with(|| a.name.cmp(&b.name)));
        info!(names = self.totals.len(), kept = rows.len(), min_count, "Built name report");

        NameReport {
            labels: self.labels.clone(),
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameRow {
    pub name: String,
    pub full_count: u32,
    pub search_term: String,
    pub last_authors_count: u32,
    /// One flag per report label
    pub appeared: Vec<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct NameReport {
    pub labels: Vec<String>,
    pub rows: Vec<NameRow>,
}

//! Pipeline configuration.
//!
//! Every stage receives a [`PipelineConfig`] explicitly. The defaults reproduce
//! the venue lists the scraper has always used; a JSON file can override any
//! subset of fields.

use crate::error::{DblpError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::info;

/// Default dblp mirror
pub const DEFAULT_BASE_URL: &str = "https://dblp.org";

/// Maximum hits returned by one search API request
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// A venue and the first year to scrape it from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueStart {
    pub name: String,
    pub start_year: u16,
    /// dblp stream key when it differs from the lowercased name (journals only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dblp_key: Option<String>,
}

impl VenueStart {
    pub fn new(name: &str, start_year: u16) -> Self {
        Self {
            name: name.to_string(),
            start_year,
            dblp_key: None,
        }
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.dblp_key = Some(key.to_string());
        self
    }

    /// Key used in dblp URLs, e.g. `pami` for TPAMI.
    pub fn dblp_key(&self) -> String {
        self.dblp_key
            .clone()
            .unwrap_or_else(|| self.name.to_lowercase())
    }
}

/// How the aggregator walks result pages for one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaginationPolicy {
    /// First page, then at most one more at offset `page_size + 1`.
    /// Totals above twice the page size are reported as truncated.
    #[default]
    TwoPage,
    /// Keep requesting pages until the declared total is covered.
    Exhaustive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// dblp base URL (no trailing slash needed)
    pub base_url: String,
    /// Hits requested per search API call
    pub page_size: usize,
    /// Exclusive upper bound for scraped years
    pub end_year: u16,
    /// Conferences in scrape order
    pub conferences: Vec<VenueStart>,
    /// Journals (short code) in scrape order
    pub journals: Vec<VenueStart>,
    /// dblp journal display name -> short code
    pub journal_names: BTreeMap<String, String>,
    pub pagination: PaginationPolicy,
    /// Extra attempts for retryable transport failures
    pub max_retries: u32,
    /// Per-request timeout; `None` waits forever
    pub timeout_secs: Option<u64>,
    /// Minimum total occurrences for the name tokenizer report
    pub min_name_count: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let conferences = [
            ("NeurIPS", 2018),
            ("NIPS", 1987),
            ("ICLR", 2013),
            ("CVPR", 1988),
            ("ECCV", 1990),
            ("ICCV", 1988),
            ("ICRA", 1984),
            ("IROS", 1988),
            ("IJCAI", 1969),
            ("KDD", 1994),
            ("ICML", 1988),
        ];
        let journals = [
            VenueStart::new("TPAMI", 1979).with_key("pami"),
            VenueStart::new("TKDE", 1989),
            VenueStart::new("JMLR", 2003),
        ];
        let journal_names = [
            ("IEEE Trans. Pattern Anal. Mach. Intell.", "TPAMI"),
            ("IEEE Trans. Knowl. Data Eng.", "TKDE"),
            ("J. Mach. Learn. Res.", "JMLR"),
        ];

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            end_year: 2021,
            conferences: conferences
                .iter()
                .map(|(name, year)| VenueStart::new(name, *year))
                .collect(),
            journals: journals.to_vec(),
            journal_names: journal_names
                .iter()
                .map(|(full, code)| (full.to_string(), code.to_string()))
                .collect(),
            pagination: PaginationPolicy::default(),
            max_retries: 3,
            timeout_secs: Some(30),
            min_name_count: 15,
        }
    }
}

impl PipelineConfig {
    /// Load a config from a JSON file. Absent fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        info!(path = %path.display(), "Loaded pipeline config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(DblpError::Config("page_size must be positive".to_string()));
        }

        let mut seen = HashSet::new();
        for venue in self.conferences.iter().chain(&self.journals) {
            if venue.start_year >= self.end_year {
                return Err(DblpError::Config(format!(
                    "{} starts in {} but end_year is {}",
                    venue.name, venue.start_year, self.end_year
                )));
            }
            if !seen.insert(venue.name.as_str()) {
                return Err(DblpError::Config(format!(
                    "venue {} is configured twice",
                    venue.name
                )));
            }
        }

        Ok(())
    }

    /// Venue columns in export order: journals first, then conferences.
    pub fn venue_columns(&self) -> Vec<String> {
        let mut columns = self.journal_columns();
        columns.extend(self.conference_columns());
        columns
    }

    pub fn conference_columns(&self) -> Vec<String> {
        self.conferences.iter().map(|v| v.name.clone()).collect()
    }

    pub fn journal_columns(&self) -> Vec<String> {
        self.journals.iter().map(|v| v.name.clone()).collect()
    }
}

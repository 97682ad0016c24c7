//! Per-query run report.
//!
//! A harvest never aborts on one failed query. Each venue/year (or journal
//! volume) gets a [`QueryOutcome`] and the report is summarized at the end.

use chrono::{DateTime, Local};
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    Success,
    /// Some data came back but not all of it
    Partial(String),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    /// e.g. `ICML2020` or `TPAMI vol. 42`
    pub label: String,
    pub status: QueryStatus,
    pub rows: usize,
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Local>,
    pub outcomes: Vec<QueryOutcome>,
}

impl Default for RunReport {
    fn default() -> Self {
        Self {
            started_at: Local::now(),
            outcomes: Vec::new(),
        }
    }
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, label: impl Into<String>, rows: usize) {
        self.push(label.into(), QueryStatus::Success, rows);
    }

    pub fn partial(&mut self, label: impl Into<String>, reason: impl Into<String>, rows: usize) {
        self.push(label.into(), QueryStatus::Partial(reason.into()), rows);
    }

    pub fn failure(&mut self, label: impl Into<String>, error: impl fmt::Display) {
        self.push(label.into(), QueryStatus::Failure(error.to_string()), 0);
    }

    fn push(&mut self, label: String, status: QueryStatus, rows: usize) {
        self.outcomes.push(QueryOutcome { label, status, rows });
    }

    /// Append another report's outcomes.
    pub fn merge(&mut self, other: RunReport) {
        self.outcomes.extend(other.outcomes);
    }

    pub fn successes(&self) -> usize {
        self.count(|s| matches!(s, QueryStatus::Success))
    }

    pub fn partials(&self) -> usize {
        self.count(|s| matches!(s, QueryStatus::Partial(_)))
    }

    pub fn failures(&self) -> usize {
        self.count(|s| matches!(s, QueryStatus::Failure(_)))
    }

    fn count(&self, pred: impl Fn(&QueryStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    /// Log every non-successful outcome and a one-line summary.
    pub fn log_summary(&self) {
        for outcome in &self.outcomes {
            match &outcome.status {
                QueryStatus::Success => {}
                QueryStatus::Partial(reason) => {
                    warn!(label = %outcome.label, rows = outcome.rows, reason = %reason, "Partial");
                }
                QueryStatus::Failure(error) => {
                    warn!(label = %outcome.label, error = %error, "Failed");
                }
            }
        }

        info!(
            queries = self.outcomes.len(),
            success = self.successes(),
            partial = self.partials(),
            failed = self.failures(),
            elapsed_secs = (Local::now() - self.started_at).num_seconds(),
            "Harvest finished"
        );
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} queries: {} ok, {} partial, {} failed",
            self.outcomes.len(),
            self.successes(),
            self.partials(),
            self.failures()
        )?;
        for outcome in &self.outcomes {
            match &outcome.status {
                QueryStatus::Success => {}
                QueryStatus::Partial(reason) => {
                    writeln!(f, "  partial  {} ({} rows): {}", outcome.label, outcome.rows, reason)?
                }
                QueryStatus::Failure(error) => writeln!(f, "  failed   {}: {}", outcome.label, error)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_display() {
        let mut report = RunReport::new();
        report.success("ICML2019", 120);
        report.partial("ICML2020", "2 malformed hits skipped", 98);
        report.failure("ICML2021", "HTTP 404: https://dblp.org");

        assert_eq!(report.successes(), 1);
        assert_eq!(report.partials(), 1);
        assert_eq!(report.failures(), 1);

        let text = report.to_string();
        assert!(text.starts_with("3 queries: 1 ok, 1 partial, 1 failed"));
        assert!(text.contains("partial  ICML2020 (98 rows): 2 malformed hits skipped"));
        assert!(text.contains("failed   ICML2021"));
        assert!(!text.contains("ICML2019"));
    }

    #[test]
    fn test_merge() {
        let mut a = RunReport::new();
        a.success("CVPR2020", 1);
        let mut b = RunReport::new();
        b.failure("TPAMI vol. 42", "timeout");
        a.merge(b);
        assert_eq!(a.outcomes.len(), 2);
        assert_eq!(a.failures(), 1);
    }
}

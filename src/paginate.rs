//! Pagination aggregator.
//!
//! The search API caps every response at `page_size` hits. The aggregator
//! reads the declared total from the first page and requests further pages
//! according to the configured [`PaginationPolicy`].

use crate::client::{DblpClient, Fetcher};
use crate::config::PaginationPolicy;
use crate::error::Result;
use crate::parser::ParseMode;
use crate::table::Row;
use tracing::{debug, warn};

/// Everything retrieved for one query
#[derive(Debug, Clone, Default)]
pub struct Harvested {
    pub rows: Vec<Row>,
    /// Total hits declared by the server
    pub total: usize,
    /// Hits actually parsed across all pages
    pub hits: usize,
    /// Number of HTTP requests issued
    pub requests: usize,
    /// Malformed hits dropped by the parser
    pub skipped: usize,
    /// Hits beyond the last requested page were not retrieved
    pub truncated: bool,
}

impl Harvested {
    fn absorb(&mut self, page: crate::parser::SearchPage, mode: ParseMode<'_>) {
        self.requests += 1;
        self.skipped += page.skipped;
        self.hits += page.hits.len();
        self.rows.extend(page.rows(mode));
    }
}

/// Retrieve every page of `query` that `policy` allows.
pub async fn fetch_all<F: Fetcher>(
    client: &DblpClient<F>,
    query: &str,
    mode: ParseMode<'_>,
    policy: PaginationPolicy,
) -> Result<Harvested> {
    let page_size = client.page_size();

    let first = client.search(query, 0).await?;
    let total = first.total;
    debug!(query, total, "First page");

    let mut harvested = Harvested {
        total,
        ..Default::default()
    };
    harvested.absorb(first, mode);

    if total == 0 {
        return Ok(harvested);
    }

    match policy {
        PaginationPolicy::TwoPage => {
            if total > page_size {
                let second = client.search(query, page_size + 1).await?;
                harvested.absorb(second, mode);
            }
            if total > page_size.saturating_mul(2) {
                harvested.truncated = true;
                warn!(
                    query,
                    total,
                    retrieved = harvested.hits,
                    "More hits than two pages hold, the rest were not retrieved"
                );
            }
        }
        PaginationPolicy::Exhaustive => {
            let mut offset = page_size;
            while offset < total {
                let page = client.search(query, offset).await?;
                harvested.absorb(page, mode);
                offset = offset.saturating_add(page_size);
            }
        }
    }

    Ok(harvested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::StubFetcher;
    use crate::config::PipelineConfig;
    use crate::error::DblpError;
    use crate::parser::tests::response;
    use std::time::Duration;

    /// Client with a tiny page size so multi-page totals stay small.
    fn client(page_size: usize, replies: Vec<Result<String>>) -> DblpClient<StubFetcher> {
        let config = PipelineConfig {
            page_size,
            ..Default::default()
        };
        DblpClient::new(StubFetcher::new(replies), &config).with_backoff(Duration::ZERO)
    }

    fn page(total: usize, authors: &[&str]) -> Result<String> {
        let hits: Vec<(&[&str], &str, &str)> = authors
            .iter()
            .map(|a| (std::slice::from_ref(a), "ICML", "2020"))
            .collect();
        Ok(response(total, &hits))
    }

    #[tokio::test]
    async fn test_single_request_when_total_fits() -> Result<()> {
        let dblp = client(3, vec![page(3, &["A", "B", "C"])]);
        let got = fetch_all(&dblp, "q", ParseMode::Conference, PaginationPolicy::TwoPage).await?;

        assert_eq!(got.requests, 1);
        assert_eq!(dblp.fetcher().request_count(), 1);
        assert_eq!(got.rows.len(), 3);
        assert!(!got.truncated);
        Ok(())
    }

    #[tokio::test]
    async fn test_two_requests_when_total_exceeds_page() -> Result<()> {
        let dblp = client(3, vec![page(5, &["A", "B", "C"]), page(5, &["D", "E"])]);
        let got = fetch_all(&dblp, "q", ParseMode::Conference, PaginationPolicy::TwoPage).await?;

        assert_eq!(got.requests, 2);
        assert_eq!(dblp.fetcher().offsets(), vec!["0", "4"]);
        assert_eq!(got.hits, got.total.min(5));
        assert_eq!(got.rows.len(), 5);
        assert!(!got.truncated);
        Ok(())
    }

    #[tokio::test]
    async fn test_two_page_policy_truncates_beyond_second_page() -> Result<()> {
        let dblp = client(
            2,
            vec![page(7, &["A", "B"]), page(7, &["C", "D"]), page(7, &["E", "F"])],
        );
        let got = fetch_all(&dblp, "q", ParseMode::Conference, PaginationPolicy::TwoPage).await?;

        assert_eq!(got.requests, 2);
        assert_eq!(got.rows.len(), 4);
        assert!(got.truncated);
        Ok(())
    }

    #[tokio::test]
    async fn test_exhaustive_policy_walks_all_pages() -> Result<()> {
        let dblp = client(
            2,
            vec![page(5, &["A", "B"]), page(5, &["C", "D"]), page(5, &["E"])],
        );
        let got = fetch_all(&dblp, "q", ParseMode::Conference, PaginationPolicy::Exhaustive).await?;

        assert_eq!(got.requests, 3);
        assert_eq!(dblp.fetcher().offsets(), vec!["0", "2", "4"]);
        assert_eq!(got.rows.len(), 5);
        assert!(!got.truncated);
        Ok(())
    }

    #[tokio::test]
    async fn test_zero_total_issues_one_request() -> Result<()> {
        let dblp = client(3, vec![page(0, &[])]);
        let got = fetch_all(&dblp, "q", ParseMode::Conference, PaginationPolicy::Exhaustive).await?;

        assert_eq!(got.requests, 1);
        assert!(got.rows.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_second_page_failure_propagates() {
        let dblp = client(
            2,
            vec![page(3, &["A", "B"]), Err(DblpError::Http { status: 400, url: "stub".to_string() })],
        );
        let got = fetch_all(&dblp, "q", ParseMode::Conference, PaginationPolicy::TwoPage).await;
        assert!(got.is_err());
    }

    #[tokio::test]
    async fn test_huge_page_size_does_not_overflow() -> Result<()> {
        let page_size = usize::MAX / 2 + 1;
        let dblp = client(page_size, vec![page(usize::MAX, &["A"]), page(usize::MAX, &["B"])]);
        let got = fetch_all(&dblp, "q", ParseMode::Conference, PaginationPolicy::TwoPage).await?;

        assert_eq!(got.requests, 2);
        assert!(!got.truncated);

        let dblp = client(page_size, vec![page(usize::MAX, &["A"]), page(usize::MAX, &["B"])]);
        let got = fetch_all(&dblp, "q", ParseMode::Conference, PaginationPolicy::Exhaustive).await?;
        assert_eq!(got.requests, 2);
        Ok(())
    }
}

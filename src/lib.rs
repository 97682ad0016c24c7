//! # dblp-venues
//!
//! Per-author publication counts across conferences and journals, scraped
//! from dblp.
//!
//! ## Modules
//!
//! - [`client`] - dblp HTTP client with retry and a pluggable transport
//! - [`urls`] - search API and journal page URLs
//! - [`parser`] - search API response parsing
//! - [`paginate`] - collecting every page of one query
//! - [`toc`] - journal table-of-contents scraping
//! - [`harvest`] - conference and journal loops
//! - [`postprocess`] / [`join`] - table aggregation
//! - [`names`] - author name counting over local text dumps
//! - [`export`] - CSV output
//! - [`config`] / [`error`] / [`report`] - ambient plumbing
//!
//! ## Usage
//!
//! ```rust,no_run
//! use dblp_venues::{client::{DblpClient, HttpFetcher}, config::PipelineConfig, pipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = PipelineConfig::default();
//!     let client = DblpClient::new(HttpFetcher::from_config(&config)?, &config);
//!     let (table, report) = pipeline::consolidated_table(&client, &config).await;
//!     println!("{} authors\n{}", table.len(), report);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod enrich;
pub mod error;
pub mod export;
pub mod harvest;
pub mod join;
pub mod names;
pub mod paginate;
pub mod parser;
pub mod pipeline;
pub mod postprocess;
pub mod report;
pub mod table;
pub mod toc;
pub mod urls;

pub use error::{DblpError, Result};

//! Conference and journal harvest loops.
//!
//! Both loops run their queries one after another, keep going when a single
//! query fails, and return the accumulated table sorted by author together
//! with a [`RunReport`].

use crate::client::{DblpClient, Fetcher};
use crate::config::PipelineConfig;
use crate::paginate::{fetch_all, Harvested};
use crate::parser::ParseMode;
use crate::report::RunReport;
use crate::table::{VenueTable, VenueYear};
use crate::toc;
use crate::urls::conference_query;
use tracing::{error, info, warn};

/// Scrape every configured conference for every year in
/// `start_year..end_year`.
pub async fn harvest_conferences<F: Fetcher>(
    client: &DblpClient<F>,
    config: &PipelineConfig,
) -> (VenueTable, RunReport) {
    let mut table = VenueTable::new();
    let mut report = RunReport::new();

    for conference in &config.conferences {
        info!(venue = %conference.name, from = conference.start_year, to = config.end_year, "Harvesting conference");

        for year in conference.start_year..config.end_year {
            let label = VenueYear::new(conference.name.as_str(), year).to_string();
            let query = conference_query(&conference.name, year);

            match fetch_all(client, &query, ParseMode::Conference, config.pagination).await {
                Ok(harvested) => {
                    info!(venue = %conference.name, year, total = harvested.total, rows = harvested.rows.len(), "Query complete");
                    record_harvest(&mut report, label, &harvested);
                    table.extend(harvested.rows);
                }
                Err(e) => {
                    error!(venue = %conference.name, year, error = %e, "Query failed");
                    report.failure(label, e);
                }
            }
        }
    }

    table.sort_by_author();
    info!(rows = table.len(), "Conference harvest complete");
    (table, report)
}

fn record_harvest(report: &mut RunReport, label: String, harvested: &Harvested) {
    let rows = harvested.rows.len();
    let mut problems = Vec::new();

    if harvested.truncated {
        problems.push(format!(
            "{} hits declared, {} retrieved",
            harvested.total, harvested.hits
        ));
    }
    if harvested.skipped > 0 {
        problems.push(format!("{} malformed hits skipped", harvested.skipped));
    }

    if problems.is_empty() {
        report.success(label, rows);
    } else {
        report.partial(label, problems.join("; "), rows);
    }
}

/// Scrape every configured journal volume published in
/// `start_year..end_year`.
///
/// Volumes are discovered from the journal's table-of-contents page and each
/// volume page is fetched whole, without pagination.
pub async fn harvest_journals<F: Fetcher>(
    client: &DblpClient<F>,
    config: &PipelineConfig,
) -> (VenueTable, RunReport) {
    let mut table = VenueTable::new();
    let mut report = RunReport::new();
    let mode = ParseMode::Journal(&config.journal_names);

    for journal in &config.journals {
        let key = journal.dblp_key();
        info!(journal = %journal.name, key = %key, "Harvesting journal");

        let volumes = match client.toc(&key).await {
            Ok(html) => toc::volumes_by_year(&html, journal.start_year, config.end_year),
            Err(e) => Err(e),
        };
        let volumes = match volumes {
            Ok(v) => v,
            Err(e) => {
                error!(journal = %journal.name, error = %e, "Table of contents unavailable");
                report.failure(format!("{} contents", journal.name), e);
                continue;
            }
        };

        if volumes.is_empty() {
            warn!(journal = %journal.name, "No volumes matched the configured years");
        }

        for volume in volumes {
            let label = format!("{} vol. {} ({})", journal.name, volume.volume, volume.year);

            match client.volume(&key, volume.volume).await {
                Ok(page) => {
                    let rows = page.rows(mode);
                    info!(journal = %journal.name, volume = volume.volume, year = volume.year, rows = rows.len(), "Volume complete");

                    if page.total > client.page_size() {
                        warn!(journal = %journal.name, volume = volume.volume, total = page.total, "Volume larger than one page");
                        report.partial(
                            label,
                            format!("{} hits declared, {} retrieved", page.total, page.hits.len()),
                            rows.len(),
                        );
                    } else if page.skipped > 0 {
                        report.partial(label, format!("{} malformed hits skipped", page.skipped), rows.len());
                    } else {
                        report.success(label, rows.len());
                    }
                    table.extend(rows);
                }
                Err(e) => {
                    error!(journal = %journal.name, volume = volume.volume, error = %e, "Volume failed");
                    report.failure(label, e);
                }
            }
        }
    }

    table.sort_by_author();
    info!(rows = table.len(), "Journal harvest complete");
    (table, report)
}

//! End-to-end venue pipelines: harvest, postprocess, consolidate, join.

use crate::client::{DblpClient, Fetcher};
use crate::config::PipelineConfig;
use crate::harvest::{harvest_conferences, harvest_journals};
use crate::join::join_frames;
use crate::parser::ParseMode;
use crate::postprocess::{consolidate, postprocess};
use crate::report::RunReport;
use crate::table::VenueTable;
use tracing::info;

/// Conference table, one row per author.
pub async fn conference_table<F: Fetcher>(
    client: &DblpClient<F>,
    config: &PipelineConfig,
) -> (VenueTable, RunReport) {
    let (table, report) = harvest_conferences(client, config).await;
    let table = consolidate(postprocess(table, ParseMode::Conference));
    (table, report)
}

/// Journal table, one row per author, venues renamed to short codes.
pub async fn journal_table<F: Fetcher>(
    client: &DblpClient<F>,
    config: &PipelineConfig,
) -> (VenueTable, RunReport) {
    let (table, report) = harvest_journals(client, config).await;
    let table = consolidate(postprocess(table, ParseMode::Journal(&config.journal_names)));
    (table, report)
}

/// Conferences and journals joined into the consolidated table.
pub async fn consolidated_table<F: Fetcher>(
    client: &DblpClient<F>,
    config: &PipelineConfig,
) -> (VenueTable, RunReport) {
    let (conferences, mut report) = conference_table(client, config).await;
    let (journals, journal_report) = journal_table(client, config).await;
    report.merge(journal_report);

    info!(
        conference_rows = conferences.len(),
        journal_rows = journals.len(),
        "Joining tables"
    );
    (join_frames(conferences, journals), report)
}

//! Table postprocessing.
//!
//! [`postprocess`] attaches to every row the full list of observations of its
//! author and the author's total appearance count. It does not merge rows;
//! [`consolidate`] does that, and the joiner does the final grouping.

use crate::parser::ParseMode;
use crate::table::{Row, VenueTable, VenueYear};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Postprocess a harvested table.
///
/// Absent venue columns already read as 0 and every value is an integer, so
/// the remaining steps are, in order:
/// 1. in journal mode, rename venues through the lookup
/// 2. set each row's years to all of its author's years, in table order
/// 3. set each row's count to the number of rows of its author
///
/// Running it again leaves `count` unchanged.
pub fn postprocess(mut table: VenueTable, mode: ParseMode<'_>) -> VenueTable {
    if let ParseMode::Journal(_) = mode {
        for row in &mut table.rows {
            rename_venues(row, mode);
        }
    }

    let mut years_by_author: HashMap<String, Vec<VenueYear>> = HashMap::new();
    let mut rows_by_author: HashMap<String, u32> = HashMap::new();
    for row in &table.rows {
        years_by_author
            .entry(row.author.clone())
            .or_default()
            .extend(row.years.iter().cloned());
        *rows_by_author.entry(row.author.clone()).or_insert(0) += 1;
    }

    for row in &mut table.rows {
        if let Some(years) = years_by_author.get(&row.author) {
            row.years = years.clone();
        }
        row.count = rows_by_author.get(&row.author).copied().unwrap_or(0);
    }

    debug!(rows = table.len(), authors = rows_by_author.len(), "Postprocessed table");
    table
}

fn rename_venues(row: &mut Row, mode: ParseMode<'_>) {
    let venues = std::mem::take(&mut row.venues);
    let mut renamed = BTreeMap::new();
    for (venue, value) in venues {
        *renamed.entry(mode.label(&venue)).or_insert(0) += value;
    }
    row.venues = renamed;

    for year in &mut row.years {
        year.venue = mode.label(&year.venue);
    }
}

/// Collapse rows sharing `(author, count, years)` into one, summing venue
/// columns. Afterwards each venue value is the author's number of appearances
/// there. Keys keep their first-appearance order.
pub fn consolidate(table: VenueTable) -> VenueTable {
    let mut index: HashMap<(String, u32, Vec<VenueYear>), usize> = HashMap::new();
    let mut rows: Vec<Row> = Vec::new();

    for row in table.rows {
        let key = (row.author.clone(), row.count, row.years.clone());
        match index.get(&key) {
            Some(&i) => {
                for (venue, value) in row.venues {
                    *rows[i].venues.entry(venue).or_insert(0) += value;
                }
            }
            None => {
                index.insert(key, rows.len());
                rows.push(row);
            }
        }
    }

    debug!(rows = rows.len(), "Consolidated table");
    VenueTable::from_rows(rows)
}

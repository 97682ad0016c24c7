//! Joining the conference and journal tables.

use crate::table::{Row, VenueTable, VenueYear};
use std::collections::HashMap;
use tracing::info;

/// Merge the conference and journal tables into one consolidated table.
///
/// Conference rows come first. Years are re-joined per author across both
/// tables, then rows are grouped by `(author, years)`: venue columns take the
/// maximum and `count` the sum. Output rows keep first-appearance order and
/// no two share the same `(author, years)` key.
pub fn join_frames(conferences: VenueTable, journals: VenueTable) -> VenueTable {
    let mut rows: Vec<Row> = conferences.rows;
    rows.extend(journals.rows);

    let mut years_by_author: HashMap<String, Vec<VenueYear>> = HashMap::new();
    for row in &rows {
        years_by_author
            .entry(row.author.clone())
            .or_default()
            .extend(row.years.iter().cloned());
    }

    let mut index: HashMap<(String, Vec<VenueYear>), usize> = HashMap::new();
    let mut joined: Vec<Row> = Vec::new();

    for mut row in rows {
        if let Some(years) = years_by_author.get(&row.author) {
            row.years = years.clone();
        }

        let key = (row.author.clone(), row.years.clone());
        match index.get(&key) {
            Some(&i) => {
                let target = &mut joined[i];
                for (venue, value) in row.venues {
                    let cell = target.venues.entry(venue).or_insert(0);
                    *cell = (*cell).max(value);
                }
                target.count += row.count;
            }
            None => {
                index.insert(key, joined.len());
                joined.push(row);
            }
        }
    }

    info!(rows = joined.len(), "Joined conference and journal tables");
    VenueTable::from_rows(joined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParseMode;
    use crate::postprocess::{consolidate, postprocess};
    use std::collections::HashSet;

    fn prepared(rows: Vec<Row>) -> VenueTable {
        consolidate(postprocess(VenueTable::from_rows(rows), ParseMode::Conference))
    }

    #[test]
    fn test_join_sums_counts_and_merges_years() {
        let conferences = prepared(vec![
            Row::appearance("Alice", "ICML", 2020),
            Row::appearance("Alice", "ICML", 2020),
            Row::appearance("Bob", "CVPR", 2019),
        ]);
        let journals = prepared(vec![
            Row::appearance("Alice", "TPAMI", 2021),
            Row::appearance("Carol", "TKDE", 2018),
        ]);

        let joined = join_frames(conferences, journals);
        assert_eq!(joined.len(), 3);

        let alice = &joined.rows[0];
        assert_eq!(alice.author, "Alice");
        assert_eq!(alice.count, 3);
        assert_eq!(alice.year_field(), "ICML2020,ICML2020,TPAMI2021");
        assert_eq!(alice.venue("ICML"), 2);
        assert_eq!(alice.venue("TPAMI"), 1);
        assert_eq!(alice.venue("CVPR"), 0);

        assert_eq!(joined.rows[2].author, "Carol");
        assert_eq!(joined.rows[2].venue("TKDE"), 1);
    }

    #[test]
    fn test_join_takes_max_of_one_hot_columns() {
        // Unconsolidated rows: several rows per author with one-hot venues.
        let conferences = postprocess(
            VenueTable::from_rows(vec![
                Row::appearance("Dana", "ICML", 2020),
                Row::appearance("Dana", "CVPR", 2020),
            ]),
            ParseMode::Conference,
        );
        let joined = join_frames(conferences, VenueTable::new());

        assert_eq!(joined.len(), 1);
        assert_eq!(joined.rows[0].venue("ICML"), 1);
        assert_eq!(joined.rows[0].venue("CVPR"), 1);
        assert_eq!(joined.rows[0].count, 4);
    }

    #[test]
    fn test_join_has_no_duplicate_keys() {
        let conferences = postprocess(
            VenueTable::from_rows(vec![
                Row::appearance("Eve", "ICML", 2020),
                Row::appearance("Frank", "ICML", 2020),
                Row::appearance("Eve", "ICML", 2019),
            ]),
            ParseMode::Conference,
        );
        let journals = postprocess(
            VenueTable::from_rows(vec![
                Row::appearance("Frank", "JMLR", 2020),
                Row::appearance("Frank", "JMLR", 2020),
            ]),
            ParseMode::Conference,
        );

        let joined = join_frames(conferences, journals);
        let keys: HashSet<(String, String)> = joined
            .rows
            .iter()
            .map(|r| (r.author.clone(), r.year_field()))
            .collect();
        assert_eq!(keys.len(), joined.len());
        assert_eq!(joined.len(), 2);
    }

    #[test]
    fn test_join_of_empty_tables() {
        assert!(join_frames(VenueTable::new(), VenueTable::new()).is_empty());
    }
}

//! Author/venue tables.
//!
//! A [`Row`] starts life as one author's appearance at one venue in one year
//! and is folded into wider rows by the postprocessor and the joiner. Venue
//! columns are kept as a sparse map; an absent venue reads as 0. The table is
//! only widened into fixed columns at the export boundary.

use std::collections::BTreeMap;
use std::fmt;

/// A `(venue, year)` observation.
///
/// Displayed as the concatenation used in exported tables, e.g. `TPAMI2020`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VenueYear {
    pub venue: String,
    pub year: u16,
}

impl VenueYear {
    pub fn new(venue: impl Into<String>, year: u16) -> Self {
        Self {
            venue: venue.into(),
            year,
        }
    }
}

impl fmt::Display for VenueYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.venue, self.year)
    }
}

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Author name exactly as the source spelled it
    pub author: String,
    /// Observations folded into this row, in table order
    pub years: Vec<VenueYear>,
    /// Venue column values; missing venues are 0
    pub venues: BTreeMap<String, u32>,
    pub count: u32,
}

impl Row {
    /// A fresh row for one appearance: a single observation and a single
    /// venue column set to 1.
    pub fn appearance(author: impl Into<String>, venue: impl Into<String>, year: u16) -> Self {
        let venue = venue.into();
        let mut venues = BTreeMap::new();
        venues.insert(venue.clone(), 1);
        Self {
            author: author.into(),
            years: vec![VenueYear::new(venue, year)],
            venues,
            count: 0,
        }
    }

    /// Value of a venue column, 0 when the row has none.
    pub fn venue(&self, name: &str) -> u32 {
        self.venues.get(name).copied().unwrap_or(0)
    }

    /// The comma-joined `Year` field as it appears in exports.
    pub fn year_field(&self) -> String {
        join_years(&self.years)
    }
}

/// Join observations with `,`, preserving order and duplicates.
pub fn join_years(years: &[VenueYear]) -> String {
    years
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Ordered rows for one venue class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueTable {
    pub rows: Vec<Row>,
}

impl VenueTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn extend(&mut self, rows: impl IntoIterator<Item = Row>) {
        self.rows.extend(rows);
    }

    /// Stable lexicographic sort by author.
    pub fn sort_by_author(&mut self) {
        self.rows.sort_by(|a, b| a.author.cmp(&b.author));
    }

    /// Every venue column with a value in at least one row, sorted.
    pub fn venue_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .rows
            .iter()
            .flat_map(|r| r.venues.keys().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Rows for one author, in table order.
    pub fn rows_for<'a>(&'a self, author: &'a str) -> impl Iterator<Item = &'a Row> + 'a {
        self.rows.iter().filter(move |r| r.author == author)
    }
}

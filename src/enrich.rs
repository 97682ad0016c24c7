//! Author profile enrichment interface.
//!
//! Looking authors up in an external scholarly-profile index is left to a
//! collaborator implementing [`ProfileLookup`]. No implementation ships with
//! this crate.

use crate::error::Result;
use crate::table::VenueTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use tracing::{debug, warn};

/// Profile attributes returned by a lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub h_index: Option<u32>,
    pub interests: Vec<String>,
}

/// Outcome of looking up one author name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileMatch {
    Found(Profile),
    NotFound,
    /// Several profiles share the name; none is chosen
    Ambiguous(usize),
}

pub trait ProfileLookup {
    fn lookup(&self, author: &str) -> impl Future<Output = Result<ProfileMatch>> + Send;
}

/// Look up every distinct author of `table` once.
///
/// Lookup failures are logged and the author is left out of the result.
pub async fn enrich_authors<L: ProfileLookup>(
    table: &VenueTable,
    lookup: &L,
) -> BTreeMap<String, ProfileMatch> {
    let mut matches = BTreeMap::new();

    for row in &table.rows {
        if matches.contains_key(&row.author) {
            continue;
        }
        match lookup.lookup(&row.author).await {
            Ok(found) => {
                debug!(author = %row.author, result = ?found, "Profile lookup");
                matches.insert(row.author.clone(), found);
            }
            Err(e) => {
                warn!(author = %row.author, error = %e, "Profile lookup failed");
            }
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DblpError;
    use crate::table::Row;
    use std::sync::Mutex;

    struct StubLookup {
        calls: Mutex<Vec<String>>,
    }

    impl ProfileLookup for StubLookup {
        async fn lookup(&self, author: &str) -> Result<ProfileMatch> {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(author.to_string());
            }
            match author {
                "Alice Smith" => Ok(ProfileMatch::Found(Profile {
                    name: author.to_string(),
                    h_index: Some(42),
                    interests: vec!["machine learning".to_string()],
                })),
                "J. Smith" => Ok(ProfileMatch::Ambiguous(3)),
                "Broken" => Err(DblpError::Timeout("stub".to_string())),
                _ => Ok(ProfileMatch::NotFound),
            }
        }
    }

    #[tokio::test]
    async fn test_enrich_authors() {
        let table = VenueTable::from_rows(vec![
            Row::appearance("Alice Smith", "ICML", 2020),
            Row::appearance("Alice Smith", "CVPR", 2020),
            Row::appearance("J. Smith", "ICML", 2020),
            Row::appearance("Nobody", "ICML", 2020),
            Row::appearance("Broken", "ICML", 2020),
        ]);
        let lookup = StubLookup {
            calls: Mutex::new(Vec::new()),
        };

        let matches = enrich_authors(&table, &lookup).await;

        assert_eq!(lookup.calls.lock().map(|c| c.len()).unwrap_or(0), 4);
        assert_eq!(matches.len(), 3);
        assert!(matches!(matches.get("Alice Smith"), Some(ProfileMatch::Found(p)) if p.h_index == Some(42)));
        assert_eq!(matches.get("J. Smith"), Some(&ProfileMatch::Ambiguous(3)));
        assert_eq!(matches.get("Nobody"), Some(&ProfileMatch::NotFound));
        assert!(!matches.contains_key("Broken"));
    }
}

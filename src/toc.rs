//! Journal table-of-contents scraping.
//!
//! dblp organizes journals by volume, not by year. The TOC page lists one
//! `<li>` per volume, e.g. `<li><a href="..">Volume 42: 2020</a></li>`; this
//! module turns those entries into (year, volume) pairs.

use crate::error::{DblpError, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use tracing::debug;

/// A journal volume and the year it was matched to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalVolume {
    pub year: u16,
    pub volume: u32,
}

/// Extract the volumes published in `start_year..end_year` from a TOC page.
///
/// Only list items whose content reduces to a single text string are
/// considered. An item is matched to the first year of the range that occurs
/// in its text, and its volume number is the first run of digits. Volumes are
/// reported once, in page order.
pub fn volumes_by_year(html: &str, start_year: u16, end_year: u16) -> Result<Vec<JournalVolume>> {
    let document = Html::parse_document(html);
    let li_selector = Selector::parse("li").map_err(|e| DblpError::Parse(e.to_string()))?;
    let number_regex = Regex::new(r"\d+").map_err(|e| DblpError::Parse(e.to_string()))?;

    let mut seen = HashSet::new();
    let mut volumes = Vec::new();

    for item in document.select(&li_selector) {
        let Some(text) = sole_text(item) else {
            continue;
        };

        let Some(year) = (start_year..end_year).find(|y| text.contains(&y.to_string())) else {
            continue;
        };

        let volume = number_regex
            .find(&text)
            .and_then(|m| m.as_str().parse::<u32>().ok());

        if let Some(volume) = volume {
            if seen.insert(volume) {
                debug!(year, volume, entry = text.trim(), "Matched TOC entry");
                volumes.push(JournalVolume { year, volume });
            }
        }
    }

    Ok(volumes)
}

/// Text of an element whose only meaningful descendant chain ends in one
/// text node. Whitespace-only text and comments are ignored.
fn sole_text(element: ElementRef<'_>) -> Option<String> {
    let mut children = element.children().filter(|child| match child.value() {
        Node::Text(text) => !text.trim().is_empty(),
        Node::Element(_) => true,
        _ => false,
    });

    let only = children.next()?;
    if children.next().is_some() {
        return None;
    }

    match only.value() {
        Node::Text(text) => Some(text.to_string()),
        Node::Element(_) => ElementRef::wrap(only).and_then(sole_text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOC: &str = r#"<html><body>
        <ul>
          <li><a href="pami43.html">Volume 43: 2021</a></li>
          <li><a href="pami42.html">Volume 42: 2020</a></li>
          <li><a href="pami41.html">Volume 41: 2019</a></li>
          <li><a href="pami41.html">Volume 41: 2019</a></li>
          <li><a href="pami1.html">Volume 1: 1979</a></li>
          <li>See also: <a href="/db/conf/cvpr">CVPR 2020</a></li>
        </ul>
    </body></html>"#;

    #[test]
    fn test_volumes_in_range() -> Result<()> {
        let volumes = volumes_by_year(TOC, 2019, 2021)?;
        assert_eq!(
            volumes,
            vec![
                JournalVolume { year: 2020, volume: 42 },
                JournalVolume { year: 2019, volume: 41 },
            ]
        );
        Ok(())
    }

    #[test]
    fn test_mixed_content_items_are_ignored() -> Result<()> {
        // "See also" mentions 2020 but holds a text node and a link
        let volumes = volumes_by_year(TOC, 2020, 2021)?;
        assert_eq!(volumes, vec![JournalVolume { year: 2020, volume: 42 }]);
        Ok(())
    }

    #[test]
    fn test_empty_page() -> Result<()> {
        assert!(volumes_by_year("<html></html>", 1979, 2021)?.is_empty());
        Ok(())
    }
}

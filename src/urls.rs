//! dblp URL builders.

use crate::error::Result;
use url::Url;

/// Path of the publication search API below the base URL
const SEARCH_PATH: &str = "/search/publ/api";

/// Search query selecting one conference year.
pub fn conference_query(venue: &str, year: u16) -> String {
    format!("venue:{}: year:{}:", venue, year)
}

/// Build a search API URL for one page of results.
pub fn search_url(base_url: &str, query: &str, page_size: usize, first_hit: usize) -> Result<Url> {
    let mut url = Url::parse(&format!("{}{}", base_url.trim_end_matches('/'), SEARCH_PATH))?;

    {
        let mut params = url.query_pairs_mut();
        params.append_pair("q", query);
        params.append_pair("h", &page_size.to_string());
        params.append_pair("f", &first_hit.to_string());
        params.append_pair("format", "json");
    }

    Ok(url)
}

/// Table-of-contents page listing every volume of a journal.
pub fn journal_toc_url(base_url: &str, code: &str) -> Result<Url> {
    let url = Url::parse(&format!(
        "{}/db/journals/{}/",
        base_url.trim_end_matches('/'),
        code.to_lowercase()
    ))?;
    Ok(url)
}

/// Record page of one journal volume, served by the search API as a
/// table-of-contents query. One page holds the whole volume.
pub fn journal_volume_url(base_url: &str, code: &str, volume: u32, page_size: usize) -> Result<Url> {
    let code = code.to_lowercase();
    let query = format!("toc:db/journals/{code}/{code}{volume}.bht:");
    search_url(base_url, &query, page_size, 0)
}

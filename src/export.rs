//! CSV export.
//!
//! This is where sparse venue maps are widened into one column per venue and
//! `(venue, year)` lists are flattened into the comma-joined `Year` field.

use crate::error::Result;
use crate::names::NameReport;
use crate::table::VenueTable;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Column order: `configured` venues first, then any other venue present in
/// the table, sorted.
pub fn venue_columns(table: &VenueTable, configured: &[String]) -> Vec<String> {
    let mut columns: Vec<String> = configured.to_vec();
    for venue in table.venue_names() {
        if !columns.contains(&venue) {
            columns.push(venue);
        }
    }
    columns
}

/// Write `Author, Year, count, <venues..>` rows.
pub fn write_venue_table<W: Write>(writer: W, table: &VenueTable, columns: &[String]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_writer(writer);

    let mut header = vec!["Author".to_string(), "Year".to_string(), "count".to_string()];
    header.extend(columns.iter().cloned());
    wtr.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.author.clone(), row.year_field(), row.count.to_string()];
        record.extend(columns.iter().map(|venue| row.venue(venue).to_string()));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn save_venue_table(path: &Path, table: &VenueTable, configured: &[String]) -> Result<()> {
    let columns = venue_columns(table, configured);
    let file = std::fs::File::create(path)?;
    write_venue_table(file, table, &columns)?;
    info!(path = %path.display(), rows = table.len(), columns = columns.len() + 3, "Saved venue table");
    Ok(())
}

/// Write `name, full_count, search_term, last_authors_count, <labels..>` rows
/// with `y`/`n` flags per label.
pub fn write_name_report<W: Write>(writer: W, report: &NameReport) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_writer(writer);

    let mut header: Vec<String> = ["name", "full_count", "search_term", "last_authors_count"]
        .iter()
        .map(ToString::to_string)
        .collect();
    header.extend(report.labels.iter().cloned());
    wtr.write_record(&header)?;

    for row in &report.rows {
        let mut record = vec![
            row.name.clone(),
            row.full_count.to_string(),
            row.search_term.clone(),
            row.last_authors_count.to_string(),
        ];
        record.extend(
            row.appeared
                .iter()
                .map(|seen| (if *seen { "y" } else { "n" }).to_string()),
        );
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn save_name_report(path: &Path, report: &NameReport) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_name_report(file, report)?;
    info!(path = %path.display(), rows = report.rows.len(), "Saved name report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names::NameRow;
    use crate::table::Row;
    use tempfile::NamedTempFile;

    fn table() -> VenueTable {
        let mut alice = Row::appearance("Alice Smith", "ICML", 2020);
        alice.years.push(crate::table::VenueYear::new("TPAMI", 2021));
        alice.venues.insert("TPAMI".to_string(), 1);
        alice.count = 2;

        let mut bob = Row::appearance("Bob, Jr.", "AAAI", 2019);
        bob.count = 1;

        VenueTable::from_rows(vec![alice, bob])
    }

    #[test]
    fn test_columns_configured_first() {
        let configured = vec!["TPAMI".to_string(), "ICML".to_string(), "CVPR".to_string()];
        assert_eq!(
            venue_columns(&table(), &configured),
            vec!["TPAMI", "ICML", "CVPR", "AAAI"]
        );
    }

    #[test]
    fn test_write_venue_table() -> Result<()> {
        let columns = vec!["TPAMI".to_string(), "ICML".to_string(), "AAAI".to_string()];
        let mut out = Vec::new();
        write_venue_table(&mut out, &table(), &columns)?;

        let text = String::from_utf8_lossy(&out);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Author,Year,count,TPAMI,ICML,AAAI");
        assert_eq!(lines[1], "Alice Smith,\"ICML2020,TPAMI2021\",2,1,1,0");
        assert_eq!(lines[2], "\"Bob, Jr.\",AAAI2019,1,0,0,1");
        Ok(())
    }

    #[test]
    fn test_save_name_report() -> Result<()> {
        let report = NameReport {
            labels: vec!["CVPR2017".to_string(), "NIPS2019".to_string()],
            rows: vec![NameRow {
                name: "Jane Doe".to_string(),
                full_count: 17,
                search_term: "Jane Doe scholar".to_string(),
                last_authors_count: 4,
                appeared: vec![false, true],
            }],
        };

        let temp = NamedTempFile::new()?;
        save_name_report(temp.path(), &report)?;

        let text = std::fs::read_to_string(temp.path())?;
        assert_eq!(
            text,
            "name,full_count,search_term,last_authors_count,CVPR2017,NIPS2019\n\
             Jane Doe,17,Jane Doe scholar,4,n,y\n"
        );
        Ok(())
    }
}

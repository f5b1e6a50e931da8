//! Turning delimited catalog text into book records.
//!
//! One record per line: `title, isbn, author, genre/path`. Blank lines and
//! lines starting with `#` are skipped.

use std::{fs, path::Path};

use crate::{
    book::Book,
    config::LibraryConfig,
    error::{LibraryError, Result},
};

/// Number of fields in a catalog record
const FIELD_COUNT: usize = 4;

/// A parsed, well-formed catalog line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    /// Book title
    pub title: String,
    /// Book ISBN
    pub isbn: String,
    /// Book author
    pub author: String,
    /// Genre path, outermost first
    pub genre_path: Vec<String>,
}

impl From<BookRecord> for Book {
    fn from(record: BookRecord) -> Self {
        Self::new(record.title, record.isbn, record.author, record.genre_path)
    }
}

/// Parse one catalog line
///
/// # Errors
///
/// Returns `LibraryError::MalformedRecord` if the line does not have exactly
/// four fields or its title or ISBN is empty.
pub fn parse_record(
    line: &str,
    line_number: usize,
    field_delimiter: char,
    genre_delimiter: char,
) -> Result<BookRecord> {
    let fields: Vec<&str> = line.split(field_delimiter).map(str::trim).collect();
    let [title, isbn, author, genres] = fields.as_slice() else {
        return Err(LibraryError::MalformedRecord {
            line: line_number,
            reason: format!("expected {FIELD_COUNT} fields, found {}", fields.len()),
        });
    };
    if isbn.is_empty() {
        return Err(LibraryError::MalformedRecord {
            line: line_number,
            reason: "empty ISBN".to_string(),
        });
    }
    if title.is_empty() {
        return Err(LibraryError::MalformedRecord {
            line: line_number,
            reason: "empty title".to_string(),
        });
    }
    let genre_path = genres
        .split(genre_delimiter)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(ToString::to_string)
        .collect();

    Ok(BookRecord {
        title: (*title).to_string(),
        isbn: (*isbn).to_string(),
        author: (*author).to_string(),
        genre_path,
    })
}

/// Parse a whole catalog document
///
/// # Errors
///
/// Returns the first `LibraryError::MalformedRecord` encountered.
pub fn parse_catalog(text: &str, config: &LibraryConfig) -> Result<Vec<BookRecord>> {
    let mut records = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        records.push(parse_record(
            trimmed,
            idx.saturating_add(1),
            config.field_delimiter,
            config.genre_delimiter,
        )?);
    }
    tracing::debug!(records = records.len(), "parsed catalog");
    Ok(records)
}

/// Read and parse a catalog file
///
/// # Errors
///
/// Returns `LibraryError::Io` if the file cannot be read, or the first
/// `LibraryError::MalformedRecord` in it.
pub fn read_catalog(path: &Path, config: &LibraryConfig) -> Result<Vec<BookRecord>> {
    tracing::debug!(path = %path.display(), "reading catalog");
    parse_catalog(&fs::read_to_string(path)?, config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_fields_and_path() {
        let record = parse_record(" Dune , 001 , Herbert , Fiction / SciFi ", 1, ',', '/');
        assert_eq!(
            record.ok(),
            Some(BookRecord {
                title: "Dune".to_string(),
                isbn: "001".to_string(),
                author: "Herbert".to_string(),
                genre_path: vec!["Fiction".to_string(), "SciFi".to_string()],
            })
        );
    }

    #[test]
    fn test_parse_record_rejects_bad_shapes() {
        assert!(matches!(
            parse_record("Dune,001,Herbert", 4, ',', '/'),
            Err(LibraryError::MalformedRecord { line: 4, .. })
        ));
        assert!(matches!(
            parse_record("Dune,001,Herbert,Fiction,Extra", 5, ',', '/'),
            Err(LibraryError::MalformedRecord { line: 5, .. })
        ));
        assert!(matches!(
            parse_record("Dune, ,Herbert,Fiction", 6, ',', '/'),
            Err(LibraryError::MalformedRecord { line: 6, ref reason }) if reason == "empty ISBN"
        ));
    }

    #[test]
    fn test_parse_catalog_skips_blanks_and_comments() {
        let text = "# title,isbn,author,genre\n\nDune,001,Herbert,Fiction/SciFi\nIt,003,King,Fiction//Horror\n";
        let records = parse_catalog(text, &LibraryConfig::default()).unwrap_or_default();

        assert_eq!(records.len(), 2);
        assert_eq!(
            records.get(1).map(|r| r.genre_path.clone()),
            Some(vec!["Fiction".to_string(), "Horror".to_string()])
        );
    }

    #[test]
    fn test_parse_catalog_reports_line_number() {
        let text = "Dune,001,Herbert,Fiction\n\nbroken line\n";
        assert!(matches!(
            parse_catalog(text, &LibraryConfig::default()),
            Err(LibraryError::MalformedRecord { line: 3, .. })
        ));
    }
}

use thiserror::Error;

use crate::book::Isbn;

/// Errors reported by library operations
///
/// None of these are fatal: the library stays usable after any of them.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// No book matches the given ISBN or title
    #[error("Book not found: {0}")]
    BookNotFound(String),

    /// The book is already out on loan
    #[error("Book is already borrowed: {0}")]
    BookUnavailable(Isbn),

    /// The session does not currently hold the book
    #[error("Book is not currently borrowed: {0}")]
    NotBorrowed(Isbn),

    /// The transaction log is empty
    #[error("No actions to undo")]
    NothingToUndo,

    /// No genre node carries the given name
    #[error("Genre not found: {0}")]
    GenreNotFound(String),

    /// A second book was loaded with an ISBN already in the catalog
    #[error("Duplicate ISBN in catalog: {0}")]
    DuplicateIsbn(Isbn),

    /// A second book was loaded with a title already in the catalog
    #[error("Duplicate title in catalog: {0}")]
    DuplicateTitle(String),

    /// A catalog line could not be turned into a book record
    #[error("Malformed catalog record on line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number in the catalog source
        line: usize,
        /// What was wrong with the record
        reason: String,
    },

    /// Configuration could not be read or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading a catalog or configuration file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for library operations
pub type Result<T, E = LibraryError> = std::result::Result<T, E>;

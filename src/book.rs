use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Stable identity of a book in the catalog
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Isbn(String);

impl Isbn {
    /// Wrap a raw ISBN string
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The ISBN as written in the catalog
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Isbn {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Isbn {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Isbn {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// A book owned by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Book {
    /// Unique title
    pub title: String,
    /// Unique identity
    pub isbn: Isbn,
    /// Author name, compared verbatim when linking books by authorship
    pub author: String,
    /// Genre path from the outermost classification to the leaf
    pub genre_path: Vec<String>,
    /// Whether the book is on the shelf
    pub is_available: bool,
}

impl Book {
    /// Create an available book
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        isbn: impl Into<Isbn>,
        author: impl Into<String>,
        genre_path: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            isbn: isbn.into(),
            author: author.into(),
            genre_path,
            is_available: true,
        }
    }

    /// Shelf status label used in listings
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.is_available { "Available" } else { "Borrowed" }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) by {} [{}]", self.title, self.isbn, self.author, self.status_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isbn_conversions_agree() {
        let owned = Isbn::from("001".to_string());
        assert_eq!(owned, Isbn::from("001"));
        assert_eq!(owned.as_str(), "001");

        let book = Book::new("Dune", "001".to_string(), "Herbert", Vec::new());
        assert_eq!(book.isbn, owned);
        assert_eq!(book.to_string(), "Dune (001) by Herbert [Available]");
    }
}

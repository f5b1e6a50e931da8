//! Owning store for every book, indexed by ISBN and by title.

use std::collections::{BTreeMap, HashMap};

use crate::{
    book::{Book, Isbn},
    error::{LibraryError, Result},
};

/// All known books
///
/// Books are kept in ISBN order so that every listing and every
/// deterministic fallback walks them the same way.
#[derive(Debug, Default)]
pub struct Catalog {
    /// Books keyed by identity
    books: BTreeMap<Isbn, Book>,
    /// Title index into `books`
    titles: HashMap<String, Isbn>,
}

impl Catalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a book, rejecting a clash on either unique key
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::DuplicateIsbn` or `LibraryError::DuplicateTitle`
    /// if another book already uses the ISBN or title.
    pub fn insert(&mut self, book: Book) -> Result<()> {
        if self.books.contains_key(&book.isbn) {
            return Err(LibraryError::DuplicateIsbn(book.isbn));
        }
        if self.titles.contains_key(&book.title) {
            return Err(LibraryError::DuplicateTitle(book.title));
        }
        self.titles.insert(book.title.clone(), book.isbn.clone());
        self.books.insert(book.isbn.clone(), book);
        Ok(())
    }

    /// Find a book by ISBN
    #[must_use]
    pub fn by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.books.get(isbn)
    }

    /// Find a book by exact title
    #[must_use]
    pub fn by_title(&self, title: &str) -> Option<&Book> {
        self.titles.get(title).and_then(|isbn| self.books.get(isbn))
    }

    /// Mutable access for availability changes
    pub(crate) fn by_isbn_mut(&mut self, isbn: &str) -> Option<&mut Book> {
        self.books.get_mut(isbn)
    }

    /// Every book, ISBN ascending
    pub fn iter(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    /// Books on the shelf, ISBN ascending
    pub fn available(&self) -> impl Iterator<Item = &Book> {
        self.books.values().filter(|book| book.is_available)
    }

    /// Whether the book exists and is on the shelf
    #[must_use]
    pub fn is_available(&self, isbn: &Isbn) -> bool {
        self.books.get(isbn).is_some_and(|book| book.is_available)
    }

    /// Group ISBNs by author, each group in ISBN order
    #[must_use]
    pub fn by_author(&self) -> BTreeMap<&str, Vec<&Isbn>> {
        let mut groups: BTreeMap<&str, Vec<&Isbn>> = BTreeMap::new();
        for book in self.books.values() {
            groups.entry(book.author.as_str()).or_default().push(&book.isbn);
        }
        groups
    }

    /// Number of books
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the catalog holds no books
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

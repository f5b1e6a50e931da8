use std::collections::{BTreeMap, BTreeSet};

use crate::book::Isbn;

/// One reader's borrowing state
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Session {
    /// Books presently held, in borrow order
    currently_borrowed: Vec<Isbn>,
    /// Every book borrowed during this session
    history: BTreeSet<Isbn>,
    /// Borrows per book that have not been undone
    borrow_counts: BTreeMap<Isbn, usize>,
}

impl Session {
    /// Create an empty session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `book` is now held
    ///
    /// The caller marks the book unavailable in the catalog.
    pub fn borrow(&mut self, book: &Isbn) {
        if !self.is_holding(book) {
            self.currently_borrowed.push(book.clone());
        }
        self.history.insert(book.clone());
        let count = self.borrow_counts.entry(book.clone()).or_insert(0);
        *count = count.saturating_add(1);
    }

    /// Put a returned book back in hand without counting a new borrow
    ///
    /// Used when a return is undone; the book stays in the history.
    pub fn restore(&mut self, book: &Isbn) {
        if !self.is_holding(book) {
            self.currently_borrowed.push(book.clone());
        }
        self.history.insert(book.clone());
    }

    /// Give `book` back, keeping it in the history
    ///
    /// Returns `false` when the book was not held.
    pub fn return_book(&mut self, book: &Isbn) -> bool {
        let before = self.currently_borrowed.len();
        self.currently_borrowed.retain(|held| held != book);
        self.currently_borrowed.len() != before
    }

    /// Erase a borrow entirely, as if it never happened
    ///
    /// The book leaves the history only when no earlier borrow of it remains.
    pub fn undo_borrow(&mut self, book: &Isbn) {
        self.currently_borrowed.retain(|held| held != book);
        let remaining = self.borrow_counts.get_mut(book).map_or(0, |count| {
            *count = count.saturating_sub(1);
            *count
        });
        if remaining == 0 {
            self.borrow_counts.remove(book);
            self.history.remove(book);
        }
    }

    /// Whether `book` is presently held
    #[must_use]
    pub fn is_holding(&self, book: &Isbn) -> bool {
        self.currently_borrowed.contains(book)
    }

    /// Books presently held, in borrow order
    #[must_use]
    pub fn currently_borrowed(&self) -> &[Isbn] {
        &self.currently_borrowed
    }

    /// Every book borrowed this session
    #[must_use]
    pub fn history(&self) -> &BTreeSet<Isbn> {
        &self.history
    }
}

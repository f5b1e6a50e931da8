use serde::{Deserialize, Serialize};

use crate::book::Isbn;

/// Kind of a recorded session action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum ActionKind {
    /// A book left the shelf
    Borrow,
    /// A book came back to the shelf
    Return,
}

/// A borrow or return, as kept in the transaction log
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Action {
    /// What happened
    pub kind: ActionKind,
    /// The book it happened to
    pub book: Isbn,
}

impl Action {
    /// A borrow of `book`
    #[must_use]
    pub fn borrow(book: Isbn) -> Self {
        Self { kind: ActionKind::Borrow, book }
    }

    /// A return of `book`
    #[must_use]
    pub fn return_of(book: Isbn) -> Self {
        Self { kind: ActionKind::Return, book }
    }
}

/// State changes published to observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LibraryEvent {
    /// A book was borrowed
    Borrowed {
        /// The borrowed book
        book: Isbn,
        /// Held books whose existing affinity edge this borrow strengthened,
        /// with the weight before the borrow
        strengthened: Vec<(Isbn, u32)>,
    },
    /// A held book was returned
    Returned {
        /// The returned book
        book: Isbn,
    },
    /// The most recent action was reverted
    Undone(Action),
}

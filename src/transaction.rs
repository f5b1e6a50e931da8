//! LIFO log of borrow and return actions backing single-level undo.

use crate::{book::Isbn, events::Action};

/// Stack of recorded actions, most recent last
///
/// Undone actions are dropped; there is no redo.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TransactionLog {
    /// Recorded actions in the order they happened
    actions: Vec<Action>,
}

impl TransactionLog {
    /// Create an empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a borrow of `book`
    pub fn record_borrow(&mut self, book: Isbn) {
        self.actions.push(Action::borrow(book));
    }

    /// Push a return of `book`
    pub fn record_return(&mut self, book: Isbn) {
        self.actions.push(Action::return_of(book));
    }

    /// Take the most recent action off the log
    pub fn pop(&mut self) -> Option<Action> {
        self.actions.pop()
    }

    /// The action the next undo would revert
    #[must_use]
    pub fn peek(&self) -> Option<&Action> {
        self.actions.last()
    }

    /// Recorded actions, oldest first
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Number of actions that can still be undone
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether there is nothing to undo
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ActionKind;

    #[test]
    fn test_last_in_first_out() {
        let mut log = TransactionLog::new();
        log.record_borrow(Isbn::new("001"));
        log.record_return(Isbn::new("001"));

        assert_eq!(log.len(), 2);
        assert_eq!(log.peek().map(|a| a.kind), Some(ActionKind::Return));
        assert_eq!(log.pop(), Some(Action::return_of(Isbn::new("001"))));
        assert_eq!(log.pop(), Some(Action::borrow(Isbn::new("001"))));
        assert_eq!(log.pop(), None);
        assert!(log.is_empty());
    }
}

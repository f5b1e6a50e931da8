//! Undirected weighted graph of book affinities.
//!
//! Edges are data, not links: each unordered pair of books is stored once
//! under a canonical key, and the neighbor sets only record adjacency.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use crate::{book::Isbn, catalog::Catalog};

/// Weight added for each pair of books by the same author
pub const AUTHOR_AFFINITY: u32 = 1;

/// Weight added between a newly borrowed book and each book already held
pub const CO_BORROW_AFFINITY: u32 = 2;

/// Canonical key for an unordered pair of distinct books
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EdgeKey(Isbn, Isbn);

impl EdgeKey {
    /// Order the pair so that `{a, b}` and `{b, a}` share one key
    fn new(a: &Isbn, b: &Isbn) -> Self {
        if a <= b { Self(a.clone(), b.clone()) } else { Self(b.clone(), a.clone()) }
    }
}

/// Affinity graph over registered books
#[derive(Debug, Default, Clone)]
pub struct AffinityGraph {
    /// Registered books and the books they share an edge with
    adjacency: BTreeMap<Isbn, BTreeSet<Isbn>>,
    /// Accumulated weight per unordered pair
    weights: HashMap<EdgeKey, u32>,
    /// Pairs that have been held at the same time at least once
    co_borrowed: HashSet<EdgeKey>,
}

impl AffinityGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a book as a node; registering twice changes nothing
    pub fn add_book(&mut self, book: &Isbn) {
        self.adjacency.entry(book.clone()).or_default();
    }

    /// Whether the book is a node of the graph
    #[must_use]
    pub fn contains(&self, book: &Isbn) -> bool {
        self.adjacency.contains_key(book)
    }

    /// Add `weight` to the edge between `a` and `b`
    ///
    /// Zero weights, self-edges and edges touching an unregistered book
    /// are ignored.
    /// Returns the weight the edge had before this call, if it existed.
    pub fn add_edge(&mut self, a: &Isbn, b: &Isbn, weight: u32) -> Option<u32> {
        if weight == 0 || a == b || !self.contains(a) || !self.contains(b) {
            return None;
        }
        for (from, to) in [(a, b), (b, a)] {
            if let Some(neighbors) = self.adjacency.get_mut(from) {
                neighbors.insert(to.clone());
            }
        }
        let stored = self.weights.entry(EdgeKey::new(a, b)).or_insert(0);
        let previous = (*stored > 0).then_some(*stored);
        *stored = stored.saturating_add(weight);
        previous
    }

    /// Accumulated weight between two books, zero when unconnected
    #[must_use]
    pub fn weight(&self, a: &Isbn, b: &Isbn) -> u32 {
        self.weights.get(&EdgeKey::new(a, b)).copied().unwrap_or(0)
    }

    /// Whether the pair has ever been linked by co-borrowing
    #[must_use]
    pub fn is_co_borrowed(&self, a: &Isbn, b: &Isbn) -> bool {
        self.co_borrowed.contains(&EdgeKey::new(a, b))
    }

    /// Neighbors of `book` with their accumulated weights
    ///
    /// Empty when the book is unregistered or isolated.
    #[must_use]
    pub fn neighbors_of(&self, book: &Isbn) -> BTreeMap<Isbn, u32> {
        self.adjacency
            .get(book)
            .map(|neighbors| {
                neighbors.iter().map(|other| (other.clone(), self.weight(book, other))).collect()
            })
            .unwrap_or_default()
    }

    /// Registered books, ISBN ascending
    pub fn books(&self) -> impl Iterator<Item = &Isbn> {
        self.adjacency.keys()
    }

    /// Every edge once, as `(lower, higher, weight)` in ISBN order
    #[must_use]
    pub fn edges(&self) -> Vec<(&Isbn, &Isbn, u32)> {
        self.adjacency
            .iter()
            .flat_map(|(a, neighbors)| {
                neighbors.iter().filter(move |b| a < *b).map(move |b| (a, b, self.weight(a, b)))
            })
            .collect()
    }

    /// Number of distinct edges
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.weights.len()
    }

    /// Link every pair of books that share an author
    ///
    /// Pairs are formed within each author group only, once per unordered
    /// pair. Returns the number of pairs linked.
    pub fn link_shared_authors(&mut self, catalog: &Catalog, weight: u32) -> usize {
        let mut linked = 0usize;
        for (author, group) in catalog.by_author() {
            for (i, a) in group.iter().enumerate() {
                for b in group.iter().skip(i.saturating_add(1)) {
                    self.add_edge(a, b, weight);
                    linked = linked.saturating_add(1);
                }
            }
            tracing::trace!(author, books = group.len(), "linked author group");
        }
        linked
    }

    /// Link a newly borrowed book to every book already held
    ///
    /// Returns each held book whose edge already existed, with its weight
    /// before this borrow.
    pub fn link_co_borrowed(
        &mut self,
        held: &[Isbn],
        borrowed: &Isbn,
        weight: u32,
    ) -> Vec<(Isbn, u32)> {
        let mut strengthened = Vec::new();
        for other in held {
            if let Some(previous) = self.add_edge(other, borrowed, weight) {
                strengthened.push((other.clone(), previous));
            }
            if self.weight(other, borrowed) > 0 {
                self.co_borrowed.insert(EdgeKey::new(other, borrowed));
            }
        }
        strengthened
    }
}

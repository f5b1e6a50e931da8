//! Ranking books for a reader from their borrowing history.
//!
//! Readers with a history get books scored by the affinity weight linking
//! them to everything already borrowed, strongest first and ISBN ascending
//! among equals. Any shortfall is filled from the shelf in ISBN order.
//! Readers with no history get a random selection of available books.

use std::{cmp::Reverse, collections::BTreeMap};

use rand::{Rng, seq::IndexedRandom};
use serde::Serialize;

use crate::{
    affinity::AffinityGraph,
    book::{Book, Isbn},
    catalog::Catalog,
    session::Session,
};

/// Why a book was put forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Basis {
    /// Total affinity weight to the reader's history
    Affinity(u32),
    /// Filler taken from the shelf in ISBN order
    Shelf,
    /// Random pick for a reader with no history
    Random,
}

/// A recommended book and the reason it was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Recommendation<'a> {
    /// The recommended book
    pub book: &'a Book,
    /// Why it was recommended
    pub basis: Basis,
}

impl Recommendation<'_> {
    /// Affinity score, zero for filler and random picks
    #[must_use]
    pub fn score(&self) -> u32 {
        match self.basis {
            Basis::Affinity(score) => score,
            Basis::Shelf | Basis::Random => 0,
        }
    }
}

/// Read-only view over the state a recommendation depends on
#[derive(Debug, Clone, Copy)]
pub struct RecommendationEngine<'a> {
    /// Source of books and their availability
    catalog: &'a Catalog,
    /// Affinity weights between books
    graph: &'a AffinityGraph,
    /// The reader whose history drives the ranking
    session: &'a Session,
}

impl<'a> RecommendationEngine<'a> {
    /// Build an engine over the given state
    #[must_use]
    pub fn new(catalog: &'a Catalog, graph: &'a AffinityGraph, session: &'a Session) -> Self {
        Self { catalog, graph, session }
    }

    /// Whether `book` may be recommended at all
    fn is_candidate(&self, book: &Isbn) -> bool {
        self.catalog.is_available(book) && !self.session.history().contains(book)
    }

    /// Affinity score of every eligible neighbor of the history
    #[must_use]
    pub fn scores(&self) -> BTreeMap<Isbn, u32> {
        let mut scores: BTreeMap<Isbn, u32> = BTreeMap::new();
        for borrowed in self.session.history() {
            for (candidate, weight) in self.graph.neighbors_of(borrowed) {
                if self.is_candidate(&candidate) {
                    let score = scores.entry(candidate).or_insert(0);
                    *score = score.saturating_add(weight);
                }
            }
        }
        scores
    }

    /// Scored candidates, highest score first, ISBN ascending among equals
    #[must_use]
    pub fn ranked(&self) -> Vec<Recommendation<'a>> {
        let mut ranked: Vec<Recommendation<'a>> = self
            .scores()
            .into_iter()
            .filter_map(|(isbn, score)| {
                self.catalog
                    .by_isbn(isbn.as_str())
                    .map(|book| Recommendation { book, basis: Basis::Affinity(score) })
            })
            .collect();
        ranked.sort_by(|a, b| {
            (Reverse(a.score()), &a.book.isbn).cmp(&(Reverse(b.score()), &b.book.isbn))
        });
        ranked
    }

    /// Up to `limit` books for the reader
    ///
    /// Never includes a borrowed book or one already in the history. The
    /// random fallback for an empty history draws from `rng`, so a seeded
    /// generator gives a reproducible pick.
    pub fn recommend<R: Rng + ?Sized>(&self, limit: usize, rng: &mut R) -> Vec<Recommendation<'a>> {
        if self.session.history().is_empty() {
            let shelf: Vec<&'a Book> = self.catalog.available().collect();
            tracing::debug!(available = shelf.len(), limit, "no history, picking at random");
            return shelf
                .choose_multiple(rng, limit)
                .copied()
                .map(|book| Recommendation { book, basis: Basis::Random })
                .collect();
        }

        let mut picks = self.ranked();
        tracing::debug!(scored = picks.len(), limit, "ranked affinity candidates");
        picks.truncate(limit);

        let shortfall = limit.saturating_sub(picks.len());
        if shortfall > 0 {
            let filler: Vec<Recommendation<'a>> = self
                .catalog
                .available()
                .filter(|book| !self.session.history().contains(&book.isbn))
                .filter(|book| !picks.iter().any(|pick| pick.book.isbn == book.isbn))
                .take(shortfall)
                .map(|book| Recommendation { book, basis: Basis::Shelf })
                .collect();
            picks.extend(filler);
        }
        picks
    }
}

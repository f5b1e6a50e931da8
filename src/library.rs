use std::{collections::BTreeSet, fmt, path::Path};

use rand::{RngCore, SeedableRng, rngs::StdRng};

use crate::{
    affinity::AffinityGraph,
    book::{Book, Isbn},
    catalog::Catalog,
    config::LibraryConfig,
    error::{LibraryError, Result},
    events::{ActionKind, LibraryEvent},
    genre::{GenreNode, GenreTree},
    ingest::{self, BookRecord},
    observers::LibraryObserver,
    recommend::{Recommendation, RecommendationEngine},
    session::Session,
    transaction::TransactionLog,
};

/// A single reader's library: catalog, classification, affinities,
/// borrowing session and undo log, mutated only through its operations
pub struct Library {
    /// Every book, owner of availability
    catalog: Catalog,
    /// Genre classification of the catalog
    genres: GenreTree,
    /// Authorship and co-borrow affinities
    affinity: AffinityGraph,
    /// The reader's held books and history
    session: Session,
    /// Borrow and return actions that can be undone
    log: TransactionLog,
    /// Settings the library was built with
    config: LibraryConfig,
    /// Source of randomness for the empty-history fallback
    rng: Box<dyn RngCore>,
    /// Registered state change observers
    observers: Vec<Box<dyn LibraryObserver>>,
}

// Manual implementation of Debug for Library
impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("catalog", &self.catalog)
            .field("genres", &self.genres)
            .field("affinity", &self.affinity)
            .field("session", &self.session)
            .field("log", &self.log)
            .field("config", &self.config)
            .field("observers_count", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Library {
    /// Build a library from parsed records
    ///
    /// The random fallback is seeded from `config.seed`, or from OS entropy
    /// when no seed is set.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::DuplicateIsbn` or `LibraryError::DuplicateTitle`
    /// if two records share a unique key.
    pub fn from_records(records: Vec<BookRecord>, config: LibraryConfig) -> Result<Self> {
        let rng: Box<dyn RngCore> = match config.seed {
            Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
            None => Box::new(StdRng::from_os_rng()),
        };
        Self::with_rng(records, config, rng)
    }

    /// Build a library drawing random picks from `rng`
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::DuplicateIsbn` or `LibraryError::DuplicateTitle`
    /// if two records share a unique key.
    pub fn with_rng(
        records: Vec<BookRecord>,
        config: LibraryConfig,
        rng: Box<dyn RngCore>,
    ) -> Result<Self> {
        let mut catalog = Catalog::new();
        let mut genres = GenreTree::new();
        let mut affinity = AffinityGraph::new();

        for record in records {
            let book = Book::from(record);
            genres.classify(&book.genre_path, book.isbn.clone());
            affinity.add_book(&book.isbn);
            catalog.insert(book)?;
        }
        let pairs = affinity.link_shared_authors(&catalog, config.author_affinity);
        tracing::debug!(books = catalog.len(), author_pairs = pairs, "library loaded");

        Ok(Self {
            catalog,
            genres,
            affinity,
            session: Session::new(),
            log: TransactionLog::new(),
            config,
            rng,
            observers: Vec::new(),
        })
    }

    /// Read a catalog file and build a library from it
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::Io` if the file cannot be read,
    /// `LibraryError::MalformedRecord` for a bad line, or a duplicate key error.
    pub fn load(path: &Path, config: LibraryConfig) -> Result<Self> {
        let records = ingest::read_catalog(path, &config)?;
        Self::from_records(records, config)
    }

    /// Register an observer to be notified of state changes
    pub fn register_observer(&mut self, observer: Box<dyn LibraryObserver>) {
        self.observers.push(observer);
    }

    /// Tell every observer about `event`
    fn notify(&self, event: &LibraryEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }

    /// Find a book by ISBN
    #[must_use]
    pub fn lookup_by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.catalog.by_isbn(isbn)
    }

    /// Find a book by exact title
    #[must_use]
    pub fn lookup_by_title(&self, title: &str) -> Option<&Book> {
        self.catalog.by_title(title)
    }

    /// Resolve an ISBN to the catalog's identity for it
    fn resolve(&self, isbn: &str) -> Result<Isbn> {
        self.catalog
            .by_isbn(isbn)
            .map(|book| book.isbn.clone())
            .ok_or_else(|| LibraryError::BookNotFound(isbn.to_string()))
    }

    /// Set a catalog book's availability
    fn set_available(&mut self, isbn: &Isbn, available: bool) {
        if let Some(book) = self.catalog.by_isbn_mut(isbn.as_str()) {
            book.is_available = available;
        }
    }

    /// Borrow the book with the given ISBN
    ///
    /// Links the book to everything already held before adding it to the
    /// session, then records the borrow for undo.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::BookNotFound` for an unknown ISBN and
    /// `LibraryError::BookUnavailable` if the book is already borrowed.
    pub fn borrow(&mut self, isbn: &str) -> Result<&Book> {
        let isbn = self.resolve(isbn)?;
        if !self.catalog.is_available(&isbn) {
            return Err(LibraryError::BookUnavailable(isbn));
        }

        let strengthened = self.affinity.link_co_borrowed(
            self.session.currently_borrowed(),
            &isbn,
            self.config.co_borrow_affinity,
        );
        self.session.borrow(&isbn);
        self.set_available(&isbn, false);
        self.log.record_borrow(isbn.clone());
        self.notify(&LibraryEvent::Borrowed { book: isbn.clone(), strengthened });

        self.resolve_book(&isbn)
    }

    /// Return a held book to the shelf
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::BookNotFound` for an unknown ISBN and
    /// `LibraryError::NotBorrowed` if the session does not hold the book.
    pub fn return_book(&mut self, isbn: &str) -> Result<&Book> {
        let isbn = self.resolve(isbn)?;
        if !self.session.return_book(&isbn) {
            return Err(LibraryError::NotBorrowed(isbn));
        }

        self.set_available(&isbn, true);
        self.log.record_return(isbn.clone());
        self.notify(&LibraryEvent::Returned { book: isbn.clone() });

        self.resolve_book(&isbn)
    }

    /// Revert the most recent borrow or return
    ///
    /// An undone borrow disappears from the history as well; an undone
    /// return puts the book back in the session without re-adding affinity,
    /// which the earlier borrow already recorded.
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::NothingToUndo` when the log is empty.
    pub fn undo(&mut self) -> Result<&Book> {
        let action = self.log.pop().ok_or(LibraryError::NothingToUndo)?;
        match action.kind {
            ActionKind::Borrow => {
                self.set_available(&action.book, true);
                self.session.undo_borrow(&action.book);
            }
            ActionKind::Return => {
                self.set_available(&action.book, false);
                self.session.restore(&action.book);
            }
        }
        let isbn = action.book.clone();
        self.notify(&LibraryEvent::Undone(action));

        self.resolve_book(&isbn)
    }

    /// Catalog entry for an identity the library handed out
    fn resolve_book(&self, isbn: &Isbn) -> Result<&Book> {
        self.catalog
            .by_isbn(isbn.as_str())
            .ok_or_else(|| LibraryError::BookNotFound(isbn.to_string()))
    }

    /// Up to `limit` recommended books with the reason for each
    pub fn recommend_explained(&mut self, limit: usize) -> Vec<Recommendation<'_>> {
        let engine = RecommendationEngine::new(&self.catalog, &self.affinity, &self.session);
        engine.recommend(limit, &mut *self.rng)
    }

    /// Up to `limit` recommended books, best first
    pub fn recommend(&mut self, limit: usize) -> Vec<&Book> {
        self.recommend_explained(limit).into_iter().map(|rec| rec.book).collect()
    }

    /// Recommendations using the configured default limit
    pub fn recommend_default(&mut self) -> Vec<&Book> {
        self.recommend(self.config.recommendation_limit)
    }

    /// Every genre node with this exact name
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::GenreNotFound` when no node matches.
    pub fn genres_named(&self, name: &str) -> Result<Vec<&GenreNode>> {
        let nodes = self.genres.find_all_named(name);
        if nodes.is_empty() {
            return Err(LibraryError::GenreNotFound(name.to_string()));
        }
        Ok(nodes)
    }

    /// Books filed under `node` or its sub-genres, ISBN ascending
    #[must_use]
    pub fn books_under(&self, node: &GenreNode) -> Vec<&Book> {
        GenreTree::reachable_books(node)
            .iter()
            .filter_map(|isbn| self.catalog.by_isbn(isbn.as_str()))
            .collect()
    }

    /// Books under every genre node with this name, ISBN ascending
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::GenreNotFound` when no node matches.
    pub fn books_in_genre(&self, name: &str) -> Result<Vec<&Book>> {
        let mut isbns = BTreeSet::new();
        for node in self.genres_named(name)? {
            isbns.extend(GenreTree::reachable_books(node));
        }
        Ok(isbns.iter().filter_map(|isbn| self.catalog.by_isbn(isbn.as_str())).collect())
    }

    /// Available, not yet borrowed books in the named genre, ISBN ascending
    ///
    /// # Errors
    ///
    /// Returns `LibraryError::GenreNotFound` when no node matches.
    pub fn recommend_in_genre(&self, name: &str) -> Result<Vec<&Book>> {
        Ok(self
            .books_in_genre(name)?
            .into_iter()
            .filter(|book| book.is_available && !self.session.history().contains(&book.isbn))
            .collect())
    }

    /// Names of every genre in the tree
    #[must_use]
    pub fn all_genre_names(&self) -> BTreeSet<String> {
        self.genres.all_names()
    }

    /// Books presently held, in borrow order
    #[must_use]
    pub fn currently_borrowed(&self) -> Vec<&Book> {
        self.session
            .currently_borrowed()
            .iter()
            .filter_map(|isbn| self.catalog.by_isbn(isbn.as_str()))
            .collect()
    }

    /// Every book borrowed this session, ISBN ascending
    #[must_use]
    pub fn history(&self) -> Vec<&Book> {
        self.session
            .history()
            .iter()
            .filter_map(|isbn| self.catalog.by_isbn(isbn.as_str()))
            .collect()
    }

    /// The catalog
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The genre tree
    #[must_use]
    pub fn genres(&self) -> &GenreTree {
        &self.genres
    }

    /// The affinity graph
    #[must_use]
    pub fn affinity(&self) -> &AffinityGraph {
        &self.affinity
    }

    /// The reader's session
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The undo log
    #[must_use]
    pub fn transactions(&self) -> &TransactionLog {
        &self.log
    }

    /// Settings the library was built with
    #[must_use]
    pub fn config(&self) -> &LibraryConfig {
        &self.config
    }
}

//! Single-reader library catalog.
//!
//! Books are classified into a genre tree, linked by an affinity graph
//! built from shared authorship and co-borrowing, and borrowed through a
//! session whose most recent actions can be undone one at a time. A
//! recommendation engine ranks books by their affinity to what the reader
//! has already borrowed.

pub mod affinity;
pub mod book;
pub mod catalog;
pub mod config;
pub mod console;
pub mod error;
pub mod events;
pub mod genre;
pub mod ingest;
pub mod library;
pub mod observers;
pub mod recommend;
pub mod session;
pub mod transaction;
pub mod visualization;

pub use book::{Book, Isbn};
pub use config::LibraryConfig;
pub use error::LibraryError;
pub use events::{Action, ActionKind, LibraryEvent};
pub use genre::{GenreNode, GenreTree};
pub use library::Library;
pub use recommend::{Basis, Recommendation};
pub use visualization::LibraryVisualization;

//! Hierarchical genre classification.
//!
//! The tree is an owned value: each node owns its children in creation
//! order. Node names are unique among siblings only, so "Classics" under
//! "Fiction" and "Classics" under "Poetry" are unrelated nodes.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::book::Isbn;

/// Name of the sentinel root node
pub const ROOT_NAME: &str = "Library";

/// One classification in the genre tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreNode {
    /// Genre name as it appeared in the catalog
    name: String,
    /// Books classified directly at this node, in classification order
    books: Vec<Isbn>,
    /// Sub-genres in creation order
    children: Vec<GenreNode>,
}

impl GenreNode {
    /// Create an empty node
    fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), books: Vec::new(), children: Vec::new() }
    }

    /// Genre name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Books classified directly here, not in sub-genres
    #[must_use]
    pub fn books(&self) -> &[Isbn] {
        &self.books
    }

    /// Sub-genres in creation order
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Position of the child with this exact name, creating it if missing
    #[allow(clippy::arithmetic_side_effects)]
    fn child_index(&mut self, name: &str) -> usize {
        if let Some(pos) = self.children.iter().position(|child| child.name == name) {
            pos
        } else {
            self.children.push(Self::new(name));
            self.children.len() - 1
        }
    }

    /// Pre-order walk over the strict descendants of this node
    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a Self>) {
        for child in &self.children {
            if child.name == name {
                found.push(child);
            }
            child.collect_named(name, found);
        }
    }

    /// Add this node's books and every descendant's books to `out`
    fn collect_books(&self, out: &mut BTreeSet<Isbn>) {
        out.extend(self.books.iter().cloned());
        for child in &self.children {
            child.collect_books(out);
        }
    }

    /// Add every descendant's name to `out`
    fn collect_names(&self, out: &mut BTreeSet<String>) {
        for child in &self.children {
            out.insert(child.name.clone());
            child.collect_names(out);
        }
    }
}

/// Genre taxonomy rooted at the sentinel "Library" node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreTree {
    /// Sentinel root, never reported by name lookups
    root: GenreNode,
}

impl Default for GenreTree {
    fn default() -> Self {
        Self::new()
    }
}

impl GenreTree {
    /// Create a tree holding only the root
    #[must_use]
    pub fn new() -> Self {
        Self { root: GenreNode::new(ROOT_NAME) }
    }

    /// Sentinel root node
    #[must_use]
    pub fn root(&self) -> &GenreNode {
        &self.root
    }

    /// File `book` under the node reached by following `path` from the root
    ///
    /// Missing nodes along the path are created in path order. Names are
    /// compared exactly, without case or whitespace folding. An empty path
    /// files the book at the root.
    pub fn classify<S: AsRef<str>>(&mut self, path: &[S], book: Isbn) {
        let mut node = &mut self.root;
        for segment in path {
            let idx = node.child_index(segment.as_ref());
            // child_index guarantees idx is in bounds
            let Some(child) = node.children.get_mut(idx) else {
                return;
            };
            node = child;
        }
        node.books.push(book);
    }

    /// Every non-root node named `name`, depth-first in creation order
    #[must_use]
    pub fn find_all_named(&self, name: &str) -> Vec<&GenreNode> {
        let mut found = Vec::new();
        self.root.collect_named(name, &mut found);
        found
    }

    /// Books filed at `node` or anywhere beneath it, deduplicated
    #[must_use]
    pub fn reachable_books(node: &GenreNode) -> BTreeSet<Isbn> {
        let mut out = BTreeSet::new();
        node.collect_books(&mut out);
        out
    }

    /// Names of all non-root nodes
    #[must_use]
    pub fn all_names(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.root.collect_names(&mut out);
        out
    }
}

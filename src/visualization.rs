use std::{fs::File, io::Write, path::Path};

use crate::{
    events::{Action, ActionKind},
    genre::{GenreNode, GenreTree},
    library::Library,
};

/// Text and Graphviz renderings of library state
#[derive(Debug)]
pub struct LibraryVisualization;

impl LibraryVisualization {
    /// Indented outline of the genre tree with book counts
    ///
    /// Each line shows the books filed directly at the node and, in
    /// brackets, everything reachable beneath it.
    #[must_use]
    pub fn genre_outline(tree: &GenreTree) -> String {
        let mut out = String::new();
        Self::outline_node(tree.root(), 0, &mut out);
        out
    }

    /// Append `node` and its children at the given depth
    fn outline_node(node: &GenreNode, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        out.push_str(&format!(
            "{indent}{} ({} direct, {} total)\n",
            node.name(),
            node.books().len(),
            GenreTree::reachable_books(node).len()
        ));
        for child in node.children() {
            Self::outline_node(child, depth.saturating_add(1), out);
        }
    }

    /// Generate a DOT graph of the affinity graph
    ///
    /// Nodes are labelled with titles and borrowed books are highlighted.
    /// Edge labels carry the accumulated weight; pairs that were ever held
    /// together are drawn in red.
    #[must_use]
    pub fn affinity_dot(library: &Library) -> String {
        let mut dot = String::from("graph affinity {\n");
        dot.push_str("  node [shape=box, style=filled, fillcolor=lightblue];\n");

        for isbn in library.affinity().books() {
            let Some(book) = library.lookup_by_isbn(isbn.as_str()) else {
                continue;
            };
            let label = Self::escape(&book.title);
            if library.session().is_holding(isbn) {
                dot.push_str(&format!(
                    "  \"{isbn}\" [label=\"{label}\", fillcolor=palegreen, peripheries=2];\n"
                ));
            } else {
                dot.push_str(&format!("  \"{isbn}\" [label=\"{label}\"];\n"));
            }
        }

        for (a, b, weight) in library.affinity().edges() {
            let style = if library.affinity().is_co_borrowed(a, b) {
                "color=red, penwidth=2.0"
            } else {
                "color=black"
            };
            dot.push_str(&format!("  \"{a}\" -- \"{b}\" [label=\"{weight}\", {style}];\n"));
        }

        dot.push_str("}\n");
        dot
    }

    /// Escape a label for use inside a quoted DOT string
    fn escape(label: &str) -> String {
        label.replace('\\', "\\\\").replace('"', "\\\"")
    }

    /// Save the DOT representation to a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to
    pub fn save_dot_to_file(dot: &str, path: &Path) -> Result<(), std::io::Error> {
        let mut file = File::create(path)?;
        file.write_all(dot.as_bytes())?;
        Ok(())
    }

    /// Generate a markdown table of the undo log, oldest first
    #[must_use]
    #[allow(clippy::arithmetic_side_effects)]
    pub fn log_table(library: &Library, actions: &[Action]) -> String {
        if actions.is_empty() {
            return "No actions recorded yet.".to_string();
        }

        let mut table = String::from("| # | Action | ISBN | Title |\n");
        table.push_str("|---|--------|------|-------|\n");

        for (i, action) in actions.iter().enumerate() {
            let kind = match action.kind {
                ActionKind::Borrow => "Borrow",
                ActionKind::Return => "Return",
            };
            let title = library.lookup_by_isbn(action.book.as_str()).map_or("?", |b| b.title.as_str());
            table.push_str(&format!("| {} | {kind} | {} | {title} |\n", i + 1, action.book));
        }

        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{book::Isbn, config::LibraryConfig, ingest::parse_catalog};

    /// Library over a small two-author catalog
    #[allow(clippy::panic)]
    fn library() -> Library {
        let text = "Dune,001,Herbert,Fiction/SciFi\nChildren of Dune,002,Herbert,Fiction/SciFi\nIt,003,King,Fiction/Horror\n";
        let config = LibraryConfig { seed: Some(1), ..LibraryConfig::default() };
        let built = parse_catalog(text, &config).and_then(|records| Library::from_records(records, config));
        match built {
            Ok(library) => library,
            Err(e) => panic!("test catalog rejected: {e}"),
        }
    }

    #[test]
    fn test_genre_outline_counts() {
        let library = library();
        let outline = LibraryVisualization::genre_outline(library.genres());
        let lines: Vec<&str> = outline.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Library (0 direct, 3 total)",
                "  Fiction (0 direct, 3 total)",
                "    SciFi (2 direct, 2 total)",
                "    Horror (1 direct, 1 total)",
            ]
        );
    }

    #[test]
    fn test_affinity_dot_marks_edges_and_holdings() {
        let mut library = library();
        assert!(library.borrow("001").is_ok());
        assert!(library.borrow("002").is_ok());

        let dot = LibraryVisualization::affinity_dot(&library);
        assert!(dot.starts_with("graph affinity {"));
        assert!(dot.contains("\"001\" -- \"002\" [label=\"3\", color=red, penwidth=2.0];"));
        assert!(dot.contains("\"001\" [label=\"Dune\", fillcolor=palegreen, peripheries=2];"));
        assert!(dot.contains("\"003\" [label=\"It\"];"));
    }

    #[test]
    #[allow(clippy::panic)]
    fn test_affinity_dot_colours_only_co_borrowed_pairs() {
        let text = "Dune,001,Herbert,Fiction\nChildren of Dune,002,Herbert,Fiction\nIt,003,King,Fiction\n";
        let config = LibraryConfig {
            seed: Some(1),
            author_affinity: 2,
            co_borrow_affinity: 1,
            ..LibraryConfig::default()
        };
        let built = parse_catalog(text, &config).and_then(|records| Library::from_records(records, config));
        let mut library = match built {
            Ok(library) => library,
            Err(e) => panic!("test catalog rejected: {e}"),
        };
        assert!(library.borrow("001").is_ok());
        assert!(library.borrow("003").is_ok());

        let dot = LibraryVisualization::affinity_dot(&library);
        assert!(dot.contains("\"001\" -- \"002\" [label=\"2\", color=black];"));
        assert!(dot.contains("\"001\" -- \"003\" [label=\"1\", color=red, penwidth=2.0];"));
    }

    #[test]
    fn test_log_table_rows() {
        let mut library = library();
        assert!(library.borrow("003").is_ok());
        assert!(library.return_book("003").is_ok());

        let table = LibraryVisualization::log_table(&library, library.transactions().actions());
        assert!(table.contains("| 1 | Borrow | 003 | It |"));
        assert!(table.contains("| 2 | Return | 003 | It |"));
        assert_eq!(
            LibraryVisualization::log_table(&library, &[]),
            "No actions recorded yet."
        );
        assert!(library.session().history().contains(&Isbn::new("003")));
    }
}

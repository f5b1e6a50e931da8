//! Line-oriented console over a [`Library`].
//!
//! Reads one command per line and writes coloured, paginated results.
//! Library errors are reported and the loop carries on; only I/O failures
//! end the session early.

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    str::FromStr,
};

use colored::Colorize;

use crate::{
    book::Book,
    error::LibraryError,
    events::ActionKind,
    library::Library,
    recommend::Basis,
    visualization::LibraryVisualization,
};

/// Help text listing every command
const HELP: &str = "\
Commands:
  borrow <isbn>          Borrow a book
  return <isbn>          Return a borrowed book
  undo                   Undo the last borrow or return
  search isbn <isbn>     Look a book up by ISBN
  search title <title>   Look a book up by exact title
  genre <name>           Show books in every genre with this name
  genres                 List all genre names
  recommend [n]          Recommend books from your borrowing history
  prefer <genre>         Recommend unread books in a genre
  tree                   Show the genre tree
  graph [file]           Print or save the affinity graph as DOT
  history                Show held and previously borrowed books
  log                    Show the undo log
  help                   Show this help
  quit                   Exit";

/// A parsed console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Borrow by ISBN
    Borrow(String),
    /// Return by ISBN
    Return(String),
    /// Undo the last action
    Undo,
    /// Look up by ISBN
    SearchIsbn(String),
    /// Look up by exact title
    SearchTitle(String),
    /// List books under a genre name
    Genre(String),
    /// List genre names
    Genres,
    /// Recommend, optionally overriding the limit
    Recommend(Option<usize>),
    /// Recommend within a genre
    Prefer(String),
    /// Print the genre tree
    Tree,
    /// Print the affinity graph, or save it when a path is given
    Graph(Option<PathBuf>),
    /// Show held books and history
    History,
    /// Show the undo log
    Log,
    /// Show help
    Help,
    /// Leave the console
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let argument = |usage: &str| {
            if rest.is_empty() { Err(format!("Usage: {usage}")) } else { Ok(rest.to_string()) }
        };

        match verb.to_ascii_lowercase().as_str() {
            "borrow" => argument("borrow <isbn>").map(Self::Borrow),
            "return" => argument("return <isbn>").map(Self::Return),
            "undo" => Ok(Self::Undo),
            "search" => match rest.split_once(char::is_whitespace) {
                Some(("isbn", key)) if !key.trim().is_empty() => Ok(Self::SearchIsbn(key.trim().to_string())),
                Some(("title", key)) if !key.trim().is_empty() => Ok(Self::SearchTitle(key.trim().to_string())),
                _ => Err("Usage: search isbn <isbn> | search title <title>".to_string()),
            },
            "genre" => argument("genre <name>").map(Self::Genre),
            "genres" => Ok(Self::Genres),
            "recommend" if rest.is_empty() => Ok(Self::Recommend(None)),
            "recommend" => rest
                .parse()
                .map(|n| Self::Recommend(Some(n)))
                .map_err(|_| "Usage: recommend [count]".to_string()),
            "prefer" => argument("prefer <genre>").map(Self::Prefer),
            "tree" => Ok(Self::Tree),
            "graph" => Ok(Self::Graph((!rest.is_empty()).then(|| PathBuf::from(rest)))),
            "history" => Ok(Self::History),
            "log" => Ok(Self::Log),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            "" => Err("Type 'help' for a list of commands.".to_string()),
            other => Err(format!("Invalid choice: {other}. Type 'help' for a list of commands.")),
        }
    }
}

/// Interactive session reading from `R` and writing to `W`
#[derive(Debug)]
pub struct Console<R, W> {
    /// The library being operated on
    library: Library,
    /// Command source
    input: R,
    /// Result sink
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Create a console over `library`
    #[must_use]
    pub fn new(library: Library, input: R, output: W) -> Self {
        Self { library, input, output }
    }

    /// Give the library back, e.g. to inspect it after a scripted run
    #[must_use]
    pub fn into_library(self) -> Library {
        self.library
    }

    /// Next input line, `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }

    /// Run until `quit` or end of input
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "{}", "--- Library Management ---".green().bold())?;
        writeln!(
            self.output,
            "{} books loaded. Type 'help' for commands.",
            self.library.catalog().len()
        )?;

        loop {
            write!(self.output, "{} ", ">".bold())?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                break;
            };
            match line.parse::<Command>() {
                Ok(Command::Quit) => {
                    writeln!(self.output, "Exiting...")?;
                    break;
                }
                Ok(command) => self.execute(command)?,
                Err(message) => writeln!(self.output, "{}", message.yellow())?,
            }
        }
        Ok(())
    }

    /// Carry out one command
    ///
    /// # Errors
    ///
    /// Returns an error if writing output fails.
    pub fn execute(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Borrow(isbn) => match self.library.borrow(&isbn) {
                Ok(book) => {
                    let line = format!("Book borrowed: {}", book.title);
                    writeln!(self.output, "{}", line.green())
                }
                Err(e) => writeln!(self.output, "{}", e.to_string().red()),
            },
            Command::Return(isbn) => match self.library.return_book(&isbn) {
                Ok(book) => {
                    let line = format!("Book returned: {}", book.title);
                    writeln!(self.output, "{}", line.green())
                }
                Err(e) => writeln!(self.output, "{}", e.to_string().red()),
            },
            Command::Undo => self.undo(),
            Command::SearchIsbn(isbn) => {
                let found = self.library.lookup_by_isbn(&isbn).map(Self::describe);
                self.report_lookup(found, &isbn)
            }
            Command::SearchTitle(title) => {
                let found = self.library.lookup_by_title(&title).map(Self::describe);
                self.report_lookup(found, &title)
            }
            Command::Genre(name) => self.show_genre(&name),
            Command::Genres => {
                let names: Vec<String> = self.library.all_genre_names().into_iter().collect();
                self.page(&names)
            }
            Command::Recommend(count) => self.show_recommendations(count),
            Command::Prefer(genre) => {
                let lines: Vec<String> = match self.library.recommend_in_genre(&genre) {
                    Ok(books) => books.into_iter().map(Self::list_line).collect(),
                    Err(e) => return writeln!(self.output, "{}", e.to_string().red()),
                };
                if lines.is_empty() {
                    return writeln!(self.output, "{}", "No recommendations available.".yellow());
                }
                let header = format!("Recommended books in genre '{genre}':");
                writeln!(self.output, "{}", header.bold())?;
                self.page(&lines)
            }
            Command::Tree => {
                let outline = LibraryVisualization::genre_outline(self.library.genres());
                let lines: Vec<String> = outline.lines().map(ToString::to_string).collect();
                self.page(&lines)
            }
            Command::Graph(None) => {
                let dot = LibraryVisualization::affinity_dot(&self.library);
                write!(self.output, "{dot}")
            }
            Command::Graph(Some(path)) => {
                let dot = LibraryVisualization::affinity_dot(&self.library);
                match LibraryVisualization::save_dot_to_file(&dot, &path) {
                    Ok(()) => writeln!(self.output, "Affinity graph saved to {}", path.display()),
                    Err(e) => writeln!(self.output, "{}", format!("Could not save graph: {e}").red()),
                }
            }
            Command::History => self.show_history(),
            Command::Log => {
                let table =
                    LibraryVisualization::log_table(&self.library, self.library.transactions().actions());
                writeln!(self.output, "{table}")
            }
            Command::Help => writeln!(self.output, "{HELP}"),
            Command::Quit => Ok(()),
        }
    }

    /// One-line summary used by searches
    fn describe(book: &Book) -> String {
        format!("{} by {} [{}]", book.title, book.author, book.status_label())
    }

    /// Listing line in the shape `- title (isbn) [status]`
    fn list_line(book: &Book) -> String {
        format!("- {} ({}) [{}]", book.title, book.isbn, book.status_label())
    }

    /// Undo the last action and say which way it went
    fn undo(&mut self) -> io::Result<()> {
        let kind = self.library.transactions().peek().map(|action| action.kind);
        match (kind, self.library.undo()) {
            (Some(ActionKind::Borrow), Ok(book)) => {
                let line = format!("Undo: Book returned ({})", book.title);
                writeln!(self.output, "{}", line.cyan())
            }
            (_, Ok(book)) => {
                let line = format!("Undo: Book borrowed again ({})", book.title);
                writeln!(self.output, "{}", line.cyan())
            }
            (_, Err(e)) => writeln!(self.output, "{}", e.to_string().red()),
        }
    }

    /// Print recommendations along with why each was picked
    fn show_recommendations(&mut self, count: Option<usize>) -> io::Result<()> {
        let limit = count.unwrap_or(self.library.config().recommendation_limit);
        let lines: Vec<String> = self
            .library
            .recommend_explained(limit)
            .iter()
            .map(|rec| {
                let basis = match rec.basis {
                    Basis::Affinity(score) => format!("affinity {score}"),
                    Basis::Shelf => "on the shelf".to_string(),
                    Basis::Random => "random pick".to_string(),
                };
                format!("{} ({basis})", Self::list_line(rec.book))
            })
            .collect();
        if lines.is_empty() {
            return writeln!(self.output, "{}", "No recommendations available.".yellow());
        }
        writeln!(self.output, "{}", "Recommended books:".bold())?;
        self.page(&lines)
    }

    /// Print a lookup result or a not-found message
    fn report_lookup(&mut self, found: Option<String>, key: &str) -> io::Result<()> {
        match found {
            Some(line) => writeln!(self.output, "{line}"),
            None => {
                let message = LibraryError::BookNotFound(key.to_string()).to_string();
                writeln!(self.output, "{}", message.red())
            }
        }
    }

    /// Print every genre node with this name and the books beneath it
    fn show_genre(&mut self, name: &str) -> io::Result<()> {
        let sections: Vec<Vec<String>> = match self.library.genres_named(name) {
            Ok(nodes) => nodes
                .iter()
                .map(|node| self.library.books_under(node).into_iter().map(Self::list_line).collect())
                .collect(),
            Err(e) => return writeln!(self.output, "{}", e.to_string().red()),
        };
        let count = sections.len();
        for (idx, lines) in sections.iter().enumerate() {
            let header = if count > 1 {
                format!("Books in genre '{name}' ({} of {count}):", idx.saturating_add(1))
            } else {
                format!("Books in genre '{name}':")
            };
            writeln!(self.output, "{}", header.bold())?;
            if lines.is_empty() {
                writeln!(self.output, "  (no books)")?;
            }
            self.page(lines)?;
        }
        Ok(())
    }

    /// Print held books followed by the full borrowing history
    fn show_history(&mut self) -> io::Result<()> {
        let held: Vec<String> =
            self.library.currently_borrowed().into_iter().map(Self::list_line).collect();
        let history: Vec<String> = self.library.history().into_iter().map(Self::list_line).collect();

        writeln!(self.output, "{}", "Currently borrowed:".bold())?;
        if held.is_empty() {
            writeln!(self.output, "  (none)")?;
        }
        self.page(&held)?;
        writeln!(self.output, "{}", "Borrowed this session:".bold())?;
        if history.is_empty() {
            writeln!(self.output, "  (none)")?;
        }
        self.page(&history)
    }

    /// Print `lines` a page at a time, asking before each further page
    fn page(&mut self, lines: &[String]) -> io::Result<()> {
        let page_size = self.library.config().page_size.max(1);
        let mut pages = lines.chunks(page_size).peekable();
        while let Some(page) = pages.next() {
            for line in page {
                writeln!(self.output, "{line}")?;
            }
            if pages.peek().is_some() {
                write!(self.output, "{}", "-- more: Enter to continue, q to stop -- ".dimmed())?;
                self.output.flush()?;
                match self.read_line()? {
                    Some(answer) if answer.eq_ignore_ascii_case("q") => break,
                    None => break,
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{config::LibraryConfig, ingest::parse_catalog};

    /// Catalog shared by the console tests
    const CATALOG: &str = "\
Dune,001,Herbert,Fiction/SciFi
Children of Dune,002,Herbert,Fiction/SciFi
It,003,King,Fiction/Horror
Emma,004,Austen,Fiction/Classics
Iliad,005,Homer,Poetry/Classics
";

    /// Run `script` against a fresh library and return the output
    #[allow(clippy::panic)]
    fn run_script(script: &str, page_size: usize) -> (String, Library) {
        colored::control::set_override(false);
        let config = LibraryConfig { seed: Some(3), page_size, ..LibraryConfig::default() };
        let library = match parse_catalog(CATALOG, &config)
            .and_then(|records| Library::from_records(records, config))
        {
            Ok(library) => library,
            Err(e) => panic!("test catalog rejected: {e}"),
        };
        let mut output = Vec::new();
        let mut console = Console::new(library, Cursor::new(script.as_bytes()), &mut output);
        if let Err(e) = console.run() {
            panic!("console failed: {e}");
        }
        let library = console.into_library();
        (String::from_utf8_lossy(&output).into_owned(), library)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("borrow 001".parse::<Command>(), Ok(Command::Borrow("001".to_string())));
        assert_eq!(
            "search title Children of Dune".parse::<Command>(),
            Ok(Command::SearchTitle("Children of Dune".to_string()))
        );
        assert_eq!("RECOMMEND 5".parse::<Command>(), Ok(Command::Recommend(Some(5))));
        assert_eq!("recommend".parse::<Command>(), Ok(Command::Recommend(None)));
        assert_eq!("graph".parse::<Command>(), Ok(Command::Graph(None)));
        assert!("borrow".parse::<Command>().is_err());
        assert!("recommend lots".parse::<Command>().is_err());
        assert!("search author King".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
    }

    #[test]
    fn test_borrow_return_undo_session() {
        let script = "borrow 001\nborrow 001\nreturn 003\nreturn 001\nundo\nundo\nundo\nquit\n";
        let (output, library) = run_script(script, 10);

        assert!(output.contains("Book borrowed: Dune"));
        assert!(output.contains("Book is already borrowed: 001"));
        assert!(output.contains("Book is not currently borrowed: 003"));
        assert!(output.contains("Book returned: Dune"));
        assert!(output.contains("Undo: Book borrowed again (Dune)"));
        assert!(output.contains("Undo: Book returned (Dune)"));
        assert!(output.contains("No actions to undo"));
        assert!(output.contains("Exiting..."));
        assert!(library.session().history().is_empty());
    }

    #[test]
    fn test_search_and_genre_listing() {
        let script = "search isbn 003\nsearch title Emma\nsearch title Nope\ngenre Classics\ngenre Jazz\n";
        let (output, _) = run_script(script, 10);

        assert!(output.contains("It by King [Available]"));
        assert!(output.contains("Emma by Austen [Available]"));
        assert!(output.contains("Book not found: Nope"));
        assert!(output.contains("Books in genre 'Classics' (1 of 2):"));
        assert!(output.contains("- Emma (004) [Available]"));
        assert!(output.contains("- Iliad (005) [Available]"));
        assert!(output.contains("Genre not found: Jazz"));
    }

    #[test]
    fn test_recommendations_explain_basis() {
        let (output, _) = run_script("borrow 001\nrecommend 2\nprefer SciFi\n", 10);

        assert!(output.contains("- Children of Dune (002) [Available] (affinity 1)"));
        assert!(output.contains("- It (003) [Available] (on the shelf)"));
        assert!(output.contains("Recommended books in genre 'SciFi':"));
    }

    #[test]
    fn test_paging_stops_on_q() {
        let (output, _) = run_script("genres\nq\nhistory\n", 2);

        assert!(output.contains("Classics\nFiction\n"));
        assert!(output.contains("-- more"));
        assert!(!output.contains("Horror"));
        assert!(output.contains("Currently borrowed:"));
    }
}

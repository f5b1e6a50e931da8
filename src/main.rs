use std::{io, path::PathBuf};

use bookshelf::{
    Library, LibraryConfig, LibraryError,
    console::Console,
    observers::{NotificationService, TransactionLogger},
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the library console
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Catalog file, one `title,isbn,author,genre/path` record per line
    #[arg(default_value = "books.txt")]
    catalog: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for random recommendations, for reproducible sessions
    #[arg(long)]
    seed: Option<u64>,

    /// Default number of recommendations
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Enable verbose output with detailed operation logs
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), LibraryError> {
    let args = Args::parse();

    // RUST_LOG wins over the verbosity flag
    let default_filter = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    let mut config = LibraryConfig::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(limit) = args.limit {
        config.recommendation_limit = limit;
    }

    let mut library = Library::load(&args.catalog, config)?;
    library.register_observer(Box::new(TransactionLogger));
    library.register_observer(Box::new(NotificationService));
    tracing::info!(
        books = library.catalog().len(),
        path = %args.catalog.display(),
        "Books loaded"
    );

    let mut console = Console::new(library, io::stdin().lock(), io::stdout());
    console.run()?;
    Ok(())
}

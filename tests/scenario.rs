use bookshelf::{
    Isbn, Library, LibraryConfig, LibraryError, LibraryVisualization, ingest::parse_catalog,
};

/// Catalog from the three-book walkthrough
const CATALOG: &str = "\
# title, isbn, author, genre path
Dune,001,Herbert,Fiction/SciFi
Children of Dune,002,Herbert,Fiction/SciFi
It,003,King,Fiction/Horror
";

/// Library over the walkthrough catalog with a fixed seed
#[allow(clippy::panic)]
fn load() -> Library {
    let config = LibraryConfig { seed: Some(42), ..LibraryConfig::default() };
    match parse_catalog(CATALOG, &config).and_then(|records| Library::from_records(records, config))
    {
        Ok(library) => library,
        Err(e) => panic!("catalog rejected: {e}"),
    }
}

#[test]
fn test_walkthrough() {
    let mut library = load();
    let dune = Isbn::new("001");
    let children = Isbn::new("002");
    let it = Isbn::new("003");

    assert_eq!(library.affinity().weight(&dune, &children), 1);
    assert!(library.affinity().neighbors_of(&it).is_empty());

    assert!(library.borrow("001").is_ok());
    assert!(library.borrow("002").is_ok());
    assert_eq!(library.affinity().weight(&dune, &children), 3);

    let picks: Vec<String> =
        library.recommend_default().iter().map(|book| book.isbn.to_string()).collect();
    assert_eq!(picks, vec!["003"]);

    assert!(library.return_book("002").is_ok());
    assert!(library.undo().is_ok());
    assert!(library.undo().is_ok());
    assert!(library.undo().is_ok());
    assert!(matches!(library.undo(), Err(LibraryError::NothingToUndo)));
    assert!(library.history().is_empty());
    assert!(library.catalog().iter().all(|book| book.is_available));
}

#[test]
fn test_recommendations_never_repeat_history() {
    let mut library = load();

    for isbn in ["003", "001"] {
        assert!(library.borrow(isbn).is_ok());
        let history = library.session().history().clone();
        for book in library.recommend(3) {
            assert!(book.is_available);
            assert!(!history.contains(&book.isbn));
        }
    }
}

#[test]
fn test_genre_surface() {
    let library = load();

    let names: Vec<String> = library.all_genre_names().into_iter().collect();
    assert_eq!(names, vec!["Fiction", "Horror", "SciFi"]);
    assert!(matches!(library.books_in_genre("Romance"), Err(LibraryError::GenreNotFound(_))));

    let outline = LibraryVisualization::genre_outline(library.genres());
    assert!(outline.starts_with("Library (0 direct, 3 total)"));
}

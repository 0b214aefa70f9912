use bookreader::document::Document;
use bookreader::settings::{FontSize, Theme};
use bookreader::store::{BookRecord, Library};

const BOOK: &str = "<h1>1. Intro</h1><p>Opening text.</p>\
                    <p>1.1 Sub</p><p>More text.</p>\
                    <h1>2. Body</h1><p>Closing text.</p>";

#[test]
fn test_book_record_round_trips_through_store_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    {
        let mut library = Library::open(&path).unwrap();
        let mut record = BookRecord::new("novel", BOOK);
        record.last_position = 42;
        library.save_book(&record).unwrap();
        library.set_last_book("novel").unwrap();
        library.set_theme(Theme::Sepia).unwrap();
        library.set_font_size(FontSize::LARGEST).unwrap();
    }

    let library = Library::open(&path).unwrap();
    let record = library.find_book("novel").unwrap();
    assert_eq!(record.name, "novel");
    assert_eq!(record.content, BOOK);
    assert_eq!(record.last_position, 42);
    assert_eq!(library.last_book().as_deref(), Some("novel"));
    assert_eq!(library.theme(), Some(Theme::Sepia));
    assert_eq!(library.font_size(), Some(FontSize::LARGEST));
}

#[test]
fn test_saving_same_name_replaces_record() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = Library::open(dir.path().join("store.json")).unwrap();
    library.save_book(&BookRecord::new("novel", "<p>old</p>")).unwrap();
    library.save_book(&BookRecord::new("novel", "<p>new</p>")).unwrap();

    let books = library.saved_books();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].content, "<p>new</p>");
}

#[test]
fn test_delete_clears_last_book_pointer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let mut library = Library::open(&path).unwrap();
    library.save_book(&BookRecord::new("novel", BOOK)).unwrap();
    library.set_last_book("novel").unwrap();

    assert!(library.delete_book("novel").unwrap());
    assert!(!library.delete_book("novel").unwrap());

    let library = Library::open(&path).unwrap();
    assert!(library.find_book("novel").is_none());
    assert!(library.last_book().is_none());
}

#[test]
fn test_corrupt_store_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{ not json").unwrap();

    let library = Library::open(&path).unwrap();
    assert!(library.saved_books().is_empty());
    assert!(library.theme().is_none());
}

#[test]
fn test_saved_book_builds_outline_in_document_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut library = Library::open(dir.path().join("store.json")).unwrap();
    library.save_book(&BookRecord::new("novel", BOOK)).unwrap();

    let record = library.find_book("novel").unwrap();
    let doc = Document::from_markup(record.content, 60).unwrap();
    let outline: Vec<(&str, u8)> = doc
        .headings()
        .iter()
        .map(|h| (h.text.as_str(), h.level))
        .collect();
    assert_eq!(outline, vec![("1. Intro", 1), ("1.1 Sub", 2), ("2. Body", 1)]);
}

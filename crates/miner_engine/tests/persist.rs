use std::fs;

use miner_core::Cursor;
use miner_engine::{AtomicFileWriter, CursorError, CursorStore, FileCursorStore};
use tempfile::TempDir;

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("seq_num.txt", "100\n").unwrap();
    assert_eq!(first.file_name().unwrap(), "seq_num.txt");
    assert_eq!(fs::read_to_string(&first).unwrap(), "100\n");

    let second = writer.write("seq_num.txt", "200\n").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "200\n");
    // No stray temp files left behind.
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("seq_num.txt", "1");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("seq_num.txt").exists());
}

#[test]
fn state_dir_is_never_created() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nowhere");
    let writer = AtomicFileWriter::new(missing.clone());
    assert!(writer.write("seq_num.txt", "1").is_err());
    assert!(!missing.exists());
}

#[test]
fn loads_seeded_cursor() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("seq_num.txt");
    fs::write(&path, "5923481122\n").unwrap();

    let store = FileCursorStore::new(&path);
    assert_eq!(store.load().unwrap(), Cursor::new(5_923_481_122));
}

#[test]
fn missing_cursor_file_is_reported() {
    let temp = TempDir::new().unwrap();
    let store = FileCursorStore::new(temp.path().join("seq_num.txt"));

    let err = store.load().unwrap_err();
    assert!(matches!(err, CursorError::Missing { .. }));
    assert!(err.to_string().contains("seq_num.txt"));
}

#[test]
fn empty_or_garbage_cursor_file_is_malformed() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("seq_num.txt");
    let store = FileCursorStore::new(&path);

    for content in ["", "\n", "abc\n", "12.5"] {
        fs::write(&path, content).unwrap();
        let err = store.load().unwrap_err();
        assert!(
            matches!(err, CursorError::Malformed { .. }),
            "{content:?} gave {err}"
        );
    }
}

#[test]
fn saved_cursor_is_read_back_by_next_run() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("seq_num.txt");
    fs::write(&path, "10").unwrap();

    let store = FileCursorStore::new(&path);
    store.save(Cursor::new(13)).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "13\n");
    assert_eq!(FileCursorStore::new(&path).load().unwrap(), Cursor::new(13));
}

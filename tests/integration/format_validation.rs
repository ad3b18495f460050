//! Container-level tests: file round trips, load validation, and the
//! structural invariants a reader must enforce before matching.

use std::io::Write;

use fcfilter_rs::{
    DictBuilder, DictFormatError, Dictionary, Filter, FilterOptions, LoadError, Normalizer,
};

fn blob(words: &[&str]) -> Vec<u8> {
    let mut builder = DictBuilder::new(Normalizer::Lowercase);
    for w in words {
        builder.add_word(w);
    }
    builder.build().to_bytes()
}

#[test]
fn open_memory_maps_a_written_file() {
    let bytes = blob(&["badword", "spam"]);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();
    file.flush().unwrap();

    let f = Filter::open(file.path(), FilterOptions::default()).unwrap();
    assert!(f.contains("badword"));
    assert!(!f.contains("clean"));
}

#[test]
fn open_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Filter::open(dir.path().join("missing.fcf"), FilterOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn from_reader_equals_from_bytes() {
    let bytes = blob(&["spam"]);
    let from_reader = Filter::from_reader(&bytes[..], FilterOptions::default()).unwrap();
    let from_bytes = Filter::from_bytes(bytes, FilterOptions::default()).unwrap();
    for text in ["spam", "Spam and eggs", "clean"] {
        assert_eq!(from_reader.contains(text), from_bytes.contains(text));
    }
}

#[test]
fn blob_round_trip_is_structural_identity() {
    let first = blob(&["badword", "offensive", "spam", "test"]);
    let dict = Dictionary::from_bytes(first.clone()).unwrap();
    let header = dict.view().header();
    assert_eq!(header.node_count as usize * 8 + header.edge_count as usize * 8
        + header.hash_count as usize * 4 + 32, first.len());

    // Same word set, fresh builder: byte-identical output.
    assert_eq!(blob(&["badword", "offensive", "spam", "test"]), first);
}

#[test]
fn corrupted_blobs_fail_closed() {
    let good = blob(&["badword", "spam"]);

    // Bad magic.
    let mut bad = good.clone();
    bad[1] ^= 0xFF;
    assert!(matches!(
        Filter::from_bytes(bad, FilterOptions::default()),
        Err(LoadError::Format(DictFormatError::BadMagic { .. }))
    ));

    // Future version.
    let mut bad = good.clone();
    bad[4..6].copy_from_slice(&9u16.to_le_bytes());
    assert!(matches!(
        Filter::from_bytes(bad, FilterOptions::default()),
        Err(LoadError::Format(DictFormatError::UnsupportedVersion { version: 9 }))
    ));

    // Truncated tables.
    let bad = good[..good.len() - 3].to_vec();
    assert!(matches!(
        Filter::from_bytes(bad, FilterOptions::default()),
        Err(LoadError::Format(DictFormatError::Truncated { .. }))
    ));

    // Shorter than the header.
    assert!(matches!(
        Filter::from_bytes(good[..10].to_vec(), FilterOptions::default()),
        Err(LoadError::Format(DictFormatError::TooSmall { len: 10 }))
    ));

    // Inflated node count walks off the blob.
    let mut bad = good.clone();
    bad[8..12].copy_from_slice(&u32::MAX.to_le_bytes());
    assert!(matches!(
        Filter::from_bytes(bad, FilterOptions::default()),
        Err(LoadError::Format(DictFormatError::Truncated { .. }))
    ));

    // The pristine blob still loads.
    assert!(Filter::from_bytes(good, FilterOptions::default()).is_ok());
}

#[test]
fn load_errors_display_the_failing_field() {
    let mut bad = blob(&["spam"]);
    bad[4..6].copy_from_slice(&7u16.to_le_bytes());
    let err = Dictionary::from_bytes(bad).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("version"), "{msg}");
    assert!(msg.contains('7'), "{msg}");
}

#[test]
fn empty_dictionary_loads_and_matches_nothing() {
    let bytes = blob(&[]);
    let f = Filter::from_bytes(bytes, FilterOptions::default()).unwrap();
    assert!(!f.contains("anything at all"));
    assert_eq!(f.mask("anything at all"), "anything at all");
}

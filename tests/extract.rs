//! End-to-end tests over archives written to disk.

mod common;

use std::fs;
use std::path::Path;

use common::{NEW, OLD_A, TestEntry, build_archive};
use runpck::pck::{companion_path, output_path};
use runpck::{ArchiveVersion, ErrorKind, extract_entry, list_entries, open_archive};

fn write(dir: &Path, name: &str, data: &[u8]) -> String {
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path.to_str().unwrap().to_string()
}

#[tokio::test]
async fn test_single_stored_entry() {
    let dir = tempfile::tempdir().unwrap();
    let archive = build_archive(OLD_A, &[TestEntry::stored("a.txt", b"hello")]);
    let path = write(dir.path(), "configs.pck", &archive);

    let pck = open_archive(&path, None).await.unwrap();
    assert_eq!(pck.version(), ArchiveVersion::OldA);
    assert_eq!(pck.entries().len(), 1);

    let root = dir.path().join("out");
    let entry = &pck.entries()[0];
    let target = output_path(&root, entry, false).unwrap();
    assert_eq!(target, root.join("a.txt"));

    pck.extract_to_file(entry, &target).await.unwrap();
    assert_eq!(fs::read(&target).unwrap(), b"hello");
}

#[tokio::test]
async fn test_equal_sizes_are_copied_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    // looks like a zlib header, but equal sizes mean the bytes are stored raw
    let raw = [0x78, 0x9C, 0x03, 0x00, 0x01];
    let archive = build_archive(OLD_A, &[TestEntry::stored("a.txt", &raw)]);
    let path = write(dir.path(), "raw.pck", &archive);

    let pck = open_archive(&path, None).await.unwrap();
    let entry = &pck.entries()[0];
    assert_eq!(entry.compressed_size, 5);
    assert_eq!(entry.uncompressed_size, 5);

    let mut out = Vec::new();
    extract_entry(&pck, entry, &mut out).await.unwrap();
    assert_eq!(out, raw);
}

#[tokio::test]
async fn test_backslash_names_extract_to_nested_paths() {
    let dir = tempfile::tempdir().unwrap();
    let archive = build_archive(
        OLD_A,
        &[TestEntry::deflated("dir\\sub\\file.bin", &[7u8; 1000])],
    );
    let path = write(dir.path(), "nested.pck", &archive);

    let pck = open_archive(&path, None).await.unwrap();
    let entry = &pck.entries()[0];
    assert_eq!(entry.normalized_name(), "dir/sub/file.bin");

    let root = dir.path().join("out");
    let target = output_path(&root, entry, false).unwrap();
    assert_eq!(target, root.join("dir").join("sub").join("file.bin"));

    pck.extract_to_file(entry, &target).await.unwrap();
    assert_eq!(fs::read(&target).unwrap(), vec![7u8; 1000]);
}

#[tokio::test]
async fn test_unknown_version_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let archive = build_archive(999999, &[TestEntry::stored("a.txt", b"hello")]);
    let path = write(dir.path(), "bad.pck", &archive);

    let err = open_archive(&path, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);

    let names: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(names.len(), 1);
}

#[tokio::test]
async fn test_new_version_compressed_records() {
    let dir = tempfile::tempdir().unwrap();
    let text = "角色 data ".repeat(50);
    let mut gbk_name = b"configs\\".to_vec();
    gbk_name.extend_from_slice(&[0xBD, 0xC7, 0xC9, 0xAB]);
    gbk_name.extend_from_slice(b".txt");

    let mut named = TestEntry::deflated("placeholder", text.as_bytes()).with_compressed_record();
    named.name = gbk_name;

    let archive = build_archive(
        NEW,
        &[
            TestEntry::stored("readme.txt", b"first").with_compressed_record(),
            named,
            TestEntry::stored("empty.bin", b""),
        ],
    );
    let path = write(dir.path(), "configs.pck", &archive);

    let pck = open_archive(&path, None).await.unwrap();
    assert_eq!(pck.version(), ArchiveVersion::New);

    let entries = list_entries(&pck);
    let names: Vec<_> = entries.iter().map(|e| e.normalized_name()).collect();
    assert_eq!(names, ["readme.txt", "configs/角色.txt", "empty.bin"]);
    assert!(entries.iter().all(|e| !e.name_lossy));

    assert_eq!(pck.extract_to_memory(&entries[0]).await.unwrap(), b"first");
    assert_eq!(
        pck.extract_to_memory(&entries[1]).await.unwrap(),
        text.as_bytes()
    );
    assert!(pck.extract_to_memory(&entries[2]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_extended_pair() {
    let dir = tempfile::tempdir().unwrap();
    let first: Vec<u8> = (0..4000u32).map(|i| (i % 251) as u8).collect();
    let second = b"second entry, compressed ".repeat(40);
    let archive = build_archive(
        NEW,
        &[
            TestEntry::stored("models\\a.ski", &first),
            TestEntry::deflated("models\\b.ski", &second),
        ],
    );

    // split inside the first entry's data
    let (low, high) = archive.split_at(1500);
    write(dir.path(), "models.pck", low);
    let primary = write(dir.path(), "models.pkx", high);

    let companion = companion_path(&primary).unwrap();
    assert!(companion.ends_with("models.pck"));

    let pck = open_archive(&primary, Some(&companion)).await.unwrap();
    assert!(pck.space().is_extended());
    assert_eq!(pck.space().total_length(), archive.len() as u64);

    let entries = pck.entries();
    assert_eq!(pck.extract_to_memory(&entries[0]).await.unwrap(), first);
    assert_eq!(pck.extract_to_memory(&entries[1]).await.unwrap(), second);
}

#[tokio::test]
async fn test_extended_old_version_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let archive = build_archive(OLD_A, &[TestEntry::stored("a.txt", b"hello")]);
    let (low, high) = archive.split_at(4);
    let companion = write(dir.path(), "old.pck", low);
    let primary = write(dir.path(), "old.pkx", high);

    let err = open_archive(&primary, Some(&companion)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[tokio::test]
async fn test_bad_entry_does_not_affect_others() {
    let dir = tempfile::tempdir().unwrap();
    let good_text = b"still fine, ".repeat(20);
    let mut broken = TestEntry::stored("broken.bin", b"this is not zlib data");
    broken.uncompressed_size = 100;
    let archive = build_archive(
        OLD_A,
        &[broken, TestEntry::deflated("good.txt", &good_text)],
    );
    let path = write(dir.path(), "mixed.pck", &archive);

    let pck = open_archive(&path, None).await.unwrap();
    let entries = pck.entries();

    let root = dir.path().join("out");
    let err = pck
        .extract_to_file(&entries[0], &output_path(&root, &entries[0], false).unwrap())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Compression);
    assert!(!root.join("broken.bin").exists());

    let good = output_path(&root, &entries[1], false).unwrap();
    pck.extract_to_file(&entries[1], &good).await.unwrap();
    assert!(entries[1].is_compressed());
    assert_eq!(fs::read(good).unwrap(), good_text);
}

#[tokio::test]
async fn test_missing_archive_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nothing.pck");
    let err = open_archive(missing.to_str().unwrap(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
}

//! Integration tests for unpacking and repackaging archives.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use twm_package::{
    DEFAULT_SUFFIX, PackageError, read_descriptor, repack, save_descriptor, unpack,
};

fn build_archive(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, bytes) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(bytes.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

fn read_entries(path: &Path) -> Vec<(String, Vec<u8>)> {
    let mut archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entries = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).unwrap();
        if entry.is_dir() {
            continue;
        }
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        entries.push((entry.name().to_string(), bytes));
    }
    entries
}

fn canonical(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap()
}

#[test]
fn test_unpack_locates_descriptor_named_after_archive() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("Sales.twbx");
    build_archive(
        &archive,
        &[
            ("Sales.twb", "<workbook/>"),
            ("Data/Extracts/sales.hyper", "\x00\x01hyper"),
        ],
    );

    let package = unpack(&archive).unwrap();

    assert_eq!(package.extract_dir, canonical(&dir.path().join("Sales")));
    assert_eq!(package.descriptor, package.extract_dir.join("Sales.twb"));
    assert_eq!(package.extension(), "twbx");
    assert_eq!(
        fs::read_to_string(&package.descriptor).unwrap(),
        "<workbook/>"
    );
    assert!(
        package
            .extract_dir
            .join("Data/Extracts/sales.hyper")
            .is_file()
    );
}

#[test]
fn test_unpack_falls_back_to_single_descriptor() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("Renamed.tdsx");
    build_archive(
        &archive,
        &[("Orders.tds", "<datasource/>"), ("readme.txt", "notes")],
    );

    let package = unpack(&archive).unwrap();

    assert_eq!(package.descriptor, package.extract_dir.join("Orders.tds"));
}

#[test]
fn test_unpack_rejects_missing_descriptor() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("Empty.twbx");
    build_archive(&archive, &[("Data/sales.csv", "id\n1\n")]);

    let error = unpack(&archive).unwrap_err();

    assert!(matches!(error, PackageError::PrimaryDescriptor { .. }));
}

#[test]
fn test_unpack_rejects_ambiguous_descriptor() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("Both.twbx");
    build_archive(
        &archive,
        &[("First.twb", "<workbook/>"), ("Second.twb", "<workbook/>")],
    );

    let error = unpack(&archive).unwrap_err();

    match error {
        PackageError::PrimaryDescriptor { message, .. } => assert!(message.starts_with('2')),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_unpack_missing_file() {
    let dir = TempDir::new().unwrap();
    let error = unpack(&dir.path().join("Missing.twbx")).unwrap_err();
    assert!(matches!(error, PackageError::NotFound { .. }));
}

#[test]
fn test_unpack_rejects_bare_descriptor() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Sales.twb");
    fs::write(&path, "<workbook/>").unwrap();
    let error = unpack(&path).unwrap_err();
    assert!(matches!(error, PackageError::UnsupportedExtension { .. }));
}

#[test]
fn test_unpack_rejects_corrupt_archive() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("Broken.twbx");
    fs::write(&path, "not a zip").unwrap();
    let error = unpack(&path).unwrap_err();
    assert!(matches!(error, PackageError::Zip { .. }));
}

#[test]
fn test_repack_writes_suffixed_archive_with_rewritten_descriptor() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("Sales.twbx");
    build_archive(
        &archive,
        &[
            ("Sales.twb", "<workbook/>"),
            ("Data/Extracts/sales.hyper", "\x00\x01hyper"),
            ("Image/logo.png", "png"),
        ],
    );

    let package = unpack(&archive).unwrap();
    save_descriptor(&package, "<workbook version='18.1'/>").unwrap();
    let output = repack(&package, DEFAULT_SUFFIX).unwrap();

    assert_eq!(output, canonical(&dir.path().join("Sales-Snowflake.twbx")));
    let entries = read_entries(&output);
    let names: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Data/Extracts/sales.hyper",
            "Image/logo.png",
            "Sales.twb"
        ]
    );
    assert_eq!(entries[0].1, b"\x00\x01hyper");
    assert_eq!(entries[2].1, b"<workbook version='18.1'/>");
    assert!(archive.is_file());
}

#[test]
fn test_repack_uses_deflate() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("Big.twbx");
    let body = "<workbook>".to_string() + &"<x/>".repeat(500) + "</workbook>";
    build_archive(&archive, &[("Big.twb", body.as_str())]);

    let package = unpack(&archive).unwrap();
    let output = repack(&package, "-sf").unwrap();

    let mut zip = ZipArchive::new(File::open(&output).unwrap()).unwrap();
    let entry = zip.by_name("Big.twb").unwrap();
    assert_eq!(entry.compression(), CompressionMethod::Deflated);
    assert!(entry.compressed_size() < entry.size());
}

#[test]
fn test_read_descriptor_leaves_no_files_behind() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("Sales.twbx");
    build_archive(
        &archive,
        &[
            ("Data/Nested.twb", "<nested/>"),
            ("Workbook.twb", "<workbook name='only'/>"),
        ],
    );

    let text = read_descriptor(&archive).unwrap();

    assert_eq!(text, "<workbook name='only'/>");
    assert!(!dir.path().join("Sales").exists());
}

#[test]
fn test_read_descriptor_prefers_stem_match() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("Orders.tdsx");
    build_archive(
        &archive,
        &[("Orders.tds", "<datasource/>"), ("Other.tds", "<other/>")],
    );

    assert_eq!(read_descriptor(&archive).unwrap(), "<datasource/>");
}

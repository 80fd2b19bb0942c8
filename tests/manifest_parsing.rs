// tests/manifest_parsing.rs

use std::error::Error;

use procmux::errors::ProcmuxError;
use procmux::manifest::{Manifest, entries};
use procmux_test_utils::builders::{ManifestBuilder, TestWorkspace};
use procmux_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn entries_are_indexed_in_document_order() -> TestResult {
    init_tracing();

    let text = ManifestBuilder::new()
        .comment("services")
        .process("web", "npm start")
        .blank()
        .raw("   ")
        .raw("  # indented comment")
        .process("api", "cargo run -- --url http://localhost:8080")
        .raw("worker:python -m worker")
        .build();

    let manifest = Manifest::parse(&text)?;
    assert_eq!(manifest.len(), 3);

    let e: Vec<_> = manifest.iter().collect();
    assert_eq!((e[0].index, e[0].name.as_str(), e[0].command.as_str()), (1, "web", "npm start"));
    assert_eq!(e[1].index, 2);
    assert_eq!(e[1].name, "api");
    assert_eq!(e[1].command, "cargo run -- --url http://localhost:8080");
    assert_eq!(e[2].index, 3);
    assert_eq!(e[2].command, "python -m worker");

    Ok(())
}

#[test]
fn only_one_leading_space_is_stripped() -> TestResult {
    let manifest = Manifest::parse("web:  indented\n")?;
    assert_eq!(manifest.entries()[0].command, " indented");
    Ok(())
}

#[test]
fn names_are_trimmed_and_duplicates_kept() -> TestResult {
    let manifest = Manifest::parse("  web : a\nweb: b\n")?;
    assert_eq!(manifest.len(), 2);
    assert_eq!(manifest.entries()[0].name, "web");
    assert_eq!(manifest.entries()[1].name, "web");
    assert_eq!(manifest.entries()[1].index, 2);
    Ok(())
}

#[test]
fn comments_and_blanks_only_yield_empty_manifest() -> TestResult {
    let manifest = Manifest::parse("# nothing\n\n   \n#web: echo hi\n")?;
    assert!(manifest.is_empty());
    Ok(())
}

#[test]
fn line_without_colon_is_a_syntax_error() {
    let result = Manifest::parse("web: echo ok\n\njust some words\n");

    match result {
        Err(ProcmuxError::ManifestSyntax { line, message }) => {
            assert_eq!(line, 3);
            assert!(message.contains("<name>: <command>"));
        }
        other => panic!("Expected ManifestSyntax error, got: {:?}", other),
    }
}

#[test]
fn empty_name_is_a_syntax_error() {
    match Manifest::parse(": echo nameless\n") {
        Err(ProcmuxError::ManifestSyntax { line, message }) => {
            assert_eq!(line, 1);
            assert!(message.contains("empty"));
        }
        other => panic!("Expected ManifestSyntax error, got: {:?}", other),
    }
}

#[test]
fn lazy_entries_yield_good_lines_before_the_bad_one() {
    let mut it = entries("a: one\nbroken\nb: two\n");

    let first = it.next().expect("first item").expect("first entry parses");
    assert_eq!(first.name, "a");
    assert!(matches!(it.next(), Some(Err(ProcmuxError::ManifestSyntax { line: 2, .. }))));

    let third = it.next().expect("third item").expect("third entry parses");
    assert_eq!(third.index, 2, "failed lines don't consume an index");
}

#[test]
fn missing_manifest_is_reported_with_its_path() {
    let ws = TestWorkspace::new();
    let path = ws.join("Procfile");

    match Manifest::load(&path) {
        Err(ProcmuxError::ManifestNotFound(p)) => assert_eq!(p, path),
        other => panic!("Expected ManifestNotFound, got: {:?}", other),
    }
}

#[test]
fn load_reads_manifest_from_disk() -> TestResult {
    let ws = TestWorkspace::new();
    ws.write_manifest(&ManifestBuilder::new().process("web", "echo hi"));

    let manifest = Manifest::load(ws.paths().manifest)?;
    assert_eq!(manifest.len(), 1);
    assert_eq!(manifest.entries()[0].command, "echo hi");
    Ok(())
}

#[test]
fn palette_rotates_every_seven_entries() -> TestResult {
    let text: String = (1..=9).map(|i| format!("p{i}: true\n")).collect();
    let manifest = Manifest::parse(&text)?;

    let slots: Vec<_> = manifest.iter().map(|e| e.palette_slot()).collect();
    assert_eq!(slots, vec![1, 2, 3, 4, 5, 6, 7, 1, 2]);

    let codes: Vec<_> = manifest.iter().map(|e| e.ansi_color()).collect();
    assert_eq!(codes, vec![32, 33, 34, 35, 36, 37, 31, 32, 33]);
    Ok(())
}

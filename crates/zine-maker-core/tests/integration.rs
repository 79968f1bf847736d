//! Integration tests for zine-maker-core
//!
//! These tests verify the end-to-end workflow:
//! - Acquiring a preconfigured booklet through a source
//! - Passthrough normalization of the auto-loaded document
//! - Multi-source merging with order preservation
//! - Malformed-input rejection

#![allow(clippy::unwrap_used)]

use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};
use zine_maker_core::{auto_load, merge_documents, BookletSource, Error};

// =============================================================================
// Mock Source for Testing
// =============================================================================

/// A mock booklet source that serves fixed bytes without touching the
/// network or filesystem.
struct MockSource {
    payload: Option<Vec<u8>>,
}

impl MockSource {
    fn serving(payload: Vec<u8>) -> Self {
        Self {
            payload: Some(payload),
        }
    }

    fn absent() -> Self {
        Self { payload: None }
    }
}

#[async_trait]
impl BookletSource for MockSource {
    async fn fetch(&self) -> Option<Vec<u8>> {
        self.payload.clone()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================

/// Build a small PDF with one page per entry in `page_texts`.
fn fixture_pdf(page_texts: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let page_tree_id = doc.new_object_id();

    let font_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));

    let resources_id = doc.add_object(Dictionary::from_iter([(
        "Font",
        Object::Dictionary(Dictionary::from_iter([(
            "F1",
            Object::Reference(font_id),
        )])),
    )]));

    let mut kids = Vec::with_capacity(page_texts.len());
    for text in page_texts {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };

        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content.encode().unwrap(),
        ));

        let page_id = doc.add_object(Dictionary::from_iter([
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(page_tree_id)),
            ("Contents", Object::Reference(content_id)),
            ("Resources", Object::Reference(resources_id)),
            (
                "MediaBox",
                Object::Array(vec![0.into(), 0.into(), 612.into(), 792.into()]),
            ),
        ]));
        kids.push(Object::Reference(page_id));
    }

    let page_tree = Dictionary::from_iter([
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(kids.len() as i64)),
        ("Kids", Object::Array(kids)),
    ]);
    doc.objects.insert(page_tree_id, Object::Dictionary(page_tree));

    let catalog_id = doc.add_object(Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(page_tree_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut output = Vec::new();
    doc.save_to(&mut output).unwrap();
    output
}

fn page_text(bytes: &[u8], page: u32) -> String {
    let doc = Document::load_mem(bytes).unwrap();
    doc.extract_text(&[page]).unwrap()
}

// =============================================================================
// Auto-Load Flow
// =============================================================================

#[tokio::test]
async fn auto_load_normalizes_a_present_booklet() {
    let source = MockSource::serving(fixture_pdf(&["Fold here", "Cut here", "Done"]));

    let merged = auto_load(&source).await.unwrap().unwrap();
    assert_eq!(merged.page_count, 3);
    assert!(page_text(&merged.bytes, 1).contains("Fold here"));
    assert!(page_text(&merged.bytes, 3).contains("Done"));
}

#[tokio::test]
async fn auto_load_absent_booklet_is_a_normal_outcome() {
    let source = MockSource::absent();
    assert!(auto_load(&source).await.unwrap().is_none());
}

#[tokio::test]
async fn auto_load_rejects_a_malformed_booklet() {
    let source = MockSource::serving(b"<html>404 but with status 200</html>".to_vec());

    let err = auto_load(&source).await.unwrap_err();
    assert!(matches!(err, Error::MalformedInput { index: 0, .. }));
}

// =============================================================================
// Merge Flow
// =============================================================================

#[tokio::test]
async fn upload_flow_merges_in_selection_order() {
    let uploads = vec![
        fixture_pdf(&["Cover"]),
        fixture_pdf(&["Spread left", "Spread right"]),
        fixture_pdf(&["Back"]),
    ];

    let merged = tokio::task::spawn_blocking(move || merge_documents(&uploads))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(merged.page_count, 4);
    assert!(page_text(&merged.bytes, 1).contains("Cover"));
    assert!(page_text(&merged.bytes, 2).contains("Spread left"));
    assert!(page_text(&merged.bytes, 3).contains("Spread right"));
    assert!(page_text(&merged.bytes, 4).contains("Back"));
}

#[test]
fn merge_failure_identifies_the_bad_upload() {
    let uploads = vec![
        fixture_pdf(&["Cover"]),
        b"scan.jpeg renamed to pdf".to_vec(),
        fixture_pdf(&["Back"]),
    ];

    match merge_documents(&uploads) {
        Err(Error::MalformedInput { index, reason }) => {
            assert_eq!(index, 1);
            assert!(!reason.is_empty());
        }
        other => panic!("expected MalformedInput, got {other:?}"),
    }
}

#[test]
fn auto_loaded_and_merged_outputs_are_interchangeable() {
    // Both paths must produce the same normalized representation: merging
    // the passthrough output with nothing else changes neither count nor
    // order.
    let booklet = fixture_pdf(&["One", "Two"]);

    let via_passthrough = zine_maker_core::passthrough_copy(&booklet).unwrap();
    let via_merge = merge_documents(&[via_passthrough.bytes.clone()]).unwrap();

    assert_eq!(via_merge.page_count, via_passthrough.page_count);
    assert!(page_text(&via_merge.bytes, 1).contains("One"));
    assert!(page_text(&via_merge.bytes, 2).contains("Two"));
}

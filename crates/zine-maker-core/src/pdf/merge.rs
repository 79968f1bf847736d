//! Building one booklet PDF from an ordered set of source documents.
//!
//! The merge copies every page of every source, in input order, into a fresh
//! document with a new page tree and catalog. Sources are opaque byte
//! buffers; they are parsed here and never mutated.

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::error::{Error, Result};

/// A finalized booklet produced by a merge.
#[derive(Debug, Clone)]
pub struct MergedDocument {
    /// Serialized PDF bytes
    pub bytes: Vec<u8>,
    /// Number of pages in the output
    pub page_count: usize,
}

/// Concatenate the pages of `sources` into a single PDF.
///
/// Output page order is the concatenation of each source's pages in the
/// order sources are supplied, and within each source, in that source's
/// stored page order. The operation is all-or-nothing: a source that fails
/// to parse aborts the merge with [`Error::MalformedInput`] before anything
/// is serialized.
///
/// An empty input sequence is not an error; it yields a valid zero-page
/// document.
pub fn merge_documents(sources: &[Vec<u8>]) -> Result<MergedDocument> {
    // Parse everything up front so a bad source can never leave a partially
    // assembled output behind.
    let mut parsed = Vec::with_capacity(sources.len());
    for (index, bytes) in sources.iter().enumerate() {
        let doc = Document::load_mem(bytes).map_err(|e| Error::MalformedInput {
            index,
            reason: e.to_string(),
        })?;
        parsed.push(doc);
    }

    let mut document = Document::with_version("1.5");
    let mut max_id: u32 = 1;
    // Page order must survive renumbering, so kids are kept as a Vec rather
    // than keyed by object id.
    let mut page_order: Vec<ObjectId> = Vec::new();
    let mut page_dicts: Vec<(ObjectId, Dictionary)> = Vec::new();

    for mut doc in parsed {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        // get_pages is keyed by 1-based page number, so values iterate in
        // the source's stored page order.
        for page_id in doc.get_pages().into_values() {
            if let Ok(Object::Dictionary(dict)) = doc.get_object(page_id) {
                page_order.push(page_id);
                page_dicts.push((page_id, dict.clone()));
            }
        }

        for (object_id, object) in doc.objects {
            match object.type_name().unwrap_or(b"") {
                b"Catalog" | b"Pages" | b"Page" | b"Outlines" | b"Outline" => {}
                _ => {
                    document.objects.insert(object_id, object);
                }
            }
        }
    }

    // max_id and max_id + 1 are unused in every source's id space.
    let pages_id: ObjectId = (max_id, 0);
    let catalog_id: ObjectId = (max_id + 1, 0);

    for (page_id, dict) in page_dicts {
        let mut new_dict = dict;
        new_dict.set("Parent", Object::Reference(pages_id));
        document.objects.insert(page_id, Object::Dictionary(new_dict));
    }

    let kids: Vec<Object> = page_order.iter().map(|&id| Object::Reference(id)).collect();
    let page_count = page_order.len();

    #[allow(clippy::cast_possible_truncation)]
    let total_pages = page_count as u32;

    let pages_dict_obj = Dictionary::from_iter([
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(kids)),
        ("Count", Object::Integer(i64::from(total_pages))),
    ]);
    document.objects.insert(pages_id, Object::Dictionary(pages_dict_obj));

    let catalog_dict_obj = Dictionary::from_iter([
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    document
        .objects
        .insert(catalog_id, Object::Dictionary(catalog_dict_obj));

    document.trailer.set("Root", Object::Reference(catalog_id));
    document.max_id = catalog_id.0;

    document.renumber_objects();
    document.compress();

    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .map_err(|e| Error::PdfSave(format!("Failed to save booklet: {e}")))?;

    debug!(
        "Assembled booklet from {} sources ({} pages)",
        sources.len(),
        page_count
    );

    Ok(MergedDocument { bytes, page_count })
}

/// Re-serialize a single document through the same path as a merge.
///
/// The auto-load flow uses this so a preconfigured booklet and a manual
/// merge produce interchangeable artifacts. There is deliberately no
/// byte-copy shortcut: the output is the normalized serialization, not the
/// input buffer.
pub fn passthrough_copy(source: &[u8]) -> Result<MergedDocument> {
    merge_documents(&[source.to_vec()])
}

// =============================================================================
// Tests
// =============================================================================

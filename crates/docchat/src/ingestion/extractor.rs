//! Page-wise PDF text extraction
//!
//! Pages that fail to yield text contribute an empty string and never abort
//! the document. A file that cannot be opened at all fails the whole
//! extraction, so the user sees which upload was bad instead of chatting
//! against a silently incomplete corpus.

use chrono::Utc;
use lopdf::Document;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::types::DocumentSummary;

/// One uploaded file, as received from the form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Result of extracting an upload batch
#[derive(Debug, Clone)]
pub struct ExtractedCorpus {
    /// All page text across all documents, in upload and page order
    pub text: String,
    /// Per-document metadata, in upload order
    pub documents: Vec<DocumentSummary>,
}

/// Extract text from every page of every uploaded PDF.
///
/// Output is the concatenation of page text across all documents, in upload
/// order and page order. No per-document or per-page boundary survives.
pub fn extract_documents(files: &[UploadedFile]) -> Result<ExtractedCorpus> {
    let mut text = String::new();
    let mut documents = Vec::with_capacity(files.len());

    for file in files {
        let document = Document::load_mem(&file.data)
            .map_err(|e| Error::extraction(&file.filename, e.to_string()))?;

        let pages = document.get_pages();
        let page_count = pages.len() as u32;

        for (page_number, _object_id) in pages {
            match document.extract_text(&[page_number]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => {
                    tracing::debug!(
                        "No text from '{}' page {}: {}",
                        file.filename,
                        page_number,
                        e
                    );
                }
            }
        }

        tracing::info!("Extracted {} page(s) from '{}'", page_count, file.filename);

        documents.push(DocumentSummary {
            filename: file.filename.clone(),
            pages: page_count,
            bytes: file.data.len() as u64,
            content_hash: content_hash(&file.data),
            processed_at: Utc::now(),
        });
    }

    Ok(ExtractedCorpus { text, documents })
}

/// sha256 of the raw upload, hex-encoded
fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    /// Build a single-page PDF containing `text` on one line.
    fn pdf_with_text(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![100.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("serialize pdf");
        bytes
    }

    #[test]
    fn extracts_page_text() {
        let files = vec![UploadedFile {
            filename: "alpha.pdf".to_string(),
            data: pdf_with_text("Alpha Beta Gamma"),
        }];

        let corpus = extract_documents(&files).expect("extraction succeeds");

        assert!(corpus.text.contains("Alpha Beta Gamma"));
        assert_eq!(corpus.documents.len(), 1);
        assert_eq!(corpus.documents[0].pages, 1);
        assert_eq!(corpus.documents[0].filename, "alpha.pdf");
        assert_eq!(corpus.documents[0].content_hash.len(), 64);
    }

    #[test]
    fn concatenates_in_upload_order() {
        let files = vec![
            UploadedFile {
                filename: "first.pdf".to_string(),
                data: pdf_with_text("First document"),
            },
            UploadedFile {
                filename: "second.pdf".to_string(),
                data: pdf_with_text("Second document"),
            },
        ];

        let corpus = extract_documents(&files).expect("extraction succeeds");

        let first = corpus.text.find("First document").expect("first present");
        let second = corpus.text.find("Second document").expect("second present");
        assert!(first < second);
        assert_eq!(corpus.documents[0].filename, "first.pdf");
        assert_eq!(corpus.documents[1].filename, "second.pdf");
    }

    #[test]
    fn unopenable_file_is_a_hard_failure() {
        let files = vec![UploadedFile {
            filename: "broken.pdf".to_string(),
            data: b"this is not a pdf".to_vec(),
        }];

        let err = extract_documents(&files).expect_err("garbage must not extract");
        match err {
            Error::Extraction { filename, .. } => assert_eq!(filename, "broken.pdf"),
            other => panic!("expected extraction error, got {other:?}"),
        }
    }

    #[test]
    fn no_files_yields_empty_corpus() {
        let corpus = extract_documents(&[]).expect("empty batch is fine");
        assert!(corpus.text.is_empty());
        assert!(corpus.documents.is_empty());
    }
}

//! End-to-end ingestion through the public API.

use std::io::{Cursor, Write};
use std::sync::Arc;
use std::time::Duration;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;

use docingest::ocr::{MathpixClient, OcrBridge, OcrCredentials, PollPolicy};
use docingest::prelude::*;

fn pdf_with_pages(pages: &[&str]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new("Td", vec![50.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn zip_of(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, bytes) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn processor(chunk_size: usize, overlap: usize) -> BatchProcessor {
    BatchProcessor::new(
        Arc::new(ExtractorRouter::default()),
        ChunkingParams::new(chunk_size, overlap).unwrap(),
    )
}

async fn mathpix_bridge(server: &MockServer, max_attempts: u32) -> OcrBridge {
    mathpix_bridge_with_timeout(server, max_attempts, Duration::from_secs(2)).await
}

async fn mathpix_bridge_with_timeout(
    server: &MockServer,
    max_attempts: u32,
    request_timeout: Duration,
) -> OcrBridge {
    let credentials = OcrCredentials::from_yaml_str(
        "env_variables:\n  MATHPIX_API_ID: app\n  MATHPIX_API_KEY: key\n",
    )
    .unwrap();
    let client = MathpixClient::new(
        &format!("{}/v3/pdf", server.uri()),
        credentials,
        request_timeout,
    )
    .unwrap();

    OcrBridge::new(
        Arc::new(client),
        PollPolicy {
            max_attempts,
            interval: Duration::ZERO,
        },
    )
}

#[tokio::test]
async fn test_default_parameters_window_long_text() {
    let text = "lorem ipsum ".repeat(375);
    assert_eq!(text.chars().count(), 4500);

    let result = BatchProcessor::new(Arc::new(ExtractorRouter::default()), ChunkingParams::default())
        .process_items(vec![ExtractionItem::new(text.into_bytes(), "long.txt")])
        .await;

    let lengths: Vec<usize> = result.chunks.iter().map(|c| c.char_len()).collect();
    assert_eq!(lengths, vec![2000, 2000, 700]);
    assert_eq!(result.chunks[2].label, "long.txt chunk 2");
}

#[tokio::test]
async fn test_batch_with_malformed_middle_item() {
    let notebook = serde_json::to_vec(&json!({
        "cells": [{"cell_type": "markdown", "source": ["# Week 1\n"]}]
    }))
    .unwrap();

    let items = vec![
        ExtractionItem::new(notebook, "week1.ipynb"),
        ExtractionItem::new(b"%PDF-1.7 truncated".to_vec(), "broken.pdf"),
        ExtractionItem::new(b"syllabus text".to_vec(), "syllabus.txt"),
    ];

    let result = processor(200, 20).process_items(items).await;

    assert_eq!(result.processed_items, 2);
    assert_eq!(
        result.failures.iter().map(|f| f.item.as_str()).collect::<Vec<_>>(),
        vec!["broken.pdf"]
    );
    let docs: Vec<&str> = result.chunks.iter().map(|c| c.document.name.as_str()).collect();
    assert_eq!(docs, vec!["week1.ipynb", "syllabus.txt"]);
}

#[tokio::test]
async fn test_polling_exhausted_returns_page_labelled_chunks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pdf_id": "abc"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/v3/pdf/abc\.tex$"))
        .respond_with(ResponseTemplate::new(404))
        .expect(3)
        .mount(&server)
        .await;

    let processor = processor(1000, 50).with_ocr(Arc::new(mathpix_bridge(&server, 3).await));
    let pdf = pdf_with_pages(&["Chapter one opens here", "Chapter two continues"]);

    let result = processor
        .process_upload("chapters.pdf", pdf)
        .await
        .unwrap();

    assert!(result.is_complete());
    assert_eq!(result.chunks.len(), 1);
    assert_eq!(result.chunks[0].label, "chapters.pdf pages 1-2");
}

#[tokio::test]
async fn test_stalled_submission_falls_back_to_legacy() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/pdf"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"pdf_id": "never"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&server)
        .await;

    let bridge = mathpix_bridge_with_timeout(&server, 3, Duration::from_millis(100)).await;
    let processor = processor(1000, 50).with_ocr(Arc::new(bridge));
    let pdf = pdf_with_pages(&["Stalled service page"]);

    let started = std::time::Instant::now();
    let chunks = processor
        .process_item(&ExtractionItem::new(pdf, "stalled.pdf"))
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].label, "stalled.pdf pages 1");
}

#[tokio::test]
async fn test_ocr_success_replaces_legacy_text() {
    let server = MockServer::start().await;
    let tex = "\\section{Limits} $\\lim_{x \\to 0} \\frac{\\sin x}{x} = 1$";
    let archive = zip_of(&[("abc/abc.tex", tex.as_bytes())]);

    Mock::given(method("POST"))
        .and(path("/v3/pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pdf_id": "abc"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v3/pdf/abc.tex"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(archive))
        .mount(&server)
        .await;

    let processor = processor(1000, 50).with_ocr(Arc::new(mathpix_bridge(&server, 3).await));
    let chunks = processor
        .process_item(&ExtractionItem::new(pdf_with_pages(&["garbled math"]), "calc.pdf"))
        .await
        .unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, tex);
    assert_eq!(chunks[0].label, "calc.pdf chunk 0");
}

#[tokio::test]
async fn test_zip_upload_keeps_archive_order() {
    let pdf = pdf_with_pages(&["Slides for lecture three"]);
    let archive = zip_of(&[("lecture3.pdf", pdf.as_slice()), ("readme.txt", b"Read the slides first")]);

    let result = processor(500, 10).process_upload("lecture3.zip", archive).await.unwrap();

    assert_eq!(result.total_items, 2);
    let labels: Vec<&str> = result.chunks.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["lecture3.pdf pages 1", "readme.txt chunk 0"]);
}

#[tokio::test]
async fn test_upload_of_unsupported_type_is_rejected() {
    let err = processor(500, 10)
        .process_upload("slides.pptx", b"not a zip".to_vec())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), ".pptx is not a valid type");
}

#[test]
fn test_invalid_parameters_rejected_before_chunking() {
    let err = ChunkingParams::new(100, 100).unwrap_err();
    assert!(matches!(err, IngestError::InvalidParameters { .. }));
}

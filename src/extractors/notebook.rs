//! Jupyter notebook extractor.

use std::sync::Arc;

use serde::Deserialize;

use super::Extractor;
use crate::chunkers::chunk_text;
use crate::error::IngestError;
use crate::types::{Chunk, ChunkingParams, Document};

#[derive(Deserialize)]
struct Notebook {
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct Cell {
    cell_type: String,
    #[serde(default)]
    source: CellSource,
}

/// nbformat allows the source as one string or as a list of lines.
#[derive(Deserialize)]
#[serde(untagged)]
enum CellSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for CellSource {
    fn default() -> Self {
        CellSource::Text(String::new())
    }
}

impl CellSource {
    fn push_to(&self, out: &mut String) {
        match self {
            CellSource::Text(text) => out.push_str(text),
            CellSource::Lines(lines) => lines.iter().for_each(|line| out.push_str(line)),
        }
    }
}

/// Concatenate the source of every code and markdown cell, in order.
///
/// Raw and other cell types are skipped.
pub fn notebook_text(content: &[u8]) -> Result<String, serde_json::Error> {
    let notebook: Notebook = serde_json::from_slice(content)?;
    let mut text = String::new();
    for cell in notebook
        .cells
        .iter()
        .filter(|c| c.cell_type == "code" || c.cell_type == "markdown")
    {
        cell.source.push_to(&mut text);
    }
    Ok(text)
}

/// Extractor for `.ipynb` notebooks.
#[derive(Default)]
pub struct NotebookExtractor;

impl NotebookExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for NotebookExtractor {
    fn name(&self) -> &'static str {
        "notebook"
    }

    fn description(&self) -> &'static str {
        "Concatenates code and markdown cells and windows the text"
    }

    fn extract(
        &self,
        content: &[u8],
        document: &Arc<Document>,
        params: &ChunkingParams,
    ) -> Result<Vec<Chunk>, IngestError> {
        let text = notebook_text(content)
            .map_err(|e| IngestError::extraction(&document.name, format!("malformed notebook: {e}")))?;
        Ok(chunk_text(&text, document, params))
    }
}

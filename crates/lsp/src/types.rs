use std::collections::HashMap;
use std::time::Duration;

use lsp_types::{Position, Uri};
use teal_core::ProcessResult;

pub(crate) const DID_CHANGE_DEBOUNCE: Duration = Duration::from_millis(200);
pub(crate) const LOOP_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Byte offsets of line starts, for converting between the core's
/// line/byte-column positions and LSP's UTF-16 positions.
#[derive(Debug, Clone)]
pub(crate) struct LineIndex {
    pub(crate) line_starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, ch) in text.char_indices() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { line_starts }
    }

    pub(crate) fn to_position(&self, text: &str, offset: usize) -> Position {
        let offset = offset.min(text.len());
        let line_index = self
            .line_starts
            .partition_point(|line_start| *line_start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line_index];
        let line_slice = &text[line_start..offset];
        let utf16_col = line_slice.encode_utf16().count() as u32;
        Position {
            line: line_index as u32,
            character: utf16_col,
        }
    }

    pub(crate) fn to_offset(&self, text: &str, position: Position) -> Option<usize> {
        let line = usize::try_from(position.line).ok()?;
        if line >= self.line_starts.len() {
            return Some(text.len());
        }

        let line_start = self.line_starts[line];
        let line_end = if line + 1 < self.line_starts.len() {
            self.line_starts[line + 1]
        } else {
            text.len()
        };
        let line_text = &text[line_start..line_end];
        let target = usize::try_from(position.character).ok()?;

        let mut utf16_col = 0usize;
        for (offset, ch) in line_text.char_indices() {
            if utf16_col >= target {
                return Some(line_start + offset);
            }
            utf16_col += ch.len_utf16();
        }

        Some(line_end)
    }
}

#[derive(Debug)]
pub(crate) struct DocumentState {
    pub(crate) uri: Uri,
    pub(crate) version: i32,
    pub(crate) text: String,
    pub(crate) line_index: LineIndex,
    pub(crate) result: ProcessResult,
}

impl DocumentState {
    /// The core's line/byte-column coordinates for an LSP position.
    pub(crate) fn line_column(&self, position: Position) -> Option<(usize, usize)> {
        let line = usize::try_from(position.line).ok()?;
        let offset = self.line_index.to_offset(&self.text, position)?;
        let line_start = *self.line_index.line_starts.get(line)?;
        Some((line, offset.saturating_sub(line_start)))
    }

    pub(crate) fn range_for(&self, position: teal_core::Position) -> lsp_types::Range {
        let line_start = self
            .line_index
            .line_starts
            .get(position.line)
            .copied()
            .unwrap_or(self.text.len());
        lsp_types::Range {
            start: self
                .line_index
                .to_position(&self.text, line_start + position.begin),
            end: self
                .line_index
                .to_position(&self.text, line_start + position.end),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct ServerState {
    pub(crate) documents: HashMap<Uri, DocumentState>,
}

impl ServerState {
    pub(crate) fn upsert_document(&mut self, uri: Uri, text: String, version: i32) {
        let result = teal_core::process(&text);
        let line_index = LineIndex::new(&text);
        self.documents.insert(
            uri.clone(),
            DocumentState {
                uri,
                version,
                text,
                line_index,
                result,
            },
        );
    }

    /// Stores the newest text without analysing it yet; the server
    /// debounces the re-analysis.
    pub(crate) fn store_text(&mut self, uri: Uri, text: String, version: i32) {
        match self.documents.get_mut(&uri) {
            Some(doc) => {
                doc.version = version;
                doc.line_index = LineIndex::new(&text);
                doc.text = text;
            }
            None => self.upsert_document(uri, text, version),
        }
    }

    pub(crate) fn analyze_document(&mut self, uri: &Uri) {
        if let Some(doc) = self.documents.get_mut(uri) {
            doc.result = teal_core::process(&doc.text);
        }
    }

    pub(crate) fn close_document(&mut self, uri: &Uri) {
        self.documents.remove(uri);
    }

    pub(crate) fn lsp_diagnostics(&self, uri: &Uri) -> Vec<lsp_types::Diagnostic> {
        let Some(doc) = self.documents.get(uri) else {
            return Vec::new();
        };
        doc.result
            .diagnostics
            .iter()
            .map(|diagnostic| crate::convert::diagnostic_to_lsp(diagnostic, doc))
            .collect()
    }
}

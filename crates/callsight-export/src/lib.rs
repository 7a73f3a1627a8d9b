//! callsight-export: line-by-line markdown → Word (.docx) transcription.
//!
//! Each heading line becomes a Word heading at the corresponding depth (capped at
//! 9), `**bold**`-delimited runs become bold inline text, and every other
//! non-empty line becomes a plain paragraph. Works from raw model markdown or
//! from an assembled [`Report`] via its lossless re-rendering.

use callsight_core::{Report, MAX_HEADING_DEPTH};
use docx_rs::{Docx, Paragraph, Run, Style, StyleType};
use std::io::Cursor;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    /// The docx archive could not be packed.
    #[error("docx packing failed: {0}")]
    Pack(String),
}

/// Render raw analysis markdown as a .docx file, returning the document bytes.
/// `title` becomes the document's top heading.
pub fn render_markdown_docx(title: &str, markdown: &str) -> Result<Vec<u8>, ExportError> {
    let mut docx = with_heading_styles(Docx::new());
    docx = docx.add_paragraph(
        Paragraph::new()
            .style("Heading1")
            .add_run(Run::new().add_text(title)),
    );

    for line in markdown.lines() {
        if let Some(paragraph) = line_to_paragraph(line) {
            docx = docx.add_paragraph(paragraph);
        }
    }

    let mut cursor = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut cursor)
        .map_err(|e| ExportError::Pack(e.to_string()))?;
    tracing::debug!(bytes = cursor.get_ref().len(), "docx rendered");
    Ok(cursor.into_inner())
}

/// Render an assembled report as a .docx file.
pub fn render_report_docx(title: &str, report: &Report) -> Result<Vec<u8>, ExportError> {
    render_markdown_docx(title, &report.to_markdown())
}

/// One markdown line → one Word paragraph. Blank lines are dropped.
fn line_to_paragraph(line: &str) -> Option<Paragraph> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes > 0 {
        let text = trimmed[hashes..].trim();
        if !text.is_empty() {
            let depth = hashes.min(MAX_HEADING_DEPTH as usize);
            return Some(
                Paragraph::new()
                    .style(&format!("Heading{depth}"))
                    .add_run(Run::new().add_text(text)),
            );
        }
        // A bare '#' run renders as plain text.
    }

    let mut paragraph = Paragraph::new();
    // Split on '**': even chunks are plain, odd chunks are bold.
    for (i, part) in trimmed.split("**").enumerate() {
        if part.is_empty() {
            continue;
        }
        let run = Run::new().add_text(part);
        paragraph = paragraph.add_run(if i % 2 == 1 { run.bold() } else { run });
    }
    Some(paragraph)
}

/// Register Heading1..Heading9 paragraph styles with decreasing sizes.
fn with_heading_styles(mut docx: Docx) -> Docx {
    // Half-point sizes: Heading1 = 16pt down to Heading9 = 9pt.
    for depth in 1..=MAX_HEADING_DEPTH as usize {
        let size = 34usize.saturating_sub(depth * 2).max(18);
        docx = docx.add_style(
            Style::new(format!("Heading{depth}"), StyleType::Paragraph)
                .name(format!("Heading {depth}"))
                .bold()
                .size(size),
        );
    }
    docx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nonempty_zip_archive() {
        let bytes = render_markdown_docx(
            "Sales Performance Analysis Report",
            "# 1. Conversation Summary\n- **Key point:** customer accepted the scheme\n",
        )
        .unwrap();
        // .docx is a zip container; check the local-file magic.
        assert!(bytes.len() > 4);
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn report_roundtrip_renders() {
        let report = Report::assemble("# 8. Salesperson Strengths\n- Clear pitch\n");
        let bytes = render_report_docx("Report", &report).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn blank_lines_produce_no_paragraph() {
        assert!(line_to_paragraph("   ").is_none());
        assert!(line_to_paragraph("").is_none());
    }
}

//! Section segmenter: split raw model markdown into an ordered list of
//! heading-delimited sections.
//!
//! This stage cannot fail. Text with no heading markers becomes a single untitled
//! preamble section, and every non-heading line is preserved verbatim in some
//! section body so the document can always be re-rendered or exported losslessly.

use crate::taxonomy::CanonicalSection;
use serde::{Deserialize, Serialize};

/// Heading depth is clamped here; Word export also tops out at depth 9.
pub const MAX_HEADING_DEPTH: u8 = 9;

/// One heading-delimited region of the model's markdown output.
///
/// `ordinal` is the position in document order (preamble included). Later stages
/// key off [`Section::matched`], never off the ordinal, because the model may drop,
/// reorder, or rename sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Heading text, or `None` for the implicit preamble before the first heading.
    pub title: Option<String>,
    /// Count of leading `#` characters, clamped to [`MAX_HEADING_DEPTH`]. 0 for the preamble.
    pub level: u8,
    /// Position in document order, starting at 0.
    pub ordinal: usize,
    /// Body lines, verbatim (blank lines included).
    pub body: Vec<String>,
}

impl Section {
    /// True for the untitled region before the first heading.
    pub fn is_preamble(&self) -> bool {
        self.title.is_none()
    }

    /// Bind this section's title to the canonical taxonomy, if it matches.
    pub fn matched(&self) -> Option<CanonicalSection> {
        self.title.as_deref().and_then(CanonicalSection::resolve)
    }

    /// Body joined with newlines, untrimmed.
    pub fn body_text(&self) -> String {
        self.body.join("\n")
    }
}

/// Parse one line as a heading: after trimming, one or more `#` followed by
/// whitespace and non-empty text. Returns (depth, title).
fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let trimmed = line.trim();
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes == 0 {
        return None;
    }
    let rest = &trimmed[hashes..];
    // A bare "#" run or "#text" without separating whitespace is body text, not a heading.
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    let title = rest.trim();
    if title.is_empty() {
        return None;
    }
    let depth = (hashes.min(MAX_HEADING_DEPTH as usize)) as u8;
    Some((depth, title))
}

/// Split `text` into ordered sections. Never fails; duplicate headings produce
/// distinct sections; all lines preceding the first heading form the preamble.
pub fn segment(text: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut current: Option<Section> = None;
    let mut preamble_body: Vec<String> = Vec::new();
    let mut seen_heading = false;

    for line in text.lines() {
        if let Some((level, title)) = parse_heading(line) {
            if !seen_heading {
                // Close the preamble only if anything preceded the first heading.
                if !preamble_body.is_empty() {
                    sections.push(Section {
                        title: None,
                        level: 0,
                        ordinal: 0,
                        body: std::mem::take(&mut preamble_body),
                    });
                }
                seen_heading = true;
            }
            if let Some(done) = current.take() {
                sections.push(done);
            }
            current = Some(Section {
                title: Some(title.to_string()),
                level,
                ordinal: sections.len(),
                body: Vec::new(),
            });
        } else if let Some(sec) = current.as_mut() {
            sec.body.push(line.to_string());
        } else {
            preamble_body.push(line.to_string());
        }
    }

    if let Some(done) = current.take() {
        sections.push(done);
    }
    if !seen_heading {
        // No heading markers anywhere: the whole input is one preamble section,
        // even when it is empty.
        sections.push(Section {
            title: None,
            level: 0,
            ordinal: 0,
            body: preamble_body,
        });
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_requires_whitespace_after_hashes() {
        assert_eq!(parse_heading("# Title"), Some((1, "Title")));
        assert_eq!(parse_heading("   ### Deep Title  "), Some((3, "Deep Title")));
        assert_eq!(parse_heading("#NoSpace"), None);
        assert_eq!(parse_heading("###"), None);
        assert_eq!(parse_heading("plain line"), None);
    }

    #[test]
    fn depth_clamps_at_nine() {
        let (depth, title) = parse_heading("############ Overflow").unwrap();
        assert_eq!(depth, 9);
        assert_eq!(title, "Overflow");
    }

    #[test]
    fn no_headings_yields_single_preamble() {
        let sections = segment("just text\nmore text");
        assert_eq!(sections.len(), 1);
        assert!(sections[0].is_preamble());
        assert_eq!(sections[0].body, vec!["just text", "more text"]);
    }

    #[test]
    fn empty_input_yields_empty_preamble() {
        let sections = segment("");
        assert_eq!(sections.len(), 1);
        assert!(sections[0].is_preamble());
        assert!(sections[0].body.is_empty());
    }

    #[test]
    fn heading_on_first_line_skips_preamble() {
        let sections = segment("# One\nbody");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title.as_deref(), Some("One"));
        assert_eq!(sections[0].body, vec!["body"]);
    }

    #[test]
    fn duplicate_headings_stay_distinct() {
        let sections = segment("# Same\na\n# Same\nb");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].body, vec!["a"]);
        assert_eq!(sections[1].body, vec!["b"]);
        assert_eq!(sections[0].ordinal, 0);
        assert_eq!(sections[1].ordinal, 1);
    }

    #[test]
    fn blank_body_lines_are_preserved() {
        let sections = segment("# H\n\nline\n");
        assert_eq!(sections[0].body, vec!["", "line"]);
    }
}

//! Single page A4 packing notes.
//!
//! A note is first laid out as a flat list of [`Element`]s in PDF user space
//! (origin bottom left, y growing upwards) and only then rendered, so the
//! placement can be checked without parsing a PDF.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Sender;
use crate::errors::PacknoteError;
use crate::ledgers::LedgerDetails;

pub mod fonts;
mod render;

pub use fonts::Font;

pub const A4_WIDTH: f32 = 595.2756;
pub const A4_HEIGHT: f32 = 841.8898;
const MARGIN: f32 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text {
        text: String,
        font: Font,
        size: f32,
        x: f32,
        y: f32,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        width: f32,
    },
}

#[derive(Debug, Clone)]
pub struct PackingNote<'a> {
    pub number: Option<String>,
    pub details: &'a LedgerDetails,
    pub sender: &'a Sender,
}

struct Cursor {
    elements: Vec<Element>,
    y: f32,
}

impl Cursor {
    fn centred(&mut self, text: impl Into<String>, font: Font, size: f32) {
        let text = text.into();
        let x = (A4_WIDTH - font.text_width(&text, size)) / 2.0;
        self.elements.push(Element::Text {
            text,
            font,
            size,
            x,
            y: self.y,
        });
    }

    fn left(&mut self, text: impl Into<String>, font: Font, size: f32) {
        self.elements.push(Element::Text {
            text: text.into(),
            font,
            size,
            x: MARGIN,
            y: self.y,
        });
    }

    fn rule(&mut self, y: f32, width: f32) {
        self.elements.push(Element::Line {
            from: (MARGIN, y),
            to: (A4_WIDTH - MARGIN, y),
            width,
        });
    }

    fn down(&mut self, by: f32) {
        self.y -= by;
    }
}

/// `{name}_Ledger.pdf`, with path separators replaced.
pub fn file_name(ledger_name: &str) -> String {
    format!("{ledger_name}_Ledger.pdf").replace(['/', '\\'], "_")
}

impl<'a> PackingNote<'a> {
    pub fn new(number: Option<String>, details: &'a LedgerDetails, sender: &'a Sender) -> Self {
        Self {
            number,
            details,
            sender,
        }
    }

    pub fn title(&self) -> String {
        match self.number.as_deref().map(str::trim) {
            Some(number) if !number.is_empty() => format!("Packing Note: {number}"),
            _ => "Packing Note:".to_string(),
        }
    }

    pub fn layout(&self) -> Vec<Element> {
        let mut page = Cursor {
            elements: Vec::new(),
            y: A4_HEIGHT - 50.0,
        };

        page.centred(self.title(), Font::HelveticaBold, 18.0);
        page.rule(A4_HEIGHT - 65.0, 1.0);

        page.y = A4_HEIGHT - 100.0;
        page.centred(&self.details.name, Font::HelveticaBold, 25.0);
        page.down(30.0);

        for line in self.details.address_lines() {
            page.centred(line, Font::HelveticaBold, 18.0);
            page.down(20.0);
        }
        page.down(10.0);

        page.centred(format!("State: {}", self.details.state), Font::HelveticaBold, 18.0);
        page.down(20.0);
        page.centred(format!("GSTIN: {}", self.details.gstin), Font::HelveticaBold, 18.0);
        page.down(20.0);
        if self.details.has_mobile() {
            page.centred(format!("Mobile: {}", self.details.mobile), Font::HelveticaBold, 18.0);
            page.down(20.0);
        }

        page.down(15.0);
        page.rule(page.y + 10.0, 0.5);
        page.down(5.0);

        page.left(format!("From,  {}", self.sender.name), Font::HelveticaBold, 14.0);
        page.down(20.0);
        let lines = &self.sender.address_lines;
        for (i, line) in lines.iter().enumerate() {
            page.left(line, Font::Helvetica, 12.0);
            page.down(if i + 1 == lines.len() { 25.0 } else { 15.0 });
        }
        page.left(
            format!("GSTIN:- {}   PH: {}", self.sender.gstin, self.sender.phone),
            Font::HelveticaBold,
            12.0,
        );

        page.elements
    }

    /// Renders the note and writes it into `dir`, returning the file path.
    pub fn save_in(&self, dir: &Path) -> Result<PathBuf, PacknoteError> {
        std::fs::create_dir_all(dir).map_err(|e| PacknoteError::file(dir, e))?;
        let path = dir.join(file_name(&self.details.name));
        let mut document = render::render(self)?;
        let file = File::create(&path).map_err(|e| PacknoteError::file(&path, e))?;
        let mut file_writer = BufWriter::new(file);
        document.save_to(&mut file_writer)?;
        file_writer.flush()?;
        info!(path = %path.display(), ledger = %self.details.name, "wrote packing note");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn details() -> LedgerDetails {
        LedgerDetails {
            name: "Anand Silks".into(),
            gstin: "29ABCDE1234F1Z5".into(),
            address: "12 Avenue Road, , Chickpet".into(),
            state: "Karnataka".into(),
            mobile: "9845012345".into(),
        }
    }

    fn texts(elements: &[Element]) -> Vec<(&str, f32)> {
        elements
            .iter()
            .filter_map(|e| match e {
                Element::Text { text, y, .. } => Some((text.as_str(), A4_HEIGHT - y)),
                Element::Line { .. } => None,
            })
            .collect()
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn title_uses_the_note_number() {
        let details = details();
        let sender = Sender::default();
        assert_eq!(
            PackingNote::new(Some(" 117 ".into()), &details, &sender).title(),
            "Packing Note: 117"
        );
        assert_eq!(PackingNote::new(None, &details, &sender).title(), "Packing Note:");
        assert_eq!(
            PackingNote::new(Some(String::new()), &details, &sender).title(),
            "Packing Note:"
        );
    }

    #[test]
    fn vertical_positions() {
        let details = details();
        let sender = Sender::default();
        let elements = PackingNote::new(Some("7".into()), &details, &sender).layout();
        let placed: Vec<(&str, f32)> = texts(&elements);
        let expected = vec![
            ("Packing Note: 7", 50.0),
            ("Anand Silks", 100.0),
            ("12 Avenue Road", 130.0),
            ("Chickpet", 150.0),
            ("State: Karnataka", 180.0),
            ("GSTIN: 29ABCDE1234F1Z5", 200.0),
            ("Mobile: 9845012345", 220.0),
            ("From,  MADHUR MILAN SILK", 260.0),
            ("No.29/1, 2nd floor,Sri Balaji Complex,", 280.0),
            ("Appaji rao lane,S.D.D. Road Cross,", 295.0),
            ("BENGALURU-560002", 310.0),
            ("GSTIN:- 29AGJPR1392P1ZH   PH: 080-41144941", 335.0),
        ];
        assert_eq!(placed.len(), expected.len());
        for ((text, depth), (want_text, want_depth)) in placed.iter().zip(expected) {
            assert_eq!(*text, want_text);
            assert!(close(*depth, want_depth), "{text}: {depth} != {want_depth}");
        }
    }

    #[test]
    fn rules_span_the_margins() {
        let details = details();
        let sender = Sender::default();
        let lines: Vec<Element> = PackingNote::new(None, &details, &sender)
            .layout()
            .into_iter()
            .filter(|e| matches!(e, Element::Line { .. }))
            .collect();
        assert_eq!(lines.len(), 2);
        let Element::Line { from, to, width } = &lines[1] else {
            unreachable!()
        };
        assert!(close(*width, 0.5));
        assert!(close(from.0, 50.0));
        assert!(close(to.0, A4_WIDTH - 50.0));
        assert!(close(A4_HEIGHT - from.1, 245.0));
    }

    #[test]
    fn centred_text_is_centred() {
        let details = details();
        let sender = Sender::default();
        for element in PackingNote::new(None, &details, &sender).layout() {
            if let Element::Text {
                text,
                font,
                size,
                x,
                ..
            } = element
            {
                if x == MARGIN {
                    continue;
                }
                let middle = x + font.text_width(&text, size) / 2.0;
                assert!(close(middle, A4_WIDTH / 2.0), "{text} is off centre");
            }
        }
    }

    #[test]
    fn mobile_line_is_skipped_when_unknown() {
        let mut details = details();
        details.mobile = "N/A".into();
        let sender = Sender::default();
        let elements = PackingNote::new(None, &details, &sender).layout();
        let placed = texts(&elements);
        assert!(placed.iter().all(|(text, _)| !text.starts_with("Mobile")));
        let from = placed.iter().find(|(t, _)| t.starts_with("From")).unwrap();
        assert!(close(from.1, 240.0));
    }

    #[test]
    fn file_name_strips_separators() {
        assert_eq!(file_name("A/B\\C Traders"), "A_B_C Traders_Ledger.pdf");
    }

    #[test]
    fn save_writes_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let details = details();
        let sender = Sender::default();
        let path = PackingNote::new(Some("3".into()), &details, &sender)
            .save_in(dir.path())
            .unwrap();
        assert_eq!(path, dir.path().join("Anand Silks_Ledger.pdf"));
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let document = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(document.get_pages().len(), 1);
    }
}

//! PDF rendering of an [`ExportDocument`] with `printpdf`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};
use tracing::debug;

use crate::error::ExportError;

use super::document::{ExportDocument, ZERO_WIDTH_SPACE};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;
const TITLE_SIZE: f32 = 18.0;
const BODY_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 6.0;
/// Line capacity in half-em units: Latin glyphs count one, others two.
const LINE_UNITS: usize = 90;

/// Non-Latin-1 characters of the WinAnsi encoding used by built-in fonts.
const WIN_ANSI_EXTRAS: [char; 27] = [
    '\u{20AC}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017D}', '\u{2018}',
    '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}',
    '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{017E}', '\u{0178}',
];

pub(super) fn render(
    document: &ExportDocument,
    path: &Path,
    font: Option<&Path>,
) -> Result<(), ExportError> {
    if font.is_none() {
        check_builtin_glyphs(document)?;
    }

    let (doc, page, layer) = PdfDocument::new(
        document.title,
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = load_font(&doc, font)?;

    let mut current = doc.get_page(page).get_layer(layer);
    let mut y = PAGE_HEIGHT - MARGIN;

    current.use_text(document.title, TITLE_SIZE, Mm(MARGIN), Mm(y), &font);
    y -= LINE_HEIGHT * 2.0;

    let mut pages = 1;
    for line in document.lines() {
        for row in wrap(&line, LINE_UNITS) {
            if y < MARGIN {
                let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
                current = doc.get_page(page).get_layer(layer);
                y = PAGE_HEIGHT - MARGIN;
                pages += 1;
            }
            if !row.is_empty() {
                current.use_text(row, BODY_SIZE, Mm(MARGIN), Mm(y), &font);
            }
            y -= LINE_HEIGHT;
        }
    }

    let file = File::create(path).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    doc.save(&mut BufWriter::new(file))
        .map_err(|e| ExportError::Render(e.to_string()))?;

    debug!("Rendered {} pages to {}", pages, path.display());
    Ok(())
}

fn load_font(
    doc: &PdfDocumentReference,
    path: Option<&Path>,
) -> Result<IndirectFontRef, ExportError> {
    match path {
        Some(path) => {
            let file = File::open(path).map_err(|source| ExportError::Font {
                path: path.to_path_buf(),
                source,
            })?;
            doc.add_external_font(file)
                .map_err(|e| ExportError::Render(e.to_string()))
        }
        None => doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ExportError::Render(e.to_string())),
    }
}

fn builtin_can_draw(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{A0}'..='\u{FF}')
        || c.is_ascii_whitespace()
        || c == ZERO_WIDTH_SPACE
        || WIN_ANSI_EXTRAS.contains(&c)
}

/// Built-in fonts silently drop what they cannot encode, so refuse up front.
fn check_builtin_glyphs(document: &ExportDocument) -> Result<(), ExportError> {
    let missing = std::iter::once(document.title.to_string())
        .chain(document.lines())
        .find_map(|line| line.chars().find(|&c| !builtin_can_draw(c)));
    match missing {
        Some(glyph) => Err(ExportError::MissingGlyph { glyph }),
        None => Ok(()),
    }
}

fn char_units(c: char) -> usize {
    if c.is_ascii() { 1 } else { 2 }
}

/// Greedy line wrapping at spaces and zero-width break marks. Pieces wider
/// than a full line are split between characters.
fn wrap(text: &str, max_units: usize) -> Vec<String> {
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut width = 0;

    for (word_index, word) in text.split(' ').enumerate() {
        for (piece_index, piece) in word.split(ZERO_WIDTH_SPACE).enumerate() {
            let spaced = word_index > 0 && piece_index == 0;
            let piece_width: usize = piece.chars().map(char_units).sum();
            let gap = usize::from(spaced && !row.is_empty());

            if !row.is_empty() && width + gap + piece_width > max_units {
                rows.push(std::mem::take(&mut row));
                width = 0;
            } else if gap == 1 {
                row.push(' ');
                width += 1;
            }

            for c in piece.chars() {
                let units = char_units(c);
                if !row.is_empty() && width + units > max_units {
                    rows.push(std::mem::take(&mut row));
                    width = 0;
                }
                row.push(c);
                width += units;
            }
        }
    }

    rows.push(row);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportKind;
    use crate::export::document::Glyphs;
    use crate::models::Question;

    #[test]
    fn test_wrap_at_spaces() {
        assert_eq!(wrap("aaa bbb ccc", 7), vec!["aaa bbb", "ccc"]);
        assert_eq!(wrap("", 10), vec![""]);
    }

    #[test]
    fn test_wrap_at_zero_width_marks() {
        let text = format!("abcde{}fghij", ZERO_WIDTH_SPACE);
        assert_eq!(wrap(&text, 6), vec!["abcde", "fghij"]);
        assert_eq!(wrap(&text, 20), vec!["abcdefghij"]);
    }

    #[test]
    fn test_wide_glyphs_count_double() {
        assert_eq!(wrap("一二三四", 4), vec!["一二", "三四"]);
    }

    #[test]
    fn test_render_writes_file() {
        let questions = vec![Question::TrueFalse {
            statement: "The sky is blue.".to_string(),
            correct_value: true,
            explanation: "Rayleigh scattering.".to_string(),
        }];
        let document = ExportDocument::build(ExportKind::Answers, &questions, Glyphs::Latin);
        let path = std::env::temp_dir().join(format!("doc-quiz-render-{}.pdf", std::process::id()));

        render(&document, &path, None).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_builtin_font_refuses_cjk_text() {
        let questions = vec![Question::TrueFalse {
            statement: "水是濕的".to_string(),
            correct_value: true,
            explanation: String::new(),
        }];
        let document = ExportDocument::build(ExportKind::Questions, &questions, Glyphs::Latin);
        let path = std::env::temp_dir().join(format!("doc-quiz-cjk-{}.pdf", std::process::id()));

        let err = render(&document, &path, None).unwrap_err();

        assert!(matches!(err, ExportError::MissingGlyph { glyph: '水' }));
        assert!(err.to_string().contains("--font"));
        assert!(!path.exists());
    }

    #[test]
    fn test_builtin_glyph_coverage() {
        assert!(builtin_can_draw('A'));
        assert!(builtin_can_draw('é'));
        assert!(builtin_can_draw('\u{2014}'));
        assert!(builtin_can_draw(ZERO_WIDTH_SPACE));
        assert!(!builtin_can_draw('是'));
        assert!(!builtin_can_draw('\u{03B1}'));
    }
}

//! Office Open XML documents: a zip archive of XML parts.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use zip::ZipArchive;

use crate::error::ExtractError;

use super::DocumentSource;

const DOCX_BODY: &str = "word/document.xml";
const PPTX_SLIDES_DIR: &str = "ppt/slides/";

/// Paragraph text of a word-processing document, one paragraph per line.
pub(super) fn extract_docx(source: &DocumentSource) -> Result<String, ExtractError> {
    let fail = |detail: String| ExtractError::Docx {
        name: source.name.clone(),
        detail,
    };

    let mut archive =
        ZipArchive::new(Cursor::new(source.bytes.as_slice())).map_err(|e| fail(e.to_string()))?;
    let xml = read_part(&mut archive, DOCX_BODY).map_err(fail)?;

    let text = collect_text(&xml, b"w:t", Some(b"w:p"), "\n").map_err(fail)?;
    Ok(text.trim().to_string())
}

/// Text runs of every slide, in slide order, separated by spaces.
pub(super) fn extract_pptx(source: &DocumentSource) -> Result<String, ExtractError> {
    let fail = |detail: String| ExtractError::Pptx {
        name: source.name.clone(),
        detail,
    };

    let mut archive =
        ZipArchive::new(Cursor::new(source.bytes.as_slice())).map_err(|e| fail(e.to_string()))?;

    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let rest = name.strip_prefix(PPTX_SLIDES_DIR)?;
            let stem = rest.strip_suffix(".xml")?;
            if stem.contains('/') {
                return None;
            }
            let number = stem
                .strip_prefix("slide")
                .and_then(|n| n.parse().ok())
                .unwrap_or(u32::MAX);
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort();

    let mut text = String::new();
    for (_, name) in slides {
        let xml = read_part(&mut archive, &name).map_err(fail)?;
        let slide_text = collect_text(&xml, b"a:t", None, "").map_err(fail)?;
        text.push_str(&slide_text);
    }

    Ok(text.trim_end().to_string())
}

fn read_part<R: Read + std::io::Seek>(
    archive: &mut ZipArchive<R>,
    name: &str,
) -> Result<String, String> {
    let mut part = archive
        .by_name(name)
        .map_err(|e| format!("{}: {}", name, e))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|e| format!("{}: {}", name, e))?;
    Ok(xml)
}

/// Collect the text inside every `text_tag` element.
///
/// Without a `block_tag`, each run is followed by a space. With one, runs
/// are concatenated and `block_separator` is appended at the end of each
/// block element.
fn collect_text(
    xml: &str,
    text_tag: &[u8],
    block_tag: Option<&[u8]>,
    block_separator: &str,
) -> Result<String, String> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == text_tag => in_text = true,
            Ok(Event::Text(t)) if in_text => {
                let text = t.unescape().map_err(|e| e.to_string())?;
                out.push_str(&text);
            }
            Ok(Event::End(e)) => {
                let name = e.name();
                if name.as_ref() == text_tag {
                    in_text = false;
                    if block_tag.is_none() {
                        out.push(' ');
                    }
                } else if block_tag == Some(name.as_ref()) {
                    out.push_str(block_separator);
                }
            }
            Ok(Event::Empty(e)) if block_tag.is_some() => match e.name().as_ref() {
                b"w:tab" => out.push('\t'),
                b"w:br" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "malformed XML at position {}: {}",
                    reader.buffer_position(),
                    e
                ));
            }
            _ => {}
        }
    }

    Ok(out)
}

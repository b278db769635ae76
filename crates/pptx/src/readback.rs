//! Reads generated decks back for assertions.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use zip::ZipArchive;

pub(crate) fn part_names(bytes: &[u8]) -> Vec<String> {
    let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    archive.file_names().map(|n| n.to_string()).collect()
}

pub(crate) fn read_part(bytes: &[u8], name: &str) -> String {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut content = String::new();
    file.read_to_string(&mut content).unwrap();
    content
}

/// Text of each shape on a slide, paragraphs joined by newlines.
pub(crate) fn slide_shapes(bytes: &[u8], slide_number: usize) -> Vec<String> {
    let xml = read_part(bytes, &format!("ppt/slides/slide{}.xml", slide_number));
    let mut reader = Reader::from_str(&xml);
    reader.trim_text(true);

    let mut shapes = Vec::new();
    let mut paragraphs: Vec<String> = Vec::new();
    let mut in_shape = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"sp" => {
                    in_shape = true;
                    paragraphs.clear();
                }
                b"p" if in_shape => paragraphs.push(String::new()),
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if let Some(current) = paragraphs.last_mut() {
                    current.push_str(&e.unescape().unwrap());
                }
            }
            Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"sp" => {
                in_shape = false;
                shapes.push(paragraphs.join("\n"));
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!("invalid slide XML: {}", e),
            _ => {}
        }
    }

    shapes
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

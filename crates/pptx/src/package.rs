//! OOXML package assembly.
//!
//! A deck is written with one master, one theme and two layouts (a title
//! slide and a title-and-content slide). Every slide places its shapes
//! explicitly, so the layouts only need to exist for the package to be valid.

use quick_xml::escape::escape;
use report_core::{Error, Result};
use std::io::{Cursor, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument.presentationml";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Slide size in EMU (4:3).
const SLIDE_CX: i64 = 9_144_000;
const SLIDE_CY: i64 = 6_858_000;

/// Which of the two layouts a slide uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideLayout {
    /// Centered title with a subtitle block below.
    Title,
    /// Title at the top with a body block below.
    TitleAndContent,
}

impl SlideLayout {
    /// 1-based layout part number.
    fn part_number(self) -> usize {
        match self {
            Self::Title => 1,
            Self::TitleAndContent => 2,
        }
    }
}

/// Text content of one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideSpec {
    pub layout: SlideLayout,
    pub title: String,
    /// Body paragraphs, in order.
    pub body: Vec<String>,
}

impl SlideSpec {
    pub fn title_slide(title: impl Into<String>, body: &[&str]) -> Self {
        Self::new(SlideLayout::Title, title, body)
    }

    pub fn content_slide(title: impl Into<String>, body: &[&str]) -> Self {
        Self::new(SlideLayout::TitleAndContent, title, body)
    }

    fn new(layout: SlideLayout, title: impl Into<String>, body: &[&str]) -> Self {
        Self {
            layout,
            title: title.into(),
            body: body.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// An in-memory presentation that can be serialized to .pptx bytes.
#[derive(Debug, Clone, Default)]
pub struct PresentationPackage {
    slides: Vec<SlideSpec>,
}

impl PresentationPackage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_slide(&mut self, slide: SlideSpec) {
        self.slides.push(slide);
    }

    pub fn slides(&self) -> &[SlideSpec] {
        &self.slides
    }

    /// Serialize the deck as a ZIP archive.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let count = self.slides.len();

        write_part(&mut zip, options, "[Content_Types].xml", &content_types_xml(count))?;
        write_part(&mut zip, options, "_rels/.rels", &root_rels_xml())?;
        write_part(&mut zip, options, "ppt/presentation.xml", &presentation_xml(count))?;
        write_part(&mut zip, options, "ppt/_rels/presentation.xml.rels", &presentation_rels_xml(count))?;
        write_part(&mut zip, options, "ppt/slideMasters/slideMaster1.xml", &slide_master_xml())?;
        write_part(
            &mut zip,
            options,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &slide_master_rels_xml(),
        )?;
        for layout in [SlideLayout::Title, SlideLayout::TitleAndContent] {
            let n = layout.part_number();
            write_part(
                &mut zip,
                options,
                &format!("ppt/slideLayouts/slideLayout{}.xml", n),
                &slide_layout_xml(layout),
            )?;
            write_part(
                &mut zip,
                options,
                &format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", n),
                &relationships(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
            )?;
        }
        write_part(&mut zip, options, "ppt/theme/theme1.xml", THEME_XML)?;

        for (idx, slide) in self.slides.iter().enumerate() {
            let n = idx + 1;
            write_part(&mut zip, options, &format!("ppt/slides/slide{}.xml", n), &slide_xml(slide))?;
            let layout_target = format!("../slideLayouts/slideLayout{}.xml", slide.layout.part_number());
            write_part(
                &mut zip,
                options,
                &format!("ppt/slides/_rels/slide{}.xml.rels", n),
                &relationships(&[("rId1", "slideLayout", layout_target.as_str())]),
            )?;
        }

        let cursor = zip
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finalize PPTX archive: {}", e)))?;
        log::debug!("Assembled PPTX with {} slides", count);
        Ok(cursor.into_inner())
    }
}

fn write_part<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    options: FileOptions,
    name: &str,
    content: &str,
) -> Result<()> {
    zip.start_file(name, options)
        .map_err(|e| Error::ZipError(format!("Failed to create '{}': {}", name, e)))?;
    zip.write_all(content.as_bytes())
        .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", name, e)))?;
    Ok(())
}

/// A relationships part from (id, relationship type suffix, target) triples.
fn relationships(rels: &[(&str, &str, &str)]) -> String {
    let mut xml = format!("{}\n<Relationships xmlns=\"{}\">", XML_DECL, NS_RELS);
    for (id, kind, target) in rels {
        xml.push_str(&format!(
            "<Relationship Id=\"{}\" Type=\"{}/{}\" Target=\"{}\"/>",
            id, REL_BASE, kind, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn content_types_xml(slide_count: usize) -> String {
    let mut xml = format!(
        "{}\n<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
         <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
         <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
         <Override PartName=\"/ppt/presentation.xml\" ContentType=\"{ct}.presentation.main+xml\"/>\
         <Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" ContentType=\"{ct}.slideMaster+xml\"/>\
         <Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" ContentType=\"{ct}.slideLayout+xml\"/>\
         <Override PartName=\"/ppt/slideLayouts/slideLayout2.xml\" ContentType=\"{ct}.slideLayout+xml\"/>\
         <Override PartName=\"/ppt/theme/theme1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>",
        XML_DECL,
        ct = CT_BASE
    );
    for i in 1..=slide_count {
        xml.push_str(&format!(
            "<Override PartName=\"/ppt/slides/slide{}.xml\" ContentType=\"{}.slide+xml\"/>",
            i, CT_BASE
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn root_rels_xml() -> String {
    relationships(&[("rId1", "officeDocument", "ppt/presentation.xml")])
}

fn presentation_xml(slide_count: usize) -> String {
    // rId1 is the master, rId2 the theme; slides follow from rId3.
    let slide_ids: String = (1..=slide_count)
        .map(|i| format!("<p:sldId id=\"{}\" r:id=\"rId{}\"/>", 255 + i, i + 2))
        .collect();
    format!(
        "{}\n<p:presentation xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\">\
         <p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst>\
         <p:sldIdLst>{}</p:sldIdLst>\
         <p:sldSz cx=\"{}\" cy=\"{}\" type=\"screen4x3\"/>\
         <p:notesSz cx=\"{}\" cy=\"{}\"/>\
         </p:presentation>",
        XML_DECL, NS_A, NS_R, NS_P, slide_ids, SLIDE_CX, SLIDE_CY, SLIDE_CY, SLIDE_CX
    )
}

fn presentation_rels_xml(slide_count: usize) -> String {
    let targets: Vec<(String, String)> = (1..=slide_count)
        .map(|i| (format!("rId{}", i + 2), format!("slides/slide{}.xml", i)))
        .collect();
    let mut rels = vec![
        ("rId1", "slideMaster", "slideMasters/slideMaster1.xml"),
        ("rId2", "theme", "theme/theme1.xml"),
    ];
    rels.extend(targets.iter().map(|(id, target)| (id.as_str(), "slide", target.as_str())));
    relationships(&rels)
}

fn empty_shape_tree() -> &'static str {
    "<p:spTree><p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree>"
}

fn slide_master_xml() -> String {
    format!(
        "{}\n<p:sldMaster xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\">\
         <p:cSld>{}</p:cSld>\
         <p:clrMap bg1=\"lt1\" tx1=\"dk1\" bg2=\"lt2\" tx2=\"dk2\" accent1=\"accent1\" accent2=\"accent2\" \
         accent3=\"accent3\" accent4=\"accent4\" accent5=\"accent5\" accent6=\"accent6\" hlink=\"hlink\" folHlink=\"folHlink\"/>\
         <p:sldLayoutIdLst>\
         <p:sldLayoutId id=\"2147483649\" r:id=\"rId1\"/>\
         <p:sldLayoutId id=\"2147483650\" r:id=\"rId2\"/>\
         </p:sldLayoutIdLst>\
         </p:sldMaster>",
        XML_DECL,
        NS_A,
        NS_R,
        NS_P,
        empty_shape_tree()
    )
}

fn slide_master_rels_xml() -> String {
    relationships(&[
        ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
        ("rId2", "slideLayout", "../slideLayouts/slideLayout2.xml"),
        ("rId3", "theme", "../theme/theme1.xml"),
    ])
}

fn slide_layout_xml(layout: SlideLayout) -> String {
    let (kind, name) = match layout {
        SlideLayout::Title => ("title", "Title Slide"),
        SlideLayout::TitleAndContent => ("obj", "Title and Content"),
    };
    format!(
        "{}\n<p:sldLayout xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\" type=\"{}\" preserve=\"1\">\
         <p:cSld name=\"{}\">{}</p:cSld>\
         </p:sldLayout>",
        XML_DECL,
        NS_A,
        NS_R,
        NS_P,
        kind,
        name,
        empty_shape_tree()
    )
}

/// Placeholder geometry: (x, y, cx, cy) in EMU.
type Frame = (i64, i64, i64, i64);

fn frames(layout: SlideLayout) -> (Frame, Frame) {
    match layout {
        SlideLayout::Title => (
            (685_800, 2_130_425, 7_772_400, 1_470_025),
            (1_371_600, 3_886_200, 6_400_800, 1_752_600),
        ),
        SlideLayout::TitleAndContent => (
            (457_200, 274_638, 8_229_600, 1_143_000),
            (457_200, 1_600_200, 8_229_600, 4_525_963),
        ),
    }
}

fn text_shape(id: u32, name: &str, placeholder: &str, frame: Frame, paragraphs: &str) -> String {
    let (x, y, cx, cy) = frame;
    format!(
        "<p:sp>\
         <p:nvSpPr><p:cNvPr id=\"{}\" name=\"{}\"/><p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr><p:nvPr>{}</p:nvPr></p:nvSpPr>\
         <p:spPr><a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm></p:spPr>\
         <p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody>\
         </p:sp>",
        id, name, placeholder, x, y, cx, cy, paragraphs
    )
}

fn paragraph(text: &str, size: u32, bold: bool) -> String {
    if text.is_empty() {
        return "<a:p><a:endParaRPr lang=\"en-US\"/></a:p>".to_string();
    }
    format!(
        "<a:p><a:r><a:rPr lang=\"en-US\" sz=\"{}\" b=\"{}\" dirty=\"0\"/><a:t>{}</a:t></a:r></a:p>",
        size,
        if bold { 1 } else { 0 },
        escape(text)
    )
}

fn slide_xml(slide: &SlideSpec) -> String {
    let (title_frame, body_frame) = frames(slide.layout);
    let (title_ph, body_ph) = match slide.layout {
        SlideLayout::Title => ("<p:ph type=\"ctrTitle\"/>", "<p:ph type=\"subTitle\" idx=\"1\"/>"),
        SlideLayout::TitleAndContent => ("<p:ph type=\"title\"/>", "<p:ph idx=\"1\"/>"),
    };

    let title = paragraph(&slide.title, 4000, true);
    let mut body: String = slide
        .body
        .iter()
        .flat_map(|text| text.lines())
        .map(|line| paragraph(line, 2000, false))
        .collect();
    if body.is_empty() {
        body = paragraph("", 2000, false);
    }

    format!(
        "{}\n<p:sld xmlns:a=\"{}\" xmlns:r=\"{}\" xmlns:p=\"{}\">\
         <p:cSld><p:spTree>\
         <p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>\
         {}{}\
         </p:spTree></p:cSld>\
         <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>\
         </p:sld>",
        XML_DECL,
        NS_A,
        NS_R,
        NS_P,
        text_shape(2, "Title", title_ph, title_frame, &title),
        text_shape(3, "Content", body_ph, body_frame, &body)
    )
}

const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Report Theme"><a:themeElements><a:clrScheme name="Report"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="1F2937"/></a:dk2><a:lt2><a:srgbClr val="F3F4F6"/></a:lt2><a:accent1><a:srgbClr val="2563EB"/></a:accent1><a:accent2><a:srgbClr val="DC2626"/></a:accent2><a:accent3><a:srgbClr val="16A34A"/></a:accent3><a:accent4><a:srgbClr val="D97706"/></a:accent4><a:accent5><a:srgbClr val="7C3AED"/></a:accent5><a:accent6><a:srgbClr val="0891B2"/></a:accent6><a:hlink><a:srgbClr val="2563EB"/></a:hlink><a:folHlink><a:srgbClr val="7C3AED"/></a:folHlink></a:clrScheme><a:fontScheme name="Report"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Report"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::readback::{part_names, read_part, slide_shapes};

    #[test]
    fn test_package_parts() {
        let mut deck = PresentationPackage::new();
        deck.add_slide(SlideSpec::title_slide("Hello", &["one"]));
        deck.add_slide(SlideSpec::content_slide("World", &["two"]));
        let bytes = deck.to_bytes().unwrap();

        assert_eq!(&bytes[0..2], b"PK");
        let names = part_names(&bytes);
        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/slideLayouts/slideLayout2.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing part {}", expected);
        }
    }

    #[test]
    fn test_slide_uses_its_layout() {
        let mut deck = PresentationPackage::new();
        deck.add_slide(SlideSpec::title_slide("A", &[]));
        deck.add_slide(SlideSpec::content_slide("B", &[]));
        let bytes = deck.to_bytes().unwrap();

        let rels1 = read_part(&bytes, "ppt/slides/_rels/slide1.xml.rels");
        let rels2 = read_part(&bytes, "ppt/slides/_rels/slide2.xml.rels");
        assert!(rels1.contains("slideLayout1.xml"));
        assert!(rels2.contains("slideLayout2.xml"));

        let slide1 = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide1.contains("type=\"ctrTitle\""));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut deck = PresentationPackage::new();
        deck.add_slide(SlideSpec::content_slide(
            "Advice & Analysis",
            &["<b>not markup</b>", "first\nsecond"],
        ));
        let bytes = deck.to_bytes().unwrap();

        let raw = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(raw.contains("Advice &amp; Analysis"));
        assert!(!raw.contains("<b>"));

        let shapes = slide_shapes(&bytes, 1);
        assert_eq!(shapes[0], "Advice & Analysis");
        assert_eq!(shapes[1], "<b>not markup</b>\nfirst\nsecond");
    }

    #[test]
    fn test_empty_deck_is_valid_zip() {
        let bytes = PresentationPackage::new().to_bytes().unwrap();
        assert_eq!(&bytes[0..2], b"PK");
        let presentation = read_part(&bytes, "ppt/presentation.xml");
        assert!(presentation.contains("<p:sldIdLst></p:sldIdLst>"));
    }
}

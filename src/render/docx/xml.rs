//! WordprocessingML part writers.
//!
//! `word/document.xml` and the generated `word/styles.xml` are produced
//! with a thin wrapper over [`quick_xml::Writer`].

use crate::error::{Error, Result};
use crate::figure::cm_to_emu;
use crate::model::{
    Alignment, Document, DocumentDefaults, InlineContent, Orientation, Paragraph, Section,
    SectionStart, TextRun,
};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::BTreeMap;

pub(crate) const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const NS_R: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

/// Font used by the generated style sheet when the document sets none.
const FALLBACK_FONT: &str = "Calibri";
const FALLBACK_FONT_SIZE: f32 = 11.0;

/// Header and footer distance in twips.
const HEADER_FOOTER_TWIPS: i64 = 720;

/// Event writer producing a standalone UTF-8 XML part.
pub(crate) struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Start a part with its XML declaration.
    pub(crate) fn new() -> Result<Self> {
        let mut inner = Writer::new(Vec::new());
        inner.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(Self { inner })
    }

    pub(crate) fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut el = BytesStart::new(name);
        for attr in attrs {
            el.push_attribute(*attr);
        }
        self.inner.write_event(Event::Start(el))?;
        Ok(())
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut el = BytesStart::new(name);
        for attr in attrs {
            el.push_attribute(*attr);
        }
        self.inner.write_event(Event::Empty(el))?;
        Ok(())
    }

    pub(crate) fn end(&mut self, name: &str) -> Result<()> {
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    pub(crate) fn text(&mut self, text: &str) -> Result<()> {
        self.inner.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    /// Write `<name attrs>text</name>`.
    pub(crate) fn element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    pub(crate) fn into_bytes(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

/// Points to twentieths of a point.
pub(crate) fn pt_to_twips(pt: f32) -> i64 {
    (f64::from(pt) * 20.0).round() as i64
}

/// Millimetres to twentieths of a point.
pub(crate) fn mm_to_twips(mm: f64) -> i64 {
    (mm / 25.4 * 1440.0).round() as i64
}

/// Points to half-points, the unit of `w:sz`.
pub(crate) fn pt_to_half_points(pt: f32) -> i64 {
    (f64::from(pt) * 2.0).round() as i64
}

/// Writer for `word/document.xml`.
pub(crate) struct DocumentXml<'a> {
    doc: &'a Document,
    /// Resource ID to relationship ID
    image_rels: &'a BTreeMap<String, String>,
    next_drawing_id: u32,
}

impl<'a> DocumentXml<'a> {
    pub(crate) fn new(doc: &'a Document, image_rels: &'a BTreeMap<String, String>) -> Self {
        Self {
            doc,
            image_rels,
            next_drawing_id: 1,
        }
    }

    pub(crate) fn write(mut self) -> Result<Vec<u8>> {
        let mut w = XmlWriter::new()?;
        w.start(
            "w:document",
            &[
                ("xmlns:w", NS_W),
                ("xmlns:r", NS_R),
                ("xmlns:wp", NS_WP),
                ("xmlns:a", NS_A),
                ("xmlns:pic", NS_PIC),
            ],
        )?;
        w.start("w:body", &[])?;

        let doc = self.doc;
        let last = doc.sections.len().saturating_sub(1);
        for (index, section) in doc.sections.iter().enumerate() {
            log::debug!(
                "section {}: {} paragraphs, {:?}",
                index + 1,
                section.paragraph_count(),
                section.start
            );
            let is_final = index == last;
            let count = section.paragraphs.len();
            for (i, paragraph) in section.paragraphs.iter().enumerate() {
                let carries = !is_final && i + 1 == count;
                self.write_paragraph(&mut w, paragraph, carries.then_some((index, section)))?;
            }
            // A non-final section needs a paragraph to hold its properties.
            if !is_final && count == 0 {
                self.write_paragraph(&mut w, &Paragraph::new(), Some((index, section)))?;
            }
        }

        if doc.is_empty() {
            w.empty("w:p", &[])?;
        }
        if let Some(section) = doc.sections.last() {
            write_section_properties(&mut w, last, section)?;
        }

        w.end("w:body")?;
        w.end("w:document")?;
        Ok(w.into_bytes())
    }

    fn write_paragraph(
        &mut self,
        w: &mut XmlWriter,
        paragraph: &Paragraph,
        section: Option<(usize, &Section)>,
    ) -> Result<()> {
        w.start("w:p", &[])?;
        write_paragraph_properties(w, paragraph, section)?;

        for content in &paragraph.content {
            match content {
                InlineContent::Text(run) => write_run(w, run, &self.doc.defaults)?,
                InlineContent::LineBreak => {
                    w.start("w:r", &[])?;
                    w.empty("w:br", &[])?;
                    w.end("w:r")?;
                }
                InlineContent::Image {
                    resource_id,
                    width_cm,
                    height_cm,
                } => self.write_drawing(w, resource_id, *width_cm, *height_cm)?,
            }
        }

        w.end("w:p")
    }

    fn write_drawing(
        &mut self,
        w: &mut XmlWriter,
        resource_id: &str,
        width_cm: f64,
        height_cm: f64,
    ) -> Result<()> {
        let rel_id = self
            .image_rels
            .get(resource_id)
            .ok_or_else(|| Error::Render(format!("unknown image resource '{}'", resource_id)))?;
        let part_name = self
            .doc
            .get_resource(resource_id)
            .map(|r| r.part_name(resource_id))
            .unwrap_or_else(|| resource_id.to_string());

        let id = self.next_drawing_id.to_string();
        self.next_drawing_id += 1;
        let name = format!("Picture {}", id);
        let cx = cm_to_emu(width_cm).to_string();
        let cy = cm_to_emu(height_cm).to_string();

        w.start("w:r", &[])?;
        w.start("w:drawing", &[])?;
        w.start(
            "wp:inline",
            &[("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")],
        )?;
        w.empty("wp:extent", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
        w.empty("wp:docPr", &[("id", id.as_str()), ("name", name.as_str())])?;
        w.start("wp:cNvGraphicFramePr", &[])?;
        w.empty("a:graphicFrameLocks", &[("noChangeAspect", "1")])?;
        w.end("wp:cNvGraphicFramePr")?;

        w.start("a:graphic", &[])?;
        w.start(
            "a:graphicData",
            &[("uri", "http://schemas.openxmlformats.org/drawingml/2006/picture")],
        )?;
        w.start("pic:pic", &[])?;

        w.start("pic:nvPicPr", &[])?;
        w.empty("pic:cNvPr", &[("id", "0"), ("name", part_name.as_str())])?;
        w.empty("pic:cNvPicPr", &[])?;
        w.end("pic:nvPicPr")?;

        w.start("pic:blipFill", &[])?;
        w.empty("a:blip", &[("r:embed", rel_id.as_str())])?;
        w.start("a:stretch", &[])?;
        w.empty("a:fillRect", &[])?;
        w.end("a:stretch")?;
        w.end("pic:blipFill")?;

        w.start("pic:spPr", &[])?;
        w.start("a:xfrm", &[])?;
        w.empty("a:off", &[("x", "0"), ("y", "0")])?;
        w.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
        w.end("a:xfrm")?;
        w.start("a:prstGeom", &[("prst", "rect")])?;
        w.empty("a:avLst", &[])?;
        w.end("a:prstGeom")?;
        w.end("pic:spPr")?;

        w.end("pic:pic")?;
        w.end("a:graphicData")?;
        w.end("a:graphic")?;
        w.end("wp:inline")?;
        w.end("w:drawing")?;
        w.end("w:r")
    }
}

fn write_paragraph_properties(
    w: &mut XmlWriter,
    paragraph: &Paragraph,
    section: Option<(usize, &Section)>,
) -> Result<()> {
    let style = &paragraph.style;
    let has_spacing =
        style.space_before.is_some() || style.space_after.is_some() || style.line_spacing.is_some();
    if !has_spacing
        && style.first_line_indent.is_none()
        && style.alignment == Alignment::Left
        && section.is_none()
    {
        return Ok(());
    }

    w.start("w:pPr", &[])?;

    if has_spacing {
        let before = style.space_before.map(|pt| pt_to_twips(pt).to_string());
        let after = style.space_after.map(|pt| pt_to_twips(pt).to_string());
        let line = style.line_spacing.map(|pt| pt_to_twips(pt).to_string());
        let mut attrs = Vec::new();
        if let Some(v) = &before {
            attrs.push(("w:before", v.as_str()));
        }
        if let Some(v) = &after {
            attrs.push(("w:after", v.as_str()));
        }
        if let Some(v) = &line {
            attrs.push(("w:line", v.as_str()));
            attrs.push(("w:lineRule", "exact"));
        }
        w.empty("w:spacing", &attrs)?;
    }

    if let Some(indent) = style.first_line_indent {
        let twips = pt_to_twips(indent).to_string();
        w.empty("w:ind", &[("w:firstLine", twips.as_str())])?;
    }

    let justification = match style.alignment {
        Alignment::Left => None,
        Alignment::Center => Some("center"),
        Alignment::Right => Some("right"),
        Alignment::Justify => Some("both"),
    };
    if let Some(val) = justification {
        w.empty("w:jc", &[("w:val", val)])?;
    }

    if let Some((index, section)) = section {
        write_section_properties(w, index, section)?;
    }

    w.end("w:pPr")
}

fn write_run(w: &mut XmlWriter, run: &TextRun, defaults: &DocumentDefaults) -> Result<()> {
    if run.text.is_empty() {
        return Ok(());
    }

    let style = &run.style;
    let font = style.font_name.as_deref().or(defaults.font_name.as_deref());
    let size = style.font_size.or(defaults.font_size);
    let vert_align = if style.superscript {
        Some("superscript")
    } else if style.subscript {
        Some("subscript")
    } else {
        None
    };

    w.start("w:r", &[])?;
    if font.is_some() || size.is_some() || style.bold || style.italic || vert_align.is_some() {
        w.start("w:rPr", &[])?;
        if let Some(font) = font {
            w.empty(
                "w:rFonts",
                &[("w:ascii", font), ("w:hAnsi", font), ("w:cs", font)],
            )?;
        }
        if style.bold {
            w.empty("w:b", &[])?;
        }
        if style.italic {
            w.empty("w:i", &[])?;
        }
        if let Some(size) = size {
            let half = pt_to_half_points(size).to_string();
            w.empty("w:sz", &[("w:val", half.as_str())])?;
            w.empty("w:szCs", &[("w:val", half.as_str())])?;
        }
        if let Some(val) = vert_align {
            w.empty("w:vertAlign", &[("w:val", val)])?;
        }
        w.end("w:rPr")?;
    }
    write_run_text(w, &run.text)?;
    w.end("w:r")
}

/// Characters XML 1.0 does not allow in text content.
fn is_xml_forbidden(ch: char) -> bool {
    matches!(ch, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

/// Run text with `\n` as breaks and `\t` as tabs. Characters XML cannot
/// carry are dropped.
fn write_run_text(w: &mut XmlWriter, text: &str) -> Result<()> {
    let mut segment = String::new();
    for ch in text.chars() {
        match ch {
            '\n' | '\t' => {
                flush_text(w, &mut segment)?;
                w.empty(if ch == '\n' { "w:br" } else { "w:tab" }, &[])?;
            }
            '\r' => {}
            c if is_xml_forbidden(c) => {
                log::debug!("Dropping control character U+{:04X}", c as u32);
            }
            _ => segment.push(ch),
        }
    }
    flush_text(w, &mut segment)
}

fn flush_text(w: &mut XmlWriter, segment: &mut String) -> Result<()> {
    if !segment.is_empty() {
        w.element("w:t", &[("xml:space", "preserve")], segment)?;
        segment.clear();
    }
    Ok(())
}

fn write_section_properties(w: &mut XmlWriter, index: usize, section: &Section) -> Result<()> {
    let g = &section.geometry;
    let width = mm_to_twips(g.width_mm).to_string();
    let height = mm_to_twips(g.height_mm).to_string();
    let top = mm_to_twips(g.margin_top_mm).to_string();
    let right = mm_to_twips(g.margin_right_mm).to_string();
    let bottom = mm_to_twips(g.margin_bottom_mm).to_string();
    let left = mm_to_twips(g.margin_left_mm).to_string();
    let header_footer = HEADER_FOOTER_TWIPS.to_string();
    let orient = match g.orientation {
        Orientation::Portrait => "portrait",
        Orientation::Landscape => "landscape",
    };

    w.start("w:sectPr", &[])?;
    if index > 0 {
        let start = match section.start {
            SectionStart::NewPage => "nextPage",
            SectionStart::Continuous => "continuous",
        };
        w.empty("w:type", &[("w:val", start)])?;
    }
    w.empty(
        "w:pgSz",
        &[("w:w", width.as_str()), ("w:h", height.as_str()), ("w:orient", orient)],
    )?;
    w.empty(
        "w:pgMar",
        &[
            ("w:top", top.as_str()),
            ("w:right", right.as_str()),
            ("w:bottom", bottom.as_str()),
            ("w:left", left.as_str()),
            ("w:header", header_footer.as_str()),
            ("w:footer", header_footer.as_str()),
            ("w:gutter", "0"),
        ],
    )?;
    w.end("w:sectPr")
}

/// Generated `word/styles.xml` carrying the document defaults.
pub(crate) fn default_styles_xml(defaults: &DocumentDefaults) -> Result<Vec<u8>> {
    let font = defaults.font_name.as_deref().unwrap_or(FALLBACK_FONT);
    let size = pt_to_half_points(defaults.font_size.unwrap_or(FALLBACK_FONT_SIZE)).to_string();

    let mut w = XmlWriter::new()?;
    w.start("w:styles", &[("xmlns:w", NS_W)])?;

    w.start("w:docDefaults", &[])?;
    w.start("w:rPrDefault", &[])?;
    w.start("w:rPr", &[])?;
    w.empty(
        "w:rFonts",
        &[
            ("w:ascii", font),
            ("w:hAnsi", font),
            ("w:cs", font),
            ("w:eastAsia", font),
        ],
    )?;
    w.empty("w:sz", &[("w:val", size.as_str())])?;
    w.empty("w:szCs", &[("w:val", size.as_str())])?;
    w.end("w:rPr")?;
    w.end("w:rPrDefault")?;
    w.start("w:pPrDefault", &[])?;
    w.start("w:pPr", &[])?;
    w.empty(
        "w:spacing",
        &[("w:after", "0"), ("w:line", "240"), ("w:lineRule", "auto")],
    )?;
    w.end("w:pPr")?;
    w.end("w:pPrDefault")?;
    w.end("w:docDefaults")?;

    w.start(
        "w:style",
        &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
    )?;
    w.empty("w:name", &[("w:val", "Normal")])?;
    w.empty("w:qFormat", &[])?;
    w.end("w:style")?;

    w.start(
        "w:style",
        &[
            ("w:type", "character"),
            ("w:default", "1"),
            ("w:styleId", "DefaultParagraphFont"),
        ],
    )?;
    w.empty("w:name", &[("w:val", "Default Paragraph Font")])?;
    w.empty("w:uiPriority", &[("w:val", "1")])?;
    w.empty("w:semiHidden", &[])?;
    w.empty("w:unhideWhenUsed", &[])?;
    w.end("w:style")?;

    w.end("w:styles")?;
    Ok(w.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PageGeometry, Resource, TextStyle};

    fn document_xml(doc: &Document) -> String {
        let mut rels = BTreeMap::new();
        for (i, id) in doc.resources.keys().enumerate() {
            rels.insert(id.clone(), format!("rId{}", i + 10));
        }
        let bytes = DocumentXml::new(doc, &rels).write().unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_unit_conversions() {
        assert_eq!(mm_to_twips(20.0), 1134);
        assert_eq!(mm_to_twips(15.0), 850);
        assert_eq!(mm_to_twips(210.0), 11906);
        assert_eq!(mm_to_twips(297.0), 16838);
        assert_eq!(pt_to_twips(12.0), 240);
        assert_eq!(pt_to_half_points(10.0), 20);
        assert_eq!(pt_to_half_points(9.0), 18);
    }

    #[test]
    fn test_section_properties_placement() {
        let mut doc = Document::new();
        doc.first_section_mut()
            .add_paragraph(Paragraph::with_text("first"));
        doc.add_section(PageGeometry::a4_abstract(), SectionStart::NewPage)
            .add_paragraph(Paragraph::with_text("second"));

        let xml = document_xml(&doc);
        assert_eq!(xml.matches("<w:sectPr>").count(), 2);
        assert_eq!(xml.matches("<w:type w:val=\"nextPage\"/>").count(), 1);
        // The first section's properties sit inside its last paragraph.
        let first_sect = xml.find("<w:sectPr>").unwrap();
        let second_text = xml.find(">second<").unwrap();
        assert!(first_sect < second_text);
        assert!(xml.ends_with("</w:sectPr></w:body></w:document>"));
        assert!(xml.contains(
            "<w:pgMar w:top=\"1134\" w:right=\"1134\" w:bottom=\"850\" w:left=\"1134\""
        ));
    }

    #[test]
    fn test_empty_middle_section() {
        let mut doc = Document::new();
        doc.add_section(PageGeometry::a4_abstract(), SectionStart::NewPage)
            .add_paragraph(Paragraph::with_text("only"));

        let xml = document_xml(&doc);
        assert_eq!(xml.matches("<w:sectPr>").count(), 2);
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<w:body><w:p><w:pPr><w:sectPr>"));
    }

    #[test]
    fn test_run_properties() {
        let mut doc = Document::new();
        doc.defaults.font_name = Some("Times New Roman".into());
        doc.defaults.font_size = Some(10.0);

        let mut p = Paragraph::new()
            .aligned(Alignment::Justify)
            .line_spacing(11.0)
            .space_after(2.0)
            .first_line_indent(12.0);
        let mut style = TextStyle::bold();
        style.superscript = true;
        p.add_run(TextRun::styled("1, 2", style));
        p.add_text("a < b\nc");
        doc.first_section_mut().add_paragraph(p);

        let xml = document_xml(&doc);
        assert!(xml.contains(
            "<w:spacing w:after=\"40\" w:line=\"220\" w:lineRule=\"exact\"/>\
             <w:ind w:firstLine=\"240\"/><w:jc w:val=\"both\"/>"
        ));
        assert!(xml.contains(
            "<w:rFonts w:ascii=\"Times New Roman\" w:hAnsi=\"Times New Roman\" \
             w:cs=\"Times New Roman\"/><w:b/><w:sz w:val=\"20\"/><w:szCs w:val=\"20\"/>\
             <w:vertAlign w:val=\"superscript\"/>"
        ));
        assert!(xml.contains("<w:t xml:space=\"preserve\">a &lt; b</w:t><w:br/>"));
    }

    #[test]
    fn test_control_characters_dropped() {
        let mut doc = Document::new();
        doc.first_section_mut()
            .add_paragraph(Paragraph::with_text("A\u{B}B\u{0}C\u{1F}D\tE"));

        let xml = document_xml(&doc);
        assert!(!xml.chars().any(is_xml_forbidden));
        assert!(xml.contains("<w:t xml:space=\"preserve\">ABCD</w:t><w:tab/>"));
    }

    #[test]
    fn test_inline_image() {
        let mut doc = Document::new();
        let id = doc.add_resource(Resource::png(vec![0; 8]));
        let mut p = Paragraph::new().aligned(Alignment::Center);
        p.add_image(id, 14.0, 4.25);
        doc.first_section_mut().add_paragraph(p);

        let xml = document_xml(&doc);
        assert!(xml.contains("<wp:extent cx=\"5040000\" cy=\"1530000\"/>"));
        assert!(xml.contains("<a:blip r:embed=\"rId10\"/>"));
        assert!(xml.contains("name=\"image1.png\""));
    }

    #[test]
    fn test_unknown_image_resource() {
        let mut doc = Document::new();
        let mut p = Paragraph::new();
        p.add_image("image9", 1.0, 1.0);
        doc.first_section_mut().add_paragraph(p);

        let rels = BTreeMap::new();
        let err = DocumentXml::new(&doc, &rels).write().unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn test_default_styles() {
        let defaults = DocumentDefaults {
            font_name: Some("Times New Roman".into()),
            font_size: Some(10.0),
        };
        let xml = String::from_utf8(default_styles_xml(&defaults).unwrap()).unwrap();
        assert!(xml.contains("w:ascii=\"Times New Roman\""));
        assert!(xml.contains("<w:sz w:val=\"20\"/>"));
        assert!(xml.contains("w:styleId=\"Normal\""));
    }
}

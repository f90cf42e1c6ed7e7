//! End-to-end tests: DOCX bytes → HTML → normalized HTML → export.

use std::io::{Cursor, Write};

use redoc::{
    convert, normalize, ChangeSource, DocumentSession, ErrorKind, ExportFormat, FileKind,
    HeadingLevel, PageSize,
};
use zip::write::SimpleFileOptions;

const NAMESPACES: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main""#;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// Build a minimal DOCX package around a `w:body`.
fn create_docx(body: &str, extra: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buffer = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
        let options = SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(
            br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="png" ContentType="image/png"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#,
        )
        .unwrap();

        zip.start_file("word/document.xml", options).unwrap();
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {}><w:body>{}</w:body></w:document>"#,
            NAMESPACES, body
        );
        zip.write_all(xml.as_bytes()).unwrap();

        for (name, data) in extra {
            zip.start_file(*name, options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
    }
    buffer
}

fn para(style: Option<&str>, text: &str) -> String {
    let ppr = style
        .map(|s| format!(r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, s))
        .unwrap_or_default();
    format!("<w:p>{}<w:r><w:t>{}</w:t></w:r></w:p>", ppr, text)
}

fn toc_entry(anchor: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="TOC1"/></w:pPr><w:hyperlink w:anchor="{}"><w:r><w:t>{}</w:t></w:r></w:hyperlink></w:p>"#,
        anchor, text
    )
}

fn report_docx() -> Vec<u8> {
    let body = [
        para(Some("Title"), "Quarterly Report"),
        para(Some("TOCHeading"), "Table of Contents"),
        toc_entry("_Toc100", "Overview"),
        toc_entry("_Toc101", "Details\t2"),
        para(Some("Heading1"), "Overview"),
        para(None, "Revenue grew."),
        para(Some("Heading2"), "Details"),
        r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:t>Q1</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>Q2</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#.to_string(),
    ]
    .concat();
    create_docx(&body, &[])
}

#[test]
fn test_convert_structure() {
    let html = convert(&report_docx()).unwrap();

    assert!(html.starts_with("<p class=\"Title\">Quarterly Report</p>"));
    assert!(html.contains("<a href=\"#_Toc100\">Overview</a>"));
    assert!(html.contains("<h1>Overview</h1>"));
    assert!(html.contains("<h2>Details</h2>"));
    assert!(html.contains("<table><tr><td><p>Q1</p></td><td><p>Q2</p></td></tr></table>"));
}

#[test]
fn test_normalize_converted_report() {
    let doc = normalize(&convert(&report_docx()).unwrap());

    let outline: Vec<_> = doc
        .outline
        .iter()
        .map(|h| (h.id.as_str(), h.level, h.text.as_str()))
        .collect();
    assert_eq!(
        outline,
        [
            ("heading-overview-0", HeadingLevel::H1, "Overview"),
            ("heading-details-1", HeadingLevel::H2, "Details"),
        ]
    );

    // Broken bookmark links now point at the headings
    assert!(doc.html.contains("<a href=\"#heading-overview-0\">Overview</a>"));
    assert!(doc.html.contains("href=\"#heading-details-1\""));
    assert!(!doc.html.contains("_Toc10"));

    assert!(doc.html.contains("class=\"Title text-center\""));
    assert!(doc.html.contains("<table width=\"100%\" border=\"1\">"));
    assert_eq!(doc.page_size, PageSize::Letter);
}

#[test]
fn test_normalize_twice_is_stable() {
    let once = normalize(&convert(&report_docx()).unwrap());
    let twice = normalize(&once.html);
    assert_eq!(once, twice);
}

#[test]
fn test_heading_ids_unique() {
    let body = [
        para(Some("Heading1"), "Intro"),
        para(Some("Heading1"), "Intro"),
        para(Some("Heading2"), ""),
        para(Some("Heading3"), "Intro"),
    ]
    .concat();
    let doc = normalize(&convert(&create_docx(&body, &[])).unwrap());

    let mut ids: Vec<_> = doc.outline.iter().map(|h| h.id.clone()).collect();
    assert_eq!(ids.len(), 4);
    assert!(ids.iter().all(|id| !id.is_empty()));
    assert_eq!(doc.outline[2].text, "(Untitled)");
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 4);
}

#[test]
fn test_image_pipeline() {
    let body = r#"<w:p><w:r><w:drawing><wp:inline>
        <wp:extent cx="1828800" cy="914400"/>
        <wp:docPr id="1" name="Picture 1"/>
        <a:graphic><a:graphicData><a:blip r:embed="rId5"/></a:graphicData></a:graphic>
        </wp:inline></w:drawing></w:r></w:p>"#;
    let rels = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/image1.png"/>
</Relationships>"#;
    let docx = create_docx(
        body,
        &[
            ("word/_rels/document.xml.rels", rels.as_slice()),
            ("word/media/image1.png", PNG),
        ],
    );

    let html = convert(&docx).unwrap();
    assert!(html.contains("<img src=\"data:image/png;base64,"));
    assert!(html.contains("width=\"192\" height=\"96\""));

    let doc = normalize(&html);
    assert!(doc.html.contains("alt=\"Document image\""));
}

#[test]
fn test_invalid_input_is_conversion_error() {
    for bytes in [b"".as_slice(), b"plain text".as_slice(), b"PK\x03\x04broken".as_slice()] {
        let err = convert(bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
    }
}

#[test]
fn test_session_round_trip() {
    let mut session = DocumentSession::new();
    session
        .import("Report.docx", Some(redoc::DOCX_MIME), &report_docx())
        .unwrap();

    assert_eq!(session.original_kind(), FileKind::Docx);
    assert_eq!(session.outline().len(), 2);
    let highlight = session.outline().locate("heading-details-1").unwrap();
    assert_eq!(highlight.duration, redoc::HIGHLIGHT_DURATION);

    let edited = format!("{}<h2>Appendix</h2>", session.content());
    session.apply_edit(&edited, ChangeSource::Input);
    assert_eq!(session.outline().len(), 3);
    assert_eq!(session.outline().entries[2].id, "heading-appendix-2");

    let blob = session.export_default().unwrap();
    assert_eq!(blob.file_name, "Report.doc");
    assert_eq!(blob.mime_type, ExportFormat::Doc.mime_type());

    let text = blob.as_str();
    assert!(text.contains("<w:WordDocument>"));
    assert!(text.contains("<p class=\"Title text-center MsoNormal\">Quarterly Report</p>"));
    assert!(text.contains("<h2 id=\"heading-appendix-2\">Appendix</h2>"));
}

#[test]
fn test_word_export_marks_every_paragraph() {
    let mut session = DocumentSession::new();
    session.apply_edit("<p>One</p><p></p><div><p>Nested</p></div>", ChangeSource::Paste);
    let text = session.export(ExportFormat::Doc).unwrap().as_str().to_string();

    let body = &text[text.find("<body>").unwrap()..];
    assert_eq!(body.matches("<p ").count(), 3);
    assert_eq!(body.matches("class=\"MsoNormal\"").count(), 4);
    assert!(body.contains("<p class=\"MsoNormal\">&nbsp;</p>"));
}

#[test]
fn test_empty_html_export() {
    let mut session = DocumentSession::new();
    session.apply_edit("", ChangeSource::Input);
    let blob = session.export(ExportFormat::Html).unwrap();
    assert!(blob.as_str().contains("<body></body>"));
}

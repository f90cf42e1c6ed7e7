//! HTML renderer for the document model.

use log::{debug, warn};

use crate::dom::{escape_attr, escape_text};
use crate::error::Result;
use crate::model::{
    Block, CellAlignment, Document, Inline, InlineImage, ListInfo, ListType, Paragraph, Table,
    TextAlignment, TextRun,
};

use super::options::ConvertOptions;

/// Convert a Document to an HTML fragment.
///
/// The fragment is the content of a `<body>`: paragraphs, headings,
/// lists, tables and images in document order.
pub fn to_html(doc: &Document, options: &ConvertOptions) -> Result<String> {
    let mut writer = HtmlWriter::new(doc, options);

    if options.include_title {
        if let Some(title) = doc.metadata.title.as_deref().filter(|t| !t.trim().is_empty()) {
            writer.out.push_str("<h1>");
            writer.out.push_str(&escape_text(title));
            writer.out.push_str("</h1>");
        }
    }

    let mut lists = ListWriter::default();
    for block in &doc.content {
        match block {
            Block::Paragraph(para) => writer.paragraph(para, &mut lists),
            Block::Table(table) => {
                lists.close_all(&mut writer.out);
                writer.table(table);
            }
        }
    }
    lists.close_all(&mut writer.out);

    debug!(
        "rendered html: {} bytes, {} images embedded, {} skipped",
        writer.out.len(),
        writer.images_embedded,
        writer.images_skipped
    );
    Ok(writer.out)
}

/// Output buffer plus the lookups rendering needs.
struct HtmlWriter<'a> {
    doc: &'a Document,
    options: &'a ConvertOptions,
    out: String,
    images_embedded: usize,
    images_skipped: usize,
}

impl<'a> HtmlWriter<'a> {
    fn new(doc: &'a Document, options: &'a ConvertOptions) -> Self {
        Self {
            doc,
            options,
            out: String::new(),
            images_embedded: 0,
            images_skipped: 0,
        }
    }

    fn paragraph(&mut self, para: &Paragraph, lists: &mut ListWriter) {
        match &para.list_info {
            Some(info) => {
                lists.item(&mut self.out, info);
                self.inlines(&para.content);
            }
            None => {
                lists.close_all(&mut self.out);
                self.block_paragraph(para);
            }
        }
    }

    fn block_paragraph(&mut self, para: &Paragraph) {
        let tag = para.heading.tag();
        self.out.push('<');
        self.out.push_str(tag);
        if let Some(marker) = para.title_marker() {
            self.out.push_str(" class=\"");
            self.out.push_str(marker);
            self.out.push('"');
        }
        if para.alignment != TextAlignment::Left {
            self.out.push_str(" style=\"text-align: ");
            self.out.push_str(para.alignment.css());
            self.out.push_str(";\"");
        }
        self.out.push('>');
        self.inlines(&para.content);
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }

    /// Render inline content; consecutive inlines sharing a link target
    /// share one `<a>`.
    fn inlines(&mut self, content: &[Inline]) {
        let mut open_link: Option<&str> = None;

        for inline in content {
            let link = match inline {
                Inline::Text(run) => run.hyperlink.as_deref(),
                Inline::Break => open_link,
                Inline::Image(_) => None,
            };
            if link != open_link {
                if open_link.is_some() {
                    self.out.push_str("</a>");
                }
                if let Some(href) = link {
                    self.out.push_str("<a href=\"");
                    self.out.push_str(&escape_attr(href));
                    self.out.push_str("\">");
                }
                open_link = link;
            }

            match inline {
                Inline::Text(run) => self.run(run),
                Inline::Break => self.out.push_str("<br>"),
                Inline::Image(image) => self.image(image),
            }
        }

        if open_link.is_some() {
            self.out.push_str("</a>");
        }
    }

    fn run(&mut self, run: &TextRun) {
        let style = &run.style;
        let tags: Vec<&str> = [
            (style.bold, "strong"),
            (style.italic, "em"),
            (style.underline, "u"),
            (style.strikethrough, "s"),
            (style.superscript, "sup"),
            (style.subscript, "sub"),
        ]
        .into_iter()
        .filter_map(|(on, tag)| on.then_some(tag))
        .collect();

        for tag in &tags {
            self.out.push('<');
            self.out.push_str(tag);
            self.out.push('>');
        }
        self.out.push_str(&escape_text(&run.text));
        for tag in tags.iter().rev() {
            self.out.push_str("</");
            self.out.push_str(tag);
            self.out.push('>');
        }
    }

    fn image(&mut self, image: &InlineImage) {
        if !self.options.embed_images {
            self.images_skipped += 1;
            return;
        }
        let Some(resource) = self.doc.get_resource(&image.resource_id) else {
            warn!("image {} has no media part", image.resource_id);
            self.images_skipped += 1;
            return;
        };
        if !resource.is_web_image() {
            warn!(
                "image {} is {} and cannot be shown in a browser",
                image.resource_id, resource.mime_type
            );
            self.images_skipped += 1;
            return;
        }

        self.out.push_str("<img src=\"");
        self.out.push_str(&resource.data_uri());
        self.out.push('"');
        if let Some(alt) = &image.alt_text {
            self.out.push_str(" alt=\"");
            self.out.push_str(&escape_attr(alt));
            self.out.push('"');
        }
        if let Some(width) = image.width_px() {
            self.out.push_str(&format!(" width=\"{}\"", width));
        }
        if let Some(height) = image.height_px() {
            self.out.push_str(&format!(" height=\"{}\"", height));
        }
        self.out.push('>');
        self.images_embedded += 1;
    }

    fn table(&mut self, table: &Table) {
        self.out.push_str("<table>");
        for row in &table.rows {
            self.out.push_str("<tr>");
            for cell in row.cells.iter().filter(|c| !c.is_covered()) {
                let tag = if cell.is_header { "th" } else { "td" };
                self.out.push('<');
                self.out.push_str(tag);
                if cell.col_span > 1 {
                    self.out.push_str(&format!(" colspan=\"{}\"", cell.col_span));
                }
                if cell.row_span > 1 {
                    self.out.push_str(&format!(" rowspan=\"{}\"", cell.row_span));
                }
                if cell.alignment != CellAlignment::Left {
                    self.out.push_str(" align=\"");
                    self.out.push_str(cell.alignment.as_str());
                    self.out.push('"');
                }
                self.out.push('>');

                let mut lists = ListWriter::default();
                for para in &cell.content {
                    self.paragraph(para, &mut lists);
                }
                lists.close_all(&mut self.out);
                for nested in &cell.nested_tables {
                    self.table(nested);
                }

                self.out.push_str("</");
                self.out.push_str(tag);
                self.out.push('>');
            }
            self.out.push_str("</tr>");
        }
        self.out.push_str("</table>");
    }
}

/// Tracks open `<ul>`/`<ol>` elements while consecutive list paragraphs
/// are written. Every open list has an open `<li>`.
#[derive(Default)]
struct ListWriter {
    stack: Vec<ListType>,
}

impl ListWriter {
    /// Start a list item at the paragraph's nesting level.
    fn item(&mut self, out: &mut String, info: &ListInfo) {
        let depth = info.level as usize + 1;

        while self.stack.len() > depth {
            self.close_level(out);
        }
        if self.stack.len() == depth {
            if self.stack.last() == Some(&info.list_type) {
                out.push_str("</li><li>");
                return;
            }
            self.close_level(out);
        }
        while self.stack.len() < depth {
            out.push_str(list_tag(info.list_type).0);
            out.push_str("<li>");
            self.stack.push(info.list_type);
        }
    }

    fn close_level(&mut self, out: &mut String) {
        if let Some(list_type) = self.stack.pop() {
            out.push_str("</li>");
            out.push_str(list_tag(list_type).1);
        }
    }

    fn close_all(&mut self, out: &mut String) {
        while !self.stack.is_empty() {
            self.close_level(out);
        }
    }
}

fn list_tag(list_type: ListType) -> (&'static str, &'static str) {
    match list_type {
        ListType::Bullet => ("<ul>", "</ul>"),
        ListType::Numbered => ("<ol>", "</ol>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Cell, HeadingLevel, Metadata, Resource, Row, TextStyle, VerticalMerge,
    };

    fn render(blocks: Vec<Block>) -> String {
        let doc = Document {
            content: blocks,
            ..Default::default()
        };
        to_html(&doc, &ConvertOptions::default()).unwrap()
    }

    fn list_item(text: &str, list_type: ListType, level: u8) -> Block {
        Block::Paragraph(Paragraph {
            list_info: Some(ListInfo {
                list_type,
                level,
                num_id: "1".into(),
            }),
            ..Paragraph::with_text(text)
        })
    }

    #[test]
    fn test_basic_paragraph() {
        let html = render(vec![Block::Paragraph(Paragraph::with_text("a < b & c"))]);
        assert_eq!(html, "<p>a &lt; b &amp; c</p>");
    }

    #[test]
    fn test_heading_and_alignment() {
        let mut title = Paragraph::heading(HeadingLevel::H1, "Report");
        title.style_name = Some("Title".into());
        title.alignment = TextAlignment::Center;

        let html = render(vec![
            Block::Paragraph(title),
            Block::Paragraph(Paragraph::heading(HeadingLevel::H2, "Scope")),
        ]);
        assert_eq!(
            html,
            "<h1 class=\"Title\" style=\"text-align: center;\">Report</h1><h2>Scope</h2>"
        );
    }

    #[test]
    fn test_formatted_runs() {
        let mut para = Paragraph::new();
        para.add_run(TextRun::styled("bold", TextStyle::bold()));
        para.add_run(TextRun::plain(" and "));
        para.add_run(TextRun::styled(
            "both",
            TextStyle {
                bold: true,
                italic: true,
                ..Default::default()
            },
        ));
        para.content.push(Inline::Break);
        para.add_run(TextRun::plain("end"));

        let html = render(vec![Block::Paragraph(para)]);
        assert_eq!(
            html,
            "<p><strong>bold</strong> and <strong><em>both</em></strong><br>end</p>"
        );
    }

    #[test]
    fn test_links_grouped() {
        let mut para = Paragraph::new();
        para.add_run(TextRun::link("Introduction", "#_Toc1"));
        para.add_run(TextRun {
            text: "\t3".into(),
            style: TextStyle::italic(),
            hyperlink: Some("#_Toc1".into()),
        });
        para.add_run(TextRun::link("site", "https://example.com/?a=1&b=2"));

        let html = render(vec![Block::Paragraph(para)]);
        assert_eq!(
            html,
            "<p><a href=\"#_Toc1\">Introduction<em>\t3</em></a><a href=\"https://example.com/?a=1&amp;b=2\">site</a></p>"
        );
    }

    #[test]
    fn test_nested_lists() {
        let html = render(vec![
            list_item("one", ListType::Bullet, 0),
            list_item("one.a", ListType::Numbered, 1),
            list_item("one.b", ListType::Numbered, 1),
            list_item("two", ListType::Bullet, 0),
            Block::Paragraph(Paragraph::with_text("after")),
        ]);
        assert_eq!(
            html,
            "<ul><li>one<ol><li>one.a</li><li>one.b</li></ol></li><li>two</li></ul><p>after</p>"
        );
    }

    #[test]
    fn test_list_type_switch() {
        let html = render(vec![
            list_item("a", ListType::Bullet, 0),
            list_item("1", ListType::Numbered, 0),
        ]);
        assert_eq!(html, "<ul><li>a</li></ul><ol><li>1</li></ol>");
    }

    #[test]
    fn test_table_spans() {
        let mut table = Table::new();
        table.add_row(Row {
            cells: vec![Cell {
                col_span: 2,
                is_header: true,
                ..Cell::with_text("Head")
            }],
            is_header: true,
        });
        table.add_row(Row::new(vec![
            Cell {
                v_merge: VerticalMerge::Restart,
                alignment: CellAlignment::Right,
                ..Cell::with_text("Tall")
            },
            Cell::with_text("B2"),
        ]));
        table.add_row(Row::new(vec![
            Cell {
                v_merge: VerticalMerge::Continue,
                ..Cell::new()
            },
            Cell::with_text("B3"),
        ]));
        table.resolve_vertical_merges();

        let html = render(vec![Block::Table(table)]);
        assert_eq!(
            html,
            "<table><tr><th colspan=\"2\"><p>Head</p></th></tr>\
             <tr><td rowspan=\"2\" align=\"right\"><p>Tall</p></td><td><p>B2</p></td></tr>\
             <tr><td><p>B3</p></td></tr></table>"
        );
    }

    #[test]
    fn test_images() {
        let mut doc = Document::new();
        doc.resources.insert(
            "rId1".into(),
            Resource::image(vec![1, 2, 3], Some("word/media/image1.png".into())),
        );
        doc.resources.insert(
            "rId2".into(),
            Resource::image(vec![0], Some("word/media/image2.emf".into())),
        );
        let mut para = Paragraph::new();
        para.content.push(Inline::Image(InlineImage {
            resource_id: "rId1".into(),
            alt_text: Some("Logo \"A\"".into()),
            width: Some(1828800),
            height: None,
        }));
        para.content.push(Inline::Image(InlineImage {
            resource_id: "rId2".into(),
            alt_text: None,
            width: None,
            height: None,
        }));
        doc.add_block(Block::Paragraph(para));

        let html = to_html(&doc, &ConvertOptions::default()).unwrap();
        assert_eq!(
            html,
            "<p><img src=\"data:image/png;base64,AQID\" alt=\"Logo &quot;A&quot;\" width=\"192\"></p>"
        );

        let html = to_html(&doc, &ConvertOptions::new().with_embed_images(false)).unwrap();
        assert_eq!(html, "<p></p>");
    }

    #[test]
    fn test_include_title() {
        let doc = Document {
            metadata: Metadata {
                title: Some("Quarterly".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let html = to_html(&doc, &ConvertOptions::new().with_title(true)).unwrap();
        assert_eq!(html, "<h1>Quarterly</h1>");
    }
}

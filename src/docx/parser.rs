//! DOCX parser implementation.

use crate::container::{OoxmlContainer, Relationships};
use crate::error::{Error, Result};
use crate::model::{
    Block, Cell, CellAlignment, Document, HeadingLevel, Inline, InlineImage, ListInfo, Paragraph,
    Resource, Row, Table, TextAlignment, TextRun, TextStyle, VerticalMerge,
};
use log::{debug, warn};
use quick_xml::events::{BytesStart, Event};

use super::numbering::NumberingMap;
use super::styles::{attr_value, toggle, StyleMap};

/// Main document part of a word-processing package.
const DOCUMENT_PART: &str = "word/document.xml";

/// Parser for DOCX (Word) documents.
pub struct DocxParser {
    container: OoxmlContainer,
    styles: StyleMap,
    numbering: NumberingMap,
    relationships: Relationships,
}

impl DocxParser {
    /// Open a DOCX file for parsing.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let container = OoxmlContainer::open(path)?;
        Self::from_container(container)
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let container = OoxmlContainer::from_bytes(data)?;
        Self::from_container(container)
    }

    fn from_container(container: OoxmlContainer) -> Result<Self> {
        if !container.exists(DOCUMENT_PART) {
            return Err(Error::MissingComponent(DOCUMENT_PART.to_string()));
        }

        // Styles and numbering are optional; a broken one only loses formatting.
        let styles = match container.read_xml("word/styles.xml") {
            Ok(xml) => StyleMap::parse(&xml).unwrap_or_else(|e| {
                warn!("ignoring unreadable styles.xml: {}", e);
                StyleMap::default()
            }),
            Err(_) => StyleMap::default(),
        };

        let numbering = match container.read_xml("word/numbering.xml") {
            Ok(xml) => NumberingMap::parse(&xml).unwrap_or_else(|e| {
                warn!("ignoring unreadable numbering.xml: {}", e);
                NumberingMap::default()
            }),
            Err(_) => NumberingMap::default(),
        };

        let relationships = container.read_relationships(DOCUMENT_PART)?;

        Ok(Self {
            container,
            styles,
            numbering,
            relationships,
        })
    }

    /// Parse the document and return a Document model.
    pub fn parse(&self) -> Result<Document> {
        let mut doc = Document::new();
        doc.metadata = self.container.parse_core_metadata();
        doc.content = self.parse_body()?;
        self.extract_resources(&mut doc);

        debug!(
            "parsed docx: {} blocks, {} headings, {} resources",
            doc.content.len(),
            doc.heading_count(),
            doc.resources.len()
        );
        Ok(doc)
    }

    /// Stream `word/document.xml` through the body builder.
    fn parse_body(&self) -> Result<Vec<Block>> {
        let xml = self.container.read_xml(DOCUMENT_PART)?;

        let mut reader = quick_xml::Reader::from_str(&xml);
        // Whitespace inside w:t is content (xml:space="preserve").
        reader.config_mut().trim_text(false);

        let mut builder = BodyBuilder::new(self);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => builder.start(&e),
                Event::Empty(e) => {
                    builder.start(&e);
                    builder.end(e.name().as_ref());
                }
                Event::Text(e) => builder.text(&e.unescape().unwrap_or_default()),
                Event::End(e) => builder.end(e.name().as_ref()),
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(builder.finish())
    }

    /// Resolve `w:hyperlink` to an external URL or `#anchor`.
    fn hyperlink_target(&self, e: &BytesStart) -> Option<String> {
        let url = attr_value(e, b"r:id")
            .and_then(|id| self.relationships.get(&id))
            .map(|rel| rel.target.clone());
        let anchor = attr_value(e, b"w:anchor").filter(|a| !a.is_empty());

        match (url, anchor) {
            (Some(url), Some(anchor)) => Some(format!("{}#{}", url, anchor)),
            (Some(url), None) => Some(url),
            (None, Some(anchor)) => Some(format!("#{}", anchor)),
            (None, None) => None,
        }
    }

    /// Load the image parts referenced from the main document.
    fn extract_resources(&self, doc: &mut Document) {
        for rel in self.relationships.images() {
            let path = OoxmlContainer::resolve_path(DOCUMENT_PART, &rel.target);
            match self.container.read_binary(&path) {
                Ok(data) => {
                    doc.resources
                        .insert(rel.id.clone(), Resource::image(data, Some(path)));
                }
                Err(e) => warn!("skipping image {}: {}", rel.id, e),
            }
        }
    }

    /// Get a reference to the container.
    pub fn container(&self) -> &OoxmlContainer {
        &self.container
    }
}

/// Run being assembled.
struct RunState {
    style: TextStyle,
    in_rpr: bool,
    in_text: bool,
}

/// Drawing being assembled.
#[derive(Default)]
struct ImageState {
    resource_id: Option<String>,
    alt_text: Option<String>,
    width: Option<u64>,
    height: Option<u64>,
}

/// Paragraph being assembled.
#[derive(Default)]
struct ParagraphState {
    para: Paragraph,
    /// Paragraphs nested inside this one (text boxes)
    depth: usize,
    in_ppr: bool,
    in_num_pr: bool,
    num_id: Option<String>,
    ilvl: u8,
    base_style: TextStyle,
    run: Option<RunState>,
    hyperlink: Option<String>,
    image: Option<ImageState>,
}

/// Table being assembled.
#[derive(Default)]
struct TableState {
    table: Table,
    row: Option<Row>,
    cell: Option<Cell>,
    in_tr_pr: bool,
    in_tc_pr: bool,
}

/// Event-driven builder for the document body.
struct BodyBuilder<'a> {
    parser: &'a DocxParser,
    blocks: Vec<Block>,
    tables: Vec<TableState>,
    para: Option<ParagraphState>,
    /// Depth inside `mc:Fallback`, whose content duplicates `mc:Choice`
    fallback_depth: usize,
    in_body: bool,
}

impl<'a> BodyBuilder<'a> {
    fn new(parser: &'a DocxParser) -> Self {
        Self {
            parser,
            blocks: Vec::new(),
            tables: Vec::new(),
            para: None,
            fallback_depth: 0,
            in_body: false,
        }
    }

    fn finish(self) -> Vec<Block> {
        self.blocks
    }

    fn start(&mut self, e: &BytesStart) {
        let qname = e.name();
        let name = qname.as_ref();

        if self.fallback_depth > 0 || name == b"mc:Fallback" {
            if name == b"mc:Fallback" {
                self.fallback_depth += 1;
            }
            return;
        }

        match name {
            b"w:body" => self.in_body = true,
            b"w:p" if self.in_body => match self.para.as_mut() {
                Some(state) => state.depth += 1,
                None => self.para = Some(ParagraphState::default()),
            },
            b"w:tbl" if self.in_body && self.para.is_none() => {
                self.tables.push(TableState::default());
            }
            _ => {
                if let Some(state) = self.para.as_mut() {
                    paragraph_start(self.parser, state, name, e);
                } else if let Some(table) = self.tables.last_mut() {
                    table_start(table, name, e);
                }
            }
        }
    }

    fn end(&mut self, name: &[u8]) {
        if self.fallback_depth > 0 {
            if name == b"mc:Fallback" {
                self.fallback_depth -= 1;
            }
            return;
        }

        if let Some(state) = self.para.as_mut() {
            if name == b"w:p" {
                if state.depth > 0 {
                    state.depth -= 1;
                } else if let Some(state) = self.para.take() {
                    let para = self.finish_paragraph(state);
                    self.place_paragraph(para);
                }
            } else {
                paragraph_end(state, name);
            }
            return;
        }

        match name {
            b"w:tbl" if !self.tables.is_empty() => self.finish_table(),
            b"w:body" => self.in_body = false,
            _ => {
                if let Some(table) = self.tables.last_mut() {
                    table_end(table, name);
                }
            }
        }
    }

    fn text(&mut self, text: &str) {
        let Some(state) = self.para.as_mut() else {
            return;
        };
        let Some(run) = state.run.as_ref() else {
            return;
        };
        if run.in_text && !text.is_empty() {
            state.para.add_run(TextRun {
                text: text.to_string(),
                style: run.style.clone(),
                hyperlink: state.hyperlink.clone(),
            });
        }
    }

    fn finish_paragraph(&self, state: ParagraphState) -> Paragraph {
        let mut para = state.para;

        // Numbered headings stay headings.
        if !para.is_heading() {
            if let Some(num_id) = state.num_id {
                para.list_info = self
                    .parser
                    .numbering
                    .list_type(&num_id, state.ilvl)
                    .map(|list_type| ListInfo {
                        list_type,
                        level: state.ilvl,
                        num_id,
                    });
            }
        }

        para.merge_adjacent_runs();
        para
    }

    fn place_paragraph(&mut self, para: Paragraph) {
        if let Some(cell) = self.tables.last_mut().and_then(|t| t.cell.as_mut()) {
            if !para.is_empty() {
                cell.content.push(para);
            }
            return;
        }
        if !para.is_empty() || para.is_heading() {
            self.blocks.push(Block::Paragraph(para));
        }
    }

    fn finish_table(&mut self) {
        let Some(state) = self.tables.pop() else {
            return;
        };
        let mut table = state.table;
        table.resolve_vertical_merges();

        match self.tables.last_mut().and_then(|t| t.cell.as_mut()) {
            Some(cell) => cell.nested_tables.push(table),
            None => {
                if self.tables.is_empty() {
                    self.blocks.push(Block::Table(table));
                }
            }
        }
    }
}

fn paragraph_start(parser: &DocxParser, state: &mut ParagraphState, name: &[u8], e: &BytesStart) {
    // Properties of text-box paragraphs must not leak into the outer one.
    let top = state.depth == 0;

    match name {
        b"w:pPr" if top => state.in_ppr = true,
        b"w:pStyle" if state.in_ppr => {
            if let Some(style_id) = attr_value(e, b"w:val") {
                let styles = &parser.styles;
                state.para.heading = styles.heading_level(&style_id);
                state.base_style = styles.run_style(&style_id);
                state.para.style_name = Some(
                    styles
                        .title_class(&style_id)
                        .or_else(|| styles.name(&style_id))
                        .unwrap_or(&style_id)
                        .to_string(),
                );
                state.para.style_id = Some(style_id);
            }
        }
        b"w:jc" if state.in_ppr => {
            state.para.alignment = match attr_value(e, b"w:val").as_deref() {
                Some("center") => TextAlignment::Center,
                Some("right") | Some("end") => TextAlignment::Right,
                Some("both") | Some("distribute") => TextAlignment::Justify,
                _ => TextAlignment::Left,
            };
        }
        b"w:outlineLvl" if state.in_ppr => {
            if let Some(level) = attr_value(e, b"w:val").and_then(|v| v.parse::<u8>().ok()) {
                state.para.heading = HeadingLevel::from_number(level.saturating_add(1));
            }
        }
        b"w:numPr" if state.in_ppr => state.in_num_pr = true,
        b"w:numId" if state.in_num_pr => state.num_id = attr_value(e, b"w:val"),
        b"w:ilvl" if state.in_num_pr => {
            state.ilvl = attr_value(e, b"w:val")
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
        }
        b"w:hyperlink" => state.hyperlink = parser.hyperlink_target(e),
        b"w:r" => {
            state.run = Some(RunState {
                style: state.base_style.clone(),
                in_rpr: false,
                in_text: false,
            })
        }
        b"w:drawing" | b"w:pict" => state.image = Some(ImageState::default()),
        _ => {
            if let Some(image) = state.image.as_mut() {
                image_start(image, name, e);
            } else if let Some(run) = state.run.as_mut() {
                run_start(parser, run, &mut state.para, name, e);
            }
        }
    }
}

fn run_start(
    parser: &DocxParser,
    run: &mut RunState,
    para: &mut Paragraph,
    name: &[u8],
    e: &BytesStart,
) {
    if run.in_rpr {
        let style = &mut run.style;
        match name {
            b"w:rStyle" => {
                if let Some(id) = attr_value(e, b"w:val") {
                    let char_style = parser.styles.run_style(&id);
                    style.bold |= char_style.bold;
                    style.italic |= char_style.italic;
                    style.underline |= char_style.underline;
                    style.strikethrough |= char_style.strikethrough;
                }
            }
            b"w:b" => style.bold = toggle(e),
            b"w:i" => style.italic = toggle(e),
            b"w:strike" | b"w:dstrike" => style.strikethrough = toggle(e),
            b"w:u" => style.underline = attr_value(e, b"w:val").is_none_or(|v| v != "none"),
            b"w:vertAlign" => {
                let val = attr_value(e, b"w:val");
                style.superscript = val.as_deref() == Some("superscript");
                style.subscript = val.as_deref() == Some("subscript");
            }
            _ => {}
        }
        return;
    }

    match name {
        b"w:rPr" => run.in_rpr = true,
        b"w:t" => run.in_text = true,
        b"w:tab" => para.add_run(TextRun::styled("\t", run.style.clone())),
        b"w:br" | b"w:cr" => {
            // Page and column breaks have no place in a flowing editor.
            if attr_value(e, b"w:type").is_none_or(|t| t == "textWrapping") {
                para.content.push(Inline::Break);
            }
        }
        _ => {}
    }
}

fn image_start(image: &mut ImageState, name: &[u8], e: &BytesStart) {
    match name {
        b"wp:extent" => {
            image.width = attr_value(e, b"cx").and_then(|v| v.parse().ok());
            image.height = attr_value(e, b"cy").and_then(|v| v.parse().ok());
        }
        b"wp:docPr" => {
            image.alt_text = attr_value(e, b"descr").filter(|d| !d.trim().is_empty());
        }
        b"a:blip" => image.resource_id = attr_value(e, b"r:embed"),
        b"v:imagedata" => {
            image.resource_id = attr_value(e, b"r:id");
            if image.alt_text.is_none() {
                image.alt_text = attr_value(e, b"o:title").filter(|t| !t.trim().is_empty());
            }
        }
        _ => {}
    }
}

fn paragraph_end(state: &mut ParagraphState, name: &[u8]) {
    match name {
        b"w:pPr" => state.in_ppr = false,
        b"w:numPr" => state.in_num_pr = false,
        b"w:hyperlink" => state.hyperlink = None,
        b"w:r" => state.run = None,
        b"w:rPr" => {
            if let Some(run) = state.run.as_mut() {
                run.in_rpr = false;
            }
        }
        b"w:t" => {
            if let Some(run) = state.run.as_mut() {
                run.in_text = false;
            }
        }
        b"w:drawing" | b"w:pict" => {
            if let Some(image) = state.image.take() {
                if let Some(resource_id) = image.resource_id {
                    state.para.content.push(Inline::Image(InlineImage {
                        resource_id,
                        alt_text: image.alt_text,
                        width: image.width,
                        height: image.height,
                    }));
                }
            }
        }
        _ => {}
    }
}

fn table_start(table: &mut TableState, name: &[u8], e: &BytesStart) {
    match name {
        b"w:tr" => table.row = Some(Row::default()),
        b"w:trPr" => table.in_tr_pr = true,
        b"w:tblHeader" if table.in_tr_pr => {
            if let Some(row) = table.row.as_mut() {
                row.is_header = toggle(e);
            }
        }
        b"w:tc" => table.cell = Some(Cell::new()),
        b"w:tcPr" => table.in_tc_pr = true,
        b"w:gridSpan" if table.in_tc_pr => {
            if let Some(cell) = table.cell.as_mut() {
                cell.col_span = attr_value(e, b"w:val")
                    .and_then(|v| v.parse().ok())
                    .filter(|&n: &u32| n > 0)
                    .unwrap_or(1);
            }
        }
        b"w:vMerge" if table.in_tc_pr => {
            if let Some(cell) = table.cell.as_mut() {
                cell.v_merge = match attr_value(e, b"w:val").as_deref() {
                    Some("restart") => VerticalMerge::Restart,
                    _ => VerticalMerge::Continue,
                };
            }
        }
        _ => {}
    }
}

fn table_end(table: &mut TableState, name: &[u8]) {
    match name {
        b"w:trPr" => table.in_tr_pr = false,
        b"w:tcPr" => table.in_tc_pr = false,
        b"w:tc" => {
            if let (Some(mut cell), Some(row)) = (table.cell.take(), table.row.as_mut()) {
                cell.is_header = row.is_header;
                cell.alignment = cell_alignment(&cell.content);
                row.cells.push(cell);
            }
        }
        b"w:tr" => {
            if let Some(row) = table.row.take() {
                table.table.add_row(row);
            }
        }
        _ => {}
    }
}

/// A cell is aligned when all its paragraphs share one alignment.
fn cell_alignment(content: &[Paragraph]) -> CellAlignment {
    let Some(first) = content.first().map(|p| p.alignment) else {
        return CellAlignment::Left;
    };
    if content.iter().any(|p| p.alignment != first) {
        return CellAlignment::Left;
    }
    match first {
        TextAlignment::Center => CellAlignment::Center,
        TextAlignment::Right => CellAlignment::Right,
        _ => CellAlignment::Left,
    }
}

//! Paragraph and character styles from `word/styles.xml`.

use crate::error::Result;
use crate::model::{HeadingLevel, TextStyle};
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;

/// Maximum `basedOn` chain length followed when resolving a style.
const MAX_INHERITANCE_DEPTH: usize = 10;

/// A parsed style definition.
#[derive(Debug, Clone, Default)]
pub struct Style {
    /// Style ID (e.g., "Heading1")
    pub id: String,
    /// Style name (e.g., "heading 1")
    pub name: String,
    /// Parent style ID
    pub based_on: Option<String>,
    /// Outline level from `w:outlineLvl` (0 = heading 1)
    pub outline_level: Option<u8>,
    /// Character formatting carried by the style
    pub run_props: RunProps,
}

/// Character formatting where `None` means "inherit".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunProps {
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strike: Option<bool>,
}

impl RunProps {
    /// Fill unset fields from `base`.
    fn inherit(&mut self, base: &RunProps) {
        self.bold = self.bold.or(base.bold);
        self.italic = self.italic.or(base.italic);
        self.underline = self.underline.or(base.underline);
        self.strike = self.strike.or(base.strike);
    }

    /// Starting run formatting for text in this style.
    pub fn to_text_style(&self) -> TextStyle {
        TextStyle {
            bold: self.bold.unwrap_or(false),
            italic: self.italic.unwrap_or(false),
            underline: self.underline.unwrap_or(false),
            strikethrough: self.strike.unwrap_or(false),
            ..Default::default()
        }
    }
}

/// Collection of styles from styles.xml.
#[derive(Debug, Clone, Default)]
pub struct StyleMap {
    styles: HashMap<String, Style>,
}

impl StyleMap {
    /// Parse styles from XML content.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut map = StyleMap::default();
        if xml.trim().is_empty() {
            return Ok(map);
        }

        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut current: Option<Style> = None;
        let mut in_ppr = false;
        let mut in_rpr = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().as_ref() {
                    b"w:style" => current = Some(start_style(&e)),
                    b"w:pPr" => in_ppr = current.is_some(),
                    b"w:rPr" => in_rpr = current.is_some(),
                    _ => {}
                },
                Event::Empty(e) => {
                    let Some(style) = current.as_mut() else {
                        continue;
                    };
                    match e.name().as_ref() {
                        b"w:name" => {
                            style.name = attr_value(&e, b"w:val").unwrap_or_default();
                        }
                        b"w:basedOn" => style.based_on = attr_value(&e, b"w:val"),
                        b"w:outlineLvl" if in_ppr => {
                            style.outline_level =
                                attr_value(&e, b"w:val").and_then(|v| v.parse().ok());
                        }
                        b"w:b" if in_rpr => style.run_props.bold = Some(toggle(&e)),
                        b"w:i" if in_rpr => style.run_props.italic = Some(toggle(&e)),
                        b"w:strike" if in_rpr => style.run_props.strike = Some(toggle(&e)),
                        b"w:u" if in_rpr => {
                            style.run_props.underline =
                                Some(attr_value(&e, b"w:val").is_none_or(|v| v != "none"));
                        }
                        _ => {}
                    }
                }
                Event::End(e) => match e.name().as_ref() {
                    b"w:style" => {
                        if let Some(style) = current.take() {
                            map.styles.insert(style.id.clone(), style);
                        }
                        in_ppr = false;
                        in_rpr = false;
                    }
                    b"w:pPr" => in_ppr = false,
                    b"w:rPr" => in_rpr = false,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(map)
    }

    /// Display name of a style.
    pub fn name(&self, id: &str) -> Option<&str> {
        self.styles
            .get(id)
            .map(|s| s.name.as_str())
            .filter(|n| !n.is_empty())
    }

    /// Get a style by ID with inherited outline level and run formatting.
    pub fn get_resolved(&self, id: &str) -> Option<Style> {
        let mut style = self.styles.get(id)?.clone();

        let mut base_id = style.based_on.clone();
        for _ in 0..MAX_INHERITANCE_DEPTH {
            let Some(base) = base_id.as_deref().and_then(|b| self.styles.get(b)) else {
                break;
            };
            style.run_props.inherit(&base.run_props);
            if style.outline_level.is_none() {
                style.outline_level = base.outline_level;
            }
            base_id = base.based_on.clone();
        }

        Some(style)
    }

    /// Heading level for a paragraph style.
    ///
    /// Outline levels 0-5 map to h1-h6; Title and Subtitle styles map to
    /// h1 and h2.
    pub fn heading_level(&self, style_id: &str) -> HeadingLevel {
        let Some(style) = self.get_resolved(style_id) else {
            return heading_from_style_id(style_id);
        };
        if let Some(level) = style.outline_level {
            return HeadingLevel::from_number(level.saturating_add(1));
        }
        match self.title_class(style_id) {
            Some("Title") => HeadingLevel::H1,
            Some("Subtitle") => HeadingLevel::H2,
            _ => heading_from_style_id(style_id),
        }
    }

    /// `Title`/`Subtitle` marker class for a paragraph style.
    pub fn title_class(&self, style_id: &str) -> Option<&'static str> {
        let name = self.name(style_id).unwrap_or(style_id);
        if name.eq_ignore_ascii_case("title") {
            Some("Title")
        } else if name.eq_ignore_ascii_case("subtitle") {
            Some("Subtitle")
        } else {
            None
        }
    }

    /// Starting run formatting for a paragraph or character style.
    pub fn run_style(&self, style_id: &str) -> TextStyle {
        self.get_resolved(style_id)
            .map(|s| s.run_props.to_text_style())
            .unwrap_or_default()
    }
}

/// Built-in heading style IDs used when styles.xml lacks a definition.
fn heading_from_style_id(style_id: &str) -> HeadingLevel {
    style_id
        .strip_prefix("Heading")
        .and_then(|n| n.parse::<u8>().ok())
        .map(HeadingLevel::from_number)
        .unwrap_or_default()
}

fn start_style(e: &BytesStart) -> Style {
    Style {
        id: attr_value(e, b"w:styleId").unwrap_or_default(),
        ..Default::default()
    }
}

/// Read an attribute as a string.
pub(crate) fn attr_value(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Value of an OOXML on/off property (`<w:b/>`, `<w:b w:val="0"/>`).
pub(crate) fn toggle(e: &BytesStart) -> bool {
    attr_value(e, b"w:val").is_none_or(|v| v != "0" && v != "false" && v != "off")
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
    <w:style w:type="paragraph" w:styleId="Normal">
        <w:name w:val="Normal"/>
    </w:style>
    <w:style w:type="paragraph" w:styleId="Heading1">
        <w:name w:val="heading 1"/>
        <w:basedOn w:val="Normal"/>
        <w:pPr>
            <w:outlineLvl w:val="0"/>
        </w:pPr>
        <w:rPr>
            <w:b/>
        </w:rPr>
    </w:style>
    <w:style w:type="paragraph" w:styleId="Heading2Custom">
        <w:name w:val="My Heading"/>
        <w:basedOn w:val="Heading1"/>
        <w:pPr>
            <w:outlineLvl w:val="1"/>
        </w:pPr>
        <w:rPr>
            <w:i/>
            <w:b w:val="0"/>
        </w:rPr>
    </w:style>
    <w:style w:type="paragraph" w:styleId="Title">
        <w:name w:val="Title"/>
    </w:style>
    <w:style w:type="paragraph" w:styleId="a5">
        <w:name w:val="Subtitle"/>
    </w:style>
</w:styles>"#;

    #[test]
    fn test_parse_styles() {
        let map = StyleMap::parse(STYLES).unwrap();
        assert_eq!(map.styles.len(), 5);
        assert_eq!(map.name("Heading1"), Some("heading 1"));

        let style = map.get_resolved("Heading1").unwrap();
        assert_eq!(style.outline_level, Some(0));
        assert_eq!(style.run_props.bold, Some(true));
    }

    #[test]
    fn test_heading_level() {
        let map = StyleMap::parse(STYLES).unwrap();
        assert_eq!(map.heading_level("Heading1"), HeadingLevel::H1);
        assert_eq!(map.heading_level("Heading2Custom"), HeadingLevel::H2);
        assert_eq!(map.heading_level("Title"), HeadingLevel::H1);
        assert_eq!(map.heading_level("a5"), HeadingLevel::H2);
        assert_eq!(map.heading_level("Normal"), HeadingLevel::None);
        assert_eq!(map.heading_level("Unknown"), HeadingLevel::None);
        assert_eq!(map.heading_level("Heading3"), HeadingLevel::H3);
    }

    #[test]
    fn test_title_class() {
        let map = StyleMap::parse(STYLES).unwrap();
        assert_eq!(map.title_class("Title"), Some("Title"));
        assert_eq!(map.title_class("a5"), Some("Subtitle"));
        assert_eq!(map.title_class("Heading1"), None);
    }

    #[test]
    fn test_run_style_inheritance() {
        let map = StyleMap::parse(STYLES).unwrap();
        let style = map.run_style("Heading2Custom");
        assert!(style.italic);
        assert!(!style.bold);
        assert!(map.run_style("Heading1").bold);
    }

    #[test]
    fn test_empty_styles() {
        assert!(StyleMap::parse("").unwrap().styles.is_empty());
    }
}

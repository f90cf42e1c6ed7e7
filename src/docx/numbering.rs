//! List definitions from `word/numbering.xml`.

use crate::docx::styles::attr_value;
use crate::error::Result;
use crate::model::ListType;
use quick_xml::events::Event;
use std::collections::HashMap;

/// A numbering level definition.
#[derive(Debug, Clone)]
pub struct NumLevel {
    /// Level index (0-8)
    pub level: u8,
    /// Start value
    pub start: u32,
    /// Number format (decimal, bullet, lowerLetter, ...)
    pub num_fmt: String,
}

impl NumLevel {
    /// Get the list type for this level.
    pub fn list_type(&self) -> ListType {
        match self.num_fmt.as_str() {
            "bullet" | "none" => ListType::Bullet,
            _ => ListType::Numbered,
        }
    }
}

/// Collection of numbering definitions.
#[derive(Debug, Clone, Default)]
pub struct NumberingMap {
    /// Levels of each abstract definition
    abstract_nums: HashMap<String, Vec<NumLevel>>,
    /// numId -> abstractNumId
    instances: HashMap<String, String>,
}

impl NumberingMap {
    /// Parse numbering from XML content.
    ///
    /// `w:abstractNum` and `w:num` are read in one pass; instances may
    /// appear before or after the definitions they point to.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut map = NumberingMap::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut current_abstract: Option<(String, Vec<NumLevel>)> = None;
        let mut current_level: Option<NumLevel> = None;
        let mut current_num: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => match e.name().as_ref() {
                    b"w:abstractNum" => {
                        let id = attr_value(&e, b"w:abstractNumId").unwrap_or_default();
                        current_abstract = Some((id, Vec::new()));
                    }
                    b"w:lvl" if current_abstract.is_some() => {
                        current_level = Some(NumLevel {
                            level: attr_value(&e, b"w:ilvl")
                                .and_then(|v| v.parse().ok())
                                .unwrap_or(0),
                            start: 1,
                            num_fmt: "bullet".to_string(),
                        });
                    }
                    b"w:num" => current_num = attr_value(&e, b"w:numId"),
                    _ => {}
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"w:start" => {
                        if let Some(level) = current_level.as_mut() {
                            level.start = attr_value(&e, b"w:val")
                                .and_then(|v| v.parse().ok())
                                .unwrap_or(1);
                        }
                    }
                    b"w:numFmt" => {
                        if let (Some(level), Some(fmt)) =
                            (current_level.as_mut(), attr_value(&e, b"w:val"))
                        {
                            level.num_fmt = fmt;
                        }
                    }
                    b"w:abstractNumId" => {
                        if let (Some(num_id), Some(abstract_id)) =
                            (current_num.as_ref(), attr_value(&e, b"w:val"))
                        {
                            map.instances.insert(num_id.clone(), abstract_id);
                        }
                    }
                    _ => {}
                },
                Event::End(e) => match e.name().as_ref() {
                    b"w:lvl" => {
                        if let (Some(level), Some((_, levels))) =
                            (current_level.take(), current_abstract.as_mut())
                        {
                            levels.push(level);
                        }
                    }
                    b"w:abstractNum" => {
                        if let Some((id, levels)) = current_abstract.take() {
                            map.abstract_nums.insert(id, levels);
                        }
                    }
                    b"w:num" => current_num = None,
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(map)
    }

    /// Look up the level definition for a paragraph's `numId`/`ilvl`.
    pub fn level(&self, num_id: &str, level: u8) -> Option<&NumLevel> {
        let abstract_id = self.instances.get(num_id)?;
        self.abstract_nums
            .get(abstract_id)?
            .iter()
            .find(|l| l.level == level)
    }

    /// List type for a paragraph's `numId`/`ilvl`.
    ///
    /// `numId` 0 removes numbering; unknown ids fall back to bullets so
    /// the paragraph still renders as a list item.
    pub fn list_type(&self, num_id: &str, level: u8) -> Option<ListType> {
        if num_id == "0" {
            return None;
        }
        Some(
            self.level(num_id, level)
                .map(NumLevel::list_type)
                .unwrap_or_default(),
        )
    }
}

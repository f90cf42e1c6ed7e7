//! Download blobs for edited content.
//!
//! Two formats are produced: a plain HTML document, and Word-compatible
//! HTML (a `.doc` that Word opens as a document). The latter is not
//! OOXML; it relies on Word's HTML import and its `mso` extensions.

use std::fmt;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::detect::FileKind;
use crate::dom::{self, escape_text, Node};
use crate::error::{Error, Result};
use crate::session::DocumentSession;

/// Download format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Standalone HTML document
    Html,
    /// Word-compatible HTML with a Word MIME type
    Doc,
}

impl ExportFormat {
    /// Format used when re-exporting a file of this kind.
    pub fn for_original(kind: FileKind) -> Self {
        if kind.is_word() {
            ExportFormat::Doc
        } else {
            ExportFormat::Html
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Html => "text/html;charset=utf-8",
            ExportFormat::Doc => "application/vnd.ms-word;charset=utf-8",
        }
    }

    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Doc => "doc",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(ExportFormat::Html),
            "doc" | "word" => Ok(ExportFormat::Doc),
            other => Err(Error::Export(format!("unknown export format '{}'", other))),
        }
    }
}

/// A file ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBlob {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ExportBlob {
    /// Bytes as text; every blob produced here is UTF-8.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.bytes).unwrap_or_default()
    }
}

/// Serialize `html` for download in `format`.
pub fn export_document(
    html: &str,
    format: ExportFormat,
    session: &DocumentSession,
) -> Result<ExportBlob> {
    let file_name = export_file_name(session.file_name(), format);
    let body = match format {
        ExportFormat::Html => html_document(html, &file_name),
        ExportFormat::Doc => word_document(html, session.font_family())?,
    };
    debug!("Exported {} ({} bytes)", file_name, body.len());

    Ok(ExportBlob {
        file_name,
        mime_type: format.mime_type().to_string(),
        bytes: body.into_bytes(),
    })
}

/// Export and write the bytes to `writer`.
pub fn export_to_writer(
    html: &str,
    format: ExportFormat,
    session: &DocumentSession,
    mut writer: impl Write,
) -> Result<()> {
    let blob = export_document(html, format, session)?;
    writer
        .write_all(&blob.bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| Error::Export(e.to_string()))
}

/// Download name: the original name for HTML files, otherwise the
/// original stem with the format's extension.
fn export_file_name(original: Option<&str>, format: ExportFormat) -> String {
    let Some(name) = original.map(str::trim).filter(|n| !n.is_empty()) else {
        return format!("document.{}", format.extension());
    };

    let path = Path::new(name);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    if format == ExportFormat::Html && matches!(ext.as_deref(), Some("html") | Some("htm")) {
        return name.to_string();
    }

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    format!("{}.{}", stem, format.extension())
}

fn html_document(content: &str, file_name: &str) -> String {
    let title = Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Document");
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>{}</body>\n</html>\n",
        escape_text(title),
        content
    )
}

/// Reject font names that would break out of a CSS string.
fn validate_font(font: &str) -> Result<&str> {
    let font = font.trim();
    if font.is_empty() {
        return Err(Error::Export("font family is empty".to_string()));
    }
    if font.contains(['"', ';', '<', '>', '{', '}', '\\']) {
        return Err(Error::Export(format!(
            "font family '{}' cannot be embedded in CSS",
            font
        )));
    }
    Ok(font)
}

/// Rewrite content the way Word's HTML import expects it.
fn word_body(html: &str) -> String {
    let mut doc = dom::Document::parse(html);
    doc.walk_mut(&mut |el| {
        if el.is("p") || el.is("div") {
            el.add_class("MsoNormal");
        }
        if el.is("p") && el.is_empty_content() {
            el.children = vec![Node::text("\u{a0}")];
        }
        if el.is("br") {
            el.set_attr("clear", "all");
        }
    });
    doc.to_html()
}

const WORD_HEAD: &str = "<html xmlns:o='urn:schemas-microsoft-com:office:office' \
xmlns:w='urn:schemas-microsoft-com:office:word' \
xmlns:m='http://schemas.microsoft.com/office/2004/12/omml' \
xmlns='http://www.w3.org/TR/REC-html40'>
<head>
<meta charset=\"utf-8\">
<meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\">
<title>Export Document</title>
<!--[if gte mso 9]>
<xml>
<w:WordDocument>
<w:View>Print</w:View>
<w:Zoom>100</w:Zoom>
<w:TrackMoves/>
<w:TrackFormatting/>
<w:PunctuationKerning/>
<w:ValidateAgainstSchemas/>
<w:SaveIfXMLInvalid>false</w:SaveIfXMLInvalid>
<w:IgnoreMixedContent>false</w:IgnoreMixedContent>
<w:AlwaysShowPlaceholderText>false</w:AlwaysShowPlaceholderText>
<w:DoNotPromoteQF/>
<w:LidThemeOther>EN-US</w:LidThemeOther>
<w:LidThemeAsian>X-NONE</w:LidThemeAsian>
<w:LidThemeComplexScript>X-NONE</w:LidThemeComplexScript>
<w:Compatibility>
<w:BreakWrappedTables/>
<w:SnapToGridInCell/>
<w:WrapTextWithPunct/>
<w:UseAsianBreakRules/>
<w:DontGrowAutofit/>
<w:SplitPgBreakAndParaMark/>
<w:EnableOpenTypeKerning/>
<w:DontFlipMirrorIndents/>
<w:OverrideTableStyleHps/>
</w:Compatibility>
<w:DoNotOptimizeForBrowser/>
<m:mathPr>
<m:mathFont m:val=\"Cambria Math\"/>
<m:brkBin m:val=\"before\"/>
<m:brkBinSub m:val=\"&#45;-\"/>
<m:smallFrac m:val=\"off\"/>
<m:dispDef/>
<m:lMargin m:val=\"0\"/>
<m:rMargin m:val=\"0\"/>
<m:defJc m:val=\"centerGroup\"/>
<m:wrapIndent m:val=\"1440\"/>
<m:intLim m:val=\"subSup\"/>
<m:naryLim m:val=\"undOvr\"/>
</m:mathPr>
</w:WordDocument>
</xml>
<![endif]-->
";

fn word_styles(font: &str) -> String {
    format!(
        r#"<style>
body {{ font-family: "{font}", Arial, sans-serif; font-size: 12pt; line-height: 1.5; margin: 1in; }}
p.MsoNormal, li.MsoNormal, div.MsoNormal {{ margin: 0in; margin-bottom: .0001pt; font-size: 12.0pt; font-family: "{font}", sans-serif; line-height: 1.5; }}
h1, h2, h3, h4, h5, h6 {{ margin-top: 12pt; margin-bottom: 6pt; font-family: "{font}", sans-serif; font-weight: bold; }}
h1 {{ font-size: 16.0pt; }}
h2 {{ font-size: 14.0pt; }}
h3 {{ font-size: 13.0pt; }}
table {{ border-collapse: collapse; width: 100%; }}
td, th {{ border: 1pt solid windowtext; padding: 5pt; }}
ul, ol {{ margin-top: 0in; margin-bottom: 0in; }}
.preserve-whitespace {{ white-space: pre-wrap; }}
p {{ margin-bottom: 10pt; }}
br {{ mso-data-placement: same-cell; }}
</style>
"#
    )
}

fn word_document(content: &str, font: &str) -> Result<String> {
    let font = validate_font(font)?;
    let mut out = String::with_capacity(WORD_HEAD.len() + content.len() + 1024);
    out.push_str(WORD_HEAD);
    out.push_str(&word_styles(font));
    out.push_str("</head>\n<body>");
    out.push_str(&word_body(content));
    out.push_str("</body>\n</html>\n");
    Ok(out)
}

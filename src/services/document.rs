// src/services/document.rs

//! Training program documents.
//!
//! The model answers in Markdown. [`ProgramPlan::parse`] turns that text into
//! a title and ordered sections of blocks, and [`ProgramPlan::to_docx`]
//! writes the plan as a minimal WordprocessingML package:
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! word/document.xml
//! word/styles.xml
//! word/_rels/document.xml.rels
//! ```

use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::error::{AppError, Result};

/// One block of body content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(String),
    Bullet(String),
    Numbered { number: u32, text: String },
    Code(String),
    Rule,
}

/// A heading and the blocks up to the next heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSection {
    /// Markdown heading level (1-6); 0 for text before the first heading
    pub level: u8,
    pub heading: String,
    pub blocks: Vec<Block>,
}

/// A parsed training program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramPlan {
    pub title: String,
    pub sections: Vec<PlanSection>,
}

impl ProgramPlan {
    pub fn parse(title: impl Into<String>, markdown: &str) -> Self {
        let mut sections: Vec<PlanSection> = Vec::new();
        let mut current = PlanSection {
            level: 0,
            heading: String::new(),
            blocks: Vec::new(),
        };
        let mut in_code = false;

        for raw in markdown.lines() {
            let line = raw.trim_end();
            let trimmed = line.trim_start();

            if trimmed.starts_with("```") {
                in_code = !in_code;
                continue;
            }
            if in_code {
                current.blocks.push(Block::Code(line.to_string()));
                continue;
            }
            if trimmed.is_empty() {
                continue;
            }
            if matches!(trimmed, "---" | "***" | "___") {
                current.blocks.push(Block::Rule);
                continue;
            }
            if let Some((level, heading)) = heading(trimmed) {
                if current.level > 0 || !current.blocks.is_empty() {
                    sections.push(current);
                }
                current = PlanSection {
                    level,
                    heading,
                    blocks: Vec::new(),
                };
                continue;
            }
            if let Some(text) = ["- ", "* ", "• "]
                .iter()
                .find_map(|marker| trimmed.strip_prefix(marker))
            {
                current.blocks.push(Block::Bullet(text.trim().to_string()));
                continue;
            }
            if let Some((number, text)) = numbered(trimmed) {
                current.blocks.push(Block::Numbered { number, text });
                continue;
            }
            current.blocks.push(Block::Paragraph(trimmed.to_string()));
        }
        if current.level > 0 || !current.blocks.is_empty() {
            sections.push(current);
        }

        Self {
            title: title.into(),
            sections,
        }
    }

    pub fn headings(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|s| s.level > 0)
            .map(|s| s.heading.as_str())
            .collect()
    }

    /// `word/document.xml` of the plan.
    pub fn document_xml(&self) -> String {
        let mut body = String::new();
        body.push_str(&paragraph(Some("Title"), &self.title, None));
        for section in &self.sections {
            if section.level > 0 {
                let style = format!("Heading{}", section.level.min(6));
                body.push_str(&paragraph(Some(&style), &section.heading, None));
            }
            for block in &section.blocks {
                let xml = match block {
                    Block::Paragraph(text) => paragraph(None, text, None),
                    Block::Bullet(text) => paragraph(Some("ListParagraph"), text, Some("• ")),
                    Block::Numbered { number, text } => {
                        paragraph(Some("ListParagraph"), text, Some(&format!("{number}. ")))
                    }
                    Block::Code(text) => code(text),
                    Block::Rule => paragraph(None, &"—".repeat(20), None),
                };
                body.push_str(&xml);
            }
        }
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
<w:document xmlns:w=\"{W_NS}\"><w:body>{body}<w:sectPr/></w:body></w:document>"
        )
    }

    /// Render the plan as `.docx` bytes.
    pub fn to_docx(&self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let document = self.document_xml();
        let parts: [(&str, &str); 5] = [
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", PACKAGE_RELS),
            ("word/document.xml", &document),
            ("word/styles.xml", STYLES),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS),
        ];
        for (name, content) in parts {
            zip.start_file(name, options).map_err(AppError::document)?;
            zip.write_all(content.as_bytes())?;
        }
        let cursor = zip.finish().map_err(AppError::document)?;
        Ok(cursor.into_inner())
    }
}

fn heading(line: &str) -> Option<(u8, String)> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    Some((hashes as u8, strip_emphasis(rest.trim())))
}

fn numbered(line: &str) -> Option<(u32, String)> {
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 || digits > 3 {
        return None;
    }
    let number = line[..digits].parse().ok()?;
    let rest = line[digits..]
        .strip_prefix(". ")
        .or_else(|| line[digits..].strip_prefix(") "))?;
    Some((number, rest.trim().to_string()))
}

/// Drop `**`/`__` markers from a heading; the heading style is already bold.
fn strip_emphasis(text: &str) -> String {
    text.replace("**", "").replace("__", "")
}

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => out.push(c),
        }
    }
    out
}

fn run(text: &str, bold: bool) -> String {
    if text.is_empty() {
        return String::new();
    }
    let props = if bold { "<w:rPr><w:b/></w:rPr>" } else { "" };
    format!(
        "<w:r>{props}<w:t xml:space=\"preserve\">{}</w:t></w:r>",
        escape_xml(text)
    )
}

/// Runs for inline text; `**bold**` spans become bold runs.
fn runs(text: &str) -> String {
    text.split("**")
        .enumerate()
        .map(|(i, part)| run(part, i % 2 == 1))
        .collect()
}

fn paragraph(style: Option<&str>, text: &str, marker: Option<&str>) -> String {
    let props = style
        .map(|s| format!("<w:pPr><w:pStyle w:val=\"{s}\"/></w:pPr>"))
        .unwrap_or_default();
    let marker = marker.map(|m| run(m, false)).unwrap_or_default();
    format!("<w:p>{props}{marker}{}</w:p>", runs(text))
}

fn code(text: &str) -> String {
    format!(
        "<w:p><w:r><w:rPr><w:rFonts w:ascii=\"Consolas\" w:hAnsi=\"Consolas\"/></w:rPr>\
<w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
        escape_xml(text)
    )
}

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="120"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:after="240"/></w:pPr><w:rPr><w:b/><w:sz w:val="32"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="240"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:b/><w:sz w:val="28"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/><w:basedOn w:val="Normal"/><w:pPr><w:keepNext/><w:spacing w:before="200"/><w:outlineLvl w:val="1"/></w:pPr><w:rPr><w:b/><w:sz w:val="26"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading3"><w:name w:val="heading 3"/><w:basedOn w:val="Normal"/><w:pPr><w:keepNext/><w:outlineLvl w:val="2"/></w:pPr><w:rPr><w:b/><w:sz w:val="24"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading4"><w:name w:val="heading 4"/><w:basedOn w:val="Heading3"/><w:pPr><w:outlineLvl w:val="3"/></w:pPr></w:style><w:style w:type="paragraph" w:styleId="Heading5"><w:name w:val="heading 5"/><w:basedOn w:val="Heading3"/><w:pPr><w:outlineLvl w:val="4"/></w:pPr></w:style><w:style w:type="paragraph" w:styleId="Heading6"><w:name w:val="heading 6"/><w:basedOn w:val="Heading3"/><w:pPr><w:outlineLvl w:val="5"/></w:pPr></w:style><w:style w:type="paragraph" w:styleId="ListParagraph"><w:name w:val="List Paragraph"/><w:basedOn w:val="Normal"/><w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr></w:style></w:styles>"#;

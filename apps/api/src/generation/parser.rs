//! Recovers typed sections from the model's free-text reply.
//!
//! Two independent phases:
//! 1. [`split_sections`] cuts the reply into `(heading, body)` spans at every
//!    line that starts with the `###` marker.
//! 2. [`classify`] maps a heading to a [`ContentType`] by substring containment
//!    against a persona's heading table.
//!
//! The parser never fails. Unknown headings are dropped and absent sections are
//! simply missing from the result.

use std::collections::BTreeMap;

use crate::generation::content_type::ContentType;

pub const SECTION_MARKER: &str = "###";

/// Lines longer than this are never taken as a fallback title.
const TITLE_LINE_LIMIT: usize = 100;

/// Ordered heading table. The first row for a content type is also the heading
/// the prompt asks the model to use, so the prompt and the parser always agree.
/// Rows are tested top to bottom and the first containing phrase wins, so
/// broader phrases such as "ROTEIRO" sit at the end.
pub type HeadingTable = &'static [(&'static str, ContentType)];

pub const GENERIC_HEADINGS: HeadingTable = &[
    ("TÍTULO DO VÍDEO", ContentType::Title),
    ("DESCRIÇÃO DO VÍDEO", ContentType::Description),
    ("TAGS", ContentType::Tags),
    ("IDEIA PARA THUMBNAIL", ContentType::ThumbnailIdea),
    ("SCRIPT PARA ÁUDIO", ContentType::AudioScript),
    ("TRANSCRIÇÃO", ContentType::Transcription),
    ("VERSÃO CURTA", ContentType::ShortsIdea),
    ("ROTEIRO", ContentType::Script),
];

pub const PRAYER_HEADINGS: HeadingTable = &[
    ("TÍTULO DA ORAÇÃO", ContentType::Title),
    ("DESCRIÇÃO", ContentType::Description),
    ("TAGS", ContentType::Tags),
    ("IDEIA PARA THUMBNAIL", ContentType::ThumbnailIdea),
    ("SCRIPT PARA ÁUDIO", ContentType::AudioScript),
    ("TRANSCRIÇÃO", ContentType::Transcription),
    ("VERSÃO CURTA", ContentType::ShortsIdea),
    ("ORAÇÃO COMPLETA", ContentType::Script),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

/// Heading the prompt should use for `content_type`.
pub fn canonical_heading(table: HeadingTable, content_type: ContentType) -> &'static str {
    table
        .iter()
        .find(|(_, ct)| *ct == content_type)
        .map(|(phrase, _)| *phrase)
        .unwrap_or_else(|| content_type.label())
}

fn heading_text(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    if !trimmed.starts_with(SECTION_MARKER) {
        return None;
    }
    Some(trimmed.trim_start_matches('#').trim())
}

/// Phase 1: every heading line opens a section that runs to the next heading
/// line or the end of the text. Text before the first heading is ignored.
pub fn split_sections(reply: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<(String, Vec<&str>)> = None;

    for line in reply.lines() {
        if let Some(heading) = heading_text(line) {
            if let Some((heading, body)) = current.take() {
                sections.push(Section {
                    heading,
                    body: body.join("\n").trim().to_string(),
                });
            }
            current = Some((heading.to_string(), Vec::new()));
        } else if let Some((_, body)) = current.as_mut() {
            body.push(line);
        }
    }

    if let Some((heading, body)) = current {
        sections.push(Section {
            heading,
            body: body.join("\n").trim().to_string(),
        });
    }

    sections
}

/// Phase 2: case-insensitive substring match against the table.
pub fn classify(heading: &str, table: HeadingTable) -> Option<ContentType> {
    let heading = heading.to_uppercase();
    table
        .iter()
        .find(|(phrase, _)| heading.contains(phrase))
        .map(|(_, ct)| *ct)
}

/// Both phases. Matches are applied in document order, so a later heading for
/// the same type replaces an earlier one.
pub fn extract(reply: &str, table: HeadingTable) -> BTreeMap<ContentType, String> {
    let mut sections = BTreeMap::new();
    for section in split_sections(reply) {
        if let Some(content_type) = classify(&section.heading, table) {
            sections.insert(content_type, section.body);
        }
    }
    sections
}

/// Title recovery for replies without a usable TITLE section:
/// the title heading's own text or first body line → the first short,
/// non-heading line → `default`.
pub fn extract_title(reply: &str, title_phrase: &str, default: &str) -> String {
    let title_phrase = title_phrase.to_uppercase();

    for section in split_sections(reply) {
        let upper = section.heading.to_uppercase();
        if let Some(pos) = upper.find(&title_phrase) {
            // Uppercasing can change byte lengths, so cut the remainder from the
            // uppercased heading rather than the original.
            let rest = upper[pos + title_phrase.len()..]
                .trim_matches(|c: char| c.is_whitespace() || c == ':' || c == '-');
            if !rest.is_empty() {
                let char_offset = upper[..pos + title_phrase.len()].chars().count();
                let original: String = section.heading.chars().skip(char_offset).collect();
                let original =
                    original.trim_matches(|c: char| c.is_whitespace() || c == ':' || c == '-');
                if !original.is_empty() {
                    return original.to_string();
                }
            }
            if let Some(line) = section.body.lines().map(str::trim).find(|l| !l.is_empty()) {
                return line.to_string();
            }
        }
    }

    reply
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#') && l.chars().count() < TITLE_LINE_LIMIT)
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}

//! Fills a persona template from a request.
//!
//! Substitution is a single left-to-right pass: each `{name}` token is looked
//! up once and the value is copied out verbatim, so values are never scanned
//! for further tokens. A token with no entry in the table is a template defect.
//! It is logged and removed, never sent to the model.

use std::collections::HashMap;

use tracing::error;

use crate::generation::content_type::ContentType;
use crate::generation::parser::{canonical_heading, HeadingTable};
use crate::generation::prompts::{
    section_instruction, Language, CALL_TO_ACTION, DEGRADED_PROMPT, FORMAT_OUTPUT, SEO_GUIDELINES,
    UNSPECIFIED_SUBJECT,
};
use crate::generation::request::{non_blank, GenerationRequest};
use crate::generation::style_catalog::GENERAL_GUIDELINES;

/// Placeholder name → value. Every value is a plain string, missing request
/// fields are stored as `""`.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    values: HashMap<&'static str, String>,
}

impl Substitutions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        self.values.insert(name, value.into());
        self
    }

    /// Stores the trimmed field, or `default` when the field is blank.
    pub fn set_field(
        &mut self,
        name: &'static str,
        field: &Option<String>,
        default: &str,
    ) -> &mut Self {
        let value = non_blank(field).unwrap_or(default).to_string();
        self.set(name, value)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Result of one substitution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Placeholder names found in the template with no table entry.
    pub unresolved: Vec<String>,
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Single pass over `template`. Braces that do not enclose an identifier
/// (JSON examples, stray braces) are copied through untouched.
pub fn render(template: &str, substitutions: &Substitutions) -> Rendered {
    let mut text = String::with_capacity(template.len());
    let mut unresolved = Vec::new();
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        text.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        match after_open.find('}') {
            Some(close) if is_placeholder_name(&after_open[..close]) => {
                let name = &after_open[..close];
                match substitutions.get(name) {
                    Some(value) => text.push_str(value),
                    None => unresolved.push(name.to_string()),
                }
                rest = &after_open[close + 1..];
            }
            _ => {
                text.push('{');
                rest = after_open;
            }
        }
    }
    text.push_str(rest);

    Rendered { text, unresolved }
}

/// Collapses the runs of blank lines left behind by empty section blocks.
fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0;
    for line in text.trim().lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.trim_end().to_string()
}

/// `### HEADING` plus its instruction line, using the same heading the parser
/// table expects back.
pub fn section_block(headings: HeadingTable, content_type: ContentType) -> String {
    format!(
        "### {}\n{}",
        canonical_heading(headings, content_type),
        section_instruction(content_type)
    )
}

/// Table entries shared by every persona. Handlers add their own on top.
pub fn base_substitutions(
    request: &GenerationRequest,
    headings: HeadingTable,
    style_characteristics: &str,
    agent_guidelines: &str,
) -> Substitutions {
    let bucket = request.duration_bucket();
    let (words, _) = bucket.estimate();
    let language = Language::from_tag(&request.language);

    let mut subs = Substitutions::new();
    subs.set("processId", request.process_id())
        .set_field("title", &request.title, "")
        .set_field("theme", &request.theme, "")
        .set_field("notes", &request.notes, "")
        .set_field("videoTopic", &request.video_topic, "")
        .set_field("targetAudience", &request.target_audience, "")
        .set_field("toneStyle", &request.tone_style, "")
        .set_field("additionalContext", &request.additional_context, "")
        .set("targetDuration", bucket.label())
        .set("estimatedWords", words.to_string())
        .set("language", language.display_name())
        .set("styleCharacteristics", style_characteristics)
        .set("generalGuidelines", GENERAL_GUIDELINES)
        .set("agentSpecificGuidelines", agent_guidelines)
        .set("formatOutput", FORMAT_OUTPUT)
        .set(
            "seoGuidelines",
            if request.optimize_for_seo { SEO_GUIDELINES } else { "" },
        )
        .set(
            "callToAction",
            if request.include_call_to_action {
                CALL_TO_ACTION
            } else {
                ""
            },
        )
        .set("shortVideo", yes_no(request.wants_short_variant()))
        .set("generateAudio", yes_no(request.generate_audio));

    let formatted: Vec<String> = request
        .content_types
        .iter()
        .filter(|ct| **ct != ContentType::ShortsIdea || request.wants_short_variant())
        .map(|ct| format!("- {}", ct.label()))
        .collect();
    subs.set("contentTypesFormatted", formatted.join("\n"));

    for content_type in ContentType::ALL {
        let included = match content_type {
            ContentType::ShortsIdea => request.wants_short_variant(),
            other => request.wants(other),
        };
        let block = if included {
            section_block(headings, content_type)
        } else {
            String::new()
        };
        subs.set(content_type.placeholder(), block);
    }

    subs
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Sim"
    } else {
        "Não"
    }
}

/// Fills `template` and appends the duration line. Falls back to
/// [`degraded_prompt`] when nothing usable comes out.
pub fn compose(template: &str, request: &GenerationRequest, substitutions: &Substitutions) -> String {
    let rendered = render(template, substitutions);
    if !rendered.unresolved.is_empty() {
        error!(
            "Template for {} has placeholders with no value: {:?}",
            request.persona.as_str(),
            rendered.unresolved
        );
    }

    let body = collapse_blank_lines(&rendered.text);
    if body.is_empty() {
        error!(
            "Composed prompt for process {} is empty, using degraded prompt",
            request.process_id()
        );
        return degraded_prompt(request);
    }

    format!(
        "{body}\n\n{}",
        request.duration_bucket().length_instruction()
    )
}

/// Minimal prompt built from the raw title or theme.
pub fn degraded_prompt(request: &GenerationRequest) -> String {
    let subject = non_blank(&request.title)
        .or_else(|| non_blank(&request.theme))
        .unwrap_or(UNSPECIFIED_SUBJECT);
    DEGRADED_PROMPT.replace("{subject}", subject)
}

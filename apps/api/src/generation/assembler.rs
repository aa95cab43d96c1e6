//! Turns parsed sections into a [`GeneratedBundle`].
//!
//! Persona-agnostic. Persona decoration happens afterwards in
//! `AgentHandler::enhance`, so the parser and this module stay shared.

use std::collections::BTreeMap;

use crate::generation::bundle::{BundleStatus, GeneratedBundle};
use crate::generation::content_type::ContentType;
use crate::generation::parser::{canonical_heading, extract_title, HeadingTable};
use crate::generation::request::{non_blank, GenerationRequest};

pub const GENERATION_FAILED_MESSAGE: &str = "Não foi possível gerar o conteúdo";
pub const GENERATION_COMPLETED_MESSAGE: &str = "Conteúdo gerado com sucesso";

fn section(sections: &BTreeMap<ContentType, String>, content_type: ContentType) -> String {
    sections.get(&content_type).cloned().unwrap_or_default()
}

/// Title precedence: request title → TITLE section (first line) → recovered
/// from the raw reply → `default_title`.
pub fn resolve_title(
    request: &GenerationRequest,
    reply: &str,
    sections: &BTreeMap<ContentType, String>,
    headings: HeadingTable,
    default_title: &str,
) -> String {
    if let Some(title) = non_blank(&request.title) {
        return title.to_string();
    }
    if let Some(line) = sections
        .get(&ContentType::Title)
        .and_then(|t| t.lines().map(str::trim).find(|l| !l.is_empty()))
    {
        return line.to_string();
    }
    extract_title(
        reply,
        canonical_heading(headings, ContentType::Title),
        default_title,
    )
}

pub fn assemble(
    request: &GenerationRequest,
    reply: &str,
    sections: BTreeMap<ContentType, String>,
    headings: HeadingTable,
    default_title: &str,
) -> GeneratedBundle {
    if reply.trim().is_empty() {
        return GeneratedBundle::failed(
            request.process_id(),
            request.persona,
            BundleStatus::Error,
            GENERATION_FAILED_MESSAGE,
        );
    }

    let title = resolve_title(request, reply, &sections, headings, default_title);
    let text_short = if request.wants_short_variant() {
        section(&sections, ContentType::ShortsIdea)
    } else {
        String::new()
    };

    GeneratedBundle {
        process_id: request.process_id().to_string(),
        title,
        persona: request.persona,
        text: section(&sections, ContentType::Script),
        text_short,
        description: section(&sections, ContentType::Description),
        tags: section(&sections, ContentType::Tags),
        audio: None,
        generated_content: sections,
        status: BundleStatus::Completed,
        message: GENERATION_COMPLETED_MESSAGE.to_string(),
        saved: false,
        content_id: None,
    }
}

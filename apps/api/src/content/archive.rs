//! Downloadable zip package for one stored record.

use std::io::{Cursor, Write};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;
use tracing::warn;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::blob::BlobStore;
use crate::content::captions::render_srt;
use crate::generation::style_catalog::fold_diacritic;
use crate::models::content::ContentRecord;

const MAX_FILENAME_TITLE_CHARS: usize = 50;
const UNSAFE_FILENAME_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct ArchivePackage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Where the record's audio ended up once resolved.
#[derive(Debug, PartialEq, Eq)]
enum AudioPayload {
    Bytes(Vec<u8>),
    Link(String),
}

async fn resolve_audio(reference: &str, blobs: &dyn BlobStore) -> AudioPayload {
    let reference = reference.trim();

    if let Some((header, payload)) = reference
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
    {
        if header.ends_with(";base64") {
            match STANDARD.decode(payload.trim()) {
                Ok(bytes) => return AudioPayload::Bytes(bytes),
                Err(e) => warn!("Inline audio is not valid base64: {e}"),
            }
        }
        return AudioPayload::Link(reference.to_string());
    }

    if reference.starts_with("http://") || reference.starts_with("https://") {
        return AudioPayload::Link(reference.to_string());
    }

    match blobs.fetch(reference).await {
        Ok(bytes) => AudioPayload::Bytes(bytes.to_vec()),
        Err(e) => {
            warn!("Could not fetch audio {reference}, packaging the link instead: {e}");
            AudioPayload::Link(reference.to_string())
        }
    }
}

pub async fn build_archive(
    record: &ContentRecord,
    blobs: &dyn BlobStore,
) -> Result<ArchivePackage, ArchiveError> {
    let audio = match record.audio.as_deref().filter(|_| record.has_audio()) {
        Some(reference) => Some(resolve_audio(reference, blobs).await),
        None => None,
    };

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let texts = [
        ("texts/description.txt", record.description.clone()),
        ("texts/script.txt", record.text.clone()),
        ("texts/script.srt", render_srt(&record.text)),
        ("texts/tags.txt", record.tags.clone()),
        ("texts/short_version.txt", record.text_short.clone()),
    ];
    for (name, body) in texts {
        if body.trim().is_empty() {
            continue;
        }
        zip.start_file(name, options)?;
        zip.write_all(body.as_bytes())?;
    }

    zip.start_file("texts/metadata.txt", options)?;
    zip.write_all(metadata(record).as_bytes())?;

    match audio {
        Some(AudioPayload::Bytes(bytes)) => {
            zip.start_file("audio/audio.mp3", options)?;
            zip.write_all(&bytes)?;
        }
        Some(AudioPayload::Link(link)) => {
            zip.start_file("audio/audio_url.txt", options)?;
            zip.write_all(link.as_bytes())?;
        }
        None => {}
    }

    let bytes = zip.finish()?.into_inner();
    Ok(ArchivePackage {
        filename: archive_filename(record),
        bytes,
    })
}

fn metadata(record: &ContentRecord) -> String {
    format!(
        "Título: {}\nPersona: {}\nID do conteúdo: {}\nID do processo: {}\nCriado em: {}\nÁudio: {}\n",
        record.title,
        record.persona,
        record.content_id,
        record.process_id,
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        if record.has_audio() { "sim" } else { "não" },
    )
}

/// `<sanitized title>_<YYYYMMDD>_<id prefix>.zip`
pub fn archive_filename(record: &ContentRecord) -> String {
    let mut title = sanitize_title(&record.title);
    if title.is_empty() {
        title = "conteudo".to_string();
    }
    let id = record.content_id.to_string();
    format!(
        "{title}_{}_{}.zip",
        record.created_at.format("%Y%m%d"),
        &id[..8]
    )
}

/// `Content-Disposition` value carrying an ASCII `filename` for older
/// clients and the exact UTF-8 name as an RFC 5987 `filename*`.
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(fold_diacritic)
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    )
}

fn sanitize_title(title: &str) -> String {
    let replaced: String = title
        .trim()
        .chars()
        .map(|c| {
            if UNSAFE_FILENAME_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();
    replaced
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .take(MAX_FILENAME_TITLE_CHARS)
        .collect()
}

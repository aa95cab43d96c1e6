use serde::{Deserialize, Serialize};

/// One named artifact within a generated bundle.
///
/// Declaration order is the order sections are listed in prompts, so keep the
/// variants ordered the way a video page reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Title,
    Description,
    Tags,
    Script,
    ThumbnailIdea,
    AudioScript,
    Transcription,
    ShortsIdea,
}

impl ContentType {
    pub const ALL: [ContentType; 8] = [
        ContentType::Title,
        ContentType::Description,
        ContentType::Tags,
        ContentType::Script,
        ContentType::ThumbnailIdea,
        ContentType::AudioScript,
        ContentType::Transcription,
        ContentType::ShortsIdea,
    ];

    /// Human label shown in the prompt's requested-sections list.
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::Title => "Título do Vídeo",
            ContentType::Description => "Descrição do Vídeo",
            ContentType::Tags => "Tags",
            ContentType::Script => "Roteiro",
            ContentType::ThumbnailIdea => "Ideia para Thumbnail",
            ContentType::AudioScript => "Script para Áudio",
            ContentType::Transcription => "Transcrição",
            ContentType::ShortsIdea => "Ideia para Shorts",
        }
    }

    /// Placeholder that receives this type's instruction block in templates.
    pub fn placeholder(&self) -> &'static str {
        match self {
            ContentType::Title => "titleSection",
            ContentType::Description => "descriptionSection",
            ContentType::Tags => "tagsSection",
            ContentType::Script => "scriptSection",
            ContentType::ThumbnailIdea => "thumbnailSection",
            ContentType::AudioScript => "audioScriptSection",
            ContentType::Transcription => "transcriptionSection",
            ContentType::ShortsIdea => "shortVersionSection",
        }
    }
}

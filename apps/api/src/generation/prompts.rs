// Prompt fragments and fixed templates for the generation module.
// Persona templates live in apps/api/templates/; everything here is compiled in.

use crate::generation::content_type::ContentType;
use crate::generation::request::Persona;

/// Output language, derived from the request's language tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Portuguese,
    English,
    Spanish,
}

impl Language {
    /// `en`, `en_US`, `es-MX` … anything unrecognised is Portuguese.
    pub fn from_tag(tag: &str) -> Self {
        let lower = tag.trim().to_ascii_lowercase();
        if lower.starts_with("en") {
            Language::English
        } else if lower.starts_with("es") {
            Language::Spanish
        } else {
            Language::Portuguese
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Portuguese => "português do Brasil",
            Language::English => "inglês",
            Language::Spanish => "espanhol",
        }
    }
}

/// Shared instruction on how the reply must be laid out. The `###` marker is
/// the same one the section parser splits on.
pub const FORMAT_OUTPUT: &str = "Responda somente com as seções abaixo, na ordem indicada. \
Cada seção começa em uma linha própria com `### ` seguido do título exato da seção. \
Não use `###` em nenhum outro lugar da resposta e não acrescente comentários fora das seções.";

pub const SEO_GUIDELINES: &str = "## OTIMIZAÇÃO PARA DESCOBERTA\n\
- Use a palavra-chave principal no título e nas duas primeiras linhas da descrição\n\
- Prefira tags específicas a tags genéricas";

pub const CALL_TO_ACTION: &str = "## CHAMADA PARA AÇÃO\n\
- Termine o roteiro convidando o público a se inscrever, comentar e compartilhar";

/// Generation instruction written under each section heading.
pub fn section_instruction(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Title => "[Um título atraente com no máximo 70 caracteres]",
        ContentType::Description => {
            "[Descrição de 1500-2000 caracteres, com resumo do conteúdo e chamada para reflexão]"
        }
        ContentType::Tags => "[10-15 tags relevantes separadas por vírgula]",
        ContentType::Script => {
            "[Texto completo para narração, seguindo o tamanho indicado ao final deste briefing]"
        }
        ContentType::ThumbnailIdea => {
            "[3 ideias de thumbnail: descrição visual e texto curto de impacto]"
        }
        ContentType::AudioScript => {
            "[Versão do texto preparada para locução, com marcações de pausa entre colchetes]"
        }
        ContentType::Transcription => "[Transcrição corrida do texto narrado, sem marcações]",
        ContentType::ShortsIdea => "[Versão curta de 60-90 segundos para Shorts/Reels]",
    }
}

/// Minimal prompt used when composition cannot produce anything usable.
pub const DEGRADED_PROMPT: &str = "# Erro ao carregar template\n\
Por favor, gere conteúdo para YouTube sobre: {subject}";

pub const UNSPECIFIED_SUBJECT: &str = "tema não especificado";

// ────────────────────────────────────────────────────────────────────────────
// Short version
// ────────────────────────────────────────────────────────────────────────────

/// Longest slice of the original script sent when asking for a short version.
pub const SHORT_VERSION_SOURCE_LIMIT: usize = 2000;

/// Replace: {title}, {script}
pub const SHORT_VERSION_PROMPT_PT: &str = r#"Crie uma versão curta (60-90 segundos de narração) do conteúdo abaixo, pronta para YouTube Shorts.

Título original: {title}

Texto original:
{script}

Regras:
- Mantenha a mensagem central e o tom do original
- Comece com uma frase de impacto
- Termine com um convite para assistir ao vídeo completo
- Responda apenas com o texto da versão curta"#;

pub const SHORT_VERSION_PROMPT_EN: &str = r#"Write a short version (60-90 seconds of narration) of the content below, ready for YouTube Shorts.

Original title: {title}

Original text:
{script}

Rules:
- Keep the central message and the tone of the original
- Open with a strong hook
- End by inviting viewers to watch the full video
- Reply with the short version text only"#;

pub const SHORT_VERSION_PROMPT_ES: &str = r#"Crea una versión corta (60-90 segundos de narración) del contenido siguiente, lista para YouTube Shorts.

Título original: {title}

Texto original:
{script}

Reglas:
- Mantén el mensaje central y el tono del original
- Empieza con una frase de impacto
- Termina invitando a ver el video completo
- Responde solo con el texto de la versión corta"#;

pub fn short_version_prompt(language: Language) -> &'static str {
    match language {
        Language::Portuguese => SHORT_VERSION_PROMPT_PT,
        Language::English => SHORT_VERSION_PROMPT_EN,
        Language::Spanish => SHORT_VERSION_PROMPT_ES,
    }
}

pub fn short_version_title(title: &str, language: Language) -> String {
    match language {
        Language::Portuguese => format!("{title} (Versão Curta)"),
        Language::English => format!("{title} (Short Version)"),
        Language::Spanish => format!("{title} (Versión Corta)"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Description enhancement
// ────────────────────────────────────────────────────────────────────────────

/// Replace: {title}, {script}
pub const DESCRIPTION_PROMPT_PT: &str = r#"Escreva a descrição de um vídeo do YouTube para o conteúdo abaixo.

Título: {title}

Conteúdo:
{script}

A descrição deve ter:
- Um emoji no início da primeira linha
- Um parágrafo de resumo acolhedor
- Um convite para curtir, comentar e se inscrever
- 3 a 5 hashtags na última linha
Responda apenas com a descrição."#;

pub const DESCRIPTION_PROMPT_EN: &str = r#"Write a YouTube video description for the content below.

Title: {title}

Content:
{script}

The description must have:
- An emoji at the start of the first line
- A warm summary paragraph
- An invitation to like, comment and subscribe
- 3 to 5 hashtags on the last line
Reply with the description only."#;

pub const DESCRIPTION_PROMPT_ES: &str = r#"Escribe la descripción de un video de YouTube para el contenido siguiente.

Título: {title}

Contenido:
{script}

La descripción debe tener:
- Un emoji al inicio de la primera línea
- Un párrafo de resumen cálido
- Una invitación a dar me gusta, comentar y suscribirse
- 3 a 5 hashtags en la última línea
Responde solo con la descripción."#;

pub fn description_prompt(language: Language) -> &'static str {
    match language {
        Language::Portuguese => DESCRIPTION_PROMPT_PT,
        Language::English => DESCRIPTION_PROMPT_EN,
        Language::Spanish => DESCRIPTION_PROMPT_ES,
    }
}

/// Description used when the model call for a description fails.
pub fn fallback_description(title: &str, persona: Persona) -> String {
    match persona {
        Persona::Prayer => format!(
            "🙏 {title}\n\n\
             Esta oração especial foi preparada para abençoar o seu dia. \
             Assista até o final, deixe seu comentário e compartilhe com quem precisa.\n\n\
             #oração #fé #espiritualidade"
        ),
        Persona::Stoicism => format!(
            "🏛️ {title}\n\n\
             Uma reflexão estoica para aplicar ainda hoje. \
             Deixe seu comentário e compartilhe com quem precisa ouvir isso.\n\n\
             #estoicismo #filosofia #sabedoria"
        ),
        Persona::Generic | Persona::Unknown => format!(
            "▶️ {title}\n\n\
             Assista até o final, deixe seu comentário e inscreva-se no canal.\n\n\
             #youtube #conteudo"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_tags() {
        assert_eq!(Language::from_tag("pt_BR"), Language::Portuguese);
        assert_eq!(Language::from_tag("en-US"), Language::English);
        assert_eq!(Language::from_tag("es-MX"), Language::Spanish);
        assert_eq!(Language::from_tag(""), Language::Portuguese);
    }

    #[test]
    fn test_fallback_description_keeps_title() {
        let text = fallback_description("Oração da Manhã", Persona::Prayer);
        assert!(text.starts_with("🙏 Oração da Manhã"));
        assert!(text.ends_with("#oração #fé #espiritualidade"));
    }
}

//! Static characteristic text keyed by persona sub-style.
//!
//! Built once at startup with [`StyleCatalog::builtin`] and shared behind an
//! `Arc`. Nothing writes to it after construction.
//!
//! Lookup order for every family: exact key → normalized substring match in
//! either direction (lower-cased, diacritics folded) → the family's DEFAULT
//! entry → [`GLOBAL_DEFAULT`].

use serde::Serialize;

use crate::generation::request::Persona;

pub const DEFAULT_KEY: &str = "DEFAULT";

/// Used only when a family somehow has no DEFAULT row.
pub const GLOBAL_DEFAULT: &str = "- Linguagem clara, acolhedora e respeitosa\n\
- Estrutura com começo, meio e fim bem definidos\n\
- Frases curtas, fáceis de narrar em voz alta";

/// Shortest input that takes part in approximate matching.
const MIN_APPROX_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleFamily {
    PrayerStyle,
    PrayerType,
    Philosopher,
}

#[derive(Debug, Clone, Serialize)]
pub struct StyleEntry {
    pub key: &'static str,
    pub display_name: &'static str,
    #[serde(skip)]
    pub characteristics: &'static str,
}

const fn entry(
    key: &'static str,
    display_name: &'static str,
    characteristics: &'static str,
) -> StyleEntry {
    StyleEntry {
        key,
        display_name,
        characteristics,
    }
}

#[derive(Debug, Clone)]
pub struct StyleCatalog {
    prayer_styles: Vec<StyleEntry>,
    prayer_types: Vec<StyleEntry>,
    philosophers: Vec<StyleEntry>,
}

/// Catalog listing served to clients choosing a sub-style.
#[derive(Debug, Clone, Serialize)]
pub struct PersonaCatalog {
    pub persona: Persona,
    pub prayer_styles: Vec<StyleEntry>,
    pub prayer_types: Vec<StyleEntry>,
    pub philosophers: Vec<StyleEntry>,
}

impl StyleCatalog {
    pub fn builtin() -> Self {
        Self {
            prayer_styles: prayer_styles(),
            prayer_types: prayer_types(),
            philosophers: philosophers(),
        }
    }

    fn family(&self, family: StyleFamily) -> &[StyleEntry] {
        match family {
            StyleFamily::PrayerStyle => &self.prayer_styles,
            StyleFamily::PrayerType => &self.prayer_types,
            StyleFamily::Philosopher => &self.philosophers,
        }
    }

    /// Resolves a sub-style to its catalog entry. `None` only when the family
    /// has no DEFAULT row.
    pub fn lookup(&self, family: StyleFamily, sub_style: Option<&str>) -> Option<&StyleEntry> {
        let entries = self.family(family);
        let default = || entries.iter().find(|e| e.key == DEFAULT_KEY);

        let wanted = match sub_style.map(str::trim).filter(|s| !s.is_empty()) {
            Some(w) => w,
            None => return default(),
        };

        if let Some(exact) = entries
            .iter()
            .find(|e| e.key == wanted || e.display_name == wanted)
        {
            return Some(exact);
        }

        let needle = normalize(wanted);
        if needle.chars().count() >= MIN_APPROX_LEN {
            let approx = entries.iter().filter(|e| e.key != DEFAULT_KEY).find(|e| {
                [e.key, e.display_name].iter().any(|candidate| {
                    let hay = normalize(candidate);
                    hay.contains(&needle) || needle.contains(&hay)
                })
            });
            if approx.is_some() {
                return approx;
            }
        }

        default()
    }

    /// Characteristic text for a sub-style. Never fails.
    pub fn characteristics_for(&self, family: StyleFamily, sub_style: Option<&str>) -> &'static str {
        self.lookup(family, sub_style)
            .map(|e| e.characteristics)
            .unwrap_or(GLOBAL_DEFAULT)
    }

    pub fn display_name(&self, family: StyleFamily, sub_style: Option<&str>) -> &'static str {
        self.lookup(family, sub_style)
            .map(|e| e.display_name)
            .unwrap_or("Padrão")
    }

    /// Style block followed by type block, as handed to the devotional prompt.
    pub fn combined_prayer_characteristics(
        &self,
        prayer_style: Option<&str>,
        prayer_type: Option<&str>,
    ) -> String {
        format!(
            "## CARACTERÍSTICAS DO ESTILO DE ORAÇÃO\n{}\n\n## CARACTERÍSTICAS DO TIPO DE ORAÇÃO\n{}",
            self.characteristics_for(StyleFamily::PrayerStyle, prayer_style),
            self.characteristics_for(StyleFamily::PrayerType, prayer_type),
        )
    }

    /// Guidelines every prompt for `persona` carries.
    pub fn agent_guidelines(&self, persona: Persona) -> &'static str {
        match persona {
            Persona::Prayer => PRAYER_GUIDELINES,
            Persona::Stoicism => STOIC_GUIDELINES,
            Persona::Generic | Persona::Unknown => GENERIC_GUIDELINES,
        }
    }

    pub fn listing(&self) -> Vec<PersonaCatalog> {
        vec![
            PersonaCatalog {
                persona: Persona::Generic,
                prayer_styles: Vec::new(),
                prayer_types: Vec::new(),
                philosophers: Vec::new(),
            },
            PersonaCatalog {
                persona: Persona::Prayer,
                prayer_styles: self.prayer_styles.clone(),
                prayer_types: self.prayer_types.clone(),
                philosophers: Vec::new(),
            },
            PersonaCatalog {
                persona: Persona::Stoicism,
                prayer_styles: Vec::new(),
                prayer_types: Vec::new(),
                philosophers: self.philosophers.clone(),
            },
        ]
    }
}

/// Lower-cases and folds Portuguese/Latin diacritics to ASCII.
pub fn normalize(input: &str) -> String {
    input
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            '_' => ' ',
            other => fold_diacritic(other),
        })
        .collect()
}

/// Case-preserving ASCII fold for accented Portuguese/Latin letters.
pub fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        'Ñ' => 'N',
        other => other,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Guidelines
// ────────────────────────────────────────────────────────────────────────────

pub const GENERAL_GUIDELINES: &str = "- Escreva para ser narrado: frases curtas e ritmo natural\n\
- Evite jargões sem explicação\n\
- Mantenha coerência entre título, descrição e roteiro\n\
- Não invente dados, estatísticas ou citações";

const GENERIC_GUIDELINES: &str = "- Abra com um gancho forte nos primeiros 15 segundos\n\
- Organize o roteiro em blocos com transições claras\n\
- Use exemplos concretos e próximos do dia a dia do público\n\
- Termine retomando a ideia central";

const PRAYER_GUIDELINES: &str = "- Mantenha reverência e fidelidade bíblica\n\
- Cite passagens bíblicas com referência (livro, capítulo e versículo)\n\
- Use linguagem que convide o ouvinte a orar junto\n\
- Evite promessas de prosperidade ou cura garantida\n\
- Encerre com \"Amém\"";

const STOIC_GUIDELINES: &str = "- Fundamente cada ideia no pensamento estoico autêntico\n\
- Atribua citações apenas quando tiver certeza da autoria\n\
- Traga sempre uma aplicação prática para a vida moderna\n\
- Tom sereno, firme e sem autoajuda superficial";

// ────────────────────────────────────────────────────────────────────────────
// Prayer styles
// ────────────────────────────────────────────────────────────────────────────

fn prayer_styles() -> Vec<StyleEntry> {
    vec![
        entry(
            "POETIC",
            "Poético",
            "- Linguagem lírica, rica em imagens e metáforas\n\
- Ritmo cadenciado, quase musical\n\
- Uso de paralelismos como nos Salmos\n\
- Vocabulário sensorial (luz, águas, jardim, aurora)\n\
- Pausas expressivas entre as estrofes\n\
- Final que ecoa a imagem de abertura",
        ),
        entry(
            "BIBLICAL",
            "Bíblico",
            "- Estrutura apoiada diretamente em passagens das Escrituras\n\
- Citações literais com referência\n\
- Vocabulário próximo ao texto bíblico\n\
- Retoma promessas de Deus ao longo da oração\n\
- Conecta Antigo e Novo Testamento quando fizer sentido\n\
- Encerramento em nome de Jesus",
        ),
        entry(
            "CONTEMPLATIVE",
            "Contemplativo",
            "- Ritmo lento, com espaço para silêncio\n\
- Convida à respiração e à presença\n\
- Frases curtas e repetições suaves\n\
- Foco em escutar mais do que pedir\n\
- Imagens de quietude e descanso em Deus\n\
- Conclusão serena, sem pressa",
        ),
        entry(
            "CONVERSATIONAL",
            "Conversacional",
            "- Tom de conversa íntima com Deus\n\
- Linguagem simples e cotidiana\n\
- Perguntas sinceras e confissões honestas\n\
- Uso da segunda pessoa (\"Tu\", \"Senhor\")\n\
- Exemplos da vida comum\n\
- Sensação de proximidade e amizade",
        ),
        entry(
            "DECLARATIVE",
            "Declarativo",
            "- Afirmações de fé no tempo presente\n\
- Frases firmes e curtas\n\
- Repetição de verdades bíblicas como declarações\n\
- Tom de autoridade espiritual e confiança\n\
- Uso frequente de \"Eu declaro\" e \"Eu creio\"\n\
- Final vibrante e confiante",
        ),
        entry(
            "PASTORAL",
            "Pastoral",
            "- Voz de um pastor que cuida do rebanho\n\
- Acolhimento às dores do ouvinte\n\
- Conselhos bíblicos entremeados à oração\n\
- Linguagem calorosa e encorajadora\n\
- Menção às necessidades da comunidade\n\
- Bênção final sobre quem ouve",
        ),
        entry(
            "LITURGICAL",
            "Litúrgico",
            "- Estrutura tradicional (invocação, louvor, súplica, doxologia)\n\
- Linguagem solene e formal\n\
- Fórmulas consagradas pela tradição cristã\n\
- Respostas que a comunidade pode repetir\n\
- Referências ao calendário cristão quando couber\n\
- Encerramento trinitário",
        ),
        entry(
            DEFAULT_KEY,
            "Padrão",
            "- Linguagem reverente e acessível\n\
- Equilíbrio entre louvor, gratidão e súplica\n\
- Referências bíblicas pontuais\n\
- Frases claras, fáceis de acompanhar em áudio\n\
- Tom acolhedor e esperançoso\n\
- Encerramento com \"Amém\"",
        ),
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Prayer types
// ────────────────────────────────────────────────────────────────────────────

fn prayer_types() -> Vec<StyleEntry> {
    vec![
        entry(
            "BIBLICAL_REFLECTION",
            "Reflexão Bíblica Profunda",
            "- Parte de uma passagem bíblica central\n\
- Explica o contexto histórico do texto\n\
- Extrai princípios espirituais aplicáveis\n\
- Intercala reflexão e oração\n\
- Convida o ouvinte a meditar no versículo\n\
- Conclui com um pedido de revelação",
        ),
        entry(
            "DEVOTIONAL_INTIMACY",
            "Intimidade Devocional",
            "- Foco no relacionamento pessoal com Deus\n\
- Expressões de amor e entrega\n\
- Linguagem afetiva e vulnerável\n\
- Momentos de adoração silenciosa\n\
- Desejo de estar na presença do Senhor\n\
- Renovação da comunhão diária",
        ),
        entry(
            "FAITH_DECLARATION",
            "Declaração de Fé",
            "- Proclamação das verdades da fé\n\
- Afirmações baseadas em promessas bíblicas\n\
- Tom corajoso diante das lutas\n\
- Quebra de medo e ansiedade pela Palavra\n\
- Reafirmação da identidade em Cristo\n\
- Encerramento em vitória",
        ),
        entry(
            "GRATITUDE_WORSHIP",
            "Gratidão e Adoração",
            "- Reconhecimento das bênçãos recebidas\n\
- Louvor pelos atributos de Deus\n\
- Lista de motivos concretos de gratidão\n\
- Tom alegre e exaltado\n\
- Referências aos Salmos de louvor\n\
- Final em adoração",
        ),
        entry(
            "PASTORAL_COMFORT",
            "Consolo Pastoral",
            "- Acolhe quem está em sofrimento ou luto\n\
- Valida a dor sem pressa de resolvê-la\n\
- Promessas bíblicas de consolo e presença\n\
- Linguagem suave e paciente\n\
- Esperança firme sem negar a dificuldade\n\
- Bênção de paz sobre o ouvinte",
        ),
        entry(
            "INTERCESSION",
            "Intercessão",
            "- Oração em favor de outras pessoas\n\
- Pedidos específicos por famílias, enfermos e nações\n\
- Clamor com fervor e perseverança\n\
- Base em exemplos bíblicos de intercessores\n\
- Espaço para o ouvinte incluir seus próprios pedidos\n\
- Entrega final nas mãos de Deus",
        ),
        entry(
            "REPENTANCE",
            "Arrependimento",
            "- Reconhecimento sincero das falhas\n\
- Inspiração no Salmo 51\n\
- Pedido de perdão e purificação\n\
- Confiança na graça e na misericórdia\n\
- Compromisso de mudança de vida\n\
- Encerramento com alívio e restauração",
        ),
        entry(
            DEFAULT_KEY,
            "Oração Devocional",
            "- Abertura com louvor\n\
- Gratidão pelo cuidado de Deus\n\
- Pedidos ligados ao tema\n\
- Uma passagem bíblica de apoio\n\
- Entrega e confiança\n\
- Encerramento com \"Amém\"",
        ),
    ]
}

// ────────────────────────────────────────────────────────────────────────────
// Stoic philosophers
// ────────────────────────────────────────────────────────────────────────────

fn philosophers() -> Vec<StyleEntry> {
    vec![
        entry(
            "ZENO",
            "Zenão de Cítio",
            "- Fundador da Stoa: fala com a clareza de quem define princípios\n\
- Viver de acordo com a natureza e a razão\n\
- Frases curtas, quase aforismos",
        ),
        entry(
            "CLEANTHES",
            "Cleanthes",
            "- Tom devoto, próximo de um hino (Hino a Zeus)\n\
- Perseverança no trabalho humilde\n\
- Aceitação do destino como guia",
        ),
        entry(
            "CHRYSIPPUS",
            "Crisipo de Solis",
            "- Rigor lógico e argumentação em etapas\n\
- Distinção entre o que depende e o que não depende de nós\n\
- Exemplos técnicos explicados com paciência",
        ),
        entry(
            "PANAETIUS",
            "Panécio de Rodes",
            "- Estoicismo prático voltado aos deveres cotidianos\n\
- Moderação e decoro\n\
- Adaptação das virtudes a cada papel social",
        ),
        entry(
            "POSIDONIUS",
            "Posidônio de Apameia",
            "- Curiosidade científica e visão cósmica\n\
- Ligação entre emoções e natureza humana\n\
- Tom enciclopédico, mas acessível",
        ),
        entry(
            "SENECA",
            "Sêneca",
            "- Estilo epistolar, como nas Cartas a Lucílio\n\
- Reflexões sobre tempo, morte e riqueza\n\
- Frases memoráveis e exemplos da vida romana",
        ),
        entry(
            "MUSONIUS",
            "Musônio Rufo",
            "- Filosofia como prática diária (alimentação, sono, trabalho)\n\
- Igualdade na busca da virtude\n\
- Tom de mestre direto e exigente",
        ),
        entry(
            "EPICTETUS",
            "Epicteto",
            "- Dicotomia do controle como eixo central\n\
- Linguagem direta, por vezes dura, como no Enchiridion\n\
- Perguntas retóricas que confrontam o ouvinte",
        ),
        entry(
            "MARCUS_AURELIUS",
            "Marco Aurélio",
            "- Tom introspectivo das Meditações\n\
- Lembretes a si mesmo sobre dever e impermanência\n\
- Serenidade diante das responsabilidades",
        ),
        entry(
            "HIEROCLES",
            "Hierocles",
            "- Círculos concêntricos de pertencimento\n\
- Deveres com a família, a cidade e a humanidade\n\
- Exemplos afetivos e comunitários",
        ),
        entry(
            "ATHENODORUS",
            "Atenodoro de Tarsus",
            "- Conselheiro de governantes: prudência e discrição\n\
- Valor do recolhimento e da vida interior\n\
- Conselhos práticos e breves",
        ),
        entry(
            "ARISTO",
            "Aristo de Quios",
            "- Foco radical na virtude como único bem\n\
- Indiferença a tudo o mais\n\
- Tom provocador e minimalista",
        ),
        entry(
            "DIOGENES_OF_BABYLON",
            "Diogenes de Babilônia",
            "- Ética aplicada a dilemas concretos\n\
- Raciocínio sobre honestidade em negociações\n\
- Exposição didática de casos",
        ),
        entry(
            "ANTIPATER",
            "Antipatro de Tarso",
            "- Escolhas bem feitas como caminho da virtude\n\
- Analogia do arqueiro que mira bem sem controlar o alvo\n\
- Tom ponderado e argumentativo",
        ),
        entry(
            DEFAULT_KEY,
            "Estoicismo Clássico",
            "- Síntese dos grandes estoicos (Sêneca, Epicteto, Marco Aurélio)\n\
- Dicotomia do controle, virtude e aceitação\n\
- Aplicação prática a desafios modernos",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_key_lookup() {
        let catalog = StyleCatalog::builtin();
        let entry = catalog
            .lookup(StyleFamily::PrayerStyle, Some("POETIC"))
            .unwrap();
        assert_eq!(entry.display_name, "Poético");
    }

    #[test]
    fn test_display_name_lookup_ignores_case_and_accents() {
        let catalog = StyleCatalog::builtin();
        assert_eq!(
            catalog.display_name(StyleFamily::Philosopher, Some("seneca")),
            "Sêneca"
        );
        assert_eq!(
            catalog.display_name(StyleFamily::PrayerType, Some("reflexao biblica")),
            "Reflexão Bíblica Profunda"
        );
    }

    #[test]
    fn test_substring_match_in_either_direction() {
        let catalog = StyleCatalog::builtin();
        // input contained in the entry
        assert_eq!(
            catalog.display_name(StyleFamily::Philosopher, Some("Marco")),
            "Marco Aurélio"
        );
        // entry contained in the input
        assert_eq!(
            catalog.display_name(StyleFamily::Philosopher, Some("o imperador Marco Aurélio")),
            "Marco Aurélio"
        );
    }

    #[test]
    fn test_unknown_sub_style_falls_back_to_default() {
        let catalog = StyleCatalog::builtin();
        let text = catalog.characteristics_for(StyleFamily::PrayerStyle, Some("Heavy Metal"));
        let default = catalog.characteristics_for(StyleFamily::PrayerStyle, None);
        assert_eq!(text, default);
        assert!(text.contains("Amém"));
    }

    #[test]
    fn test_short_input_does_not_match_approximately() {
        let catalog = StyleCatalog::builtin();
        assert_eq!(
            catalog.display_name(StyleFamily::Philosopher, Some("a")),
            "Estoicismo Clássico"
        );
    }

    #[test]
    fn test_combined_prayer_characteristics_has_both_blocks() {
        let catalog = StyleCatalog::builtin();
        let text = catalog.combined_prayer_characteristics(Some("LITURGICAL"), Some("INTERCESSION"));
        assert!(text.starts_with("## CARACTERÍSTICAS DO ESTILO DE ORAÇÃO\n"));
        assert!(text.contains("doxologia"));
        assert!(text.contains("## CARACTERÍSTICAS DO TIPO DE ORAÇÃO\n"));
        assert!(text.contains("intercessores"));
    }

    #[test]
    fn test_every_family_has_default() {
        let catalog = StyleCatalog::builtin();
        for family in [
            StyleFamily::PrayerStyle,
            StyleFamily::PrayerType,
            StyleFamily::Philosopher,
        ] {
            assert!(
                catalog.family(family).iter().any(|e| e.key == DEFAULT_KEY),
                "{family:?} is missing its DEFAULT row"
            );
        }
    }

    #[test]
    fn test_normalize_folds_portuguese() {
        assert_eq!(normalize("Oração Açúcar ÊXITO"), "oracao acucar exito");
    }
}

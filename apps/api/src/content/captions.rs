//! SRT captions estimated from the script text alone. Timing assumes a steady
//! narration pace; there is no alignment against real audio.

const WORDS_PER_MINUTE: u64 = 130;
const MAX_WORDS_PER_CUE: usize = 12;
const MIN_CUE_MS: u64 = 1000;

/// Splits `script` into sentence cues and renders them as SRT. Returns an
/// empty string for a blank script.
pub fn render_srt(script: &str) -> String {
    let mut out = String::new();
    let mut start_ms = 0u64;

    for (index, cue) in cues(script).iter().enumerate() {
        let words = cue.split_whitespace().count() as u64;
        let duration = (words * 60_000 / WORDS_PER_MINUTE).max(MIN_CUE_MS);
        let end_ms = start_ms + duration;

        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
            timestamp(start_ms),
            timestamp(end_ms),
            cue
        ));
        start_ms = end_ms;
    }

    out
}

/// Sentences, with any sentence longer than the cue limit broken into
/// word chunks.
fn cues(script: &str) -> Vec<String> {
    let mut cues = Vec::new();
    for sentence in sentences(script) {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        for chunk in words.chunks(MAX_WORDS_PER_CUE) {
            cues.push(chunk.join(" "));
        }
    }
    cues
}

fn sentences(script: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in script.char_indices() {
        if matches!(c, '.' | '!' | '?' | '\n') {
            let end = i + c.len_utf8();
            let piece = script[start..end].trim();
            if !piece.is_empty() && piece.chars().any(char::is_alphanumeric) {
                out.push(piece);
            }
            start = end;
        }
    }
    let tail = script[start..].trim();
    if !tail.is_empty() && tail.chars().any(char::is_alphanumeric) {
        out.push(tail);
    }
    out
}

/// `HH:MM:SS,mmm`
fn timestamp(ms: u64) -> String {
    format!(
        "{:02}:{:02}:{:02},{:03}",
        ms / 3_600_000,
        (ms / 60_000) % 60,
        (ms / 1000) % 60,
        ms % 1000
    )
}

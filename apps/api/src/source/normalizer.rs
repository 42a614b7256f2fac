//! Text Normalizer: best-effort cosmetic reflow of text pulled out of a PDF.
//!
//! These rewrites are heuristics, not a parser. Section keywords match anywhere,
//! including inside longer words ("Experienced"), and bullet detection only looks at
//! `•` and `-` after a lowercase letter. Downstream tailoring tolerates the noise.

use once_cell::sync::Lazy;
use regex::Regex;

/// `.` glued to a capital letter: "Rust.Led" → "Rust. Led".
static RUN_ON_SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.([A-Z])").expect("valid run-on sentence pattern"));

static SECTION_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(Experience|Education|Skills|Summary|Projects|Certifications)")
        .expect("valid section keyword pattern")
});

/// A bullet marker following a lowercase letter and whitespace.
static RUN_ON_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])\s+([•-])").expect("valid run-on bullet pattern"));

/// Cleans raw extracted resume text. Pure, total and deterministic.
pub fn normalize(raw: &str) -> String {
    let text = RUN_ON_SENTENCE.replace_all(raw, ". $1");
    let text = SECTION_KEYWORD.replace_all(&text, "\n\n$1\n");
    let text = RUN_ON_BULLET.replace_all(&text, "$1\n$2");
    let text = text.replace("  ", "\n");
    text.trim().to_string()
}

// src/services/formatter.rs

use std::sync::LazyLock;

use regex::Regex;

static DEEP_HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#{4,}").expect("regex literal"));
static TRIPLE_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{3,}([^*]+)\*{3,}").expect("regex literal"));
static WIDE_SPACING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([^\n])\s{3,}").expect("regex literal"));
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?])\s*([A-Z\d])").expect("regex literal"));
static EXTRA_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").expect("regex literal"));

/// Normaliza o markdown devolvido pelo modelo antes de mostrar ao usuário.
pub fn format_ai_response(raw: &str) -> String {
    let text = DEEP_HEADING.replace_all(raw, "###");
    let text = TRIPLE_EMPHASIS.replace_all(&text, "**$1**");
    let text = WIDE_SPACING.replace_all(&text, "$1 ");
    let text = SENTENCE_BREAK.replace_all(&text, "$1\n\n$2");
    let text = EXTRA_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}

// Prepare user-supplied text (resume, job description) for embedding in a prompt.
// Normalizes whitespace and enforces the input size cap.

/// Marker appended when text was cut to fit the cap.
pub const TRUNCATION_MARKER: &str = "…[TRUNCATED]";

/// Text ready to embed, plus whether the cap was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedInput {
    pub text: String,
    pub truncated: bool,
}

/// Normalize whitespace and cap `raw` at `max_chars` characters.
/// `field` only labels the log line.
pub fn prepare_input(raw: &str, max_chars: usize, field: &str) -> PreparedInput {
    let normalized = normalize_whitespace(raw);
    let original_chars = normalized.chars().count();

    if original_chars <= max_chars {
        return PreparedInput {
            text: normalized,
            truncated: false,
        };
    }

    tracing::warn!(
        field,
        original_chars,
        max_chars,
        "Input exceeds prompt cap, truncating"
    );
    PreparedInput {
        text: truncate_to_max_chars(&normalized, max_chars),
        truncated: true,
    }
}

/// Trim each line and collapse runs of blank lines into one.
fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut prev_blank = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !prev_blank {
                lines.push("");
                prev_blank = true;
            }
        } else {
            lines.push(trimmed);
            prev_blank = false;
        }
    }

    while lines.first() == Some(&"") {
        lines.remove(0);
    }
    while lines.last() == Some(&"") {
        lines.pop();
    }

    lines.join("\n")
}

/// Cut at the last whitespace within `max_chars` characters (never mid-codepoint).
fn truncate_to_max_chars(text: &str, max_chars: usize) -> String {
    let byte_limit = text
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let head = &text[..byte_limit];

    match head.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => format!("{}{}", head[..pos].trim_end(), TRUNCATION_MARKER),
        _ => format!("{head}{TRUNCATION_MARKER}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_input_passes_through_normalized() {
        let prepared = prepare_input("  Jane Doe  \n\n\n\n  Rust Engineer ", 100, "resume");
        assert_eq!(prepared.text, "Jane Doe\n\nRust Engineer");
        assert!(!prepared.truncated);
    }

    #[test]
    fn long_input_cut_at_word_boundary() {
        let prepared = prepare_input("alpha beta gamma delta", 13, "resume");
        assert!(prepared.truncated);
        assert_eq!(prepared.text, format!("alpha beta{TRUNCATION_MARKER}"));
    }

    #[test]
    fn multibyte_text_never_split_mid_char() {
        let text = "é".repeat(40);
        let prepared = prepare_input(&text, 10, "job_description");
        assert!(prepared.truncated);
        assert!(prepared.text.starts_with(&"é".repeat(10)));
        assert!(prepared.text.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn exact_length_is_not_truncated() {
        let prepared = prepare_input("abcde", 5, "resume");
        assert_eq!(prepared.text, "abcde");
        assert!(!prepared.truncated);
    }

    #[test]
    fn whitespace_only_becomes_empty() {
        assert_eq!(prepare_input(" \n\t\n ", 10, "resume").text, "");
    }
}

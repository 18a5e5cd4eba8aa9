use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("No JSON array found in response")]
    NoArray,

    #[error("JSON array parsing error: {0}")]
    InvalidJson(String),

    #[error("JSON array contained no keywords")]
    EmptyArray,
}

/// Extract a list of strings from a free-text model reply.
///
/// Locates the first `[` and its matching `]`, ignoring brackets inside JSON
/// string literals, and decodes that span strictly. Elements are trimmed and
/// blank ones dropped; order is preserved.
pub fn extract_json_array(response: &str) -> Result<Vec<String>, ParseError> {
    let flattened = response.replace(['\r', '\n'], " ");
    let span = find_array_span(&flattened).ok_or(ParseError::NoArray)?;

    let items: Vec<String> =
        serde_json::from_str(span).map_err(|e| ParseError::InvalidJson(e.to_string()))?;

    let keywords: Vec<String> = items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if keywords.is_empty() {
        return Err(ParseError::EmptyArray);
    }
    Ok(keywords)
}

/// Byte span of the first balanced `[...]`, or `None` if it never closes.
fn find_array_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

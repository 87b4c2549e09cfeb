//! Type-expression normalization.
//!
//! Canonical form, per `|`-separated alternative: trimmed, `?` removed (the
//! whole union becomes nullable and gets one trailing `null`), leading `\`
//! stripped, legacy aliases mapped. `Type[]` suffixes are kept as written.

const NULL: &str = "null";

/// Normalize a raw type expression. Empty input yields an empty string.
pub fn normalize(raw: &str) -> String {
    let mut nullable = false;
    let mut parts: Vec<&str> = Vec::new();

    for part in alternatives(raw) {
        let mut part = part.trim();
        if let Some(rest) = part.strip_prefix('?') {
            part = rest.trim_start();
            nullable = true;
        }
        let part = alias(part.trim_start_matches('\\'));
        if !part.is_empty() {
            parts.push(part);
        }
    }

    if nullable {
        parts.retain(|p| *p != NULL);
        parts.push(NULL);
    }
    parts.join("|")
}

/// Like [`normalize`], but absent or empty expressions stay absent.
pub fn normalize_opt(raw: Option<&str>) -> Option<String> {
    raw.map(normalize).filter(|t| !t.is_empty())
}

fn alias(name: &str) -> &str {
    match name {
        "integer" => "int",
        "boolean" => "bool",
        "double" => "float",
        other => other,
    }
}

/// Split a union into its top-level alternatives. Separators nested inside
/// `<>`, `()` or `{}` (generic or shape annotations) do not split.
pub fn alternatives(expr: &str) -> Vec<&str> {
    let mut result = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in expr.char_indices() {
        match c {
            '<' | '(' | '{' => depth += 1,
            '>' | ')' | '}' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                result.push(&expr[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    result.push(&expr[start..]);
    result
}

/// Split `Type[][]` into (`Type`, 2). The suffix never affects resolution.
pub fn strip_array_suffix(alt: &str) -> (&str, usize) {
    let mut base = alt;
    let mut depth = 0;
    while let Some(inner) = base.strip_suffix("[]") {
        base = inner;
        depth += 1;
    }
    (base, depth)
}

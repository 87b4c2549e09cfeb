//! Doc comment parser: one `/** ... */` block into a description plus tags.
//!
//! The description is every line before the first `@` line. Later lines that
//! do not start with `@` continue the previous tag, joined by a line break.
//! Missing fields never fail the parse; they come back empty or absent.

use crate::model::{ExampleRef, SeeRef};
use crate::types;
use regex::Regex;
use std::sync::LazyLock;

// Inline tags inside a one-line block, e.g. `/** Text. @see Foo */`.
static RE_INLINE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\s(@(?:param|return|var|property-read|property-write|property|throws|example|see|internal|event))(?:\s|$)",
    )
    .unwrap()
});

/// One recognized tag occurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Param(ParamTag),
    Return(ReturnTag),
    Var(VarTag),
    Property(PropertyTag),
    Throws(String),
    Example(ExampleRef),
    See(SeeRef),
    Internal,
    Event(EventTag),
    /// Unrecognized keyword; kept only so tag order stays observable.
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParamTag {
    pub type_expr: Option<String>,
    /// Without the `$` sigil; empty when the tag omitted it.
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnTag {
    pub type_expr: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarTag {
    pub type_expr: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyTag {
    pub type_expr: Option<String>,
    pub name: String,
    pub description: String,
    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventTag {
    pub type_expr: Option<String>,
    pub name: String,
    pub description: String,
}

/// Parsed comment block. Intermediate; never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocCommentBlock {
    pub description: String,
    pub tags: Vec<Tag>,
}

impl DocCommentBlock {
    /// First `@param` whose name matches.
    pub fn param(&self, name: &str) -> Option<&ParamTag> {
        self.tags.iter().find_map(|t| match t {
            Tag::Param(p) if p.name == name => Some(p),
            _ => None,
        })
    }

    /// Last `@return` wins.
    pub fn return_tag(&self) -> Option<&ReturnTag> {
        self.tags.iter().rev().find_map(|t| match t {
            Tag::Return(r) => Some(r),
            _ => None,
        })
    }

    pub fn var_tag(&self) -> Option<&VarTag> {
        self.tags.iter().rev().find_map(|t| match t {
            Tag::Var(v) => Some(v),
            _ => None,
        })
    }

    pub fn properties(&self) -> impl Iterator<Item = &PropertyTag> {
        self.tags.iter().filter_map(|t| match t {
            Tag::Property(p) => Some(p),
            _ => None,
        })
    }

    pub fn events(&self) -> impl Iterator<Item = &EventTag> {
        self.tags.iter().filter_map(|t| match t {
            Tag::Event(e) => Some(e),
            _ => None,
        })
    }

    /// `@throws` names in first-occurrence order, without duplicates.
    pub fn throws(&self) -> Vec<String> {
        let mut result: Vec<String> = Vec::new();
        for tag in &self.tags {
            if let Tag::Throws(name) = tag {
                if !name.is_empty() && !result.contains(name) {
                    result.push(name.clone());
                }
            }
        }
        result
    }

    pub fn examples(&self) -> Vec<ExampleRef> {
        self.tags
            .iter()
            .filter_map(|t| match t {
                Tag::Example(e) => Some(e.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn see(&self) -> Vec<SeeRef> {
        self.tags
            .iter()
            .filter_map(|t| match t {
                Tag::See(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn is_internal(&self) -> bool {
        self.tags.iter().any(|t| matches!(t, Tag::Internal))
    }
}

// -- Public API ---------------------------------------------------------------

/// Parse the raw text of one comment block, delimiters included.
pub fn parse(comment: &str) -> DocCommentBlock {
    let mut description: Vec<String> = Vec::new();
    let mut tag_lines: Vec<String> = Vec::new();

    for line in clean_lines(comment) {
        if line.starts_with('@') {
            tag_lines.push(line);
        } else if let Some(previous) = tag_lines.last_mut() {
            previous.push('\n');
            previous.push_str(&line);
        } else {
            description.push(line);
        }
    }

    DocCommentBlock {
        description: description.join("\n").trim().to_string(),
        tags: tag_lines.iter().map(|l| parse_tag(l)).collect(),
    }
}

/// Parse an optional comment; absent comments yield an empty block.
pub fn parse_opt(comment: Option<&str>) -> DocCommentBlock {
    comment.map(parse).unwrap_or_default()
}

// -- Line handling ------------------------------------------------------------

/// Strip delimiters and leading `*` markers; drop blank lines.
fn clean_lines(comment: &str) -> Vec<String> {
    let body = comment.trim();
    let body = body
        .strip_prefix("/**")
        .or_else(|| body.strip_prefix("/*"))
        .unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);

    if !body.contains('\n') {
        return split_inline_tags(body.trim_start_matches('*').trim());
    }

    body.lines()
        .map(|line| line.trim_start().trim_start_matches('*').trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// A one-line block may carry its tags inline; give each its own line.
fn split_inline_tags(line: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut start = 0;
    for caps in RE_INLINE_TAG.captures_iter(line) {
        if let Some(tag) = caps.get(1) {
            lines.push(line[start..tag.start()].trim().to_string());
            start = tag.start();
        }
    }
    lines.push(line[start..].trim().to_string());
    lines.retain(|l| !l.is_empty());
    lines
}

// -- Tag grammars -------------------------------------------------------------

fn parse_tag(line: &str) -> Tag {
    let (keyword, value) = match line.split_once(char::is_whitespace) {
        Some((k, v)) => (k, v.trim()),
        None => (line, ""),
    };

    match keyword {
        "@param" => {
            let (type_expr, name, description) = typed_named(value);
            Tag::Param(ParamTag {
                type_expr,
                name,
                description,
            })
        }
        "@return" => {
            let f = split_fields(value, 2);
            Tag::Return(ReturnTag {
                type_expr: types::normalize_opt(f.first().copied()),
                description: field(&f, 1),
            })
        }
        "@var" => {
            let f = split_fields(value, 2);
            // `@var Type $name description` is the inline-variable form
            let mut description = field(&f, 1);
            if description.starts_with('$') {
                description = split_fields(&description, 2)
                    .get(1)
                    .map(|s| s.to_string())
                    .unwrap_or_default();
            }
            Tag::Var(VarTag {
                type_expr: types::normalize_opt(f.first().copied()),
                description,
            })
        }
        "@property" | "@property-read" | "@property-write" => {
            let (type_expr, name, description) = typed_named(value);
            Tag::Property(PropertyTag {
                type_expr,
                name,
                description,
                read_only: keyword == "@property-read",
            })
        }
        "@throws" => {
            let f = split_fields(value, 2);
            Tag::Throws(field(&f, 0).trim_start_matches('\\').to_string())
        }
        "@example" => {
            let f = split_fields(value, 2);
            Tag::Example(ExampleRef {
                location: field(&f, 0),
                description: f.get(1).map(|s| s.to_string()),
            })
        }
        "@see" => {
            let f = split_fields(value, 2);
            Tag::See(SeeRef {
                location: field(&f, 0),
                description: f.get(1).map(|s| s.to_string()),
            })
        }
        "@internal" => Tag::Internal,
        "@event" => {
            let f = split_fields(value, 3);
            Tag::Event(EventTag {
                type_expr: types::normalize_opt(f.first().copied()),
                name: field(&f, 1),
                description: field(&f, 2),
            })
        }
        _ => Tag::Ignored,
    }
}

/// `<type> $<name> <description>`; a leading `$name` means the type was left out.
fn typed_named(value: &str) -> (Option<String>, String, String) {
    let f = split_fields(value, 3);
    if f.first().is_some_and(|s| is_variable(s)) {
        let f = split_fields(value, 2);
        return (None, variable_name(&field(&f, 0)), field(&f, 1));
    }
    (
        types::normalize_opt(f.first().copied()),
        variable_name(&field(&f, 1)),
        field(&f, 2),
    )
}

fn is_variable(s: &str) -> bool {
    s.trim_start_matches(['&', '.']).starts_with('$')
}

fn variable_name(s: &str) -> String {
    s.trim_start_matches(['&', '.']).trim_start_matches('$').to_string()
}

fn field(fields: &[&str], i: usize) -> String {
    fields.get(i).map(|s| s.to_string()).unwrap_or_default()
}

/// Split on whitespace runs into at most `n` fields; the last keeps the
/// remainder, line breaks included.
fn split_fields(value: &str, n: usize) -> Vec<&str> {
    let mut fields = Vec::with_capacity(n);
    let mut rest = value.trim();
    while fields.len() + 1 < n && !rest.is_empty() {
        match rest.find(char::is_whitespace) {
            Some(i) => {
                fields.push(&rest[..i]);
                rest = rest[i..].trim_start();
            }
            None => {
                fields.push(rest);
                rest = "";
            }
        }
    }
    if !rest.is_empty() {
        fields.push(rest);
    }
    fields
}

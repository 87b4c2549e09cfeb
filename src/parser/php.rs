//! Static PHP declaration scanner.
//!
//! Finds class, interface and trait declarations with their members without
//! running any code. The lexer only distinguishes what the scanner needs:
//! doc comments, identifiers (qualified names included), variables, strings,
//! numbers and punctuation. Everything else (comments, attributes, inline
//! text) is dropped, so braces inside strings never disturb nesting.

use crate::introspect::{
    ConstantSignature, MethodSignature, ParameterSignature, PropertySignature, TypeSignature,
};
use crate::model::{Literal, TypeKind, Visibility};
use std::collections::HashMap;

// -- Lexer --------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Doc,
    Ident,
    Var,
    Str,
    Num,
    Punct,
}

#[derive(Debug, Clone, Copy)]
struct Token<'a> {
    kind: Kind,
    text: &'a str,
    start: usize,
}

const MULTI_PUNCT: &[&str] = &["...", "?->", "::", "=>", "->", "??"];

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'\\' || b >= 0x80
}

fn is_ident_char(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

fn tokenize(src: &str) -> Vec<Token<'_>> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = src.find("<?php").map(|p| p + 5).unwrap_or(0);

    while i < bytes.len() {
        let b = bytes[i];

        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        // Close tag: statement end, then skip inline text until the next open tag
        if src[i..].starts_with("?>") {
            tokens.push(Token {
                kind: Kind::Punct,
                text: ";",
                start: i,
            });
            i = match src[i..].find("<?php") {
                Some(p) => i + p + 5,
                None => bytes.len(),
            };
            continue;
        }

        if src[i..].starts_with("#[") {
            i = skip_attribute(bytes, i + 2);
            continue;
        }

        if b == b'#' || src[i..].starts_with("//") {
            i = src[i..].find('\n').map(|p| i + p + 1).unwrap_or(bytes.len());
            continue;
        }

        if src[i..].starts_with("/*") {
            let end = src[i + 2..]
                .find("*/")
                .map(|p| i + 2 + p + 2)
                .unwrap_or(bytes.len());
            let text = &src[i..end];
            if text.starts_with("/**") && text != "/**/" {
                tokens.push(Token {
                    kind: Kind::Doc,
                    text,
                    start: i,
                });
            }
            i = end;
            continue;
        }

        if b == b'\'' || b == b'"' || b == b'`' {
            let end = skip_quoted(bytes, i);
            tokens.push(Token {
                kind: Kind::Str,
                text: &src[i..end],
                start: i,
            });
            i = end;
            continue;
        }

        if src[i..].starts_with("<<<") {
            if let Some(end) = skip_heredoc(src, i) {
                tokens.push(Token {
                    kind: Kind::Str,
                    text: &src[i..end],
                    start: i,
                });
                i = end;
                continue;
            }
        }

        if b == b'$' && i + 1 < bytes.len() && is_ident_start(bytes[i + 1]) && bytes[i + 1] != b'\\'
        {
            let mut end = i + 1;
            while end < bytes.len() && is_ident_char(bytes[end]) && bytes[end] != b'\\' {
                end += 1;
            }
            tokens.push(Token {
                kind: Kind::Var,
                text: &src[i..end],
                start: i,
            });
            i = end;
            continue;
        }

        if is_ident_start(b) {
            let mut end = i;
            while end < bytes.len() && is_ident_char(bytes[end]) {
                end += 1;
            }
            tokens.push(Token {
                kind: Kind::Ident,
                text: &src[i..end],
                start: i,
            });
            i = end;
            continue;
        }

        if b.is_ascii_digit() {
            let mut end = i;
            while end < bytes.len() && (bytes[end].is_ascii_alphanumeric() || bytes[end] == b'.' || bytes[end] == b'_')
            {
                end += 1;
            }
            tokens.push(Token {
                kind: Kind::Num,
                text: &src[i..end],
                start: i,
            });
            i = end;
            continue;
        }

        let len = MULTI_PUNCT
            .iter()
            .find(|p| src[i..].starts_with(**p))
            .map(|p| p.len())
            .unwrap_or(1);
        tokens.push(Token {
            kind: Kind::Punct,
            text: &src[i..i + len],
            start: i,
        });
        i += len;
    }

    tokens
}

/// Skip a quoted string starting at `start`; returns the index past its end.
fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            c if c == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Skip an attribute body (after `#[`), honoring nesting and strings.
fn skip_attribute(bytes: &[u8], mut i: usize) -> usize {
    let mut depth = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' | b'"' => {
                i = skip_quoted(bytes, i);
                continue;
            }
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

/// Heredoc / nowdoc: `<<<ID`, `<<<'ID'` or `<<<"ID"` up to the closing `ID`.
fn skip_heredoc(src: &str, start: usize) -> Option<usize> {
    let rest = &src[start + 3..];
    let header_end = rest.find('\n')?;
    let label = rest[..header_end].trim().trim_matches(|c| c == '\'' || c == '"');
    if label.is_empty() || !label.bytes().all(is_ident_char) {
        return None;
    }

    let mut offset = start + 3 + header_end + 1;
    for line in src[offset..].split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(after) = trimmed.strip_prefix(label) {
            if !after.bytes().next().is_some_and(is_ident_char) {
                let indent = line.len() - trimmed.len();
                return Some(offset + indent + label.len());
            }
        }
        offset += line.len();
    }
    Some(src.len())
}

// -- Parser -------------------------------------------------------------------

/// Names that are never resolved against the namespace.
const RESERVED_TYPES: &[&str] = &[
    "array", "bool", "callable", "false", "float", "int", "iterable", "mixed", "never", "null",
    "object", "parent", "resource", "self", "static", "string", "true", "void",
];

#[derive(Default)]
struct Modifiers {
    visibility: Option<Visibility>,
    is_static: bool,
    is_abstract: bool,
    is_final: bool,
    is_read_only: bool,
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    namespace: String,
    /// Lowercase alias → fully qualified name.
    imports: HashMap<String, String>,
    types: Vec<TypeSignature>,
}

/// Scan one source file and return every type declared in it, in order.
pub fn parse(src: &str) -> Vec<TypeSignature> {
    let mut parser = Parser {
        src,
        tokens: tokenize(src),
        pos: 0,
        namespace: String::new(),
        imports: HashMap::new(),
        types: Vec::new(),
    };
    parser.run();
    parser.types
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<Token<'a>> {
        self.tokens.get(self.pos + offset).copied()
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    /// Token before the one just consumed.
    fn before_current(&self) -> Option<Token<'a>> {
        self.pos.checked_sub(2).and_then(|i| self.tokens.get(i)).copied()
    }

    fn at_punct(&self, text: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == Kind::Punct && t.text == text)
    }

    fn eat_punct(&mut self, text: &str) -> bool {
        if self.at_punct(text) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_keyword(&self, word: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == Kind::Ident && t.text.eq_ignore_ascii_case(word))
    }

    /// Skip to the end of the current statement (`;`) or past a block.
    fn skip_statement(&mut self) {
        while let Some(tok) = self.next() {
            if tok.kind == Kind::Punct {
                match tok.text {
                    ";" => return,
                    "{" => {
                        self.skip_block();
                        return;
                    }
                    "}" => {
                        // belongs to the enclosing body
                        self.pos -= 1;
                        return;
                    }
                    _ => {}
                }
            }
        }
    }

    /// Skip a balanced block; the opening `{` is already consumed.
    fn skip_block(&mut self) {
        let mut depth = 1usize;
        while let Some(tok) = self.next() {
            if tok.kind != Kind::Punct {
                continue;
            }
            match tok.text {
                "{" => depth += 1,
                "}" => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    // -- Names ----------------------------------------------------------------

    fn qualify_declaration(&self, name: &str) -> String {
        if self.namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}\\{}", self.namespace, name)
        }
    }

    /// Resolve a name used in a structural position to its fully qualified form.
    fn resolve_name(&self, name: &str) -> String {
        if let Some(absolute) = name.strip_prefix('\\') {
            return absolute.to_string();
        }
        let lower = name.to_ascii_lowercase();
        if RESERVED_TYPES.contains(&lower.as_str()) {
            return lower;
        }
        if let Some(rest) = lower.strip_prefix("namespace\\") {
            let rest = &name[name.len() - rest.len()..];
            return self.qualify_declaration(rest);
        }
        let (first, remainder) = match name.split_once('\\') {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };
        if let Some(target) = self.imports.get(&first.to_ascii_lowercase()) {
            return match remainder {
                Some(rest) => format!("{}\\{}", target, rest),
                None => target.clone(),
            };
        }
        self.qualify_declaration(name)
    }

    // -- Top level ------------------------------------------------------------

    fn run(&mut self) {
        let mut doc: Option<&'a str> = None;
        let mut modifiers = Modifiers::default();

        while let Some(tok) = self.next() {
            match tok.kind {
                Kind::Doc => {
                    doc = Some(tok.text);
                    continue;
                }
                Kind::Ident => {
                    let word = tok.text.to_ascii_lowercase();
                    match word.as_str() {
                        "namespace" => self.parse_namespace(),
                        "use" => {
                            if self.peek().is_some_and(|t| t.kind == Kind::Ident) {
                                self.parse_imports();
                            }
                        }
                        "abstract" => {
                            modifiers.is_abstract = true;
                            continue;
                        }
                        "final" => {
                            modifiers.is_final = true;
                            continue;
                        }
                        "readonly" => {
                            modifiers.is_read_only = true;
                            continue;
                        }
                        "class" | "interface" | "trait" if self.starts_declaration() => {
                            let kind = match word.as_str() {
                                "interface" => TypeKind::Interface,
                                "trait" => TypeKind::Trait,
                                _ => TypeKind::Class,
                            };
                            self.parse_type(kind, doc.take(), &modifiers);
                        }
                        "enum" if self.starts_declaration() => self.skip_statement(),
                        "function" => self.skip_statement(),
                        _ => {}
                    }
                }
                _ => {}
            }
            doc = None;
            modifiers = Modifiers::default();
        }
    }

    /// `class` / `interface` / `trait` keyword that really opens a declaration
    /// (not `Foo::class` nor `new class`).
    fn starts_declaration(&self) -> bool {
        let after_ok = self.peek().is_some_and(|t| t.kind == Kind::Ident);
        let before_ok = !self.before_current().is_some_and(|t| {
            (t.kind == Kind::Punct && matches!(t.text, "::" | "->" | "?->"))
                || (t.kind == Kind::Ident && t.text.eq_ignore_ascii_case("new"))
        });
        after_ok && before_ok
    }

    fn parse_namespace(&mut self) {
        self.namespace = match self.peek() {
            Some(t) if t.kind == Kind::Ident => {
                self.pos += 1;
                t.text.trim_matches('\\').to_string()
            }
            _ => String::new(),
        };
        self.imports.clear();
        // `;` or the opening brace of a braced namespace; the block body is
        // scanned like top-level code.
        if !self.eat_punct(";") {
            self.eat_punct("{");
        }
    }

    fn parse_imports(&mut self) {
        if self.at_keyword("function") || self.at_keyword("const") {
            self.skip_statement();
            return;
        }
        loop {
            let Some(name) = self.next().filter(|t| t.kind == Kind::Ident) else {
                self.skip_statement();
                return;
            };
            if self.eat_punct("{") {
                let prefix = name.text.trim_matches('\\');
                while let Some(item) = self.next() {
                    match item.kind {
                        Kind::Ident => {
                            let full = format!("{}\\{}", prefix, item.text.trim_matches('\\'));
                            let alias = self.parse_alias();
                            self.add_import(&full, alias);
                        }
                        Kind::Punct if item.text == "}" => break,
                        _ => {}
                    }
                }
            } else {
                let alias = self.parse_alias();
                self.add_import(name.text, alias);
            }
            if self.eat_punct(",") {
                continue;
            }
            self.eat_punct(";");
            return;
        }
    }

    fn parse_alias(&mut self) -> Option<&'a str> {
        if self.at_keyword("as") {
            self.pos += 1;
            return self.next().filter(|t| t.kind == Kind::Ident).map(|t| t.text);
        }
        None
    }

    fn add_import(&mut self, name: &str, alias: Option<&str>) {
        let full = name.trim_start_matches('\\').to_string();
        let alias = alias
            .unwrap_or_else(|| full.rsplit('\\').next().unwrap_or(&full))
            .to_ascii_lowercase();
        self.imports.insert(alias, full);
    }

    // -- Declarations ---------------------------------------------------------

    fn parse_type(&mut self, kind: TypeKind, doc: Option<&'a str>, modifiers: &Modifiers) {
        let Some(name) = self.next() else { return };
        let mut sig = TypeSignature::new(self.qualify_declaration(name.text), kind);
        sig.doc_comment = doc.map(str::to_string);
        sig.is_abstract = modifiers.is_abstract;
        sig.is_final = modifiers.is_final;
        sig.is_read_only = modifiers.is_read_only;

        let mut clause: Option<&str> = None;
        while let Some(tok) = self.next() {
            match (tok.kind, tok.text) {
                (Kind::Punct, "{") => break,
                (Kind::Punct, ";") => return,
                (Kind::Ident, word) if word.eq_ignore_ascii_case("extends") => {
                    clause = Some("extends")
                }
                (Kind::Ident, word) if word.eq_ignore_ascii_case("implements") => {
                    clause = Some("implements")
                }
                (Kind::Ident, word) => {
                    let resolved = self.resolve_name(word);
                    match (clause, kind) {
                        (Some("extends"), TypeKind::Class) => sig.parent = Some(resolved),
                        (Some(_), _) => sig.interfaces.push(resolved),
                        (None, _) => {}
                    }
                }
                _ => {}
            }
        }

        self.parse_body(&mut sig);
        self.types.push(sig);
    }

    fn parse_body(&mut self, sig: &mut TypeSignature) {
        let mut doc: Option<&'a str> = None;
        let mut mods = Modifiers::default();

        while let Some(tok) = self.next() {
            match tok.kind {
                Kind::Punct => match tok.text {
                    "}" => return,
                    "{" => self.skip_block(),
                    "?" | "(" => {
                        self.pos -= 1;
                        self.parse_properties(sig, doc.take(), &mods);
                    }
                    _ => {}
                },
                Kind::Doc => {
                    doc = Some(tok.text);
                    continue;
                }
                Kind::Var => {
                    self.pos -= 1;
                    self.parse_properties(sig, doc.take(), &mods);
                }
                Kind::Ident => {
                    let word = tok.text.to_ascii_lowercase();
                    match word.as_str() {
                        "public" => mods.visibility = Some(Visibility::Public),
                        "protected" => mods.visibility = Some(Visibility::Protected),
                        "private" => mods.visibility = Some(Visibility::Private),
                        "var" => mods.visibility = Some(Visibility::Public),
                        "static" => mods.is_static = true,
                        "abstract" => mods.is_abstract = true,
                        "final" => mods.is_final = true,
                        "readonly" => mods.is_read_only = true,
                        _ => {}
                    }
                    match word.as_str() {
                        "public" | "protected" | "private" | "var" | "static" | "abstract"
                        | "final" | "readonly" => continue,
                        "use" => self.parse_trait_uses(sig),
                        "const" => self.parse_constants(sig, doc.take(), &mods),
                        "function" => self.parse_method(sig, doc.take(), &mods),
                        "case" => self.skip_statement(),
                        _ => {
                            self.pos -= 1;
                            self.parse_properties(sig, doc.take(), &mods);
                        }
                    }
                }
                Kind::Str | Kind::Num => {}
            }
            doc = None;
            mods = Modifiers::default();
        }
    }

    fn parse_trait_uses(&mut self, sig: &mut TypeSignature) {
        while let Some(tok) = self.next() {
            match (tok.kind, tok.text) {
                (Kind::Ident, name) => sig.traits.push(self.resolve_name(name)),
                (Kind::Punct, ";") => return,
                (Kind::Punct, "{") => {
                    self.skip_block();
                    return;
                }
                (Kind::Punct, "}") => {
                    self.pos -= 1;
                    return;
                }
                _ => {}
            }
        }
    }

    fn parse_constants(&mut self, sig: &mut TypeSignature, doc: Option<&'a str>, mods: &Modifiers) {
        loop {
            let mut idents: Vec<&'a str> = Vec::new();
            while let Some(tok) = self.peek() {
                if tok.kind == Kind::Punct && tok.text == "=" {
                    break;
                }
                if tok.kind == Kind::Punct && matches!(tok.text, ";" | "}") {
                    return;
                }
                if tok.kind == Kind::Ident {
                    idents.push(tok.text);
                }
                self.pos += 1;
            }
            if !self.eat_punct("=") {
                return;
            }
            let value = self.parse_expression(&[",", ";"]);
            if let Some(name) = idents.last() {
                let type_hint = if idents.len() > 1 {
                    Some(self.resolve_name(idents[0]))
                } else {
                    None
                };
                sig.constants.push(ConstantSignature {
                    name: name.to_string(),
                    visibility: mods.visibility.unwrap_or_default(),
                    type_hint,
                    value,
                    doc_comment: doc.map(str::to_string),
                });
            }
            if !self.eat_punct(",") {
                self.eat_punct(";");
                return;
            }
        }
    }

    fn parse_properties(&mut self, sig: &mut TypeSignature, doc: Option<&'a str>, mods: &Modifiers) {
        let type_hint = self.parse_type_hint();
        loop {
            let Some(var) = self.peek().filter(|t| t.kind == Kind::Var) else {
                self.skip_statement();
                return;
            };
            self.pos += 1;
            let default = if self.eat_punct("=") {
                self.parse_expression(&[",", ";"])
            } else {
                None
            };
            sig.properties.push(PropertySignature {
                name: var.text[1..].to_string(),
                visibility: mods.visibility.unwrap_or_default(),
                is_static: mods.is_static,
                is_read_only: mods.is_read_only || sig.is_read_only,
                type_hint: type_hint.clone(),
                default,
                doc_comment: doc.map(str::to_string),
            });
            if !self.eat_punct(",") {
                if !self.eat_punct(";") {
                    // property hooks or garbage
                    self.skip_statement();
                }
                return;
            }
        }
    }

    fn parse_method(&mut self, sig: &mut TypeSignature, doc: Option<&'a str>, mods: &Modifiers) {
        self.eat_punct("&");
        let Some(name) = self.next().filter(|t| t.kind == Kind::Ident) else {
            self.skip_statement();
            return;
        };
        if !self.eat_punct("(") {
            self.skip_statement();
            return;
        }
        let parameters = self.parse_parameters();
        let return_hint = if self.eat_punct(":") {
            self.parse_type_hint()
        } else {
            None
        };
        // body, or `;` for abstract and interface methods
        while let Some(tok) = self.next() {
            if tok.kind == Kind::Punct {
                match tok.text {
                    ";" => break,
                    "{" => {
                        self.skip_block();
                        break;
                    }
                    "}" => {
                        self.pos -= 1;
                        break;
                    }
                    _ => {}
                }
            }
        }

        let is_interface = sig.kind == TypeKind::Interface;
        for param in parameters.iter().filter(|p| p.promoted.is_some()) {
            sig.properties.push(PropertySignature {
                name: param.name.clone(),
                visibility: param.promoted.unwrap_or_default(),
                is_static: false,
                is_read_only: param.is_read_only || sig.is_read_only,
                type_hint: param.type_hint.clone(),
                default: None,
                doc_comment: None,
            });
        }
        sig.methods.push(MethodSignature {
            name: name.text.to_string(),
            visibility: mods.visibility.unwrap_or_default(),
            is_static: mods.is_static,
            is_abstract: mods.is_abstract || is_interface,
            is_final: mods.is_final,
            parameters,
            return_hint,
            doc_comment: doc.map(str::to_string),
        });
    }

    /// Parameter list; the opening `(` is already consumed.
    fn parse_parameters(&mut self) -> Vec<ParameterSignature> {
        let mut params = Vec::new();
        loop {
            if self.eat_punct(")") || self.peek().is_none() {
                return params;
            }
            let mut param = ParameterSignature::default();
            while let Some(tok) = self.peek().filter(|t| t.kind == Kind::Ident) {
                match tok.text.to_ascii_lowercase().as_str() {
                    "public" => param.promoted = Some(Visibility::Public),
                    "protected" => param.promoted = Some(Visibility::Protected),
                    "private" => param.promoted = Some(Visibility::Private),
                    "readonly" => {
                        param.is_read_only = true;
                        param.promoted.get_or_insert(Visibility::Public);
                    }
                    _ => break,
                }
                self.pos += 1;
            }
            param.type_hint = self.parse_type_hint();
            param.is_by_ref = self.eat_punct("&");
            param.is_variadic = self.eat_punct("...");
            match self.peek() {
                Some(t) if t.kind == Kind::Var => {
                    self.pos += 1;
                    param.name = t.text[1..].to_string();
                    if self.eat_punct("=") {
                        param.default = self.parse_expression(&[",", ")"]);
                    }
                    params.push(param);
                }
                _ => {
                    // unparseable parameter: drop it, resynchronize on `,` or `)`
                    self.parse_expression(&[",", ")"]);
                }
            }
            if !self.eat_punct(",") {
                self.eat_punct(")");
                return params;
            }
        }
    }

    /// Type hint made of names, `?`, `|`, `&` and DNF parentheses.
    fn parse_type_hint(&mut self) -> Option<String> {
        let mut out = String::new();
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            match tok.kind {
                Kind::Ident => {
                    out.push_str(&self.resolve_name(tok.text));
                }
                Kind::Punct => match tok.text {
                    "?" | "|" => out.push_str(tok.text),
                    "(" if out.is_empty() || out.ends_with('|') => {
                        depth += 1;
                        out.push('(');
                    }
                    ")" if depth > 0 => {
                        depth -= 1;
                        out.push(')');
                    }
                    "&" if self.peek_at(1).is_some_and(|t| {
                        t.kind == Kind::Ident || (t.kind == Kind::Punct && t.text == "(")
                    }) =>
                    {
                        out.push('&')
                    }
                    _ => break,
                },
                _ => break,
            }
            self.pos += 1;
        }
        if out.is_empty() {
            None
        } else {
            Some(out)
        }
    }

    /// Expression up to a terminator at nesting depth zero (terminator not consumed).
    fn parse_expression(&mut self, terminators: &[&str]) -> Option<Literal> {
        let first = self.pos;
        let mut depth = 0usize;
        while let Some(tok) = self.peek() {
            if tok.kind == Kind::Punct {
                match tok.text {
                    "(" | "[" | "{" => depth += 1,
                    ")" | "]" | "}" if depth > 0 => depth -= 1,
                    t if depth == 0 && (terminators.contains(&t) || t == ";" || t == "}") => {
                        break
                    }
                    _ => {}
                }
            }
            self.pos += 1;
        }
        let tokens = &self.tokens[first..self.pos];
        literal(self.src, tokens)
    }
}

// -- Literals -----------------------------------------------------------------

fn literal(src: &str, tokens: &[Token<'_>]) -> Option<Literal> {
    let (first, last) = (tokens.first()?, tokens.last()?);
    let raw = src[first.start..last.start + last.text.len()].trim();

    match tokens {
        [tok] if tok.kind == Kind::Ident => Some(match tok.text.to_ascii_lowercase().as_str() {
            "null" => Literal::Null,
            "true" => Literal::Bool(true),
            "false" => Literal::Bool(false),
            _ => Literal::Expr(raw.to_string()),
        }),
        [tok] if tok.kind == Kind::Num => Some(number(tok.text)),
        [sign, tok] if sign.text == "-" && tok.kind == Kind::Num => Some(match number(tok.text) {
            Literal::Float(_) => Literal::Float(raw.to_string()),
            _ => Literal::Int(raw.to_string()),
        }),
        [tok] if tok.kind == Kind::Str => Some(string(tok.text)),
        _ if first.text == "[" || first.text.eq_ignore_ascii_case("array") => {
            Some(Literal::Array(raw.to_string()))
        }
        _ => Some(Literal::Expr(raw.to_string())),
    }
}

fn number(text: &str) -> Literal {
    let lower = text.to_ascii_lowercase();
    let is_prefixed = lower.starts_with("0x") || lower.starts_with("0b") || lower.starts_with("0o");
    if !is_prefixed && (lower.contains('.') || lower.contains('e')) {
        Literal::Float(text.to_string())
    } else {
        Literal::Int(text.to_string())
    }
}

fn string(text: &str) -> Literal {
    if let Some(inner) = text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
        return Literal::Str(inner.replace("\\'", "'").replace("\\\\", "\\"));
    }
    if let Some(inner) = text.strip_prefix('"').and_then(|t| t.strip_suffix('"')) {
        if !inner.contains('$') {
            return Literal::Str(
                inner
                    .replace("\\\"", "\"")
                    .replace("\\n", "\n")
                    .replace("\\t", "\t")
                    .replace("\\\\", "\\"),
            );
        }
    }
    Literal::Expr(text.to_string())
}

//! Markdown renderer.
//!
//! Headings mark sections, `#####` headings mark list items, and item
//! descriptions are indented with non-breaking spaces so they stay visually
//! attached to their heading.

use crate::render::Renderer;
use crate::xref::Link;

pub struct MarkdownRenderer;

const INDENT: &str = "&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;";

impl Renderer for MarkdownRenderer {
    fn file_extension(&self) -> &'static str {
        "md"
    }

    fn text(&self, text: &str) -> String {
        text.to_string()
    }

    fn link(&self, link: &Link) -> String {
        match &link.href {
            Some(href) => format!("[{}]({})", link.text, href),
            None => link.text.clone(),
        }
    }

    fn title(&self, _class: &str, markup: &str) -> String {
        format!("# {}\n\n", markup)
    }

    fn description(&self, _class: &str, markup: &str) -> String {
        format!("{}\n\n", markup)
    }

    fn code_block(&self, _class: &str, code: &str) -> String {
        format!("```php\n{}\n```\n\n", code)
    }

    fn section(&self, _class: &str, title: &str, content: &str, level: usize) -> String {
        if content.is_empty() {
            return String::new();
        }
        format!("{}## {}\n\n{}", "#".repeat(level), title, content)
    }

    fn item(&self, _class: &str, markup: &str, description: &str) -> String {
        let mut out = format!("##### {}\n\n", markup);
        if !description.is_empty() {
            out.push_str(&format!("{}{}\n\n", INDENT, description));
        }
        out
    }

    fn example(&self, _class: &str, title: &str, code: &str, location: &str) -> String {
        format!(
            "**{}**\n\n```php\n{}\n```\n\nLocation: ~{}\n\n",
            title, code, location
        )
    }

    fn returns(&self, _class: &str, description: &str) -> String {
        format!("## Returns\n\n{}{}\n\n", INDENT, description)
    }

    fn details(&self, _class: &str, owner: Option<&str>, location: Option<&str>) -> String {
        let mut out = String::from("## Details\n\n");
        if let Some(owner) = owner {
            out.push_str(&format!("Class: {}\n\n", owner));
        }
        if let Some(location) = location {
            out.push_str(&format!("Location: ~{}\n\n", location));
        }
        out.push_str("---\n\n[back to index](index.md)\n\n");
        out
    }

    fn index(&self, content: &str) -> String {
        format!("## Classes\n\n{}", content)
    }

    fn index_entry(&self, markup: &str, description: &str) -> String {
        let mut out = format!("### {}\n\n", markup);
        if !description.is_empty() {
            out.push_str(&format!("{}{}\n\n", INDENT, description));
        }
        out
    }

    fn document(&self, _title: &str, content: &str) -> String {
        content.to_string()
    }
}

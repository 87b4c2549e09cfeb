//! HTML renderer: minimal standalone pages built from classed `div`s.
//!
//! Every block carries a `page-*` class so the output can be styled or
//! scraped without relying on element structure.

use crate::render::Renderer;
use crate::xref::Link;

pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn file_extension(&self) -> &'static str {
        "html"
    }

    fn text(&self, text: &str) -> String {
        html_escape(text)
    }

    fn link(&self, link: &Link) -> String {
        match &link.href {
            Some(href) => format!("<a href=\"{}\">{}</a>", html_escape(href), html_escape(&link.text)),
            None => html_escape(&link.text),
        }
    }

    fn title(&self, class: &str, markup: &str) -> String {
        format!("<div class=\"{}\">{}</div>\n", class, markup)
    }

    fn description(&self, class: &str, markup: &str) -> String {
        format!("<div class=\"{}\">{}</div>\n", class, markup)
    }

    fn code_block(&self, class: &str, code: &str) -> String {
        format!("<div class=\"{}\"><pre>{}</pre></div>\n", class, html_escape(code))
    }

    fn section(&self, class: &str, title: &str, content: &str, _level: usize) -> String {
        if content.is_empty() {
            return String::new();
        }
        format!(
            "<div class=\"{c}\"><div class=\"{c}-title\">{}</div><div class=\"{c}-content\">{}</div></div>\n",
            title,
            content,
            c = class
        )
    }

    fn item(&self, class: &str, markup: &str, description: &str) -> String {
        let mut out = format!("<div class=\"{c}\"><div class=\"{c}-name\">{}</div>", markup, c = class);
        if !description.is_empty() {
            out.push_str(&format!("<div class=\"{}-description\">{}</div>", class, description));
        }
        out.push_str("</div>");
        out
    }

    fn example(&self, class: &str, title: &str, code: &str, location: &str) -> String {
        format!(
            "<div class=\"{c}\"><div class=\"{c}-title\">{}</div><div class=\"{c}-content\"><pre>{}</pre></div><div class=\"{c}-location\">Location: ~{}</div></div>",
            title,
            html_escape(code),
            html_escape(location),
            c = class
        )
    }

    fn returns(&self, class: &str, description: &str) -> String {
        format!(
            "<div class=\"{c}\"><div class=\"{c}-title\">Returns</div><div class=\"{c}-description\">{}</div></div>\n",
            description,
            c = class
        )
    }

    fn details(&self, class: &str, owner: Option<&str>, location: Option<&str>) -> String {
        let mut out = format!("<div class=\"{c}\"><div class=\"{c}-title\">Details</div>", c = class);
        if let Some(owner) = owner {
            out.push_str(&format!("<div class=\"{}-class\">Class: {}</div>", class, owner));
        }
        if let Some(location) = location {
            out.push_str(&format!(
                "<div class=\"{}-location\">Location: ~{}</div>",
                class,
                html_escape(location)
            ));
        }
        out.push_str(&format!(
            "<div class=\"{}-back-to-index\"><a href=\"index.html\">back to index</a></div></div>\n",
            class
        ));
        out
    }

    fn index(&self, content: &str) -> String {
        format!(
            "<div class=\"page-index-classes\"><div class=\"page-index-classes-title\">Classes</div>{}</div>\n",
            content
        )
    }

    fn index_entry(&self, markup: &str, description: &str) -> String {
        let mut out = format!("<div class=\"page-index-class\"><div class=\"page-index-class-name\">{}</div>", markup);
        if !description.is_empty() {
            out.push_str(&format!("<div class=\"page-index-class-description\">{}</div>", description));
        }
        out.push_str("</div>");
        out
    }

    fn document(&self, title: &str, content: &str) -> String {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        out.push_str(&format!("<title>{}</title>\n", html_escape(title)));
        out.push_str("</head>\n<body>\n");
        out.push_str(content);
        out.push_str("</body>\n</html>\n");
        out
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_text_and_links() {
        let r = HtmlRenderer;
        assert_eq!(r.text("array<int, string> & \"x\""), "array&lt;int, string&gt; &amp; &quot;x&quot;");
        assert_eq!(
            r.link(&Link::to("A<B>", "a.class.html")),
            "<a href=\"a.class.html\">A&lt;B&gt;</a>"
        );
    }

    #[test]
    fn list_item_classes() {
        let r = HtmlRenderer;
        assert_eq!(
            r.item("page-class-method", "run", "Runs."),
            "<div class=\"page-class-method\"><div class=\"page-class-method-name\">run</div><div class=\"page-class-method-description\">Runs.</div></div>"
        );
        assert_eq!(r.section("page-class-methods", "Methods", "", 0), "");
    }

    #[test]
    fn document_shell() {
        let out = HtmlRenderer.document("Acme\\Widget", "<div>x</div>");
        assert!(out.starts_with("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Acme\\Widget</title>"));
        assert!(out.ends_with("</body>\n</html>\n"));
    }

    #[test]
    fn example_content_is_escaped() {
        let out = HtmlRenderer.example("page-class-example", "Example #1", "<?php echo 1;", "/ex/a.php");
        assert!(out.contains("<pre>&lt;?php echo 1;</pre>"));
        assert!(out.contains("<div class=\"page-class-example-location\">Location: ~/ex/a.php</div>"));
    }
}

//! Renderer module: trait-based format dispatch and page assembly.
//!
//! A [`Renderer`] only knows its syntax. [`Site`] walks the model and decides
//! what goes on each page, so both formats carry the same information.

pub mod html;
pub mod markdown;
pub mod synopsis;

use crate::config::{Format, VisibilityFilter};
use crate::introspect::source::display_location;
use crate::model::*;
use crate::xref::{self, CrossReferenceResolver, Link};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

/// Output syntax. Arguments named `markup` or `content` are already
/// rendered; `text` and `code` arguments are raw and escaped here.
pub trait Renderer {
    fn file_extension(&self) -> &'static str;
    fn text(&self, text: &str) -> String;
    fn link(&self, link: &Link) -> String;
    fn title(&self, class: &str, markup: &str) -> String;
    fn description(&self, class: &str, markup: &str) -> String;
    fn code_block(&self, class: &str, code: &str) -> String;
    /// Titled section; `level` nests it under the enclosing one. Empty
    /// content renders nothing.
    fn section(&self, class: &str, title: &str, content: &str, level: usize) -> String;
    fn item(&self, class: &str, markup: &str, description: &str) -> String;
    fn example(&self, class: &str, title: &str, code: &str, location: &str) -> String;
    fn returns(&self, class: &str, description: &str) -> String;
    fn details(&self, class: &str, owner: Option<&str>, location: Option<&str>) -> String;
    fn index(&self, content: &str) -> String;
    fn index_entry(&self, markup: &str, description: &str) -> String;
    /// Wrap a finished page body.
    fn document(&self, title: &str, content: &str) -> String;
}

/// Create a renderer for the given format.
pub fn create_renderer(format: Format) -> Box<dyn Renderer> {
    match format {
        Format::Markdown => Box::new(markdown::MarkdownRenderer),
        Format::Html => Box::new(html::HtmlRenderer),
    }
}

/// One output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub file_name: String,
    pub content: String,
}

// -- Examples -----------------------------------------------------------------

/// Example search roots, tried in configured order.
pub struct ExampleRoots {
    dirs: Vec<PathBuf>,
    project_dir: PathBuf,
}

/// An `@example` whose file was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedExample {
    pub description: Option<String>,
    pub content: String,
    /// Project-relative display path.
    pub location: String,
}

impl ExampleRoots {
    pub fn new(dirs: Vec<PathBuf>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            dirs,
            project_dir: project_dir.into(),
        }
    }

    /// First existing file wins; missing examples are dropped.
    pub fn resolve(&self, example: &ExampleRef) -> Option<ResolvedExample> {
        let relative = example.location.trim_start_matches(['/', '\\']);
        if relative.is_empty() {
            return None;
        }
        for dir in &self.dirs {
            let path = dir.join(relative);
            if !path.is_file() {
                continue;
            }
            match fs::read_to_string(&path) {
                Ok(content) => {
                    return Some(ResolvedExample {
                        description: example.description.clone(),
                        content: content.trim_end_matches(['\n', '\r']).to_string(),
                        location: display_location(&path, &self.project_dir),
                    })
                }
                Err(e) => tracing::debug!("unreadable example {}: {}", path.display(), e),
            }
        }
        tracing::debug!("example not found: {}", example.location);
        None
    }
}

// -- Site ---------------------------------------------------------------------

pub struct Site<'a> {
    renderer: &'a dyn Renderer,
    resolver: &'a CrossReferenceResolver<'a>,
    examples: &'a ExampleRoots,
}

impl<'a> Site<'a> {
    pub fn new(renderer: &'a dyn Renderer, resolver: &'a CrossReferenceResolver<'a>, examples: &'a ExampleRoots) -> Self {
        Self {
            renderer,
            resolver,
            examples,
        }
    }

    fn ext(&self) -> &'static str {
        self.renderer.file_extension()
    }

    fn filter(&self) -> &VisibilityFilter {
        self.resolver.filter()
    }

    /// Every page for `types`: each type page followed by its method pages,
    /// in name order, then the index.
    pub fn pages(&self, types: &[Rc<TypeDescriptor>]) -> Vec<Page> {
        let mut sorted: Vec<&Rc<TypeDescriptor>> = types.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));

        let mut pages = Vec::new();
        for desc in &sorted {
            pages.push(Page {
                file_name: xref::type_page(&desc.name, self.ext()),
                content: self.type_page(desc),
            });
            for method in desc.methods.iter().filter(|m| xref::has_method_page(desc, m, self.filter())) {
                pages.push(Page {
                    file_name: xref::method_page(&desc.name, &method.name, self.ext()),
                    content: self.method_page(desc, method),
                });
            }
        }
        pages.push(Page {
            file_name: format!("index.{}", self.ext()),
            content: self.index_page(&sorted),
        });
        pages
    }

    pub fn index_page(&self, types: &[&Rc<TypeDescriptor>]) -> String {
        let r = self.renderer;
        let entries: String = types
            .iter()
            .map(|desc| {
                let link = Link::to(&desc.name, xref::type_page(&desc.name, self.ext()));
                r.index_entry(&r.link(&link), &r.text(&desc.description))
            })
            .collect();
        r.document("Index", &r.index(&entries))
    }

    pub fn type_page(&self, desc: &TypeDescriptor) -> String {
        let r = self.renderer;
        let filter = *self.filter();
        let mut out = String::new();

        out.push_str(&r.title("page-class-name", &r.text(&desc.name)));
        if !desc.description.is_empty() {
            out.push_str(&r.description("page-class-description", &r.text(&desc.description)));
        }
        out.push_str(&r.code_block(
            "page-class-synopsis",
            &synopsis::type_synopsis(self.resolver, desc, &filter),
        ));

        // Extends
        let extends = match &desc.parent {
            Some(parent) if desc.kind != TypeKind::Interface => {
                r.item("page-class-extends-class", &self.type_link(parent), &self.type_description(parent))
            }
            _ => String::new(),
        };
        out.push_str(&r.section("page-class-extends", "Extends", &extends, 0));

        // Implements
        let implements: String = desc
            .interfaces
            .iter()
            .map(|iface| {
                r.item("page-class-implements-interface", &self.type_link(iface), &self.type_description(iface))
            })
            .collect();
        out.push_str(&r.section("page-class-implements", "Implements", &implements, 0));

        // Constants
        let constants = self.grouped(
            desc,
            desc.constants
                .iter()
                .filter(|c| !c.overridden && filter.allows(c.visibility)),
            |c| {
                r.item(
                    "page-class-constant",
                    &self.rich(&synopsis::constant(self.resolver, c)),
                    &r.text(&c.description),
                )
            },
            "page-class-inherited-constants",
        );
        out.push_str(&r.section("page-class-constants", "Constants", &constants, 0));

        // Properties
        let properties = self.grouped(
            desc,
            desc.properties
                .iter()
                .filter(|p| !p.overridden && filter.allows(p.visibility)),
            |p| {
                r.item(
                    "page-class-property",
                    &self.rich(&synopsis::property(self.resolver, p)),
                    &r.text(&p.description),
                )
            },
            "page-class-inherited-properties",
        );
        out.push_str(&r.section("page-class-properties", "Properties", &properties, 0));

        // Methods
        let methods = self.grouped(
            desc,
            desc.methods.iter().filter(|m| synopsis::is_listed(m, &filter)),
            |m| {
                r.item(
                    "page-class-method",
                    &self.rich(&synopsis::method(self.resolver, m)),
                    &r.text(&m.description),
                )
            },
            "page-class-inherited-methods",
        );
        out.push_str(&r.section("page-class-methods", "Methods", &methods, 0));

        // Events
        let events: String = desc
            .events
            .iter()
            .map(|e| {
                r.item(
                    "page-class-event",
                    &self.rich(&synopsis::event(self.resolver, e)),
                    &r.text(&e.description),
                )
            })
            .collect();
        out.push_str(&r.section("page-class-events", "Events", &events, 0));

        out.push_str(&self.examples_section("page-class", &desc.examples));
        out.push_str(&self.see_section("page-class", &desc.see));
        out.push_str(&r.details("page-class-details", None, desc.location.as_deref()));

        r.document(&desc.name, &out)
    }

    pub fn method_page(&self, desc: &TypeDescriptor, method: &MethodDescriptor) -> String {
        let r = self.renderer;
        let mut out = String::new();
        let page_name = format!("{}::{}", desc.name, method.name);

        out.push_str(&r.title("page-method-name", &r.text(&page_name)));
        if !method.description.is_empty() {
            out.push_str(&r.description("page-method-description", &r.text(&method.description)));
        }
        out.push_str(&r.code_block(
            "page-method-synopsis",
            &synopsis::plain(&synopsis::method(self.resolver, method)),
        ));

        let parameters: String = method
            .parameters
            .iter()
            .map(|p| r.item("page-method-parameter", &r.text(&p.name), &r.text(&p.description)))
            .collect();
        out.push_str(&r.section("page-method-parameters", "Parameters", &parameters, 0));

        if !method.is_constructor() && !method.returns.description.is_empty() {
            out.push_str(&r.returns("page-method-returns", &r.text(&method.returns.description)));
        }

        let throws: String = method
            .throws
            .iter()
            .map(|name| r.item("page-method-throw", &self.type_link(name), &self.type_description(name)))
            .collect();
        out.push_str(&r.section("page-method-throws", "Throws", &throws, 0));

        out.push_str(&self.examples_section("page-method", &method.examples));
        out.push_str(&self.see_section("page-method", &method.see));

        let owner = r.link(&Link::to(&desc.name, xref::type_page(&desc.name, self.ext())));
        out.push_str(&r.details("page-method-details", Some(&owner), desc.location.as_deref()));

        r.document(&page_name, &out)
    }

    // -- Pieces ---------------------------------------------------------------

    fn rich(&self, pieces: &[Link]) -> String {
        pieces.iter().map(|p| self.renderer.link(p)).collect()
    }

    fn type_link(&self, name: &str) -> String {
        self.renderer.link(&self.resolver.type_link(name))
    }

    fn type_description(&self, name: &str) -> String {
        self.resolver
            .describe(name)
            .filter(|d| !d.is_internal)
            .map(|d| self.renderer.text(&d.description))
            .unwrap_or_default()
    }

    /// Members declared here first, then one nested section per ancestor,
    /// ordered by the ancestor's name.
    fn grouped<'m, M: Member + 'm>(
        &self,
        desc: &TypeDescriptor,
        members: impl Iterator<Item = &'m M>,
        item: impl Fn(&M) -> String,
        inherited_class: &str,
    ) -> String {
        let mut own = String::new();
        let mut inherited: BTreeMap<&str, String> = BTreeMap::new();
        for member in members {
            if member.declared_in() == desc.name {
                own.push_str(&item(member));
            } else {
                inherited
                    .entry(member.declared_in())
                    .or_default()
                    .push_str(&item(member));
            }
        }
        for (ancestor, content) in inherited {
            let title = format!("Inherited from {}", self.type_link(ancestor));
            own.push_str(&self.renderer.section(inherited_class, &title, &content, 1));
        }
        own
    }

    fn examples_section(&self, prefix: &str, examples: &[ExampleRef]) -> String {
        let r = self.renderer;
        let content: String = examples
            .iter()
            .filter_map(|e| self.examples.resolve(e))
            .enumerate()
            .map(|(i, example)| {
                let title = match example.description.as_deref() {
                    Some(d) if !d.is_empty() => format!("Example #{} {}", i + 1, d),
                    _ => format!("Example #{}", i + 1),
                };
                r.example(
                    &format!("{}-example", prefix),
                    &r.text(&title),
                    &example.content,
                    &example.location,
                )
            })
            .collect();
        r.section(&format!("{}-examples", prefix), "Examples", &content, 0)
    }

    fn see_section(&self, prefix: &str, see: &[SeeRef]) -> String {
        let r = self.renderer;
        let content: String = see
            .iter()
            .map(|s| {
                let entry = self.resolver.see(s);
                r.item(&format!("{}-see", prefix), &r.link(&entry.link), &r.text(&entry.description))
            })
            .collect();
        r.section(&format!("{}-see-also", prefix), "See also", &content, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TypeModelBuilder;
    use crate::introspect::platform::PlatformTypes;
    use crate::introspect::source::SourceIndex;
    use crate::introspect::Introspectors;
    use tempfile::TempDir;

    const SOURCES: &[&str] = &[
        r#"<?php
namespace Acme;
/** Base of everything. */
class Base {
    /** Base limit. */
    const LIMIT = 5;
    /** Shared helper. */
    public function help() {}
    /** Tag. */
    public $tag;
}
"#,
        r#"<?php
namespace Acme;
/**
 * A widget.
 * @see Acme\Base
 * @see Missing::thing() Not here
 */
class Widget extends Base {
    /** Size limit. */
    const MAX = 10;
    /**
     * Resize.
     * @param int $width New width
     * @return bool Whether it changed
     * @throws \InvalidArgumentException
     */
    public function resize($width) {}
    private function secret() {}
}
"#,
    ];

    fn introspectors() -> Introspectors {
        let mut local = SourceIndex::new();
        for src in SOURCES {
            local.add_source(src, Some("/src/Acme.php"), TypeOrigin::Local);
        }
        Introspectors::new(vec![Box::new(local), Box::new(PlatformTypes::new())])
    }

    fn render_pages(filter: VisibilityFilter) -> Vec<Page> {
        let types = introspectors();
        let builder = TypeModelBuilder::new(&types);
        let renderer = markdown::MarkdownRenderer;
        let resolver = CrossReferenceResolver::new(&builder, filter, renderer.file_extension());
        let examples = ExampleRoots::new(Vec::new(), "/");
        let site = Site::new(&renderer, &resolver, &examples);
        let descs: Vec<_> = ["Acme\\Widget", "Acme\\Base"]
            .iter()
            .filter_map(|n| builder.describe(n))
            .collect();
        site.pages(&descs)
    }

    fn page<'p>(pages: &'p [Page], name: &str) -> &'p str {
        &pages.iter().find(|p| p.file_name == name).unwrap().content
    }

    #[test]
    fn page_order_ends_with_index() {
        let pages = render_pages(VisibilityFilter::default());
        let names: Vec<_> = pages.iter().map(|p| p.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "acme.base.class.md",
                "acme.base.help.method.md",
                "acme.widget.class.md",
                "acme.widget.resize.method.md",
                "index.md",
            ]
        );
    }

    #[test]
    fn inherited_methods_are_grouped_under_their_origin() {
        let pages = render_pages(VisibilityFilter::default());
        let widget = page(&pages, "acme.widget.class.md");
        assert!(widget.contains("### Inherited from [Acme\\Base](acme.base.class.md)"));
        assert_eq!(widget.matches("[help](acme.base.help.method.md)").count(), 1);
        let methods_at = widget.find("## Methods").unwrap();
        let inherited_at = widget[methods_at..].find("### Inherited from").unwrap() + methods_at;
        let resize_at = widget.find("[resize](acme.widget.resize.method.md)").unwrap();
        let help_at = widget.find("[help](acme.base.help.method.md)").unwrap();
        assert!(resize_at < inherited_at && inherited_at < help_at);
    }

    #[test]
    fn inherited_constants_are_grouped_under_their_origin() {
        let pages = render_pages(VisibilityFilter::default());
        let widget = page(&pages, "acme.widget.class.md");
        let constants_at = widget.find("## Constants").unwrap();
        let properties_at = widget.find("## Properties").unwrap();
        let constants = &widget[constants_at..properties_at];
        assert!(constants.starts_with("## Constants\n\n##### const int MAX = 10\n\n"));
        assert!(constants.contains(
            "### Inherited from [Acme\\Base](acme.base.class.md)\n\n##### const int LIMIT = 5\n\n"
        ));
    }

    #[test]
    fn private_members_follow_the_filter() {
        let pages = render_pages(VisibilityFilter::default());
        assert!(!page(&pages, "acme.widget.class.md").contains("secret"));

        let pages = render_pages(VisibilityFilter {
            show_private: true,
            show_protected: false,
        });
        assert!(page(&pages, "acme.widget.class.md").contains("secret"));
        assert!(pages.iter().any(|p| p.file_name == "acme.widget.secret.method.md"));
    }

    #[test]
    fn see_also_section() {
        let pages = render_pages(VisibilityFilter::default());
        let widget = page(&pages, "acme.widget.class.md");
        assert!(widget.contains("## See also\n\n##### [Acme\\Base](acme.base.class.md)\n\n&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;Base of everything.\n\n"));
        assert!(widget.contains("##### Missing::thing()\n\n&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;Not here\n\n"));
    }

    #[test]
    fn method_page_sections() {
        let pages = render_pages(VisibilityFilter::default());
        let resize = page(&pages, "acme.widget.resize.method.md");
        assert!(resize.starts_with("# Acme\\Widget::resize\n\nResize.\n\n"));
        assert!(resize.contains("```php\npublic bool resize ( int $width )\n```"));
        assert!(resize.contains("## Parameters\n\n##### width\n\n&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;New width\n\n"));
        assert!(resize.contains("## Returns\n\n&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;Whether it changed\n\n"));
        assert!(resize.contains(
            "## Throws\n\n##### [InvalidArgumentException](http://php.net/manual/en/class.invalidargumentexception.php)"
        ));
        assert!(resize.contains("Class: [Acme\\Widget](acme.widget.class.md)"));
        assert!(resize.ends_with("[back to index](index.md)\n\n"));
    }

    #[test]
    fn index_lists_types_in_name_order() {
        let pages = render_pages(VisibilityFilter::default());
        let index = page(&pages, "index.md");
        assert_eq!(
            index,
            "## Classes\n\n### [Acme\\Base](acme.base.class.md)\n\n&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;Base of everything.\n\n### [Acme\\Widget](acme.widget.class.md)\n\n&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;A widget.\n\n"
        );
    }

    #[test]
    fn examples_resolve_against_roots_in_order() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();
        fs::write(second.join("a.php"), "<?php echo 1;\n").unwrap();
        fs::write(first.join("b.php"), "b").unwrap();
        fs::write(second.join("b.php"), "b2").unwrap();

        let roots = ExampleRoots::new(vec![first, second], dir.path());
        let example = |location: &str| ExampleRef {
            location: location.to_string(),
            description: None,
        };
        let a = roots.resolve(&example("a.php")).unwrap();
        assert_eq!(a.content, "<?php echo 1;");
        assert_eq!(a.location, "/second/a.php");
        assert_eq!(roots.resolve(&example("b.php")).unwrap().content, "b");
        assert!(roots.resolve(&example("missing.php")).is_none());
    }
}

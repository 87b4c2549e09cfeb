//! Member and type synopses as sequences of link pieces.
//!
//! A piece without a target is plain text. Rendering every piece through
//! the renderer's `link` gives the rich form; concatenating the texts gives
//! the plain form used in code blocks.

use crate::config::VisibilityFilter;
use crate::model::*;
use crate::xref::{CrossReferenceResolver, Link};

pub type Pieces = Vec<Link>;

pub fn plain(pieces: &[Link]) -> String {
    pieces.iter().map(|p| p.text.as_str()).collect()
}

fn text(pieces: &mut Pieces, s: &str) {
    match pieces.last_mut() {
        Some(last) if last.href.is_none() => last.text.push_str(s),
        _ => pieces.push(Link::plain(s)),
    }
}

fn type_expr(pieces: &mut Pieces, resolver: &CrossReferenceResolver<'_>, expr: Option<&str>) {
    for (i, link) in resolver.type_expr_links(expr).into_iter().enumerate() {
        if i > 0 {
            text(pieces, "|");
        }
        push_link(pieces, link);
    }
}

fn push_link(pieces: &mut Pieces, link: Link) {
    if link.href.is_some() {
        pieces.push(link);
    } else {
        text(pieces, &link.text);
    }
}

/// `const TYPE NAME = value`
pub fn constant(resolver: &CrossReferenceResolver<'_>, c: &ConstantDescriptor) -> Pieces {
    let mut pieces = Pieces::new();
    text(&mut pieces, "const ");
    if c.type_expr.is_some() {
        type_expr(&mut pieces, resolver, c.type_expr.as_deref());
        text(&mut pieces, " ");
    }
    text(&mut pieces, &c.name);
    assignment(&mut pieces, c.value.as_ref());
    pieces
}

/// ` = value`, unless there is no value or it is `null`.
fn assignment(pieces: &mut Pieces, value: Option<&Literal>) {
    if let Some(value) = value.and_then(Literal::render) {
        text(pieces, &format!(" = {}", value));
    }
}

/// `visibility [static] [readonly] TYPE $name = default`
pub fn property(resolver: &CrossReferenceResolver<'_>, p: &PropertyDescriptor) -> Pieces {
    let mut pieces = Pieces::new();
    let mut keywords = vec![p.visibility.keyword()];
    if p.is_static {
        keywords.push("static");
    }
    if p.is_read_only {
        keywords.push("readonly");
    }
    text(&mut pieces, &keywords.join(" "));
    text(&mut pieces, " ");
    if p.type_expr.is_some() {
        type_expr(&mut pieces, resolver, p.type_expr.as_deref());
        text(&mut pieces, " ");
    }
    text(&mut pieces, &format!("${}", p.name));
    assignment(&mut pieces, p.default.as_ref());
    pieces
}

/// `TYPE name`
pub fn event(resolver: &CrossReferenceResolver<'_>, e: &EventDescriptor) -> Pieces {
    let mut pieces = Pieces::new();
    if e.type_expr.is_some() {
        type_expr(&mut pieces, resolver, e.type_expr.as_deref());
        text(&mut pieces, " ");
    }
    text(&mut pieces, &e.name);
    pieces
}

/// `[abstract] visibility [static] [final] [TYPE] name ( params )`.
///
/// Optional parameters open a `[` that closes at the end of the list, so
/// `(a, b = 1, c = 2)` reads `a [, b = 1 [, c = 2 ]]`.
pub fn method(resolver: &CrossReferenceResolver<'_>, m: &MethodDescriptor) -> Pieces {
    let mut pieces = Pieces::new();
    let mut keywords = Vec::new();
    if m.is_abstract {
        keywords.push("abstract");
    }
    keywords.push(m.visibility.keyword());
    if m.is_static {
        keywords.push("static");
    }
    if m.is_final {
        keywords.push("final");
    }
    text(&mut pieces, &keywords.join(" "));

    if !m.is_constructor() && !m.is_destructor() && m.returns.type_expr.is_some() {
        text(&mut pieces, " ");
        type_expr(&mut pieces, resolver, m.returns.type_expr.as_deref());
    }
    text(&mut pieces, " ");
    push_link(&mut pieces, resolver.method_link(m));
    text(&mut pieces, " ( ");

    if m.parameters.is_empty() {
        text(&mut pieces, "void");
    }
    let mut open_brackets = 0;
    for (i, param) in m.parameters.iter().enumerate() {
        match (i, param.is_optional) {
            (0, true) => text(&mut pieces, "[ "),
            (0, false) => {}
            (_, true) => text(&mut pieces, " [, "),
            (_, false) => text(&mut pieces, " , "),
        }
        if param.is_optional {
            open_brackets += 1;
        }
        if param.type_expr.is_some() {
            type_expr(&mut pieces, resolver, param.type_expr.as_deref());
            text(&mut pieces, " ");
        }
        let by_ref = if param.is_by_ref { "&" } else { "" };
        let variadic = if param.is_variadic { "..." } else { "" };
        text(&mut pieces, &format!("{}{}${}", by_ref, variadic, param.name));
        assignment(&mut pieces, param.default.as_ref());
    }
    if open_brackets > 0 {
        text(&mut pieces, &format!(" {}", "]".repeat(open_brackets)));
    }
    text(&mut pieces, " )");
    pieces
}

/// Plain type synopsis with the members declared on the type itself.
pub fn type_synopsis(resolver: &CrossReferenceResolver<'_>, desc: &TypeDescriptor, filter: &VisibilityFilter) -> String {
    let mut out = String::new();
    if desc.is_abstract {
        out.push_str("abstract ");
    }
    if desc.is_final {
        out.push_str("final ");
    }
    out.push_str(desc.kind.keyword());
    out.push(' ');
    out.push_str(&desc.name);

    if desc.kind == TypeKind::Interface {
        if !desc.interfaces.is_empty() {
            out.push_str(&format!(" extends {}", desc.interfaces.join(", ")));
        }
    } else {
        if let Some(parent) = &desc.parent {
            out.push_str(&format!(" extends {}", parent));
        }
        if !desc.interfaces.is_empty() {
            out.push_str(&format!(" implements {}", desc.interfaces.join(", ")));
        }
    }
    out.push_str(" {\n\n");

    let constants: String = desc
        .constants
        .iter()
        .filter(|c| c.declared_in == desc.name && !c.overridden && filter.allows(c.visibility))
        .map(|c| format!("\t{}\n", plain(&constant(resolver, c))))
        .collect();
    if !constants.is_empty() {
        out.push_str(&format!("\t/* Constants */\n{}\n", constants));
    }

    let properties: String = desc
        .properties
        .iter()
        .filter(|p| p.declared_in == desc.name && !p.overridden && filter.allows(p.visibility))
        .map(|p| format!("\t{}\n", plain(&property(resolver, p))))
        .collect();
    if !properties.is_empty() {
        out.push_str(&format!("\t/* Properties */\n{}\n", properties));
    }

    let methods: String = desc
        .methods
        .iter()
        .filter(|m| m.declared_in == desc.name && is_listed(m, filter))
        .map(|m| format!("\t{}\n", plain(&method(resolver, m))))
        .collect();
    if !methods.is_empty() {
        out.push_str(&format!("\t/* Methods */\n{}\n", methods));
    }

    out.push('}');
    out
}

/// Methods shown in listings: visible, not shadowed, not magic.
pub fn is_listed(m: &MethodDescriptor, filter: &VisibilityFilter) -> bool {
    !m.overridden && !m.is_hidden_magic() && filter.allows(m.visibility)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TypeModelBuilder;
    use crate::introspect::platform::PlatformTypes;
    use crate::introspect::source::SourceIndex;
    use crate::introspect::Introspectors;

    const SOURCE: &str = r#"<?php
namespace Acme;
abstract class Shape implements \Countable {
    const SIDES = 0;
    public static ?Shape $default = null;
    public array $tags = [];
    protected $hidden;
    public function __construct(int $a, $b = 'it\'s', array ...$rest) {}
    abstract protected function area(): float;
    public function count(): int {}
    public function nothing() {}
    public function __toString() {}
    public function move(&$x, ?Shape $to = null) {}
}
"#;

    fn introspectors() -> Introspectors {
        let mut local = SourceIndex::new();
        local.add_source(SOURCE, Some("/src/Shape.php"), TypeOrigin::Local);
        Introspectors::new(vec![Box::new(local), Box::new(PlatformTypes::new())])
    }

    #[test]
    fn method_synopsis_brackets() {
        let types = introspectors();
        let builder = TypeModelBuilder::new(&types);
        let resolver = CrossReferenceResolver::new(&builder, VisibilityFilter::default(), "md");
        let shape = builder.describe("Acme\\Shape").unwrap();

        let ctor = shape.find_method("__construct").unwrap();
        assert_eq!(
            plain(&method(&resolver, ctor)),
            "public __construct ( int $a [, string $b = 'it\\'s' [, array ...$rest ]] )"
        );

        let nothing = shape.find_method("nothing").unwrap();
        assert_eq!(plain(&method(&resolver, nothing)), "public nothing ( void )");

        let area = shape.find_method("area").unwrap();
        assert_eq!(plain(&method(&resolver, area)), "abstract protected float area ( void )");

        let mv = shape.find_method("move").unwrap();
        assert_eq!(
            plain(&method(&resolver, mv)),
            "public move ( &$x [, Acme\\Shape|null $to ] )"
        );
    }

    #[test]
    fn method_name_links_to_its_page() {
        let types = introspectors();
        let builder = TypeModelBuilder::new(&types);
        let resolver = CrossReferenceResolver::new(&builder, VisibilityFilter::default(), "md");
        let shape = builder.describe("Acme\\Shape").unwrap();
        let pieces = method(&resolver, shape.find_method("count").unwrap());
        assert!(pieces.contains(&Link::to("count", "acme.shape.count.method.md")));
    }

    #[test]
    fn property_and_constant_synopses() {
        let types = introspectors();
        let builder = TypeModelBuilder::new(&types);
        let resolver = CrossReferenceResolver::new(&builder, VisibilityFilter::default(), "md");
        let shape = builder.describe("Acme\\Shape").unwrap();

        let default = shape.find_property("default").unwrap();
        let pieces = property(&resolver, default);
        assert_eq!(plain(&pieces), "public static Acme\\Shape|null $default");
        assert!(pieces.contains(&Link::to("Acme\\Shape", "acme.shape.class.md")));

        assert_eq!(plain(&constant(&resolver, &shape.constants[0])), "const int SIDES = 0");
        let tags = shape.find_property("tags").unwrap();
        assert_eq!(plain(&property(&resolver, tags)), "public array $tags = []");
    }

    #[test]
    fn type_synopsis_lists_own_visible_members() {
        let types = introspectors();
        let builder = TypeModelBuilder::new(&types);
        let filter = VisibilityFilter::default();
        let resolver = CrossReferenceResolver::new(&builder, filter, "md");
        let shape = builder.describe("Acme\\Shape").unwrap();

        let synopsis = type_synopsis(&resolver, &shape, &filter);
        assert!(synopsis.starts_with("abstract class Acme\\Shape implements Countable {\n\n"));
        assert!(synopsis.contains("\t/* Constants */\n\tconst int SIDES = 0\n\n"));
        assert!(synopsis.contains("\tpublic static Acme\\Shape|null $default\n"));
        assert!(!synopsis.contains("$hidden"));
        assert!(!synopsis.contains("area"));
        assert!(!synopsis.contains("__toString"));
        assert!(synopsis.ends_with("}"));
    }
}

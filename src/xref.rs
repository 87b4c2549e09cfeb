//! Cross-reference resolution: type and member names to links.
//!
//! A name resolves to one of four outcomes. Built-in names and unresolved
//! names both render as plain text; only `External` and `Local` carry a
//! target.

use crate::builder::TypeModelBuilder;
use crate::config::VisibilityFilter;
use crate::model::{MethodDescriptor, SeeRef, TypeDescriptor};
use crate::types;
use regex::Regex;
use std::rc::Rc;
use std::sync::LazyLock;

/// Names that are never linked.
pub const BUILT_IN_TYPES: &[&str] = &[
    "void", "string", "int", "float", "bool", "array", "callable", "iterable", "object", "mixed",
    "null", "false", "true", "never", "resource", "self", "static", "parent",
];

const EXTERNAL_DOCS: &str = "http://php.net/manual/en/";

// `@see` forms, tried in this order against the whole reference.
static RE_SEE_METHOD_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)::(.*?)\(\)$").unwrap());
static RE_SEE_PROPERTY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)::\$(.*?)$").unwrap());
static RE_SEE_MEMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?)::(.*?)$").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Unresolved,
    BuiltIn,
    External(String),
    Local(String),
}

impl Resolution {
    pub fn target(&self) -> Option<&str> {
        match self {
            Resolution::External(url) | Resolution::Local(url) => Some(url),
            Resolution::Unresolved | Resolution::BuiltIn => None,
        }
    }
}

/// Display text with an optional target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub href: Option<String>,
}

impl Link {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: None,
        }
    }

    pub fn to(text: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            href: Some(href.into()),
        }
    }
}

/// A resolved `@see` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeeEntry {
    pub link: Link,
    pub description: String,
}

// -- Page names ---------------------------------------------------------------

/// `acme.widget.class.md`
pub fn type_page(type_name: &str, extension: &str) -> String {
    format!("{}.class.{}", dotted(type_name), extension)
}

/// `acme.widget.resize.method.md`
pub fn method_page(type_name: &str, method: &str, extension: &str) -> String {
    format!("{}.method.{}", dotted(&format!("{}.{}", type_name, method)), extension)
}

fn dotted(name: &str) -> String {
    name.trim_start_matches('\\').to_lowercase().replace('\\', ".")
}

/// A method gets its own page when it is declared on a documented type and
/// passes the visibility filter. The constructor is the only magic method
/// with a page.
pub fn has_method_page(owner: &TypeDescriptor, method: &MethodDescriptor, filter: &VisibilityFilter) -> bool {
    owner.is_local()
        && !owner.is_internal
        && !method.overridden
        && method.declared_in == owner.name
        && !method.is_hidden_magic()
        && filter.allows(method.visibility)
}

// -- Resolver -----------------------------------------------------------------

pub struct CrossReferenceResolver<'a> {
    builder: &'a TypeModelBuilder<'a>,
    filter: VisibilityFilter,
    extension: &'static str,
}

impl<'a> CrossReferenceResolver<'a> {
    pub fn new(builder: &'a TypeModelBuilder<'a>, filter: VisibilityFilter, extension: &'static str) -> Self {
        Self {
            builder,
            filter,
            extension,
        }
    }

    pub fn filter(&self) -> &VisibilityFilter {
        &self.filter
    }

    pub fn describe(&self, name: &str) -> Option<Rc<TypeDescriptor>> {
        self.builder.describe(name)
    }

    /// Resolve one type name. A `[]` suffix is ignored.
    pub fn resolve_type(&self, name: &str) -> Resolution {
        let (base, _) = types::strip_array_suffix(name.trim());
        if base.is_empty() {
            return Resolution::Unresolved;
        }
        if is_built_in(base) {
            return Resolution::BuiltIn;
        }
        match self.builder.describe(base) {
            Some(desc) => self.type_resolution(&desc),
            None => {
                tracing::debug!("unresolved type reference: {}", base);
                Resolution::Unresolved
            }
        }
    }

    fn type_resolution(&self, desc: &TypeDescriptor) -> Resolution {
        if desc.is_internal {
            return Resolution::Unresolved;
        }
        if desc.extension().is_some() {
            return Resolution::External(format!(
                "{}class.{}.php",
                EXTERNAL_DOCS,
                desc.name.to_lowercase()
            ));
        }
        if desc.is_local() {
            return Resolution::Local(type_page(&desc.name, self.extension));
        }
        Resolution::Unresolved
    }

    /// Link for a type name as written (suffix kept in the text).
    pub fn type_link(&self, name: &str) -> Link {
        Link {
            text: name.to_string(),
            href: self.resolve_type(name).target().map(str::to_string),
        }
    }

    /// One link per alternative of a normalized type expression.
    pub fn type_expr_links(&self, expr: Option<&str>) -> Vec<Link> {
        match expr {
            Some(expr) if !expr.is_empty() => types::alternatives(expr)
                .into_iter()
                .map(|alt| self.type_link(alt))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Method name link used in synopses.
    pub fn method_link(&self, method: &MethodDescriptor) -> Link {
        let Some(owner) = self.builder.describe(&method.declared_in) else {
            return Link::plain(&method.name);
        };
        if has_method_page(&owner, method, &self.filter) {
            return Link::to(&method.name, method_page(&owner.name, &method.name, self.extension));
        }
        if owner.extension().is_some() {
            return Link::to(&method.name, external_method_url(&owner.name, &method.name));
        }
        Link::plain(&method.name)
    }

    /// Resolve a `@see` reference. Unknown types and missing members render
    /// as plain text with the tag's own description.
    pub fn see(&self, see: &SeeRef) -> SeeEntry {
        let location = see.location.trim();
        let given = see.description.clone().unwrap_or_default();
        let fallback = || SeeEntry {
            link: Link::plain(location),
            description: given.clone(),
        };

        let (type_name, member) = split_see(location);
        let Some(desc) = self.builder.describe(type_name) else {
            tracing::debug!("unresolved @see: {}", location);
            return fallback();
        };
        let linkable = self.type_resolution(&desc);
        let pick = |own: &str| {
            if given.is_empty() && !desc.is_internal {
                own.to_string()
            } else {
                given.clone()
            }
        };

        match member {
            SeeMember::Method(name) => {
                let Some(method) = desc.find_method(name) else {
                    tracing::debug!("@see to missing method: {}", location);
                    return fallback();
                };
                let text = format!("{}::{}()", desc.name, method.name);
                let href = match &linkable {
                    Resolution::External(_) => Some(external_method_url(&desc.name, &method.name)),
                    Resolution::Local(type_url) => Some(self.local_method_target(&desc, method, type_url)),
                    _ => None,
                };
                SeeEntry {
                    link: Link { text, href },
                    description: pick(&method.description),
                }
            }
            SeeMember::Property(name) => {
                let Some(property) = desc.find_property(name) else {
                    tracing::debug!("@see to missing property: {}", location);
                    return fallback();
                };
                let text = format!("{}::${}", desc.name, property.name);
                let href = match &linkable {
                    Resolution::External(_) => Some(format!(
                        "{}class.{}.php#{}.props.{}",
                        EXTERNAL_DOCS,
                        desc.name.to_lowercase(),
                        desc.name.to_lowercase(),
                        property.name.to_lowercase()
                    )),
                    other => other.target().map(str::to_string),
                };
                SeeEntry {
                    link: Link { text, href },
                    description: pick(&property.description),
                }
            }
            SeeMember::None => SeeEntry {
                link: Link {
                    text: desc.name.clone(),
                    href: linkable.target().map(str::to_string),
                },
                description: pick(&desc.description),
            },
        }
    }

    /// Method page of the declaring type when it exists, else the type page.
    fn local_method_target(&self, desc: &TypeDescriptor, method: &MethodDescriptor, type_url: &str) -> String {
        match self.builder.describe(&method.declared_in) {
            Some(owner) if has_method_page(&owner, method, &self.filter) => {
                method_page(&owner.name, &method.name, self.extension)
            }
            Some(owner) if owner.name != desc.name && owner.extension().is_some() => {
                external_method_url(&owner.name, &method.name)
            }
            _ => type_url.to_string(),
        }
    }
}

pub fn is_built_in(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    BUILT_IN_TYPES.contains(&lower.as_str())
}

fn external_method_url(type_name: &str, method: &str) -> String {
    format!(
        "{}{}.{}.php",
        EXTERNAL_DOCS,
        type_name.to_lowercase(),
        method.trim_start_matches('_').to_lowercase()
    )
}

enum SeeMember<'s> {
    None,
    Method(&'s str),
    Property(&'s str),
}

fn split_see(location: &str) -> (&str, SeeMember<'_>) {
    if let Some(caps) = RE_SEE_METHOD_CALL.captures(location) {
        if let (Some(t), Some(m)) = (caps.get(1), caps.get(2)) {
            return (t.as_str(), SeeMember::Method(m.as_str()));
        }
    }
    if let Some(caps) = RE_SEE_PROPERTY.captures(location) {
        if let (Some(t), Some(p)) = (caps.get(1), caps.get(2)) {
            return (t.as_str(), SeeMember::Property(p.as_str()));
        }
    }
    if let Some(caps) = RE_SEE_MEMBER.captures(location) {
        if let (Some(t), Some(m)) = (caps.get(1), caps.get(2)) {
            return (t.as_str(), SeeMember::Method(m.as_str()));
        }
    }
    (location, SeeMember::None)
}

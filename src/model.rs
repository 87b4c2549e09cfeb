//! Data model for documented types: format-agnostic.
//!
//! Everything here is produced by [`crate::builder::TypeModelBuilder`] and is
//! immutable once built. Types are normalized (see [`crate::types`]) before
//! they land in any `type_expr` field.

/// Declared kind of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Trait,
}

impl TypeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
            TypeKind::Trait => "trait",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn keyword(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        }
    }
}

/// Where a type's declaration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeOrigin {
    /// Declared under one of the configured source roots.
    Local,
    /// Declared under a library root: introspectable, never documented.
    Library,
    /// Provided by the runtime; carries the extension identifier.
    External(String),
}

/// A literal default or constant value as written in source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(String),
    Float(String),
    /// Decoded string contents (without quotes).
    Str(String),
    /// Raw array expression.
    Array(String),
    /// Anything else (constant references, operators, `new` ...), verbatim.
    Expr(String),
}

impl Literal {
    /// Type inferred from the value alone.
    pub fn inferred_type(&self) -> Option<&'static str> {
        match self {
            Literal::Bool(_) => Some("bool"),
            Literal::Int(_) => Some("int"),
            Literal::Float(_) => Some("float"),
            Literal::Str(_) => Some("string"),
            Literal::Array(_) => Some("array"),
            Literal::Null | Literal::Expr(_) => None,
        }
    }

    /// Source-like rendering for synopses. `None` for null, which is never shown.
    pub fn render(&self) -> Option<String> {
        match self {
            Literal::Null => None,
            Literal::Bool(b) => Some(b.to_string()),
            Literal::Int(raw) | Literal::Float(raw) | Literal::Expr(raw) => Some(raw.clone()),
            Literal::Str(s) => Some(format!("'{}'", s.replace('\'', "\\'"))),
            Literal::Array(raw) => {
                let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
                if compact == "[]" || compact.eq_ignore_ascii_case("array()") {
                    Some("[]".to_string())
                } else {
                    Some(raw.clone())
                }
            }
        }
    }
}

/// Complete, merged metadata for one documented type.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    /// Fully qualified name, without a leading namespace separator.
    pub name: String,
    pub kind: TypeKind,
    pub parent: Option<String>,
    /// Transitive, ordered, de-duplicated.
    pub interfaces: Vec<String>,
    pub is_final: bool,
    pub is_abstract: bool,
    pub is_internal: bool,
    pub description: String,
    pub constants: Vec<ConstantDescriptor>,
    pub properties: Vec<PropertyDescriptor>,
    pub methods: Vec<MethodDescriptor>,
    pub events: Vec<EventDescriptor>,
    pub examples: Vec<ExampleRef>,
    pub see: Vec<SeeRef>,
    /// Project-relative display path of the declaring file.
    pub location: Option<String>,
    pub origin: TypeOrigin,
}

impl TypeDescriptor {
    pub fn is_local(&self) -> bool {
        self.origin == TypeOrigin::Local
    }

    pub fn extension(&self) -> Option<&str> {
        match &self.origin {
            TypeOrigin::External(ext) if !ext.is_empty() => Some(ext),
            _ => None,
        }
    }

    /// Displayed method by name (case-insensitive, like the language).
    pub fn find_method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods
            .iter()
            .filter(|m| !m.overridden)
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    pub fn find_property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties
            .iter()
            .filter(|p| !p.overridden)
            .find(|p| p.name == name)
    }
}

/// Shared view over constants, properties and methods, used for filtering
/// and inheritance grouping.
pub trait Member {
    fn name(&self) -> &str;
    /// Name of the type that declares this member.
    fn declared_in(&self) -> &str;
    fn visibility(&self) -> Visibility;
    /// Shadowed by a member closer to the concrete type; kept, never displayed.
    fn overridden(&self) -> bool;
    fn set_overridden(&mut self);

    /// Method names ignore ASCII case; constant and property names do not.
    const NAME_IGNORES_CASE: bool;

    fn is_named(&self, name: &str) -> bool {
        if Self::NAME_IGNORES_CASE {
            self.name().eq_ignore_ascii_case(name)
        } else {
            self.name() == name
        }
    }
}

macro_rules! impl_member {
    ($ty:ty, $ignores_case:expr) => {
        impl Member for $ty {
            const NAME_IGNORES_CASE: bool = $ignores_case;

            fn name(&self) -> &str {
                &self.name
            }
            fn declared_in(&self) -> &str {
                &self.declared_in
            }
            fn visibility(&self) -> Visibility {
                self.visibility
            }
            fn overridden(&self) -> bool {
                self.overridden
            }
            fn set_overridden(&mut self) {
                self.overridden = true;
            }
        }
    };
}

#[derive(Debug, Clone)]
pub struct ConstantDescriptor {
    pub name: String,
    pub declared_in: String,
    pub visibility: Visibility,
    pub type_expr: Option<String>,
    pub value: Option<Literal>,
    pub description: String,
    pub overridden: bool,
}

#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub name: String,
    pub declared_in: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_read_only: bool,
    /// Declared only through a `@property` tag.
    pub is_virtual: bool,
    pub type_expr: Option<String>,
    pub default: Option<Literal>,
    pub description: String,
    pub overridden: bool,
}

#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    pub name: String,
    pub declared_in: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub parameters: Vec<ParameterDescriptor>,
    pub returns: ReturnDescriptor,
    pub description: String,
    /// Exception names from `@throws`, first occurrence order, no duplicates.
    pub throws: Vec<String>,
    pub examples: Vec<ExampleRef>,
    pub see: Vec<SeeRef>,
    pub overridden: bool,
}

/// Prefix reserved for language-defined ("magic") methods.
pub const MAGIC_PREFIX: &str = "__";
pub const CONSTRUCTOR: &str = "__construct";
pub const DESTRUCTOR: &str = "__destruct";

impl MethodDescriptor {
    pub fn is_constructor(&self) -> bool {
        self.name.eq_ignore_ascii_case(CONSTRUCTOR)
    }

    pub fn is_destructor(&self) -> bool {
        self.name.eq_ignore_ascii_case(DESTRUCTOR)
    }

    /// Magic methods other than the constructor are never listed.
    pub fn is_hidden_magic(&self) -> bool {
        self.name.starts_with(MAGIC_PREFIX) && !self.is_constructor()
    }
}

impl_member!(ConstantDescriptor, false);
impl_member!(PropertyDescriptor, false);
impl_member!(MethodDescriptor, true);

#[derive(Debug, Clone, Default)]
pub struct ParameterDescriptor {
    pub name: String,
    pub type_expr: Option<String>,
    pub default: Option<Literal>,
    pub is_optional: bool,
    pub is_variadic: bool,
    pub is_by_ref: bool,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReturnDescriptor {
    pub type_expr: Option<String>,
    pub description: String,
}

/// Sourced only from `@event` tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDescriptor {
    pub name: String,
    pub type_expr: Option<String>,
    pub description: String,
}

/// `@example` reference; resolved against the example roots at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleRef {
    pub location: String,
    pub description: Option<String>,
}

/// `@see` reference: `Type`, `Type::method()`, `Type::method` or `Type::$property`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeeRef {
    pub location: String,
    pub description: Option<String>,
}

//! Structural introspection: "given a type name, return its signature".
//!
//! Signatures are raw: types as written (names resolved, not normalized),
//! doc comments unparsed. [`crate::builder::TypeModelBuilder`] merges them
//! with comment data.

pub mod platform;
pub mod source;

use crate::model::{Literal, TypeKind, TypeOrigin, Visibility};

/// Look up a type's structural signature.
pub trait TypeIntrospector {
    /// `None` when the name is unknown. Lookup ignores case and a leading `\`.
    fn introspect(&self, name: &str) -> Option<TypeSignature>;
}

/// Tries each introspector in order; the first hit wins.
pub struct Introspectors {
    chain: Vec<Box<dyn TypeIntrospector>>,
}

impl Introspectors {
    pub fn new(chain: Vec<Box<dyn TypeIntrospector>>) -> Self {
        Self { chain }
    }
}

impl TypeIntrospector for Introspectors {
    fn introspect(&self, name: &str) -> Option<TypeSignature> {
        self.chain.iter().find_map(|i| i.introspect(name))
    }
}

/// Normalize a type name into a lookup key.
pub fn lookup_key(name: &str) -> String {
    name.trim().trim_start_matches('\\').to_ascii_lowercase()
}

#[derive(Debug, Clone)]
pub struct TypeSignature {
    /// Fully qualified, no leading `\`.
    pub name: String,
    pub kind: TypeKind,
    pub parent: Option<String>,
    /// Directly declared interfaces (`implements`, or `extends` on interfaces).
    pub interfaces: Vec<String>,
    pub traits: Vec<String>,
    pub is_final: bool,
    pub is_abstract: bool,
    pub is_read_only: bool,
    pub doc_comment: Option<String>,
    pub constants: Vec<ConstantSignature>,
    pub properties: Vec<PropertySignature>,
    pub methods: Vec<MethodSignature>,
    pub location: Option<String>,
    pub origin: TypeOrigin,
}

impl TypeSignature {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: None,
            interfaces: Vec::new(),
            traits: Vec::new(),
            is_final: false,
            is_abstract: false,
            is_read_only: false,
            doc_comment: None,
            constants: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            location: None,
            origin: TypeOrigin::Local,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConstantSignature {
    pub name: String,
    pub visibility: Visibility,
    pub type_hint: Option<String>,
    pub value: Option<Literal>,
    pub doc_comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PropertySignature {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_read_only: bool,
    pub type_hint: Option<String>,
    pub default: Option<Literal>,
    pub doc_comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MethodSignature {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_final: bool,
    pub parameters: Vec<ParameterSignature>,
    pub return_hint: Option<String>,
    pub doc_comment: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ParameterSignature {
    pub name: String,
    pub type_hint: Option<String>,
    pub default: Option<Literal>,
    pub is_variadic: bool,
    pub is_by_ref: bool,
    /// Visibility of a promoted constructor parameter.
    pub promoted: Option<Visibility>,
    pub is_read_only: bool,
}

impl ParameterSignature {
    pub fn is_optional(&self) -> bool {
        self.default.is_some() || self.is_variadic
    }
}

//! TypeModelBuilder: merges structural signatures with their doc comments.
//!
//! One builder lives for one generation run. Every descriptor is computed on
//! first request and served from the cache afterwards, so the same name
//! always yields the same `Rc`.

use crate::introspect::{
    lookup_key, ConstantSignature, MethodSignature, PropertySignature, TypeIntrospector,
    TypeSignature,
};
use crate::model::*;
use crate::parser::docblock::{self, DocCommentBlock};
use crate::types;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Methods mandated by a capability interface; not listed on implementors.
const CAPABILITY_METHODS: &[(&str, &[&str])] = &[
    (
        "ArrayAccess",
        &["offsetExists", "offsetGet", "offsetSet", "offsetUnset"],
    ),
    ("Iterator", &["current", "key", "next", "rewind", "valid"]),
];

pub struct TypeModelBuilder<'a> {
    introspector: &'a dyn TypeIntrospector,
    cache: RefCell<HashMap<String, Option<Rc<TypeDescriptor>>>>,
    in_progress: RefCell<HashSet<String>>,
    /// Bumped each time a lookup is cut short by an inheritance cycle.
    cycle_hits: Cell<usize>,
}

impl<'a> TypeModelBuilder<'a> {
    pub fn new(introspector: &'a dyn TypeIntrospector) -> Self {
        Self {
            introspector,
            cache: RefCell::new(HashMap::new()),
            in_progress: RefCell::new(HashSet::new()),
            cycle_hits: Cell::new(0),
        }
    }

    /// Descriptor for `name`, or `None` when introspection does not know it.
    pub fn describe(&self, name: &str) -> Option<Rc<TypeDescriptor>> {
        let key = lookup_key(name);
        if let Some(cached) = self.cache.borrow().get(&key) {
            return cached.clone();
        }
        if self.in_progress.borrow().contains(&key) {
            tracing::debug!("inheritance cycle through {}", name);
            self.cycle_hits.set(self.cycle_hits.get() + 1);
            return None;
        }

        let hits_before = self.cycle_hits.get();
        self.in_progress.borrow_mut().insert(key.clone());
        let built = self.introspector.introspect(name).map(|sig| Rc::new(self.build(sig)));
        self.in_progress.borrow_mut().remove(&key);

        // A descriptor cut short by a cycle depends on which type was asked
        // for first; only the outermost one is kept.
        let truncated = self.cycle_hits.get() != hits_before;
        if !truncated || self.in_progress.borrow().is_empty() {
            self.cache.borrow_mut().insert(key, built.clone());
        }
        built
    }

    fn is_in_progress(&self, name: &str) -> bool {
        let cyclic = self.in_progress.borrow().contains(&lookup_key(name));
        if cyclic {
            self.cycle_hits.set(self.cycle_hits.get() + 1);
        }
        cyclic
    }

    fn build(&self, sig: TypeSignature) -> TypeDescriptor {
        let doc = docblock::parse_opt(sig.doc_comment.as_deref());

        // -- Ancestry ---------------------------------------------------------

        let (parent, parent_desc) = match sig.parent.as_deref() {
            Some(p) if self.is_in_progress(p) => (None, None),
            Some(p) => match self.describe(p) {
                Some(desc) => (Some(desc.name.clone()), Some(desc)),
                None => (Some(p.to_string()), None),
            },
            None => (None, None),
        };

        let mut interfaces: Vec<String> = Vec::new();
        let mut interface_descs: Vec<Rc<TypeDescriptor>> = Vec::new();
        for iface in &sig.interfaces {
            if self.is_in_progress(iface) {
                continue;
            }
            match self.describe(iface) {
                Some(desc) => {
                    push_unique(&mut interfaces, &desc.name);
                    for inherited in &desc.interfaces {
                        push_unique(&mut interfaces, inherited);
                    }
                    interface_descs.push(desc);
                }
                None => push_unique(&mut interfaces, iface),
            }
        }
        if let Some(parent_desc) = &parent_desc {
            for inherited in &parent_desc.interfaces {
                push_unique(&mut interfaces, inherited);
            }
        }

        // -- Own members (traits merged in) ------------------------------------

        let mut own_constants = Vec::new();
        let mut own_properties = Vec::new();
        let mut own_methods = Vec::new();
        let mut seen_traits = HashSet::new();
        self.collect_members(
            &sig,
            &sig.name,
            &mut own_constants,
            &mut own_properties,
            &mut own_methods,
            &mut seen_traits,
        );

        for tag in doc.properties() {
            if tag.name.is_empty() || own_properties.iter().any(|p| p.name == tag.name) {
                continue;
            }
            own_properties.push(PropertyDescriptor {
                name: tag.name.clone(),
                declared_in: sig.name.clone(),
                visibility: Visibility::Public,
                is_static: false,
                is_read_only: tag.read_only,
                is_virtual: true,
                type_expr: tag.type_expr.clone(),
                default: None,
                description: tag.description.clone(),
                overridden: false,
            });
        }

        // -- Inherited members -------------------------------------------------

        let mut constants = own_constants;
        let mut properties = own_properties;
        let mut methods = own_methods;

        if let Some(parent_desc) = &parent_desc {
            inherit(&mut constants, &parent_desc.constants, |_| true);
            inherit(&mut properties, &parent_desc.properties, |p| !p.is_virtual);
            inherit(&mut methods, &parent_desc.methods, |_| true);
        }
        for iface in &interface_descs {
            add_missing(&mut constants, &iface.constants);
            add_missing(&mut methods, &iface.methods);
        }

        let mut events: Vec<EventDescriptor> = doc
            .events()
            .filter(|e| !e.name.is_empty())
            .map(|e| EventDescriptor {
                name: e.name.clone(),
                type_expr: e.type_expr.clone(),
                description: e.description.clone(),
            })
            .collect();

        for (capability, mandated) in CAPABILITY_METHODS {
            if interfaces.iter().any(|i| i.eq_ignore_ascii_case(capability)) {
                methods.retain(|m| !mandated.iter().any(|n| m.name.eq_ignore_ascii_case(n)));
            }
        }

        constants.sort_by(|a, b| a.name.cmp(&b.name));
        properties.sort_by(|a, b| a.name.cmp(&b.name));
        methods.sort_by(|a, b| a.name.cmp(&b.name));
        events.sort_by(|a, b| a.name.cmp(&b.name));

        TypeDescriptor {
            name: sig.name.clone(),
            kind: sig.kind,
            parent,
            interfaces,
            is_final: sig.is_final,
            is_abstract: sig.is_abstract,
            is_internal: doc.is_internal(),
            description: doc.description.clone(),
            constants,
            properties,
            methods,
            events,
            examples: doc.examples(),
            see: doc.see(),
            location: sig.location.clone(),
            origin: sig.origin.clone(),
        }
    }

    /// Members declared by `sig` and the traits it uses, attributed to `owner`.
    /// Members of the using type win over same-named trait members.
    fn collect_members(
        &self,
        sig: &TypeSignature,
        owner: &str,
        constants: &mut Vec<ConstantDescriptor>,
        properties: &mut Vec<PropertyDescriptor>,
        methods: &mut Vec<MethodDescriptor>,
        seen_traits: &mut HashSet<String>,
    ) {
        for c in &sig.constants {
            if let Some(desc) = constant(c, owner) {
                if !constants.iter().any(|x| x.name == desc.name) {
                    constants.push(desc);
                }
            }
        }
        for p in &sig.properties {
            if let Some(desc) = property(p, owner) {
                if !properties.iter().any(|x| x.name == desc.name) {
                    properties.push(desc);
                }
            }
        }
        for m in &sig.methods {
            if let Some(desc) = method(m, owner) {
                if !methods.iter().any(|x| x.name.eq_ignore_ascii_case(&desc.name)) {
                    methods.push(desc);
                }
            }
        }

        for trait_name in &sig.traits {
            if !seen_traits.insert(lookup_key(trait_name)) {
                continue;
            }
            match self.introspector.introspect(trait_name) {
                Some(trait_sig) => self.collect_members(
                    &trait_sig,
                    owner,
                    constants,
                    properties,
                    methods,
                    seen_traits,
                ),
                None => tracing::debug!("trait {} used by {} not found", trait_name, owner),
            }
        }
    }
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n.eq_ignore_ascii_case(name)) {
        list.push(name.to_string());
    }
}

/// Append non-private ancestor members; same-named local members shadow them.
fn inherit<M: Member + Clone>(local: &mut Vec<M>, ancestor: &[M], keep: impl Fn(&M) -> bool) {
    let declared = local.len();
    for member in ancestor {
        if member.visibility() == Visibility::Private || !keep(member) {
            continue;
        }
        let mut member = member.clone();
        let shadowed = local[..declared]
            .iter()
            .any(|m| !m.overridden() && m.is_named(member.name()));
        if shadowed {
            member.set_overridden();
        }
        local.push(member);
    }
}

/// Append interface members whose name is not present yet.
fn add_missing<M: Member + Clone>(members: &mut Vec<M>, from: &[M]) {
    for member in from.iter().filter(|m| !m.overridden()) {
        let present = members.iter().any(|m| m.is_named(member.name()));
        if !present {
            members.push(member.clone());
        }
    }
}

// -- Member merging -----------------------------------------------------------

/// Type from the comment, else the structural hint, else the default value.
fn merged_type(doc_type: Option<&String>, hint: Option<&str>, default: Option<&Literal>) -> Option<String> {
    doc_type
        .cloned()
        .or_else(|| types::normalize_opt(hint))
        .or_else(|| default.and_then(Literal::inferred_type).map(str::to_string))
}

/// Own description, else the one given on `@var`.
fn described(doc: &DocCommentBlock) -> String {
    if doc.description.is_empty() {
        doc.var_tag()
            .map(|v| v.description.clone())
            .unwrap_or_default()
    } else {
        doc.description.clone()
    }
}

fn constant(c: &ConstantSignature, owner: &str) -> Option<ConstantDescriptor> {
    let doc = docblock::parse_opt(c.doc_comment.as_deref());
    if doc.is_internal() {
        return None;
    }
    Some(ConstantDescriptor {
        name: c.name.clone(),
        declared_in: owner.to_string(),
        visibility: c.visibility,
        type_expr: merged_type(
            doc.var_tag().and_then(|v| v.type_expr.as_ref()),
            c.type_hint.as_deref(),
            c.value.as_ref(),
        ),
        value: c.value.clone(),
        description: described(&doc),
        overridden: false,
    })
}

fn property(p: &PropertySignature, owner: &str) -> Option<PropertyDescriptor> {
    let doc = docblock::parse_opt(p.doc_comment.as_deref());
    if doc.is_internal() {
        return None;
    }
    Some(PropertyDescriptor {
        name: p.name.clone(),
        declared_in: owner.to_string(),
        visibility: p.visibility,
        is_static: p.is_static,
        is_read_only: p.is_read_only,
        is_virtual: false,
        type_expr: merged_type(
            doc.var_tag().and_then(|v| v.type_expr.as_ref()),
            p.type_hint.as_deref(),
            p.default.as_ref(),
        ),
        default: p.default.clone(),
        description: described(&doc),
        overridden: false,
    })
}

fn method(m: &MethodSignature, owner: &str) -> Option<MethodDescriptor> {
    let doc = docblock::parse_opt(m.doc_comment.as_deref());
    if doc.is_internal() {
        return None;
    }

    let parameters = m
        .parameters
        .iter()
        .map(|p| {
            let tag = doc.param(&p.name);
            ParameterDescriptor {
                name: p.name.clone(),
                type_expr: merged_type(
                    tag.and_then(|t| t.type_expr.as_ref()),
                    p.type_hint.as_deref(),
                    p.default.as_ref(),
                ),
                default: p.default.clone(),
                is_optional: p.is_optional(),
                is_variadic: p.is_variadic,
                is_by_ref: p.is_by_ref,
                description: tag.map(|t| t.description.clone()).unwrap_or_default(),
            }
        })
        .collect();

    let return_tag = doc.return_tag();
    let returns = ReturnDescriptor {
        type_expr: return_tag
            .and_then(|r| r.type_expr.clone())
            .or_else(|| types::normalize_opt(m.return_hint.as_deref())),
        description: return_tag.map(|r| r.description.clone()).unwrap_or_default(),
    };

    Some(MethodDescriptor {
        name: m.name.clone(),
        declared_in: owner.to_string(),
        visibility: m.visibility,
        is_static: m.is_static,
        is_abstract: m.is_abstract,
        is_final: m.is_final,
        parameters,
        returns,
        description: doc.description.clone(),
        throws: doc.throws(),
        examples: doc.examples(),
        see: doc.see(),
        overridden: false,
    })
}

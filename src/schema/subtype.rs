// Mon Oct 19 2026 - Alex

use crate::schema::{DefId, TypeGraph};
use std::fmt;

pub const POINTER_SIZE: usize = 8;
pub const POINTER_ALIGNMENT: usize = 8;

/// Index of an atomic instantiation inside the graph's atomic arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomicId(pub(crate) usize);

impl AtomicId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subtype {
    Ref(DefId),
    FixedArray {
        inner: Box<Subtype>,
        count: usize,
        element_size: usize,
    },
    Atomic(AtomicId),
    Pointer(Box<Subtype>),
    Bitfield { bits: u32 },
    Literal(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepTarget {
    Def(DefId),
    Atomic(AtomicId),
}

/// One edge of the declare/define graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    pub target: DepTarget,
    pub needs_definition: bool,
}

impl Subtype {
    pub fn is_bitfield(&self) -> bool {
        matches!(self, Self::Bitfield { .. })
    }

    pub fn bits(&self) -> Option<u32> {
        match self {
            Self::Bitfield { bits } => Some(*bits),
            _ => None,
        }
    }

    pub fn size(&self, graph: &TypeGraph) -> usize {
        match self {
            Self::Ref(id) => graph.def(*id).size,
            Self::FixedArray { count, element_size, .. } => count * element_size,
            Self::Atomic(id) => graph.atomic(*id).size,
            Self::Pointer(_) => POINTER_SIZE,
            Self::Bitfield { bits } => bits_to_bytes(*bits as usize),
            Self::Literal(_) => 0,
        }
    }

    /// Innermost element type of a (possibly nested) fixed array.
    pub fn element_type(&self) -> &Subtype {
        let mut current = self;
        while let Self::FixedArray { inner, .. } = current {
            current = inner;
        }
        current
    }

    pub fn dependencies(&self, graph: &TypeGraph, needs_definition: bool) -> Vec<Dependency> {
        let mut deps = Vec::new();
        self.collect_dependencies(graph, needs_definition, &mut deps);
        deps
    }

    fn collect_dependencies(&self, graph: &TypeGraph, needs_definition: bool, deps: &mut Vec<Dependency>) {
        match self {
            Self::Ref(id) => deps.push(Dependency {
                target: DepTarget::Def(*id),
                needs_definition,
            }),
            Self::FixedArray { inner, .. } => inner.collect_dependencies(graph, needs_definition, deps),
            Self::Atomic(id) => {
                if let Some(args) = &graph.atomic(*id).template {
                    for arg in args {
                        arg.subtype.collect_dependencies(graph, false, deps);
                    }
                }
                deps.push(Dependency {
                    target: DepTarget::Atomic(*id),
                    needs_definition,
                });
            }
            // Only a forward declaration is ever needed behind a pointer
            Self::Pointer(inner) => inner.collect_dependencies(graph, false, deps),
            Self::Bitfield { .. } | Self::Literal(_) => {}
        }
    }

    pub fn render(&self, graph: &TypeGraph, var_name: Option<&str>) -> String {
        match self {
            Self::Ref(id) => with_var(&graph.def(*id).name, var_name),
            Self::FixedArray { inner, count, .. } => format!("{}[{}]", inner.render(graph, var_name), count),
            Self::Atomic(id) => graph.atomic(*id).render(graph, var_name),
            Self::Pointer(inner) => with_var(&format!("{}*", inner.render(graph, None)), var_name),
            Self::Bitfield { bits } => format!("{} : {}", with_var("int8", var_name), bits),
            Self::Literal(value) => value.to_string(),
        }
    }
}

pub fn bits_to_bytes(bits: usize) -> usize {
    (bits + 7) / 8
}

fn with_var(type_name: &str, var_name: Option<&str>) -> String {
    match var_name {
        Some(var) => format!("{} {}", type_name, var),
        None => type_name.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateParamKind {
    Typename,
    SizeT,
}

impl fmt::Display for TemplateParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Typename => f.write_str("typename"),
            Self::SizeT => f.write_str("size_t"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateArg {
    pub name: String,
    pub kind: TemplateParamKind,
    pub subtype: Subtype,
}

impl TemplateArg {
    /// Parameter names run `A`, `B`, `C`, ... in declaration order.
    pub fn new(position: usize, subtype: Subtype) -> Self {
        let name = char::from(b'A' + (position % 26) as u8).to_string();
        let kind = match subtype {
            Subtype::Literal(_) => TemplateParamKind::SizeT,
            _ => TemplateParamKind::Typename,
        };
        Self { name, kind, subtype }
    }
}

/// A leaf type for layout purposes: a built-in or a template instantiation
/// whose internals are not decomposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atomic {
    pub name: String,
    pub size: usize,
    pub alignment: Option<usize>,
    pub template: Option<Vec<TemplateArg>>,
}

impl Atomic {
    pub fn new(name: &str, size: usize, alignment: Option<usize>) -> Self {
        Self {
            name: name.split('<').next().unwrap_or(name).to_string(),
            size,
            alignment,
            template: None,
        }
    }

    pub fn with_template(mut self, args: Vec<Subtype>) -> Self {
        self.template = Some(args.into_iter().enumerate().map(|(i, s)| TemplateArg::new(i, s)).collect());
        self
    }

    pub fn is_templated(&self) -> bool {
        self.template.is_some()
    }

    pub fn template_args(&self) -> &[TemplateArg] {
        self.template.as_deref().unwrap_or(&[])
    }

    /// `<typename A, size_t B>` for templated atomics, empty otherwise.
    pub fn template_decl(&self) -> String {
        match &self.template {
            Some(args) => {
                let params: Vec<String> = args.iter().map(|a| format!("{} {}", a.kind, a.name)).collect();
                format!("<{}>", params.join(", "))
            }
            None => String::new(),
        }
    }

    pub fn render(&self, graph: &TypeGraph, var_name: Option<&str>) -> String {
        let mut result = self.name.clone();
        if let Some(args) = &self.template {
            let rendered: Vec<String> = args.iter().map(|a| a.subtype.render(graph, None)).collect();
            result.push('<');
            result.push_str(&rendered.join(", "));
            result.push('>');
        }
        with_var(&result, var_name)
    }
}

//! Resolved symbol model.
//!
//! Symbols are owned by a `SymbolArena` and addressed by `SymbolId`. Each
//! symbol is a tagged variant (`Symbol::Type`, `Symbol::Method`, ...) so
//! consumers match on the tag instead of probing for capabilities.
//!
//! Namespaces live in a separate tree inside the same arena, rooted at the
//! global namespace (`NamespaceId::GLOBAL`, empty name). Assemblies are
//! interned by name; a symbol is "extern" when its assembly differs from the
//! program being transpiled.

use serde::{Deserialize, Serialize};

// =============================================================================
// Identifiers
// =============================================================================

/// Handle of a symbol inside a `SymbolArena`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(pub u32);

/// Handle of a namespace inside a `SymbolArena`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamespaceId(pub u32);

impl NamespaceId {
    /// The global namespace. Always present, never named.
    pub const GLOBAL: Self = Self(0);

    #[must_use]
    pub const fn is_global(self) -> bool {
        self.0 == 0
    }
}

/// Identity of an assembly (compilation output) a symbol belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssemblyId(pub u32);

// =============================================================================
// Symbol attributes
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    TypeParameter,
    /// `T[]`; `element_type` holds `T`.
    Array,
    /// `T?` over a value type; `element_type` holds `T`.
    Nullable,
}

impl TypeKind {
    /// Container kinds whose identity is that of their element type.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Array | Self::Nullable)
    }
}

/// Marker for types the policy treats specially.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialType {
    #[default]
    None,
    /// The universal object type every value boxes into.
    Object,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefKind {
    #[default]
    None,
    Ref,
    Out,
    In,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodKind {
    #[default]
    Ordinary,
    Constructor,
    /// User-defined `implicit`/`explicit` conversion operator.
    Conversion,
}

/// Compile-time constant, as carried by parameter default values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    Str(String),
}

impl std::fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Char(c) => write!(f, "{c:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
        }
    }
}

/// A declared method parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: SymbolId,
    #[serde(default)]
    pub ref_kind: RefKind,
    /// `params T[] rest`
    #[serde(default)]
    pub is_params: bool,
    /// Explicit default value, if the declaration has one.
    #[serde(default)]
    pub default: Option<ConstantValue>,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: SymbolId) -> Self {
        Self {
            name: name.into(),
            ty,
            ref_kind: RefKind::None,
            is_params: false,
            default: None,
        }
    }

    #[must_use]
    pub fn with_default(mut self, value: ConstantValue) -> Self {
        self.default = Some(value);
        self
    }

    #[must_use]
    pub const fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }

    #[must_use]
    pub const fn params(mut self) -> Self {
        self.is_params = true;
        self
    }
}

// =============================================================================
// Symbol variants
// =============================================================================

/// A named type: class, struct, interface, enum, delegate, type parameter,
/// or a container (array / nullable) over an element type.
///
/// Constructed generics repeat the definition's `type_parameters` and carry
/// their concrete `type_arguments`; a generic definition leaves
/// `type_arguments` empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeSymbol {
    pub name: String,
    pub kind: TypeKind,
    pub assembly: AssemblyId,
    #[serde(default)]
    pub namespace: Option<NamespaceId>,
    #[serde(default)]
    pub containing_type: Option<SymbolId>,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub type_arguments: Vec<SymbolId>,
    #[serde(default)]
    pub element_type: Option<SymbolId>,
    /// All implemented interfaces, transitively.
    #[serde(default)]
    pub interfaces: Vec<SymbolId>,
    #[serde(default)]
    pub special: SpecialType,
}

impl TypeSymbol {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TypeKind, assembly: AssemblyId) -> Self {
        Self {
            name: name.into(),
            kind,
            assembly,
            namespace: None,
            containing_type: None,
            type_parameters: Vec::new(),
            type_arguments: Vec::new(),
            element_type: None,
            interfaces: Vec::new(),
            special: SpecialType::None,
        }
    }

    #[must_use]
    pub const fn in_namespace(mut self, namespace: NamespaceId) -> Self {
        self.namespace = Some(namespace);
        self
    }

    #[must_use]
    pub const fn nested_in(mut self, containing_type: SymbolId) -> Self {
        self.containing_type = Some(containing_type);
        self
    }

    #[must_use]
    pub fn with_type_parameters(mut self, names: &[&str]) -> Self {
        self.type_parameters = names.iter().map(|n| (*n).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_type_arguments(mut self, arguments: Vec<SymbolId>) -> Self {
        self.type_arguments = arguments;
        self
    }

    #[must_use]
    pub const fn with_element(mut self, element: SymbolId) -> Self {
        self.element_type = Some(element);
        self
    }

    #[must_use]
    pub fn with_interfaces(mut self, interfaces: Vec<SymbolId>) -> Self {
        self.interfaces = interfaces;
        self
    }

    #[must_use]
    pub const fn with_special(mut self, special: SpecialType) -> Self {
        self.special = special;
        self
    }

    /// Generic arity > 0 (definition or instantiation).
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }

    #[must_use]
    pub const fn is_delegate(&self) -> bool {
        matches!(self.kind, TypeKind::Delegate)
    }

    #[must_use]
    pub const fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodSymbol {
    pub name: String,
    pub containing_type: SymbolId,
    pub assembly: AssemblyId,
    #[serde(default)]
    pub kind: MethodKind,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub type_arguments: Vec<SymbolId>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// `None` for `void`.
    #[serde(default)]
    pub return_type: Option<SymbolId>,
    #[serde(default)]
    pub is_extension: bool,
}

impl MethodSymbol {
    #[must_use]
    pub fn new(name: impl Into<String>, containing_type: SymbolId, assembly: AssemblyId) -> Self {
        Self {
            name: name.into(),
            containing_type,
            assembly,
            kind: MethodKind::Ordinary,
            type_parameters: Vec::new(),
            type_arguments: Vec::new(),
            parameters: Vec::new(),
            return_type: None,
            is_extension: false,
        }
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    #[must_use]
    pub const fn returning(mut self, ty: SymbolId) -> Self {
        self.return_type = Some(ty);
        self
    }

    #[must_use]
    pub fn with_type_parameters(mut self, names: &[&str]) -> Self {
        self.type_parameters = names.iter().map(|n| (*n).to_string()).collect();
        self
    }

    #[must_use]
    pub const fn extension(mut self) -> Self {
        self.is_extension = true;
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: MethodKind) -> Self {
        self.kind = kind;
        self
    }

    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.type_parameters.is_empty()
    }
}

/// Field, property or event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberSymbol {
    pub name: String,
    pub containing_type: SymbolId,
    pub assembly: AssemblyId,
    pub ty: SymbolId,
}

impl MemberSymbol {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        containing_type: SymbolId,
        assembly: AssemblyId,
        ty: SymbolId,
    ) -> Self {
        Self {
            name: name.into(),
            containing_type,
            assembly,
            ty,
        }
    }
}

/// Locals, parameters, labels and anything else the policy does not inspect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OtherSymbol {
    pub name: String,
    pub assembly: AssemblyId,
    #[serde(default)]
    pub ty: Option<SymbolId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "symbol")]
pub enum Symbol {
    Type(TypeSymbol),
    Method(MethodSymbol),
    Field(MemberSymbol),
    Property(MemberSymbol),
    Event(MemberSymbol),
    Other(OtherSymbol),
}

impl Symbol {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Type(t) => &t.name,
            Self::Method(m) => &m.name,
            Self::Field(m) | Self::Property(m) | Self::Event(m) => &m.name,
            Self::Other(o) => &o.name,
        }
    }

    #[must_use]
    pub const fn assembly(&self) -> AssemblyId {
        match self {
            Self::Type(t) => t.assembly,
            Self::Method(m) => m.assembly,
            Self::Field(m) | Self::Property(m) | Self::Event(m) => m.assembly,
            Self::Other(o) => o.assembly,
        }
    }

    #[must_use]
    pub const fn containing_type(&self) -> Option<SymbolId> {
        match self {
            Self::Type(t) => t.containing_type,
            Self::Method(m) => Some(m.containing_type),
            Self::Field(m) | Self::Property(m) | Self::Event(m) => Some(m.containing_type),
            Self::Other(_) => None,
        }
    }

    /// Namespace declared directly on the symbol. Members answer `None`; their
    /// namespace is that of the outermost containing type.
    #[must_use]
    pub const fn namespace(&self) -> Option<NamespaceId> {
        match self {
            Self::Type(t) => t.namespace,
            _ => None,
        }
    }

    #[must_use]
    pub fn type_parameters(&self) -> &[String] {
        match self {
            Self::Type(t) => &t.type_parameters,
            Self::Method(m) => &m.type_parameters,
            _ => &[],
        }
    }

    #[must_use]
    pub const fn as_type(&self) -> Option<&TypeSymbol> {
        match self {
            Self::Type(t) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_method(&self) -> Option<&MethodSymbol> {
        match self {
            Self::Method(m) => Some(m),
            _ => None,
        }
    }
}

// =============================================================================
// Namespaces & arena
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceData {
    pub name: String,
    #[serde(default)]
    pub parent: Option<NamespaceId>,
    #[serde(default)]
    pub children: Vec<NamespaceId>,
}

/// Owner of every resolved symbol, namespace and assembly of a program.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SymbolArena {
    #[serde(default)]
    assemblies: Vec<String>,
    #[serde(default = "SymbolArena::global_namespaces")]
    namespaces: Vec<NamespaceData>,
    #[serde(default)]
    symbols: Vec<Symbol>,
}

impl Default for SymbolArena {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolArena {
    #[must_use]
    pub fn new() -> Self {
        Self {
            assemblies: Vec::new(),
            namespaces: Self::global_namespaces(),
            symbols: Vec::new(),
        }
    }

    fn global_namespaces() -> Vec<NamespaceData> {
        vec![NamespaceData {
            name: String::new(),
            parent: None,
            children: Vec::new(),
        }]
    }

    // -------------------------------------------------------------------------
    // Assemblies
    // -------------------------------------------------------------------------

    /// Intern an assembly by name.
    pub fn add_assembly(&mut self, name: impl Into<String>) -> AssemblyId {
        let name = name.into();
        if let Some(pos) = self.assemblies.iter().position(|a| *a == name) {
            return AssemblyId(pos as u32);
        }
        self.assemblies.push(name);
        AssemblyId((self.assemblies.len() - 1) as u32)
    }

    #[must_use]
    pub fn assembly_name(&self, id: AssemblyId) -> Option<&str> {
        self.assemblies.get(id.0 as usize).map(String::as_str)
    }

    // -------------------------------------------------------------------------
    // Namespaces
    // -------------------------------------------------------------------------

    /// Add (or find) the child namespace `name` under `parent`.
    pub fn add_namespace(&mut self, parent: NamespaceId, name: impl Into<String>) -> NamespaceId {
        let name = name.into();
        if let Some(existing) = self.namespace_child(parent, &name) {
            return existing;
        }
        let id = NamespaceId(self.namespaces.len() as u32);
        self.namespaces.push(NamespaceData {
            name,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(parent_data) = self.namespaces.get_mut(parent.0 as usize) {
            parent_data.children.push(id);
        }
        id
    }

    /// Add (or find) every segment of a dotted namespace path.
    pub fn add_namespace_path(&mut self, path: &str) -> NamespaceId {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .fold(NamespaceId::GLOBAL, |parent, segment| {
                self.add_namespace(parent, segment)
            })
    }

    #[must_use]
    pub fn namespace(&self, id: NamespaceId) -> Option<&NamespaceData> {
        self.namespaces.get(id.0 as usize)
    }

    #[must_use]
    pub fn namespace_child(&self, parent: NamespaceId, name: &str) -> Option<NamespaceId> {
        let parent = self.namespace(parent)?;
        parent.children.iter().copied().find(|&child| {
            self.namespace(child)
                .is_some_and(|data| data.name == name)
        })
    }

    /// Dotted name of a namespace; the global namespace is the empty string.
    #[must_use]
    pub fn namespace_path(&self, id: NamespaceId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(ns) = current {
            let Some(data) = self.namespace(ns) else {
                break;
            };
            if data.name.is_empty() {
                break;
            }
            segments.push(data.name.as_str());
            current = data.parent;
        }
        segments.reverse();
        segments.join(".")
    }

    /// Find a namespace by its dotted path.
    #[must_use]
    pub fn namespace_by_path(&self, path: &str) -> Option<NamespaceId> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(NamespaceId::GLOBAL, |parent, segment| {
                self.namespace_child(parent, segment)
            })
    }

    pub fn namespace_ids(&self) -> impl Iterator<Item = NamespaceId> + '_ {
        (0..self.namespaces.len()).map(|i| NamespaceId(i as u32))
    }

    // -------------------------------------------------------------------------
    // Symbols
    // -------------------------------------------------------------------------

    pub fn add(&mut self, symbol: Symbol) -> SymbolId {
        self.symbols.push(symbol);
        SymbolId((self.symbols.len() - 1) as u32)
    }

    pub fn add_type(&mut self, ty: TypeSymbol) -> SymbolId {
        self.add(Symbol::Type(ty))
    }

    pub fn add_method(&mut self, method: MethodSymbol) -> SymbolId {
        self.add(Symbol::Method(method))
    }

    #[must_use]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    #[must_use]
    pub fn type_symbol(&self, id: SymbolId) -> Option<&TypeSymbol> {
        self.get(id).and_then(Symbol::as_type)
    }

    #[must_use]
    pub fn method(&self, id: SymbolId) -> Option<&MethodSymbol> {
        self.get(id).and_then(Symbol::as_method)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId(i as u32), s))
    }

    /// Namespace that contains the symbol, following containing types
    /// outwards for nested types and members.
    #[must_use]
    pub fn containing_namespace(&self, id: SymbolId) -> Option<NamespaceId> {
        let mut current = self.get(id)?;
        loop {
            if let Some(ns) = current.namespace() {
                return Some(ns);
            }
            current = self.get(current.containing_type()?)?;
        }
    }

    /// Containing types, element types and type arguments must not loop back
    /// on themselves; naming and legality checks recurse along them.
    ///
    /// Returns a symbol on the first cycle found.
    #[must_use]
    pub fn first_cyclic_reference(&self) -> Option<SymbolId> {
        const UNSEEN: u8 = 0;
        const ACTIVE: u8 = 1;
        const DONE: u8 = 2;

        let mut state = vec![UNSEEN; self.symbols.len()];
        let mut stack: Vec<(SymbolId, usize)> = Vec::new();
        for start in 0..self.symbols.len() {
            if state[start] != UNSEEN {
                continue;
            }
            state[start] = ACTIVE;
            stack.push((SymbolId(start as u32), 0));
            while let Some(top) = stack.last_mut() {
                let (id, cursor) = *top;
                match self.structural_refs(id).get(cursor).copied() {
                    Some(next) => {
                        top.1 += 1;
                        match state.get(next.0 as usize).copied() {
                            Some(ACTIVE) => return Some(next),
                            Some(UNSEEN) => {
                                state[next.0 as usize] = ACTIVE;
                                stack.push((next, 0));
                            }
                            _ => {}
                        }
                    }
                    None => {
                        state[id.0 as usize] = DONE;
                        stack.pop();
                    }
                }
            }
        }
        None
    }

    fn structural_refs(&self, id: SymbolId) -> Vec<SymbolId> {
        match self.get(id) {
            Some(Symbol::Type(t)) => t
                .containing_type
                .into_iter()
                .chain(t.element_type)
                .chain(t.type_arguments.iter().copied())
                .collect(),
            Some(symbol) => symbol.containing_type().into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// First namespace whose parent chain never ends.
    #[must_use]
    pub fn first_cyclic_namespace(&self) -> Option<NamespaceId> {
        let parent = |ns: NamespaceId| self.namespace(ns).and_then(|data| data.parent);
        let limit = self.namespaces.len();
        self.namespace_ids().find(|&start| {
            let mut current = parent(start);
            for _ in 0..limit {
                match current {
                    Some(ns) => current = parent(ns),
                    None => return false,
                }
            }
            true
        })
    }

    /// Check that every intra-arena reference points at an existing entry.
    ///
    /// Returns the first dangling symbol reference found.
    #[must_use]
    pub fn first_dangling_reference(&self) -> Option<SymbolId> {
        let exists = |id: &SymbolId| (id.0 as usize) < self.symbols.len();
        for symbol in &self.symbols {
            let mut refs: Vec<SymbolId> = Vec::new();
            match symbol {
                Symbol::Type(t) => {
                    refs.extend(t.containing_type);
                    refs.extend(t.element_type);
                    refs.extend(t.type_arguments.iter().copied());
                    refs.extend(t.interfaces.iter().copied());
                }
                Symbol::Method(m) => {
                    refs.push(m.containing_type);
                    refs.extend(m.return_type);
                    refs.extend(m.type_arguments.iter().copied());
                    refs.extend(m.parameters.iter().map(|p| p.ty));
                }
                Symbol::Field(m) | Symbol::Property(m) | Symbol::Event(m) => {
                    refs.push(m.containing_type);
                    refs.push(m.ty);
                }
                Symbol::Other(o) => refs.extend(o.ty),
            }
            if let Some(bad) = refs.into_iter().find(|r| !exists(r)) {
                return Some(bad);
            }
        }
        None
    }
}

#[cfg(test)]
#[path = "../tests/symbol_tests.rs"]
mod tests;

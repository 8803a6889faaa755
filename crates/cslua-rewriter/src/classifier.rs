//! Local vs extern, and whether an extern symbol may be used.
//!
//! Every answer comes from the symbol model plus the `RuleTable`. Lookups
//! against the legal lists record their misses; deny-list lookups do not.

use cslua_model::{
    SemanticModel, SpecialType, Symbol, SymbolArena, SymbolId, TypeKind, TypeSymbol,
};
use cslua_rules::{
    DenyList, LegalList, MissBucket, RuleTable, canonical_name, extended_name, member_key,
};

/// Where a type occurs; selects the legal list and the miss bucket.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypePosition {
    /// Constructed, queried with `typeof`, or used as a value.
    General,
    /// Parameter, return or member type of an extern signature.
    Parameter,
    /// Host type whose member is being accessed.
    MemberHost,
}

impl TypePosition {
    const fn lists(self) -> (LegalList, MissBucket) {
        match self {
            Self::General => (LegalList::GenericType, MissBucket::IllegalGenericType),
            Self::Parameter => (
                LegalList::ParameterGenericType,
                MissBucket::IllegalParameterGenericType,
            ),
            Self::MemberHost => (
                LegalList::GenericType,
                MissBucket::AccessMemberOfIllegalGenericType,
            ),
        }
    }
}

/// Interface names whose system versions may not receive local containers.
const SYSTEM_CONTAINER_INTERFACES: [&str; 4] =
    ["IEnumerable", "ICollection", "IList", "IDictionary"];

#[derive(Copy, Clone)]
pub struct SymbolClassifier<'a> {
    model: &'a dyn SemanticModel,
    rules: RuleTable<'a>,
}

impl<'a> SymbolClassifier<'a> {
    #[must_use]
    pub const fn new(model: &'a dyn SemanticModel, rules: RuleTable<'a>) -> Self {
        Self { model, rules }
    }

    #[must_use]
    pub fn symbols(&self) -> &'a SymbolArena {
        self.model.symbols()
    }

    #[must_use]
    pub const fn rules(&self) -> RuleTable<'a> {
        self.rules
    }

    fn type_symbol(&self, id: SymbolId) -> Option<&'a TypeSymbol> {
        self.symbols().type_symbol(id)
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Canonical name plus instantiation, as shown in diagnostics.
    #[must_use]
    pub fn display_name(&self, id: SymbolId) -> String {
        let symbols = self.symbols();
        let bare = canonical_name(symbols, id, true);
        extended_name(symbols, &bare, id)
    }

    /// `Host.member` key of a member symbol.
    #[must_use]
    pub fn member_name(&self, id: SymbolId) -> String {
        let symbols = self.symbols();
        match symbols.get(id) {
            Some(symbol) => match symbol.containing_type() {
                Some(host) => member_key(symbols, host, symbol.name()),
                None => symbol.name().to_string(),
            },
            None => String::new(),
        }
    }

    // =========================================================================
    // Locality
    // =========================================================================

    /// Declared outside the program's assembly. Arrays and nullables answer
    /// for their element type.
    #[must_use]
    pub fn is_extern(&self, id: SymbolId) -> bool {
        let symbols = self.symbols();
        let mut current = id;
        loop {
            let Some(symbol) = symbols.get(current) else {
                return false;
            };
            match symbol {
                Symbol::Type(ty) if ty.kind.is_container() => match ty.element_type {
                    Some(element) => current = element,
                    None => return ty.assembly != self.model.program_assembly(),
                },
                _ => return symbol.assembly() != self.model.program_assembly(),
            }
        }
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Whether a type may appear at `position`.
    ///
    /// Unresolved ids are legal; there is nothing to check.
    pub fn legality_of_type(&self, id: SymbolId, position: TypePosition) -> bool {
        let Some(ty) = self.type_symbol(id) else {
            return true;
        };
        if ty.kind.is_container() {
            return ty
                .element_type
                .is_none_or(|element| self.legality_of_type(element, position));
        }
        if ty.is_delegate() || matches!(ty.kind, TypeKind::TypeParameter) || !self.is_extern(id) {
            return true;
        }
        if ty.is_generic() {
            return self.query_generic(id, position);
        }
        !self.is_illegal_type(id)
    }

    fn query_generic(&self, id: SymbolId, position: TypePosition) -> bool {
        let symbols = self.symbols();
        let (list, bucket) = position.lists();
        let bare = canonical_name(symbols, id, true);
        let extended = extended_name(symbols, &bare, id);
        self.rules
            .query_legal_into(list, &bare, Some(extended.as_str()), bucket)
    }

    /// Generic type in the legal generic-type list. Local types are legal.
    pub fn is_legal_generic_type(&self, id: SymbolId, as_host: bool) -> bool {
        if !self.is_extern(id) {
            return true;
        }
        let position = if as_host {
            TypePosition::MemberHost
        } else {
            TypePosition::General
        };
        self.query_generic(id, position)
    }

    /// Generic type in the legal parameter generic-type list.
    pub fn is_legal_parameter_generic_type(&self, id: SymbolId) -> bool {
        if !self.is_extern(id) {
            return true;
        }
        self.query_generic(id, TypePosition::Parameter)
    }

    /// Hosts whose members skip every type-shape check: delegates, and
    /// generic types on the legal generic-type list.
    pub fn is_exempt_host(&self, id: SymbolId) -> bool {
        let Some(ty) = self.type_symbol(id) else {
            return false;
        };
        ty.is_delegate() || (ty.is_generic() && self.is_legal_generic_type(id, true))
    }

    /// Bare or instantiated name in the configured illegal-type list.
    #[must_use]
    pub fn is_illegal_type(&self, id: SymbolId) -> bool {
        let symbols = self.symbols();
        let bare = canonical_name(symbols, id, true);
        if self.rules.denies(DenyList::Type, &bare) {
            return true;
        }
        let extended = extended_name(symbols, &bare, id);
        extended != bare && self.rules.denies(DenyList::Type, &extended)
    }

    /// Interface `IEnumerable`/`ICollection`/`IList`/`IDictionary` (any
    /// arity) declared extern in `System` or below.
    #[must_use]
    pub fn is_system_container_interface(&self, id: SymbolId) -> bool {
        let Some(ty) = self.type_symbol(id) else {
            return false;
        };
        if !ty.is_interface() || !self.is_extern(id) {
            return false;
        }
        if !SYSTEM_CONTAINER_INTERFACES.contains(&ty.name.as_str()) {
            return false;
        }
        let symbols = self.symbols();
        let namespace = symbols
            .containing_namespace(id)
            .map(|ns| symbols.namespace_path(ns))
            .unwrap_or_default();
        namespace == "System" || namespace.starts_with("System.")
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Extension method whose declaring type is on the legal extension list.
    pub fn is_legal_extension(&self, method: SymbolId) -> bool {
        let symbols = self.symbols();
        let Some(host) = symbols.get(method).and_then(Symbol::containing_type) else {
            return true;
        };
        let name = canonical_name(symbols, host, true);
        self.rules.query_legal(LegalList::Extension, &name)
    }

    /// `Host.method` on the legal generic-method list.
    pub fn is_legal_generic_method(&self, method: SymbolId) -> bool {
        let name = self.member_name(method);
        self.rules.query_legal(LegalList::GenericMethod, &name)
    }

    #[must_use]
    pub fn is_illegal_method(&self, method: SymbolId) -> bool {
        self.rules.denies(DenyList::Method, &self.member_name(method))
    }

    #[must_use]
    pub fn is_illegal_property(&self, property: SymbolId) -> bool {
        self.rules.denies(DenyList::Property, &self.member_name(property))
    }

    #[must_use]
    pub fn is_illegal_field(&self, field: SymbolId) -> bool {
        self.rules.denies(DenyList::Field, &self.member_name(field))
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    /// Whether a value of type `source` may be converted to `target`.
    ///
    /// Only conversions through an extern boxed object, or from a plain
    /// extern type into a generic one, consult the conversion list.
    pub fn is_legal_conversion(&self, source: SymbolId, target: SymbolId) -> bool {
        if source == target {
            return true;
        }
        let (Some(src), Some(dst)) = (self.type_symbol(source), self.type_symbol(target)) else {
            return true;
        };

        let generic_or_local =
            |id: SymbolId, ty: &TypeSymbol| ty.is_generic() || !self.is_extern(id);
        let boxed_object =
            |id: SymbolId, ty: &TypeSymbol| ty.special == SpecialType::Object && self.is_extern(id);

        if boxed_object(source, src) && !dst.is_delegate() && generic_or_local(target, dst) {
            return self.lookup_conversion(source, target);
        }
        if boxed_object(target, dst) && !src.is_delegate() && generic_or_local(source, src) {
            return self.lookup_conversion(source, target);
        }
        if src.is_delegate() || dst.is_delegate() {
            return true;
        }
        if !src.is_generic() && self.is_extern(source) && dst.is_generic() {
            return self.lookup_conversion(source, target);
        }
        true
    }

    fn lookup_conversion(&self, source: SymbolId, target: SymbolId) -> bool {
        let symbols = self.symbols();
        let names = |id: SymbolId| {
            let bare = canonical_name(symbols, id, true);
            let extended = extended_name(symbols, &bare, id);
            let extended = (extended != bare).then_some(extended);
            (bare, extended)
        };
        let (src, src_ext) = names(source);
        let (dst, dst_ext) = names(target);
        self.rules
            .lookup_conversion(&src, src_ext.as_deref(), &dst, dst_ext.as_deref())
    }
}

impl std::fmt::Debug for SymbolClassifier<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SymbolClassifier")
            .field("program_assembly", &self.model.program_assembly())
            .field("rules", &self.rules)
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/classifier_tests.rs"]
mod tests;

use super::*;
use cslua_model::{MethodSymbol, TypeSymbol};

struct Fixture {
    arena: SymbolArena,
    int: SymbolId,
    action: SymbolId,
    list_def: SymbolId,
    dictionary: SymbolId,
}

fn fixture() -> Fixture {
    let mut arena = SymbolArena::new();
    let corlib = arena.add_assembly("mscorlib");
    let system = arena.add_namespace_path("System");
    let generic = arena.add_namespace_path("System.Collections.Generic");
    let int = arena.add_type(TypeSymbol::new("Int32", TypeKind::Struct, corlib).in_namespace(system));
    let string =
        arena.add_type(TypeSymbol::new("String", TypeKind::Class, corlib).in_namespace(system));
    let action =
        arena.add_type(TypeSymbol::new("Action", TypeKind::Delegate, corlib).in_namespace(system));
    let list_def = arena.add_type(
        TypeSymbol::new("List", TypeKind::Class, corlib)
            .in_namespace(generic)
            .with_type_parameters(&["T"]),
    );
    let dictionary = arena.add_type(
        TypeSymbol::new("Dictionary", TypeKind::Class, corlib)
            .in_namespace(generic)
            .with_type_parameters(&["TKey", "TValue"])
            .with_type_arguments(vec![string, action]),
    );
    Fixture {
        arena,
        int,
        action,
        list_def,
        dictionary,
    }
}

#[test]
fn test_canonical_name_includes_type_parameters() {
    let f = fixture();
    assert_eq!(canonical_name(&f.arena, f.int, true), "System.Int32");
    assert_eq!(
        canonical_name(&f.arena, f.list_def, true),
        "System.Collections.Generic.List_T"
    );
    assert_eq!(
        canonical_name(&f.arena, f.dictionary, true),
        "System.Collections.Generic.Dictionary_TKey_TValue"
    );
    assert_eq!(
        canonical_name(&f.arena, f.dictionary, false),
        "System.Collections.Generic"
    );
}

#[test]
fn test_canonical_name_walks_nested_types() {
    let mut arena = SymbolArena::new();
    let asm = arena.add_assembly("Game");
    let ns = arena.add_namespace_path("Game.Core");
    let outer = arena.add_type(
        TypeSymbol::new("Pool", TypeKind::Class, asm)
            .in_namespace(ns)
            .with_type_parameters(&["T"]),
    );
    let inner = arena.add_type(TypeSymbol::new("Slot", TypeKind::Struct, asm).nested_in(outer));
    let method = arena.add_method(MethodSymbol::new("Take", inner, asm));

    assert_eq!(canonical_name(&arena, inner, true), "Game.Core.Pool_T.Slot");
    assert_eq!(canonical_name(&arena, method, true), "Game.Core.Pool_T.Slot.Take");
    assert_eq!(canonical_name(&arena, method, false), "Game.Core.Pool_T.Slot");
}

#[test]
fn test_canonical_name_of_global_type_has_no_prefix() {
    let mut arena = SymbolArena::new();
    let asm = arena.add_assembly("Game");
    let ty = arena.add_type(TypeSymbol::new("Program", TypeKind::Class, asm));
    assert_eq!(canonical_name(&arena, ty, true), "Program");
    assert_eq!(canonical_name(&arena, ty, false), "");
}

#[test]
fn test_extended_name_quotes_delegate_arguments() {
    let f = fixture();
    let base = canonical_name(&f.arena, f.dictionary, true);
    assert_eq!(
        extended_name(&f.arena, &base, f.dictionary),
        "System.Collections.Generic.Dictionary_TKey_TValue|System.String, \"System.Action\""
    );
}

#[test]
fn test_extended_name_of_definition_spells_parameters() {
    let f = fixture();
    let base = canonical_name(&f.arena, f.list_def, true);
    assert_eq!(
        extended_name(&f.arena, &base, f.list_def),
        "System.Collections.Generic.List_T|T"
    );
}

#[test]
fn test_extended_name_keeps_free_type_parameters_bare() {
    let mut f = fixture();
    let corlib = f.arena.add_assembly("mscorlib");
    let generic = f.arena.add_namespace_path("System.Collections.Generic");
    let t = f.arena.add_type(TypeSymbol::new("T", TypeKind::TypeParameter, corlib));
    let list_t = f.arena.add_type(
        TypeSymbol::new("List", TypeKind::Class, corlib)
            .in_namespace(generic)
            .with_type_parameters(&["T"])
            .with_type_arguments(vec![t]),
    );
    let list_int = f.arena.add_type(
        TypeSymbol::new("List", TypeKind::Class, corlib)
            .in_namespace(generic)
            .with_type_parameters(&["T"])
            .with_type_arguments(vec![f.int]),
    );
    assert_eq!(extended_name(&f.arena, "L", list_t), "L|T");
    assert_eq!(extended_name(&f.arena, "L", list_int), "L|System.Int32");
}

#[test]
fn test_extended_name_of_non_generic_is_base() {
    let f = fixture();
    assert_eq!(extended_name(&f.arena, "System.Int32", f.int), "System.Int32");
    assert_eq!(extended_name(&f.arena, "System.Action", f.action), "System.Action");
}

#[test]
fn test_distinct_instantiations_share_bare_name() {
    let mut f = fixture();
    let corlib = f.arena.add_assembly("mscorlib");
    let generic = f.arena.add_namespace_path("System.Collections.Generic");
    let list_action = f.arena.add_type(
        TypeSymbol::new("List", TypeKind::Class, corlib)
            .in_namespace(generic)
            .with_type_parameters(&["T"])
            .with_type_arguments(vec![f.action]),
    );
    let bare = canonical_name(&f.arena, list_action, true);
    assert_eq!(bare, canonical_name(&f.arena, f.list_def, true));
    assert_ne!(
        extended_name(&f.arena, &bare, list_action),
        extended_name(&f.arena, &bare, f.list_def)
    );
}

#[test]
fn test_member_key_joins_host_and_member() {
    let f = fixture();
    assert_eq!(
        member_key(&f.arena, f.list_def, "Add"),
        "System.Collections.Generic.List_T.Add"
    );
}

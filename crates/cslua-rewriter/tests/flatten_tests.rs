use super::*;

struct Parts {
    externs: Vec<NodeIndex>,
    usings: Vec<NodeIndex>,
    members: Vec<NodeIndex>,
}

fn parts(arena: &NodeArena, unit: NodeIndex) -> Parts {
    match arena.data(unit) {
        Some(NodeData::CompilationUnit {
            externs,
            usings,
            members,
            ..
        }) => Parts {
            externs: externs.clone(),
            usings: usings.clone(),
            members: members.clone(),
        },
        other => panic!("expected compilation unit, got {other:?}"),
    }
}

fn printed(arena: &NodeArena, nodes: &[NodeIndex]) -> Vec<String> {
    nodes
        .iter()
        .map(|&node| match arena.data(node) {
            Some(NodeData::UsingDirective { name, .. }) => arena.print(*name),
            Some(NodeData::NamespaceDeclaration { name, .. }) => arena.print(*name),
            Some(NodeData::TypeDeclaration { name, .. }) => name.clone(),
            Some(NodeData::ExternAlias { name }) => name.clone(),
            other => format!("{other:?}"),
        })
        .collect()
}

#[test]
fn test_root_namespace_is_promoted_and_sibling_kept() {
    let mut arena = NodeArena::new();
    let main_class = arena.class("Program", vec![]);
    let app_main = arena.namespace("App.Main", vec![], vec![], vec![main_class]);
    let import = arena.using("System.Collections");
    let first = arena.class("Lexer", vec![]);
    let second = arena.class("Parser", vec![]);
    let internal = arena.namespace("App.Gen.Internal", vec![], vec![import], vec![first, second]);
    let unit = arena.compilation_unit(vec![], vec![], vec![app_main, internal]);

    let flattened = flatten(&mut arena, unit, "App.Gen");

    assert_ne!(flattened, unit);
    let out = parts(&arena, flattened);
    assert_eq!(printed(&arena, &out.members), ["App.Main", "Lexer", "Parser"]);
    assert_eq!(out.members[0], app_main);
    assert_eq!(printed(&arena, &out.usings), ["System.Collections"]);
    assert!(out.externs.is_empty());
}

#[test]
fn test_flatten_is_a_fixpoint_without_root_namespaces() {
    let mut arena = NodeArena::new();
    let alias = arena.extern_alias("Legacy");
    let using = arena.using("System");
    let a = arena.class("A", vec![]);
    let other = arena.namespace("Vendor.Tools", vec![], vec![], vec![a]);
    let b = arena.class("B", vec![]);
    let unit = arena.compilation_unit(vec![alias], vec![using], vec![other, b]);

    let flattened = flatten(&mut arena, unit, "App");

    let before = parts(&arena, unit);
    let after = parts(&arena, flattened);
    assert_eq!(after.externs, before.externs);
    assert_eq!(after.usings, before.usings);
    assert_eq!(after.members, before.members);
}

#[test]
fn test_nested_namespaces_dissolve_regardless_of_name() {
    let mut arena = NodeArena::new();
    let x = arena.extern_alias("X");
    let system = arena.using("System");
    let self_import = arena.using("App.Gen.Shared");
    let a = arena.class("A", vec![]);
    let b = arena.class("B", vec![]);
    let c = arena.class("C", vec![]);
    let deepest = arena.namespace("Deeper", vec![], vec![], vec![c]);
    let inner = arena.namespace("Inner", vec![], vec![], vec![b, deepest]);
    let root = arena.namespace("App.Gen", vec![x], vec![system, self_import], vec![a, inner]);
    let top_import = arena.using("App.Gen.Util");
    let kept_import = arena.using("UnityEngine");
    let unit = arena.compilation_unit(vec![], vec![top_import, kept_import], vec![root]);

    let flattened = flatten(&mut arena, unit, "App.Gen");

    let out = parts(&arena, flattened);
    assert_eq!(printed(&arena, &out.externs), ["X"]);
    assert_eq!(printed(&arena, &out.usings), ["UnityEngine", "System"]);
    assert_eq!(printed(&arena, &out.members), ["A", "B", "C"]);
    assert!(
        out.members
            .iter()
            .all(|&m| !arena.data(m).is_some_and(NodeData::is_namespace))
    );
}

#[test]
fn test_prefix_match_is_textual() {
    let mut arena = NodeArena::new();
    let a = arena.class("A", vec![]);
    let generated = arena.namespace("App.Generated", vec![], vec![], vec![a]);
    let unit = arena.compilation_unit(vec![], vec![], vec![generated]);

    let flattened = flatten(&mut arena, unit, "App.Gen");

    assert_eq!(printed(&arena, &parts(&arena, flattened).members), ["A"]);
}

#[test]
fn test_unit_trivia_and_attributes_survive() {
    let mut arena = NodeArena::new();
    let attribute = arena.alloc(NodeData::Opaque {
        text: "[assembly: Version(\"1.0\")]".to_string(),
        children: vec![],
    });
    let unit = arena.alloc(NodeData::CompilationUnit {
        externs: vec![],
        usings: vec![],
        attribute_lists: vec![attribute],
        members: vec![],
    });
    arena.prepend_comment(unit, "// generated".to_string());

    let flattened = flatten(&mut arena, unit, "App");

    let node = arena.get(flattened).map(|n| n.leading_comments.clone());
    assert_eq!(node, Some(vec!["// generated".to_string()]));
    assert!(matches!(
        arena.data(flattened),
        Some(NodeData::CompilationUnit { attribute_lists, .. }) if attribute_lists == &vec![attribute]
    ));
}

#[test]
fn test_non_unit_is_returned_unchanged() {
    let mut arena = NodeArena::new();
    let class = arena.class("A", vec![]);
    let before = arena.len();
    assert_eq!(flatten(&mut arena, class, "App"), class);
    assert_eq!(arena.len(), before);
}

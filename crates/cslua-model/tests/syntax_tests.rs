use super::*;

#[test]
fn test_dotted_name_builds_left_nested_chain() {
    let mut arena = NodeArena::new();
    let name = arena.dotted_name("Game.Core.Entity");
    assert_eq!(arena.print(name), "Game.Core.Entity");

    let Some(NodeData::QualifiedName { left, right }) = arena.data(name) else {
        panic!("expected qualified name");
    };
    assert_eq!(arena.print(*left), "Game.Core");
    assert_eq!(arena.print(*right), "Entity");
}

#[test]
fn test_dotted_name_single_segment_is_identifier() {
    let mut arena = NodeArena::new();
    let name = arena.dotted_name("Entity");
    assert!(matches!(
        arena.data(name),
        Some(NodeData::IdentifierName { text }) if text == "Entity"
    ));
    assert!(arena.dotted_name("").is_none());
}

#[test]
fn test_print_generic_and_invocation() {
    let mut arena = NodeArena::new();
    let int = arena.alloc(NodeData::PredefinedType {
        keyword: "int".into(),
    });
    let list = arena.generic_name("List", vec![int]);
    let create = arena.alloc(NodeData::ObjectCreation {
        ty: list,
        arguments: Vec::new(),
    });
    assert_eq!(arena.print(create), "new List<int>()");

    let target = arena.identifier("log");
    let one = arena.literal("1");
    let arg = arena.named_argument("level", one);
    let call = arena.invocation(target, vec![arg]);
    assert_eq!(arena.print(call), "log(level: 1)");
}

#[test]
fn test_for_each_child_mut_skips_missing_slots() {
    let mut arena = NodeArena::new();
    let declarator = arena.alloc(NodeData::VariableDeclarator {
        name: "x".into(),
        initializer: NodeIndex::NONE,
    });
    let data = arena.data(declarator).cloned().expect("declarator");
    assert!(data.children().is_empty());
}

#[test]
fn test_for_each_child_mut_replaces_in_order() {
    let mut arena = NodeArena::new();
    let a = arena.identifier("a");
    let b = arena.identifier("b");
    let mut data = NodeData::Assignment { left: a, right: b };
    let mut seen = Vec::new();
    data.for_each_child_mut(|idx| {
        seen.push(*idx);
        *idx = NodeIndex(idx.0 + 100);
    });
    assert_eq!(seen, vec![a, b]);
    assert_eq!(
        data,
        NodeData::Assignment {
            left: NodeIndex(a.0 + 100),
            right: NodeIndex(b.0 + 100),
        }
    );
}

#[test]
fn test_prepend_comment_keeps_newest_first() {
    let mut arena = NodeArena::new();
    let node = arena.identifier("x");
    arena.prepend_comment(node, "/* first */".into());
    arena.prepend_comment(node, "/* second */".into());
    assert_eq!(
        arena.get(node).map(|n| n.leading_comments.clone()),
        Some(vec!["/* second */".to_string(), "/* first */".to_string()])
    );
}

#[test]
fn test_node_data_json_uses_kind_tag() {
    let data = NodeData::IdentifierName { text: "x".into() };
    let json = serde_json::to_value(&data).unwrap();
    assert_eq!(json["kind"], "IdentifierName");
    let declarator: NodeData =
        serde_json::from_str(r#"{"kind":"VariableDeclarator","name":"y"}"#).unwrap();
    assert!(matches!(
        declarator,
        NodeData::VariableDeclarator { initializer, .. } if initializer.is_none()
    ));
}

use super::*;

fn symbols() -> SymbolArena {
    let mut symbols = SymbolArena::new();
    symbols.add_namespace_path("Game.Core.Util");
    symbols.add_namespace_path("Game.Core.Net.Packets");
    symbols.add_namespace_path("Game.Other");
    symbols.add_namespace_path("System.Collections");
    symbols
}

#[test]
fn test_collect_takes_root_and_descendants() {
    let known = KnownNamespaces::collect(&symbols(), "Game.Core");

    let names: Vec<&str> = known.iter().collect();
    assert_eq!(
        names,
        vec![
            "Game.Core",
            "Game.Core.Util",
            "Game.Core.Net",
            "Game.Core.Net.Packets"
        ]
    );
    assert!(!known.contains("Game"));
    assert!(!known.contains("Game.Other"));
    assert_eq!(known.root(), "Game.Core");
}

#[test]
fn test_components_start_at_root_segment() {
    let known = KnownNamespaces::collect(&symbols(), "Game.Core");
    for segment in ["Core", "Util", "Net", "Packets"] {
        assert!(known.contains_component(segment), "{segment}");
    }
    assert!(!known.contains_component("Game"));
    assert!(!known.contains_component("Other"));
    assert!(!known.contains_component("System"));
}

#[test]
fn test_single_segment_root_is_a_component() {
    let known = KnownNamespaces::from_names("Game", ["Game", "Game.Core"]);
    assert!(known.contains_component("Game"));
    assert!(known.contains_component("Core"));
}

#[test]
fn test_empty_or_unknown_root_collects_nothing() {
    assert!(KnownNamespaces::collect(&symbols(), "").is_empty());
    let unknown = KnownNamespaces::collect(&symbols(), "Nope");
    assert!(unknown.is_empty());
    assert_eq!(unknown.len(), 0);
    assert_eq!(unknown.root(), "Nope");
}

#[test]
fn test_longest_prefix_requires_dot_boundary() {
    let known = KnownNamespaces::from_names("Game", ["Game", "Game.Core"]);
    assert_eq!(known.longest_prefix_of("Game.Core.Util"), Some("Game.Core"));
    assert_eq!(known.longest_prefix_of("Game.Entity"), Some("Game"));
    assert_eq!(known.longest_prefix_of("GameCore.Util"), None);
    assert_eq!(known.longest_prefix_of("Game.Core"), Some("Game"));
    assert_eq!(known.longest_prefix_of("Game"), None);
    assert_eq!(known.longest_prefix_of("Game."), None);
}

use super::*;

fn document() -> RuleDocument {
    RuleDocument::from_json_str(
        r#"[
          { "id": "config", "args": ["LegalGenericTypeList"], "entries": [
              { "id": "type", "args": ["System.Collections.Generic.List_T"] }
          ]},
          { "id": "config", "args": ["LegalGenericMethodList"], "entries": [
              { "id": "method", "args": ["UnityEngine.GameObject", "GetComponent"] }
          ]},
          { "id": "config", "args": ["LegalParameterGenericTypeList"], "entries": [
              { "id": "type", "args": ["System.Func_TResult"] }
          ]},
          { "id": "config", "args": ["LegalExtensionList"], "entries": [
              { "id": "type", "args": ["System.Linq.Enumerable"] }
          ]},
          { "id": "config", "args": ["LegalConvertionList"], "entries": [
              { "id": "convertion", "args": ["System.Object", "Game.Entity"] },
              { "id": "convertion", "args": ["System.Object", "Game.Item"] }
          ]},
          { "id": "config", "args": ["IllegalTypeList"], "entries": [
              { "id": "type", "args": ["System.IntPtr"] }
          ]},
          { "id": "config", "args": ["IllegalMethodList"], "entries": [
              { "id": "method", "args": ["UnityEngine.GameObject", "SendMessage"] }
          ]},
          { "id": "config", "args": ["IllegalPropertyList"], "entries": [
              { "id": "property", "args": ["UnityEngine.Transform", "hierarchyCount"] }
          ]},
          { "id": "config", "args": ["IllegalFieldList"], "entries": [
              { "id": "field", "args": ["UnityEngine.Vector3", "kEpsilon"] }
          ]}
        ]"#,
    )
    .expect("rules")
}

#[test]
fn test_from_document_fills_every_list() {
    let policy = RulePolicy::from_document(&document());

    assert!(policy.contains(LegalList::GenericType, "System.Collections.Generic.List_T"));
    assert!(policy.contains(LegalList::GenericMethod, "UnityEngine.GameObject.GetComponent"));
    assert!(policy.contains(LegalList::ParameterGenericType, "System.Func_TResult"));
    assert!(policy.contains(LegalList::Extension, "System.Linq.Enumerable"));
    assert!(policy.denies(DenyList::Type, "System.IntPtr"));
    assert!(policy.denies(DenyList::Method, "UnityEngine.GameObject.SendMessage"));
    assert!(policy.denies(DenyList::Property, "UnityEngine.Transform.hierarchyCount"));
    assert!(policy.denies(DenyList::Field, "UnityEngine.Vector3.kEpsilon"));
}

#[test]
fn test_member_entries_use_both_arguments() {
    let policy = RulePolicy::from_document(&document());
    assert!(!policy.denies(DenyList::Method, "UnityEngine.GameObject.UnityEngine.GameObject"));
    assert!(!policy.contains(LegalList::GenericMethod, "UnityEngine.GameObject"));
}

#[test]
fn test_lists_do_not_leak_into_each_other() {
    let policy = RulePolicy::from_document(&document());
    assert!(!policy.contains(LegalList::ParameterGenericType, "System.Collections.Generic.List_T"));
    assert!(!policy.contains(LegalList::GenericType, "System.Func_TResult"));
    assert!(!policy.denies(DenyList::Property, "UnityEngine.Vector3.kEpsilon"));
}

#[test]
fn test_conversions_accumulate_targets() {
    let policy = RulePolicy::from_document(&document());
    let targets = policy.conversion_targets("System.Object").expect("targets");
    assert_eq!(targets.len(), 2);
    assert!(policy.contains_conversion("System.Object", "Game.Item"));
    assert!(!policy.contains_conversion("Game.Item", "System.Object"));
    assert!(policy.conversion_targets("Game.Item").is_none());
}

#[test]
fn test_programmatic_construction() {
    let mut policy = RulePolicy::new();
    policy.allow(LegalList::Extension, "Game.Extensions");
    policy.deny(DenyList::Field, "Lib.Config.secret");
    policy.allow_conversion("A", "B");

    assert!(policy.contains(LegalList::Extension, "Game.Extensions"));
    assert!(policy.denies(DenyList::Field, "Lib.Config.secret"));
    assert!(policy.contains_conversion("A", "B"));
}

use super::*;

#[test]
fn test_format_message_replaces_positional_arguments() {
    let text = format_message("from '{0}' to '{1}'", &["System.Object", "List_T"]);
    assert_eq!(text, "from 'System.Object' to 'List_T'");
}

#[test]
fn test_every_code_has_a_unique_template() {
    let mut codes: Vec<u32> = DIAGNOSTIC_MESSAGES.iter().map(|m| m.code).collect();
    let total = codes.len();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), total, "duplicate diagnostic codes");
}

#[test]
fn test_from_code_uses_registered_template() {
    let diag = Diagnostic::from_code(
        "Main.cs",
        NodeIndex(4),
        diagnostic_codes::UNSUPPORTED_EXTERN_FIELD,
        &["UnityEngine.Vector3.kEpsilon"],
    );
    assert!(diag.is_error());
    assert_eq!(
        diag.message_text,
        "[cslua] Unsupported 'extern field' 'UnityEngine.Vector3.kEpsilon' !"
    );
    assert_eq!(
        diag.to_string(),
        "Main.cs(#4): error CSL2003: [cslua] Unsupported 'extern field' 'UnityEngine.Vector3.kEpsilon' !"
    );
}

#[test]
fn test_from_code_unknown_code_joins_arguments() {
    let diag = Diagnostic::from_code("a.cs", NodeIndex(0), 42, &["one", "two"]);
    assert_eq!(diag.message_text, "one two");
}

#[test]
fn test_diagnostic_serializes_node_as_number() {
    let diag = Diagnostic::error("a.cs".into(), NodeIndex(7), "m".into(), 1001);
    let json = serde_json::to_value(&diag).unwrap();
    assert_eq!(json["node"], 7);
    assert_eq!(json["category"], "Error");
}

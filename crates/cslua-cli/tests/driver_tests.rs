use super::*;
use clap::Parser;
use cslua_common::diagnostics::diagnostic_codes;
use cslua_model::{
    AssemblyId, MemberSymbol, NodeBinding, NodeData, Symbol, SymbolArena, SymbolId, TypeKind,
    TypeSymbol, UnitDocument,
};
use cslua_rules::{LegalList, RULE_FILE_NAME};

const LIST_OF_ENTITY: &str = "System.Collections.Generic.List_T|Game.Core.Entity";

struct Ids {
    on_destroy: SymbolId,
    list_of_entity: SymbolId,
}

/// `go.onDestroy; new List<Entity>();` inside `namespace Game.Core { class X {} }`.
fn unit(file: &str, ids: &Ids) -> UnitDocument {
    let mut arena = NodeArena::new();
    let go = arena.identifier("go");
    let access = arena.member_access(go, "onDestroy");
    let first = arena.alloc(NodeData::ExpressionStatement { expression: access });
    let ty = arena.generic_name("List", vec![]);
    let creation = arena.alloc(NodeData::ObjectCreation {
        ty,
        arguments: vec![],
    });
    let second = arena.alloc(NodeData::ExpressionStatement {
        expression: creation,
    });
    let class = arena.class(file.trim_end_matches(".cs"), vec![first, second]);
    let namespace = arena.namespace("Game.Core", vec![], vec![], vec![class]);
    let root = arena.compilation_unit(vec![], vec![], vec![namespace]);
    UnitDocument {
        file: file.to_string(),
        arena,
        root,
        bindings: vec![
            NodeBinding {
                node: access,
                symbol: Some(ids.on_destroy),
                ty: None,
            },
            NodeBinding {
                node: ty,
                symbol: Some(ids.list_of_entity),
                ty: None,
            },
        ],
    }
}

fn sample_document(files: &[&str]) -> ProgramDocument {
    let mut symbols = SymbolArena::new();
    let game = symbols.add_assembly("Game");
    let corlib = symbols.add_assembly("mscorlib");
    let unity = symbols.add_assembly("UnityEngine");
    let core = symbols.add_namespace_path("Game.Core");
    let generic = symbols.add_namespace_path("System.Collections.Generic");
    let unity_ns = symbols.add_namespace_path("UnityEngine");

    let entity =
        symbols.add_type(TypeSymbol::new("Entity", TypeKind::Class, game).in_namespace(core));
    let list_of_entity = symbols.add_type(
        TypeSymbol::new("List", TypeKind::Class, corlib)
            .in_namespace(generic)
            .with_type_parameters(&["T"])
            .with_type_arguments(vec![entity]),
    );
    let callback = symbols
        .add_type(TypeSymbol::new("Callback", TypeKind::Delegate, unity).in_namespace(unity_ns));
    let game_object = symbols
        .add_type(TypeSymbol::new("GameObject", TypeKind::Class, unity).in_namespace(unity_ns));
    let on_destroy = symbols.add(Symbol::Event(MemberSymbol::new(
        "onDestroy",
        game_object,
        unity,
        callback,
    )));

    let ids = Ids {
        on_destroy,
        list_of_entity,
    };
    ProgramDocument {
        assembly: AssemblyId(0),
        symbols,
        default_values: vec![],
        units: files.iter().map(|file| unit(file, &ids)).collect(),
    }
}

fn codes(unit: &RewrittenUnit) -> Vec<u32> {
    unit.diagnostics.iter().map(|d| d.code).collect()
}

#[test]
fn test_rewrite_program_keeps_unit_order() {
    let files = ["A.cs", "B.cs", "C.cs", "D.cs", "E.cs"];
    let output = rewrite_program(sample_document(&files), &RulePolicy::new(), "Game.Core");

    let names: Vec<&str> = output.units.iter().map(|u| u.file.as_str()).collect();
    assert_eq!(names, files);
    for unit in &output.units {
        assert_eq!(
            codes(unit),
            [
                diagnostic_codes::UNSUPPORTED_EXTERN_EVENT,
                diagnostic_codes::UNSUPPORTED_EXTERN_TYPE,
            ]
        );
        assert!(unit.diagnostics.iter().all(|d| d.file == unit.file));
        let Some(NodeData::CompilationUnit { members, .. }) = unit.arena.data(unit.root) else {
            panic!("expected compilation unit");
        };
        assert_eq!(members.len(), 1);
        assert!(matches!(
            unit.arena.data(members[0]),
            Some(NodeData::TypeDeclaration { .. })
        ));
    }
    assert_eq!(output.diagnostic_count(), 10);
    assert_eq!(output.diagnostics().len(), 10);
}

#[test]
fn test_misses_are_shared_across_units() {
    let output = rewrite_program(
        sample_document(&["A.cs", "B.cs", "C.cs"]),
        &RulePolicy::new(),
        "Game.Core",
    );
    assert_eq!(output.misses.illegal_generic_types, [LIST_OF_ENTITY]);
    assert_eq!(output.misses.total(), 1);
}

#[test]
fn test_listed_generic_produces_no_type_diagnostic() {
    let mut policy = RulePolicy::new();
    policy.allow(LegalList::GenericType, "System.Collections.Generic.List_T");
    let output = rewrite_program(sample_document(&["A.cs"]), &policy, "");

    assert_eq!(codes(&output.units[0]), [diagnostic_codes::UNSUPPORTED_EXTERN_EVENT]);
    assert!(output.misses.is_empty());
    // No root namespace: the unit keeps its declarations.
    let Some(NodeData::CompilationUnit { members, .. }) =
        output.units[0].arena.data(output.units[0].root)
    else {
        panic!("expected compilation unit");
    };
    assert!(
        output.units[0]
            .arena
            .data(members[0])
            .is_some_and(NodeData::is_namespace)
    );
}

const RULES: &str = r#"[
  { "id": "config", "args": ["LegalGenericTypeList"], "entries": [
      { "id": "type", "args": ["System.Collections.Generic.List_T"] }
  ]}
]"#;

#[test]
fn test_load_policy_sources() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join(RULE_FILE_NAME), RULES).expect("write rules");
    let explicit = dir.path().join("strict.json");
    std::fs::write(&explicit, "[]").expect("write rules");
    let dir_arg = dir.path().to_string_lossy().to_string();
    let explicit_arg = explicit.to_string_lossy().to_string();

    let args = CliArgs::try_parse_from(["cslua", "-p", "p.json", "--config-dir", &dir_arg])
        .expect("args");
    let policy = load_policy(&args).expect("policy from dir");
    assert!(policy.contains(LegalList::GenericType, "System.Collections.Generic.List_T"));

    let args = CliArgs::try_parse_from([
        "cslua",
        "-p",
        "p.json",
        "--config-dir",
        &dir_arg,
        "--rules",
        &explicit_arg,
    ])
    .expect("args");
    let policy = load_policy(&args).expect("explicit policy");
    assert!(!policy.contains(LegalList::GenericType, "System.Collections.Generic.List_T"));

    let args = CliArgs::try_parse_from(["cslua", "-p", "p.json"]).expect("args");
    let policy = load_policy(&args).expect("empty policy");
    assert!(!policy.contains(LegalList::GenericType, "System.Collections.Generic.List_T"));
}

#[test]
fn test_missing_rule_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let dir_arg = dir.path().to_string_lossy().to_string();
    let args = CliArgs::try_parse_from(["cslua", "-p", "p.json", "--config-dir", &dir_arg])
        .expect("args");

    let err = load_policy(&args).expect_err("no rewriter.json in dir");
    let message = format!("{err:#}");
    assert!(message.contains("failed to load rules"), "{message}");
    assert!(message.contains(RULE_FILE_NAME), "{message}");
}

#[test]
fn test_run_writes_units_and_report() {
    let dir = tempfile::tempdir().expect("tempdir");
    let program = dir.path().join("program.json");
    let document = sample_document(&["A.cs", "B.cs"]);
    std::fs::write(&program, serde_json::to_string(&document).expect("json")).expect("write");
    let out = dir.path().join("rewritten.json");
    let report = dir.path().join("misses.json");
    let path = |p: &Path| p.to_string_lossy().to_string();

    let args = CliArgs::try_parse_from([
        "cslua".to_string(),
        "--program".to_string(),
        path(&program),
        "--root-namespace".to_string(),
        "Game.Core".to_string(),
        "--out".to_string(),
        path(&out),
        "--report".to_string(),
        path(&report),
        "--pretty".to_string(),
    ])
    .expect("args");

    let output = run(&args).expect("run");
    assert_eq!(output.diagnostic_count(), 4);

    let units: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).expect("read out")).expect("json");
    let files: Vec<&str> = units
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|u| u["file"].as_str())
        .collect();
    assert_eq!(files, ["A.cs", "B.cs"]);
    assert_eq!(units[0]["diagnostics"].as_array().map(Vec::len), Some(2));

    let rules = RuleDocument::load(&report).expect("report is a rule document");
    let merged = RulePolicy::from_document(&rules);
    assert!(merged.contains(LegalList::GenericType, LIST_OF_ENTITY));
}

#[test]
fn test_run_reports_missing_program() {
    let args = CliArgs::try_parse_from(["cslua", "-p", "/definitely/not/here.json"]).expect("args");
    let err = run(&args).expect_err("missing program");
    assert!(format!("{err:#}").contains("failed to load program"));
}

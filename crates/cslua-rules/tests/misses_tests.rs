use super::*;
use rayon::prelude::*;

#[test]
fn test_record_is_idempotent() {
    let log = MissLog::new();
    assert!(log.is_empty());
    assert!(log.record(MissBucket::IllegalGenericType, "Lib.Box_T|Game.Item"));
    assert!(!log.record(MissBucket::IllegalGenericType, "Lib.Box_T|Game.Item"));
    assert!(log.contains(MissBucket::IllegalGenericType, "Lib.Box_T|Game.Item"));
    assert!(!log.contains(MissBucket::AccessMemberOfIllegalGenericType, "Lib.Box_T|Game.Item"));

    assert!(log.record_conversion("System.Object", "Game.Item"));
    assert!(!log.record_conversion("System.Object", "Game.Item"));
    assert!(log.contains_conversion("System.Object", "Game.Item"));
    assert!(!log.is_empty());
}

#[test]
fn test_parallel_recording_yields_single_entry() {
    let log = MissLog::new();
    let first_seen: usize = (0..256)
        .into_par_iter()
        .map(|i| {
            let a = log.record(MissBucket::IllegalExtension, "Lib.Ext");
            let b = log.record_conversion("Lib.Handle", &format!("Game.T{}", i % 4));
            usize::from(a) + usize::from(b)
        })
        .sum();

    assert_eq!(first_seen, 5);
    let report = log.report();
    assert_eq!(report.illegal_extensions, vec!["Lib.Ext".to_string()]);
    assert_eq!(report.illegal_conversions.len(), 4);
}

#[test]
fn test_report_is_sorted_per_bucket() {
    let log = MissLog::new();
    log.record(MissBucket::IllegalGenericMethod, "Lib.B.Run");
    log.record(MissBucket::IllegalGenericMethod, "Lib.A.Run");
    log.record_conversion("Z", "A");
    log.record_conversion("A", "Z");

    let report = log.report();
    assert_eq!(
        report.illegal_generic_methods,
        vec!["Lib.A.Run".to_string(), "Lib.B.Run".to_string()]
    );
    assert_eq!(
        report.illegal_conversions,
        vec![
            ("A".to_string(), "Z".to_string()),
            ("Z".to_string(), "A".to_string())
        ]
    );
    assert_eq!(report.total(), 4);
}

#[test]
fn test_report_converts_to_legal_rule_document() {
    let log = MissLog::new();
    log.record(MissBucket::IllegalGenericType, "Lib.Box_T");
    log.record(MissBucket::AccessMemberOfIllegalGenericType, "Lib.Bag_T");
    log.record(MissBucket::IllegalGenericMethod, "Lib.Util.Make");
    log.record(MissBucket::IllegalParameterGenericType, "Lib.Func_T");
    log.record_conversion("System.Object", "Game.Item");

    let document = log.report().to_rule_document();
    let lists: Vec<RuleList> = document.sections.iter().filter_map(RuleSection::list).collect();
    assert_eq!(
        lists,
        vec![
            RuleList::LegalGenericTypes,
            RuleList::LegalGenericMethods,
            RuleList::LegalParameterGenericTypes,
            RuleList::LegalConversions,
        ]
    );

    let methods: Vec<RuleEntry> = document.sections[1]
        .entries_for(RuleList::LegalGenericMethods)
        .collect();
    assert_eq!(methods, vec![RuleEntry::new("method", &["Lib.Util", "Make"])]);

    let generic: Vec<RuleEntry> = document.sections[0]
        .entries_for(RuleList::LegalGenericTypes)
        .collect();
    assert_eq!(generic.len(), 2);
}

#[test]
fn test_report_serializes_with_snake_case_keys() {
    let log = MissLog::new();
    log.record(MissBucket::IllegalExtension, "Lib.Ext");
    let json = serde_json::to_value(log.report()).expect("json");
    assert_eq!(json["illegal_extensions"][0], "Lib.Ext");
    let back: MissReport = serde_json::from_value(json).expect("back");
    assert_eq!(back.illegal_extensions, vec!["Lib.Ext".to_string()]);
}

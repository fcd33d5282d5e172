use doi_batch_engine::{
    compile_batch, parse_operations, run, run_specs, BatchError, Operation, OperationSpec,
};
use serde_json::{json, Value};

fn compile(specs: &[OperationSpec]) -> Vec<Operation> {
    compile_batch(specs).unwrap_or_else(|e| panic!("compile failed: {e}"))
}

#[test]
fn updates_nested_array_paths() {
    let mut attributes = json!({"titles": [{"title": "Old title"}, {"title": "Another"}]});
    let ops = compile(&[OperationSpec::new("titles[].title")
        .with_pattern("Old")
        .with_replacement("New")]);

    let report = run(&mut attributes, &ops);
    assert!(report.updated);
    assert_eq!(attributes["titles"][0]["title"], "New title");
    assert_eq!(attributes["titles"][1]["title"], "Another");
}

#[test]
fn idempotence_matrix() {
    let cases: Vec<(Value, OperationSpec)> = vec![
        (
            json!({"titles": [{"title": "Old title"}]}),
            OperationSpec::new("titles[].title").with_pattern("Old").with_replacement("New"),
        ),
        (
            json!({"doi": "10.5072/x"}),
            OperationSpec::new("publisher.name").with_replacement("Zenodo"),
        ),
        (
            json!({"creators": [{"name": "Jane Doe (Dept A)"}]}),
            OperationSpec::new("creators[].nameIdentifier")
                .with_replacement("")
                .with_condition("creators[].name", r".*\((.*)\)"),
        ),
        (
            json!({"state": "draft"}),
            OperationSpec::new("state").with_pattern("draft").with_replacement("findable"),
        ),
    ];

    for (mut doc, spec) in cases {
        let ops = compile(std::slice::from_ref(&spec));
        assert!(run(&mut doc, &ops).updated, "first run should change: {spec:?}");
        let after_first = doc.clone();
        assert!(!run(&mut doc, &ops).updated, "second run should not change: {spec:?}");
        assert_eq!(doc, after_first);
    }
}

#[test]
fn array_condition_is_existential() {
    let mut doc = json!({"a": [{"x": "no"}, {"x": "yes"}], "flag": "off"});
    let ops = compile(&[OperationSpec::new("flag")
        .with_replacement("on")
        .with_condition("a[].x", "^yes$")]);
    assert!(run(&mut doc, &ops).updated);
    assert_eq!(doc["flag"], "on");
}

#[test]
fn context_alignment_changes_only_matching_element() {
    let mut doc = json!({"items": [{"name": "keep", "val": "1"}, {"name": "change", "val": "2"}]});
    let ops = compile(&[OperationSpec::new("items[].val")
        .with_pattern("2")
        .with_replacement("9")
        .with_condition("items[].name", "^change$")]);

    let report = run(&mut doc, &ops);
    assert!(report.updated);
    assert_eq!(doc, json!({"items": [{"name": "keep", "val": "1"}, {"name": "change", "val": "9"}]}));
}

#[test]
fn context_alignment_regression_with_many_elements() {
    let mut doc = json!({"titles": [
        {"title": "Report 1", "titleType": "Subtitle"},
        {"title": "Report 2"},
        {"title": "Report 3", "titleType": "Subtitle"}
    ]});
    let ops = compile(&[OperationSpec::new("titles[].title")
        .with_pattern("^Report")
        .with_replacement("Paper")
        .with_condition("titles[].titleType", "^Subtitle$")]);

    assert!(run(&mut doc, &ops).updated);
    let titles: Vec<&str> = doc["titles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Paper 1", "Report 2", "Paper 3"]);
}

#[test]
fn extract_and_set_copies_capture() {
    let mut attributes = json!({"creators": [{"name": "Jane Doe (Dept A)"}]});
    let report = run_specs(
        &mut attributes,
        &[OperationSpec::new("creators[].nameIdentifier")
            .with_replacement("")
            .with_condition("creators[].name", r".*\((.*)\)")],
    )
    .unwrap();

    assert!(report.updated);
    assert_eq!(attributes["creators"][0]["nameIdentifier"], "Dept A");
}

#[test]
fn auto_vivification_keeps_siblings() {
    let mut doc = json!({"doi": "10.5072/x", "types": {"resourceTypeGeneral": "Dataset"}});
    let ops = compile(&[
        OperationSpec::new("types.resourceType").with_replacement("Survey"),
        OperationSpec::new("container.identifier.value").with_replacement("ISSN-1"),
    ]);
    assert!(run(&mut doc, &ops).updated);
    assert_eq!(
        doc,
        json!({
            "doi": "10.5072/x",
            "types": {"resourceTypeGeneral": "Dataset", "resourceType": "Survey"},
            "container": {"identifier": {"value": "ISSN-1"}}
        })
    );
}

#[test]
fn workflow_state_matrix() {
    let cases = [
        // (recorded state, pattern, requested, expected event)
        ("draft", Some("draft"), "findable", Some("publish")),
        ("Draft", Some("DRAFT"), "registered", Some("register")),
        ("registered", Some("draft"), "findable", None),
        ("findable", Some("findable"), "registered", Some("hide")),
        ("findable", None, "publish", Some("hide")),
        ("draft", None, "bogus", None),
    ];
    for (state, pattern, requested, expected) in cases {
        let mut doc = json!({"state": state});
        let mut spec = OperationSpec::new("state").with_replacement(requested);
        if let Some(p) = pattern {
            spec = spec.with_pattern(p);
        }
        let report = run_specs(&mut doc, &[spec]).unwrap();
        assert_eq!(report.updated, expected.is_some(), "state={state} pattern={pattern:?}");
        assert_eq!(doc.get("event").and_then(Value::as_str), expected);
        assert_eq!(doc["state"], state, "state label itself is never rewritten");
    }
}

#[test]
fn empty_operations_list_is_noop() {
    let mut doc = json!({"doi": "10.5072/x", "titles": [{"title": "a"}]});
    let before = doc.clone();
    let report = run_specs(&mut doc, &[]).unwrap();
    assert!(!report.updated);
    assert!(report.log.is_empty());
    assert_eq!(doc, before);
}

#[test]
fn validation_fails_fast_with_index() {
    let specs = vec![
        OperationSpec::new("titles[].title").with_pattern("a").with_replacement("b"),
        OperationSpec::new(""),
    ];
    match compile_batch(&specs) {
        Err(BatchError::Operation { index, .. }) => assert_eq!(index, 1),
        other => panic!("unexpected: {other:?}"),
    }
    assert!(matches!(compile_batch(&[]), Err(BatchError::EmptyBatch)));
}

#[test]
fn traversal_misses_are_not_errors() {
    let mut doc = json!({"titles": "not a list", "creators": [1, "two", null]});
    let report = run_specs(
        &mut doc,
        &[
            OperationSpec::new("titles[].title").with_pattern("x").with_replacement("y"),
            OperationSpec::new("creators[].name").with_pattern("x").with_replacement("y"),
            OperationSpec::new("doi")
                .with_replacement("10.5072/x")
                .with_condition("missing.path", ".*"),
        ],
    )
    .unwrap();
    assert!(!report.updated);
    assert_eq!(report.log.len(), 3);
    assert_eq!(doc, json!({"titles": "not a list", "creators": [1, "two", null]}));
}

#[test]
fn pattern_without_replacement_deletes_match() {
    let specs = parse_operations(r#"[{"attribute": "title", "pattern": " \\(draft\\)"}]"#).unwrap();
    let mut doc = json!({"title": "Survey (draft)"});
    let report = run_specs(&mut doc, &specs).unwrap();
    assert!(report.updated);
    assert_eq!(doc["title"], "Survey");
}

#[test]
fn attribute_only_operation_blanks_the_value() {
    let specs = parse_operations(r#"[{"attribute": "language"}]"#).unwrap();
    let mut doc = json!({"language": "en"});
    assert!(run_specs(&mut doc, &specs).unwrap().updated);
    assert_eq!(doc, json!({"language": ""}));
    assert!(!run_specs(&mut doc, &specs).unwrap().updated);
}

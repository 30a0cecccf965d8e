//! End-to-end checks of C# sources through the Tree-sitter front end and the
//! built-in rules.

use std::fs;
use std::path::Path;

use selector_lint_core::{Analyzer, AnalyzerBuilder, Config, Violation};
use selector_lint_rules::{all_rules, rules_from_config};
use selector_lint_ts::CSharpExtractor;

fn builder(config: Option<Config>) -> AnalyzerBuilder {
    let rules = match &config {
        Some(config) => rules_from_config(config),
        None => all_rules(),
    };
    let builder = rules
        .into_iter()
        .fold(Analyzer::builder(), AnalyzerBuilder::rule_box)
        .root("/repo")
        .extractor(CSharpExtractor::new());
    match config {
        Some(config) => builder.config(config),
        None => builder,
    }
}

fn wrap(statements: &str) -> String {
    format!(
        "using Mapping;\n\nclass Config\n{{\n    void Configure(TransformationMap<Source, Target> transformationMap)\n    {{\n        {statements}\n    }}\n}}\n"
    )
}

fn check_source(source: &str, config: Option<Config>) -> Vec<Violation> {
    builder(config)
        .build()
        .expect("build analyzer")
        .analyze_source(Path::new("/repo/Config.cs"), source)
        .expect("analyze")
        .violations
}

fn check(statements: &str) -> Vec<Violation> {
    check_source(&wrap(statements), None)
}

fn codes(violations: &[Violation]) -> Vec<&str> {
    violations.iter().map(|v| v.code.as_str()).collect()
}

fn snippet<'a>(source: &'a str, v: &Violation) -> &'a str {
    &source[v.location.offset..v.location.offset + v.location.length]
}

#[test]
fn empty_source_has_no_diagnostics() {
    assert!(check_source("", None).is_empty());
}

#[test]
fn simple_ignore_is_accepted() {
    assert!(check("transformationMap.Ignore(l => l.Link);").is_empty());
}

#[test]
fn wrapped_ignore_reports_once_at_wrapper() {
    let source = wrap("transformationMap.Ignore(l => Id(l.Link));");
    let violations = check_source(&source, None);

    assert_eq!(codes(&violations), ["TH1002"]);
    assert_eq!(snippet(&source, &violations[0]), "Id(l.Link)");
    assert_eq!(violations[0].location.line, 7);
    assert!(violations[0]
        .message
        .starts_with("Ignore selector cannot be used as an ignore path"));
}

#[test]
fn wrapped_link_and_ignore_reports_pair() {
    let source = wrap("transformationMap.LinkAndIgnore(\"wow\", l => Id(l.Link));");
    let violations = check_source(&source, None);

    assert_eq!(codes(&violations), ["TH1001A", "TH1001B"]);
    assert_eq!(violations[0].location, violations[1].location);
    assert_eq!(snippet(&source, &violations[1]), "Id(l.Link)");
    assert!(violations[0].message.contains("as a link target"));
    assert!(violations[1].message.contains("as an ignore path"));
}

#[test]
fn ordinary_named_swapped_matches_extension_form() {
    let extension = check("transformationMap.LinkAndIgnore(\"wow\", l => Id(l.Link));");
    let ordinary = check(
        "TransformationMapExtensions.LinkAndIgnore(transformationMap, selector: l => Id(l.Link), relation: \"wow\");",
    );
    assert_eq!(codes(&ordinary), codes(&extension));
}

#[test]
fn nested_chain_reports_for_both_methods() {
    assert_eq!(
        codes(&check("transformationMap.LinkAndIgnore(\"wow\", l => l.Inner.Outer);")),
        ["TH1001A", "TH1001B"]
    );
    assert_eq!(
        codes(&check("transformationMap.Ignore(l => l.Inner.Outer);")),
        ["TH1002"]
    );
}

#[test]
fn nested_chain_accepted_with_deeper_limit() {
    let config = Config::parse(
        "[rules.incorrect-link-and-ignore]\nmax_chain_depth = 2\n\n[rules.incorrect-ignore-expression]\nmax_chain_depth = 2\n",
    )
    .expect("config");
    let source = wrap(
        "transformationMap.LinkAndIgnore(\"wow\", l => l.Inner.Outer); transformationMap.Ignore(l => l.Inner.Outer);",
    );
    assert!(check_source(&source, Some(config)).is_empty());
}

#[test]
fn valid_shapes_in_every_form() {
    let accepted = [
        "transformationMap.Ignore(l => (Base)l.Link);",
        "transformationMap.Ignore(l => (l.Link));",
        "transformationMap.Ignore((l) => l.Link);",
        "transformationMap.Ignore(l => l);",
        "transformationMap.Ignore(selector: l => l.Link);",
        "TransformationMapExtensions.Ignore(transformationMap, l => l.Link);",
        "TransformationMapExtensions.Ignore(transformationMap, l => (Base)l.Link);",
        "transformationMap.LinkAndIgnore(\"wow\", l => (Base)l.Link);",
        "transformationMap.LinkAndIgnore(selector: l => l.Link, relation: \"wow\");",
        "TransformationMapExtensions.LinkAndIgnore(transformationMap, \"wow\", l => l.Link);",
        "TransformationMapExtensions.LinkAndIgnore(relation: \"wow\", selector: l => l.Link, transformationMap: transformationMap);",
    ];
    for statement in accepted {
        assert!(check(statement).is_empty(), "unexpected diagnostic for {statement}");
    }
}

#[test]
fn invalid_shapes_in_every_form() {
    let ignore = [
        "transformationMap.Ignore(l => l.Link + 1);",
        "transformationMap.Ignore(l => !l.Flag);",
        "transformationMap.Ignore(l => l.Flag ? l.A : l.B);",
        "transformationMap.Ignore(l => l.Items[0]);",
        "transformationMap.Ignore(l => ((Base)l).Link);",
        "transformationMap.Ignore(l => other.Link);",
        "transformationMap.Ignore((a, b) => a.Link);",
        "transformationMap.Ignore(l => { return l.Link; });",
        "transformationMap.Ignore(l => l.Link.ToString());",
        "TransformationMapExtensions.Ignore(transformationMap, l => Id(l.Link));",
        "TransformationMapExtensions.Ignore(selector: l => Id(l.Link), transformationMap: transformationMap);",
        "global::Tiger.Hal.TransformationMapExtensions.Ignore(transformationMap, l => Id(l.Link));",
        "transformationMap?.Ignore(l => Id(l.Link));",
    ];
    for statement in ignore {
        assert_eq!(codes(&check(statement)), ["TH1002"], "for {statement}");
    }

    let link = [
        "transformationMap.LinkAndIgnore(selector: l => Id(l.Link), relation: \"wow\");",
        "transformationMap.LinkAndIgnore(relation: \"wow\", selector: l => Id(l.Link));",
        "TransformationMapExtensions.LinkAndIgnore(transformationMap, \"wow\", l => Id(l.Link));",
        "transformationMap?.LinkAndIgnore(\"wow\", l => Id(l.Link));",
    ];
    for statement in link {
        assert_eq!(codes(&check(statement)), ["TH1001A", "TH1001B"], "for {statement}");
    }
}

#[test]
fn unmatched_calls_are_silent() {
    let silent = [
        "transformationMap.Ignore(selector);",
        "transformationMap.Ignore(l => Id(l.Link), 1);",
        "transformationMap.LinkAndIgnore(l => Id(l.Link));",
        "OtherExtensions.Ignore(transformationMap, l => Id(l.Link));",
        "transformationMap.Ignore(relation: l => Id(l.Link));",
        "transformationMap.Link(\"wow\", l => Id(l.Link));",
    ];
    for statement in silent {
        assert!(check(statement).is_empty(), "unexpected diagnostic for {statement}");
    }
}

#[test]
fn calls_with_syntax_errors_are_skipped() {
    assert!(check("transformationMap.Ignore(l => Id(l.Link) + );").is_empty());
}

#[test]
fn diagnostics_follow_source_order() {
    let violations = check(
        "transformationMap.Ignore(l => Id(l.A));\n        transformationMap.LinkAndIgnore(\"wow\", l => Id(l.B));\n        transformationMap.Ignore(l => l.C);",
    );
    assert_eq!(codes(&violations), ["TH1002", "TH1001A", "TH1001B"]);
    assert!(violations[0].location.line < violations[1].location.line);
}

#[test]
fn fluent_chain_checks_every_call() {
    let statement =
        "transformationMap.Ignore(l => l.Link).LinkAndIgnore(\"wow\", l => Id(l.Link));";
    let source = wrap(statement);
    let violations = check_source(&source, None);
    assert_eq!(codes(&violations), ["TH1001A", "TH1001B"]);
    assert!(violations.iter().all(|v| snippet(&source, v) == "Id(l.Link)"));
}

#[test]
fn fluent_chain_reports_in_source_order() {
    let source = wrap(
        "transformationMap\n            .Ignore(l => Id(l.A))\n            .LinkAndIgnore(\"wow\", l => Id(l.B));",
    );
    let violations = check_source(&source, None);
    assert_eq!(codes(&violations), ["TH1002", "TH1001A", "TH1001B"]);
    assert_eq!(snippet(&source, &violations[0]), "Id(l.A)");
    assert_eq!(snippet(&source, &violations[1]), "Id(l.B)");
    assert_eq!(snippet(&source, &violations[2]), "Id(l.B)");
}

#[test]
fn classification_is_idempotent() {
    let source = wrap("transformationMap.LinkAndIgnore(\"wow\", l => Id(l.Link));");
    assert_eq!(check_source(&source, None), check_source(&source, None));
}

#[test]
fn analyzes_project_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("Config.cs"),
        wrap("transformationMap.LinkAndIgnore(\"wow\", l => Id(l.Link));"),
    )
    .expect("write");
    fs::create_dir(dir.path().join("obj")).expect("mkdir");
    fs::write(
        dir.path().join("obj/Generated.cs"),
        wrap("transformationMap.Ignore(l => Id(l.Link));"),
    )
    .expect("write");
    fs::write(dir.path().join("README.md"), "transformationMap.Ignore(l => Id(l.Link));")
        .expect("write");

    let result = builder(None)
        .root(dir.path())
        .build()
        .expect("build analyzer")
        .analyze()
        .expect("analyze");

    assert_eq!(result.files_checked, 1);
    assert_eq!(codes(&result.violations), ["TH1001A", "TH1001B"]);
    assert_eq!(result.violations[0].location.file, Path::new("Config.cs"));
}

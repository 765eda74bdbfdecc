#![allow(clippy::unwrap_used, clippy::expect_used)]

use peek_diagnostic::ErrorCode;
use peek_lexer::lex;
use peek_parse::parse;
use pretty_assertions::assert_eq;

use super::{Plan, Planner};
use crate::{WrapError, SENTINEL_REPLACEMENT};

fn plan(source: &str) -> Plan {
    let out = parse(&lex(source)).unwrap();
    Planner::plan(&out.arena, source, out.root).unwrap()
}

/// Candidate texts, in the order they were added.
fn candidates(source: &str) -> Vec<&str> {
    plan(source)
        .candidates
        .iter()
        .map(|span| span.slice(source))
        .collect()
}

#[test]
fn parents_come_before_children() {
    assert_eq!(candidates("a b"), vec!["a b", "b"]);
    assert_eq!(candidates("[1, [2]]"), vec!["[1, [2]]", "1", "[2]", "2"]);
}

#[test]
fn declaration_headers_are_skipped() {
    assert_eq!(candidates("class A < B\n1\nend"), vec!["1"]);
    assert_eq!(candidates("module M\nend"), Vec::<&str>::new());
    assert_eq!(
        candidates("def a(b = 2)\nb\nend"),
        vec!["def a(b = 2)\nb\nend", "b"]
    );
    assert_eq!(candidates("alias a b\nundef c"), Vec::<&str>::new());
}

#[test]
fn splats_and_block_passes_are_skipped() {
    assert_eq!(candidates("[1, *a]"), vec!["[1, *a]", "1"]);
    assert_eq!(candidates("f(*a, &b)"), vec!["f(*a, &b)"]);
}

#[test]
fn hashes_contribute_values_only() {
    assert_eq!(candidates("{a: 1}"), vec!["{a: 1}", "1"]);
    assert_eq!(candidates("f(k: 2)"), vec!["f(k: 2)", "2"]);
}

#[test]
fn multiple_assignment_lists() {
    assert_eq!(candidates("a, b = 1, 2"), vec!["a, b = 1, 2", "1", "2"]);
    assert_eq!(
        candidates("a, b = [1, 2]"),
        vec!["a, b = [1, 2]", "[1, 2]", "1", "2"]
    );
}

#[test]
fn blocks_skip_the_call_itself() {
    assert_eq!(
        candidates("foo.bar(1) { 2 }"),
        vec!["foo.bar(1) { 2 }", "foo", "2"]
    );
}

#[test]
fn void_statements_contribute_their_operands() {
    assert_eq!(
        candidates("def a\nreturn if x\nend"),
        vec!["def a\nreturn if x\nend", "x"]
    );
    assert_eq!(candidates("loop { break 1 }"), vec!["loop { break 1 }", "1"]);
}

#[test]
fn loops_skip_their_variables() {
    assert_eq!(
        candidates("for a in b\n1\nend"),
        vec!["for a in b\n1\nend", "b", "1"]
    );
}

#[test]
fn case_skips_when_conditions() {
    assert_eq!(
        candidates("case x\nwhen 1\n2\nend"),
        vec!["case x\nwhen 1\n2\nend", "x", "2"]
    );
}

#[test]
fn rescue_modifier_is_a_candidate() {
    assert_eq!(candidates("1 rescue nil"), vec!["1 rescue nil", "1", "nil"]);
}

#[test]
fn interpolated_code_is_never_a_candidate() {
    assert_eq!(candidates("\"a#{b}\""), vec!["\"a#{b}\""]);
}

#[test]
fn sentinel_is_replaced_and_still_wrapped() {
    let plan = plan("__TOTAL_FAILURE__");
    assert_eq!(plan.candidates.len(), 1);
    assert_eq!(plan.replacements.len(), 1);
    assert_eq!(plan.replacements[0].text, SENTINEL_REPLACEMENT);
}

#[test]
fn span_past_source_is_internal_error() {
    let out = parse(&lex("abcdef")).unwrap();
    let err = Planner::plan(&out.arena, "ab", out.root).unwrap_err();
    assert!(matches!(err, WrapError::Internal { code: ErrorCode::E9001, .. }));
}

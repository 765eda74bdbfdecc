#![allow(clippy::unwrap_used, clippy::expect_used)]

use peek_ir::{NodeId, NodeKind};
use peek_lexer::lex;
use peek_parse::{parse, ParseOutput};

use super::is_void;

fn parsed(source: &str) -> ParseOutput {
    let lexed = lex(source);
    assert!(lexed.errors.is_empty(), "{source:?}: {:?}", lexed.errors);
    parse(&lexed).unwrap()
}

/// The first node, in allocation order, whose kind matches `tag`.
fn find(out: &ParseOutput, tag: &str) -> NodeId {
    (0..out.arena.len())
        .map(|i| NodeId::new(u32::try_from(i).unwrap()))
        .find(|&id| out.arena.kind(id).name() == tag)
        .unwrap_or_else(|| panic!("no `{tag}` node"))
}

fn void(source: &str, tag: &str) -> bool {
    let out = parsed(source);
    is_void(&out.arena, find(&out, tag))
}

#[test]
fn jumps_are_void() {
    assert!(void("def a; return; end", "return"));
    assert!(void("loop { next }", "next"));
    assert!(void("loop { redo }", "redo"));
    assert!(void("loop { break }", "break"));
    assert!(void("begin; rescue; retry; end", "retry"));
}

#[test]
fn if_is_void_when_either_arm_is() {
    assert!(void("def a; if 1; return 2; else; 3; end; end", "if"));
    assert!(void("def a; if 1; 2; else; return 3; end; end", "if"));
    assert!(!void("def a; if 1; 2; else; 3; end; end", "if"));
}

#[test]
fn single_armed_if_follows_its_arm() {
    assert!(void("def a; if 1; return 2; end; end", "if"));
    assert!(!void("def a; if 1; 2; end; end", "if"));
    assert!(void("def a; return if 1; end", "if"));
    assert!(!void("def a; 2 unless 1; end", "if"));
}

#[test]
fn begin_follows_its_last_statement() {
    assert!(void("loop { begin; break; end }", "kwbegin"));
    assert!(!void("loop { begin; 1; end }", "kwbegin"));
    assert!(void("loop { (1; break) }", "begin"));
    assert!(!void("loop { (break; 1) }", "begin"));
}

#[test]
fn rescue_follows_else_over_body() {
    assert!(void("begin; rescue; 1; else; retry; end", "rescue"));
    assert!(!void("begin; rescue; 1; else; 2; end", "rescue"));
    assert!(!void("loop { begin; break; rescue; else; 2; end }", "rescue"));
    assert!(void("loop { begin; break; rescue; 1; end }", "rescue"));
}

#[test]
fn rescue_without_body_is_not_void() {
    assert!(!void("begin; rescue; retry; end", "rescue"));
}

#[test]
fn ensure_is_void_when_either_part_is() {
    assert!(void("loop { begin; break; ensure; 1; end }", "ensure"));
    assert!(void("loop { begin; 1; ensure; break; end }", "ensure"));
    assert!(!void("loop { begin; 1; ensure; 2; end }", "ensure"));
}

#[test]
fn other_things_are_not_void() {
    let out = parsed("123");
    assert_eq!(out.arena.kind(out.root), NodeKind::Int);
    assert!(!is_void(&out.arena, out.root));
    assert!(!void("loop { break }", "block"));
    assert!(!void("while true; break; end", "while"));
}

#[test]
fn absent_node_is_not_void() {
    let out = parsed("1");
    assert!(!is_void(&out.arena, NodeId::INVALID));
}

#[test]
fn deeply_nested_sequences() {
    let depth = 20_000;
    let nested = |inner: &str| format!("{}{inner}{}", "(".repeat(depth), ")".repeat(depth));

    let out = parsed(&nested("1"));
    assert!(!is_void(&out.arena, out.root));

    let out = parsed(&format!("def a\n{}\nend", nested("return")));
    assert!(is_void(&out.arena, find(&out, "begin")));
}

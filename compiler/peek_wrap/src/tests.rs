#![allow(clippy::unwrap_used, clippy::expect_used)]

use peek_diagnostic::ErrorCode;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use crate::{wrap, FnHooks, Markers, WrapError};

/// Wrap `code` (given a trailing newline if it lacks one) and drop one
/// trailing newline from the result.
fn wrap_with(code: &str, mut markers: Markers) -> String {
    let mut code = code.to_owned();
    if !code.ends_with('\n') {
        code.push('\n');
    }
    let out = wrap(&code, &mut markers).unwrap_or_else(|err| panic!("{code:?}: {err}"));
    match out.strip_suffix('\n') {
        Some(chomped) => chomped.to_owned(),
        None => out,
    }
}

fn wrapped(code: &str) -> String {
    wrap_with(code, Markers::new("<", ">"))
}

fn wrapped_with_body(code: &str) -> String {
    wrap_with(code, Markers::new("<", ">").with_body("[", "]"))
}

fn heredoc_wrapped(code: &str) -> String {
    wrap_with(code, Markers::new("{", "}").with_body("[", "]"))
}

fn check(cases: &[(&str, &str)], wrap: fn(&str) -> String) {
    for &(input, expected) in cases {
        assert_eq!(wrap(input), expected, "input: {input:?}");
    }
}

// === Errors and fault injection ===

#[test]
fn invalid_program_is_a_syntax_error() {
    let err = wrap("+", &mut Markers::new("<", ">")).unwrap_err();
    let WrapError::Syntax { code, location, .. } = err else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert!(code.is_parser_error());
    assert_eq!(location.start_line, 1);
}

#[test]
fn lexical_error_is_a_syntax_error() {
    let err = wrap("a\n'open", &mut Markers::new("<", ">")).unwrap_err();
    assert!(err.code().is_some_and(|code| code.is_lexer_error()));
    assert!(matches!(err, WrapError::Syntax { location, .. } if location.start_line == 2));
}

#[test]
fn unsupported_syntax_is_reported() {
    let err = wrap("case 1\nin Integer\nend", &mut Markers::new("<", ">")).unwrap_err();
    assert!(matches!(err, WrapError::Syntax { .. }));
}

#[test]
fn sentinel_is_replaced() {
    assert_eq!(wrapped("__TOTAL_FAILURE__"), "<.....TOTAL FAILURE!.....>");
    assert_eq!(wrapped("a = 1\n__TOTAL_FAILURE__"), "<a = 1>\n<.....TOTAL FAILURE!.....>");
}

// === The body ===

#[test]
fn wraps_body_ignoring_leading_comments_and_data_segment() {
    check(
        &[
            ("#comment\nA\n__END__\n1", "#comment\n[<A>]\n__END__\n1"),
            ("#comment\n__END__\n1", "[]#comment\n__END__\n1"),
            ("", "[]"),
            ("# abc", "[]# abc"),
            ("1# abc", "[<1>]# abc"),
        ],
        wrapped_with_body,
    );
}

#[test]
fn data_segment_starts_its_own_line() {
    check(
        &[
            ("__END__", "[]\n__END__"),
            ("\n__END__", "[]\n__END__"),
            ("\n\n__END__", "[]\n\n__END__"),
            ("__END__!", "[<__END__!>]"),
            ("%(\n__END__\n)", "[<%(\n__END__\n)>]"),
        ],
        wrapped_with_body,
    );
}

#[test]
fn identifies_the_last_line_of_the_body() {
    assert_eq!(
        wrapped_with_body("a\ndef b\n  c = 1\nend"),
        "[<a>\n<def b\n  <c = 1>\nend>]"
    );
}

#[test]
fn body_heredocs() {
    check(
        &[
            ("<<A\nA", "[{<<A}]\nA"),
            ("<<A\nA\n<<B\nB", "[{<<A}\nA\n{<<B}]\nB"),
            ("<<A.size 1\nA", "[{<<A.size 1}]\nA"),
            ("<<A.size\nA", "[{<<A.size}]\nA"),
            ("<<A.size()\nA", "[{<<A.size()}]\nA"),
            ("a.size <<A\nA", "[{a.size <<A}]\nA"),
            ("<<A.size <<B\nA\nB", "[{<<A.size <<B}]\nA\nB"),
            ("<<A.size(<<B)\nA\nB", "[{<<A.size(<<B)}]\nA\nB"),
        ],
        heredoc_wrapped,
    );
}

#[test]
fn hooks_receive_line_numbers() {
    let mut opened = Vec::new();
    let mut closed = Vec::new();
    let mut hooks = FnHooks::new(
        String::new,
        String::new,
        |line| {
            opened.push(line);
            "<".to_owned()
        },
        |line| {
            closed.push(line);
            ">".to_owned()
        },
    );
    assert_eq!(wrap("\na\n", &mut hooks).unwrap(), "\n<a>\n");
    drop(hooks);
    assert_eq!(opened, vec![2]);
    assert_eq!(closed, vec![2]);
}

#[test]
fn multi_line_wraps_get_start_and_end_lines() {
    let mut hooks = FnHooks::new(
        String::new,
        String::new,
        |line| format!("<{line}|"),
        |line| format!("|{line}>"),
    );
    let out = wrap("[1,\n2]", &mut hooks).unwrap();
    assert_eq!(out, "<1|[<1|1|1>,\n2]|2>");
}

#[test]
fn empty_program() {
    assert_eq!(wrapped(""), "");
}

#[test]
fn ignores_comments() {
    check(
        &[
            ("# comment", "# comment"),
            ("1 #abc\n#def", "<1> #abc\n#def"),
            ("1\n=begin\n2\n=end", "<1>\n=begin\n2\n=end"),
            ("=begin\n1\n=end\n2", "=begin\n1\n=end\n<2>"),
        ],
        wrapped,
    );
}

// === Basic expressions ===

#[test]
fn wraps_expressions() {
    check(
        &[
            ("A", "<A>"),
            ("A\nB", "<A>\n<B>"),
            ("(1\n2)", "<(<1>\n2)>"),
            ("(1\n2\n)", "<(<1>\n<2>\n)>"),
            ("begin\n1\n2\nend", "<begin\n<1>\n<2>\nend>"),
            ("A do\nB\nend", "<A do\n<B>\nend>"),
            ("a;b", "a;<b>"),
            ("(1)", "<(1)>"),
            ("(\n<<doc\ndoc\n)", "<(\n<<<doc>\ndoc\n)>"),
        ],
        wrapped,
    );
}

#[test]
fn void_values_are_not_wrapped() {
    check(
        &[
            ("def a\n1\nreturn 2\nend", "<def a\n<1>\nreturn <2>\nend>"),
            ("def a\nreturn 1\n2\nend", "<def a\nreturn <1>\n<2>\nend>"),
        ],
        wrapped,
    );
}

#[test]
fn wraps_simple_literals() {
    let literals = [
        "123",
        "-123",
        "1_123",
        "-543",
        "123_456_789_123_456_789",
        "123.45",
        "1.2e-3",
        "0xaabb",
        "0377",
        "-0b1010",
        "0b001_001",
        "?a",
        "?\\C-a",
        "?\\M-a",
        "?\\M-\\C-a",
        "1..2",
        "1...2",
        "(true==true)..(1==2)",
        "true",
        "false",
        "nil",
        "self",
        "[1,2,3]",
        "[1,*a,*[2,3,4]]",
        "%w(1)",
        "%W(2)",
        "%x[ls]",
        "/abc/",
        "%r(abc)",
        "%r.abc.",
        ":abc",
        ":'abc'",
        ":\"abc\"",
        ":\"a#{1}\"",
        "{1=>2}",
        "{a:1}",
    ];
    for literal in literals {
        assert_eq!(wrapped(literal), format!("<{literal}>"), "literal: {literal:?}");
    }
}

#[test]
fn wraps_macros() {
    check(
        &[
            ("__FILE__", "<__FILE__>"),
            ("__LINE__", "<__LINE__>"),
            ("__ENCODING__", "<__ENCODING__>"),
            ("defined? a", "<defined? a>"),
        ],
        wrapped,
    );
}

#[test]
fn alias_and_undef_are_not_wrapped() {
    check(
        &[("alias tos to_s", "alias tos to_s"), ("undef tos", "undef tos")],
        wrapped,
    );
}

#[test]
fn shell_commands_but_not_their_interpolations() {
    check(
        &[
            ("`a\nb`", "<`a\nb`>"),
            ("`a\n#{1\n2\n3}b`", "<`a\n#{1\n2\n3}b`>"),
        ],
        wrapped,
    );
}

#[test]
fn variable_lookups() {
    check(
        &[("a", "<a>"), ("$a", "<$a>"), ("@a", "<@a>"), ("@@a", "<@@a>")],
        wrapped,
    );
}

// === Method calls ===

#[test]
fn method_calls() {
    check(
        &[
            ("a()", "<a()>"),
            ("a b", "<a b>"),
            ("a(b,c=1,*d,&e)", "<a(b,c=1,*d,&e)>"),
            ("a { }", "<a { }>"),
            ("a {\n}", "<a {\n}>"),
            ("a(b) {\n}", "<a(b) {\n}>"),
            ("1.mod(2)", "<1.mod(2)>"),
            ("1.mod 2", "<1.mod 2>"),
            ("1+1", "<1+1>"),
            ("a.b+1", "<a.b+1>"),
            ("a.b - 1", "<a.b - 1>"),
            ("a.b -1", "<a.b -1>"),
            ("!1", "<!1>"),
            ("~1", "<~1>"),
            ("a.b!", "<a.b!>"),
            ("a.b?", "<a.b?>"),
        ],
        wrapped,
    );
}

#[test]
fn multi_line_method_chains() {
    check(
        &[
            ("a\n.b\n.c", "<<<a>\n.b>\n.c>"),
            ("a\n.b{\n}", "<<a>\n.b{\n}>"),
            ("a\n.b{}", "<<a>\n.b{}>"),
            (
                "[*1..5]\n.map { |n| n * 2 }\n.take(2).\nsize",
                "<<<<[*1..5]>\n.map { |n| n * 2 }>\n.take(2)>.\nsize>",
            ),
            ("a = b\n.c\na", "<a = <b>\n.c>\n<a>"),
        ],
        wrapped,
    );
}

#[test]
fn multi_line_arguments() {
    check(
        &[
            ("a 1,\n2", "<a <1>,\n2>"),
            ("a(\n*a\n)", "<a(\n*a\n)>"),
            ("a(\n*1..2\n)", "<a(\n*1..2\n)>"),
            ("a(b: 1,\nc: 2\n)", "<a(b: <1>,\nc: <2>\n)>"),
        ],
        wrapped,
    );
}

// === Assignment ===

#[test]
fn simple_assignment() {
    check(
        &[
            ("a=1", "<a=1>"),
            ("a.b=1", "<a.b=1>"),
            ("A=1", "<A=1>"),
            ("::A=1", "<::A=1>"),
            ("A::B=1", "<A::B=1>"),
            ("@a=1", "<@a=1>"),
            ("@@a=1", "<@@a=1>"),
            ("$a=1", "<$a=1>"),
            ("a=b=1", "<a=b=1>"),
            ("a=b=\n1", "<a=b=\n1>"),
            ("a=\nb=\n1", "<a=\nb=\n1>"),
        ],
        wrapped,
    );
}

#[test]
fn multiple_assignment() {
    check(
        &[
            ("a,b=c", "<a,b=c>"),
            ("a,b=1,2", "<a,b=1,2>"),
            ("a,b.c=1,2", "<a,b.c=1,2>"),
            ("a,B=1,2", "<a,B=1,2>"),
            ("a,B::C=1,2", "<a,B::C=1,2>"),
            ("a,@b=1,2", "<a,@b=1,2>"),
            ("a,@@b=1,2", "<a,@@b=1,2>"),
            ("a,$b=1,2", "<a,$b=1,2>"),
            ("a, b = x.()", "<a, b = x.()>"),
            ("a, b = c\n.d,\ne\n.f", "<a, b = <<c>\n.d>,\n<e>\n.f>"),
            ("a,b=1,\n2", "<a,b=<1>,\n2>"),
            ("a,b=[1,2]\n.map(&:to_s)", "<a,b=<[1,2]>\n.map(&:to_s)>"),
            ("a,b=[1,\n2\n.even?\n]", "<a,b=[<1>,\n<<2>\n.even?>\n]>"),
            ("a,* =1,2,3", "<a,* =1,2,3>"),
            ("a,* =[1,2,3]", "<a,* =[1,2,3]>"),
            ("a,* = [ 1,2,3 ] ", "<a,* = [ 1,2,3 ]> "),
        ],
        wrapped,
    );
}

#[test]
fn operator_assignment() {
    check(
        &[
            ("a += 1", "<a += 1>"),
            ("a *= 1", "<a *= 1>"),
            ("a -= 1", "<a -= 1>"),
            ("a /= 1", "<a /= 1>"),
            ("a **= 1", "<a **= 1>"),
            ("a |= 1", "<a |= 1>"),
            ("a &= 1", "<a &= 1>"),
            ("a ||= 1", "<a ||= 1>"),
            ("a &&= 1", "<a &&= 1>"),
            ("a[1] = 2", "<a[1] = 2>"),
            ("a[1] ||= 2", "<a[1] ||= 2>"),
            ("@a  ||= 123", "<@a  ||= 123>"),
            ("$a  ||= 123", "<$a  ||= 123>"),
            ("@@a ||= 123", "<@@a ||= 123>"),
            ("B   ||= 123", "<B   ||= 123>"),
            ("@a  ||= begin\n123\nend", "<@a  ||= begin\n<123>\nend>"),
            ("B   ||= begin\n123\nend", "<B   ||= begin\n<123>\nend>"),
        ],
        wrapped,
    );
}

#[test]
fn assignments_spanning_lines() {
    check(
        &[
            ("a={\n}", "<a={\n}>"),
            ("a, b = c,{\n}", "<a, b = <c>,{\n}>"),
            ("a.b={\n}", "<<a>.b={\n}>"),
            ("A::B={\n}", "<A::B={\n}>"),
            ("$a={\n}", "<$a={\n}>"),
            ("a,b={\n}", "<a,b={\n}>"),
            ("a,b={\n},{\n}", "<a,b=<{\n}>,{\n}>"),
            ("a,B::C={\n},{\n}", "<a,B::C=<{\n}>,{\n}>"),
            ("a=\nb={\n}", "<a=\nb={\n}>"),
            ("a +={\n}", "<a +={\n}>"),
            ("a ||= {\n}", "<a ||= {\n}>"),
            ("a[1] = {\n}", "<a[<1>] = {\n}>"),
            ("a[1]   ||= {\n}", "<a[1]   ||= {\n}>"),
            ("{}[:a] ||= {\n}", "<{}[:a] ||= {\n}>"),
            ("a.b  += {\n}", "<a.b  += {\n}>"),
            ("a.b &&= {\n}", "<a.b &&= {\n}>"),
            ("a[1\n]=2", "<a[<1>\n]=2>"),
            ("a[1,\n2\n]=3", "<a[<1>,\n<2>\n]=3>"),
        ],
        wrapped,
    );
}

// === Conditionals ===

#[test]
fn if_elsif_else() {
    check(
        &[
            (
                "if 1\n2\nelsif 2\n3\nelsif 4\n5\nend",
                "<if <1>\n<2>\nelsif <2>\n<3>\nelsif <4>\n<5>\nend>",
            ),
            (
                "if 1\n2\nelsif 2\n3\nelse\n4\nend",
                "<if <1>\n<2>\nelsif <2>\n<3>\nelse\n<4>\nend>",
            ),
            ("if 1\n2\nelse\n2\nend", "<if <1>\n<2>\nelse\n<2>\nend>"),
            ("if 1\n2\nend", "<if <1>\n<2>\nend>"),
            (
                "if 1 then\n2\nelsif 2 then\n3\nelse\n4\nend",
                "<if <1> then\n<2>\nelsif <2> then\n<3>\nelse\n<4>\nend>",
            ),
            ("if 1 then\n2\nend", "<if <1> then\n<2>\nend>"),
            ("1 if 2", "<1 if 2>"),
            ("if /a/\n1\nend", "<if /a/\n<1>\nend>"),
        ],
        wrapped,
    );
}

#[test]
fn ternaries() {
    check(
        &[
            ("1 ? 2 : 3", "<1 ? 2 : 3>"),
            ("1\\\n?\\\n2\\\n:\\\n3", "<<1>\\\n?\\\n<2>\\\n:\\\n3>"),
        ],
        wrapped,
    );
}

#[test]
fn unless() {
    check(
        &[
            ("unless 1\n2\nelse\n3\nend", "<unless <1>\n<2>\nelse\n<3>\nend>"),
            ("unless 1\n2\nend", "<unless <1>\n<2>\nend>"),
            ("unless 1 then\n2\nend", "<unless <1> then\n<2>\nend>"),
            ("1 unless 2", "<1 unless 2>"),
        ],
        wrapped,
    );
}

#[test]
fn case_wraps_subject_and_bodies_not_conditions() {
    check(
        &[
            (
                "case 1\nwhen 2\n3\nwhen 4, 5\nelse\n6\nend",
                "<case <1>\nwhen 2\n<3>\nwhen 4, 5\nelse\n<6>\nend>",
            ),
            ("case 1\nwhen 2\nend", "<case <1>\nwhen 2\nend>"),
            ("case\nwhen 2\nend", "<case\nwhen 2\nend>"),
            ("case\nwhen 2, 3\n4\n5\nend", "<case\nwhen 2, 3\n<4>\n<5>\nend>"),
            (
                "case 1\nwhen 2 then\n3\nwhen 4, 5 then\nelse\n6\nend",
                "<case <1>\nwhen 2 then\n<3>\nwhen 4, 5 then\nelse\n<6>\nend>",
            ),
        ],
        wrapped,
    );
}

#[test]
fn void_branches_suppress_the_conditional() {
    check(
        &[
            ("def a\nif true\nreturn 1\nend\nend", "<def a\nif <true>\nreturn <1>\nend\nend>"),
            (
                "def a\nif true\n1\nelse\nreturn 2\nend\nend",
                "<def a\nif <true>\n<1>\nelse\nreturn <2>\nend\nend>",
            ),
            (
                "def a\nif true\n1\nelsif true\n2\nelse\nreturn 3\nend\nend",
                "<def a\nif <true>\n<1>\nelsif <true>\n<2>\nelse\nreturn <3>\nend\nend>",
            ),
            (
                "def a\nif true\nif true\nreturn 1\nend\nend\nend",
                "<def a\nif <true>\nif <true>\nreturn <1>\nend\nend\nend>",
            ),
            (
                "def a\nunless true\nreturn 1\nend\nend",
                "<def a\nunless <true>\nreturn <1>\nend\nend>",
            ),
            (
                "def a\ntrue ?\n(return 1) :\n2\nend",
                "<def a\n<true> ?\n(return <1>) :\n<2>\nend>",
            ),
            (
                "def a\ntrue ?\n1 :\n(return 2)\nend",
                "<def a\n<true> ?\n<1> :\n(return <2>)\nend>",
            ),
            ("def a\nreturn if 1\nend", "<def a\nreturn if <1>\nend>"),
        ],
        wrapped,
    );
}

#[test]
fn single_armed_if_without_jump_is_wrapped() {
    check(
        &[
            ("def a\nif true\n1\nend\nend", "<def a\n<if <true>\n<1>\nend>\nend>"),
            ("def a\n1 if true\nend", "<def a\n<1 if true>\nend>"),
        ],
        wrapped,
    );
}

#[test]
fn boolean_operators() {
    check(
        &[
            ("1\\\n&& 2", "<<1>\\\n&& 2>"),
            ("1\\\nand 2", "<<1>\\\nand 2>"),
            ("1\\\n|| 2", "<<1>\\\n|| 2>"),
            ("1\\\nor 2", "<<1>\\\nor 2>"),
            ("not\\\n1", "<not\\\n1>"),
            ("!\\\n1", "<!\\\n1>"),
        ],
        wrapped,
    );
}

// === Loops ===

#[test]
fn loops() {
    check(
        &[
            ("until 1\n2\nend", "<until <1>\n<2>\nend>"),
            ("1 until 2", "<1 until 2>"),
            ("begin\n1\nend until true", "<begin\n<1>\nend until true>"),
            ("while 1\n2\nend", "<while <1>\n<2>\nend>"),
            ("1 while 2", "<1 while 2>"),
            ("begin\n1\nend while true", "<begin\n<1>\nend while true>"),
            ("for a in range;1;end", "<for a in range;1;end>"),
            ("for a in range\n1\nend", "<for a in <range>\n<1>\nend>"),
            ("for a in range do\n1\nend", "<for a in <range> do\n<1>\nend>"),
            ("for a,b in whatev\n1\nend", "<for a,b in <whatev>\n<1>\nend>"),
            ("loop do\nredo\nend", "<loop do\nredo\nend>"),
            ("loop do\nbreak 1\nend", "<loop do\nbreak <1>\nend>"),
            ("loop do\nnext 10\nend", "<loop do\nnext <10>\nend>"),
        ],
        wrapped,
    );
}

// === Constants and collections ===

#[test]
fn constants() {
    check(&[("A", "<A>"), ("::A", "<::A>"), ("A::B", "<A::B>")], wrapped);
}

#[test]
fn hashes() {
    check(
        &[
            ("{}", "<{}>"),
            ("{\n1 => 2}", "<{\n1 => 2}>"),
            (
                "{\n1 => 2,\n:abc => 3,\ndef: 4\n}",
                "<{\n1 => <2>,\n:abc => <3>,\ndef: <4>\n}>",
            ),
        ],
        wrapped,
    );
}

#[test]
fn arrays() {
    check(
        &[
            ("[1]", "<[1]>"),
            ("[1,\n2,\n]", "<[<1>,\n<2>,\n]>"),
            ("[1, 2,\n]", "<[1, <2>,\n]>"),
            ("%w[\n1\n]", "<%w[\n1\n]>"),
            ("[1,\n*2..3,\n4\n]", "<[<1>,\n*2..3,\n<4>\n]>"),
        ],
        wrapped,
    );
}

// === Strings and regexps ===

#[test]
fn regexps() {
    check(
        &[
            ("/a/", "</a/>"),
            ("/(?<a>x)/", "</(?<a>x)/>"),
            ("%r(a)", "<%r(a)>"),
            ("%r'a'", "<%r'a'>"),
            ("/a\nb/", "</a\nb/>"),
            ("/a\nb/i", "</a\nb/i>"),
            ("/a#{1}/", "</a#{1}/>"),
            ("/a\n#{1}\nb/", "</a\n#{1}\nb/>"),
            ("/a\n#{1\n}b/", "</a\n#{1\n}b/>"),
        ],
        wrapped,
    );
}

#[test]
fn strings() {
    check(
        &[
            ("'a'", "<'a'>"),
            ("\"a\"", "<\"a\">"),
            ("%'a'", "<%'a'>"),
            ("%q'a'", "<%q'a'>"),
            ("%Q'a'", "<%Q'a'>"),
            ("'a\nb'", "<'a\nb'>"),
            ("\"a\nb\"", "<\"a\nb\">"),
            ("\"a#{1}\"", "<\"a#{1}\">"),
            ("\"a\n#{1}\nb\"", "<\"a\n#{1}\nb\">"),
            ("\"a\n#{1\n}b\"", "<\"a\n#{1\n}b\">"),
            ("%(A)", "<%(A)>"),
            ("%.A.", "<%.A.>"),
            ("%q(A)", "<%q(A)>"),
            ("%Q.A.", "<%Q.A.>"),
        ],
        wrapped,
    );
}

// === Heredocs ===

#[test]
fn heredocs_wrap_on_their_first_line() {
    check(
        &[
            ("<<HERE.()\na\nHERE", "[{<<HERE.()}]\na\nHERE"),
            ("<<A\n123\nA", "[{<<A}]\n123\nA"),
            ("<<-A\nA", "[{<<-A}]\nA"),
            ("<<-A\n123\nA", "[{<<-A}]\n123\nA"),
            ("1\n<<A\nA", "[{1}\n{<<A}]\nA"),
            ("<<A + <<B\n1\nA\n2\nB", "[{<<A + <<B}]\n1\nA\n2\nB"),
            ("<<A\n1\nA\n<<B\n2\nB", "[{<<A}\n1\nA\n{<<B}]\n2\nB"),
            ("puts <<A\nA\nputs <<B\nB", "[{puts <<A}\nA\n{puts <<B}]\nB"),
        ],
        heredoc_wrapped,
    );
}

#[test]
fn heredocs_as_arguments_and_values() {
    check(
        &[
            ("a(<<HERE)\nHERE", "[{a(<<HERE)}]\nHERE"),
            ("a <<HERE\nHERE", "[{a <<HERE}]\nHERE"),
            ("a 1, <<HERE\nHERE", "[{a 1, <<HERE}]\nHERE"),
            (
                "a.b 1, 2, <<HERE1, <<-HERE2 \nHERE1\n HERE2",
                "[{a.b 1, 2, <<HERE1, <<-HERE2}] \nHERE1\n HERE2",
            ),
            ("a.b 1,\n2,\n<<HERE\nHERE", "[{a.b {1},\n{2},\n<<HERE}]\nHERE"),
            ("a=<<A\nA", "[{a=<<A}]\nA"),
            ("a,b=<<A,<<B\nA\nB", "[{a,b=<<A,<<B}]\nA\nB"),
            ("a,b=1,<<B\nB", "[{a,b=1,<<B}]\nB"),
            ("a,b=<<A,1\nA", "[{a,b=<<A,1}]\nA"),
            ("<<A.size(1)\nA", "[{<<A.size(1)}]\nA"),
            ("<<A.whatever(<<B)\nA\nB", "[{<<A.whatever(<<B)}]\nA\nB"),
        ],
        heredoc_wrapped,
    );
}

#[test]
fn heredoc_opened_in_interpolation_keeps_its_body_clean() {
    check(
        &[
            ("puts \"#{<<A}\"\nbody\nA", "[{puts \"#{<<A}\"}]\nbody\nA"),
            ("puts \"#{<<A}\"\nA\n1", "[{puts \"#{<<A}\"}\nA\n{1}]"),
        ],
        heredoc_wrapped,
    );
}

// === begin/rescue/else/ensure ===

#[test]
fn begin_rescue_else_ensure() {
    check(
        &[
            ("begin\nrescue\nelse\nensure\nend", "<begin\nrescue\nelse\nensure\nend>"),
            ("begin\nrescue e\ne\nend", "<begin\nrescue e\n<e>\nend>"),
            ("begin\nrescue Exception\n$!\nend", "<begin\nrescue Exception\n<$!>\nend>"),
            (
                "begin\n1\nrescue\n2\nelse\n3\nensure\n4\nend",
                "<begin\n<1>\nrescue\n<2>\nelse\n<3>\nensure\n<4>\nend>",
            ),
            (
                "begin\n1\nrescue\n2\nelse\n3\nend",
                "<begin\n<1>\nrescue\n<2>\nelse\n<3>\nend>",
            ),
            ("begin\n1\nrescue\n2\nend", "<begin\n<1>\nrescue\n<2>\nend>"),
            ("begin\n1\nend", "<begin\n<1>\nend>"),
            ("begin\nend", "<begin\nend>"),
            ("begin\n1\nensure\n2\nend", "<begin\n<1>\nensure\n<2>\nend>"),
            (
                "begin\nrescue\nrescue => a\nrescue SyntaxError\nrescue Exception => a\nelse\nensure\nend",
                "<begin\nrescue\nrescue => a\nrescue SyntaxError\nrescue Exception => a\nelse\nensure\nend>",
            ),
            ("begin\nrescue\nretry\nend", "<begin\nrescue\nretry\nend>"),
        ],
        wrapped,
    );
}

#[test]
fn inline_rescue_is_wrapped_whole() {
    assert_eq!(wrapped("1 rescue nil"), "<1 rescue nil>");
}

// === Definitions ===

#[test]
fn class_and_module_bodies() {
    check(
        &[
            ("class A\n1\nend", "class A\n<1>\nend"),
            ("class A < B\nend", "class A < B\nend"),
            ("class A < B\n1\nrescue\n2\nend", "class A < B\n<1>\nrescue\n<2>\nend"),
            ("class << self\n end", "class << self\n end"),
            ("module A\n1\nend", "module A\n<1>\nend"),
            ("module A\n1\nrescue\n2\nend", "module A\n<1>\nrescue\n<2>\nend"),
        ],
        wrapped,
    );
}

#[test]
fn method_definitions() {
    check(
        &[
            ("def a(b,c=1,*d,&e)\nend", "<def a(b,c=1,*d,&e)\nend>"),
            ("def a\n1\nend", "<def a\n<1>\nend>"),
            ("def a()\n1\nend", "<def a()\n<1>\nend>"),
            ("def a\n1\n2\nend", "<def a\n<1>\n<2>\nend>"),
            ("def a.b\n1\nend", "<def a.b\n<1>\nend>"),
            ("def a.b()\n1\nend", "<def a.b()\n<1>\nend>"),
            ("def a.b\n1\n2\nend", "<def a.b\n<1>\n<2>\nend>"),
            ("def a\nyield\nend", "<def a\n<yield>\nend>"),
            ("def a\nsuper\nend", "<def a\n<super>\nend>"),
            ("def a\nsuper 1\nend", "<def a\n<super 1>\nend>"),
            ("def a\nreturn 1\nend", "<def a\nreturn <1>\nend>"),
            ("def a\n1\nrescue\n2\nend", "<def a\n<1>\nrescue\n<2>\nend>"),
            (
                "def a\n1\nrescue\n2\nensure\n3\nend",
                "<def a\n<1>\nrescue\n<2>\nensure\n<3>\nend>",
            ),
            ("def a\n1\nensure\n2\nend", "<def a\n<1>\nensure\n<2>\nend>"),
        ],
        wrapped,
    );
}

#[test]
fn lambdas() {
    check(
        &[
            ("lambda { }", "<lambda { }>"),
            ("-> { }", "<-> { }>"),
            ("-> a, b { }", "<-> a, b { }>"),
            ("-> {\n1\n}", "<-> {\n<1>\n}>"),
            ("-> * { }", "<-> * { }>"),
            ("lambda { }.()", "<lambda { }.()>"),
            ("-> { }.()", "<-> { }.()>"),
            ("-> a, b {\n1\n}.(1,\n2)", "<-> a, b {\n<1>\n}.(<1>,\n2)>"),
            ("-> a, b { }.call(1, 2)", "<-> a, b { }.call(1, 2)>"),
        ],
        wrapped,
    );
}

#[test]
fn begin_and_end_blocks_wrap_only_their_bodies() {
    check(
        &[
            ("BEGIN {}", "BEGIN {}"),
            ("END {}", "END {}"),
            ("BEGIN {\n123\n}", "BEGIN {\n<123>\n}"),
            ("END {\n123\n}", "END {\n<123>\n}"),
        ],
        wrapped,
    );
}

#[test]
fn error_codes() {
    let err = WrapError::TooLarge { len: 5_000_000_000 };
    assert_eq!(err.code(), None);
    assert!(err.to_string().contains("5000000000"));
    assert_eq!(WrapError::planner("x").code(), Some(ErrorCode::E9001));
    assert_eq!(WrapError::patcher("x").code(), Some(ErrorCode::E9002));
}

// === Properties ===

const OPEN: char = '\u{1}';
const CLOSE: char = '\u{2}';
const BEFORE_ALL: char = '\u{3}';
const AFTER_ALL: char = '\u{4}';

fn control_markers() -> Markers {
    Markers::new(OPEN, CLOSE).with_body(BEFORE_ALL, AFTER_ALL)
}

const FRAGMENTS: &[&str] = &[
    "a = 1",
    "b = [1,\n2]",
    "foo(1, 2)",
    "x.y\n.z",
    "if a\n1\nelse\n2\nend",
    "def m(q)\nreturn q if q\nq + 1\nend",
    "class K\nattr_reader :k\nend",
    "[1, 2].map { |v| v * 2 }",
    "case a\nwhen 1 then :one\nelse :other\nend",
    "puts <<DOC\nbody\nDOC",
    "begin\nraise 'x'\nrescue => e\ne\nensure\nnil\nend",
    "# comment",
    "h = {k: 1,\nj: 2}",
    "while a\nbreak\nend",
    "\"s #{a} t\"",
    "a ||= 3",
    "m, n = 1, 2",
];

fn program() -> impl Strategy<Value = (String, Option<String>)> {
    (
        prop::collection::vec(prop::sample::select(FRAGMENTS), 0..6),
        prop::option::of("[a-z \n]{0,12}"),
    )
        .prop_map(|(parts, data)| (parts.join("\n"), data))
}

proptest! {
    #[test]
    fn stripping_markers_restores_the_source((code, data) in program()) {
        let source = match &data {
            Some(data) => format!("{code}\n__END__\n{data}"),
            None => code.clone(),
        };
        let out = wrap(&source, &mut control_markers()).unwrap();
        let stripped: String = out
            .chars()
            .filter(|c| ![OPEN, CLOSE, BEFORE_ALL, AFTER_ALL].contains(c))
            .collect();
        prop_assert_eq!(stripped, source);
    }

    #[test]
    fn markers_are_balanced((code, _data) in program()) {
        let out = wrap(&code, &mut control_markers()).unwrap();
        let mut depth = 0i32;
        for c in out.chars() {
            if c == OPEN {
                depth += 1;
            } else if c == CLOSE {
                depth -= 1;
                prop_assert!(depth >= 0, "close before open in {:?}", out);
            }
        }
        prop_assert_eq!(depth, 0);
        prop_assert_eq!(out.matches(BEFORE_ALL).count(), 1);
        prop_assert_eq!(out.matches(AFTER_ALL).count(), 1);
    }

    #[test]
    fn data_segment_is_untouched((code, data) in program()) {
        let data = data.unwrap_or_default();
        let tail = format!("__END__\n{data}");
        let source = format!("{code}\n{tail}");
        let out = wrap(&source, &mut control_markers()).unwrap();
        prop_assert!(out.ends_with(&format!("\n{tail}")), "{:?}", out);
    }

    #[test]
    fn heredoc_bodies_stay_clean(count in 1usize..4) {
        let source: String = (0..count)
            .map(|i| format!("x{i} = <<T{i}\nbody {i}\nT{i}\n"))
            .collect();
        let out = wrap(&source, &mut control_markers()).unwrap();
        for i in 0..count {
            let body = format!("\nbody {i}\nT{i}\n");
            prop_assert!(out.contains(&body), "{:?}", out);
        }
    }
}

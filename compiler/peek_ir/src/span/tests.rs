use pretty_assertions::assert_eq;

use super::*;

#[test]
fn contains_is_half_open() {
    let span = Span::new(10, 20);
    assert!(span.contains(10));
    assert!(span.contains(19));
    assert!(!span.contains(20));
    assert!(!Span::point(7).contains(7));
}

#[test]
fn merge_covers_both_in_either_order() {
    assert_eq!(Span::new(20, 30).merge(Span::new(0, 10)), Span::new(0, 30));
    assert_eq!(Span::new(0, 10).merge(Span::new(3, 4)), Span::new(0, 10));
}

#[test]
fn slice_out_of_bounds_is_empty() {
    let source = "a.b 1";
    assert_eq!(Span::new(0, 3).slice(source), "a.b");
    assert_eq!(Span::point(2).slice(source), "");
    assert_eq!(Span::new(4, 99).slice(source), "");
}

#[test]
fn slice_never_splits_a_character() {
    let source = "é";
    assert_eq!(Span::new(0, 1).slice(source), "");
    assert_eq!(Span::new(0, 2).slice(source), "é");
}

#[test]
fn debug_is_a_range() {
    assert_eq!(format!("{:?}", Span::new(3, 5)), "3..5");
}

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_node_id_invalid() {
    assert!(!NodeId::INVALID.is_valid());
    assert!(NodeId::new(0).is_valid());
    assert_eq!(NodeId::default(), NodeId::INVALID);
    assert_eq!(format!("{:?}", NodeId::INVALID), "NodeId::INVALID");
}

#[test]
fn test_alloc_and_get() {
    let mut arena = NodeArena::new();
    let one = arena.alloc(NodeKind::Int, Span::new(0, 1));
    let two = arena.alloc(NodeKind::Int, Span::new(2, 3));
    assert_eq!(arena.len(), 2);
    assert_eq!(arena.span(two), Span::new(2, 3));
    assert_eq!(arena.kind(one), NodeKind::Int);
    assert!(arena.try_get(NodeId::INVALID).is_none());
    assert!(arena.try_get(NodeId::new(99)).is_none());
}

#[test]
fn test_alloc_list() {
    let mut arena = NodeArena::new();
    let a = arena.alloc(NodeKind::Nil, Span::new(0, 3));
    let b = arena.alloc(NodeKind::True, Span::new(4, 8));
    let range = arena.alloc_list([a, b]);
    assert_eq!(arena.list(range), &[a, b]);

    let empty = arena.alloc_list(std::iter::empty());
    assert!(empty.is_empty());
    assert_eq!(arena.list(empty), &[] as &[NodeId]);
}

#[test]
fn test_set_kind() {
    let mut arena = NodeArena::new();
    let id = arena.alloc(
        NodeKind::Send {
            recv: NodeId::INVALID,
            selector: Span::new(0, 1),
            args: NodeRange::EMPTY,
            safe_nav: false,
        },
        Span::new(0, 1),
    );
    arena.set_kind(id, NodeKind::Lvar);
    assert_eq!(arena.kind(id), NodeKind::Lvar);
}

#[test]
fn test_kind_names() {
    let send = NodeKind::Send {
        recv: NodeId::INVALID,
        selector: Span::DUMMY,
        args: NodeRange::EMPTY,
        safe_nav: true,
    };
    assert_eq!(send.name(), "csend");
    let defs = NodeKind::Def {
        singleton: NodeId::new(0),
        params: NodeId::INVALID,
        body: NodeId::INVALID,
    };
    assert_eq!(defs.name(), "defs");
    assert_eq!(NodeKind::Str(StrKind::Shell).name(), "xstr");
}

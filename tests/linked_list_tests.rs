// Integration tests for the four linked list variants

use dsviz::linked_list::{LinkedListEngine, ListKind, OperationKind};
use dsviz::snapshot::Traced;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    InsertFront(i64),
    InsertBack(i64),
    DeleteFront,
    DeleteBack,
    Reverse,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-99i64..99).prop_map(Op::InsertFront),
        (-99i64..99).prop_map(Op::InsertBack),
        Just(Op::DeleteFront),
        Just(Op::DeleteBack),
        Just(Op::Reverse),
    ]
}

fn kind() -> impl Strategy<Value = ListKind> {
    prop::sample::select(ListKind::ALL.to_vec())
}

fn apply(list: &mut LinkedListEngine, op: &Op) {
    match *op {
        Op::InsertFront(v) => {
            list.insert_front(v);
        }
        Op::InsertBack(v) => {
            list.insert_back(v);
        }
        Op::DeleteFront => {
            list.delete_front();
        }
        Op::DeleteBack => {
            list.delete_back();
        }
        Op::Reverse => {
            list.reverse();
        }
    }
    list.settle();
}

fn build(kind: ListKind, values: &[i64]) -> LinkedListEngine {
    let mut list = LinkedListEngine::new(kind);
    for &v in values {
        list.insert_back(v);
        list.settle();
    }
    list
}

#[test]
fn test_every_variant_keeps_order() {
    for kind in ListKind::ALL {
        let mut list = build(kind, &[1, 2, 3]);
        list.insert_front(0);
        list.settle();
        assert_eq!(list.values(), vec![0, 1, 2, 3], "{}", kind);
        assert_eq!(list.delete_back(), Some(3));
        list.settle();
        assert_eq!(list.delete_front(), Some(0));
        list.settle();
        assert_eq!(list.values(), vec![1, 2], "{}", kind);
        assert_eq!(list.check_links(), Ok(()), "{}", kind);
    }
}

#[test]
fn test_reverse_trace_ends_reversed() {
    let mut list = build(ListKind::Dll, &[1, 2, 3]);
    assert!(list.reverse());
    assert!(list.replay().in_flight());
    assert_eq!(list.values(), vec![3, 2, 1]);
    assert_eq!(
        list.replay().last().map(|s| s.message.as_str()),
        Some("List reversed")
    );
    list.settle();
    assert_eq!(list.check_links(), Ok(()));
}

#[test]
fn test_operations_are_logged_and_guarded() {
    let mut list = build(ListKind::Csll, &[4, 5]);
    list.delete_front();
    assert!(list.replay().in_flight());
    assert!(!list.insert_back(6));
    assert_eq!(list.delete_back(), None);
    list.settle();

    let kinds: Vec<OperationKind> = list.operations().iter().map(|o| o.kind).collect();
    assert_eq!(kinds.len(), 3);
    assert_eq!(kinds.last(), Some(&OperationKind::DeleteFront));
}

#[test]
fn test_empty_list_operations_are_noops() {
    let mut list = LinkedListEngine::new(ListKind::Cdll);
    assert_eq!(list.delete_front(), None);
    assert_eq!(list.delete_back(), None);
    assert!(!list.reverse());
    assert!(!list.insert_back_input("x"));
    assert!(list.is_empty());
    assert!(list.operations().is_empty());
}

proptest! {
    #[test]
    fn double_reverse_restores_links(kind in kind(), values in prop::collection::vec(-50i64..50, 0..10)) {
        let mut list = build(kind, &values);
        let head = list.head();
        let tail = list.tail();
        let links = list.links();

        apply(&mut list, &Op::Reverse);
        apply(&mut list, &Op::Reverse);

        prop_assert_eq!(list.head(), head);
        prop_assert_eq!(list.tail(), tail);
        prop_assert_eq!(list.links(), links);
    }

    #[test]
    fn circular_lists_stay_closed(
        kind in prop::sample::select(vec![ListKind::Csll, ListKind::Cdll]),
        ops in prop::collection::vec(op(), 1..25),
    ) {
        let mut list = LinkedListEngine::new(kind);
        for op in &ops {
            apply(&mut list, op);
            if let (Some(head), Some(tail)) = (list.head(), list.tail()) {
                prop_assert_eq!(list.node(tail).and_then(|n| n.next), Some(head));
                if kind == ListKind::Cdll {
                    prop_assert_eq!(list.node(head).and_then(|n| n.prev), Some(tail));
                }
            }
            prop_assert_eq!(list.check_links(), Ok(()));
        }
    }
}

// Integration tests for the binary heap engine

use dsviz::heap::{is_heap, HeapEngine, HeapKind};
use dsviz::snapshot::Traced;
use proptest::prelude::*;

#[test]
fn test_insert_many_builds_max_heap() {
    let mut heap = HeapEngine::default();
    assert_eq!(heap.insert_many("5, 3, 8, 1, 9"), 5);
    assert_eq!(heap.kind(), HeapKind::Max);
    assert_eq!(heap.peek(), Some(9));
    assert!(is_heap(heap.items(), HeapKind::Max));
    assert!(heap.replay().steps()[0].message.starts_with("Append 5"));
}

#[test]
fn test_toggle_heapifies_in_place() {
    let mut heap = HeapEngine::default();
    heap.insert_many("4,10,7,1");
    assert!(heap.toggle_type());
    assert_eq!(heap.kind(), HeapKind::Min);
    assert_eq!(heap.peek(), Some(1));
    assert!(is_heap(heap.items(), HeapKind::Min));

    let last = heap.replay().last().map(|s| s.message.clone());
    assert_eq!(last.as_deref(), Some("Array is a valid min-heap"));
}

#[test]
fn test_extract_drains_in_order() {
    let mut heap = HeapEngine::new(HeapKind::Min);
    heap.insert_many("6,2,9,4");
    let drained: Vec<i64> = std::iter::from_fn(|| heap.extract()).collect();
    assert_eq!(drained, vec![2, 4, 6, 9]);
    assert!(heap.is_empty());
}

#[test]
fn test_tree_view_mirrors_array() {
    let mut heap = HeapEngine::default();
    heap.insert_many("3,2,1");
    let root = heap.tree_view().unwrap();
    assert_eq!(root.value, 3);
    assert_eq!(root.left.as_ref().map(|n| n.index), Some(1));
    assert_eq!(root.right.as_ref().map(|n| n.value), Some(1));
}

proptest! {
    #[test]
    fn heap_order_holds(values in prop::collection::vec(-1000i64..1000, 0..30), toggles in 0usize..3) {
        let mut heap = HeapEngine::default();
        for v in values {
            heap.insert(v);
        }
        for _ in 0..toggles {
            heap.toggle_type();
        }
        prop_assert!(is_heap(heap.items(), heap.kind()));
    }
}

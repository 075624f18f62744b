// Recordings captured from every engine

use dsviz::dijkstra::DijkstraEngine;
use dsviz::expression::{InfixConverter, PostfixEvaluator};
use dsviz::heap::HeapEngine;
use dsviz::huffman::HuffmanEngine;
use dsviz::linear::{BoundedStack, MessageQueue};
use dsviz::linked_list::{LinkedListEngine, ListKind};
use dsviz::polynomial::PolynomialEngine;
use dsviz::snapshot::Traced;
use dsviz::tree::{TraversalOrder, TreeEngine};
use dsviz::ui::Recording;

/// Every frame has rows, and marked rows point inside the frame
fn check(recording: &Recording, expected_len: usize) {
    let frames = recording.frames();
    assert_eq!(frames.len(), expected_len, "{}", recording.title());
    for step in frames.steps() {
        assert!(!step.state.is_empty());
        assert!(step.highlighted.iter().all(|&row| row < step.state.len()));
    }
}

#[test]
fn test_tree_traversal_marks_visited_node() {
    let mut tree = TreeEngine::avl();
    for v in [2, 1, 3] {
        tree.insert(v);
    }
    tree.traverse(TraversalOrder::Inorder);
    let recording = Recording::capture("AVL", &tree);
    check(&recording, tree.replay().len());

    let visit = &recording.frames().steps()[1];
    assert_eq!(visit.message, "Visit 1");
    assert_eq!(visit.highlighted.len(), 1);
    assert!(visit.state[visit.highlighted[0]].contains("1 (h1)"));
}

#[test]
fn test_every_engine_records_frames() {
    let mut heap = HeapEngine::default();
    heap.insert_many("4,8,1");
    check(&Recording::capture("heap", &heap), heap.replay().len());

    let mut huffman = HuffmanEngine::new();
    huffman.encode("abracadabra");
    check(&Recording::capture("huffman", &huffman), huffman.replay().len());

    let mut dijkstra = DijkstraEngine::new();
    dijkstra.load_example(1);
    dijkstra.find_path();
    let recording = Recording::capture("dijkstra", &dijkstra);
    check(&recording, dijkstra.replay().len());
    let last = recording.frames().last().unwrap();
    assert!(last.state.iter().any(|row| row == "Path: A -> C -> E -> F"));

    let mut converter = InfixConverter::new();
    converter.convert("(1+2)*3").unwrap();
    check(&Recording::capture("infix", &converter), converter.replay().len());

    let mut evaluator = PostfixEvaluator::new();
    evaluator.evaluate_str("1 2 + 3 *").unwrap();
    check(&Recording::capture("postfix", &evaluator), evaluator.replay().len());

    let mut list = LinkedListEngine::new(ListKind::Cdll);
    for v in [1, 2, 3] {
        list.insert_back(v);
        list.settle();
    }
    list.reverse();
    check(&Recording::capture("list", &list), list.replay().len());

    let mut stack = BoundedStack::new();
    stack.push(5);
    check(&Recording::capture("stack", &stack), 2);

    let mut mq = MessageQueue::new();
    mq.produce(0, "ping");
    mq.process_next(1);
    check(&Recording::capture("messages", &mq), 2);

    let mut polynomial = PolynomialEngine::new();
    polynomial.load_example();
    polynomial.multiply().unwrap();
    check(&Recording::capture("polynomial", &polynomial), 18);
}

#[test]
fn test_recording_replays_independently() {
    let mut stack = BoundedStack::new();
    stack.push(1);
    let mut recording = Recording::capture("stack", &stack);

    recording.frames_mut().finish();
    assert!(recording.frames().is_at_end());
    // The engine's own cursor is untouched
    assert_eq!(stack.replay().position(), 0);
    assert!(stack.replay().in_flight());
}

// Integration tests for the Dijkstra engine

use dsviz::dijkstra::{DijkstraEngine, PRESETS};
use dsviz::snapshot::Traced;
use std::time::Duration;

/// A-B:4, B-C:3, C-D:5 built through the public API
fn linear_graph() -> (DijkstraEngine, Vec<String>) {
    let mut engine = DijkstraEngine::new();
    let ids: Vec<String> = (0..4).map(|i| engine.add_node(i as f64 * 100.0, 0.0)).collect();
    engine.add_edge(&ids[0], &ids[1], 4.0);
    engine.add_edge(&ids[1], &ids[2], 3.0);
    engine.add_edge(&ids[2], &ids[3], 5.0);
    (engine, ids)
}

#[test]
fn test_linear_graph_shortest_path() {
    let (mut engine, ids) = linear_graph();
    assert!(engine.set_start(&ids[0]));
    assert!(engine.set_end(&ids[3]));

    let result = engine.find_path().unwrap();
    assert_eq!(result.distance, 12.0);
    assert_eq!(result.path, ids);
    assert_eq!(engine.result(), Some(&result));

    let last = engine.replay().last().unwrap();
    assert!(last.message.starts_with("Found shortest path"));
    assert_eq!(last.state.path, ids);
}

#[test]
fn test_isolated_node_stays_infinite() {
    let (mut engine, ids) = linear_graph();
    let lonely = engine.add_node(0.0, 500.0);
    engine.set_start(&ids[0]);
    engine.set_end(&lonely);

    let result = engine.find_path().unwrap();
    assert_eq!(result.distance, f64::INFINITY);
    assert!(result.path.is_empty());

    // Unreached distances serialize as null
    let json = serde_json::to_value(engine.replay().last().unwrap()).unwrap();
    let distances = json["state"]["distances"].as_array().unwrap();
    assert!(distances.iter().any(|d| d[1].is_null()));
}

#[test]
fn test_every_preset_reaches_its_end() {
    for (index, preset) in PRESETS.iter().enumerate() {
        let mut engine = DijkstraEngine::new();
        assert!(engine.load_example(index));
        assert_eq!(engine.start(), Some(preset.start));
        assert_eq!(engine.end(), Some(preset.end));

        let result = engine.find_path().unwrap();
        assert!(result.is_reachable(), "{} unreachable", preset.name);
        assert_eq!(result.path.first().map(String::as_str), Some(preset.start));
        assert_eq!(result.path.last().map(String::as_str), Some(preset.end));
    }
}

#[test]
fn test_auto_play_walks_the_trace() {
    let mut engine = DijkstraEngine::new();
    engine.load_example(0);
    engine.find_path();
    assert!(!engine.replay().in_flight());

    engine.toggle_auto_play();
    assert!(engine.replay().is_playing());
    assert!(engine.find_path().is_none());

    let total = engine.replay().len();
    let stepped = engine.tick(Duration::from_secs(3600));
    assert_eq!(stepped, total - 1);
    assert!(engine.replay().is_at_end());
    assert!(engine.previous_step());
}

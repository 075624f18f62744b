//! Dijkstra shortest path engine
//!
//! Array and set based, not heap based: the next node is the first unvisited
//! node, in node insertion order, with a strictly smaller tentative distance
//! than every other. Edges are undirected; [`DijkstraEngine::add_edge`]
//! stores each one as two directed entries with the same weight.
//!
//! Unreached nodes carry `f64::INFINITY`, which `serde_json` writes as `null`.

pub mod presets;

use crate::constants::DIJKSTRA_INTERVAL;
use crate::snapshot::{Replay, Trace, Traced};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, trace};

pub use presets::{Preset, PRESETS};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|n| n.id == id)
    }

    /// (neighbor, weight) for every edge entry touching `id`
    fn neighbors<'a>(&'a self, id: &'a str) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.edges.iter().filter_map(move |e| {
            if e.source == id {
                Some((e.target.as_str(), e.weight))
            } else if e.target == id {
                Some((e.source.as_str(), e.weight))
            } else {
                None
            }
        })
    }
}

/// Snapshot recorded with every step; highlights are node ids
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DijkstraState {
    pub current: Option<String>,
    /// Tentative distance per node, in node order
    pub distances: Vec<(String, f64)>,
    /// Visited nodes, in node order
    pub visited: Vec<String>,
    /// Predecessor chain from the start to `current`
    pub path: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathResult {
    /// `f64::INFINITY` when the end is unreachable
    pub distance: f64,
    /// Empty when the end is unreachable
    pub path: Vec<String>,
}

impl PathResult {
    pub fn is_reachable(&self) -> bool {
        self.distance.is_finite()
    }
}

/// Working tables of one search
struct Search<'g> {
    graph: &'g Graph,
    distances: FxHashMap<&'g str, f64>,
    previous: FxHashMap<&'g str, &'g str>,
    unvisited: Vec<&'g str>,
}

impl<'g> Search<'g> {
    fn new(graph: &'g Graph, start: &'g str) -> Self {
        let distances = graph
            .nodes
            .iter()
            .map(|n| {
                let d = if n.id == start { 0.0 } else { f64::INFINITY };
                (n.id.as_str(), d)
            })
            .collect();
        Search {
            graph,
            distances,
            previous: FxHashMap::default(),
            unvisited: graph.nodes.iter().map(|n| n.id.as_str()).collect(),
        }
    }

    fn distance(&self, id: &str) -> f64 {
        self.distances.get(id).copied().unwrap_or(f64::INFINITY)
    }

    fn is_unvisited(&self, id: &str) -> bool {
        self.unvisited.iter().any(|u| *u == id)
    }

    fn visit(&mut self, id: &str) {
        self.unvisited.retain(|u| *u != id);
    }

    fn relax(&mut self, current: &'g str) {
        let graph = self.graph;
        let base = self.distance(current);
        for (neighbor, weight) in graph.neighbors(current) {
            if !self.is_unvisited(neighbor) {
                continue;
            }
            let candidate = base + weight;
            if candidate < self.distance(neighbor) {
                trace!(node = neighbor, distance = candidate, via = current, "dijkstra relax");
                self.distances.insert(neighbor, candidate);
                self.previous.insert(neighbor, current);
            }
        }
    }

    /// First unvisited node with the strictly smallest finite distance
    fn closest(&self) -> Option<&'g str> {
        let mut best: Option<(&'g str, f64)> = None;
        for &id in &self.unvisited {
            let d = self.distance(id);
            if d < best.map_or(f64::INFINITY, |(_, b)| b) {
                best = Some((id, d));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Walk `previous` back from `to`
    fn path_to(&self, to: &'g str) -> Vec<String> {
        let mut path = vec![to.to_string()];
        let mut cursor = to;
        while let Some(&prev) = self.previous.get(cursor) {
            path.push(prev.to_string());
            cursor = prev;
        }
        path.reverse();
        path
    }

    fn state(&self, current: &str, path: Vec<String>) -> DijkstraState {
        DijkstraState {
            current: Some(current.to_string()),
            distances: self
                .graph
                .nodes
                .iter()
                .map(|n| (n.id.clone(), self.distance(&n.id)))
                .collect(),
            visited: self
                .graph
                .nodes
                .iter()
                .filter(|n| !self.is_unvisited(&n.id))
                .map(|n| n.id.clone())
                .collect(),
            path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DijkstraEngine {
    graph: Graph,
    start: Option<String>,
    end: Option<String>,
    result: Option<PathResult>,
    replay: Replay<DijkstraState, String>,
}

impl DijkstraEngine {
    pub fn new() -> Self {
        DijkstraEngine {
            graph: Graph::default(),
            start: None,
            end: None,
            result: None,
            replay: Replay::new(DIJKSTRA_INTERVAL),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    pub fn end(&self) -> Option<&str> {
        self.end.as_deref()
    }

    /// Result of the last completed search
    pub fn result(&self) -> Option<&PathResult> {
        self.result.as_ref()
    }

    /// Add a node and return its generated id
    pub fn add_node(&mut self, x: f64, y: f64) -> String {
        let id = format!("node-{}", self.graph.nodes.len());
        self.graph.nodes.push(GraphNode { id: id.clone(), x, y });
        id
    }

    fn add_named_node(&mut self, id: &str, x: f64, y: f64) {
        self.graph.nodes.push(GraphNode {
            id: id.to_string(),
            x,
            y,
        });
    }

    /// Add an undirected edge. Unknown endpoints and negative or NaN weights
    /// are rejected.
    pub fn add_edge(&mut self, source: &str, target: &str, weight: f64) -> bool {
        if !self.graph.contains(source) || !self.graph.contains(target) {
            debug!(source, target, "dijkstra edge ignored: unknown endpoint");
            return false;
        }
        if weight.is_nan() || weight < 0.0 {
            debug!(source, target, weight, "dijkstra edge ignored: bad weight");
            return false;
        }
        self.graph.edges.push(Edge {
            source: source.to_string(),
            target: target.to_string(),
            weight,
        });
        self.graph.edges.push(Edge {
            source: target.to_string(),
            target: source.to_string(),
            weight,
        });
        true
    }

    pub fn set_start(&mut self, id: &str) -> bool {
        if !self.graph.contains(id) {
            return false;
        }
        self.start = Some(id.to_string());
        true
    }

    pub fn set_end(&mut self, id: &str) -> bool {
        if !self.graph.contains(id) {
            return false;
        }
        self.end = Some(id.to_string());
        true
    }

    /// Run the search from start to end and install its trace. `None` if
    /// either endpoint is unset or a replay is auto-playing.
    pub fn find_path(&mut self) -> Option<PathResult> {
        if self.replay.in_flight() {
            debug!("dijkstra search ignored: operation in flight");
            return None;
        }
        let (start, end) = match (self.start.as_deref(), self.end.as_deref()) {
            (Some(s), Some(e)) => (s, e),
            _ => {
                debug!("dijkstra search ignored: start or end unset");
                return None;
            }
        };

        let mut search = Search::new(&self.graph, start);
        let mut steps = Trace::new();
        steps.push(
            DijkstraState {
                visited: vec![start.to_string()],
                ..search.state(start, vec![start.to_string()])
            },
            vec![start.to_string()],
            format!("Starting from node {}", start),
        );

        let mut current = search.unvisited.iter().copied().find(|&id| id == start);
        while let Some(node) = current {
            if search.unvisited.is_empty() {
                break;
            }
            search.visit(node);
            if node == end {
                break;
            }
            search.relax(node);
            let next = search.closest();

            steps.push(
                search.state(node, search.path_to(node)),
                vec![node.to_string()],
                format!("Visited {}, updated distances to neighbors", node),
            );
            current = next;
        }

        let distance = search.distance(end);
        let path = if distance.is_finite() {
            let path = search.path_to(end);
            steps.push(
                search.state(end, path.clone()),
                path.clone(),
                format!("Found shortest path with distance {}", distance),
            );
            path
        } else {
            Vec::new()
        };

        debug!(start, end, distance, steps = steps.len(), "dijkstra search");
        let result = PathResult { distance, path };
        self.result = Some(result.clone());
        self.replay.load(steps, false);
        Some(result)
    }

    /// Replace the graph with preset `index` and show its starting step
    pub fn load_example(&mut self, index: usize) -> bool {
        let Some(preset) = PRESETS.get(index) else {
            debug!(index, "dijkstra example ignored: no such preset");
            return false;
        };
        self.clear();
        for &(id, x, y) in preset.nodes {
            self.add_named_node(id, x, y);
        }
        for &(source, target, weight) in preset.edges {
            self.add_edge(source, target, weight);
        }
        self.set_start(preset.start);
        self.set_end(preset.end);

        let search = Search::new(&self.graph, preset.start);
        let mut steps = Trace::new();
        steps.push(
            DijkstraState {
                visited: vec![preset.start.to_string()],
                ..search.state(preset.start, vec![preset.start.to_string()])
            },
            vec![preset.start.to_string()],
            format!("Starting from node {}", preset.start),
        );
        self.replay.load(steps, false);
        debug!(name = preset.name, "dijkstra example loaded");
        true
    }

    pub fn next_step(&mut self) -> bool {
        self.replay.next_step()
    }

    pub fn previous_step(&mut self) -> bool {
        self.replay.previous_step()
    }

    pub fn toggle_auto_play(&mut self) {
        self.replay.toggle_auto_play();
    }

    pub fn tick(&mut self, elapsed: Duration) -> usize {
        self.replay.tick(elapsed)
    }

    pub fn clear(&mut self) {
        self.graph = Graph::default();
        self.start = None;
        self.end = None;
        self.result = None;
        self.replay.clear();
    }
}

impl Default for DijkstraEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Traced for DijkstraEngine {
    type State = DijkstraState;
    type Key = String;

    fn replay(&self) -> &Replay<DijkstraState, String> {
        &self.replay
    }

    fn replay_mut(&mut self) -> &mut Replay<DijkstraState, String> {
        &mut self.replay
    }
}

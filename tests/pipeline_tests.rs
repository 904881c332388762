//! End-to-end pipeline runs over synthetic in-memory trees: discovery order,
//! shutdown-pill delivery, cancellation, and collaborator gates.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};

use anyhow::anyhow;
use scour::pipeline::IndexingService;
use scour::source::SourceTree;

/// In-memory tree: nodes are string labels, children answered from a map.
/// A label listed in `broken` is a container that fails to list.
#[derive(Clone, Default)]
struct StubTree {
    children: HashMap<String, Vec<String>>,
    broken: Vec<String>,
}

impl StubTree {
    fn new() -> Self {
        StubTree::default()
    }

    fn dir(mut self, name: &str, kids: &[&str]) -> Self {
        self.children
            .insert(name.to_string(), kids.iter().map(|s| s.to_string()).collect());
        self
    }

    fn broken_dir(mut self, name: &str) -> Self {
        self.broken.push(name.to_string());
        self
    }
}

impl SourceTree for StubTree {
    type Node = String;

    fn is_container(&self, node: &String) -> bool {
        self.children.contains_key(node) || self.broken.contains(node)
    }

    fn children(&self, node: &String) -> anyhow::Result<Vec<String>> {
        if self.broken.contains(node) {
            return Err(anyhow!("cannot list {node}"));
        }
        Ok(self.children.get(node).cloned().unwrap_or_default())
    }
}

/// Reusable open-once latch for deterministic cross-thread sequencing.
#[derive(Clone, Default)]
struct Gate(Arc<(Mutex<bool>, Condvar)>);

impl Gate {
    fn open(&self) {
        let (lock, cvar) = &*self.0;
        *lock.lock().unwrap() = true;
        cvar.notify_all();
    }

    fn wait(&self) {
        let (lock, cvar) = &*self.0;
        let mut open = lock.lock().unwrap();
        while !*open {
            open = cvar.wait(open).unwrap();
        }
    }
}

fn collector() -> (
    Arc<Mutex<Vec<String>>>,
    impl FnMut(String) -> anyhow::Result<()> + Send + 'static,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |node: String| {
        sink.lock().unwrap().push(node);
        Ok(())
    })
}

#[test]
fn test_all_items_in_discovery_order() {
    let tree = StubTree::new()
        .dir("root", &["a", "sub", "d"])
        .dir("sub", &["b", "c"]);
    let (seen, sink) = collector();

    let summary = IndexingService::new(tree, "root".to_string())
        .capacity(4)
        .index(sink)
        .start()
        .await_completion()
        .unwrap();

    // Pre-order DFS: a, then everything under sub, then d.
    assert_eq!(*seen.lock().unwrap(), ["a", "b", "c", "d"]);
    assert_eq!(summary.crawl.submitted, 4);
    assert_eq!(summary.index.indexed, 4);
    assert!(summary.index.saw_shutdown);
    assert!(!summary.crawl.cancelled);
}

#[test]
fn test_three_leaves_capacity_two() {
    let tree = StubTree::new().dir("root", &["a", "b", "c"]);
    let (seen, sink) = collector();

    let summary = IndexingService::new(tree, "root".to_string())
        .capacity(2)
        .index(sink)
        .start()
        .await_completion()
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), ["a", "b", "c"]);
    assert_eq!(summary.index.indexed, 3);
    assert!(summary.index.saw_shutdown);
}

#[test]
fn test_empty_tree_delivers_only_the_pill() {
    let tree = StubTree::new().dir("root", &[]);
    let (seen, sink) = collector();

    let summary = IndexingService::new(tree, "root".to_string())
        .index(sink)
        .start()
        .await_completion()
        .unwrap();

    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(summary.crawl.submitted, 0);
    assert_eq!(summary.index.indexed, 0);
    assert!(summary.index.saw_shutdown);
}

#[test]
fn test_unreadable_containers_are_skipped() {
    let tree = StubTree::new()
        .dir("root", &["a", "bad", "sub", "c"])
        .broken_dir("bad")
        .dir("sub", &["b"]);
    let (seen, sink) = collector();

    let summary = IndexingService::new(tree, "root".to_string())
        .index(sink)
        .start()
        .await_completion()
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), ["a", "b", "c"]);
    assert_eq!(summary.crawl.submitted, 3);
    assert_eq!(summary.crawl.skipped, 1);
    assert!(summary.index.saw_shutdown);
    assert!(!summary.crawl.cancelled);
}

#[test]
fn test_failing_index_calls_do_not_stall_the_run() {
    let tree = StubTree::new().dir("root", &["a", "b", "c"]);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let summary = IndexingService::new(tree, "root".to_string())
        .index(move |node: String| {
            if node == "b" {
                return Err(anyhow!("cannot index {node}"));
            }
            sink.lock().unwrap().push(node);
            Ok(())
        })
        .start()
        .await_completion()
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), ["a", "c"]);
    assert_eq!(summary.index.indexed, 2);
    assert_eq!(summary.index.failed, 1);
    assert!(summary.index.saw_shutdown);
}

#[test]
fn test_filter_and_already_indexed_gates() {
    let tree = StubTree::new().dir("root", &["a", "b", "c", "d"]);
    let (seen, sink) = collector();

    let summary = IndexingService::new(tree, "root".to_string())
        .filter(|node: &String| node != "b")
        .already_indexed(|node: &String| node == "d")
        .index(sink)
        .start()
        .await_completion()
        .unwrap();

    assert_eq!(*seen.lock().unwrap(), ["a", "c"]);
    assert_eq!(summary.crawl.submitted, 2);
    assert_eq!(summary.index.indexed, 2);
}

/// Tree whose root listing blocks until the test releases it, so a stop
/// request can be placed before anything is discovered.
struct GatedTree {
    gate: Gate,
    leaves: Vec<String>,
}

impl SourceTree for GatedTree {
    type Node = String;

    fn is_container(&self, node: &String) -> bool {
        node == "root"
    }

    fn children(&self, _node: &String) -> anyhow::Result<Vec<String>> {
        self.gate.wait();
        Ok(self.leaves.clone())
    }
}

#[test]
fn test_stop_before_any_discovery() {
    let gate = Gate::default();
    let tree = GatedTree {
        gate: gate.clone(),
        leaves: vec!["a".to_string(), "b".to_string()],
    };
    let (seen, sink) = collector();

    let running = IndexingService::new(tree, "root".to_string())
        .index(sink)
        .start();
    running.request_stop();
    // Release the crawler only after the stop request is in.
    gate.open();
    let summary = running.await_completion().unwrap();

    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(summary.crawl.submitted, 0);
    assert_eq!(summary.index.indexed, 0);
    assert!(summary.crawl.cancelled);
    assert!(summary.index.saw_shutdown);
}

/// Tree that signals the test when traversal reaches its slow container,
/// then blocks there until released. Lets a stop request land after exactly
/// two submissions.
struct MidGateTree {
    reached: Gate,
    release: Gate,
}

impl SourceTree for MidGateTree {
    type Node = String;

    fn is_container(&self, node: &String) -> bool {
        node == "root" || node == "slow"
    }

    fn children(&self, node: &String) -> anyhow::Result<Vec<String>> {
        if node == "root" {
            Ok(["a", "b", "slow", "c", "d"]
                .iter()
                .map(|s| s.to_string())
                .collect())
        } else {
            self.reached.open();
            self.release.wait();
            Ok(vec!["e".to_string()])
        }
    }
}

#[test]
fn test_stop_mid_traversal_drains_what_was_queued() {
    let reached = Gate::default();
    let release = Gate::default();
    let tree = MidGateTree {
        reached: reached.clone(),
        release: release.clone(),
    };
    let (seen, sink) = collector();

    let running = IndexingService::new(tree, "root".to_string())
        .index(sink)
        .start();
    // a and b are in the queue once the crawler is parked at the slow node.
    reached.wait();
    running.request_stop();
    release.open();
    let summary = running.await_completion().unwrap();

    // Everything enqueued before the stop is drained, in order; nothing
    // discovered after the stop ever reaches the queue.
    assert_eq!(*seen.lock().unwrap(), ["a", "b"]);
    assert_eq!(summary.crawl.submitted, 2);
    assert!(summary.crawl.cancelled);
    assert!(summary.index.saw_shutdown);
}

#[test]
fn test_force_stop_abandons_queued_items() {
    let entered = Gate::default();
    let release = Gate::default();
    let tree = StubTree::new().dir("root", &["a", "b", "c", "d", "e"]);
    let entered2 = entered.clone();
    let release2 = release.clone();

    let running = IndexingService::new(tree, "root".to_string())
        .capacity(2)
        .index(move |_node: String| {
            entered2.open();
            release2.wait();
            Ok(())
        })
        .start();

    // The indexer is inside its first index call; the queue is full and the
    // crawler is parked on a put.
    entered.wait();
    running.force_stop();
    release.open();
    let summary = running.await_completion().unwrap();

    assert!(!summary.index.saw_shutdown);
    assert!(summary.crawl.cancelled);
    // Only the in-flight call may have completed.
    assert!(summary.index.indexed <= 1);
}

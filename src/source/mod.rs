//! Source-tree collaborators: the traversal trait and its filesystem impl.

pub mod filter;
pub mod fs;

pub use filter::{glob_match, is_os_junk, should_index};
pub use fs::FsSource;

use anyhow::Result;

/// Hierarchical source the crawler walks. Containers have children; every
/// non-container node is a leaf the pipeline may submit as a work item.
pub trait SourceTree {
    /// One node of the tree. Leaves double as the pipeline's work items.
    type Node: Send + 'static;

    /// True when `node` can be descended into.
    fn is_container(&self, node: &Self::Node) -> bool;

    /// List the children of a container. May fail per node (e.g. an
    /// unreadable directory); the crawler skips such nodes and continues
    /// with their siblings.
    fn children(&self, node: &Self::Node) -> Result<Vec<Self::Node>>;
}

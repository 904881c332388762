//! Filesystem-backed source tree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use super::SourceTree;

/// Source tree over the real filesystem. Nodes are paths; children are
/// listed one level deep and sorted by file name so traversal order is
/// deterministic.
#[derive(Clone, Debug, Default)]
pub struct FsSource {
    follow_links: bool,
}

impl FsSource {
    pub fn new() -> Self {
        FsSource::default()
    }

    /// Follow symbolic links when listing children.
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.follow_links = yes;
        self
    }
}

impl SourceTree for FsSource {
    type Node = PathBuf;

    fn is_container(&self, node: &PathBuf) -> bool {
        node.is_dir()
    }

    fn children(&self, node: &PathBuf) -> Result<Vec<PathBuf>> {
        let mut children = Vec::new();
        for entry in WalkDir::new(node)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name()
        {
            match entry {
                Ok(e) => children.push(e.into_path()),
                // The container itself is unreadable: fail the node.
                Err(err) if err.path() == Some(node.as_path()) => {
                    return Err(err).with_context(|| format!("list {}", node.display()));
                }
                // One child failed to stat: skip it, keep its siblings.
                Err(err) => {
                    log::warn!("skipping unreadable entry under {}: {}", node.display(), err);
                }
            }
        }
        Ok(children)
    }
}

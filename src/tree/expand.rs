use anyhow::Result;
use futures::FutureExt;
use futures::future::{self, LocalBoxFuture};
use tracing::{debug, trace};

use crate::path::TreePath;
use crate::source::DirectorySource;

use super::FileTree;

impl<S: DirectorySource> FileTree<S> {
    /// Populates the top level of the hierarchy.
    pub async fn load_root(&mut self) -> Result<()> {
        self.open_directory(&TreePath::parse("", true)).await
    }

    /// Expands `path`: loads its listing, recursively re-expands every
    /// remembered-open subdirectory, and merges the whole subtree into the
    /// flat list in one pass, so no partially populated state is ever
    /// visible. Finally refreshes the directory's own row (its indicator
    /// depends on open state).
    ///
    /// Already-open directories are a no-op without a data-source round
    /// trip. A failed load propagates with the open marker already set;
    /// callers recover by retrying or by close-then-reopen.
    pub async fn open_directory(&mut self, path: &TreePath) -> Result<()> {
        if self.state.is_opened(path) {
            trace!(%path, "already open");
            return Ok(());
        }
        self.state.mark_opened(path);

        let batch = self.collect_open_subtree(path).await?;
        debug!(%path, rows = batch.len(), "merging expansion batch");
        for child in batch {
            self.insert_path(child);
        }
        self.rebuild_row(path);
        Ok(())
    }

    /// Reads one directory and gathers the paths of its children plus, for
    /// every child remembered open, the child's own subtree, concurrently,
    /// so one await covers the whole fan-out. Parents always precede their
    /// descendants in the returned batch.
    fn collect_open_subtree<'a>(
        &'a self,
        dir: &'a TreePath,
    ) -> LocalBoxFuture<'a, Result<Vec<TreePath>>> {
        async move {
            let entries = self.source.read_directory(&dir.to_string()).await?;
            let mut children: Vec<TreePath> = entries
                .into_iter()
                .map(|entry| dir.child(&entry.name, entry.is_directory))
                .collect();
            children.sort_by(|a, b| a.visual_cmp(b));

            let reopened: Vec<_> = children
                .iter()
                .filter(|child| child.is_directory() && self.state.is_opened(child))
                .map(|child| self.collect_open_subtree(child))
                .collect();
            let subtrees = future::join_all(reopened).await;

            let mut batch = children;
            for subtree in subtrees {
                batch.extend(subtree?);
            }
            Ok(batch)
        }
        .boxed_local()
    }

    /// Collapses `path`: its descendants leave the flat list, while every
    /// descendant directory keeps its entry in the opened set. That memory
    /// is what re-expands the subtree in one batch on the next open; only
    /// [`FileTree::remove_item`] discards it.
    pub fn close_directory(&mut self, path: &TreePath) {
        self.state.mark_closed(path);
        let removed = self.list.remove_descendants(path);
        trace!(%path, rows = removed.len(), "collapsed");
        self.rebuild_row(path);
    }

    pub async fn toggle_directory(&mut self, path: &TreePath) -> Result<()> {
        if self.state.is_opened(path) {
            self.close_directory(path);
            Ok(())
        } else {
            self.open_directory(path).await
        }
    }

    /// Handles an out-of-band "entry appeared" signal.
    ///
    /// Walks upward from the immediate parent collecting ancestors that are
    /// not on screen; the nearest displayed ancestor gates the insertion.
    /// If it is closed, the new entry is correctly hidden and nothing
    /// happens. Only then is the entry's type resolved via the data source.
    /// Collected intermediate ancestors are materialized top-down as opened
    /// directories before the entry itself is inserted.
    pub async fn add_item(&mut self, path_str: &str) -> Result<()> {
        let probe = TreePath::parse(path_str, false);
        if self.list.is_displayed(&probe) {
            return Ok(());
        }

        let mut missing: Vec<TreePath> = Vec::new();
        let mut cursor = probe.parent();
        while let Some(ancestor) = cursor {
            if self.list.is_displayed(&ancestor) {
                if !self.state.is_opened(&ancestor) {
                    trace!(path = %probe, gate = %ancestor, "parent chain closed");
                    return Ok(());
                }
                break;
            }
            cursor = ancestor.parent();
            missing.push(ancestor);
        }

        let is_directory = self.source.is_directory(path_str).await?;
        debug!(path = %probe, is_directory, intermediates = missing.len(), "adding item");

        for ancestor in missing.into_iter().rev() {
            self.state.mark_opened(&ancestor);
            self.insert_path(ancestor);
        }
        self.insert_path(TreePath::parse(path_str, is_directory));
        Ok(())
    }

    /// Handles an out-of-band "entry removed" signal: cascades for
    /// directories and discards selection and expansion memory for the
    /// path and everything below it, displayed or not. Removing something
    /// that was never shown is an expected race, not a fault.
    pub fn remove_item(&mut self, path_str: &str) {
        let path = TreePath::parse(path_str, false);
        let removed = self.list.remove(&path);
        self.state.prune(&path);
        debug!(%path, rows = removed.len(), "removed item");
    }

    /// Rebuilds the presentation of a displayed path in place; a no-op for
    /// anything not on screen.
    pub fn refresh_item(&mut self, path_str: &str) {
        let path = TreePath::parse(path_str, false);
        self.rebuild_row(&path);
    }
}

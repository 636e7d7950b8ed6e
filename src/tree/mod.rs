mod expand;
mod flat_list;
mod node;
mod selection;

pub use flat_list::FlatList;
pub use node::{Node, TreeState};

use std::collections::BTreeSet;

use ratatui::widgets::{List, ListItem};

use crate::path::TreePath;
use crate::render::{self, RenderHooks, Row, TreeConfig};
use crate::source::DirectorySource;

/// The lazily-loaded tree component.
///
/// Owns the data source, the flat list of visible nodes, the expansion and
/// selection state, and the injected presentation hooks. All mutation goes
/// through the methods in `expand` and `selection`; every operation patches
/// the flat list in place.
pub struct FileTree<S> {
    source: S,
    list: FlatList,
    state: TreeState,
    hooks: RenderHooks,
    config: TreeConfig,
}

impl<S: DirectorySource> FileTree<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            list: FlatList::default(),
            state: TreeState::default(),
            hooks: RenderHooks::default(),
            config: TreeConfig::default(),
        }
    }

    pub fn with_hooks(mut self, hooks: RenderHooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Number of currently visible rows.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// The path shown on row `index`, for pointer hit-testing.
    pub fn path_at(&self, index: usize) -> Option<&TreePath> {
        self.list.get(index).map(Node::path)
    }

    pub fn row_at(&self, index: usize) -> Option<&Row> {
        self.list.get(index).and_then(Node::row)
    }

    pub fn is_displayed(&self, path: &TreePath) -> bool {
        self.list.is_displayed(path)
    }

    pub fn is_opened(&self, path: &TreePath) -> bool {
        self.state.is_opened(path)
    }

    /// String form of every active path.
    pub fn active_items(&self) -> BTreeSet<String> {
        self.state.active_paths().map(TreePath::to_string).collect()
    }

    /// The mountable presentation container: one list item per visible row.
    pub fn widget(&self) -> List<'static> {
        let items: Vec<ListItem> = self
            .list
            .iter()
            .map(|node| match node.row() {
                Some(row) => ListItem::new(row.line().clone()),
                None => ListItem::new(node.path().name().to_owned()),
            })
            .collect();
        List::new(items)
    }

    fn build_row(&self, path: &TreePath) -> Row {
        render::build_row(
            path,
            self.state.is_opened(path),
            self.state.is_active(path),
            &self.hooks,
            &self.config,
        )
    }

    /// Builds a row for `path` and hands it to the reconciler.
    fn insert_path(&mut self, path: TreePath) -> bool {
        let row = self.build_row(&path);
        let mut node = Node::from_path(path);
        node.set_row(row);
        self.list.add(node)
    }

    /// Recreates the presentation of a displayed path in place, using the
    /// displayed node's own directory flag (lookups ignore the flag).
    fn rebuild_row(&mut self, path: &TreePath) {
        let Some(actual) = self.list.node_path(path).cloned() else {
            return;
        };
        let row = self.build_row(&actual);
        self.list.refresh(&actual, row);
    }
}

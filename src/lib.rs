//! Incremental, lazily-loaded file tree for the terminal.
//!
//! The crate keeps one ordered, flattened list of visible rows and patches
//! it in place as branches are opened, closed, added, removed or refreshed;
//! nothing ever triggers a full rebuild. Children come from an injectable
//! asynchronous [`DirectorySource`], rows are produced through injectable
//! [`RenderHooks`], and the result mounts as a regular ratatui list widget.
//!
//! Within one level, directories sort before files and ties break
//! case-insensitively; expansion memory survives collapsing ancestors, so
//! re-opening a branch restores its previously open subtree in one batch.

pub mod browser;
pub mod cli;
pub mod path;
pub mod render;
pub mod source;
pub mod tree;

pub use path::TreePath;
pub use render::{RenderHooks, Row, TreeConfig};
pub use source::{DirEntry, DirectorySource, FsSource};
pub use tree::FileTree;

use anyhow::Result;
use tracing::trace;

use crate::path::TreePath;
use crate::source::DirectorySource;

use super::FileTree;

impl<S: DirectorySource> FileTree<S> {
    /// Applies an activation on `path`.
    ///
    /// A plain activation replaces the whole active set; with `multi` the
    /// path toggles in and out without touching other selections. Rows
    /// whose active state changed are refreshed, and the observer hears
    /// about every newly activated path.
    pub fn activate(&mut self, path: &TreePath, multi: bool) {
        if multi {
            if self.state.deactivate(path) {
                self.rebuild_row(path);
                return;
            }
            self.state.activate(path);
            self.rebuild_row(path);
            self.notify_selected(path);
            return;
        }

        let previous = self.state.take_active();
        for old in &previous {
            if old != path {
                self.rebuild_row(old);
            }
        }
        self.state.activate(path);
        self.rebuild_row(path);
        self.notify_selected(path);
    }

    /// Clears the whole active set (interaction landed outside the tree's
    /// interactive surface) and refreshes every row that was active.
    pub fn deactivate_all(&mut self) {
        let previous = self.state.take_active();
        trace!(cleared = previous.len(), "deactivating all");
        for old in &previous {
            self.rebuild_row(old);
        }
    }

    /// Full click semantics for row `index`: a plain click on a directory
    /// toggles its expansion and selects it; with the modifier held only
    /// the selection toggles. Clicks past the end of the list do nothing;
    /// callers treat those as outside interaction.
    pub async fn click(&mut self, index: usize, multi: bool) -> Result<()> {
        let Some(path) = self.path_at(index).cloned() else {
            return Ok(());
        };
        if path.is_directory() && !multi {
            self.toggle_directory(&path).await?;
        }
        self.activate(&path, multi);
        Ok(())
    }

    fn notify_selected(&mut self, path: &TreePath) {
        let key = path.to_string();
        if let Some(on_select) = self.hooks.on_select.as_mut() {
            on_select(&key);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use anyhow::bail;
    use async_trait::async_trait;
    use ratatui::style::Modifier;

    use super::*;
    use crate::render::RenderHooks;
    use crate::source::DirEntry;

    struct MapSource(HashMap<String, Vec<DirEntry>>);

    impl MapSource {
        fn new(listings: &[(&str, &[(&str, bool)])]) -> Self {
            Self(
                listings
                    .iter()
                    .map(|(path, entries)| {
                        let entries = entries
                            .iter()
                            .map(|(name, is_directory)| DirEntry {
                                name: (*name).to_owned(),
                                is_directory: *is_directory,
                            })
                            .collect();
                        ((*path).to_owned(), entries)
                    })
                    .collect(),
            )
        }
    }

    #[async_trait(?Send)]
    impl DirectorySource for MapSource {
        async fn read_directory(&self, path: &str) -> Result<Vec<DirEntry>> {
            match self.0.get(path) {
                Some(entries) => Ok(entries.clone()),
                None => bail!("no listing for {path:?}"),
            }
        }

        async fn is_directory(&self, path: &str) -> Result<bool> {
            Ok(self.0.contains_key(path))
        }
    }

    fn file(raw: &str) -> TreePath {
        TreePath::parse(raw, false)
    }

    fn dir(raw: &str) -> TreePath {
        TreePath::parse(raw, true)
    }

    async fn sample_tree() -> FileTree<MapSource> {
        let mut tree = FileTree::new(MapSource::new(&[(
            "",
            &[("a", true), ("x.txt", false), ("y.txt", false)],
        ), ("a", &[("c.txt", false)])]));
        tree.load_root().await.unwrap();
        tree
    }

    fn active_row(tree: &FileTree<MapSource>, index: usize) -> bool {
        tree.row_at(index)
            .unwrap()
            .line()
            .style
            .add_modifier
            .contains(Modifier::REVERSED)
    }

    #[tokio::test]
    async fn plain_activation_replaces_the_set() {
        let mut tree = sample_tree().await;
        tree.activate(&file("x.txt"), false);
        assert_eq!(tree.active_items().into_iter().collect::<Vec<_>>(), [
            "x.txt"
        ]);

        tree.activate(&file("y.txt"), false);
        assert_eq!(tree.active_items().into_iter().collect::<Vec<_>>(), [
            "y.txt"
        ]);
        assert!(!active_row(&tree, 1));
        assert!(active_row(&tree, 2));
    }

    #[tokio::test]
    async fn modifier_activation_accumulates_and_toggles() {
        let mut tree = sample_tree().await;
        tree.activate(&file("x.txt"), false);
        tree.activate(&file("y.txt"), true);
        assert_eq!(
            tree.active_items().into_iter().collect::<Vec<_>>(),
            ["x.txt", "y.txt"]
        );

        tree.activate(&file("y.txt"), true);
        assert_eq!(tree.active_items().into_iter().collect::<Vec<_>>(), [
            "x.txt"
        ]);
        assert!(active_row(&tree, 1));
        assert!(!active_row(&tree, 2));
    }

    #[tokio::test]
    async fn outside_interaction_clears_everything() {
        let mut tree = sample_tree().await;
        tree.activate(&file("x.txt"), false);
        tree.activate(&file("y.txt"), true);

        tree.deactivate_all();
        assert!(tree.active_items().is_empty());
        assert!(!active_row(&tree, 1));
        assert!(!active_row(&tree, 2));
    }

    #[tokio::test]
    async fn observer_hears_activations_only() {
        let heard: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = Rc::clone(&heard);
        let hooks = RenderHooks {
            on_select: Some(Box::new(move |key: &str| {
                sink.borrow_mut().push(key.to_owned());
            })),
            ..Default::default()
        };

        let mut tree = FileTree::new(MapSource::new(&[(
            "",
            &[("x.txt", false), ("y.txt", false)],
        )]))
        .with_hooks(hooks);
        tree.load_root().await.unwrap();

        tree.activate(&file("x.txt"), false);
        tree.activate(&file("y.txt"), true);
        tree.activate(&file("y.txt"), true);
        tree.deactivate_all();

        assert_eq!(*heard.borrow(), vec!["x.txt", "y.txt"]);
    }

    #[tokio::test]
    async fn plain_directory_click_expands_and_selects() {
        let mut tree = sample_tree().await;
        tree.click(0, false).await.unwrap();

        assert!(tree.is_opened(&dir("a")));
        assert!(tree.is_displayed(&file("a/c.txt")));
        assert_eq!(tree.active_items().into_iter().collect::<Vec<_>>(), ["a"]);

        // A second plain click collapses again, still selecting.
        tree.click(0, false).await.unwrap();
        assert!(!tree.is_opened(&dir("a")));
        assert!(!tree.is_displayed(&file("a/c.txt")));
    }

    #[tokio::test]
    async fn modifier_directory_click_selects_without_expanding() {
        let mut tree = sample_tree().await;
        tree.click(0, true).await.unwrap();

        assert!(!tree.is_opened(&dir("a")));
        assert!(!tree.is_displayed(&file("a/c.txt")));
        assert_eq!(tree.active_items().into_iter().collect::<Vec<_>>(), ["a"]);
    }

    #[tokio::test]
    async fn click_past_the_end_is_inert() {
        let mut tree = sample_tree().await;
        tree.click(99, false).await.unwrap();
        assert!(tree.active_items().is_empty());
    }
}

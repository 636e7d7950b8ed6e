use std::path::PathBuf;

use anyhow::{Result, bail};
use async_trait::async_trait;
use ignore::WalkBuilder;
use tracing::warn;

/// One raw listing entry as reported by a data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_directory: bool,
}

/// The external provider of hierarchy data.
///
/// Listing order is irrelevant; the reconciler re-sorts. The contract is
/// uniformly asynchronous, and sources backed by memory or a local disk
/// simply resolve immediately. Futures are not required to be `Send`: the
/// tree is a single-task component.
#[async_trait(?Send)]
pub trait DirectorySource {
    /// Lists the immediate children of `path` (`""` is the hierarchy root).
    async fn read_directory(&self, path: &str) -> Result<Vec<DirEntry>>;

    /// Resolves whether `path` names a directory.
    async fn is_directory(&self, path: &str) -> Result<bool>;
}

/// Filesystem-backed source rooted at a directory.
///
/// Honors `.gitignore` rules and skips hidden entries unless told otherwise.
pub struct FsSource {
    root: PathBuf,
    include_ignored: bool,
    show_hidden: bool,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            include_ignored: false,
            show_hidden: false,
        }
    }

    /// Also list entries matched by ignore files.
    pub fn include_ignored(mut self, yes: bool) -> Self {
        self.include_ignored = yes;
        self
    }

    /// Also list dotfiles.
    pub fn show_hidden(mut self, yes: bool) -> Self {
        self.show_hidden = yes;
        self
    }

    fn resolve(&self, path: &str) -> PathBuf {
        if path.is_empty() {
            self.root.clone()
        } else {
            self.root.join(path)
        }
    }
}

#[async_trait(?Send)]
impl DirectorySource for FsSource {
    async fn read_directory(&self, path: &str) -> Result<Vec<DirEntry>> {
        let dir = self.resolve(path);
        if !dir.is_dir() {
            bail!("not a directory: {}", dir.display());
        }

        let mut walker = WalkBuilder::new(&dir);
        walker.max_depth(Some(1)).hidden(!self.show_hidden);
        if self.include_ignored {
            walker.git_ignore(false).ignore(false);
        }

        let mut entries = Vec::new();
        for result in walker.build() {
            let dirent = match result {
                Ok(v) => v,
                Err(e) => {
                    warn!("skipping unreadable entry under {}: {e}", dir.display());
                    continue;
                }
            };
            let entry_path = dirent.into_path();
            // The walker yields the directory itself first.
            if entry_path == dir {
                continue;
            }
            let Some(name) = entry_path.file_name() else {
                continue;
            };
            entries.push(DirEntry {
                name: name.to_string_lossy().into_owned(),
                is_directory: entry_path.is_dir(),
            });
        }
        Ok(entries)
    }

    async fn is_directory(&self, path: &str) -> Result<bool> {
        Ok(self.resolve(path).is_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn lists_immediate_children_only() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub/inner.txt"), b"x").unwrap();
        fs::write(tmp.path().join("top.txt"), b"y").unwrap();

        let source = FsSource::new(tmp.path());
        let mut entries = source.read_directory("").await.unwrap();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        assert_eq!(
            entries,
            vec![
                DirEntry {
                    name: "sub".into(),
                    is_directory: true
                },
                DirEntry {
                    name: "top.txt".into(),
                    is_directory: false
                },
            ]
        );

        let nested = source.read_directory("sub").await.unwrap();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].name, "inner.txt");
    }

    #[tokio::test]
    async fn resolves_entry_types() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("top.txt"), b"y").unwrap();

        let source = FsSource::new(tmp.path());
        assert!(source.is_directory("sub").await.unwrap());
        assert!(!source.is_directory("top.txt").await.unwrap());
        assert!(!source.is_directory("missing").await.unwrap());
    }

    #[tokio::test]
    async fn reading_a_file_as_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("top.txt"), b"y").unwrap();

        let source = FsSource::new(tmp.path());
        assert!(source.read_directory("top.txt").await.is_err());
    }

    #[tokio::test]
    async fn hidden_entries_are_filtered_by_default() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(".secret"), b"x").unwrap();
        fs::write(tmp.path().join("plain.txt"), b"y").unwrap();

        let source = FsSource::new(tmp.path());
        let names: Vec<String> = source
            .read_directory("")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["plain.txt"]);

        let source = FsSource::new(tmp.path()).show_hidden(true);
        let mut names: Vec<String> = source
            .read_directory("")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        names.sort();
        assert_eq!(names, vec![".secret", "plain.txt"]);
    }

    #[tokio::test]
    async fn gitignore_rules_apply_unless_overridden() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join(".git")).unwrap();
        fs::write(tmp.path().join(".gitignore"), b"*.log\n").unwrap();
        fs::write(tmp.path().join("build.log"), b"x").unwrap();
        fs::write(tmp.path().join("main.rs"), b"y").unwrap();

        let source = FsSource::new(tmp.path());
        let names: Vec<String> = source
            .read_directory("")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["main.rs"]);

        let source = FsSource::new(tmp.path()).include_ignored(true);
        let mut names: Vec<String> = source
            .read_directory("")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["build.log", "main.rs"]);
    }
}

use serde::{Deserialize, Serialize};

/// Kind of a single tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory (may or may not have been expanded, depending on the
    /// configured depth bound)
    Dir,
}

/// One file or directory in the flattened repository listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    /// Path relative to the repository root, no leading or trailing slash
    pub path: String,
    /// Whether this entry is a file or a directory
    pub kind: EntryKind,
}

impl TreeEntry {
    /// Creates a file entry
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    /// Creates a directory entry
    pub fn dir(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Dir,
        }
    }

    /// Nesting depth of this entry; root-level entries have depth 0
    pub fn depth(&self) -> usize {
        self.path.matches('/').count()
    }

    /// Final path component
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

/// Ordered, flattened file/directory listing of a repository at a reference
///
/// Entries keep the ordering returned by the hosting API, with each parent
/// directory entry preceding its children. Immutable once constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryTree {
    entries: Vec<TreeEntry>,
}

impl RepositoryTree {
    /// Builds a tree from an already-flattened entry list
    pub fn from_entries(entries: Vec<TreeEntry>) -> Self {
        Self { entries }
    }

    /// Builds a tree from plain path strings; a trailing `/` marks a
    /// directory entry
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = paths
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                match p.strip_suffix('/') {
                    Some(dir) => TreeEntry::dir(dir),
                    None => TreeEntry::file(p),
                }
            })
            .collect();
        Self { entries }
    }

    /// Entries in listing order
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the listing holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the indented text form embedded into generation prompts
    ///
    /// One line per entry, two spaces of indentation per nesting level,
    /// directory names suffixed with `/`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            for _ in 0..entry.depth() {
                out.push_str("  ");
            }
            out.push_str(entry.name());
            if entry.kind == EntryKind::Dir {
                out.push('/');
            }
            out.push('\n');
        }
        // No trailing newline on the rendered block
        out.pop();
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_paths_marks_directories() {
        let tree = RepositoryTree::from_paths(["src/", "src/main.py", "README.md"]);

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.entries()[0], TreeEntry::dir("src"));
        assert_eq!(tree.entries()[1], TreeEntry::file("src/main.py"));
        assert_eq!(tree.entries()[2].kind, EntryKind::File);
    }

    #[test]
    fn test_render_indents_by_depth() {
        let tree = RepositoryTree::from_paths([
            "Cargo.toml",
            "src/",
            "src/lib.rs",
            "src/github/",
            "src/github/mod.rs",
        ]);

        let expected = "\
Cargo.toml
src/
  lib.rs
  github/
    mod.rs";
        assert_eq!(tree.render(), expected);
    }

    #[test]
    fn test_empty_tree() {
        let tree = RepositoryTree::default();
        assert!(tree.is_empty());
        assert_eq!(tree.render(), "");
    }
}

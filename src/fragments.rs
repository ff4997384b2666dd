//! Inherited prompt fragments.
//!
//! A fragment is a small text file (`prefix.txt`, `suffix.txt`) placed in a
//! directory of the task tree. Every task beneath that directory inherits the
//! nearest one; a closer fragment shadows those further up.

use std::fs;
use std::path::{Path, PathBuf};

/// Looks up fragments by walking from a task's directory toward the tree root.
#[derive(Debug, Clone)]
pub struct FragmentResolver {
    root: PathBuf,
    extension: String,
}

impl FragmentResolver {
    pub fn new<P: AsRef<Path>>(root: P, extension: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            extension: extension.to_string(),
        }
    }

    /// Trimmed text of the nearest `name` fragment at or above `start`, or
    /// an empty string when there is none.
    ///
    /// The search never looks above the root. A `start` outside the root is
    /// searched up to the filesystem root instead.
    pub fn resolve(&self, start: &Path, name: &str) -> String {
        let file_name = format!("{}.{}", name, self.extension);
        let mut dir = start;

        loop {
            let candidate = dir.join(&file_name);
            if candidate.is_file() {
                match fs::read_to_string(&candidate) {
                    Ok(text) => return text.trim().to_string(),
                    Err(e) => {
                        eprintln!(
                            "Warning: failed to read fragment '{}': {}",
                            candidate.display(),
                            e
                        );
                    }
                }
            }

            if dir == self.root {
                return String::new();
            }
            match dir.parent() {
                Some(parent) if parent != dir => dir = parent,
                _ => return String::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: PathBuf, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_resolves_from_ancestor() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("ImgIdeas");
        write(root.join("prefix.txt"), "  watercolor, soft light \n");
        let leaf = root.join("forest").join("night");
        fs::create_dir_all(&leaf).unwrap();

        let resolver = FragmentResolver::new(&root, "txt");
        assert_eq!(resolver.resolve(&leaf, "prefix"), "watercolor, soft light");
    }

    #[test]
    fn test_nearest_fragment_wins() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();
        write(root.join("suffix.txt"), "outer");
        write(root.join("forest").join("suffix.txt"), "inner");
        let leaf = root.join("forest").join("night");
        fs::create_dir_all(&leaf).unwrap();

        let resolver = FragmentResolver::new(&root, "txt");
        assert_eq!(resolver.resolve(&leaf, "suffix"), "inner");
        assert_eq!(resolver.resolve(&root, "suffix"), "outer");
    }

    #[test]
    fn test_never_reads_above_root() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path().join("prefix.txt"), "outside");
        let root = temp_dir.path().join("ImgIdeas");
        let leaf = root.join("a");
        fs::create_dir_all(&leaf).unwrap();

        let resolver = FragmentResolver::new(&root, "txt");
        assert_eq!(resolver.resolve(&leaf, "prefix"), "");
        assert_eq!(resolver.resolve(&root, "prefix"), "");
    }

    #[test]
    fn test_missing_fragment_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = FragmentResolver::new(temp_dir.path(), "txt");
        assert_eq!(resolver.resolve(temp_dir.path(), "prefix"), "");
    }

    #[test]
    fn test_start_outside_root_terminates() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("ImgIdeas");
        fs::create_dir_all(&root).unwrap();
        let other = temp_dir.path().join("elsewhere");
        fs::create_dir_all(&other).unwrap();

        let resolver = FragmentResolver::new(&root, "txt");
        assert_eq!(resolver.resolve(&other, "no-such-fragment-name"), "");
    }

    #[test]
    fn test_directory_named_like_fragment_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();
        write(root.join("prefix.txt"), "real");
        let leaf = root.join("a");
        fs::create_dir_all(leaf.join("prefix.txt")).unwrap();

        let resolver = FragmentResolver::new(&root, "txt");
        assert_eq!(resolver.resolve(&leaf, "prefix"), "real");
    }
}

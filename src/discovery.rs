//! Task discovery over the task tree.
//!
//! Walks the tree depth first. Inside each directory, files sort before
//! subdirectories and siblings sort by name, so a directory's own tasks are
//! yielded before anything beneath it. A directory holding the ignore marker
//! is pruned before its contents are read.

use crate::config::Config;
use crate::task::TaskRef;
use std::cmp::Ordering;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Enumerates task descriptors under a tree root.
#[derive(Debug, Clone)]
pub struct TaskDiscovery {
    root: PathBuf,
    descriptor_extension: String,
    ignore_marker: String,
    fragment_names: Vec<String>,
}

impl TaskDiscovery {
    pub fn new<P: AsRef<Path>>(root: P, config: &Config) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            descriptor_extension: config.descriptor_extension.clone(),
            ignore_marker: config.ignore_marker.clone(),
            fragment_names: config
                .fragment_names()
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Lazily yield every qualifying task under the root.
    ///
    /// Unreadable entries are reported on stderr and skipped.
    pub fn tasks(&self) -> impl Iterator<Item = TaskRef> + '_ {
        WalkDir::new(&self.root)
            .sort_by(files_first)
            .into_iter()
            .filter_entry(move |entry| !self.is_ignored_dir(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    eprintln!("Warning: skipping unreadable path during discovery: {}", e);
                    None
                }
            })
            .filter(move |entry| self.is_descriptor(entry))
            .filter_map(move |entry| TaskRef::from_path(&self.root, entry.path()))
    }

    fn is_ignored_dir(&self, entry: &DirEntry) -> bool {
        entry.file_type().is_dir() && entry.path().join(&self.ignore_marker).is_file()
    }

    fn is_descriptor(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_file() {
            return false;
        }
        let path = entry.path();
        if path.extension().and_then(OsStr::to_str) != Some(self.descriptor_extension.as_str()) {
            return false;
        }
        match path.file_stem().and_then(OsStr::to_str) {
            Some(stem) => !self.fragment_names.iter().any(|name| name == stem),
            None => false,
        }
    }
}

fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

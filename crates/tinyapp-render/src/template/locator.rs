//! Template file lookup.
//!
//! [`TemplateLocator`] maps a template name to a file by trying each search
//! directory in registration order:
//!
//! ```text
//! <directory>/<prefix><name><postfix>
//! ```
//!
//! The first candidate that is a regular file and can be opened for reading
//! wins. Unlike a registry, nothing is scanned or cached: every lookup checks
//! the filesystem, so templates added or removed on disk are picked up on the
//! next render.

use std::fs::File;
use std::path::{Component, Path, PathBuf};

/// Ordered, de-duplicated search directories plus file name affixes.
///
/// # Example
///
/// ```rust,ignore
/// let mut locator = TemplateLocator::new();
/// locator.set_postfix(".j2");
/// locator.add_directories([PathBuf::from("./templates")]);
///
/// // ./templates/list.j2, if it exists and is readable
/// let path = locator.find("list");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateLocator {
    dirs: Vec<PathBuf>,
    prefix: String,
    postfix: String,
}

impl TemplateLocator {
    /// Creates a locator with no directories and empty affixes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the file name prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the file name postfix.
    pub fn postfix(&self) -> &str {
        &self.postfix
    }

    /// Sets the file name prefix.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Sets the file name postfix.
    pub fn set_postfix(&mut self, postfix: impl Into<String>) {
        self.postfix = postfix.into();
    }

    /// Returns the search directories in search order.
    pub fn directories(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Appends directories that are not registered yet.
    pub fn add_directories<I>(&mut self, dirs: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        for dir in dirs {
            if !self.dirs.contains(&dir) {
                self.dirs.push(dir);
            }
        }
    }

    /// Removes directories; unknown ones are ignored.
    pub fn remove_directories<'a, I>(&mut self, dirs: I)
    where
        I: IntoIterator<Item = &'a PathBuf>,
    {
        let remove: Vec<&PathBuf> = dirs.into_iter().collect();
        self.dirs.retain(|dir| !remove.contains(&dir));
    }

    /// Builds the candidate path for `name` inside `dir`.
    ///
    /// The file name is always placed under `dir`, even when `name` is an
    /// absolute path.
    pub fn candidate(&self, dir: &Path, name: &str) -> PathBuf {
        let file = format!("{}{}{}", self.prefix, name, self.postfix);
        let mut path = dir.to_path_buf();
        // Root and prefix components would make `push` discard `dir`
        path.extend(
            Path::new(&file)
                .components()
                .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_))),
        );
        path
    }

    /// Returns every candidate path for `name`, in search order.
    pub fn candidates(&self, name: &str) -> Vec<PathBuf> {
        self.dirs
            .iter()
            .map(|dir| self.candidate(dir, name))
            .collect()
    }

    /// Finds the first readable file for `name`.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        self.dirs.iter().find_map(|dir| {
            let path = self.candidate(dir, name);
            if is_readable_file(&path) {
                tracing::trace!(template = name, path = %path.display(), "template found");
                Some(path)
            } else {
                tracing::trace!(template = name, path = %path.display(), "template candidate skipped");
                None
            }
        })
    }
}

fn is_readable_file(path: &Path) -> bool {
    path.is_file() && File::open(path).is_ok()
}
